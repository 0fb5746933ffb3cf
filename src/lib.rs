//! gradebook — student, subject, and score records over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod server;
pub mod store;
