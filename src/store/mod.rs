//! Persistence layer — libSQL-backed storage for students, subjects, and scores.

pub mod libsql_backend;
pub mod schema;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::Database;
