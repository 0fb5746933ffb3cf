//! `Database` trait — the async interface every storage backend implements.

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::model::{Id, Score, Student, StudentPatch, Subject};

/// Backend-agnostic database trait covering students, subjects, and scores.
///
/// Every method is a single auto-committed statement. Lookups return
/// `Ok(None)` and deletes return `Ok(false)` when the id does not exist.
#[async_trait]
pub trait Database: Send + Sync {
    /// Create any missing tables and indexes.
    async fn init_schema(&self) -> Result<(), DatabaseError>;

    // ── Students ────────────────────────────────────────────────────

    /// Insert a student and return it with its generated id.
    async fn create_student(&self, name: &str, surname: &str) -> Result<Student, DatabaseError>;

    /// All students in insertion order.
    async fn list_students(&self) -> Result<Vec<Student>, DatabaseError>;

    async fn get_student(&self, id: Id) -> Result<Option<Student>, DatabaseError>;

    /// Overwrite the fields present in `patch`. Returns the updated student,
    /// or `None` if the id does not exist.
    async fn update_student(
        &self,
        id: Id,
        patch: &StudentPatch,
    ) -> Result<Option<Student>, DatabaseError>;

    /// Delete a student. Scores pointing at it are left in place.
    async fn delete_student(&self, id: Id) -> Result<bool, DatabaseError>;

    // ── Subjects ────────────────────────────────────────────────────

    /// Insert a subject. Fails with `DatabaseError::Constraint` when the
    /// name is already taken.
    async fn create_subject(&self, name: &str) -> Result<Subject, DatabaseError>;

    async fn list_subjects(&self) -> Result<Vec<Subject>, DatabaseError>;

    /// Delete a subject. Scores pointing at it are left in place.
    async fn delete_subject(&self, id: Id) -> Result<bool, DatabaseError>;

    // ── Scores ──────────────────────────────────────────────────────

    /// Insert a score. The referenced student and subject are not checked.
    async fn create_score(
        &self,
        student_id: Id,
        subject_id: Id,
        score: i64,
    ) -> Result<Score, DatabaseError>;

    async fn list_scores(&self) -> Result<Vec<Score>, DatabaseError>;

    async fn get_score(&self, id: Id) -> Result<Option<Score>, DatabaseError>;

    async fn delete_score(&self, id: Id) -> Result<bool, DatabaseError>;
}
