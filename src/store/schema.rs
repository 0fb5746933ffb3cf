//! Table definitions, created on startup when absent.
//!
//! There is no version tracking: every statement is `IF NOT EXISTS`, so
//! running the batch against an existing database is a no-op.

use libsql::Connection;

use crate::error::DatabaseError;

/// Full schema. `AUTOINCREMENT` keeps ids from being reused after the
/// newest row is deleted. Reference columns carry no `REFERENCES` clause:
/// libSQL enforces foreign keys, and scores must accept unknown ids and
/// outlive the student or subject they point at.
const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS students (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        surname TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_students_name ON students(name);
    CREATE INDEX IF NOT EXISTS idx_students_surname ON students(surname);

    CREATE TABLE IF NOT EXISTS subjects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS student_subject (
        student_id INTEGER,
        subject_id INTEGER
    );

    CREATE TABLE IF NOT EXISTS scores (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        student_id INTEGER NOT NULL,
        subject_id INTEGER NOT NULL,
        score INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_scores_student ON scores(student_id);
    CREATE INDEX IF NOT EXISTS idx_scores_subject ON scores(subject_id);
"#;

/// Tables that must exist after `init_schema`.
pub const TABLES: &[&str] = &["students", "subjects", "student_subject", "scores"];

/// Create all tables and indexes that do not exist yet.
pub async fn init_schema(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(SCHEMA)
        .await
        .map_err(|e| DatabaseError::Schema(format!("Failed to create tables: {e}")))?;

    tracing::info!(tables = TABLES.len(), "Database schema ready");
    Ok(())
}
