//! libSQL backend — async `Database` trait implementation.
//!
//! The process keeps one `libsql::Database` handle. Each operation opens its
//! own `Connection` through [`LibSqlBackend::connect`] and drops it when the
//! operation returns, whether it succeeded or not.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::model::{Id, Score, Student, StudentPatch, Subject};
use crate::store::schema;
use crate::store::traits::Database;

/// How long a connection waits on another writer's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// libSQL database backend over a local file.
pub struct LibSqlBackend {
    db: LibSqlDatabase,
    path: PathBuf,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and create missing tables.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::Connection(format!("Failed to create database directory: {e}"))
                })?;
            }
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Connection(format!("Failed to open libSQL database: {e}"))
            })?;

        let backend = Self {
            db,
            path: path.to_path_buf(),
        };
        backend.init_schema().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection scoped to the caller. Dropping it releases it.
    ///
    /// Concurrent writers wait up to `BUSY_TIMEOUT` for the file lock.
    pub fn connect(&self) -> Result<Connection, DatabaseError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DatabaseError::Connection(format!("Failed to create connection: {e}")))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| DatabaseError::Connection(format!("Failed to set busy timeout: {e}")))?;
        Ok(conn)
    }
}

// ── Row mapping ─────────────────────────────────────────────────────

const STUDENT_COLUMNS: &str = "id, name, surname";

const SUBJECT_COLUMNS: &str = "id, name";

const SCORE_COLUMNS: &str = "id, student_id, subject_id, score";

fn row_to_student(row: &libsql::Row) -> Result<Student, DatabaseError> {
    Ok(Student {
        id: row.get(0).map_err(|e| DatabaseError::Query(format!("student.id: {e}")))?,
        name: row.get(1).map_err(|e| DatabaseError::Query(format!("student.name: {e}")))?,
        surname: row
            .get(2)
            .map_err(|e| DatabaseError::Query(format!("student.surname: {e}")))?,
    })
}

fn row_to_subject(row: &libsql::Row) -> Result<Subject, DatabaseError> {
    Ok(Subject {
        id: row.get(0).map_err(|e| DatabaseError::Query(format!("subject.id: {e}")))?,
        name: row.get(1).map_err(|e| DatabaseError::Query(format!("subject.name: {e}")))?,
    })
}

fn row_to_score(row: &libsql::Row) -> Result<Score, DatabaseError> {
    Ok(Score {
        id: row.get(0).map_err(|e| DatabaseError::Query(format!("score.id: {e}")))?,
        student_id: row
            .get(1)
            .map_err(|e| DatabaseError::Query(format!("score.student_id: {e}")))?,
        subject_id: row
            .get(2)
            .map_err(|e| DatabaseError::Query(format!("score.subject_id: {e}")))?,
        score: row.get(3).map_err(|e| DatabaseError::Query(format!("score.score: {e}")))?,
    })
}

/// Drain a result set through `map`.
async fn collect_rows<T>(
    mut rows: libsql::Rows,
    op: &str,
    map: fn(&libsql::Row) -> Result<T, DatabaseError>,
) -> Result<Vec<T>, DatabaseError> {
    let mut out = Vec::new();
    while let Some(row) = rows
        .next()
        .await
        .map_err(|e| DatabaseError::from_libsql(op, e))?
    {
        out.push(map(&row)?);
    }
    Ok(out)
}

/// Read at most one row through `map`.
async fn first_row<T>(
    mut rows: libsql::Rows,
    op: &str,
    map: fn(&libsql::Row) -> Result<T, DatabaseError>,
) -> Result<Option<T>, DatabaseError> {
    match rows.next().await {
        Ok(Some(row)) => Ok(Some(map(&row)?)),
        Ok(None) => Ok(None),
        Err(e) => Err(DatabaseError::from_libsql(op, e)),
    }
}

async fn get_student_on(conn: &Connection, id: Id) -> Result<Option<Student>, DatabaseError> {
    let rows = conn
        .query(
            &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
            params![id],
        )
        .await
        .map_err(|e| DatabaseError::from_libsql("get_student", e))?;
    first_row(rows, "get_student row", row_to_student).await
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl Database for LibSqlBackend {
    async fn init_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.connect()?;
        schema::init_schema(&conn).await
    }

    // ── Students ────────────────────────────────────────────────────

    async fn create_student(&self, name: &str, surname: &str) -> Result<Student, DatabaseError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO students (name, surname) VALUES (?1, ?2)",
            params![name, surname],
        )
        .await
        .map_err(|e| DatabaseError::from_libsql("create_student", e))?;

        let student = Student {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            surname: surname.to_string(),
        };
        debug!(id = student.id, "Student created");
        Ok(student)
    }

    async fn list_students(&self) -> Result<Vec<Student>, DatabaseError> {
        let conn = self.connect()?;
        let rows = conn
            .query(
                &format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY id ASC"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::from_libsql("list_students", e))?;
        collect_rows(rows, "list_students row", row_to_student).await
    }

    async fn get_student(&self, id: Id) -> Result<Option<Student>, DatabaseError> {
        let conn = self.connect()?;
        get_student_on(&conn, id).await
    }

    async fn update_student(
        &self,
        id: Id,
        patch: &StudentPatch,
    ) -> Result<Option<Student>, DatabaseError> {
        let conn = self.connect()?;
        let count = conn
            .execute(
                "UPDATE students SET name = COALESCE(?2, name), surname = COALESCE(?3, surname) WHERE id = ?1",
                params![id, patch.name.as_deref(), patch.surname.as_deref()],
            )
            .await
            .map_err(|e| DatabaseError::from_libsql("update_student", e))?;

        if count == 0 {
            return Ok(None);
        }
        debug!(id, unchanged = patch.is_empty(), "Student updated");
        get_student_on(&conn, id).await
    }

    async fn delete_student(&self, id: Id) -> Result<bool, DatabaseError> {
        let conn = self.connect()?;
        let count = conn
            .execute("DELETE FROM students WHERE id = ?1", params![id])
            .await
            .map_err(|e| DatabaseError::from_libsql("delete_student", e))?;
        debug!(id, deleted = count > 0, "Student delete");
        Ok(count > 0)
    }

    // ── Subjects ────────────────────────────────────────────────────

    async fn create_subject(&self, name: &str) -> Result<Subject, DatabaseError> {
        let conn = self.connect()?;
        conn.execute("INSERT INTO subjects (name) VALUES (?1)", params![name])
            .await
            .map_err(|e| DatabaseError::from_libsql("create_subject", e))?;

        let subject = Subject {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        };
        debug!(id = subject.id, "Subject created");
        Ok(subject)
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, DatabaseError> {
        let conn = self.connect()?;
        let rows = conn
            .query(
                &format!("SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY id ASC"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::from_libsql("list_subjects", e))?;
        collect_rows(rows, "list_subjects row", row_to_subject).await
    }

    async fn delete_subject(&self, id: Id) -> Result<bool, DatabaseError> {
        let conn = self.connect()?;
        let count = conn
            .execute("DELETE FROM subjects WHERE id = ?1", params![id])
            .await
            .map_err(|e| DatabaseError::from_libsql("delete_subject", e))?;
        debug!(id, deleted = count > 0, "Subject delete");
        Ok(count > 0)
    }

    // ── Scores ──────────────────────────────────────────────────────

    async fn create_score(
        &self,
        student_id: Id,
        subject_id: Id,
        score: i64,
    ) -> Result<Score, DatabaseError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO scores (student_id, subject_id, score) VALUES (?1, ?2, ?3)",
            params![student_id, subject_id, score],
        )
        .await
        .map_err(|e| DatabaseError::from_libsql("create_score", e))?;

        let score = Score {
            id: conn.last_insert_rowid(),
            student_id,
            subject_id,
            score,
        };
        debug!(id = score.id, student_id, subject_id, "Score created");
        Ok(score)
    }

    async fn list_scores(&self) -> Result<Vec<Score>, DatabaseError> {
        let conn = self.connect()?;
        let rows = conn
            .query(
                &format!("SELECT {SCORE_COLUMNS} FROM scores ORDER BY id ASC"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::from_libsql("list_scores", e))?;
        collect_rows(rows, "list_scores row", row_to_score).await
    }

    async fn get_score(&self, id: Id) -> Result<Option<Score>, DatabaseError> {
        let conn = self.connect()?;
        let rows = conn
            .query(
                &format!("SELECT {SCORE_COLUMNS} FROM scores WHERE id = ?1"),
                params![id],
            )
            .await
            .map_err(|e| DatabaseError::from_libsql("get_score", e))?;
        first_row(rows, "get_score row", row_to_score).await
    }

    async fn delete_score(&self, id: Id) -> Result<bool, DatabaseError> {
        let conn = self.connect()?;
        let count = conn
            .execute("DELETE FROM scores WHERE id = ?1", params![id])
            .await
            .map_err(|e| DatabaseError::from_libsql("delete_score", e))?;
        debug!(id, deleted = count > 0, "Score delete");
        Ok(count > 0)
    }
}
