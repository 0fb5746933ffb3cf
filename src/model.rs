//! Record types — students, subjects, scores, and the student update patch.

use serde::{Deserialize, Serialize};

/// Row identifier. Assigned by the store, never reused.
pub type Id = i64;

/// A student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: Id,
    pub name: String,
    pub surname: String,
}

/// A subject. `name` is unique across subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Id,
    pub name: String,
}

/// A score given to a student in a subject.
///
/// `student_id` and `subject_id` are not checked against existing rows, and
/// survive deletion of the student or subject they point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub id: Id,
    pub student_id: Id,
    pub subject_id: Id,
    pub score: i64,
}

/// Fields to overwrite on an existing student. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub surname: Option<String>,
}

impl StudentPatch {
    /// Build a patch from request parameters, treating an empty string the
    /// same as an omitted field.
    pub fn from_params(name: Option<String>, surname: Option<String>) -> Self {
        Self {
            name: name.filter(|s| !s.is_empty()),
            surname: surname.filter(|s| !s.is_empty()),
        }
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.surname.is_none()
    }
}
