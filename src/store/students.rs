use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Entity, FileStore, parse_timestamp};
use crate::error::AppError;
use crate::models::{Student, UpdateStudentRequest};

/// On-disk shape of a student, one JSON object per line.
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub created_at: Option<String>,
    pub gpa: Option<f64>,
}

impl Entity for Student {
    type Record = StudentRecord;

    fn id(&self) -> &str {
        &self.student_id
    }

    fn to_record(&self) -> StudentRecord {
        StudentRecord {
            student_id: self.student_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: Some(self.created_at.to_rfc3339()),
            gpa: self.gpa,
        }
    }

    fn from_record(record: StudentRecord) -> Self {
        Self {
            student_id: record.student_id,
            name: record.name,
            email: record.email,
            created_at: parse_timestamp(record.created_at.as_deref()),
            gpa: record.gpa,
        }
    }
}

/// Student collection with email uniqueness enforced on insert and update.
#[derive(Debug)]
pub struct StudentStore {
    inner: FileStore<Student>,
}

impl StudentStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: FileStore::open(path),
        }
    }

    pub fn get_all(&self) -> Vec<Student> {
        self.inner.all()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Student> {
        self.inner.get(id).cloned()
    }

    pub fn get_by_email(&self, email: &str) -> Option<Student> {
        self.inner.find(|student| student.email == email).cloned()
    }

    /// Inserts a new student. Rejects an already-known id or an email held
    /// by another student before anything is written.
    pub fn add(&mut self, student: Student) -> Result<Student, AppError> {
        if self.inner.contains(&student.student_id) {
            return Err(AppError::Conflict(format!(
                "student {} already exists",
                student.student_id
            )));
        }
        if self.get_by_email(&student.email).is_some() {
            return Err(AppError::Conflict(format!(
                "email {} is already in use",
                student.email
            )));
        }
        Ok(self.inner.insert(student))
    }

    /// Applies the present fields of the patch. `Ok(None)` when the id is
    /// unknown; changing the email to one held by another student is a
    /// conflict.
    pub fn update(
        &mut self,
        id: &str,
        patch: UpdateStudentRequest,
    ) -> Result<Option<Student>, AppError> {
        let Some(mut student) = self.inner.get(id).cloned() else {
            return Ok(None);
        };
        if let Some(email) = patch.email {
            let taken = self
                .inner
                .find(|other| other.email == email && other.student_id != id)
                .is_some();
            if taken {
                return Err(AppError::Conflict(format!(
                    "email {email} is already in use"
                )));
            }
            student.email = email;
        }
        if let Some(name) = patch.name {
            student.name = name;
        }
        Ok(Some(self.inner.insert(student)))
    }

    /// Writes a recomputed GPA back through the validated setter, or clears
    /// it when `gpa` is `None`. `Ok(None)` when the id is unknown.
    pub fn set_gpa(&mut self, id: &str, gpa: Option<f64>) -> Result<Option<Student>, AppError> {
        let Some(mut student) = self.inner.get(id).cloned() else {
            return Ok(None);
        };
        match gpa {
            Some(value) => student.set_gpa(value)?,
            None => student.gpa = None,
        }
        Ok(Some(self.inner.insert(student)))
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.inner.remove(id)
    }
}
