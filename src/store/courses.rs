use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Entity, FileStore};
use crate::error::AppError;
use crate::models::Course;

/// On-disk shape of a course, one JSON object per line.
#[derive(Debug, Serialize, Deserialize)]
pub struct CourseRecord {
    pub course_id: String,
    pub code: String,
    pub name: String,
    pub credits: u32,
}

impl Entity for Course {
    type Record = CourseRecord;

    fn id(&self) -> &str {
        &self.course_id
    }

    fn to_record(&self) -> CourseRecord {
        CourseRecord {
            course_id: self.course_id.clone(),
            code: self.code.clone(),
            name: self.name.clone(),
            credits: self.credits,
        }
    }

    fn from_record(record: CourseRecord) -> Self {
        Self {
            course_id: record.course_id,
            code: record.code,
            name: record.name,
            credits: record.credits,
        }
    }
}

/// Course collection with code uniqueness enforced on insert. Courses are
/// never patched; a change means delete and recreate.
#[derive(Debug)]
pub struct CourseStore {
    inner: FileStore<Course>,
}

impl CourseStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: FileStore::open(path),
        }
    }

    pub fn get_all(&self) -> Vec<Course> {
        self.inner.all()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Course> {
        self.inner.get(id).cloned()
    }

    pub fn get_by_code(&self, code: &str) -> Option<Course> {
        self.inner.find(|course| course.code == code).cloned()
    }

    /// Inserts a new course. Rejects an already-known id or a code held by
    /// another course.
    pub fn add(&mut self, course: Course) -> Result<Course, AppError> {
        if self.inner.contains(&course.course_id) {
            return Err(AppError::Conflict(format!(
                "course {} already exists",
                course.course_id
            )));
        }
        if self.get_by_code(&course.code).is_some() {
            return Err(AppError::Conflict(format!(
                "course code {} is already in use",
                course.code
            )));
        }
        Ok(self.inner.insert(course))
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.inner.remove(id)
    }
}
