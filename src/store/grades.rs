use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Entity, FileStore, parse_timestamp};
use crate::error::AppError;
use crate::models::{Grade, gpa_from_average, letter_for};

/// On-disk shape of a grade, one JSON object per line.
#[derive(Debug, Serialize, Deserialize)]
pub struct GradeRecord {
    pub grade_id: String,
    pub student_id: String,
    pub course_id: String,
    pub score: f64,
    #[serde(default)]
    pub letter_grade: String,
    pub date: Option<String>,
}

impl Entity for Grade {
    type Record = GradeRecord;

    fn id(&self) -> &str {
        &self.grade_id
    }

    fn to_record(&self) -> GradeRecord {
        GradeRecord {
            grade_id: self.grade_id.clone(),
            student_id: self.student_id.clone(),
            course_id: self.course_id.clone(),
            score: self.score,
            letter_grade: self.letter_grade.clone(),
            date: Some(self.date.to_rfc3339()),
        }
    }

    fn from_record(record: GradeRecord) -> Self {
        Self {
            grade_id: record.grade_id,
            student_id: record.student_id,
            course_id: record.course_id,
            score: record.score,
            // the letter is derived state; recompute it rather than trusting
            // whatever the file says
            letter_grade: letter_for(record.score).to_string(),
            date: parse_timestamp(record.date.as_deref()),
        }
    }
}

/// Grade collection with linear-scan queries by student and course.
#[derive(Debug)]
pub struct GradeStore {
    inner: FileStore<Grade>,
}

impl GradeStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: FileStore::open(path),
        }
    }

    pub fn get_all(&self) -> Vec<Grade> {
        self.inner.all()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Grade> {
        self.inner.get(id).cloned()
    }

    pub fn get_by_student(&self, student_id: &str) -> Vec<Grade> {
        self.inner
            .iter()
            .filter(|grade| grade.student_id == student_id)
            .cloned()
            .collect()
    }

    pub fn get_by_course(&self, course_id: &str) -> Vec<Grade> {
        self.inner
            .iter()
            .filter(|grade| grade.course_id == course_id)
            .cloned()
            .collect()
    }

    pub fn get_by_student_and_course(&self, student_id: &str, course_id: &str) -> Vec<Grade> {
        self.inner
            .iter()
            .filter(|grade| grade.student_id == student_id && grade.course_id == course_id)
            .cloned()
            .collect()
    }

    pub fn add(&mut self, grade: Grade) -> Result<Grade, AppError> {
        if self.inner.contains(&grade.grade_id) {
            return Err(AppError::Conflict(format!(
                "grade {} already exists",
                grade.grade_id
            )));
        }
        Ok(self.inner.insert(grade))
    }

    /// Replaces the score and recomputes the letter grade. `None` when the
    /// id is unknown.
    pub fn update_score(&mut self, id: &str, score: f64) -> Option<Grade> {
        let mut grade = self.inner.get(id).cloned()?;
        grade.set_score(score);
        Some(self.inner.insert(grade))
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.inner.remove(id)
    }

    /// Mean score over the student's grades mapped onto the 0-5 scale.
    /// `None` when the student has no grades, so callers can tell "no data"
    /// from an earned 0.
    pub fn student_gpa(&self, student_id: &str) -> Option<f64> {
        let grades = self.get_by_student(student_id);
        if grades.is_empty() {
            return None;
        }
        let total: f64 = grades.iter().map(|grade| grade.score).sum();
        Some(gpa_from_average(total / grades.len() as f64))
    }
}
