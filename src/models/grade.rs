use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub grade_id: String,
    pub student_id: String,
    pub course_id: String,
    pub score: f64,
    pub letter_grade: String,
    pub date: DateTime<Utc>,
}

impl Grade {
    pub fn new(student_id: impl Into<String>, course_id: impl Into<String>, score: f64) -> Self {
        Self {
            grade_id: Uuid::new_v4().to_string(),
            student_id: student_id.into(),
            course_id: course_id.into(),
            score,
            letter_grade: letter_for(score).to_string(),
            date: Utc::now(),
        }
    }

    /// Replaces the score and recomputes the letter grade to match.
    pub fn set_score(&mut self, score: f64) {
        self.score = score;
        self.letter_grade = letter_for(score).to_string();
    }
}

/// Five-bucket mapping from a 0-100 score to the "5".."1" letter scale,
/// inclusive lower bounds.
pub fn letter_for(score: f64) -> &'static str {
    if score >= 90.0 {
        "5"
    } else if score >= 80.0 {
        "4"
    } else if score >= 70.0 {
        "3"
    } else if score >= 60.0 {
        "2"
    } else {
        "1"
    }
}

/// Converts a 0-100 average score to the 0-5 GPA scale, rounded to two
/// decimal places.
pub fn gpa_from_average(average: f64) -> f64 {
    round2(average / 20.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGradeRequest {
    pub student_id: String,
    pub course_id: String,
    pub score: f64,
}
