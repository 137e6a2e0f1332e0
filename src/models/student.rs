use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub gpa: Option<f64>,
}

impl Student {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            student_id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            created_at: Utc::now(),
            gpa: None,
        }
    }

    /// Sets the stored GPA, rejecting values outside the 0-5 scale.
    pub fn set_gpa(&mut self, gpa: f64) -> Result<(), AppError> {
        if !(0.0..=5.0).contains(&gpa) {
            return Err(AppError::Validation(format!(
                "gpa must be between 0 and 5, got {gpa}"
            )));
        }
        self.gpa = Some(gpa);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudentRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}
