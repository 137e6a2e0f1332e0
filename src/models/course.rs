use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub code: String,
    pub name: String,
    pub credits: u32,
}

impl Course {
    pub fn new(code: impl Into<String>, name: impl Into<String>, credits: u32) -> Self {
        Self {
            course_id: Uuid::new_v4().to_string(),
            code: code.into(),
            name: name.into(),
            credits,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub code: String,
    pub name: String,
    pub credits: u32,
}
