use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::store::{CourseStore, GradeStore, StudentStore};

#[derive(Clone)]
pub struct AppState {
    pub students: Arc<Mutex<StudentStore>>,
    pub courses: Arc<Mutex<CourseStore>>,
    pub grades: Arc<Mutex<GradeStore>>,
}

impl AppState {
    /// Opens the three stores under `data_dir`, loading whatever the files
    /// already hold.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            students: Arc::new(Mutex::new(StudentStore::open(data_dir.join("students.jsonl")))),
            courses: Arc::new(Mutex::new(CourseStore::open(data_dir.join("courses.jsonl")))),
            grades: Arc::new(Mutex::new(GradeStore::open(data_dir.join("grades.jsonl")))),
        }
    }
}
