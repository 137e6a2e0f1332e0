pub mod course;
pub mod grade;
pub mod student;

pub use course::{Course, NewCourseRequest};
pub use grade::{Grade, NewGradeRequest, gpa_from_average, letter_for};
pub use student::{NewStudentRequest, Student, UpdateStudentRequest};
