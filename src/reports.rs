use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::models::{Course, Grade, Student, gpa_from_average, letter_for};
use crate::models::grade::round2;

/// Count of grades in each bucket of the five-point scale.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct GradeDistribution {
    #[serde(rename = "5")]
    pub fives: usize,
    #[serde(rename = "4")]
    pub fours: usize,
    #[serde(rename = "3")]
    pub threes: usize,
    #[serde(rename = "2")]
    pub twos: usize,
    #[serde(rename = "1")]
    pub ones: usize,
}

impl GradeDistribution {
    pub fn tally<'a>(grades: impl IntoIterator<Item = &'a Grade>) -> Self {
        let mut dist = Self::default();
        for grade in grades {
            match letter_for(grade.score) {
                "5" => dist.fives += 1,
                "4" => dist.fours += 1,
                "3" => dist.threes += 1,
                "2" => dist.twos += 1,
                _ => dist.ones += 1,
            }
        }
        dist
    }

    /// The same buckets keyed by human-readable range labels, highest first.
    pub fn labeled(&self) -> IndexMap<&'static str, usize> {
        IndexMap::from([
            ("5 (90-100)", self.fives),
            ("4 (80-89)", self.fours),
            ("3 (70-79)", self.threes),
            ("2 (60-69)", self.twos),
            ("1 (0-59)", self.ones),
        ])
    }
}

#[derive(Debug, Serialize)]
pub struct StudentsSummary {
    pub total_students: usize,
    pub students: Vec<StudentSummaryRow>,
}

#[derive(Debug, Serialize)]
pub struct StudentSummaryRow {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub grades_count: usize,
    pub average_score: f64,
    pub gpa: f64,
    pub created_at: DateTime<Utc>,
}

/// The GPA range filter is inclusive on both ends and applies to the value
/// computed here, not the stored one; rows come back ordered by GPA
/// descending, ties in input order.
pub fn students_summary(
    students: &[Student],
    grades: &[Grade],
    min_gpa: Option<f64>,
    max_gpa: Option<f64>,
) -> StudentsSummary {
    let mut rows = Vec::new();
    for student in students {
        let scores: Vec<f64> = grades
            .iter()
            .filter(|grade| grade.student_id == student.student_id)
            .map(|grade| grade.score)
            .collect();
        let (average, gpa) = if scores.is_empty() {
            (0.0, 0.0)
        } else {
            let average = scores.iter().sum::<f64>() / scores.len() as f64;
            (average, gpa_from_average(average))
        };
        if min_gpa.is_some_and(|min| gpa < min) || max_gpa.is_some_and(|max| gpa > max) {
            continue;
        }
        rows.push(StudentSummaryRow {
            student_id: student.student_id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            grades_count: scores.len(),
            average_score: round2(average),
            gpa,
            created_at: student.created_at,
        });
    }
    rows.sort_by(|a, b| b.gpa.total_cmp(&a.gpa));
    StudentsSummary {
        total_students: rows.len(),
        students: rows,
    }
}

#[derive(Debug, Serialize)]
pub struct CoursesSummary {
    pub total_courses: usize,
    pub courses: Vec<CourseSummaryRow>,
}

#[derive(Debug, Serialize)]
pub struct CourseSummaryRow {
    pub course_id: String,
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub grades_count: usize,
    pub average_score: f64,
    pub grade_distribution: GradeDistribution,
}

/// Ordered by grade count descending, ties in input order.
pub fn courses_summary(courses: &[Course], grades: &[Grade]) -> CoursesSummary {
    let mut rows = Vec::with_capacity(courses.len());
    for course in courses {
        let course_grades: Vec<&Grade> = grades
            .iter()
            .filter(|grade| grade.course_id == course.course_id)
            .collect();
        let average = if course_grades.is_empty() {
            0.0
        } else {
            course_grades.iter().map(|grade| grade.score).sum::<f64>()
                / course_grades.len() as f64
        };
        rows.push(CourseSummaryRow {
            course_id: course.course_id.clone(),
            code: course.code.clone(),
            name: course.name.clone(),
            credits: course.credits,
            grades_count: course_grades.len(),
            average_score: round2(average),
            grade_distribution: GradeDistribution::tally(course_grades.iter().copied()),
        });
    }
    rows.sort_by(|a, b| b.grades_count.cmp(&a.grades_count));
    CoursesSummary {
        total_courses: rows.len(),
        courses: rows,
    }
}

/// Statistics over a filtered grade set. An empty set is its own variant so
/// callers can tell "nothing matched" apart from a genuine zero average.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GradeStatistics {
    Empty {
        total_grades: usize,
        message: String,
    },
    Computed {
        total_grades: usize,
        average_score: f64,
        min_score: f64,
        max_score: f64,
        grade_distribution: IndexMap<&'static str, usize>,
    },
}

pub fn grade_statistics(
    grades: &[Grade],
    student_id: Option<&str>,
    course_id: Option<&str>,
) -> GradeStatistics {
    let filtered: Vec<&Grade> = grades
        .iter()
        .filter(|grade| student_id.is_none_or(|id| grade.student_id == id))
        .filter(|grade| course_id.is_none_or(|id| grade.course_id == id))
        .collect();

    if filtered.is_empty() {
        return GradeStatistics::Empty {
            total_grades: 0,
            message: "No grades to display".to_string(),
        };
    }

    let scores: Vec<f64> = filtered.iter().map(|grade| grade.score).collect();
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    GradeStatistics::Computed {
        total_grades: filtered.len(),
        average_score: round2(scores.iter().sum::<f64>() / scores.len() as f64),
        min_score: round2(min),
        max_score: round2(max),
        grade_distribution: GradeDistribution::tally(filtered.iter().copied()).labeled(),
    }
}

#[derive(Debug, Serialize)]
pub struct TopStudents {
    pub limit: usize,
    pub students: Vec<TopStudentRow>,
}

#[derive(Debug, Serialize)]
pub struct TopStudentRow {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub gpa: f64,
    pub created_at: DateTime<Utc>,
}

/// The first `limit` students by stored GPA descending. A student with no
/// stored GPA ranks as 0; ties keep input order.
pub fn top_students(students: &[Student], limit: usize) -> TopStudents {
    let mut rows: Vec<TopStudentRow> = students
        .iter()
        .map(|student| TopStudentRow {
            student_id: student.student_id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            gpa: student.gpa.unwrap_or(0.0),
            created_at: student.created_at,
        })
        .collect();
    rows.sort_by(|a, b| b.gpa.total_cmp(&a.gpa));
    rows.truncate(limit);
    TopStudents {
        limit,
        students: rows,
    }
}

#[derive(Debug, Serialize)]
pub struct StudentProgress {
    pub student_id: String,
    pub student_name: String,
    pub total_courses: usize,
    pub courses_completed: usize,
    pub total_credits: u32,
    pub weighted_average: f64,
    pub gpa: Option<f64>,
    pub progress: Vec<CourseProgressRow>,
}

#[derive(Debug, Serialize)]
pub struct CourseProgressRow {
    pub course_id: String,
    pub course_code: String,
    pub course_name: String,
    pub credits: u32,
    pub grades_count: usize,
    pub average_score: f64,
    pub status: CourseStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    Completed,
    NotStarted,
}

/// A course with at least one of the student's grades counts as completed
/// and contributes its credits to the weighted average; untouched courses
/// appear with a zero score and stay out of the weighting.
pub fn student_progress(
    student: &Student,
    courses: &[Course],
    student_grades: &[Grade],
) -> StudentProgress {
    let mut progress = Vec::with_capacity(courses.len());
    let mut completed = 0usize;
    let mut total_credits = 0u32;
    let mut weighted_sum = 0.0;

    for course in courses {
        let scores: Vec<f64> = student_grades
            .iter()
            .filter(|grade| grade.course_id == course.course_id)
            .map(|grade| grade.score)
            .collect();
        let (average, status) = if scores.is_empty() {
            (0.0, CourseStatus::NotStarted)
        } else {
            let average = scores.iter().sum::<f64>() / scores.len() as f64;
            (average, CourseStatus::Completed)
        };
        if status == CourseStatus::Completed {
            completed += 1;
            total_credits += course.credits;
            weighted_sum += average * course.credits as f64;
        }
        progress.push(CourseProgressRow {
            course_id: course.course_id.clone(),
            course_code: course.code.clone(),
            course_name: course.name.clone(),
            credits: course.credits,
            grades_count: scores.len(),
            average_score: round2(average),
            status,
        });
    }

    let weighted_average = if total_credits > 0 {
        weighted_sum / total_credits as f64
    } else {
        0.0
    };

    StudentProgress {
        student_id: student.student_id.clone(),
        student_name: student.name.clone(),
        total_courses: courses.len(),
        courses_completed: completed,
        total_credits,
        weighted_average: round2(weighted_average),
        gpa: student.gpa,
        progress,
    }
}
