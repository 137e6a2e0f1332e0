use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::AppError;
use crate::reports::{
    self, CoursesSummary, GradeStatistics, StudentProgress, StudentsSummary, TopStudents,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students/summary", get(students_summary))
        .route("/courses/summary", get(courses_summary))
        .route("/grades/statistics", get(grades_statistics))
        .route("/top/students", get(top_students))
        .route("/student/{id}/progress", get(student_progress))
}

#[derive(Deserialize)]
struct GpaRange {
    min_gpa: Option<f64>,
    max_gpa: Option<f64>,
}

#[derive(Deserialize)]
struct StatisticsFilter {
    student_id: Option<String>,
    course_id: Option<String>,
}

#[derive(Deserialize)]
struct TopParams {
    limit: Option<usize>,
}

async fn students_summary(
    State(state): State<AppState>,
    Query(range): Query<GpaRange>,
) -> Result<Json<StudentsSummary>, AppError> {
    for bound in [range.min_gpa, range.max_gpa].into_iter().flatten() {
        if !(0.0..=5.0).contains(&bound) {
            return Err(AppError::Validation(format!(
                "gpa bound must be between 0 and 5, got {bound}"
            )));
        }
    }
    let students = state.students.lock().await.get_all();
    let grades = state.grades.lock().await.get_all();
    Ok(Json(reports::students_summary(
        &students,
        &grades,
        range.min_gpa,
        range.max_gpa,
    )))
}

async fn courses_summary(State(state): State<AppState>) -> Json<CoursesSummary> {
    let courses = state.courses.lock().await.get_all();
    let grades = state.grades.lock().await.get_all();
    Json(reports::courses_summary(&courses, &grades))
}

async fn grades_statistics(
    State(state): State<AppState>,
    Query(filter): Query<StatisticsFilter>,
) -> Json<GradeStatistics> {
    let grades = state.grades.lock().await.get_all();
    Json(reports::grade_statistics(
        &grades,
        super::non_empty(filter.student_id.as_deref()),
        super::non_empty(filter.course_id.as_deref()),
    ))
}

async fn top_students(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> Result<Json<TopStudents>, AppError> {
    let limit = params.limit.unwrap_or(10);
    if !(1..=100).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and 100, got {limit}"
        )));
    }
    let students = state.students.lock().await.get_all();
    Ok(Json(reports::top_students(&students, limit)))
}

async fn student_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StudentProgress>, AppError> {
    let student = state
        .students
        .lock()
        .await
        .get_by_id(&id)
        .ok_or_else(|| AppError::NotFound(format!("student {id} not found")))?;
    let courses = state.courses.lock().await.get_all();
    let student_grades = state.grades.lock().await.get_by_student(&id);
    Ok(Json(reports::student_progress(
        &student,
        &courses,
        &student_grades,
    )))
}
