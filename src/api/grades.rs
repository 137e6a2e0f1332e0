use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{Grade, NewGradeRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/grades", get(list_grades).post(create_grade))
        .route(
            "/grades/{id}",
            get(get_grade).put(update_grade).delete(delete_grade),
        )
}

#[derive(Deserialize)]
struct GradeFilter {
    student_id: Option<String>,
    course_id: Option<String>,
    min_score: Option<f64>,
    max_score: Option<f64>,
}

#[derive(Deserialize)]
struct ScoreParam {
    score: f64,
}

fn check_score(score: f64) -> Result<(), AppError> {
    if !(0.0..=100.0).contains(&score) {
        return Err(AppError::Validation(format!(
            "score must be between 0 and 100, got {score}"
        )));
    }
    Ok(())
}

async fn list_grades(
    State(state): State<AppState>,
    Query(filter): Query<GradeFilter>,
) -> Result<Json<Vec<Grade>>, AppError> {
    for bound in [filter.min_score, filter.max_score].into_iter().flatten() {
        check_score(bound)?;
    }
    let student_id = super::non_empty(filter.student_id.as_deref());
    let course_id = super::non_empty(filter.course_id.as_deref());
    let grades: Vec<Grade> = state
        .grades
        .lock()
        .await
        .get_all()
        .into_iter()
        .filter(|grade| student_id.is_none_or(|id| grade.student_id == id))
        .filter(|grade| course_id.is_none_or(|id| grade.course_id == id))
        .filter(|grade| filter.min_score.is_none_or(|min| grade.score >= min))
        .filter(|grade| filter.max_score.is_none_or(|max| grade.score <= max))
        .collect();
    Ok(Json(grades))
}

async fn get_grade(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Grade>, AppError> {
    let grade = state
        .grades
        .lock()
        .await
        .get_by_id(&id)
        .ok_or_else(|| AppError::NotFound(format!("grade {id} not found")))?;
    Ok(Json(grade))
}

/// Creates a grade after confirming both referenced records exist. The
/// checks take each store lock in turn, so a concurrent delete can still
/// slip in between; orphaned grades are tolerated downstream.
async fn create_grade(
    State(state): State<AppState>,
    Json(req): Json<NewGradeRequest>,
) -> Result<(StatusCode, Json<Grade>), AppError> {
    check_score(req.score)?;
    if state.students.lock().await.get_by_id(&req.student_id).is_none() {
        return Err(AppError::NotFound(format!(
            "student {} not found",
            req.student_id
        )));
    }
    if state.courses.lock().await.get_by_id(&req.course_id).is_none() {
        return Err(AppError::NotFound(format!(
            "course {} not found",
            req.course_id
        )));
    }
    let grade = Grade::new(&req.student_id, &req.course_id, req.score);
    let grade = state.grades.lock().await.add(grade)?;
    Ok((StatusCode::CREATED, Json(grade)))
}

/// The new score arrives as a query parameter rather than a body; the
/// frontend sends it that way.
async fn update_grade(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(param): Query<ScoreParam>,
) -> Result<Json<Grade>, AppError> {
    check_score(param.score)?;
    let grade = state
        .grades
        .lock()
        .await
        .update_score(&id, param.score)
        .ok_or_else(|| AppError::NotFound(format!("grade {id} not found")))?;
    Ok(Json(grade))
}

async fn delete_grade(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.grades.lock().await.delete(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("grade {id} not found")))
    }
}
