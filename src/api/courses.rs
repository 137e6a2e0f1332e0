use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppError;
use crate::models::{Course, NewCourseRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/{id}", get(get_course).delete(delete_course))
}

async fn list_courses(State(state): State<AppState>) -> Json<Vec<Course>> {
    Json(state.courses.lock().await.get_all())
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = state
        .courses
        .lock()
        .await
        .get_by_id(&id)
        .ok_or_else(|| AppError::NotFound(format!("course {id} not found")))?;
    Ok(Json(course))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    if req.credits == 0 {
        return Err(AppError::Validation(
            "credits must be greater than 0".to_string(),
        ));
    }
    let course = Course::new(req.code, req.name, req.credits);
    let course = state.courses.lock().await.add(course)?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.courses.lock().await.delete(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("course {id} not found")))
    }
}
