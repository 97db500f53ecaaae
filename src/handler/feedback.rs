use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    dtos::{ApiResponse, ListResponse, SubmitFeedbackDto},
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::accountmodel::AccountRole,
    AppState,
};

pub fn feedback_handler() -> Router {
    Router::new()
        .route("/", post(submit_feedback))
        .route("/request/:request_id", get(get_request_feedback))
        .route("/worker/:worker_id", get(get_worker_feedback))
        .route(
            "/admin",
            get(get_all_feedback).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![AccountRole::Admin])
            })),
        )
}

pub async fn submit_feedback(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<SubmitFeedbackDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let feedback = app_state
        .feedback_service
        .submit(session.account.id, body.request_id, body.rating, body.comments)
        .await
        .map_err(HttpError::from)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(feedback))))
}

/// `data` is null until the owner has rated the request.
pub async fn get_request_feedback(
    Path(request_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let feedback = app_state
        .feedback_service
        .get_for_request(&session.account, request_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(feedback)))
}

pub async fn get_worker_feedback(
    Path(worker_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let feedback = app_state
        .feedback_service
        .get_for_worker(worker_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(feedback)))
}

pub async fn get_all_feedback(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let feedback = app_state
        .feedback_service
        .get_all()
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(feedback)))
}
