use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    dtos::{
        AcceptWorkRequestDto, ApiResponse, CancelWorkRequestDto, CompleteWorkRequestDto,
        ConfirmArrivalDto, CreateWorkRequestDto, DeclineWorkRequestDto, ListResponse,
        SetArrivalTimeDto,
    },
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    models::{accountmodel::AccountRole, workrequestmodel::RequestStatus},
    AppState,
};

pub fn work_request_handler() -> Router {
    Router::new()
        .route("/", post(create_work_request))
        .route("/:request_id", get(get_work_request))
        .route("/user/:user_id", get(get_user_work_requests))
        .route("/worker/:worker_id", get(get_worker_work_requests))
        .route("/available/:worker_id", get(get_available_work_requests))
        .route("/:request_id/accept", post(accept_work_request))
        .route("/:request_id/decline", post(decline_work_request))
        .route("/:request_id/complete", post(complete_work_request))
        .route("/:request_id/cancel", post(cancel_work_request))
        .route("/:request_id/set-arrival-time", post(set_arrival_time))
        .route("/:request_id/confirm-arrival", post(confirm_arrival))
}

pub async fn create_work_request(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<CreateWorkRequestDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_same_account(body.user_id)?;

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let request = app_state
        .work_request_service
        .create(body.into_new_request(session.account.id))
        .await
        .map_err(HttpError::from)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(request))))
}

/// Participants and admins see any request; other workers only open ones.
pub async fn get_work_request(
    Path(request_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let request = app_state
        .work_request_service
        .get(request_id)
        .await
        .map_err(HttpError::from)?;

    let account = &session.account;
    let visible = account.role == AccountRole::Admin
        || request.is_participant(account.id)
        || (account.role == AccountRole::Worker && request.status == RequestStatus::Pending);

    if !visible {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    Ok(Json(ApiResponse::success(request)))
}

pub async fn get_user_work_requests(
    Path(user_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_self_or_admin(user_id)?;

    let requests = app_state
        .work_request_service
        .list_by_user(user_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(requests)))
}

pub async fn get_worker_work_requests(
    Path(worker_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_self_or_admin(worker_id)?;

    let requests = app_state
        .work_request_service
        .list_by_worker(worker_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(requests)))
}

pub async fn get_available_work_requests(
    Path(worker_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_self_or_admin(worker_id)?;

    let requests = app_state
        .work_request_service
        .list_available(worker_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(requests)))
}

pub async fn accept_work_request(
    Path(request_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<AcceptWorkRequestDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    session.ensure_same_account(body.worker_id)?;

    let request = app_state
        .work_request_service
        .accept_with_arrival(
            session.account.id,
            request_id,
            body.time_slot,
            body.arrival_time,
        )
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(request)))
}

pub async fn decline_work_request(
    Path(request_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<DeclineWorkRequestDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_same_account(body.worker_id)?;

    let request = app_state
        .work_request_service
        .decline(session.account.id, request_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(request)))
}

pub async fn complete_work_request(
    Path(request_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<CompleteWorkRequestDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_same_account(body.worker_id)?;

    let amount = body.amount().map_err(HttpError::bad_request)?;

    let request = app_state
        .work_request_service
        .complete(session.account.id, request_id, amount)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(request)))
}

pub async fn cancel_work_request(
    Path(request_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<CancelWorkRequestDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_same_account(body.user_id)?;
    session.ensure_same_account(body.worker_id)?;

    let request = app_state
        .work_request_service
        .cancel(session.account.id, request_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(request)))
}

pub async fn set_arrival_time(
    Path(request_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<SetArrivalTimeDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    session.ensure_same_account(body.worker_id)?;

    let request = app_state
        .work_request_service
        .set_arrival_time(session.account.id, request_id, &body.arrival_time)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(request)))
}

pub async fn confirm_arrival(
    Path(request_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<ConfirmArrivalDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_same_account(body.user_id)?;

    let request = app_state
        .work_request_service
        .confirm_arrival(session.account.id, request_id, body.confirmation_status)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(request)))
}
