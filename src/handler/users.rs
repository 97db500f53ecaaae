use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    dtos::{ApiResponse, FilterAccountDto, UpdateAccountDto},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::accountmodel::AccountRole,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/:user_id", get(get_user).put(update_user))
}

pub async fn get_me(
    Extension(session): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(ApiResponse::success(FilterAccountDto::filter_account(
        &session.account,
    ))))
}

pub async fn get_user(
    Path(user_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_self_or_admin(user_id)?;

    let account = app_state
        .account_service
        .get_account_with_role(user_id, AccountRole::User)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(FilterAccountDto::filter_account(&account))))
}

pub async fn update_user(
    Path(user_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(session): Extension<JWTAuthMiddeware>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateAccountDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    session.ensure_self_or_admin(user_id)?;

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let account = app_state
        .account_service
        .update_account(user_id, AccountRole::User, body.into())
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(FilterAccountDto::filter_account(&account))))
}
