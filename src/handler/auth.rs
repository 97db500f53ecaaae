use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::{cookie::Cookie, WithRejection};
use validator::Validate;

use crate::{
    dtos::{
        ApiResponse, FilterAccountDto, FilterWorkerDto, LoginDto, LoginResponseDto,
        RegisterUserDto, RegisterWorkerDto,
    },
    error::HttpError,
    models::accountmodel::AccountRole,
    utils::token,
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register/user", post(register_user))
        .route("/register/worker", post(register_worker))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<LoginDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let account = app_state
        .account_service
        .login(body.username.trim(), &body.password, body.role)
        .await
        .map_err(HttpError::from)?;

    let token = token::create_token(
        &account.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(time::Duration::minutes(app_state.env.jwt_maxage))
        .http_only(true)
        .build();

    let cookie_header = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!("{} {} logged in", account.role, account.id);

    let mut response = Json(LoginResponseDto {
        status: "success",
        token,
        account: FilterAccountDto::filter_account(&account),
    })
    .into_response();
    response.headers_mut().append(header::SET_COOKIE, cookie_header);

    Ok(response)
}

pub async fn register_user(
    Extension(app_state): Extension<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<RegisterUserDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let account = app_state
        .account_service
        .register_user(body.into_new_account(AccountRole::User))
        .await
        .map_err(HttpError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(FilterAccountDto::filter_account(&account))),
    ))
}

pub async fn register_worker(
    Extension(app_state): Extension<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<RegisterWorkerDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (account, profile, skill_ids) = body.into_parts();

    let worker = app_state
        .account_service
        .register_worker(account, profile, skill_ids)
        .await
        .map_err(HttpError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(FilterWorkerDto::filter_worker(&worker))),
    ))
}
