use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    dtos::{ApiResponse, ListResponse, Response, SkillTypeDto},
    error::HttpError,
    middleware::{auth, role_check},
    models::accountmodel::AccountRole,
    AppState,
};

/// Listing is public; changes to the catalog are admin-only.
pub fn skills_handler() -> Router {
    Router::new()
        .route(
            "/",
            get(get_skill_types).merge(
                post(create_skill_type)
                    .layer(middleware::from_fn(|state, req, next| {
                        role_check(state, req, next, vec![AccountRole::Admin])
                    }))
                    .layer(middleware::from_fn(auth)),
            ),
        )
        .route(
            "/:skill_type_id",
            get(get_skill_type).merge(
                put(rename_skill_type)
                    .delete(delete_skill_type)
                    .layer(middleware::from_fn(|state, req, next| {
                        role_check(state, req, next, vec![AccountRole::Admin])
                    }))
                    .layer(middleware::from_fn(auth)),
            ),
        )
}

pub async fn get_skill_types(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let skills = app_state
        .skill_service
        .list()
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ListResponse::new(skills)))
}

pub async fn get_skill_type(
    Path(skill_type_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let skill = app_state
        .skill_service
        .get(skill_type_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(skill)))
}

pub async fn create_skill_type(
    Extension(app_state): Extension<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<SkillTypeDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let skill = app_state
        .skill_service
        .create(&body.skill_name)
        .await
        .map_err(HttpError::from)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(skill))))
}

pub async fn rename_skill_type(
    Path(skill_type_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<SkillTypeDto>, HttpError>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let skill = app_state
        .skill_service
        .rename(skill_type_id, &body.skill_name)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success(skill)))
}

pub async fn delete_skill_type(
    Path(skill_type_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .skill_service
        .delete(skill_type_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(Response {
        status: "success",
        message: format!("Skill type {} deleted", skill_type_id),
    }))
}
