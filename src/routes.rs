use std::sync::Arc;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{
        admin::admin_handler, auth::auth_handler, feedback::feedback_handler,
        notifications::notification_handler, skills::skills_handler, users::users_handler,
        work_requests::work_request_handler, workers::workers_handler,
    },
    middleware::{auth, role_check},
    models::accountmodel::AccountRole,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(&app_state.env.cors_origins);

    let api_route = Router::new()
        .merge(auth_handler())
        .nest("/skill-types", skills_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest("/workers", workers_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/work-requests",
            work_request_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/notifications",
            notification_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/feedback", feedback_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/admin",
            admin_handler()
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, vec![AccountRole::Admin])
                }))
                .layer(middleware::from_fn(auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
        .layer(cors)
}
