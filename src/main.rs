mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use config::Config;
use db::db::DBClient;
use dotenv::dotenv;
use routes::create_router;
use service::{
    account_service::AccountService, feedback_service::FeedbackService,
    notification_service::NotificationService, skill_service::SkillService,
    stats_service::StatsService, work_request_service::WorkRequestService,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub account_service: Arc<AccountService<DBClient>>,
    pub skill_service: Arc<SkillService<DBClient>>,
    pub work_request_service: Arc<WorkRequestService<DBClient>>,
    pub notification_service: Arc<NotificationService<DBClient>>,
    pub feedback_service: Arc<FeedbackService<DBClient>>,
    pub stats_service: Arc<StatsService<DBClient>>,
}

impl AppState {
    pub fn new(env: Config, db_client: DBClient) -> Self {
        let db_client = Arc::new(db_client);
        let notification_service = Arc::new(NotificationService::new(db_client.clone()));

        AppState {
            account_service: Arc::new(AccountService::new(
                db_client.clone(),
                env.max_worker_skills,
            )),
            skill_service: Arc::new(SkillService::new(db_client.clone())),
            work_request_service: Arc::new(WorkRequestService::new(
                db_client.clone(),
                notification_service.clone(),
            )),
            feedback_service: Arc::new(FeedbackService::new(db_client.clone())),
            stats_service: Arc::new(StatsService::new(db_client.clone())),
            notification_service,
            db_client,
            env,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = Config::init();

    let max_level = config
        .as_ref()
        .map(|config| config.log_level.as_str())
        .unwrap_or("info")
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);

    tracing_subscriber::fmt().with_max_level(max_level).init();

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("🔥 Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("✅Connection to the database is successful!");
            pool
        }
        Err(err) => {
            tracing::error!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::error!("🔥 Failed to run migrations: {}", err);
        std::process::exit(1);
    }

    let app_state = Arc::new(AppState::new(config.clone(), DBClient::new(pool)));

    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        match app_state.account_service.ensure_admin(username, password).await {
            Ok(Some(admin)) => tracing::info!("created admin account {}", admin.username),
            Ok(None) => tracing::debug!("admin account {} already present", username),
            Err(err) => tracing::error!("failed to bootstrap admin account: {}", err),
        }
    }

    let app = create_router(app_state);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("🔥 Failed to bind port {}: {}", config.port, err);
            std::process::exit(1);
        }
    };

    tracing::info!("🚀 Server is running on http://localhost:{}", config.port);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("server stopped: {}", err);
    }
}
