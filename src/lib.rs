pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod flash;
mod http;
mod middleware;
pub mod models;
pub mod state;
pub mod validation;

use axum::{Router, http::StatusCode, middleware as axum_middleware};
use middleware::{cors_layer, create_global_rate_limiter, rate_limit_middleware};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, errors::AppError, state::AppState};

/// The full application router with every ambient layer applied.
pub fn create_app(state: AppState) -> Router {
    let global_rate_limiter = create_global_rate_limiter(state.config.rate_limit_per_minute);
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .merge(http::create_http_routes(state))
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(global_rate_limiter.clone(), req, next)
        }))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
}

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lectures_be=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let port = config.port;

    let db = db::connect(&config.database_url).await?;
    db::init_schema(&db).await?;

    let app = create_app(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("Server running at http://127.0.0.1:{port}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
