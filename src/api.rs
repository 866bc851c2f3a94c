use std::{net::SocketAddr, sync::Arc};

use anyhow::{Error, Result};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    clients::health::HealthChecker,
    config::Config,
    middleware::{VisitNotifier, attach},
    models::health::HealthStatus,
};

pub struct AppState {
    health_checker: HealthChecker,
}

pub fn build_router(config: &Config, notifier: Arc<VisitNotifier>) -> Result<Router, Error> {
    let state = Arc::new(AppState {
        health_checker: HealthChecker::new(config.clone())?,
    });

    let router = Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .with_state(state);

    Ok(attach(router, notifier).layer(TraceLayer::new_for_http()))
}

pub async fn run_api_server(config: Config) -> Result<(), Error> {
    let notifier = Arc::new(VisitNotifier::from_config(&config)?);
    let app = build_router(&config, notifier)?;

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Site server started");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn home() -> Html<&'static str> {
    Html("<!doctype html><html><head><title>Portfolio</title></head><body><h1>Welcome</h1></body></html>")
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_checker.check_all().await;

    let status_code = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}
