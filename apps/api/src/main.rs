//! Gatehouse API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use gatehouse_application::{AuthGateService, RateLimitService};
use gatehouse_core::AppError;
use gatehouse_infrastructure::{
    Argon2PasswordHasher, InMemoryIdentityBackend, InMemoryRateLimitRepository, RateLimitSweeper,
    SystemClock,
};
use tracing::{info, warn};

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let clock = Arc::new(SystemClock);

    let rate_limit_service = RateLimitService::new(
        Arc::new(InMemoryRateLimitRepository::new()),
        clock.clone(),
        config.rate_limit_policies.clone(),
    );
    let sweeper =
        RateLimitSweeper::spawn(rate_limit_service.clone(), config.rate_limit_cleanup_interval)?;

    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let identity_backend = InMemoryIdentityBackend::new(password_hasher, clock)
        .with_recent_login_window(config.session_recent_login_window);

    let app_state = AppState {
        auth_gate_service: AuthGateService::new(rate_limit_service, Arc::new(identity_backend)),
    };
    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "gatehouse-api listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")));

    sweeper.shutdown().await?;
    served
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(error = %error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    info!("shutdown signal received");
}
