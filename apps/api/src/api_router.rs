use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use gatehouse_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/auth/sign-out", post(handlers::auth::sign_out_handler))
        .route("/auth/password", put(handlers::auth::change_password_handler))
        .route(
            "/profile",
            get(handlers::profile::profile_handler).put(handlers::profile::update_profile_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_session,
        ));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Validation(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([RETRY_AFTER]);

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/register", post(handlers::auth::register_handler))
        .route("/auth/sign-in", post(handlers::auth::sign_in_handler))
        .route(
            "/auth/password-reset",
            post(handlers::auth::password_reset_handler),
        )
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
