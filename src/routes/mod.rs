//! Rutas HTTP
//!
//! Este módulo arma el router completo de la aplicación con sus capas.

pub mod health_routes;
pub mod vehicle_routes;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors_middleware;
use crate::state::AppState;

/// Crear el router principal con todas las rutas y capas
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);
    let timeout = TimeoutLayer::new(state.config.request_timeout);

    Router::new()
        .merge(health_routes::create_health_router())
        .nest("/api", vehicle_routes::create_vehicle_router())
        .layer(CompressionLayer::new())
        .layer(timeout)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
