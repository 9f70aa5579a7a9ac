//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/orientation", post(orientation_handler))
        .route("/view", get(view_handler))
        .route("/alarm", get(alarm_status_handler))
        .route("/alarm/set", post(alarm_set_handler))
        .route("/alarm/snooze", post(alarm_snooze_handler))
        .route("/alarm/dismiss", post(alarm_dismiss_handler))
        .route("/stopwatch", get(stopwatch_status_handler))
        .route("/stopwatch/start", post(stopwatch_start_handler))
        .route("/stopwatch/pause", post(stopwatch_pause_handler))
        .route("/stopwatch/lap", post(stopwatch_lap_handler))
        .route("/stopwatch/reset", post(stopwatch_reset_handler))
        .route("/countdown", get(countdown_status_handler))
        .route("/countdown/start", post(countdown_start_handler))
        .route("/countdown/preset", post(countdown_preset_handler))
        .route("/countdown/pause", post(countdown_pause_handler))
        .route("/countdown/resume", post(countdown_resume_handler))
        .route("/countdown/reset", post(countdown_reset_handler))
        .route("/countdown/dismiss", post(countdown_dismiss_handler))
        .route("/weather", get(weather_status_handler))
        .route("/weather/refresh", post(weather_refresh_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
