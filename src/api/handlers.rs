//! HTTP endpoint handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Local;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::services::weather::refresh_weather;
use crate::state::alarm::AlarmView;
use crate::state::countdown::{CountdownPhase, CountdownView};
use crate::state::orientation::{Orientation, ViewSnapshot};
use crate::state::stopwatch::StopwatchView;
use crate::state::weather::WeatherView;
use crate::state::AppState;

use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Request body for POST /orientation
#[derive(Debug, Deserialize)]
pub struct OrientationRequest {
    pub orientation: String,
}

/// Request body for POST /alarm/set
#[derive(Debug, Deserialize)]
pub struct AlarmSetRequest {
    pub time: String,
}

/// Request body for POST /countdown/start
#[derive(Debug, Default, Deserialize)]
pub struct CountdownStartRequest {
    #[serde(default)]
    pub hours: u64,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

/// Request body for POST /countdown/preset
#[derive(Debug, Deserialize)]
pub struct CountdownPresetRequest {
    pub minutes: u64,
}

fn widget_result(result: Result<String, String>) -> Json<ApiResponse> {
    match result {
        Ok(message) => {
            info!("{}", message);
            Json(ApiResponse::ok(message))
        }
        Err(e) => {
            warn!("Widget operation rejected: {}", e);
            Json(ApiResponse::error(e))
        }
    }
}

/// Handle POST /orientation - push an orientation signal
pub async fn orientation_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OrientationRequest>,
) -> Result<Json<ViewSnapshot>, StatusCode> {
    let orientation = Orientation::from_signal(&request.orientation);
    info!("Orientation signal: {} -> {:?}", request.orientation, orientation);

    match state.push_orientation(orientation) {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            error!("Failed to apply orientation signal: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /view - current view selection
pub async fn view_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ViewSnapshot>, StatusCode> {
    match state.snapshot_view() {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            error!("Failed to read view state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /alarm/set - arm the alarm for an HH:MM time of day
pub async fn alarm_set_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AlarmSetRequest>,
) -> Json<ApiResponse> {
    let now = Local::now().naive_local();
    let result = state
        .with_alarm("alarm-set", |alarm| alarm.set(&request.time, now))
        .map(|_| format!("Alarm set for {}", request.time));
    widget_result(result)
}

/// Handle POST /alarm/snooze - snooze a ringing alarm
pub async fn alarm_snooze_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let now = Local::now().naive_local();
    let result = state.with_alarm("alarm-snooze", |alarm| alarm.snooze(now));
    if result.is_ok() {
        state.audio.stop();
    }
    widget_result(result.map(|_| "Alarm snoozed for 5 minutes".to_string()))
}

/// Handle POST /alarm/dismiss - dismiss or cancel the alarm
pub async fn alarm_dismiss_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let result = state.with_alarm("alarm-dismiss", |alarm| {
        alarm.cancel();
        Ok(())
    });
    if result.is_ok() {
        state.audio.stop();
    }
    widget_result(result.map(|_| "Alarm dismissed".to_string()))
}

/// Handle GET /alarm - alarm widget state
pub async fn alarm_status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AlarmView>, StatusCode> {
    let now = Local::now().naive_local();
    match state.alarm.lock() {
        Ok(alarm) => Ok(Json(alarm.view(now))),
        Err(e) => {
            error!("Failed to lock alarm state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stopwatch/start - start or resume the stopwatch
pub async fn stopwatch_start_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let now = Instant::now();
    let result = state
        .with_stopwatch("stopwatch-start", |stopwatch| stopwatch.start(now))
        .map(|_| "Stopwatch started".to_string());
    widget_result(result)
}

/// Handle POST /stopwatch/pause - freeze the elapsed time
pub async fn stopwatch_pause_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let now = Instant::now();
    let result = state
        .with_stopwatch("stopwatch-pause", |stopwatch| stopwatch.pause(now))
        .map(|_| "Stopwatch paused".to_string());
    widget_result(result)
}

/// Handle POST /stopwatch/lap - record a lap while running
pub async fn stopwatch_lap_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let now = Instant::now();
    let result = state
        .with_stopwatch("stopwatch-lap", |stopwatch| stopwatch.lap(now))
        .map(|lap| format!("Lap {} recorded at {}ms", lap.index, lap.cumulative_ms));
    widget_result(result)
}

/// Handle POST /stopwatch/reset - clear elapsed time and laps
pub async fn stopwatch_reset_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let result = state
        .with_stopwatch("stopwatch-reset", |stopwatch| stopwatch.reset())
        .map(|_| "Stopwatch reset".to_string());
    widget_result(result)
}

/// Handle GET /stopwatch - stopwatch widget state
pub async fn stopwatch_status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StopwatchView>, StatusCode> {
    match state.stopwatch.lock() {
        Ok(stopwatch) => Ok(Json(stopwatch.view(Instant::now()))),
        Err(e) => {
            error!("Failed to lock stopwatch state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /countdown/start - start a fresh countdown or resume a
/// paused one. An optional body supplies the entry fields for a fresh start.
pub async fn countdown_start_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CountdownStartRequest>>,
) -> Json<ApiResponse> {
    let fields = body.map(|Json(request)| request);
    let result = state
        .with_countdown("countdown-start", |countdown| {
            if let Some(request) = &fields {
                if countdown.phase() == CountdownPhase::Unset {
                    countdown.configure(request.hours, request.minutes, request.seconds)?;
                }
            }
            countdown.start()
        })
        .map(|_| "Countdown started".to_string());
    widget_result(result)
}

/// Handle POST /countdown/preset - quick-set a whole number of minutes
pub async fn countdown_preset_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CountdownPresetRequest>,
) -> Json<ApiResponse> {
    let result = state
        .with_countdown("countdown-preset", |countdown| countdown.preset(request.minutes))
        .map(|_| format!("Countdown preset to {}m", request.minutes));
    widget_result(result)
}

/// Handle POST /countdown/pause
pub async fn countdown_pause_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let result = state
        .with_countdown("countdown-pause", |countdown| countdown.pause())
        .map(|_| "Countdown paused".to_string());
    widget_result(result)
}

/// Handle POST /countdown/resume
pub async fn countdown_resume_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let result = state
        .with_countdown("countdown-resume", |countdown| countdown.resume())
        .map(|_| "Countdown resumed".to_string());
    widget_result(result)
}

/// Handle POST /countdown/reset - clear the countdown from any state
pub async fn countdown_reset_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let result = state.with_countdown("countdown-reset", |countdown| {
        countdown.reset();
        Ok(())
    });
    if result.is_ok() {
        state.audio.stop();
    }
    widget_result(result.map(|_| "Countdown reset".to_string()))
}

/// Handle POST /countdown/dismiss - acknowledge a finished countdown
pub async fn countdown_dismiss_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let result = state
        .with_countdown("countdown-dismiss", |countdown| countdown.dismiss())
        .map(|_| "Countdown dismissed".to_string());
    if result.is_ok() {
        state.audio.stop();
    }
    widget_result(result)
}

/// Handle GET /countdown - countdown widget state
pub async fn countdown_status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountdownView>, StatusCode> {
    match state.countdown.lock() {
        Ok(countdown) => Ok(Json(countdown.view())),
        Err(e) => {
            error!("Failed to lock countdown state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /weather/refresh - re-run the fetch-with-fallback sequence.
/// Always resolves to a report; the advisory explains any substitution.
pub async fn weather_refresh_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.record_action("weather-refresh");
    let result = refresh_weather(Arc::clone(&state))
        .await
        .map(|advisory| advisory.unwrap_or_else(|| "Weather refreshed".to_string()));
    widget_result(result)
}

/// Handle GET /weather - weather widget state
pub async fn weather_status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WeatherView>, StatusCode> {
    match state.with_weather(|weather| weather.view()) {
        Ok(view) => Ok(Json(view)),
        Err(e) => {
            error!("Failed to read weather state: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - full deck status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let now = Local::now().naive_local();
    let read_error = |e: String| {
        error!("Failed to assemble status: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let view = state.snapshot_view().map_err(read_error)?;
    let alarm = state
        .alarm
        .lock()
        .map(|alarm| alarm.view(now))
        .map_err(|e| read_error(format!("{}", e)))?;
    let stopwatch = state
        .stopwatch
        .lock()
        .map(|stopwatch| stopwatch.view(Instant::now()))
        .map_err(|e| read_error(format!("{}", e)))?;
    let countdown = state
        .countdown
        .lock()
        .map(|countdown| countdown.view())
        .map_err(|e| read_error(format!("{}", e)))?;
    let weather = state.with_weather(|weather| weather.view()).map_err(read_error)?;
    let stopwatch_sample = state.stopwatch_tx.borrow().clone();

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        view,
        alarm,
        stopwatch,
        stopwatch_sample,
        countdown,
        weather,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
