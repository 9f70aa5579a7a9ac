//! API response structures

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::alarm::AlarmView;
use crate::state::app_state::StopwatchSample;
use crate::state::countdown::CountdownView;
use crate::state::orientation::ViewSnapshot;
use crate::state::stopwatch::StopwatchView;
use crate::state::weather::WeatherView;

/// API response structure for widget operation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
        }
    }

    /// Create a success response
    pub fn ok(message: String) -> Self {
        Self::new("ok".to_string(), message)
    }

    /// Create an error response
    pub fn error(message: String) -> Self {
        Self::new("error".to_string(), message)
    }
}

/// Full status response: the view selection plus every widget
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub view: ViewSnapshot,
    pub alarm: AlarmView,
    pub stopwatch: StopwatchView,
    pub stopwatch_sample: StopwatchSample,
    pub countdown: CountdownView,
    pub weather: WeatherView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
