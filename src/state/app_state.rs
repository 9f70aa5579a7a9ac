//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::warn;

use crate::config::Config;
use crate::services::{AudioOutput, Geolocator, WeatherService};

use super::orientation::{Orientation, ViewSelector, ViewSnapshot};
use super::{AlarmState, CountdownState, StopwatchState, WeatherState};

/// Elapsed-time sample published by the stopwatch display sampler
#[derive(Debug, Clone, Serialize)]
pub struct StopwatchSample {
    pub running: bool,
    pub elapsed_ms: u64,
}

/// Main application state: every widget's state machine, the view selector,
/// and the channels wiring them to the background tasks
#[derive(Debug)]
pub struct AppState {
    /// Per-widget state, each owned exclusively behind its own lock
    pub alarm: Arc<Mutex<AlarmState>>,
    pub stopwatch: Arc<Mutex<StopwatchState>>,
    pub countdown: Arc<Mutex<CountdownState>>,
    pub weather: Arc<Mutex<WeatherState>>,
    /// Orientation-to-widget selection with its transition buffer
    pub selector: Arc<Mutex<ViewSelector>>,
    /// Injected collaborators
    pub audio: AudioOutput,
    pub geolocator: Geolocator,
    pub weather_service: WeatherService,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Orientation signals, consumed by the view transition task
    pub orientation_tx: broadcast::Sender<Orientation>,
    /// View updates published whenever the view changes
    pub view_tx: watch::Sender<ViewSnapshot>,
    /// Stopwatch display samples at 10ms granularity
    pub stopwatch_tx: watch::Sender<StopwatchSample>,
    /// Keep the receivers alive to prevent channel closure
    pub _view_rx: watch::Receiver<ViewSnapshot>,
    pub _stopwatch_rx: watch::Receiver<StopwatchSample>,
}

impl AppState {
    /// Create a new AppState from the parsed configuration
    pub fn new(config: &Config) -> Self {
        let selector = ViewSelector::new(config.transition_window());
        let (orientation_tx, _) = broadcast::channel(64);
        let (view_tx, view_rx) = watch::channel(selector.snapshot());
        let (stopwatch_tx, stopwatch_rx) = watch::channel(StopwatchSample {
            running: false,
            elapsed_ms: 0,
        });

        Self {
            alarm: Arc::new(Mutex::new(AlarmState::new())),
            stopwatch: Arc::new(Mutex::new(StopwatchState::new())),
            countdown: Arc::new(Mutex::new(CountdownState::new())),
            weather: Arc::new(Mutex::new(WeatherState::new())),
            selector: Arc::new(Mutex::new(selector)),
            audio: AudioOutput::from_config(config.beep_command.clone()),
            geolocator: Geolocator::from_config(config.latitude, config.longitude),
            weather_service: WeatherService::new(
                config.weather_url.clone(),
                config.weather_api_key.clone(),
            ),
            start_time: Instant::now(),
            port: config.port,
            host: config.host.clone(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            orientation_tx,
            view_tx,
            stopwatch_tx,
            _view_rx: view_rx,
            _stopwatch_rx: stopwatch_rx,
        }
    }

    /// Run an operation against the alarm widget under its lock,
    /// recording the action on success
    pub fn with_alarm<T>(
        &self,
        action: &str,
        op: impl FnOnce(&mut AlarmState) -> Result<T, String>,
    ) -> Result<T, String> {
        let mut alarm = self
            .alarm
            .lock()
            .map_err(|e| format!("Failed to lock alarm state: {}", e))?;
        let result = op(&mut alarm)?;
        drop(alarm);

        self.record_action(action);
        Ok(result)
    }

    /// Run an operation against the stopwatch widget under its lock
    pub fn with_stopwatch<T>(
        &self,
        action: &str,
        op: impl FnOnce(&mut StopwatchState) -> Result<T, String>,
    ) -> Result<T, String> {
        let mut stopwatch = self
            .stopwatch
            .lock()
            .map_err(|e| format!("Failed to lock stopwatch state: {}", e))?;
        let result = op(&mut stopwatch)?;
        drop(stopwatch);

        self.record_action(action);
        Ok(result)
    }

    /// Run an operation against the countdown widget under its lock
    pub fn with_countdown<T>(
        &self,
        action: &str,
        op: impl FnOnce(&mut CountdownState) -> Result<T, String>,
    ) -> Result<T, String> {
        let mut countdown = self
            .countdown
            .lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
        let result = op(&mut countdown)?;
        drop(countdown);

        self.record_action(action);
        Ok(result)
    }

    /// Run an operation against the weather widget under its lock
    pub fn with_weather<T>(&self, op: impl FnOnce(&mut WeatherState) -> T) -> Result<T, String> {
        let mut weather = self
            .weather
            .lock()
            .map_err(|e| format!("Failed to lock weather state: {}", e))?;
        Ok(op(&mut weather))
    }

    /// Apply an orientation signal and wake the view transition task
    pub fn push_orientation(&self, orientation: Orientation) -> Result<ViewSnapshot, String> {
        let mut selector = self
            .selector
            .lock()
            .map_err(|e| format!("Failed to lock view selector: {}", e))?;
        selector.signal(orientation, Instant::now());
        let snapshot = selector.snapshot();
        drop(selector);

        self.record_action("orientation");

        // Without subscribers (e.g. before the task starts) this is harmless
        if self.orientation_tx.send(orientation).is_err() {
            warn!("No view transition task listening for orientation signals");
        }
        if let Err(e) = self.view_tx.send(snapshot.clone()) {
            warn!("Failed to publish view snapshot: {}", e);
        }

        Ok(snapshot)
    }

    /// Settle a pending view transition if its window has elapsed.
    /// Returns the new snapshot when the displayed widget changed.
    pub fn settle_view(&self) -> Result<Option<ViewSnapshot>, String> {
        let mut selector = self
            .selector
            .lock()
            .map_err(|e| format!("Failed to lock view selector: {}", e))?;
        let changed = selector.settle(Instant::now());
        let snapshot = selector.snapshot();
        drop(selector);

        if !changed {
            return Ok(None);
        }
        if let Err(e) = self.view_tx.send(snapshot.clone()) {
            warn!("Failed to publish view snapshot: {}", e);
        }
        Ok(Some(snapshot))
    }

    /// Deadline of the in-flight view transition, if any
    pub fn view_deadline(&self) -> Option<Instant> {
        self.selector
            .lock()
            .ok()
            .and_then(|selector| selector.settle_deadline())
    }

    /// Current view snapshot
    pub fn snapshot_view(&self) -> Result<ViewSnapshot, String> {
        self.selector
            .lock()
            .map(|selector| selector.snapshot())
            .map_err(|e| format!("Failed to lock view selector: {}", e))
    }

    /// Publish a stopwatch display sample to the watch channel
    pub fn publish_stopwatch_sample(&self) -> Result<(), String> {
        let stopwatch = self
            .stopwatch
            .lock()
            .map_err(|e| format!("Failed to lock stopwatch state: {}", e))?;
        let sample = StopwatchSample {
            running: stopwatch.is_running(),
            elapsed_ms: stopwatch.elapsed_ms(Instant::now()),
        };
        drop(stopwatch);

        if let Err(e) = self.stopwatch_tx.send(sample) {
            warn!("Failed to publish stopwatch sample: {}", e);
        }
        Ok(())
    }

    /// Update last action tracking, best-effort
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
