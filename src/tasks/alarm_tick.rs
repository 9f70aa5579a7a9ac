//! Alarm polling background task

use std::{sync::Arc, time::Duration};

use chrono::Local;
use tokio::time::interval;
use tracing::{error, info};

use crate::services::audio::{ALARM_TONE_CEILING, ALARM_TONE_HZ};
use crate::state::alarm::AlarmEvent;
use crate::state::AppState;

/// Background task that polls the alarm once per second and starts the
/// alarm tone when the armed target is reached
pub async fn alarm_tick_task(state: Arc<AppState>) {
    info!("Starting alarm tick task");

    let mut interval = interval(Duration::from_secs(1));

    loop {
        interval.tick().await;

        let now = Local::now().naive_local();
        let event = match state.alarm.lock() {
            Ok(mut alarm) => alarm.tick(now),
            Err(e) => {
                error!("Failed to lock alarm state: {}", e);
                continue;
            }
        };

        if let Some(AlarmEvent::Triggered) = event {
            info!("Alarm target reached, ringing");
            // The tone stops itself after the 30 second ceiling
            state.audio.play_tone(ALARM_TONE_HZ, ALARM_TONE_CEILING);
        }
    }
}
