//! Stopwatch display sampler background task

use std::{sync::Arc, time::Duration};

use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::state::AppState;

/// Background task that samples the stopwatch every 10ms and publishes the
/// elapsed time to the display watch channel. The stopwatch itself derives
/// elapsed time from its start instant, so a missed sample loses nothing.
pub async fn stopwatch_sampler_task(state: Arc<AppState>) {
    info!("Starting stopwatch sampler task");

    let mut interval = interval(Duration::from_millis(10));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        if let Err(e) = state.publish_stopwatch_sample() {
            error!("Failed to publish stopwatch sample: {}", e);
        }
    }
}
