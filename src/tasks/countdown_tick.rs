//! Countdown ticking background task

use std::{sync::Arc, time::Duration};

use tokio::time::{interval_at, sleep, Instant};
use tracing::{error, info};

use crate::services::audio::{CHIME_DURATION, CHIME_TONE_HZ};
use crate::state::countdown::{CountdownEvent, CountdownPhase};
use crate::state::AppState;

const PHASE_POLL: Duration = Duration::from_millis(100);
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that decrements a running countdown once per second and
/// plays the completion chime when it finishes. The one second cadence is
/// anchored fresh each time a run is observed, so the first decrement lands
/// a full second after the countdown starts or resumes.
pub async fn countdown_tick_task(state: Arc<AppState>) {
    info!("Starting countdown tick task");

    loop {
        if !countdown_running(&state) {
            sleep(PHASE_POLL).await;
            continue;
        }

        let mut cadence = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        loop {
            cadence.tick().await;

            let (event, running) = match state.countdown.lock() {
                Ok(mut countdown) => {
                    let event = countdown.tick();
                    (event, countdown.phase() == CountdownPhase::Running)
                }
                Err(e) => {
                    error!("Failed to lock countdown state: {}", e);
                    break;
                }
            };

            if let Some(CountdownEvent::Finished) = event {
                info!("Countdown finished");
                state.audio.play_tone(CHIME_TONE_HZ, CHIME_DURATION);
            }
            // Paused, reset or finished; drop back to phase polling
            if !running {
                break;
            }
        }
    }
}

fn countdown_running(state: &Arc<AppState>) -> bool {
    state
        .countdown
        .lock()
        .map(|countdown| countdown.phase() == CountdownPhase::Running)
        .unwrap_or(false)
}
