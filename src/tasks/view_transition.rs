//! View transition background task

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::services::weather::refresh_weather;
use crate::state::orientation::Widget;
use crate::state::AppState;

/// Background task that owns the view transition timer. It waits for
/// orientation signals, holds the previously displayed widget until the
/// transition window elapses, then settles the view and kicks the weather
/// prefetch when the weather widget comes in empty.
pub async fn view_transition_task(state: Arc<AppState>) {
    info!("Starting view transition task");

    let mut orientation_rx = state.orientation_tx.subscribe();

    loop {
        // The deadline moves every time a new signal lands, so recompute it
        // on each pass instead of trusting a captured value
        let deadline = state.view_deadline();
        let settle_sleep = tokio::time::sleep_until(
            deadline
                .unwrap_or_else(|| Instant::now() + Duration::from_secs(60))
                .into(),
        );

        tokio::select! {
            received = orientation_rx.recv() => {
                match received {
                    Ok(orientation) => {
                        debug!("Orientation signal received: {:?}", orientation);
                    }
                    Err(e) => {
                        error!("Error receiving orientation signal: {}", e);
                        // Wait a bit before retrying
                        sleep(Duration::from_secs(1)).await;
                    }
                }
            }

            _ = settle_sleep, if deadline.is_some() => {
                match state.settle_view() {
                    Ok(Some(snapshot)) => {
                        info!("View settled on {:?}", snapshot.widget);
                        if snapshot.widget == Widget::Weather {
                            maybe_prefetch_weather(&state);
                        }
                    }
                    Ok(None) => {
                        debug!("Transition window elapsed without a view change");
                    }
                    Err(e) => error!("Failed to settle view: {}", e),
                }
            }
        }
    }
}

/// Kick off a weather refresh when the widget is shown with no data yet
fn maybe_prefetch_weather(state: &Arc<AppState>) {
    let needs_fetch = state
        .with_weather(|weather| !weather.has_report() && !weather.is_loading())
        .unwrap_or(false);
    if !needs_fetch {
        return;
    }

    info!("Weather widget shown with no data, starting prefetch");
    let state = Arc::clone(state);
    tokio::spawn(async move {
        if let Err(e) = refresh_weather(state).await {
            error!("Weather prefetch failed: {}", e);
        }
    });
}
