//! Rotadeck - A state-managed HTTP server for an orientation-driven widget deck
//!
//! This is the main entry point for the rotadeck application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use rotadeck::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::{alarm_tick_task, countdown_tick_task, stopwatch_sampler_task, view_transition_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("rotadeck={},tower_http=info", config.log_level()))
        .init();

    info!("Starting rotadeck server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, transition={}ms",
        config.host, config.port, config.transition_ms
    );

    // Create application state
    let state = Arc::new(AppState::new(&config));

    // Start the background tasks: view transition, widget ticks, sampler
    let view_state = Arc::clone(&state);
    tokio::spawn(async move {
        view_transition_task(view_state).await;
    });
    let alarm_state = Arc::clone(&state);
    tokio::spawn(async move {
        alarm_tick_task(alarm_state).await;
    });
    let countdown_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_tick_task(countdown_state).await;
    });
    let sampler_state = Arc::clone(&state);
    tokio::spawn(async move {
        stopwatch_sampler_task(sampler_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /orientation        - Push an orientation signal");
    info!("  GET  /view               - Current view selection");
    info!("  POST /alarm/set          - Arm the alarm (HH:MM)");
    info!("  POST /alarm/snooze       - Snooze a ringing alarm");
    info!("  POST /alarm/dismiss      - Dismiss/cancel the alarm");
    info!("  POST /stopwatch/...      - start, pause, lap, reset");
    info!("  POST /countdown/...      - start, preset, pause, resume, reset, dismiss");
    info!("  POST /weather/refresh    - Refresh weather data");
    info!("  GET  /status             - Full deck status");
    info!("  GET  /health             - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
