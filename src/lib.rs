//! Rotadeck - A state-managed HTTP server for an orientation-driven widget deck
//!
//! This library hosts four small utility widgets (alarm clock, stopwatch,
//! countdown timer, weather lookup) and selects between them based on a
//! pushed device orientation signal, holding the previous view through a
//! short transition window on each change.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
