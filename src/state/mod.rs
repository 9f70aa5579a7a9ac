//! State management module
//!
//! Per-widget state machines and the shared application state that owns them.

pub mod alarm;
pub mod app_state;
pub mod countdown;
pub mod orientation;
pub mod stopwatch;
pub mod weather;

// Re-export main types
pub use alarm::AlarmState;
pub use app_state::AppState;
pub use countdown::CountdownState;
pub use orientation::{Orientation, ViewSelector, Widget};
pub use stopwatch::StopwatchState;
pub use weather::WeatherState;
