//! Background tasks module
//!
//! One task per periodic concern: widget ticks, the stopwatch display
//! sampler, and the view transition timer. All run alongside the HTTP server
//! for the process lifetime.

pub mod alarm_tick;
pub mod countdown_tick;
pub mod stopwatch_sampler;
pub mod view_transition;

// Re-export main functions
pub use alarm_tick::alarm_tick_task;
pub use countdown_tick::countdown_tick_task;
pub use stopwatch_sampler::stopwatch_sampler_task;
pub use view_transition::view_transition_task;
