//! Countdown timer state machine
//!
//! Caller-ticked at one second granularity. Out-of-range field entries are
//! clamped rather than rejected; only a zero total refuses to start.

use serde::Serialize;

const MAX_HOURS: u64 = 23;
const MAX_MINUTES: u64 = 59;
const MAX_SECONDS: u64 = 59;

/// Countdown lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownPhase {
    Unset,
    Running,
    Paused,
    Finished,
}

/// Event emitted by a tick that the owning task must act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// Remaining time reached zero; play the completion chime
    Finished,
}

/// Serializable countdown view for API responses
#[derive(Debug, Clone, Serialize)]
pub struct CountdownView {
    pub phase: CountdownPhase,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub display: String,
    pub progress: f64,
    pub progress_percent: u32,
}

/// User-configured countdown with pause/resume
#[derive(Debug, Clone)]
pub struct CountdownState {
    phase: CountdownPhase,
    /// Pending entry fields, used on the next fresh start
    hours: u64,
    minutes: u64,
    seconds: u64,
    total_seconds: u64,
    remaining_seconds: u64,
}

impl CountdownState {
    pub fn new() -> Self {
        Self {
            phase: CountdownPhase::Unset,
            hours: 0,
            minutes: 0,
            seconds: 0,
            total_seconds: 0,
            remaining_seconds: 0,
        }
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    /// Store entry fields, clamped to their valid ranges. Only meaningful
    /// before a fresh start.
    pub fn configure(&mut self, hours: u64, minutes: u64, seconds: u64) -> Result<(), String> {
        if self.phase != CountdownPhase::Unset {
            return Err("Countdown has already started, reset it first".to_string());
        }
        self.hours = hours.min(MAX_HOURS);
        self.minutes = minutes.min(MAX_MINUTES);
        self.seconds = seconds.min(MAX_SECONDS);
        Ok(())
    }

    /// Quick-set preset: a whole number of minutes
    pub fn preset(&mut self, minutes: u64) -> Result<(), String> {
        self.configure(0, minutes, 0)
    }

    /// Start a fresh countdown from the entry fields, or resume a paused one
    pub fn start(&mut self) -> Result<(), String> {
        match self.phase {
            CountdownPhase::Unset => {
                let total = self.hours * 3600 + self.minutes * 60 + self.seconds;
                if total == 0 {
                    return Err("Countdown duration must be greater than zero".to_string());
                }
                self.total_seconds = total;
                self.remaining_seconds = total;
                self.phase = CountdownPhase::Running;
                Ok(())
            }
            CountdownPhase::Paused => {
                self.phase = CountdownPhase::Running;
                Ok(())
            }
            CountdownPhase::Running => Err("Countdown is already running".to_string()),
            CountdownPhase::Finished => Err("Countdown has finished, dismiss it first".to_string()),
        }
    }

    pub fn pause(&mut self) -> Result<(), String> {
        if self.phase != CountdownPhase::Running {
            return Err("Countdown is not running".to_string());
        }
        self.phase = CountdownPhase::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), String> {
        if self.phase != CountdownPhase::Paused {
            return Err("Countdown is not paused".to_string());
        }
        self.phase = CountdownPhase::Running;
        Ok(())
    }

    /// Advance by one second. Emits `Finished` exactly once when the
    /// remaining time reaches zero.
    pub fn tick(&mut self) -> Option<CountdownEvent> {
        if self.phase != CountdownPhase::Running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = CountdownPhase::Finished;
            return Some(CountdownEvent::Finished);
        }
        None
    }

    /// Clear everything back to Unset, from any phase
    pub fn reset(&mut self) {
        self.phase = CountdownPhase::Unset;
        self.hours = 0;
        self.minutes = 0;
        self.seconds = 0;
        self.total_seconds = 0;
        self.remaining_seconds = 0;
    }

    /// Acknowledge a finished countdown
    pub fn dismiss(&mut self) -> Result<(), String> {
        if self.phase != CountdownPhase::Finished {
            return Err("Countdown has not finished".to_string());
        }
        self.reset();
        Ok(())
    }

    /// Completed fraction in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        (self.total_seconds - self.remaining_seconds) as f64 / self.total_seconds as f64
    }

    pub fn view(&self) -> CountdownView {
        let progress = self.progress();
        CountdownView {
            phase: self.phase,
            total_seconds: self.total_seconds,
            remaining_seconds: self.remaining_seconds,
            display: format_countdown(self.remaining_seconds),
            progress,
            progress_percent: (progress * 100.0).round() as u32,
        }
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::new()
    }
}

/// Format remaining seconds, suppressing the hours field when zero
pub fn format_countdown(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_requires_nonzero_total() {
        let mut countdown = CountdownState::new();
        assert!(countdown.start().is_err());
        assert_eq!(countdown.phase(), CountdownPhase::Unset);
    }

    #[test]
    fn test_configure_clamps_fields() {
        let mut countdown = CountdownState::new();
        countdown.configure(99, 99, 99).unwrap();
        countdown.start().unwrap();
        assert_eq!(countdown.total_seconds(), 23 * 3600 + 59 * 60 + 59);
    }

    #[test]
    fn test_configure_rejected_once_started() {
        let mut countdown = CountdownState::new();
        countdown.preset(1).unwrap();
        countdown.start().unwrap();
        countdown.pause().unwrap();

        let err = countdown.configure(0, 2, 0).unwrap_err();
        assert!(err.contains("already started"));
    }

    #[test]
    fn test_preset_and_start() {
        let mut countdown = CountdownState::new();
        countdown.preset(5).unwrap();
        countdown.start().unwrap();
        assert_eq!(countdown.phase(), CountdownPhase::Running);
        assert_eq!(countdown.remaining_seconds(), 300);
    }

    #[test]
    fn test_ticks_down_to_finished_exactly_once() {
        let mut countdown = CountdownState::new();
        countdown.configure(0, 2, 5).unwrap();
        countdown.start().unwrap();
        assert_eq!(countdown.total_seconds(), 125);

        for _ in 0..124 {
            assert_eq!(countdown.tick(), None);
        }
        assert_eq!(countdown.remaining_seconds(), 1);

        assert_eq!(countdown.tick(), Some(CountdownEvent::Finished));
        assert_eq!(countdown.phase(), CountdownPhase::Finished);
        assert_eq!(countdown.remaining_seconds(), 0);

        // Finished does not tick or fire again
        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.remaining_seconds(), 0);
    }

    #[test]
    fn test_pause_and_resume_preserve_remaining() {
        let mut countdown = CountdownState::new();
        countdown.preset(1).unwrap();
        countdown.start().unwrap();
        countdown.tick();
        countdown.tick();

        countdown.pause().unwrap();
        assert_eq!(countdown.phase(), CountdownPhase::Paused);
        let frozen = countdown.remaining_seconds();
        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.remaining_seconds(), frozen);

        countdown.resume().unwrap();
        countdown.tick();
        assert_eq!(countdown.remaining_seconds(), frozen - 1);
    }

    #[test]
    fn test_start_resumes_paused_countdown() {
        let mut countdown = CountdownState::new();
        countdown.preset(1).unwrap();
        countdown.start().unwrap();
        countdown.pause().unwrap();

        countdown.start().unwrap();
        assert_eq!(countdown.phase(), CountdownPhase::Running);
    }

    #[test]
    fn test_progress_bounds() {
        let mut countdown = CountdownState::new();
        assert_eq!(countdown.progress(), 0.0);

        countdown.configure(0, 0, 10).unwrap();
        countdown.start().unwrap();
        assert_eq!(countdown.progress(), 0.0);

        for _ in 0..10 {
            countdown.tick();
        }
        assert_eq!(countdown.phase(), CountdownPhase::Finished);
        assert_eq!(countdown.progress(), 1.0);
    }

    #[test]
    fn test_reset_from_any_phase() {
        let mut countdown = CountdownState::new();
        countdown.preset(1).unwrap();
        countdown.start().unwrap();
        countdown.reset();
        assert_eq!(countdown.phase(), CountdownPhase::Unset);
        assert_eq!(countdown.total_seconds(), 0);
        assert_eq!(countdown.remaining_seconds(), 0);
    }

    #[test]
    fn test_dismiss_only_from_finished() {
        let mut countdown = CountdownState::new();
        assert!(countdown.dismiss().is_err());

        countdown.configure(0, 0, 1).unwrap();
        countdown.start().unwrap();
        assert!(countdown.dismiss().is_err());

        countdown.tick();
        countdown.dismiss().unwrap();
        assert_eq!(countdown.phase(), CountdownPhase::Unset);
    }

    #[test]
    fn test_display_suppresses_zero_hours() {
        assert_eq!(format_countdown(125), "02:05");
        assert_eq!(format_countdown(3725), "01:02:05");
        assert_eq!(format_countdown(0), "00:00");
    }
}
