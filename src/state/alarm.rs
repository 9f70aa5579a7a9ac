//! Alarm clock state machine
//!
//! Wall-clock based, caller-ticked: the background task calls `tick()` once
//! per second with the current local time, so the machine itself never
//! touches the system clock and tests can drive it with simulated time.

use chrono::{Duration as ChronoDuration, NaiveDateTime, Timelike};
use serde::Serialize;

/// Alarm lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmPhase {
    Idle,
    Armed,
    Ringing,
}

/// Event emitted by a tick that the owning task must act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmEvent {
    /// The armed target was reached; start the alarm tone
    Triggered,
}

/// Single-alarm state with snooze tracking
#[derive(Debug, Clone)]
pub struct AlarmState {
    phase: AlarmPhase,
    /// Concrete next trigger time, rolled to tomorrow when HH:MM has passed
    target: Option<NaiveDateTime>,
    snooze_count: u32,
}

/// Serializable view of the alarm for API responses
#[derive(Debug, Clone, Serialize)]
pub struct AlarmView {
    pub phase: AlarmPhase,
    pub time: Option<String>,
    pub snooze_count: u32,
    pub time_remaining: Option<String>,
    pub current_time: String,
}

impl AlarmState {
    pub fn new() -> Self {
        Self {
            phase: AlarmPhase::Idle,
            target: None,
            snooze_count: 0,
        }
    }

    pub fn phase(&self) -> AlarmPhase {
        self.phase
    }

    pub fn snooze_count(&self) -> u32 {
        self.snooze_count
    }

    pub fn target(&self) -> Option<NaiveDateTime> {
        self.target
    }

    /// Arm the alarm for the given "HH:MM" time of day. The target is today
    /// at that time, or tomorrow if it has already passed.
    pub fn set(&mut self, time: &str, now: NaiveDateTime) -> Result<(), String> {
        if self.phase != AlarmPhase::Idle {
            return Err("Alarm is already set, cancel it first".to_string());
        }

        let (hour, minute) = parse_hhmm(time)?;
        self.target = Some(next_occurrence(hour, minute, now));
        self.phase = AlarmPhase::Armed;
        self.snooze_count = 0;
        Ok(())
    }

    /// Advance the machine by one polling tick. Returns `Triggered` exactly
    /// once when the wall clock reaches the armed target.
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<AlarmEvent> {
        if self.phase == AlarmPhase::Armed {
            if let Some(target) = self.target {
                if now >= target {
                    self.phase = AlarmPhase::Ringing;
                    return Some(AlarmEvent::Triggered);
                }
            }
        }
        None
    }

    /// Snooze a ringing alarm: re-arm for five minutes from now
    pub fn snooze(&mut self, now: NaiveDateTime) -> Result<(), String> {
        if self.phase != AlarmPhase::Ringing {
            return Err("Alarm is not ringing".to_string());
        }

        self.target = Some(now + ChronoDuration::minutes(5));
        self.snooze_count += 1;
        self.phase = AlarmPhase::Armed;
        Ok(())
    }

    /// Dismiss/cancel from any phase. Idempotent.
    pub fn cancel(&mut self) {
        self.phase = AlarmPhase::Idle;
        self.target = None;
        self.snooze_count = 0;
    }

    /// Time until the armed target, if any
    pub fn remaining(&self, now: NaiveDateTime) -> Option<ChronoDuration> {
        if self.phase != AlarmPhase::Armed {
            return None;
        }
        self.target.map(|target| target - now)
    }

    pub fn view(&self, now: NaiveDateTime) -> AlarmView {
        AlarmView {
            phase: self.phase,
            time: self.target.map(|t| format!("{:02}:{:02}", t.hour(), t.minute())),
            snooze_count: self.snooze_count,
            time_remaining: self
                .remaining(now)
                .filter(|d| *d > ChronoDuration::zero())
                .map(format_remaining),
            current_time: format!("{:02}:{:02}", now.hour(), now.minute()),
        }
    }
}

impl Default for AlarmState {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a strict "HH:MM" time-of-day string
fn parse_hhmm(time: &str) -> Result<(u32, u32), String> {
    let (hours, minutes) = time
        .split_once(':')
        .ok_or_else(|| format!("Invalid alarm time '{}', expected HH:MM", time))?;

    let hour: u32 = hours
        .parse()
        .map_err(|_| format!("Invalid alarm hour '{}'", hours))?;
    let minute: u32 = minutes
        .parse()
        .map_err(|_| format!("Invalid alarm minute '{}'", minutes))?;

    if hour > 23 || minute > 59 {
        return Err(format!("Alarm time '{}' is out of range", time));
    }
    Ok((hour, minute))
}

/// Next occurrence of HH:MM relative to `now`, rolling to tomorrow when the
/// time of day has already passed
fn next_occurrence(hour: u32, minute: u32, now: NaiveDateTime) -> NaiveDateTime {
    let today = now
        .date()
        .and_hms_opt(hour, minute, 0)
        .unwrap_or_else(|| now.date().and_hms_opt(0, 0, 0).unwrap_or(now));

    if today <= now {
        today + ChronoDuration::days(1)
    } else {
        today
    }
}

/// Format a remaining duration as `Hh Mm`, `Mm Ss` or `Ss` by magnitude
pub fn format_remaining(remaining: ChronoDuration) -> String {
    let total_seconds = remaining.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
