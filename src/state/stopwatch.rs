//! Stopwatch state with lap tracking
//!
//! Elapsed time is derived from a start instant plus an accumulated offset
//! rather than counted tick by tick, so pausing and resuming lose nothing
//! and the 10ms display sampler only ever reads.

use std::time::Instant;

use serde::Serialize;

/// One recorded lap. Immutable once appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lap {
    pub index: u32,
    pub cumulative_ms: u64,
    pub delta_ms: u64,
}

/// Lap entry decorated with fastest/slowest flags for display
#[derive(Debug, Clone, Serialize)]
pub struct LapView {
    pub index: u32,
    pub cumulative_ms: u64,
    pub delta_ms: u64,
    pub display: String,
    pub fastest: bool,
    pub slowest: bool,
}

/// Serializable stopwatch view for API responses
#[derive(Debug, Clone, Serialize)]
pub struct StopwatchView {
    pub running: bool,
    pub elapsed_ms: u64,
    pub display: String,
    pub laps: Vec<LapView>,
}

/// Stopwatch state machine: Stopped (elapsed 0), Paused, Running
#[derive(Debug, Clone)]
pub struct StopwatchState {
    running: bool,
    /// Elapsed time frozen across pauses
    accumulated_ms: u64,
    /// Set only while running
    started_at: Option<Instant>,
    /// Most recent lap first
    laps: Vec<Lap>,
}

impl StopwatchState {
    pub fn new() -> Self {
        Self {
            running: false,
            accumulated_ms: 0,
            started_at: None,
            laps: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    /// Total elapsed milliseconds as of `now`
    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        let live = self
            .started_at
            .map(|started| now.saturating_duration_since(started).as_millis() as u64)
            .unwrap_or(0);
        self.accumulated_ms + live
    }

    /// Start or resume accumulation
    pub fn start(&mut self, now: Instant) -> Result<(), String> {
        if self.running {
            return Err("Stopwatch is already running".to_string());
        }
        self.started_at = Some(now);
        self.running = true;
        Ok(())
    }

    /// Freeze the elapsed value
    pub fn pause(&mut self, now: Instant) -> Result<(), String> {
        if !self.running {
            return Err("Stopwatch is not running".to_string());
        }
        self.accumulated_ms = self.elapsed_ms(now);
        self.started_at = None;
        self.running = false;
        Ok(())
    }

    /// Clear elapsed time and laps. Disabled while running.
    pub fn reset(&mut self) -> Result<(), String> {
        if self.running {
            return Err("Pause the stopwatch before resetting".to_string());
        }
        self.accumulated_ms = 0;
        self.started_at = None;
        self.laps.clear();
        Ok(())
    }

    /// Record a lap at the current elapsed time. Running only.
    pub fn lap(&mut self, now: Instant) -> Result<Lap, String> {
        if !self.running {
            return Err("Laps can only be recorded while running".to_string());
        }

        let cumulative_ms = self.elapsed_ms(now);
        let previous_ms = self.laps.first().map(|lap| lap.cumulative_ms).unwrap_or(0);
        let lap = Lap {
            index: self.laps.len() as u32 + 1,
            cumulative_ms,
            delta_ms: cumulative_ms - previous_ms,
        };
        self.laps.insert(0, lap);
        Ok(lap)
    }

    /// Fastest and slowest lap deltas, defined once two laps exist
    pub fn lap_extremes(&self) -> Option<(u64, u64)> {
        if self.laps.len() < 2 {
            return None;
        }
        let fastest = self.laps.iter().map(|lap| lap.delta_ms).min()?;
        let slowest = self.laps.iter().map(|lap| lap.delta_ms).max()?;
        Some((fastest, slowest))
    }

    pub fn view(&self, now: Instant) -> StopwatchView {
        let elapsed = self.elapsed_ms(now);
        let extremes = self.lap_extremes();
        let laps = self
            .laps
            .iter()
            .map(|lap| LapView {
                index: lap.index,
                cumulative_ms: lap.cumulative_ms,
                delta_ms: lap.delta_ms,
                display: format_elapsed(lap.delta_ms),
                fastest: extremes.map(|(min, _)| lap.delta_ms == min).unwrap_or(false),
                slowest: extremes.map(|(_, max)| lap.delta_ms == max).unwrap_or(false),
            })
            .collect();

        StopwatchView {
            running: self.running,
            elapsed_ms: elapsed,
            display: format_elapsed(elapsed),
            laps,
        }
    }
}

impl Default for StopwatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Format milliseconds as `MM:SS.CC` (centiseconds)
pub fn format_elapsed(milliseconds: u64) -> String {
    let total_seconds = milliseconds / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let centis = (milliseconds % 1000) / 10;
    format!("{:02}:{:02}.{:02}", minutes, seconds, centis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_elapsed_accumulates_across_pauses() {
        let t0 = Instant::now();
        let mut sw = StopwatchState::new();

        sw.start(t0).unwrap();
        assert_eq!(sw.elapsed_ms(t0 + Duration::from_millis(1500)), 1500);

        sw.pause(t0 + Duration::from_secs(2)).unwrap();
        // Frozen while paused, regardless of how much later we read
        assert_eq!(sw.elapsed_ms(t0 + Duration::from_secs(10)), 2000);

        sw.start(t0 + Duration::from_secs(10)).unwrap();
        assert_eq!(sw.elapsed_ms(t0 + Duration::from_secs(11)), 3000);
    }

    #[test]
    fn test_pause_never_loses_time() {
        let t0 = Instant::now();
        let mut sw = StopwatchState::new();
        sw.start(t0).unwrap();

        let at_start = sw.elapsed_ms(t0 + Duration::from_millis(500));
        sw.pause(t0 + Duration::from_millis(800)).unwrap();
        let at_pause = sw.elapsed_ms(t0 + Duration::from_millis(800));
        assert!(at_pause >= at_start);
    }

    #[test]
    fn test_start_and_pause_guard_current_state() {
        let t0 = Instant::now();
        let mut sw = StopwatchState::new();

        assert!(sw.pause(t0).is_err());
        sw.start(t0).unwrap();
        assert!(sw.start(t0).is_err());
    }

    #[test]
    fn test_reset_disabled_while_running() {
        let t0 = Instant::now();
        let mut sw = StopwatchState::new();
        sw.start(t0).unwrap();

        assert!(sw.reset().is_err());

        sw.pause(t0 + Duration::from_secs(1)).unwrap();
        sw.reset().unwrap();
        assert_eq!(sw.elapsed_ms(t0 + Duration::from_secs(5)), 0);
        assert!(sw.laps().is_empty());
    }

    #[test]
    fn test_lap_deltas_and_ordering() {
        let t0 = Instant::now();
        let mut sw = StopwatchState::new();
        sw.start(t0).unwrap();

        let first = sw.lap(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(first.index, 1);
        assert_eq!(first.cumulative_ms, 1000);
        assert_eq!(first.delta_ms, 1000);

        let second = sw.lap(t0 + Duration::from_secs(3)).unwrap();
        assert_eq!(second.index, 2);
        assert_eq!(second.cumulative_ms, 3000);
        assert_eq!(second.delta_ms, 2000);

        let third = sw.lap(t0 + Duration::from_millis(3500)).unwrap();
        assert_eq!(third.delta_ms, 500);

        // Most recent first
        let indices: Vec<u32> = sw.laps().iter().map(|lap| lap.index).collect();
        assert_eq!(indices, vec![3, 2, 1]);
    }

    #[test]
    fn test_lap_requires_running() {
        let t0 = Instant::now();
        let mut sw = StopwatchState::new();
        assert!(sw.lap(t0).is_err());

        sw.start(t0).unwrap();
        sw.pause(t0 + Duration::from_secs(1)).unwrap();
        assert!(sw.lap(t0 + Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_lap_extremes_need_two_laps() {
        let t0 = Instant::now();
        let mut sw = StopwatchState::new();
        sw.start(t0).unwrap();

        sw.lap(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(sw.lap_extremes(), None);

        sw.lap(t0 + Duration::from_secs(4)).unwrap();
        assert_eq!(sw.lap_extremes(), Some((1000, 3000)));
    }

    #[test]
    fn test_equal_deltas_flag_both_laps() {
        let t0 = Instant::now();
        let mut sw = StopwatchState::new();
        sw.start(t0).unwrap();
        sw.lap(t0 + Duration::from_secs(1)).unwrap();
        sw.lap(t0 + Duration::from_secs(2)).unwrap();

        let view = sw.view(t0 + Duration::from_secs(2));
        assert!(view.laps.iter().all(|lap| lap.fastest && lap.slowest));
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(format_elapsed(0), "00:00.00");
        assert_eq!(format_elapsed(61_230), "01:01.23");
        assert_eq!(format_elapsed(599_990), "09:59.99");
    }
}
