//! Orientation signal handling and view selection

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Discrete device orientation, pushed by the orientation source on change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    PortraitUp,
    PortraitDown,
    LandscapeLeft,
    LandscapeRight,
}

/// The widget shown for a given orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Widget {
    AlarmClock,
    Stopwatch,
    Countdown,
    Weather,
}

impl Orientation {
    /// Parse a raw orientation signal, falling back to portrait-up for
    /// anything the source could not classify
    pub fn from_signal(signal: &str) -> Self {
        match signal {
            "portrait-up" => Orientation::PortraitUp,
            "portrait-down" => Orientation::PortraitDown,
            "landscape-left" => Orientation::LandscapeLeft,
            "landscape-right" => Orientation::LandscapeRight,
            _ => Orientation::PortraitUp,
        }
    }

    /// Which widget this orientation selects
    pub fn widget(&self) -> Widget {
        match self {
            Orientation::PortraitUp => Widget::AlarmClock,
            Orientation::LandscapeLeft => Widget::Stopwatch,
            Orientation::PortraitDown => Widget::Countdown,
            Orientation::LandscapeRight => Widget::Weather,
        }
    }

    /// Rotation hint shown in the help panel
    pub fn instruction(&self) -> &'static str {
        match self {
            Orientation::PortraitUp => "Hold upright for Alarm Clock",
            Orientation::LandscapeLeft => "Rotate left for Stopwatch",
            Orientation::PortraitDown => "Flip upside-down for Timer",
            Orientation::LandscapeRight => "Rotate right for Weather",
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::PortraitUp
    }
}

/// Snapshot of the view selection, published on every change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub widget: Widget,
    pub orientation: Orientation,
    pub transitioning: bool,
    pub instruction: String,
}

/// Maps the orientation signal to the displayed widget.
///
/// On each orientation change the previously displayed widget stays visible
/// for a fixed transition window before the switch, so rapid flips never
/// flash an intermediate widget. The selector holds no timer itself; the
/// caller owns the settle deadline and calls `settle` when it elapses.
#[derive(Debug, Clone)]
pub struct ViewSelector {
    /// Latest raw signal from the orientation source
    current: Orientation,
    /// What the user currently sees
    displayed: Orientation,
    window: Duration,
    settle_at: Option<Instant>,
}

impl ViewSelector {
    pub fn new(window: Duration) -> Self {
        Self {
            current: Orientation::default(),
            displayed: Orientation::default(),
            window,
            settle_at: None,
        }
    }

    /// Apply a new orientation signal. Identical signals are ignored;
    /// a change re-arms the settle deadline from `now`.
    pub fn signal(&mut self, next: Orientation, now: Instant) {
        if next == self.current {
            return;
        }
        self.current = next;
        self.settle_at = Some(now + self.window);
    }

    /// Settle the displayed widget if the transition window has elapsed.
    /// Returns true when the displayed orientation actually changed.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.settle_at {
            Some(at) if now >= at => {
                self.settle_at = None;
                let changed = self.displayed != self.current;
                self.displayed = self.current;
                changed
            }
            _ => false,
        }
    }

    /// Deadline for the pending transition, if one is in flight
    pub fn settle_deadline(&self) -> Option<Instant> {
        self.settle_at
    }

    pub fn is_transitioning(&self) -> bool {
        self.settle_at.is_some()
    }

    pub fn current(&self) -> Orientation {
        self.current
    }

    pub fn displayed(&self) -> Orientation {
        self.displayed
    }

    /// Build the snapshot served to clients. The widget follows the
    /// displayed orientation; the rotation instruction follows the raw one.
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            widget: self.displayed.widget(),
            orientation: self.current,
            transitioning: self.is_transitioning(),
            instruction: self.current.instruction().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(400);

    #[test]
    fn test_signal_parsing() {
        assert_eq!(Orientation::from_signal("portrait-up"), Orientation::PortraitUp);
        assert_eq!(Orientation::from_signal("portrait-down"), Orientation::PortraitDown);
        assert_eq!(Orientation::from_signal("landscape-left"), Orientation::LandscapeLeft);
        assert_eq!(Orientation::from_signal("landscape-right"), Orientation::LandscapeRight);
        // Unknown signals fall back to the alarm clock orientation
        assert_eq!(Orientation::from_signal("face-down"), Orientation::PortraitUp);
        assert_eq!(Orientation::from_signal(""), Orientation::PortraitUp);
    }

    #[test]
    fn test_widget_mapping() {
        assert_eq!(Orientation::PortraitUp.widget(), Widget::AlarmClock);
        assert_eq!(Orientation::LandscapeLeft.widget(), Widget::Stopwatch);
        assert_eq!(Orientation::PortraitDown.widget(), Widget::Countdown);
        assert_eq!(Orientation::LandscapeRight.widget(), Widget::Weather);
    }

    #[test]
    fn test_selector_settles_after_window() {
        let t0 = Instant::now();
        let mut selector = ViewSelector::new(WINDOW);
        assert_eq!(selector.displayed(), Orientation::PortraitUp);

        selector.signal(Orientation::LandscapeLeft, t0);
        assert!(selector.is_transitioning());
        assert_eq!(selector.displayed(), Orientation::PortraitUp);

        // Not yet elapsed
        assert!(!selector.settle(t0 + Duration::from_millis(399)));
        assert_eq!(selector.displayed(), Orientation::PortraitUp);

        assert!(selector.settle(t0 + WINDOW));
        assert_eq!(selector.displayed(), Orientation::LandscapeLeft);
        assert!(!selector.is_transitioning());
    }

    #[test]
    fn test_rapid_flip_does_not_flash_intermediate_widget() {
        let t0 = Instant::now();
        let mut selector = ViewSelector::new(WINDOW);

        // Flip to landscape-left and back within 100ms
        selector.signal(Orientation::LandscapeLeft, t0);
        assert!(!selector.settle(t0 + Duration::from_millis(100)));
        selector.signal(Orientation::PortraitUp, t0 + Duration::from_millis(100));

        // The displayed widget never changed off portrait-up
        assert_eq!(selector.displayed(), Orientation::PortraitUp);

        // Settling after the re-armed window keeps portrait-up displayed
        assert!(!selector.settle(t0 + Duration::from_millis(500)));
        assert_eq!(selector.displayed(), Orientation::PortraitUp);
        assert!(!selector.is_transitioning());
    }

    #[test]
    fn test_duplicate_signal_is_ignored() {
        let t0 = Instant::now();
        let mut selector = ViewSelector::new(WINDOW);

        selector.signal(Orientation::PortraitUp, t0);
        assert!(!selector.is_transitioning());

        selector.signal(Orientation::PortraitDown, t0);
        let deadline = selector.settle_deadline();
        selector.signal(Orientation::PortraitDown, t0 + Duration::from_millis(200));
        // Repeating the same signal must not push the deadline out
        assert_eq!(selector.settle_deadline(), deadline);
    }

    #[test]
    fn test_snapshot_follows_displayed_widget() {
        let t0 = Instant::now();
        let mut selector = ViewSelector::new(WINDOW);
        selector.signal(Orientation::LandscapeRight, t0);

        let snapshot = selector.snapshot();
        assert_eq!(snapshot.widget, Widget::AlarmClock);
        assert_eq!(snapshot.orientation, Orientation::LandscapeRight);
        assert!(snapshot.transitioning);
        assert_eq!(snapshot.instruction, "Rotate right for Weather");

        selector.settle(t0 + WINDOW);
        assert_eq!(selector.snapshot().widget, Widget::Weather);
    }
}
