//! Weather snapshot state
//!
//! The report is replaced wholesale on every refresh. A generation counter
//! guards against a stale in-flight response landing after a newer refresh
//! has started.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One resolved weather record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: String,
    pub temperature_c: i32,
    pub description: String,
    pub humidity_pct: u32,
    pub wind_speed: f64,
    pub visibility_km: f64,
    pub feels_like_c: i32,
    pub condition: String,
}

impl WeatherReport {
    /// Fixed fallback record used whenever geolocation or the fetch fails
    pub fn demo() -> Self {
        Self {
            location: "Demo Location".to_string(),
            temperature_c: 22,
            description: "Partly cloudy".to_string(),
            humidity_pct: 65,
            wind_speed: 3.2,
            visibility_km: 10.0,
            feels_like_c: 24,
            condition: "Clouds".to_string(),
        }
    }
}

/// Serializable weather view for API responses
#[derive(Debug, Clone, Serialize)]
pub struct WeatherView {
    pub report: Option<WeatherReport>,
    pub loading: bool,
    pub advisory: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Per-widget weather state with refresh bookkeeping
#[derive(Debug, Clone)]
pub struct WeatherState {
    report: Option<WeatherReport>,
    loading: bool,
    advisory: Option<String>,
    last_updated: Option<DateTime<Utc>>,
    /// Bumped at the start of each refresh; results from older refreshes
    /// are dropped on arrival
    generation: u64,
}

impl WeatherState {
    pub fn new() -> Self {
        Self {
            report: None,
            loading: false,
            advisory: None,
            last_updated: None,
            generation: 0,
        }
    }

    pub fn has_report(&self) -> bool {
        self.report.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mark a refresh as started and return its generation token
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Apply a resolved refresh. Returns false (leaving state untouched)
    /// when a newer refresh has started since `generation` was taken.
    pub fn apply(
        &mut self,
        generation: u64,
        report: WeatherReport,
        advisory: Option<String>,
        now: DateTime<Utc>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.report = Some(report);
        self.advisory = advisory;
        self.last_updated = Some(now);
        self.loading = false;
        true
    }

    pub fn view(&self) -> WeatherView {
        WeatherView {
            report: self.report.clone(),
            loading: self.loading,
            advisory: self.advisory.clone(),
            last_updated: self.last_updated,
        }
    }
}

impl Default for WeatherState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_refresh_sets_loading() {
        let mut weather = WeatherState::new();
        assert!(!weather.is_loading());

        let generation = weather.begin_refresh();
        assert_eq!(generation, 1);
        assert!(weather.is_loading());
    }

    #[test]
    fn test_apply_replaces_report_wholesale() {
        let mut weather = WeatherState::new();
        let generation = weather.begin_refresh();

        let applied = weather.apply(
            generation,
            WeatherReport::demo(),
            Some("Using demo data".to_string()),
            Utc::now(),
        );
        assert!(applied);
        assert!(!weather.is_loading());

        let view = weather.view();
        assert_eq!(view.report, Some(WeatherReport::demo()));
        assert_eq!(view.advisory.as_deref(), Some("Using demo data"));
        assert!(view.last_updated.is_some());
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let mut weather = WeatherState::new();
        let stale = weather.begin_refresh();
        let fresh = weather.begin_refresh();

        let mut report = WeatherReport::demo();
        report.location = "Stale City".to_string();
        assert!(!weather.apply(stale, report, None, Utc::now()));
        // Still waiting on the fresh refresh
        assert!(weather.is_loading());
        assert!(!weather.has_report());

        assert!(weather.apply(fresh, WeatherReport::demo(), None, Utc::now()));
        assert!(!weather.is_loading());
    }
}
