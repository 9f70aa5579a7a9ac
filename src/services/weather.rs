//! Weather fetch with fallback
//!
//! One outbound request per refresh. Any failure along the way (no location,
//! network error, non-2xx, malformed payload) resolves to the fixed demo
//! record plus an advisory string; a refresh never surfaces a hard error.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::services::location::{Coordinates, Geolocator};
use crate::state::weather::WeatherReport;
use crate::state::AppState;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the external weather service (OpenWeatherMap shape)
#[derive(Debug, Clone)]
pub struct WeatherService {
    client: Client,
    url: String,
    api_key: String,
}

/// Payload shape returned by the weather service
#[derive(Debug, Deserialize)]
struct WeatherPayload {
    name: String,
    sys: PayloadSys,
    main: PayloadMain,
    weather: Vec<PayloadCondition>,
    wind: PayloadWind,
    /// Metres; converted to km for display
    visibility: f64,
}

#[derive(Debug, Deserialize)]
struct PayloadSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct PayloadMain {
    temp: f64,
    feels_like: f64,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct PayloadCondition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct PayloadWind {
    speed: f64,
}

impl WeatherService {
    pub fn new(url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, url, api_key }
    }

    /// Fetch current weather for the given coordinates, metric units
    pub async fn fetch(&self, coords: Coordinates) -> Result<WeatherReport, String> {
        debug!("Fetching weather for {}, {}", coords.latitude, coords.longitude);

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| format!("Weather request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Weather service returned {}", response.status()));
        }

        let payload: WeatherPayload = response
            .json()
            .await
            .map_err(|e| format!("Failed to decode weather payload: {}", e))?;

        convert(payload)
    }
}

fn convert(payload: WeatherPayload) -> Result<WeatherReport, String> {
    let condition = payload
        .weather
        .first()
        .ok_or_else(|| "Weather payload contained no conditions".to_string())?;

    Ok(WeatherReport {
        location: format!("{}, {}", payload.name, payload.sys.country),
        temperature_c: payload.main.temp.round() as i32,
        description: condition.description.clone(),
        humidity_pct: payload.main.humidity,
        wind_speed: payload.wind.speed,
        visibility_km: payload.visibility / 1000.0,
        feels_like_c: payload.main.feels_like.round() as i32,
        condition: condition.main.clone(),
    })
}

/// Run the full refresh sequence: locate, fetch, fall back. Always resolves
/// to a report; the advisory explains any substitution that happened.
pub async fn resolve_weather(
    service: &WeatherService,
    geolocator: &Geolocator,
) -> (WeatherReport, Option<String>) {
    let (coords, advisory) = match geolocator.locate() {
        Ok(coords) => (coords, None),
        Err(e) => {
            warn!("Geolocation failed: {}", e);
            (
                Coordinates::demo(),
                Some("Unable to determine your location. Using demo coordinates.".to_string()),
            )
        }
    };

    match service.fetch(coords).await {
        Ok(report) => (report, advisory),
        Err(e) => {
            warn!("Weather fetch failed, using demo data: {}", e);
            (
                WeatherReport::demo(),
                Some("Live weather unavailable. Showing demo data.".to_string()),
            )
        }
    }
}

/// Refresh the weather widget end to end. The generation token taken at the
/// start guards against a stale response landing after a newer refresh.
pub async fn refresh_weather(state: Arc<AppState>) -> Result<Option<String>, String> {
    let generation = state.with_weather(|weather| weather.begin_refresh())?;
    let (report, advisory) = resolve_weather(&state.weather_service, &state.geolocator).await;

    let applied = state.with_weather(|weather| {
        weather.apply(generation, report, advisory.clone(), Utc::now())
    })?;
    if !applied {
        debug!("Dropped stale weather refresh (generation {})", generation);
    }
    Ok(advisory)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> WeatherPayload {
        serde_json::from_value(serde_json::json!({
            "name": "Tokyo",
            "sys": { "country": "JP" },
            "main": { "temp": 21.6, "feels_like": 23.4, "humidity": 58 },
            "weather": [ { "main": "Clear", "description": "clear sky" } ],
            "wind": { "speed": 4.1 },
            "visibility": 10000
        }))
        .unwrap()
    }

    #[test]
    fn test_convert_maps_payload_fields() {
        let report = convert(sample_payload()).unwrap();
        assert_eq!(report.location, "Tokyo, JP");
        assert_eq!(report.temperature_c, 22);
        assert_eq!(report.feels_like_c, 23);
        assert_eq!(report.description, "clear sky");
        assert_eq!(report.condition, "Clear");
        assert_eq!(report.humidity_pct, 58);
        assert_eq!(report.wind_speed, 4.1);
        assert_eq!(report.visibility_km, 10.0);
    }

    #[test]
    fn test_convert_rejects_empty_conditions() {
        let mut payload = sample_payload();
        payload.weather.clear();
        assert!(convert(payload).is_err());
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_demo_record() {
        // Nothing listens on this port, so the fetch fails immediately
        let service = WeatherService::new(
            "http://127.0.0.1:9/data/2.5/weather".to_string(),
            "test-key".to_string(),
        );
        let (report, advisory) = resolve_weather(&service, &Geolocator::Unavailable).await;

        assert_eq!(report, WeatherReport::demo());
        assert!(advisory.is_some());
    }
}
