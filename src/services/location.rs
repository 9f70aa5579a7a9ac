//! Geolocation capability provider

use tracing::debug;

/// Demo coordinates (London) used when no location capability is configured
pub const DEMO_LATITUDE: f64 = 51.5074;
pub const DEMO_LONGITUDE: f64 = -0.1278;

/// A resolved geographic position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn demo() -> Self {
        Self {
            latitude: DEMO_LATITUDE,
            longitude: DEMO_LONGITUDE,
        }
    }
}

/// Injected location capability. Widget logic queries this instead of
/// probing the environment.
#[derive(Debug, Clone)]
pub enum Geolocator {
    Available { latitude: f64, longitude: f64 },
    Unavailable,
}

impl Geolocator {
    /// Build from optional configured coordinates; both must be present
    pub fn from_config(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Geolocator::Available { latitude, longitude },
            _ => Geolocator::Unavailable,
        }
    }

    /// Resolve coordinates, or explain why the caller should fall back
    pub fn locate(&self) -> Result<Coordinates, String> {
        match self {
            Geolocator::Available { latitude, longitude } => {
                debug!("Resolved configured location: {}, {}", latitude, longitude);
                Ok(Coordinates {
                    latitude: *latitude,
                    longitude: *longitude,
                })
            }
            Geolocator::Unavailable => Err("No location capability configured".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_requires_both_coordinates() {
        assert!(matches!(
            Geolocator::from_config(Some(35.68), Some(139.69)),
            Geolocator::Available { .. }
        ));
        assert!(matches!(
            Geolocator::from_config(Some(35.68), None),
            Geolocator::Unavailable
        ));
        assert!(matches!(Geolocator::from_config(None, None), Geolocator::Unavailable));
    }

    #[test]
    fn test_locate() {
        let geo = Geolocator::from_config(Some(35.68), Some(139.69));
        let coords = geo.locate().unwrap();
        assert_eq!(coords.latitude, 35.68);
        assert_eq!(coords.longitude, 139.69);

        assert!(Geolocator::Unavailable.locate().is_err());
    }
}
