//! External collaborator modules
//!
//! Capability providers (location, audio) injected at startup, and the
//! outbound weather service client.

pub mod audio;
pub mod location;
pub mod weather;

// Re-export main types
pub use audio::AudioOutput;
pub use location::Geolocator;
pub use weather::WeatherService;
