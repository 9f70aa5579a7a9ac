//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Clone, Parser)]
#[command(name = "rotadeck")]
#[command(about = "A state-managed HTTP server for an orientation-driven widget deck")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20660")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// View transition window in milliseconds (how long the previous widget
    /// stays visible after an orientation change)
    #[arg(long, default_value = "400")]
    pub transition_ms: u64,

    /// Weather service endpoint
    #[arg(
        long,
        default_value = "https://api.openweathermap.org/data/2.5/weather"
    )]
    pub weather_url: String,

    /// Weather service API key (the default is the provider's public demo key)
    #[arg(long, default_value = "bc6b28477ca9548562b3d32b41eb9a3e")]
    pub weather_api_key: String,

    /// Fixed latitude for the location capability
    #[arg(long)]
    pub latitude: Option<f64>,

    /// Fixed longitude for the location capability
    #[arg(long)]
    pub longitude: Option<f64>,

    /// Shell command used to emit tones; receives TONE_FREQUENCY_HZ and
    /// TONE_DURATION_MS in its environment. Audio is disabled when unset.
    #[arg(long)]
    pub beep_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// View transition window as a Duration
    pub fn transition_window(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}
