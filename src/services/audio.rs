//! Audio output capability provider
//!
//! Tone playback is best-effort: every failure is logged and swallowed, and
//! the widgets stay fully functional without sound.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{process::Command, task::JoinHandle};
use tracing::debug;

/// Alarm tone: 800 Hz, capped at 30 seconds if undismissed
pub const ALARM_TONE_HZ: f64 = 800.0;
pub const ALARM_TONE_CEILING: Duration = Duration::from_secs(30);

/// Countdown completion chime: C5 for about two seconds
pub const CHIME_TONE_HZ: f64 = 523.25;
pub const CHIME_DURATION: Duration = Duration::from_secs(2);

/// Injected audio capability. Available runs a user-configured shell command
/// with the tone parameters in its environment; Unavailable is a no-op.
#[derive(Debug, Clone)]
pub enum AudioOutput {
    Available {
        command: String,
        /// Task owning the in-flight tone process, aborted on stop
        active: Arc<Mutex<Option<JoinHandle<()>>>>,
    },
    Unavailable,
}

impl AudioOutput {
    pub fn from_config(command: Option<String>) -> Self {
        match command {
            Some(command) => AudioOutput::Available {
                command,
                active: Arc::new(Mutex::new(None)),
            },
            None => AudioOutput::Unavailable,
        }
    }

    /// Emit a tone at the given frequency for the given duration. One tone
    /// plays at a time; a new tone replaces any previous one. The command is
    /// expected to bound its own runtime using TONE_DURATION_MS.
    pub fn play_tone(&self, frequency_hz: f64, duration: Duration) {
        match self {
            AudioOutput::Available { command, active } => {
                let command = command.clone();
                let handle = tokio::spawn(async move {
                    // kill_on_drop ties the process lifetime to this task,
                    // so aborting the task silences the tone
                    let result = Command::new("sh")
                        .arg("-c")
                        .arg(&command)
                        .env("TONE_FREQUENCY_HZ", format!("{}", frequency_hz))
                        .env("TONE_DURATION_MS", format!("{}", duration.as_millis()))
                        .kill_on_drop(true)
                        .output()
                        .await;

                    match result {
                        Ok(output) if !output.status.success() => {
                            debug!(
                                "Tone command exited with {}: {}",
                                output.status,
                                String::from_utf8_lossy(&output.stderr)
                            );
                        }
                        Err(e) => debug!("Failed to run tone command: {}", e),
                        _ => {}
                    }
                });

                if let Ok(mut active) = active.lock() {
                    if let Some(previous) = active.replace(handle) {
                        previous.abort();
                    }
                }
            }
            AudioOutput::Unavailable => {
                debug!("Audio output unavailable, skipping {}Hz tone", frequency_hz);
            }
        }
    }

    /// Kill the in-flight tone, if any. Safe to call repeatedly or with
    /// nothing playing.
    pub fn stop(&self) {
        if let AudioOutput::Available { active, .. } = self {
            if let Ok(mut active) = active.lock() {
                if let Some(handle) = active.take() {
                    handle.abort();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_handle_present(audio: &AudioOutput) -> bool {
        match audio {
            AudioOutput::Available { active, .. } => active.lock().unwrap().is_some(),
            AudioOutput::Unavailable => false,
        }
    }

    #[test]
    fn test_from_config() {
        assert!(matches!(
            AudioOutput::from_config(Some("beep".to_string())),
            AudioOutput::Available { .. }
        ));
        assert!(matches!(AudioOutput::from_config(None), AudioOutput::Unavailable));
    }

    #[tokio::test]
    async fn test_stop_kills_inflight_tone() {
        let audio = AudioOutput::from_config(Some("sleep 60".to_string()));
        audio.play_tone(ALARM_TONE_HZ, ALARM_TONE_CEILING);
        assert!(active_handle_present(&audio));

        audio.stop();
        assert!(!active_handle_present(&audio));

        // Stopping again with nothing playing is fine
        audio.stop();
        assert!(!active_handle_present(&audio));
    }

    #[tokio::test]
    async fn test_new_tone_replaces_previous() {
        let audio = AudioOutput::from_config(Some("sleep 60".to_string()));
        audio.play_tone(ALARM_TONE_HZ, ALARM_TONE_CEILING);
        audio.play_tone(CHIME_TONE_HZ, CHIME_DURATION);
        assert!(active_handle_present(&audio));

        // One stop clears the only live tone
        audio.stop();
        assert!(!active_handle_present(&audio));
    }

    #[tokio::test]
    async fn test_unavailable_playback_is_silent_noop() {
        let audio = AudioOutput::Unavailable;
        audio.play_tone(ALARM_TONE_HZ, ALARM_TONE_CEILING);
        audio.stop();
        audio.stop();
    }
}
