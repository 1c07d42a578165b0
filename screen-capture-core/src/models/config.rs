use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::quality::{FrameRate, QualityPreset};

/// Configuration for a recording controller.
///
/// Everything here is effect-free until a start request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfiguration {
    /// Resolution and bitrate preset (default: high).
    pub quality: QualityPreset,

    /// Capture frame rate (default: 30).
    pub frame_rate: FrameRate,

    /// Capture the microphone alongside the screen (default: true).
    pub mic_enabled: bool,

    /// Ask the display capability for system/tab audio (default: true).
    pub system_audio_enabled: bool,

    /// Encoding formats to probe, most preferred first.
    pub format_preferences: Vec<String>,

    /// Format used when none of the preferences is supported.
    pub fallback_format: String,

    /// Interval at which the encoder emits chunks, in milliseconds.
    pub chunk_interval_ms: u64,

    /// Session clock tick interval. `None` leaves ticking to the host.
    pub tick_interval_ms: Option<u64>,

    /// Upper bound on the wait for the encoder's stop signal.
    pub stop_timeout_ms: u64,

    /// Prefix of generated output names.
    pub file_name_prefix: String,
}

impl RecorderConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_interval_ms == 0 {
            return Err("chunk interval must be positive".into());
        }
        if self.tick_interval_ms == Some(0) {
            return Err("tick interval must be positive".into());
        }
        if self.stop_timeout_ms == 0 {
            return Err("stop timeout must be positive".into());
        }
        if self.fallback_format.trim().is_empty() {
            return Err("fallback format must not be empty".into());
        }
        if self.file_name_prefix.trim().is_empty() {
            return Err("file name prefix must not be empty".into());
        }
        Ok(())
    }

    pub fn chunk_interval(&self) -> Duration {
        Duration::from_millis(self.chunk_interval_ms)
    }

    pub fn tick_interval(&self) -> Option<Duration> {
        self.tick_interval_ms.map(Duration::from_millis)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

impl Default for RecorderConfiguration {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,
            frame_rate: FrameRate::Fps30,
            mic_enabled: true,
            system_audio_enabled: true,
            format_preferences: vec![
                "video/webm;codecs=vp9,opus".into(),
                "video/webm;codecs=vp8,opus".into(),
            ],
            fallback_format: "video/webm".into(),
            chunk_interval_ms: 1000,
            tick_interval_ms: Some(1000),
            stop_timeout_ms: 10_000,
            file_name_prefix: "grabacion-pantalla".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = RecorderConfiguration::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_interval(), Duration::from_secs(1));
        assert_eq!(config.tick_interval(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn rejects_zero_intervals() {
        let config = RecorderConfiguration {
            chunk_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RecorderConfiguration {
            tick_interval_ms: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_blank_fallback_format() {
        let config = RecorderConfiguration {
            fallback_format: "  ".into(),
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            "fallback format must not be empty"
        );
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: RecorderConfiguration =
            serde_json::from_str(r#"{"quality":"low","mic_enabled":false}"#).unwrap();
        assert_eq!(config.quality, QualityPreset::Low);
        assert!(!config.mic_enabled);
        assert!(config.system_audio_enabled);
        assert_eq!(config.chunk_interval_ms, 1000);
    }
}
