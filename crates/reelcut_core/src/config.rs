use crate::error::{CoreError, Result};
use crate::types::TimeUs;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_MIN_TRIM_LENGTH_US: i64 = 500_000;
pub const DEFAULT_OVERLAY_WINDOW_US: i64 = 3_000_000;
pub const DEFAULT_MIN_OVERLAY_LENGTH_US: i64 = 100_000;
pub const DEFAULT_PLAYBACK_POLL_MS: u64 = 250;
pub const DEFAULT_UPLOAD_TICK_MS: u64 = 200;

/// Presentation attributes given to every new overlay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayStyle {
    pub text: String,
    pub color: String,
    pub font_size: u32,
    pub font_family: String,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            text: "Sample Text".to_string(),
            color: "#FFFFFF".to_string(),
            font_size: 28,
            font_family: "Nunito".to_string(),
        }
    }
}

/// Tunables for an editing pass. Every field has a default, so a config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    pub min_trim_length: TimeUs,
    pub overlay_window: TimeUs,
    pub min_overlay_length: TimeUs,
    pub overlay_style: OverlayStyle,
    pub min_font_size: u32,
    pub max_font_size: u32,
    /// Optional depth cap; history is unbounded when unset.
    pub max_history: Option<usize>,
    pub playback_poll_ms: u64,
    pub upload_tick_ms: u64,
    /// Upload progress step range, `[min, max)` percent per tick.
    pub upload_step_min: u32,
    pub upload_step_max: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_trim_length: TimeUs(DEFAULT_MIN_TRIM_LENGTH_US),
            overlay_window: TimeUs(DEFAULT_OVERLAY_WINDOW_US),
            min_overlay_length: TimeUs(DEFAULT_MIN_OVERLAY_LENGTH_US),
            overlay_style: OverlayStyle::default(),
            min_font_size: 12,
            max_font_size: 72,
            max_history: None,
            playback_poll_ms: DEFAULT_PLAYBACK_POLL_MS,
            upload_tick_ms: DEFAULT_UPLOAD_TICK_MS,
            upload_step_min: 5,
            upload_step_max: 15,
        }
    }
}

impl EditorConfig {
    /// Load a config from a JSON file and validate it.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: EditorConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_trim_length <= TimeUs::ZERO {
            return Err(CoreError::InvalidConfig(
                "min_trim_length must be positive".into(),
            ));
        }
        if self.overlay_window <= TimeUs::ZERO || self.min_overlay_length <= TimeUs::ZERO {
            return Err(CoreError::InvalidConfig(
                "overlay windows must be positive".into(),
            ));
        }
        if self.min_font_size == 0 || self.min_font_size > self.max_font_size {
            return Err(CoreError::InvalidConfig(format!(
                "font size bounds {}..={} are invalid",
                self.min_font_size, self.max_font_size
            )));
        }
        if self.max_history == Some(0) {
            return Err(CoreError::InvalidConfig("max_history must be at least 1".into()));
        }
        if self.playback_poll_ms == 0 || self.upload_tick_ms == 0 {
            return Err(CoreError::InvalidConfig("tick intervals must be non-zero".into()));
        }
        if self.upload_step_min == 0 || self.upload_step_min >= self.upload_step_max {
            return Err(CoreError::InvalidConfig(format!(
                "upload step range {}..{} is invalid",
                self.upload_step_min, self.upload_step_max
            )));
        }
        Ok(())
    }

    pub fn playback_poll_interval(&self) -> Duration {
        Duration::from_millis(self.playback_poll_ms)
    }

    pub fn upload_tick_interval(&self) -> Duration {
        Duration::from_millis(self.upload_tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EditorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.min_trim_length, TimeUs(500_000));
        assert_eq!(config.overlay_style.text, "Sample Text");
        assert_eq!(config.max_history, None);
        assert_eq!(config.playback_poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r##"{ "max_history": 5, "overlay_style": { "color": "#FF0000" } }"##)
            .unwrap();

        let config = EditorConfig::load_from_file(&path).unwrap();
        assert_eq!(config.max_history, Some(5));
        assert_eq!(config.overlay_style.color, "#FF0000");
        assert_eq!(config.overlay_style.font_family, "Nunito");
        assert_eq!(config.upload_tick_ms, DEFAULT_UPLOAD_TICK_MS);
    }

    #[test]
    fn invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{ "upload_step_min": 20, "upload_step_max": 10 }"#).unwrap();

        let err = EditorConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn zero_history_cap_rejected() {
        let config = EditorConfig {
            max_history: Some(0),
            ..EditorConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            CoreError::InvalidConfig(_)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EditorConfig::load_from_file("/nonexistent/editor.json").unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            EditorConfig::load_from_file(&path).unwrap_err(),
            CoreError::Json(_)
        ));
    }
}
