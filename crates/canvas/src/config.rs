//! Container settings, read from JSON. Every field has a default, so an
//! empty object is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use text_layout::FontDescription;
use thiserror::Error;

use crate::ZoomLevel;

/// How many clicks activate an item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClickPolicy {
    #[default]
    Double,
    Single,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("max_layout_lines must be at least 1")]
    NoLayoutLines,

    #[error("knob_size must be at least 1")]
    EmptyKnob,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Lines a label takes unless it is shown in full
    pub max_layout_lines: usize,

    /// Label font used at every zoom level, e.g. `"Sans 11"`
    pub font: Option<String>,

    /// Label font at the standard zoom level when `font` is unset
    pub default_font: String,

    /// Point size added to `default_font`, per zoom level
    pub font_size_table: [f32; 7],

    /// Draw a frame behind the label of the hovered item
    pub prelight_label: bool,

    pub click_policy: ClickPolicy,

    /// Side of the stretch handle knobs, in pixels
    pub knob_size: u32,

    /// Font for text drawn inside icon images
    pub embedded_text_font: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_layout_lines: 3,
            font: None,
            default_font: "Sans 10".to_string(),
            font_size_table: [-2.0, -2.0, -1.0, 0.0, 0.0, 1.0, 1.0],
            prelight_label: true,
            click_policy: ClickPolicy::Double,
            knob_size: 8,
            embedded_text_font: "monospace 6".to_string(),
        }
    }
}

impl ContainerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_layout_lines == 0 {
            return Err(ConfigError::NoLayoutLines);
        }
        if self.knob_size == 0 {
            return Err(ConfigError::EmptyKnob);
        }
        Ok(())
    }

    /// Label font at `zoom`. An explicit `font` ignores the size table.
    pub fn label_font(&self, zoom: ZoomLevel) -> FontDescription {
        match &self.font {
            Some(font) => FontDescription::parse(font),
            None => FontDescription::parse(&self.default_font)
                .with_size_delta(self.font_size_table[zoom.index()]),
        }
    }

    pub fn embedded_text_font(&self) -> FontDescription {
        FontDescription::parse(&self.embedded_text_font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_the_default() {
        let config = ContainerConfig::from_json("{}").unwrap();
        assert_eq!(config, ContainerConfig::default());
        assert_eq!(config.max_layout_lines, 3);
        assert_eq!(config.click_policy, ClickPolicy::Double);
    }

    #[test]
    fn test_partial_config() {
        let config = ContainerConfig::from_json(r#"{ "click_policy": "single", "knob_size": 6 }"#).unwrap();
        assert_eq!(config.click_policy, ClickPolicy::Single);
        assert_eq!(config.knob_size, 6);
        assert!(config.prelight_label);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            ContainerConfig::from_json(r#"{ "max_layout_lines": 0 }"#),
            Err(ConfigError::NoLayoutLines)
        ));
        assert!(matches!(
            ContainerConfig::from_json(r#"{ "click_policy": "triple" }"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            ContainerConfig::load(Path::new("/nonexistent/iconview.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_label_font_follows_size_table() {
        let config = ContainerConfig::default();
        assert_eq!(config.label_font(ZoomLevel::Standard), FontDescription::new("Sans", 10.0));
        assert_eq!(config.label_font(ZoomLevel::Smallest).size, 8.0);
        assert_eq!(config.label_font(ZoomLevel::Small).size, 9.0);
        assert_eq!(config.label_font(ZoomLevel::Largest).size, 11.0);

        let fixed = ContainerConfig {
            font: Some("Cantarell 12".to_string()),
            ..ContainerConfig::default()
        };
        assert_eq!(fixed.label_font(ZoomLevel::Smallest), FontDescription::new("Cantarell", 12.0));
    }
}
