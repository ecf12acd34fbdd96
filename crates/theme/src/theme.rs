//! Minimal theming for the icon view.
//!
//! Icon items never hardcode colors. They ask a [`StyleProvider`] for the
//! color of a widget state, the same way a toolkit style context would be
//! queried. [`Theme`] is the stock provider: a flat set of colors with light
//! and dark presets that can also be loaded from JSON.

use iconview_core::color::Color;
use palette::{FromColor, Hsla, Srgba};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use thiserror::Error;

/// Widget state a color is requested for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum StyleState {
    Normal,
    /// Pointer is hovering
    Prelight,
    /// Selected while the canvas has input focus
    Selected,
    /// Selected while the canvas is unfocused
    Active,
}

/// What is being painted, for foreground colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum StyleClass {
    /// The editable file name
    Label,
    /// Secondary label text (size, date, ...)
    DimLabel,
    /// Preview text drawn inside the icon image
    EmbeddedText,
    /// Keyboard focus outline around the label
    FocusRing,
    /// Dashed outline around an icon showing stretch handles
    StretchOutline,
}

/// Color lookup capability injected into the icon item.
pub trait StyleProvider {
    /// Foreground color for `class` in `state`.
    fn color(&self, state: StyleState, class: StyleClass) -> Color;

    /// Background color for `state`; used for label frames and image tints.
    fn background_color(&self, state: StyleState) -> Color;
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("invalid theme json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Theme colors for the icon canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Canvas background
    #[serde(with = "color_string")]
    pub canvas_background: Color,

    /// Label text
    #[serde(with = "color_string")]
    pub text: Color,

    /// Secondary label text
    #[serde(with = "color_string")]
    pub text_dim: Color,

    /// Text rendered inside icon images
    #[serde(with = "color_string")]
    pub embedded_text: Color,

    /// Selection background while the canvas is focused
    #[serde(with = "color_string")]
    pub selected_background: Color,

    /// Text on top of the selection background
    #[serde(with = "color_string")]
    pub selected_text: Color,

    /// Selection background while the canvas is unfocused
    #[serde(with = "color_string")]
    pub active_background: Color,

    /// Hover background behind labels
    #[serde(with = "color_string")]
    pub prelight_background: Color,

    /// Keyboard focus outline
    #[serde(with = "color_string")]
    pub focus_ring: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            canvas_background: hsla(0.0, 0.0, 1.0, 1.0),
            text: hsla(0.0, 0.0, 0.1, 1.0),
            text_dim: hsla(0.0, 0.0, 0.45, 1.0),
            embedded_text: hsla(0.0, 0.0, 0.2, 1.0),
            selected_background: hsla(0.58, 0.7, 0.45, 1.0), // Blue
            selected_text: hsla(0.0, 0.0, 1.0, 1.0),
            active_background: hsla(0.58, 0.1, 0.55, 1.0), // Muted blue
            prelight_background: hsla(0.58, 0.7, 0.45, 0.15),
            focus_ring: hsla(0.58, 0.7, 0.35, 1.0),
        }
    }

    pub fn dark() -> Self {
        Self {
            canvas_background: hsla(0.0, 0.0, 0.12, 1.0),
            text: hsla(0.0, 0.0, 0.92, 1.0),
            text_dim: hsla(0.0, 0.0, 0.6, 1.0),
            embedded_text: hsla(0.0, 0.0, 0.8, 1.0),
            selected_background: hsla(0.58, 0.7, 0.4, 1.0),
            selected_text: hsla(0.0, 0.0, 1.0, 1.0),
            active_background: hsla(0.58, 0.1, 0.3, 1.0),
            prelight_background: hsla(0.58, 0.7, 0.6, 0.2),
            focus_ring: hsla(0.58, 0.7, 0.7, 1.0),
        }
    }

    /// Load a theme from JSON. Missing keys fall back to the light preset.
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl StyleProvider for Theme {
    fn color(&self, state: StyleState, class: StyleClass) -> Color {
        match (class, state) {
            (StyleClass::FocusRing, StyleState::Selected | StyleState::Active) => {
                self.selected_text
            }
            (StyleClass::FocusRing, _) => self.focus_ring,
            (StyleClass::StretchOutline, _) => self.selected_background,
            (StyleClass::EmbeddedText, _) => self.embedded_text,
            (_, StyleState::Selected | StyleState::Active) => self.selected_text,
            (StyleClass::DimLabel, _) => self.text_dim,
            (StyleClass::Label, _) => self.text,
        }
    }

    fn background_color(&self, state: StyleState) -> Color {
        match state {
            StyleState::Normal => self.canvas_background,
            StyleState::Prelight => self.prelight_background,
            StyleState::Selected => self.selected_background,
            StyleState::Active => self.active_background,
        }
    }
}

/// Helper to create a color from h, s, l, a values, hue in turns (0..1).
pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Color {
    let hsla: Hsla = Hsla::new(h * 360.0, s, l, a);
    Srgba::from_color(hsla)
}

/// Colors are written as CSS-like strings in theme files.
mod color_string {
    use iconview_core::color::{self, Color};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        let [r, g, b, a] = color::to_rgba8(*value);
        serializer.serialize_str(&format!("#{r:02x}{g:02x}{b:02x}{a:02x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let raw = String::deserialize(deserializer)?;
        color::parse_color(&raw).ok_or_else(|| de::Error::custom(format!("invalid color `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iconview_core::color;
    use strum::IntoEnumIterator;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let theme = Theme::from_json(r##"{ "selected_background": "#ff0000" }"##).unwrap();
        assert_eq!(color::to_rgba8(theme.selected_background), [255, 0, 0, 255]);
        assert_eq!(theme.text, Theme::light().text);
    }

    #[test]
    fn test_invalid_color_is_an_error() {
        let err = Theme::from_json(r#"{ "text": "not-a-color" }"#).unwrap_err();
        assert!(err.to_string().contains("not-a-color"));
    }

    #[test]
    fn test_json_round_trip_preserves_colors() {
        let dark = Theme::dark();
        let json = serde_json::to_string(&dark).unwrap();
        let loaded = Theme::from_json(&json).unwrap();
        for state in StyleState::iter() {
            assert_eq!(
                color::to_rgba8(loaded.background_color(state)),
                color::to_rgba8(dark.background_color(state))
            );
        }
    }

    #[test]
    fn test_selection_backgrounds_follow_focus_state() {
        let theme = Theme::light();
        assert_ne!(
            color::to_rgba8(theme.background_color(StyleState::Selected)),
            color::to_rgba8(theme.background_color(StyleState::Active))
        );
        assert_eq!(
            theme.color(StyleState::Selected, StyleClass::DimLabel),
            theme.selected_text
        );
        assert_eq!(theme.color(StyleState::Normal, StyleClass::DimLabel), theme.text_dim);
    }
}
