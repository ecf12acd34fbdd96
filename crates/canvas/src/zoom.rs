use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Discrete zoom levels of the icon view, smallest first.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
    Smallest,
    Smaller,
    Small,
    #[default]
    Standard,
    Large,
    Larger,
    Largest,
}

impl ZoomLevel {
    /// Canvas pixels per world unit.
    pub fn pixels_per_unit(self) -> f64 {
        match self {
            ZoomLevel::Smallest => 0.25,
            ZoomLevel::Smaller => 0.5,
            ZoomLevel::Small => 0.75,
            ZoomLevel::Standard => 1.0,
            ZoomLevel::Large => 1.5,
            ZoomLevel::Larger => 2.0,
            ZoomLevel::Largest => 4.0,
        }
    }

    /// Position in the zoom order; indexes the font size table.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn zoom_in(self) -> Option<Self> {
        Self::iter().find(|level| *level > self)
    }

    pub fn zoom_out(self) -> Option<Self> {
        Self::iter().rev().find(|level| *level < self)
    }
}
