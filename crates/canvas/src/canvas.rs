//! # Canvas
//!
//! The container that hosts icon items. It owns the state every item reads
//! through [`icon_item::ItemHost`] (zoom, scroll offset, focus, fonts,
//! theme) in a [`CanvasEnv`], stores items in an [`IconContainer`], and
//! turns the requests items queue into update passes, stacking changes,
//! cursor changes and damaged regions.

pub mod config;
pub mod container;
pub mod env;
pub mod zoom;

pub use config::{ClickPolicy, ConfigError, ContainerConfig};
pub use container::{IconContainer, ItemId};
pub use env::CanvasEnv;
pub use zoom::ZoomLevel;
