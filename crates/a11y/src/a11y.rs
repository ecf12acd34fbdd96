//! # Accessibility
//!
//! Exposes icon items to assistive technology. An item is presented as an
//! icon whose name is its file name and whose description is the
//! additional label text, with three capabilities:
//!
//! - [`AccessibleImage`]: the icon image, its size and position
//! - [`AccessibleText`]: the label as one string, with character geometry
//! - [`AccessibleAction`]: `open` and `menu`, run later through an
//!   [`ActionQueue`]
//!
//! Everything is read from the item and its container; nothing here draws
//! or lays out text itself.

pub mod accessible;
pub mod action;

pub use accessible::{
    state_set, AccessibleIcon, AccessibleImage, AccessibleText, IconAccessibility, Role, State,
};
pub use action::{AccessibleAction, ActionOutcome, ActionQueue, ItemAction};
