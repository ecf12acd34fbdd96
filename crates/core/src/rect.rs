//! Integer rectangles for canvas pixels and item-local label geometry.
//!
//! Icon images are whole pixels and text metrics are rounded to pixels, so
//! the icon item keeps its cached rectangles as integers. An `IRect` is
//! empty when either extent is zero or negative, and two rectangles only
//! "hit" each other when their intersection has a non-zero area.

use glam::IVec2;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IRect {
    pub min: IVec2,
    pub max: IVec2,
}

impl IRect {
    pub fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    pub fn from_coords(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: IVec2::new(x0, y0),
            max: IVec2::new(x1, y1),
        }
    }

    pub fn from_origin_size(origin: IVec2, size: IVec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// A 1x1 probe rectangle at `point`, used for point picking.
    pub fn pixel(point: IVec2) -> Self {
        Self::from_origin_size(point, IVec2::ONE)
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> IVec2 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Returns the overlapping area, or `None` when it would be empty.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let rect = Self {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        };
        if rect.is_empty() {
            None
        } else {
            Some(rect)
        }
    }

    /// True when the two rectangles share a non-empty area.
    pub fn hits(&self, other: &Self) -> bool {
        self.intersection(other).is_some()
    }

    /// Smallest rectangle containing both.
    ///
    /// An empty operand contributes nothing: the union of an empty
    /// rectangle and `r` is `r` itself, wherever the empty one sits.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            *other
        } else if other.is_empty() {
            *self
        } else {
            Self {
                min: self.min.min(other.min),
                max: self.max.max(other.max),
            }
        }
    }

    pub fn translate(&self, offset: IVec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Half-open containment: the max edge is outside.
    pub fn contains_point(&self, point: IVec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_ignores_empty_operand() {
        let empty = IRect::from_coords(0, 0, 0, 0);
        let text = IRect::from_coords(-10, 0, 20, 14);
        assert_eq!(empty.union(&text), text);
        assert_eq!(text.union(&empty), text);

        let icon = IRect::from_coords(0, 0, 32, 32);
        let below = IRect::from_coords(-4, 32, 36, 50);
        assert_eq!(icon.union(&below), IRect::from_coords(-4, 0, 36, 50));
    }

    #[test]
    fn test_hits_requires_overlap() {
        let a = IRect::from_coords(0, 0, 10, 10);
        assert!(a.hits(&IRect::pixel(IVec2::new(9, 9))));
        assert!(!a.hits(&IRect::pixel(IVec2::new(10, 5))));
        assert!(!a.hits(&IRect::from_coords(5, 5, 5, 8)));
    }

    #[test]
    fn test_intersection() {
        let a = IRect::from_coords(0, 0, 10, 10);
        let b = IRect::from_coords(5, -5, 15, 5);
        assert_eq!(a.intersection(&b), Some(IRect::from_coords(5, 0, 10, 5)));
        assert_eq!(a.intersection(&IRect::from_coords(20, 20, 30, 30)), None);
    }
}
