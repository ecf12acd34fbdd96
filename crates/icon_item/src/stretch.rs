//! Stretch handles: knob squares at the four corners of an icon.

use glam::IVec2;
use iconview_core::IRect;
use strum_macros::{Display, EnumIter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Top-left of the knob for this corner of `icon`.
    pub fn knob_origin(self, icon: IRect, knob: IVec2) -> IVec2 {
        match self {
            Corner::TopLeft => icon.min,
            Corner::TopRight => IVec2::new(icon.max.x - knob.x, icon.min.y),
            Corner::BottomLeft => IVec2::new(icon.min.x, icon.max.y - knob.y),
            Corner::BottomRight => icon.max - knob,
        }
    }
}

/// The corner knob of `icon` that `probe` lands on. Both rectangles are in
/// canvas pixels.
pub fn hit_corner(probe: IRect, icon: IRect, knob: IVec2) -> Option<Corner> {
    if !probe.hits(&icon) {
        return None;
    }

    let top = probe.min.y < icon.min.y + knob.y;
    let bottom = probe.max.y >= icon.max.y - knob.y;

    if probe.min.x < icon.min.x + knob.x {
        if top {
            Some(Corner::TopLeft)
        } else if bottom {
            Some(Corner::BottomLeft)
        } else {
            None
        }
    } else if probe.max.x >= icon.max.x - knob.x {
        if top {
            Some(Corner::TopRight)
        } else if bottom {
            Some(Corner::BottomRight)
        } else {
            None
        }
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const KNOB: IVec2 = IVec2::new(8, 8);

    fn icon() -> IRect {
        IRect::from_coords(100, 100, 148, 148)
    }

    #[test]
    fn test_corners() {
        let at = |x, y| hit_corner(IRect::pixel(IVec2::new(x, y)), icon(), KNOB);
        assert_eq!(at(101, 101), Some(Corner::TopLeft));
        assert_eq!(at(146, 101), Some(Corner::TopRight));
        assert_eq!(at(101, 146), Some(Corner::BottomLeft));
        assert_eq!(at(147, 147), Some(Corner::BottomRight));
        assert_eq!(at(124, 124), None);
        assert_eq!(at(101, 124), None);
        assert_eq!(at(90, 101), None);
    }

    #[test]
    fn test_knob_origins_sit_inside_icon() {
        for corner in Corner::iter() {
            let origin = corner.knob_origin(icon(), KNOB);
            let knob = IRect::from_origin_size(origin, KNOB);
            assert_eq!(knob.intersection(&icon()), Some(knob), "{corner}");
            assert_eq!(hit_corner(IRect::pixel(origin + IVec2::ONE), icon(), KNOB), Some(corner));
        }
    }
}
