//! Item-local rectangles for the icon, the label, and their union.

use glam::IVec2;
use iconview_core::IRect;
use strum_macros::{Display, EnumIter};

use crate::{LabelMetrics, LABEL_OFFSET};

/// Which label height a rectangle is computed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum BoundsUsage {
    /// What is drawn now; used for redraws and hit testing
    Display,
    /// Line-limited height; used by grid layout so hovering does not move
    /// neighbouring items
    Layout,
    /// The full text; used for scroll-region extents
    EntireItem,
}

/// Cached item-local rectangles, all computed in one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemBounds {
    pub icon: IRect,
    pub display: IRect,
    pub layout: IRect,
    pub entire_item: IRect,
}

impl ItemBounds {
    /// Icon plus label for each usage. `icon_size` is the image size in
    /// canvas pixels; `None` when there is no image.
    pub fn compute(metrics: &LabelMetrics, icon_size: Option<IVec2>, pixels_per_unit: f64) -> Self {
        let icon = match icon_size {
            Some(size) => IRect::from_coords(
                0,
                0,
                (size.x as f64 / pixels_per_unit) as i32,
                (size.y as f64 / pixels_per_unit) as i32,
            ),
            None => IRect::zero(),
        };

        let total = |usage| icon.union(&text_rect(metrics, icon, pixels_per_unit, false, usage));

        Self {
            icon,
            display: total(BoundsUsage::Display),
            layout: total(BoundsUsage::Layout),
            entire_item: total(BoundsUsage::EntireItem),
        }
    }

    pub fn total(&self, usage: BoundsUsage) -> IRect {
        match usage {
            BoundsUsage::Display => self.display,
            BoundsUsage::Layout => self.layout,
            BoundsUsage::EntireItem => self.entire_item,
        }
    }
}

/// The label rectangle, centered under `icon` with its top on the icon's
/// bottom edge.
///
/// With `canvas_coords` the metrics are used as-is; otherwise they are
/// scaled down to item space by `pixels_per_unit`.
pub fn text_rect(
    metrics: &LabelMetrics,
    icon: IRect,
    pixels_per_unit: f64,
    canvas_coords: bool,
    usage: BoundsUsage,
) -> IRect {
    let scale = if canvas_coords { 1.0 } else { pixels_per_unit };

    let width = metrics.text_width as f64 / scale;
    let height = match usage {
        BoundsUsage::Display => metrics.text_height,
        BoundsUsage::Layout => metrics.text_height_for_layout,
        BoundsUsage::EntireItem => metrics.text_height_for_entire_text,
    } as f64
        / scale;

    let x0 = (icon.min.x + icon.max.x) / 2 - (width as i32) / 2;
    let y0 = icon.max.y;
    let x1 = (x0 as f64 + width) as i32;
    let y1 = (y0 as f64 + height + LABEL_OFFSET as f64 / pixels_per_unit) as i32;

    IRect::from_coords(x0, y0, x1, y1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn metrics(width: i32, display: i32, layout: i32, entire: i32) -> LabelMetrics {
        LabelMetrics {
            text_width: width,
            text_height: display,
            text_height_for_layout: layout,
            text_height_for_entire_text: entire,
            editable_text_height: display,
            text_dx: 0,
        }
    }

    #[test]
    fn test_text_is_centered_under_icon() {
        let m = metrics(53, 32, 32, 32);
        let icon = IRect::from_coords(0, 0, 32, 32);
        let rect = text_rect(&m, icon, 1.0, false, BoundsUsage::Display);
        // 16 - 53 / 2 = 16 - 26
        assert_eq!(rect, IRect::from_coords(-10, 32, 43, 65));
    }

    #[test]
    fn test_usages_differ_only_in_height() {
        let m = metrics(40, 62, 47, 92);
        let bounds = ItemBounds::compute(&m, Some(IVec2::new(48, 48)), 1.0);

        assert_eq!(bounds.icon, IRect::from_coords(0, 0, 48, 48));
        for usage in BoundsUsage::iter() {
            let total = bounds.total(usage);
            assert_eq!(total.min, IVec2::new(0, 0));
            assert_eq!(total.max.x, 48);
        }
        assert_eq!(bounds.display.max.y, 48 + 62 + 1);
        assert_eq!(bounds.layout.max.y, 48 + 47 + 1);
        assert_eq!(bounds.entire_item.max.y, 48 + 92 + 1);
    }

    #[test]
    fn test_item_space_is_scaled_by_zoom() {
        let m = metrics(60, 30, 30, 30);
        let bounds = ItemBounds::compute(&m, Some(IVec2::new(64, 64)), 2.0);

        assert_eq!(bounds.icon, IRect::from_coords(0, 0, 32, 32));
        // width 30, height 15 + 0.5 label offset
        assert_eq!(bounds.display, IRect::from_coords(0, 0, 32, 47));

        let canvas = text_rect(&m, IRect::from_coords(0, 0, 64, 64), 2.0, true, BoundsUsage::Display);
        assert_eq!(canvas, IRect::from_coords(2, 64, 62, 94));
    }

    #[test]
    fn test_no_image_and_no_text() {
        let bounds = ItemBounds::compute(&LabelMetrics::default(), None, 1.0);
        assert!(bounds.icon.is_empty());
        // only the label offset remains, a zero-width rectangle
        assert!(bounds.display.is_empty());
    }
}
