//! Label text, its cached layouts, and label metrics.
//!
//! A label is measured three ways. The *entire* height is the text laid out
//! without a line limit. The *layout* height only counts the first
//! `max_layout_lines` lines, so grid layout reserves the same space for an
//! item whether or not it is hovered. The *display* height is what is drawn
//! right now: the full text while the item is highlighted, hovered, focused
//! or flagged to show its entire text, the line-limited text otherwise.

use text_layout::{
    prepare_label_text, Alignment, FontDescription, LayoutParams, PreparedText, TextLayout,
    TextLayoutEngine,
};

use crate::{ItemHost, LABEL_LINE_SPACING, MAX_TEXT_WIDTH_STANDARD, TEXT_BACK_PADDING_X, TEXT_BACK_PADDING_Y};

/// Measured label size in canvas pixels, padding included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LabelMetrics {
    pub text_width: i32,
    /// Height as displayed in the current state
    pub text_height: i32,
    /// Height limited to the max layout lines
    pub text_height_for_layout: i32,
    /// Height with no line limit
    pub text_height_for_entire_text: i32,
    /// Display height of the editable text alone
    pub editable_text_height: i32,
    /// Horizontal offset of the widest text within its layout box
    pub text_dx: i32,
}

/// Widest a label may be at `pixels_per_unit`.
pub fn max_text_width(pixels_per_unit: f64) -> f64 {
    MAX_TEXT_WIDTH_STANDARD * pixels_per_unit
}

/// Layout parameters for label text. `max_lines` of `None` lays out the
/// whole text.
pub fn label_params(pixels_per_unit: f64, max_lines: Option<usize>) -> LayoutParams {
    LayoutParams {
        width: Some(max_text_width(pixels_per_unit).floor() as f32),
        max_lines,
        ellipsize: true,
        spacing: LABEL_LINE_SPACING as f32,
        alignment: Alignment::Center,
    }
}

struct CachedLayout {
    font: FontDescription,
    params: LayoutParams,
    layout: TextLayout,
}

/// A layout kept between uses. It is re-run when the font or parameters
/// differ from the cached run, or after [`LayoutSlot::mark_stale`].
#[derive(Default)]
pub(crate) struct LayoutSlot {
    cached: Option<CachedLayout>,
    stale: bool,
}

impl LayoutSlot {
    /// Run `f` on the layout of `text`. The layout is only kept when
    /// `retain` is set.
    pub(crate) fn with_layout<R>(
        &mut self,
        text: &str,
        engine: &dyn TextLayoutEngine,
        font: &FontDescription,
        params: &LayoutParams,
        retain: bool,
        f: impl FnOnce(&TextLayout) -> R,
    ) -> R {
        if !self.stale {
            let reusable = self
                .cached
                .as_ref()
                .filter(|cached| cached.font == *font && cached.params == *params);
            if let Some(cached) = reusable {
                return f(&cached.layout);
            }
        }

        let layout = engine.layout(text, font, params);
        let result = f(&layout);

        self.stale = false;
        self.cached = retain.then(|| CachedLayout {
            font: font.clone(),
            params: params.clone(),
            layout,
        });
        result
    }

    /// Force the next use to lay the text out again.
    pub(crate) fn mark_stale(&mut self) {
        self.stale = true;
    }

    pub(crate) fn clear(&mut self) {
        self.cached = None;
        self.stale = false;
    }

    pub(crate) fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}

/// One of the two label strings with its prepared form and layout.
pub(crate) struct LabelText {
    text: Option<String>,
    prepared: PreparedText,
    pub(crate) slot: LayoutSlot,
}

impl Default for LabelText {
    fn default() -> Self {
        Self {
            text: None,
            prepared: prepare_label_text(""),
            slot: LayoutSlot::default(),
        }
    }
}

impl LabelText {
    /// Replace the text. Returns false when it is unchanged.
    pub(crate) fn set(&mut self, text: Option<&str>) -> bool {
        if self.text.as_deref() == text {
            return false;
        }

        self.text = text.map(str::to_owned);
        self.prepared = prepare_label_text(text.unwrap_or_default());
        self.slot.clear();
        true
    }

    pub(crate) fn get(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub(crate) fn as_str(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Absent and empty texts are not drawn or measured.
    pub(crate) fn is_present(&self) -> bool {
        !self.as_str().is_empty()
    }

    pub(crate) fn char_count(&self) -> usize {
        self.prepared.original_len()
    }

    pub(crate) fn prepared(&self) -> &PreparedText {
        &self.prepared
    }

    pub(crate) fn with_layout<R>(
        &mut self,
        host: &dyn ItemHost,
        params: &LayoutParams,
        retain: bool,
        f: impl FnOnce(&TextLayout) -> R,
    ) -> R {
        self.slot.with_layout(
            self.prepared.as_str(),
            host.text_engine(),
            host.label_font(),
            params,
            retain,
            f,
        )
    }

    /// Like [`LabelText::with_layout`], also handing `f` the text that was
    /// laid out (with break opportunities).
    pub(crate) fn with_text_layout<R>(
        &mut self,
        host: &dyn ItemHost,
        params: &LayoutParams,
        retain: bool,
        f: impl FnOnce(&str, &TextLayout) -> R,
    ) -> R {
        let text = self.prepared.as_str();
        self.slot.with_layout(
            text,
            host.text_engine(),
            host.label_font(),
            params,
            retain,
            |layout| f(text, layout),
        )
    }
}

/// Measure both label texts.
///
/// `unbounded` selects the full text for the display height; `retain`
/// keeps the layouts cached on the texts.
pub(crate) fn measure_label(
    editable: &mut LabelText,
    additional: &mut LabelText,
    host: &dyn ItemHost,
    unbounded: bool,
    retain: bool,
) -> LabelMetrics {
    let have_editable = editable.is_present();
    let have_additional = additional.is_present();

    if !have_editable && !have_additional {
        return LabelMetrics::default();
    }

    let ppu = host.pixels_per_unit();
    let max_lines = host.max_layout_lines();
    let entire_params = label_params(ppu, None);
    let draw_params = label_params(ppu, (!unbounded).then_some(max_lines));

    let mut editable_width = 0;
    let mut editable_height = 0;
    let mut editable_height_for_layout = 0;
    let mut editable_height_for_entire_text = 0;
    let mut editable_dx = 0;

    if have_editable {
        (editable_height_for_entire_text, editable_height_for_layout) =
            editable.with_layout(host, &entire_params, retain, |layout| {
                let entire = layout.full_size().height;
                (entire, layout.height_for_lines(max_lines, entire))
            });

        let size = editable.with_layout(host, &draw_params, retain, |layout| layout.full_size());
        editable_width = size.width;
        editable_height = size.height;
        editable_dx = size.dx;
    }

    let mut additional_width = 0;
    let mut additional_height = 0;
    let mut additional_dx = 0;

    if have_additional {
        let size = additional.with_layout(host, &draw_params, retain, |layout| layout.full_size());
        additional_width = size.width;
        additional_height = size.height;
        additional_dx = size.dx;
    }

    let (text_width, text_dx) = if editable_width > additional_width {
        (editable_width, editable_dx)
    } else {
        (additional_width, additional_dx)
    };

    let extra = if have_additional {
        LABEL_LINE_SPACING + additional_height
    } else {
        0
    };

    let metrics = LabelMetrics {
        text_width: text_width + TEXT_BACK_PADDING_X * 2,
        text_height: editable_height + extra + TEXT_BACK_PADDING_Y * 2,
        text_height_for_layout: editable_height_for_layout + extra + TEXT_BACK_PADDING_Y * 2,
        text_height_for_entire_text: editable_height_for_entire_text + extra + TEXT_BACK_PADDING_Y * 2,
        editable_text_height: editable_height + TEXT_BACK_PADDING_Y * 2,
        text_dx,
    };

    log::trace!(
        "measured label {:?}/{:?}: {:?}",
        editable.get(),
        additional.get(),
        metrics
    );
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestHost;

    fn texts(editable: &str, additional: &str) -> (LabelText, LabelText) {
        let mut e = LabelText::default();
        let mut a = LabelText::default();
        e.set(Some(editable));
        a.set(Some(additional));
        (e, a)
    }

    #[test]
    fn test_empty_texts_measure_zero_without_layout() {
        let host = TestHost::new();
        let (mut e, mut a) = texts("", "");
        let metrics = measure_label(&mut e, &mut a, &host, false, true);
        assert_eq!(metrics, LabelMetrics::default());
        assert_eq!(host.engine.calls(), 0);
    }

    #[test]
    fn test_editable_and_additional_are_combined() {
        let host = TestHost::new();
        let (mut e, mut a) = texts("photo.jpg", "2.1 MB");
        let metrics = measure_label(&mut e, &mut a, &host, false, true);

        // 9 and 6 graphemes at 5px, 15px lines
        assert_eq!(metrics.text_width, 45 + 8);
        assert_eq!(metrics.text_height, 15 + 15 + 2);
        assert_eq!(metrics.text_height_for_layout, 32);
        assert_eq!(metrics.text_height_for_entire_text, 32);
        assert_eq!(metrics.editable_text_height, 17);
    }

    #[test]
    fn test_layout_height_is_limited_to_max_lines() {
        let mut host = TestHost::new();
        host.max_lines = 2;
        // 60 graphemes at 5px wrap into lines of 27, 27 and 6
        let long = "a".repeat(60);
        let (mut e, mut a) = texts(&long, "");

        let bounded = measure_label(&mut e, &mut a, &host, false, true);
        assert_eq!(bounded.text_height_for_entire_text, 3 * 15 + 2);
        assert_eq!(bounded.text_height_for_layout, 2 * 15 + 2);
        assert_eq!(bounded.text_height, 2 * 15 + 2);
        assert!(bounded.text_height_for_layout <= bounded.text_height_for_entire_text);

        let unbounded = measure_label(&mut e, &mut a, &host, true, true);
        assert_eq!(unbounded.text_height, 3 * 15 + 2);
        assert_eq!(unbounded.text_height_for_layout, bounded.text_height_for_layout);
    }

    #[test]
    fn test_layouts_are_only_kept_when_retained() {
        let host = TestHost::new();
        let (mut e, mut a) = texts("name", "info");

        measure_label(&mut e, &mut a, &host, true, false);
        assert!(!e.slot.is_cached());
        assert!(!a.slot.is_cached());

        measure_label(&mut e, &mut a, &host, true, true);
        assert!(e.slot.is_cached());

        // unbounded draw params equal the entire-text params, so the
        // editable layout is reused within one measurement
        let calls = host.engine.calls();
        measure_label(&mut e, &mut a, &host, true, true);
        assert_eq!(host.engine.calls(), calls);

        e.slot.mark_stale();
        measure_label(&mut e, &mut a, &host, true, true);
        assert_eq!(host.engine.calls(), calls + 1);
    }

    #[test]
    fn test_set_reports_changes() {
        let mut text = LabelText::default();
        assert!(!text.set(None));
        assert!(text.set(Some("a-b")));
        assert!(!text.set(Some("a-b")));
        assert_eq!(text.prepared().break_count(), 1);
        assert_eq!(text.char_count(), 3);
        assert!(text.set(Some("")));
        assert!(!text.is_present());
    }
}
