//! The icon canvas item: owns the caches and ties them to drawing, hit
//! testing and the host's update protocol.

use std::rc::Rc;

use glam::{DVec2, IVec2};
use iconview_core::{Bounds, IRect};
use image::{ColorType, DynamicImage, GenericImageView};
use smallvec::SmallVec;
use text_layout::{Alignment, LayoutParams, TextLayout};
use theme::{StyleClass, StyleState};

use crate::bounds::{self, BoundsUsage, ItemBounds};
use crate::label::{label_params, max_text_width, measure_label, LabelMetrics, LabelText, LayoutSlot};
use crate::paint::{DisplayList, Painter};
use crate::render::{RenderCache, RenderKey};
use crate::request::{CursorKind, ItemEvent, ItemRequest, SurfaceId};
use crate::stretch::{self, Corner};
use crate::{point_miss_distance, IconItemError, ItemHost, LABEL_LINE_SPACING, TEXT_BACK_PADDING_Y};

/// Knobs are painted in this order.
const KNOB_CORNERS: [Corner; 4] = [
    Corner::TopLeft,
    Corner::BottomLeft,
    Corner::TopRight,
    Corner::BottomRight,
];

/// Dash length of the outline around an icon with stretch handles.
const STRETCH_OUTLINE_DASH: f64 = 2.0;

/// One file shown on the canvas.
///
/// Positions are in world units; the item's own rectangles are item-local
/// and scaled by the host's pixels-per-unit. Changes never reach the host
/// directly: they invalidate the caches they affect and queue an
/// [`ItemRequest`], drained with [`IconItem::take_requests`].
pub struct IconItem {
    position: DVec2,
    image: Option<Rc<DynamicImage>>,

    editable: LabelText,
    additional: LabelText,

    embedded_text: Option<String>,
    /// Icon-relative, in image pixels
    embedded_text_rect: IRect,
    embedded_layout: LayoutSlot,

    attach_points: SmallVec<[IVec2; 4]>,

    highlighted_for_selection: bool,
    highlighted_as_keyboard_focus: bool,
    highlighted_for_drop: bool,
    highlighted_for_clipboard: bool,
    show_stretch_handles: bool,
    is_prelit: bool,
    is_renaming: bool,
    entire_text: bool,
    is_visible: bool,

    metrics: Option<LabelMetrics>,
    bounds: Option<ItemBounds>,

    /// Canvas pixels covered by the item, as of the last bounds update
    canvas_extent: IRect,
    canvas_rect: IRect,
    text_rect: IRect,

    render: RenderCache,
    cursor_surface: Option<SurfaceId>,
    requests: SmallVec<[ItemRequest; 4]>,
}

impl Default for IconItem {
    fn default() -> Self {
        Self::new()
    }
}

impl IconItem {
    pub fn new() -> Self {
        Self {
            position: DVec2::ZERO,
            image: None,
            editable: LabelText::default(),
            additional: LabelText::default(),
            embedded_text: None,
            embedded_text_rect: IRect::zero(),
            embedded_layout: LayoutSlot::default(),
            attach_points: SmallVec::new(),
            highlighted_for_selection: false,
            highlighted_as_keyboard_focus: false,
            highlighted_for_drop: false,
            highlighted_for_clipboard: false,
            show_stretch_handles: false,
            is_prelit: false,
            is_renaming: false,
            entire_text: false,
            is_visible: true,
            metrics: None,
            bounds: None,
            canvas_extent: IRect::zero(),
            canvas_rect: IRect::zero(),
            text_rect: IRect::zero(),
            render: RenderCache::default(),
            cursor_surface: None,
            requests: SmallVec::new(),
        }
    }

    pub fn at(position: DVec2) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    fn request(&mut self, request: ItemRequest) {
        if !self.requests.contains(&request) {
            self.requests.push(request);
        }
    }

    /// Requests queued since the last call, oldest first.
    pub fn take_requests(&mut self) -> SmallVec<[ItemRequest; 4]> {
        std::mem::take(&mut self.requests)
    }

    pub fn has_pending_requests(&self) -> bool {
        !self.requests.is_empty()
    }

    // Invalidation

    fn invalidate_bounds(&mut self) {
        self.bounds = None;
    }

    /// Forget the label metrics and bounds. Cached layouts stay, but are
    /// laid out again on next use.
    pub fn invalidate_label_size(&mut self) {
        self.editable.slot.mark_stale();
        self.additional.slot.mark_stale();
        self.embedded_layout.mark_stale();
        self.invalidate_bounds();
        self.metrics = None;
    }

    /// Like [`IconItem::invalidate_label_size`], and also drop every cached
    /// layout. Used when the item goes off screen or the zoom changes.
    pub fn invalidate_label(&mut self) {
        self.invalidate_label_size();
        self.editable.slot.clear();
        self.additional.slot.clear();
        self.embedded_layout.clear();
    }

    pub fn is_label_measured(&self) -> bool {
        self.metrics.is_some()
    }

    pub fn is_bounds_cached(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn has_cached_layouts(&self) -> bool {
        self.editable.slot.is_cached() || self.additional.slot.is_cached() || self.embedded_layout.is_cached()
    }

    // Setters

    /// Replace the icon image. Only 8-bit RGB and RGBA images are accepted;
    /// anything else is refused and the current image kept.
    pub fn set_image(&mut self, image: Option<Rc<DynamicImage>>) -> Result<(), IconItemError> {
        if let Some(image) = &image {
            match image.color() {
                ColorType::Rgb8 | ColorType::Rgba8 => {}
                other => {
                    log::warn!("refusing icon image with color type {:?}", other);
                    return Err(IconItemError::UnsupportedImageFormat(other));
                }
            }
        }

        let unchanged = match (&self.image, &image) {
            (Some(current), Some(new)) => Rc::ptr_eq(current, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return Ok(());
        }

        self.image = image;
        self.render.clear();
        self.invalidate_bounds();
        self.request(ItemRequest::Update);
        Ok(())
    }

    pub fn set_editable_text(&mut self, text: Option<&str>) {
        if self.editable.set(text) {
            self.invalidate_label_size();
            self.request(ItemRequest::Update);
        }
    }

    pub fn set_additional_text(&mut self, text: Option<&str>) {
        if self.additional.set(text) {
            self.invalidate_label_size();
            self.request(ItemRequest::Update);
        }
    }

    pub fn set_highlighted_for_selection(&mut self, highlighted: bool) {
        if self.highlighted_for_selection == highlighted {
            return;
        }
        self.highlighted_for_selection = highlighted;
        self.invalidate_label_size();
        self.request(ItemRequest::Update);
    }

    pub fn set_highlighted_as_keyboard_focus(&mut self, highlighted: bool) {
        if self.highlighted_as_keyboard_focus == highlighted {
            return;
        }
        self.highlighted_as_keyboard_focus = highlighted;
        // focused labels are shown in full
        self.invalidate_label_size();
        self.request(ItemRequest::Update);
    }

    pub fn set_highlighted_for_drop(&mut self, highlighted: bool) {
        if self.highlighted_for_drop == highlighted {
            return;
        }
        self.highlighted_for_drop = highlighted;
        self.invalidate_label_size();
        self.request(ItemRequest::Update);
    }

    pub fn set_highlighted_for_clipboard(&mut self, highlighted: bool) {
        if self.highlighted_for_clipboard == highlighted {
            return;
        }
        self.highlighted_for_clipboard = highlighted;
        self.request(ItemRequest::Update);
    }

    pub fn set_show_stretch_handles(&mut self, show: bool) {
        if self.show_stretch_handles == show {
            return;
        }
        self.show_stretch_handles = show;
        self.invalidate_bounds();
        self.request(ItemRequest::Update);
    }

    /// While renaming, an editor overlay replaces the label.
    pub fn set_renaming(&mut self, renaming: bool) {
        if self.is_renaming == renaming {
            return;
        }
        self.is_renaming = renaming;
        self.request(ItemRequest::Update);
    }

    /// Always show the whole label, not only the first lines.
    pub fn set_entire_text(&mut self, entire_text: bool) {
        if self.entire_text == entire_text {
            return;
        }
        self.entire_text = entire_text;
        self.invalidate_label_size();
        self.request(ItemRequest::Update);
    }

    /// Invisible items keep no layouts.
    pub fn set_is_visible(&mut self, visible: bool) {
        if self.is_visible == visible {
            return;
        }
        self.is_visible = visible;
        if !visible {
            self.invalidate_label();
        }
    }

    pub fn set_attach_points(&mut self, points: &[IVec2]) {
        if self.attach_points.as_slice() == points {
            return;
        }
        self.attach_points = SmallVec::from_slice(points);
        self.invalidate_bounds();
    }

    /// Where embedded text goes, relative to the icon's top-left corner.
    pub fn set_embedded_text_rect(&mut self, rect: IRect) {
        if self.embedded_text_rect == rect {
            return;
        }
        self.embedded_text_rect = rect;
        self.invalidate_bounds();
        self.request(ItemRequest::Update);
    }

    /// Preview text drawn inside the icon, e.g. the first lines of a text
    /// file.
    pub fn set_embedded_text(&mut self, text: Option<&str>) {
        if self.embedded_text.as_deref() == text {
            return;
        }
        self.embedded_text = text.map(str::to_owned);
        self.embedded_layout.clear();
        self.request(ItemRequest::Update);
    }

    // Getters

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn image(&self) -> Option<&Rc<DynamicImage>> {
        self.image.as_ref()
    }

    pub fn editable_text(&self) -> Option<&str> {
        self.editable.get()
    }

    pub fn additional_text(&self) -> Option<&str> {
        self.additional.get()
    }

    pub fn embedded_text(&self) -> Option<&str> {
        self.embedded_text.as_deref()
    }

    pub fn attach_points(&self) -> &[IVec2] {
        &self.attach_points
    }

    pub fn is_highlighted_for_selection(&self) -> bool {
        self.highlighted_for_selection
    }

    pub fn is_highlighted_as_keyboard_focus(&self) -> bool {
        self.highlighted_as_keyboard_focus
    }

    pub fn is_highlighted_for_drop(&self) -> bool {
        self.highlighted_for_drop
    }

    pub fn is_highlighted_for_clipboard(&self) -> bool {
        self.highlighted_for_clipboard
    }

    pub fn shows_stretch_handles(&self) -> bool {
        self.show_stretch_handles
    }

    pub fn is_prelit(&self) -> bool {
        self.is_prelit
    }

    pub fn is_renaming(&self) -> bool {
        self.is_renaming
    }

    pub fn shows_entire_text(&self) -> bool {
        self.entire_text
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Image size in pixels.
    pub fn image_size(&self) -> Option<IVec2> {
        self.image.as_ref().map(|image| {
            let (width, height) = image.dimensions();
            IVec2::new(width as i32, height as i32)
        })
    }

    pub fn canvas_extent(&self) -> IRect {
        self.canvas_extent
    }

    /// The icon in canvas pixels, as of the last bounds update.
    pub fn canvas_rect(&self) -> IRect {
        self.canvas_rect
    }

    /// The label in canvas pixels, as of the last bounds update.
    pub fn text_rect(&self) -> IRect {
        self.text_rect
    }

    // Measurement

    fn needs_highlight(&self) -> bool {
        self.highlighted_for_selection || self.highlighted_for_drop
    }

    /// Whether the label is drawn in full instead of line-limited.
    fn label_is_unbounded(&self) -> bool {
        self.needs_highlight() || self.is_prelit || self.highlighted_as_keyboard_focus || self.entire_text
    }

    fn draw_params(&self, host: &dyn ItemHost) -> LayoutParams {
        let max_lines = (!self.label_is_unbounded()).then(|| host.max_layout_lines());
        label_params(host.pixels_per_unit(), max_lines)
    }

    /// Label metrics, measured on first use after an invalidation.
    pub fn label_metrics(&mut self, host: &dyn ItemHost) -> LabelMetrics {
        if let Some(metrics) = self.metrics {
            return metrics;
        }

        let unbounded = self.label_is_unbounded();
        let retain = self.is_visible;
        let metrics = measure_label(&mut self.editable, &mut self.additional, host, unbounded, retain);
        self.metrics = Some(metrics);
        metrics
    }

    /// Item-local rectangles for every usage, computed on first use after
    /// an invalidation.
    pub fn ensure_bounds(&mut self, host: &dyn ItemHost) -> ItemBounds {
        if let Some(bounds) = self.bounds {
            return bounds;
        }

        let metrics = self.label_metrics(host);
        let bounds = ItemBounds::compute(&metrics, self.image_size(), host.pixels_per_unit());
        log::trace!("item bounds at {:?}: {:?}", self.position, bounds);
        self.bounds = Some(bounds);
        bounds
    }

    /// `rect` placed at the item's position, with the max edge made
    /// inclusive.
    fn world_rect(&self, rect: IRect) -> Bounds {
        let origin = self.position.trunc();
        Bounds::new(
            origin + rect.min.as_dvec2(),
            origin + rect.max.as_dvec2() + DVec2::ONE,
        )
    }

    /// What is drawn now, in world units.
    pub fn bounds(&mut self, host: &dyn ItemHost) -> Bounds {
        let bounds = self.ensure_bounds(host);
        self.world_rect(bounds.display)
    }

    /// Space the item takes in a grid, ignoring growth from hovering or
    /// selection.
    pub fn bounds_for_layout(&mut self, host: &dyn ItemHost) -> Bounds {
        let bounds = self.ensure_bounds(host);
        self.world_rect(bounds.layout)
    }

    /// The item with its whole label shown.
    pub fn bounds_for_entire_item(&mut self, host: &dyn ItemHost) -> Bounds {
        let bounds = self.ensure_bounds(host);
        self.world_rect(bounds.entire_item)
    }

    /// The icon alone, in world units.
    pub fn icon_rectangle(&self, host: &dyn ItemHost) -> Bounds {
        let size = self.image_size().unwrap_or(IVec2::ZERO).as_dvec2() / host.pixels_per_unit();
        Bounds::from_origin_size(self.position, size)
    }

    /// The label, in world units.
    pub fn text_rectangle(&mut self, host: &dyn ItemHost, for_layout: bool) -> Bounds {
        let ppu = host.pixels_per_unit();
        let size = self.image_size().unwrap_or(IVec2::ZERO).as_dvec2() / ppu;
        let x0 = self.position.x as i32;
        let y0 = self.position.y as i32;
        let icon = IRect::from_coords(x0, y0, (x0 as f64 + size.x) as i32, (y0 as f64 + size.y) as i32);

        let metrics = self.label_metrics(host);
        let usage = if for_layout {
            BoundsUsage::Layout
        } else {
            BoundsUsage::Display
        };
        let rect = bounds::text_rect(&metrics, icon, ppu, false, usage);
        Bounds::new(rect.min.as_dvec2(), rect.max.as_dvec2())
    }

    // Canvas updates

    /// Recompute the canvas extent. When it changed, the icon and label
    /// canvas rectangles are refreshed and a redraw of the old extent is
    /// requested; the host repaints the new extent itself.
    pub fn update_bounds(&mut self, host: &dyn ItemHost, item_to_world: DVec2) {
        let before = self.canvas_extent;

        let world = self.bounds(host).translate(item_to_world);
        let transform = host.transform();
        let min = transform.world_to_canvas_f64(world.min);
        let max = transform.world_to_canvas_f64(world.max);
        let after = IRect::from_coords(min.x as i32, min.y as i32, max.x as i32, max.y as i32);

        if before == after {
            return;
        }

        self.canvas_extent = after;
        self.canvas_rect = IRect::from_origin_size(
            transform.world_to_canvas(self.position + item_to_world),
            self.image_size().unwrap_or(IVec2::ZERO),
        );
        let metrics = self.label_metrics(host);
        self.text_rect = bounds::text_rect(
            &metrics,
            self.canvas_rect,
            host.pixels_per_unit(),
            true,
            BoundsUsage::Display,
        );

        if !before.is_empty() {
            self.request(ItemRequest::Redraw(redraw_region(before)));
        }
    }

    /// The host's update pass: refresh bounds and repaint the item.
    pub fn update(&mut self, host: &dyn ItemHost, item_to_world: DVec2) {
        self.update_bounds(host, item_to_world);
        self.request(ItemRequest::Redraw(redraw_region(self.canvas_extent)));
    }

    /// Move by `delta` world units. The host runs the bounds update.
    pub fn translate(&mut self, delta: DVec2) {
        self.position += delta;
    }

    // Hit testing

    fn stretch_handle_at(&self, host: &dyn ItemHost, probe: IRect) -> Option<Corner> {
        if !self.show_stretch_handles {
            return None;
        }
        stretch::hit_corner(probe, self.canvas_rect, host.knob_size())
    }

    /// Whether `probe` (canvas pixels) touches a stretch handle, the icon,
    /// or the label. The label does not count while renaming.
    pub fn hit_test_rectangle(&self, host: &dyn ItemHost, probe: IRect) -> bool {
        let hits_icon = self.canvas_rect.hits(&probe);
        let hits_text = self.text_rect.hits(&probe);
        if !hits_icon && !hits_text {
            return false;
        }

        if self.stretch_handle_at(host, probe).is_some() {
            return true;
        }

        hits_icon || (hits_text && !self.is_renaming)
    }

    /// The stretch handle under a world point.
    pub fn hit_test_stretch_handles(&self, host: &dyn ItemHost, world: DVec2) -> Option<Corner> {
        let canvas = host.transform().world_to_canvas(world);
        self.stretch_handle_at(host, IRect::pixel(canvas))
    }

    /// Picking distance for a canvas pixel: zero on a hit.
    pub fn point(&self, host: &dyn ItemHost, canvas: IVec2) -> f64 {
        if self.hit_test_rectangle(host, IRect::pixel(canvas)) {
            0.0
        } else {
            point_miss_distance(host.pixels_per_unit())
        }
    }

    // Events

    /// Pointer crossing. Returns false for events the host should handle.
    pub fn handle_event(&mut self, host: &dyn ItemHost, event: ItemEvent) -> bool {
        match event {
            ItemEvent::Enter { surface } => {
                if !self.is_prelit {
                    self.is_prelit = true;
                    self.invalidate_label_size();
                    self.request(ItemRequest::Update);
                    self.request(ItemRequest::RaiseAboveItems);

                    if host.single_click_mode() {
                        self.request(ItemRequest::SetCursor {
                            surface,
                            cursor: CursorKind::Hand,
                        });
                        self.cursor_surface = Some(surface);
                    }
                }
                true
            }
            ItemEvent::Leave { surface } => {
                // drop highlighting is turned back on by drag motion
                if self.is_prelit || self.highlighted_for_drop {
                    self.is_prelit = false;
                    self.highlighted_for_drop = false;
                    self.invalidate_label_size();
                    self.request(ItemRequest::Update);

                    let surface = self.cursor_surface.take().unwrap_or(surface);
                    self.request(ItemRequest::ClearCursor { surface });
                }
                true
            }
            ItemEvent::Other => false,
        }
    }

    // Drawing

    fn render_key(&self, host: &dyn ItemHost) -> RenderKey {
        RenderKey::new(
            self.is_prelit,
            self.highlighted_for_selection,
            self.highlighted_for_drop,
            self.highlighted_for_clipboard,
            host.has_focus(),
        )
    }

    /// The image as drawn in the current highlight state.
    pub fn rendered_image(&mut self, host: &dyn ItemHost) -> Option<Rc<DynamicImage>> {
        let source = self.image.as_ref()?;
        let key = self.render_key(host);
        Some(self.render.get(source, key, host.style()))
    }

    /// Paint the item. Nothing is drawn without an image, or when the item's
    /// extent is outside `clip`.
    pub fn draw(&mut self, host: &dyn ItemHost, painter: &mut dyn Painter, clip: IRect) {
        if !self.canvas_extent.hits(&clip) {
            return;
        }
        let Some(image) = self.rendered_image(host) else {
            return;
        };

        let icon_rect = self.canvas_rect;
        painter.draw_image(&image, icon_rect.min);
        self.draw_embedded_text(host, painter, icon_rect.min);
        self.draw_stretch_handles(host, painter, icon_rect);
        self.draw_label_text(host, painter, icon_rect);
    }

    /// A drag preview: the unhighlighted image, embedded text and label on
    /// a surface the size of the item's canvas extent.
    pub fn drag_surface(&mut self, host: &dyn ItemHost) -> Option<DisplayList> {
        let image = Rc::clone(self.image.as_ref()?);
        let extent = self.canvas_extent;

        let item = host.transform().world_to_canvas_f64(self.position);
        let offset = IVec2::new(
            (item.x - extent.min.x as f64) as i32,
            (item.y - extent.min.y as f64) as i32,
        );

        let mut surface = DisplayList::with_size(extent.size());
        surface.draw_image(&image, offset);

        let (width, height) = image.dimensions();
        let icon_rect = IRect::from_origin_size(offset, IVec2::new(width as i32, height as i32));
        self.draw_embedded_text(host, &mut surface, offset);
        self.draw_label_text(host, &mut surface, icon_rect);

        Some(surface)
    }

    fn draw_embedded_text(&mut self, host: &dyn ItemHost, painter: &mut dyn Painter, icon_origin: IVec2) {
        let rect = self.embedded_text_rect;
        let Some(text) = self.embedded_text.as_deref() else {
            return;
        };
        if rect.width() == 0 || rect.height() == 0 {
            return;
        }

        let clip = rect.translate(icon_origin);
        let color = host.style().color(StyleState::Normal, StyleClass::EmbeddedText);
        let params = LayoutParams {
            alignment: Alignment::Left,
            ..LayoutParams::default()
        };

        painter.push_clip(clip);
        self.embedded_layout.with_layout(
            text,
            host.text_engine(),
            host.embedded_text_font(),
            &params,
            self.is_visible,
            |layout| painter.render_layout(text, layout, clip.min, color, StyleClass::EmbeddedText),
        );
        painter.pop_clip();
    }

    fn draw_stretch_handles(&self, host: &dyn ItemHost, painter: &mut dyn Painter, icon_rect: IRect) {
        if !self.show_stretch_handles {
            return;
        }

        let outline = host.style().color(StyleState::Selected, StyleClass::StretchOutline);
        painter.stroke_dashed_rect(icon_rect, STRETCH_OUTLINE_DASH, outline);

        let knob = host.knob_image();
        let knob_size = host.knob_size();
        for corner in KNOB_CORNERS {
            painter.draw_image(knob, corner.knob_origin(icon_rect, knob_size));
        }
    }

    fn draw_label_text(&mut self, host: &dyn ItemHost, painter: &mut dyn Painter, icon_rect: IRect) {
        let metrics = self.label_metrics(host);
        if metrics.text_height == 0 || metrics.text_width == 0 {
            return;
        }

        let ppu = host.pixels_per_unit();
        let style = host.style();
        let text_rect = bounds::text_rect(&metrics, icon_rect, ppu, true, BoundsUsage::Display);

        let needs_highlight = self.needs_highlight();
        let have_editable = self.editable.is_present();
        let have_additional = self.additional.is_present();
        let prelit = host.prelight_label() && self.is_prelit;
        let selected = if host.has_focus() {
            StyleState::Selected
        } else {
            StyleState::Active
        };

        let frame = if needs_highlight && !self.is_renaming {
            Some(selected)
        } else if !needs_highlight && have_editable && prelit {
            Some(StyleState::Prelight)
        } else {
            None
        };

        if let Some(state) = frame {
            let color = style.background_color(state);
            painter.render_frame(text_rect, color);
            painter.render_background(text_rect, color);
        }

        let x = text_rect.min.x + (text_rect.width() - max_text_width(ppu).floor() as i32) / 2;
        let params = self.draw_params(host);
        let retain = self.is_visible;

        if have_editable && !self.is_renaming {
            let state = if needs_highlight {
                selected
            } else if prelit {
                StyleState::Prelight
            } else {
                StyleState::Normal
            };
            let color = style.color(state, StyleClass::Label);
            let origin = IVec2::new(x, text_rect.min.y + TEXT_BACK_PADDING_Y);
            self.editable.with_text_layout(host, &params, retain, |text, layout| {
                painter.render_layout(text, layout, origin, color, StyleClass::Label)
            });
        }

        if have_additional && !self.is_renaming {
            let state = if needs_highlight {
                selected
            } else {
                StyleState::Normal
            };
            let color = style.color(state, StyleClass::DimLabel);
            let origin = IVec2::new(
                x,
                text_rect.min.y + metrics.editable_text_height + LABEL_LINE_SPACING + TEXT_BACK_PADDING_Y,
            );
            self.additional.with_text_layout(host, &params, retain, |text, layout| {
                painter.render_layout(text, layout, origin, color, StyleClass::DimLabel)
            });
        }

        if self.highlighted_as_keyboard_focus {
            let state = if needs_highlight {
                selected
            } else {
                StyleState::Normal
            };
            painter.render_focus(text_rect, style.color(state, StyleClass::FocusRing));
        }
    }

    // Accessibility queries. Points and rectangles are relative to the
    // item's canvas extent.

    /// Leftmost start of the label lines, in layout coordinates.
    fn text_offset(&mut self, host: &dyn ItemHost, params: &LayoutParams) -> i32 {
        let retain = self.is_visible;
        let first_x = |layout: &TextLayout| layout.char_extents(0).map_or(0, |rect| round_px(rect.x));

        let mut offset = 0;
        if self.editable.is_present() {
            offset = self.editable.with_layout(host, params, retain, first_x);
        }
        if self.additional.is_present() {
            offset = offset.min(self.additional.with_layout(host, params, retain, first_x));
        }
        offset
    }

    /// Character offset into the editable text followed by the additional
    /// text, for a point relative to the item's extent.
    pub fn offset_at_point(&mut self, host: &dyn ItemHost, point: IVec2) -> usize {
        let have_editable = self.editable.is_present();
        let have_additional = self.additional.is_present();
        if !have_editable && !have_additional {
            return 0;
        }

        let params = self.draw_params(host);
        let retain = self.is_visible;
        let text_offset = self.text_offset(host, &params);

        let mut y = point.y - self.image_size().map_or(0, |size| size.y);
        let x = point.x + text_offset;

        let use_additional = if have_editable {
            let editable_height = self
                .editable
                .with_layout(host, &params, retain, |layout| layout.full_size().height);
            let below = y >= editable_height && have_additional;
            if below {
                y -= editable_height + LABEL_LINE_SPACING;
            }
            below
        } else {
            true
        };

        let text = if use_additional {
            &mut self.additional
        } else {
            &mut self.editable
        };
        let hit = text.with_layout(host, &params, retain, |layout| layout.index_at_point(x as f32, y as f32));
        let offset = match hit {
            Some(index) => text.prepared().to_original(index),
            None if x < 0 || y < 0 => 0,
            None => text.char_count(),
        };

        if use_additional {
            offset + self.editable.char_count()
        } else {
            offset
        }
    }

    /// Extents of the character at `offset` of the combined label text,
    /// relative to the item's extent.
    pub fn character_extents(&mut self, host: &dyn ItemHost, offset: usize) -> Option<IRect> {
        let have_editable = self.editable.is_present();
        if !have_editable && !self.additional.is_present() {
            return None;
        }

        let params = self.draw_params(host);
        let retain = self.is_visible;
        let text_offset = self.text_offset(host, &params);

        let mut pos_y = self.image_size().map_or(0, |size| size.y);
        let editable_len = if have_editable { self.editable.char_count() } else { 0 };

        let (text, local) = if offset < editable_len {
            (&mut self.editable, offset)
        } else {
            pos_y += LABEL_LINE_SPACING;
            if have_editable {
                pos_y += self
                    .editable
                    .with_layout(host, &params, retain, |layout| layout.full_size().height);
            }
            (&mut self.additional, offset - editable_len)
        };

        let index = text.prepared().to_prepared(local);
        let rect = text.with_layout(host, &params, retain, |layout| layout.char_extents(index))?;

        Some(IRect::from_origin_size(
            IVec2::new(round_px(rect.x) - text_offset, pos_y + round_px(rect.y)),
            IVec2::new(round_px(rect.width), round_px(rect.height)),
        ))
    }
}

/// Repaint area for an extent; the extent's max edge is drawn on.
pub fn redraw_region(extent: IRect) -> IRect {
    IRect::new(extent.min, extent.max + IVec2::ONE)
}

fn round_px(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}
