//! Item storage, stacking order and the update protocol.
//!
//! Items never call into the container. After changing an item, run
//! [`IconContainer::process_requests`] (or [`IconContainer::update`], which
//! does it too) so queued updates, redraws, raises and cursor changes take
//! effect. Picking and drawing use the rectangles of the last update pass.

use std::collections::HashMap;
use std::mem;

use glam::DVec2;
use icon_item::{redraw_region, CursorKind, IconItem, ItemEvent, ItemHost, ItemRequest, Painter, SurfaceId};
use iconview_core::IRect;
use slotmap::{KeyData, SlotMap};
use theme::Theme;

use crate::{CanvasEnv, ContainerConfig, ZoomLevel};

/// Space around an item in its grid cell, in world units.
const GRID_CELL_PADDING: f64 = 4.0;

slotmap::new_key_type! {
    /// Identifies an item placed on a container.
    pub struct ItemId;
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(KeyData::from_ffi(value))
    }
}

impl ItemId {
    pub fn as_u64(self) -> u64 {
        self.0.as_ffi()
    }
}

pub struct IconContainer {
    env: CanvasEnv,

    items: SlotMap<ItemId, IconItem>,

    /// Insertion order; grid layout follows it
    order: Vec<ItemId>,

    /// Paint order, bottom first
    z_order: Vec<ItemId>,

    /// Items whose update pass is due
    pending_updates: Vec<ItemId>,

    /// Canvas rectangles to repaint
    damage: Vec<IRect>,

    cursors: HashMap<SurfaceId, CursorKind>,

    /// Item under the pointer
    hovered: Option<ItemId>,

    keyboard_focus: Option<ItemId>,
}

impl IconContainer {
    pub fn new(config: ContainerConfig, theme: Theme) -> Self {
        Self::with_env(CanvasEnv::new(config, theme))
    }

    pub fn with_env(env: CanvasEnv) -> Self {
        Self {
            env,
            items: SlotMap::with_key(),
            order: Vec::new(),
            z_order: Vec::new(),
            pending_updates: Vec::new(),
            damage: Vec::new(),
            cursors: HashMap::new(),
            hovered: None,
            keyboard_focus: None,
        }
    }

    pub fn env(&self) -> &CanvasEnv {
        &self.env
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // Items

    pub fn add_item(&mut self, item: IconItem) -> ItemId {
        let id = self.items.insert(item);
        self.order.push(id);
        self.z_order.push(id);
        self.schedule_update(id);
        id
    }

    /// Take an item off the canvas. Its last extent is damaged.
    pub fn remove_item(&mut self, id: ItemId) -> Option<IconItem> {
        let mut item = self.items.remove(id)?;
        self.order.retain(|&other| other != id);
        self.z_order.retain(|&other| other != id);
        self.pending_updates.retain(|&other| other != id);

        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.keyboard_focus == Some(id) {
            self.keyboard_focus = None;
        }

        // queued cursor changes still apply
        for request in item.take_requests() {
            self.apply_cursor_request(request);
        }

        let extent = item.canvas_extent();
        if !extent.is_empty() {
            self.damage.push(redraw_region(extent));
        }
        Some(item)
    }

    pub fn item(&self, id: ItemId) -> Option<&IconItem> {
        self.items.get(id)
    }

    /// Changes made through the returned item take effect at the next
    /// [`IconContainer::process_requests`].
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut IconItem> {
        self.items.get_mut(id)
    }

    /// Run `f` on an item together with the canvas it lives on, then
    /// process the item's requests.
    pub fn with_item<R>(&mut self, id: ItemId, f: impl FnOnce(&mut IconItem, &CanvasEnv) -> R) -> Option<R> {
        let item = self.items.get_mut(id)?;
        let result = f(item, &self.env);
        self.process_requests();
        Some(result)
    }

    /// Items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &IconItem)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.items.get(id).map(|item| (id, item)))
    }

    /// Item ids, bottom of the stack first.
    pub fn paint_order(&self) -> &[ItemId] {
        &self.z_order
    }

    // Requests

    fn schedule_update(&mut self, id: ItemId) {
        if !self.pending_updates.contains(&id) {
            self.pending_updates.push(id);
        }
    }

    fn schedule_all(&mut self) {
        self.pending_updates = self.order.clone();
    }

    pub fn has_pending_updates(&self) -> bool {
        !self.pending_updates.is_empty()
    }

    fn raise(&mut self, id: ItemId) {
        if let Some(index) = self.z_order.iter().position(|&other| other == id) {
            let id = self.z_order.remove(index);
            self.z_order.push(id);
        }
    }

    fn apply_cursor_request(&mut self, request: ItemRequest) {
        match request {
            ItemRequest::SetCursor { surface, cursor } => {
                self.cursors.insert(surface, cursor);
            }
            ItemRequest::ClearCursor { surface } => {
                self.cursors.remove(&surface);
            }
            _ => {}
        }
    }

    /// Drain the requests every item has queued.
    pub fn process_requests(&mut self) {
        let ids = self.z_order.clone();
        for id in ids {
            let Some(item) = self.items.get_mut(id) else {
                continue;
            };
            if !item.has_pending_requests() {
                continue;
            }

            let requests = item.take_requests();
            for request in requests {
                match request {
                    ItemRequest::Update => self.schedule_update(id),
                    ItemRequest::Redraw(rect) => self.damage.push(rect),
                    ItemRequest::RaiseAboveItems => self.raise(id),
                    ItemRequest::SetCursor { .. } | ItemRequest::ClearCursor { .. } => {
                        self.apply_cursor_request(request)
                    }
                }
            }
        }
    }

    /// Process requests, then run the update pass of every item that asked
    /// for one.
    pub fn update(&mut self) {
        self.process_requests();

        let pending = mem::take(&mut self.pending_updates);
        if !pending.is_empty() {
            log::trace!("updating {} items", pending.len());
        }
        for id in pending {
            if let Some(item) = self.items.get_mut(id) {
                item.update(&self.env, DVec2::ZERO);
            }
        }

        self.process_requests();
    }

    /// Canvas rectangles damaged since the last call.
    pub fn take_damage(&mut self) -> Vec<IRect> {
        mem::take(&mut self.damage)
    }

    pub fn cursor(&self, surface: SurfaceId) -> Option<CursorKind> {
        self.cursors.get(&surface).copied()
    }

    // Canvas state

    pub fn zoom_level(&self) -> ZoomLevel {
        self.env.zoom_level()
    }

    /// Every label is laid out again in the font of the new level.
    pub fn set_zoom_level(&mut self, zoom: ZoomLevel) {
        if self.env.zoom_level() == zoom {
            return;
        }

        log::debug!("zoom level {} -> {}", self.env.zoom_level(), zoom);
        self.env.set_zoom_level(zoom);
        for (_, item) in self.items.iter_mut() {
            item.invalidate_label();
        }
        self.schedule_all();
    }

    pub fn has_focus(&self) -> bool {
        self.env.has_focus()
    }

    /// Focus picks the selection colors, so highlighted items are redrawn.
    pub fn set_has_focus(&mut self, has_focus: bool) {
        if self.env.has_focus() == has_focus {
            return;
        }

        self.env.set_has_focus(has_focus);
        let highlighted: Vec<ItemId> = self
            .items()
            .filter(|(_, item)| item.is_highlighted_for_selection() || item.is_highlighted_for_drop())
            .map(|(id, _)| id)
            .collect();
        for id in highlighted {
            self.schedule_update(id);
        }
    }

    pub fn set_scroll_origin(&mut self, origin: DVec2) {
        if self.env.scroll_origin() == origin {
            return;
        }
        self.env.set_scroll_origin(origin);
        self.schedule_all();
    }

    // Selection and focus

    pub fn set_selected(&mut self, id: ItemId, selected: bool) -> bool {
        match self.items.get_mut(id) {
            Some(item) => {
                item.set_highlighted_for_selection(selected);
                self.process_requests();
                true
            }
            None => false,
        }
    }

    /// Selected items in insertion order.
    pub fn selection(&self) -> Vec<ItemId> {
        self.items()
            .filter(|(_, item)| item.is_highlighted_for_selection())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn is_sole_selection(&self, id: ItemId) -> bool {
        let selection = self.selection();
        selection.len() == 1 && selection[0] == id
    }

    pub fn keyboard_focus(&self) -> Option<ItemId> {
        self.keyboard_focus
    }

    pub fn set_keyboard_focus(&mut self, id: Option<ItemId>) {
        if self.keyboard_focus == id {
            return;
        }

        if let Some(item) = self.keyboard_focus.and_then(|old| self.items.get_mut(old)) {
            item.set_highlighted_as_keyboard_focus(false);
        }
        self.keyboard_focus = id.filter(|id| self.items.contains_key(*id));
        if let Some(item) = self.keyboard_focus.and_then(|new| self.items.get_mut(new)) {
            item.set_highlighted_as_keyboard_focus(true);
        }
        self.process_requests();
    }

    // Pointer

    pub fn hovered(&self) -> Option<ItemId> {
        self.hovered
    }

    /// Deliver an event to one item. Returns whether the item handled it.
    pub fn send_event(&mut self, id: ItemId, event: ItemEvent) -> bool {
        let handled = match self.items.get_mut(id) {
            Some(item) => item.handle_event(&self.env, event),
            None => false,
        };
        self.process_requests();
        handled
    }

    /// The pointer moved to `world`; crossing events go to the items it
    /// left and entered.
    pub fn pointer_motion(&mut self, world: DVec2, surface: SurfaceId) {
        let target = self.pick(world);
        self.set_hovered(target, surface);
    }

    /// The pointer left the canvas.
    pub fn pointer_left(&mut self, surface: SurfaceId) {
        self.set_hovered(None, surface);
    }

    fn set_hovered(&mut self, target: Option<ItemId>, surface: SurfaceId) {
        if self.hovered == target {
            return;
        }
        if let Some(old) = self.hovered.take() {
            self.send_event(old, ItemEvent::Leave { surface });
        }
        if let Some(new) = target {
            self.send_event(new, ItemEvent::Enter { surface });
        }
        self.hovered = target;
    }

    // Picking

    /// Topmost item under a world point.
    pub fn pick(&self, world: DVec2) -> Option<ItemId> {
        let canvas = self.env.transform().world_to_canvas(world);
        self.z_order.iter().rev().copied().find(|&id| {
            self.items
                .get(id)
                .is_some_and(|item| item.point(&self.env, canvas) == 0.0)
        })
    }

    /// Items touched by a canvas rectangle, for rubber-band selection.
    pub fn items_in_rect(&self, rect: IRect) -> Vec<ItemId> {
        self.items()
            .filter(|(_, item)| item.hit_test_rectangle(&self.env, rect))
            .map(|(id, _)| id)
            .collect()
    }

    // Layout

    /// Arrange items left to right in rows of equal cells, `width` world
    /// units wide. Cells fit the largest layout bounds, so hovering or
    /// selecting an item never moves the others. Labels on the last row
    /// have nothing below them and are shown in full.
    pub fn lay_out_grid(&mut self, width: f64) {
        let mut cells = Vec::with_capacity(self.order.len());
        let mut largest = DVec2::ZERO;
        for &id in &self.order {
            if let Some(item) = self.items.get_mut(id) {
                let bounds = item.bounds_for_layout(&self.env);
                largest = largest.max(bounds.size());
                cells.push((id, bounds));
            }
        }
        if cells.is_empty() {
            return;
        }

        let cell = largest + DVec2::splat(GRID_CELL_PADDING * 2.0);
        let columns = ((width / cell.x).floor() as usize).max(1);
        let last_row = (cells.len() - 1) / columns;
        log::debug!(
            "grid of {} items: {} columns of {}x{}",
            cells.len(),
            columns,
            cell.x,
            cell.y
        );

        for (index, (id, bounds)) in cells.into_iter().enumerate() {
            let (row, column) = (index / columns, index % columns);
            let target = DVec2::new(
                column as f64 * cell.x + (cell.x - bounds.width()) / 2.0,
                row as f64 * cell.y + GRID_CELL_PADDING,
            );

            if let Some(item) = self.items.get_mut(id) {
                item.translate(target - bounds.min);
                item.set_entire_text(row == last_row);
            }
            self.schedule_update(id);
        }
        self.process_requests();
    }

    // Drawing

    /// Paint every item touching `clip`, bottom first.
    pub fn draw(&mut self, painter: &mut dyn Painter, clip: IRect) {
        for &id in &self.z_order {
            if let Some(item) = self.items.get_mut(id) {
                item.draw(&self.env, painter, clip);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use glam::IVec2;
    use icon_item::{DisplayList, DrawOp};
    use image::{DynamicImage, Rgb, RgbImage};

    use crate::ClickPolicy;

    const SURFACE: SurfaceId = SurfaceId(1);

    fn photo_at(x: f64, y: f64) -> IconItem {
        let mut item = IconItem::at(DVec2::new(x, y));
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb([90, 120, 200])));
        item.set_image(Some(Rc::new(image))).unwrap();
        item.set_editable_text(Some("photo.jpg"));
        item.set_additional_text(Some("2.1 MB"));
        item
    }

    fn container() -> IconContainer {
        IconContainer::new(ContainerConfig::default(), Theme::light())
    }

    fn image_origins(list: &DisplayList) -> Vec<IVec2> {
        list.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { origin, .. } => Some(*origin),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_added_item_is_updated_and_damaged() {
        let mut container = container();
        let id = container.add_item(photo_at(0.0, 0.0));
        assert!(container.has_pending_updates());

        container.update();
        assert!(!container.has_pending_updates());

        let item = container.item(id).unwrap();
        assert_eq!(item.canvas_extent(), IRect::from_coords(-10, 0, 44, 66));
        assert_eq!(item.canvas_rect(), IRect::from_coords(0, 0, 32, 32));
        assert_eq!(container.take_damage(), vec![IRect::from_coords(-10, 0, 45, 67)]);
        assert!(container.take_damage().is_empty());
    }

    #[test]
    fn test_pick_is_top_down_and_follows_raise() {
        let mut container = container();
        let bottom = container.add_item(photo_at(0.0, 0.0));
        let top = container.add_item(photo_at(0.0, 0.0));
        container.update();

        assert_eq!(container.pick(DVec2::new(16.0, 16.0)), Some(top));
        assert_eq!(container.pick(DVec2::new(300.0, 300.0)), None);

        assert!(container.send_event(bottom, ItemEvent::Enter { surface: SURFACE }));
        assert_eq!(container.paint_order(), &[top, bottom]);
        assert_eq!(container.pick(DVec2::new(16.0, 16.0)), Some(bottom));
        assert!(!container.send_event(bottom, ItemEvent::Other));
    }

    #[test]
    fn test_draw_follows_paint_order() {
        let mut container = container();
        let left = container.add_item(photo_at(0.0, 0.0));
        container.add_item(photo_at(100.0, 0.0));
        container.update();

        let clip = IRect::from_coords(-1000, -1000, 1000, 1000);
        let mut list = DisplayList::new();
        container.draw(&mut list, clip);
        assert_eq!(image_origins(&list), vec![IVec2::new(0, 0), IVec2::new(100, 0)]);

        container.send_event(left, ItemEvent::Enter { surface: SURFACE });
        let mut list = DisplayList::new();
        container.draw(&mut list, clip);
        assert_eq!(image_origins(&list), vec![IVec2::new(100, 0), IVec2::new(0, 0)]);

        let mut clipped = DisplayList::new();
        container.draw(&mut clipped, IRect::from_coords(200, 0, 300, 100));
        assert!(clipped.is_empty());
    }

    #[test]
    fn test_zoom_relabels_every_item() {
        let mut container = container();
        let id = container.add_item(photo_at(0.0, 0.0));
        container.update();
        container.take_damage();

        container.set_zoom_level(ZoomLevel::Larger);
        container.set_zoom_level(ZoomLevel::Larger);
        assert_eq!(container.env().label_font().size, 11.0);
        assert!(!container.item(id).unwrap().is_label_measured());
        assert!(!container.item(id).unwrap().has_cached_layouts());
        assert!(container.has_pending_updates());

        container.update();
        let item = container.item(id).unwrap();
        assert_eq!(item.canvas_rect(), IRect::from_coords(0, 0, 32, 32));
        assert_ne!(item.canvas_extent(), IRect::from_coords(-10, 0, 44, 66));
        assert!(container.take_damage().contains(&IRect::from_coords(-10, 0, 45, 67)));
    }

    #[test]
    fn test_focus_change_redraws_selected_items_only() {
        let mut container = container();
        let selected = container.add_item(photo_at(0.0, 0.0));
        container.add_item(photo_at(100.0, 0.0));
        assert!(container.set_selected(selected, true));
        container.update();
        container.take_damage();

        container.set_has_focus(true);
        container.update();
        assert_eq!(container.take_damage(), vec![IRect::from_coords(-10, 0, 45, 67)]);
        assert!(container.has_focus());
    }

    #[test]
    fn test_selection_and_keyboard_focus() {
        let mut container = container();
        let a = container.add_item(photo_at(0.0, 0.0));
        let b = container.add_item(photo_at(100.0, 0.0));

        container.set_selected(b, true);
        assert_eq!(container.selection(), vec![b]);
        assert!(container.is_sole_selection(b));
        container.set_selected(a, true);
        assert_eq!(container.selection(), vec![a, b]);
        assert!(!container.is_sole_selection(b));

        container.set_keyboard_focus(Some(a));
        assert!(container.item(a).unwrap().is_highlighted_as_keyboard_focus());
        container.set_keyboard_focus(Some(b));
        assert!(!container.item(a).unwrap().is_highlighted_as_keyboard_focus());
        assert!(container.item(b).unwrap().is_highlighted_as_keyboard_focus());
        assert_eq!(container.keyboard_focus(), Some(b));
    }

    #[test]
    fn test_hover_sets_and_clears_cursor_in_single_click_mode() {
        let config = ContainerConfig {
            click_policy: ClickPolicy::Single,
            ..ContainerConfig::default()
        };
        let mut container = IconContainer::new(config, Theme::light());
        let id = container.add_item(photo_at(0.0, 0.0));
        container.update();

        container.pointer_motion(DVec2::new(16.0, 16.0), SURFACE);
        assert_eq!(container.hovered(), Some(id));
        assert!(container.item(id).unwrap().is_prelit());
        assert_eq!(container.cursor(SURFACE), Some(CursorKind::Hand));

        container.pointer_motion(DVec2::new(500.0, 500.0), SURFACE);
        assert_eq!(container.hovered(), None);
        assert!(!container.item(id).unwrap().is_prelit());
        assert_eq!(container.cursor(SURFACE), None);
    }

    #[test]
    fn test_grid_layout() {
        let mut container = container();
        let ids: Vec<ItemId> = (0..5).map(|_| container.add_item(photo_at(0.0, 0.0))).collect();

        // cells are 54x66 plus 4 on each side, three to a row
        container.lay_out_grid(200.0);
        let positions: Vec<DVec2> = ids.iter().map(|&id| container.item(id).unwrap().position()).collect();
        assert_eq!(positions[0], DVec2::new(14.0, 4.0));
        assert_eq!(positions[1], DVec2::new(76.0, 4.0));
        assert_eq!(positions[3], DVec2::new(14.0, 78.0));
        assert_eq!(positions[4], DVec2::new(76.0, 78.0));

        let entire: Vec<bool> = ids
            .iter()
            .map(|&id| container.item(id).unwrap().shows_entire_text())
            .collect();
        assert_eq!(entire, vec![false, false, false, true, true]);

        container.update();
        assert_eq!(container.pick(DVec2::new(30.0, 94.0)), Some(ids[3]));
        assert_eq!(container.items_in_rect(IRect::from_coords(0, 0, 60, 60)), vec![ids[0]]);
    }

    #[test]
    fn test_narrow_grid_keeps_one_column() {
        let mut container = container();
        let a = container.add_item(photo_at(0.0, 0.0));
        let b = container.add_item(photo_at(0.0, 0.0));
        container.lay_out_grid(10.0);
        assert_eq!(container.item(a).unwrap().position().x, container.item(b).unwrap().position().x);
        assert!(container.item(b).unwrap().position().y > container.item(a).unwrap().position().y);
    }

    #[test]
    fn test_removed_item_damages_its_extent() {
        let mut container = container();
        let id = container.add_item(photo_at(0.0, 0.0));
        container.update();
        container.take_damage();
        container.pointer_motion(DVec2::new(16.0, 16.0), SURFACE);

        let item = container.remove_item(id).unwrap();
        assert_eq!(item.editable_text(), Some("photo.jpg"));
        assert!(container.take_damage().contains(&IRect::from_coords(-10, 0, 45, 67)));
        assert_eq!(container.hovered(), None);
        assert!(container.is_empty());
        assert_eq!(container.pick(DVec2::new(16.0, 16.0)), None);
        assert!(container.remove_item(id).is_none());
    }

    #[test]
    fn test_item_ids_round_trip_through_u64() {
        let mut container = container();
        let id = container.add_item(IconItem::new());
        assert_eq!(ItemId::from(id.as_u64()), id);
    }
}
