//! Accessible view of one icon: name, states, image and text
//! geometry, and the actions an assistive technology can invoke.

use canvas::{CanvasEnv, IconContainer, ItemId};
use glam::IVec2;
use icon_item::IconItem;
use iconview_core::IRect;
use slotmap::SecondaryMap;
use smallvec::SmallVec;
use strum_macros::Display;

use crate::action::{AccessibleAction, ActionOutcome, ActionQueue, ItemAction, ACTION_COUNT};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Icon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum State {
    Focused,
    Selected,
    /// The item is gone
    Defunct,
}

/// The icon image of an item.
pub trait AccessibleImage {
    fn image_description(&self) -> Option<String>;

    fn set_image_description(&mut self, description: &str);

    /// Pixel size of the image, zero without one.
    fn image_size(&self) -> IVec2;

    /// Canvas position of the image. `None` before the item was placed.
    fn image_position(&mut self) -> Option<IVec2>;
}

/// The label as one string: the editable text followed by the additional
/// text. Points and extents are in canvas pixels.
pub trait AccessibleText {
    fn text(&self) -> String;

    fn character_count(&self) -> usize;

    fn offset_at_point(&mut self, point: IVec2) -> usize;

    fn character_extents(&mut self, offset: usize) -> Option<IRect>;
}

type ImageDescriber = Box<dyn Fn(&IconItem) -> Option<String>>;

#[derive(Default)]
struct AccessibleDetails {
    image_description: Option<String>,
    action_descriptions: [Option<String>; ACTION_COUNT],
}

/// Accessible state for the items of one container: description overrides
/// and the pending actions.
#[derive(Default)]
pub struct IconAccessibility {
    details: SecondaryMap<ItemId, AccessibleDetails>,
    actions: ActionQueue,
    /// Fallback for images without a description of their own
    describe: Option<ImageDescriber>,
}

impl IconAccessibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image_describer(mut self, describe: impl Fn(&IconItem) -> Option<String> + 'static) -> Self {
        self.describe = Some(Box::new(describe));
        self
    }

    /// The accessible view of an item, `None` when the container does not
    /// hold it.
    pub fn accessible<'a>(&'a mut self, container: &'a mut IconContainer, id: ItemId) -> Option<AccessibleIcon<'a>> {
        container.item(id)?;
        let details = self.details.entry(id)?.or_default();
        Some(AccessibleIcon {
            id,
            container,
            details,
            actions: &mut self.actions,
            describe: self.describe.as_deref(),
        })
    }

    /// Drop what was kept for a removed item.
    pub fn forget(&mut self, id: ItemId) {
        self.details.remove(id);
    }

    pub fn actions(&self) -> &ActionQueue {
        &self.actions
    }

    /// Run the queued actions; see [`ActionQueue::drain`].
    pub fn drain_actions(&mut self, container: &IconContainer, handler: impl FnMut(ActionOutcome)) -> usize {
        self.actions.drain(container, handler)
    }
}

/// States of an item. An item counts as focused when it has the keyboard
/// focus, or, while no item has it, when it is the only selected item.
pub fn state_set(container: &IconContainer, id: ItemId) -> SmallVec<[State; 2]> {
    let mut states = SmallVec::new();
    let Some(item) = container.item(id) else {
        states.push(State::Defunct);
        return states;
    };

    if item.is_highlighted_as_keyboard_focus()
        || (container.keyboard_focus().is_none() && container.is_sole_selection(id))
    {
        states.push(State::Focused);
    }
    if item.is_highlighted_for_selection() {
        states.push(State::Selected);
    }
    states
}

pub struct AccessibleIcon<'a> {
    id: ItemId,
    container: &'a mut IconContainer,
    details: &'a mut AccessibleDetails,
    actions: &'a mut ActionQueue,
    describe: Option<&'a dyn Fn(&IconItem) -> Option<String>>,
}

impl AccessibleIcon<'_> {
    pub fn id(&self) -> ItemId {
        self.id
    }

    fn item(&self) -> Option<&IconItem> {
        self.container.item(self.id)
    }

    fn with_item<R>(&mut self, f: impl FnOnce(&mut IconItem, &CanvasEnv) -> R) -> Option<R> {
        self.container.with_item(self.id, f)
    }

    /// The file name.
    pub fn name(&self) -> Option<String> {
        self.item()?.editable_text().map(str::to_owned)
    }

    pub fn description(&self) -> Option<String> {
        self.item()?.additional_text().map(str::to_owned)
    }

    pub fn role(&self) -> Role {
        Role::Icon
    }

    pub fn states(&self) -> SmallVec<[State; 2]> {
        state_set(&*self.container, self.id)
    }

    /// Position among the container's items, in insertion order.
    pub fn index_in_parent(&self) -> Option<usize> {
        self.container.items().position(|(id, _)| id == self.id)
    }
}

impl AccessibleImage for AccessibleIcon<'_> {
    fn image_description(&self) -> Option<String> {
        if let Some(description) = &self.details.image_description {
            return Some(description.clone());
        }
        let describe = self.describe?;
        describe(self.item()?)
    }

    fn set_image_description(&mut self, description: &str) {
        self.details.image_description = Some(description.to_owned());
    }

    fn image_size(&self) -> IVec2 {
        self.item()
            .and_then(IconItem::image_size)
            .unwrap_or(IVec2::ZERO)
    }

    fn image_position(&mut self) -> Option<IVec2> {
        let (extent, icon, text, has_label) = self.with_item(|item, env| {
            (
                item.canvas_extent(),
                item.canvas_rect(),
                item.text_rect(),
                item.label_metrics(env).text_width != 0,
            )
        })?;
        if icon.min.x == 0 && icon.max.x == 0 {
            return None;
        }

        // a label wider than the icon starts the extent left of the image
        let offset = if has_label {
            (icon.min - text.min).max(IVec2::ZERO)
        } else {
            IVec2::ZERO
        };
        Some(extent.min + offset)
    }
}

impl AccessibleText for AccessibleIcon<'_> {
    fn text(&self) -> String {
        let Some(item) = self.item() else {
            return String::new();
        };
        let mut text = item.editable_text().unwrap_or_default().to_owned();
        text.push_str(item.additional_text().unwrap_or_default());
        text
    }

    fn character_count(&self) -> usize {
        self.text().chars().count()
    }

    fn offset_at_point(&mut self, point: IVec2) -> usize {
        self.with_item(|item, env| {
            let origin = item.canvas_extent().min;
            item.offset_at_point(env, point - origin)
        })
        .unwrap_or(0)
    }

    fn character_extents(&mut self, offset: usize) -> Option<IRect> {
        self.with_item(|item, env| {
            let origin = item.canvas_extent().min;
            item.character_extents(env, offset).map(|rect| rect.translate(origin))
        })
        .flatten()
    }
}

impl AccessibleAction for AccessibleIcon<'_> {
    fn action_description(&self, index: usize) -> Option<&str> {
        let action = ItemAction::from_index(index)?;
        Some(
            self.details.action_descriptions[index]
                .as_deref()
                .unwrap_or(action.default_description()),
        )
    }

    fn set_action_description(&mut self, index: usize, description: &str) -> bool {
        if ItemAction::from_index(index).is_none() {
            log::warn!("no action {} to describe on {:?}", index, self.id);
            return false;
        }
        self.details.action_descriptions[index] = Some(description.to_owned());
        true
    }

    fn do_action(&mut self, index: usize) -> bool {
        let Some(action) = ItemAction::from_index(index) else {
            log::warn!("invalid action {} requested on {:?}", index, self.id);
            return false;
        };
        if self.actions.push(self.id, action) {
            log::trace!("scheduling accessible action drain");
        }
        true
    }
}
