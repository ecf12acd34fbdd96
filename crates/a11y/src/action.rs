//! Item actions and the queue that runs them outside the request that
//! asked for them.

use std::collections::VecDeque;

use canvas::{IconContainer, ItemId};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ItemAction {
    Open,
    Menu,
}

impl ItemAction {
    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn default_description(self) -> &'static str {
        match self {
            ItemAction::Open => "Open item",
            ItemAction::Menu => "Popup context menu",
        }
    }
}

pub const ACTION_COUNT: usize = 2;

/// Actions an assistive technology can invoke on an item.
pub trait AccessibleAction {
    fn action_count(&self) -> usize {
        ACTION_COUNT
    }

    fn action_name(&self, index: usize) -> Option<String> {
        ItemAction::from_index(index).map(|action| action.to_string())
    }

    fn action_description(&self, index: usize) -> Option<&str>;

    /// Replace an action's description. False for an unknown action.
    fn set_action_description(&mut self, index: usize, description: &str) -> bool;

    /// Queue an action. False for an unknown action.
    fn do_action(&mut self, index: usize) -> bool;
}

/// What the container should do for a drained action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Open the item
    Activate(ItemId),
    /// Pop up the context menu of the selection
    ContextMenu(ItemId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct QueuedAction {
    id: ItemId,
    action: ItemAction,
}

/// Actions waiting to run, oldest first.
///
/// Only one drain is ever scheduled: [`ActionQueue::push`] reports when the
/// caller has to schedule one, and [`ActionQueue::drain`] clears that state.
#[derive(Debug, Default)]
pub struct ActionQueue {
    queue: VecDeque<QueuedAction>,
    drain_scheduled: bool,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` for `id`. Returns true when a drain must be scheduled.
    pub fn push(&mut self, id: ItemId, action: ItemAction) -> bool {
        self.queue.push_back(QueuedAction { id, action });
        if self.drain_scheduled {
            false
        } else {
            self.drain_scheduled = true;
            true
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_drain_scheduled(&self) -> bool {
        self.drain_scheduled
    }

    /// Run queued actions in order and return how many ran.
    ///
    /// A context menu only pops up for the sole selected item. Any other
    /// menu action is dropped and ends the drain; the actions after it stay
    /// queued for the next drain.
    pub fn drain(&mut self, container: &IconContainer, mut handler: impl FnMut(ActionOutcome)) -> usize {
        self.drain_scheduled = false;

        let mut ran = 0;
        while let Some(QueuedAction { id, action }) = self.queue.pop_front() {
            match action {
                ItemAction::Open => handler(ActionOutcome::Activate(id)),
                ItemAction::Menu => {
                    if !container.is_sole_selection(id) {
                        log::debug!("dropping menu action, {:?} is not the only selected item", id);
                        return ran;
                    }
                    handler(ActionOutcome::ContextMenu(id));
                }
            }
            ran += 1;
        }
        ran
    }
}
