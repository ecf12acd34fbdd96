//! What an item asks of its canvas.

use iconview_core::IRect;

/// A window-system surface an event arrived on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CursorKind {
    Hand,
}

/// Requests queued by an item and drained by the canvas with
/// [`IconItem::take_requests`](crate::IconItem::take_requests).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemRequest {
    /// Run the update pass for this item before the next paint.
    Update,
    /// Repaint this canvas rectangle.
    Redraw(IRect),
    /// Stack the item above every other item, but below the rubber-band
    /// selection overlay.
    RaiseAboveItems,
    SetCursor { surface: SurfaceId, cursor: CursorKind },
    /// Restore the default cursor on a surface.
    ClearCursor { surface: SurfaceId },
}

/// Pointer crossing events delivered to an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemEvent {
    Enter { surface: SurfaceId },
    Leave { surface: SurfaceId },
    /// Any other event; left for the canvas to handle.
    Other,
}
