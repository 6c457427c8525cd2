//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the interaction engine.
//! `Modifiers` and `Button` capture the user's intent at the time of a pointer
//! event. `GestureState` is the active gesture tracked between pointer-down
//! and pointer-up. Each transition builds a new `GestureState` value instead of
//! patching fields of the old one, so the current phase is always readable
//! from a single value.
//!
//! Every active gesture carries a private copy of what it needs (original
//! rects, grid config, camera) taken at pointer-down. Nothing mid-gesture reads
//! the live snapshot, which keeps emitted patches from feeding back into the
//! gesture that produced them.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use indexmap::IndexMap;

use crate::camera::{Camera, Point};
use crate::doc::{Rect, RectId};
use crate::geom::{GridConfig, PixelRect, resize_from, translate_group};
use crate::hit::ResizeDirection;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether this press adds to (or toggles within) the existing selection.
    #[must_use]
    pub fn is_additive(self) -> bool {
        self.ctrl || self.meta || self.shift
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Pointer cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Default,
    /// Over a rect body.
    Grab,
    /// Over a north-west or south-east handle.
    ResizeNwse,
    /// Over a north-east or south-west handle.
    ResizeNesw,
}

impl CursorKind {
    /// Cursor for a resize handle.
    #[must_use]
    pub fn for_handle(dir: ResizeDirection) -> Self {
        match dir {
            ResizeDirection::Nw | ResizeDirection::Se => Self::ResizeNwse,
            ResizeDirection::Ne | ResizeDirection::Sw => Self::ResizeNesw,
        }
    }

    /// CSS cursor keyword.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grab => "grab",
            Self::ResizeNwse => "nwse-resize",
            Self::ResizeNesw => "nesw-resize",
        }
    }
}

/// Rubber-band selection in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Marquee {
    /// Canvas-space corner where the press started.
    pub start: Point,
    /// Canvas-space corner under the pointer.
    pub end: Point,
    /// Whether the press held an additive modifier.
    pub additive: bool,
    /// Live selection at the moment the marquee started. A plain marquee
    /// replaces it on release; an additive one extends it.
    pub base_selection: Vec<RectId>,
    /// Viewport mapping captured at press time.
    pub camera: Camera,
    /// Grid geometry captured at press time.
    pub grid: GridConfig,
}

impl Marquee {
    /// Normalised marquee box in canvas pixels.
    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        PixelRect::from_corners(self.start, self.end)
    }

    /// The same marquee with its second corner under `client`.
    #[must_use]
    pub fn extended_to(&self, client: Point) -> Self {
        Self { end: self.camera.client_to_canvas(client), ..self.clone() }
    }

    /// Whether the marquee is big enough to count as a selection gesture.
    #[must_use]
    pub fn exceeds(&self, threshold_px: f64) -> bool {
        let b = self.bounds();
        b.width() > threshold_px || b.height() > threshold_px
    }
}

/// What a drag does to its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Translate every item as a rigid group.
    Move,
    /// Resize the single item from one corner.
    Resize(ResizeDirection),
}

/// One rect taking part in a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostItem {
    /// Geometry at pointer-down.
    pub original: Rect,
    /// Geometry under the pointer now.
    pub current: Rect,
}

/// In-flight move or resize.
#[derive(Debug, Clone, PartialEq)]
pub struct Ghost {
    /// Rect the press landed on.
    pub primary_id: RectId,
    /// Move or resize.
    pub kind: GestureKind,
    /// Viewport position of the press.
    pub start_client: Point,
    /// Participating rects, in collection order.
    pub items: IndexMap<RectId, GhostItem>,
    /// Latches once the pointer travels past the drag threshold.
    pub was_dragged: bool,
    /// Rect to select if this press resolves as a click-through.
    pub click_through: Option<RectId>,
    /// Selection held back while a click-through is pending; published only
    /// if the press turns into a drag.
    pub select_on_drag: Option<Vec<RectId>>,
    /// Viewport mapping captured at press time.
    pub camera: Camera,
    /// Grid geometry captured at press time.
    pub grid: GridConfig,
}

impl Ghost {
    /// The gesture advanced to a new pointer position.
    ///
    /// The delta is always measured from the press position and applied to
    /// each item's original geometry.
    #[must_use]
    pub fn advanced_to(&self, client: Point, drag_threshold_px: f64) -> Self {
        let dx_client = client.x - self.start_client.x;
        let dy_client = client.y - self.start_client.y;
        let was_dragged = self.was_dragged || dx_client.hypot(dy_client) > drag_threshold_px;

        let (dx, dy) = self.grid.snap_delta(
            self.camera.client_dist_to_canvas(dx_client),
            self.camera.client_dist_to_canvas(dy_client),
        );

        let currents: Vec<Rect> = match self.kind {
            GestureKind::Move => {
                let originals: Vec<Rect> = self.items.values().map(|i| i.original.clone()).collect();
                translate_group(&originals, dx, dy, self.grid.columns)
            }
            GestureKind::Resize(dir) => self
                .items
                .values()
                .map(|i| resize_from(&i.original, dir, dx, dy, self.grid.columns))
                .collect(),
        };

        let items = self
            .items
            .iter()
            .zip(currents)
            .map(|((id, item), current)| (*id, GhostItem { original: item.original.clone(), current }))
            .collect();

        Self { items, was_dragged, ..self.clone() }
    }

    /// Current geometry of every item, in collection order.
    pub fn current_rects(&self) -> impl Iterator<Item = &Rect> {
        self.items.values().map(|i| &i.current)
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is dragging out a rubber-band selection.
    Marqueeing(Marquee),
    /// The user is moving or resizing rects.
    Dragging(Ghost),
}

impl GestureState {
    /// Whether no gesture is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
