//! Transient view state for renderers.
//!
//! Consumers draw the committed layout from the snapshot. What they cannot see
//! there is the gesture in flight: ghost geometry under a drag, the marquee
//! box, and where the resize handles sit. [`Overlay`] packages exactly that, so
//! a renderer never has to reach into the engine's state machine.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use crate::camera::Point;
use crate::doc::{EditorState, Rect};
use crate::geom::PixelRect;
use crate::hit::{ResizeDirection, handle_positions, handle_target};
use crate::input::{GestureKind, GestureState};

/// Everything a renderer needs to draw on top of the committed layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    /// Geometry of rects under an active drag, in grid units.
    pub ghosts: Vec<Rect>,
    /// Marquee box in canvas pixels.
    pub marquee: Option<PixelRect>,
    /// Resize handle centers in canvas pixels.
    pub handles: Vec<(ResizeDirection, Point)>,
}

impl Overlay {
    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ghosts.is_empty() && self.marquee.is_none() && self.handles.is_empty()
    }
}

/// Build the overlay for a snapshot and the engine's current gesture.
///
/// Handles follow the ghost while resizing, are hidden during moves and
/// marquees, and otherwise sit on a sole selection.
#[must_use]
pub fn build(state: &EditorState, gesture: &GestureState) -> Overlay {
    match gesture {
        GestureState::Idle => {
            let handles = match (state.usable_grid(), handle_target(state)) {
                (Some(grid), Some(rect)) => handle_positions(grid, rect).to_vec(),
                _ => Vec::new(),
            };
            Overlay { handles, ..Overlay::default() }
        }
        GestureState::Marqueeing(marquee) => Overlay { marquee: Some(marquee.bounds()), ..Overlay::default() },
        GestureState::Dragging(ghost) => {
            let ghosts: Vec<Rect> = ghost.current_rects().cloned().collect();
            let handles = match (ghost.kind, ghosts.as_slice()) {
                (GestureKind::Resize(_), [only]) => handle_positions(&ghost.grid, only).to_vec(),
                _ => Vec::new(),
            };
            Overlay { ghosts, handles, ..Overlay::default() }
        }
    }
}
