#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::{EditorState, Rect, RectId};
use crate::geom::{GridConfig, PixelRect};

/// Which part of a rect was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeDirection),
}

/// Corner a resize handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeDirection {
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeDirection {
    /// All corners, in handle hit-test priority order.
    pub const ALL: [Self; 4] = [Self::Nw, Self::Ne, Self::Sw, Self::Se];

    /// Whether dragging this corner moves the west (left) edge.
    #[must_use]
    pub fn moves_west(self) -> bool {
        matches!(self, Self::Nw | Self::Sw)
    }

    /// Whether dragging this corner moves the north (top) edge.
    #[must_use]
    pub fn moves_north(self) -> bool {
        matches!(self, Self::Nw | Self::Ne)
    }

    /// Position of this corner on a content box.
    #[must_use]
    pub fn corner_of(self, bounds: &PixelRect) -> Point {
        let x = if self.moves_west() { bounds.left } else { bounds.right };
        let y = if self.moves_north() { bounds.top } else { bounds.bottom };
        Point::new(x, y)
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub rect_id: RectId,
    pub part: HitPart,
}

/// Every rect covering grid cell `(cx, cy)`, topmost first.
///
/// Ordered by descending `z`. Equal `z` is broken by collection order: the
/// later rect paints last, so it comes first here.
#[must_use]
pub fn stack_at(state: &EditorState, cx: i64, cy: i64) -> Vec<RectId> {
    let mut hits: Vec<(i64, usize, RectId)> = state
        .rects
        .values()
        .enumerate()
        .filter(|(_, r)| r.contains_cell(cx, cy))
        .map(|(idx, r)| (r.z, idx, r.id))
        .collect();
    hits.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
    hits.into_iter().map(|(_, _, id)| id).collect()
}

/// Resize handle positions (canvas pixels) for a rect.
#[must_use]
pub fn handle_positions(grid: &GridConfig, rect: &Rect) -> [(ResizeDirection, Point); 4] {
    let bounds = grid.content_px(rect);
    ResizeDirection::ALL.map(|dir| (dir, dir.corner_of(&bounds)))
}

/// The sole selected rect, when exactly one live rect is selected. Only then
/// are resize handles shown.
#[must_use]
pub fn handle_target(state: &EditorState) -> Option<&Rect> {
    let mut live = state.selected_rects();
    let only = live.next()?;
    live.all(|r| r.id == only.id).then_some(only)
}

/// Test which handle or rect (if any) is under a canvas-space point.
///
/// Handles of a sole selection are checked first, within `handle_radius`
/// canvas pixels on each axis. Bodies are resolved in cell space and the
/// topmost covering rect wins.
#[must_use]
pub fn hit_test(state: &EditorState, grid: &GridConfig, canvas_pt: Point, handle_radius: f64) -> Option<Hit> {
    if let Some(rect) = handle_target(state) {
        for (dir, pos) in handle_positions(grid, rect) {
            if (canvas_pt.x - pos.x).abs() <= handle_radius && (canvas_pt.y - pos.y).abs() <= handle_radius {
                return Some(Hit { rect_id: rect.id, part: HitPart::ResizeHandle(dir) });
            }
        }
    }

    let (cx, cy) = grid.cell_at(canvas_pt);
    stack_at(state, cx, cy)
        .first()
        .map(|id| Hit { rect_id: *id, part: HitPart::Body })
}

/// Rects whose cell box overlaps a marquee, in collection order.
#[must_use]
pub fn marquee_hits(state: &EditorState, grid: &GridConfig, marquee: &PixelRect) -> Vec<RectId> {
    state
        .rects
        .values()
        .filter(|r| grid.rect_px(r).overlaps(marquee))
        .map(|r| r.id)
        .collect()
}
