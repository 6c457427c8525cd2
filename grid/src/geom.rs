//! Grid geometry: configuration, legal-placement clamping, and the mapping
//! between grid units and canvas pixels.
//!
//! Stored geometry is always integer grid units. Pixel math is floating point
//! and is rounded before it turns back into a grid delta, so repeated frames
//! never accumulate fractional drift.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{DEFAULT_COLUMNS, DEFAULT_PADDING_PX, DEFAULT_ROW_HEIGHT_PX};
use crate::doc::Rect;
use crate::hit::ResizeDirection;

/// How grid units map to canvas pixels for one render.
///
/// `step_x` is derived from the container width and column count, `step_y`
/// from the row height. Configs are rebuilt whenever the container resizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Total number of columns; rect widths never exceed this.
    pub columns: u32,
    /// Height of one grid row in pixels.
    pub row_height: f64,
    /// Inset of the visible content box inside its cell box, in pixels.
    pub padding: f64,
    /// Width of one grid column in pixels.
    pub step_x: f64,
    /// Height of one grid row in pixels.
    pub step_y: f64,
}

impl GridConfig {
    /// Build a config for a container of `container_width` pixels.
    #[must_use]
    pub fn new(container_width: f64, columns: u32, row_height: f64, padding: f64) -> Self {
        let columns = columns.max(1);
        Self {
            columns,
            row_height,
            padding,
            step_x: container_width / f64::from(columns),
            step_y: row_height,
        }
    }

    /// Default column count, row height and padding for a container width.
    #[must_use]
    pub fn with_container_width(container_width: f64) -> Self {
        Self::new(container_width, DEFAULT_COLUMNS, DEFAULT_ROW_HEIGHT_PX, DEFAULT_PADDING_PX)
    }

    /// Whether pixel ↔ grid conversions are well defined for this config.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.columns >= 1 && self.step_x.is_finite() && self.step_x > 0.0 && self.step_y.is_finite() && self.step_y > 0.0
    }

    /// Grid cell containing a canvas-space point.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_at(&self, canvas: Point) -> (i64, i64) {
        ((canvas.x / self.step_x).floor() as i64, (canvas.y / self.step_y).floor() as i64)
    }

    /// Convert a canvas-pixel delta into a whole grid-unit delta.
    ///
    /// Rounds to nearest so a drag snaps to whichever cell the pointer is
    /// closest to.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn snap_delta(&self, dx_px: f64, dy_px: f64) -> (i64, i64) {
        ((dx_px / self.step_x).round() as i64, (dy_px / self.step_y).round() as i64)
    }

    /// The rect's full cell box in canvas pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rect_px(&self, rect: &Rect) -> PixelRect {
        PixelRect {
            left: rect.x as f64 * self.step_x,
            top: rect.y as f64 * self.step_y,
            right: rect.right() as f64 * self.step_x,
            bottom: rect.bottom() as f64 * self.step_y,
        }
    }

    /// The rect's visible content box: the cell box inset by `padding`.
    ///
    /// The inset is capped at half the box so the result never inverts.
    #[must_use]
    pub fn content_px(&self, rect: &Rect) -> PixelRect {
        let cell = self.rect_px(rect);
        let inset_x = self.padding.max(0.0).min(cell.width() / 2.0);
        let inset_y = self.padding.max(0.0).min(cell.height() / 2.0);
        PixelRect {
            left: cell.left + inset_x,
            top: cell.top + inset_y,
            right: cell.right - inset_x,
            bottom: cell.bottom - inset_y,
        }
    }
}

/// An axis-aligned box in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelRect {
    /// Normalised box spanning two corners given in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Open-interval overlap: boxes that only share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &PixelRect) -> bool {
        self.left < other.right && self.right > other.left && self.top < other.bottom && self.bottom > other.top
    }
}

/// Bounding box of a set of rects in grid units (`right`/`bottom` exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl GridBounds {
    /// Bounds of a single rect.
    #[must_use]
    pub fn of(rect: &Rect) -> Self {
        Self { left: rect.x, top: rect.y, right: rect.right(), bottom: rect.bottom() }
    }

    /// Union of all rects, or `None` when there are none.
    #[must_use]
    pub fn union<'a, I>(rects: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        rects.into_iter().map(Self::of).reduce(|a, b| Self {
            left: a.left.min(b.left),
            top: a.top.min(b.top),
            right: a.right.max(b.right),
            bottom: a.bottom.max(b.bottom),
        })
    }

    /// Open-interval overlap with a rect's cell range.
    #[must_use]
    pub fn intersects(&self, rect: &Rect) -> bool {
        let other = Self::of(rect);
        self.left < other.right && self.right > other.left && self.top < other.bottom && self.bottom > other.top
    }
}

/// Clamp a candidate rect to the legal placement area of a grid.
///
/// Width is clamped to `[1, columns]`, then `x` to `[0, columns - w]`. The grid
/// grows downward, so `y` only has a lower bound; `h` is at least 1. Identity
/// and `z` pass through untouched. Applying it twice gives the same result.
#[must_use]
pub fn clamp_grid(rect: &Rect, columns: u32) -> Rect {
    let columns = i64::from(columns.max(1));
    let w = rect.w.clamp(1, columns);
    Rect {
        x: rect.x.clamp(0, columns - w),
        y: rect.y.max(0),
        w,
        h: rect.h.max(1),
        ..rect.clone()
    }
}

/// Translate a selection as one rigid group.
///
/// The group's combined bounding box is clamped as a whole, so items keep
/// their relative offsets when the group hits a grid edge. Each result still
/// passes through [`clamp_grid`] in case an original was out of bounds.
#[must_use]
pub fn translate_group(originals: &[Rect], dx: i64, dy: i64, columns: u32) -> Vec<Rect> {
    let Some(bounds) = GridBounds::union(originals) else {
        return Vec::new();
    };
    let cols = i64::from(columns.max(1));
    let dx = dx.min(cols.saturating_sub(bounds.right)).max(bounds.left.saturating_neg());
    let dy = dy.max(bounds.top.saturating_neg());
    originals
        .iter()
        .map(|r| clamp_grid(&r.with_geometry(r.x.saturating_add(dx), r.y.saturating_add(dy), r.w, r.h), columns))
        .collect()
}

/// Resize a rect by dragging one corner by a grid delta.
///
/// East/south edges grow or shrink `w`/`h` directly; the east edge stops at
/// the last column. West/north edges move `x`/`y` and consume the opposite
/// dimension so the far edge stays fixed; consumption stops at a size of 1
/// and at the grid origin.
#[must_use]
pub fn resize_from(original: &Rect, dir: ResizeDirection, dx: i64, dy: i64, columns: u32) -> Rect {
    let cols = i64::from(columns.max(1));
    let r = original;

    let (x, w) = if dir.moves_west() {
        let shift = dx.min(r.w.saturating_sub(1)).max(r.x.saturating_neg());
        (r.x.saturating_add(shift), r.w.saturating_sub(shift))
    } else {
        (r.x, r.w.saturating_add(dx).min(cols.saturating_sub(r.x)).max(1))
    };

    let (y, h) = if dir.moves_north() {
        let shift = dy.min(r.h.saturating_sub(1)).max(r.y.saturating_neg());
        (r.y.saturating_add(shift), r.h.saturating_sub(shift))
    } else {
        (r.y, r.h.saturating_add(dy).max(1))
    };

    clamp_grid(&r.with_geometry(x, y, w, h), columns)
}
