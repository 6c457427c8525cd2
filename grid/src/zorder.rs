//! Wheel-driven z-order policies.
//!
//! Two policies are supported and the engine uses exactly one, chosen by
//! configuration:
//!
//! - [`ZOrderPolicy::Step`] nudges every selected rect's `z` by one per wheel
//!   notch and never goes below zero.
//! - [`ZOrderPolicy::Stack`] swaps the selection past its nearest neighbor in
//!   the overlapping stack. Only the slice of the stack between the selection
//!   and that neighbor is renumbered; when ties force it upward, every rect
//!   painted above the slice is lifted by the same amount so untouched rects
//!   keep their order. All changed z-values are returned together; callers
//!   emit them as one patch or not at all.
//!
//! Wheel-up brings the selection forward (raises `z`); wheel-down sends it
//! backward.

#[cfg(test)]
#[path = "zorder_test.rs"]
mod zorder_test;

use std::str::FromStr;

use crate::doc::{EditorState, Rect, RectPatch};
use crate::geom::GridBounds;

/// How a wheel notch reorders the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZOrderPolicy {
    /// Per-item `z ± 1`, clamped at 0.
    #[default]
    Step,
    /// Stack-aware swap with the nearest overlapping neighbor.
    Stack,
}

/// Error returned when parsing a [`ZOrderPolicy`] name.
#[derive(Debug, thiserror::Error)]
#[error("unknown z-order policy '{0}' (expected 'step' or 'stack')")]
pub struct UnknownPolicy(pub String);

impl FromStr for ZOrderPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "step" => Ok(Self::Step),
            "stack" => Ok(Self::Stack),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

/// Direction of a reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZDirection {
    /// Toward the viewer (higher `z`).
    Forward,
    /// Away from the viewer (lower `z`).
    Backward,
}

impl ZDirection {
    /// Direction for a vertical wheel delta. Zero and NaN deltas do nothing.
    #[must_use]
    pub fn from_wheel(dy: f64) -> Option<Self> {
        if dy < 0.0 {
            Some(Self::Forward)
        } else if dy > 0.0 {
            Some(Self::Backward)
        } else {
            None
        }
    }
}

/// Compute the z patches for reordering the current selection.
///
/// Returns an empty list when nothing would change.
#[must_use]
pub fn reorder(state: &EditorState, policy: ZOrderPolicy, direction: ZDirection) -> Vec<RectPatch> {
    match policy {
        ZOrderPolicy::Step => step(state, direction),
        ZOrderPolicy::Stack => stack_swap(state, direction),
    }
}

fn step(state: &EditorState, direction: ZDirection) -> Vec<RectPatch> {
    state
        .rects
        .values()
        .filter(|r| state.is_selected(&r.id))
        .filter_map(|r| {
            let z = match direction {
                ZDirection::Forward => r.z.saturating_add(1),
                ZDirection::Backward if r.z > 0 => r.z - 1,
                ZDirection::Backward => r.z,
            };
            (z != r.z).then(|| z_patch(r, z))
        })
        .collect()
}

fn stack_swap(state: &EditorState, direction: ZDirection) -> Vec<RectPatch> {
    let Some(bounds) = GridBounds::union(state.selected_rects()) else {
        return Vec::new();
    };

    // (collection index, rect) for every stack member, bottom to top.
    let mut order: Vec<(usize, &Rect)> = state
        .rects
        .values()
        .enumerate()
        .filter(|(_, r)| state.is_selected(&r.id) || bounds.intersects(r))
        .collect();
    order.sort_by(|a, b| a.1.z.cmp(&b.1.z).then_with(|| a.0.cmp(&b.0)));

    let selected_at: Vec<usize> = order
        .iter()
        .enumerate()
        .filter(|(_, (_, r))| state.is_selected(&r.id))
        .map(|(pos, _)| pos)
        .collect();
    let (Some(&lowest), Some(&highest)) = (selected_at.first(), selected_at.last()) else {
        return Vec::new();
    };

    // The slice [lo, hi] of the stack that changes hands.
    let (lo, hi) = match direction {
        ZDirection::Forward => {
            let Some(neighbor) = (highest + 1..order.len()).find(|&p| !state.is_selected(&order[p].1.id)) else {
                return Vec::new();
            };
            (lowest, neighbor)
        }
        ZDirection::Backward => {
            let Some(neighbor) = (0..lowest).rev().find(|&p| !state.is_selected(&order[p].1.id)) else {
                return Vec::new();
            };
            (neighbor, highest)
        }
    };

    let mut slice = order[lo..=hi].to_vec();
    match direction {
        ZDirection::Forward => slice.rotate_right(1),
        ZDirection::Backward => slice.rotate_left(1),
    }

    // Reuse the slice's own z-values, bumping ties so the new order is strict
    // and sits above whatever was directly below the slice.
    let mut changed: Vec<(usize, RectPatch)> = Vec::new();
    let mut prev: Option<i64> = lo.checked_sub(1).map(|below| order[below].1.z);
    for (&(idx, rect), &(_, base)) in slice.iter().zip(&order[lo..=hi]) {
        let z = prev.map_or(base.z, |p| base.z.max(p.saturating_add(1)));
        prev = Some(z);
        if z != rect.z {
            changed.push((idx, z_patch(rect, z)));
        }
    }

    // Lift everything painted above the old slice top, stack member or not,
    // far enough to stay above the renumbered slice.
    let (top_idx, top) = order[hi];
    let above: Vec<(usize, &Rect)> = state
        .rects
        .values()
        .enumerate()
        .filter(|&(idx, r)| (r.z, idx) > (top.z, top_idx))
        .collect();
    let lift = match (prev, above.iter().map(|(_, r)| r.z).min()) {
        (Some(slice_top), Some(floor)) => slice_top.saturating_add(1).saturating_sub(floor).max(0),
        _ => 0,
    };
    if lift > 0 {
        for (idx, rect) in above {
            changed.push((idx, z_patch(rect, rect.z.saturating_add(lift))));
        }
    }

    changed.sort_by_key(|(idx, _)| *idx);
    changed.into_iter().map(|(_, patch)| patch).collect()
}

fn z_patch(rect: &Rect, z: i64) -> RectPatch {
    RectPatch { id: rect.id, rect: Rect { z, ..rect.clone() } }
}
