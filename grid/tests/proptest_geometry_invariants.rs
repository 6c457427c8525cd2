//! Property-based invariant tests for grid geometry and z-order.
//!
//! 1. `clamp_grid` output is always legal.
//! 2. `clamp_grid` is idempotent.
//! 3. Group moves keep the group rigid and legal.
//! 4. Resizing from a west/north corner pins the opposite edge.
//! 5. Resizing keeps rects legal.
//! 6. Whole-step pixel deltas snap to exact cell counts.
//! 7. Step reordering never produces a negative z.
//! 8. The head of a hit stack has the highest z under the cell.

use grid::doc::{EditorState, Rect};
use grid::geom::{GridConfig, clamp_grid, resize_from, translate_group};
use grid::hit::{ResizeDirection, stack_at};
use grid::zorder::{ZDirection, ZOrderPolicy, reorder};
use proptest::prelude::*;
use uuid::Uuid;

// ── Helpers ─────────────────────────────────────────────────────────────

fn rect(x: i64, y: i64, w: i64, h: i64, z: i64) -> Rect {
    Rect { id: Uuid::new_v4(), content_id: "block".into(), x, y, w, h, z }
}

fn is_legal(r: &Rect, columns: u32) -> bool {
    let cols = i64::from(columns);
    r.x >= 0 && r.y >= 0 && r.w >= 1 && r.h >= 1 && r.w <= cols && r.x + r.w <= cols
}

/// Any geometry at all, including negative and oversized values.
fn wild_rect() -> impl Strategy<Value = Rect> {
    (-50i64..100, -50i64..100, -5i64..80, -5i64..40, 0i64..10).prop_map(|(x, y, w, h, z)| rect(x, y, w, h, z))
}

/// A column count together with a rect that already fits it.
fn legal_rect() -> impl Strategy<Value = (u32, Rect)> {
    (1u32..=48).prop_flat_map(|columns| {
        let cols = i64::from(columns);
        (1i64..=cols, 0i64..60, 1i64..20).prop_flat_map(move |(w, y, h)| {
            (0i64..=cols - w).prop_map(move |x| (columns, rect(x, y, w, h, 0)))
        })
    })
}

fn legal_group() -> impl Strategy<Value = (u32, Vec<Rect>)> {
    (4u32..=48).prop_flat_map(|columns| {
        let cols = i64::from(columns);
        proptest::collection::vec(
            (1i64..=cols, 0i64..60, 1i64..20).prop_flat_map(move |(w, y, h)| {
                (0i64..=cols - w).prop_map(move |x| rect(x, y, w, h, 0))
            }),
            1..6,
        )
        .prop_map(move |rects| (columns, rects))
    })
}

fn direction() -> impl Strategy<Value = ResizeDirection> {
    prop_oneof![
        Just(ResizeDirection::Nw),
        Just(ResizeDirection::Ne),
        Just(ResizeDirection::Sw),
        Just(ResizeDirection::Se),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. clamp_grid
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clamp_output_is_legal(r in wild_rect(), columns in 1u32..=48) {
        let out = clamp_grid(&r, columns);
        prop_assert!(is_legal(&out, columns), "illegal {:?} for {} columns", out, columns);
        prop_assert_eq!(out.id, r.id);
        prop_assert_eq!(out.z, r.z);
    }

    #[test]
    fn clamp_is_idempotent(r in wild_rect(), columns in 1u32..=48) {
        let once = clamp_grid(&r, columns);
        let twice = clamp_grid(&once, columns);
        prop_assert_eq!(once, twice);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Group moves
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn group_move_is_rigid_and_legal((columns, rects) in legal_group(), dx in -60i64..60, dy in -60i64..60) {
        let moved = translate_group(&rects, dx, dy, columns);
        prop_assert_eq!(moved.len(), rects.len());

        let shift_x = moved[0].x - rects[0].x;
        let shift_y = moved[0].y - rects[0].y;
        for (before, after) in rects.iter().zip(&moved) {
            prop_assert!(is_legal(after, columns), "illegal {:?}", after);
            prop_assert_eq!(after.x - before.x, shift_x);
            prop_assert_eq!(after.y - before.y, shift_y);
            prop_assert_eq!((after.w, after.h), (before.w, before.h));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4–5. Resize
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_keeps_rect_legal((columns, r) in legal_rect(), dir in direction(), dx in -60i64..60, dy in -60i64..60) {
        let out = resize_from(&r, dir, dx, dy, columns);
        prop_assert!(is_legal(&out, columns), "illegal {:?} after {:?} {} {}", out, dir, dx, dy);
    }

    #[test]
    fn resize_pins_opposite_edges((columns, r) in legal_rect(), dir in direction(), dx in -60i64..60, dy in -60i64..60) {
        let out = resize_from(&r, dir, dx, dy, columns);
        if dir.moves_west() {
            prop_assert_eq!(out.x + out.w, r.x + r.w);
        } else {
            prop_assert_eq!(out.x, r.x);
        }
        if dir.moves_north() {
            prop_assert_eq!(out.y + out.h, r.y + r.h);
        } else {
            prop_assert_eq!(out.y, r.y);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Snapping
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn whole_steps_snap_exactly(cells_x in -40i64..40, cells_y in -40i64..40, columns in 1u32..=48) {
        let grid = GridConfig::new(960.0, columns, 24.0, 0.0);
        #[allow(clippy::cast_precision_loss)]
        let (px, py) = (cells_x as f64 * grid.step_x, cells_y as f64 * grid.step_y);
        prop_assert_eq!(grid.snap_delta(px, py), (cells_x, cells_y));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7–8. Z-order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn step_backward_never_goes_negative(zs in proptest::collection::vec(0i64..4, 1..8)) {
        let mut state = EditorState::new(GridConfig::new(720.0, 36, 20.0, 0.0));
        for z in &zs {
            state.insert(rect(0, 0, 2, 2, *z));
        }
        state.selected_ids = state.rects.keys().copied().collect();
        for patch in reorder(&state, ZOrderPolicy::Step, ZDirection::Backward) {
            prop_assert!(patch.rect.z >= 0);
        }
    }

    #[test]
    fn stack_head_has_highest_z(zs in proptest::collection::vec(-5i64..5, 1..8)) {
        let mut state = EditorState::new(GridConfig::new(720.0, 36, 20.0, 0.0));
        for z in &zs {
            state.insert(rect(0, 0, 3, 3, *z));
        }
        let stack = stack_at(&state, 1, 1);
        prop_assert_eq!(stack.len(), zs.len());
        let top = state.get(&stack[0]).map(|r| r.z);
        prop_assert_eq!(top, zs.iter().copied().max());
    }
}
