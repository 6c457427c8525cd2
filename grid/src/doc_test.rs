#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::input::CursorKind;

fn make_rect(x: i64, y: i64, w: i64, h: i64, z: i64) -> Rect {
    Rect { id: Uuid::new_v4(), content_id: "block".into(), x, y, w, h, z }
}

fn grid() -> GridConfig {
    GridConfig::new(720.0, 36, 20.0, 4.0)
}

fn state_with(rects: &[Rect]) -> EditorState {
    let mut state = EditorState::new(grid());
    for r in rects {
        state.insert(r.clone());
    }
    state
}

// =============================================================
// Rect
// =============================================================

#[test]
fn contains_cell_is_half_open() {
    let r = make_rect(2, 3, 2, 1, 0);
    assert!(r.contains_cell(2, 3));
    assert!(r.contains_cell(3, 3));
    assert!(!r.contains_cell(4, 3));
    assert!(!r.contains_cell(2, 4));
    assert!(!r.contains_cell(1, 3));
}

#[test]
fn edges_saturate_at_the_far_end_of_the_grid() {
    let r = make_rect(2, i64::MAX - 1, 3, 5, 0);
    assert_eq!(r.right(), 5);
    assert_eq!(r.bottom(), i64::MAX);
    assert!(r.contains_cell(2, i64::MAX - 1));
    assert!(!r.contains_cell(2, 0));
}

#[test]
fn with_geometry_keeps_identity_and_z() {
    let r = make_rect(0, 0, 1, 1, 9);
    let moved = r.with_geometry(3, 4, 5, 6);
    assert_eq!(moved.id, r.id);
    assert_eq!(moved.z, 9);
    assert_eq!((moved.x, moved.y, moved.w, moved.h), (3, 4, 5, 6));
}

#[test]
fn rect_serde_field_names() {
    let r = make_rect(1, 2, 3, 4, 5);
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["content_id"], "block");
    assert_eq!(v["x"], 1);
    assert_eq!(v["z"], 5);
}

// =============================================================
// Mode
// =============================================================

#[test]
fn mode_default_is_design() {
    assert_eq!(Mode::default(), Mode::Design);
}

#[test]
fn mode_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Mode::Render).unwrap(), "\"render\"");
    let back: Mode = serde_json::from_str("\"design\"").unwrap();
    assert_eq!(back, Mode::Design);
}

// =============================================================
// EditorState: construction and queries
// =============================================================

#[test]
fn default_state_has_no_grid() {
    let state = EditorState::default();
    assert!(state.grid.is_none());
    assert!(state.usable_grid().is_none());
    assert!(state.is_empty());
    assert_eq!(state.zoom, 1.0);
}

#[test]
fn new_state_has_usable_grid() {
    let state = EditorState::new(grid());
    assert!(state.usable_grid().is_some());
    assert_eq!(state.mode, Mode::Design);
}

#[test]
fn unusable_grid_is_hidden() {
    let state = EditorState::new(GridConfig::new(0.0, 36, 20.0, 0.0));
    assert!(state.grid.is_some());
    assert!(state.usable_grid().is_none());
}

#[test]
fn insert_replaces_in_place() {
    let a = make_rect(0, 0, 1, 1, 0);
    let b = make_rect(1, 0, 1, 1, 0);
    let mut state = state_with(&[a.clone(), b.clone()]);
    state.insert(Rect { x: 9, ..a.clone() });
    assert_eq!(state.len(), 2);
    assert_eq!(state.index_of(&a.id), Some(0));
    assert_eq!(state.get(&a.id).map(|r| r.x), Some(9));
}

#[test]
fn selected_rects_skip_stale_ids() {
    let a = make_rect(0, 0, 1, 1, 0);
    let mut state = state_with(&[a.clone()]);
    state.selected_ids = vec![Uuid::new_v4(), a.id];
    let ids: Vec<RectId> = state.selected_rects().map(|r| r.id).collect();
    assert_eq!(ids, vec![a.id]);
}

// =============================================================
// EditorState: with_selection
// =============================================================

#[test]
fn with_selection_replaces_wholesale() {
    let a = make_rect(0, 0, 1, 1, 0);
    let b = make_rect(1, 0, 1, 1, 0);
    let mut state = state_with(&[a.clone(), b.clone()]);
    state.selected_ids = vec![a.id];
    let next = state.with_selection(&[b.id]);
    assert_eq!(next.selected_ids, vec![b.id]);
    assert_eq!(state.selected_ids, vec![a.id]);
}

#[test]
fn with_selection_drops_unknown_and_duplicates() {
    let a = make_rect(0, 0, 1, 1, 0);
    let state = state_with(&[a.clone()]);
    let next = state.with_selection(&[a.id, Uuid::new_v4(), a.id]);
    assert_eq!(next.selected_ids, vec![a.id]);
}

// =============================================================
// EditorState: with_patches
// =============================================================

#[test]
fn with_patches_applies_all_at_once() {
    let a = make_rect(0, 0, 1, 1, 0);
    let b = make_rect(1, 0, 1, 1, 0);
    let state = state_with(&[a.clone(), b.clone()]);
    let patches = vec![
        RectPatch { id: a.id, rect: Rect { x: 5, ..a.clone() } },
        RectPatch { id: b.id, rect: Rect { z: 3, ..b.clone() } },
    ];
    let next = state.with_patches(&patches);
    assert_eq!(next.get(&a.id).map(|r| r.x), Some(5));
    assert_eq!(next.get(&b.id).map(|r| r.z), Some(3));
    assert_eq!(state.get(&a.id).map(|r| r.x), Some(0));
}

#[test]
fn with_patches_ignores_unknown_ids() {
    let a = make_rect(0, 0, 1, 1, 0);
    let state = state_with(&[a.clone()]);
    let stranger = make_rect(4, 4, 1, 1, 0);
    let next = state.with_patches(&[RectPatch { id: stranger.id, rect: stranger }]);
    assert_eq!(next, state);
}

#[test]
fn with_patches_forces_patch_id() {
    let a = make_rect(0, 0, 1, 1, 0);
    let state = state_with(&[a.clone()]);
    let other = Uuid::new_v4();
    let next = state.with_patches(&[RectPatch { id: a.id, rect: Rect { id: other, x: 2, ..a.clone() } }]);
    assert_eq!(next.get(&a.id).map(|r| r.id), Some(a.id));
    assert_eq!(next.get(&a.id).map(|r| r.x), Some(2));
}

#[test]
fn with_patches_keeps_collection_order() {
    let a = make_rect(0, 0, 1, 1, 0);
    let b = make_rect(1, 0, 1, 1, 0);
    let state = state_with(&[a.clone(), b.clone()]);
    let next = state.with_patches(&[RectPatch { id: a.id, rect: Rect { z: 99, ..a.clone() } }]);
    assert_eq!(next.index_of(&a.id), Some(0));
    assert_eq!(next.index_of(&b.id), Some(1));
}

// =============================================================
// EditorState: with_grid
// =============================================================

#[test]
fn with_grid_clamps_to_narrower_grid() {
    let a = make_rect(30, 0, 6, 2, 0);
    let state = state_with(&[a.clone()]);
    let next = state.with_grid(GridConfig::new(240.0, 12, 20.0, 0.0));
    assert_eq!(next.grid.map(|g| g.columns), Some(12));
    assert_eq!(next.get(&a.id).map(|r| (r.x, r.w)), Some((6, 6)));
}

#[test]
fn with_grid_on_missing_grid_installs_it() {
    let a = make_rect(0, 0, 2, 2, 0);
    let mut state = EditorState::default();
    state.insert(a.clone());
    let next = state.with_grid(grid());
    assert!(next.usable_grid().is_some());
    assert_eq!(next.get(&a.id), Some(&a));
}

// =============================================================
// EditorState: apply
// =============================================================

#[test]
fn apply_dispatches_selection() {
    let a = make_rect(0, 0, 1, 1, 0);
    let state = state_with(&[a.clone()]);
    let next = state.apply(&Action::SelectionChanged(vec![a.id]));
    assert_eq!(next.selected_ids, vec![a.id]);
}

#[test]
fn apply_dispatches_patches() {
    let a = make_rect(0, 0, 1, 1, 0);
    let state = state_with(&[a.clone()]);
    let next = state.apply(&Action::RectsUpdated(vec![RectPatch { id: a.id, rect: Rect { y: 7, ..a.clone() } }]));
    assert_eq!(next.get(&a.id).map(|r| r.y), Some(7));
}

#[test]
fn apply_view_actions_leave_state_unchanged() {
    let state = state_with(&[make_rect(0, 0, 1, 1, 0)]);
    assert_eq!(state.apply(&Action::RenderNeeded), state);
    assert_eq!(state.apply(&Action::SetCursor(CursorKind::Grab)), state);
}

// =============================================================
// EditorState: JSON
// =============================================================

#[test]
fn from_json_keeps_file_order_and_defaults() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let text = json!({
        "rects": [
            { "id": b, "content_id": "chart", "x": 4, "y": 0, "w": 2, "h": 2, "z": 1 },
            { "id": a, "content_id": "table", "x": 0, "y": 0, "w": 2, "h": 2, "z": 0 },
        ],
        "grid": { "columns": 12, "row_height": 20.0, "padding": 2.0, "step_x": 10.0, "step_y": 20.0 },
    })
    .to_string();
    let state = EditorState::from_json(&text).unwrap();
    assert_eq!(state.index_of(&b), Some(0));
    assert_eq!(state.index_of(&a), Some(1));
    assert_eq!(state.mode, Mode::Design);
    assert_eq!(state.zoom, 1.0);
    assert!(state.selected_ids.is_empty());
}

#[test]
fn from_json_clamps_rects_to_grid() {
    let id = Uuid::new_v4();
    let text = json!({
        "rects": [{ "id": id, "content_id": "c", "x": 10, "y": -2, "w": 5, "h": 0, "z": 0 }],
        "grid": { "columns": 12, "row_height": 20.0, "padding": 0.0, "step_x": 10.0, "step_y": 20.0 },
    })
    .to_string();
    let state = EditorState::from_json(&text).unwrap();
    let r = state.get(&id).unwrap();
    assert_eq!((r.x, r.y, r.w, r.h), (7, 0, 5, 1));
}

#[test]
fn from_json_prunes_stale_selection() {
    let id = Uuid::new_v4();
    let text = json!({
        "rects": [{ "id": id, "content_id": "c", "x": 0, "y": 0, "w": 1, "h": 1, "z": 0 }],
        "selected_ids": [id, Uuid::new_v4()],
    })
    .to_string();
    let state = EditorState::from_json(&text).unwrap();
    assert_eq!(state.selected_ids, vec![id]);
}

#[test]
fn from_json_rejects_duplicate_ids() {
    let id = Uuid::new_v4();
    let rect = json!({ "id": id, "content_id": "c", "x": 0, "y": 0, "w": 1, "h": 1, "z": 0 });
    let text = json!({ "rects": [rect.clone(), rect] }).to_string();
    let err = EditorState::from_json(&text).unwrap_err();
    assert!(matches!(err, SnapshotError::DuplicateId(dup) if dup == id));
}

#[test]
fn from_json_rejects_malformed_text() {
    let err = EditorState::from_json("{ not json").unwrap_err();
    assert!(matches!(err, SnapshotError::Json(_)));
}

#[test]
fn to_json_then_from_json_preserves_state() {
    let a = make_rect(0, 0, 2, 2, 1);
    let mut state = state_with(&[a.clone()]);
    state.selected_ids = vec![a.id];
    state.mode = Mode::Render;
    let back = EditorState::from_json(&state.to_json().unwrap()).unwrap();
    assert_eq!(back, state);
}
