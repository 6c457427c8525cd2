//! Shared numeric constants for the grid crate.

// ── Gestures ────────────────────────────────────────────────────

/// Screen-space distance a press must travel before it counts as a drag.
pub const DRAG_THRESHOLD_PX: f64 = 2.0;

/// Minimum marquee width or height (canvas pixels) before it selects anything.
pub const MARQUEE_THRESHOLD_PX: f64 = 2.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels around each resize handle.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Grid defaults ───────────────────────────────────────────────

/// Column count used when a layout does not specify one.
pub const DEFAULT_COLUMNS: u32 = 36;

/// Row height in pixels used when a layout does not specify one.
pub const DEFAULT_ROW_HEIGHT_PX: f64 = 24.0;

/// Inner padding of a cell's content box, in pixels.
pub const DEFAULT_PADDING_PX: f64 = 4.0;
