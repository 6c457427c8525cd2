//! Grid interaction engine for the layout editor.
//!
//! The editor places content blocks on a column grid. This crate owns the
//! interactive half of that editor: translating raw pointer and wheel events
//! into selection changes and geometry patches, hit-testing blocks under
//! z-order, running the marquee/move/resize gesture state machine, and
//! reordering stacks. It never owns the layout itself. An orchestrator hands
//! every handler the current [`doc::EditorState`] snapshot and applies the
//! [`engine::Action`]s that come back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] and the host-attached [`engine::Engine`] |
//! | [`doc`] | Rects, the editor-state snapshot and patch application |
//! | [`geom`] | Grid configuration, `clamp_grid`, grid ↔ pixel mapping |
//! | [`camera`] | Viewport origin/zoom and coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against rects and resize handles |
//! | [`zorder`] | Wheel-driven z-order policies |
//! | [`overlay`] | Transient view state for renderers (ghosts, marquee, handles) |
//! | [`consts`] | Shared numeric constants (thresholds, handle radius) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod overlay;
pub mod zorder;
