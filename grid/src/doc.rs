//! Document model: placed rects, the editor-state snapshot, and patch
//! application.
//!
//! This module defines what sits on the grid (`Rect`), the read-mostly
//! snapshot the orchestrator publishes to the engine and to every consumer
//! (`EditorState`), and the committed result of a gesture (`RectPatch`).
//!
//! The engine only ever reads an `EditorState`. Applying intents is the
//! orchestrator's job; `EditorState::apply` is that reference behavior and
//! always produces a fresh snapshot instead of mutating the old one.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::Action;
use crate::geom::{GridConfig, clamp_grid};

/// Unique identifier for a placed rect.
pub type RectId = Uuid;

/// Grid-unit geometry of one placed content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Unique identifier for this placement.
    pub id: RectId,
    /// Identifier of the content rendered inside the block.
    pub content_id: String,
    /// Left column, `>= 0`.
    pub x: i64,
    /// Top row, `>= 0`.
    pub y: i64,
    /// Width in columns, `1..=columns`.
    pub w: i64,
    /// Height in rows, `>= 1`.
    pub h: i64,
    /// Stacking order; higher values paint above lower ones. Not necessarily
    /// contiguous.
    pub z: i64,
}

impl Rect {
    /// Whether grid cell `(cx, cy)` lies inside `[x, x+w) × [y, y+h)`.
    #[must_use]
    pub fn contains_cell(&self, cx: i64, cy: i64) -> bool {
        cx >= self.x && cx < self.right() && cy >= self.y && cy < self.bottom()
    }

    /// Exclusive right edge in columns. Saturates instead of overflowing on
    /// extreme positions.
    #[must_use]
    pub fn right(&self) -> i64 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge in rows. The grid has no lower limit on rows, so
    /// a loaded layout may sit anywhere down to `i64::MAX`.
    #[must_use]
    pub fn bottom(&self) -> i64 {
        self.y.saturating_add(self.h)
    }

    /// Same placement with a different geometry, keeping identity and z.
    #[must_use]
    pub fn with_geometry(&self, x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h, ..self.clone() }
    }
}

/// Whether the editor is interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Interactive editing; the engine handles pointer and wheel input.
    #[default]
    Design,
    /// Read-only rendering; the engine ignores input.
    Render,
}

/// One committed geometry change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectPatch {
    /// Rect to replace.
    pub id: RectId,
    /// Full replacement geometry.
    pub rect: Rect,
}

/// Error returned when a layout document cannot be turned into a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The text is not valid layout JSON.
    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Two rects share an id.
    #[error("duplicate rect id: {0}")]
    DuplicateId(RectId),
}

/// Serialized form of a snapshot. Rects keep their file order, which becomes
/// the collection order used for hit-test tie-breaking.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LayoutFile {
    rects: Vec<Rect>,
    #[serde(default)]
    grid: Option<GridConfig>,
    #[serde(default)]
    selected_ids: Vec<RectId>,
    #[serde(default)]
    mode: Mode,
    #[serde(default = "default_zoom")]
    zoom: f64,
}

fn default_zoom() -> f64 {
    1.0
}

/// Read-mostly snapshot of everything the engine and consumers render from.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    /// Placed rects keyed by id, in collection order.
    pub rects: IndexMap<RectId, Rect>,
    /// Current grid geometry; `None` until the container has been measured.
    pub grid: Option<GridConfig>,
    /// Selected rect ids.
    pub selected_ids: Vec<RectId>,
    /// Whether the editor is interactive.
    pub mode: Mode,
    /// Render scale factor (1.0 = no zoom).
    pub zoom: f64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            rects: IndexMap::new(),
            grid: None,
            selected_ids: Vec::new(),
            mode: Mode::Design,
            zoom: 1.0,
        }
    }
}

impl EditorState {
    /// Empty design-mode snapshot over a grid.
    #[must_use]
    pub fn new(grid: GridConfig) -> Self {
        Self { grid: Some(grid), ..Self::default() }
    }

    /// Insert or replace a rect. A replaced rect keeps its collection position.
    pub fn insert(&mut self, rect: Rect) {
        self.rects.insert(rect.id, rect);
    }

    /// Look up a rect by id.
    #[must_use]
    pub fn get(&self, id: &RectId) -> Option<&Rect> {
        self.rects.get(id)
    }

    /// Position of a rect in collection order.
    #[must_use]
    pub fn index_of(&self, id: &RectId) -> Option<usize> {
        self.rects.get_index_of(id)
    }

    /// Whether `id` is in the selection.
    #[must_use]
    pub fn is_selected(&self, id: &RectId) -> bool {
        self.selected_ids.contains(id)
    }

    /// Selected rects that still exist, in selection order. Stale ids are
    /// skipped.
    pub fn selected_rects(&self) -> impl Iterator<Item = &Rect> {
        self.selected_ids.iter().filter_map(|id| self.rects.get(id))
    }

    /// The grid config, if present and usable for pixel math.
    #[must_use]
    pub fn usable_grid(&self) -> Option<&GridConfig> {
        self.grid.as_ref().filter(|g| g.is_usable())
    }

    /// Number of rects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns `true` if there are no rects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// New snapshot with the selection replaced wholesale.
    ///
    /// Unknown ids and duplicates are dropped so the selection only ever
    /// references live rects.
    #[must_use]
    pub fn with_selection(&self, ids: &[RectId]) -> Self {
        let mut next = self.clone();
        next.selected_ids = self.live_unique(ids);
        next
    }

    /// New snapshot with every patch applied in one step.
    ///
    /// Patches for unknown ids are ignored. The selection is pruned afterwards.
    #[must_use]
    pub fn with_patches(&self, patches: &[RectPatch]) -> Self {
        let mut next = self.clone();
        for patch in patches {
            if let Some(slot) = next.rects.get_mut(&patch.id) {
                *slot = Rect { id: patch.id, ..patch.rect.clone() };
            }
        }
        next.selected_ids = next.live_unique(&self.selected_ids);
        next
    }

    /// New snapshot over a re-measured grid. Every rect is clamped to the new
    /// column count.
    #[must_use]
    pub fn with_grid(&self, grid: GridConfig) -> Self {
        let mut next = self.clone();
        for rect in next.rects.values_mut() {
            *rect = clamp_grid(rect, grid.columns);
        }
        next.grid = Some(grid);
        next
    }

    /// Apply an engine intent. View-only actions return an unchanged copy.
    #[must_use]
    pub fn apply(&self, action: &Action) -> Self {
        match action {
            Action::SelectionChanged(ids) => self.with_selection(ids),
            Action::RectsUpdated(patches) => self.with_patches(patches),
            Action::RenderNeeded | Action::SetCursor(_) => self.clone(),
        }
    }

    /// Parse a layout document.
    ///
    /// Every rect is normalised with [`clamp_grid`] when a grid is present,
    /// and the selection is pruned to live ids.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] for malformed JSON and
    /// [`SnapshotError::DuplicateId`] when two rects share an id.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let file: LayoutFile = serde_json::from_str(text)?;
        let mut rects = IndexMap::with_capacity(file.rects.len());
        for rect in file.rects {
            let rect = match &file.grid {
                Some(grid) => clamp_grid(&rect, grid.columns),
                None => rect,
            };
            if rects.contains_key(&rect.id) {
                return Err(SnapshotError::DuplicateId(rect.id));
            }
            rects.insert(rect.id, rect);
        }
        let state = Self { rects, grid: file.grid, selected_ids: Vec::new(), mode: file.mode, zoom: file.zoom };
        Ok(state.with_selection(&file.selected_ids))
    }

    /// Serialize to the layout document format.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        let file = LayoutFile {
            rects: self.rects.values().cloned().collect(),
            grid: self.grid,
            selected_ids: self.selected_ids.clone(),
            mode: self.mode,
            zoom: self.zoom,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    fn live_unique(&self, ids: &[RectId]) -> Vec<RectId> {
        let mut out: Vec<RectId> = Vec::with_capacity(ids.len());
        for id in ids {
            if self.rects.contains_key(id) && !out.contains(id) {
                out.push(*id);
            }
        }
        out
    }
}
