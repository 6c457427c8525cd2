use tracing::{debug, trace};

use crate::camera::{Camera, Point};
use crate::consts::{DRAG_THRESHOLD_PX, HANDLE_RADIUS_PX, MARQUEE_THRESHOLD_PX};
use crate::doc::{EditorState, Mode, RectId, RectPatch};
use crate::geom::GridConfig;
use crate::hit::{HitPart, ResizeDirection, hit_test, marquee_hits, stack_at};
use crate::input::{Button, CursorKind, GestureKind, GestureState, Ghost, GhostItem, Marquee, Modifiers, WheelDelta};
use crate::overlay::{self, Overlay};
use crate::zorder::{ZDirection, ZOrderPolicy, reorder};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the orchestrator to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the selection wholesale.
    SelectionChanged(Vec<RectId>),
    /// Apply every patch in one state transition.
    RectsUpdated(Vec<RectPatch>),
    /// Transient view state changed; redraw the overlay.
    RenderNeeded,
    /// Show a different pointer cursor.
    SetCursor(CursorKind),
}

/// Tunables for the interaction engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// How wheel notches reorder the selection.
    pub z_order: ZOrderPolicy,
    /// Screen pixels a press must travel to become a drag.
    pub drag_threshold_px: f64,
    /// Canvas pixels a marquee must span to select anything.
    pub marquee_threshold_px: f64,
    /// Screen-pixel hit slop around resize handles.
    pub handle_radius_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            z_order: ZOrderPolicy::default(),
            drag_threshold_px: DRAG_THRESHOLD_PX,
            marquee_threshold_px: MARQUEE_THRESHOLD_PX,
            handle_radius_px: HANDLE_RADIUS_PX,
        }
    }
}

/// Core engine state — all logic that doesn't depend on a host surface.
///
/// Separated from `Engine` so it can be tested without a host. Every handler
/// takes the orchestrator's current snapshot; the core keeps nothing from it
/// between gestures.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub config: EngineConfig,
    pub input: GestureState,
    /// Viewport position of the canvas element's top-left corner.
    pub origin: Point,
    cursor: CursorKind,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Record where the canvas element sits in the viewport.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    // --- Queries ---

    /// The gesture currently in progress.
    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        &self.input
    }

    /// Transient view state for renderers.
    #[must_use]
    pub fn overlay(&self, state: &EditorState) -> Overlay {
        overlay::build(state, &self.input)
    }

    /// Discard any in-progress gesture without emitting anything. Returns
    /// whether a gesture was discarded.
    pub fn cancel(&mut self) -> bool {
        let active = !self.input.is_idle();
        self.input = GestureState::Idle;
        active
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, state: &EditorState, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        if !self.input.is_idle() {
            trace!("pointer-down ignored: gesture already active");
            return Vec::new();
        }
        let Some((camera, grid)) = self.interactive(state) else {
            return Vec::new();
        };

        let canvas = camera.client_to_canvas(client);
        let handle_radius = camera.client_dist_to_canvas(self.config.handle_radius_px);
        match hit_test(state, &grid, canvas, handle_radius) {
            None => self.begin_marquee(state, camera, grid, canvas, modifiers),
            Some(hit) => match hit.part {
                HitPart::ResizeHandle(dir) => self.begin_resize(state, camera, grid, client, hit.rect_id, dir),
                HitPart::Body => self.begin_move(state, camera, grid, client, canvas, modifiers),
            },
        }
    }

    pub fn on_pointer_move(&mut self, state: &EditorState, client: Point, _modifiers: Modifiers) -> Vec<Action> {
        if self.input.is_idle() {
            return self.hover(state, client);
        }
        let next = match &self.input {
            GestureState::Idle => return Vec::new(),
            GestureState::Marqueeing(marquee) => GestureState::Marqueeing(marquee.extended_to(client)),
            GestureState::Dragging(ghost) => {
                GestureState::Dragging(ghost.advanced_to(client, self.config.drag_threshold_px))
            }
        };
        self.input = next;
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, state: &EditorState, client: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        match std::mem::take(&mut self.input) {
            GestureState::Idle => Vec::new(),
            GestureState::Marqueeing(marquee) => self.finish_marquee(state, &marquee.extended_to(client)),
            GestureState::Dragging(ghost) => Self::finish_drag(ghost.advanced_to(client, self.config.drag_threshold_px)),
        }
    }

    pub fn on_wheel(&mut self, state: &EditorState, client: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if !self.input.is_idle() || state.selected_rects().next().is_none() {
            return Vec::new();
        }
        let Some((camera, grid)) = self.interactive(state) else {
            return Vec::new();
        };
        let Some(direction) = ZDirection::from_wheel(delta.dy) else {
            return Vec::new();
        };
        let (cx, cy) = grid.cell_at(camera.client_to_canvas(client));
        if stack_at(state, cx, cy).is_empty() {
            return Vec::new();
        }

        let patches = reorder(state, self.config.z_order, direction);
        if patches.is_empty() {
            trace!(?direction, "wheel reorder had no effect");
            return Vec::new();
        }
        debug!(?direction, policy = ?self.config.z_order, count = patches.len(), "z-order committed");
        vec![Action::RectsUpdated(patches), Action::RenderNeeded]
    }

    // --- Gesture transitions ---

    /// Camera and grid for an interactive snapshot, or `None` when input
    /// should be ignored.
    fn interactive(&self, state: &EditorState) -> Option<(Camera, GridConfig)> {
        if state.mode != Mode::Design {
            return None;
        }
        let Some(grid) = state.usable_grid() else {
            trace!("input ignored: grid config missing or unusable");
            return None;
        };
        let camera = Camera::new(self.origin, state.zoom);
        if !camera.is_usable() {
            trace!(zoom = state.zoom, "input ignored: unusable zoom");
            return None;
        }
        Some((camera, *grid))
    }

    fn hover(&mut self, state: &EditorState, client: Point) -> Vec<Action> {
        let Some((camera, grid)) = self.interactive(state) else {
            return Vec::new();
        };
        let canvas = camera.client_to_canvas(client);
        let handle_radius = camera.client_dist_to_canvas(self.config.handle_radius_px);
        let cursor = match hit_test(state, &grid, canvas, handle_radius).map(|h| h.part) {
            None => CursorKind::Default,
            Some(HitPart::Body) => CursorKind::Grab,
            Some(HitPart::ResizeHandle(dir)) => CursorKind::for_handle(dir),
        };
        if cursor == self.cursor {
            return Vec::new();
        }
        self.cursor = cursor;
        vec![Action::SetCursor(cursor)]
    }

    fn begin_marquee(
        &mut self,
        state: &EditorState,
        camera: Camera,
        grid: GridConfig,
        canvas: Point,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        let additive = modifiers.is_additive();
        let base_selection = state.selected_rects().map(|r| r.id).collect();

        debug!(additive, x = canvas.x, y = canvas.y, "marquee started");
        self.input = GestureState::Marqueeing(Marquee { start: canvas, end: canvas, additive, base_selection, camera, grid });
        vec![Action::RenderNeeded]
    }

    fn begin_move(
        &mut self,
        state: &EditorState,
        camera: Camera,
        grid: GridConfig,
        client: Point,
        canvas: Point,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        let (cx, cy) = grid.cell_at(canvas);
        let stack = stack_at(state, cx, cy);
        let Some(&target) = stack.first() else {
            return Vec::new();
        };

        let additive = modifiers.is_additive();
        let was_selected = state.is_selected(&target);
        let live: Vec<RectId> = state.selected_rects().map(|r| r.id).collect();

        // A plain click walks down the stack from the sole selected rect,
        // wrapping back to the top.
        let click_through = match live.as_slice() {
            [only] if !additive && stack.len() > 1 => stack
                .iter()
                .position(|id| id == only)
                .map(|pos| stack[(pos + 1) % stack.len()])
                .filter(|next| *next != target),
            _ => None,
        };

        let mut actions = Vec::new();
        let mut select_on_drag = None;
        let selection = if additive {
            let toggled: Vec<RectId> = if was_selected {
                live.into_iter().filter(|id| *id != target).collect()
            } else {
                live.into_iter().chain(std::iter::once(target)).collect()
            };
            actions.push(Action::SelectionChanged(toggled.clone()));
            toggled
        } else if was_selected {
            live
        } else if click_through.is_some() {
            select_on_drag = Some(vec![target]);
            vec![target]
        } else {
            actions.push(Action::SelectionChanged(vec![target]));
            vec![target]
        };

        if !selection.contains(&target) {
            actions.push(Action::RenderNeeded);
            return actions;
        }

        let items = state
            .rects
            .values()
            .filter(|r| selection.contains(&r.id))
            .map(|r| (r.id, GhostItem { original: r.clone(), current: r.clone() }))
            .collect();

        debug!(%target, items = selection.len(), "move started");
        self.input = GestureState::Dragging(Ghost {
            primary_id: target,
            kind: GestureKind::Move,
            start_client: client,
            items,
            was_dragged: false,
            click_through,
            select_on_drag,
            camera,
            grid,
        });
        actions.push(Action::RenderNeeded);
        actions
    }

    fn begin_resize(
        &mut self,
        state: &EditorState,
        camera: Camera,
        grid: GridConfig,
        client: Point,
        id: RectId,
        dir: ResizeDirection,
    ) -> Vec<Action> {
        let Some(rect) = state.get(&id) else {
            return Vec::new();
        };

        debug!(%id, ?dir, "resize started");
        let item = GhostItem { original: rect.clone(), current: rect.clone() };
        self.input = GestureState::Dragging(Ghost {
            primary_id: id,
            kind: GestureKind::Resize(dir),
            start_client: client,
            items: std::iter::once((id, item)).collect(),
            was_dragged: false,
            click_through: None,
            select_on_drag: None,
            camera,
            grid,
        });
        vec![Action::RenderNeeded]
    }

    fn finish_marquee(&self, state: &EditorState, marquee: &Marquee) -> Vec<Action> {
        let mut selection = if marquee.additive { marquee.base_selection.clone() } else { Vec::new() };
        if marquee.exceeds(self.config.marquee_threshold_px) {
            for id in marquee_hits(state, &marquee.grid, &marquee.bounds()) {
                if !selection.contains(&id) {
                    selection.push(id);
                }
            }
        } else {
            trace!("marquee below threshold; treated as click");
        }

        if selection == marquee.base_selection {
            return vec![Action::RenderNeeded];
        }
        debug!(count = selection.len(), "marquee committed");
        vec![Action::SelectionChanged(selection), Action::RenderNeeded]
    }

    fn finish_drag(ghost: Ghost) -> Vec<Action> {
        if ghost.was_dragged {
            let patches: Vec<RectPatch> = ghost
                .items
                .into_iter()
                .map(|(id, item)| RectPatch { id, rect: item.current })
                .collect();
            debug!(kind = ?ghost.kind, count = patches.len(), "drag committed");
            let mut actions: Vec<Action> = ghost.select_on_drag.map(Action::SelectionChanged).into_iter().collect();
            actions.extend([Action::RectsUpdated(patches), Action::RenderNeeded]);
            return actions;
        }
        match ghost.click_through {
            Some(next) => {
                debug!(from = %ghost.primary_id, to = %next, "click-through");
                vec![Action::SelectionChanged(vec![next]), Action::RenderNeeded]
            }
            None => vec![Action::RenderNeeded],
        }
    }
}

/// Host integration seam.
///
/// A host installs window-level move/up listeners so a drag keeps tracking
/// after the pointer leaves the canvas element. [`Engine`] calls these exactly
/// once each over its lifetime.
pub trait HostSurface {
    /// Install the listeners that route pointer events into the engine.
    fn acquire_listeners(&mut self);
    /// Remove the listeners installed by `acquire_listeners`.
    fn release_listeners(&mut self);
}

/// The engine attached to a host surface.
///
/// Listeners are acquired on [`Engine::attach`] and released on
/// [`Engine::detach`] or drop, whichever comes first. Detaching mid-gesture
/// discards the gesture without emitting anything.
pub struct Engine<H: HostSurface> {
    host: Option<H>,
    pub core: EngineCore,
}

impl<H: HostSurface> Engine<H> {
    /// Attach a new engine to `host`, acquiring its listeners.
    #[must_use]
    pub fn attach(mut host: H, config: EngineConfig) -> Self {
        host.acquire_listeners();
        debug!(policy = ?config.z_order, "engine attached");
        Self { host: Some(host), core: EngineCore::with_config(config) }
    }

    /// Release listeners and hand the host back.
    #[must_use]
    pub fn detach(mut self) -> Option<H> {
        self.release()
    }

    /// The attached host.
    #[must_use]
    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    fn release(&mut self) -> Option<H> {
        let mut host = self.host.take()?;
        if self.core.cancel() {
            debug!("gesture discarded on detach");
        }
        host.release_listeners();
        debug!("engine detached");
        Some(host)
    }

    // --- Delegated viewport ---

    pub fn set_origin(&mut self, origin: Point) {
        self.core.set_origin(origin);
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(&mut self, state: &EditorState, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(state, client, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, state: &EditorState, client: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(state, client, modifiers)
    }

    pub fn on_pointer_up(&mut self, state: &EditorState, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(state, client, button, modifiers)
    }

    pub fn on_wheel(&mut self, state: &EditorState, client: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(state, client, delta, modifiers)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        self.core.gesture()
    }

    #[must_use]
    pub fn overlay(&self, state: &EditorState) -> Overlay {
        self.core.overlay(state)
    }
}

impl<H: HostSurface> Drop for Engine<H> {
    fn drop(&mut self) {
        // No-op when already detached explicitly.
        self.release();
    }
}
