//! Headless orchestrator.
//!
//! Plays the role a UI shell plays around the engine: it owns the current
//! snapshot, forwards each scripted event to the engine with that snapshot,
//! and republishes a fresh snapshot for every intent that comes back.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use grid::camera::Point;
use grid::doc::EditorState;
use grid::engine::{Action, Engine, EngineConfig, HostSurface};
use grid::input::{Button, CursorKind, Modifiers, WheelDelta};
use tracing::{debug, info};

use crate::script::ScriptEvent;

/// Host surface with no window behind it. Tracks whether listeners are
/// installed so a session can be checked for leaks.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    listening: bool,
}

impl HeadlessSurface {
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listening
    }
}

impl HostSurface for HeadlessSurface {
    fn acquire_listeners(&mut self) {
        self.listening = true;
        debug!("headless listeners installed");
    }

    fn release_listeners(&mut self) {
        self.listening = false;
        debug!("headless listeners removed");
    }
}

/// Counters reported at the end of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub selection_changes: usize,
    pub patch_batches: usize,
    pub rects_patched: usize,
    pub renders: usize,
}

/// One engine attached to a headless surface plus the snapshot it edits.
pub struct Session {
    engine: Engine<HeadlessSurface>,
    state: EditorState,
    cursor: CursorKind,
    stats: ReplayStats,
}

impl Session {
    #[must_use]
    pub fn new(state: EditorState, config: EngineConfig) -> Self {
        Self {
            engine: Engine::attach(HeadlessSurface::default(), config),
            state,
            cursor: CursorKind::Default,
            stats: ReplayStats::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    #[must_use]
    pub fn cursor(&self) -> CursorKind {
        self.cursor
    }

    #[must_use]
    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    #[must_use]
    pub fn engine(&self) -> &Engine<HeadlessSurface> {
        &self.engine
    }

    /// Feed one event through the engine and apply what it returns.
    pub fn handle(&mut self, event: &ScriptEvent) {
        self.stats.events += 1;
        let actions = match *event {
            ScriptEvent::Down { x, y, keys } => {
                self.engine.on_pointer_down(&self.state, Point::new(x, y), Button::Primary, keys.into())
            }
            ScriptEvent::Move { x, y, keys } => self.engine.on_pointer_move(&self.state, Point::new(x, y), keys.into()),
            ScriptEvent::Up { x, y, keys } => {
                self.engine.on_pointer_up(&self.state, Point::new(x, y), Button::Primary, keys.into())
            }
            ScriptEvent::Wheel { x, y, dy } => {
                self.engine.on_wheel(&self.state, Point::new(x, y), WheelDelta { dx: 0.0, dy }, Modifiers::default())
            }
            ScriptEvent::Origin { x, y } => {
                self.engine.set_origin(Point::new(x, y));
                Vec::new()
            }
            ScriptEvent::Zoom { value } => {
                debug!(zoom = value, "zoom changed");
                self.state = EditorState { zoom: value, ..self.state.clone() };
                Vec::new()
            }
        };
        for action in &actions {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: &Action) {
        match action {
            Action::SelectionChanged(ids) => {
                self.stats.selection_changes += 1;
                info!(count = ids.len(), "selection changed");
            }
            Action::RectsUpdated(patches) => {
                self.stats.patch_batches += 1;
                self.stats.rects_patched += patches.len();
                info!(count = patches.len(), "rects updated");
                for p in patches {
                    debug!(id = %p.id, x = p.rect.x, y = p.rect.y, w = p.rect.w, h = p.rect.h, z = p.rect.z, "patch");
                }
            }
            Action::RenderNeeded => {
                self.stats.renders += 1;
            }
            Action::SetCursor(cursor) => {
                self.cursor = *cursor;
                debug!(cursor = cursor.as_css(), "cursor changed");
            }
        }
        self.state = self.state.apply(action);
    }

    /// Detach from the surface and hand back the final snapshot.
    #[must_use]
    pub fn finish(self) -> (EditorState, ReplayStats) {
        let Self { engine, state, stats, .. } = self;
        let released = engine.detach().is_some_and(|host| !host.is_listening());
        debug!(released, "session finished");
        (state, stats)
    }
}

/// Replay a whole script against a snapshot.
#[must_use]
pub fn replay(state: EditorState, events: &[ScriptEvent], config: EngineConfig) -> (EditorState, ReplayStats) {
    let mut session = Session::new(state, config);
    let listening = session.engine().host().is_some_and(HeadlessSurface::is_listening);
    debug!(listening, rects = session.state().len(), "replay started");
    for event in events {
        session.handle(event);
    }
    let stats = session.stats();
    info!(
        events = stats.events,
        selection_changes = stats.selection_changes,
        patch_batches = stats.patch_batches,
        rects_patched = stats.rects_patched,
        renders = stats.renders,
        cursor = session.cursor().as_css(),
        "replay complete"
    );
    session.finish()
}
