//! Surface state shared by both engines.
//!
//! [`SurfaceCore`] tracks everything about a drawing surface that does not
//! depend on what is drawn on it: lifecycle, observed size, margins, the zoom
//! behavior, and the press/drag gesture. The scatterplot and word cloud cores
//! wrap one each and translate its events into their own semantics.
//!
//! Like the rest of the crate's cores it has no browser dependencies, so it is
//! driven directly from tests.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use uuid::Uuid;

use crate::config::Margins;
use crate::consts::DOUBLE_CLICK_TRANSITION_MS;
use crate::error::VizError;
use crate::geometry::Point;
use crate::input::{Button, Gesture, GestureEvent, Modifiers, WheelDelta};
use crate::transform::{ZoomBehavior, ZoomTransform};

/// Correlation id of one engine instance in log events.
pub type EngineId = Uuid;

/// Actions returned from engine handlers for the host to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The scene changed; draw it on the next frame.
    RenderNeeded,
    /// A zoom transition is running; keep ticking every frame.
    AnimationRunning,
    SetCursor(Cursor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Pointer,
    Grabbing,
}

impl Cursor {
    /// CSS `cursor` value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Pointer => "pointer",
            Self::Grabbing => "grabbing",
        }
    }
}

/// Lifecycle of an engine: it starts attached and ends destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Attached,
    Destroyed,
}

/// What a pointer event did to the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    None,
    /// The zoom transform changed (pan).
    ZoomChanged,
    /// Press and release without a drag, at this surface point.
    Click(Point),
}

#[derive(Debug, Clone)]
pub struct SurfaceCore {
    id: EngineId,
    lifecycle: Lifecycle,
    width: f64,
    height: f64,
    sized: bool,
    margins: Margins,
    transition_ms: f64,
    zoom: ZoomBehavior,
    gesture: Gesture,
}

impl SurfaceCore {
    #[must_use]
    pub fn new(id: EngineId, margins: Margins, scale_extent: (f64, f64), transition_ms: f64) -> Self {
        tracing::debug!(engine = %id, "engine attached");
        Self {
            id,
            lifecycle: Lifecycle::Attached,
            width: 0.0,
            height: 0.0,
            sized: false,
            margins,
            transition_ms,
            zoom: ZoomBehavior::new(scale_extent),
            gesture: Gesture::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> EngineId {
        self.id
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle == Lifecycle::Destroyed
    }

    /// `Err(Destroyed)` once the engine has been torn down.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`SurfaceCore::destroy`].
    pub fn check_live(&self) -> Result<(), VizError> {
        if self.is_destroyed() { Err(VizError::Destroyed) } else { Ok(()) }
    }

    /// Move to the terminal state, dropping any running transition or gesture.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] when already destroyed.
    pub fn destroy(&mut self) -> Result<(), VizError> {
        self.check_live()?;
        self.lifecycle = Lifecycle::Destroyed;
        self.zoom.interrupt();
        self.gesture.cancel();
        tracing::debug!(engine = %self.id, "engine destroyed");
        Ok(())
    }

    // --- Size ---

    /// Record an observed surface size. Returns `false` when nothing changed.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        if self.sized && (width - self.width).abs() < f64::EPSILON && (height - self.height).abs() < f64::EPSILON {
            tracing::trace!(engine = %self.id, width, height, "resize skipped; size unchanged");
            return false;
        }
        self.width = width;
        self.height = height;
        self.sized = true;
        tracing::debug!(engine = %self.id, width, height, "resized");
        true
    }

    /// Whether a size has been observed at least once.
    #[must_use]
    pub fn is_sized(&self) -> bool {
        self.sized
    }

    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Plot area size after margins.
    #[must_use]
    pub fn inner_size(&self) -> (f64, f64) {
        self.margins.inner(self.width, self.height)
    }

    /// Middle of the plot area, in inner coordinates.
    #[must_use]
    pub fn inner_center(&self) -> Point {
        let (w, h) = self.inner_size();
        Point::new(w / 2.0, h / 2.0)
    }

    #[must_use]
    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Surface-space translation of the plot area.
    #[must_use]
    pub fn offset(&self) -> Point {
        Point::new(self.margins.left, self.margins.top)
    }

    fn to_inner(&self, surface: Point) -> Point {
        Point::new(surface.x - self.margins.left, surface.y - self.margins.top)
    }

    // --- Zoom ---

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.zoom.transform()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.zoom.is_animating()
    }

    /// Go to `target`, eased over the configured duration when `animate` is set
    /// and the surface is sized. Returns `true` when the transform changed now.
    pub fn zoom_to(&mut self, target: ZoomTransform, animate: bool) -> bool {
        if animate && self.sized {
            let before = self.zoom.transform();
            self.zoom.animate_to(target, self.transition_ms, self.inner_center());
            self.zoom.transform() != before
        } else {
            self.zoom.set(target)
        }
    }

    /// Advance a running transition. Returns `true` when the transform changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let changed = self.zoom.tick(now_ms).is_some();
        if changed {
            tracing::trace!(engine = %self.id, transform = %self.zoom.transform(), "zoom tick");
        }
        changed
    }

    /// Wheel zoom at surface point `pt`.
    pub fn wheel(&mut self, pt: Point, delta: WheelDelta, modifiers: Modifiers) -> bool {
        let changed = self.zoom.wheel(self.to_inner(pt), delta, modifiers);
        if changed {
            tracing::trace!(engine = %self.id, transform = %self.zoom.transform(), "wheel zoom");
        }
        changed
    }

    /// Animated ×2 zoom at `pt`, ×0.5 with shift.
    pub fn double_click(&mut self, pt: Point, modifiers: Modifiers) {
        self.zoom.double_click(self.to_inner(pt), modifiers.shift, DOUBLE_CLICK_TRANSITION_MS);
    }

    // --- Gestures ---

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Pressed { dragging: true, .. })
    }

    pub fn pointer_down(&mut self, pt: Point, button: Button) {
        self.gesture.pointer_down(pt, button);
        if self.gesture.is_pressed() {
            self.zoom.interrupt();
        }
    }

    pub fn pointer_move(&mut self, pt: Point) -> SurfaceEvent {
        match self.gesture.pointer_move(pt) {
            GestureEvent::Pan { dx, dy } if self.zoom.pan_by(dx, dy) => SurfaceEvent::ZoomChanged,
            _ => SurfaceEvent::None,
        }
    }

    pub fn pointer_up(&mut self, pt: Point, button: Button) -> SurfaceEvent {
        match self.gesture.pointer_up(pt, button) {
            GestureEvent::Click(at) => SurfaceEvent::Click(at),
            GestureEvent::Pan { .. } | GestureEvent::None => SurfaceEvent::None,
        }
    }

    /// The pointer left the surface; an unfinished press never clicks.
    pub fn pointer_leave(&mut self) {
        self.gesture.cancel();
    }

    /// Actions describing the current cursor and animation state, after `changed`.
    #[must_use]
    pub fn actions(&self, changed: bool, cursor: Cursor) -> Vec<Action> {
        let mut actions = Vec::new();
        if changed {
            actions.push(Action::RenderNeeded);
        }
        if self.zoom.is_animating() {
            actions.push(Action::AnimationRunning);
        }
        actions.push(Action::SetCursor(if self.is_dragging() { Cursor::Grabbing } else { cursor }));
        actions
    }
}
