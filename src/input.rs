//! Input model: mouse buttons, modifier keys, wheel deltas, and the press/drag
//! gesture state machine shared by both engines.
//!
//! A press that stays within [`CLICK_SLOP_PX`] of where it started resolves to
//! a click on release. Anything further turns into a pan and the release does
//! not click, so dragging the view never toggles a selection.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{CLICK_SLOP_PX, WHEEL_CTRL_MULTIPLIER, WHEEL_LINE_FACTOR, WHEEL_PIXEL_FACTOR};
use crate::geometry::Point;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Unit of a wheel delta, as reported by `WheelEvent.deltaMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    #[must_use]
    pub fn from_dom(mode: u32) -> Self {
        match mode {
            1 => Self::Line,
            2 => Self::Page,
            _ => Self::Pixel,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default)]
pub struct WheelDelta {
    /// Horizontal scroll amount.
    pub dx: f64,
    /// Vertical scroll amount (positive = down = zoom out).
    pub dy: f64,
    pub mode: DeltaMode,
}

impl WheelDelta {
    /// Base-2 exponent applied to the zoom factor for this delta.
    #[must_use]
    pub fn zoom_exponent(&self, modifiers: Modifiers) -> f64 {
        let factor = match self.mode {
            DeltaMode::Pixel => WHEEL_PIXEL_FACTOR,
            DeltaMode::Line => WHEEL_LINE_FACTOR,
            DeltaMode::Page => 1.0,
        };
        let multiplier = if modifiers.ctrl { WHEEL_CTRL_MULTIPLIER } else { 1.0 };
        -self.dy * factor * multiplier
    }
}

/// What a pointer event amounted to once fed through [`Gesture`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Nothing to act on.
    None,
    /// The view should pan by this surface-space delta.
    Pan { dx: f64, dy: f64 },
    /// A press was released without travelling; treat it as a click here.
    Click(Point),
}

/// Press/drag state between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, Default)]
pub enum Gesture {
    /// No button held.
    #[default]
    Idle,
    /// Primary button held.
    Pressed {
        /// Where the press started.
        start: Point,
        /// Pointer position at the previous event, for pan deltas.
        last: Point,
        /// Whether the pointer has left the click slop.
        dragging: bool,
    },
}

impl Gesture {
    /// Whether the primary button is currently held.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        matches!(self, Self::Pressed { .. })
    }

    pub fn pointer_down(&mut self, pt: Point, button: Button) -> GestureEvent {
        if button == Button::Primary {
            *self = Self::Pressed { start: pt, last: pt, dragging: false };
        }
        GestureEvent::None
    }

    pub fn pointer_move(&mut self, pt: Point) -> GestureEvent {
        let Self::Pressed { start, last, dragging } = self else {
            return GestureEvent::None;
        };
        if !*dragging && start.distance(pt) <= CLICK_SLOP_PX {
            return GestureEvent::None;
        }
        *dragging = true;
        let delta = GestureEvent::Pan { dx: pt.x - last.x, dy: pt.y - last.y };
        *last = pt;
        delta
    }

    pub fn pointer_up(&mut self, pt: Point, button: Button) -> GestureEvent {
        if button != Button::Primary {
            return GestureEvent::None;
        }
        let previous = std::mem::take(self);
        match previous {
            Self::Pressed { dragging: false, .. } => GestureEvent::Click(pt),
            Self::Pressed { .. } | Self::Idle => GestureEvent::None,
        }
    }

    /// The pointer left the surface or the press was cancelled.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}
