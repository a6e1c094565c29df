//! Shared numeric constants for the visualization engines.

// ── Word cloud ──────────────────────────────────────────────────

/// Font size (px) assigned to the least frequent word of a document.
pub const MIN_FONT_SIZE: f64 = 15.0;

/// Font size (px) assigned to the most frequent word of a document.
pub const MAX_FONT_SIZE: f64 = 70.0;

/// Distance a word moves away from the center per radian of spiral angle.
pub const SPIRAL_STEP: f64 = 4.0;

/// Spiral angle increment (radians) between two placement attempts.
pub const SPIRAL_ANGLE_STEP: f64 = 0.1;

/// Upper bound on placement attempts for a single word.
pub const SPIRAL_MAX_STEPS: u32 = 200_000;

/// Inflation applied to word rectangles when testing for overlap.
pub const WORD_MARGIN: f64 = 4.0;

/// Average glyph width (relative to the font size) for characters missing from the width table.
pub const DEFAULT_CHAR_WIDTH: f64 = 0.6;

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest zoom factor reachable through gestures.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor reachable through gestures.
pub const MAX_ZOOM: f64 = 10.0;

/// Duration of animated zoom resets and pans, in milliseconds.
pub const TRANSITION_MS: f64 = 750.0;

/// Duration of the double-click zoom step, in milliseconds.
pub const DOUBLE_CLICK_TRANSITION_MS: f64 = 250.0;

/// Wheel zoom sensitivity for pixel-mode deltas.
pub const WHEEL_PIXEL_FACTOR: f64 = 0.002;

/// Wheel zoom sensitivity for line-mode deltas.
pub const WHEEL_LINE_FACTOR: f64 = 0.05;

/// Wheel sensitivity multiplier while ctrl is held (trackpad pinch).
pub const WHEEL_CTRL_MULTIPLIER: f64 = 10.0;

// ── Input ───────────────────────────────────────────────────────

/// Pointer travel (screen px) after which a press becomes a pan and no longer clicks.
pub const CLICK_SLOP_PX: f64 = 3.0;

/// Extra screen-space radius granted to hit targets.
pub const HIT_SLOP_PX: f64 = 3.0;

// ── Scatterplot ─────────────────────────────────────────────────

/// Radius of a document point in data-layer units.
pub const POINT_RADIUS: f64 = 2.0;

/// Target number of ticks per axis.
pub const TICK_COUNT: usize = 10;

/// Number of words listed in the hover popover.
pub const POPOVER_TOP_WORDS: usize = 3;
