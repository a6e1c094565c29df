//! Zoom/pan transform and the gesture-driven zoom behavior.
//!
//! A [`ZoomTransform`] maps data-layer coordinates into the plot's inner
//! coordinate frame: `inner = local * k + (x, y)`. The engines never move
//! individual elements while zooming; they apply the transform to the whole
//! data layer and derive zoomed axis scales with [`ZoomTransform::rescale_x`] /
//! [`ZoomTransform::rescale_y`].
//!
//! [`ZoomBehavior`] owns the current transform, clamps scale changes to the
//! configured extent, and runs eased transitions that are advanced by
//! [`ZoomBehavior::tick`].

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use std::fmt;

use crate::geometry::{LinearScale, Point};
use crate::input::{Modifiers, WheelDelta};

/// Uniform scale followed by a translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for ZoomTransform {
    /// SVG/CSS transform notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self { k: 1.0, x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    /// Map a layer-local point into the inner frame.
    #[must_use]
    pub fn apply(&self, local: Point) -> Point {
        Point::new(local.x * self.k + self.x, local.y * self.k + self.y)
    }

    /// Map an inner-frame point back into layer-local coordinates.
    #[must_use]
    pub fn invert(&self, inner: Point) -> Point {
        Point::new((inner.x - self.x) / self.k, (inner.y - self.y) / self.k)
    }

    #[must_use]
    pub fn invert_x(&self, x: f64) -> f64 {
        (x - self.x) / self.k
    }

    #[must_use]
    pub fn invert_y(&self, y: f64) -> f64 {
        (y - self.y) / self.k
    }

    /// A copy of `scale` whose domain is what is visible through this transform.
    #[must_use]
    pub fn rescale_x(&self, scale: &LinearScale) -> LinearScale {
        let (r0, r1) = scale.range();
        LinearScale::new((scale.invert(self.invert_x(r0)), scale.invert(self.invert_x(r1))), (r0, r1))
    }

    /// A copy of `scale` whose domain is what is visible through this transform.
    #[must_use]
    pub fn rescale_y(&self, scale: &LinearScale) -> LinearScale {
        let (r0, r1) = scale.range();
        LinearScale::new((scale.invert(self.invert_y(r0)), scale.invert(self.invert_y(r1))), (r0, r1))
    }

    /// Same transform with scale `k`, keeping the inner point `anchor` fixed.
    #[must_use]
    pub fn scaled_about(&self, k: f64, anchor: Point) -> Self {
        let local = self.invert(anchor);
        Self { k, x: anchor.x - local.x * k, y: anchor.y - local.y * k }
    }

    /// Same scale, translated so layer-local `local` lands on inner point `center`.
    #[must_use]
    pub fn translated_to(&self, local: Point, center: Point) -> Self {
        Self { k: self.k, x: center.x - local.x * self.k, y: center.y - local.y * self.k }
    }

    /// Translate by an inner-frame (pixel) delta.
    #[must_use]
    pub fn translated_by(&self, dx: f64, dy: f64) -> Self {
        Self { k: self.k, x: self.x + dx, y: self.y + dy }
    }
}

/// Cubic in-out easing on `t ∈ [0, 1]`.
#[must_use]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// An in-flight animated change of transform.
#[derive(Debug, Clone, Copy)]
struct Transition {
    from: ZoomTransform,
    to: ZoomTransform,
    /// Inner-frame point whose underlying view center is interpolated.
    center: Point,
    duration_ms: f64,
    /// Stamped by the first tick.
    start_ms: Option<f64>,
}

impl Transition {
    fn sample(&self, t: f64) -> ZoomTransform {
        let e = ease_cubic_in_out(t);
        let c0 = self.from.invert(self.center);
        let c1 = self.to.invert(self.center);
        let k = self.from.k * (self.to.k / self.from.k).powf(e);
        let c = Point::new(c0.x + (c1.x - c0.x) * e, c0.y + (c1.y - c0.y) * e);
        ZoomTransform { k, x: self.center.x - c.x * k, y: self.center.y - c.y * k }
    }
}

/// Current transform plus gesture and transition handling.
#[derive(Debug, Clone)]
pub struct ZoomBehavior {
    transform: ZoomTransform,
    scale_extent: (f64, f64),
    transition: Option<Transition>,
}

impl ZoomBehavior {
    #[must_use]
    pub fn new(scale_extent: (f64, f64)) -> Self {
        Self { transform: ZoomTransform::IDENTITY, scale_extent, transition: None }
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    #[must_use]
    pub fn scale_extent(&self) -> (f64, f64) {
        self.scale_extent
    }

    /// Whether a transition is waiting for further ticks.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Drop any running transition, leaving the transform where it is.
    pub fn interrupt(&mut self) {
        self.transition = None;
    }

    fn clamp_k(&self, k: f64) -> f64 {
        k.clamp(self.scale_extent.0, self.scale_extent.1)
    }

    /// Jump to `target` immediately. Returns `true` when the transform changed.
    pub fn set(&mut self, target: ZoomTransform) -> bool {
        self.interrupt();
        let target = ZoomTransform { k: self.clamp_k(target.k), ..target };
        let changed = target != self.transform;
        self.transform = target;
        changed
    }

    /// Start an eased transition to `target`, interrupting any running one.
    ///
    /// `center` is the inner-frame point whose view center is interpolated
    /// (normally the middle of the plot area).
    pub fn animate_to(&mut self, target: ZoomTransform, duration_ms: f64, center: Point) {
        let target = ZoomTransform { k: self.clamp_k(target.k), ..target };
        if duration_ms <= 0.0 {
            self.set(target);
            return;
        }
        self.transition = Some(Transition { from: self.transform, to: target, center, duration_ms, start_ms: None });
    }

    /// Advance a running transition to `now_ms`.
    ///
    /// Returns the new transform when it changed. The transition ends on the
    /// tick that reaches its duration.
    pub fn tick(&mut self, now_ms: f64) -> Option<ZoomTransform> {
        let mut transition = self.transition?;
        let start = *transition.start_ms.get_or_insert(now_ms);
        let t = ((now_ms - start) / transition.duration_ms).clamp(0.0, 1.0);
        let next = if t >= 1.0 { transition.to } else { transition.sample(t) };
        self.transition = if t >= 1.0 { None } else { Some(transition) };
        if next == self.transform {
            return None;
        }
        self.transform = next;
        Some(next)
    }

    /// Wheel zoom anchored at inner point `anchor`. Returns `true` when the transform changed.
    pub fn wheel(&mut self, anchor: Point, delta: WheelDelta, modifiers: Modifiers) -> bool {
        self.interrupt();
        let k = self.clamp_k(self.transform.k * 2.0_f64.powf(delta.zoom_exponent(modifiers)));
        if (k - self.transform.k).abs() < f64::EPSILON {
            return false;
        }
        self.transform = self.transform.scaled_about(k, anchor);
        true
    }

    /// Pan by an inner-frame pixel delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        self.interrupt();
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        self.transform = self.transform.translated_by(dx, dy);
        true
    }

    /// Animated double-click zoom: ×2 at `anchor`, or ×0.5 when `zoom_out`.
    pub fn double_click(&mut self, anchor: Point, zoom_out: bool, duration_ms: f64) {
        let factor = if zoom_out { 0.5 } else { 2.0 };
        let target = self.transform.scaled_about(self.clamp_k(self.transform.k * factor), anchor);
        self.animate_to(target, duration_ms, anchor);
    }
}
