//! Axis model: "nice" tick selection and labels for a linear scale.
//!
//! Axes are rebuilt from the zoomed scales on every zoom change, so the work
//! here is proportional to the number of ticks, never to the number of points.

#[cfg(test)]
#[path = "axis_test.rs"]
mod axis_test;

use crate::geometry::{LinearScale, Point};

/// Which side of the plot an axis is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    /// Horizontal axis below the plot; ticks hang downward.
    Bottom,
    /// Vertical axis left of the plot; ticks point left.
    Left,
}

/// A single tick: its pixel offset along the axis and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub offset: f64,
    pub label: String,
}

/// A laid-out axis ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub orient: AxisOrient,
    /// Surface-space translation of the axis group.
    pub origin: Point,
    /// Pixel extent of the axis line, `(start, end)` along its direction.
    pub extent: (f64, f64),
    pub ticks: Vec<Tick>,
}

impl Axis {
    /// Lay out an axis for `scale`, positioned at `origin`.
    #[must_use]
    pub fn build(orient: AxisOrient, scale: &LinearScale, origin: Point, tick_count: usize) -> Self {
        let (d0, d1) = scale.domain();
        let (ticks, step) = nice_ticks(d0.min(d1), d0.max(d1), tick_count);
        let ticks = ticks
            .into_iter()
            .map(|v| Tick { offset: scale.apply(v), label: tick_label(v, step) })
            .collect();
        let (r0, r1) = scale.range();
        Self { orient, origin, extent: (r0.min(r1), r0.max(r1)), ticks }
    }
}

/// Ticks at multiples of a 1/2/5×10ⁿ step covering `[min, max]`, plus that step.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, target_count: usize) -> (Vec<f64>, f64) {
    let range = max - min;
    if !range.is_finite() || range.abs() < 1e-12 || target_count == 0 {
        if min.is_finite() && range.abs() < 1e-12 {
            return (vec![min], 1.0);
        }
        return (Vec::new(), 1.0);
    }
    #[allow(clippy::cast_precision_loss)]
    let rough_step = range / target_count as f64;
    let mag = 10.0_f64.powf(rough_step.log10().floor());
    let normalized = rough_step / mag;
    let step = if normalized < 1.5 {
        mag
    } else if normalized < 3.5 {
        mag * 2.0
    } else if normalized < 7.5 {
        mag * 5.0
    } else {
        mag * 10.0
    };

    // Tolerate rounding so ends that sit exactly on a multiple are kept.
    let first = (min / step - 1e-9).ceil();
    let last = (max / step + 1e-9).floor();
    let mut ticks = Vec::new();
    let mut i = first;
    while i <= last {
        ticks.push(i * step);
        i += 1.0;
    }
    (ticks, step)
}

/// Format a tick value with as many decimals as the step needs.
#[must_use]
pub fn tick_label(value: f64, step: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // Avoid rendering "-0".
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.decimals$}")
}
