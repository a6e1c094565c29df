//! Rendering: draws a [`Scene`] to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads the scene (elements, layer offset, zoom transform, clip, axes) and
//! produces pixels. It never mutates engine state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`;
//! the frame callback in [`crate::web`] logs them.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::axis::{Axis, AxisOrient};
use crate::scene::{Classes, Scene, Shape};

/// Tick mark length in CSS pixels.
const TICK_SIZE: f64 = 6.0;
/// Gap between a tick mark and its label.
const TICK_PADDING: f64 = 3.0;
const AXIS_FONT: &str = "10px sans-serif";
const AXIS_COLOR: &str = "#000";

/// Element fill for a combination of classes.
///
/// Selection wins over the filter highlight; common words get their own tint
/// unless selected.
#[must_use]
pub fn fill_for(classes: Classes, text: bool) -> &'static str {
    if classes.selected {
        "#d62728"
    } else if classes.filtered {
        "#ff7f0e"
    } else if classes.common && text {
        "#2ca02c"
    } else if text {
        "#1f77b4"
    } else {
        "#4a4a4a"
    }
}

/// Draw the full scene.
///
/// `width` and `height` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw<K: Ord>(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene<K>,
    width: f64,
    height: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    // Layer 1: clear.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, width, height);

    // Layer 2: axes, outside the clip.
    for axis in [&scene.x_axis, &scene.y_axis].into_iter().flatten() {
        draw_axis(ctx, axis)?;
    }

    // Layer 3: elements, clipped to the plot area and zoomed.
    let offset = scene.offset();
    let clip = scene.clip();
    let t = scene.transform();
    ctx.save();
    ctx.translate(offset.x, offset.y)?;
    ctx.begin_path();
    ctx.rect(clip.x, clip.y, clip.width, clip.height);
    ctx.clip();
    ctx.translate(t.x, t.y)?;
    ctx.scale(t.k, t.k)?;

    // Selected elements last so they sit on top.
    for (_, element) in scene.iter().filter(|(_, e)| !e.classes.selected) {
        draw_shape(ctx, &element.shape, element.classes)?;
    }
    for (_, element) in scene.iter().filter(|(_, e)| e.classes.selected) {
        draw_shape(ctx, &element.shape, element.classes)?;
    }
    ctx.restore();
    Ok(())
}

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape, classes: Classes) -> Result<(), JsValue> {
    match shape {
        Shape::Circle { center, radius } => {
            ctx.set_fill_style_str(fill_for(classes, false));
            ctx.begin_path();
            ctx.arc(center.x, center.y, *radius, 0.0, 2.0 * PI)?;
            ctx.fill();
        }
        Shape::Text { text, font_size, rect } => {
            ctx.set_fill_style_str(fill_for(classes, true));
            ctx.set_font(&format!("{font_size:.0}px sans-serif"));
            ctx.set_text_align("left");
            ctx.set_text_baseline("alphabetic");
            ctx.fill_text(text, rect.x, rect.y + rect.height)?;
        }
    }
    Ok(())
}

// =============================================================
// Axes
// =============================================================

fn draw_axis(ctx: &CanvasRenderingContext2d, axis: &Axis) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(axis.origin.x, axis.origin.y)?;
    ctx.set_stroke_style_str(AXIS_COLOR);
    ctx.set_fill_style_str(AXIS_COLOR);
    ctx.set_line_width(1.0);
    ctx.set_font(AXIS_FONT);

    let (start, end) = axis.extent;
    ctx.begin_path();
    match axis.orient {
        AxisOrient::Bottom => {
            ctx.move_to(start, 0.0);
            ctx.line_to(end, 0.0);
            for tick in &axis.ticks {
                ctx.move_to(tick.offset, 0.0);
                ctx.line_to(tick.offset, TICK_SIZE);
            }
        }
        AxisOrient::Left => {
            ctx.move_to(0.0, start);
            ctx.line_to(0.0, end);
            for tick in &axis.ticks {
                ctx.move_to(0.0, tick.offset);
                ctx.line_to(-TICK_SIZE, tick.offset);
            }
        }
    }
    ctx.stroke();

    match axis.orient {
        AxisOrient::Bottom => {
            ctx.set_text_align("center");
            ctx.set_text_baseline("top");
            for tick in &axis.ticks {
                ctx.fill_text(&tick.label, tick.offset, TICK_SIZE + TICK_PADDING)?;
            }
        }
        AxisOrient::Left => {
            ctx.set_text_align("right");
            ctx.set_text_baseline("middle");
            for tick in &axis.ticks {
                ctx.fill_text(&tick.label, -(TICK_SIZE + TICK_PADDING), tick.offset)?;
            }
        }
    }
    ctx.restore();
    Ok(())
}
