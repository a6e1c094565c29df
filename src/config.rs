//! Engine configuration.
//!
//! Hosts pass JSON; every field has a default so partial documents are fine:
//!
//! ```json
//! { "margins": { "left": 48 }, "capabilities": { "popover": false } }
//! ```

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::consts::{HIT_SLOP_PX, MAX_ZOOM, MIN_ZOOM, POINT_RADIUS, TICK_COUNT, TRANSITION_MS};
use crate::error::VizError;

/// Word cloud margin on every side, px.
const WORD_CLOUD_MARGIN: f64 = 32.0;

/// Space (px) between the surface edge and the inner plot area.
///
/// Deserialized only as part of an engine config, where sides missing from
/// the JSON keep that engine's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    #[must_use]
    pub fn uniform(px: f64) -> Self {
        Self { left: px, right: px, top: px, bottom: px }
    }

    /// Inner size left over from an outer `width` × `height`, never negative.
    #[must_use]
    pub fn inner(&self, width: f64, height: f64) -> (f64, f64) {
        ((width - self.left - self.right).max(0.0), (height - self.top - self.bottom).max(0.0))
    }
}

impl Default for Margins {
    /// Scatterplot margins: room for the left and bottom axes.
    fn default() -> Self {
        Self { left: 32.0, right: 32.0, top: 16.0, bottom: 32.0 }
    }
}

/// Margins as written in JSON: any side may be left out.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialMargins {
    left: Option<f64>,
    right: Option<f64>,
    top: Option<f64>,
    bottom: Option<f64>,
}

impl PartialMargins {
    fn over(self, base: Margins) -> Margins {
        Margins {
            left: self.left.unwrap_or(base.left),
            right: self.right.unwrap_or(base.right),
            top: self.top.unwrap_or(base.top),
            bottom: self.bottom.unwrap_or(base.bottom),
        }
    }
}

fn scatterplot_margins<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Margins, D::Error> {
    Ok(PartialMargins::deserialize(deserializer)?.over(Margins::default()))
}

fn word_cloud_margins<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Margins, D::Error> {
    Ok(PartialMargins::deserialize(deserializer)?.over(Margins::uniform(WORD_CLOUD_MARGIN)))
}

/// Optional scatterplot behaviors.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Show the hover popover for points.
    pub popover: bool,
    /// Allow switching to square data bounds.
    pub fixed_ratio: bool,
    /// Flag points matching the selected words.
    pub word_filter: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { popover: true, fixed_ratio: true, word_filter: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScatterplotConfig {
    /// Correlation id for log events; random when absent.
    pub instance_id: Option<Uuid>,
    #[serde(deserialize_with = "scatterplot_margins")]
    pub margins: Margins,
    /// Initial fixed-ratio mode.
    pub fixed_ratio: bool,
    pub scale_extent: (f64, f64),
    pub transition_ms: f64,
    /// Point radius in data-layer units.
    pub point_radius: f64,
    pub hit_slop_px: f64,
    pub tick_count: usize,
    pub capabilities: Capabilities,
}

impl Default for ScatterplotConfig {
    fn default() -> Self {
        Self {
            instance_id: None,
            margins: Margins::default(),
            fixed_ratio: false,
            scale_extent: (MIN_ZOOM, MAX_ZOOM),
            transition_ms: TRANSITION_MS,
            point_radius: POINT_RADIUS,
            hit_slop_px: HIT_SLOP_PX,
            tick_count: TICK_COUNT,
            capabilities: Capabilities::default(),
        }
    }
}

impl ScatterplotConfig {
    /// Parse a (possibly partial) JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Config`] when `json` is not a valid config document.
    pub fn from_json(json: &str) -> Result<Self, VizError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WordCloudConfig {
    pub instance_id: Option<Uuid>,
    #[serde(deserialize_with = "word_cloud_margins")]
    pub margins: Margins,
    pub scale_extent: (f64, f64),
    pub transition_ms: f64,
    pub hit_slop_px: f64,
    /// Recompute the layout when the surface size changes.
    pub relayout_on_resize: bool,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            instance_id: None,
            margins: Margins::uniform(WORD_CLOUD_MARGIN),
            scale_extent: (MIN_ZOOM, MAX_ZOOM),
            transition_ms: TRANSITION_MS,
            hit_slop_px: HIT_SLOP_PX,
            relayout_on_resize: true,
        }
    }
}

impl WordCloudConfig {
    /// Parse a (possibly partial) JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Config`] when `json` is not a valid config document.
    pub fn from_json(json: &str) -> Result<Self, VizError> {
        Ok(serde_json::from_str(json)?)
    }
}
