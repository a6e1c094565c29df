//! Word cloud layout: font sizing and greedy spiral placement.
//!
//! Words are sized linearly by count between [`MIN_FONT_SIZE`] and
//! [`MAX_FONT_SIZE`], then placed from most to least frequent. Each word starts
//! with its box centered on the canvas and walks outward along an Archimedean
//! spiral (`r = SPIRAL_STEP · θ`, `θ` advancing by [`SPIRAL_ANGLE_STEP`]) until
//! its margin-inflated box no longer overlaps any word placed before it.
//!
//! The procedure is deterministic: equal counts keep the iteration order of
//! the input map, and there is no randomness anywhere. Positions are not
//! clamped to the canvas, so large words may end up partially outside it.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::BTreeMap;

use crate::consts::{
    MAX_FONT_SIZE, MIN_FONT_SIZE, SPIRAL_ANGLE_STEP, SPIRAL_MAX_STEPS, SPIRAL_STEP, WORD_MARGIN,
};
use crate::geometry::{LinearScale, Rect, estimate_text_size, rects_overlap};

/// A word with its font size and its box (top-left corner, estimated extent).
///
/// Text is drawn with its baseline at `rect.y + rect.height`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub font_size: f64,
    pub rect: Rect,
}

/// A complete layout, in placement order (most frequent first).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordCloudLayout {
    pub words: Vec<PlacedWord>,
}

impl WordCloudLayout {
    /// Lay out `counts` on a `width` × `height` canvas.
    #[must_use]
    pub fn compute(counts: &BTreeMap<String, u32>, width: f64, height: f64) -> Self {
        debug_assert!(width.is_finite() && height.is_finite(), "non-finite canvas {width}x{height}");
        let width = if width.is_finite() { width } else { 0.0 };
        let height = if height.is_finite() { height } else { 0.0 };

        let sizes = font_sizes(counts);
        let mut order: Vec<(&str, u32, f64)> = counts
            .iter()
            .zip(sizes)
            .map(|((word, count), size)| (word.as_str(), *count, size))
            .collect();
        // Stable: equal counts keep map order.
        order.sort_by(|a, b| b.1.cmp(&a.1));

        let mut placed: Vec<PlacedWord> = Vec::with_capacity(order.len());
        for (word, _, font_size) in order {
            let rect = place(word, font_size, width, height, &placed);
            placed.push(PlacedWord { word: word.to_owned(), font_size, rect });
        }
        Self { words: placed }
    }

    /// Box of `word`, if it is part of the layout.
    #[must_use]
    pub fn get(&self, word: &str) -> Option<&PlacedWord> {
        self.words.iter().find(|w| w.word == word)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Font size per word, in the iteration order of `counts`.
///
/// When every count is equal the collapsed scale yields the middle of the font
/// range for all words.
#[must_use]
pub fn font_sizes(counts: &BTreeMap<String, u32>) -> Vec<f64> {
    let min = counts.values().copied().min().unwrap_or(0);
    let max = counts.values().copied().max().unwrap_or(0);
    let scale = LinearScale::new((f64::from(min), f64::from(max)), (MIN_FONT_SIZE, MAX_FONT_SIZE));
    counts.values().map(|c| scale.apply(f64::from(*c))).collect()
}

fn place(word: &str, font_size: f64, width: f64, height: f64, placed: &[PlacedWord]) -> Rect {
    let (w, h) = estimate_text_size(word, font_size);
    let cx = width / 2.0 - w / 2.0;
    let cy = height / 2.0 - h / 2.0;
    let mut rect = Rect::new(cx, cy, w, h);

    let mut step = 0;
    while placed.iter().any(|other| rects_overlap(&rect, &other.rect, WORD_MARGIN)) {
        step += 1;
        if step > SPIRAL_MAX_STEPS {
            tracing::warn!(word, "spiral placement gave up; word overlaps");
            break;
        }
        let theta = f64::from(step) * SPIRAL_ANGLE_STEP;
        rect.x = cx + SPIRAL_STEP * theta * theta.cos();
        rect.y = cy + SPIRAL_STEP * theta * theta.sin();
    }
    rect
}
