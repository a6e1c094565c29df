//! Retained scene: one visual element per data item, keyed by a stable id.
//!
//! The scene replaces a DOM tree. Elements live in an arena keyed by document
//! id (scatterplot) or word (word cloud) and are reconciled against new data
//! with [`Scene::join`]: unseen keys enter, known keys are updated in place
//! (keeping their classes), and keys that disappeared exit.
//!
//! Element shapes are in data-layer coordinates. The layer as a whole is drawn
//! at [`Scene::offset`] (the plot margins) under [`Scene::transform`], so a
//! zoom change touches two fields and never the elements.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::BTreeMap;

use crate::axis::Axis;
use crate::geometry::{Point, Rect};
use crate::transform::ZoomTransform;

/// What an element draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { center: Point, radius: f64 },
    /// Text whose box is `rect`; the baseline sits at the bottom edge.
    Text { text: String, font_size: f64, rect: Rect },
}

impl Shape {
    /// Anchor used for nearest-element tie breaks and popover placement.
    #[must_use]
    pub fn center(&self) -> Point {
        match self {
            Self::Circle { center, .. } => *center,
            Self::Text { rect, .. } => rect.center(),
        }
    }
}

/// Visual state toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Member of the current selection.
    Selected,
    /// Document contains every selected word.
    Filtered,
    /// Word shared by every compared document.
    Common,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classes {
    pub selected: bool,
    pub filtered: bool,
    pub common: bool,
}

impl Classes {
    #[must_use]
    pub fn has(&self, class: Class) -> bool {
        match class {
            Class::Selected => self.selected,
            Class::Filtered => self.filtered,
            Class::Common => self.common,
        }
    }

    fn slot(&mut self, class: Class) -> &mut bool {
        match class {
            Class::Selected => &mut self.selected,
            Class::Filtered => &mut self.filtered,
            Class::Common => &mut self.common,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub shape: Shape,
    pub classes: Classes,
}

/// Outcome of a [`Scene::join`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// Element arena plus the layer placement and axes of one engine.
#[derive(Debug, Clone)]
pub struct Scene<K: Ord> {
    elements: BTreeMap<K, Element>,
    offset: Point,
    transform: ZoomTransform,
    clip: Rect,
    pub x_axis: Option<Axis>,
    pub y_axis: Option<Axis>,
}

impl<K: Ord> Default for Scene<K> {
    fn default() -> Self {
        Self {
            elements: BTreeMap::new(),
            offset: Point::default(),
            transform: ZoomTransform::IDENTITY,
            clip: Rect::default(),
            x_axis: None,
            y_axis: None,
        }
    }
}

impl<K: Ord> Scene<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the arena with `items`. Later duplicates of a key win.
    pub fn join<I>(&mut self, items: I) -> JoinStats
    where
        I: IntoIterator<Item = (K, Shape)>,
    {
        let mut stats = JoinStats::default();
        let mut next: BTreeMap<K, Element> = BTreeMap::new();
        for (key, shape) in items {
            if let Some(mut existing) = self.elements.remove(&key) {
                existing.shape = shape;
                stats.updated += 1;
                next.insert(key, existing);
            } else if let Some(dup) = next.get_mut(&key) {
                dup.shape = shape;
            } else {
                stats.entered += 1;
                next.insert(key, Element { shape, classes: Classes::default() });
            }
        }
        stats.exited = self.elements.len();
        self.elements = next;
        stats
    }

    /// Remove every element.
    pub fn clear(&mut self) -> usize {
        let removed = self.elements.len();
        self.elements.clear();
        removed
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&Element> {
        self.elements.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.elements.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in key order (also the paint order).
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Element)> {
        self.elements.iter()
    }

    /// Keys carrying `class`.
    pub fn with_class(&self, class: Class) -> impl Iterator<Item = &K> {
        self.elements.iter().filter(move |(_, e)| e.classes.has(class)).map(|(k, _)| k)
    }

    /// Toggle `class` on one element. Returns `true` when it changed.
    pub fn set_class(&mut self, key: &K, class: Class, on: bool) -> bool {
        let Some(element) = self.elements.get_mut(key) else {
            return false;
        };
        let slot = element.classes.slot(class);
        let changed = *slot != on;
        *slot = on;
        changed
    }

    /// Set `class` on every element to `member(key, element)`. Returns how many changed.
    pub fn assign_class<F>(&mut self, class: Class, mut member: F) -> usize
    where
        F: FnMut(&K, &Element) -> bool,
    {
        let mut changed = 0;
        for (key, element) in &mut self.elements {
            let on = member(key, &*element);
            let slot = element.classes.slot(class);
            if *slot != on {
                *slot = on;
                changed += 1;
            }
        }
        changed
    }

    /// Surface-space translation of the data layer (the plot margins).
    #[must_use]
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    /// Zoom transform applied to the data layer.
    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: ZoomTransform) {
        self.transform = transform;
    }

    /// Inner plot area in layer-offset coordinates; drawing is clipped to it.
    #[must_use]
    pub fn clip(&self) -> Rect {
        self.clip
    }

    pub fn set_clip(&mut self, clip: Rect) {
        self.clip = clip;
    }

    /// Layer-local position of a surface point.
    #[must_use]
    pub fn surface_to_local(&self, surface: Point) -> Point {
        self.transform.invert(Point::new(surface.x - self.offset.x, surface.y - self.offset.y))
    }

    /// Surface position of a layer-local point.
    #[must_use]
    pub fn local_to_surface(&self, local: Point) -> Point {
        let inner = self.transform.apply(local);
        Point::new(inner.x + self.offset.x, inner.y + self.offset.y)
    }
}
