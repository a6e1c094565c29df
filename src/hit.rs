//! Hit-testing: resolve a surface point to the element under it.
//!
//! Pointer events carry no target identity on a canvas, so every click and
//! hover goes through [`hit_test`], and the engines branch on the returned
//! [`HitTarget`] instead of relying on event bubbling.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geometry::Point;
use crate::scene::{Scene, Shape};

/// What a pointer event landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget<K> {
    Element(K),
    Background,
}

impl<K> HitTarget<K> {
    #[must_use]
    pub fn element(&self) -> Option<&K> {
        match self {
            Self::Element(key) => Some(key),
            Self::Background => None,
        }
    }
}

/// Find the element under surface point `surface_pt`.
///
/// `slop_px` widens every target by that many screen pixels, independent of
/// zoom. When several targets qualify, the one whose center is nearest wins;
/// exact ties go to the element painted last. Points outside the scene's
/// clip are background: nothing is painted there.
#[must_use]
pub fn hit_test<K: Ord + Clone>(scene: &Scene<K>, surface_pt: Point, slop_px: f64) -> HitTarget<K> {
    let offset = scene.offset();
    let inner = Point::new(surface_pt.x - offset.x, surface_pt.y - offset.y);
    if !scene.clip().contains(inner, 0.0) {
        return HitTarget::Background;
    }

    let k = scene.transform().k;
    let slop = if k > 0.0 { slop_px / k } else { slop_px };
    let local = scene.surface_to_local(surface_pt);

    let mut best: Option<(&K, f64)> = None;
    for (key, element) in scene.iter() {
        let hit = match &element.shape {
            Shape::Circle { center, radius } => center.distance(local) <= radius + slop,
            Shape::Text { rect, .. } => rect.contains(local, slop),
        };
        if !hit {
            continue;
        }
        let distance = element.shape.center().distance(local);
        if best.is_none_or(|(_, d)| distance <= d) {
            best = Some((key, distance));
        }
    }
    best.map_or(HitTarget::Background, |(key, _)| HitTarget::Element(key.clone()))
}
