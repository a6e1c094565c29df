//! Document scatterplot.
//!
//! [`ScatterplotCore`] holds all scatterplot logic and is driven directly by
//! tests; [`Scatterplot`] binds it to a container element in the browser.
//!
//! Points are placed once per data, size, or fixed-ratio change at
//! `(x_scale(x), y_scale(y))` in the data layer. Zooming and panning only
//! update the layer transform and rebuild the two axes from the zoomed scales.
//!
//! Selection state is a read replica of the host's: [`ScatterplotCore::set_selected_points`]
//! and [`ScatterplotCore::set_selected_words`] copy incoming snapshots unless
//! their version was already applied, and clicks report a freshly minted
//! snapshot through the change handler.

#[cfg(test)]
#[path = "scatterplot_test.rs"]
mod scatterplot_test;

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use uuid::Uuid;
use web_sys::HtmlElement;

use crate::axis::{Axis, AxisOrient};
use crate::config::ScatterplotConfig;
use crate::dataset::{DatasetDocument, DocId};
use crate::engine::{Action, Cursor, EngineId, SurfaceCore, SurfaceEvent};
use crate::error::VizError;
use crate::geometry::{Bounds, LinearScale, Point, Rect, compute_bounds, square_bounds};
use crate::hit::{HitTarget, hit_test};
use crate::input::{Button, Modifiers, WheelDelta};
use crate::popover::{NoopPopover, Popover};
use crate::scene::{Class, Scene, Shape};
use crate::selection::{ChangeHandler, SelectedPoints, SelectedWords, SnapshotMinter, Version};
use crate::transform::ZoomTransform;
use crate::web::{DomPopover, DomSurface, Outbox};

/// Testable scatterplot state. See the module docs.
pub struct ScatterplotCore {
    surface: SurfaceCore,
    config: ScatterplotConfig,
    documents: Vec<Rc<DatasetDocument>>,
    index: HashMap<DocId, usize>,
    bounds: Bounds,
    x_scale: LinearScale,
    y_scale: LinearScale,
    fixed_ratio: bool,
    selected: BTreeSet<DocId>,
    selected_version: Option<Version>,
    words: BTreeSet<String>,
    words_version: Option<Version>,
    minter: SnapshotMinter,
    handler: Option<ChangeHandler<DocId>>,
    scene: Scene<DocId>,
    hovered: Option<DocId>,
    popover: Box<dyn Popover>,
    popover_for: Option<DocId>,
    /// Last point selected by a click; its popover returns once hover moves off.
    pinned: Option<DocId>,
}

impl ScatterplotCore {
    #[must_use]
    pub fn new(config: ScatterplotConfig, popover: Box<dyn Popover>) -> Self {
        let id = config.instance_id.unwrap_or_else(Uuid::new_v4);
        let surface = SurfaceCore::new(id, config.margins, config.scale_extent, config.transition_ms);
        let fixed_ratio = config.fixed_ratio && config.capabilities.fixed_ratio;
        let mut core = Self {
            surface,
            config,
            documents: Vec::new(),
            index: HashMap::new(),
            bounds: Bounds::default(),
            x_scale: LinearScale::default(),
            y_scale: LinearScale::default(),
            fixed_ratio,
            selected: BTreeSet::new(),
            selected_version: None,
            words: BTreeSet::new(),
            words_version: None,
            minter: SnapshotMinter::new(id),
            handler: None,
            scene: Scene::new(),
            hovered: None,
            popover,
            popover_for: None,
            pinned: None,
        };
        core.update_domain();
        core
    }

    // --- Data inputs ---

    /// Replace the working documents.
    ///
    /// The selection is kept as is; reconciling it with the new data is the
    /// host's job. Once sized, the zoom resets to identity without animation
    /// and points are re-joined by id.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn set_data(&mut self, documents: Vec<Rc<DatasetDocument>>) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        self.index = documents.iter().enumerate().map(|(i, d)| (d.id, i)).collect();
        self.documents = documents;
        tracing::debug!(engine = %self.surface.id(), documents = self.documents.len(), "set data");

        if self.hovered.is_some_and(|id| !self.index.contains_key(&id)) {
            self.hovered = None;
        }
        if self.pinned.is_some_and(|id| !self.index.contains_key(&id)) {
            self.pinned = None;
        }
        if self.popover_for.is_some_and(|id| !self.index.contains_key(&id)) {
            self.hide_popover();
        }

        self.update_domain();
        if !self.surface.is_sized() {
            return Ok(Vec::new());
        }
        self.surface.zoom_to(ZoomTransform::IDENTITY, false);
        self.update_view();
        self.render_points();
        Ok(self.actions(true))
    }

    /// Same as `set_data` with no documents.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn clear_data(&mut self) -> Result<Vec<Action>, VizError> {
        self.set_data(Vec::new())
    }

    /// Apply the host's point selection unless this version is already applied.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn set_selected_points(&mut self, snapshot: &SelectedPoints) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        if self.selected_version == Some(snapshot.version()) {
            return Ok(Vec::new());
        }
        self.selected = snapshot.items().clone();
        self.selected_version = Some(snapshot.version());
        tracing::debug!(
            engine = %self.surface.id(),
            version = %snapshot.version(),
            selected = self.selected.len(),
            "map selected points"
        );
        let changed = self.apply_selected_classes();
        if self.pinned.is_some_and(|id| !self.selected.contains(&id)) {
            self.pinned = None;
        }
        if self.popover_for.is_some_and(|id| !self.selected.contains(&id) && self.hovered != Some(id)) {
            self.hide_popover();
        }
        Ok(self.actions(changed > 0))
    }

    /// Flag points whose words include every selected word.
    ///
    /// An empty word selection flags nothing.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::CapabilityDisabled`] when word filtering is off and
    /// [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn set_selected_words(&mut self, snapshot: &SelectedWords) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        if !self.config.capabilities.word_filter {
            return Err(VizError::CapabilityDisabled("word_filter"));
        }
        if self.words_version == Some(snapshot.version()) {
            return Ok(Vec::new());
        }
        self.words = snapshot.items().clone();
        self.words_version = Some(snapshot.version());
        tracing::debug!(
            engine = %self.surface.id(),
            version = %snapshot.version(),
            words = self.words.len(),
            "map selected words"
        );
        let changed = self.apply_filter_classes();
        Ok(self.actions(changed > 0))
    }

    /// Toggle square data bounds. Resets the zoom without animation.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::CapabilityDisabled`] when the fixed-ratio capability
    /// is off and [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn set_fixed_ratio(&mut self, fixed_ratio: bool) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        if !self.config.capabilities.fixed_ratio {
            return Err(VizError::CapabilityDisabled("fixed_ratio"));
        }
        if self.fixed_ratio == fixed_ratio {
            return Ok(Vec::new());
        }
        self.fixed_ratio = fixed_ratio;
        tracing::debug!(engine = %self.surface.id(), fixed_ratio, "set fixed ratio");
        self.update_domain();
        if !self.surface.is_sized() {
            return Ok(Vec::new());
        }
        self.update_range();
        self.surface.zoom_to(ZoomTransform::IDENTITY, false);
        self.update_view();
        self.render_points();
        Ok(self.actions(true))
    }

    /// Return to the identity transform, eased when `animate` is set.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn reset_zoom(&mut self, animate: bool) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        let changed = self.surface.zoom_to(ZoomTransform::IDENTITY, animate);
        if changed {
            self.update_view();
        }
        Ok(self.actions(changed))
    }

    /// Pan (keeping the scale) so document `id` sits in the middle of the plot.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::NotSized`] before the first resize,
    /// [`VizError::UnknownDocument`] when `id` is not in the current data, and
    /// [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn zoom_to_point(&mut self, id: DocId, animate: bool) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        if !self.surface.is_sized() {
            return Err(VizError::NotSized);
        }
        let document = self.document(id).ok_or(VizError::UnknownDocument(id))?;
        let local = self.local_position(document);
        let target = self.surface.transform().translated_to(local, self.surface.inner_center());
        tracing::debug!(engine = %self.surface.id(), id, animate, "zoom to point");
        let changed = self.surface.zoom_to(target, animate);
        if changed {
            self.update_view();
        }
        Ok(self.actions(changed))
    }

    /// Install (or with `None`, remove) the single selection change handler.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn set_selected_points_change_handler(&mut self, handler: Option<ChangeHandler<DocId>>) -> Result<(), VizError> {
        self.surface.check_live()?;
        self.handler = handler;
        Ok(())
    }

    /// Release the popover and every element. No further calls are valid.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] when called a second time.
    pub fn destroy(&mut self) -> Result<(), VizError> {
        self.surface.destroy()?;
        self.popover.destroy();
        self.popover_for = None;
        self.pinned = None;
        self.hovered = None;
        self.handler = None;
        self.scene.clear();
        self.scene.x_axis = None;
        self.scene.y_axis = None;
        self.documents.clear();
        self.index.clear();
        Ok(())
    }

    /// React to an observed surface size. Keeps zoom and selection.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn resize(&mut self, width: f64, height: f64) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        if !self.surface.resize(width, height) {
            return Ok(Vec::new());
        }
        self.update_range();
        self.update_view();
        self.render_points();
        Ok(self.actions(true))
    }

    // --- Input events ---

    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        self.surface.pointer_down(pt, button);
        Ok(self.actions(false))
    }

    /// Pans while dragging, otherwise tracks hover for the popover.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn on_pointer_move(&mut self, pt: Point) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        match self.surface.pointer_move(pt) {
            SurfaceEvent::ZoomChanged => {
                self.update_view();
                Ok(self.actions(true))
            }
            SurfaceEvent::None | SurfaceEvent::Click(_) => {
                if !self.surface.is_dragging() {
                    let target = hit_test(&self.scene, pt, self.config.hit_slop_px);
                    self.hover(target.element().copied());
                }
                Ok(self.actions(false))
            }
        }
    }

    /// A release without a drag is a click: toggle the point under it, or
    /// clear the selection on the background.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn on_pointer_up(&mut self, pt: Point, button: Button) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        let changed = match self.surface.pointer_up(pt, button) {
            SurfaceEvent::Click(at) => self.click(at),
            SurfaceEvent::None | SurfaceEvent::ZoomChanged => false,
        };
        Ok(self.actions(changed))
    }

    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn on_pointer_leave(&mut self) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        self.surface.pointer_leave();
        self.hover(None);
        Ok(self.actions(false))
    }

    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn on_wheel(&mut self, pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        let changed = self.surface.wheel(pt, delta, modifiers);
        if changed {
            self.update_view();
        }
        Ok(self.actions(changed))
    }

    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn on_double_click(&mut self, pt: Point, modifiers: Modifiers) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        self.surface.double_click(pt, modifiers);
        Ok(self.actions(false))
    }

    /// Advance a running zoom transition to `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`ScatterplotCore::destroy`].
    pub fn tick(&mut self, now_ms: f64) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        let changed = self.surface.tick(now_ms);
        if changed {
            self.update_view();
        }
        Ok(self.actions(changed))
    }

    // --- Queries ---

    #[must_use]
    pub fn id(&self) -> EngineId {
        self.surface.id()
    }

    #[must_use]
    pub fn surface(&self) -> &SurfaceCore {
        &self.surface
    }

    #[must_use]
    pub fn scene(&self) -> &Scene<DocId> {
        &self.scene
    }

    /// Data bounds after the fixed-ratio adjustment.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn x_scale(&self) -> LinearScale {
        self.x_scale
    }

    #[must_use]
    pub fn y_scale(&self) -> LinearScale {
        self.y_scale
    }

    /// Scales with the current zoom applied, as used for the axes.
    #[must_use]
    pub fn zoomed_scales(&self) -> (LinearScale, LinearScale) {
        let t = self.surface.transform();
        (t.rescale_x(&self.x_scale), t.rescale_y(&self.y_scale))
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.surface.transform()
    }

    #[must_use]
    pub fn fixed_ratio(&self) -> bool {
        self.fixed_ratio
    }

    #[must_use]
    pub fn documents(&self) -> &[Rc<DatasetDocument>] {
        &self.documents
    }

    #[must_use]
    pub fn document(&self, id: DocId) -> Option<&Rc<DatasetDocument>> {
        self.index.get(&id).and_then(|i| self.documents.get(*i))
    }

    #[must_use]
    pub fn is_selected(&self, id: DocId) -> bool {
        self.scene.get(&id).is_some_and(|e| e.classes.selected)
    }

    #[must_use]
    pub fn is_filtered(&self, id: DocId) -> bool {
        self.scene.get(&id).is_some_and(|e| e.classes.filtered)
    }

    #[must_use]
    pub fn hovered(&self) -> Option<DocId> {
        self.hovered
    }

    // --- Internals ---

    fn actions(&self, changed: bool) -> Vec<Action> {
        let cursor = if self.hovered.is_some() { Cursor::Pointer } else { Cursor::Default };
        self.surface.actions(changed, cursor)
    }

    fn local_position(&self, document: &DatasetDocument) -> Point {
        Point::new(self.x_scale.apply(document.position.x), self.y_scale.apply(document.position.y))
    }

    fn update_domain(&mut self) {
        let bounds = compute_bounds(self.documents.iter().map(|d| d.position));
        self.bounds = if self.fixed_ratio { square_bounds(bounds) } else { bounds };
        self.x_scale.set_domain(self.bounds.min_x, self.bounds.max_x);
        self.y_scale.set_domain(self.bounds.min_y, self.bounds.max_y);
    }

    /// Pixel ranges of the plot area. With a fixed ratio both axes share the
    /// shorter side, anchored at the bottom-left corner.
    fn update_range(&mut self) {
        let (w, h) = self.surface.inner_size();
        if self.fixed_ratio {
            let side = w.min(h);
            self.x_scale.set_range(0.0, side);
            self.y_scale.set_range(h, h - side);
        } else {
            self.x_scale.set_range(0.0, w);
            self.y_scale.set_range(h, 0.0);
        }
    }

    /// Layer transform and axes. Cost is independent of the number of points.
    fn update_view(&mut self) {
        let t = self.surface.transform();
        let (w, h) = self.surface.inner_size();
        let offset = self.surface.offset();
        self.scene.set_offset(offset);
        self.scene.set_clip(Rect::new(0.0, 0.0, w, h));
        self.scene.set_transform(t);
        let (zoomed_x, zoomed_y) = self.zoomed_scales();
        self.scene.x_axis = Some(Axis::build(
            AxisOrient::Bottom,
            &zoomed_x,
            Point::new(offset.x, offset.y + h),
            self.config.tick_count,
        ));
        self.scene.y_axis = Some(Axis::build(AxisOrient::Left, &zoomed_y, offset, self.config.tick_count));
        tracing::trace!(engine = %self.surface.id(), transform = %t, "view updated");

        if let Some(id) = self.popover_for {
            self.show_popover(id);
        }
    }

    fn render_points(&mut self) {
        let radius = self.config.point_radius;
        let shapes: Vec<(DocId, Shape)> = self
            .documents
            .iter()
            .map(|d| (d.id, Shape::Circle { center: self.local_position(d), radius }))
            .collect();
        let stats = self.scene.join(shapes);
        tracing::debug!(
            engine = %self.surface.id(),
            entered = stats.entered,
            updated = stats.updated,
            exited = stats.exited,
            "points joined"
        );
        self.apply_selected_classes();
        if self.config.capabilities.word_filter {
            self.apply_filter_classes();
        }
    }

    fn apply_selected_classes(&mut self) -> usize {
        let selected = &self.selected;
        self.scene.assign_class(Class::Selected, |id, _| selected.contains(id))
    }

    fn apply_filter_classes(&mut self) -> usize {
        let words = &self.words;
        let documents = &self.documents;
        let index = &self.index;
        self.scene.assign_class(Class::Filtered, |id, _| {
            !words.is_empty()
                && index
                    .get(id)
                    .and_then(|i| documents.get(*i))
                    .is_some_and(|d| words.iter().all(|w| d.word_counts.contains_key(w)))
        })
    }

    fn click(&mut self, at: Point) -> bool {
        match hit_test(&self.scene, at, self.config.hit_slop_px) {
            HitTarget::Element(id) => {
                let selected = if self.selected.remove(&id) {
                    false
                } else {
                    self.selected.insert(id);
                    true
                };
                self.scene.set_class(&id, Class::Selected, selected);
                if selected {
                    self.pinned = Some(id);
                    self.show_popover(id);
                } else {
                    if self.pinned == Some(id) {
                        self.pinned = None;
                    }
                    if self.popover_for == Some(id) && self.hovered != Some(id) {
                        self.hide_popover();
                    }
                }
                tracing::debug!(engine = %self.surface.id(), id, selected, "point clicked");
                self.notify();
                true
            }
            HitTarget::Background => {
                self.pinned = None;
                if self.popover_for.is_some() {
                    self.hide_popover();
                }
                if self.selected.is_empty() {
                    return false;
                }
                self.selected.clear();
                self.apply_selected_classes();
                tracing::debug!(engine = %self.surface.id(), "selection cleared");
                self.notify();
                true
            }
        }
    }

    fn notify(&mut self) {
        let snapshot = self.minter.mint(self.selected.iter().copied());
        self.selected_version = Some(snapshot.version());
        if let Some(handler) = self.handler.as_mut() {
            handler(snapshot);
        }
    }

    fn hover(&mut self, target: Option<DocId>) {
        if target == self.hovered {
            return;
        }
        let previous = std::mem::replace(&mut self.hovered, target);
        if !self.config.capabilities.popover {
            return;
        }
        if let Some(id) = target {
            self.show_popover(id);
            return;
        }
        // Hover left a point: fall back to the pinned one, if any.
        if let Some(pin) = self.pinned.filter(|id| self.selected.contains(id)) {
            if self.popover_for != Some(pin) {
                self.show_popover(pin);
            }
        } else if let Some(id) = previous {
            if self.popover_for == Some(id) && !self.selected.contains(&id) {
                self.hide_popover();
            }
        }
    }

    fn show_popover(&mut self, id: DocId) {
        if !self.config.capabilities.popover {
            return;
        }
        let Some(document) = self.document(id).map(Rc::clone) else {
            return;
        };
        let anchor = self.scene.local_to_surface(self.local_position(&document));
        self.popover.show(anchor, &document);
        self.popover_for = Some(id);
    }

    fn hide_popover(&mut self) {
        self.popover.hide();
        self.popover_for = None;
    }
}

/// Scatterplot bound to a container element.
///
/// Owns a `<canvas>` appended to the container and a hover popover; all calls
/// are forwarded to a [`ScatterplotCore`]. Failed operations are logged and
/// skipped. Change handlers run after the core is released, so they may call
/// back into this scatterplot.
pub struct Scatterplot {
    core: Rc<RefCell<ScatterplotCore>>,
    surface: DomSurface<ScatterplotCore>,
    outbox: Outbox<DocId>,
}

impl Scatterplot {
    /// Attach to `container`.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Dom`] when the canvas or popover cannot be created.
    pub fn new(container: &HtmlElement, config: ScatterplotConfig) -> Result<Self, VizError> {
        let popover: Box<dyn Popover> = if config.capabilities.popover {
            Box::new(DomPopover::new(container)?)
        } else {
            Box::new(NoopPopover)
        };
        let outbox = Outbox::new();
        let mut core = ScatterplotCore::new(config, popover);
        core.set_selected_points_change_handler(Some(outbox.sink()))?;
        let core = Rc::new(RefCell::new(core));
        let surface = DomSurface::attach(container, Rc::clone(&core), outbox.flusher())?;
        Ok(Self { core, surface, outbox })
    }

    pub fn set_data(&self, documents: Vec<Rc<DatasetDocument>>) {
        self.dispatch("set_data", |core| core.set_data(documents));
    }

    pub fn clear_data(&self) {
        self.dispatch("clear_data", ScatterplotCore::clear_data);
    }

    pub fn set_selected_points(&self, snapshot: &SelectedPoints) {
        self.dispatch("set_selected_points", |core| core.set_selected_points(snapshot));
    }

    pub fn set_selected_words(&self, snapshot: &SelectedWords) {
        self.dispatch("set_selected_words", |core| core.set_selected_words(snapshot));
    }

    pub fn set_fixed_ratio(&self, fixed_ratio: bool) {
        self.dispatch("set_fixed_ratio", |core| core.set_fixed_ratio(fixed_ratio));
    }

    pub fn reset_zoom(&self, animate: bool) {
        self.dispatch("reset_zoom", |core| core.reset_zoom(animate));
    }

    pub fn zoom_to_point(&self, id: DocId, animate: bool) {
        self.dispatch("zoom_to_point", |core| core.zoom_to_point(id, animate));
    }

    /// Replace the selection change handler.
    pub fn set_selected_points_change_handler<F>(&self, handler: F)
    where
        F: FnMut(SelectedPoints) + 'static,
    {
        self.outbox.set_handler(Some(Box::new(handler)));
    }

    /// Tear down the canvas, observer, listeners, and popover.
    pub fn destroy(&self) {
        self.surface.destroy();
        self.outbox.set_handler(None);
    }

    /// Run `op` against the core, then apply its actions and deliver any
    /// selection changes it produced.
    fn dispatch<F>(&self, op: &'static str, f: F)
    where
        F: FnOnce(&mut ScatterplotCore) -> Result<Vec<Action>, VizError>,
    {
        let result = match self.core.try_borrow_mut() {
            Ok(mut core) => f(&mut *core),
            Err(_) => {
                tracing::warn!(op, "scatterplot busy; call skipped");
                return;
            }
        };
        match result {
            Ok(actions) => self.surface.apply(&actions),
            Err(err) => tracing::warn!(engine = %self.surface.id(), op, %err, "operation skipped"),
        }
        self.outbox.flush();
    }
}
