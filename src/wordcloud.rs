//! Per-document word cloud.
//!
//! [`WordCloudCore`] lays out one document's words with
//! [`WordCloudLayout`](crate::layout::WordCloudLayout) and keeps one text
//! element per word. Selection works like the scatterplot's: incoming
//! snapshots are copied unless their version was already applied, and a click
//! on a word (or on empty canvas) reports a freshly minted snapshot. The
//! "common" class is driven separately by the host and composes with
//! selection.
//!
//! The layout is recomputed when a different document is set, and on resize
//! unless `relayout_on_resize` is off.

#[cfg(test)]
#[path = "wordcloud_test.rs"]
mod wordcloud_test;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use uuid::Uuid;
use web_sys::HtmlElement;

use crate::config::WordCloudConfig;
use crate::dataset::DatasetDocument;
use crate::engine::{Action, Cursor, EngineId, SurfaceCore, SurfaceEvent};
use crate::error::VizError;
use crate::geometry::{Point, Rect};
use crate::hit::{HitTarget, hit_test};
use crate::input::{Button, Modifiers, WheelDelta};
use crate::layout::WordCloudLayout;
use crate::scene::{Class, Scene, Shape};
use crate::selection::{ChangeHandler, SelectedWords, SnapshotMinter, Version};
use crate::transform::ZoomTransform;
use crate::web::{DomSurface, Outbox};

/// Testable word cloud state. See the module docs.
pub struct WordCloudCore {
    surface: SurfaceCore,
    config: WordCloudConfig,
    document: Option<Rc<DatasetDocument>>,
    layout: WordCloudLayout,
    laid_out: bool,
    selected: BTreeSet<String>,
    selected_version: Option<Version>,
    common: BTreeSet<String>,
    common_version: Option<Version>,
    minter: SnapshotMinter,
    handler: Option<ChangeHandler<String>>,
    scene: Scene<String>,
    hovered: Option<String>,
}

impl WordCloudCore {
    #[must_use]
    pub fn new(config: WordCloudConfig) -> Self {
        let id = config.instance_id.unwrap_or_else(Uuid::new_v4);
        let surface = SurfaceCore::new(id, config.margins, config.scale_extent, config.transition_ms);
        Self {
            surface,
            config,
            document: None,
            layout: WordCloudLayout::default(),
            laid_out: false,
            selected: BTreeSet::new(),
            selected_version: None,
            common: BTreeSet::new(),
            common_version: None,
            minter: SnapshotMinter::new(id),
            handler: None,
            scene: Scene::new(),
            hovered: None,
        }
    }

    // --- Data inputs ---

    /// Show `document`, or nothing with `None`.
    ///
    /// Setting the document that is already shown does nothing. Otherwise the
    /// zoom resets and, once sized, the words are laid out again.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
    pub fn set_data(&mut self, document: Option<Rc<DatasetDocument>>) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        let same = match (&self.document, &document) {
            (Some(current), Some(next)) => Rc::ptr_eq(current, next),
            (None, None) => true,
            _ => false,
        };
        if same {
            return Ok(Vec::new());
        }
        tracing::debug!(engine = %self.surface.id(), document = ?document.as_ref().map(|d| d.id), "set data");
        self.document = document;
        self.laid_out = false;
        self.hovered = None;
        self.surface.zoom_to(ZoomTransform::IDENTITY, false);
        if !self.surface.is_sized() {
            self.layout = WordCloudLayout::default();
            self.scene.clear();
            return Ok(Vec::new());
        }
        self.relayout();
        self.update_view();
        Ok(self.actions(true))
    }

    /// Same as `set_data(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
    pub fn clear_data(&mut self) -> Result<Vec<Action>, VizError> {
        self.set_data(None)
    }

    /// Apply the host's word selection unless this version is already applied.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
    pub fn set_selected_words(&mut self, snapshot: &SelectedWords) -> Result<Vec<Action>, VizError> {
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
            "map selected words"
        );
        let changed = self.apply_selected_classes();
        Ok(self.actions(changed > 0))
    }

    /// Mark the words shared by every compared document.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
    pub fn set_common_words(&mut self, snapshot: &SelectedWords) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        if self.common_version == Some(snapshot.version()) {
            return Ok(Vec::new());
        }
        self.common = snapshot.items().clone();
        self.common_version = Some(snapshot.version());
        tracing::debug!(engine = %self.surface.id(), common = self.common.len(), "map common words");
        let changed = self.apply_common_classes();
        Ok(self.actions(changed > 0))
    }

    /// Install (or with `None`, remove) the single selection change handler.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
    pub fn set_selected_words_change_handler(&mut self, handler: Option<ChangeHandler<String>>) -> Result<(), VizError> {
        self.surface.check_live()?;
        self.handler = handler;
        Ok(())
    }

    /// Return to the identity transform, eased when `animate` is set.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
    pub fn reset_zoom(&mut self, animate: bool) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        let changed = self.surface.zoom_to(ZoomTransform::IDENTITY, animate);
        if changed {
            self.update_view();
        }
        Ok(self.actions(changed))
    }

    /// Release every element. No further calls are valid.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] when called a second time.
    pub fn destroy(&mut self) -> Result<(), VizError> {
        self.surface.destroy()?;
        self.handler = None;
        self.hovered = None;
        self.document = None;
        self.layout = WordCloudLayout::default();
        self.scene.clear();
        Ok(())
    }

    /// React to an observed surface size. Keeps zoom and selection.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
    pub fn resize(&mut self, width: f64, height: f64) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        if !self.surface.resize(width, height) {
            return Ok(Vec::new());
        }
        if self.document.is_some() && (self.config.relayout_on_resize || !self.laid_out) {
            self.relayout();
        }
        self.update_view();
        Ok(self.actions(true))
    }

    // --- Input events ---

    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        self.surface.pointer_down(pt, button);
        Ok(self.actions(false))
    }

    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
    pub fn on_pointer_move(&mut self, pt: Point) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        match self.surface.pointer_move(pt) {
            SurfaceEvent::ZoomChanged => {
                self.update_view();
                Ok(self.actions(true))
            }
            SurfaceEvent::None | SurfaceEvent::Click(_) => {
                if !self.surface.is_dragging() {
                    self.hovered = hit_test(&self.scene, pt, self.config.hit_slop_px).element().cloned();
                }
                Ok(self.actions(false))
            }
        }
    }

    /// A release without a drag toggles the word under it, or clears the
    /// selection on empty canvas.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
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
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
    pub fn on_pointer_leave(&mut self) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        self.surface.pointer_leave();
        self.hovered = None;
        Ok(self.actions(false))
    }

    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
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
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
    pub fn on_double_click(&mut self, pt: Point, modifiers: Modifiers) -> Result<Vec<Action>, VizError> {
        self.surface.check_live()?;
        self.surface.double_click(pt, modifiers);
        Ok(self.actions(false))
    }

    /// Advance a running zoom transition to `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Destroyed`] after [`WordCloudCore::destroy`].
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
    pub fn scene(&self) -> &Scene<String> {
        &self.scene
    }

    #[must_use]
    pub fn layout(&self) -> &WordCloudLayout {
        &self.layout
    }

    #[must_use]
    pub fn document(&self) -> Option<&Rc<DatasetDocument>> {
        self.document.as_ref()
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.surface.transform()
    }

    #[must_use]
    pub fn is_selected(&self, word: &str) -> bool {
        self.scene.get(&word.to_owned()).is_some_and(|e| e.classes.selected)
    }

    #[must_use]
    pub fn is_common(&self, word: &str) -> bool {
        self.scene.get(&word.to_owned()).is_some_and(|e| e.classes.common)
    }

    // --- Internals ---

    fn actions(&self, changed: bool) -> Vec<Action> {
        let cursor = if self.hovered.is_some() { Cursor::Pointer } else { Cursor::Default };
        self.surface.actions(changed, cursor)
    }

    fn relayout(&mut self) {
        let (w, h) = self.surface.inner_size();
        self.layout = match &self.document {
            Some(document) => WordCloudLayout::compute(&document.word_counts, w, h),
            None => WordCloudLayout::default(),
        };
        self.laid_out = true;
        let shapes = self.layout.words.iter().map(|placed| {
            (
                placed.word.clone(),
                Shape::Text { text: placed.word.clone(), font_size: placed.font_size, rect: placed.rect },
            )
        });
        let stats = self.scene.join(shapes);
        tracing::debug!(
            engine = %self.surface.id(),
            words = self.layout.len(),
            entered = stats.entered,
            exited = stats.exited,
            width = w,
            height = h,
            "words laid out"
        );
        self.apply_selected_classes();
        self.apply_common_classes();
    }

    fn update_view(&mut self) {
        let (w, h) = self.surface.inner_size();
        self.scene.set_offset(self.surface.offset());
        self.scene.set_clip(Rect::new(0.0, 0.0, w, h));
        self.scene.set_transform(self.surface.transform());
        tracing::trace!(engine = %self.surface.id(), transform = %self.surface.transform(), "view updated");
    }

    fn apply_selected_classes(&mut self) -> usize {
        let selected = &self.selected;
        self.scene.assign_class(Class::Selected, |word, _| selected.contains(word))
    }

    fn apply_common_classes(&mut self) -> usize {
        let common = &self.common;
        self.scene.assign_class(Class::Common, |word, _| common.contains(word))
    }

    fn click(&mut self, at: Point) -> bool {
        match hit_test(&self.scene, at, self.config.hit_slop_px) {
            HitTarget::Element(word) => {
                let selected = if self.selected.remove(&word) {
                    false
                } else {
                    self.selected.insert(word.clone());
                    true
                };
                self.scene.set_class(&word, Class::Selected, selected);
                tracing::debug!(engine = %self.surface.id(), word = %word, selected, "word clicked");
                self.notify();
                true
            }
            HitTarget::Background => {
                if self.selected.is_empty() {
                    return false;
                }
                self.selected.clear();
                self.apply_selected_classes();
                tracing::debug!(engine = %self.surface.id(), "word selection cleared");
                self.notify();
                true
            }
        }
    }

    fn notify(&mut self) {
        let snapshot = self.minter.mint(self.selected.iter().cloned());
        self.selected_version = Some(snapshot.version());
        if let Some(handler) = self.handler.as_mut() {
            handler(snapshot);
        }
    }
}

/// Word cloud bound to a container element.
///
/// Owns a `<canvas>` appended to the container and forwards every call to a
/// [`WordCloudCore`]. Failed operations are logged and skipped.
pub struct WordCloud {
    core: Rc<RefCell<WordCloudCore>>,
    surface: DomSurface<WordCloudCore>,
    outbox: Outbox<String>,
}

impl WordCloud {
    /// Attach to `container`.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Dom`] when the canvas cannot be created.
    pub fn new(container: &HtmlElement, config: WordCloudConfig) -> Result<Self, VizError> {
        let outbox = Outbox::new();
        let mut core = WordCloudCore::new(config);
        core.set_selected_words_change_handler(Some(outbox.sink()))?;
        let core = Rc::new(RefCell::new(core));
        let surface = DomSurface::attach(container, Rc::clone(&core), outbox.flusher())?;
        Ok(Self { core, surface, outbox })
    }

    pub fn set_data(&self, document: Option<Rc<DatasetDocument>>) {
        self.dispatch("set_data", |core| core.set_data(document));
    }

    pub fn clear_data(&self) {
        self.dispatch("clear_data", WordCloudCore::clear_data);
    }

    pub fn set_selected_words(&self, snapshot: &SelectedWords) {
        self.dispatch("set_selected_words", |core| core.set_selected_words(snapshot));
    }

    pub fn set_common_words(&self, snapshot: &SelectedWords) {
        self.dispatch("set_common_words", |core| core.set_common_words(snapshot));
    }

    pub fn reset_zoom(&self, animate: bool) {
        self.dispatch("reset_zoom", |core| core.reset_zoom(animate));
    }

    /// Replace the selection change handler.
    pub fn set_selected_words_change_handler<F>(&self, handler: F)
    where
        F: FnMut(SelectedWords) + 'static,
    {
        self.outbox.set_handler(Some(Box::new(handler)));
    }

    /// Tear down the canvas, observer, and listeners.
    pub fn destroy(&self) {
        self.surface.destroy();
        self.outbox.set_handler(None);
    }

    fn dispatch<F>(&self, op: &'static str, f: F)
    where
        F: FnOnce(&mut WordCloudCore) -> Result<Vec<Action>, VizError>,
    {
        let result = match self.core.try_borrow_mut() {
            Ok(mut core) => f(&mut *core),
            Err(_) => {
                tracing::warn!(op, "word cloud busy; call skipped");
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
