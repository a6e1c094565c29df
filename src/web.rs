//! Browser glue shared by the engine wrappers.
//!
//! [`DomSurface`] owns a `<canvas>` inside a host container and drives a core
//! through the [`SurfaceDriver`] trait: a `ResizeObserver` reports the
//! container size, pointer/wheel/dblclick listeners feed input, and a single
//! persistent `requestAnimationFrame` callback ticks zoom transitions and
//! draws. Cores stay free of DOM types; only this module and
//! [`crate::render`] touch the browser.
//!
//! Change handlers never run while a core is borrowed. Cores push snapshots
//! into an [`Outbox`], and the surface flushes it once the borrow is released,
//! so a handler may call straight back into any engine.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlElement, MouseEvent,
    PointerEvent, ResizeObserver, WheelEvent,
};

use crate::dataset::DatasetDocument;
use crate::engine::{Action, Cursor, EngineId};
use crate::error::VizError;
use crate::geometry::Point;
use crate::input::{Button, DeltaMode, Modifiers, WheelDelta};
use crate::popover::{Popover, PopoverContent};
use crate::render;
use crate::scatterplot::ScatterplotCore;
use crate::selection::{ChangeHandler, Snapshot};
use crate::wordcloud::WordCloudCore;

/// Popover distance from its anchor, in CSS pixels.
const POPOVER_OFFSET_PX: f64 = 8.0;

// =============================================================
// Driver seam
// =============================================================

/// What a [`DomSurface`] needs from an engine core.
pub trait SurfaceDriver: 'static {
    fn engine_id(&self) -> EngineId;
    fn observe_size(&mut self, width: f64, height: f64) -> Result<Vec<Action>, VizError>;
    fn pointer_down(&mut self, pt: Point, button: Button) -> Result<Vec<Action>, VizError>;
    fn pointer_move(&mut self, pt: Point) -> Result<Vec<Action>, VizError>;
    fn pointer_up(&mut self, pt: Point, button: Button) -> Result<Vec<Action>, VizError>;
    fn pointer_leave(&mut self) -> Result<Vec<Action>, VizError>;
    fn wheel(&mut self, pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Result<Vec<Action>, VizError>;
    fn double_click(&mut self, pt: Point, modifiers: Modifiers) -> Result<Vec<Action>, VizError>;
    fn advance(&mut self, now_ms: f64) -> Result<Vec<Action>, VizError>;
    fn is_animating(&self) -> bool;
    fn teardown(&mut self) -> Result<(), VizError>;
    /// Draw the current scene.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    fn draw(&self, ctx: &CanvasRenderingContext2d, dpr: f64) -> Result<(), JsValue>;
}

macro_rules! surface_driver {
    ($core:ty) => {
        impl SurfaceDriver for $core {
            fn engine_id(&self) -> EngineId {
                self.id()
            }

            fn observe_size(&mut self, width: f64, height: f64) -> Result<Vec<Action>, VizError> {
                self.resize(width, height)
            }

            fn pointer_down(&mut self, pt: Point, button: Button) -> Result<Vec<Action>, VizError> {
                self.on_pointer_down(pt, button)
            }

            fn pointer_move(&mut self, pt: Point) -> Result<Vec<Action>, VizError> {
                self.on_pointer_move(pt)
            }

            fn pointer_up(&mut self, pt: Point, button: Button) -> Result<Vec<Action>, VizError> {
                self.on_pointer_up(pt, button)
            }

            fn pointer_leave(&mut self) -> Result<Vec<Action>, VizError> {
                self.on_pointer_leave()
            }

            fn wheel(&mut self, pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Result<Vec<Action>, VizError> {
                self.on_wheel(pt, delta, modifiers)
            }

            fn double_click(&mut self, pt: Point, modifiers: Modifiers) -> Result<Vec<Action>, VizError> {
                self.on_double_click(pt, modifiers)
            }

            fn advance(&mut self, now_ms: f64) -> Result<Vec<Action>, VizError> {
                self.tick(now_ms)
            }

            fn is_animating(&self) -> bool {
                self.surface().is_animating()
            }

            fn teardown(&mut self) -> Result<(), VizError> {
                self.destroy()
            }

            fn draw(&self, ctx: &CanvasRenderingContext2d, dpr: f64) -> Result<(), JsValue> {
                let (width, height) = self.surface().size();
                render::draw(ctx, self.scene(), width, height, dpr)
            }
        }
    };
}

surface_driver!(ScatterplotCore);
surface_driver!(WordCloudCore);

// =============================================================
// Surface
// =============================================================

/// A canvas appended to a host container, driving one core.
pub struct DomSurface<D: SurfaceDriver> {
    inner: Rc<SurfaceInner<D>>,
}

type Listener = Closure<dyn FnMut(Event)>;

struct SurfaceInner<D: SurfaceDriver> {
    id: EngineId,
    core: Rc<RefCell<D>>,
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: Cell<f64>,
    flush: Rc<dyn Fn()>,
    destroyed: Cell<bool>,
    frame_id: Cell<Option<i32>>,
    frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    listeners: RefCell<Vec<(&'static str, Listener)>>,
    /// Kept until drop; destroy only disconnects.
    observer: RefCell<Option<(ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)>>,
}

impl<D: SurfaceDriver> DomSurface<D> {
    /// Create the canvas inside `container` and start observing it.
    ///
    /// `flush` runs after every input event and frame, once `core` is no
    /// longer borrowed.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Dom`] when the canvas or its 2D context cannot be
    /// created, or a listener cannot be installed.
    pub fn attach(container: &HtmlElement, core: Rc<RefCell<D>>, flush: Rc<dyn Fn()>) -> Result<Self, VizError> {
        let document = container
            .owner_document()
            .ok_or_else(|| VizError::Dom("container has no document".to_owned()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| VizError::Dom("not a canvas element".to_owned()))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| VizError::Dom("2d context unavailable".to_owned()))?
            .dyn_into()
            .map_err(|_| VizError::Dom("not a 2d context".to_owned()))?;
        let style = canvas.style();
        style.set_property("display", "block")?;
        style.set_property("width", "100%")?;
        style.set_property("height", "100%")?;
        style.set_property("touch-action", "none")?;
        container.append_child(&canvas)?;

        let id = core.borrow().engine_id();
        let inner = Rc::new(SurfaceInner {
            id,
            core,
            container: container.clone(),
            canvas,
            ctx,
            dpr: Cell::new(1.0),
            flush,
            destroyed: Cell::new(false),
            frame_id: Cell::new(None),
            frame: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            observer: RefCell::new(None),
        });
        SurfaceInner::install_frame(&inner);
        SurfaceInner::install_listeners(&inner)?;
        SurfaceInner::install_observer(&inner)?;
        tracing::debug!(engine = %id, "surface attached");
        Ok(Self { inner })
    }

    #[must_use]
    pub fn id(&self) -> EngineId {
        self.inner.id
    }

    /// Process actions returned by a core call.
    pub fn apply(&self, actions: &[Action]) {
        self.inner.apply(actions);
    }

    /// Disconnect the observer, remove listeners, cancel any pending frame,
    /// remove the canvas, and destroy the core.
    pub fn destroy(&self) {
        let inner = &self.inner;
        if inner.destroyed.replace(true) {
            tracing::debug!(engine = %inner.id, "destroy ignored; surface already destroyed");
            return;
        }
        if let Some((observer, _)) = inner.observer.borrow().as_ref() {
            observer.disconnect();
        }
        for (name, listener) in inner.listeners.borrow().iter() {
            if let Err(err) = inner.canvas.remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref()) {
                tracing::warn!(engine = %inner.id, event = *name, error = ?err, "failed to remove listener");
            }
        }
        if let Some(frame) = inner.frame_id.take() {
            if let Some(window) = web_sys::window() {
                if let Err(err) = window.cancel_animation_frame(frame) {
                    tracing::warn!(engine = %inner.id, error = ?err, "failed to cancel frame");
                }
            }
        }
        inner.canvas.remove();
        match inner.core.try_borrow_mut() {
            Ok(mut core) => {
                if let Err(err) = core.teardown() {
                    tracing::warn!(engine = %inner.id, %err, "core teardown failed");
                }
            }
            Err(_) => tracing::warn!(engine = %inner.id, "core busy during destroy"),
        }
    }
}

/// Dropping a live surface tears it down; the closures it owns must not
/// outlive their registrations.
impl<D: SurfaceDriver> Drop for DomSurface<D> {
    fn drop(&mut self) {
        if !self.inner.destroyed.get() {
            tracing::debug!(engine = %self.inner.id, "surface dropped while live");
            self.destroy();
        }
    }
}

impl<D: SurfaceDriver> SurfaceInner<D> {
    fn install_frame(this: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(this);
        let cb = Closure::wrap(Box::new(move |now: f64| {
            if let Some(inner) = weak.upgrade() {
                inner.on_frame(now);
            }
        }) as Box<dyn FnMut(f64)>);
        *this.frame.borrow_mut() = Some(cb);
    }

    fn install_observer(this: &Rc<Self>) -> Result<(), VizError> {
        let weak: Weak<Self> = Rc::downgrade(this);
        let cb = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            if let Some(inner) = weak.upgrade() {
                inner.sync_size();
            }
        }) as Box<dyn FnMut(js_sys::Array)>);
        let observer = ResizeObserver::new(cb.as_ref().unchecked_ref())?;
        observer.observe(&this.container);
        *this.observer.borrow_mut() = Some((observer, cb));
        Ok(())
    }

    fn install_listeners(this: &Rc<Self>) -> Result<(), VizError> {
        Self::listen(this, "pointerdown", true, |inner, event| {
            let Some(ev) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            let (pt, button) = (pointer_point(ev), Button::from_dom(ev.button()));
            inner.handle("pointerdown", |core| core.pointer_down(pt, button));
        })?;
        Self::listen(this, "pointermove", true, |inner, event| {
            let Some(ev) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            let pt = pointer_point(ev);
            inner.handle("pointermove", |core| core.pointer_move(pt));
        })?;
        Self::listen(this, "pointerup", true, |inner, event| {
            let Some(ev) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            let (pt, button) = (pointer_point(ev), Button::from_dom(ev.button()));
            inner.handle("pointerup", |core| core.pointer_up(pt, button));
        })?;
        Self::listen(this, "pointerleave", true, |inner, _| {
            inner.handle("pointerleave", |core| core.pointer_leave());
        })?;
        Self::listen(this, "wheel", false, |inner, event| {
            let Some(ev) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            ev.prevent_default();
            let delta = WheelDelta { dx: ev.delta_x(), dy: ev.delta_y(), mode: DeltaMode::from_dom(ev.delta_mode()) };
            let (pt, modifiers) = (pointer_point(ev), modifiers_of(ev));
            inner.handle("wheel", |core| core.wheel(pt, delta, modifiers));
        })?;
        Self::listen(this, "dblclick", true, |inner, event| {
            let Some(ev) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            ev.prevent_default();
            let (pt, modifiers) = (pointer_point(ev), modifiers_of(ev));
            inner.handle("dblclick", |core| core.double_click(pt, modifiers));
        })?;
        Ok(())
    }

    fn listen<F>(this: &Rc<Self>, name: &'static str, passive: bool, f: F) -> Result<(), VizError>
    where
        F: Fn(&Self, &Event) + 'static,
    {
        let weak: Weak<Self> = Rc::downgrade(this);
        let listener: Listener = Closure::wrap(Box::new(move |event: Event| {
            if let Some(inner) = weak.upgrade() {
                f(&inner, &event);
            }
        }) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        this.canvas.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            listener.as_ref().unchecked_ref(),
            &options,
        )?;
        this.listeners.borrow_mut().push((name, listener));
        Ok(())
    }

    /// Run one core operation, then apply its actions and flush handlers.
    fn handle<F>(&self, op: &'static str, f: F)
    where
        F: FnOnce(&mut D) -> Result<Vec<Action>, VizError>,
    {
        if self.destroyed.get() {
            return;
        }
        let result = match self.core.try_borrow_mut() {
            Ok(mut core) => f(&mut *core),
            Err(_) => {
                tracing::trace!(engine = %self.id, op, "core busy; event dropped");
                return;
            }
        };
        match result {
            Ok(actions) => self.apply(&actions),
            Err(err) => tracing::warn!(engine = %self.id, op, %err, "event skipped"),
        }
        (self.flush)();
    }

    fn apply(&self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::RenderNeeded | Action::AnimationRunning => self.schedule_frame(),
                Action::SetCursor(cursor) => self.set_cursor(*cursor),
            }
        }
    }

    fn set_cursor(&self, cursor: Cursor) {
        if let Err(err) = self.canvas.style().set_property("cursor", cursor.css()) {
            tracing::warn!(engine = %self.id, error = ?err, "failed to set cursor");
        }
    }

    fn schedule_frame(&self) {
        if self.destroyed.get() || self.frame_id.get().is_some() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let frame = self.frame.borrow();
        let Some(cb) = frame.as_ref() else {
            return;
        };
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.frame_id.set(Some(id)),
            Err(err) => tracing::warn!(engine = %self.id, error = ?err, "failed to request frame"),
        }
    }

    /// Tick a running transition, draw, and keep ticking while it runs.
    fn on_frame(&self, now_ms: f64) {
        self.frame_id.set(None);
        if self.destroyed.get() {
            return;
        }
        let actions = {
            let Ok(mut core) = self.core.try_borrow_mut() else {
                self.schedule_frame();
                return;
            };
            let actions = if core.is_animating() {
                match core.advance(now_ms) {
                    Ok(actions) => actions,
                    Err(err) => {
                        tracing::warn!(engine = %self.id, %err, "tick skipped");
                        Vec::new()
                    }
                }
            } else {
                Vec::new()
            };
            if let Err(err) = core.draw(&self.ctx, self.dpr.get()) {
                tracing::warn!(engine = %self.id, error = ?err, "draw failed");
            }
            actions
        };
        for action in &actions {
            match action {
                // Drawn above.
                Action::RenderNeeded => {}
                Action::AnimationRunning => self.schedule_frame(),
                Action::SetCursor(cursor) => self.set_cursor(*cursor),
            }
        }
        (self.flush)();
    }

    /// Match the canvas backing store to the container and tell the core.
    fn sync_size(&self) {
        if self.destroyed.get() {
            return;
        }
        let width = f64::from(self.container.client_width()).max(0.0);
        let height = f64::from(self.container.client_height()).max(0.0);
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio()).max(1.0);
        self.dpr.set(dpr);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (backing_w, backing_h) = ((width * dpr).round() as u32, (height * dpr).round() as u32);
        // Resizing the backing store clears it, so always redraw.
        self.canvas.set_width(backing_w);
        self.canvas.set_height(backing_h);
        self.handle("resize", |core| core.observe_size(width, height));
        self.schedule_frame();
    }
}

fn pointer_point(ev: &MouseEvent) -> Point {
    Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()))
}

fn modifiers_of(ev: &MouseEvent) -> Modifiers {
    Modifiers { shift: ev.shift_key(), ctrl: ev.ctrl_key(), alt: ev.alt_key(), meta: ev.meta_key() }
}

// =============================================================
// Outbox
// =============================================================

/// Queue between a core's change handler and the host's.
///
/// The core gets a [`Outbox::sink`] that only records snapshots. The host
/// handler runs from [`Outbox::flush`], after the core borrow is released.
/// Snapshots emitted while no host handler is installed are dropped.
pub struct Outbox<T: Ord + 'static> {
    inner: Rc<OutboxInner<T>>,
}

struct OutboxInner<T: Ord> {
    pending: RefCell<VecDeque<Snapshot<T>>>,
    handler: RefCell<Option<ChangeHandler<T>>>,
    /// Set when the handler is replaced while it is running.
    replaced: Cell<bool>,
    flushing: Cell<bool>,
}

impl<T: Ord + 'static> Default for Outbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + 'static> Outbox<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(OutboxInner {
                pending: RefCell::new(VecDeque::new()),
                handler: RefCell::new(None),
                replaced: Cell::new(false),
                flushing: Cell::new(false),
            }),
        }
    }

    /// Handler to install on a core.
    #[must_use]
    pub fn sink(&self) -> ChangeHandler<T> {
        let inner = Rc::clone(&self.inner);
        Box::new(move |snapshot| inner.pending.borrow_mut().push_back(snapshot))
    }

    /// Callback that flushes this outbox.
    #[must_use]
    pub fn flusher(&self) -> Rc<dyn Fn()> {
        let inner = Rc::clone(&self.inner);
        Rc::new(move || inner.flush())
    }

    /// Replace the host handler; `None` removes it.
    pub fn set_handler(&self, handler: Option<ChangeHandler<T>>) {
        self.inner.replaced.set(true);
        *self.inner.handler.borrow_mut() = handler;
    }

    /// Deliver queued snapshots in order.
    pub fn flush(&self) {
        self.inner.flush();
    }
}

impl<T: Ord> OutboxInner<T> {
    fn flush(&self) {
        // A handler calling back into an engine flushes again; the outer loop
        // delivers whatever that queued.
        if self.flushing.replace(true) {
            return;
        }
        loop {
            let Some(snapshot) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            let Some(mut handler) = self.handler.borrow_mut().take() else {
                self.pending.borrow_mut().clear();
                break;
            };
            self.replaced.set(false);
            handler(snapshot);
            if !self.replaced.get() {
                *self.handler.borrow_mut() = Some(handler);
            }
        }
        self.flushing.set(false);
    }
}

// =============================================================
// Popover
// =============================================================

/// Absolutely positioned `<div class="popover">` inside the host container.
///
/// The container should be a positioned element so the popover lines up with
/// the canvas.
pub struct DomPopover {
    element: HtmlElement,
}

impl DomPopover {
    /// # Errors
    ///
    /// Returns [`VizError::Dom`] when the element cannot be created.
    pub fn new(container: &HtmlElement) -> Result<Self, VizError> {
        let document = container
            .owner_document()
            .ok_or_else(|| VizError::Dom("container has no document".to_owned()))?;
        let element: HtmlElement = document
            .create_element("div")?
            .dyn_into()
            .map_err(|_| VizError::Dom("not an html element".to_owned()))?;
        element.set_class_name("popover");
        let style = element.style();
        style.set_property("position", "absolute")?;
        style.set_property("pointer-events", "none")?;
        style.set_property("white-space", "pre")?;
        style.set_property("display", "none")?;
        container.append_child(&element)?;
        Ok(Self { element })
    }

    fn try_show(&self, anchor: Point, document: &DatasetDocument) -> Result<(), JsValue> {
        self.element.set_text_content(Some(&PopoverContent::for_document(document).to_string()));
        let style = self.element.style();
        style.set_property("left", &format!("{}px", anchor.x + POPOVER_OFFSET_PX))?;
        style.set_property("top", &format!("{}px", anchor.y + POPOVER_OFFSET_PX))?;
        style.set_property("display", "block")?;
        self.element.class_list().add_1("popover--visible")
    }

    fn try_hide(&self) -> Result<(), JsValue> {
        self.element.style().set_property("display", "none")?;
        self.element.class_list().remove_1("popover--visible")
    }
}

impl Popover for DomPopover {
    fn show(&mut self, anchor: Point, document: &DatasetDocument) {
        if let Err(err) = self.try_show(anchor, document) {
            tracing::warn!(error = ?err, "failed to show popover");
        }
    }

    fn hide(&mut self) {
        if let Err(err) = self.try_hide() {
            tracing::warn!(error = ?err, "failed to hide popover");
        }
    }

    fn destroy(&mut self) {
        self.element.remove();
    }
}
