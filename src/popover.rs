//! Hover popover collaborator.
//!
//! The scatterplot only decides *when* the popover is visible and *where* it
//! is anchored. Rendering it is up to a [`Popover`] implementation: the browser
//! build uses a DOM overlay, tests use [`RecordingPopover`].

#[cfg(test)]
#[path = "popover_test.rs"]
mod popover_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::consts::POPOVER_TOP_WORDS;
use crate::dataset::{DatasetDocument, DocId};
use crate::geometry::Point;

/// Something that can show a document summary next to a surface point.
pub trait Popover {
    /// Show (or move) the popover at `anchor`, in surface pixels.
    fn show(&mut self, anchor: Point, document: &DatasetDocument);
    fn hide(&mut self);
    /// Release any resources; no further calls follow.
    fn destroy(&mut self);
}

/// Text lines shown for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopoverContent {
    pub lines: Vec<String>,
}

impl PopoverContent {
    /// Id, position, and the most frequent words of `document`.
    #[must_use]
    pub fn for_document(document: &DatasetDocument) -> Self {
        let top = document
            .top_words(POPOVER_TOP_WORDS)
            .into_iter()
            .map(|(word, count)| format!("{word}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            lines: vec![
                format!("ID: {}", document.id),
                format!("x: {:.2}, y: {:.2}", document.position.x, document.position.y),
                format!("Top words: {top}"),
            ],
        }
    }
}

impl fmt::Display for PopoverContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Popover that draws nothing.
#[derive(Debug, Default)]
pub struct NoopPopover;

impl Popover for NoopPopover {
    fn show(&mut self, _anchor: Point, _document: &DatasetDocument) {}
    fn hide(&mut self) {}
    fn destroy(&mut self) {}
}

/// Observable popover state, shared between a [`RecordingPopover`] and its owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopoverState {
    /// Document currently shown and where.
    pub visible: Option<(DocId, Point)>,
    pub shows: usize,
    pub hides: usize,
    pub destroyed: bool,
}

/// Popover that records calls instead of drawing, for headless hosts.
#[derive(Debug, Clone, Default)]
pub struct RecordingPopover {
    state: Rc<RefCell<PopoverState>>,
}

impl RecordingPopover {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto the recorded state that stays valid after the popover is moved into an engine.
    #[must_use]
    pub fn state(&self) -> Rc<RefCell<PopoverState>> {
        Rc::clone(&self.state)
    }
}

impl Popover for RecordingPopover {
    fn show(&mut self, anchor: Point, document: &DatasetDocument) {
        let mut state = self.state.borrow_mut();
        state.visible = Some((document.id, anchor));
        state.shows += 1;
    }

    fn hide(&mut self) {
        let mut state = self.state.borrow_mut();
        state.visible = None;
        state.hides += 1;
    }

    fn destroy(&mut self) {
        let mut state = self.state.borrow_mut();
        state.visible = None;
        state.destroyed = true;
    }
}
