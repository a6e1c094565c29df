//! Selection snapshots and the host-side selection model.
//!
//! A [`Snapshot`] is an immutable, cheaply clonable set tagged with a
//! [`Version`]. Engines decide whether an incoming snapshot is new by comparing
//! versions, never by pointer identity or deep equality, and they copy its
//! contents into their own working set before mutating anything. When a user
//! gesture changes an engine's selection, the engine mints a fresh snapshot from
//! its own [`SnapshotMinter`] and hands that out.
//!
//! Two snapshots with the same version always hold the same items: versions
//! are `(origin, seq)` pairs where the origin is unique per minter and the
//! sequence only grows.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use uuid::Uuid;

use crate::dataset::{DatasetDocument, DocId};

/// Identity of a snapshot's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub origin: Uuid,
    pub seq: u64,
}

impl Version {
    /// Shared by every empty snapshot built with [`Snapshot::empty`].
    pub const EMPTY: Self = Self { origin: Uuid::nil(), seq: 0 };
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.origin, self.seq)
    }
}

/// Immutable versioned set.
#[derive(Debug, Clone)]
pub struct Snapshot<T: Ord> {
    version: Version,
    items: Rc<BTreeSet<T>>,
}

impl<T: Ord> Snapshot<T> {
    /// An empty snapshot with the shared [`Version::EMPTY`] version.
    #[must_use]
    pub fn empty() -> Self {
        Self { version: Version::EMPTY, items: Rc::new(BTreeSet::new()) }
    }

    /// A standalone snapshot with a version nobody else will ever mint.
    #[must_use]
    pub fn new<I: IntoIterator<Item = T>>(items: I) -> Self {
        Self { version: Version { origin: Uuid::new_v4(), seq: 0 }, items: Rc::new(items.into_iter().collect()) }
    }

    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// The items, shared with every clone of this snapshot.
    #[must_use]
    pub fn items(&self) -> &BTreeSet<T> {
        &self.items
    }
}

impl<T: Ord> Default for Snapshot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Ord> FromIterator<T> for Snapshot<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Issues snapshots with strictly increasing versions under one origin.
#[derive(Debug, Clone)]
pub struct SnapshotMinter {
    origin: Uuid,
    next: u64,
}

impl SnapshotMinter {
    /// A minter whose versions are tagged with `origin` (typically an engine id).
    #[must_use]
    pub fn new(origin: Uuid) -> Self {
        Self { origin, next: 1 }
    }

    #[must_use]
    pub fn origin(&self) -> Uuid {
        self.origin
    }

    /// Freeze `items` into a new snapshot.
    pub fn mint<T: Ord, I: IntoIterator<Item = T>>(&mut self, items: I) -> Snapshot<T> {
        let version = Version { origin: self.origin, seq: self.next };
        self.next += 1;
        Snapshot { version, items: Rc::new(items.into_iter().collect()) }
    }
}

/// Single-slot callback receiving selection snapshots.
pub type ChangeHandler<T> = Box<dyn FnMut(Snapshot<T>)>;

pub type SelectedPoints = Snapshot<DocId>;
pub type SelectedWords = Snapshot<String>;

/// Authoritative selection state held by the host.
///
/// Engines are read replicas: the host pushes [`SelectionModel::points`] /
/// [`SelectionModel::words`] into them, and feeds the snapshots they report
/// back through [`SelectionModel::accept_points`] / [`SelectionModel::accept_words`].
#[derive(Debug)]
pub struct SelectionModel {
    minter: SnapshotMinter,
    points: SelectedPoints,
    words: SelectedWords,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionModel {
    #[must_use]
    pub fn new() -> Self {
        Self { minter: SnapshotMinter::new(Uuid::new_v4()), points: Snapshot::empty(), words: Snapshot::empty() }
    }

    #[must_use]
    pub fn points(&self) -> &SelectedPoints {
        &self.points
    }

    #[must_use]
    pub fn words(&self) -> &SelectedWords {
        &self.words
    }

    /// Replace the point selection with host-chosen ids.
    pub fn select_points<I: IntoIterator<Item = DocId>>(&mut self, ids: I) -> &SelectedPoints {
        self.points = self.minter.mint(ids);
        &self.points
    }

    /// Replace the word selection with host-chosen words.
    pub fn select_words<I: IntoIterator<Item = String>>(&mut self, words: I) -> &SelectedWords {
        self.words = self.minter.mint(words);
        &self.words
    }

    /// Adopt a point snapshot reported by an engine.
    pub fn accept_points(&mut self, snapshot: SelectedPoints) {
        self.points = snapshot;
    }

    /// Adopt a word snapshot reported by an engine.
    pub fn accept_words(&mut self, snapshot: SelectedWords) {
        self.words = snapshot;
    }

    /// Drop both selections, e.g. when switching to another corpus.
    pub fn clear(&mut self) {
        if !self.points.is_empty() {
            self.points = Snapshot::empty();
        }
        if !self.words.is_empty() {
            self.words = Snapshot::empty();
        }
    }

    /// Selected documents, looked up by id, in ascending id order.
    #[must_use]
    pub fn selected_documents<'a>(&self, documents: &'a [Rc<DatasetDocument>]) -> Vec<&'a Rc<DatasetDocument>> {
        let mut selected: Vec<_> = documents.iter().filter(|d| self.points.contains(&d.id)).collect();
        selected.sort_by_key(|d| d.id);
        selected
    }
}

/// Words present in every one of `documents`; empty when there are none.
#[must_use]
pub fn common_words<'a, I>(documents: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a DatasetDocument>,
{
    let mut iter = documents.into_iter();
    let Some(first) = iter.next() else {
        return BTreeSet::new();
    };
    let mut common: BTreeSet<String> = first.word_counts.keys().cloned().collect();
    for doc in iter {
        common.retain(|w| doc.word_counts.contains_key(w));
        if common.is_empty() {
            break;
        }
    }
    common
}
