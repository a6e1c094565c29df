//! Corpus data model and the text formats it is loaded from.
//!
//! A dataset is three files produced by the preprocessing pipeline:
//!
//! - a vocabulary, one word per line (word ids are 1-based line numbers);
//! - a UCI bag-of-words file: three header lines (`D`, `W`, `NNZ`) followed by
//!   `docID wordID count` records with 1-based ids;
//! - an embedding file with one `index x y` line per document, in document order.
//!
//! Fetching the files is the host's job; this module only turns their text into
//! [`DatasetDocument`]s. [`LoadTracker`] lets the host drop results of loads
//! that were superseded or whose view was torn down while they were in flight.

#[cfg(test)]
#[path = "dataset_test.rs"]
mod dataset_test;

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::geometry::Point;

/// Stable document identifier (1-based in the source data).
pub type DocId = u32;

/// One corpus item: its bag of words and its 2D embedding position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDocument {
    pub id: DocId,
    pub word_counts: BTreeMap<String, u32>,
    pub position: Point,
}

impl DatasetDocument {
    /// The `n` most frequent words, ties in word order.
    #[must_use]
    pub fn top_words(&self, n: usize) -> Vec<(&str, u32)> {
        let mut words: Vec<(&str, u32)> = self.word_counts.iter().map(|(w, c)| (w.as_str(), *c)).collect();
        words.sort_by(|a, b| b.1.cmp(&a.1));
        words.truncate(n);
        words
    }
}

/// Which corpus and which processing pipeline to load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDescriptor {
    pub corpus_name: String,
    pub preprocessing_method: String,
    pub embedding_method: String,
}

/// A fully loaded corpus.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub descriptor: DatasetDescriptor,
    /// Documents in ascending id order. Engines hold clones of these `Rc`s.
    pub documents: Vec<Rc<DatasetDocument>>,
    pub vocab_size: usize,
}

/// Raw text of the three corpus files.
#[derive(Debug, Clone, Copy)]
pub struct DatasetSources<'a> {
    pub vocabulary: &'a str,
    pub docword: &'a str,
    pub embeddings: &'a str,
}

impl Dataset {
    /// Parse a complete dataset from its file contents.
    ///
    /// # Errors
    ///
    /// Returns the first malformed line, unknown word id, or document without
    /// an embedding position.
    pub fn parse(descriptor: DatasetDescriptor, sources: DatasetSources<'_>) -> Result<Self, DatasetError> {
        let vocabulary = parse_vocabulary(sources.vocabulary);
        let positions = parse_embeddings(sources.embeddings)?;
        let documents = parse_docword(sources.docword, &vocabulary, &positions)?;
        tracing::debug!(
            corpus = %descriptor.corpus_name,
            documents = documents.len(),
            vocab = vocabulary.len(),
            "dataset parsed"
        );
        Ok(Self { descriptor, documents: documents.into_iter().map(Rc::new).collect(), vocab_size: vocabulary.len() })
    }
}

/// Vocabulary words in id order; trailing blank lines are ignored.
#[must_use]
pub fn parse_vocabulary(text: &str) -> Vec<String> {
    let mut words: Vec<String> = text.lines().map(|l| l.trim().to_owned()).collect();
    while words.last().is_some_and(String::is_empty) {
        words.pop();
    }
    words
}

/// Embedding positions in document order.
///
/// # Errors
///
/// Returns [`DatasetError::InvalidLine`] for lines without numeric x and y columns.
pub fn parse_embeddings(text: &str) -> Result<Vec<Point>, DatasetError> {
    let mut positions = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (Some(x), Some(y)) = (fields.get(1), fields.get(2)) else {
            return Err(invalid("embeddings", idx, "expected `index x y`"));
        };
        let x = parse_number::<f64>("embeddings", idx, x)?;
        let y = parse_number::<f64>("embeddings", idx, y)?;
        positions.push(Point::new(x, y));
    }
    Ok(positions)
}

/// Build documents from bag-of-words records.
///
/// # Errors
///
/// Returns [`DatasetError::MissingHeader`] when the three header lines are
/// absent, [`DatasetError::InvalidLine`] for malformed records,
/// [`DatasetError::UnknownWord`] for word ids outside the vocabulary, and
/// [`DatasetError::MissingPosition`] for documents without an embedding.
pub fn parse_docword(
    text: &str,
    vocabulary: &[String],
    positions: &[Point],
) -> Result<Vec<DatasetDocument>, DatasetError> {
    let mut lines = text.lines().enumerate();
    for _ in 0..3 {
        if lines.next().is_none() {
            return Err(DatasetError::MissingHeader);
        }
    }

    let mut documents: BTreeMap<DocId, DatasetDocument> = BTreeMap::new();
    for (idx, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [doc_id, word_id, count] = fields.as_slice() else {
            return Err(invalid("docword", idx, "expected `docID wordID count`"));
        };
        let doc_id = parse_number::<DocId>("docword", idx, doc_id)?;
        let word_id = parse_number::<usize>("docword", idx, word_id)?;
        let count = parse_number::<u32>("docword", idx, count)?;

        let Some(word) = word_id.checked_sub(1).and_then(|i| vocabulary.get(i)) else {
            return Err(DatasetError::UnknownWord { line: idx + 1, word_id });
        };
        let doc = match documents.entry(doc_id) {
            std::collections::btree_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::btree_map::Entry::Vacant(e) => {
                let position = doc_id
                    .checked_sub(1)
                    .and_then(|i| positions.get(i as usize))
                    .copied()
                    .ok_or(DatasetError::MissingPosition { doc_id })?;
                e.insert(DatasetDocument { id: doc_id, word_counts: BTreeMap::new(), position })
            }
        };
        doc.word_counts.insert(word.clone(), count);
    }
    Ok(documents.into_values().collect())
}

fn invalid(file: &'static str, idx: usize, reason: &str) -> DatasetError {
    DatasetError::InvalidLine { file, line: idx + 1, reason: reason.to_owned() }
}

fn parse_number<T: std::str::FromStr>(file: &'static str, idx: usize, raw: &str) -> Result<T, DatasetError> {
    raw.parse::<T>()
        .map_err(|_| invalid(file, idx, &format!("not a number: {raw:?}")))
}

/// Hands out tickets for dataset loads; only the newest ticket stays current.
///
/// The fetch itself is never aborted. A load whose ticket is no longer current
/// when it resolves must have its result discarded.
#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    generation: Rc<Cell<u64>>,
}

/// Token for one in-flight load.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: Rc<Cell<u64>>,
    issued: u64,
}

impl LoadTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, superseding every earlier ticket.
    #[must_use]
    pub fn begin(&self) -> LoadTicket {
        let issued = self.generation.get() + 1;
        self.generation.set(issued);
        LoadTicket { generation: Rc::clone(&self.generation), issued }
    }

    /// Supersede every outstanding ticket without starting a load (view teardown).
    pub fn invalidate(&self) {
        self.generation.set(self.generation.get() + 1);
    }
}

impl LoadTicket {
    /// Whether no newer load was started and the tracker was not invalidated.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.generation.get() == self.issued
    }

    /// Pass `result` through only while this ticket is current.
    pub fn accept<T>(&self, result: T) -> Option<T> {
        if self.is_current() {
            Some(result)
        } else {
            tracing::debug!(ticket = self.issued, "discarding stale dataset load");
            None
        }
    }
}
