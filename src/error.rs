//! Error types for the engines and the dataset parser.

use thiserror::Error;

use crate::dataset::DocId;

/// Failures reported by engine operations.
///
/// None of these are fatal: browser wrappers log them and skip the operation,
/// and the next valid state change brings the view back in sync.
#[derive(Debug, Error)]
pub enum VizError {
    /// The operation needs the surface size, which has not been observed yet.
    #[error("surface has not been sized yet")]
    NotSized,
    /// No document with this id is part of the current data.
    #[error("unknown document id {0}")]
    UnknownDocument(DocId),
    /// The engine was destroyed; no further calls are valid.
    #[error("engine already destroyed")]
    Destroyed,
    /// The engine was configured without the capability this call needs.
    #[error("capability disabled: {0}")]
    CapabilityDisabled(&'static str),
    /// A configuration document could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    /// A DOM call failed.
    #[error("dom error: {0}")]
    Dom(String),
}

impl From<wasm_bindgen::JsValue> for VizError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Dom(format!("{value:?}"))
    }
}

/// Failures while parsing corpus files into a dataset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    /// A line does not match the expected record shape.
    #[error("{file}:{line}: {reason}")]
    InvalidLine { file: &'static str, line: usize, reason: String },
    /// The bag-of-words file ends before its three header lines.
    #[error("docword: missing header")]
    MissingHeader,
    /// A bag-of-words record references a word outside the vocabulary.
    #[error("docword:{line}: unknown word id {word_id}")]
    UnknownWord { line: usize, word_id: usize },
    /// A document has no embedding position.
    #[error("no embedding position for document {doc_id}")]
    MissingPosition { doc_id: DocId },
}
