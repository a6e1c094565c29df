//! Interactive corpus visualization for the browser.
//!
//! This crate is compiled to WebAssembly. It draws a document-embedding
//! scatterplot and a per-document word cloud on `<canvas>` elements, handles
//! pan/zoom and click selection, and reports selection changes to the host as
//! versioned [`selection::Snapshot`]s. The host owns the shared selection state
//! and fans snapshots out to every view; a view recognizes its own echoes by
//! version and ignores them.
//!
//! Every engine is split into a testable core ([`scatterplot::ScatterplotCore`],
//! [`wordcloud::WordCloudCore`]) and a thin browser wrapper that owns the
//! canvas and forwards DOM events.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`scatterplot`] | Document scatterplot engine and its browser wrapper |
//! | [`wordcloud`] | Word cloud engine and its browser wrapper |
//! | [`engine`] | Surface state shared by both engines, [`engine::Action`]s |
//! | [`selection`] | Versioned selection snapshots and the host selection model |
//! | [`dataset`] | Corpus records and the bag-of-words/embedding parsers |
//! | [`layout`] | Deterministic spiral word-cloud layout |
//! | [`scene`] | Keyed element arena with enter/update/exit joins and classes |
//! | [`transform`] | Zoom transform, wheel/pan/double-click behavior, transitions |
//! | [`input`] | Input event types and the press/drag gesture machine |
//! | [`hit`] | Hit-testing scene elements at surface points |
//! | [`geometry`] | Points, rectangles, bounds, linear scales, text metrics |
//! | [`axis`] | Tick selection and labels for the scatterplot axes |
//! | [`popover`] | Hover popover content and the [`popover::Popover`] seam |
//! | [`render`] | Scene rendering to a 2D context |
//! | [`web`] | Canvas, observer, listeners, frame loop, handler outbox |
//! | [`config`] | Engine configuration, loadable from JSON |
//! | [`consts`] | Shared numeric constants (zoom limits, font range, etc.) |
//! | [`error`] | Engine and dataset error types |

pub mod axis;
pub mod config;
pub mod consts;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod layout;
pub mod popover;
pub mod render;
pub mod scatterplot;
pub mod scene;
pub mod selection;
pub mod transform;
pub mod web;
pub mod wordcloud;
