//! Extraction of embedded microdata annotations into a JSON-LD graph.
//!
//! This crate discovers item/property attribute markup in an HTML
//! document and produces a normalized linked-data graph of items with
//! identifiers, types, and properties, ready for verbatim embedding as
//! a page's machine-readable metadata.
//!
//! # Overview
//!
//! Extraction is a single synchronous pass over a pre-parsed document:
//! - **Discovery**: one depth-first scan collects the top-level
//!   item-scope elements; nested items are reached only through their
//!   containing property.
//! - **Building**: each item gets an identity (a resolved declared
//!   identifier or a synthesized `_:bN` blank id), its contributing
//!   elements are collected (subtree plus reference-list indirection,
//!   scope-filtered, document-ordered), and values are read per element
//!   kind, recursing into nested items.
//! - **Normalization**: type and property identifiers are canonicalized
//!   and, when every item shares one vocabulary base, compacted against
//!   a shared context.
//!
//! # Quick Start
//!
//! ```rust
//! use microdata_ld::{extract_from_html, Options};
//!
//! let html = r#"
//!     <div itemscope itemtype="https://schema.org/Person">
//!         <span itemprop="name">Alice</span>
//!     </div>"#;
//!
//! let result = extract_from_html(html, &Options::default()).unwrap();
//! let json = result.to_json();
//! assert_eq!(json["@context"], "https://schema.org");
//! assert_eq!(json["@type"], "Person");
//! assert_eq!(json["name"], "Alice");
//! ```
//!
//! # Modules
//!
//! - [`extract`]: discovery, item building, and the public entry points
//! - [`model`]: core data types (Item, Value, GraphResult)
//! - [`vocab`]: vocabulary canonicalization and compaction
//! - [`urls`]: URL resolution and sanitization policy
//! - [`limits`]: resource ceilings and breach policy
//! - [`error`]: error types
//!
//! # Security
//!
//! The extractor is designed to safely handle untrusted markup:
//! - Items, reference ids, and contributing elements are bounded by
//!   configurable ceilings, with fail or truncate behavior on breach
//! - URL-sourced values are validated against a scheme allow-list
//! - Reference cycles through the reference-list mechanism terminate
//!
//! Malformed identifiers and rejected URLs are never fatal; the
//! affected value is dropped and the rest of the parse proceeds.

pub mod error;
pub mod extract;
pub mod limits;
pub mod model;
pub mod urls;
pub mod vocab;

// Re-export commonly used types at crate root
pub use error::ExtractError;
pub use extract::{extract_from_html, extract_graph, Options};
pub use limits::{LimitKind, Limits, OnLimit};
pub use model::{GraphResult, Item, Value};
pub use urls::UrlPolicy;
pub use vocab::{canonicalize, expand};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
