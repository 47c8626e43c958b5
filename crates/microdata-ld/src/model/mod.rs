//! Data model for the extracted graph.
//!
//! - Property values (tagged primitive/reference union)
//! - Items (one logical entity per annotated subtree)
//! - The graph and its shaped result forms

pub mod graph;
pub mod item;
pub mod value;

pub(crate) use graph::Graph;
pub use graph::GraphResult;
pub use item::Item;
pub use value::Value;
