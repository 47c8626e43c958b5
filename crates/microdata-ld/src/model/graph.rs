//! The graph of items produced by one extraction call, and the shaped
//! result handed back to the caller.

use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value as Json};

use crate::model::Item;

/// All items produced in one parse, keyed by identifier, in order of
/// first appearance.
#[derive(Debug, Clone, Default)]
pub(crate) struct Graph {
    items: Vec<Item>,
    index: FxHashMap<String, usize>,
}

impl Graph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Looks up the item for `id`, creating it on first use. Creation
    /// must already have been admitted by the limit guard.
    pub(crate) fn get_or_insert(&mut self, id: &str) -> &mut Item {
        if let Some(&slot) = self.index.get(id) {
            return &mut self.items[slot];
        }
        let slot = self.items.len();
        self.index.insert(id.to_string(), slot);
        self.items.push(Item::new(id));
        &mut self.items[slot]
    }

    pub(crate) fn into_items(self) -> Vec<Item> {
        self.items
    }
}

/// Result of one extraction call.
///
/// A graph with exactly one item collapses to that bare item unless the
/// caller forces graph form. The shared vocabulary context, when one
/// was established, rides along at the top level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphResult {
    /// No annotated items were found.
    Empty,
    /// Exactly one item, returned bare.
    Single {
        /// Shared vocabulary context, if compaction established one.
        context: Option<String>,
        /// The item itself.
        item: Item,
    },
    /// All items wrapped under a graph key.
    Graph {
        /// Shared vocabulary context, if compaction established one.
        context: Option<String>,
        /// Items in order of first appearance.
        items: Vec<Item>,
    },
}

impl GraphResult {
    /// Shapes a finished item list into the caller-facing form.
    pub(crate) fn shape(mut items: Vec<Item>, context: Option<String>, force_graph: bool) -> Self {
        if items.is_empty() {
            return GraphResult::Empty;
        }
        if items.len() == 1 && !force_graph {
            return GraphResult::Single {
                context,
                item: items.remove(0),
            };
        }
        GraphResult::Graph { context, items }
    }

    /// Returns whether the extraction produced no items.
    pub fn is_empty(&self) -> bool {
        matches!(self, GraphResult::Empty)
    }

    /// Returns the shared vocabulary context, if one was established.
    pub fn context(&self) -> Option<&str> {
        match self {
            GraphResult::Empty => None,
            GraphResult::Single { context, .. } | GraphResult::Graph { context, .. } => {
                context.as_deref()
            }
        }
    }

    /// Renders the result as a JSON-LD document, ready for verbatim
    /// embedding as a page's structured-data payload.
    pub fn to_json(&self) -> Json {
        match self {
            GraphResult::Empty => Json::Object(Map::new()),
            GraphResult::Single { context, item } => {
                let mut json = item.to_json();
                if let (Some(context), Json::Object(map)) = (context, &mut json) {
                    map.insert("@context".to_string(), Json::String(context.clone()));
                }
                json
            }
            GraphResult::Graph { context, items } => {
                let mut map = Map::new();
                if let Some(context) = context {
                    map.insert("@context".to_string(), Json::String(context.clone()));
                }
                map.insert(
                    "@graph".to_string(),
                    Json::Array(items.iter().map(Item::to_json).collect()),
                );
                Json::Object(map)
            }
        }
    }
}

impl Serialize for GraphResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
