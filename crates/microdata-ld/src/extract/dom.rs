//! Read-only index over a parsed document tree.
//!
//! One depth-first pass assigns every node its document-order position
//! and records the first element declaring each id, giving O(1) order
//! comparison and `getElementById`-style lookup for the rest of the
//! extraction. The tree itself is owned by the caller and never
//! mutated.

use ego_tree::NodeId;
use rustc_hash::FxHashMap;
use scraper::{ElementRef, Html};

pub(crate) struct DocumentIndex<'a> {
    html: &'a Html,
    order: FxHashMap<NodeId, usize>,
    ids: FxHashMap<&'a str, NodeId>,
}

impl<'a> DocumentIndex<'a> {
    pub(crate) fn new(html: &'a Html) -> Self {
        let mut order = FxHashMap::default();
        let mut ids = FxHashMap::default();
        for (position, node) in html.tree.root().descendants().enumerate() {
            order.insert(node.id(), position);
            if let Some(id) = node.value().as_element().and_then(|el| el.id()) {
                // First declaration wins.
                ids.entry(id).or_insert_with(|| node.id());
            }
        }
        Self { html, order, ids }
    }

    /// Document-order position of a node.
    pub(crate) fn order_of(&self, node: NodeId) -> usize {
        self.order.get(&node).copied().unwrap_or(usize::MAX)
    }

    /// Looks up the element declaring `id`.
    pub(crate) fn element_by_id(&self, id: &str) -> Option<ElementRef<'a>> {
        let node = *self.ids.get(id)?;
        ElementRef::wrap(self.html.tree.get(node)?)
    }

    /// Top-level annotated roots in document order: item-scope elements
    /// that are not themselves a property of another item. Nested items
    /// are reached only through their containing property.
    pub(crate) fn item_roots(&self) -> Vec<ElementRef<'a>> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| is_item_scope(*el) && el.value().attr("itemprop").is_none())
            .collect()
    }
}

/// Returns whether the element carries the item-scope marker.
pub(crate) fn is_item_scope(el: ElementRef) -> bool {
    el.value().attr("itemscope").is_some()
}

/// Returns whether the element declares at least one property name.
pub(crate) fn declares_properties(el: ElementRef) -> bool {
    el.value()
        .attr("itemprop")
        .is_some_and(|raw| raw.split_whitespace().next().is_some())
}
