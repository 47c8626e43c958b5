//! Property-element collection for one item.
//!
//! Computes the ordered, scope-filtered, limit-bounded set of elements
//! contributing properties to an owner item: descendants of the owner
//! plus elements pulled in through its reference-list attribute. The
//! final document-order sort is load-bearing: it fixes the value order
//! of multi-valued properties.

use ego_tree::NodeId;
use rustc_hash::FxHashSet;
use scraper::ElementRef;

use super::dom::{declares_properties, is_item_scope, DocumentIndex};
use crate::error::ExtractError;
use crate::limits::Guard;

pub(crate) fn property_elements<'a>(
    dom: &DocumentIndex<'a>,
    owner: ElementRef<'a>,
    guard: &mut Guard,
) -> Result<Vec<ElementRef<'a>>, ExtractError> {
    let owner_node = owner.id();
    let roots = reference_roots(dom, owner, guard)?;

    let mut seen: FxHashSet<NodeId> = FxHashSet::default();
    let mut found: Vec<ElementRef<'a>> = Vec::new();
    let mut encountered = 0usize;

    'roots: for root in roots {
        for candidate in candidates(root, owner_node) {
            if !declares_properties(candidate) {
                continue;
            }
            // Out-of-scope and duplicate encounters still count.
            encountered += 1;
            if guard.admit_property_element(encountered)?.is_stop() {
                break 'roots;
            }
            if in_scope(candidate, owner_node) && seen.insert(candidate.id()) {
                found.push(candidate);
            }
        }
    }

    found.sort_by_key(|el| dom.order_of(el.id()));
    Ok(found)
}

/// The owner plus the elements named by its reference-list attribute,
/// de-duplicated, capped at the reference-id ceiling. Ids with no
/// matching element are dropped.
fn reference_roots<'a>(
    dom: &DocumentIndex<'a>,
    owner: ElementRef<'a>,
    guard: &mut Guard,
) -> Result<Vec<ElementRef<'a>>, ExtractError> {
    let mut roots = vec![owner];
    let Some(raw) = owner.value().attr("itemref") else {
        return Ok(roots);
    };

    let mut tokens: Vec<&str> = Vec::new();
    for token in raw.split_whitespace() {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    guard.cap_ref_ids(&mut tokens)?;

    let mut seen: FxHashSet<NodeId> = FxHashSet::default();
    seen.insert(owner.id());
    for token in tokens {
        if let Some(el) = dom.element_by_id(token) {
            if seen.insert(el.id()) {
                roots.push(el);
            }
        }
    }
    Ok(roots)
}

/// Candidate elements under one root, in document order. The owner
/// itself never contributes to its own item; a reference-list root that
/// declares property names does.
fn candidates<'a>(
    root: ElementRef<'a>,
    owner: NodeId,
) -> impl Iterator<Item = ElementRef<'a>> {
    let mut nodes = root.descendants();
    if root.id() == owner {
        nodes.next();
    }
    nodes.filter_map(ElementRef::wrap)
}

/// An element belongs to `owner` when its nearest item-scope ancestor is
/// the owner itself, or when it has no item-scope ancestor at all (the
/// reference-list case). A different nearest item-scope ancestor means
/// the element's properties belong to that nested item instead.
fn in_scope(el: ElementRef, owner: NodeId) -> bool {
    match el
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| is_item_scope(*ancestor))
    {
        Some(ancestor) => ancestor.id() == owner,
        None => true,
    }
}
