//! Graph extraction: root discovery, item building, result shaping.
//!
//! The document tree is scanned once for top-level annotated roots;
//! each root's item is then built by collecting its contributing
//! elements, reading their values, and recursing into nested items.
//! All bookkeeping lives in a per-call [`Extractor`], so concurrent
//! extractions over independent documents need no synchronization.

mod collect;
mod dom;
mod value;

use ego_tree::NodeId;
use rustc_hash::{FxHashMap, FxHashSet};
use scraper::{ElementRef, Html};
use url::Url;

use crate::error::ExtractError;
use crate::limits::{Guard, LimitKind, Limits, OnLimit};
use crate::model::{Graph, GraphResult, Value};
use crate::urls::{self, UrlPolicy};
use crate::vocab;
use dom::{is_item_scope, DocumentIndex};

/// Options for one extraction call.
#[derive(Debug, Clone)]
pub struct Options {
    /// Base reference for resolving relative identifiers and URLs.
    pub base: Option<Url>,
    /// Compact identifiers against a shared vocabulary base.
    pub compact: bool,
    /// Return graph-wrapped output even for a single item.
    pub force_graph: bool,
    /// Behavior when a ceiling is breached.
    pub on_limit: OnLimit,
    /// Configured ceilings.
    pub limits: Limits,
    /// Policy for URL-sourced property values.
    pub url_policy: UrlPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base: None,
            compact: true,
            force_graph: false,
            on_limit: OnLimit::Fail,
            limits: Limits::unbounded(),
            url_policy: UrlPolicy::default(),
        }
    }
}

/// Extracts the structured-data graph from a parsed document.
///
/// The document is read-only and owned by the caller; everything the
/// extraction allocates is discarded on return.
pub fn extract_graph(html: &Html, options: &Options) -> Result<GraphResult, ExtractError> {
    Extractor::new(html, options).run()
}

/// Parses raw markup and extracts its structured-data graph.
///
/// The input-size ceiling is checked before parsing begins; a breach
/// always fails regardless of the limit policy, since a truncated raw
/// input has no consistent partial parse.
pub fn extract_from_html(raw: &str, options: &Options) -> Result<GraphResult, ExtractError> {
    if let Some(max) = options.limits.max_input_length {
        if raw.len() > max {
            return Err(ExtractError::LimitExceeded {
                kind: LimitKind::InputLength,
                max,
                observed: raw.len(),
            });
        }
    }
    let html = Html::parse_document(raw);
    extract_graph(&html, options)
}

/// Per-call extraction state.
struct Extractor<'a> {
    dom: DocumentIndex<'a>,
    options: &'a Options,
    guard: Guard,
    graph: Graph,
    /// Resolved identifier per element, blank ids included. Resolving
    /// the same element twice must yield the same identifier.
    element_ids: FxHashMap<NodeId, String>,
    /// Elements whose item is currently being built; re-entry through a
    /// reference cycle returns the partial item instead of recursing.
    in_progress: FxHashSet<NodeId>,
    next_blank: usize,
}

impl<'a> Extractor<'a> {
    fn new(html: &'a Html, options: &'a Options) -> Self {
        Self {
            dom: DocumentIndex::new(html),
            options,
            guard: Guard::new(options.limits.clone(), options.on_limit),
            graph: Graph::new(),
            element_ids: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            next_blank: 0,
        }
    }

    fn run(mut self) -> Result<GraphResult, ExtractError> {
        for root in self.dom.item_roots() {
            self.build_item(root)?;
        }
        let mut items = self.graph.into_items();
        let context = vocab::apply(&mut items, self.options.compact);
        Ok(GraphResult::shape(items, context, self.options.force_graph))
    }

    /// Builds (or merges into) the item for an annotated element and
    /// returns its identifier. `None` means the item ceiling truncated
    /// this item away.
    fn build_item(&mut self, el: ElementRef<'a>) -> Result<Option<String>, ExtractError> {
        let node = el.id();
        let id = self.resolve_id(el);
        if self.in_progress.contains(&node) {
            // Cyclic reference: hand back the partial item.
            return Ok(Some(id));
        }
        if !self.graph.contains(&id) {
            if self.guard.admit_item()?.is_stop() {
                return Ok(None);
            }
            self.graph.get_or_insert(&id);
        }

        self.in_progress.insert(node);
        let populated = self.populate(el, &id);
        self.in_progress.remove(&node);
        populated?;
        Ok(Some(id))
    }

    fn populate(&mut self, el: ElementRef<'a>, id: &str) -> Result<(), ExtractError> {
        if let Some(raw) = el.value().attr("itemtype") {
            let types = vocab::canonical_types(raw);
            self.graph.get_or_insert(id).merge_types(types);
        }

        let contributing = collect::property_elements(&self.dom, el, &mut self.guard)?;
        for element in contributing {
            let names = vocab::canonical_names(
                element.value().attr("itemprop").unwrap_or_default(),
            );
            let Some(value) = self.property_value(element)? else {
                continue;
            };
            let item = self.graph.get_or_insert(id);
            for name in names {
                item.add_value(name, value.clone());
            }
        }
        Ok(())
    }

    /// Value of one contributing element: a reference for nested item
    /// scopes, a sanitized primitive otherwise.
    fn property_value(&mut self, el: ElementRef<'a>) -> Result<Option<Value>, ExtractError> {
        if is_item_scope(el) {
            let id = self.build_item(el)?;
            return Ok(id.filter(|id| !id.is_empty()).map(Value::Ref));
        }
        Ok(
            value::element_value(el, self.options.base.as_ref(), &self.options.url_policy)
                .map(Value::Text),
        )
    }

    /// Declared identifier resolved against the base, or a cached
    /// synthesized blank id. Allocation order follows build order.
    fn resolve_id(&mut self, el: ElementRef<'a>) -> String {
        if let Some(cached) = self.element_ids.get(&el.id()) {
            return cached.clone();
        }
        let id = match el.value().attr("itemid").map(str::trim) {
            Some(declared) if !declared.is_empty() => {
                urls::resolve(declared, self.options.base.as_ref())
            }
            _ => {
                self.next_blank += 1;
                format!("_:b{}", self.next_blank)
            }
        };
        self.element_ids.insert(el.id(), id.clone());
        id
    }
}
