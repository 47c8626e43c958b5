//! Vocabulary canonicalization and compaction.
//!
//! Type and property identifiers are canonicalized by rewriting the
//! legacy well-known vocabulary root to its secure form. When every
//! item in a graph shares one vocabulary base, identifiers under that
//! base compact to their local suffix and the base becomes the shared
//! context; otherwise local property names expand against their own
//! item's vocabulary base.

use std::borrow::Cow;

use url::Url;

use crate::model::Item;

/// Legacy root of the well-known vocabulary, rewritten wherever it
/// appears as a prefix.
pub const LEGACY_SCHEMA_ROOT: &str = "http://schema.org";

/// Canonical root of the well-known vocabulary, also its context value.
pub const SCHEMA_ROOT: &str = "https://schema.org";

const SCHEMA_BASE: &str = "https://schema.org/";

/// Rewrites the legacy vocabulary root to its canonical form.
///
/// The rewrite only applies at a path boundary, so identifiers that
/// merely start with the same characters are left alone.
pub fn canonicalize(id: &str) -> Cow<'_, str> {
    if let Some(rest) = id.strip_prefix(LEGACY_SCHEMA_ROOT) {
        if rest.is_empty() || rest.starts_with(['/', '#']) {
            return Cow::Owned(format!("{SCHEMA_ROOT}{rest}"));
        }
    }
    Cow::Borrowed(id)
}

/// Returns whether `name` is an absolute identifier (carries a scheme).
pub(crate) fn is_absolute(name: &str) -> bool {
    name.contains(':') && Url::parse(name).is_ok()
}

/// Splits, de-duplicates, and canonicalizes declared type tokens.
pub(crate) fn canonical_types(raw: &str) -> Vec<String> {
    let mut out = Vec::new();
    for token in raw.split_whitespace() {
        let ty = canonicalize(token).into_owned();
        if !out.contains(&ty) {
            out.push(ty);
        }
    }
    out
}

/// Splits and de-duplicates declared property names, canonicalizing the
/// absolute ones. Local tokens are resolved later, once the graph-wide
/// vocabulary context is known.
pub(crate) fn canonical_names(raw: &str) -> Vec<String> {
    let mut out = Vec::new();
    for token in raw.split_whitespace() {
        let name = if is_absolute(token) {
            canonicalize(token).into_owned()
        } else {
            token.to_string()
        };
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Vocabulary base of a type identifier: everything up to and including
/// the final path separator or fragment marker. Keeping the separator
/// makes compaction reversible by plain concatenation.
pub(crate) fn vocab_base(ty: &str) -> Option<&str> {
    let cut = ty.rfind(['/', '#'])?;
    Some(&ty[..=cut])
}

/// The single vocabulary base shared by every item in a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SharedVocab {
    /// Prefix stripped from contained identifiers, separator included.
    pub base: String,
    /// Value attached as the top-level context.
    pub context: String,
}

/// Computes the shared vocabulary base, if one exists.
///
/// Every item must declare a type and all first-type bases must agree;
/// an untyped item or a second base disables compaction.
pub(crate) fn shared_vocab(items: &[Item]) -> Option<SharedVocab> {
    let mut shared: Option<&str> = None;
    if items.is_empty() {
        return None;
    }
    for item in items {
        let base = vocab_base(item.types.first()?)?;
        match shared {
            None => shared = Some(base),
            Some(current) if current == base => {}
            Some(_) => return None,
        }
    }
    let base = shared?.to_string();
    let context = if base == SCHEMA_BASE {
        SCHEMA_ROOT.to_string()
    } else {
        base.clone()
    };
    Some(SharedVocab { base, context })
}

/// Applies the graph-wide vocabulary pass and returns the context value
/// to attach, if any.
///
/// With a shared base, types and absolute property keys under it
/// compact to their local suffix and local keys stay local. Without
/// one, local property keys expand against their own item's base.
pub(crate) fn apply(items: &mut [Item], compact: bool) -> Option<String> {
    let shared = if compact { shared_vocab(items) } else { None };
    match shared {
        Some(shared) => {
            for item in items.iter_mut() {
                for ty in &mut item.types {
                    if let Some(local) = ty.strip_prefix(&shared.base) {
                        if !local.is_empty() {
                            *ty = local.to_string();
                        }
                    }
                }
                item.map_keys(|key| match key.strip_prefix(&shared.base) {
                    Some(local) if !local.is_empty() => local.to_string(),
                    _ => key,
                });
            }
            Some(shared.context)
        }
        None => {
            for item in items.iter_mut() {
                let base = item
                    .types
                    .first()
                    .and_then(|ty| vocab_base(ty))
                    .map(str::to_string);
                if let Some(base) = base {
                    item.map_keys(|key| {
                        if is_absolute(&key) {
                            key
                        } else {
                            format!("{base}{key}")
                        }
                    });
                }
            }
            None
        }
    }
}

/// Expands a compacted identifier against a context value.
///
/// Inverse of compaction: contexts that keep their separator concatenate
/// directly, the separator-free well-known context joins with `/`.
pub fn expand(context: &str, local: &str) -> String {
    if context.ends_with(['/', '#']) {
        format!("{context}{local}")
    } else {
        format!("{context}/{local}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    fn typed_item(id: &str, ty: &str) -> Item {
        let mut item = Item::new(id);
        item.merge_types([ty.to_string()]);
        item
    }

    #[test]
    fn test_canonicalize_rewrites_legacy_root() {
        assert_eq!(canonicalize("http://schema.org/Person"), "https://schema.org/Person");
        assert_eq!(canonicalize("http://schema.org"), "https://schema.org");
        assert_eq!(canonicalize("https://schema.org/Person"), "https://schema.org/Person");
    }

    #[test]
    fn test_canonicalize_respects_boundaries() {
        // Not the well-known root, just a shared prefix.
        assert_eq!(
            canonicalize("http://schema.organization.example/x"),
            "http://schema.organization.example/x"
        );
    }

    #[test]
    fn test_canonical_types_dedupes() {
        assert_eq!(
            canonical_types("http://schema.org/Person  https://schema.org/Person Thing"),
            vec!["https://schema.org/Person".to_string(), "Thing".to_string()]
        );
    }

    #[test]
    fn test_vocab_base() {
        assert_eq!(vocab_base("https://schema.org/Person"), Some("https://schema.org/"));
        assert_eq!(
            vocab_base("http://example.com/vocab#Widget"),
            Some("http://example.com/vocab#")
        );
        assert_eq!(vocab_base("Widget"), None);
    }

    #[test]
    fn test_shared_vocab_agreement() {
        let items = vec![
            typed_item("_:b1", "https://schema.org/Person"),
            typed_item("_:b2", "https://schema.org/Organization"),
        ];
        let shared = shared_vocab(&items).unwrap();
        assert_eq!(shared.base, "https://schema.org/");
        assert_eq!(shared.context, "https://schema.org");
    }

    #[test]
    fn test_shared_vocab_disagreement() {
        let items = vec![
            typed_item("_:b1", "https://schema.org/Person"),
            typed_item("_:b2", "http://example.com/vocab#Widget"),
        ];
        assert!(shared_vocab(&items).is_none());
    }

    #[test]
    fn test_untyped_item_blocks_sharing() {
        let items = vec![
            typed_item("_:b1", "https://schema.org/Person"),
            Item::new("_:b2"),
        ];
        assert!(shared_vocab(&items).is_none());
        assert!(shared_vocab(&[]).is_none());
    }

    #[test]
    fn test_apply_compacts_under_shared_base() {
        let mut item = typed_item("_:b1", "https://schema.org/Person");
        item.add_value("name", Value::Text("Alice".into()));
        item.add_value(
            "https://schema.org/jobTitle",
            Value::Text("Engineer".into()),
        );
        let mut items = vec![item];

        let context = apply(&mut items, true);
        assert_eq!(context.as_deref(), Some("https://schema.org"));
        assert_eq!(items[0].types, vec!["Person".to_string()]);
        assert!(items[0].properties.contains_key("name"));
        assert!(items[0].properties.contains_key("jobTitle"));
    }

    #[test]
    fn test_apply_expands_without_shared_base() {
        let mut first = typed_item("_:b1", "https://schema.org/Person");
        first.add_value("name", Value::Text("Alice".into()));
        let mut second = typed_item("_:b2", "http://example.com/vocab#Widget");
        second.add_value("size", Value::Text("L".into()));
        let mut items = vec![first, second];

        let context = apply(&mut items, true);
        assert!(context.is_none());
        assert!(items[0].properties.contains_key("https://schema.org/name"));
        assert!(items[1].properties.contains_key("http://example.com/vocab#size"));
    }

    #[test]
    fn test_apply_without_compaction_expands() {
        let mut item = typed_item("_:b1", "https://schema.org/Person");
        item.add_value("name", Value::Text("Alice".into()));
        let mut items = vec![item];

        let context = apply(&mut items, false);
        assert!(context.is_none());
        assert_eq!(items[0].types, vec!["https://schema.org/Person".to_string()]);
        assert!(items[0].properties.contains_key("https://schema.org/name"));
    }

    #[test]
    fn test_expand_reverses_compaction() {
        assert_eq!(expand("https://schema.org", "Person"), "https://schema.org/Person");
        assert_eq!(
            expand("http://example.com/vocab#", "Widget"),
            "http://example.com/vocab#Widget"
        );
    }
}
