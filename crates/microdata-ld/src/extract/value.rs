//! Per-element-kind value extraction.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use scraper::ElementRef;
use url::Url;

use crate::urls::{self, UrlPolicy};

lazy_static! {
    /// Element kinds whose value comes from a URL-bearing attribute,
    /// mapped to that attribute. These pass through sanitization.
    static ref URL_SOURCES: FxHashMap<&'static str, &'static str> = [
        ("img", "src"),
        ("audio", "src"),
        ("video", "src"),
        ("embed", "src"),
        ("source", "src"),
        ("track", "src"),
        ("iframe", "src"),
        ("a", "href"),
        ("area", "href"),
        ("link", "href"),
        ("object", "data"),
    ]
    .into_iter()
    .collect();
}

/// Reads the primitive value of a non-item contributing element.
///
/// Returns `None` when the value is missing, empty, or rejected by the
/// URL policy; a dropped value contributes no property. Item-scope
/// elements never reach here: the builder substitutes a reference to
/// the recursively built item instead.
pub(crate) fn element_value(
    el: ElementRef,
    base: Option<&Url>,
    policy: &UrlPolicy,
) -> Option<String> {
    let name = el.value().name();
    if let Some(attr) = URL_SOURCES.get(name) {
        return urls::sanitize(el.value().attr(attr)?, base, policy);
    }
    let value = match name {
        "meta" => el.value().attr("content").map(str::to_string),
        "data" | "meter" | "input" => el.value().attr("value").map(str::to_string),
        "time" => el
            .value()
            .attr("datetime")
            .map(str::to_string)
            .or_else(|| Some(text_content(el))),
        _ => Some(text_content(el)),
    };
    value.filter(|value| !value.is_empty())
}

fn text_content(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
