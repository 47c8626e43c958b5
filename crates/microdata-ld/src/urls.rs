//! URL resolution and sanitization.
//!
//! Relative references are resolved against the caller-supplied base;
//! malformed values pass through unresolved rather than being dropped.
//! Sanitization applies only to URL-sourced property values (media,
//! link, and object elements) and rejects by omission: a value the
//! policy refuses simply contributes no property.

use url::Url;

/// Schemes accepted by the default policy.
pub const DEFAULT_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Policy applied to URL-sourced property values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPolicy {
    /// Schemes accepted for absolute references.
    pub allowed_schemes: Vec<String>,
    /// Accept references that remain relative after resolution.
    pub allow_relative: bool,
    /// Accept protocol-relative (`//host/...`) references.
    pub allow_protocol_relative: bool,
    /// Bypass all checks.
    pub allow_unsafe: bool,
}

impl UrlPolicy {
    /// Returns whether the policy accepts `scheme`.
    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.allowed_schemes.iter().any(|s| s == scheme)
    }
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self {
            allowed_schemes: DEFAULT_SCHEMES.iter().map(|s| (*s).to_string()).collect(),
            allow_relative: false,
            allow_protocol_relative: false,
            allow_unsafe: false,
        }
    }
}

/// Resolves `value` against `base` when one is supplied.
///
/// Values that fail to resolve are returned as declared (trimmed);
/// resolution failure is never an error.
pub fn resolve(value: &str, base: Option<&Url>) -> String {
    let trimmed = value.trim();
    match base {
        Some(base) => base
            .join(trimmed)
            .map(String::from)
            .unwrap_or_else(|_| trimmed.to_string()),
        None => trimmed.to_string(),
    }
}

/// Resolves and policy-checks a URL-sourced value.
///
/// Returns `None` for empty values and for values the policy rejects.
pub fn sanitize(value: &str, base: Option<&Url>, policy: &UrlPolicy) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if policy.allow_unsafe {
        return Some(resolve(trimmed, base));
    }
    // Protocol-relative input is checked before resolution, which would
    // otherwise absolutize it against the base scheme.
    if trimmed.starts_with("//") {
        if !policy.allow_protocol_relative {
            return None;
        }
        return Some(resolve(trimmed, base));
    }
    let resolved = resolve(trimmed, base);
    match Url::parse(&resolved) {
        Ok(url) => policy.allows_scheme(url.scheme()).then_some(resolved),
        Err(_) => policy.allow_relative.then_some(resolved),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/dir/page.html").unwrap()
    }

    #[test]
    fn test_resolve_relative_against_base() {
        assert_eq!(
            resolve("pic.jpg", Some(&base())),
            "https://example.com/dir/pic.jpg"
        );
        assert_eq!(resolve("/root.jpg", Some(&base())), "https://example.com/root.jpg");
    }

    #[test]
    fn test_resolve_without_base_passes_through() {
        assert_eq!(resolve("pic.jpg", None), "pic.jpg");
        assert_eq!(resolve("  spaced  ", None), "spaced");
    }

    #[test]
    fn test_resolve_absolute_ignores_base() {
        assert_eq!(
            resolve("urn:isbn:123", Some(&base())),
            "urn:isbn:123"
        );
    }

    #[test]
    fn test_sanitize_allowed_scheme() {
        let policy = UrlPolicy::default();
        assert_eq!(
            sanitize("https://other.example/x", None, &policy),
            Some("https://other.example/x".to_string())
        );
        assert_eq!(
            sanitize("mailto:a@example.com", None, &policy),
            Some("mailto:a@example.com".to_string())
        );
    }

    #[test]
    fn test_sanitize_rejects_unsafe_scheme() {
        let policy = UrlPolicy::default();
        assert_eq!(sanitize("javascript:alert(1)", None, &policy), None);
        assert_eq!(sanitize("data:text/html,x", Some(&base()), &policy), None);
    }

    #[test]
    fn test_sanitize_relative_flag() {
        let strict = UrlPolicy::default();
        assert_eq!(sanitize("pic.jpg", None, &strict), None);

        let lenient = UrlPolicy {
            allow_relative: true,
            ..UrlPolicy::default()
        };
        assert_eq!(sanitize("pic.jpg", None, &lenient), Some("pic.jpg".to_string()));

        // With a base the value becomes absolute and passes the scheme check.
        assert_eq!(
            sanitize("pic.jpg", Some(&base()), &strict),
            Some("https://example.com/dir/pic.jpg".to_string())
        );
    }

    #[test]
    fn test_sanitize_protocol_relative_flag() {
        let strict = UrlPolicy::default();
        assert_eq!(sanitize("//cdn.example/x.js", Some(&base()), &strict), None);

        let lenient = UrlPolicy {
            allow_protocol_relative: true,
            ..UrlPolicy::default()
        };
        assert_eq!(
            sanitize("//cdn.example/x.js", Some(&base()), &lenient),
            Some("https://cdn.example/x.js".to_string())
        );
        assert_eq!(
            sanitize("//cdn.example/x.js", None, &lenient),
            Some("//cdn.example/x.js".to_string())
        );
    }

    #[test]
    fn test_sanitize_unsafe_override() {
        let policy = UrlPolicy {
            allow_unsafe: true,
            ..UrlPolicy::default()
        };
        assert_eq!(
            sanitize("javascript:alert(1)", None, &policy),
            Some("javascript:alert(1)".to_string())
        );
        assert_eq!(sanitize("pic.jpg", None, &policy), Some("pic.jpg".to_string()));
    }

    #[test]
    fn test_sanitize_empty_is_dropped() {
        let policy = UrlPolicy {
            allow_unsafe: true,
            ..UrlPolicy::default()
        };
        assert_eq!(sanitize("", None, &policy), None);
        assert_eq!(sanitize("   ", None, &policy), None);
    }
}
