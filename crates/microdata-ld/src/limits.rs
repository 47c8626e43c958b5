//! Resource ceilings for parsing untrusted markup.
//!
//! The extractor walks attacker-controlled input; every collection it
//! grows is bounded by a configurable ceiling. A breach either aborts
//! the parse ([`OnLimit::Fail`]) or stops collecting further instances
//! of the breached kind ([`OnLimit::Truncate`]), leaving a partial but
//! internally consistent graph.

use std::fmt;

use crate::error::ExtractError;

/// Recommended maximum raw input length in bytes (2 MiB).
pub const MAX_INPUT_LENGTH: usize = 2 * 1024 * 1024;

/// Recommended maximum number of items per parse.
pub const MAX_ITEMS: usize = 2_000;

/// Recommended maximum number of reference ids per item.
pub const MAX_REF_IDS: usize = 200;

/// Recommended maximum contributing property elements per item.
pub const MAX_PROPERTY_ELEMENTS: usize = 2_000;

/// Recommended maximum contributing property elements per parse.
pub const MAX_TOTAL_PROPERTY_ELEMENTS: usize = 20_000;

/// The ceiling named by a limit-exceeded failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitKind {
    /// Raw input length in bytes.
    InputLength,
    /// Items created during one parse.
    Items,
    /// Reference ids declared by one item.
    RefIds,
    /// Contributing property elements of one item.
    PropertyElements,
    /// Contributing property elements across the whole parse.
    TotalPropertyElements,
}

impl LimitKind {
    /// Stable discriminator string carried by the structured failure.
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitKind::InputLength => "maxInputLength",
            LimitKind::Items => "maxItems",
            LimitKind::RefIds => "maxRefIds",
            LimitKind::PropertyElements => "maxPropertyElements",
            LimitKind::TotalPropertyElements => "maxTotalPropertyElements",
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behavior when a ceiling is breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnLimit {
    /// Abort the parse with a structured failure.
    #[default]
    Fail,
    /// Stop collecting further instances of the breached kind and let
    /// the rest of the parse proceed.
    Truncate,
}

/// Configured ceilings. `None` disables a check.
///
/// [`Limits::unbounded`] disables every check; [`Limits::default`]
/// applies the recommended `MAX_*` ceilings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Raw input length in bytes, checked before parsing begins.
    /// A breach always fails regardless of policy: a truncated raw
    /// input has no consistent partial parse.
    pub max_input_length: Option<usize>,
    /// Maximum items created during one parse.
    pub max_items: Option<usize>,
    /// Maximum reference ids honored per item.
    pub max_ref_ids: Option<usize>,
    /// Maximum contributing property elements per item.
    pub max_property_elements: Option<usize>,
    /// Maximum contributing property elements across the whole parse.
    pub max_total_property_elements: Option<usize>,
}

impl Limits {
    /// Disables all ceilings.
    pub const fn unbounded() -> Self {
        Self {
            max_input_length: None,
            max_items: None,
            max_ref_ids: None,
            max_property_elements: None,
            max_total_property_elements: None,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_length: Some(MAX_INPUT_LENGTH),
            max_items: Some(MAX_ITEMS),
            max_ref_ids: Some(MAX_REF_IDS),
            max_property_elements: Some(MAX_PROPERTY_ELEMENTS),
            max_total_property_elements: Some(MAX_TOTAL_PROPERTY_ELEMENTS),
        }
    }
}

/// Outcome of consulting the guard about one more instance of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Under the ceiling; the instance was accounted for.
    Proceed,
    /// Over the ceiling under `Truncate`; the instance must be dropped.
    Stop,
}

impl Verdict {
    pub(crate) fn is_stop(self) -> bool {
        matches!(self, Verdict::Stop)
    }
}

/// Tracks running counts against the configured ceilings.
///
/// Allocated fresh per extraction call; per-item counts are supplied by
/// the caller since they reset for every item.
#[derive(Debug)]
pub(crate) struct Guard {
    limits: Limits,
    policy: OnLimit,
    items: usize,
    total_property_elements: usize,
}

impl Guard {
    pub(crate) fn new(limits: Limits, policy: OnLimit) -> Self {
        Self {
            limits,
            policy,
            items: 0,
            total_property_elements: 0,
        }
    }

    fn breach(&self, kind: LimitKind, max: usize, observed: usize) -> Result<Verdict, ExtractError> {
        match self.policy {
            OnLimit::Fail => Err(ExtractError::LimitExceeded { kind, max, observed }),
            OnLimit::Truncate => Ok(Verdict::Stop),
        }
    }

    fn admit(
        &self,
        kind: LimitKind,
        max: Option<usize>,
        observed: usize,
    ) -> Result<Verdict, ExtractError> {
        match max {
            Some(max) if observed > max => self.breach(kind, max, observed),
            _ => Ok(Verdict::Proceed),
        }
    }

    /// Accounts for one new item. `Stop` means the item must not be
    /// created.
    pub(crate) fn admit_item(&mut self) -> Result<Verdict, ExtractError> {
        let observed = self.items + 1;
        let verdict = self.admit(LimitKind::Items, self.limits.max_items, observed)?;
        if !verdict.is_stop() {
            self.items = observed;
        }
        Ok(verdict)
    }

    /// Accounts for one contributing property element. `per_item` is the
    /// running count for the current item, including out-of-scope and
    /// duplicate encounters.
    pub(crate) fn admit_property_element(
        &mut self,
        per_item: usize,
    ) -> Result<Verdict, ExtractError> {
        let total = self.total_property_elements + 1;
        let per = self.admit(
            LimitKind::PropertyElements,
            self.limits.max_property_elements,
            per_item,
        )?;
        let overall = self.admit(
            LimitKind::TotalPropertyElements,
            self.limits.max_total_property_elements,
            total,
        )?;
        if per.is_stop() || overall.is_stop() {
            return Ok(Verdict::Stop);
        }
        self.total_property_elements = total;
        Ok(Verdict::Proceed)
    }

    /// Caps a de-duplicated reference-id list at the configured ceiling.
    pub(crate) fn cap_ref_ids<T>(&self, ids: &mut Vec<T>) -> Result<(), ExtractError> {
        if let Some(max) = self.limits.max_ref_ids {
            if ids.len() > max && self.breach(LimitKind::RefIds, max, ids.len())?.is_stop() {
                ids.truncate(max);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_guard_never_breaches() {
        let mut guard = Guard::new(Limits::unbounded(), OnLimit::Fail);
        for _ in 0..10_000 {
            assert_eq!(guard.admit_item().unwrap(), Verdict::Proceed);
            assert_eq!(guard.admit_property_element(10_000).unwrap(), Verdict::Proceed);
        }
    }

    #[test]
    fn test_item_ceiling_fails() {
        let limits = Limits {
            max_items: Some(2),
            ..Limits::unbounded()
        };
        let mut guard = Guard::new(limits, OnLimit::Fail);
        assert!(guard.admit_item().is_ok());
        assert!(guard.admit_item().is_ok());
        let err = guard.admit_item().unwrap_err();
        assert_eq!(
            err,
            ExtractError::LimitExceeded {
                kind: LimitKind::Items,
                max: 2,
                observed: 3,
            }
        );
    }

    #[test]
    fn test_item_ceiling_truncates() {
        let limits = Limits {
            max_items: Some(1),
            ..Limits::unbounded()
        };
        let mut guard = Guard::new(limits, OnLimit::Truncate);
        assert_eq!(guard.admit_item().unwrap(), Verdict::Proceed);
        assert_eq!(guard.admit_item().unwrap(), Verdict::Stop);
        // A stopped instance is not accounted, so the verdict is stable.
        assert_eq!(guard.admit_item().unwrap(), Verdict::Stop);
    }

    #[test]
    fn test_total_property_elements_span_items() {
        let limits = Limits {
            max_total_property_elements: Some(3),
            ..Limits::unbounded()
        };
        let mut guard = Guard::new(limits, OnLimit::Truncate);
        // Two items with two elements each: the fourth breaches.
        assert_eq!(guard.admit_property_element(1).unwrap(), Verdict::Proceed);
        assert_eq!(guard.admit_property_element(2).unwrap(), Verdict::Proceed);
        assert_eq!(guard.admit_property_element(1).unwrap(), Verdict::Proceed);
        assert_eq!(guard.admit_property_element(2).unwrap(), Verdict::Stop);
    }

    #[test]
    fn test_ref_id_cap() {
        let limits = Limits {
            max_ref_ids: Some(2),
            ..Limits::unbounded()
        };
        let guard = Guard::new(limits.clone(), OnLimit::Truncate);
        let mut ids = vec!["a", "b", "c"];
        guard.cap_ref_ids(&mut ids).unwrap();
        assert_eq!(ids, vec!["a", "b"]);

        let guard = Guard::new(limits, OnLimit::Fail);
        let mut ids = vec!["a", "b", "c"];
        let err = guard.cap_ref_ids(&mut ids).unwrap_err();
        assert_eq!(err.limit_kind(), LimitKind::RefIds);
    }

    #[test]
    fn test_limit_kind_names() {
        assert_eq!(LimitKind::Items.to_string(), "maxItems");
        assert_eq!(LimitKind::InputLength.to_string(), "maxInputLength");
        assert_eq!(LimitKind::RefIds.to_string(), "maxRefIds");
    }
}
