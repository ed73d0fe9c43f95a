//! Indicator matching
//!
//! A matcher decides which indicators count toward the aggregate verdict.
//! Indicators that do not match are still executed, but their results are
//! reported as suppressed.

use super::indicator::HealthIndicator;

/// Predicate over indicators
pub trait IndicatorMatcher: Send + Sync {
    /// `true` when the indicator contributes to the verdict
    fn matches(&self, indicator: &dyn HealthIndicator) -> bool;
}

impl<F> IndicatorMatcher for F
where
    F: Fn(&dyn HealthIndicator) -> bool + Send + Sync,
{
    fn matches(&self, indicator: &dyn HealthIndicator) -> bool {
        self(indicator)
    }
}

/// Name-based include/exclude filter
///
/// An excluded name never matches. When the include list is non-empty, only
/// listed names match. With both lists empty every indicator matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorFilter {
    included: Vec<String>,
    excluded: Vec<String>,
}

impl IndicatorFilter {
    /// Evaluate the filter against a bare name
    pub fn matches_name(&self, name: &str) -> bool {
        if self.excluded.iter().any(|excluded| excluded == name) {
            return false;
        }
        if !self.included.is_empty() && !self.included.iter().any(|included| included == name) {
            return false;
        }
        true
    }

    pub fn included(&self) -> &[String] {
        &self.included
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }
}

impl IndicatorMatcher for IndicatorFilter {
    fn matches(&self, indicator: &dyn HealthIndicator) -> bool {
        self.matches_name(indicator.name())
    }
}

/// Entry points for building an [`IndicatorFilter`]
pub struct IndicatorMatchers;

impl IndicatorMatchers {
    pub fn includes<I, S>(names: I) -> IndicatorFilterBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndicatorFilterBuilder::default().includes(names)
    }

    pub fn excludes<I, S>(names: I) -> IndicatorFilterBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndicatorFilterBuilder::default().excludes(names)
    }

    /// Filter matching every indicator
    pub fn build() -> IndicatorFilter {
        IndicatorFilter::default()
    }
}

/// Accumulates include and exclude lists
#[derive(Debug, Clone, Default)]
pub struct IndicatorFilterBuilder {
    filter: IndicatorFilter,
}

impl IndicatorFilterBuilder {
    pub fn includes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.included.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> IndicatorFilter {
        self.filter
    }
}
