//! Search limits bounding worst-case latency.

use std::time::Duration;

/// Upper bounds on the work a single route may perform.
///
/// Limits apply to the route as a whole: expansions and elapsed time are
/// summed over all segments. Both are unbounded by default, so a search on
/// a static grid always runs to completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct SearchLimits {
    /// Maximum number of node expansions across all segments.
    pub max_expansions: Option<usize>,
    /// Wall-clock budget in milliseconds, measured from the start of routing.
    pub time_budget_ms: Option<u64>,
}

impl SearchLimits {
    /// No limits.
    pub const UNBOUNDED: Self = Self {
        max_expansions: None,
        time_budget_ms: None,
    };

    /// Create unbounded limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the expansion cap.
    pub fn with_max_expansions(mut self, n: usize) -> Self {
        self.max_expansions = Some(n);
        self
    }

    /// Builder-style setter for the time budget.
    pub fn with_time_budget_ms(mut self, ms: u64) -> Self {
        self.time_budget_ms = Some(ms);
        self
    }

    /// The time budget as a [`Duration`], if any.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    /// Whether no limit is set.
    pub fn is_unbounded(&self) -> bool {
        self.max_expansions.is_none() && self.time_budget_ms.is_none()
    }
}
