use gridroute_core::Point;

/// Per-segment diagnostics: one entry for each waypoint pair actually searched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct SegmentReport {
    /// Position of the segment in the route (segment `i` joins waypoints `i` and `i + 1`).
    pub index: usize,
    pub from: Point,
    pub to: Point,
    pub found: bool,
    pub nodes_explored: usize,
    /// Moves in the segment path; zero when not found.
    pub steps: usize,
    /// Movement cost of the segment path; zero when not found.
    pub cost: f64,
}

/// Outcome of routing through a sequence of waypoints.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PathFindingResult {
    /// Whether every segment was found.
    pub success: bool,
    /// The route. On failure, holds the segments found before the first
    /// unreachable one (empty if the first segment failed).
    pub path: Vec<Point>,
    /// Expansions summed over all searched segments.
    pub nodes_explored: usize,
    /// Wall-clock time spent routing.
    pub execution_time_ms: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub segments: Vec<SegmentReport>,
}

impl PathFindingResult {
    /// Total movement cost of the segments found.
    pub fn total_cost(&self) -> f64 {
        self.segments.iter().map(|s| s.cost).sum()
    }

    /// The first segment that could not be routed, if any.
    pub fn failed_segment(&self) -> Option<&SegmentReport> {
        self.segments.iter().find(|s| !s.found)
    }
}
