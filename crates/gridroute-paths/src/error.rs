use std::fmt;

use gridroute_core::Point;

/// Broad class of a [`RouteError`], used by front ends to pick a
/// transport-level outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is malformed. Client-side error.
    Validation,
    /// The engine failed to complete a well-formed request. Server-side error.
    Internal,
}

/// Why a search was cut short by its [`SearchLimits`](crate::SearchLimits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// More nodes were expanded than `max_expansions` allows.
    ExpansionLimit(usize),
    /// Wall-clock time exceeded `time_budget_ms`.
    TimeBudget(u64),
}

/// Errors raised by the router.
///
/// An unreachable waypoint is *not* an error: it is reported through
/// [`PathFindingResult::success`](crate::PathFindingResult::success).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Fewer than two waypoints were supplied.
    TooFewWaypoints { count: usize },
    /// Grid width or height is not strictly positive.
    InvalidDimensions { width: i32, height: i32 },
    /// The grid has more cells than can be addressed.
    GridTooLarge { width: i32, height: i32 },
    /// A waypoint lies outside `[0, width) × [0, height)`.
    WaypointOutOfBounds { index: usize, point: Point },
    /// An obstacle lies outside `[0, width) × [0, height)`.
    ObstacleOutOfBounds { index: usize, point: Point },
    /// A search endpoint handed directly to A* lies outside the grid.
    EndpointOutOfBounds { point: Point },
    /// The search exceeded its configured limits.
    SearchAborted {
        reason: AbortReason,
        nodes_explored: usize,
    },
}

impl RouteError {
    /// Classify the error for transport mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SearchAborted { .. } | Self::GridTooLarge { .. } => ErrorKind::Internal,
            _ => ErrorKind::Validation,
        }
    }

    /// Shorthand for `self.kind() == ErrorKind::Validation`.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpansionLimit(n) => write!(f, "expansion limit of {n} nodes reached"),
            Self::TimeBudget(ms) => write!(f, "time budget of {ms} ms exceeded"),
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewWaypoints { count } => {
                write!(f, "at least 2 waypoints are required, got {count}")
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "grid dimensions must be positive, got {width}x{height}")
            }
            Self::GridTooLarge { width, height } => {
                write!(f, "grid of {width}x{height} cells is too large to search")
            }
            Self::WaypointOutOfBounds { index, point } => {
                write!(f, "waypoint {index} at {point} is outside the grid")
            }
            Self::ObstacleOutOfBounds { index, point } => {
                write!(f, "obstacle {index} at {point} is outside the grid")
            }
            Self::EndpointOutOfBounds { point } => {
                write!(f, "search endpoint {point} is outside the grid")
            }
            Self::SearchAborted {
                reason,
                nodes_explored,
            } => write!(
                f,
                "search aborted after exploring {nodes_explored} nodes: {reason}"
            ),
        }
    }
}

impl std::error::Error for RouteError {}
