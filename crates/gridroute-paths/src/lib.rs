//! Multi-waypoint A* routing on obstacle grids.
//!
//! Given an ordered list of waypoints, a set of blocked cells and the grid
//! dimensions, [`find_path_with_waypoints`] computes one continuous route
//! that visits every waypoint in order, together with search metrics.
//!
//! - [`GridModel`]: immutable bounds plus a bit-indexed obstacle set
//! - [`find`] / [`SearchSpace::astar_path`]: optimal start → end A* with
//!   deterministic tie-breaking
//! - [`WaypointRouter`]: chains one search per waypoint pair and assembles
//!   a [`PathFindingResult`]
//!
//! Every call is self-contained: no state survives between routes, so
//! routes may run concurrently on separate threads without locking.
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | passability, neighbor enumeration |
//! | [`WeightedPather`] : [`Pather`] | step costs |
//! | [`AstarPather`] : [`WeightedPather`] | admissible heuristic |

mod astar;
mod config;
mod distance;
mod error;
mod grid;
mod request;
mod result;
mod router;
mod search;
mod traits;

pub use astar::find;
pub use config::SearchLimits;
pub use distance::{
    DIAGONAL_COST, ORTHOGONAL_COST, chebyshev, is_step, manhattan, octile, path_cost, step_cost,
};
pub use error::{AbortReason, ErrorKind, RouteError};
pub use grid::{GridModel, GridPather, MAX_CELLS};
pub use request::{DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, RouteRequest};
pub use result::{PathFindingResult, SegmentReport};
pub use router::{WaypointRouter, find_path_with_waypoints};
pub use search::{SearchOutcome, SearchSpace};
pub use traits::{AstarPather, Pather, WeightedPather};
