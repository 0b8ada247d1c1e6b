//! Multi-waypoint routing.
//!
//! A route through `[w0, w1, ..., wn]` is the concatenation of the optimal
//! segment paths `w0 → w1`, `w1 → w2`, ... Each segment starts where the
//! previous one ended, so the shared waypoint is kept only once.
//!
//! Routing stops at the first unreachable segment: a broken chain cannot
//! yield a continuous route, and the grid is static, so no later segment or
//! retry could repair it.

use std::time::Instant;

use gridroute_core::Point;

use crate::config::SearchLimits;
use crate::distance::path_cost;
use crate::error::RouteError;
use crate::grid::{GridModel, checked_range};
use crate::request::RouteRequest;
use crate::result::{PathFindingResult, SegmentReport};
use crate::search::{Budget, SearchSpace};

/// Route through `waypoints` in order with no search limits.
///
/// Convenience wrapper around [`WaypointRouter::find_path_with_waypoints`].
pub fn find_path_with_waypoints(
    waypoints: &[Point],
    obstacles: &[Point],
    width: i32,
    height: i32,
    allow_diagonal: bool,
) -> Result<PathFindingResult, RouteError> {
    WaypointRouter::new().find_path_with_waypoints(
        waypoints,
        obstacles,
        width,
        height,
        allow_diagonal,
    )
}

/// Drives one A* search per consecutive waypoint pair.
///
/// Holds only configuration; every call builds its own grid and search
/// state, so one router can serve any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaypointRouter {
    limits: SearchLimits,
}

impl WaypointRouter {
    /// A router without search limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// A router enforcing `limits` on every route.
    pub fn with_limits(limits: SearchLimits) -> Self {
        Self { limits }
    }

    /// Route a [`RouteRequest`].
    pub fn route(&self, req: &RouteRequest) -> Result<PathFindingResult, RouteError> {
        self.find_path_with_waypoints(
            &req.waypoints,
            &req.obstacles,
            req.grid_width,
            req.grid_height,
            req.allow_diagonal,
        )
    }

    /// Route through `waypoints` in order on a `width × height` grid.
    ///
    /// Malformed input is rejected before any search runs. An unreachable
    /// segment is not an error: it yields `success == false`.
    pub fn find_path_with_waypoints(
        &self,
        waypoints: &[Point],
        obstacles: &[Point],
        width: i32,
        height: i32,
        allow_diagonal: bool,
    ) -> Result<PathFindingResult, RouteError> {
        // Grid construction counts toward the reported time and the time budget.
        let started = Instant::now();
        let grid = validate(waypoints, obstacles, width, height)?;

        log::debug!(
            "routing {} waypoints on {}x{} grid ({} obstacles, diagonal={})",
            waypoints.len(),
            width,
            height,
            grid.obstacle_count(),
            allow_diagonal
        );

        let pather = grid.pather(allow_diagonal);
        let mut space = SearchSpace::new(grid.range());
        let mut budget = Budget::new(self.limits, started);

        let mut path: Vec<Point> = Vec::new();
        let mut segments = Vec::with_capacity(waypoints.len() - 1);
        let mut nodes_explored = 0usize;
        let mut success = true;

        for (index, pair) in waypoints.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let outcome = match space.astar_budgeted(&pather, from, to, &mut budget) {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::warn!("segment {index} {from} -> {to}: {e}");
                    return Err(e);
                }
            };
            nodes_explored += outcome.nodes_explored;

            let report = SegmentReport {
                index,
                from,
                to,
                found: outcome.found,
                nodes_explored: outcome.nodes_explored,
                steps: outcome.path.len().saturating_sub(1),
                cost: path_cost(&outcome.path),
            };
            log::debug!(
                "segment {index} {from} -> {to}: found={} steps={} explored={}",
                report.found,
                report.steps,
                report.nodes_explored
            );
            segments.push(report);

            if !outcome.found {
                success = false;
                break;
            }

            // The segment starts on the waypoint the previous one ended on.
            let skip = usize::from(!path.is_empty());
            path.extend_from_slice(&outcome.path[skip..]);
        }

        let execution_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        log::debug!(
            "route {}: {} cells, {} nodes explored in {:.3} ms",
            if success { "found" } else { "failed" },
            path.len(),
            nodes_explored,
            execution_time_ms
        );

        Ok(PathFindingResult {
            success,
            path,
            nodes_explored,
            execution_time_ms,
            segments,
        })
    }
}

/// Check the request and build the grid. No search work happens here.
fn validate(
    waypoints: &[Point],
    obstacles: &[Point],
    width: i32,
    height: i32,
) -> Result<GridModel, RouteError> {
    if waypoints.len() < 2 {
        return Err(RouteError::TooFewWaypoints {
            count: waypoints.len(),
        });
    }
    let rng = checked_range(width, height)?;
    if let Some((index, &point)) = waypoints
        .iter()
        .enumerate()
        .find(|(_, p)| !rng.contains(**p))
    {
        return Err(RouteError::WaypointOutOfBounds { index, point });
    }
    GridModel::new(width, height, obstacles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::find;
    use crate::distance::{DIAGONAL_COST, is_step};
    use crate::error::{AbortReason, ErrorKind};
    use rand::{RngExt, SeedableRng};
    use std::collections::HashSet;

    fn pts(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().map(|&p| Point::from(p)).collect()
    }

    fn assert_valid_route(r: &PathFindingResult, waypoints: &[Point], obstacles: &[Point], diag: bool) {
        assert!(r.success);
        assert_eq!(r.path.first(), waypoints.first());
        assert_eq!(r.path.last(), waypoints.last());
        let blocked: HashSet<_> = obstacles.iter().copied().collect();
        assert!(r.path.iter().all(|p| !blocked.contains(p)));
        for w in r.path.windows(2) {
            assert!(is_step(w[0], w[1], diag), "{} -> {} is not a step", w[0], w[1]);
        }
    }

    #[test]
    fn single_segment_open_grid() {
        let r = find_path_with_waypoints(&pts(&[(0, 0), (4, 4)]), &[], 5, 5, true).unwrap();
        assert_eq!(r.path.len(), 5);
        assert!((r.total_cost() - 4.0 * DIAGONAL_COST).abs() < 1e-9);
        assert_eq!(r.segments.len(), 1);
        assert!(r.execution_time_ms >= 0.0);

        let r = find_path_with_waypoints(&pts(&[(0, 0), (4, 4)]), &[], 5, 5, false).unwrap();
        assert_eq!(r.path.len(), 9);
        assert_eq!(r.total_cost(), 8.0);
    }

    #[test]
    fn chaining_drops_shared_waypoint() {
        let (a, b, c) = (Point::new(0, 0), Point::new(6, 2), Point::new(1, 7));
        let g = GridModel::new(10, 10, &[]).unwrap();
        let ab = find(&g, a, b, true).unwrap();
        let bc = find(&g, b, c, true).unwrap();

        let r = find_path_with_waypoints(&[a, b, c], &[], 10, 10, true).unwrap();
        let mut expected = ab.path.clone();
        expected.extend_from_slice(&bc.path[1..]);
        assert_eq!(r.path, expected);
        assert_eq!(r.nodes_explored, ab.nodes_explored + bc.nodes_explored);
        assert_eq!(r.path.iter().filter(|&&p| p == b).count(), 1);
        assert_valid_route(&r, &[a, b, c], &[], true);
    }

    #[test]
    fn repeated_waypoint_is_zero_length_segment() {
        let wps = pts(&[(0, 0), (3, 0), (3, 0), (3, 3)]);
        let r = find_path_with_waypoints(&wps, &[], 5, 5, false).unwrap();
        assert_eq!(r.path.len(), 7);
        assert_eq!(r.segments[1].steps, 0);
        assert_eq!(r.segments[1].nodes_explored, 0);
        assert_valid_route(&r, &wps, &[], false);
    }

    #[test]
    fn detour_around_wall() {
        // Wall across x=5 for y in 0..9, opening at y=9.
        let wall: Vec<_> = (0..9).map(|y| Point::new(5, y)).collect();
        let wps = pts(&[(1, 1), (8, 1)]);
        let r = find_path_with_waypoints(&wps, &wall, 10, 10, false).unwrap();
        assert_valid_route(&r, &wps, &wall, false);
        // 8 down, 7 across, 8 up.
        assert_eq!(r.total_cost(), 23.0);
        assert!(r.path.len() > 8);
    }

    #[test]
    fn enclosed_waypoint_fails_after_exploring() {
        let ring: Vec<_> = (2..=4)
            .flat_map(|x| (2..=4).map(move |y| Point::new(x, y)))
            .filter(|&p| p != Point::new(3, 3))
            .collect();
        let r = find_path_with_waypoints(&pts(&[(0, 0), (3, 3)]), &ring, 8, 8, true).unwrap();
        assert!(!r.success);
        assert!(r.path.is_empty());
        assert!(r.nodes_explored > 0);
        assert_eq!(r.failed_segment().map(|s| s.index), Some(0));
    }

    #[test]
    fn stops_at_first_failed_segment() {
        let ring: Vec<_> = (2..=4)
            .flat_map(|x| (2..=4).map(move |y| Point::new(x, y)))
            .filter(|&p| p != Point::new(3, 3))
            .collect();
        let wps = pts(&[(0, 0), (7, 0), (3, 3), (7, 7)]);
        let r = find_path_with_waypoints(&wps, &ring, 8, 8, true).unwrap();
        assert!(!r.success);
        // Only the first two segments were searched.
        assert_eq!(r.segments.len(), 2);
        assert!(r.segments[0].found);
        assert!(!r.segments[1].found);
        // The partial route covers the first segment.
        assert_eq!(r.path.first(), Some(&Point::new(0, 0)));
        assert_eq!(r.path.last(), Some(&Point::new(7, 0)));
        assert_eq!(
            r.nodes_explored,
            r.segments[0].nodes_explored + r.segments[1].nodes_explored
        );
    }

    #[test]
    fn blocked_waypoint_fails_without_search() {
        let r = find_path_with_waypoints(&pts(&[(0, 0), (2, 2)]), &pts(&[(2, 2)]), 5, 5, true)
            .unwrap();
        assert!(!r.success);
        assert_eq!(r.nodes_explored, 0);
    }

    #[test]
    fn validation_happens_before_search() {
        let err = find_path_with_waypoints(&pts(&[(0, 0)]), &[], 5, 5, true).unwrap_err();
        assert_eq!(err, RouteError::TooFewWaypoints { count: 1 });
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = find_path_with_waypoints(&[], &[], 5, 5, true).unwrap_err();
        assert_eq!(err, RouteError::TooFewWaypoints { count: 0 });

        let err = find_path_with_waypoints(&pts(&[(0, 0), (1, 1)]), &[], 0, 5, true).unwrap_err();
        assert_eq!(
            err,
            RouteError::InvalidDimensions {
                width: 0,
                height: 5
            }
        );

        let err =
            find_path_with_waypoints(&pts(&[(0, 0), (1, 1), (5, 1)]), &[], 5, 5, true).unwrap_err();
        assert_eq!(
            err,
            RouteError::WaypointOutOfBounds {
                index: 2,
                point: Point::new(5, 1)
            }
        );

        let err = find_path_with_waypoints(&pts(&[(0, 0), (1, 1)]), &pts(&[(2, -1)]), 5, 5, true)
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::ObstacleOutOfBounds {
                index: 0,
                point: Point::new(2, -1)
            }
        );
    }

    #[test]
    fn route_request_matches_direct_call() {
        let req = RouteRequest::new(pts(&[(0, 0), (9, 3), (2, 8)]))
            .with_grid_size(12, 12)
            .with_obstacles(pts(&[(4, 1), (4, 2), (4, 3), (4, 4)]));
        let a = WaypointRouter::new().route(&req).unwrap();
        let b = find_path_with_waypoints(&req.waypoints, &req.obstacles, 12, 12, true).unwrap();
        assert_eq!(a.path, b.path);
        assert_eq!(a.nodes_explored, b.nodes_explored);
    }

    #[test]
    fn expansion_limit_spans_segments() {
        let wps = pts(&[(0, 0), (19, 0), (19, 19)]);
        let full = find_path_with_waypoints(&wps, &[], 20, 20, false).unwrap();
        let first = full.segments[0].nodes_explored;

        // Enough for the first segment but not both.
        let router = WaypointRouter::with_limits(SearchLimits::new().with_max_expansions(first + 1));
        let err = router
            .find_path_with_waypoints(&wps, &[], 20, 20, false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(matches!(
            err,
            RouteError::SearchAborted {
                reason: AbortReason::ExpansionLimit(_),
                ..
            }
        ));

        let router = WaypointRouter::with_limits(
            SearchLimits::new().with_max_expansions(full.nodes_explored),
        );
        let r = router.find_path_with_waypoints(&wps, &[], 20, 20, false).unwrap();
        assert_eq!(r.path, full.path);
    }

    #[test]
    fn zero_time_budget_aborts_route() {
        let router = WaypointRouter::with_limits(SearchLimits::new().with_time_budget_ms(0));
        let err = router
            .find_path_with_waypoints(&pts(&[(0, 0), (9, 9), (0, 9)]), &[], 10, 10, true)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(matches!(
            err,
            RouteError::SearchAborted {
                reason: AbortReason::TimeBudget(0),
                nodes_explored: 0
            }
        ));
    }

    #[test]
    fn time_budget_covers_grid_construction() {
        // Everything below row 0 is blocked; the search itself is one step.
        let (w, h) = (2048, 2048);
        let obstacles: Vec<Point> = (1..h)
            .flat_map(|y| (0..w).map(move |x| Point::new(x, y)))
            .collect();
        let wps = pts(&[(0, 0), (1, 0)]);

        let outer = Instant::now();
        let r = find_path_with_waypoints(&wps, &obstacles, w, h, true).unwrap();
        let wall_ms = outer.elapsed().as_secs_f64() * 1000.0;
        assert!(r.success);
        assert_eq!(r.nodes_explored, 1);

        let build = Instant::now();
        let grid = GridModel::new(w, h, &obstacles).unwrap();
        let build_ms = build.elapsed().as_secs_f64() * 1000.0;
        assert_eq!(grid.obstacle_count(), obstacles.len());
        assert!(r.execution_time_ms <= wall_ms);
        assert!(
            r.execution_time_ms >= build_ms / 4.0,
            "reported {:.3} ms, grid alone took {:.3} ms",
            r.execution_time_ms,
            build_ms
        );

        // A budget smaller than the grid build trips on the first expansion.
        let router = WaypointRouter::with_limits(SearchLimits::new().with_time_budget_ms(1));
        let err = router
            .find_path_with_waypoints(&wps, &obstacles, w, h, true)
            .unwrap_err();
        assert!(matches!(
            err,
            RouteError::SearchAborted {
                reason: AbortReason::TimeBudget(1),
                ..
            }
        ));
    }

    #[test]
    fn random_maps_hold_route_invariants() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let (w, h) = (24, 18);
        for round in 0..40 {
            let diag = round % 2 == 0;
            let obstacles: Vec<Point> = (0..120)
                .map(|_| Point::new(rng.random_range(0..w), rng.random_range(0..h)))
                .collect();
            let blocked: HashSet<_> = obstacles.iter().copied().collect();
            let mut waypoints = Vec::new();
            while waypoints.len() < 4 {
                let p = Point::new(rng.random_range(0..w), rng.random_range(0..h));
                if !blocked.contains(&p) {
                    waypoints.push(p);
                }
            }

            let r = find_path_with_waypoints(&waypoints, &obstacles, w, h, diag).unwrap();
            let again = find_path_with_waypoints(&waypoints, &obstacles, w, h, diag).unwrap();
            assert_eq!(r.path, again.path, "round {round} is not deterministic");
            assert_eq!(r.nodes_explored, again.nodes_explored);

            if r.success {
                assert_valid_route(&r, &waypoints, &obstacles, diag);
                assert_eq!(r.segments.len(), waypoints.len() - 1);
                // Each waypoint boundary lands on its waypoint.
                let mut at = 0;
                for s in &r.segments {
                    assert_eq!(r.path[at], s.from);
                    at += s.steps;
                    assert_eq!(r.path[at], s.to);
                }
            } else {
                assert!(r.failed_segment().is_some());
            }
        }
    }
}
