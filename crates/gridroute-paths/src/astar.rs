use std::collections::BinaryHeap;

use gridroute_core::Point;

use crate::error::RouteError;
use crate::grid::GridModel;
use crate::search::{Budget, NodeRef, SearchOutcome, SearchSpace};
use crate::traits::AstarPather;

/// Compute the optimal path from `start` to `end` on `grid`.
///
/// Allocates fresh search state for this one call. Returns
/// `found == false` (not an error) when `end` is unreachable or either
/// endpoint is blocked; only endpoints outside the grid are errors.
pub fn find(
    grid: &GridModel,
    start: Point,
    end: Point,
    allow_diagonal: bool,
) -> Result<SearchOutcome, RouteError> {
    let mut space = SearchSpace::new(grid.range());
    space.astar_path(&grid.pather(allow_diagonal), start, end)
}

impl SearchSpace {
    /// Compute the shortest path from `from` to `to` using A*, without limits.
    pub fn astar_path<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
    ) -> Result<SearchOutcome, RouteError> {
        self.astar_budgeted(pather, from, to, &mut Budget::unbounded())
    }

    /// A* charging every expansion against `budget`.
    pub(crate) fn astar_budgeted<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
        budget: &mut Budget,
    ) -> Result<SearchOutcome, RouteError> {
        let start_idx = self
            .idx(from)
            .ok_or(RouteError::EndpointOutOfBounds { point: from })?;
        let goal_idx = self
            .idx(to)
            .ok_or(RouteError::EndpointOutOfBounds { point: to })?;

        // A blocked endpoint can never be on a path.
        if !pather.passable(from) || !pather.passable(to) {
            log::trace!("endpoint blocked: {from} -> {to}");
            return Ok(SearchOutcome::not_found(0));
        }

        let cur_gen = self.next_generation();

        let h0 = pather.estimate(from, to);
        {
            let node = &mut self.nodes[start_idx];
            node.g = 0.0;
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.closed = false;
        }

        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef {
            idx: start_idx,
            f: h0,
            h: h0,
            seq: self.bump_seq(),
        });

        let mut nbuf = std::mem::take(&mut self.nbuf);
        let mut explored = 0usize;

        let result = 'search: loop {
            let Some(current) = open.pop() else {
                break 'search Ok(false);
            };

            let ci = current.idx;

            // Skip entries superseded by a cheaper push or already closed.
            if self.nodes[ci].closed {
                continue;
            }

            if ci == goal_idx {
                break 'search Ok(true);
            }

            if let Err(reason) = budget.charge() {
                break 'search Err(RouteError::SearchAborted {
                    reason,
                    nodes_explored: budget.expanded,
                });
            }

            self.nodes[ci].closed = true;
            explored += 1;
            let current_g = self.nodes[ci].g;
            let current_point = self.point(ci);

            nbuf.clear();
            pather.neighbors(current_point, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                let tentative_g = current_g + pather.cost(current_point, np);

                let n = &mut self.nodes[ni];
                if n.generation == cur_gen {
                    if n.closed || tentative_g >= n.g {
                        continue;
                    }
                } else {
                    n.generation = cur_gen;
                    n.closed = false;
                }

                n.g = tentative_g;
                n.parent = ci;

                let h = pather.estimate(np, to);
                let seq = self.bump_seq();
                open.push(NodeRef {
                    idx: ni,
                    f: tentative_g + h,
                    h,
                    seq,
                });
            }
        };

        self.nbuf = nbuf;

        if result? {
            log::trace!("path {from} -> {to} found after {explored} expansions");
            Ok(SearchOutcome {
                path: self.reconstruct(goal_idx),
                found: true,
                nodes_explored: explored,
            })
        } else {
            log::trace!("open set exhausted for {from} -> {to} after {explored} expansions");
            Ok(SearchOutcome::not_found(explored))
        }
    }

    #[inline]
    fn bump_seq(&mut self) -> u64 {
        let s = self.seq;
        self.seq += 1;
        s
    }
}
