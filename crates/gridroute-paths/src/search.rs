use std::time::Instant;

use gridroute_core::{Point, Range};

use crate::config::SearchLimits;
use crate::error::AbortReason;

/// Outcome of a single start → end search.
///
/// "No path" is a normal outcome (`found == false`), not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Full path including both endpoints; empty when `found` is false.
    pub path: Vec<Point>,
    pub found: bool,
    /// Nodes popped from the open set and expanded (the goal is not counted).
    pub nodes_explored: usize,
}

impl SearchOutcome {
    pub(crate) fn not_found(nodes_explored: usize) -> Self {
        Self {
            path: Vec::new(),
            found: false,
            nodes_explored,
        }
    }
}

// ---------------------------------------------------------------------------
// Internal node for A* priority-queue searches
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: f64,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) closed: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: f64::INFINITY,
            parent: usize::MAX,
            generation: 0,
            closed: false,
        }
    }
}

/// Reference into the node array, ordered for use in `BinaryHeap`.
///
/// Lowest `f` pops first; ties go to the lower `h` (closer to the goal),
/// then to the earliest push. The sequence number makes the order total,
/// so the expansion order never depends on anything but the input.
#[derive(Clone, Copy)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f64,
    pub(crate) h: f64,
    pub(crate) seq: u64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest key first.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for NodeRef {}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

/// How often the wall clock is sampled, in expansions.
const CLOCK_STRIDE: usize = 256;

/// Running account of expansions against [`SearchLimits`], shared by all
/// segments of one route.
#[derive(Debug, Clone)]
pub(crate) struct Budget {
    limits: SearchLimits,
    started: Instant,
    pub(crate) expanded: usize,
}

impl Budget {
    pub(crate) fn new(limits: SearchLimits, started: Instant) -> Self {
        Self {
            limits,
            started,
            expanded: 0,
        }
    }

    pub(crate) fn unbounded() -> Self {
        Self::new(SearchLimits::UNBOUNDED, Instant::now())
    }

    /// Account for one more expansion, or report which limit it would break.
    #[inline]
    pub(crate) fn charge(&mut self) -> Result<(), AbortReason> {
        if let Some(max) = self.limits.max_expansions {
            if self.expanded >= max {
                return Err(AbortReason::ExpansionLimit(max));
            }
        }
        if let Some(budget) = self.limits.time_budget() {
            if self.expanded % CLOCK_STRIDE == 0 && self.started.elapsed() > budget {
                return Err(AbortReason::TimeBudget(budget.as_millis() as u64));
            }
        }
        self.expanded += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SearchSpace
// ---------------------------------------------------------------------------

/// Per-cell scratch state for A* over a grid rectangle.
///
/// Allocated once per route and reused by every segment search. Each search
/// bumps a generation counter so nodes touched by the previous segment read
/// as unvisited, which keeps segments independent without reallocating.
pub struct SearchSpace {
    pub(crate) rng: Range,
    pub(crate) nodes: Vec<Node>,
    pub(crate) generation: u32,
    pub(crate) seq: u64,
    // scratch buffer for neighbor queries
    pub(crate) nbuf: Vec<Point>,
}

impl SearchSpace {
    /// Create scratch state covering `rng`.
    pub fn new(rng: Range) -> Self {
        Self {
            rng,
            nodes: vec![Node::default(); rng.len()],
            generation: 0,
            seq: 0,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// The grid rectangle being searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Start a new search: invalidate every node from earlier searches.
    pub(crate) fn next_generation(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: stale nodes could alias the new generation.
            self.nodes.fill(Node::default());
            self.generation = 1;
        }
        self.seq = 0;
        self.generation
    }

    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        self.rng.index_of(p)
    }

    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        self.rng.point_at(idx)
    }

    /// Follow parent links from `goal` back to the start.
    pub(crate) fn reconstruct(&self, goal: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let mut ci = goal;
        while ci != usize::MAX {
            path.push(self.point(ci));
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        path
    }
}
