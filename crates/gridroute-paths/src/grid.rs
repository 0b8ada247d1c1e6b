//! The routing grid: bounds plus a static obstacle set.
//!
//! [`GridModel`] stores obstacles as a bit-indexed array of `width * height`
//! bits, so blocked-cell checks are a shift and a mask. It is immutable once
//! built and is shared read-only by every segment search of a route.

use gridroute_core::{Point, Range};

use crate::distance::{manhattan, octile, step_cost};
use crate::error::RouteError;
use crate::traits::{AstarPather, Pather, WeightedPather};

/// Largest number of cells a grid may have. Per-cell search state for
/// bigger grids would not fit a reasonable memory budget.
pub const MAX_CELLS: usize = 1 << 26;

/// Orthogonal directions in expansion order: N, E, S, W.
const ORTHOGONAL: [Point; 4] = [
    Point::new(0, -1),
    Point::new(1, 0),
    Point::new(0, 1),
    Point::new(-1, 0),
];

/// Diagonal directions in expansion order: NE, SE, SW, NW.
const DIAGONAL: [Point; 4] = [
    Point::new(1, -1),
    Point::new(1, 1),
    Point::new(-1, 1),
    Point::new(-1, -1),
];

/// Immutable view of grid bounds and blocked cells.
#[derive(Debug, Clone)]
pub struct GridModel {
    rng: Range,
    blocked: Vec<u64>,
    obstacle_count: usize,
}

impl GridModel {
    /// Build a grid of `width × height` cells with the given obstacles.
    ///
    /// Duplicate obstacles collapse into a single blocked cell. Fails if
    /// either dimension is not positive, the grid is larger than
    /// [`MAX_CELLS`], or an obstacle lies outside the grid.
    pub fn new(width: i32, height: i32, obstacles: &[Point]) -> Result<Self, RouteError> {
        let rng = checked_range(width, height)?;
        let mut grid = Self {
            rng,
            blocked: vec![0; rng.len().div_ceil(64)],
            obstacle_count: 0,
        };
        for (index, &point) in obstacles.iter().enumerate() {
            let Some(idx) = rng.index_of(point) else {
                return Err(RouteError::ObstacleOutOfBounds { index, point });
            };
            let (word, bit) = (idx / 64, idx % 64);
            if grid.blocked[word] & (1u64 << bit) == 0 {
                grid.blocked[word] |= 1u64 << bit;
                grid.obstacle_count += 1;
            }
        }
        Ok(grid)
    }

    /// The grid rectangle, `[0, width) × [0, height)`.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.rng.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.rng.height()
    }

    /// Number of distinct blocked cells.
    #[inline]
    pub fn obstacle_count(&self) -> usize {
        self.obstacle_count
    }

    /// Whether `p` lies inside the grid.
    #[inline]
    pub fn is_valid(&self, p: Point) -> bool {
        self.rng.contains(p)
    }

    /// Whether `p` is an obstacle. Out-of-bounds points are never blocked.
    #[inline]
    pub fn is_blocked(&self, p: Point) -> bool {
        match self.rng.index_of(p) {
            Some(idx) => self.blocked[idx / 64] & (1u64 << (idx % 64)) != 0,
            None => false,
        }
    }

    /// Whether `p` is inside the grid and not blocked.
    #[inline]
    pub fn is_open(&self, p: Point) -> bool {
        self.is_valid(p) && !self.is_blocked(p)
    }

    /// Passable neighbors of `p`.
    ///
    /// Orthogonal neighbors come first (N, E, S, W), followed by diagonals
    /// (NE, SE, SW, NW) when `allow_diagonal` is set. A diagonal step is
    /// rejected when both orthogonal cells flanking it are blocked.
    pub fn neighbors(&self, p: Point, allow_diagonal: bool) -> Vec<Point> {
        let mut buf = Vec::with_capacity(8);
        self.neighbors_into(p, allow_diagonal, &mut buf);
        buf
    }

    /// Like [`GridModel::neighbors`] but appends into a caller-owned buffer.
    pub fn neighbors_into(&self, p: Point, allow_diagonal: bool, buf: &mut Vec<Point>) {
        for d in ORTHOGONAL {
            let n = p + d;
            if self.is_open(n) {
                buf.push(n);
            }
        }
        if !allow_diagonal {
            return;
        }
        for d in DIAGONAL {
            let n = p + d;
            if !self.is_open(n) {
                continue;
            }
            // no corner-cutting between two walls
            if self.is_blocked(p.shift(d.x, 0)) && self.is_blocked(p.shift(0, d.y)) {
                continue;
            }
            buf.push(n);
        }
    }

    /// Movement cost between adjacent cells: 1 orthogonally, √2 diagonally.
    #[inline]
    pub fn move_cost(&self, from: Point, to: Point) -> f64 {
        step_cost(from, to)
    }

    /// A* view of this grid under the given movement model.
    #[inline]
    pub fn pather(&self, allow_diagonal: bool) -> GridPather<'_> {
        GridPather {
            grid: self,
            allow_diagonal,
        }
    }
}

pub(crate) fn checked_range(width: i32, height: i32) -> Result<Range, RouteError> {
    if width <= 0 || height <= 0 {
        return Err(RouteError::InvalidDimensions { width, height });
    }
    match (width as usize).checked_mul(height as usize) {
        Some(cells) if cells <= MAX_CELLS => Ok(Range::new(0, 0, width, height)),
        _ => Err(RouteError::GridTooLarge { width, height }),
    }
}

/// A [`GridModel`] bound to a movement model.
///
/// Uses Manhattan distance as the heuristic for 4-way movement and octile
/// distance for 8-way movement; both are consistent with the step costs.
#[derive(Debug, Clone, Copy)]
pub struct GridPather<'a> {
    grid: &'a GridModel,
    allow_diagonal: bool,
}

impl GridPather<'_> {
    #[inline]
    pub fn allow_diagonal(&self) -> bool {
        self.allow_diagonal
    }
}

impl Pather for GridPather<'_> {
    #[inline]
    fn passable(&self, p: Point) -> bool {
        self.grid.is_open(p)
    }

    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        self.grid.neighbors_into(p, self.allow_diagonal, buf);
    }
}

impl WeightedPather for GridPather<'_> {
    #[inline]
    fn cost(&self, from: Point, to: Point) -> f64 {
        self.grid.move_cost(from, to)
    }
}

impl AstarPather for GridPather<'_> {
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> f64 {
        if self.allow_diagonal {
            octile(from, to)
        } else {
            manhattan(from, to) as f64
        }
    }
}
