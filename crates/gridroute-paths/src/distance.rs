use gridroute_core::Point;

/// Cost of one orthogonal step.
pub const ORTHOGONAL_COST: f64 = 1.0;

/// Cost of one diagonal step (√2).
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Octile distance: exact cost between two points on an open 8-connected
/// grid with diagonal cost √2.
#[inline]
pub fn octile(a: Point, b: Point) -> f64 {
    let dx = (a.x - b.x).abs() as f64;
    let dy = (a.y - b.y).abs() as f64;
    ORTHOGONAL_COST * (dx + dy) + (DIAGONAL_COST - 2.0 * ORTHOGONAL_COST) * dx.min(dy)
}

/// Whether `a` and `b` are exactly one move apart.
#[inline]
pub fn is_step(a: Point, b: Point, allow_diagonal: bool) -> bool {
    if allow_diagonal {
        chebyshev(a, b) == 1
    } else {
        manhattan(a, b) == 1
    }
}

/// Cost of moving between two adjacent points.
#[inline]
pub fn step_cost(a: Point, b: Point) -> f64 {
    if a.x != b.x && a.y != b.y {
        DIAGONAL_COST
    } else {
        ORTHOGONAL_COST
    }
}

/// Total movement cost along a contiguous path.
pub fn path_cost(path: &[Point]) -> f64 {
    path.windows(2).map(|w| step_cost(w[0], w[1])).sum()
}
