use gridroute_core::Point;

/// Grid width used when a request does not give one.
pub const DEFAULT_GRID_WIDTH: i32 = 100;
/// Grid height used when a request does not give one.
pub const DEFAULT_GRID_HEIGHT: i32 = 100;

/// A routing request: waypoints to visit in order over a static obstacle grid.
///
/// On the wire, `obstacles`, `gridWidth`, `gridHeight` and `allowDiagonal`
/// are optional and default to none, 100, 100 and `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RouteRequest {
    pub waypoints: Vec<Point>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub obstacles: Vec<Point>,
    #[cfg_attr(feature = "serde", serde(default = "default_grid_width"))]
    pub grid_width: i32,
    #[cfg_attr(feature = "serde", serde(default = "default_grid_height"))]
    pub grid_height: i32,
    #[cfg_attr(feature = "serde", serde(default = "default_allow_diagonal"))]
    pub allow_diagonal: bool,
}

#[cfg(feature = "serde")]
fn default_grid_width() -> i32 {
    DEFAULT_GRID_WIDTH
}

#[cfg(feature = "serde")]
fn default_grid_height() -> i32 {
    DEFAULT_GRID_HEIGHT
}

#[cfg(feature = "serde")]
fn default_allow_diagonal() -> bool {
    true
}

impl RouteRequest {
    /// A request over the default 100×100 grid with diagonals and no obstacles.
    pub fn new(waypoints: Vec<Point>) -> Self {
        Self {
            waypoints,
            obstacles: Vec::new(),
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            allow_diagonal: true,
        }
    }

    /// Builder-style setter for the obstacle list.
    pub fn with_obstacles(mut self, obstacles: Vec<Point>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Builder-style setter for grid dimensions.
    pub fn with_grid_size(mut self, width: i32, height: i32) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    /// Builder-style setter for the movement model.
    pub fn with_diagonal(mut self, allow: bool) -> Self {
        self.allow_diagonal = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let r = RouteRequest::new(vec![Point::new(0, 0), Point::new(1, 1)]);
        assert_eq!(r.grid_width, 100);
        assert_eq!(r.grid_height, 100);
        assert!(r.allow_diagonal);
        assert!(r.obstacles.is_empty());
    }

    #[test]
    fn builders_override() {
        let r = RouteRequest::new(vec![])
            .with_grid_size(8, 4)
            .with_diagonal(false)
            .with_obstacles(vec![Point::new(2, 2)]);
        assert_eq!((r.grid_width, r.grid_height), (8, 4));
        assert!(!r.allow_diagonal);
        assert_eq!(r.obstacles, vec![Point::new(2, 2)]);
    }
}
