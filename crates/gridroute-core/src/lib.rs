//! **gridroute-core**: geometry types shared by the gridroute crates.
//!
//! [`Point`] is a grid coordinate and [`Range`] a half-open rectangle of
//! cells. The routing engine lives in `gridroute-paths`.

pub mod geom;

pub use geom::{Point, Range, RangeIter};
