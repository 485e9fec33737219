//! # layclip Core
//!
//! Integer geometry primitives, the polygon model (rings, polygon sets,
//! fill rules), sweep edges and scanbeams, and the containment tree used to
//! present boolean and offset results.
//!
//! Every topological decision is made with exact integer arithmetic; see
//! [`geometry::COORD_LIMIT`] for the accepted coordinate range.

pub mod edge;
pub mod error;
pub mod geometry;
pub mod polygon;
pub mod spatial;
pub mod tree;

pub use edge::{build_edges, Edge, EdgeId, PolyKind, Scanbeams};
pub use error::{ClipError, ClipResult, InputDefect};
pub use geometry::{BBox, Orientation, Point, PointLocation, Rational, COORD_LIMIT};
pub use polygon::{is_inside, FillRule, PolygonSet, Ring};
pub use tree::{PolyNode, PolyTree};
