//! Geometry model shared by the Tellus format codecs.
//!
//! The central type is the [`Geometry`] enum with one variant per supported
//! geometry kind. Codec crates match on it exhaustively, so adding a new kind
//! is a compile-time visible change for every codec.
//!
//! Coordinates are [`Coord`] values with `f64` ordinates and an optional Z.
//! The model stores shapes as given; it does not validate ring closure,
//! winding order or self-intersection.

pub mod error;

mod coord;
pub use coord::*;

mod line_string;
pub use line_string::*;

mod polygon;
pub use polygon::*;

mod geometry;
pub use geometry::*;
