use serde::{Deserialize, Serialize};

use crate::Coord;

/// An open sequence of coordinates connected by straight segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    /// Vertices of the line in drawing order.
    pub coords: Vec<Coord>,
}

impl LineString {
    /// Creates a line string from the given vertices.
    pub fn new(coords: Vec<Coord>) -> Self {
        Self { coords }
    }
}

/// A closed coordinate sequence used as a polygon boundary.
///
/// The first and the last coordinates are expected to be equal, but this is
/// not enforced here. A ring can also be used as a standalone geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearRing {
    /// Vertices of the ring, first repeated as last.
    pub coords: Vec<Coord>,
}

impl LinearRing {
    /// Creates a ring from the given vertices.
    pub fn new(coords: Vec<Coord>) -> Self {
        Self { coords }
    }
}

impl From<LinearRing> for LineString {
    fn from(value: LinearRing) -> Self {
        Self {
            coords: value.coords,
        }
    }
}
