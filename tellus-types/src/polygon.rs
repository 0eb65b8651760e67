use serde::{Deserialize, Serialize};

use crate::LinearRing;

/// Polygon geometry. It consists of one outer shell ring, and zero or more
/// hole rings subtracted from its area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Outer boundary of the polygon.
    pub shell: LinearRing,
    /// Interior boundaries in declaration order.
    pub holes: Vec<LinearRing>,
}

impl Polygon {
    /// Creates a polygon from a shell ring and hole rings.
    pub fn new(shell: LinearRing, holes: Vec<LinearRing>) -> Self {
        Self { shell, holes }
    }

    /// Iterates over all rings of the polygon starting with the shell.
    pub fn iter_rings(&self) -> impl Iterator<Item = &LinearRing> {
        std::iter::once(&self.shell).chain(self.holes.iter())
    }
}

impl From<LinearRing> for Polygon {
    fn from(value: LinearRing) -> Self {
        Self {
            shell: value,
            holes: vec![],
        }
    }
}
