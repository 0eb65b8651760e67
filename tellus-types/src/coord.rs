use serde::{Deserialize, Serialize};

/// A position given as X, Y and an optional Z ordinate.
///
/// Z is `None` for 2d data. Writers may still emit a Z value for such
/// coordinates when configured with an override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    /// X ordinate (easting or longitude).
    pub x: f64,
    /// Y ordinate (northing or latitude).
    pub y: f64,
    /// Altitude, if present in the source data.
    pub z: Option<f64>,
}

impl Coord {
    /// Creates a 2d coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Creates a 3d coordinate.
    pub const fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }
}

impl From<(f64, f64)> for Coord {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<(f64, f64, f64)> for Coord {
    fn from(value: (f64, f64, f64)) -> Self {
        Self::with_z(value.0, value.1, value.2)
    }
}
