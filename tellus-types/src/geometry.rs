use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::TellusTypesError;
use crate::{Coord, LineString, LinearRing, Polygon};

/// A geometry value of any supported kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// A single position.
    Point(Coord),
    /// An open sequence of segments.
    LineString(LineString),
    /// A closed ring.
    LinearRing(LinearRing),
    /// A surface bounded by a shell and holes.
    Polygon(Polygon),
    /// An ordered, possibly heterogeneous set of child geometries.
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// Kind tag of this geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::LinearRing(_) => GeometryKind::LinearRing,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }
}

/// Fieldless mirror of the [`Geometry`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    /// See [`Geometry::Point`].
    Point,
    /// See [`Geometry::LineString`].
    LineString,
    /// See [`Geometry::LinearRing`].
    LinearRing,
    /// See [`Geometry::Polygon`].
    Polygon,
    /// See [`Geometry::GeometryCollection`].
    GeometryCollection,
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::LinearRing => "LinearRing",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        };
        write!(f, "{name}")
    }
}

impl From<Coord> for Geometry {
    fn from(value: Coord) -> Self {
        Self::Point(value)
    }
}

impl From<LineString> for Geometry {
    fn from(value: LineString) -> Self {
        Self::LineString(value)
    }
}

impl From<LinearRing> for Geometry {
    fn from(value: LinearRing) -> Self {
        Self::LinearRing(value)
    }
}

impl From<Polygon> for Geometry {
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}

impl From<Vec<Geometry>> for Geometry {
    fn from(value: Vec<Geometry>) -> Self {
        Self::GeometryCollection(value)
    }
}

fn conversion_error(expected: GeometryKind, got: GeometryKind) -> TellusTypesError {
    TellusTypesError::Conversion(format!("expected {expected}, got {got}"))
}

impl TryFrom<Geometry> for Coord {
    type Error = TellusTypesError;

    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        match value {
            Geometry::Point(v) => Ok(v),
            other => Err(conversion_error(GeometryKind::Point, other.kind())),
        }
    }
}

impl TryFrom<Geometry> for LineString {
    type Error = TellusTypesError;

    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        match value {
            Geometry::LineString(v) => Ok(v),
            other => Err(conversion_error(GeometryKind::LineString, other.kind())),
        }
    }
}

impl TryFrom<Geometry> for LinearRing {
    type Error = TellusTypesError;

    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        match value {
            Geometry::LinearRing(v) => Ok(v),
            other => Err(conversion_error(GeometryKind::LinearRing, other.kind())),
        }
    }
}

impl TryFrom<Geometry> for Polygon {
    type Error = TellusTypesError;

    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        match value {
            Geometry::Polygon(v) => Ok(v),
            other => Err(conversion_error(GeometryKind::Polygon, other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sample_polygon() -> Polygon {
        let shell = LinearRing::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(10.0, 0.0),
            Coord::new(10.0, 10.0),
            Coord::new(0.0, 0.0),
        ]);
        Polygon::new(shell, vec![])
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            Geometry::from(Coord::new(1.0, 2.0)).kind(),
            GeometryKind::Point
        );
        assert_eq!(
            Geometry::from(sample_polygon()).kind(),
            GeometryKind::Polygon
        );
        assert_eq!(
            Geometry::from(vec![Geometry::from(Coord::new(0.0, 0.0))]).kind(),
            GeometryKind::GeometryCollection
        );
    }

    #[test]
    fn try_from_rejects_wrong_variant() {
        let geometry = Geometry::from(sample_polygon());
        let result: Result<Coord, _> = geometry.try_into();
        assert_matches!(result, Err(TellusTypesError::Conversion(_)));
    }

    #[test]
    fn try_from_unwraps_matching_variant() {
        let polygon = sample_polygon();
        let geometry = Geometry::from(polygon.clone());
        let unwrapped: Polygon = geometry.try_into().expect("conversion must succeed");
        assert_eq!(unwrapped, polygon);
    }

    #[test]
    fn serde_round_trip() {
        let geometry = Geometry::GeometryCollection(vec![
            Geometry::Point(Coord::with_z(1.0, 2.0, 3.0)),
            Geometry::LineString(LineString::new(vec![
                Coord::new(0.0, 0.0),
                Coord::new(1.0, 1.0),
            ])),
            Geometry::Polygon(sample_polygon()),
        ]);

        let json = serde_json::to_string(&geometry).expect("serialization must succeed");
        let restored: Geometry =
            serde_json::from_str(&json).expect("deserialization must succeed");
        assert_eq!(restored, geometry);
    }
}
