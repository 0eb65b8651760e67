//! KML writer rendering a geometry tree into indented markup text.

use std::fmt::{Display, Formatter};

use tellus_types::{Coord, Geometry, LinearRing, Polygon};

/// Number of coordinate tuples per output line unless configured otherwise.
pub const DEFAULT_MAX_COORDINATES_PER_LINE: usize = 5;

/// Altitude interpretation, emitted as `<altitudeMode>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltitudeMode {
    /// Altitude relative to mean sea level.
    Absolute,
    /// Altitude ignored, geometry draped onto the terrain.
    ClampToGround,
    /// Altitude relative to the terrain below the geometry.
    RelativeToGround,
}

impl AltitudeMode {
    /// The canonical KML spelling of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            AltitudeMode::Absolute => "absolute",
            AltitudeMode::ClampToGround => "clampToGround",
            AltitudeMode::RelativeToGround => "relativeToGround",
        }
    }
}

impl Display for AltitudeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration of a [`KmlWriter`].
///
/// The options are read-only during a single write call, so one writer can be
/// reused for any number of sequential writes.
#[derive(Debug, Clone)]
pub struct KmlWriterOptions {
    /// Maximum decimal digits per ordinate. `None` renders the shortest
    /// representation that round-trips.
    pub precision: Option<usize>,
    /// Coordinate tuples beyond this count on one line wrap to the next one.
    /// Values below 1 are treated as 1.
    pub max_coordinates_per_line: usize,
    /// Prefix prepended to every emitted line, for embedding the output in a
    /// larger indented document.
    pub line_prefix: Option<String>,
    /// Emits `<extrude>1</extrude>` on every geometry node.
    pub extrude: bool,
    /// Emits `<tesselate>1</tesselate>` on every geometry node.
    pub tesselate: bool,
    /// Emits `<altitudeMode>` with the given value on every geometry node.
    pub altitude_mode: Option<AltitudeMode>,
    /// When set, replaces the Z ordinate of every coordinate in the output.
    pub z_override: Option<f64>,
}

impl Default for KmlWriterOptions {
    fn default() -> Self {
        Self {
            precision: None,
            max_coordinates_per_line: DEFAULT_MAX_COORDINATES_PER_LINE,
            line_prefix: None,
            extrude: false,
            tesselate: false,
            altitude_mode: None,
            z_override: None,
        }
    }
}

/// Renders geometries as KML markup.
///
/// The writer walks the geometry tree depth-first and emits one element per
/// geometry node, indented two spaces per nesting level. Since [`Geometry`]
/// is a closed enum, every kind is supported and writing cannot fail.
#[derive(Debug, Clone, Default)]
pub struct KmlWriter {
    options: KmlWriterOptions,
}

impl KmlWriter {
    /// Creates a writer with the given options.
    pub fn new(options: KmlWriterOptions) -> Self {
        Self { options }
    }

    /// Options this writer was created with.
    pub fn options(&self) -> &KmlWriterOptions {
        &self.options
    }

    /// Renders one geometry, including the trailing line break.
    pub fn write(&self, geometry: &Geometry) -> String {
        let mut out = String::new();
        self.write_geometry(geometry, 0, &mut out);
        out
    }

    fn write_geometry(&self, geometry: &Geometry, level: usize, out: &mut String) {
        match geometry {
            Geometry::Point(coord) => self.write_point(coord, level, out),
            Geometry::LineString(line) => {
                self.write_tagged_coords("LineString", &line.coords, level, out)
            }
            Geometry::LinearRing(ring) => {
                self.write_tagged_coords("LinearRing", &ring.coords, level, out)
            }
            Geometry::Polygon(polygon) => self.write_polygon(polygon, level, out),
            Geometry::GeometryCollection(children) => {
                self.write_collection(children, level, out)
            }
        }
    }

    fn write_point(&self, coord: &Coord, level: usize, out: &mut String) {
        self.line(level, "<Point>", out);
        self.write_modifiers(level + 1, out);
        self.write_coordinates(std::slice::from_ref(coord), level + 1, out);
        self.line(level, "</Point>", out);
    }

    /// Writes a top-level `<LineString>` or `<LinearRing>` element.
    fn write_tagged_coords(&self, tag: &str, coords: &[Coord], level: usize, out: &mut String) {
        self.line(level, &format!("<{tag}>"), out);
        self.write_modifiers(level + 1, out);
        self.write_coordinates(coords, level + 1, out);
        self.line(level, &format!("</{tag}>"), out);
    }

    fn write_polygon(&self, polygon: &Polygon, level: usize, out: &mut String) {
        self.line(level, "<Polygon>", out);
        self.write_modifiers(level + 1, out);
        self.write_boundary("outerBoundaryIs", &polygon.shell, level + 1, out);
        for hole in &polygon.holes {
            self.write_boundary("innerBoundaryIs", hole, level + 1, out);
        }
        self.line(level, "</Polygon>", out);
    }

    /// Writes a boundary wrapper with its ring. Modifiers are suppressed on
    /// the ring; the enclosing polygon emits them once.
    fn write_boundary(&self, wrapper: &str, ring: &LinearRing, level: usize, out: &mut String) {
        self.line(level, &format!("<{wrapper}>"), out);
        self.line(level + 1, "<LinearRing>", out);
        self.write_coordinates(&ring.coords, level + 2, out);
        self.line(level + 1, "</LinearRing>", out);
        self.line(level, &format!("</{wrapper}>"), out);
    }

    fn write_collection(&self, children: &[Geometry], level: usize, out: &mut String) {
        self.line(level, "<MultiGeometry>", out);
        for child in children {
            self.write_geometry(child, level + 1, out);
        }
        self.line(level, "</MultiGeometry>", out);
    }

    /// Writes the optional sub-elements in their fixed order: extrude,
    /// tesselate, altitude mode.
    fn write_modifiers(&self, level: usize, out: &mut String) {
        if self.options.extrude {
            self.line(level, "<extrude>1</extrude>", out);
        }
        if self.options.tesselate {
            self.line(level, "<tesselate>1</tesselate>", out);
        }
        if let Some(mode) = self.options.altitude_mode {
            self.line(level, &format!("<altitudeMode>{mode}</altitudeMode>"), out);
        }
    }

    fn write_coordinates(&self, coords: &[Coord], level: usize, out: &mut String) {
        let per_line = self.options.max_coordinates_per_line.max(1);

        self.start_line(level, out);
        out.push_str("<coordinates>");
        for (index, coord) in coords.iter().enumerate() {
            if index > 0 {
                if index % per_line == 0 {
                    out.push('\n');
                    self.start_line(level, out);
                } else {
                    out.push(' ');
                }
            }
            self.write_coordinate(coord, out);
        }
        out.push_str("</coordinates>\n");
    }

    fn write_coordinate(&self, coord: &Coord, out: &mut String) {
        out.push_str(&self.format_ordinate(coord.x));
        out.push(',');
        out.push_str(&self.format_ordinate(coord.y));
        // The process-wide override beats the coordinate's own Z. Without
        // either the output stays two-dimensional.
        if let Some(z) = self.options.z_override.or(coord.z) {
            out.push(',');
            out.push_str(&self.format_ordinate(z));
        }
    }

    fn format_ordinate(&self, value: f64) -> String {
        match self.options.precision {
            Some(digits) => {
                let mut formatted = format!("{value:.digits$}");
                if formatted.contains('.') {
                    while formatted.ends_with('0') {
                        formatted.pop();
                    }
                    if formatted.ends_with('.') {
                        formatted.pop();
                    }
                }
                formatted
            }
            None => format!("{value}"),
        }
    }

    fn line(&self, level: usize, content: &str, out: &mut String) {
        self.start_line(level, out);
        out.push_str(content);
        out.push('\n');
    }

    fn start_line(&self, level: usize, out: &mut String) {
        if let Some(prefix) = &self.options.line_prefix {
            out.push_str(prefix);
        }
        for _ in 0..level {
            out.push_str("  ");
        }
    }
}
