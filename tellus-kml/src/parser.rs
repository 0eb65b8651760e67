//! Single-geometry parser consuming tokens from a [`Tokenizer`].

use std::io::BufRead;

use tellus_types::{Coord, Geometry, LineString, LinearRing, Polygon};

use crate::error::TellusKmlError;
use crate::tokenizer::{Token, Tokenizer};

const GEOMETRY_TAGS: [&str; 5] = [
    "Point",
    "LineString",
    "LinearRing",
    "Polygon",
    "MultiGeometry",
];

// Both the `tesselate` and the standard `tessellate` spellings are accepted
// on input.
const MODIFIER_TAGS: [&str; 4] = ["extrude", "tesselate", "tessellate", "altitudeMode"];

/// Materializes one geometry at a time from a token cursor.
///
/// The reader is generic over this trait so that other geometry text formats
/// can be streamed through the same windowing logic.
pub trait GeometryParser {
    /// Parses the next geometry from the cursor.
    ///
    /// Returns `Ok(None)` once the source is exhausted. On error the cursor
    /// is left in an unspecified position and must not be reused.
    fn parse_next<R: BufRead>(
        &self,
        tokens: &mut Tokenizer<R>,
    ) -> Result<Option<Geometry>, TellusKmlError>;
}

/// Parser for the KML geometry vocabulary.
///
/// Between geometries it tolerates enclosing document elements such as
/// `<kml>`, `<Document>` or `<Placemark>`, so a whole document can be
/// streamed for its geometries. Inside a geometry element the grammar is
/// strict.
#[derive(Debug, Clone, Copy, Default)]
pub struct KmlParser;

impl KmlParser {
    /// Creates a parser.
    pub fn new() -> Self {
        Self
    }

    fn parse_geometry<R: BufRead>(
        &self,
        name: &str,
        tokens: &mut Tokenizer<R>,
    ) -> Result<Geometry, TellusKmlError> {
        match name {
            "Point" => {
                let coords = self.parse_simple_body("Point", tokens)?;
                if coords.len() != 1 {
                    return Err(TellusKmlError::Malformed(format!(
                        "<Point> must contain exactly one coordinate tuple, found {}",
                        coords.len()
                    )));
                }
                Ok(Geometry::Point(coords[0]))
            }
            "LineString" => {
                let coords = self.parse_simple_body("LineString", tokens)?;
                Ok(Geometry::LineString(LineString::new(coords)))
            }
            "LinearRing" => {
                let coords = self.parse_simple_body("LinearRing", tokens)?;
                Ok(Geometry::LinearRing(LinearRing::new(coords)))
            }
            "Polygon" => self.parse_polygon(tokens).map(Geometry::Polygon),
            "MultiGeometry" => self.parse_collection(tokens).map(Geometry::GeometryCollection),
            other => Err(TellusKmlError::UnsupportedElement(other.to_string())),
        }
    }

    /// Parses the body of `<Point>`, `<LineString>` or `<LinearRing>` up to
    /// and including the closing tag.
    fn parse_simple_body<R: BufRead>(
        &self,
        element: &str,
        tokens: &mut Tokenizer<R>,
    ) -> Result<Vec<Coord>, TellusKmlError> {
        let mut coords: Option<Vec<Coord>> = None;
        loop {
            match tokens.next_token()? {
                Some(Token::OpenTag(name)) if name == "coordinates" => {
                    if coords.is_some() {
                        return Err(TellusKmlError::Malformed(format!(
                            "<{element}> with more than one <coordinates> block"
                        )));
                    }
                    coords = Some(self.parse_coordinates_body(tokens)?);
                }
                Some(Token::OpenTag(name)) if MODIFIER_TAGS.contains(&name.as_str()) => {
                    self.skip_element(&name, tokens)?;
                }
                Some(Token::OpenTag(name)) => {
                    return Err(TellusKmlError::Malformed(format!(
                        "unexpected <{name}> inside <{element}>"
                    )));
                }
                Some(Token::CloseTag(name)) if name == element => {
                    return coords.ok_or_else(|| {
                        TellusKmlError::Malformed(format!(
                            "<{element}> without a <coordinates> block"
                        ))
                    });
                }
                Some(Token::CloseTag(name)) => {
                    return Err(TellusKmlError::Malformed(format!(
                        "unexpected </{name}> inside <{element}>"
                    )));
                }
                Some(Token::Text(_)) => continue,
                None => {
                    return Err(TellusKmlError::Malformed(format!(
                        "unexpected end of input inside <{element}>"
                    )));
                }
            }
        }
    }

    /// Parses the content of `<coordinates>` up to and including its closing
    /// tag.
    fn parse_coordinates_body<R: BufRead>(
        &self,
        tokens: &mut Tokenizer<R>,
    ) -> Result<Vec<Coord>, TellusKmlError> {
        let mut coords = vec![];
        loop {
            match tokens.next_token()? {
                Some(Token::Text(text)) => coords.extend(parse_coordinate_text(&text)?),
                Some(Token::CloseTag(name)) if name == "coordinates" => return Ok(coords),
                Some(other) => {
                    return Err(TellusKmlError::Malformed(format!(
                        "unexpected {other:?} inside <coordinates>"
                    )));
                }
                None => {
                    return Err(TellusKmlError::Malformed(
                        "unexpected end of input inside <coordinates>".into(),
                    ));
                }
            }
        }
    }

    fn parse_polygon<R: BufRead>(
        &self,
        tokens: &mut Tokenizer<R>,
    ) -> Result<Polygon, TellusKmlError> {
        let mut shell: Option<LinearRing> = None;
        let mut holes = vec![];
        loop {
            match tokens.next_token()? {
                Some(Token::OpenTag(name)) if name == "outerBoundaryIs" => {
                    if shell.is_some() {
                        return Err(TellusKmlError::Malformed(
                            "<Polygon> with more than one <outerBoundaryIs>".into(),
                        ));
                    }
                    shell = Some(self.parse_boundary("outerBoundaryIs", tokens)?);
                }
                Some(Token::OpenTag(name)) if name == "innerBoundaryIs" => {
                    holes.push(self.parse_boundary("innerBoundaryIs", tokens)?);
                }
                Some(Token::OpenTag(name)) if MODIFIER_TAGS.contains(&name.as_str()) => {
                    self.skip_element(&name, tokens)?;
                }
                Some(Token::CloseTag(name)) if name == "Polygon" => {
                    let shell = shell.ok_or_else(|| {
                        TellusKmlError::Malformed(
                            "<Polygon> without an <outerBoundaryIs>".into(),
                        )
                    })?;
                    return Ok(Polygon::new(shell, holes));
                }
                Some(Token::Text(_)) => continue,
                Some(other) => {
                    return Err(TellusKmlError::Malformed(format!(
                        "unexpected {other:?} inside <Polygon>"
                    )));
                }
                None => {
                    return Err(TellusKmlError::Malformed(
                        "unexpected end of input inside <Polygon>".into(),
                    ));
                }
            }
        }
    }

    /// Parses `<LinearRing>…</LinearRing>` wrapped in a boundary element,
    /// consuming the wrapper's closing tag.
    fn parse_boundary<R: BufRead>(
        &self,
        wrapper: &str,
        tokens: &mut Tokenizer<R>,
    ) -> Result<LinearRing, TellusKmlError> {
        let ring = loop {
            match tokens.next_token()? {
                Some(Token::OpenTag(name)) if name == "LinearRing" => {
                    break LinearRing::new(self.parse_simple_body("LinearRing", tokens)?);
                }
                Some(Token::Text(_)) => continue,
                Some(other) => {
                    return Err(TellusKmlError::Malformed(format!(
                        "expected <LinearRing> inside <{wrapper}>, found {other:?}"
                    )));
                }
                None => {
                    return Err(TellusKmlError::Malformed(format!(
                        "unexpected end of input inside <{wrapper}>"
                    )));
                }
            }
        };
        loop {
            match tokens.next_token()? {
                Some(Token::CloseTag(name)) if name == wrapper => return Ok(ring),
                Some(Token::Text(_)) => continue,
                Some(other) => {
                    return Err(TellusKmlError::Malformed(format!(
                        "expected </{wrapper}>, found {other:?}"
                    )));
                }
                None => {
                    return Err(TellusKmlError::Malformed(format!(
                        "unexpected end of input inside <{wrapper}>"
                    )));
                }
            }
        }
    }

    fn parse_collection<R: BufRead>(
        &self,
        tokens: &mut Tokenizer<R>,
    ) -> Result<Vec<Geometry>, TellusKmlError> {
        let mut children = vec![];
        loop {
            match tokens.next_token()? {
                Some(Token::OpenTag(name)) => {
                    children.push(self.parse_geometry(&name, tokens)?);
                }
                Some(Token::CloseTag(name)) if name == "MultiGeometry" => return Ok(children),
                Some(Token::Text(_)) => continue,
                Some(other) => {
                    return Err(TellusKmlError::Malformed(format!(
                        "unexpected {other:?} inside <MultiGeometry>"
                    )));
                }
                None => {
                    return Err(TellusKmlError::Malformed(
                        "unexpected end of input inside <MultiGeometry>".into(),
                    ));
                }
            }
        }
    }

    /// Consumes a text-only element up to and including its closing tag.
    fn skip_element<R: BufRead>(
        &self,
        element: &str,
        tokens: &mut Tokenizer<R>,
    ) -> Result<(), TellusKmlError> {
        loop {
            match tokens.next_token()? {
                Some(Token::Text(_)) => continue,
                Some(Token::CloseTag(name)) if name == element => return Ok(()),
                Some(other) => {
                    return Err(TellusKmlError::Malformed(format!(
                        "unexpected {other:?} inside <{element}>"
                    )));
                }
                None => {
                    return Err(TellusKmlError::Malformed(format!(
                        "unexpected end of input inside <{element}>"
                    )));
                }
            }
        }
    }
}

impl GeometryParser for KmlParser {
    fn parse_next<R: BufRead>(
        &self,
        tokens: &mut Tokenizer<R>,
    ) -> Result<Option<Geometry>, TellusKmlError> {
        loop {
            match tokens.next_token()? {
                None => return Ok(None),
                Some(Token::OpenTag(name)) if GEOMETRY_TAGS.contains(&name.as_str()) => {
                    return self.parse_geometry(&name, tokens).map(Some);
                }
                Some(Token::OpenTag(name)) => {
                    log::debug!("skipping non-geometry element <{name}>");
                }
                Some(_) => {}
            }
        }
    }
}

/// Parses whitespace-separated `X,Y[,Z]` tuples.
fn parse_coordinate_text(text: &str) -> Result<Vec<Coord>, TellusKmlError> {
    let mut coords = vec![];
    for tuple in text.split_whitespace() {
        let ordinates = tuple
            .split(',')
            .map(parse_ordinate)
            .collect::<Result<Vec<f64>, _>>()?;
        match ordinates[..] {
            [x, y] => coords.push(Coord::new(x, y)),
            [x, y, z] => coords.push(Coord::with_z(x, y, z)),
            _ => {
                return Err(TellusKmlError::Malformed(format!(
                    "coordinate tuple must have 2 or 3 ordinates: {tuple:?}"
                )));
            }
        }
    }
    Ok(coords)
}

fn parse_ordinate(raw: &str) -> Result<f64, TellusKmlError> {
    raw.parse()
        .map_err(|_| TellusKmlError::Malformed(format!("invalid ordinate value: {raw:?}")))
}
