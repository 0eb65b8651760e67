//! Streaming reader materializing a window of geometries from a text source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use tellus_types::Geometry;

use crate::error::TellusKmlError;
use crate::parser::{GeometryParser, KmlParser};
use crate::tokenizer::Tokenizer;

enum Source {
    /// Opened lazily, only when a read is performed.
    Path(PathBuf),
    Reader(Box<dyn BufRead>),
    /// Left behind after the first read; a reader is single-use per source.
    Exhausted,
}

/// Reads a sequence of geometries from a bulk text source, front to back.
///
/// Geometries are materialized one at a time by the injected
/// [`GeometryParser`], so a source is never loaded as geometry objects up
/// front. An `offset`/`limit` window selects which of them are collected.
///
/// A reader constructed from a path opens the file only when
/// [`read_geometries`](Self::read_geometries) is called and closes it before
/// returning, on success and on failure alike. Each reader instance reads its
/// source once; further calls return an empty sequence.
pub struct KmlFileReader<P = KmlParser> {
    source: Source,
    parser: P,
    offset: usize,
    limit: Option<usize>,
}

impl KmlFileReader<KmlParser> {
    /// Creates a reader over the file at `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::from_path_with_parser(path, KmlParser::new())
    }

    /// Creates a reader over an already open source.
    ///
    /// The source is consumed by the read; buffering and lifetime of any
    /// underlying resource remain the caller's concern.
    pub fn from_reader(reader: impl BufRead + 'static) -> Self {
        Self::from_reader_with_parser(reader, KmlParser::new())
    }
}

impl<P: GeometryParser> KmlFileReader<P> {
    /// Same as [`KmlFileReader::from_path`] with an injected parser.
    pub fn from_path_with_parser(path: impl Into<PathBuf>, parser: P) -> Self {
        Self {
            source: Source::Path(path.into()),
            parser,
            offset: 0,
            limit: None,
        }
    }

    /// Same as [`KmlFileReader::from_reader`] with an injected parser.
    pub fn from_reader_with_parser(reader: impl BufRead + 'static, parser: P) -> Self {
        Self {
            source: Source::Reader(Box::new(reader)),
            parser,
            offset: 0,
            limit: None,
        }
    }

    /// Number of geometries to skip before collecting.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Maximum number of geometries to collect; `None` is unbounded.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Reads geometries from the source, applying the offset/limit window.
    ///
    /// Stops silently on end of input or once the limit is satisfied,
    /// whichever comes first. A parse error fails the whole call; geometries
    /// collected before it are discarded.
    pub fn read_geometries(&mut self) -> Result<Vec<Geometry>, TellusKmlError> {
        let source = std::mem::replace(&mut self.source, Source::Exhausted);
        let mut tokens = match source {
            Source::Path(path) => {
                let file = File::open(&path).map_err(|source| {
                    TellusKmlError::SourceUnavailable {
                        path: path.clone(),
                        source,
                    }
                })?;
                Tokenizer::new(Box::new(BufReader::new(file)) as Box<dyn BufRead>)
            }
            Source::Reader(reader) => Tokenizer::new(reader),
            Source::Exhausted => return Ok(vec![]),
        };

        let mut collected = vec![];
        let mut count = 0;
        loop {
            if self.limit.is_some_and(|limit| collected.len() >= limit) {
                break;
            }
            match self.parser.parse_next(&mut tokens)? {
                None => break,
                Some(geometry) => {
                    if count >= self.offset {
                        collected.push(geometry);
                    }
                    // Skipped geometries still count towards the offset.
                    count += 1;
                }
            }
        }

        log::debug!(
            "read {} of {} geometries from source",
            collected.len(),
            count
        );
        Ok(collected)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use tellus_types::{Coord, GeometryKind, LineString, LinearRing, Polygon};

    use crate::writer::{KmlWriter, KmlWriterOptions};

    use super::*;

    /// Five points with x = 0..5, so windowing results are recognizable.
    fn five_points() -> String {
        (0..5)
            .map(|i| format!("<Point><coordinates>{i},0</coordinates></Point>\n"))
            .collect()
    }

    fn reader_over(input: String) -> KmlFileReader {
        KmlFileReader::from_reader(Cursor::new(input.into_bytes()))
    }

    fn xs(geometries: &[Geometry]) -> Vec<f64> {
        geometries
            .iter()
            .map(|g| match g {
                Geometry::Point(c) => c.x,
                other => panic!("expected a point, got {:?}", other.kind()),
            })
            .collect()
    }

    #[test]
    fn reads_all_without_window() {
        let mut reader = reader_over(five_points());
        let geometries = reader.read_geometries().expect("read must succeed");
        assert_eq!(xs(&geometries), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn offset_and_limit_select_a_window() {
        let mut reader = reader_over(five_points()).with_offset(1).with_limit(Some(2));
        let geometries = reader.read_geometries().expect("read must succeed");
        assert_eq!(xs(&geometries), vec![1.0, 2.0]);
    }

    #[test]
    fn unbounded_limit_reads_to_the_end() {
        let mut reader = reader_over(five_points()).with_offset(3).with_limit(None);
        let geometries = reader.read_geometries().expect("read must succeed");
        assert_eq!(xs(&geometries), vec![3.0, 4.0]);
    }

    #[test]
    fn limit_zero_collects_nothing() {
        let mut reader = reader_over(five_points()).with_limit(Some(0));
        let geometries = reader.read_geometries().expect("read must succeed");
        assert!(geometries.is_empty());
    }

    #[test]
    fn offset_past_the_end_collects_nothing() {
        let mut reader = reader_over(five_points()).with_offset(100);
        let geometries = reader.read_geometries().expect("read must succeed");
        assert!(geometries.is_empty());
    }

    #[test]
    fn empty_source_reads_empty_regardless_of_window() {
        let mut reader = reader_over(String::new()).with_offset(2).with_limit(Some(3));
        let geometries = reader.read_geometries().expect("read must succeed");
        assert!(geometries.is_empty());
    }

    #[test]
    fn parse_error_discards_partial_results() {
        let input = "<Point><coordinates>1,1</coordinates></Point>\
                     <Point><coordinates>oops</coordinates></Point>";
        let mut reader = reader_over(input.to_string());
        assert_matches!(reader.read_geometries(), Err(TellusKmlError::Malformed(_)));
    }

    #[test]
    fn second_read_on_the_same_source_is_empty() {
        let mut reader = reader_over(five_points());
        assert_eq!(reader.read_geometries().expect("read must succeed").len(), 5);
        assert!(reader.read_geometries().expect("read must succeed").is_empty());
    }

    #[test]
    fn reads_from_file_path() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/test-data/geometries.kml");
        let mut reader = KmlFileReader::from_path(path);
        let geometries = reader.read_geometries().expect("read must succeed");
        assert_eq!(
            geometries.iter().map(Geometry::kind).collect::<Vec<_>>(),
            vec![
                GeometryKind::Point,
                GeometryKind::LineString,
                GeometryKind::Polygon,
                GeometryKind::LinearRing,
                GeometryKind::GeometryCollection,
            ]
        );
    }

    #[test]
    fn file_window_matches_reader_window() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/test-data/geometries.kml");
        let mut reader = KmlFileReader::from_path(path).with_offset(1).with_limit(Some(2));
        let geometries = reader.read_geometries().expect("read must succeed");
        assert_eq!(
            geometries.iter().map(Geometry::kind).collect::<Vec<_>>(),
            vec![GeometryKind::LineString, GeometryKind::Polygon]
        );
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let mut reader = KmlFileReader::from_path("/definitely/not/here.kml");
        assert_matches!(
            reader.read_geometries(),
            Err(TellusKmlError::SourceUnavailable { .. })
        );
    }

    #[test]
    fn written_geometries_read_back_with_same_shape() {
        let original = vec![
            Geometry::Point(Coord::with_z(10.25, -3.5, 120.0)),
            Geometry::LineString(LineString::new(vec![
                Coord::new(0.0, 0.0),
                Coord::new(1.5, 2.5),
                Coord::new(3.0, 4.0),
            ])),
            Geometry::Polygon(Polygon::new(
                LinearRing::new(vec![
                    Coord::new(0.0, 0.0),
                    Coord::new(10.0, 0.0),
                    Coord::new(10.0, 10.0),
                    Coord::new(0.0, 0.0),
                ]),
                vec![],
            )),
            Geometry::GeometryCollection(vec![Geometry::Point(Coord::new(7.125, 8.25))]),
        ];

        let writer = KmlWriter::new(KmlWriterOptions {
            max_coordinates_per_line: 2,
            ..Default::default()
        });
        let text: String = original.iter().map(|g| writer.write(g)).collect();

        let mut reader = reader_over(text);
        let restored = reader.read_geometries().expect("read must succeed");
        assert_eq!(restored.len(), original.len());
        for (restored, original) in restored.iter().zip(&original) {
            assert_eq!(restored.kind(), original.kind());
        }

        let Geometry::Point(point) = &restored[0] else {
            panic!("invalid geometry type");
        };
        assert_relative_eq!(point.x, 10.25);
        assert_relative_eq!(point.y, -3.5);
        assert_relative_eq!(point.z.expect("z must survive the round trip"), 120.0);

        let Geometry::LineString(line) = &restored[1] else {
            panic!("invalid geometry type");
        };
        assert_eq!(line.coords.len(), 3);
        assert_relative_eq!(line.coords[1].x, 1.5);
    }
}
