//! KML geometry codec: a configurable writer and a streaming, windowed
//! reader for the KML geometry vocabulary (`<Point>`, `<LineString>`,
//! `<LinearRing>`, `<Polygon>`, `<MultiGeometry>`).
//!
//! The two sides are independent. [`KmlWriter`] renders a
//! [`Geometry`](tellus_types::Geometry) tree into indented markup with
//! configurable numeric precision, line wrapping and optional descriptive
//! sub-elements. [`KmlFileReader`] streams geometries out of a bulk text
//! source through a [`GeometryParser`], applying an offset/limit window
//! without materializing the rest of the source.
//!
//! ```
//! use tellus_kml::{KmlFileReader, KmlWriter};
//! use tellus_types::{Coord, Geometry};
//!
//! let writer = KmlWriter::default();
//! let text = writer.write(&Geometry::Point(Coord::new(37.42, -122.08)));
//!
//! let mut reader = KmlFileReader::from_reader(std::io::Cursor::new(text));
//! let geometries = reader.read_geometries()?;
//! assert_eq!(geometries.len(), 1);
//! # Ok::<(), tellus_kml::TellusKmlError>(())
//! ```

pub mod error;

mod parser;
pub use parser::{GeometryParser, KmlParser};

mod reader;
pub use reader::KmlFileReader;

mod tokenizer;
pub use tokenizer::{Token, Tokenizer};

mod writer;
pub use writer::{
    AltitudeMode, KmlWriter, KmlWriterOptions, DEFAULT_MAX_COORDINATES_PER_LINE,
};

pub use error::TellusKmlError;
