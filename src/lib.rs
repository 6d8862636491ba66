//! Streaming reader for the PLY polygon file format.
//!
//! Headers are parsed into [`PlyHeader`]/[`ElementDescriptor`]/
//! [`PropertyDescriptor`] once; element payloads are then loaded (or
//! skipped) one at a time through [`Reader`], which keeps at most one
//! element's row buffer resident. Columns are read back out with
//! [`ElementDescriptor::extract_scalar_tuple`] and
//! [`ElementDescriptor::extract_list_as`], and face/vertex-index lists can be
//! fanned into triangles with [`triangulate::triangulate_polygon`] directly
//! or via [`ElementDescriptor::extract_triangles`].
//!
//! ```no_run
//! use ply_stream::Reader;
//!
//! let mut reader = Reader::open("mesh.ply");
//! if !reader.valid() {
//!     return;
//! }
//! while reader.has_element() {
//!     if reader.element().unwrap().name == b"vertex" {
//!         reader.load_element().unwrap();
//!     }
//!     reader.next_element().unwrap();
//! }
//! ```

pub mod byte_reader;
pub mod element_loader;
pub mod error;
pub mod extractor;
pub mod header;
pub mod lexer;
pub mod reader;
pub mod scalar;
pub mod triangulate;

pub use error::{PlyError, Result};
pub use extractor::FromPlyScalar;
pub use header::{ElementDescriptor, PlyFormat, PlyHeader, PropertyDescriptor};
pub use reader::Reader;
pub use scalar::ScalarType;
pub use triangulate::triangulate_polygon;
