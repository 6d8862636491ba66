//! Error categories for header parsing and element loading.
//!
//! The reader itself never returns these past construction and the explicit
//! `load_element`/`next_element` calls — once a [`crate::Reader`] is built,
//! any later parse failure is absorbed into the sticky `valid` flag (see
//! §7 of the design notes) rather than propagated, so callers that only
//! check `reader.valid()` never have to match on this enum at all.

use thiserror::Error;

/// Everything that can make a PLY file invalid or unreadable.
#[derive(Error, Debug)]
pub enum PlyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed header: {0}")]
    Header(String),

    #[error("unknown scalar type: {0}")]
    UnknownScalarType(String),

    #[error("identifier longer than {max} bytes")]
    IdentifierTooLong { max: usize },

    #[error("integer literal longer than {max} digits")]
    IntegerLiteralTooWide { max: usize },

    #[error("negative element or list count")]
    NegativeCount,

    #[error("property `{0}` not found on the loaded element")]
    MissingProperty(String),

    #[error("property `{0}` is scalar, not a list")]
    UnexpectedScalarProperty(String),

    #[error("no element is currently loaded")]
    ElementNotLoaded,

    #[error("unexpected end of file while reading {0}")]
    UnexpectedEof(&'static str),
}

pub type Result<T> = std::result::Result<T, PlyError>;
