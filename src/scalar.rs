//! The eight PLY scalar types and the short/explicit-width spellings the
//! header grammar accepts for each.

use crate::error::PlyError;

/// One of the eight primitive types a PLY property can hold.
///
/// The header grammar's count-type field additionally allows no type at all
/// (a scalar property has none) — that sentinel is represented as
/// `Option<ScalarType>::None` at the property-descriptor level rather than as
/// a ninth variant here, so every match on `ScalarType` stays exhaustive over
/// real wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ScalarType {
    /// Parse a header type token, accepting both the classical PLY names
    /// (`char`, `uchar`, ...) and the explicit-width aliases (`int8`, ...).
    pub fn parse(token: &[u8]) -> Result<Self, PlyError> {
        Ok(match token {
            b"char" | b"int8" => ScalarType::I8,
            b"uchar" | b"uint8" => ScalarType::U8,
            b"short" | b"int16" => ScalarType::I16,
            b"ushort" | b"uint16" => ScalarType::U16,
            b"int" | b"int32" => ScalarType::I32,
            b"uint" | b"uint32" => ScalarType::U32,
            b"float" => ScalarType::F32,
            b"double" => ScalarType::F64,
            other => {
                return Err(PlyError::UnknownScalarType(
                    String::from_utf8_lossy(other).into_owned(),
                ))
            }
        })
    }

    /// On-disk and in-memory byte size of the type.
    pub const fn size(self) -> usize {
        match self {
            ScalarType::I8 | ScalarType::U8 => 1,
            ScalarType::I16 | ScalarType::U16 => 2,
            ScalarType::I32 | ScalarType::U32 | ScalarType::F32 => 4,
            ScalarType::F64 => 8,
        }
    }

    /// Whether this type can hold a list count (an integer type).
    pub const fn is_integer(self) -> bool {
        !matches!(self, ScalarType::F32 | ScalarType::F64)
    }
}
