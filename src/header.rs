//! PLY header grammar and the element/property descriptors it produces.
//!
//! ```text
//! file      := "ply" NL "format" fmt int "." int NL element* "end_header" NL
//! element   := "element" ident int NL property*
//! property  := "property" (scalar_type | "list" scalar_type scalar_type) ident NL
//! fmt       := "ascii" | "binary_little_endian" | "binary_big_endian"
//! ```

use std::io::{Read, Seek};

use crate::byte_reader::ByteReader;
use crate::error::PlyError;
use crate::lexer::Lexer;
use crate::scalar::ScalarType;

/// File format tag from the `format` header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl PlyFormat {
    fn parse(token: &[u8]) -> Result<Self, PlyError> {
        match token {
            b"ascii" => Ok(PlyFormat::Ascii),
            b"binary_little_endian" => Ok(PlyFormat::BinaryLittleEndian),
            b"binary_big_endian" => Ok(PlyFormat::BinaryBigEndian),
            other => Err(PlyError::Header(format!(
                "unknown format `{}`",
                String::from_utf8_lossy(other)
            ))),
        }
    }

    pub fn is_binary(self) -> bool {
        !matches!(self, PlyFormat::Ascii)
    }

    pub fn is_big_endian(self) -> bool {
        matches!(self, PlyFormat::BinaryBigEndian)
    }
}

/// One property of an element's row.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub name: Vec<u8>,
    pub value_type: ScalarType,
    /// `None` for a scalar property; `Some(count_type)` for a list property.
    pub count_type: Option<ScalarType>,
    /// Byte offset of this property inside the element's fixed row.
    /// Meaningless (left at 0) for list properties.
    pub offset: usize,

    /// Raw concatenated list payloads, present only once the owning element
    /// has been loaded and only for list properties.
    pub list_data: Vec<u8>,
    /// Byte index into `list_data` where row `i` begins.
    pub row_start: Vec<usize>,
    /// Item count of row `i`.
    pub row_count: Vec<u32>,
}

impl PropertyDescriptor {
    pub(crate) fn new_scalar(name: Vec<u8>, value_type: ScalarType) -> Self {
        Self {
            name,
            value_type,
            count_type: None,
            offset: 0,
            list_data: Vec::new(),
            row_start: Vec::new(),
            row_count: Vec::new(),
        }
    }

    pub(crate) fn new_list(name: Vec<u8>, count_type: ScalarType, value_type: ScalarType) -> Self {
        Self {
            name,
            value_type,
            count_type: Some(count_type),
            offset: 0,
            list_data: Vec::new(),
            row_start: Vec::new(),
            row_count: Vec::new(),
        }
    }

    pub fn is_list(&self) -> bool {
        self.count_type.is_some()
    }

    pub fn name_matches(&self, name: &[u8]) -> bool {
        self.name == name
    }

    pub(crate) fn clear_loaded_data(&mut self) {
        self.list_data.clear();
        self.row_start.clear();
        self.row_count.clear();
    }
}

/// A named collection of rows of uniform schema (e.g. `vertex`, `face`).
#[derive(Debug, Clone)]
pub struct ElementDescriptor {
    pub name: Vec<u8>,
    pub count: usize,
    pub properties: Vec<PropertyDescriptor>,
    /// True iff no list property is present.
    pub fixed_size: bool,
    /// Byte size of one row's scalar properties (list properties do not
    /// contribute).
    pub row_stride: usize,
}

impl ElementDescriptor {
    pub fn find_property(&self, name: &[u8]) -> Option<usize> {
        self.properties.iter().position(|p| p.name_matches(name))
    }

    /// Recompute `offset` for every scalar property, `row_stride` and
    /// `fixed_size` with a single left-to-right walk. List properties get no
    /// offset and flip `fixed_size` to false.
    pub(crate) fn recompute_layout(&mut self) {
        let mut offset = 0;
        let mut fixed_size = true;
        for prop in &mut self.properties {
            if prop.is_list() {
                prop.offset = 0;
                fixed_size = false;
            } else {
                prop.offset = offset;
                offset += prop.value_type.size();
            }
        }
        self.row_stride = offset;
        self.fixed_size = fixed_size;
    }

    pub(crate) fn clear_loaded_data(&mut self) {
        for prop in &mut self.properties {
            prop.clear_loaded_data();
        }
    }
}

/// Parsed header: format, version, and the ordered element descriptors.
#[derive(Debug, Clone)]
pub struct PlyHeader {
    pub format: PlyFormat,
    pub version_major: u32,
    pub version_minor: u32,
    pub elements: Vec<ElementDescriptor>,
}

impl PlyHeader {
    pub fn get_element(&self, name: &[u8]) -> Option<&ElementDescriptor> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn get_element_index(&self, name: &[u8]) -> Option<usize> {
        self.elements.iter().position(|e| e.name == name)
    }
}

/// Parse a PLY header starting at the current position of `reader`, which
/// must be at offset 0. On return, `reader` is positioned at the first byte
/// of element data.
pub fn parse_header<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<PlyHeader, PlyError> {
    let mut lex = Lexer::new(reader);

    if !lex.keyword(b"ply")? {
        return Err(PlyError::Header("file must start with `ply`".into()));
    }
    lex.next_line()?;

    if !lex.keyword(b"format")? {
        return Err(PlyError::Header("expected `format` line".into()));
    }
    lex.advance()?;
    let format_token = lex.identifier_default()?;
    let format = PlyFormat::parse(&format_token)?;
    lex.advance()?;
    let major = lex.int_literal()?;
    if lex.reader.peek()? != b'.' {
        return Err(PlyError::Header("expected `.` in format version".into()));
    }
    lex.reader.advance_bytes(1)?;
    let minor = lex.int_literal()?;
    if major < 0 || minor < 0 {
        return Err(PlyError::Header("negative format version".into()));
    }
    lex.next_line()?;

    let mut elements = Vec::new();

    loop {
        if lex.keyword(b"end_header")? {
            lex.next_line()?;
            break;
        }

        if !lex.keyword(b"element")? {
            return Err(PlyError::Header(
                "expected `element` or `end_header`".into(),
            ));
        }
        lex.advance()?;
        let name = lex.identifier_default()?;
        lex.advance()?;
        let count = lex.int_literal()?;
        if count < 0 {
            return Err(PlyError::NegativeCount);
        }
        lex.next_line()?;

        let mut properties = Vec::new();
        while lex.keyword(b"property")? {
            lex.advance()?;
            if lex.keyword(b"list")? {
                lex.advance()?;
                let count_type_token = lex.identifier_default()?;
                let count_type = ScalarType::parse(&count_type_token)?;
                if !count_type.is_integer() {
                    return Err(PlyError::Header(
                        "list count type must be an integer type".into(),
                    ));
                }
                lex.advance()?;
                let value_type_token = lex.identifier_default()?;
                let value_type = ScalarType::parse(&value_type_token)?;
                lex.advance()?;
                let prop_name = lex.identifier_default()?;
                properties.push(PropertyDescriptor::new_list(
                    prop_name, count_type, value_type,
                ));
            } else {
                let value_type_token = lex.identifier_default()?;
                let value_type = ScalarType::parse(&value_type_token)?;
                lex.advance()?;
                let prop_name = lex.identifier_default()?;
                properties.push(PropertyDescriptor::new_scalar(prop_name, value_type));
            }
            lex.next_line()?;
        }

        let mut element = ElementDescriptor {
            name,
            count: count as usize,
            properties,
            fixed_size: true,
            row_stride: 0,
        };
        element.recompute_layout();
        elements.push(element);
    }

    Ok(PlyHeader {
        format,
        version_major: major as u32,
        version_minor: minor as u32,
        elements,
    })
}
