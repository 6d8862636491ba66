//! Loads one element's payload into memory, or skips over it unread.
//!
//! Three strategies, chosen by format and by whether the element has any
//! list property:
//! - fixed-size binary: one big block read, then an endian-swap pass if needed;
//! - variable-size binary: per-row, per-property reads (lists grow their own buffers);
//! - ASCII: per-row literal parsing for both fixed and variable rows.

use std::io::{Read, Seek};

use crate::byte_reader::{swap_endian, ByteReader};
use crate::error::PlyError;
use crate::header::{ElementDescriptor, PlyFormat};
use crate::lexer::Lexer;
use crate::scalar::ScalarType;

/// Load `elem`'s payload, returning the fixed-row element-data buffer.
/// List properties are filled in on `elem.properties[i]` directly.
pub fn load_element<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    elem: &mut ElementDescriptor,
    format: PlyFormat,
) -> Result<Vec<u8>, PlyError> {
    match format {
        PlyFormat::Ascii => load_ascii(reader, elem),
        _ if elem.fixed_size => load_fixed_binary(reader, elem, format.is_big_endian()),
        _ => load_variable_binary(reader, elem, format.is_big_endian()),
    }
}

/// Skip over `elem`'s on-disk footprint without retaining any data.
pub fn skip_element<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    elem: &ElementDescriptor,
    format: PlyFormat,
) -> Result<(), PlyError> {
    match format {
        PlyFormat::Ascii => skip_ascii(reader, elem),
        _ if elem.fixed_size => skip_fixed_binary(reader, elem),
        _ => skip_variable_binary(reader, elem, format.is_big_endian()),
    }
}

fn load_fixed_binary<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    elem: &ElementDescriptor,
    big_endian: bool,
) -> Result<Vec<u8>, PlyError> {
    let total = elem.count * elem.row_stride;
    let mut data = vec![0u8; total];
    let mut filled = 0;
    while filled < total {
        let n = reader.read_some_into(&mut data[filled..])?;
        if n == 0 {
            return Err(PlyError::UnexpectedEof("fixed-size element body"));
        }
        filled += n;
    }

    if big_endian {
        for row in 0..elem.count {
            let row_off = row * elem.row_stride;
            for prop in &elem.properties {
                let size = prop.value_type.size();
                let start = row_off + prop.offset;
                swap_endian(&mut data[start..start + size]);
            }
        }
    }

    Ok(data)
}

fn skip_fixed_binary<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    elem: &ElementDescriptor,
) -> Result<(), PlyError> {
    let total = (elem.count * elem.row_stride) as u64;
    let target = reader.abs_pos() + total;
    reader.seek_forward(target)
}

fn load_variable_binary<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    elem: &mut ElementDescriptor,
    big_endian: bool,
) -> Result<Vec<u8>, PlyError> {
    let mut data = vec![0u8; elem.count * elem.row_stride];

    for row in 0..elem.count {
        let row_off = row * elem.row_stride;
        for prop in &mut elem.properties {
            if let Some(count_type) = prop.count_type {
                let count = read_list_count(reader, count_type, big_endian)?;
                let item_size = prop.value_type.size();
                let start = prop.list_data.len();
                prop.list_data.resize(start + count * item_size, 0);
                reader.read_exact_into(&mut prop.list_data[start..])?;
                if big_endian {
                    for i in 0..count {
                        let s = start + i * item_size;
                        swap_endian(&mut prop.list_data[s..s + item_size]);
                    }
                }
                prop.row_start.push(start);
                prop.row_count.push(count as u32);
            } else {
                let size = prop.value_type.size();
                let start = row_off + prop.offset;
                reader.read_exact_into(&mut data[start..start + size])?;
                if big_endian {
                    swap_endian(&mut data[start..start + size]);
                }
            }
        }
    }

    Ok(data)
}

fn skip_variable_binary<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    elem: &ElementDescriptor,
    big_endian: bool,
) -> Result<(), PlyError> {
    for _ in 0..elem.count {
        for prop in &elem.properties {
            if let Some(count_type) = prop.count_type {
                let count = read_list_count(reader, count_type, big_endian)?;
                reader.advance_bytes(count * prop.value_type.size())?;
            } else {
                reader.advance_bytes(prop.value_type.size())?;
            }
        }
    }
    Ok(())
}

fn load_ascii<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    elem: &mut ElementDescriptor,
) -> Result<Vec<u8>, PlyError> {
    let mut data = vec![0u8; elem.count * elem.row_stride];

    for row in 0..elem.count {
        let row_off = row * elem.row_stride;
        {
            let mut lex = Lexer::new(reader);
            for prop in &mut elem.properties {
                if let Some(count_type) = prop.count_type {
                    if !count_type.is_integer() {
                        return Err(PlyError::Header(
                            "list count type must be an integer type".into(),
                        ));
                    }
                    let count = lex.int_literal()?;
                    if count < 0 {
                        return Err(PlyError::NegativeCount);
                    }
                    let start = prop.list_data.len();
                    for _ in 0..count {
                        let bytes = parse_ascii_scalar(&mut lex, prop.value_type)?;
                        prop.list_data.extend_from_slice(&bytes);
                    }
                    prop.row_start.push(start);
                    prop.row_count.push(count as u32);
                } else {
                    let size = prop.value_type.size();
                    let bytes = parse_ascii_scalar(&mut lex, prop.value_type)?;
                    let start = row_off + prop.offset;
                    data[start..start + size].copy_from_slice(&bytes);
                }
            }
        }
        Lexer::new(reader).next_line()?;
    }

    Ok(data)
}

fn skip_ascii<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    elem: &ElementDescriptor,
) -> Result<(), PlyError> {
    let mut lex = Lexer::new(reader);
    for _ in 0..elem.count {
        lex.next_line()?;
    }
    Ok(())
}

fn read_list_count<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    count_type: ScalarType,
    big_endian: bool,
) -> Result<usize, PlyError> {
    let size = count_type.size();
    let mut buf = [0u8; 8];
    reader.read_exact_into(&mut buf[..size])?;
    if big_endian {
        swap_endian(&mut buf[..size]);
    }
    let value = decode_signed_integer(&buf[..size], count_type)?;
    if value < 0 {
        return Err(PlyError::NegativeCount);
    }
    Ok(value as usize)
}

fn decode_signed_integer(bytes: &[u8], ty: ScalarType) -> Result<i64, PlyError> {
    Ok(match ty {
        ScalarType::I8 => bytes[0] as i8 as i64,
        ScalarType::U8 => bytes[0] as i64,
        ScalarType::I16 => i16::from_le_bytes([bytes[0], bytes[1]]) as i64,
        ScalarType::U16 => u16::from_le_bytes([bytes[0], bytes[1]]) as i64,
        ScalarType::I32 => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64,
        ScalarType::U32 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64,
        ScalarType::F32 | ScalarType::F64 => {
            return Err(PlyError::Header("list count type must be an integer".into()))
        }
    })
}

fn parse_ascii_scalar<R: Read + Seek>(
    lex: &mut Lexer<R>,
    ty: ScalarType,
) -> Result<Vec<u8>, PlyError> {
    Ok(match ty {
        ScalarType::I8 => (lex.int_literal()? as i8).to_le_bytes().to_vec(),
        ScalarType::U8 => (lex.int_literal()? as u8).to_le_bytes().to_vec(),
        ScalarType::I16 => (lex.int_literal()? as i16).to_le_bytes().to_vec(),
        ScalarType::U16 => (lex.int_literal()? as u16).to_le_bytes().to_vec(),
        ScalarType::I32 => (lex.int_literal()? as i32).to_le_bytes().to_vec(),
        ScalarType::U32 => (lex.int_literal()? as u32).to_le_bytes().to_vec(),
        ScalarType::F32 => (lex.double_literal()? as f32).to_le_bytes().to_vec(),
        ScalarType::F64 => lex.double_literal()?.to_le_bytes().to_vec(),
    })
}
