//! Header-grammar tokenizing over a [`ByteReader`].
//!
//! The lexer only ever looks one byte ahead (via `peek`), so the growing
//! `ensure` window in `ByteReader` never has to special-case a token that
//! straddles a refill: each byte is consumed one at a time and the window
//! slides forward with it.

use std::io::{Read, Seek};

use crate::byte_reader::ByteReader;
use crate::error::PlyError;

const MAX_IDENTIFIER_LEN: usize = 255;
const MAX_INTEGER_DIGITS: usize = 10;

pub struct Lexer<'r, R> {
    pub reader: &'r mut ByteReader<R>,
}

impl<'r, R: Read + Seek> Lexer<'r, R> {
    pub fn new(reader: &'r mut ByteReader<R>) -> Self {
        Self { reader }
    }

    /// Skip in-line whitespace: space, tab, CR (but not newline).
    pub fn advance(&mut self) -> Result<(), PlyError> {
        loop {
            let c = self.reader.peek()?;
            if c == b' ' || c == b'\t' || c == b'\r' {
                self.reader.advance_bytes(1)?;
            } else {
                return Ok(());
            }
        }
    }

    /// Consume up to and past the next `\n`, then if the following line
    /// starts with `comment`, transparently skip it too (and repeat).
    pub fn next_line(&mut self) -> Result<(), PlyError> {
        loop {
            loop {
                let c = self.reader.peek()?;
                if c == 0 {
                    return Ok(());
                }
                self.reader.advance_bytes(1)?;
                if c == b'\n' {
                    break;
                }
            }
            if !self.keyword(b"comment")? {
                return Ok(());
            }
            // `keyword` only consumed the word itself; the rest of this
            // comment line is skipped by the inner loop on the next pass.
        }
    }

    /// Match a literal keyword, requiring the following byte not continue an
    /// identifier (no trailing alnum or `_`). Consumes the keyword (and
    /// leading whitespace before it) only on success; on failure the reader
    /// is left exactly where it was.
    pub fn keyword(&mut self, kw: &[u8]) -> Result<bool, PlyError> {
        self.advance()?;
        let start = self.reader.abs_pos();
        for &expected in kw {
            if self.reader.peek()? != expected {
                self.reader.seek_forward(start)?;
                return Ok(false);
            }
            self.reader.advance_bytes(1)?;
        }
        if is_ident_continue(self.reader.peek()?) {
            self.reader.seek_forward(start)?;
            return Ok(false);
        }
        Ok(true)
    }

    /// An identifier: starts with a letter or underscore, continues with
    /// alphanumerics or underscores; bounded to `max_len` bytes.
    pub fn identifier(&mut self, max_len: usize) -> Result<Vec<u8>, PlyError> {
        self.advance()?;
        let mut out = Vec::new();
        let first = self.reader.peek()?;
        if !is_ident_start(first) {
            return Err(PlyError::Header("expected identifier".into()));
        }
        loop {
            let c = self.reader.peek()?;
            if is_ident_continue(c) {
                if out.len() >= max_len {
                    return Err(PlyError::IdentifierTooLong { max: max_len });
                }
                out.push(c);
                self.reader.advance_bytes(1)?;
            } else {
                break;
            }
        }
        Ok(out)
    }

    pub fn identifier_default(&mut self) -> Result<Vec<u8>, PlyError> {
        self.identifier(MAX_IDENTIFIER_LEN)
    }

    /// A (possibly signed) integer literal, at most `MAX_INTEGER_DIGITS`
    /// decimal digits (a conservative bound well above any realistic list
    /// count or element count).
    pub fn int_literal(&mut self) -> Result<i64, PlyError> {
        self.advance()?;
        let mut digits = Vec::new();
        let negative = self.reader.peek()? == b'-';
        if negative || self.reader.peek()? == b'+' {
            self.reader.advance_bytes(1)?;
        }
        loop {
            let c = self.reader.peek()?;
            if c.is_ascii_digit() {
                if digits.len() >= MAX_INTEGER_DIGITS {
                    return Err(PlyError::IntegerLiteralTooWide {
                        max: MAX_INTEGER_DIGITS,
                    });
                }
                digits.push(c);
                self.reader.advance_bytes(1)?;
            } else {
                break;
            }
        }
        if digits.is_empty() {
            return Err(PlyError::Header("expected integer literal".into()));
        }
        if is_ident_continue(self.reader.peek()?) {
            return Err(PlyError::Header(
                "trailing characters after integer literal".into(),
            ));
        }
        let text = std::str::from_utf8(&digits).unwrap();
        let value: i64 = text
            .parse()
            .map_err(|_| PlyError::Header("integer literal out of range".into()))?;
        Ok(if negative { -value } else { value })
    }

    /// A floating-point literal: optional sign, integer digits, optional
    /// fractional part, optional signed exponent. At least one digit must
    /// appear around the decimal point.
    pub fn double_literal(&mut self) -> Result<f64, PlyError> {
        self.advance()?;
        let mut text = Vec::new();

        if matches!(self.reader.peek()?, b'-' | b'+') {
            text.push(self.reader.peek()?);
            self.reader.advance_bytes(1)?;
        }

        let mut int_digits = 0;
        while self.reader.peek()?.is_ascii_digit() {
            text.push(self.reader.peek()?);
            self.reader.advance_bytes(1)?;
            int_digits += 1;
        }

        let mut frac_digits = 0;
        if self.reader.peek()? == b'.' {
            text.push(b'.');
            self.reader.advance_bytes(1)?;
            while self.reader.peek()?.is_ascii_digit() {
                text.push(self.reader.peek()?);
                self.reader.advance_bytes(1)?;
                frac_digits += 1;
            }
        }

        if int_digits == 0 && frac_digits == 0 {
            return Err(PlyError::Header("expected floating-point literal".into()));
        }

        if matches!(self.reader.peek()?, b'e' | b'E') {
            text.push(self.reader.peek()?);
            self.reader.advance_bytes(1)?;
            if matches!(self.reader.peek()?, b'-' | b'+') {
                text.push(self.reader.peek()?);
                self.reader.advance_bytes(1)?;
            }
            let mut exp_digits = 0;
            while self.reader.peek()?.is_ascii_digit() {
                text.push(self.reader.peek()?);
                self.reader.advance_bytes(1)?;
                exp_digits += 1;
            }
            if exp_digits == 0 {
                return Err(PlyError::Header("malformed exponent".into()));
            }
        }

        if is_ident_continue(self.reader.peek()?) {
            return Err(PlyError::Header(
                "trailing characters after float literal".into(),
            ));
        }

        std::str::from_utf8(&text)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| PlyError::Header("malformed float literal".into()))
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn lex_over(data: &[u8]) -> ByteReader<Cursor<Vec<u8>>> {
        ByteReader::new(Cursor::new(data.to_vec()), 64)
    }

    #[test]
    fn keyword_requires_word_boundary() {
        let mut r = lex_over(b"format ascii");
        let mut lex = Lexer::new(&mut r);
        assert!(lex.keyword(b"format").unwrap());
        let mut r2 = lex_over(b"formatter");
        let mut lex2 = Lexer::new(&mut r2);
        assert!(!lex2.keyword(b"format").unwrap());
    }

    #[test]
    fn identifier_reads_alnum_and_underscore() {
        let mut r = lex_over(b"vertex_indices ");
        let mut lex = Lexer::new(&mut r);
        assert_eq!(lex.identifier_default().unwrap(), b"vertex_indices");
    }

    #[test]
    fn int_literal_handles_sign() {
        let mut r = lex_over(b"-42 ");
        let mut lex = Lexer::new(&mut r);
        assert_eq!(lex.int_literal().unwrap(), -42);
    }

    #[test]
    fn double_literal_handles_exponent() {
        let mut r = lex_over(b"1.5e-3 ");
        let mut lex = Lexer::new(&mut r);
        assert!((lex.double_literal().unwrap() - 1.5e-3).abs() < 1e-12);
    }

    #[test]
    fn next_line_skips_comment_lines() {
        let mut r = lex_over(b"rest\ncomment hello\nelement");
        let mut lex = Lexer::new(&mut r);
        lex.next_line().unwrap();
        assert!(lex.keyword(b"element").unwrap());
    }
}
