//! Buffered, windowed byte access over a seekable file.
//!
//! `ByteReader` owns a fixed-capacity scratch buffer and refills it on
//! demand. It never exposes more than one filled window at a time: anything
//! before `pos` has already been consumed by the caller and anything at or
//! after `end` has not been read from the file yet. `seek_forward` is the one
//! operation that breaks the "sequential" illusion, and it only exists to let
//! the element loader skip over an unloaded element's on-disk footprint
//! without copying it through the window.

use std::io::{Read, Seek, SeekFrom};

use crate::error::PlyError;

/// Default scratch window size, matching real-world PLY chunk sizes well
/// above typical disk block sizes without holding an entire file in memory.
pub const DEFAULT_WINDOW_CAPACITY: usize = 128 * 1024;

pub struct ByteReader<R> {
    reader: R,
    buf: Vec<u8>,
    pos: usize,
    end: usize,
    /// Absolute file offset that `buf[0]` corresponds to.
    window_offset: u64,
    at_eof: bool,
}

impl<R: Read + Seek> ByteReader<R> {
    pub fn new(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buf: vec![0u8; capacity.max(1)],
            pos: 0,
            end: 0,
            window_offset: 0,
            at_eof: false,
        }
    }

    /// Absolute offset of the next unread byte.
    pub fn abs_pos(&self) -> u64 {
        self.window_offset + self.pos as u64
    }

    /// Guarantee that `n` bytes are available starting at `pos`, refilling
    /// from the file as needed. Returns `false` if the file ends before `n`
    /// bytes could be made available; the window is left holding whatever it
    /// could read.
    pub fn ensure(&mut self, n: usize) -> Result<bool, PlyError> {
        if n > self.buf.len() {
            self.buf.resize(n, 0);
        }
        while self.end - self.pos < n && !self.at_eof {
            self.refill()?;
        }
        Ok(self.end - self.pos >= n)
    }

    /// Current byte, or `\0` if the window cannot be extended to cover it
    /// (end of file).
    pub fn peek(&mut self) -> Result<u8, PlyError> {
        if self.ensure(1)? {
            Ok(self.buf[self.pos])
        } else {
            Ok(0)
        }
    }

    /// Move `pos` forward by `n`, refilling as needed. Fails if the file
    /// ends before `n` bytes are available.
    pub fn advance_bytes(&mut self, n: usize) -> Result<(), PlyError> {
        if !self.ensure(n)? {
            return Err(PlyError::UnexpectedEof("advance_bytes"));
        }
        self.pos += n;
        Ok(())
    }

    /// Read exactly `dst.len()` bytes into `dst`, advancing `pos`.
    pub fn read_exact_into(&mut self, dst: &mut [u8]) -> Result<(), PlyError> {
        let n = dst.len();
        if !self.ensure(n)? {
            return Err(PlyError::UnexpectedEof("read_exact_into"));
        }
        dst.copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(())
    }

    /// Read as many bytes as are currently buffered (up to `dst.len()`) into
    /// `dst`, refilling once if the window runs dry. Returns the number of
    /// bytes written, 0 only at true end of file. Used by the fixed-size
    /// binary loader, which drives this in a loop until its buffer is full.
    pub fn read_some_into(&mut self, dst: &mut [u8]) -> Result<usize, PlyError> {
        if self.pos == self.end && !self.at_eof {
            self.refill()?;
        }
        let available = self.end - self.pos;
        let n = available.min(dst.len());
        dst[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    /// Seek to an absolute file offset, used only to skip the body of an
    /// unloaded fixed-size element. Reuses the current window if the target
    /// already falls inside it.
    pub fn seek_forward(&mut self, absolute_offset: u64) -> Result<(), PlyError> {
        let window_end = self.window_offset + self.end as u64;
        if absolute_offset >= self.window_offset && absolute_offset <= window_end {
            self.pos = (absolute_offset - self.window_offset) as usize;
            return Ok(());
        }
        self.reader.seek(SeekFrom::Start(absolute_offset))?;
        self.window_offset = absolute_offset;
        self.pos = 0;
        self.end = 0;
        self.at_eof = false;
        Ok(())
    }

    fn refill(&mut self) -> Result<(), PlyError> {
        let remaining = self.end - self.pos;
        self.buf.copy_within(self.pos..self.end, 0);
        self.window_offset += self.pos as u64;
        self.pos = 0;
        self.end = remaining;

        if self.at_eof {
            return Ok(());
        }

        let cap = self.buf.len();
        while self.end < cap {
            let n = self.reader.read(&mut self.buf[self.end..cap])?;
            if n == 0 {
                self.at_eof = true;
                break;
            }
            self.end += n;
        }
        Ok(())
    }
}

/// Reverse the bytes of a fixed-size field in place, converting between
/// little- and big-endian on-disk representations.
///
/// The straightforward `tmp := data; reverse(tmp); data := tmp` — this is
/// the only correct reading of the swap regardless of field width.
pub fn swap_endian(bytes: &mut [u8]) {
    bytes.reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader_over(data: &[u8], capacity: usize) -> ByteReader<Cursor<Vec<u8>>> {
        ByteReader::new(Cursor::new(data.to_vec()), capacity)
    }

    #[test]
    fn ensure_refills_across_small_windows() {
        let mut r = reader_over(b"0123456789", 4);
        assert!(r.ensure(4).unwrap());
        let mut buf = [0u8; 4];
        r.read_exact_into(&mut buf).unwrap();
        assert_eq!(&buf, b"0123");
        r.read_exact_into(&mut buf).unwrap();
        assert_eq!(&buf, b"4567");
    }

    #[test]
    fn ensure_fails_past_eof() {
        let mut r = reader_over(b"ab", 4);
        assert!(!r.ensure(3).unwrap());
    }

    #[test]
    fn seek_forward_reuses_window_when_inside_it() {
        let mut r = reader_over(b"0123456789", 128);
        r.ensure(10).unwrap();
        r.seek_forward(5).unwrap();
        let mut buf = [0u8; 2];
        r.read_exact_into(&mut buf).unwrap();
        assert_eq!(&buf, b"56");
    }

    #[test]
    fn seek_forward_reseeks_outside_window() {
        let mut r = reader_over(b"0123456789", 4);
        r.ensure(2).unwrap();
        r.seek_forward(8).unwrap();
        let mut buf = [0u8; 2];
        r.read_exact_into(&mut buf).unwrap();
        assert_eq!(&buf, b"89");
    }

    #[test]
    fn swap_endian_reverses_fields_of_any_width() {
        let mut two = [0x01, 0x02];
        swap_endian(&mut two);
        assert_eq!(two, [0x02, 0x01]);

        let mut four = [0x01, 0x02, 0x03, 0x04];
        swap_endian(&mut four);
        assert_eq!(four, [0x04, 0x03, 0x02, 0x01]);

        let mut eight = [1u8, 2, 3, 4, 5, 6, 7, 8];
        swap_endian(&mut eight);
        assert_eq!(eight, [8, 7, 6, 5, 4, 3, 2, 1]);
    }
}
