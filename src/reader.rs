//! The public facade: open a file, walk its elements in header order, and
//! load (or skip) each one's payload on demand.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::byte_reader::{ByteReader, DEFAULT_WINDOW_CAPACITY};
use crate::element_loader::{load_element, skip_element};
use crate::error::PlyError;
use crate::header::{parse_header, ElementDescriptor, PlyFormat, PlyHeader};

/// A PLY file opened for reading, positioned at its first element.
///
/// Construction never returns an error: a file that can't be opened, or
/// whose header is malformed, simply produces a `Reader` with [`valid`]
/// false and no elements. Every other method is a no-op (or a `false`/`None`
/// return) on an invalid reader, so callers that only check `valid()` once
/// up front never need to match on [`PlyError`] at all.
///
/// [`valid`]: Reader::valid
pub struct Reader<R> {
    byte_reader: Option<ByteReader<R>>,
    header: Option<PlyHeader>,
    valid: bool,
    cursor: usize,
    current_data: Option<Vec<u8>>,
    current_loaded: bool,
}

impl Reader<BufReader<File>> {
    /// Open `path` and parse its header, using the default scratch-window
    /// capacity. See the type-level docs for how failures are reported.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::open_with_capacity(path, DEFAULT_WINDOW_CAPACITY)
    }

    /// Like [`open`](Reader::open), but with a caller-chosen scratch-window
    /// capacity — useful for embedding callers that know their files are
    /// much smaller (or larger) than the ~128 KiB default.
    pub fn open_with_capacity<P: AsRef<Path>>(path: P, capacity: usize) -> Self {
        match File::open(path) {
            Ok(file) => Self::from_reader_with_capacity(BufReader::new(file), capacity),
            Err(_) => Self {
                byte_reader: None,
                header: None,
                valid: false,
                cursor: 0,
                current_data: None,
                current_loaded: false,
            },
        }
    }
}

impl<R: Read + Seek> Reader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self::from_reader_with_capacity(reader, DEFAULT_WINDOW_CAPACITY)
    }

    pub fn from_reader_with_capacity(reader: R, capacity: usize) -> Self {
        let mut byte_reader = ByteReader::new(reader, capacity);
        match parse_header(&mut byte_reader) {
            Ok(header) => Self {
                byte_reader: Some(byte_reader),
                header: Some(header),
                valid: true,
                cursor: 0,
                current_data: None,
                current_loaded: false,
            },
            Err(_) => Self {
                byte_reader: Some(byte_reader),
                header: None,
                valid: false,
                cursor: 0,
                current_data: None,
                current_loaded: false,
            },
        }
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn file_type(&self) -> Option<PlyFormat> {
        self.header.as_ref().map(|h| h.format)
    }

    pub fn version_major(&self) -> Option<u32> {
        self.header.as_ref().map(|h| h.version_major)
    }

    pub fn version_minor(&self) -> Option<u32> {
        self.header.as_ref().map(|h| h.version_minor)
    }

    pub fn num_elements(&self) -> usize {
        self.header.as_ref().map_or(0, |h| h.elements.len())
    }

    pub fn get_element(&self, index: usize) -> Option<&ElementDescriptor> {
        self.header.as_ref().and_then(|h| h.elements.get(index))
    }

    pub fn find_element(&self, name: &[u8]) -> Option<usize> {
        self.header.as_ref().and_then(|h| h.get_element_index(name))
    }

    /// Whether the cursor still points at an element (i.e. the file hasn't
    /// been fully walked).
    pub fn has_element(&self) -> bool {
        self.valid && self.cursor < self.num_elements()
    }

    /// Descriptor of the element currently under the cursor.
    pub fn element(&self) -> Option<&ElementDescriptor> {
        if self.has_element() {
            self.get_element(self.cursor)
        } else {
            None
        }
    }

    /// Read the current element's payload off disk, storing it for
    /// [`element_data`]/column extraction. Calling this more than once for
    /// the same element is a harmless no-op: the stored payload from the
    /// first call is kept.
    ///
    /// [`element_data`]: Reader::element_data
    pub fn load_element(&mut self) -> Result<(), PlyError> {
        if !self.has_element() {
            return Err(PlyError::ElementNotLoaded);
        }
        if self.current_loaded {
            return Ok(());
        }
        let format = self.header.as_ref().unwrap().format;
        let elem = &mut self.header.as_mut().unwrap().elements[self.cursor];
        let data = match load_element(self.byte_reader.as_mut().unwrap(), elem, format) {
            Ok(data) => data,
            Err(err) => {
                self.valid = false;
                return Err(err);
            }
        };
        self.current_data = Some(data);
        self.current_loaded = true;
        Ok(())
    }

    /// The current element's loaded row buffer, if [`load_element`] has
    /// been called for it.
    ///
    /// [`load_element`]: Reader::load_element
    pub fn element_data(&self) -> Option<&[u8]> {
        self.current_data.as_deref()
    }

    /// Advance the cursor to the next element. If the current element was
    /// never loaded, its on-disk footprint is skipped first so the stream
    /// position stays correct for whatever comes next.
    pub fn next_element(&mut self) -> Result<(), PlyError> {
        if !self.has_element() {
            return Err(PlyError::ElementNotLoaded);
        }
        if !self.current_loaded {
            let format = self.header.as_ref().unwrap().format;
            let elem = &self.header.as_ref().unwrap().elements[self.cursor];
            if let Err(err) = skip_element(self.byte_reader.as_mut().unwrap(), elem, format) {
                self.valid = false;
                return Err(err);
            }
        }
        self.cursor += 1;
        self.current_data = None;
        self.current_loaded = false;
        Ok(())
    }
}
