//! Endian aware cursors over an in memory document.
//!
//! Every multi-byte access honors the endianness chosen when the cursor was created, which
//! for HAL files is decided once per document by the byte order mark in the XData header.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

pub use binrw::Endian;

use crate::error::{Error, Result};
use crate::patch::OffsetMode;

macro_rules! read_primitive {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $read:ident) => {
        $(#[$meta])*
        pub fn $name(&mut self) -> Result<$ty> {
            let bytes = self.read_bytes(std::mem::size_of::<$ty>())?;
            Ok(match self.endian {
                Endian::Big => BigEndian::$read(bytes),
                Endian::Little => LittleEndian::$read(bytes),
            })
        }
    };
}

macro_rules! write_primitive {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $write:ident) => {
        $(#[$meta])*
        pub fn $name(&mut self, value: $ty) {
            let mut buffer = [0u8; std::mem::size_of::<$ty>()];
            match self.endian {
                Endian::Big => BigEndian::$write(&mut buffer, value),
                Endian::Little => LittleEndian::$write(&mut buffer, value),
            }
            self.write_bytes(&buffer);
        }
    };
}

/// Read cursor over a borrowed, fixed size buffer
///
/// ```
/// use hal_xdata::stream::{Endian, XReader};
///
/// let mut reader = XReader::new(&[0x12, 0x34, 0x56, 0x78], Endian::Big);
/// assert_eq!(reader.read_u16().unwrap(), 0x1234);
/// assert_eq!(reader.position(), 2);
/// assert!(reader.read_u32().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct XReader<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
}

impl<'a> XReader<'a> {
    /// Create a reader positioned at the start of `data`
    pub fn new(data: &'a [u8], endian: Endian) -> XReader<'a> {
        XReader {
            data,
            position: 0,
            endian,
        }
    }

    /// The endianness used for multi-byte values
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Change the endianness used for all following reads
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Current absolute position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The whole underlying buffer
    pub fn get_ref(&self) -> &'a [u8] {
        self.data
    }

    /// Move to an absolute position. Moving to the very end is allowed.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(self.out_of_range(position, 0));
        }
        self.position = position;
        Ok(())
    }

    /// Everything from `position` to the end of the buffer
    pub fn slice_from(&self, position: usize) -> Result<&'a [u8]> {
        self.data
            .get(position..)
            .ok_or_else(|| self.out_of_range(position, 0))
    }

    /// Read a fixed run of bytes, advancing the cursor
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(count)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| self.out_of_range(self.position, count))?;

        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Read a fixed size array of bytes, advancing the cursor
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buffer = [0u8; N];
        buffer.copy_from_slice(self.read_bytes(N)?);
        Ok(buffer)
    }

    /// Read a single unsigned byte
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a single signed byte
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    read_primitive!(
        /// Read an unsigned 16 bit integer
        read_u16, u16, read_u16
    );
    read_primitive!(
        /// Read an unsigned 32 bit integer
        read_u32, u32, read_u32
    );
    read_primitive!(
        /// Read an unsigned 64 bit integer
        read_u64, u64, read_u64
    );
    read_primitive!(
        /// Read a signed 16 bit integer
        read_i16, i16, read_i16
    );
    read_primitive!(
        /// Read a signed 32 bit integer
        read_i32, i32, read_i32
    );
    read_primitive!(
        /// Read a signed 64 bit integer
        read_i64, i64, read_i64
    );
    read_primitive!(
        /// Read a 32 bit float
        read_f32, f32, read_f32
    );

    /// Read a 4 byte offset field and resolve it to an absolute position.
    ///
    /// In [`OffsetMode::Relative`] the stored value is added to the position of the field itself
    /// with 32 bit wrapping, so a field can point backwards.
    pub fn read_offset(&mut self, mode: OffsetMode) -> Result<usize> {
        let field = self.position as u32;
        let stored = self.read_u32()?;
        let target = match mode {
            OffsetMode::Absolute => stored,
            OffsetMode::Relative => field.wrapping_add(stored),
        };
        Ok(target as usize)
    }

    /// Skip forward to the next multiple of `alignment`
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        self.seek(self.position.next_multiple_of(alignment))
    }

    fn out_of_range(&self, position: usize, requested: usize) -> Error {
        Error::OutOfRange {
            position,
            requested,
            length: self.data.len(),
        }
    }
}

/// Write cursor over an owned buffer that grows on demand
///
/// Writing in the middle of the buffer overwrites the existing bytes.
#[derive(Debug, Clone)]
pub struct XWriter {
    data: Vec<u8>,
    position: usize,
    endian: Endian,
}

impl XWriter {
    /// Create an empty writer
    pub fn new(endian: Endian) -> XWriter {
        XWriter {
            data: Vec::new(),
            position: 0,
            endian,
        }
    }

    /// The endianness used for multi-byte values
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Current absolute position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes written so far
    pub fn get_ref(&self) -> &[u8] {
        &self.data
    }

    /// Move to an absolute position inside what has been written
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(Error::OutOfRange {
                position,
                requested: 0,
                length: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Move to the end of the written data
    pub fn seek_end(&mut self) {
        self.position = self.data.len();
    }

    /// Write raw bytes at the cursor, growing the buffer if needed
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }

    /// Write a single unsigned byte
    pub fn write_u8(&mut self, value: u8) {
        self.write_bytes(&[value]);
    }

    /// Write a single signed byte
    pub fn write_i8(&mut self, value: i8) {
        self.write_u8(value as u8);
    }

    write_primitive!(
        /// Write an unsigned 16 bit integer
        write_u16, u16, write_u16
    );
    write_primitive!(
        /// Write an unsigned 32 bit integer
        write_u32, u32, write_u32
    );
    write_primitive!(
        /// Write an unsigned 64 bit integer
        write_u64, u64, write_u64
    );
    write_primitive!(
        /// Write a signed 16 bit integer
        write_i16, i16, write_i16
    );
    write_primitive!(
        /// Write a signed 32 bit integer
        write_i32, i32, write_i32
    );
    write_primitive!(
        /// Write a signed 64 bit integer
        write_i64, i64, write_i64
    );
    write_primitive!(
        /// Write a 32 bit float
        write_f32, f32, write_f32
    );

    /// Write zeroes until the position is a multiple of `alignment`
    pub fn pad(&mut self, alignment: usize) {
        let padding = self.position.next_multiple_of(alignment) - self.position;
        self.write_bytes(&vec![0u8; padding]);
    }

    /// Unwrap the written bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}
