//! HAL strings.
//!
//! | Field      | Size                 | Description                                  |
//! |------------|----------------------|----------------------------------------------|
//! | Length     | 4 bytes              | Byte count (UTF-8) or code unit count (UTF-16)|
//! | Data       | Length (× 2) bytes   | The encoded text                             |
//! | Terminator | 1 byte (2 for UTF-16)| Zero                                         |
//! | Padding    | 0 - 3 bytes          | Zeroes up to the next 4 byte boundary        |
//!
//! UTF-16 payloads are always stored as little endian code units; only the length follows the
//! document's endianness.

use byteorder::{ByteOrder, LittleEndian};
use widestring::{U16Str, U16String};

use crate::error::Result;
use crate::patch::OffsetMode;
use crate::stream::{XReader, XWriter};

/// Alignment applied after every HAL string
pub const HAL_STRING_ALIGNMENT: usize = 4;

impl XReader<'_> {
    /// Read a UTF-8 HAL string at the cursor
    pub fn read_hal_string(&mut self) -> Result<String> {
        let length = self.read_u32()? as usize;
        let bytes = self.read_bytes(length)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Read a UTF-16 HAL string at the cursor
    pub fn read_unicode_hal_string(&mut self) -> Result<String> {
        let units = self.read_u32()? as usize;
        let bytes = self.read_bytes(units.saturating_mul(2))?;

        let mut buffer = vec![0u16; units];
        LittleEndian::read_u16_into(bytes, &mut buffer);

        Ok(U16Str::from_slice(&buffer).to_string()?)
    }

    /// Follow the offset field at the cursor and read the HAL string it points at.
    ///
    /// The cursor ends up just past the offset field.
    pub fn read_string_offset(&mut self, mode: OffsetMode) -> Result<String> {
        let target = self.read_offset(mode)?;
        let resume = self.position();

        self.seek(target)?;
        let value = self.read_hal_string()?;
        self.seek(resume)?;

        Ok(value)
    }
}

impl XWriter {
    /// Write a UTF-8 HAL string at the cursor
    pub fn write_hal_string(&mut self, value: &str) {
        self.write_u32(value.len() as u32);
        self.write_bytes(value.as_bytes());
        self.write_u8(0);
        self.pad(HAL_STRING_ALIGNMENT);
    }

    /// Write a UTF-16 HAL string at the cursor
    pub fn write_unicode_hal_string(&mut self, value: &str) {
        let units = U16String::from_str(value).into_vec();

        let mut bytes = vec![0u8; units.len() * 2];
        LittleEndian::write_u16_into(&units, &mut bytes);

        self.write_u32(units.len() as u32);
        self.write_bytes(&bytes);
        self.write_u16(0);
        self.pad(HAL_STRING_ALIGNMENT);
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::patch::OffsetMode;
    use crate::stream::{Endian, XReader, XWriter};

    #[test]
    fn write_hal_string_pads_to_four() {
        let mut writer = XWriter::new(Endian::Little);
        writer.write_hal_string("Kirby");

        #[rustfmt::skip]
        let expected = vec![
            0x05, 0x00, 0x00, 0x00,
            b'K', b'i', b'r', b'b', b'y', 0x00, 0x00, 0x00,
        ];
        assert_eq!(writer.into_inner(), expected);
    }

    #[test]
    fn write_hal_string_terminator_forces_padding() {
        let mut writer = XWriter::new(Endian::Big);
        writer.write_hal_string("Dede");

        #[rustfmt::skip]
        let expected = vec![
            0x00, 0x00, 0x00, 0x04,
            b'D', b'e', b'd', b'e',
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(writer.into_inner(), expected);
    }

    #[test]
    fn write_empty_hal_string() {
        let mut writer = XWriter::new(Endian::Little);
        writer.write_hal_string("");

        assert_eq!(
            writer.into_inner(),
            vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn read_hal_string() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            0x00, 0x00, 0x00, 0x06,
            b'W', b'a', b'd', b'd', b'l', b'e', 0x00, 0x00,
        ];

        let mut reader = XReader::new(&input, Endian::Big);
        assert_eq!(reader.read_hal_string()?, "Waddle");

        Ok(())
    }

    #[test]
    fn hal_string_multibyte() -> Result<()> {
        let mut writer = XWriter::new(Endian::Little);
        writer.write_hal_string("カービィ");
        let data = writer.into_inner();

        // 12 bytes of text, a terminator and 3 bytes of padding
        assert_eq!(data.len(), 4 + 12 + 4);
        assert_eq!(&data[..4], &[12, 0, 0, 0]);

        let mut reader = XReader::new(&data, Endian::Little);
        assert_eq!(reader.read_hal_string()?, "カービィ");

        Ok(())
    }

    #[test]
    fn unicode_hal_string() -> Result<()> {
        let mut writer = XWriter::new(Endian::Big);
        writer.write_unicode_hal_string("Hi!");
        let data = writer.into_inner();

        #[rustfmt::skip]
        let expected = vec![
            0x00, 0x00, 0x00, 0x03,
            b'H', 0x00, b'i', 0x00, b'!', 0x00,
            0x00, 0x00,
        ];
        assert_eq!(data, expected);

        let mut reader = XReader::new(&data, Endian::Big);
        assert_eq!(reader.read_unicode_hal_string()?, "Hi!");

        Ok(())
    }

    #[test]
    fn unicode_hal_string_surrogates() -> Result<()> {
        let mut writer = XWriter::new(Endian::Little);
        writer.write_unicode_hal_string("★🍰");
        let data = writer.into_inner();

        // one BMP code unit plus a surrogate pair
        assert_eq!(&data[..4], &[3, 0, 0, 0]);

        let mut reader = XReader::new(&data, Endian::Little);
        assert_eq!(reader.read_unicode_hal_string()?, "★🍰");

        Ok(())
    }

    #[test]
    fn read_invalid_utf8() {
        let input = [0x02, 0x00, 0x00, 0x00, 0xC3, 0x28, 0x00, 0x00];
        let mut reader = XReader::new(&input, Endian::Little);
        assert!(reader.read_hal_string().is_err());
    }

    #[test]
    fn read_string_offset_restores_cursor() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            0x08, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            b'M', b'e', b't', 0x00,
        ];

        let mut reader = XReader::new(&input, Endian::Little);
        assert_eq!(reader.read_string_offset(OffsetMode::Absolute)?, "Met");
        assert_eq!(reader.position(), 4);

        assert_eq!(reader.read_string_offset(OffsetMode::Relative)?, "Met");
        assert_eq!(reader.position(), 8);

        Ok(())
    }
}
