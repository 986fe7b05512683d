//! The XData header and RLOC footer shared by HAL data files.

use std::io::Cursor;

use binrw::{BinRead, BinWrite};
use bon::Builder;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::patch::{OffsetMode, PatchWriter, Placeholder};
use crate::stream::{Endian, XReader};

/// Magic at the start of every XData file
pub const XDATA_MAGIC: &[u8; 4] = b"XBIN";

/// Byte order mark, stored in the document's own endianness
pub const BYTE_ORDER_MARK: u16 = 0x1234;

/// The value usually found at `0xC` in the header
pub const DEFAULT_UNKNOWN_0XC: u32 = 65001;

/// Alignment of the RLOC footer
pub const FOOTER_ALIGNMENT: usize = 4;

/// Two byte XData version
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
pub struct XDataVersion {
    /// Major version, decides the shape of the header
    pub major: u8,

    /// Minor version
    pub minor: u8,
}

impl XDataVersion {
    /// Create a version from its two bytes
    pub const fn new(major: u8, minor: u8) -> Self {
        XDataVersion { major, minor }
    }

    /// Whether the header carries a footer address and the file ends in an RLOC footer
    pub const fn has_footer(&self) -> bool {
        self.major > 2
    }
}

impl Default for XDataVersion {
    fn default() -> Self {
        XDataVersion::new(4, 0)
    }
}

impl std::fmt::Display for XDataVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Raw XData header following the magic
///
/// The layout is the same for both endiannesses, the byte order mark decides which one is used.
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct XDataHeader {
    /// Always [`BYTE_ORDER_MARK`] once read with the right endianness
    pub byte_order_mark: u16,

    /// Version of the header
    pub version: XDataVersion,

    /// Length of the file up to, but not including, the footer
    pub file_length: u32,

    /// Purpose unknown, see [`DEFAULT_UNKNOWN_0XC`]
    pub unknown_0xc: u32,

    /// Offset of the RLOC footer for versions that have one
    #[br(if(version.has_footer()))]
    pub footer_offset: Option<u32>,
}

/// RLOC footer found at the end of files with an XData version above 2
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(magic = b"RLOC")]
pub struct RelocationFooter {
    /// Always zero in known files
    pub reserved: [u32; 2],
}

/// Placeholders left behind by [`XData::write_header`]
#[must_use = "the header must be completed with XData::finish"]
#[derive(Debug)]
pub struct HeaderPlaceholders {
    file_length: Placeholder,
    footer_offset: Option<Placeholder>,
}

/// Document level information carried by the XData header
///
/// ```
/// use hal_xdata::header::{XData, XDataVersion};
/// use hal_xdata::stream::Endian;
///
/// let xdata = XData::builder()
///     .endian(Endian::Big)
///     .version(XDataVersion::new(2, 0))
///     .build();
///
/// assert!(!xdata.version.has_footer());
/// assert_eq!(xdata.unknown_0xc, 65001);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Builder)]
pub struct XData {
    /// Endianness of everything following the byte order mark
    #[builder(default = Endian::Little)]
    pub endian: Endian,

    /// Header version
    #[builder(default)]
    pub version: XDataVersion,

    /// Value stored at `0xC`, kept as is
    #[builder(default = DEFAULT_UNKNOWN_0XC)]
    pub unknown_0xc: u32,

    /// Footer contents, only written when the version has a footer
    #[builder(default)]
    pub footer: RelocationFooter,
}

impl Default for XData {
    fn default() -> Self {
        XData::builder().build()
    }
}

impl XData {
    /// Size of the header in bytes
    pub fn header_size(&self) -> usize {
        if self.version.has_footer() {
            20
        } else {
            16
        }
    }

    /// Read the header at the cursor and switch the reader to the document's endianness.
    ///
    /// The cursor is left just past the header.
    #[instrument(skip(reader), err)]
    pub fn read(reader: &mut XReader<'_>) -> Result<XData> {
        let start = reader.position();

        let magic = reader.read_array::<4>()?;
        if &magic != XDATA_MAGIC {
            return Err(Error::invalid_magic(XDATA_MAGIC, &magic));
        }

        let mark = reader.read_array::<2>()?;
        let endian = if u16::from_le_bytes(mark) == BYTE_ORDER_MARK {
            Endian::Little
        } else {
            if u16::from_be_bytes(mark) != BYTE_ORDER_MARK {
                warn!(?mark, "unexpected byte order mark, assuming big endian");
            }
            Endian::Big
        };
        reader.set_endian(endian);

        let body = start + XDATA_MAGIC.len();
        let mut cursor = Cursor::new(reader.slice_from(body)?);
        let header = XDataHeader::read_options(&mut cursor, endian, ())?;
        reader.seek(body + cursor.position() as usize)?;

        debug!(?endian, version = %header.version, length = header.file_length, "read xdata header");

        if header.file_length as usize > reader.len() - start {
            warn!(
                length = header.file_length,
                available = reader.len() - start,
                "header length is larger than the data"
            );
        }

        let footer = match header.footer_offset {
            Some(offset) => Self::read_footer(reader, start + offset as usize, endian),
            None => RelocationFooter::default(),
        };

        Ok(XData {
            endian,
            version: header.version,
            unknown_0xc: header.unknown_0xc,
            footer,
        })
    }

    fn read_footer(reader: &XReader<'_>, position: usize, endian: Endian) -> RelocationFooter {
        let footer = reader.slice_from(position).and_then(|data| {
            RelocationFooter::read_options(&mut Cursor::new(data), endian, ()).map_err(Error::from)
        });

        match footer {
            Ok(footer) => {
                if footer.reserved != [0, 0] {
                    warn!(reserved = ?footer.reserved, "footer has non-zero reserved fields");
                }
                footer
            }
            Err(error) => {
                warn!(%error, position, "unable to read footer");
                RelocationFooter::default()
            }
        }
    }

    /// Create a writer using the document's endianness
    pub fn writer(&self) -> PatchWriter {
        PatchWriter::new(self.endian)
    }

    /// Write the header at the cursor.
    ///
    /// The file length and footer address are only known once the document is complete, see
    /// [`XData::finish`].
    pub fn write_header(&self, writer: &mut PatchWriter) -> HeaderPlaceholders {
        writer.write_bytes(XDATA_MAGIC);
        writer.write_u16(BYTE_ORDER_MARK);
        writer.write_u8(self.version.major);
        writer.write_u8(self.version.minor);

        let file_length = writer.reserve();
        writer.write_u32(self.unknown_0xc);

        let footer_offset = self.version.has_footer().then(|| writer.reserve());

        HeaderPlaceholders {
            file_length,
            footer_offset,
        }
    }

    /// Backfill the file length and append the footer.
    #[instrument(skip_all, err)]
    pub fn finish(&self, writer: &mut PatchWriter, placeholders: HeaderPlaceholders) -> Result<()> {
        writer.seek_end();
        writer.resolve_here(placeholders.file_length, OffsetMode::Absolute)?;

        if let Some(footer_offset) = placeholders.footer_offset {
            writer.pad(FOOTER_ALIGNMENT);
            writer.resolve_here(footer_offset, OffsetMode::Absolute)?;

            let mut buffer = Cursor::new(Vec::new());
            self.footer.write_options(&mut buffer, self.endian, ())?;
            writer.write_bytes(buffer.get_ref());
        }

        Ok(())
    }
}
