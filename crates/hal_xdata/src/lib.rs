//! This library handles the container layer shared by the **XData** files used by HAL Laboratory's
//! *Kirby* games.
//!
//! # XData Format Documentation
//!
//! Every XData file starts with a small header naming its endianness and version, followed by a
//! payload whose layout depends on the kind of file (YAML trees, maps, scene assets and so on).
//! The payload refers to its own data through 4 byte offsets and stores text as HAL strings.
//!
//! ## Header
//!
//! | Offset (bytes) | Field           | Description                                                    |
//! |----------------|-----------------|----------------------------------------------------------------|
//! | 0x0000         | Magic number    | 4 bytes: "XBIN"                                                |
//! | 0x0004         | Byte order mark | 2 bytes: 0x1234 in the document's endianness                   |
//! | 0x0006         | Version         | 2 bytes: major and minor version                               |
//! | 0x0008         | File length     | 4 bytes: Length of the file up to the footer                   |
//! | 0x000C         | Unknown         | 4 bytes: Usually 65001                                         |
//! | 0x0010         | Footer offset   | 4 bytes: Offset of the RLOC footer, only if major version > 2  |
//!
//! - **Byte Order Mark**: Read as little endian, `0x1234` means the whole document is little
//!   endian. Anything else means big endian.
//! - **File Length**: Covers everything up to the footer padding. Files without a footer end here.
//!
//! ## Footer
//!
//! Files with a major version above 2 end in a footer aligned to 4 bytes.
//!
//! | Offset (bytes) | Field        | Description                    |
//! |----------------|--------------|--------------------------------|
//! | 0x0000         | Magic number | 4 bytes: "RLOC"                |
//! | 0x0004         | Reserved     | 8 bytes: Zero in known files   |
//!
//! ## Offsets
//!
//! Depending on the payload version an offset is either **absolute**, counted from the start of
//! the document, or **relative**, counted from the offset field itself. Writers reserve offset
//! fields with [`PatchWriter::reserve`] and fill them in once the target has been written.
//!
//! ## Strings
//!
//! HAL strings are a 4 byte length, the text, a terminator and zero padding to the next 4 byte
//! boundary. See [`string`] for the exact layout and [`intern`] for how writers share them.
//!

pub mod error;
pub mod header;
pub mod intern;
pub mod patch;
pub mod stream;
pub mod string;

pub use header::XData;
pub use intern::StringPool;
pub use patch::{OffsetMode, PatchWriter, Placeholder};
pub use stream::{Endian, XReader, XWriter};
