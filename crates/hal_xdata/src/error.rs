//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent warpper for [`std::string::FromUtf8Error`]
    #[error(transparent)]
    UTF8Error(#[from] std::string::FromUtf8Error),

    /// Transparent warpper for [`widestring::error::Utf16Error`]
    #[error(transparent)]
    UTF16Error(#[from] widestring::error::Utf16Error),

    /// A magic value did not match what the format requires
    #[error("expected magic {expected:?} but found {found:?}")]
    InvalidMagic {
        /// The magic the format requires
        expected: String,
        /// What was actually stored
        found: String,
    },

    /// A read or seek went outside of the buffer
    #[error("access of {requested} bytes at {position:#x} is outside of a {length} byte buffer")]
    OutOfRange {
        /// Position of the access
        position: usize,
        /// Number of bytes requested
        requested: usize,
        /// Length of the underlying buffer
        length: usize,
    },

    /// An offset can not be stored in the 32 bits reserved for it
    #[error("offset from {from:#x} to {to:#x} can not be stored as a 32 bit value")]
    OffsetOverflow {
        /// Position of the offset field
        from: usize,
        /// Position the offset points to
        to: usize,
    },
}

impl Error {
    /// Build an [`Error::InvalidMagic`] from the raw bytes
    pub fn invalid_magic(expected: &[u8], found: &[u8]) -> Self {
        Error::InvalidMagic {
            expected: String::from_utf8_lossy(expected).into_owned(),
            found: String::from_utf8_lossy(found).into_owned(),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
