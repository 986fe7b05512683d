//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::node::NodeType;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`hal_xdata::error::Error`]
    #[error(transparent)]
    XDataError(#[from] hal_xdata::error::Error),

    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// node type tag is not known
    #[error("unknown node type {tag} at {position:#x}")]
    UnknownNodeType {
        /// The stored tag
        tag: i32,
        /// Position of the tag
        position: usize,
    },

    /// map stores the same key twice
    #[error("duplicate key {key:?} in map at {position:#x}")]
    DuplicateKey {
        /// The repeated key
        key: String,
        /// Position of the map
        position: usize,
    },

    /// key permutation table points outside of the map
    #[error("key permutation entry {index} is outside of a map with {count} entries")]
    InvalidPermutation {
        /// The stored disk index
        index: i32,
        /// Number of entries in the map
        count: usize,
    },

    /// containers are nested deeper than any real document
    #[error("nodes are nested deeper than {0} levels")]
    NestingTooDeep(usize),

    /// node is not of the requested type
    #[error("expected a {expected} node but found {found}")]
    TypeMismatch {
        /// The requested type
        expected: NodeType,
        /// The actual type
        found: NodeType,
    },

    /// map has no entry with the requested key
    #[error("no entry named {0:?}")]
    MissingKey(String),

    /// container has no entry at the requested index
    #[error("no entry at index {index}, length is {length}")]
    MissingIndex {
        /// The requested index
        index: usize,
        /// Number of children
        length: usize,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
