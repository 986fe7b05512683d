//! This library handles reading from and creating the binary **YAML** trees used by HAL
//! Laboratory's *Kirby* games.
//!
//! # YAML Format Documentation
//!
//! Despite the name these files have nothing to do with textual YAML. They store a single tree of
//! [`Node`]s after an XData header (see [`hal_xdata`]).
//!
//! | Offset (bytes) | Field        | Description                                        |
//! |----------------|--------------|----------------------------------------------------|
//! | 0x0000         | XData header | 16 or 20 bytes depending on the XData version      |
//! | +0x0000        | Magic number | 4 bytes: "YAML"                                    |
//! | +0x0004        | Version      | 4 bytes: Tree version                              |
//! | +0x0008        | Root node    | The first node of the tree                         |
//!
//! ## Nodes
//!
//! Every node starts with a 4 byte type tag, followed by its payload.
//!
//! | Tag | Type    | Payload                                                              |
//! |-----|---------|----------------------------------------------------------------------|
//! | 0   | Invalid | None                                                                 |
//! | 1   | Int     | 4 bytes: Signed integer                                              |
//! | 2   | Float   | 4 bytes: Single precision float                                      |
//! | 3   | Bool    | 4 bytes: 0 or 1                                                      |
//! | 4   | String  | 4 bytes: Offset to a HAL string                                      |
//! | 5   | Hash    | Count, Count × (name offset, data offset), Count × disk index (v4+)  |
//! | 6   | Array   | Count, Count × data offset                                           |
//!
//! - **Hash**: Entries are stored sorted by [`order::compare_keys`]. Starting with version 4 a
//!   table follows the entries giving the disk index of every key in insertion order.
//! - **Offsets**: Absolute before version 5, relative to the offset field itself from version 5.
//! - **Strings**: Every distinct string, keys included, is stored once after the root node.
//!
//! ## Additional Information
//!
//! - **Endianness**: Decided by the XData header
//! - **Footer**: Files with an XData major version above 2 end in an RLOC footer
//!

pub mod document;
pub mod error;
pub mod node;
pub mod order;
pub mod read;
pub mod section;
#[cfg(feature = "serde")]
pub mod serde;
pub mod version;
pub mod write;

pub use document::Yaml;
pub use node::{Node, NodeType};
pub use section::YamlSection;
pub use version::FormatVersion;
