//! Decoding of YAML trees.

use hal_xdata::patch::OffsetMode;
use hal_xdata::stream::XReader;
use tracing::{instrument, trace, warn};

use crate::error::{Error, Result};
use crate::node::{Hash, Node, NodeType};
use crate::version::FormatVersion;

/// Size of a name and data offset pair in a hash
pub(crate) const PAIR_SIZE: usize = 8;

/// Size of a single offset
pub(crate) const OFFSET_SIZE: usize = 4;

/// Containers nested deeper than this are rejected
pub const MAX_DEPTH: usize = 256;

/// Read the node at the cursor, including all of its children.
///
/// The cursor ends up just past the node itself; children stored elsewhere do not move it.
#[instrument(skip(reader), fields(position = reader.position()), err)]
pub fn read_node(reader: &mut XReader<'_>, format: FormatVersion) -> Result<Node> {
    NodeReader {
        reader,
        mode: format.offset_mode(),
        has_key_permutation_table: format.has_key_permutation_table,
    }
    .read(0)
}

struct NodeReader<'r, 'a> {
    reader: &'r mut XReader<'a>,
    mode: OffsetMode,
    has_key_permutation_table: bool,
}

impl NodeReader<'_, '_> {
    fn read(&mut self, depth: usize) -> Result<Node> {
        if depth > MAX_DEPTH {
            return Err(Error::NestingTooDeep(MAX_DEPTH));
        }

        let position = self.reader.position();
        let tag = self.reader.read_i32()?;
        let node_type =
            NodeType::try_from(tag).map_err(|tag| Error::UnknownNodeType { tag, position })?;

        Ok(match node_type {
            NodeType::Invalid => Node::Invalid,
            NodeType::Int => Node::Int(self.reader.read_i32()?),
            NodeType::Float => Node::Float(self.reader.read_f32()?),
            NodeType::Bool => {
                // Any non-zero value is true and is written back as 1
                let value = self.reader.read_i32()?;
                if value != 0 && value != 1 {
                    warn!(value, position, "non-canonical bool");
                }
                Node::Bool(value != 0)
            }
            NodeType::String => Node::String(self.reader.read_string_offset(self.mode)?),
            NodeType::Hash => Node::Hash(self.read_hash(position, depth)?),
            NodeType::Array => Node::Array(self.read_array(depth)?),
        })
    }

    fn read_hash(&mut self, position: usize, depth: usize) -> Result<Hash> {
        let count = self.reader.read_u32()? as usize;
        let table = self.reader.position();
        trace!(count, table, "reading hash");

        let mut end = table + count * PAIR_SIZE;
        self.reader.seek(end)?;

        let order = if self.has_key_permutation_table {
            end += count * OFFSET_SIZE;
            (0..count)
                .map(|_| {
                    let index = self.reader.read_i32()?;
                    usize::try_from(index)
                        .ok()
                        .filter(|slot| *slot < count)
                        .ok_or(Error::InvalidPermutation { index, count })
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..count).collect()
        };

        let mut hash = Hash::with_capacity(count);
        for slot in order {
            self.reader.seek(table + slot * PAIR_SIZE)?;
            let key = self.reader.read_string_offset(self.mode)?;
            let data = self.reader.read_offset(self.mode)?;

            if hash.contains_key(&key) {
                return Err(Error::DuplicateKey { key, position });
            }

            self.reader.seek(data)?;
            let value = self.read(depth + 1)?;
            hash.insert(key, value);
        }

        self.reader.seek(end)?;
        Ok(hash)
    }

    fn read_array(&mut self, depth: usize) -> Result<Vec<Node>> {
        let count = self.reader.read_u32()? as usize;
        let table = self.reader.position();
        trace!(count, table, "reading array");

        let end = table + count * OFFSET_SIZE;
        self.reader.seek(end)?;

        let mut array = Vec::with_capacity(count);
        for slot in 0..count {
            self.reader.seek(table + slot * OFFSET_SIZE)?;
            let data = self.reader.read_offset(self.mode)?;
            self.reader.seek(data)?;
            array.push(self.read(depth + 1)?);
        }

        self.reader.seek(end)?;
        Ok(array)
    }
}
