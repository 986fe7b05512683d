//! Encoding of YAML trees.

use hal_xdata::intern::StringPool;
use hal_xdata::patch::{OffsetMode, PatchWriter, Placeholder};
use tracing::{instrument, trace};

use crate::error::{Error, Result};
use crate::node::{Hash, Node};
use crate::order;
use crate::version::FormatVersion;

/// Writes nodes into a [`PatchWriter`], sharing one string pool between all of them
///
/// Strings are only written by [`NodeWriter::finish`], after every node.
pub struct NodeWriter<'w> {
    writer: &'w mut PatchWriter,
    strings: StringPool,
    format: FormatVersion,
}

impl<'w> NodeWriter<'w> {
    /// Create a node writer appending to `writer`
    pub fn new(writer: &'w mut PatchWriter, format: FormatVersion) -> Self {
        NodeWriter {
            writer,
            strings: StringPool::new(),
            format,
        }
    }

    fn mode(&self) -> OffsetMode {
        self.format.offset_mode()
    }

    /// Write a node and all of its children at the cursor
    pub fn write_node(&mut self, node: &Node) -> Result<()> {
        self.writer.write_i32(node.node_type().tag());

        match node {
            Node::Invalid => {}
            Node::Int(value) => self.writer.write_i32(*value),
            Node::Float(value) => self.writer.write_f32(*value),
            Node::Bool(value) => self.writer.write_i32(i32::from(*value)),
            Node::String(value) => {
                let site = self.writer.reserve();
                self.strings.intern(site, value);
            }
            Node::Hash(hash) => self.write_hash(hash)?,
            Node::Array(array) => self.write_array(array)?,
        }

        Ok(())
    }

    fn write_hash(&mut self, hash: &Hash) -> Result<()> {
        self.writer.write_u32(hash.len() as u32);
        trace!(count = hash.len(), table = self.writer.position(), "writing hash");

        let slots = (0..hash.len())
            .map(|_| (self.writer.reserve(), self.writer.reserve()))
            .collect::<Vec<(Placeholder, Placeholder)>>();

        let disk_order = order::disk_order(hash.keys().map(String::as_str));
        if self.format.has_key_permutation_table {
            for slot in order::permutation_table(&disk_order) {
                self.writer.write_u32(slot as u32);
            }
        }

        let mode = self.mode();
        for ((name, data), index) in slots.into_iter().zip(disk_order) {
            let (key, value) = hash.get_index(index).ok_or(Error::MissingIndex {
                index,
                length: hash.len(),
            })?;

            self.strings.intern(name, key);
            self.writer.resolve_here(data, mode)?;
            self.write_node(value)?;
        }

        Ok(())
    }

    fn write_array(&mut self, array: &[Node]) -> Result<()> {
        self.writer.write_u32(array.len() as u32);
        trace!(count = array.len(), table = self.writer.position(), "writing array");

        let slots = array
            .iter()
            .map(|_| self.writer.reserve())
            .collect::<Vec<_>>();

        let mode = self.mode();
        for (slot, value) in slots.into_iter().zip(array) {
            self.writer.resolve_here(slot, mode)?;
            self.write_node(value)?;
        }

        Ok(())
    }

    /// Write every string referenced by the nodes written so far
    pub fn finish(self) -> Result<()> {
        let mode = self.mode();
        Ok(self.strings.flush(self.writer, mode)?)
    }
}

/// Write `node` followed by the strings it references
#[instrument(skip(writer, node), fields(position = writer.position()), err)]
pub fn write_tree(writer: &mut PatchWriter, node: &Node, format: FormatVersion) -> Result<()> {
    let mut nodes = NodeWriter::new(writer, format);
    nodes.write_node(node)?;
    nodes.finish()
}
