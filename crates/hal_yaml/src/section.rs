//! Lists of YAML documents embedded in larger files.
//!
//! | Field   | Size          | Description                                  |
//! |---------|---------------|----------------------------------------------|
//! | Count   | 4 bytes       | Number of documents                          |
//! | Offsets | Count×4 bytes | Absolute offset of every document            |
//!
//! Every document is a complete YAML file including its XData header, its own offsets count
//! from the start of that header.

use derive_more::derive::{Constructor, Deref, Index, IntoIterator};
use hal_xdata::patch::{OffsetMode, PatchWriter};
use hal_xdata::stream::XReader;
use tracing::{debug, instrument};

use crate::document::Yaml;
use crate::error::Result;

/// Documents of a YAML section, in stored order
#[derive(Debug, Clone, Default, PartialEq, Constructor, Deref, Index, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct YamlSection(Vec<Yaml>);

impl YamlSection {
    /// Append a document
    pub fn push(&mut self, yaml: Yaml) {
        self.0.push(yaml);
    }

    /// Read a section at the cursor, leaving the cursor past the offset table
    #[instrument(skip(reader), fields(position = reader.position()), err)]
    pub fn read(reader: &mut XReader<'_>) -> Result<YamlSection> {
        let count = reader.read_u32()? as usize;
        debug!(count, "reading yaml section");

        let mut documents = Vec::new();
        for _ in 0..count {
            let offset = reader.read_offset(OffsetMode::Absolute)?;
            documents.push(Yaml::read(reader.slice_from(offset)?)?);
        }

        Ok(YamlSection(documents))
    }

    /// Write the section at the cursor, followed by every document
    #[instrument(skip_all, fields(count = self.len()), err)]
    pub fn write(&self, writer: &mut PatchWriter) -> Result<()> {
        writer.write_u32(self.len() as u32);
        let slots = self.iter().map(|_| writer.reserve()).collect::<Vec<_>>();

        for (slot, yaml) in slots.into_iter().zip(self.iter()) {
            let data = yaml.to_bytes()?;
            writer.resolve_here(slot, OffsetMode::Absolute)?;
            writer.write_bytes(&data);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use hal_xdata::header::{XData, XDataVersion};
    use hal_xdata::patch::PatchWriter;
    use hal_xdata::stream::{Endian, XReader};
    use pretty_assertions::assert_eq;

    use crate::document::Yaml;
    use crate::error::Result;
    use crate::node::Node;
    use crate::section::YamlSection;

    fn document(root: Node) -> Yaml {
        Yaml::builder()
            .xdata(
                XData::builder()
                    .endian(Endian::Big)
                    .version(XDataVersion::new(2, 0))
                    .build(),
            )
            .version(2)
            .root(root)
            .build()
    }

    #[test]
    fn write_and_read_section() -> Result<()> {
        let section = YamlSection::new(vec![document(Node::from(7)), document(Node::Invalid)]);

        let mut writer = PatchWriter::new(Endian::Big);
        writer.write_u32(0xDEADBEEF);
        section.write(&mut writer)?;
        let data = writer.finish()?;

        // first document right after the table, the second one after its 32 bytes
        #[rustfmt::skip]
        let table = [
            0x00, 0x00, 0x00, 0x02,
            0x00, 0x00, 0x00, 0x10,
            0x00, 0x00, 0x00, 0x30,
        ];
        assert_eq!(&data[4..16], &table);
        assert_eq!(data.len(), 16 + 32 + 28);

        let mut reader = XReader::new(&data, Endian::Big);
        reader.seek(4)?;
        let decoded = YamlSection::read(&mut reader)?;

        assert_eq!(reader.position(), 16);
        assert_eq!(decoded, section);
        assert_eq!(decoded[0].root.as_int(), 7);
        assert_eq!(decoded.len(), 2);

        Ok(())
    }

    #[test]
    fn empty_section() -> Result<()> {
        let mut writer = PatchWriter::new(Endian::Little);
        YamlSection::default().write(&mut writer)?;
        let data = writer.finish()?;
        assert_eq!(data, vec![0, 0, 0, 0]);

        let mut reader = XReader::new(&data, Endian::Little);
        assert!(YamlSection::read(&mut reader)?.is_empty());

        Ok(())
    }
}
