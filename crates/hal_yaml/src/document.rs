//! Complete YAML documents.

use std::io::{Cursor, Read, Write};

use binrw::{BinRead, BinWrite};
use bon::Builder;
use hal_xdata::error::Error as XDataError;
use hal_xdata::header::XData;
use hal_xdata::stream::{Endian, XReader};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::node::Node;
use crate::read::read_node;
use crate::version::FormatVersion;
use crate::write::write_tree;

/// Magic following the XData header
pub const YAML_MAGIC: &[u8; 4] = b"YAML";

/// Version used for new documents
pub const DEFAULT_VERSION: u32 = 5;

#[derive(BinRead, BinWrite, Debug)]
#[bw(magic = b"YAML")]
struct YamlHeader {
    version: u32,
}

/// A YAML document: an XData header, the YAML version and a tree of nodes
///
/// ```
/// use hal_yaml::{Node, Yaml};
///
/// # fn doit() -> hal_yaml::error::Result<()> {
/// let mut root = Node::hash();
/// root.insert("Name", "Kirby")?;
///
/// let yaml = Yaml::builder().root(root).build();
/// let data = yaml.to_bytes()?;
///
/// assert_eq!(&data[..4], b"XBIN");
/// assert_eq!(Yaml::read(&data)?, yaml);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Yaml {
    /// File header
    #[builder(default)]
    pub xdata: XData,

    /// Tree version, see [`FormatVersion`]
    #[builder(default = DEFAULT_VERSION)]
    pub version: u32,

    /// Root of the tree
    #[builder(default = Node::hash())]
    pub root: Node,
}

impl Default for Yaml {
    fn default() -> Self {
        Yaml::builder().build()
    }
}

impl Yaml {
    /// Layout features used by this document
    pub fn format(&self) -> FormatVersion {
        FormatVersion::new(self.xdata.version, self.version)
    }

    /// Parse a document that starts at the beginning of `data`
    #[instrument(skip_all, fields(length = data.len()), err)]
    pub fn read(data: &[u8]) -> Result<Yaml> {
        let mut reader = XReader::new(data, Endian::Little);
        let xdata = XData::read(&mut reader)?;

        let magic = reader.read_array::<4>()?;
        if &magic != YAML_MAGIC {
            return Err(XDataError::invalid_magic(YAML_MAGIC, &magic).into());
        }

        let start = reader.position();
        let mut cursor = Cursor::new(reader.slice_from(start)?);
        let header = YamlHeader::read_options(&mut cursor, xdata.endian, ())?;
        reader.seek(start + cursor.position() as usize)?;

        let format = FormatVersion::new(xdata.version, header.version);
        debug!(version = header.version, ?format, "reading yaml");

        let root = read_node(&mut reader, format)?;

        Ok(Yaml {
            xdata,
            version: header.version,
            root,
        })
    }

    /// Read a whole document from `reader`
    pub fn read_from(mut reader: impl Read) -> Result<Yaml> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::read(&data)
    }

    /// Encode the document
    #[instrument(skip(self), fields(version = self.version), err)]
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = self.xdata.writer();
        let placeholders = self.xdata.write_header(&mut writer);

        let mut header = Cursor::new(Vec::new());
        YamlHeader {
            version: self.version,
        }
        .write_options(&mut header, self.xdata.endian, ())?;
        writer.write_bytes(header.get_ref());

        write_tree(&mut writer, &self.root, self.format())?;
        self.xdata.finish(&mut writer, placeholders)?;

        Ok(writer.finish()?)
    }

    /// Encode the document into `writer`
    pub fn write_to(&self, mut writer: impl Write) -> Result<()> {
        writer.write_all(&self.to_bytes()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use hal_xdata::error::Error as XDataError;
    use hal_xdata::header::{XData, XDataVersion};
    use hal_xdata::stream::Endian;
    use pretty_assertions::assert_eq;

    use crate::document::Yaml;
    use crate::error::{Error, Result};
    use crate::node::Node;

    #[test]
    fn write_empty_document() -> Result<()> {
        let yaml = Yaml::default();

        #[rustfmt::skip]
        let expected = vec![
            b'X', b'B', b'I', b'N',
            0x34, 0x12,
            0x04, 0x00,
            0x24, 0x00, 0x00, 0x00,
            0xE9, 0xFD, 0x00, 0x00,
            0x24, 0x00, 0x00, 0x00,
            b'Y', b'A', b'M', b'L',
            0x05, 0x00, 0x00, 0x00,
            // Empty hash
            0x05, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            // Footer
            b'R', b'L', b'O', b'C',
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(yaml.to_bytes()?, expected);

        Ok(())
    }

    #[test]
    fn read_big_endian_document() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            b'X', b'B', b'I', b'N',
            0x12, 0x34,
            0x02, 0x00,
            0x00, 0x00, 0x00, 0x20,
            0x00, 0x00, 0xFD, 0xE9,
            b'Y', b'A', b'M', b'L',
            0x00, 0x00, 0x00, 0x03,
            // Int
            0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x2A,
        ];

        let yaml = Yaml::read(&input)?;
        assert_eq!(yaml.xdata.endian, Endian::Big);
        assert_eq!(yaml.xdata.version, XDataVersion::new(2, 0));
        assert_eq!(yaml.version, 3);
        assert_eq!(yaml.root, Node::Int(42));
        assert!(!yaml.format().has_footer);

        assert_eq!(yaml.to_bytes()?, input.to_vec());

        Ok(())
    }

    #[test]
    fn read_wrong_magic() {
        let mut data = Yaml::default().to_bytes().unwrap();
        data[20] = b'N';

        assert!(matches!(
            Yaml::read(&data),
            Err(Error::XDataError(XDataError::InvalidMagic { expected, found }))
                if expected == "YAML" && found == "NAML"
        ));

        let mut data = Yaml::default().to_bytes().unwrap();
        data[0] = b'Y';

        assert!(matches!(
            Yaml::read(&data),
            Err(Error::XDataError(XDataError::InvalidMagic { expected, .. })) if expected == "XBIN"
        ));
    }

    #[test]
    fn documents_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Yaml>();
        assert_send::<crate::section::YamlSection>();
        assert_send::<hal_xdata::patch::PatchWriter>();
    }

    #[test]
    fn read_from_and_write_to() -> Result<()> {
        let yaml = Yaml::builder()
            .xdata(XData::builder().endian(Endian::Big).build())
            .version(4)
            .root(Node::from_iter([Node::from("Kirby"), Node::from(true)]))
            .build();

        let mut data = Vec::new();
        yaml.write_to(&mut data)?;

        assert_eq!(Yaml::read_from(data.as_slice())?, yaml);

        Ok(())
    }
}
