//! String deduplication for writers.

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::patch::{OffsetMode, PatchWriter, Placeholder};

/// Collects every string referenced by a document so each one is written only once
///
/// Strings are flushed in the order they were first seen, which keeps repeated encodes of the
/// same document byte identical.
#[derive(Debug, Default)]
pub struct StringPool {
    strings: IndexMap<String, Vec<Placeholder>>,
}

impl StringPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `site` as a reference to `value`
    pub fn intern(&mut self, site: Placeholder, value: &str) {
        match self.strings.get_mut(value) {
            Some(sites) => sites.push(site),
            None => {
                self.strings.insert(value.to_owned(), vec![site]);
            }
        }
    }

    /// Number of unique strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether no string has been interned
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Number of fields referencing `value`
    pub fn references(&self, value: &str) -> usize {
        self.strings.get(value).map_or(0, Vec::len)
    }

    /// Unique strings in write order
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }

    /// Write every string as a HAL string, pointing all of its references at it
    #[instrument(skip_all, fields(strings = self.strings.len()), err)]
    pub fn flush(self, writer: &mut PatchWriter, mode: OffsetMode) -> Result<()> {
        for (value, sites) in self.strings {
            let target = writer.position();
            for site in sites {
                writer.resolve(site, target, mode)?;
            }
            writer.write_hal_string(&value);
        }

        debug!(end = writer.position(), "flushed string pool");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::intern::StringPool;
    use crate::patch::{OffsetMode, PatchWriter};
    use crate::stream::Endian;

    #[test]
    fn duplicate_strings_are_stored_once() -> Result<()> {
        let mut writer = PatchWriter::new(Endian::Little);
        let mut pool = StringPool::new();

        for value in ["Kirby", "Meta", "Kirby", "Kirby"] {
            let site = writer.reserve();
            pool.intern(site, value);
        }

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.references("Kirby"), 3);
        assert_eq!(pool.references("Meta"), 1);
        assert_eq!(pool.references("Dedede"), 0);
        assert_eq!(pool.strings().collect::<Vec<_>>(), vec!["Kirby", "Meta"]);

        pool.flush(&mut writer, OffsetMode::Absolute)?;

        #[rustfmt::skip]
        let expected = vec![
            0x10, 0x00, 0x00, 0x00,
            0x1C, 0x00, 0x00, 0x00,
            0x10, 0x00, 0x00, 0x00,
            0x10, 0x00, 0x00, 0x00,
            // Kirby
            0x05, 0x00, 0x00, 0x00,
            b'K', b'i', b'r', b'b', b'y', 0x00, 0x00, 0x00,
            // Meta
            0x04, 0x00, 0x00, 0x00,
            b'M', b'e', b't', b'a', 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(writer.finish()?, expected);

        Ok(())
    }

    #[test]
    fn flush_relative() -> Result<()> {
        let mut writer = PatchWriter::new(Endian::Big);
        let mut pool = StringPool::new();

        let first = writer.reserve();
        pool.intern(first, "a");
        let second = writer.reserve();
        pool.intern(second, "a");

        pool.flush(&mut writer, OffsetMode::Relative)?;

        #[rustfmt::skip]
        let expected = vec![
            0x00, 0x00, 0x00, 0x08,
            0x00, 0x00, 0x00, 0x04,
            0x00, 0x00, 0x00, 0x01,
            b'a', 0x00, 0x00, 0x00,
        ];
        assert_eq!(writer.finish()?, expected);

        Ok(())
    }

    #[test]
    fn flush_empty_pool_writes_nothing() -> Result<()> {
        let mut writer = PatchWriter::new(Endian::Little);
        StringPool::new().flush(&mut writer, OffsetMode::Absolute)?;
        assert!(writer.finish()?.is_empty());

        Ok(())
    }
}
