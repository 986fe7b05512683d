//! Deferred offsets.
//!
//! HAL files are full of 4 byte fields pointing forward to data that has not been written yet.
//! [`PatchWriter::reserve`] writes a sentinel and hands back a [`Placeholder`]; once the position
//! of the referenced data is known the placeholder is resolved into a [`Patch`]. Patches are only
//! applied to the buffer in [`PatchWriter::finish`], so the write cursor never moves backwards.

use std::ops::{Deref, DerefMut};

use tracing::{instrument, trace};

use crate::error::{Error, Result};
use crate::stream::{Endian, XWriter};

/// How a stored offset relates to the data it points at
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum OffsetMode {
    /// The stored value is the absolute position of the data
    #[default]
    Absolute,

    /// The stored value is the distance from the offset field to the data, wrapping at 32 bits
    Relative,
}

impl OffsetMode {
    /// Pick [`OffsetMode::Relative`] when `relative` is set
    pub fn from_relative(relative: bool) -> Self {
        if relative {
            OffsetMode::Relative
        } else {
            OffsetMode::Absolute
        }
    }
}

/// A reserved 4 byte offset field that still has to be resolved
///
/// Placeholders can not be copied, and resolving one consumes it, so every field is
/// backfilled exactly once.
#[must_use = "a placeholder must be resolved before the writer is finished"]
#[derive(Debug, PartialEq, Eq)]
pub struct Placeholder {
    position: usize,
}

impl Placeholder {
    /// Position of the reserved field
    pub fn position(&self) -> usize {
        self.position
    }
}

/// A resolved offset waiting to be written into the buffer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Position of the offset field
    pub position: usize,

    /// Value that will be stored in the field
    pub value: u32,
}

/// Writer that tracks reserved offset fields and backfills them when finished
///
/// ```
/// use hal_xdata::patch::{OffsetMode, PatchWriter};
/// use hal_xdata::stream::Endian;
///
/// # fn doit() -> hal_xdata::error::Result<()> {
/// let mut writer = PatchWriter::new(Endian::Little);
/// let offset = writer.reserve();
/// writer.write_u32(0xAABBCCDD);
/// writer.resolve_here(offset, OffsetMode::Absolute)?;
/// writer.write_u8(7);
///
/// assert_eq!(writer.finish()?, vec![0x08, 0, 0, 0, 0xDD, 0xCC, 0xBB, 0xAA, 7]);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug)]
pub struct PatchWriter {
    writer: XWriter,
    patches: Vec<Patch>,
    outstanding: usize,
}

impl PatchWriter {
    /// Value written into a reserved field until it is patched
    pub const SENTINEL: u32 = u32::MAX;

    /// Create an empty writer
    pub fn new(endian: Endian) -> PatchWriter {
        PatchWriter {
            writer: XWriter::new(endian),
            patches: Vec::new(),
            outstanding: 0,
        }
    }

    /// Write a sentinel at the cursor and return the placeholder for it
    pub fn reserve(&mut self) -> Placeholder {
        let position = self.writer.position();
        self.writer.write_u32(Self::SENTINEL);
        self.outstanding += 1;
        Placeholder { position }
    }

    /// Resolve a placeholder so it points at `target`
    pub fn resolve(
        &mut self,
        placeholder: Placeholder,
        target: usize,
        mode: OffsetMode,
    ) -> Result<()> {
        let position = placeholder.position;
        let overflow = || Error::OffsetOverflow {
            from: position,
            to: target,
        };
        let field = u32::try_from(position).map_err(|_| overflow())?;
        let address = u32::try_from(target).map_err(|_| overflow())?;
        let value = match mode {
            OffsetMode::Absolute => address,
            OffsetMode::Relative => address.wrapping_sub(field),
        };

        trace!(position, target, ?mode, "resolved offset");

        self.outstanding -= 1;
        self.patches.push(Patch { position, value });
        Ok(())
    }

    /// Resolve a placeholder so it points at the current position
    pub fn resolve_here(&mut self, placeholder: Placeholder, mode: OffsetMode) -> Result<()> {
        let target = self.writer.position();
        self.resolve(placeholder, target, mode)
    }

    /// Patches resolved so far, in resolution order
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Number of placeholders that have been reserved but not resolved
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Apply every patch and return the finished buffer
    ///
    /// # Panics
    ///
    /// Panics if a placeholder was never resolved, which would leave a sentinel in the output.
    #[instrument(skip(self), fields(patches = self.patches.len()), err)]
    pub fn finish(self) -> Result<Vec<u8>> {
        assert_eq!(
            self.outstanding, 0,
            "every placeholder must be resolved before finishing"
        );

        let PatchWriter {
            mut writer,
            patches,
            ..
        } = self;

        for patch in patches {
            writer.seek(patch.position)?;
            writer.write_u32(patch.value);
        }

        Ok(writer.into_inner())
    }
}

impl Deref for PatchWriter {
    type Target = XWriter;

    fn deref(&self) -> &Self::Target {
        &self.writer
    }
}

impl DerefMut for PatchWriter {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.writer
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::patch::{OffsetMode, Patch, PatchWriter};
    use crate::stream::Endian;

    #[test]
    fn reserve_writes_sentinel() {
        let mut writer = PatchWriter::new(Endian::Little);
        let placeholder = writer.reserve();

        assert_eq!(placeholder.position(), 0);
        assert_eq!(writer.get_ref(), &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(writer.outstanding(), 1);

        writer.resolve(placeholder, 0, OffsetMode::Absolute).unwrap();
        assert_eq!(writer.outstanding(), 0);
    }

    #[test]
    fn resolve_absolute_and_relative() -> Result<()> {
        let mut writer = PatchWriter::new(Endian::Big);
        writer.write_u32(0);
        let absolute = writer.reserve();
        let relative = writer.reserve();
        writer.write_u32(0xCAFEBABE);

        writer.resolve(absolute, 12, OffsetMode::Absolute)?;
        writer.resolve(relative, 12, OffsetMode::Relative)?;

        assert_eq!(
            writer.patches(),
            &[
                Patch {
                    position: 4,
                    value: 12
                },
                Patch {
                    position: 8,
                    value: 4
                }
            ]
        );

        #[rustfmt::skip]
        let expected = vec![
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x0C,
            0x00, 0x00, 0x00, 0x04,
            0xCA, 0xFE, 0xBA, 0xBE,
        ];
        assert_eq!(writer.finish()?, expected);

        Ok(())
    }

    #[test]
    fn resolve_relative_backwards() -> Result<()> {
        let mut writer = PatchWriter::new(Endian::Little);
        writer.write_u32(0x11111111);
        writer.write_u32(0x22222222);
        let placeholder = writer.reserve();

        writer.resolve(placeholder, 0, OffsetMode::Relative)?;

        #[rustfmt::skip]
        let expected = vec![
            0x11, 0x11, 0x11, 0x11,
            0x22, 0x22, 0x22, 0x22,
            0xF8, 0xFF, 0xFF, 0xFF,
        ];
        assert_eq!(writer.finish()?, expected);

        Ok(())
    }

    #[test]
    fn resolution_keeps_cursor_monotonic() -> Result<()> {
        let mut writer = PatchWriter::new(Endian::Little);
        let placeholder = writer.reserve();
        writer.write_u16(1);
        writer.resolve_here(placeholder, OffsetMode::Relative)?;

        assert_eq!(writer.position(), 6);
        // the buffer is untouched until finish
        assert_eq!(writer.get_ref(), &[0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00]);
        assert_eq!(writer.finish()?, vec![0x06, 0, 0, 0, 0x01, 0x00]);

        Ok(())
    }

    #[test]
    fn relative_offset_backwards_fails() {
        let mut writer = PatchWriter::new(Endian::Little);
        writer.write_u32(0);
        let placeholder = writer.reserve();

        assert!(writer
            .resolve(placeholder, 0, OffsetMode::Relative)
            .is_err());
    }

    #[test]
    #[should_panic(expected = "every placeholder must be resolved")]
    fn finish_with_unresolved_placeholder_panics() {
        let mut writer = PatchWriter::new(Endian::Little);
        let _placeholder = writer.reserve();
        let _ = writer.finish();
    }
}
