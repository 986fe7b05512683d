//! Version dependent layout rules.

use hal_xdata::header::XDataVersion;
use hal_xdata::patch::OffsetMode;

/// First YAML version with a key permutation table after every hash
pub const KEY_PERMUTATION_VERSION: u32 = 4;

/// First YAML version storing offsets relative to their own field
pub const RELATIVE_OFFSET_VERSION: u32 = 5;

/// Layout features enabled by a document's versions
///
/// ```
/// use hal_xdata::header::XDataVersion;
/// use hal_yaml::version::FormatVersion;
///
/// let format = FormatVersion::new(XDataVersion::new(2, 0), 4);
/// assert!(format.has_key_permutation_table);
/// assert!(!format.offsets_are_relative);
/// assert!(!format.has_footer);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FormatVersion {
    /// Offsets are relative to the field storing them
    pub offsets_are_relative: bool,

    /// Hashes are followed by a table restoring insertion order
    pub has_key_permutation_table: bool,

    /// The document ends in an RLOC footer
    pub has_footer: bool,
}

impl FormatVersion {
    /// Features of a document with the given XData and YAML versions
    pub fn new(xdata: XDataVersion, yaml: u32) -> Self {
        FormatVersion {
            has_footer: xdata.has_footer(),
            ..Self::tree(yaml)
        }
    }

    /// Features of a tree stored without an XData header
    pub fn tree(yaml: u32) -> Self {
        FormatVersion {
            offsets_are_relative: yaml >= RELATIVE_OFFSET_VERSION,
            has_key_permutation_table: yaml >= KEY_PERMUTATION_VERSION,
            has_footer: false,
        }
    }

    /// How offsets inside the tree are stored
    pub fn offset_mode(&self) -> OffsetMode {
        OffsetMode::from_relative(self.offsets_are_relative)
    }
}
