//! Decoder configuration for controlling lenient/strict decoding modes.

/// Decode options for controlling error handling and resource limits.
///
/// These options let callers trade strictness for compatibility with
/// fonts produced by sloppy resource compilers.
///
/// # Example
///
/// ```
/// use winfont::options::DecodeOptions;
///
/// // Lenient mode - missing face names are tolerated (default)
/// let lenient = DecodeOptions::lenient();
///
/// // Strict mode - a missing face name fails the decode
/// let strict = DecodeOptions::strict();
///
/// // Custom configuration
/// let custom = DecodeOptions {
///     require_face_name: false,
///     max_bitmap_bytes: 1024 * 1024,
///     max_resource_types: 64,
/// };
/// # let _ = (lenient, strict, custom);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Fail with `MissingFaceName` when the face name cannot be read
    pub require_face_name: bool,

    /// Maximum size of one font's decoded bitmap buffer in bytes
    ///
    /// Checked before allocation. Default: 64 MB. Set to 0 to disable check.
    pub max_bitmap_bytes: usize,

    /// Maximum number of resource-type entries scanned in the resource table
    ///
    /// Default: 1024. Set to 0 to disable check.
    pub max_resource_types: usize,
}

impl Default for DecodeOptions {
    /// Default configuration: lenient mode
    fn default() -> Self {
        Self::lenient()
    }
}

impl DecodeOptions {
    /// Strict mode: a missing or unreadable face name is an error
    pub fn strict() -> Self {
        Self {
            require_face_name: true,
            ..Self::lenient()
        }
    }

    /// Lenient mode: decode proceeds without a face name
    pub fn lenient() -> Self {
        Self {
            require_face_name: false,
            max_bitmap_bytes: 64 * 1024 * 1024, // 64 MB
            max_resource_types: 1024,
        }
    }

    /// Check a bitmap size against `max_bitmap_bytes`
    pub(crate) fn bitmap_size_allowed(&self, bytes: usize) -> bool {
        self.max_bitmap_bytes == 0 || bytes <= self.max_bitmap_bytes
    }

    /// Check a resource-type count against `max_resource_types`
    pub(crate) fn resource_types_allowed(&self, scanned: usize) -> bool {
        self.max_resource_types == 0 || scanned <= self.max_resource_types
    }
}
