//! Error types for the font decoder.
//!
//! This module defines all error types that can occur while walking an NE
//! container, decoding an FNT resource or accessing glyph data.

/// Result type alias for decoder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during font decoding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error while seeking or reading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stub or NE signature mismatch, or the stream did not start at offset 0
    #[error("Bad magic: {0}")]
    BadMagic(String),

    /// Resource declares a vector font (dfType bit 0 set)
    #[error("Unsupported font type: 0x{0:04X} (not a raster font)")]
    UnsupportedFontType(u16),

    /// FNT version other than 2.0 or 3.0
    #[error("Unsupported FNT version: 0x{0:04X}")]
    UnsupportedVersion(u16),

    /// Short read of a fixed header, the character table or bitmap data
    #[error("Truncated resource at byte {offset} while reading {context}")]
    TruncatedResource {
        /// Absolute offset where the read started
        offset: u64,
        /// What was being read
        context: &'static str,
    },

    /// Container holds no RT_FONT resource entries
    #[error("No font resource found")]
    NoFontResourceFound,

    /// Glyph index past the end of the font
    #[error("Glyph index {index} out of range (font has {count} glyphs)")]
    IndexOutOfRange {
        /// Requested glyph index
        index: usize,
        /// Number of glyphs in the font
        count: usize,
    },

    /// Destination buffer cannot hold one glyph
    #[error("Buffer too small: need {required} bytes, got {provided}")]
    BufferTooSmall {
        /// Bytes needed for one glyph
        required: usize,
        /// Bytes available in the destination
        provided: usize,
    },

    /// Bitmap buffer allocation failed
    #[error("Out of memory allocating {0} bytes")]
    OutOfMemory(usize),

    /// Header field values are inconsistent
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Face name is missing or unreadable and decoding is strict
    #[error("Face name missing or unreadable")]
    MissingFaceName,

    /// A configured decode limit was hit
    #[error("{what} exceeds limit of {limit}")]
    LimitExceeded {
        /// Quantity that was too large
        what: &'static str,
        /// Configured limit
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_magic_error() {
        let err = Error::BadMagic("MZ signature 0x1234".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Bad magic"));
        assert!(msg.contains("0x1234"));
    }

    #[test]
    fn test_truncated_resource_error() {
        let err = Error::TruncatedResource {
            offset: 1234,
            context: "character table",
        };
        let msg = format!("{}", err);
        assert!(msg.contains("1234"));
        assert!(msg.contains("character table"));
    }

    #[test]
    fn test_unsupported_font_type_error() {
        let err = Error::UnsupportedFontType(0x0001);
        assert!(format!("{}", err).contains("0x0001"));
    }

    #[test]
    fn test_index_out_of_range_error() {
        let err = Error::IndexOutOfRange { index: 3, count: 3 };
        let msg = format!("{}", err);
        assert!(msg.contains("3 out of range"));
        assert!(msg.contains("3 glyphs"));
    }

    #[test]
    fn test_buffer_too_small_error() {
        let err = Error::BufferTooSmall {
            required: 16,
            provided: 8,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("16"));
        assert!(msg.contains("8"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
