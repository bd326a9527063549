//! Decoded font handle.
//!
//! A [`Font`] owns everything decoded from one FNT resource and holds no
//! reference to the source stream. It is immutable once built, so it can be
//! shared across threads for read-only access.

use crate::error::{Error, Result};
use crate::fnt::{CharSet, FntHeader, FntVersion};
use crate::options::DecodeOptions;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A decoded raster font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    face_name: Option<String>,
    version: FntVersion,
    glyph_count: usize,
    width: u16,
    height: u16,
    byte_width: usize,
    charset: CharSet,
    header: FntHeader,
    bitmap: Vec<u8>,
}

impl Font {
    /// Open and decode a `.FON` file with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, &DecodeOptions::default())
    }

    /// Open and decode a `.FON` file.
    pub fn open_with_options(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Opening {}", path.display());
        let mut reader = BufReader::new(File::open(path)?);
        crate::decoder::decode_with_options(&mut reader, options)
    }

    /// Face name, if the resource had a readable one.
    pub fn face_name(&self) -> Option<&str> {
        self.face_name.as_deref()
    }

    /// FNT header version.
    pub fn version(&self) -> FntVersion {
        self.version
    }

    /// Number of glyphs, including the trailing default glyph.
    pub fn glyph_count(&self) -> usize {
        self.glyph_count
    }

    /// Glyph width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Glyph height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per pixel row.
    pub fn byte_width(&self) -> usize {
        self.byte_width
    }

    /// Declared character set.
    pub fn charset(&self) -> CharSet {
        self.charset
    }

    /// The resource header as read from the file.
    pub fn header(&self) -> &FntHeader {
        &self.header
    }

    /// All glyphs, row-major, back to back.
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    fn glyph_size(&self) -> usize {
        self.byte_width * usize::from(self.height)
    }

    /// Bytes needed to hold one glyph. The same for every glyph.
    pub fn required_buffer_size(&self, _glyph_index: usize) -> usize {
        self.glyph_size()
    }

    /// Row-major bytes of one glyph.
    pub fn glyph(&self, glyph_index: usize) -> Option<&[u8]> {
        if glyph_index >= self.glyph_count {
            return None;
        }
        let size = self.glyph_size();
        self.bitmap.get(glyph_index * size..(glyph_index + 1) * size)
    }

    /// Copy one glyph into `dst` and return the number of bytes written.
    ///
    /// Nothing is written on failure.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` if `glyph_index >= glyph_count()`
    /// - `BufferTooSmall` if `dst` is shorter than [`Self::required_buffer_size`]
    pub fn copy_glyph_bitmap(&self, glyph_index: usize, dst: &mut [u8]) -> Result<usize> {
        let glyph = self.glyph(glyph_index).ok_or(Error::IndexOutOfRange {
            index: glyph_index,
            count: self.glyph_count,
        })?;
        if dst.len() < glyph.len() {
            return Err(Error::BufferTooSmall {
                required: glyph.len(),
                provided: dst.len(),
            });
        }
        dst[..glyph.len()].copy_from_slice(glyph);
        Ok(glyph.len())
    }

    /// Whether pixel (`x`, `y`) of a glyph is set. Bit 7 of each byte is leftmost.
    pub fn is_pixel_set(&self, glyph_index: usize, x: u16, y: u16) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let glyph = self.glyph(glyph_index)?;
        let byte = glyph[usize::from(y) * self.byte_width + usize::from(x / 8)];
        Some(byte & (0x80 >> (x % 8)) != 0)
    }

    /// Glyph index for a character code.
    ///
    /// Codes outside the font's range map to `dfDefaultChar`, or to the
    /// trailing default glyph when that is out of range too.
    pub fn glyph_index_for(&self, code: u8) -> usize {
        let first = self.header.first_char;
        let last = self.header.last_char;
        if (first..=last).contains(&code) {
            return usize::from(code - first);
        }
        let default = usize::from(self.header.default_char);
        if default < self.glyph_count {
            default
        } else {
            self.glyph_count - 1
        }
    }

    /// Serializable snapshot of the font's metadata.
    pub fn summary(&self) -> FontSummary {
        FontSummary {
            face_name: self.face_name.clone(),
            version: self.version.to_string(),
            copyright: self.header.copyright_text(),
            glyph_count: self.glyph_count,
            width: self.width,
            height: self.height,
            byte_width: self.byte_width,
            charset: self.charset,
            points: self.header.points,
            ascent: self.header.ascent,
            weight: self.header.weight,
            italic: self.header.italic != 0,
            first_char: self.header.first_char,
            last_char: self.header.last_char,
            default_char: self.header.default_char,
            break_char: self.header.break_char,
        }
    }

    /// Release the font, freeing the face name and bitmap.
    pub fn release(self) {
        log::trace!(
            "Releasing font {:?} ({} bitmap bytes)",
            self.face_name,
            self.bitmap.len()
        );
    }
}

/// Font metadata for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontSummary {
    /// Face name
    pub face_name: Option<String>,
    /// "2.0" or "3.0"
    pub version: String,
    /// Copyright notice
    pub copyright: String,
    /// Glyph count including the default glyph
    pub glyph_count: usize,
    /// Glyph width in pixels
    pub width: u16,
    /// Glyph height in pixels
    pub height: u16,
    /// Bytes per pixel row
    pub byte_width: usize,
    /// Character set
    pub charset: CharSet,
    /// Nominal point size
    pub points: u16,
    /// Ascent in pixels
    pub ascent: u16,
    /// Weight (400 normal, 700 bold)
    pub weight: u16,
    /// Italic flag
    pub italic: bool,
    /// First character code
    pub first_char: u8,
    /// Last character code
    pub last_char: u8,
    /// Default character, relative to `first_char`
    pub default_char: u8,
    /// Break character, relative to `first_char`
    pub break_char: u8,
}

/// Staging area for a [`Font`] during decoding.
///
/// Only [`FontBuilder::build`] produces a `Font`, after checking the buffer
/// invariants, so a failed decode never hands out a partial font.
#[derive(Debug)]
pub(crate) struct FontBuilder {
    header: FntHeader,
    version: FntVersion,
    face_name: Option<String>,
    glyph_count: usize,
    bitmap: Vec<u8>,
}

impl FontBuilder {
    pub(crate) fn new(header: FntHeader, version: FntVersion) -> Self {
        Self {
            header,
            version,
            face_name: None,
            glyph_count: 0,
            bitmap: Vec::new(),
        }
    }

    pub(crate) fn face_name(mut self, face_name: Option<String>) -> Self {
        self.face_name = face_name;
        self
    }

    pub(crate) fn glyph_count(mut self, glyph_count: usize) -> Self {
        self.glyph_count = glyph_count;
        self
    }

    pub(crate) fn bitmap(mut self, bitmap: Vec<u8>) -> Self {
        self.bitmap = bitmap;
        self
    }

    pub(crate) fn build(self) -> Result<Font> {
        let width = self.header.pix_width;
        let height = self.header.pix_height;
        let byte_width = crate::bitmap::byte_width_for(width);

        if self.glyph_count == 0 {
            return Err(Error::InvalidHeader("font has no glyphs".to_string()));
        }
        let expected = byte_width * usize::from(height) * self.glyph_count;
        if self.bitmap.len() != expected {
            return Err(Error::InvalidHeader(format!(
                "bitmap holds {} bytes, expected {}",
                self.bitmap.len(),
                expected
            )));
        }

        Ok(Font {
            face_name: self.face_name,
            version: self.version,
            glyph_count: self.glyph_count,
            width,
            height,
            byte_width,
            charset: self.header.charset(),
            header: self.header,
            bitmap: self.bitmap,
        })
    }
}
