//! FNT font resource decoder.
//!
//! Each `RT_FONT` resource starts with a fixed header (called FONTINFO or
//! FONTDIRENTRY in Windows documentation). Two on-disk versions exist:
//!
//! - **2.0** (`0x0200`): 118-byte base header, character table entries of
//!   4 bytes (u16 width, u16 bitmap offset).
//! - **3.0** (`0x0300`): the same base header followed by an extension
//!   block (flags, A/B/C spacing, color table pointer), character table
//!   entries of 6 bytes (u16 width, u32 bitmap offset).
//!
//! The glyph bitmaps themselves are located through `dfBitsOffset`, not
//! through the per-character offsets.

use crate::bitmap::{byte_width_for, read_glyph_bitmaps};
use crate::error::{Error, Result};
use crate::font::{Font, FontBuilder};
use crate::options::DecodeOptions;
use crate::reader::ByteCursor;
use bitflags::bitflags;
use serde::Serialize;
use std::fmt;
use std::io::{Read, Seek};

/// Size of the base FNT header shared by both versions.
pub const FNT_HEADER_LEN: u64 = 118;
/// Size of the version 3.0 extension block.
pub const V3_EXTENSION_LEN: u64 = 22;
/// Size of `dfCopyright`.
pub const COPYRIGHT_LEN: usize = 60;

/// FNT header version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FntVersion {
    /// Windows 2.x layout
    V2,
    /// Windows 3.x layout
    V3,
}

impl FntVersion {
    /// Map a raw `dfVersion` value.
    pub fn from_raw(raw: u16) -> Result<Self> {
        match raw {
            0x0200 => Ok(FntVersion::V2),
            0x0300 => Ok(FntVersion::V3),
            other => Err(Error::UnsupportedVersion(other)),
        }
    }

    /// Size of one character table entry.
    pub fn char_entry_len(self) -> u64 {
        match self {
            FntVersion::V2 => 4,
            FntVersion::V3 => 6,
        }
    }
}

impl fmt::Display for FntVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FntVersion::V2 => write!(f, "2.0"),
            FntVersion::V3 => write!(f, "3.0"),
        }
    }
}

bitflags! {
    /// `dfType` bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FontType: u16 {
        /// Vector (stroke) font; raster when clear
        const VECTOR = 0x0001;
        /// Font data lives in memory rather than in the file
        const MEMORY = 0x0004;
        /// Device font rather than GDI font
        const DEVICE = 0x0080;
    }
}

bitflags! {
    /// `dfFlags` bits of the 3.0 extension block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FontFlags: u32 {
        /// Fixed pitch
        const FIXED = 0x0001;
        /// Proportional pitch
        const PROPORTIONAL = 0x0002;
        /// ABC fixed
        const ABC_FIXED = 0x0004;
        /// ABC proportional
        const ABC_PROPORTIONAL = 0x0008;
        /// One color
        const COLOR_1 = 0x0010;
        /// 16 colors
        const COLOR_16 = 0x0020;
        /// 256 colors
        const COLOR_256 = 0x0040;
        /// RGB color
        const COLOR_RGB = 0x0080;
    }
}

/// Character set declared by `dfCharSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CharSet {
    /// ANSI (Windows-1252)
    Ansi,
    /// System default
    Default,
    /// Symbol
    Symbol,
    /// Macintosh
    Mac,
    /// Shift-JIS
    ShiftJis,
    /// Hangul
    Hangul,
    /// Johab
    Johab,
    /// GB2312
    Gb2312,
    /// Big5
    ChineseBig5,
    /// Greek
    Greek,
    /// Turkish
    Turkish,
    /// Vietnamese
    Vietnamese,
    /// Hebrew
    Hebrew,
    /// Arabic
    Arabic,
    /// Baltic
    Baltic,
    /// Cyrillic
    Russian,
    /// Thai
    Thai,
    /// Central European
    EastEurope,
    /// OEM, normally code page 437
    Oem,
    /// Unrecognized value
    Other(u8),
}

impl From<u8> for CharSet {
    fn from(raw: u8) -> Self {
        match raw {
            0 => CharSet::Ansi,
            1 => CharSet::Default,
            2 => CharSet::Symbol,
            77 => CharSet::Mac,
            128 => CharSet::ShiftJis,
            129 => CharSet::Hangul,
            130 => CharSet::Johab,
            134 => CharSet::Gb2312,
            136 => CharSet::ChineseBig5,
            161 => CharSet::Greek,
            162 => CharSet::Turkish,
            163 => CharSet::Vietnamese,
            177 => CharSet::Hebrew,
            178 => CharSet::Arabic,
            186 => CharSet::Baltic,
            204 => CharSet::Russian,
            222 => CharSet::Thai,
            238 => CharSet::EastEurope,
            255 => CharSet::Oem,
            other => CharSet::Other(other),
        }
    }
}

/// The base FNT header, decoded field by field.
///
/// Pointer fields (`device`, `face`, `bits_pointer`, `bits_offset`) are
/// relative to the start of the resource and meaningless outside the file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct FntHeader {
    pub version: u16,
    pub size: u32,
    pub copyright: [u8; COPYRIGHT_LEN],
    pub font_type: u16,
    pub points: u16,
    pub vert_res: u16,
    pub horiz_res: u16,
    pub ascent: u16,
    pub internal_leading: u16,
    pub external_leading: u16,
    pub italic: u8,
    pub underline: u8,
    pub strike_out: u8,
    pub weight: u16,
    pub charset: u8,
    pub pix_width: u16,
    pub pix_height: u16,
    pub pitch_and_family: u8,
    pub avg_width: u16,
    pub max_width: u16,
    pub first_char: u8,
    pub last_char: u8,
    pub default_char: u8,
    pub break_char: u8,
    pub width_bytes: u16,
    pub device: u32,
    pub face: u32,
    pub bits_pointer: u32,
    pub bits_offset: u32,
    pub reserved: u8,
}

impl FntHeader {
    /// Read the 118-byte base header at the cursor.
    pub fn read<R: Read + Seek>(cursor: &mut ByteCursor<'_, R>) -> Result<Self> {
        const CTX: &str = "FNT header";
        Ok(Self {
            version: cursor.read_u16(CTX)?,
            size: cursor.read_u32(CTX)?,
            copyright: cursor.read_array(CTX)?,
            font_type: cursor.read_u16(CTX)?,
            points: cursor.read_u16(CTX)?,
            vert_res: cursor.read_u16(CTX)?,
            horiz_res: cursor.read_u16(CTX)?,
            ascent: cursor.read_u16(CTX)?,
            internal_leading: cursor.read_u16(CTX)?,
            external_leading: cursor.read_u16(CTX)?,
            italic: cursor.read_u8(CTX)?,
            underline: cursor.read_u8(CTX)?,
            strike_out: cursor.read_u8(CTX)?,
            weight: cursor.read_u16(CTX)?,
            charset: cursor.read_u8(CTX)?,
            pix_width: cursor.read_u16(CTX)?,
            pix_height: cursor.read_u16(CTX)?,
            pitch_and_family: cursor.read_u8(CTX)?,
            avg_width: cursor.read_u16(CTX)?,
            max_width: cursor.read_u16(CTX)?,
            first_char: cursor.read_u8(CTX)?,
            last_char: cursor.read_u8(CTX)?,
            default_char: cursor.read_u8(CTX)?,
            break_char: cursor.read_u8(CTX)?,
            width_bytes: cursor.read_u16(CTX)?,
            device: cursor.read_u32(CTX)?,
            face: cursor.read_u32(CTX)?,
            bits_pointer: cursor.read_u32(CTX)?,
            bits_offset: cursor.read_u32(CTX)?,
            reserved: cursor.read_u8(CTX)?,
        })
    }

    /// Decoded `dfType` bits.
    pub fn font_type(&self) -> FontType {
        FontType::from_bits_retain(self.font_type)
    }

    /// True unless the vector bit is set.
    pub fn is_raster(&self) -> bool {
        !self.font_type().contains(FontType::VECTOR)
    }

    /// Decoded `dfCharSet`.
    pub fn charset(&self) -> CharSet {
        CharSet::from(self.charset)
    }

    /// `dfCopyright` up to the first NUL.
    pub fn copyright_text(&self) -> String {
        let end = self
            .copyright
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(COPYRIGHT_LEN);
        String::from_utf8_lossy(&self.copyright[..end]).into_owned()
    }

    /// Number of glyphs: the inclusive character range plus the default glyph.
    pub fn glyph_count(&self) -> Result<usize> {
        if self.last_char < self.first_char {
            return Err(Error::InvalidHeader(format!(
                "last char {} precedes first char {}",
                self.last_char, self.first_char
            )));
        }
        Ok(usize::from(self.last_char - self.first_char) + 2)
    }

    fn log_fields(&self, base: u64) {
        log::debug!(
            "FNT at {}: version 0x{:04X}, size {}, type 0x{:04X}, {}pt, res {}x{}",
            base,
            self.version,
            self.size,
            self.font_type,
            self.points,
            self.horiz_res,
            self.vert_res
        );
        log::debug!(
            "  copyright {:?}, charset {}, pixels {}x{}, avg/max width {}/{}",
            self.copyright_text(),
            self.charset,
            self.pix_width,
            self.pix_height,
            self.avg_width,
            self.max_width
        );
        log::debug!(
            "  chars {}..={} default {} break {}, width bytes {}, face +{}, bits +{}",
            self.first_char,
            self.last_char,
            self.default_char,
            self.break_char,
            self.width_bytes,
            self.face,
            self.bits_offset
        );
    }
}

/// The 3.0 extension block. Read to keep the cursor aligned; not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V3Extension {
    /// `dfFlags`
    pub flags: FontFlags,
    /// `dfAspace`
    pub a_space: u16,
    /// `dfBspace`
    pub b_space: u16,
    /// `dfCspace`
    pub c_space: u16,
    /// `dfColorPointer`
    pub color_pointer: u32,
}

impl V3Extension {
    /// Read the extension block, including its reserved tail.
    pub fn read<R: Read + Seek>(cursor: &mut ByteCursor<'_, R>) -> Result<Self> {
        const CTX: &str = "FNT 3.0 extension";
        let ext = Self {
            flags: FontFlags::from_bits_retain(cursor.read_u32(CTX)?),
            a_space: cursor.read_u16(CTX)?,
            b_space: cursor.read_u16(CTX)?,
            c_space: cursor.read_u16(CTX)?,
            color_pointer: cursor.read_u32(CTX)?,
        };
        cursor.skip(8, CTX)?;
        Ok(ext)
    }
}

/// One character table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharTableEntry {
    /// Glyph advance width in pixels
    pub width: u16,
    /// Offset of the glyph bitmap, relative to the resource
    pub offset: u32,
}

/// Read `count` character table entries in the layout of `version`.
pub fn read_char_table<R: Read + Seek>(
    cursor: &mut ByteCursor<'_, R>,
    version: FntVersion,
    count: usize,
) -> Result<Vec<CharTableEntry>> {
    const CTX: &str = "character table";
    let start = cursor.position();
    let mut table = Vec::with_capacity(count);
    for _ in 0..count {
        let width = cursor.read_u16(CTX)?;
        let offset = match version {
            FntVersion::V2 => u32::from(cursor.read_u16(CTX)?),
            FntVersion::V3 => cursor.read_u32(CTX)?,
        };
        table.push(CharTableEntry { width, offset });
    }
    debug_assert_eq!(cursor.position() - start, count as u64 * version.char_entry_len());
    Ok(table)
}

/// Everything in a font resource up to the start of the bitmap data.
#[derive(Debug, Clone)]
pub struct ResourceHeader {
    /// Absolute offset of the resource
    pub base: u64,
    /// The base header
    pub header: FntHeader,
    /// Validated header version
    pub version: FntVersion,
    /// Face name, if readable
    pub face_name: Option<String>,
    /// Character table
    pub char_table: Vec<CharTableEntry>,
}

impl ResourceHeader {
    /// Number of glyphs, including the default glyph.
    pub fn glyph_count(&self) -> usize {
        self.char_table.len()
    }

    /// Absolute offset of the glyph bitmap data.
    pub fn bitmap_offset(&self) -> u64 {
        self.base + u64::from(self.header.bits_offset)
    }
}

fn read_face_name<R: Read + Seek>(
    cursor: &mut ByteCursor<'_, R>,
    base: u64,
    header: &FntHeader,
    options: &DecodeOptions,
) -> Result<Option<String>> {
    let name = if header.face == 0 {
        None
    } else {
        cursor
            .read_cstring_at(base + u64::from(header.face))?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    };

    match name {
        Some(name) => {
            log::debug!("  face {:?}", name);
            Ok(Some(name))
        },
        None if options.require_face_name => Err(Error::MissingFaceName),
        None => {
            log::warn!("Font resource at {} has no readable face name", base);
            Ok(None)
        },
    }
}

/// Parse a font resource up to the bitmap data.
///
/// On success the cursor sits right after the character table, which for a
/// well-formed resource is [`ResourceHeader::bitmap_offset`].
///
/// # Errors
///
/// - `UnsupportedFontType` for vector fonts
/// - `UnsupportedVersion` for versions other than 2.0 and 3.0
/// - `InvalidHeader` if the character range is inverted
/// - `MissingFaceName` in strict mode when the face name is unreadable
/// - `TruncatedResource` on any short read
pub fn read_resource_header<R: Read + Seek>(
    cursor: &mut ByteCursor<'_, R>,
    base: u64,
    options: &DecodeOptions,
) -> Result<ResourceHeader> {
    cursor.seek(base)?;
    let header = FntHeader::read(cursor)?;

    if !header.is_raster() {
        return Err(Error::UnsupportedFontType(header.font_type));
    }
    let version = FntVersion::from_raw(header.version)?;
    header.log_fields(base);

    if version == FntVersion::V3 {
        let ext = V3Extension::read(cursor)?;
        log::trace!(
            "  3.0 flags {:?}, spacing {}/{}/{}, colors +{}",
            ext.flags,
            ext.a_space,
            ext.b_space,
            ext.c_space,
            ext.color_pointer
        );
    }

    let face_name = read_face_name(cursor, base, &header, options)?;
    let glyph_count = header.glyph_count()?;
    let char_table = read_char_table(cursor, version, glyph_count)?;

    Ok(ResourceHeader {
        base,
        header,
        version,
        face_name,
        char_table,
    })
}

/// Decode one font resource at absolute offset `base` into a [`Font`].
pub fn decode_font_resource<R: Read + Seek>(
    cursor: &mut ByteCursor<'_, R>,
    base: u64,
    options: &DecodeOptions,
) -> Result<Font> {
    let resource = read_resource_header(cursor, base, options)?;

    let bits = resource.bitmap_offset();
    if cursor.position() != bits {
        log::debug!(
            "Character table ends at {}, bitmap data declared at {}",
            cursor.position(),
            bits
        );
    }
    cursor.seek(bits)?;

    let glyph_count = resource.glyph_count();
    let height = usize::from(resource.header.pix_height);
    let byte_width = byte_width_for(resource.header.pix_width);
    let total = byte_width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(glyph_count))
        .ok_or(Error::OutOfMemory(usize::MAX))?;
    if !options.bitmap_size_allowed(total) {
        return Err(Error::LimitExceeded {
            what: "glyph bitmap size",
            limit: options.max_bitmap_bytes,
        });
    }

    let bitmap = read_glyph_bitmaps(cursor, byte_width, height, glyph_count)?;

    FontBuilder::new(resource.header, resource.version)
        .face_name(resource.face_name)
        .glyph_count(glyph_count)
        .bitmap(bitmap)
        .build()
}
