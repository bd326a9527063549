//! NE (New Executable) container walker.
//!
//! A `.FON` file is a 16-bit Windows executable with no code: an MZ stub
//! header points at an NE header, whose resource table lists the embedded
//! `RT_FONT` resources. This module validates both headers and resolves the
//! absolute offset of every font resource.
//!
//! ```text
//! 0x0000  MZ stub     e_magic "MZ" ... e_lfanew (u32 @ 0x3C)
//! lfanew  NE header   ne_magic "NE" ... ne_rsrctab (u16 @ +0x24, relative)
//! rsrctab shift (u16), then 20-byte type entries until a zero type
//! ```

use crate::error::{Error, Result};
use crate::options::DecodeOptions;
use crate::reader::ByteCursor;
use std::io::{Read, Seek};

/// "MZ"
pub const MZ_MAGIC: u16 = 0x5A4D;
/// "NE"
pub const NE_MAGIC: u16 = 0x454E;

/// Font directory resource type.
pub const RT_FONTDIR: u16 = 0x8007;
/// Font resource type.
pub const RT_FONT: u16 = 0x8008;

/// Size of the MZ stub header.
pub const MZ_HEADER_LEN: u64 = 64;
/// Offset of `e_lfanew` within the MZ header.
const MZ_LFANEW_OFFSET: u64 = 0x3C;
/// Offset of `ne_rsrctab` within the NE header.
const NE_RSRCTAB_OFFSET: u64 = 0x24;

/// Size of one resource-type entry.
pub const RESOURCE_ENTRY_LEN: u64 = 20;

/// Alignment shifts past this would overflow a 32-bit file offset.
const MAX_ALIGN_SHIFT: u16 = 15;

/// The MZ stub header fields this crate uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MzHeader {
    /// Absolute offset of the NE header
    pub lfanew: u32,
}

/// The NE header fields this crate uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeHeader {
    /// Absolute offset of the NE header itself
    pub offset: u64,
    /// Resource table offset, relative to `offset`
    pub resource_table: u16,
    /// Resident-name table offset, relative to `offset`
    pub resident_names: u16,
}

impl NeHeader {
    /// Absolute offset of the resource table.
    pub fn resource_table_offset(&self) -> u64 {
        self.offset + u64::from(self.resource_table)
    }
}

/// One entry of the resource table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTypeEntry {
    /// Resource type tag (`RT_FONT`, `RT_FONTDIR`, ...)
    pub type_id: u16,
    /// Number of resources declared for this type
    pub count: u16,
    /// Offset as stored, before the alignment shift
    pub stored_offset: u16,
}

impl ResourceTypeEntry {
    /// Absolute file offset after applying the table's alignment shift.
    pub fn resolved_offset(&self, shift: u16) -> u64 {
        u64::from(self.stored_offset) << shift
    }
}

/// Location of one font resource inside the container.
///
/// Resource table entries have a fixed 20-byte layout, so each `RT_FONT`
/// entry yields exactly one location. A `declared_count` above 1 is logged
/// but the extra resources are not followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontResourceLocation {
    /// Absolute offset of the FNT header
    pub offset: u64,
    /// Resource count declared by the type entry
    pub declared_count: u16,
}

/// Read and validate the MZ stub header at offset 0.
pub fn read_mz_header<R: Read + Seek>(cursor: &mut ByteCursor<'_, R>) -> Result<MzHeader> {
    if cursor.position() != 0 {
        return Err(Error::BadMagic(format!(
            "stream positioned at byte {}, expected 0",
            cursor.position()
        )));
    }

    let magic = cursor.read_u16("MZ header")?;
    if magic != MZ_MAGIC {
        return Err(Error::BadMagic(format!(
            "MZ signature: expected 0x{:04X}, found 0x{:04X}",
            MZ_MAGIC, magic
        )));
    }

    cursor.skip(MZ_LFANEW_OFFSET - 2, "MZ header")?;
    let lfanew = cursor.read_u32("MZ header")?;
    if u64::from(lfanew) < MZ_HEADER_LEN {
        return Err(Error::InvalidHeader(format!(
            "NE header offset {} lies inside the {}-byte MZ header",
            lfanew, MZ_HEADER_LEN
        )));
    }

    log::debug!("MZ header ok, NE header at {}", lfanew);
    Ok(MzHeader { lfanew })
}

/// Read and validate the NE header at `offset`.
pub fn read_ne_header<R: Read + Seek>(
    cursor: &mut ByteCursor<'_, R>,
    offset: u64,
) -> Result<NeHeader> {
    cursor.seek(offset)?;

    let magic = cursor.read_u16("NE header")?;
    if magic != NE_MAGIC {
        return Err(Error::BadMagic(format!(
            "NE signature: expected 0x{:04X}, found 0x{:04X}",
            NE_MAGIC, magic
        )));
    }

    cursor.skip(NE_RSRCTAB_OFFSET - 2, "NE header")?;
    let resource_table = cursor.read_u16("NE header")?;
    let resident_names = cursor.read_u16("NE header")?;

    log::debug!(
        "NE header at {}: rsrctab +{}, restab +{}",
        offset,
        resource_table,
        resident_names
    );

    Ok(NeHeader {
        offset,
        resource_table,
        resident_names,
    })
}

/// Read one resource-type entry, or `None` at the zero terminator.
///
/// A terminator consumes only its 2-byte type; any other entry consumes
/// exactly [`RESOURCE_ENTRY_LEN`] bytes.
fn read_resource_entry<R: Read + Seek>(
    cursor: &mut ByteCursor<'_, R>,
) -> Result<Option<ResourceTypeEntry>> {
    let start = cursor.position();
    let type_id = cursor.read_u16("resource table")?;
    if type_id == 0 {
        return Ok(None);
    }

    let count = cursor.read_u16("resource table")?;
    cursor.skip(4, "resource table")?;
    let stored_offset = cursor.read_u16("resource table")?;
    let consumed = cursor.position() - start;
    cursor.skip(RESOURCE_ENTRY_LEN - consumed, "resource table")?;

    Ok(Some(ResourceTypeEntry {
        type_id,
        count,
        stored_offset,
    }))
}

/// Walk the resource table at `table_offset` and collect font resources.
pub fn scan_resource_table<R: Read + Seek>(
    cursor: &mut ByteCursor<'_, R>,
    table_offset: u64,
    options: &DecodeOptions,
) -> Result<Vec<FontResourceLocation>> {
    cursor.seek(table_offset)?;

    let shift = cursor.read_u16("resource table")?;
    if shift > MAX_ALIGN_SHIFT {
        return Err(Error::InvalidHeader(format!(
            "resource alignment shift {} exceeds {}",
            shift, MAX_ALIGN_SHIFT
        )));
    }
    log::debug!("Resource table at {}, alignment shift {}", table_offset, shift);

    let mut fonts = Vec::new();
    let mut scanned = 0usize;

    while let Some(entry) = read_resource_entry(cursor)? {
        scanned += 1;
        if !options.resource_types_allowed(scanned) {
            return Err(Error::LimitExceeded {
                what: "resource type count",
                limit: options.max_resource_types,
            });
        }

        match entry.type_id {
            RT_FONT => {
                let location = FontResourceLocation {
                    offset: entry.resolved_offset(shift),
                    declared_count: entry.count,
                };
                log::debug!(
                    "RT_FONT entry: {} resource(s) at {}",
                    location.declared_count,
                    location.offset
                );
                fonts.push(location);
            },
            RT_FONTDIR => log::trace!("Skipping RT_FONTDIR entry ({} fonts)", entry.count),
            other => log::trace!("Skipping resource type 0x{:04X}", other),
        }
    }

    Ok(fonts)
}

/// Locate every font resource in an NE container.
///
/// The cursor must be at offset 0. Returns the resources in table order.
///
/// # Errors
///
/// - `BadMagic` if the cursor is not at offset 0 or a signature is wrong
/// - `TruncatedResource` if a header or the resource table is cut short
/// - `NoFontResourceFound` if the table has no `RT_FONT` entry
pub fn locate_font_resources<R: Read + Seek>(
    cursor: &mut ByteCursor<'_, R>,
    options: &DecodeOptions,
) -> Result<Vec<FontResourceLocation>> {
    let mz = read_mz_header(cursor)?;
    let ne = read_ne_header(cursor, u64::from(mz.lfanew))?;
    let fonts = scan_resource_table(cursor, ne.resource_table_offset(), options)?;

    if fonts.is_empty() {
        return Err(Error::NoFontResourceFound);
    }
    Ok(fonts)
}
