//! Glyph bitmap deinterleaving.
//!
//! FNT stores each glyph column-major: all `height` bytes of byte-column 0
//! top to bottom, then byte-column 1, and so on. The decoded buffer is
//! row-major, so byte `r * byte_width + c` holds row `r`, byte-column `c`,
//! and glyphs follow each other with a stride of `byte_width * height`.

use crate::error::{Error, Result};
use crate::reader::ByteCursor;
use std::io::{Read, Seek};

/// Bytes per pixel row for a glyph `pixel_width` pixels wide.
pub fn byte_width_for(pixel_width: u16) -> usize {
    usize::from(pixel_width).div_ceil(8)
}

/// Transpose one glyph from column-major `src` into row-major `dst`.
///
/// Both slices must be exactly `byte_width * height` bytes.
pub fn deinterleave_glyph(src: &[u8], dst: &mut [u8], byte_width: usize, height: usize) {
    debug_assert_eq!(src.len(), byte_width * height);
    debug_assert_eq!(dst.len(), byte_width * height);
    if height == 0 {
        return;
    }

    for (column, column_bytes) in src.chunks_exact(height).enumerate() {
        for (row, &byte) in column_bytes.iter().enumerate() {
            dst[row * byte_width + column] = byte;
        }
    }
}

/// Read `glyph_count` column-major glyphs at the cursor into one row-major buffer.
///
/// # Errors
///
/// - `TruncatedResource` if the source holds fewer than
///   `byte_width * height * glyph_count` bytes
/// - `OutOfMemory` if the buffer cannot be allocated
pub fn read_glyph_bitmaps<R: Read + Seek>(
    cursor: &mut ByteCursor<'_, R>,
    byte_width: usize,
    height: usize,
    glyph_count: usize,
) -> Result<Vec<u8>> {
    let glyph_size = byte_width
        .checked_mul(height)
        .ok_or(Error::OutOfMemory(usize::MAX))?;
    let total = glyph_size
        .checked_mul(glyph_count)
        .ok_or(Error::OutOfMemory(usize::MAX))?;

    let mut bitmap = Vec::new();
    bitmap
        .try_reserve_exact(total)
        .map_err(|_| Error::OutOfMemory(total))?;
    bitmap.resize(total, 0);

    if glyph_size == 0 {
        return Ok(bitmap);
    }

    log::debug!(
        "Reading {} glyphs of {}x{} bytes at {}",
        glyph_count,
        byte_width,
        height,
        cursor.position()
    );

    let mut column_major = vec![0u8; glyph_size];
    for glyph in bitmap.chunks_exact_mut(glyph_size) {
        cursor.read_into(&mut column_major, "bitmap data")?;
        deinterleave_glyph(&column_major, glyph, byte_width, height);
    }

    Ok(bitmap)
}
