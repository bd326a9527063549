//! Top-level decode entry points.
//!
//! These tie the container walker and the resource decoder together. The
//! caller keeps ownership of the stream; it must stay open for the duration
//! of the call and may be closed afterwards independently of the returned
//! fonts.

use crate::error::Result;
use crate::font::Font;
use crate::fnt::decode_font_resource;
use crate::ne::locate_font_resources;
use crate::options::DecodeOptions;
use crate::reader::ByteCursor;
use std::io::{Read, Seek};

/// Decode the first font resource of a `.FON` stream with default options.
///
/// The stream must be positioned at offset 0.
///
/// # Example
///
/// ```no_run
/// use std::fs::File;
///
/// # fn main() -> winfont::Result<()> {
/// let mut file = File::open("vgaoem.fon")?;
/// let font = winfont::decode(&mut file)?;
/// println!("{:?}: {} glyphs", font.face_name(), font.glyph_count());
/// # Ok(())
/// # }
/// ```
pub fn decode<R: Read + Seek>(stream: &mut R) -> Result<Font> {
    decode_with_options(stream, &DecodeOptions::default())
}

/// Decode the first font resource of a `.FON` stream.
///
/// Containers with several font resources yield the first one in resource
/// table order; use [`decode_all`] to get every one.
pub fn decode_with_options<R: Read + Seek>(
    stream: &mut R,
    options: &DecodeOptions,
) -> Result<Font> {
    let mut cursor = ByteCursor::new(stream)?;
    let locations = locate_font_resources(&mut cursor, options)?;
    if locations.len() > 1 {
        log::info!(
            "Container has {} font resources, decoding the first",
            locations.len()
        );
    }
    decode_font_resource(&mut cursor, locations[0].offset, options)
}

/// Decode every font resource of a `.FON` stream, in resource table order.
///
/// Fails as a whole if any resource fails to decode.
pub fn decode_all<R: Read + Seek>(stream: &mut R, options: &DecodeOptions) -> Result<Vec<Font>> {
    let mut cursor = ByteCursor::new(stream)?;
    let locations = locate_font_resources(&mut cursor, options)?;

    let mut fonts = Vec::with_capacity(locations.len());
    for location in &locations {
        fonts.push(decode_font_resource(&mut cursor, location.offset, options)?);
    }
    log::debug!("Decoded {} font resources", fonts.len());
    Ok(fonts)
}
