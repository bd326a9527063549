//! # winfont
//!
//! Decoder for Windows `.FON` bitmap fonts.
//!
//! A `.FON` file is a 16-bit NE executable stub carrying one or more
//! `RT_FONT` resources in the FNT format. This crate walks the container,
//! parses FNT headers (versions 2.0 and 3.0) and returns each font's glyphs
//! as row-major 1-bit bitmaps.
//!
//! ## Core Features
//!
//! - **Container walking**: MZ/NE signature checks, resource table scan
//! - **FNT 2.0 / 3.0**: field-by-field little-endian header decoding
//! - **Glyph bitmaps**: column-major on-disk data transposed to row-major
//! - **Strict/lenient modes**: configurable handling of missing face names
//!
//! ## Quick Start
//!
//! ```no_run
//! use winfont::Font;
//!
//! # fn main() -> winfont::Result<()> {
//! let font = Font::open("vgaoem.fon")?;
//!
//! let glyph = font.glyph_index_for(b'A');
//! let mut buf = vec![0u8; font.required_buffer_size(glyph)];
//! font.copy_glyph_bitmap(glyph, &mut buf)?;
//!
//! for row in buf.chunks(font.byte_width()) {
//!     let line: String = row
//!         .iter()
//!         .flat_map(|byte| (0..8).rev().map(move |bit| if byte >> bit & 1 == 1 { '#' } else { '.' }))
//!         .take(font.width() as usize)
//!         .collect();
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

/// Decoder configuration options
pub mod options;

// Byte-level reading
pub mod reader;

// Container and resource parsing
pub mod bitmap;
pub mod fnt;
pub mod ne;

// Decoded result and entry points
pub mod decoder;
pub mod font;

pub use decoder::{decode, decode_all, decode_with_options};
pub use error::{Error, Result};
pub use fnt::{CharSet, FntVersion};
pub use font::{Font, FontSummary};
pub use options::DecodeOptions;
