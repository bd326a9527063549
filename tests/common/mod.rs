//! Synthetic `.FON` container builder shared by the integration tests.

#![allow(dead_code)]

pub const RT_FONT: u16 = 0x8008;
pub const RT_FONTDIR: u16 = 0x8007;

pub const FNT_HEADER_LEN: usize = 118;
pub const V3_EXTENSION_LEN: usize = 22;

/// Offset of the NE header in every built container.
pub const NE_OFFSET: usize = 64;
/// Offset of the resource table in every built container.
pub const RESOURCE_TABLE_OFFSET: usize = 128;
/// Alignment shift written to the resource table.
pub const ALIGN_SHIFT: u16 = 4;

/// One FNT resource to embed.
#[derive(Debug, Clone)]
pub struct FontResource {
    pub version: u16,
    pub font_type: u16,
    pub first_char: u8,
    pub last_char: u8,
    pub default_char: u8,
    pub width: u16,
    pub height: u16,
    pub charset: u8,
    pub face: Option<String>,
    /// Glyph data exactly as stored on disk (column-major per glyph)
    pub column_major: Vec<u8>,
}

impl FontResource {
    /// 8x1 raster font over 32..=33 (three glyphs).
    pub fn minimal(version: u16) -> Self {
        Self {
            version,
            font_type: 0,
            first_char: 32,
            last_char: 33,
            default_char: 0,
            width: 8,
            height: 1,
            charset: 255,
            face: Some("Minimal".to_string()),
            column_major: vec![0x00, 0x18, 0xFF],
        }
    }

    pub fn glyph_count(&self) -> usize {
        usize::from(self.last_char - self.first_char) + 2
    }

    pub fn char_entry_len(&self) -> usize {
        if self.version == 0x0300 {
            6
        } else {
            4
        }
    }

    /// Offset of the bitmap data relative to the resource start.
    pub fn bits_offset(&self) -> usize {
        let ext = if self.version == 0x0300 { V3_EXTENSION_LEN } else { 0 };
        FNT_HEADER_LEN + ext + self.glyph_count() * self.char_entry_len()
    }

    pub fn encode(&self) -> Vec<u8> {
        let bits = self.bits_offset();
        let face = bits + self.column_major.len();
        let byte_width = usize::from(self.width).div_ceil(8);

        let mut d = Vec::new();
        d.extend_from_slice(&self.version.to_le_bytes());
        d.extend_from_slice(&0u32.to_le_bytes()); // dfSize
        let mut copyright = [0u8; 60];
        copyright[..15].copy_from_slice(b"Copyright Test.");
        d.extend_from_slice(&copyright);
        d.extend_from_slice(&self.font_type.to_le_bytes());
        d.extend_from_slice(&10u16.to_le_bytes()); // points
        d.extend_from_slice(&96u16.to_le_bytes()); // vert res
        d.extend_from_slice(&96u16.to_le_bytes()); // horiz res
        d.extend_from_slice(&self.height.to_le_bytes()); // ascent
        d.extend_from_slice(&0u16.to_le_bytes());
        d.extend_from_slice(&0u16.to_le_bytes());
        d.extend_from_slice(&[0, 0, 0]); // italic, underline, strikeout
        d.extend_from_slice(&400u16.to_le_bytes());
        d.push(self.charset);
        d.extend_from_slice(&self.width.to_le_bytes());
        d.extend_from_slice(&self.height.to_le_bytes());
        d.push(0x31); // FF_MODERN | FIXED_PITCH
        d.extend_from_slice(&self.width.to_le_bytes());
        d.extend_from_slice(&self.width.to_le_bytes());
        d.extend_from_slice(&[self.first_char, self.last_char, self.default_char, 0]);
        d.extend_from_slice(&(byte_width as u16).to_le_bytes());
        d.extend_from_slice(&0u32.to_le_bytes()); // device
        let face_ptr = if self.face.is_some() { face as u32 } else { 0 };
        d.extend_from_slice(&face_ptr.to_le_bytes());
        d.extend_from_slice(&0u32.to_le_bytes()); // bits pointer
        d.extend_from_slice(&(bits as u32).to_le_bytes());
        d.push(0);
        assert_eq!(d.len(), FNT_HEADER_LEN);

        if self.version == 0x0300 {
            d.extend_from_slice(&0x0001u32.to_le_bytes()); // DFF_FIXED
            d.extend_from_slice(&[0u8; V3_EXTENSION_LEN - 4]);
        }

        let glyph_size = byte_width * usize::from(self.height);
        for g in 0..self.glyph_count() {
            let offset = (bits + g * glyph_size) as u32;
            d.extend_from_slice(&self.width.to_le_bytes());
            if self.version == 0x0300 {
                d.extend_from_slice(&offset.to_le_bytes());
            } else {
                d.extend_from_slice(&(offset as u16).to_le_bytes());
            }
        }
        assert_eq!(d.len(), bits);

        d.extend_from_slice(&self.column_major);
        if let Some(face) = &self.face {
            d.extend_from_slice(face.as_bytes());
            d.push(0);
        }
        d
    }
}

fn align(offset: usize) -> usize {
    let unit = 1usize << ALIGN_SHIFT;
    offset.div_ceil(unit) * unit
}

/// Build an MZ/NE container holding `resources`, each as its own RT_FONT entry.
///
/// An RT_FONTDIR entry precedes the font entries, as in real files.
pub fn container(resources: &[FontResource]) -> Vec<u8> {
    let entry_count = resources.len() + 1;
    let table_len = 2 + entry_count * 20 + 2;
    let mut font_offsets = Vec::new();
    let mut next = align(RESOURCE_TABLE_OFFSET + table_len);
    let encoded: Vec<Vec<u8>> = resources.iter().map(FontResource::encode).collect();
    for data in &encoded {
        font_offsets.push(next);
        next = align(next + data.len());
    }

    let mut d = vec![0u8; RESOURCE_TABLE_OFFSET];
    d[0..2].copy_from_slice(b"MZ");
    d[0x3C..0x40].copy_from_slice(&(NE_OFFSET as u32).to_le_bytes());
    d[NE_OFFSET..NE_OFFSET + 2].copy_from_slice(b"NE");
    let rsrctab = (RESOURCE_TABLE_OFFSET - NE_OFFSET) as u16;
    d[NE_OFFSET + 0x24..NE_OFFSET + 0x26].copy_from_slice(&rsrctab.to_le_bytes());

    d.extend_from_slice(&ALIGN_SHIFT.to_le_bytes());
    push_entry(&mut d, RT_FONTDIR, 1, 0);
    for &offset in &font_offsets {
        push_entry(&mut d, RT_FONT, 1, (offset >> ALIGN_SHIFT) as u16);
    }
    d.extend_from_slice(&[0u8; 2]);

    for (offset, data) in font_offsets.iter().zip(&encoded) {
        d.resize(*offset, 0);
        d.extend_from_slice(data);
    }
    d
}

fn push_entry(d: &mut Vec<u8>, type_id: u16, count: u16, offset: u16) {
    d.extend_from_slice(&type_id.to_le_bytes());
    d.extend_from_slice(&count.to_le_bytes());
    d.extend_from_slice(&[0u8; 4]);
    d.extend_from_slice(&offset.to_le_bytes());
    d.extend_from_slice(&[0u8; 10]);
}

/// Absolute offset of the `index`th font resource in a container built by [`container`].
pub fn font_offset(resources: &[FontResource], index: usize) -> u64 {
    let table_len = 2 + (resources.len() + 1) * 20 + 2;
    let mut next = align(RESOURCE_TABLE_OFFSET + table_len);
    for resource in &resources[..index] {
        next = align(next + resource.encode().len());
    }
    next as u64
}
