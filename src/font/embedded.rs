use crate::{
    refs::{ObjectReferences, RefType},
    LabelError,
};
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use pdf_writer::{
    types::{FontFlags, SystemInfo},
    Finish, Name, Pdf, Ref, Str,
};
use std::collections::BTreeMap;

use super::TextMetrics;

/// A parsed TrueType or OpenType font, for labels that need a face other than the standard
/// typefaces. Fonts are embedded in their entirety in the generated PDF, so large fonts
/// dramatically increase the size of every label.
///
/// Fonts are immutable once loaded; wrap them in an [std::sync::Arc] to share one between
/// render configurations and threads.
pub struct Font {
    pub face: OwnedFace,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font").field("name", &self.name()).finish()
    }
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, LabelError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face })
    }

    fn name_entry(&self, id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Obtain the full name of the font
    pub fn name(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
            .unwrap_or_else(|| "Embedded".to_string())
    }

    /// Obtain the family name of the font
    pub fn family(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
            .unwrap_or_else(|| self.name())
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    /// The glyph drawn for `ch`: the character itself, else U+FFFD, else `?`
    pub fn glyph_or_fallback(&self, ch: char) -> Result<u16, LabelError> {
        self.glyph_id(ch)
            .or_else(|| self.glyph_id('\u{FFFD}'))
            .or_else(|| self.glyph_id('?'))
            .ok_or(LabelError::MissingGlyph(ch))
    }

    /// Encode text as big-endian glyph ids, for use with the Identity-H encoding
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, LabelError> {
        let mut out = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            out.extend_from_slice(&self.glyph_or_fallback(ch)?.to_be_bytes());
        }
        Ok(out)
    }

    fn write_cid(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let font_descriptor_id = self.write_descriptor(refs, font_index, writer);

        let id = refs.gen(RefType::CidFont(font_index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(pdf_writer::types::CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(font_descriptor_id);

        let sizing = self.glyphs_sizing(&self.glyph_ids());
        let scaling = 1000.0 / self.face.as_face_ref().units_per_em() as f32;

        // the most common advance is the default width
        let mut widths_counts: BTreeMap<u16, usize> = BTreeMap::new();
        for (width, _) in sizing.values() {
            *widths_counts.entry(*width).or_insert(0) += 1;
        }
        let most_common_width = widths_counts
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(&width, _)| width as f32 * scaling)
            .unwrap_or(1000.0);

        let mut widths = cid_font.widths();
        // runs of consecutive glyph ids share one width array; BTreeMap keeps them sorted
        let mut start: Option<u16> = None;
        let mut run: Vec<f32> = Vec::new();
        for (&gid, &(width, _)) in sizing.iter() {
            let width = width as f32 * scaling;
            match start {
                Some(s) if gid as usize == s as usize + run.len() => run.push(width),
                _ => {
                    if let Some(s) = start {
                        widths.consecutive(s, std::mem::take(&mut run));
                    }
                    start = Some(gid);
                    run.push(width);
                }
            }
        }
        if let Some(s) = start {
            widths.consecutive(s, run);
        }
        widths.finish();

        cid_font.default_width(most_common_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_font_data(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::FontData(font_index));

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            self.face.as_slice(),
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(pdf_writer::Filter::FlateDecode);
        stream.pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let font_data_stream_id = self.write_font_data(refs, font_index, writer);

        let face = self.face.as_face_ref();
        let sizing = self.glyphs_sizing(&self.glyph_ids());

        let max_width = sizing.values().map(|&(w, _)| w).max().unwrap_or_default();
        let max_height = sizing.values().map(|&(_, h)| h).max().unwrap_or_default();
        let sum_width: usize = sizing.values().map(|&(w, _)| w as usize).sum();
        let avg_width = sum_width as f32 / sizing.len().max(1) as f32;

        let id = refs.gen(RefType::FontDescriptor(font_index));

        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(self.name().as_bytes()));
        descriptor.family(Str(self.family().as_bytes()));
        descriptor.weight(face.weight().to_number());

        let mut flags: FontFlags = FontFlags::empty();
        if face.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        descriptor.flags(flags);

        let scaling = 1000.0 / face.units_per_em() as f32;
        let bbox = face.global_bounding_box();
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: (bbox.y_max.max(max_height)) as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(1000.0),
        );
        descriptor.x_height(
            face.x_height()
                .unwrap_or_else(|| face.capital_height().unwrap_or_default()) as f32
                * scaling,
        );
        // no reliable source for this in the font tables
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width * scaling);
        descriptor.max_width(max_width as f32 * scaling);
        descriptor.missing_width(max_width as f32 * scaling);

        descriptor.font_file2(font_data_stream_id);

        id
    }

    /// Every glyph reachable from a unicode cmap subtable, keyed by glyph id
    fn glyph_ids(&self) -> BTreeMap<u16, char> {
        let mut map: BTreeMap<u16, char> = BTreeMap::new();

        let Some(cmap) = self.face.as_face_ref().tables().cmap else {
            return map;
        };

        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                if let Ok(ch) = char::try_from(codepoint) {
                    if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0)
                    {
                        map.entry(index.0).or_insert(ch);
                    }
                }
            });
        }

        map
    }

    /// (advance, height) per glyph id
    fn glyphs_sizing(&self, ids: &BTreeMap<u16, char>) -> BTreeMap<u16, (u16, i16)> {
        let face = self.face.as_face_ref();
        ids.keys()
            .filter_map(|&id| {
                let gid = GlyphId(id);
                let h_advance = face.glyph_hor_advance(gid)?;
                let height = face
                    .glyph_bounding_box(gid)
                    .map(|bbox| bbox.y_max - bbox.y_min)
                    .unwrap_or(1000);
                Some((id, (h_advance, height)))
            })
            .collect()
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map: String = r#"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
"#
        .replace("\r\n", "\n");

        let ids: Vec<(u16, char)> = self.glyph_ids().into_iter().collect();

        // each bfchar block holds at most 100 entries sharing a high byte
        let mut cmap_blocks: Vec<Vec<(u16, char)>> = Vec::new();
        let mut current_block: Vec<(u16, char)> = Vec::new();
        let mut high_byte: u8 = 0;
        for &(id, ch) in ids.iter() {
            if (id >> 8) as u8 != high_byte || current_block.len() >= 100 {
                if !current_block.is_empty() {
                    cmap_blocks.push(std::mem::take(&mut current_block));
                }
                high_byte = (id >> 8) as u8;
            }

            current_block.push((id, ch));
        }
        if !current_block.is_empty() {
            cmap_blocks.push(current_block);
        }

        for block in cmap_blocks.into_iter() {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for (id, ch) in block.into_iter() {
                map.push_str(&format!("<{id:04x}> <{}>\n", utf16_hex(ch)));
            }
            map.push_str("endbfchar\n");
        }

        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(pdf_writer::Filter::FlateDecode);

        id
    }

    /// Write the font as a Type0 font with a single CID descendant
    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }
}

/// ToUnicode destinations are UTF-16BE, so characters past the BMP become surrogate pairs
fn utf16_hex(ch: char) -> String {
    let mut units = [0u16; 2];
    ch.encode_utf16(&mut units)
        .iter()
        .map(|unit| format!("{unit:04x}"))
        .collect()
}

impl TextMetrics for Font {
    fn units_per_em(&self) -> f32 {
        self.face.as_face_ref().units_per_em() as f32
    }

    fn ascender(&self) -> f32 {
        self.face.as_face_ref().ascender() as f32
    }

    fn descender(&self) -> f32 {
        self.face.as_face_ref().descender() as f32
    }

    fn line_gap(&self) -> f32 {
        self.face.as_face_ref().line_gap() as f32
    }

    fn advance(&self, ch: char) -> f32 {
        self.glyph_or_fallback(ch)
            .ok()
            .and_then(|gid| self.face.as_face_ref().glyph_hor_advance(GlyphId(gid)))
            .unwrap_or_default() as f32
    }
}
