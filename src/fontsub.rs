//! TrueType/CFF table parsing and the subset-font emitter.
//!
//! Glyph lookup, advance widths and kerming are delegated to
//! [`owned_ttf_parser`], which keeps an owned copy of the font bytes next to
//! the parsed face so subsets can be built incrementally while pages are
//! drawn. The subset emission itself -- directory parsing, `glyf`/`loca`
//! reconstruction, composite glyph index rewriting and the checksum
//! adjustment -- is hand-rolled against the raw bytes, since that's the part
//! a face library does not expose.

use std::collections::HashMap;

use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};

use crate::bytes::ttf_checksum;
use crate::{Error, Result};

/// A loaded font file together with its parsed face.
pub(crate) struct FontThingy {
    face: OwnedFace,
    subsetter: FontSubsetter,
}

impl FontThingy {
    pub(crate) fn load(data: Vec<u8>, index: u32) -> Result<Self> {
        let face = OwnedFace::from_vec(data, index).map_err(|_| Error::MalformedFontFile)?;
        Ok(Self { face, subsetter: FontSubsetter::new() })
    }

    pub(crate) fn face(&self) -> &owned_ttf_parser::Face<'_> {
        self.face.as_face_ref()
    }

    pub(crate) fn data(&self) -> &[u8] {
        self.face.as_slice()
    }

    pub(crate) fn units_per_em(&self) -> u16 {
        self.face().units_per_em()
    }

    pub(crate) fn subsetter(&mut self) -> &mut FontSubsetter {
        &mut self.subsetter
    }

    /// Pad the subset to slot 32 (F2). Split into its own method, rather than
    /// calling `self.subsetter().finish(|c| self.face()...)` at the call
    /// site, because that would need `&self.face` and `&mut self.subsetter`
    /// live at once through two method calls on `self` -- going through the
    /// fields directly here keeps the borrows disjoint.
    pub(crate) fn finish_subset(&mut self) {
        let face = self.face.as_face_ref();
        self.subsetter.finish(|c| face.glyph_index(c).map(|g| g.0));
    }

    /// Scale a font-unit value to the PDF standard of 1000 units per em.
    pub(crate) fn to_1000_units(&self, value: f32) -> f32 {
        value * 1000.0 / self.units_per_em() as f32
    }

    /// `horiAdvance`, scaled to 1000 units per em, for the glyph currently
    /// occupying `slot` in subset 0.
    pub(crate) fn width_of_slot(&self, slot: u16) -> f32 {
        let gid = match self.subsetter.glyphs.get(slot as usize) {
            Some(glyph) => glyph.glyph_index(),
            None => return 0.0,
        };
        let advance = self.face().glyph_hor_advance(GlyphId(gid)).unwrap_or(0);
        self.to_1000_units(advance as f32)
    }

    /// Map a codepoint to a subset slot, consulting the face's `cmap` the
    /// first time this codepoint is seen.
    pub(crate) fn resolve_char(&mut self, codepoint: char) -> Result<u16> {
        let face = self.face.as_face_ref();
        self.subsetter
            .slot_for_char(codepoint, |c| face.glyph_index(c).map(|g| g.0))
    }

    /// Map a raw glyph index to a subset slot. `unicode` carries the source
    /// text a shaped ligature or multi-codepoint cluster stands in for, if
    /// any; a glyph with no such text is pulled in as a plain component.
    pub(crate) fn resolve_glyph(
        &mut self,
        glyph_index: u16,
        unicode: Option<&str>,
    ) -> Result<u16> {
        match unicode {
            Some(text) => self.subsetter.slot_for_ligature(glyph_index, text),
            None => self.subsetter.slot_for_glyph_index(glyph_index),
        }
    }
}

/// One entry in a font subset.
#[derive(Clone)]
pub(crate) enum TtGlyph {
    /// An ordinary glyph reached through a single Unicode codepoint.
    Regular { codepoint: char, glyph_index: u16 },
    /// A glyph reached only as the component of a composite, or pulled in to
    /// satisfy a composite's component list; has no single codepoint of its
    /// own.
    Composite { glyph_index: u16 },
    /// A ligature glyph, explicitly requested with the source text it
    /// stands in for (used to build multi-codepoint ToUnicode entries).
    Ligature { glyph_index: u16, source_text: String },
}

impl TtGlyph {
    fn glyph_index(&self) -> u16 {
        match self {
            Self::Regular { glyph_index, .. } => *glyph_index,
            Self::Composite { glyph_index } => *glyph_index,
            Self::Ligature { glyph_index, .. } => *glyph_index,
        }
    }
}

/// The maximum number of glyphs a single subset may hold.
///
/// The spec reserves data structures for additional subsets past this limit,
/// but notes that the reference implementation never actually allocates a
/// second one; we keep the single-subset behavior and fail loudly instead of
/// silently truncating.
const MAX_SUBSET_SIZE: usize = 255;

/// Assigns codepoints and raw glyph indices to slots in subset 0.
///
/// Slot 0 is always `.notdef`; slot 32 is always reserved for U+0020 once
/// [`Self::finish`] runs.
pub(crate) struct FontSubsetter {
    by_codepoint: HashMap<char, u16>,
    by_glyph_index: HashMap<u16, u16>,
    glyphs: Vec<TtGlyph>,
    finished: bool,
}

impl FontSubsetter {
    fn new() -> Self {
        Self {
            by_codepoint: HashMap::new(),
            by_glyph_index: HashMap::new(),
            glyphs: vec![TtGlyph::Regular { codepoint: '\0', glyph_index: 0 }],
            finished: false,
        }
    }

    /// Map `codepoint` to a slot, assigning a new one via `lookup` the first
    /// time it is seen.
    pub(crate) fn slot_for_char(
        &mut self,
        codepoint: char,
        lookup: impl FnOnce(char) -> Option<u16>,
    ) -> Result<u16> {
        if let Some(&slot) = self.by_codepoint.get(&codepoint) {
            return Ok(slot);
        }
        let glyph_index = lookup(codepoint).ok_or(Error::MissingGlyph(codepoint))?;
        let slot = self.push(TtGlyph::Regular { codepoint, glyph_index })?;
        self.by_codepoint.insert(codepoint, slot);
        Ok(slot)
    }

    /// Map a ligature's glyph index to a slot, recording the source text it
    /// stands in for.
    pub(crate) fn slot_for_ligature(
        &mut self,
        glyph_index: u16,
        source_text: &str,
    ) -> Result<u16> {
        if let Some(&slot) = self.by_glyph_index.get(&glyph_index) {
            return Ok(slot);
        }
        let slot = self.push(TtGlyph::Ligature {
            glyph_index,
            source_text: source_text.to_string(),
        })?;
        self.by_glyph_index.insert(glyph_index, slot);
        Ok(slot)
    }

    /// Pull in a glyph by raw index with no associated codepoint (the
    /// `GlyphItem` text event, or a composite's component).
    fn slot_for_glyph_index(&mut self, glyph_index: u16) -> Result<u16> {
        if let Some(&slot) = self.by_glyph_index.get(&glyph_index) {
            return Ok(slot);
        }
        let slot = self.push(TtGlyph::Composite { glyph_index })?;
        self.by_glyph_index.insert(glyph_index, slot);
        Ok(slot)
    }

    fn push(&mut self, glyph: TtGlyph) -> Result<u16> {
        if self.glyphs.len() >= MAX_SUBSET_SIZE {
            return Err(Error::UnsupportedFontFormat);
        }
        let slot = self.glyphs.len() as u16;
        self.glyphs.push(glyph);
        Ok(slot)
    }

    /// Pad the subset with filler glyphs so that slot 32 holds U+0020, per
    /// (F2). Idempotent.
    pub(crate) fn finish(&mut self, lookup: impl Fn(char) -> Option<u16>) {
        if self.finished {
            return;
        }
        self.finished = true;
        if self.glyphs.len() <= 32 {
            while self.glyphs.len() < 32 {
                let k = (self.glyphs.len() - 1) as u8;
                let filler = (b'!' + k) as char;
                let glyph_index = lookup(filler).unwrap_or(0);
                self.glyphs.push(TtGlyph::Regular { codepoint: filler, glyph_index });
            }
            let glyph_index = lookup(' ').unwrap_or(0);
            self.glyphs.push(TtGlyph::Regular { codepoint: ' ', glyph_index });
            self.by_codepoint.insert(' ', 32);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub(crate) fn glyphs(&self) -> &[TtGlyph] {
        &self.glyphs
    }
}

/// A parsed `sfnt` table directory entry.
struct TableRecord {
    offset: usize,
    length: usize,
}

fn read_u16(data: &[u8], at: usize) -> Result<u16> {
    data.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or(Error::FontIndexOutOfBounds)
}

fn read_i16(data: &[u8], at: usize) -> Result<i16> {
    read_u16(data, at).map(|v| v as i16)
}

fn read_u32(data: &[u8], at: usize) -> Result<u32> {
    data.get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(Error::FontIndexOutOfBounds)
}

/// Parse the 12-byte offset table and the table directory that follows it.
fn parse_directory(data: &[u8]) -> Result<HashMap<[u8; 4], TableRecord>> {
    let num_tables = read_u16(data, 4)? as usize;
    let mut tables = HashMap::with_capacity(num_tables);
    for i in 0..num_tables {
        let record_at = 12 + 16 * i;
        let tag = data
            .get(record_at..record_at + 4)
            .ok_or(Error::FontIndexOutOfBounds)?;
        let offset = read_u32(data, record_at + 8)? as usize;
        let length = read_u32(data, record_at + 12)? as usize;
        let end = offset.checked_add(length).ok_or(Error::FontIndexOutOfBounds)?;
        if end > data.len() {
            return Err(Error::FontIndexOutOfBounds);
        }
        tables.insert(tag.try_into().unwrap(), TableRecord { offset, length });
    }
    Ok(tables)
}

fn table<'a>(
    data: &'a [u8],
    tables: &HashMap<[u8; 4], TableRecord>,
    tag: &[u8; 4],
) -> Result<&'a [u8]> {
    let record = tables.get(tag).ok_or(Error::MalformedFontFile)?;
    Ok(&data[record.offset..record.offset + record.length])
}

const ARGS_ARE_WORDS: u16 = 0x0001;
const MORE_COMPONENTS: u16 = 0x0020;

/// Rewrite a composite glyph's component indices in place, pulling in any
/// component not already present in the subset.
fn remap_composite(glyph: &mut [u8], subsetter: &mut FontSubsetter) -> Result<()> {
    let mut pos = 10; // past the 5 header fields
    loop {
        let flags = read_u16(glyph, pos)?;
        let component_gid = read_u16(glyph, pos + 2)?;
        let new_slot = subsetter.slot_for_glyph_index(component_gid)?;
        glyph[pos + 2..pos + 4].copy_from_slice(&new_slot.to_be_bytes());

        let mut arg_len = if flags & ARGS_ARE_WORDS != 0 { 4 } else { 2 };
        arg_len += if flags & 0x0008 != 0 {
            2 // WE_HAVE_A_SCALE
        } else if flags & 0x0040 != 0 {
            4 // WE_HAVE_AN_X_AND_Y_SCALE
        } else if flags & 0x0080 != 0 {
            8 // WE_HAVE_A_TWO_BY_TWO
        } else {
            0
        };
        pos += 4 + arg_len;

        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }
    Ok(())
}

/// Assemble a subset font file for the glyphs in `subsetter`.
///
/// Returns the new font bytes plus whether the result should be wrapped as
/// `/FontFile2` (TrueType glyph outlines) or `/FontFile3` with
/// `/Subtype /OpenType` (CFF outlines, embedded unsubsetted).
pub(crate) fn emit_subset(data: &[u8], subsetter: &mut FontSubsetter) -> Result<(Vec<u8>, bool)> {
    let tables = parse_directory(data)?;
    if tables.contains_key(b"CFF ") {
        // CFF charstring subsetting needs its own index-rewriting machinery;
        // out of scope here, so the whole (already-compact) table is kept.
        return Ok((data.to_vec(), false));
    }

    let head = table(data, &tables, b"head")?;
    let loca_format = read_i16(head, 50)?;
    let loca = table(data, &tables, b"loca")?;
    let glyf = table(data, &tables, b"glyf")?;
    let hhea = table(data, &tables, b"hhea")?;
    let maxp = table(data, &tables, b"maxp")?;
    let hmtx = table(data, &tables, b"hmtx")?;
    let num_hmetrics = read_u16(hhea, 34)? as usize;

    let loca_entry = |index: usize| -> Result<usize> {
        if loca_format == 0 {
            Ok(read_u16(loca, index * 2)? as usize * 2)
        } else {
            Ok(read_u32(loca, index * 4)? as usize)
        }
    };

    let advance_for = |gid: u16| -> Result<u16> {
        let index = (gid as usize).min(num_hmetrics.saturating_sub(1));
        read_u16(hmtx, index * 4)
    };

    // Resolve every slot's glyph bytes, rewriting composites as we go. New
    // component glyphs pushed mid-iteration are appended to `subsetter` and
    // picked up by extending the loop bound each pass.
    let mut new_glyphs: Vec<Vec<u8>> = Vec::new();
    let mut i = 0;
    while i < subsetter.len() {
        let gid = subsetter.glyphs()[i].glyph_index() as usize;
        let start = loca_entry(gid)?;
        let end = loca_entry(gid + 1)?;
        let mut bytes = glyf.get(start..end).ok_or(Error::FontIndexOutOfBounds)?.to_vec();
        if bytes.len() >= 10 && read_i16(&bytes, 0)? < 0 {
            remap_composite(&mut bytes, subsetter)?;
        }
        new_glyphs.push(bytes);
        i += 1;
    }
    // Components discovered after the initial pass still need their outline
    // fetched.
    while new_glyphs.len() < subsetter.len() {
        let gid = subsetter.glyphs()[new_glyphs.len()].glyph_index() as usize;
        let start = loca_entry(gid)?;
        let end = loca_entry(gid + 1)?;
        let mut bytes = glyf.get(start..end).ok_or(Error::FontIndexOutOfBounds)?.to_vec();
        if bytes.len() >= 10 && read_i16(&bytes, 0)? < 0 {
            remap_composite(&mut bytes, subsetter)?;
        }
        new_glyphs.push(bytes);
    }

    let mut new_glyf = Vec::new();
    let mut new_loca = vec![0u32];
    for glyph in &new_glyphs {
        new_glyf.extend_from_slice(glyph);
        while new_glyf.len() % 4 != 0 {
            new_glyf.push(0);
        }
        new_loca.push(new_glyf.len() as u32);
    }

    let long_loca = *new_loca.last().unwrap_or(&0) > u16::MAX as u32 * 2;
    let mut loca_bytes = Vec::new();
    for &offset in &new_loca {
        if long_loca {
            loca_bytes.extend(offset.to_be_bytes());
        } else {
            loca_bytes.extend(((offset / 2) as u16).to_be_bytes());
        }
    }

    let mut new_hmtx = Vec::new();
    for glyph in subsetter.glyphs() {
        new_hmtx.extend(advance_for(glyph.glyph_index())?.to_be_bytes());
        new_hmtx.extend(0i16.to_be_bytes()); // lsb, not consulted by the writer
    }

    let mut new_head = head.to_vec();
    new_head[50..52].copy_from_slice(&(long_loca as i16).to_be_bytes());
    new_head[8..12].copy_from_slice(&0u32.to_be_bytes()); // checksumAdjustment, patched below

    let mut new_hhea = hhea.to_vec();
    new_hhea[34..36].copy_from_slice(&(subsetter.len() as u16).to_be_bytes());

    let mut new_maxp = maxp.to_vec();
    new_maxp[4..6].copy_from_slice(&(subsetter.len() as u16).to_be_bytes());

    let cmap = build_synthetic_cmap(subsetter.len());

    let mut table_list: Vec<(&[u8; 4], &[u8])> = vec![
        (b"cmap", &cmap),
        (b"head", &new_head),
        (b"hhea", &new_hhea),
        (b"maxp", &new_maxp),
        (b"glyf", &new_glyf),
        (b"loca", &loca_bytes),
        (b"hmtx", &new_hmtx),
    ];
    let optional: [&[u8; 4]; 3] = [b"cvt ", b"prep", b"fpgm"];
    let mut optional_data = Vec::new();
    for tag in optional {
        if let Ok(bytes) = table(data, &tables, tag) {
            optional_data.push((tag, bytes));
        }
    }
    for (tag, bytes) in &optional_data {
        table_list.push((tag, bytes));
    }

    let file = assemble_sfnt(&table_list);
    Ok((patch_checksum_adjustment(file), true))
}

fn build_synthetic_cmap(subset_len: usize) -> Vec<u8> {
    // Format 0: a 256-byte glyph index array, one byte per character code.
    let mut cmap = Vec::with_capacity(262);
    cmap.extend(0u16.to_be_bytes()); // version
    cmap.extend(1u16.to_be_bytes()); // numTables
    cmap.extend(1u16.to_be_bytes()); // platformID: Macintosh
    cmap.extend(0u16.to_be_bytes()); // encodingID
    cmap.extend(12u32.to_be_bytes()); // subtable offset
    cmap.extend(0u16.to_be_bytes()); // format 0
    cmap.extend(262u16.to_be_bytes()); // length
    cmap.extend(0u16.to_be_bytes()); // language
    for code in 0..256usize {
        let glyph = if code < subset_len { code as u8 } else { 0 };
        cmap.push(glyph);
    }
    cmap
}

fn assemble_sfnt(tables: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let mut entry_selector = 0u16;
    while (1 << (entry_selector + 1)) <= num_tables {
        entry_selector += 1;
    }
    let search_range = (1 << entry_selector) * 16;
    let range_shift = num_tables * 16 - search_range;

    let mut out = Vec::new();
    out.extend(0x00010000u32.to_be_bytes());
    out.extend(num_tables.to_be_bytes());
    out.extend(search_range.to_be_bytes());
    out.extend(entry_selector.to_be_bytes());
    out.extend(range_shift.to_be_bytes());

    let header_len = 12 + 16 * tables.len();
    let mut body = Vec::new();
    let mut directory = Vec::new();
    let mut offset = header_len;
    for (tag, bytes) in tables {
        let checksum = ttf_checksum(bytes);
        directory.extend(tag.iter());
        directory.extend(checksum.to_be_bytes());
        directory.extend((offset as u32).to_be_bytes());
        directory.extend((bytes.len() as u32).to_be_bytes());
        body.extend_from_slice(bytes);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = header_len + body.len();
    }

    out.extend(directory);
    out.extend(body);
    out
}

fn patch_checksum_adjustment(mut file: Vec<u8>) -> Vec<u8> {
    let total = ttf_checksum(&file);
    let adjustment = 0xB1B0AFBAu32.wrapping_sub(total);
    if let Some(head_offset) = find_head_table_offset(&file) {
        file[head_offset + 8..head_offset + 12].copy_from_slice(&adjustment.to_be_bytes());
    }
    file
}

fn find_head_table_offset(file: &[u8]) -> Option<usize> {
    let num_tables = u16::from_be_bytes([file.get(4)?.to_owned(), file.get(5)?.to_owned()]) as usize;
    for i in 0..num_tables {
        let record_at = 12 + 16 * i;
        if file.get(record_at..record_at + 4)? == b"head" {
            let offset = u32::from_be_bytes(file.get(record_at + 8..record_at + 12)?.try_into().ok()?);
            return Some(offset as usize);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsetter_reserves_notdef_at_slot_zero() {
        let s = FontSubsetter::new();
        assert_eq!(s.len(), 1);
        assert_eq!(s.glyphs()[0].glyph_index(), 0);
    }

    #[test]
    fn slot_for_char_is_memoized() {
        let mut s = FontSubsetter::new();
        let slot = s.slot_for_char('a', |_| Some(5)).unwrap();
        assert_eq!(slot, 1);
        let slot_again = s.slot_for_char('a', |_| panic!("lookup must not run twice")).unwrap();
        assert_eq!(slot, slot_again);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn slot_for_char_missing_glyph_errors() {
        let mut s = FontSubsetter::new();
        assert!(matches!(s.slot_for_char('x', |_| None), Err(Error::MissingGlyph('x'))));
    }

    #[test]
    fn slot_for_glyph_index_and_ligature_share_the_by_glyph_index_table() {
        let mut s = FontSubsetter::new();
        let plain = s.slot_for_glyph_index(9).unwrap();
        let same = s.slot_for_ligature(9, "fi").unwrap();
        assert_eq!(plain, same);
        assert!(matches!(s.glyphs()[plain as usize], TtGlyph::Composite { glyph_index: 9 }));
    }

    #[test]
    fn push_fails_once_subset_is_full() {
        let mut s = FontSubsetter::new();
        for i in 1..MAX_SUBSET_SIZE as u16 {
            s.slot_for_glyph_index(i).unwrap();
        }
        assert_eq!(s.len(), MAX_SUBSET_SIZE);
        assert!(matches!(s.slot_for_glyph_index(u16::MAX), Err(Error::UnsupportedFontFormat)));
    }

    #[test]
    fn finish_pads_up_to_slot_32_and_is_idempotent() {
        let mut s = FontSubsetter::new();
        s.slot_for_char('a', |_| Some(1)).unwrap();
        s.finish(|_| Some(0));
        assert_eq!(s.len(), 33);
        assert_eq!(s.by_codepoint.get(&' '), Some(&32));
        let len_after_first_finish = s.len();
        s.finish(|_| panic!("finish must be a no-op the second time"));
        assert_eq!(s.len(), len_after_first_finish);
    }

    #[test]
    fn read_helpers_reject_out_of_bounds_offsets() {
        let data = [0u8, 1, 2, 3];
        assert!(read_u16(&data, 3).is_err());
        assert!(read_u32(&data, 1).is_err());
        assert_eq!(read_u16(&data, 0).unwrap(), 0x0001);
        assert_eq!(read_i16(&data, 0).unwrap(), 1);
    }

    #[test]
    fn parse_directory_and_table_round_trip_through_assemble_sfnt() {
        let head_bytes = vec![0xAA, 0xBB, 0xCC, 0xDD];
        let glyf_bytes = vec![1, 2, 3, 4, 5, 6];
        let file = assemble_sfnt(&[(b"head", &head_bytes), (b"glyf", &glyf_bytes)]);
        let tables = parse_directory(&file).unwrap();
        assert_eq!(table(&file, &tables, b"head").unwrap(), &head_bytes[..]);
        assert_eq!(table(&file, &tables, b"glyf").unwrap(), &glyf_bytes[..]);
        assert!(table(&file, &tables, b"cmap").is_err());
    }

    #[test]
    fn patch_checksum_adjustment_rewrites_head_table() {
        let head_bytes = vec![0u8; 12];
        let file = assemble_sfnt(&[(b"head", &head_bytes)]);
        let offset = find_head_table_offset(&file).unwrap();
        let original = file[offset + 8..offset + 12].to_vec();
        let patched = patch_checksum_adjustment(file);
        assert_ne!(&patched[offset + 8..offset + 12], &original[..]);
    }

    #[test]
    fn synthetic_cmap_maps_in_range_codes_and_zeroes_the_rest() {
        let cmap = build_synthetic_cmap(40);
        assert_eq!(cmap.len(), 18 + 256);
        assert_eq!(cmap[18 + 5], 5);
        assert_eq!(cmap[18 + 250], 0);
    }
}
