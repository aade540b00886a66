//! Final assembly (C8): resolving every deferred object a [`Document`]
//! collected and serializing the whole thing to PDF bytes.
//!
//! Everything a [`Document`] writes through its registration methods lands
//! straight in its [`crate::chunk::Chunk`] except for a handful of objects
//! that can only be finished once every page is known: font subsets (which
//! glyphs ended up used, under which slots), the root `/Pages` node,
//! annotations and form widgets (their `/P` back-reference), the structure
//! tree (a child's `/P` can only be written once every later
//! `add_structure_item` call naming it as parent has happened), the outline,
//! and the catalog itself. [`Document::write_to_bytes`] resolves all of
//! these, then serializes header, objects, cross-reference table and
//! trailer in one pass.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::bytes::bytes_to_hex;
use crate::document::{Document, OutputIntentKind};
use crate::fontsub::{emit_subset, TtGlyph};
use crate::stream::Filter;
use crate::structure::{DocumentInfo, PageLabel, StructTreeRoot};
use crate::{
    AnnotationType, CheckBoxState, CidFontType, FieldType, FontFlags, Name, OutputIntent, Ref,
    Str, SystemInfo, TextStr, UnicodeCmap,
};
use crate::{Error, Result};

impl Document {
    /// Write this document to `path`, consuming it. `id` becomes the
    /// trailer's `/ID` (both the first and second array element, per the
    /// common convention for a freshly-created file); callers supply their
    /// own randomness since this crate has no RNG dependency of its own.
    ///
    /// The bytes are written to a sibling `path~` file and fsync'd before
    /// being renamed onto `path`, so a crash or an error partway through
    /// never leaves a truncated file at `path` itself: either the rename
    /// happens and `path` holds the complete document, or it doesn't and
    /// any partial output is left behind at `path~`.
    pub fn write_to_file(mut self, path: &Path, id: [u8; 16]) -> Result<()> {
        let bytes = self.write_to_bytes(id)?;

        let file_name = path.file_name().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "output path has no file name")
        })?;
        let mut tmp_name = OsString::from(file_name);
        tmp_name.push("~");
        let tmp_path: PathBuf = path.with_file_name(tmp_name);

        let mut file = File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Render this document to a complete PDF byte buffer.
    pub fn write_to_bytes(&mut self, id: [u8; 16]) -> Result<Vec<u8>> {
        if self.write_attempted {
            return Err(Error::WritingTwice);
        }
        if self.pages.is_empty() {
            return Err(Error::NoPages);
        }
        self.write_attempted = true;

        self.resolve_fonts()?;
        self.write_pages_root();
        self.write_annotations_and_widgets()?;
        self.write_structure_tree();
        self.write_outline();
        let page_label_refs = self.write_page_labels();
        self.write_document_info();
        self.write_catalog(&page_label_refs);

        Ok(self.assemble(id))
    }

    fn resolve_fonts(&mut self) -> Result<()> {
        for idx in 0..self.fonts.len() {
            let (data_id, descriptor_id, cmap_id, cid_id, font_id, base_name) = {
                let entry = &self.fonts[idx];
                (
                    entry.data_id,
                    entry.descriptor_id,
                    entry.cmap_id,
                    entry.cid_id,
                    entry.font_id,
                    entry.base_name.clone(),
                )
            };

            self.fonts[idx].thingy.finish_subset();
            let (subset_bytes, is_truetype) = {
                let entry = &mut self.fonts[idx];
                let data = entry.thingy.data().to_vec();
                emit_subset(&data, entry.thingy.subsetter())?
            };
            let uncompressed_len = subset_bytes.len() as i32;
            let (compressed, did_compress) = self.compress(&subset_bytes);
            {
                let mut stream = self.chunk.stream(data_id, &compressed);
                if did_compress {
                    stream.filter(Filter::FlateDecode);
                }
                stream.pair(Name(b"Length1"), uncompressed_len);
                if !is_truetype {
                    stream.pair(Name(b"Subtype"), Name(b"OpenType"));
                }
            }

            let subset_tag = subset_tag_for(font_id.get() as u32);
            let tagged_name = format!("{subset_tag}+{base_name}");

            let (ascent, descent, cap_height, bbox, italic_angle) = {
                let entry = &self.fonts[idx];
                let face = entry.thingy.face();
                let to_1000 = |v: f32| entry.thingy.to_1000_units(v);
                let bbox = face.global_bounding_box();
                (
                    to_1000(face.ascender() as f32),
                    to_1000(face.descender() as f32),
                    face.capital_height().map(|v| to_1000(v as f32)).unwrap_or(0.0),
                    crate::object::Rect::new(
                        to_1000(bbox.x_min as f32),
                        to_1000(bbox.y_min as f32),
                        to_1000(bbox.x_max as f32),
                        to_1000(bbox.y_max as f32),
                    ),
                    if face.is_italic() { -12.0 } else { 0.0 },
                )
            };

            {
                let mut descriptor = self.chunk.font_descriptor(descriptor_id);
                descriptor.name(Name(tagged_name.as_bytes()));
                descriptor.flags(FontFlags::SYMBOLIC);
                descriptor.bbox(bbox);
                descriptor.italic_angle(italic_angle);
                descriptor.ascent(ascent);
                descriptor.descent(descent);
                descriptor.cap_height(cap_height);
                descriptor.stem_v(80.0);
                descriptor.missing_width(0.0);
                if is_truetype {
                    descriptor.font_file2(data_id);
                } else {
                    descriptor.font_file3(data_id);
                }
            }

            let glyph_count = {
                let entry = &self.fonts[idx];
                entry.thingy.subsetter().len()
            };
            let widths: Vec<f32> =
                (0..glyph_count as u16).map(|slot| self.fonts[idx].thingy.width_of_slot(slot)).collect();

            {
                let mut cid = self.chunk.cid_font(cid_id);
                cid.subtype(if is_truetype { CidFontType::Type2 } else { CidFontType::Type0 });
                cid.base_font(Name(tagged_name.as_bytes()));
                cid.system_info(SystemInfo {
                    registry: Str(b"Adobe"),
                    ordering: Str(b"Identity"),
                    supplement: 0,
                });
                cid.font_descriptor(descriptor_id);
                cid.default_width(0.0);
                cid.widths().consecutive(0, widths.iter().copied());
                cid.cid_to_gid_map_predefined(Name(b"Identity"));
            }

            let mut unicode_cmap = UnicodeCmap::new(
                Name(b"Custom-UCS"),
                SystemInfo { registry: Str(b"Adobe"), ordering: Str(b"UCS"), supplement: 0 },
            );
            for (slot, glyph) in self.fonts[idx].thingy.subsetter().glyphs().iter().enumerate() {
                match glyph {
                    TtGlyph::Regular { codepoint, .. } => {
                        if *codepoint != '\0' {
                            unicode_cmap.pair(slot as u16, *codepoint);
                        }
                    }
                    TtGlyph::Ligature { source_text, .. } => {
                        unicode_cmap.pair_with_multiple(slot as u16, source_text.chars());
                    }
                    TtGlyph::Composite { .. } => {}
                }
            }
            let cmap_buf = unicode_cmap.finish();
            {
                let mut cmap = self.chunk.cmap(cmap_id, &cmap_buf);
                cmap.name(Name(b"Custom-UCS"));
                cmap.system_info(SystemInfo {
                    registry: Str(b"Adobe"),
                    ordering: Str(b"UCS"),
                    supplement: 0,
                });
            }

            {
                let mut t0 = self.chunk.type0_font(font_id);
                t0.base_font(Name(tagged_name.as_bytes()));
                t0.encoding_predefined(Name(b"Identity-H"));
                t0.descendant_font(cid_id);
                t0.to_unicode(cmap_id);
            }
        }
        Ok(())
    }

    fn write_pages_root(&mut self) {
        self.chunk.pages(self.pages_id).kids(self.pages.iter().copied()).count(self.pages.len() as i32);
    }

    fn embedded_file_ref(&self, file: crate::EmbeddedFileId) -> Option<Ref> {
        self.embedded_files.values().find(|(id, _)| id.index() == file.index()).map(|(_, r)| *r)
    }

    fn write_annotations_and_widgets(&mut self) -> Result<()> {
        for entry in &self.annotations {
            let mut annot = self.chunk.annotation(entry.id);
            annot.subtype(entry.spec.kind);
            annot.rect(entry.spec.rect);
            if let Some(contents) = &entry.spec.contents {
                annot.contents(TextStr(contents));
            }
            if let Some(name) = &entry.spec.name {
                annot.name(TextStr(name));
            }
            if let Some(flags) = entry.spec.flags {
                annot.flags(flags);
            }
            if let Some([r, g, b]) = entry.spec.color {
                annot.color_rgb(r, g, b);
            }
            if let Some(uri) = &entry.spec.uri_action {
                annot.action().uri(Str(uri.as_bytes()));
            }
            if let Some(file) = entry.spec.embedded_file {
                let file_ref =
                    self.embedded_files.values().find(|(id, _)| id.index() == file.index()).map(|(_, r)| *r);
                if let Some(file_ref) = file_ref {
                    annot.file_spec().embedded_file(file_ref);
                }
            }
            if let Some(icon) = entry.spec.icon {
                annot.icon(icon);
            }
            if let Some(page_ref) = entry.used {
                annot.pair(Name(b"P"), page_ref);
            }
            if let Some(media) = &entry.spec.screen_media {
                let file_ref = self
                    .embedded_files
                    .values()
                    .find(|(id, _)| id.index() == media.embedded_file.index())
                    .map(|(_, r)| *r);
                if let Some(file_ref) = file_ref {
                    let mut action = annot.insert(Name(b"A")).dict();
                    action.pair(Name(b"Type"), Name(b"Action"));
                    action.pair(Name(b"S"), Name(b"Rendition"));
                    action.pair(Name(b"OP"), 0);
                    let mut rendition = action.insert(Name(b"R")).dict();
                    rendition.pair(Name(b"Type"), Name(b"Rendition"));
                    rendition.pair(Name(b"S"), Name(b"MR"));
                    {
                        let mut clip = rendition.insert(Name(b"C")).dict();
                        clip.pair(Name(b"Type"), Name(b"MediaClip"));
                        clip.pair(Name(b"S"), Name(b"MCD"));
                        clip.pair(Name(b"CT"), TextStr(&media.content_type));
                        let mut data = clip.insert(Name(b"D")).dict();
                        data.pair(Name(b"Type"), Name(b"Filespec"));
                        data.pair(Name(b"F"), file_ref);
                    }
                    if media.autoplay {
                        // Timing dictionary: Acrobat is known to ignore it,
                        // kept for viewers that do honor it.
                        let mut mh = rendition.insert(Name(b"MH")).dict();
                        let mut play = mh.insert(Name(b"PL")).dict();
                        play.pair(Name(b"Type"), Name(b"MediaPlayParams"));
                    }
                }
            }
        }

        for entry in &self.widgets {
            let on_ref =
                self.form_xobjects.get(entry.spec.on_appearance.index()).copied().ok_or(Error::UnknownResource)?;
            let off_ref =
                self.form_xobjects.get(entry.spec.off_appearance.index()).copied().ok_or(Error::UnknownResource)?;

            let mut field = self.chunk.form_field(entry.id);
            field.field_type(FieldType::Button);
            field.partial_name(TextStr(&entry.spec.partial_name));
            field.checkbox_value(if entry.spec.checked { CheckBoxState::Yes } else { CheckBoxState::Off });

            let mut annot = field.to_annotation();
            annot.rect(entry.spec.rect);
            {
                let mut ap = annot.insert(Name(b"AP")).dict();
                let mut normal = ap.insert(Name(b"N")).dict();
                normal.pair(Name(b"Yes"), on_ref);
                normal.pair(Name(b"Off"), off_ref);
            }
            annot.pair(Name(b"AS"), if entry.spec.checked { Name(b"Yes") } else { Name(b"Off") });
            if let Some(page_ref) = entry.used {
                annot.pair(Name(b"P"), page_ref);
            }
        }
        Ok(())
    }

    fn write_structure_tree(&mut self) {
        let Some(root_id) = self.struct_tree_root_id else { return };

        for i in 0..self.structure_items.len() {
            let children: Vec<Ref> = self
                .structure_items
                .iter()
                .enumerate()
                .filter(|(j, e)| e.spec.parent.map(|p| p.index()) == Some(i) && *j != i)
                .map(|(_, e)| e.id)
                .collect();
            let (id, role, parent_ref, used) = {
                let entry = &self.structure_items[i];
                let parent_ref = match entry.spec.parent {
                    Some(p) => self.structure_items[p.index()].id,
                    None => root_id,
                };
                (entry.id, entry.spec.role, parent_ref, entry.used)
            };

            let mut elem = self.chunk.struct_element(id);
            elem.kind(role);
            elem.parent(parent_ref);
            if let Some(alt) = &self.structure_items[i].spec.alt {
                elem.alt(TextStr(alt));
            }
            if let Some(actual) = &self.structure_items[i].spec.actual_text {
                elem.actual_text(TextStr(actual));
            }
            if let Some(lang) = &self.structure_items[i].spec.lang {
                elem.lang(TextStr(lang));
            }
            if let Some((page_ref, _)) = used {
                elem.page(page_ref);
            }
            if !children.is_empty() {
                let mut kids = elem.children();
                for child in children {
                    kids.struct_element(child);
                }
            }
        }

        let mut parent_tree_entries: Vec<(i32, Ref)> = Vec::new();
        for entry in &self.structure_items {
            if let Some((_, key)) = entry.used {
                if !parent_tree_entries.iter().any(|&(k, _)| k == key) {
                    parent_tree_entries.push((key, entry.id));
                }
            }
        }
        parent_tree_entries.sort_unstable_by_key(|&(k, _)| k);

        let top_level: Vec<Ref> =
            self.structure_items.iter().filter(|e| e.spec.parent.is_none()).map(|e| e.id).collect();

        let mut root = self.chunk.indirect(root_id).start::<StructTreeRoot<'_>>();
        if !top_level.is_empty() {
            root.children().items(top_level);
        }
        if !parent_tree_entries.is_empty() {
            root.parent_tree().nums(parent_tree_entries);
        }
    }

    fn write_outline(&mut self) {
        let Some(root_id) = self.outline_root_id else { return };
        let mut first = None;
        let mut last = None;
        let mut count = 0;
        for i in 0..self.outlines.len() {
            if self.outlines[i].spec.parent.is_some() {
                continue;
            }
            if first.is_none() {
                first = Some(self.outlines[i].id);
            }
            last = Some(self.outlines[i].id);
            count += 1;
        }
        for i in 0..self.outlines.len() {
            let (id, title, parent, dest_page, color) = {
                let e = &self.outlines[i];
                (e.id, e.spec.title.clone(), e.spec.parent, e.spec.dest_page, e.spec.color)
            };
            let siblings: Vec<usize> = self
                .outlines
                .iter()
                .enumerate()
                .filter(|(_, e)| e.spec.parent.map(|p| p.index()) == parent.map(|p| p.index()))
                .map(|(j, _)| j)
                .collect();
            let pos = siblings.iter().position(|&j| j == i).unwrap_or(0);
            let prev = pos.checked_sub(1).map(|p| self.outlines[siblings[p]].id);
            let next = siblings.get(pos + 1).map(|&j| self.outlines[j].id);
            let children: Vec<usize> = self
                .outlines
                .iter()
                .enumerate()
                .filter(|(_, e)| e.spec.parent.map(|p| p.index()) == Some(i))
                .map(|(j, _)| j)
                .collect();

            let mut item = self.chunk.outline_item(id);
            item.title(TextStr(&title));
            item.parent(parent.map(|p| self.outlines[p.index()].id).unwrap_or(root_id));
            if let Some(prev) = prev {
                item.prev(prev);
            }
            if let Some(next) = next {
                item.next(next);
            }
            if let Some(&first) = children.first() {
                item.first(self.outlines[first].id);
            }
            if let Some(&last) = children.last() {
                item.last(self.outlines[last].id);
            }
            if !children.is_empty() {
                item.count(children.len() as i32);
            }
            if let Some((page, y)) = dest_page {
                if let Some(&page_ref) = self.pages.get(page as usize) {
                    item.dest().page(page_ref).xyz(0.0, y, None);
                }
            }
            if let Some([r, g, b]) = color {
                item.color_rgb(r, g, b);
            }
        }

        let mut outline = self.chunk.outline(root_id);
        if let Some(first) = first {
            outline.first(first);
        }
        if let Some(last) = last {
            outline.last(last);
        }
        outline.count(count);
    }

    fn write_page_labels(&mut self) -> Vec<(i32, Ref)> {
        let mut refs = Vec::with_capacity(self.page_labels.len());
        for i in 0..self.page_labels.len() {
            let label_id = self.store.alloc();
            {
                let (start, spec) = &self.page_labels[i];
                let mut label = self.chunk.indirect(label_id).start::<PageLabel<'_>>();
                if let Some(style) = spec.style {
                    label.style(style);
                }
                if let Some(prefix) = &spec.prefix {
                    label.prefix(TextStr(prefix));
                }
                if let Some(start_num) = spec.start_num {
                    label.offset(start_num);
                }
                refs.push((*start, label_id));
            }
        }
        refs
    }

    fn write_document_info(&mut self) {
        let mut info = self.chunk.indirect(self.info_id).start::<DocumentInfo<'_>>();
        if let Some(title) = &self.props.title {
            info.title(TextStr(title));
        }
        if let Some(author) = &self.props.author {
            info.author(TextStr(author));
        }
        if let Some(subject) = &self.props.subject {
            info.subject(TextStr(subject));
        }
        if let Some(keywords) = &self.props.keywords {
            info.keywords(TextStr(keywords));
        }
        if let Some(creator) = &self.props.creator {
            info.creator(TextStr(creator));
        }
        if let Some(producer) = &self.props.producer {
            info.producer(TextStr(producer));
        } else {
            info.producer(TextStr("pdfkit"));
        }
        if let Some(trapped) = self.props.trapped {
            info.trapped(trapped);
        }
        if let Some(creation_date) = self.props.creation_date {
            info.creation_date(creation_date);
        }
        if let Some(mod_date) = self.props.mod_date {
            info.mod_date(mod_date);
        }
    }

    fn write_catalog(&mut self, page_labels: &[(i32, Ref)]) {
        let mut catalog = self.chunk.indirect(self.catalog_id).start::<crate::structure::Catalog<'_>>();
        catalog.pages(self.pages_id);
        if let Some(lang) = &self.props.lang {
            catalog.lang(TextStr(lang));
        }
        if let Some(layout) = self.props.page_layout {
            catalog.page_layout(layout);
        }
        if let Some(mode) = self.props.page_mode {
            catalog.page_mode(mode);
        }
        if let Some(root_id) = self.struct_tree_root_id {
            catalog.pair(Name(b"StructTreeRoot"), root_id);
        }
        if let Some(root_id) = self.outline_root_id {
            catalog.outlines(root_id);
        }
        if let Some(profile_id) = self.output_intent_icc_id {
            if let Some(spec) = &self.props.output_intent {
                let subtype = match spec.kind {
                    OutputIntentKind::PdfX => Name(b"GTS_PDFX"),
                    OutputIntentKind::PdfA => Name(b"GTS_PDFA1"),
                };
                let condition = spec.output_condition_identifier.clone();
                let info_str = spec.info.clone();
                let mut intents = catalog.output_intents();
                let mut intent = intents.obj().start::<OutputIntent<'_>>();
                intent.subtype(subtype);
                intent.output_condition_identifier(TextStr(&condition));
                if let Some(info) = &info_str {
                    intent.info(TextStr(info));
                }
                intent.dest_output_profile(profile_id);
            }
        }
        if !page_labels.is_empty() {
            catalog.page_labels().nums(page_labels.iter().copied());
        }
        if !self.optional_content_groups.is_empty() {
            let mut oc_properties = catalog.oc_properties();
            oc_properties.groups(self.optional_content_groups.iter().copied());
            oc_properties.default_config().on(self.optional_content_groups.iter().copied());
        }
    }

    /// Compress and serialize a final, complete PDF, using the already
    /// fully-written [`crate::chunk::Chunk`] plus the trailer's `/Info` and
    /// `/ID` (not emitted by a plain root-only trailer).
    fn assemble(&self, id: [u8; 16]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.chunk.len() + 256);
        out.extend_from_slice(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n");

        let header_len = out.len();
        out.extend_from_slice(self.chunk.as_bytes());

        let mut offsets: Vec<(i32, usize)> =
            self.chunk.offsets.iter().map(|&(r, offset)| (r.get(), header_len + offset)).collect();
        offsets.sort_unstable();

        let xref_offset = out.len();
        let max_id = offsets.iter().map(|&(id, _)| id).max().unwrap_or(0);
        out.extend_from_slice(b"xref\n");
        out.extend_from_slice(format!("0 {}\n", max_id + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        let mut next = 1;
        for &(obj_id, offset) in &offsets {
            while next < obj_id {
                out.extend_from_slice(b"0000000000 65535 f \n");
                next += 1;
            }
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
            next += 1;
        }
        while next <= max_id {
            out.extend_from_slice(b"0000000000 65535 f \n");
            next += 1;
        }

        out.extend_from_slice(b"trailer\n");
        out.extend_from_slice(
            format!(
                "<< /Size {} /Root {} 0 R /Info {} 0 R /ID [<{}> <{}>] >>\n",
                max_id + 1,
                self.catalog_id.get(),
                self.info_id.get(),
                bytes_to_hex(&id),
                bytes_to_hex(&id),
            )
            .as_bytes(),
        );
        out.extend_from_slice(b"startxref\n");
        out.extend_from_slice(format!("{xref_offset}\n").as_bytes());
        out.extend_from_slice(b"%%EOF\n");
        out
    }
}

/// A deterministic 6-letter subset tag (`AAAAAA`, `AAAAAB`, ...) derived from
/// a font's object number, as required of the `/BaseFont` prefix of a
/// subsetted font (PDF 32000-1:2008, 9.6.4).
fn subset_tag_for(mut n: u32) -> String {
    let mut letters = [b'A'; 6];
    for slot in letters.iter_mut().rev() {
        *slot = b'A' + (n % 26) as u8;
        n /= 26;
    }
    String::from_utf8(letters.to_vec()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_tag_is_six_uppercase_letters() {
        let tag = subset_tag_for(0);
        assert_eq!(tag.len(), 6);
        assert!(tag.bytes().all(|b| b.is_ascii_uppercase()));
        assert_eq!(tag, "AAAAAA");
    }

    #[test]
    fn subset_tag_is_deterministic_and_varies_with_input() {
        assert_eq!(subset_tag_for(5), subset_tag_for(5));
        assert_ne!(subset_tag_for(1), subset_tag_for(2));
        assert_eq!(subset_tag_for(26), "AAAABA");
    }
}
