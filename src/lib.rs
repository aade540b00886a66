/*!
A PDF document generation library.

This crate is split into two layers:

- A low-level PDF object writer (the [`Pdf`] and [`Chunk`] builders, the
  [`Content`] stream builder, and one writer type per PDF dictionary or
  stream) that mirrors the structure of the PDF 1.7/2.0 specification
  one-to-one. Nothing here validates cross-object consistency; it is a
  typed veneer over `N 0 obj ... endobj`.
- A document-level facade ([`Document`] in [`document`]) that allocates
  object identities for you, tracks everything that has been registered
  (pages, fonts, images, annotations, the structure tree, ...), enforces
  the invariants that make a tree of indirect objects into a valid,
  internally consistent PDF, and knows how to subset and embed fonts and
  write the finished file.

Most applications should reach for [`document::Document`]. The low-level
writers remain public because assembling a PDF from pieces built outside of
the `Document` facade (incremental updates, hand-rolled fixtures in tests)
is a real use case.

# Example

```
use pdfkit::{Pdf, Rect, Ref, Content, Name};

let catalog_id = Ref::new(1);
let page_tree_id = Ref::new(2);
let page_id = Ref::new(3);
let font_id = Ref::new(4);
let content_id = Ref::new(5);

let mut pdf = Pdf::new();
pdf.catalog(catalog_id).pages(page_tree_id);
pdf.pages(page_tree_id).kids([page_id]).count(1);

let mut page = pdf.page(page_id);
page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0));
page.parent(page_tree_id);
page.contents(content_id);
page.resources().fonts().pair(Name(b"F1"), font_id);
drop(page);

pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

let mut content = Content::new();
content.begin_text();
content.set_font(Name(b"F1"), 14.0);
content.next_line(108.0, 734.0);
content.show(pdfkit::Str(b"Hello World from Rust"));
content.end_text();
pdf.stream(content_id, &content.finish());

let bytes = pdf.finish();
```
*/

#![deny(missing_docs)]

#[macro_use]
mod macros;

mod actions;
mod annotations;
mod attributes;
mod buf;
mod bytes;
mod chunk;
mod color;
mod colorconv;
mod content;
mod draw;
mod error;
mod files;
mod font;
mod fontsub;
mod forms;
mod functions;
mod ids;
mod object;
mod renditions;
mod store;
mod stream;
mod structure;
mod text;
mod transitions;
mod types;
mod xobject;

pub mod document;
pub mod writer;

pub use crate::actions::*;
pub use crate::annotations::*;
pub use crate::attributes::*;
pub use crate::buf::{Buf, Limits};
pub use crate::chunk::Chunk;
pub use crate::color::*;
pub use crate::content::*;
pub use crate::document::Document;
pub use crate::error::{Error, Result};
pub use crate::files::*;
pub use crate::font::*;
pub use crate::forms::*;
pub use crate::functions::*;
pub use crate::ids::*;
pub use crate::object::{
    Date, Name, NameTree, Null, NumberTree, Obj, Primitive, Rect, Ref, Str, TextStr,
};
pub use crate::renditions::*;
pub use crate::stream::{Filter, Stream};
pub use crate::structure::*;
pub use crate::text::*;
pub use crate::transitions::*;
pub use crate::xobject::*;

use crate::object::{Array, Dict, TypedArray, TypedDict, Writer};

/// The top-level writer for a single PDF file.
///
/// Wraps a [`Chunk`] with the document's only object numbering sequence and
/// knows how to render the PDF header, cross-reference table and trailer
/// around it. For most applications this is a lower-level tool than
/// [`document::Document`], which additionally tracks what has been written
/// and assigns object identities for you.
pub struct Pdf {
    chunk: Chunk,
    major: i32,
    minor: i32,
}

impl Default for Pdf {
    fn default() -> Self {
        Self::new()
    }
}

impl Pdf {
    /// Create a new PDF writer, defaulting to version 1.7.
    pub fn new() -> Self {
        Self { chunk: Chunk::new(), major: 1, minor: 7 }
    }

    /// Set the PDF version written in the header.
    pub fn set_version(&mut self, major: i32, minor: i32) {
        self.major = major;
        self.minor = minor;
    }

    /// Start writing the document catalog.
    pub fn catalog(&mut self, id: Ref) -> Catalog<'_> {
        self.chunk.indirect(id).start()
    }

    /// Start writing the document information dictionary.
    pub fn document_info(&mut self, id: Ref) -> DocumentInfo<'_> {
        self.chunk.indirect(id).start()
    }

    /// Render the header, the buffered chunk, the cross-reference table and
    /// the trailer, consuming the writer.
    pub fn finish(self) -> Vec<u8> {
        let root = self
            .chunk
            .refs()
            .next()
            .expect("a PDF must contain at least the document catalog");
        self.finish_with_root(root)
    }

    /// Same as [`Self::finish`], but lets you pick the catalog's reference
    /// explicitly instead of assuming it is the first object written.
    pub fn finish_with_root(self, catalog_id: Ref) -> Vec<u8> {
        let mut buf = Buf::with_capacity(self.chunk.len() + 1024);
        buf.extend(format!("%PDF-{}.{}\n", self.major, self.minor).as_bytes());
        buf.extend(&[b'%', 0xe2, 0xe3, 0xcf, 0xd3, b'\n']);
        buf.extend(self.chunk.as_bytes());

        let mut offsets = self.chunk.offsets.clone();
        offsets.sort();
        let xref_len = 1 + offsets.last().map(|p| p.0.get()).unwrap_or(0);
        let xref_offset = buf.len();

        buf.extend(b"xref\n0 ");
        buf.push_val(xref_len);
        buf.extend(b"\n0000000000 65535 f \n");

        let mut next = 1;
        for &(id, offset) in &offsets {
            let id = id.get();
            while next < id {
                buf.extend(b"0000000000 65535 f \n");
                next += 1;
            }
            buf.push_int_aligned(offset, 10);
            buf.extend(b" 00000 n \n");
            next = id + 1;
        }

        buf.extend(b"trailer\n");
        {
            let mut dict = Dict::start(&mut buf, 0, object::Finish::None);
            dict.pair(Name(b"Size"), xref_len);
            dict.pair(Name(b"Root"), catalog_id);
        }

        buf.extend(b"\nstartxref\n");
        buf.push_int_aligned(xref_offset, 0);
        buf.extend(b"\n%%EOF");
        buf.inner
    }
}

impl std::ops::Deref for Pdf {
    type Target = Chunk;

    fn deref(&self) -> &Chunk {
        &self.chunk
    }
}

impl std::ops::DerefMut for Pdf {
    fn deref_mut(&mut self) -> &mut Chunk {
        &mut self.chunk
    }
}
