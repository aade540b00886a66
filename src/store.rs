//! The document's append-only object table.
//!
//! [`crate::document::Document`] allocates a single, ever-growing sequence of
//! object numbers. Most resources (images, ICC profiles, graphics states,
//! annotations, structure items, ...) are written straight into a
//! [`Chunk`](crate::Chunk) the moment they are registered, using the writer
//! types from the rest of the crate -- there is nothing left to do for them
//! at write time beyond copying the chunk's bytes into the final file.
//!
//! A handful of resources cannot be finished immediately because they depend
//! on state that is only known once every page has been recorded: font
//! subsets (which glyphs ended up used, and under which slots) and pages
//! (whose final `/Resources` dictionary depends on everything the page's
//! content stream referenced). Those are kept out of the chunk as `Pending`
//! cells and resolved by [`crate::writer`] during
//! [`crate::document::Document::write_to_file`].

use crate::ids::FontId;
use crate::object::Ref;

/// One slot in the document's object table.
///
/// Slot 0 is never used (PDF object numbers start at 1); [`Store::add_slot`]
/// returns a [`Ref`] whose value already accounts for this, so callers never
/// see index 0.
pub(crate) enum ObjectType {
    /// The object was already serialized into the document's [`Chunk`] under
    /// this object number; nothing further needs to happen at write time.
    Written,
    /// The root `/Pages` node; its `/Kids` and `/Count` are only known once
    /// every `add_page` call has happened.
    DelayedPages,
    /// A subsetted TrueType/CFF font program. Deferred because a font's
    /// subset keeps growing for as long as any page still references it.
    DelayedSubsetFontData(FontId),
    /// A font descriptor pointing at a not-yet-emitted subset font program.
    DelayedSubsetFontDescriptor(FontId),
    /// A ToUnicode CMap stream for a subsetted font.
    DelayedSubsetCMap(FontId),
    /// The `/Type0` wrapper font for a subsetted font.
    DelayedSubsetFont(FontId),
    /// The `/CIDFontType0` or `/CIDFontType2` descendant font dictionary.
    DelayedCidDictionary(FontId),
}

/// The append-only table backing a [`crate::document::Document`].
///
/// Owns the single [`Ref`] allocator shared by every resource kind so that
/// object numbers are handed out in the order callers register things,
/// matching the ordering guarantees in the crate's top-level documentation.
pub(crate) struct Store {
    next: Ref,
    slots: Vec<ObjectType>,
}

impl Store {
    pub(crate) fn new() -> Self {
        // Slot 0 is the sentinel; object numbering starts at 1.
        Self { next: Ref::new(1), slots: Vec::new() }
    }

    /// Allocate the next object number without recording anything about it
    /// yet. Used when a caller needs a [`Ref`] before it has written the
    /// object it names (e.g. a page needs its own id before its `/Parent`
    /// back-reference can be written).
    pub(crate) fn alloc(&mut self) -> Ref {
        self.next.bump()
    }

    /// Record that `id` (already allocated with [`Self::alloc`]) now refers
    /// to a fully written object.
    pub(crate) fn mark_written(&mut self, id: Ref) {
        self.set_slot(id, ObjectType::Written);
    }

    /// Allocate an object number and immediately record its deferred cell.
    pub(crate) fn add_pending(&mut self, make: impl FnOnce(Ref) -> ObjectType) -> Ref {
        let id = self.alloc();
        self.set_slot(id, make(id));
        id
    }

    fn set_slot(&mut self, id: Ref, cell: ObjectType) {
        let index = (id.get() - 1) as usize;
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || ObjectType::Written);
        }
        self.slots[index] = cell;
    }

    /// The number of object numbers handed out so far.
    pub(crate) fn object_count(&self) -> i32 {
        self.next.get() - 1
    }

    /// Iterate over every deferred cell along with its object number.
    pub(crate) fn pending(&self) -> impl Iterator<Item = (Ref, &ObjectType)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, cell)| !matches!(cell, ObjectType::Written))
            .map(|(index, cell)| (Ref::new(index as i32 + 1), cell))
    }
}
