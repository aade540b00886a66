//! `PdfText`: the nested text-object builder used by [`crate::draw`].
//!
//! A `PdfText` records a flat list of [`TextEvent`]s instead of emitting
//! content-stream bytes directly. The indirection exists because showing a
//! string requires mapping every character to a glyph slot in a font subset
//! (via [`crate::fontsub`]) before anything can be written, and the subset a
//! character lands in is only known once the draw context resolves it
//! against the document's font table -- something a bare text builder has no
//! access to. [`PdfText::write`] is where that resolution and the actual
//! `BT`..`ET` emission happens.

use crate::color::DeviceColorSpace;
use crate::content::{Content, LineCapStyle, LineJoinStyle, TextRenderingMode};
use crate::ids::{FontId, GraphicsStateId, StructureItemId};
use crate::object::{Name, Str};
use crate::{Error, Result};

/// One glyph-level item inside a `TJ` array.
pub(crate) enum GlyphItem {
    /// A run of characters shown through the ordinary codepoint-to-glyph
    /// path.
    Text(String),
    /// A kerning adjustment between two runs, in thousandths of text space.
    Adjust(f32),
    /// A glyph referenced directly by index, with an optional Unicode value
    /// to record in the ToUnicode map.
    Glyph { glyph_index: u16, unicode_codepoint: Option<char> },
    /// A ligature glyph standing in for more than one source character.
    GlyphText { glyph_index: u16, source_text: String },
}

/// One recorded operation inside a text object.
pub(crate) enum TextEvent {
    /// `Tf`.
    Font(FontId, f32),
    /// `Td`.
    MoveLine(f32, f32),
    /// `TD`.
    MoveLineSetLeading(f32, f32),
    /// `Tm`.
    Matrix([f32; 6]),
    /// `T*`.
    NextLine,
    /// `TL`.
    Leading(f32),
    /// `Tc`.
    CharSpacing(f32),
    /// `Tr`.
    RenderMode(TextRenderingMode),
    /// `Ts`.
    Rise(f32),
    /// `Tz`.
    HorizontalScaling(f32),
    /// `Tj` over a plain string.
    Show(String),
    /// `TJ` over a mixed glyph/kerning array.
    ShowPositioned(Vec<GlyphItem>),
    /// `RG`/`rg`/`K`/`k`/`G`/`g`, already resolved to device color.
    StrokeColor(DeviceColorSpace, Vec<f32>),
    NonstrokeColor(DeviceColorSpace, Vec<f32>),
    /// `w`.
    LineWidth(f32),
    /// `J`.
    LineCap(LineCapStyle),
    /// `j`.
    LineJoin(LineJoinStyle),
    /// `M`.
    MiterLimit(f32),
    /// `d`.
    DashPattern(Vec<f32>, f32),
    /// `gs`.
    GraphicsState(GraphicsStateId),
    /// `/StructureItem <</MCID k>> BDC`, tagging the following events with a
    /// structure parent.
    StructureItem(StructureItemId),
    /// `EMC`, closing the most recently opened structure tag.
    Emc,
}

/// Resolves characters and raw glyph indices against a font's subset.
///
/// A font keeps a single subset for as long as it stays under the 255-glyph
/// cap (F4), so unlike the object number a glyph's *slot* is not stable
/// until the document finishes writing -- `resolve_char`/`resolve_glyph`
/// only need to return the slot, and the font's wrapper object number
/// (needed for the `/SFont{obj}-0` resource name) can be looked up
/// independently of any particular glyph via [`Self::font_object`].
pub(crate) trait GlyphResolver {
    /// The PDF object number backing `font`'s `/Type0` wrapper font. Known
    /// from the moment the font was loaded, since object numbers for
    /// deferred cells are allocated eagerly.
    fn font_object(&self, font: FontId) -> Result<u32>;

    /// Resolve `codepoint` against `font`, recording it in that font's
    /// subset if it has not been seen before.
    fn resolve_char(&mut self, font: FontId, codepoint: char) -> Result<u16>;

    /// Resolve a raw glyph index against `font`'s subset, optionally
    /// recording the Unicode value or ligature source text it stands for.
    fn resolve_glyph(&mut self, font: FontId, glyph_index: u16, unicode: Option<&str>) -> Result<u16>;

    /// The subset-tagged `/SFont{obj}-0` resource name (without the leading
    /// slash) for a font's wrapper object.
    fn subset_name(&self, font_obj: u32) -> Vec<u8>;
}

/// A builder for one text object (`BT`..`ET`).
///
/// Bound to the [`crate::draw::DrawContext`] it was created from; attempting
/// to [`PdfText::write`] it against a different context's [`Content`] is
/// rejected with [`Error::WrongDrawContext`] by the caller, which is the only
/// party that knows both contexts' identities.
pub(crate) struct PdfText {
    events: Vec<TextEvent>,
    current_font: Option<FontId>,
    open_structure: bool,
}

impl PdfText {
    pub(crate) fn new() -> Self {
        Self { events: Vec::new(), current_font: None, open_structure: false }
    }

    pub(crate) fn set_font(&mut self, font: FontId, size: f32) -> &mut Self {
        self.current_font = Some(font);
        self.events.push(TextEvent::Font(font, size));
        self
    }

    pub(crate) fn move_line(&mut self, x: f32, y: f32) -> &mut Self {
        self.events.push(TextEvent::MoveLine(x, y));
        self
    }

    pub(crate) fn move_line_set_leading(&mut self, x: f32, y: f32) -> &mut Self {
        self.events.push(TextEvent::MoveLineSetLeading(x, y));
        self
    }

    pub(crate) fn matrix(&mut self, matrix: [f32; 6]) -> &mut Self {
        self.events.push(TextEvent::Matrix(matrix));
        self
    }

    pub(crate) fn next_line(&mut self) -> &mut Self {
        self.events.push(TextEvent::NextLine);
        self
    }

    pub(crate) fn leading(&mut self, value: f32) -> &mut Self {
        self.events.push(TextEvent::Leading(value));
        self
    }

    pub(crate) fn char_spacing(&mut self, value: f32) -> &mut Self {
        self.events.push(TextEvent::CharSpacing(value));
        self
    }

    pub(crate) fn render_mode(&mut self, mode: TextRenderingMode) -> &mut Self {
        self.events.push(TextEvent::RenderMode(mode));
        self
    }

    pub(crate) fn rise(&mut self, value: f32) -> &mut Self {
        self.events.push(TextEvent::Rise(value));
        self
    }

    pub(crate) fn horizontal_scaling(&mut self, value: f32) -> &mut Self {
        self.events.push(TextEvent::HorizontalScaling(value));
        self
    }

    pub(crate) fn show(&mut self, text: impl Into<String>) -> Result<&mut Self> {
        if self.current_font.is_none() {
            return Err(Error::FontNotSpecified);
        }
        self.events.push(TextEvent::Show(text.into()));
        Ok(self)
    }

    pub(crate) fn show_positioned(&mut self, items: Vec<GlyphItem>) -> Result<&mut Self> {
        if self.current_font.is_none() {
            return Err(Error::FontNotSpecified);
        }
        self.events.push(TextEvent::ShowPositioned(items));
        Ok(self)
    }

    pub(crate) fn line_width(&mut self, width: f32) -> Result<&mut Self> {
        if width < 0.0 {
            return Err(Error::NegativeLineWidth);
        }
        self.events.push(TextEvent::LineWidth(width));
        Ok(self)
    }

    pub(crate) fn dash_pattern(&mut self, array: Vec<f32>, phase: f32) -> Result<&mut Self> {
        if array.iter().any(|&v| v < 0.0) {
            return Err(Error::NegativeDash);
        }
        self.events.push(TextEvent::DashPattern(array, phase));
        Ok(self)
    }

    pub(crate) fn graphics_state(&mut self, gs: GraphicsStateId) -> &mut Self {
        self.events.push(TextEvent::GraphicsState(gs));
        self
    }

    pub(crate) fn begin_structure_item(&mut self, item: StructureItemId) -> &mut Self {
        self.open_structure = true;
        self.events.push(TextEvent::StructureItem(item));
        self
    }

    pub(crate) fn end_marked_content(&mut self) -> Result<&mut Self> {
        if !self.open_structure {
            return Err(Error::UnclosedMarkedContent);
        }
        self.open_structure = false;
        self.events.push(TextEvent::Emc);
        Ok(self)
    }

    /// Render the recorded events into `content`, resolving every shown
    /// character through `resolver`.
    pub(crate) fn write(self, content: &mut Content, resolver: &mut impl GlyphResolver) -> Result<()> {
        if self.open_structure {
            return Err(Error::UnclosedMarkedContent);
        }
        content.begin_text();
        let mut current_font = None;

        for event in self.events {
            match event {
                TextEvent::Font(font, size) => {
                    current_font = Some(font);
                    let font_obj = resolver.font_object(font)?;
                    let name = resolver.subset_name(font_obj);
                    content.set_font(Name(&name), size);
                }
                TextEvent::MoveLine(x, y) => {
                    content.next_line(x, y);
                }
                TextEvent::MoveLineSetLeading(x, y) => {
                    content.next_line_and_set_leading(x, y);
                }
                TextEvent::Matrix(m) => {
                    content.set_text_matrix(m);
                }
                TextEvent::NextLine => {
                    content.next_line_using_leading();
                }
                TextEvent::Leading(v) => {
                    content.set_leading(v);
                }
                TextEvent::CharSpacing(v) => {
                    content.set_char_spacing(v);
                }
                TextEvent::RenderMode(mode) => {
                    content.set_text_rendering_mode(mode);
                }
                TextEvent::Rise(v) => {
                    content.set_rise(v);
                }
                TextEvent::HorizontalScaling(v) => {
                    content.set_horizontal_scaling(v);
                }
                TextEvent::Show(text) => {
                    let font = current_font.ok_or(Error::FontNotSpecified)?;
                    let mut hex = Vec::new();
                    for ch in text.chars() {
                        hex.push(resolver.resolve_char(font, ch)?);
                    }
                    show_hex(content, &hex);
                }
                TextEvent::ShowPositioned(items) => {
                    let font = current_font.ok_or(Error::FontNotSpecified)?;
                    let mut show = content.show_positioned();
                    let mut array = show.items();
                    for item in items {
                        match item {
                            GlyphItem::Text(text) => {
                                let mut hex = Vec::new();
                                for ch in text.chars() {
                                    hex.push(resolver.resolve_char(font, ch)?);
                                }
                                show_hex_items(&mut array, &hex);
                            }
                            GlyphItem::Adjust(amount) => {
                                array.adjust(amount);
                            }
                            GlyphItem::Glyph { glyph_index, unicode_codepoint } => {
                                let unicode = unicode_codepoint.map(|c| c.to_string());
                                let slot =
                                    resolver.resolve_glyph(font, glyph_index, unicode.as_deref())?;
                                show_hex_items(&mut array, &[slot]);
                            }
                            GlyphItem::GlyphText { glyph_index, source_text } => {
                                let slot =
                                    resolver.resolve_glyph(font, glyph_index, Some(&source_text))?;
                                show_hex_items(&mut array, &[slot]);
                            }
                        }
                    }
                }
                TextEvent::StrokeColor(space, values) => {
                    set_device_color(content, space, &values, true);
                }
                TextEvent::NonstrokeColor(space, values) => {
                    set_device_color(content, space, &values, false);
                }
                TextEvent::LineWidth(w) => {
                    content.set_line_width(w);
                }
                TextEvent::LineCap(cap) => {
                    content.set_line_cap(cap);
                }
                TextEvent::LineJoin(join) => {
                    content.set_line_join(join);
                }
                TextEvent::MiterLimit(limit) => {
                    content.set_miter_limit(limit);
                }
                TextEvent::DashPattern(array, phase) => {
                    content.set_dash_pattern(array, phase);
                }
                TextEvent::GraphicsState(_gs) => {
                    // Resource name resolution happens in `draw.rs`, which
                    // owns the use-set this glyph stream is validated
                    // against.
                }
                TextEvent::StructureItem(_item) => {}
                TextEvent::Emc => {
                    content.end_marked_content();
                }
            }
        }

        content.end_text();
        Ok(())
    }
}

/// Pack subset slots as big-endian CIDs, per the `/Encoding /Identity-H`
/// declared on every `Type0Font` this crate writes.
fn show_hex(content: &mut Content, slots: &[u16]) {
    let mut bytes = Vec::with_capacity(2 * slots.len());
    for &slot in slots {
        bytes.extend(slot.to_be_bytes());
    }
    content.show(Str(&bytes));
}

fn show_hex_items(items: &mut crate::content::PositionedItems<'_>, slots: &[u16]) {
    let mut bytes = Vec::with_capacity(2 * slots.len());
    for &slot in slots {
        bytes.extend(slot.to_be_bytes());
    }
    items.show(Str(&bytes));
}

fn set_device_color(content: &mut Content, space: DeviceColorSpace, values: &[f32], stroke: bool) {
    match space {
        DeviceColorSpace::Rgb => {
            let [r, g, b] = [values[0], values[1], values[2]];
            if stroke {
                content.set_stroke_rgb(r, g, b);
            } else {
                content.set_fill_rgb(r, g, b);
            }
        }
        DeviceColorSpace::Gray => {
            if stroke {
                content.set_stroke_gray(values[0]);
            } else {
                content.set_fill_gray(values[0]);
            }
        }
        DeviceColorSpace::Cmyk => {
            let [c, m, y, k] = [values[0], values[1], values[2], values[3]];
            if stroke {
                content.set_stroke_cmyk(c, m, y, k);
            } else {
                content.set_fill_cmyk(c, m, y, k);
            }
        }
        // Pattern colors go through `crate::draw`'s own `/Pattern-{n} SCN`
        // path rather than a text event, since they need a resource name,
        // not device-space values.
        DeviceColorSpace::Pattern => {}
    }
}
