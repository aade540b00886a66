//! The draw context (C7): command-stream recording, draw-state validation
//! and per-context resource use-set tracking.
//!
//! [`DrawContext`] wraps a [`Content`] the same way [`crate::text::PdfText`]
//! wraps a text object: operators are validated and their resource ids
//! recorded into a use-set *before* anything is written, so that
//! [`DrawContext::build_resource_dict`] can later emit a `/Resources`
//! dictionary containing exactly what the recorded stream references (P5).

use std::collections::BTreeSet;

use crate::color::DeviceColorSpace;
use crate::content::{Content, LineCapStyle, LineJoinStyle, Resources};
use crate::ids::FontId;
use crate::object::{Name, Rect};
use crate::text::{GlyphResolver, PdfText};
use crate::{Error, Result};

/// What a [`DrawContext`] will ultimately become once consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrawContextKind {
    /// A page's content stream. Accepts transitions, subnavigation and
    /// custom page properties; has no group matrix.
    Page,
    /// A `/Type /XObject /Subtype /Form` content stream.
    FormXObject,
    /// A form XObject additionally declaring a `/Group` transparency
    /// dictionary.
    TransparencyGroup,
    /// A tiling pattern's content stream. Must declare a bounding box whose
    /// width/height become `/XStep`/`/YStep`.
    ColorTiling,
}

/// The nesting state of the command stream, mirroring the open `q`/`BDC`
/// scopes. Text objects are not tracked here: [`PdfText`] is built as a
/// separate, self-validating unit and written atomically by
/// [`DrawContext::write_text`], so a `BT` can never straddle a `q`/`BDC`
/// opened through this stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawState {
    BaseDrawing,
    SaveState,
    MarkedContent,
}

/// Every resource id a draw context's command stream has referenced so far,
/// keyed by the resource sub-dictionary it belongs in.
#[derive(Default)]
pub(crate) struct ResourceUse {
    images: BTreeSet<u32>,
    form_xobjects: BTreeSet<u32>,
    transparency_groups: BTreeSet<u32>,
    fonts: BTreeSet<u32>,
    color_spaces: BTreeSet<u32>,
    graphics_states: BTreeSet<u32>,
    shadings: BTreeSet<u32>,
    patterns: BTreeSet<u32>,
    optional_content_groups: BTreeSet<u32>,
}

/// A drawing context: a command stream plus the state needed to validate it
/// and, eventually, to turn it into a page, form XObject, transparency group
/// or tiling pattern.
pub(crate) struct DrawContext {
    kind: DrawContextKind,
    content: Content,
    state: Vec<DrawState>,
    uses: ResourceUse,
    matrix: Option<[f32; 6]>,
    bbox: Option<Rect>,
    group_cs: Option<u32>,
}

impl DrawContext {
    pub(crate) fn new(kind: DrawContextKind) -> Self {
        Self {
            kind,
            content: Content::new(),
            state: vec![DrawState::BaseDrawing],
            uses: ResourceUse::default(),
            matrix: None,
            bbox: None,
            group_cs: None,
        }
    }

    pub(crate) fn kind(&self) -> DrawContextKind {
        self.kind
    }

    fn top(&self) -> DrawState {
        *self.state.last().expect("draw state stack is never empty")
    }

    /// Reject a draw operation while the stream is not at `BaseDrawing`
    /// depth 0 -- used by operations that must not straddle a `q`/`BT`/`BDC`
    /// scope (changing the group matrix, for instance).
    fn require_base(&self) -> Result<()> {
        if self.state.len() == 1 && self.top() == DrawState::BaseDrawing {
            Ok(())
        } else {
            Err(Error::WrongDrawContext)
        }
    }

    /// `q`.
    pub(crate) fn save_state(&mut self) -> &mut Self {
        self.content.save_state();
        self.state.push(DrawState::SaveState);
        self
    }

    /// `Q`.
    pub(crate) fn restore_state(&mut self) -> Result<&mut Self> {
        if self.top() != DrawState::SaveState {
            return Err(Error::WrongDrawContext);
        }
        self.state.pop();
        self.content.restore_state();
        Ok(self)
    }

    /// `BDC`/`BMC`.
    pub(crate) fn begin_marked_content(&mut self, tag: Name) -> &mut Self {
        self.content.begin_marked_content(tag);
        self.state.push(DrawState::MarkedContent);
        self
    }

    /// `EMC`.
    pub(crate) fn end_marked_content(&mut self) -> Result<&mut Self> {
        if self.top() != DrawState::MarkedContent {
            return Err(Error::UnclosedMarkedContent);
        }
        self.state.pop();
        self.content.end_marked_content();
        Ok(self)
    }

    /// `cm`, for a `FormXObject`/`TransparencyGroup`/`ColorTiling` context's
    /// group matrix. Rejected for `Page` contexts, which have no matrix.
    pub(crate) fn set_matrix(&mut self, matrix: [f32; 6]) -> Result<&mut Self> {
        if self.kind == DrawContextKind::Page {
            return Err(Error::WrongDCForMatrix);
        }
        self.require_base()?;
        self.matrix = Some(matrix);
        Ok(self)
    }

    /// Declare the bounding box. Required before consuming a `ColorTiling`
    /// context (its width/height become `/XStep`/`/YStep`).
    pub(crate) fn set_bbox(&mut self, bbox: Rect) -> &mut Self {
        self.bbox = Some(bbox);
        self
    }

    pub(crate) fn bbox(&self) -> Option<Rect> {
        self.bbox
    }

    pub(crate) fn matrix(&self) -> Option<[f32; 6]> {
        self.matrix
    }

    pub(crate) fn group_color_space(&self) -> Option<u32> {
        self.group_cs
    }

    /// Declare the transparency group's color space, for a
    /// `TransparencyGroup` context. Rejected otherwise.
    pub(crate) fn set_group_color_space(&mut self, cs_obj: u32) -> Result<&mut Self> {
        if self.kind != DrawContextKind::TransparencyGroup {
            return Err(Error::WrongDCForTransparencyGroup);
        }
        self.uses.color_spaces.insert(cs_obj);
        self.group_cs = Some(cs_obj);
        Ok(self)
    }

    /// `w`.
    pub(crate) fn set_line_width(&mut self, width: f32) -> Result<&mut Self> {
        if width < 0.0 {
            return Err(Error::NegativeLineWidth);
        }
        self.content.set_line_width(width);
        Ok(self)
    }

    /// `J`.
    pub(crate) fn set_line_cap(&mut self, cap: LineCapStyle) -> &mut Self {
        self.content.set_line_cap(cap);
        self
    }

    /// `j`.
    pub(crate) fn set_line_join(&mut self, join: LineJoinStyle) -> &mut Self {
        self.content.set_line_join(join);
        self
    }

    /// `d`.
    pub(crate) fn set_dash_pattern(&mut self, array: &[f32], phase: f32) -> Result<&mut Self> {
        if array.iter().any(|&v| v < 0.0) {
            return Err(Error::NegativeDash);
        }
        if array.is_empty() && phase != 0.0 {
            return Err(Error::ZeroLengthArray);
        }
        self.content.set_dash_pattern(array.iter().copied(), phase);
        Ok(self)
    }

    /// `i`.
    pub(crate) fn set_flatness(&mut self, tolerance: f32) -> Result<&mut Self> {
        if !(0.0..=100.0).contains(&tolerance) {
            return Err(Error::InvalidFlatness);
        }
        self.content.set_flatness(tolerance as i32);
        Ok(self)
    }

    /// `gs`.
    pub(crate) fn set_graphics_state(&mut self, obj: u32) -> &mut Self {
        self.uses.graphics_states.insert(obj);
        self.content.set_parameters(Name(resource_name("GS", obj).as_bytes()));
        self
    }

    /// `re`.
    pub(crate) fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.content.rect(x, y, width, height);
        self
    }

    /// `m`.
    pub(crate) fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.content.move_to(x, y);
        self
    }

    /// `l`.
    pub(crate) fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.content.line_to(x, y);
        self
    }

    /// `f`.
    pub(crate) fn fill_nonzero(&mut self) -> &mut Self {
        self.content.fill_nonzero();
        self
    }

    /// `S`.
    pub(crate) fn stroke(&mut self) -> &mut Self {
        self.content.stroke();
        self
    }

    /// `RG`/`rg`/`K`/`k`/`G`/`g`.
    pub(crate) fn set_stroke_color(&mut self, space: DeviceColorSpace, values: &[f32]) -> &mut Self {
        set_device_color(&mut self.content, space, values, true);
        self
    }

    pub(crate) fn set_nonstroke_color(&mut self, space: DeviceColorSpace, values: &[f32]) -> &mut Self {
        set_device_color(&mut self.content, space, values, false);
        self
    }

    /// `/CSpace{n} CS c1 .. cn SCN`, for an ICC-based color space. The
    /// caller (the document facade, which already knows the profile's
    /// declared channel count) is trusted to pass the right number of
    /// components.
    pub(crate) fn set_icc_color(&mut self, cs_obj: u32, channels: &[f32], stroke: bool) -> &mut Self {
        self.uses.color_spaces.insert(cs_obj);
        let name = resource_name("CSpace", cs_obj);
        let name = Name(name.as_bytes());
        if stroke {
            self.content.set_stroke_color_space(name);
            self.content.set_stroke_color(channels.iter().copied());
        } else {
            self.content.set_fill_color_space(name);
            self.content.set_fill_color(channels.iter().copied());
        }
        self
    }

    /// `/Pattern CS /Pattern-{n} SCN`.
    pub(crate) fn set_pattern_color(&mut self, obj: u32, stroke: bool) -> &mut Self {
        self.uses.patterns.insert(obj);
        let name = resource_name("Pattern-", obj);
        let name = Name(name.as_bytes());
        if stroke {
            self.content.set_stroke_pattern(std::iter::empty(), name);
        } else {
            self.content.set_fill_pattern(std::iter::empty(), name);
        }
        self
    }

    /// `sh`.
    pub(crate) fn shading(&mut self, obj: u32) -> &mut Self {
        self.uses.shadings.insert(obj);
        self.content.shading(Name(resource_name("SH", obj).as_bytes()));
        self
    }

    /// `Do`, for an image XObject.
    pub(crate) fn draw_image(&mut self, obj: u32) -> &mut Self {
        self.uses.images.insert(obj);
        self.content.x_object(Name(resource_name("Image", obj).as_bytes()));
        self
    }

    /// `Do`, for a form XObject.
    pub(crate) fn draw_form(&mut self, obj: u32) -> &mut Self {
        self.uses.form_xobjects.insert(obj);
        self.content.x_object(Name(resource_name("FXO", obj).as_bytes()));
        self
    }

    /// `Do`, for a transparency group used as a form XObject.
    pub(crate) fn draw_transparency_group(&mut self, obj: u32) -> &mut Self {
        self.uses.transparency_groups.insert(obj);
        self.content.x_object(Name(resource_name("TG", obj).as_bytes()));
        self
    }

    /// Mark an optional content group as referenced (its membership
    /// operator is written by a higher-level call; this only registers use).
    pub(crate) fn use_optional_content_group(&mut self, obj: u32) -> &mut Self {
        self.uses.optional_content_groups.insert(obj);
        self
    }

    /// Record that an optional content group referenced by name actually
    /// exists in the document -- `UnusedOcg` otherwise.
    pub(crate) fn check_ocg_registered(&self, obj: u32) -> Result<()> {
        if self.uses.optional_content_groups.contains(&obj) {
            Ok(())
        } else {
            Err(Error::UnusedOcg)
        }
    }

    /// `/OC /oc{n} BDC`: begin a marked-content sequence toggled by an
    /// optional content group. The group must already have been registered
    /// with [`use_optional_content_group`](Self::use_optional_content_group),
    /// otherwise `UnusedOcg`.
    pub(crate) fn begin_optional_content(&mut self, obj: u32) -> Result<&mut Self> {
        self.check_ocg_registered(obj)?;
        let name = resource_name("oc", obj);
        self.content
            .begin_marked_content_with_properties(Name(b"OC"))
            .properties_named(Name(name.as_bytes()));
        self.state.push(DrawState::MarkedContent);
        Ok(self)
    }

    /// `BT`.. through [`PdfText`], binding the resulting events to this
    /// context's font use-set as they're resolved.
    pub(crate) fn write_text(
        &mut self,
        text: PdfText,
        resolver: &mut impl GlyphResolver,
    ) -> Result<&mut Self> {
        text.write(&mut self.content, &mut TrackingResolver { inner: resolver, fonts: &mut self.uses.fonts })?;
        Ok(self)
    }

    /// Build the `/Resources` dictionary containing exactly the resources
    /// this context's command stream referenced (P5).
    pub(crate) fn build_resource_dict(&self, resources: Resources<'_>) {
        write_resource_dict(&self.uses, resources)
    }

    /// Fail unless the command stream is fully closed (every `q`/`BT`/`BDC`
    /// matched) -- required before a context can be consumed into a page,
    /// XObject or pattern.
    pub(crate) fn finish(self) -> Result<Content> {
        if self.state.len() != 1 || self.top() != DrawState::BaseDrawing {
            return Err(Error::UnclosedMarkedContent);
        }
        Ok(self.content)
    }

    /// Like [`Self::finish`], but also hands back the resource use-set,
    /// for contexts whose stream writer needs finished content bytes before
    /// its `/Resources` dict can even be opened (form XObjects, tiling
    /// patterns): the use-set has to be pulled out before `self.content`
    /// is consumed into bytes.
    pub(crate) fn finish_collecting_uses(self) -> Result<(Content, ResourceUse)> {
        if self.state.len() != 1 || self.top() != DrawState::BaseDrawing {
            return Err(Error::UnclosedMarkedContent);
        }
        Ok((self.content, self.uses))
    }
}

/// Write `uses` into `resources` (P5). Free function so it can run both
/// against a still-live [`DrawContext`] (`Page`, whose stream writer takes
/// its content object number rather than the bytes themselves) and against a
/// [`ResourceUse`] pulled out ahead of [`DrawContext::finish_collecting_uses`].
pub(crate) fn write_resource_dict(uses: &ResourceUse, mut resources: Resources<'_>) {
    if !uses.images.is_empty() || !uses.form_xobjects.is_empty() || !uses.transparency_groups.is_empty() {
        let mut dict = resources.x_objects();
        for &obj in &uses.images {
            dict.pair(Name(resource_name("Image", obj).as_bytes()), crate::object::Ref::new(obj as i32));
        }
        for &obj in &uses.form_xobjects {
            dict.pair(Name(resource_name("FXO", obj).as_bytes()), crate::object::Ref::new(obj as i32));
        }
        for &obj in &uses.transparency_groups {
            dict.pair(Name(resource_name("TG", obj).as_bytes()), crate::object::Ref::new(obj as i32));
        }
    }
    if !uses.fonts.is_empty() {
        let mut dict = resources.fonts();
        for &obj in &uses.fonts {
            dict.pair(Name(resource_name("SFont", obj).as_bytes()), crate::object::Ref::new(obj as i32));
        }
    }
    if !uses.color_spaces.is_empty() {
        let mut dict = resources.color_spaces();
        for &obj in &uses.color_spaces {
            dict.pair(Name(resource_name("CSpace", obj).as_bytes()), crate::object::Ref::new(obj as i32));
        }
    }
    if !uses.graphics_states.is_empty() {
        let mut dict = resources.ext_g_states();
        for &obj in &uses.graphics_states {
            dict.pair(Name(resource_name("GS", obj).as_bytes()), crate::object::Ref::new(obj as i32));
        }
    }
    if !uses.shadings.is_empty() {
        let mut dict = resources.shadings();
        for &obj in &uses.shadings {
            dict.pair(Name(resource_name("SH", obj).as_bytes()), crate::object::Ref::new(obj as i32));
        }
    }
    if !uses.patterns.is_empty() {
        let mut dict = resources.patterns();
        for &obj in &uses.patterns {
            dict.pair(Name(resource_name("Pattern-", obj).as_bytes()), crate::object::Ref::new(obj as i32));
        }
    }
    if !uses.optional_content_groups.is_empty() {
        let mut dict = resources.insert(Name(b"Properties")).dict();
        for &obj in &uses.optional_content_groups {
            dict.pair(Name(resource_name("oc", obj).as_bytes()), crate::object::Ref::new(obj as i32));
        }
    }
}

/// Wraps a caller's [`GlyphResolver`] so that resolving a font also records
/// its wrapper object into the draw context's font use-set.
struct TrackingResolver<'a, R> {
    inner: &'a mut R,
    fonts: &'a mut BTreeSet<u32>,
}

impl<R: GlyphResolver> GlyphResolver for TrackingResolver<'_, R> {
    fn font_object(&self, font: FontId) -> Result<u32> {
        self.inner.font_object(font)
    }

    fn resolve_char(&mut self, font: FontId, codepoint: char) -> Result<u16> {
        let obj = self.inner.font_object(font)?;
        self.fonts.insert(obj);
        self.inner.resolve_char(font, codepoint)
    }


    fn resolve_glyph(&mut self, font: FontId, glyph_index: u16, unicode: Option<&str>) -> Result<u16> {
        let obj = self.inner.font_object(font)?;
        self.fonts.insert(obj);
        self.inner.resolve_glyph(font, glyph_index, unicode)
    }

    fn subset_name(&self, font_obj: u32) -> Vec<u8> {
        self.inner.subset_name(font_obj)
    }
}

fn resource_name(prefix: &str, obj: u32) -> String {
    format!("{prefix}{obj}")
}

fn set_device_color(content: &mut Content, space: DeviceColorSpace, values: &[f32], stroke: bool) {
    match space {
        DeviceColorSpace::Rgb => {
            if stroke {
                content.set_stroke_rgb(values[0], values[1], values[2]);
            } else {
                content.set_fill_rgb(values[0], values[1], values[2]);
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
            if stroke {
                content.set_stroke_cmyk(values[0], values[1], values[2], values[3]);
            } else {
                content.set_fill_cmyk(values[0], values[1], values[2], values[3]);
            }
        }
        DeviceColorSpace::Pattern => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_context_rejects_group_matrix() {
        let mut dc = DrawContext::new(DrawContextKind::Page);
        assert!(matches!(dc.set_matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]), Err(Error::WrongDCForMatrix)));
    }

    #[test]
    fn form_xobject_accepts_group_matrix() {
        let mut dc = DrawContext::new(DrawContextKind::FormXObject);
        assert!(dc.set_matrix([1.0, 0.0, 0.0, 1.0, 2.0, 3.0]).is_ok());
        assert_eq!(dc.matrix(), Some([1.0, 0.0, 0.0, 1.0, 2.0, 3.0]));
    }

    #[test]
    fn matrix_rejected_inside_save_state() {
        let mut dc = DrawContext::new(DrawContextKind::FormXObject);
        dc.save_state();
        assert!(matches!(dc.set_matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]), Err(Error::WrongDrawContext)));
    }

    #[test]
    fn negative_line_width_is_rejected() {
        let mut dc = DrawContext::new(DrawContextKind::Page);
        assert!(matches!(dc.set_line_width(-1.0), Err(Error::NegativeLineWidth)));
        assert!(dc.set_line_width(2.0).is_ok());
    }

    #[test]
    fn dash_pattern_rejects_negative_entries() {
        let mut dc = DrawContext::new(DrawContextKind::Page);
        assert!(matches!(dc.set_dash_pattern(&[1.0, -1.0], 0.0), Err(Error::NegativeDash)));
    }

    #[test]
    fn dash_pattern_rejects_nonzero_phase_with_empty_array() {
        let mut dc = DrawContext::new(DrawContextKind::Page);
        assert!(matches!(dc.set_dash_pattern(&[], 1.0), Err(Error::ZeroLengthArray)));
        assert!(dc.set_dash_pattern(&[], 0.0).is_ok());
        assert!(dc.set_dash_pattern(&[3.0, 1.0], 0.5).is_ok());
    }

    #[test]
    fn flatness_must_be_in_range() {
        let mut dc = DrawContext::new(DrawContextKind::Page);
        assert!(matches!(dc.set_flatness(-0.1), Err(Error::InvalidFlatness)));
        assert!(matches!(dc.set_flatness(100.1), Err(Error::InvalidFlatness)));
        assert!(dc.set_flatness(0.0).is_ok());
        assert!(dc.set_flatness(100.0).is_ok());
    }

    #[test]
    fn end_marked_content_without_begin_is_rejected() {
        let mut dc = DrawContext::new(DrawContextKind::Page);
        assert!(matches!(dc.end_marked_content(), Err(Error::UnclosedMarkedContent)));
        dc.begin_marked_content(Name(b"Span"));
        assert!(dc.end_marked_content().is_ok());
    }

    #[test]
    fn group_color_space_requires_transparency_group_kind() {
        let mut dc = DrawContext::new(DrawContextKind::FormXObject);
        assert!(matches!(dc.set_group_color_space(7), Err(Error::WrongDCForTransparencyGroup)));

        let mut dc = DrawContext::new(DrawContextKind::TransparencyGroup);
        assert!(dc.set_group_color_space(7).is_ok());
        assert_eq!(dc.group_color_space(), Some(7));
    }

    #[test]
    fn finish_fails_with_unbalanced_save_state() {
        let mut dc = DrawContext::new(DrawContextKind::Page);
        dc.save_state();
        assert!(matches!(dc.finish(), Err(Error::UnclosedMarkedContent)));
    }

    #[test]
    fn finish_fails_with_unclosed_marked_content() {
        let mut dc = DrawContext::new(DrawContextKind::Page);
        dc.begin_marked_content(Name(b"Span"));
        assert!(matches!(dc.finish(), Err(Error::UnclosedMarkedContent)));
    }

    #[test]
    fn resource_use_tracks_only_referenced_kinds() {
        let mut dc = DrawContext::new(DrawContextKind::Page);
        dc.draw_image(5);
        dc.shading(9);
        dc.set_graphics_state(3);
        let (_, uses) = dc.finish_collecting_uses().unwrap();
        assert!(uses.images.contains(&5));
        assert!(uses.shadings.contains(&9));
        assert!(uses.graphics_states.contains(&3));
        assert!(uses.fonts.is_empty());
        assert!(uses.patterns.is_empty());
    }

    #[test]
    fn recorded_operators_appear_in_finished_stream() {
        let mut dc = DrawContext::new(DrawContextKind::Page);
        dc.rect(0.0, 0.0, 10.0, 10.0);
        dc.fill_nonzero();
        let content = dc.finish().unwrap();
        let buf = content.finish();
        let text = String::from_utf8(buf.to_vec()).unwrap();
        assert!(text.contains("re"));
        assert!(text.contains("f"));
    }
}
