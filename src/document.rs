//! The document facade (C6).
//!
//! [`Document`] is the layer most applications should use: it allocates
//! object identities, tracks what has been registered (pages, fonts, images,
//! annotations, the structure tree, ...), enforces the invariants that turn a
//! pile of indirect objects into a valid PDF, and knows how to subset fonts.
//! Everything it writes eagerly goes straight into its [`Chunk`]; a handful
//! of resources that depend on state only known once every page has been
//! recorded (font subsets, the root `/Pages` node, annotations, the
//! structure tree, the outline) are kept as plain data here and resolved by
//! [`crate::writer`] when the document is finally written out.

use std::collections::HashMap;

use crate::actions::{ActionType, OcgVisibility};
use crate::bytes::flate_compress;
use crate::chunk::Chunk;
use crate::color::{DeviceColorSpace, PaintType, TilingType};
use crate::colorconv::ColorConverter;
use crate::content::{LineCapStyle, LineJoinStyle};
use crate::draw::{DrawContext, DrawContextKind};
use crate::fontsub::FontThingy;
use crate::ids::*;
use crate::object::Array;
use crate::stream::Filter;
use crate::store::{ObjectType, Store};
use crate::structure::{NavNode, PageLayout, PageMode, StructRole, TrappingStatus};
use crate::text::{GlyphItem, GlyphResolver, PdfText};
use crate::transitions::TransitionStyle;
use crate::{AnnotationFlags, AnnotationIcon, AnnotationType};
use crate::{Error, Result};
use crate::{Date, Name, Rect, Ref, TextStr};

/// Write a `/State` array run: a visibility keyword followed by the
/// optional content groups it applies to.
fn write_ocg_state(array: &mut Array<'_>, state: OcgVisibility, refs: impl Iterator<Item = Ref>) {
    array.item(state.to_name());
    for r in refs {
        array.item(r);
    }
}

/// How a document's content should ultimately render as device color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputColorSpace {
    /// Three-channel additive color (the default).
    Rgb,
    /// Single-channel luminance.
    Gray,
    /// Four-channel subtractive color. Requires an output ICC profile to be
    /// registered through [`DocumentProperties::output_intent`] (or any
    /// Separation/RGB→CMYK conversion on the page will fail with
    /// [`Error::NoCmykProfile`]).
    Cmyk,
}

/// A PDF/X or PDF/A output intent to embed in the catalog.
pub struct OutputIntentSpec {
    /// `/GTS_PDFX` or `/GTS_PDFA1`.
    pub kind: OutputIntentKind,
    /// The destination ICC profile's raw bytes.
    pub icc_profile: Vec<u8>,
    /// `/OutputConditionIdentifier`, e.g. `"FOGRA39"`.
    pub output_condition_identifier: String,
    /// Optional `/Info` free-text description.
    pub info: Option<String>,
}

/// Which output-intent subtype a document declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputIntentKind {
    /// `/GTS_PDFX`.
    PdfX,
    /// `/GTS_PDFA1`.
    PdfA,
}

/// Document-wide metadata and configuration, supplied once to
/// [`Document::construct`].
///
/// Mirrors the original implementation's constructor-time "properties"
/// object; kept as a plain struct rather than a builder since every field is
/// known up front in practice.
pub struct DocumentProperties {
    /// `/Title`.
    pub title: Option<String>,
    /// `/Author`.
    pub author: Option<String>,
    /// `/Subject`.
    pub subject: Option<String>,
    /// `/Keywords`.
    pub keywords: Option<String>,
    /// `/Creator`.
    pub creator: Option<String>,
    /// `/Producer`.
    pub producer: Option<String>,
    /// `/Trapped`.
    pub trapped: Option<TrappingStatus>,
    /// `/CreationDate`. Left to the caller rather than read from the wall
    /// clock, so that two runs over the same inputs produce byte-identical
    /// files.
    pub creation_date: Option<Date>,
    /// `/ModDate`.
    pub mod_date: Option<Date>,
    /// The catalog's `/Lang`.
    pub lang: Option<String>,
    /// The catalog's `/PageLayout`.
    pub page_layout: Option<PageLayout>,
    /// The catalog's `/PageMode`.
    pub page_mode: Option<PageMode>,
    /// The color space all device color operators on a page ultimately
    /// convert into.
    pub output_color_space: OutputColorSpace,
    /// An optional PDF/X or PDF/A output intent.
    pub output_intent: Option<OutputIntentSpec>,
    /// The `/MediaBox` used for pages that don't declare their own.
    pub default_media_box: Rect,
}

impl Default for DocumentProperties {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: None,
            producer: None,
            trapped: None,
            creation_date: None,
            mod_date: None,
            lang: None,
            page_layout: None,
            page_mode: None,
            output_color_space: OutputColorSpace::Rgb,
            output_intent: None,
            default_media_box: Rect::new(0.0, 0.0, 595.0, 842.0),
        }
    }
}

/// A registered font and its deferred object cells.
pub(crate) struct FontEntry {
    pub(crate) thingy: FontThingy,
    pub(crate) base_name: String,
    pub(crate) data_id: Ref,
    pub(crate) descriptor_id: Ref,
    pub(crate) cmap_id: Ref,
    pub(crate) font_id: Ref,
    pub(crate) cid_id: Ref,
}

/// A registered ICC-based color space, deduplicated by profile bytes.
pub(crate) struct IccEntry {
    pub(crate) bytes: Vec<u8>,
    pub(crate) id: Ref,
    pub(crate) channels: i32,
}

/// What an annotation should look like once finally written. Deferred to
/// [`crate::writer`] because its `/P` key depends on which page (if any)
/// consumes it.
pub struct AnnotationSpec {
    /// `/Subtype`.
    pub kind: AnnotationType,
    /// `/Rect`. Required (P: [`Error::AnnotationMissingRect`] otherwise).
    pub rect: Rect,
    /// `/Contents`.
    pub contents: Option<String>,
    /// `/NM`.
    pub name: Option<String>,
    /// `/F`.
    pub flags: Option<AnnotationFlags>,
    /// `/C`, as RGB.
    pub color: Option<[f32; 3]>,
    /// A `/Link` action's `/URI`.
    pub uri_action: Option<String>,
    /// A `FileAttachment`'s referenced embedded file.
    pub embedded_file: Option<EmbeddedFileId>,
    /// `/Name` (icon), for `Text`/`FileAttachment` annotations.
    pub icon: Option<AnnotationIcon>,
    /// A `Screen` annotation's media clip, sourced from an embedded file.
    pub screen_media: Option<ScreenMediaSpec>,
}

/// A `Screen` annotation's rendition. The original notes its timing
/// dictionary "does not work in Acrobat"; preserved here anyway rather than
/// silently dropped.
pub struct ScreenMediaSpec {
    /// The embedded file backing the media clip.
    pub embedded_file: EmbeddedFileId,
    /// The clip's MIME type, e.g. `"video/mp4"`.
    pub content_type: String,
    /// Whether the rendition should begin playing as soon as the page opens.
    pub autoplay: bool,
}

pub(crate) struct AnnotationEntry {
    pub(crate) id: Ref,
    pub(crate) spec: AnnotationSpec,
    pub(crate) used: Option<Ref>,
}

/// A checkbox form widget. The two appearance streams are drawn by the
/// caller through the ordinary [`Canvas`] API and registered as form
/// XObjects before being handed here, rather than this facade embedding a
/// second drawing layer of its own.
pub struct CheckboxWidgetSpec {
    /// `/Rect`.
    pub rect: Rect,
    /// The `/AP /N /Yes` appearance stream.
    pub on_appearance: FormXObjectId,
    /// The `/AP /N /Off` appearance stream.
    pub off_appearance: FormXObjectId,
    /// Whether the box starts out checked.
    pub checked: bool,
    /// `/T`, the field's partial name.
    pub partial_name: String,
}

pub(crate) struct WidgetEntry {
    pub(crate) id: Ref,
    pub(crate) spec: CheckboxWidgetSpec,
    pub(crate) used: Option<Ref>,
}

/// A structure tree element, deferred until every page (and thus every
/// parent/children relationship) is known.
pub struct StructureItemSpec {
    /// The element's role.
    pub role: StructRole,
    /// The parent element, or `None` for a direct child of the tree root.
    pub parent: Option<StructureItemId>,
    /// `/Alt`.
    pub alt: Option<String>,
    /// `/ActualText`.
    pub actual_text: Option<String>,
    /// `/Lang`.
    pub lang: Option<String>,
}

pub(crate) struct StructureItemEntry {
    pub(crate) id: Ref,
    pub(crate) spec: StructureItemSpec,
    pub(crate) used: Option<(Ref, i32)>,
}

/// An outline (bookmark) entry.
pub struct OutlineSpec {
    /// The entry's visible title.
    pub title: String,
    /// The parent entry, or `None` for a top-level entry.
    pub parent: Option<OutlineId>,
    /// The page this entry jumps to, and the vertical offset (`/XYZ`) to
    /// scroll to.
    pub dest_page: Option<(u32, f32)>,
    /// `/C`, as RGB.
    pub color: Option<[f32; 3]>,
}

pub(crate) struct OutlineEntry {
    pub(crate) id: Ref,
    pub(crate) spec: OutlineSpec,
}

/// A page's labeling range, registered with [`Document::add_page_labeling`].
pub struct PageLabelSpec {
    /// `/S`.
    pub style: Option<crate::structure::NumberingStyle>,
    /// `/P`.
    pub prefix: Option<String>,
    /// `/St`.
    pub start_num: Option<i32>,
}

/// One step of a page's subnavigation sequence, passed to
/// [`Document::add_page`]. The group named by `ocg` is turned on as the
/// viewer steps forward into this step and off again stepping back past it;
/// `transition` optionally plays a transition effect on the forward step.
#[derive(Debug, Clone, Copy)]
pub struct SubPageNavigation {
    /// The optional content group this step toggles.
    pub ocg: OptionalContentGroupId,
    /// `/Trans` style and duration played when stepping forward into this
    /// group.
    pub transition: Option<(TransitionStyle, f32)>,
}

/// A color expressed in the document's registered color spaces (I7: every
/// component is clamped to `0.0..=1.0`, with `NaN` treated as `0.0`).
pub enum Color {
    /// `rg`/`RG`.
    DeviceRgb(f32, f32, f32),
    /// `g`/`G`.
    DeviceGray(f32),
    /// `k`/`K`.
    DeviceCmyk(f32, f32, f32, f32),
    /// An ICC-based color, with one component per channel the profile
    /// declares.
    Icc(IccColorSpaceId, Vec<f32>),
    /// A CIE L*a*b* color.
    Lab(LabColorSpaceId, f32, f32, f32),
    /// A Separation tint, 0.0 (no colorant) to 1.0 (full colorant).
    Separation(SeparationId, f32),
    /// A tiling or shading pattern.
    Pattern(PatternId),
}

fn clamp_component(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// The arguments to [`Document::add_function`].
pub enum PdfFunction {
    /// Type 2, a single exponential interpolation between `c0` and `c1`.
    Exponential { domain: [f32; 2], c0: Vec<f32>, c1: Vec<f32>, n: f32 },
    /// Type 3, stitching several subfunctions together over `domain`.
    Stitching {
        domain: [f32; 2],
        functions: Vec<FunctionId>,
        bounds: Vec<f32>,
        encode: Vec<f32>,
    },
    /// Type 4, a PostScript calculator function.
    PostScript { domain: Vec<[f32; 2]>, range: Vec<[f32; 2]>, program: Vec<u8> },
}

/// The arguments to [`Document::add_shading`].
pub enum PdfShading {
    /// Type 2, an axial (linear) gradient.
    Axial { color_space: ShadingColorSpace, coords: [f32; 4], function: FunctionId, extend: [bool; 2] },
    /// Type 3, a radial gradient.
    Radial { color_space: ShadingColorSpace, coords: [f32; 6], function: FunctionId, extend: [bool; 2] },
    /// Type 4, a free-form Gouraud-shaded triangle mesh. Each vertex is an
    /// edge flag, an `(x, y)` coordinate and a color in `color_space`'s
    /// number of components; the binary vertex stream is packed internally.
    GouraudTriangles {
        color_space: ShadingColorSpace,
        bits_per_component: i32,
        decode: Vec<f32>,
        vertices: Vec<(u8, f32, f32, Vec<f32>)>,
    },
    /// Type 6, a Coons patch mesh. Each patch is its 12 control points and 4
    /// corner colors; the binary patch stream is packed internally.
    /// Continuation patches are not produced by this crate (only full
    /// patches).
    CoonsPatches {
        color_space: ShadingColorSpace,
        bits_per_component: i32,
        decode: Vec<f32>,
        patches: Vec<([(f32, f32); 12], [Vec<f32>; 4])>,
    },
}

/// The color space a shading is defined over.
pub enum ShadingColorSpace {
    /// `DeviceRGB`/`DeviceGray`/`DeviceCMYK`.
    Device(DeviceColorSpace),
    /// An already-registered ICC-based color space.
    Icc(IccColorSpaceId),
}

/// The document-level facade: allocates object identities, tracks
/// registered resources and renders the finished PDF.
pub struct Document {
    pub(crate) chunk: Chunk,
    pub(crate) store: Store,
    pub(crate) color: ColorConverter,
    pub(crate) props: DocumentProperties,

    pub(crate) catalog_id: Ref,
    pub(crate) info_id: Ref,
    pub(crate) pages_id: Ref,
    pub(crate) output_intent_icc_id: Option<Ref>,

    pub(crate) write_attempted: bool,

    pub(crate) pages: Vec<Ref>,
    pub(crate) page_labels: Vec<(i32, PageLabelSpec)>,

    pub(crate) fonts: Vec<FontEntry>,

    pub(crate) icc_color_spaces: Vec<IccEntry>,
    pub(crate) lab_color_spaces: Vec<Ref>,
    pub(crate) separations: Vec<Ref>,

    pub(crate) images: Vec<Ref>,
    pub(crate) graphics_states: Vec<Ref>,
    pub(crate) functions: Vec<Ref>,
    pub(crate) function_is_post_script: Vec<bool>,
    pub(crate) shadings: Vec<Ref>,
    pub(crate) patterns: Vec<Ref>,
    pub(crate) form_xobjects: Vec<Ref>,
    pub(crate) transparency_groups: Vec<Ref>,
    pub(crate) soft_masks: Vec<Ref>,
    pub(crate) optional_content_groups: Vec<Ref>,

    pub(crate) annotations: Vec<AnnotationEntry>,
    pub(crate) widgets: Vec<WidgetEntry>,
    pub(crate) structure_items: Vec<StructureItemEntry>,
    pub(crate) struct_tree_root_id: Option<Ref>,
    pub(crate) outlines: Vec<OutlineEntry>,
    pub(crate) outline_root_id: Option<Ref>,
    pub(crate) embedded_files: HashMap<String, (EmbeddedFileId, Ref)>,
    pub(crate) roles: Vec<(String, StructRole)>,
}

impl Document {
    /// Construct a new, empty document.
    pub fn construct(props: DocumentProperties) -> Result<Document> {
        let has_cmyk_profile = match &props.output_intent {
            Some(intent) => crate::colorconv::ColorConverter::num_channels(&intent.icc_profile)? == 4,
            None => false,
        };
        if matches!(props.output_color_space, OutputColorSpace::Cmyk) && !has_cmyk_profile {
            return Err(Error::NoCmykProfile);
        }

        let mut store = Store::new();
        let catalog_id = store.alloc();
        let info_id = store.alloc();
        let pages_id = store.add_pending(|_| ObjectType::DelayedPages);

        let mut chunk = Chunk::new();
        let output_intent_icc_id = match &props.output_intent {
            Some(intent) => {
                let id = store.alloc();
                chunk.icc_profile(id, &intent.icc_profile).n(crate::colorconv::ColorConverter::num_channels(&intent.icc_profile)?);
                Some(id)
            }
            None => None,
        };

        Ok(Document {
            chunk,
            store,
            color: ColorConverter::new(has_cmyk_profile),
            props,
            catalog_id,
            info_id,
            pages_id,
            output_intent_icc_id,
            write_attempted: false,
            pages: Vec::new(),
            page_labels: Vec::new(),
            fonts: Vec::new(),
            icc_color_spaces: Vec::new(),
            lab_color_spaces: Vec::new(),
            separations: Vec::new(),
            images: Vec::new(),
            graphics_states: Vec::new(),
            functions: Vec::new(),
            function_is_post_script: Vec::new(),
            shadings: Vec::new(),
            patterns: Vec::new(),
            form_xobjects: Vec::new(),
            transparency_groups: Vec::new(),
            soft_masks: Vec::new(),
            optional_content_groups: Vec::new(),
            annotations: Vec::new(),
            widgets: Vec::new(),
            structure_items: Vec::new(),
            struct_tree_root_id: None,
            outlines: Vec::new(),
            outline_root_id: None,
            embedded_files: HashMap::new(),
            roles: Vec::new(),
        })
    }

    fn compress<'a>(&self, data: &'a [u8]) -> (Vec<u8>, bool) {
        if std::env::var_os("PDFKIT_DEBUG_UNCOMPRESSED").is_some() {
            (data.to_vec(), false)
        } else {
            (flate_compress(data), true)
        }
    }

    /// Start a new drawing surface for a page.
    pub fn new_page_canvas(&self) -> Canvas {
        Canvas { inner: DrawContext::new(DrawContextKind::Page) }
    }

    /// Start a new drawing surface for a form XObject.
    pub fn new_form_canvas(&self) -> Canvas {
        Canvas { inner: DrawContext::new(DrawContextKind::FormXObject) }
    }

    /// Start a new drawing surface for a transparency group.
    pub fn new_transparency_group_canvas(&self) -> Canvas {
        Canvas { inner: DrawContext::new(DrawContextKind::TransparencyGroup) }
    }

    /// Start a new drawing surface for a tiling pattern.
    pub fn new_tiling_canvas(&self) -> Canvas {
        Canvas { inner: DrawContext::new(DrawContextKind::ColorTiling) }
    }

    /// Finish a page's canvas and register it, enforcing that every
    /// annotation, widget and structure item it uses has not already been
    /// consumed by another page (I2).
    #[allow(clippy::too_many_arguments)]
    pub fn add_page(
        &mut self,
        canvas: Canvas,
        media_box: Option<Rect>,
        rotate: Option<i32>,
        transition: Option<(TransitionStyle, f32)>,
        used_annotations: &[AnnotationId],
        used_widgets: &[FormWidgetId],
        used_structure_items: &[StructureItemId],
        subnav: &[SubPageNavigation],
    ) -> Result<()> {
        if canvas.inner.kind() != DrawContextKind::Page {
            return Err(Error::InvalidDrawContextType);
        }

        let page_id = self.store.alloc();

        for &a in used_annotations {
            let entry = self.annotations.get_mut(a.index()).ok_or(Error::UnknownResource)?;
            if entry.used.is_some() {
                return Err(Error::AnnotationReuse);
            }
            entry.used = Some(page_id);
        }
        for &w in used_widgets {
            let entry = self.widgets.get_mut(w.index()).ok_or(Error::UnknownResource)?;
            if entry.used.is_some() {
                return Err(Error::AnnotationReuse);
            }
            entry.used = Some(page_id);
        }

        let struct_parents_key = if used_structure_items.is_empty() {
            None
        } else {
            let key = self.pages.len() as i32;
            for &s in used_structure_items {
                let entry = self.structure_items.get_mut(s.index()).ok_or(Error::UnknownResource)?;
                if entry.used.is_some() {
                    return Err(Error::StructureReuse);
                }
                entry.used = Some((page_id, key));
            }
            Some(key)
        };

        // Content bytes are only available once `canvas` is consumed by
        // `finish`, but that also drops its resource use-set -- so the page
        // dict (including `/Resources`, built from the still-alive use-set)
        // is written first, against a pre-allocated content object number,
        // and the content stream itself is written afterwards.
        let content_id = self.store.alloc();

        let mut annot_refs = Vec::with_capacity(used_annotations.len() + used_widgets.len());
        for &a in used_annotations {
            annot_refs.push(self.annotations[a.index()].id);
        }
        for &w in used_widgets {
            annot_refs.push(self.widgets[w.index()].id);
        }

        let subnav_root =
            if subnav.is_empty() { None } else { Some(self.create_subnavigation(subnav)?) };

        {
            let mut page = self.chunk.page(page_id);
            page.parent(self.pages_id);
            page.media_box(media_box.unwrap_or(self.props.default_media_box));
            page.contents(content_id);
            if let Some(degrees) = rotate {
                page.rotate(degrees);
            }
            if !annot_refs.is_empty() {
                page.annotations(annot_refs);
            }
            if let Some(key) = struct_parents_key {
                page.struct_parents(key);
            }
            if let Some((style, duration)) = transition {
                page.duration(duration);
                page.transition().style(style).duration(duration);
            }
            if let Some(root) = subnav_root {
                page.pres_steps(root);
            }
            canvas.inner.build_resource_dict(page.resources());
        }

        let content_bytes = canvas.inner.finish()?.finish();
        let (data, compressed) = self.compress(&content_bytes);
        {
            let mut stream = self.chunk.stream(content_id, &data);
            if compressed {
                stream.filter(Filter::FlateDecode);
            }
        }

        self.pages.push(page_id);
        Ok(())
    }

    /// Register a page-numbering range starting at `start_page` (0-indexed).
    /// Ranges must be registered in increasing `start_page` order (I: fails
    /// [`Error::NonSequentialPageNumber`] otherwise).
    pub fn add_page_labeling(&mut self, start_page: i32, spec: PageLabelSpec) -> Result<()> {
        if let Some((last, _)) = self.page_labels.last() {
            if start_page <= *last {
                return Err(Error::NonSequentialPageNumber);
            }
        }
        self.page_labels.push((start_page, spec));
        Ok(())
    }

    /// Register a Separation color space backed by an already-registered
    /// Type 4 tint transform function.
    pub fn create_separation(
        &mut self,
        colorant: &str,
        alternate: DeviceColorSpace,
        tint_transform: FunctionId,
    ) -> Result<SeparationId> {
        let func_ref = *self.functions.get(tint_transform.index()).ok_or(Error::UnknownResource)?;
        if !self.function_is_post_script.get(tint_transform.index()).copied().unwrap_or(false) {
            return Err(Error::NotAPostScriptFunction);
        }
        let id = self.store.alloc();
        self.chunk
            .color_space(id)
            .separation(Name(colorant.as_bytes()), alternate, func_ref);
        self.separations.push(id);
        Ok(SeparationId::from_index(self.separations.len() - 1))
    }

    /// Register a CIE L*a*b* color space.
    pub fn add_lab_colorspace(&mut self, white_point: [f32; 3], range: [f32; 4]) -> LabColorSpaceId {
        let id = self.store.alloc();
        self.chunk.color_space(id).lab(white_point, range, None);
        self.lab_color_spaces.push(id);
        LabColorSpaceId::from_index(self.lab_color_spaces.len() - 1)
    }

    /// Register an ICC-based color space, deduplicating by exact byte
    /// equality with any profile already registered.
    pub fn add_icc_profile(&mut self, data: Vec<u8>) -> Result<IccColorSpaceId> {
        if let Some(pos) = self.icc_color_spaces.iter().position(|e| e.bytes == data) {
            return Ok(IccColorSpaceId::from_index(pos));
        }
        let channels = ColorConverter::num_channels(&data)?;
        let profile_id = self.store.alloc();
        let (compressed, did_compress) = self.compress(&data);
        {
            let mut icc = self.chunk.icc_profile(profile_id, &compressed);
            icc.n(channels);
            if did_compress {
                icc.filter(Filter::FlateDecode);
            }
        }
        let cs_id = self.store.alloc();
        self.chunk.color_space(cs_id).icc_based(profile_id);
        self.icc_color_spaces.push(IccEntry { bytes: data, id: cs_id, channels });
        Ok(IccColorSpaceId::from_index(self.icc_color_spaces.len() - 1))
    }

    /// Load and prepare a TrueType/OpenType font file for subsetting.
    pub fn load_font(&mut self, data: Vec<u8>, subfont_index: u32) -> Result<FontId> {
        let thingy = FontThingy::load(data, subfont_index)?;
        let base_name = thingy
            .face()
            .names()
            .into_iter()
            .find(|n| n.name_id == 6)
            .and_then(|n| n.to_string())
            .unwrap_or_else(|| "Subset".to_string());

        let font_id = FontId::from_index(self.fonts.len());
        let data_id = self.store.add_pending(|_| ObjectType::DelayedSubsetFontData(font_id));
        let descriptor_id = self.store.add_pending(|_| ObjectType::DelayedSubsetFontDescriptor(font_id));
        let cmap_id = self.store.add_pending(|_| ObjectType::DelayedSubsetCMap(font_id));
        let cid_id = self.store.add_pending(|_| ObjectType::DelayedCidDictionary(font_id));
        let wrapper_id = self.store.add_pending(|_| ObjectType::DelayedSubsetFont(font_id));

        self.fonts.push(FontEntry {
            thingy,
            base_name,
            data_id,
            descriptor_id,
            cmap_id,
            font_id: wrapper_id,
            cid_id,
        });
        Ok(font_id)
    }

    /// Register an RGB or Gray raster image, Flate-compressing its raw
    /// sample data (unless `PDFKIT_DEBUG_UNCOMPRESSED` is set).
    pub fn add_image(
        &mut self,
        width: i32,
        height: i32,
        bits_per_component: i32,
        color_space: DeviceColorSpace,
        samples: &[u8],
        soft_mask: Option<ImageId>,
    ) -> Result<ImageId> {
        let id = self.store.alloc();
        let (data, compressed) = self.compress(samples);
        {
            let mut image = self.chunk.image_xobject(id, &data);
            if compressed {
                image.filter(Filter::FlateDecode);
            }
            image.width(width).height(height).bits_per_component(bits_per_component);
            image.color_space().device(color_space);
            if let Some(mask) = soft_mask {
                let mask_ref = *self.images.get(mask.index()).ok_or(Error::UnknownResource)?;
                image.s_mask(mask_ref);
            }
        }
        self.images.push(id);
        Ok(ImageId::from_index(self.images.len() - 1))
    }

    /// Register a one-channel image to be used as another image's soft mask.
    pub fn add_mask_image(&mut self, width: i32, height: i32, bits_per_component: i32, samples: &[u8]) -> Result<ImageId> {
        let id = self.store.alloc();
        let (data, compressed) = self.compress(samples);
        {
            let mut image = self.chunk.image_xobject(id, &data);
            if compressed {
                image.filter(Filter::FlateDecode);
            }
            image.width(width).height(height).bits_per_component(bits_per_component);
            image.color_space().device(DeviceColorSpace::Gray);
            image.image_mask(bits_per_component == 1);
        }
        self.images.push(id);
        Ok(ImageId::from_index(self.images.len() - 1))
    }

    /// Embed an already-JPEG-encoded image directly (`/DCTDecode`), taking
    /// its color space from an embedded ICC profile if `icc_profile` is
    /// given (deduplicated like [`Self::add_icc_profile`]).
    pub fn embed_jpg(
        &mut self,
        width: i32,
        height: i32,
        color_space: DeviceColorSpace,
        jpeg_bytes: &[u8],
        icc_profile: Option<Vec<u8>>,
    ) -> Result<ImageId> {
        let cs_id = match icc_profile {
            Some(bytes) => Some(self.add_icc_profile(bytes)?),
            None => None,
        };
        let id = self.store.alloc();
        {
            let mut image = self.chunk.image_xobject(id, jpeg_bytes);
            image.filter(Filter::DctDecode);
            image.width(width).height(height).bits_per_component(8);
            match cs_id {
                Some(cs) => {
                    let cs_ref = self.icc_color_spaces[cs.index()].id;
                    image.color_space().icc_based(cs_ref);
                }
                None => {
                    image.color_space().device(color_space);
                }
            }
        }
        self.images.push(id);
        Ok(ImageId::from_index(self.images.len() - 1))
    }

    /// Register an `/ExtGState` dictionary.
    pub fn add_graphics_state(&mut self, stroke_alpha: f32, fill_alpha: f32, blend_mode: Option<crate::content::BlendMode>) -> GraphicsStateId {
        let id = self.store.alloc();
        {
            let mut gs = self.chunk.ext_graphics(id);
            gs.stroking_alpha(stroke_alpha);
            gs.non_stroking_alpha(fill_alpha);
            if let Some(mode) = blend_mode {
                gs.blend_mode(mode);
            }
        }
        self.graphics_states.push(id);
        GraphicsStateId::from_index(self.graphics_states.len() - 1)
    }

    /// Register a PDF function (Type 2, 3 or 4).
    pub fn add_function(&mut self, function: PdfFunction) -> Result<FunctionId> {
        let id = self.store.alloc();
        let is_post_script = matches!(function, PdfFunction::PostScript { .. });
        match function {
            PdfFunction::Exponential { domain, c0, c1, n } => {
                let mut f = self.chunk.exponential_function(id);
                f.domain(domain.iter().copied());
                f.c0(c0.iter().copied());
                f.c1(c1.iter().copied());
                f.n(n);
            }
            PdfFunction::Stitching { domain, functions, bounds, encode } => {
                let refs: Vec<Ref> = functions
                    .iter()
                    .map(|f| self.functions.get(f.index()).copied().ok_or(Error::UnknownResource))
                    .collect::<Result<_>>()?;
                let mut f = self.chunk.stitching_function(id);
                f.domain(domain.iter().copied());
                f.functions(refs);
                f.bounds(bounds.iter().copied());
                f.encode(encode.iter().copied());
            }
            PdfFunction::PostScript { domain, range, program } => {
                let (data, compressed) = self.compress(&program);
                let mut f = self.chunk.post_script_function(id, &data);
                f.domain(domain.iter().flat_map(|d| [d[0], d[1]]));
                f.range(range.iter().flat_map(|r| [r[0], r[1]]));
                if compressed {
                    f.filter(Filter::FlateDecode);
                }
            }
        }
        self.functions.push(id);
        self.function_is_post_script.push(is_post_script);
        Ok(FunctionId::from_index(self.functions.len() - 1))
    }

    fn shading_color_space_ref(&self, cs: &ShadingColorSpace) -> Option<Ref> {
        match cs {
            ShadingColorSpace::Device(_) => None,
            ShadingColorSpace::Icc(id) => self.icc_color_spaces.get(id.index()).map(|e| e.id),
        }
    }

    /// Register a shading (Type 2, 3, 4 or 6).
    pub fn add_shading(&mut self, shading: PdfShading) -> Result<ShadingId> {
        let id = self.store.alloc();
        match &shading {
            PdfShading::Axial { color_space, coords, function, extend } => {
                let func_ref = *self.functions.get(function.index()).ok_or(Error::UnknownResource)?;
                let mut sh = self.chunk.function_shading(id);
                sh.shading_type(crate::color::ShadingType::FunctionBased2);
                self.write_shading_color_space(&mut sh, color_space);
                sh.coords(coords.iter().copied());
                sh.function(func_ref);
                sh.extend(extend[0], extend[1]);
            }
            PdfShading::Radial { color_space, coords, function, extend } => {
                let func_ref = *self.functions.get(function.index()).ok_or(Error::UnknownResource)?;
                let mut sh = self.chunk.function_shading(id);
                sh.shading_type(crate::color::ShadingType::FunctionBased3);
                self.write_shading_color_space(&mut sh, color_space);
                sh.coords(coords.iter().copied());
                sh.function(func_ref);
                sh.extend(extend[0], extend[1]);
            }
            PdfShading::GouraudTriangles { color_space, bits_per_component, decode, vertices } => {
                let refs: Vec<(u8, f32, f32, &[f32])> =
                    vertices.iter().map(|(flag, x, y, color)| (*flag, *x, *y, color.as_slice())).collect();
                let vertex_data = crate::colorconv::pack_gouraud_vertices(&refs);
                let (data, compressed) = self.compress(&vertex_data);
                let mut sh = self.chunk.stream_shading(id, &data);
                sh.shading_type(crate::color::MeshShadingType::FreeformGouraud);
                self.write_mesh_color_space(&mut sh, color_space);
                sh.bits_per_coordinate(32);
                sh.bits_per_component(*bits_per_component);
                sh.bits_per_flag(8);
                sh.decode(decode.iter().copied());
                if compressed {
                    sh.filter(Filter::FlateDecode);
                }
            }
            PdfShading::CoonsPatches { color_space, bits_per_component, decode, patches } => {
                let mut patch_data = Vec::new();
                for (points, colors) in patches {
                    let color_refs: [&[f32]; 4] =
                        [colors[0].as_slice(), colors[1].as_slice(), colors[2].as_slice(), colors[3].as_slice()];
                    patch_data.extend(crate::colorconv::pack_coons_patch(points, &color_refs));
                }
                let (data, compressed) = self.compress(&patch_data);
                let mut sh = self.chunk.stream_shading(id, &data);
                sh.shading_type(crate::color::MeshShadingType::CoonsPatch);
                self.write_mesh_color_space(&mut sh, color_space);
                sh.bits_per_coordinate(32);
                sh.bits_per_component(*bits_per_component);
                sh.bits_per_flag(8);
                sh.decode(decode.iter().copied());
                if compressed {
                    sh.filter(Filter::FlateDecode);
                }
            }
        }
        self.shadings.push(id);
        Ok(ShadingId::from_index(self.shadings.len() - 1))
    }

    fn write_shading_color_space(&self, sh: &mut crate::color::FunctionShading<'_>, cs: &ShadingColorSpace) {
        match cs {
            ShadingColorSpace::Device(d) => {
                sh.color_space().device(*d);
            }
            ShadingColorSpace::Icc(_) => {
                if let Some(r) = self.shading_color_space_ref(cs) {
                    sh.color_space().icc_based(r);
                }
            }
        }
    }

    fn write_mesh_color_space(&self, sh: &mut crate::color::StreamShading<'_>, cs: &ShadingColorSpace) {
        match cs {
            ShadingColorSpace::Device(d) => {
                sh.color_space().device(*d);
            }
            ShadingColorSpace::Icc(_) => {
                if let Some(r) = self.shading_color_space_ref(cs) {
                    sh.color_space().icc_based(r);
                }
            }
        }
    }

    /// Turn a tiling-pattern canvas into a registered pattern.
    pub fn add_tiling_pattern(&mut self, canvas: Canvas) -> Result<PatternId> {
        if canvas.inner.kind() != DrawContextKind::ColorTiling {
            return Err(Error::InvalidDrawContextType);
        }
        let bbox = canvas.inner.bbox().ok_or(Error::InvalidDrawContextType)?;
        let (content, uses) = canvas.inner.finish_collecting_uses()?;
        let content_bytes = content.finish();
        let (data, compressed) = self.compress(&content_bytes);
        let id = self.store.alloc();
        {
            let mut pattern = self.chunk.tiling_pattern(id, &data);
            if compressed {
                pattern.filter(Filter::FlateDecode);
            }
            pattern.paint_type(PaintType::Colored);
            pattern.tiling_type(TilingType::ConstantSpacing);
            pattern.bbox(bbox);
            pattern.x_step(bbox.x2 - bbox.x1);
            pattern.y_step(bbox.y2 - bbox.y1);
            crate::draw::write_resource_dict(&uses, pattern.resources());
        }
        self.patterns.push(id);
        Ok(PatternId::from_index(self.patterns.len() - 1))
    }

    /// Turn a transparency-group canvas into a registered form XObject
    /// carrying a `/Group` dictionary.
    pub fn add_transparency_group(&mut self, canvas: Canvas, isolated: bool, knockout: bool) -> Result<TransparencyGroupId> {
        if canvas.inner.kind() != DrawContextKind::TransparencyGroup {
            return Err(Error::InvalidDrawContextType);
        }
        let bbox = canvas.inner.bbox().unwrap_or(Rect::new(0.0, 0.0, 1.0, 1.0));
        let matrix = canvas.inner.matrix();
        let group_cs = canvas.inner.group_color_space();
        let (content, uses) = canvas.inner.finish_collecting_uses()?;
        let content_bytes = content.finish();
        let (data, compressed) = self.compress(&content_bytes);
        let id = self.store.alloc();
        {
            let mut xobj = self.chunk.form_xobject(id, &data);
            if compressed {
                xobj.filter(Filter::FlateDecode);
            }
            xobj.bbox(bbox);
            if let Some(m) = matrix {
                xobj.matrix(m);
            }
            {
                let mut group = xobj.group();
                group.transparency();
                group.isolated(isolated);
                group.knockout(knockout);
                if let Some(cs_obj) = group_cs {
                    group.color_space().icc_based(Ref::new(cs_obj as i32));
                }
            }
            crate::draw::write_resource_dict(&uses, xobj.resources());
        }
        self.transparency_groups.push(id);
        Ok(TransparencyGroupId::from_index(self.transparency_groups.len() - 1))
    }

    /// Register a soft mask backed by an already-registered transparency
    /// group.
    pub fn add_soft_mask(&mut self, group: TransparencyGroupId, luminosity: bool) -> Result<SoftMaskId> {
        let group_ref = *self.transparency_groups.get(group.index()).ok_or(Error::UnknownResource)?;
        let id = self.store.alloc();
        {
            let mut sm = self.chunk.indirect(id).start::<crate::content::SoftMask<'_>>();
            sm.subtype(if luminosity { crate::content::MaskType::Luminosity } else { crate::content::MaskType::Alpha });
            sm.group(group_ref);
        }
        self.soft_masks.push(id);
        Ok(SoftMaskId::from_index(self.soft_masks.len() - 1))
    }

    /// Register a form XObject produced from an ordinary (non-transparency)
    /// draw context, for use as a checkbox appearance stream or a plain
    /// reusable XObject.
    pub fn add_form_xobject(&mut self, canvas: Canvas) -> Result<FormXObjectId> {
        if canvas.inner.kind() != DrawContextKind::FormXObject {
            return Err(Error::InvalidDrawContextType);
        }
        let bbox = canvas.inner.bbox().unwrap_or(Rect::new(0.0, 0.0, 1.0, 1.0));
        let matrix = canvas.inner.matrix();
        let (content, uses) = canvas.inner.finish_collecting_uses()?;
        let content_bytes = content.finish();
        let (data, compressed) = self.compress(&content_bytes);
        let id = self.store.alloc();
        {
            let mut xobj = self.chunk.form_xobject(id, &data);
            if compressed {
                xobj.filter(Filter::FlateDecode);
            }
            xobj.bbox(bbox);
            if let Some(m) = matrix {
                xobj.matrix(m);
            }
            crate::draw::write_resource_dict(&uses, xobj.resources());
        }
        self.form_xobjects.push(id);
        Ok(FormXObjectId::from_index(self.form_xobjects.len() - 1))
    }

    /// Register an optional content group (a togglable layer).
    pub fn add_optional_content_group(&mut self, name: &str) -> OptionalContentGroupId {
        let id = self.store.alloc();
        self.chunk.indirect(id).dict().pair(Name(b"Type"), Name(b"OCG")).pair(Name(b"Name"), TextStr(name));
        self.optional_content_groups.push(id);
        OptionalContentGroupId::from_index(self.optional_content_groups.len() - 1)
    }

    /// Build a page's subnavigation chain: a doubly-linked sequence of
    /// `/NavNode` objects whose forward/backward actions turn the listed
    /// optional content groups on as the viewer steps forward and off again
    /// stepping back, with a root node that starts every group off. Returns
    /// the root node's object reference, to be linked at the page's
    /// `/PresSteps` slot.
    fn create_subnavigation(&mut self, subnav: &[SubPageNavigation]) -> Result<Ref> {
        let ocgs: Vec<Ref> = subnav
            .iter()
            .map(|step| {
                self.optional_content_groups.get(step.ocg.index()).copied().ok_or(Error::UnknownResource)
            })
            .collect::<Result<_>>()?;

        let root_id = self.store.alloc();
        let node_ids: Vec<Ref> = (0..subnav.len()).map(|_| self.store.alloc()).collect();
        let final_id = self.store.alloc();

        {
            let mut root = self.chunk.indirect(root_id).start::<NavNode<'_>>();
            {
                let mut na = root.forward_action();
                na.action_type(ActionType::SetOcgState);
                write_ocg_state(&mut na.ocg_state(), OcgVisibility::Off, ocgs.iter().copied());
            }
            root.next(node_ids[0]);
            {
                let mut pa = root.backward_action();
                pa.action_type(ActionType::SetOcgState);
                write_ocg_state(&mut pa.ocg_state(), OcgVisibility::On, ocgs.iter().copied());
            }
            root.prev(final_id);
        }

        for (i, step) in subnav.iter().enumerate() {
            let mut node = self.chunk.indirect(node_ids[i]).start::<NavNode<'_>>();
            {
                let mut na = node.forward_action();
                na.action_type(ActionType::SetOcgState);
                write_ocg_state(&mut na.ocg_state(), OcgVisibility::On, std::iter::once(ocgs[i]));
                if let Some((style, duration)) = step.transition {
                    na.next_transition().style(style).duration(duration);
                }
            }
            let next = node_ids.get(i + 1).copied().unwrap_or(final_id);
            node.next(next);
            if i > 0 {
                let mut pa = node.backward_action();
                pa.action_type(ActionType::SetOcgState);
                write_ocg_state(&mut pa.ocg_state(), OcgVisibility::Off, std::iter::once(ocgs[i - 1]));
                node.prev(node_ids[i - 1]);
            }
        }

        {
            let mut last = self.chunk.indirect(final_id).start::<NavNode<'_>>();
            let mut pa = last.backward_action();
            pa.action_type(ActionType::SetOcgState);
            write_ocg_state(&mut pa.ocg_state(), OcgVisibility::Off, std::iter::once(*ocgs.last().unwrap()));
            drop(pa);
            last.prev(*node_ids.last().unwrap());
        }

        Ok(root_id)
    }

    /// Register an annotation. Everything is deferred until its page -- if
    /// any -- is known; `/Rect` is a required field of [`AnnotationSpec`]
    /// itself, so unlike the original's runtime check, a missing rect is a
    /// compile error rather than an [`Error::AnnotationMissingRect`] here.
    pub fn add_annotation(&mut self, spec: AnnotationSpec) -> Result<AnnotationId> {
        let id = self.store.alloc();
        self.annotations.push(AnnotationEntry { id, spec, used: None });
        Ok(AnnotationId::from_index(self.annotations.len() - 1))
    }

    /// Register a checkbox form widget.
    pub fn add_checkbox_widget(&mut self, spec: CheckboxWidgetSpec) -> Result<FormWidgetId> {
        let id = self.store.alloc();
        self.widgets.push(WidgetEntry { id, spec, used: None });
        Ok(FormWidgetId::from_index(self.widgets.len() - 1))
    }

    /// Register a structure tree element.
    pub fn add_structure_item(&mut self, spec: StructureItemSpec) -> Result<StructureItemId> {
        if self.struct_tree_root_id.is_none() {
            self.struct_tree_root_id = Some(self.store.alloc());
        }
        let id = self.store.alloc();
        self.structure_items.push(StructureItemEntry { id, spec, used: None });
        Ok(StructureItemId::from_index(self.structure_items.len() - 1))
    }

    /// Register a custom role name mapped to a predefined structure role.
    pub fn add_role(&mut self, name: &str, maps_to: StructRole) -> RoleId {
        self.roles.push((name.to_string(), maps_to));
        RoleId::from_index(self.roles.len() - 1)
    }

    /// Register an outline (bookmark) entry.
    pub fn add_outline(&mut self, spec: OutlineSpec) -> OutlineId {
        if self.outline_root_id.is_none() {
            self.outline_root_id = Some(self.store.alloc());
        }
        let id = self.store.alloc();
        self.outlines.push(OutlineEntry { id, spec });
        OutlineId::from_index(self.outlines.len() - 1)
    }

    /// Embed an arbitrary file, deduplicated by name
    /// ([`Error::DuplicateName`] on a second registration under the same
    /// name).
    pub fn embed_file(&mut self, name: &str, data: &[u8], mime_type: &str) -> Result<EmbeddedFileId> {
        if self.embedded_files.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        let (compressed, did_compress) = self.compress(data);
        let id = self.store.alloc();
        {
            let mut ef = self.chunk.embedded_file(id, &compressed);
            ef.subtype(Name(mime_type.as_bytes()));
            if did_compress {
                ef.filter(Filter::FlateDecode);
            }
            ef.params().size(data.len() as i32);
        }
        let file_id = EmbeddedFileId::from_index(self.embedded_files.len());
        self.embedded_files.insert(name.to_string(), (file_id, id));
        Ok(file_id)
    }

    /// Whether this document has been fully written out already (I6).
    pub fn write_attempted(&self) -> bool {
        self.write_attempted
    }
}

impl GlyphResolver for Document {
    fn font_object(&self, font: FontId) -> Result<u32> {
        self.fonts.get(font.index()).map(|e| e.font_id.get() as u32).ok_or(Error::UnknownResource)
    }

    fn resolve_char(&mut self, font: FontId, codepoint: char) -> Result<u16> {
        self.fonts.get_mut(font.index()).ok_or(Error::UnknownResource)?.thingy.resolve_char(codepoint)
    }

    fn resolve_glyph(&mut self, font: FontId, glyph_index: u16, unicode: Option<&str>) -> Result<u16> {
        self.fonts
            .get_mut(font.index())
            .ok_or(Error::UnknownResource)?
            .thingy
            .resolve_glyph(glyph_index, unicode)
    }

    fn subset_name(&self, font_obj: u32) -> Vec<u8> {
        format!("SFont{font_obj}").into_bytes()
    }
}

/// A drawing surface: wraps [`DrawContext`] with a public API that resolves
/// dense resource ids against a [`Document`] before recording an operator,
/// so that a half-built canvas never gets out of sync with the document that
/// will eventually consume it.
pub struct Canvas {
    pub(crate) inner: DrawContext,
}

impl Canvas {
    /// `q`.
    pub fn save_state(&mut self) -> &mut Self {
        self.inner.save_state();
        self
    }

    /// `Q`.
    pub fn restore_state(&mut self) -> Result<&mut Self> {
        self.inner.restore_state()?;
        Ok(self)
    }

    /// `BDC`/`BMC`.
    pub fn begin_marked_content(&mut self, tag: &str) -> &mut Self {
        self.inner.begin_marked_content(Name(tag.as_bytes()));
        self
    }

    /// `EMC`.
    pub fn end_marked_content(&mut self) -> Result<&mut Self> {
        self.inner.end_marked_content()?;
        Ok(self)
    }

    /// `cm`, for the group matrix of a non-`Page` canvas.
    pub fn set_matrix(&mut self, matrix: [f32; 6]) -> Result<&mut Self> {
        self.inner.set_matrix(matrix)?;
        Ok(self)
    }

    /// Declare the bounding box (required for tiling patterns).
    pub fn set_bbox(&mut self, bbox: Rect) -> &mut Self {
        self.inner.set_bbox(bbox);
        self
    }

    /// Declare the transparency group's color space.
    pub fn set_group_color_space(&mut self, doc: &Document, cs: IccColorSpaceId) -> Result<&mut Self> {
        let cs_ref = doc.icc_color_spaces.get(cs.index()).ok_or(Error::UnknownResource)?.id;
        self.inner.set_group_color_space(cs_ref.get() as u32)?;
        Ok(self)
    }

    /// `w`.
    pub fn set_line_width(&mut self, width: f32) -> Result<&mut Self> {
        self.inner.set_line_width(width)?;
        Ok(self)
    }

    /// `J`.
    pub fn set_line_cap(&mut self, cap: LineCapStyle) -> &mut Self {
        self.inner.set_line_cap(cap);
        self
    }

    /// `j`.
    pub fn set_line_join(&mut self, join: LineJoinStyle) -> &mut Self {
        self.inner.set_line_join(join);
        self
    }

    /// `d`.
    pub fn set_dash_pattern(&mut self, array: &[f32], phase: f32) -> Result<&mut Self> {
        self.inner.set_dash_pattern(array, phase)?;
        Ok(self)
    }

    /// `i`.
    pub fn set_flatness(&mut self, tolerance: f32) -> Result<&mut Self> {
        self.inner.set_flatness(tolerance)?;
        Ok(self)
    }

    /// `gs`.
    pub fn set_graphics_state(&mut self, doc: &Document, gs: GraphicsStateId) -> Result<&mut Self> {
        let obj = doc.graphics_states.get(gs.index()).ok_or(Error::UnknownResource)?.get() as u32;
        self.inner.set_graphics_state(obj);
        Ok(self)
    }

    /// `re`.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.inner.rect(x, y, width, height);
        self
    }

    /// `m`.
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.inner.move_to(x, y);
        self
    }

    /// `l`.
    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.inner.line_to(x, y);
        self
    }

    /// `f`.
    pub fn fill_nonzero(&mut self) -> &mut Self {
        self.inner.fill_nonzero();
        self
    }

    /// `S`.
    pub fn stroke(&mut self) -> &mut Self {
        self.inner.stroke();
        self
    }

    fn resolve_color_obj(doc: &Document, color: &Color) -> Result<Option<(u32, Vec<f32>, bool)>> {
        Ok(match color {
            Color::Icc(id, channels) => {
                let obj = doc.icc_color_spaces.get(id.index()).ok_or(Error::UnknownResource)?.id.get() as u32;
                Some((obj, channels.iter().copied().map(clamp_component).collect(), false))
            }
            Color::Lab(id, l, a, b) => {
                let obj = *doc.lab_color_spaces.get(id.index()).ok_or(Error::UnknownResource)?;
                Some((obj.get() as u32, vec![*l, *a, *b], false))
            }
            Color::Separation(id, v) => {
                let obj = *doc.separations.get(id.index()).ok_or(Error::UnknownResource)?;
                Some((obj.get() as u32, vec![clamp_component(*v)], false))
            }
            Color::Pattern(id) => {
                let obj = *doc.patterns.get(id.index()).ok_or(Error::UnknownResource)?;
                Some((obj.get() as u32, Vec::new(), true))
            }
            Color::DeviceRgb(..) | Color::DeviceGray(..) | Color::DeviceCmyk(..) => None,
        })
    }

    /// Set the fill color.
    pub fn set_fill_color(&mut self, doc: &Document, color: Color) -> Result<&mut Self> {
        self.set_color(doc, color, false)
    }

    /// Set the stroke color.
    pub fn set_stroke_color(&mut self, doc: &Document, color: Color) -> Result<&mut Self> {
        self.set_color(doc, color, true)
    }

    fn set_color(&mut self, doc: &Document, color: Color, stroke: bool) -> Result<&mut Self> {
        match Self::resolve_color_obj(doc, &color)? {
            Some((obj, _, true)) => {
                self.inner.set_pattern_color(obj, stroke);
            }
            Some((obj, channels, false)) => {
                self.inner.set_icc_color(obj, &channels, stroke);
            }
            None => {
                let (space, values) = match color {
                    Color::DeviceRgb(r, g, b) => {
                        (DeviceColorSpace::Rgb, vec![clamp_component(r), clamp_component(g), clamp_component(b)])
                    }
                    Color::DeviceGray(g) => (DeviceColorSpace::Gray, vec![clamp_component(g)]),
                    Color::DeviceCmyk(c, m, y, k) => (
                        DeviceColorSpace::Cmyk,
                        vec![clamp_component(c), clamp_component(m), clamp_component(y), clamp_component(k)],
                    ),
                    _ => unreachable!("resolved colors handled above"),
                };
                if stroke {
                    self.inner.set_stroke_color(space, &values);
                } else {
                    self.inner.set_nonstroke_color(space, &values);
                }
            }
        }
        Ok(self)
    }

    /// `sh`.
    pub fn shading(&mut self, doc: &Document, shading: ShadingId) -> Result<&mut Self> {
        let obj = doc.shadings.get(shading.index()).ok_or(Error::UnknownResource)?.get() as u32;
        self.inner.shading(obj);
        Ok(self)
    }

    /// `Do`, for an image.
    pub fn draw_image(&mut self, doc: &Document, image: ImageId) -> Result<&mut Self> {
        let obj = doc.images.get(image.index()).ok_or(Error::UnknownResource)?.get() as u32;
        self.inner.draw_image(obj);
        Ok(self)
    }

    /// `Do`, for a form XObject.
    pub fn draw_form(&mut self, doc: &Document, form: FormXObjectId) -> Result<&mut Self> {
        let obj = doc.form_xobjects.get(form.index()).ok_or(Error::UnknownResource)?.get() as u32;
        self.inner.draw_form(obj);
        Ok(self)
    }

    /// `Do`, for a transparency group.
    pub fn draw_transparency_group(&mut self, doc: &Document, group: TransparencyGroupId) -> Result<&mut Self> {
        let obj = doc.transparency_groups.get(group.index()).ok_or(Error::UnknownResource)?.get() as u32;
        self.inner.draw_transparency_group(obj);
        Ok(self)
    }

    /// Record that an optional content group is referenced by this canvas
    /// (required before toggling its visibility via marked content).
    pub fn use_optional_content_group(&mut self, doc: &Document, ocg: OptionalContentGroupId) -> Result<&mut Self> {
        let obj = doc.optional_content_groups.get(ocg.index()).ok_or(Error::UnknownResource)?.get() as u32;
        self.inner.use_optional_content_group(obj);
        Ok(self)
    }

    /// `/OC /oc{n} BDC`: begin a marked-content sequence whose visibility is
    /// controlled by `ocg`. `ocg` must already have been passed to
    /// [`use_optional_content_group`](Self::use_optional_content_group) on
    /// this canvas, otherwise `UnusedOcg`.
    pub fn begin_optional_content(&mut self, doc: &Document, ocg: OptionalContentGroupId) -> Result<&mut Self> {
        let obj = doc.optional_content_groups.get(ocg.index()).ok_or(Error::UnknownResource)?.get() as u32;
        self.inner.begin_optional_content(obj)?;
        Ok(self)
    }

    /// Write a completed text object (`BT`..`ET`) into this canvas.
    pub fn draw_text(&mut self, doc: &mut Document, text: TextObject) -> Result<&mut Self> {
        self.inner.write_text(text.0, doc)?;
        Ok(self)
    }
}

/// A text object builder (`BT`..`ET`), written into a [`Canvas`] via
/// [`Canvas::draw_text`].
pub struct TextObject(pub(crate) PdfText);

impl Default for TextObject {
    fn default() -> Self {
        Self::new()
    }
}

impl TextObject {
    /// Start a new, empty text object.
    pub fn new() -> Self {
        Self(PdfText::new())
    }

    /// `Tf`.
    pub fn set_font(&mut self, font: FontId, size: f32) -> &mut Self {
        self.0.set_font(font, size);
        self
    }

    /// `Td`.
    pub fn move_line(&mut self, x: f32, y: f32) -> &mut Self {
        self.0.move_line(x, y);
        self
    }

    /// `Tm`.
    pub fn matrix(&mut self, matrix: [f32; 6]) -> &mut Self {
        self.0.matrix(matrix);
        self
    }

    /// `Tj`.
    pub fn show(&mut self, text: &str) -> Result<&mut Self> {
        self.0.show(text)?;
        Ok(self)
    }

    /// `TJ`, over a mix of runs and kerning adjustments.
    pub fn show_positioned(&mut self, items: Vec<GlyphItem>) -> Result<&mut Self> {
        self.0.show_positioned(items)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_page_document() -> Document {
        let mut doc = Document::construct(DocumentProperties::default()).unwrap();
        let canvas = doc.new_page_canvas();
        doc.add_page(canvas, None, None, None, &[], &[], &[], &[]).unwrap();
        doc
    }

    #[test]
    fn write_to_bytes_produces_a_well_formed_file() {
        let mut doc = single_page_document();
        let bytes = doc.write_to_bytes([0; 16]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("%PDF-1.7\n%"));
        assert!(text.contains("/Type /Catalog"));
        assert!(text.contains("/Type /Pages"));
        assert!(text.contains("/ID [<"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn write_to_file_leaves_only_the_final_path_behind() {
        let doc = single_page_document();
        let mut path = std::env::temp_dir();
        path.push(format!("pdfkit-test-{:x}.pdf", std::ptr::addr_of!(doc) as usize));
        let tmp_path = path.with_file_name(format!("{}~", path.file_name().unwrap().to_str().unwrap()));

        doc.write_to_file(&path, [0; 16]).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(!tmp_path.exists());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn document_info_carries_caller_supplied_dates() {
        let props = DocumentProperties {
            creation_date: Some(Date::new(2024).month(3).day(1)),
            mod_date: Some(Date::new(2024).month(3).day(2)),
            ..Default::default()
        };
        let mut doc = Document::construct(props).unwrap();
        let canvas = doc.new_page_canvas();
        doc.add_page(canvas, None, None, None, &[], &[], &[], &[]).unwrap();
        let bytes = doc.write_to_bytes([0; 16]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("/CreationDate"));
        assert!(text.contains("/ModDate"));
    }

    #[test]
    fn writing_twice_fails() {
        let mut doc = single_page_document();
        doc.write_to_bytes([0; 16]).unwrap();
        assert!(matches!(doc.write_to_bytes([0; 16]), Err(Error::WritingTwice)));
    }

    #[test]
    fn writing_with_no_pages_fails() {
        let mut doc = Document::construct(DocumentProperties::default()).unwrap();
        assert!(matches!(doc.write_to_bytes([0; 16]), Err(Error::NoPages)));
    }

    #[test]
    fn cmyk_output_without_profile_is_rejected_at_construction() {
        let props = DocumentProperties { output_color_space: OutputColorSpace::Cmyk, ..Default::default() };
        assert!(matches!(Document::construct(props), Err(Error::NoCmykProfile)));
    }

    #[test]
    fn page_labeling_ranges_must_be_increasing() {
        let mut doc = Document::construct(DocumentProperties::default()).unwrap();
        let spec = || PageLabelSpec { style: None, prefix: None, start_num: Some(1) };
        doc.add_page_labeling(0, spec()).unwrap();
        doc.add_page_labeling(5, spec()).unwrap();
        assert!(matches!(doc.add_page_labeling(5, spec()), Err(Error::NonSequentialPageNumber)));
        assert!(matches!(doc.add_page_labeling(2, spec()), Err(Error::NonSequentialPageNumber)));
    }

    #[test]
    fn separation_requires_a_post_script_tint_transform() {
        let mut doc = Document::construct(DocumentProperties::default()).unwrap();
        let exponential = doc
            .add_function(PdfFunction::Exponential {
                domain: [0.0, 1.0],
                c0: vec![0.0],
                c1: vec![1.0],
                n: 1.0,
            })
            .unwrap();
        assert!(matches!(
            doc.create_separation("Spot", DeviceColorSpace::Rgb, exponential),
            Err(Error::NotAPostScriptFunction)
        ));

        let post_script = doc
            .add_function(PdfFunction::PostScript {
                domain: vec![[0.0, 1.0]],
                range: vec![[0.0, 1.0], [0.0, 1.0], [0.0, 1.0]],
                program: b"{ dup dup }".to_vec(),
            })
            .unwrap();
        assert!(doc.create_separation("Spot", DeviceColorSpace::Rgb, post_script).is_ok());
    }

    #[test]
    fn annotation_reuse_across_pages_is_rejected() {
        let mut doc = Document::construct(DocumentProperties::default()).unwrap();
        let annotation = doc
            .add_annotation(AnnotationSpec {
                kind: AnnotationType::Link,
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
                contents: None,
                name: None,
                flags: None,
                color: None,
                uri_action: Some("https://example.com".to_string()),
                embedded_file: None,
                icon: None,
                screen_media: None,
            })
            .unwrap();
        let canvas = doc.new_page_canvas();
        doc.add_page(canvas, None, None, None, &[annotation], &[], &[], &[]).unwrap();
        let canvas = doc.new_page_canvas();
        assert!(matches!(
            doc.add_page(canvas, None, None, None, &[annotation], &[], &[], &[]),
            Err(Error::AnnotationReuse)
        ));
    }

    #[test]
    fn toggling_an_unused_ocg_is_rejected() {
        let mut doc = Document::construct(DocumentProperties::default()).unwrap();
        let ocg = doc.add_optional_content_group("Layer");
        let mut canvas = doc.new_page_canvas();
        assert!(matches!(canvas.begin_optional_content(&doc, ocg), Err(Error::UnusedOcg)));
    }

    #[test]
    fn optional_content_group_round_trips_through_page_and_catalog() {
        let mut doc = Document::construct(DocumentProperties::default()).unwrap();
        let ocg = doc.add_optional_content_group("Layer");
        let mut canvas = doc.new_page_canvas();
        canvas.use_optional_content_group(&doc, ocg).unwrap();
        canvas.begin_optional_content(&doc, ocg).unwrap();
        canvas.end_marked_content().unwrap();
        doc.add_page(canvas, None, None, None, &[], &[], &[], &[]).unwrap();

        let bytes = doc.write_to_bytes([0; 16]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("/Type /OCG"));
        assert!(text.contains("/OC /oc"));
        assert!(text.contains("BDC"));
        assert!(text.contains("/Properties"));
        assert!(text.contains("/OCProperties"));
        assert!(text.contains("/OCGs ["));
    }

    #[test]
    fn subnavigation_chains_nav_nodes_and_links_pres_steps() {
        let mut doc = Document::construct(DocumentProperties::default()).unwrap();
        let a = doc.add_optional_content_group("StepA");
        let b = doc.add_optional_content_group("StepB");
        let canvas = doc.new_page_canvas();
        let subnav = [
            SubPageNavigation { ocg: a, transition: None },
            SubPageNavigation { ocg: b, transition: Some((TransitionStyle::Dissolve, 0.5)) },
        ];
        doc.add_page(canvas, None, None, None, &[], &[], &[], &subnav).unwrap();

        let bytes = doc.write_to_bytes([0; 16]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("/Type /NavNode"));
        assert!(text.contains("/PresSteps"));
        assert!(text.contains("/S /SetOCGState"));
        assert!(text.contains("/S /Trans"));
    }

    #[test]
    fn subnavigation_resolves_against_registered_groups() {
        let mut doc = Document::construct(DocumentProperties::default()).unwrap();
        let ocg = doc.add_optional_content_group("Layer");
        let canvas = doc.new_page_canvas();
        let subnav = [SubPageNavigation { ocg, transition: None }];
        assert!(doc.add_page(canvas, None, None, None, &[], &[], &[], &subnav).is_ok());
    }
}
