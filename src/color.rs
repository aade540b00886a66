use super::*;

/// Writer for a _color space array or name_.
///
/// This struct is created by [`Chunk::color_space`] for a standalone,
/// indirectly referenceable color space, and by various inline attributes
/// (e.g. [`ImageXObject::color_space`]) for one that is embedded directly.
///
/// Only one of the methods on this type may be called, consuming it.
pub struct ColorSpace<'a> {
    obj: Obj<'a>,
}

writer!(ColorSpace: |obj| Self { obj });

impl<'a> ColorSpace<'a> {
    /// Write a predefined, parameter-less device color space as a bare name.
    pub fn device(self, space: DeviceColorSpace) {
        self.obj.primitive(space.to_name());
    }

    /// Write a `CalGray` color space.
    pub fn cal_gray(
        self,
        white_point: [f32; 3],
        black_point: Option<[f32; 3]>,
        gamma: Option<f32>,
    ) {
        let mut array = self.obj.array();
        array.item(Name(b"CalGray"));

        let mut dict = array.obj().dict();
        dict.insert(Name(b"WhitePoint")).array().typed().items(white_point);
        if let Some(black_point) = black_point {
            dict.insert(Name(b"BlackPoint")).array().typed().items(black_point);
        }
        if let Some(gamma) = gamma {
            dict.pair(Name(b"Gamma"), gamma);
        }
    }

    /// Write a `CalRGB` color space.
    pub fn cal_rgb(
        self,
        white_point: [f32; 3],
        black_point: Option<[f32; 3]>,
        gamma: Option<[f32; 3]>,
        matrix: Option<[f32; 9]>,
    ) {
        let mut array = self.obj.array();
        array.item(Name(b"CalRGB"));

        let mut dict = array.obj().dict();
        dict.insert(Name(b"WhitePoint")).array().typed().items(white_point);
        if let Some(black_point) = black_point {
            dict.insert(Name(b"BlackPoint")).array().typed().items(black_point);
        }
        if let Some(gamma) = gamma {
            dict.insert(Name(b"Gamma")).array().typed().items(gamma);
        }
        if let Some(matrix) = matrix {
            dict.insert(Name(b"Matrix")).array().typed().items(matrix);
        }
    }

    /// Write a `Lab` color space.
    pub fn lab(
        self,
        white_point: [f32; 3],
        black_point: Option<[f32; 3]>,
        range: Option<[f32; 4]>,
    ) {
        let mut array = self.obj.array();
        array.item(Name(b"Lab"));

        let mut dict = array.obj().dict();
        dict.insert(Name(b"WhitePoint")).array().typed().items(white_point);
        if let Some(black_point) = black_point {
            dict.insert(Name(b"BlackPoint")).array().typed().items(black_point);
        }
        if let Some(range) = range {
            dict.insert(Name(b"Range")).array().typed().items(range);
        }
    }

    /// Write an `ICCBased` color space, referencing a previously written
    /// ICC profile stream.
    pub fn icc_based(self, profile: Ref) {
        let mut array = self.obj.array();
        array.item(Name(b"ICCBased"));
        array.item(profile);
    }

    /// Write an `Indexed` color space. The lookup table has
    /// `(hival + 1) * base_components` bytes.
    ///
    /// Panics if `hival` is not in `0..=255`.
    pub fn indexed(self, base: Name, hival: i32, lookup: &[u8]) {
        assert!((0..=255).contains(&hival), "hival must be in 0..=255");
        let mut array = self.obj.array();
        array.item(Name(b"Indexed"));
        array.item(base);
        array.item(hival);
        array.item(Str(lookup));
    }

    /// Write a `Separation` color space.
    pub fn separation(self, colorant: Name, alternate: Name, tint_transform: Ref) {
        let mut array = self.obj.array();
        array.item(Name(b"Separation"));
        array.item(colorant);
        array.item(alternate);
        array.item(tint_transform);
    }

    /// Write a `DeviceN` color space.
    pub fn device_n(
        self,
        names: impl IntoIterator<Item = Name<'a>>,
        alternate: Name,
        tint_transform: Ref,
    ) {
        let mut array = self.obj.array();
        array.item(Name(b"DeviceN"));
        array.obj().array().typed().items(names);
        array.item(alternate);
        array.item(tint_transform);
    }

    /// Write a `Pattern` color space for uncolored tiling patterns, layered
    /// over the given underlying color space.
    pub fn uncolored_pattern(self, base: Name) {
        let mut array = self.obj.array();
        array.item(Name(b"Pattern"));
        array.item(base);
    }
}

/// One of the parameter-less device color spaces.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DeviceColorSpace {
    /// `DeviceGray`.
    Gray,
    /// `DeviceRGB`.
    Rgb,
    /// `DeviceCMYK`.
    Cmyk,
    /// `Pattern`, for colored tiling/shading patterns.
    Pattern,
}

impl DeviceColorSpace {
    pub(crate) fn to_name(self) -> Name<'static> {
        match self {
            Self::Gray => Name(b"DeviceGray"),
            Self::Rgb => Name(b"DeviceRGB"),
            Self::Cmyk => Name(b"DeviceCMYK"),
            Self::Pattern => Name(b"Pattern"),
        }
    }
}

/// Writer for a _separation information dictionary_.
///
/// Declares which separation (or `DeviceN`) colorants are in use on a page,
/// and how those relate to the colorants used elsewhere in the document.
pub struct SeparationInfo<'a> {
    dict: Dict<'a>,
}

writer!(SeparationInfo: |obj| Self { dict: obj.dict() });

impl SeparationInfo<'_> {
    /// Write the `/Pages` attribute, the pages that this dictionary's
    /// separations apply to.
    pub fn pages(&mut self, pages: impl IntoIterator<Item = Ref>) -> &mut Self {
        self.insert(Name(b"Pages")).array().typed().items(pages);
        self
    }

    /// Write the `/DeviceColorant` attribute: either a colorant name or
    /// `/All`.
    pub fn device_colorant(&mut self, name: Name) -> &mut Self {
        self.pair(Name(b"DeviceColorant"), name);
        self
    }

    /// Write the `/ColorSpace` attribute, pointing to a `Separation` or
    /// `DeviceN` color space object used on the referenced pages.
    pub fn color_space(&mut self, space: Ref) -> &mut Self {
        self.pair(Name(b"ColorSpace"), space);
        self
    }
}

deref!('a, SeparationInfo<'a> => Dict<'a>, dict);

/// Writer for an _ICC profile stream_.
pub struct IccProfile<'a> {
    stream: Stream<'a>,
}

impl<'a> IccProfile<'a> {
    pub(crate) fn start(stream: Stream<'a>) -> Self {
        Self { stream }
    }

    /// Write the `/N` attribute.
    ///
    /// The number of color components in the profile. Required.
    pub fn n(&mut self, n: i32) -> &mut Self {
        self.stream.pair(Name(b"N"), n);
        self
    }

    /// Write the `/Alternate` attribute, a fallback color space if the
    /// profile cannot be interpreted.
    pub fn alternate(&mut self, alternate: Name) -> &mut Self {
        self.stream.pair(Name(b"Alternate"), alternate);
        self
    }
}

deref!('a, IccProfile<'a> => Stream<'a>, stream);

/// Writer for an _output intent dictionary_, used by
/// [`Catalog::output_intents`](crate::Catalog::output_intents) to declare the
/// intended color reproduction of the document for a given conformance (e.g.
/// `/GTS_PDFX`, `/GTS_PDFA1`).
pub struct OutputIntent<'a> {
    dict: Dict<'a>,
}

writer!(OutputIntent: |obj| {
    let mut dict = obj.dict();
    dict.pair(Name(b"Type"), Name(b"OutputIntent"));
    Self { dict }
});

impl OutputIntent<'_> {
    /// Write the `/S` attribute, the output intent subtype (for example
    /// `/GTS_PDFX` or `/GTS_PDFA1`). Required.
    pub fn subtype(&mut self, subtype: Name) -> &mut Self {
        self.pair(Name(b"S"), subtype);
        self
    }

    /// Write the `/OutputConditionIdentifier` attribute, a registered name
    /// for the intended output device's characteristics (e.g.
    /// `FOGRA39`). Required.
    pub fn output_condition_identifier(&mut self, identifier: TextStr) -> &mut Self {
        self.pair(Name(b"OutputConditionIdentifier"), identifier);
        self
    }

    /// Write the `/OutputCondition` attribute, a human-readable description
    /// of the intended output device.
    pub fn output_condition(&mut self, condition: TextStr) -> &mut Self {
        self.pair(Name(b"OutputCondition"), condition);
        self
    }

    /// Write the `/RegistryName` attribute, the URL of the registry the
    /// identifier is registered with.
    pub fn registry_name(&mut self, registry: TextStr) -> &mut Self {
        self.pair(Name(b"RegistryName"), registry);
        self
    }

    /// Write the `/Info` attribute, additional human-readable information.
    pub fn info(&mut self, info: TextStr) -> &mut Self {
        self.pair(Name(b"Info"), info);
        self
    }

    /// Write the `/DestOutputProfile` attribute, pointing at the
    /// [ICC profile stream](IccProfile) describing the intended output
    /// device's color characteristics.
    pub fn dest_output_profile(&mut self, profile: Ref) -> &mut Self {
        self.pair(Name(b"DestOutputProfile"), profile);
        self
    }
}

deref!('a, OutputIntent<'a> => Dict<'a>, dict);

/// Writer for a _tiling pattern stream_.
pub struct TilingPattern<'a> {
    stream: Stream<'a>,
}

impl<'a> TilingPattern<'a> {
    pub(crate) fn start_with_stream(mut stream: Stream<'a>) -> Self {
        stream.pair(Name(b"Type"), Name(b"Pattern"));
        stream.pair(Name(b"PatternType"), PatternType::Tiling.to_int());
        Self { stream }
    }

    /// Write the `/PaintType` attribute.
    ///
    /// Sets whether to use external or stream color. Required.
    pub fn paint_type(&mut self, paint_type: PaintType) -> &mut Self {
        self.stream.pair(Name(b"PaintType"), paint_type.to_int());
        self
    }

    /// Write the `/TilingType` attribute.
    ///
    /// Sets how to stretch and space the pattern. Required.
    pub fn tiling_type(&mut self, tiling_type: TilingType) -> &mut Self {
        self.stream.pair(Name(b"TilingType"), tiling_type.to_int());
        self
    }

    /// Write the `/BBox` attribute.
    ///
    /// Sets the bounding box of the pattern in the pattern's coordinate
    /// system. Required.
    pub fn bbox(&mut self, bbox: Rect) -> &mut Self {
        self.stream.pair(Name(b"BBox"), bbox);
        self
    }

    /// Write the `/XStep` attribute.
    ///
    /// Panics if `x_step` is zero.
    pub fn x_step(&mut self, x_step: f32) -> &mut Self {
        assert!(x_step != 0.0, "x step must not be zero");
        self.stream.pair(Name(b"XStep"), x_step);
        self
    }

    /// Write the `/YStep` attribute.
    ///
    /// Panics if `y_step` is zero.
    pub fn y_step(&mut self, y_step: f32) -> &mut Self {
        assert!(y_step != 0.0, "y step must not be zero");
        self.stream.pair(Name(b"YStep"), y_step);
        self
    }

    /// Start writing the `/Resources` dictionary. Required.
    pub fn resources(&mut self) -> Resources<'_> {
        self.insert(Name(b"Resources")).start()
    }

    /// Write the `/Matrix` attribute.
    pub fn matrix(&mut self, matrix: [f32; 6]) -> &mut Self {
        self.insert(Name(b"Matrix")).array().typed().items(matrix);
        self
    }
}

deref!('a, TilingPattern<'a> => Stream<'a>, stream);

/// Type of paint for a tiling pattern.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PaintType {
    /// Paint the pattern with the colors specified in the stream.
    Colored,
    /// Paint the pattern with the colors active when the pattern was painted.
    Uncolored,
}

impl PaintType {
    pub(crate) fn to_int(self) -> i32 {
        match self {
            Self::Colored => 1,
            Self::Uncolored => 2,
        }
    }
}

/// How to adjust tile spacing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TilingType {
    /// Constant space between each tile, tiles may be distorted by 1px.
    ConstantSpacing,
    /// Tile size is constant, spacing between may vary by 1px.
    NoDistortion,
    /// Constant space between each tile and faster drawing, tiles may be distorted.
    FastConstantSpacing,
}

impl TilingType {
    pub(crate) fn to_int(self) -> i32 {
        match self {
            Self::ConstantSpacing => 1,
            Self::NoDistortion => 2,
            Self::FastConstantSpacing => 3,
        }
    }
}

/// Writer for a _shading pattern_.
pub struct ShadingPattern<'a> {
    dict: Dict<'a>,
}

writer!(ShadingPattern: |obj| {
    let mut dict = obj.dict();
    dict.pair(Name(b"Type"), Name(b"Pattern"));
    dict.pair(Name(b"PatternType"), PatternType::Shading.to_int());
    Self { dict }
});

impl<'a> ShadingPattern<'a> {
    /// Start writing the `/Shading` dictionary.
    pub fn shading(&mut self) -> FunctionShading<'_> {
        FunctionShading::start(self.insert(Name(b"Shading")))
    }

    /// Write the `/Matrix` attribute.
    pub fn matrix(&mut self, matrix: [f32; 6]) -> &mut Self {
        self.insert(Name(b"Matrix")).array().typed().items(matrix);
        self
    }

    /// Write the `/ExtGState` attribute, referencing a graphics state
    /// dictionary to apply while the pattern is painted.
    pub fn ext_graphics(&mut self, ext_graphics: Ref) -> &mut Self {
        self.pair(Name(b"ExtGState"), ext_graphics);
        self
    }
}

deref!('a, ShadingPattern<'a> => Dict<'a>, dict);

/// Common attributes shared by every shading dictionary.
macro_rules! common_shading_methods {
    () => {
        /// Write the `/ColorSpace` attribute.
        ///
        /// The color space in which the shading's color values are
        /// interpreted. May not itself be `Pattern`. Required.
        pub fn color_space(&mut self, space: DeviceColorSpace) -> &mut Self {
            self.pair(Name(b"ColorSpace"), space.to_name());
            self
        }

        /// Write the `/Background` attribute.
        pub fn background(&mut self, background: impl IntoIterator<Item = f32>) -> &mut Self {
            self.insert(Name(b"Background")).array().typed().items(background);
            self
        }

        /// Write the `/BBox` attribute.
        pub fn bbox(&mut self, bbox: Rect) -> &mut Self {
            self.pair(Name(b"BBox"), bbox);
            self
        }

        /// Write the `/AntiAlias` attribute.
        pub fn anti_alias(&mut self, anti_alias: bool) -> &mut Self {
            self.pair(Name(b"AntiAlias"), anti_alias);
            self
        }
    };
}

/// Writer for a _function-based shading dictionary_ (types 1-3).
pub struct FunctionShading<'a> {
    dict: Dict<'a>,
}

writer!(FunctionShading: |obj| {
    Self { dict: obj.dict() }
});

impl<'a> FunctionShading<'a> {
    common_shading_methods!();

    /// Write the `/ShadingType` attribute. Required.
    pub fn shading_type(&mut self, shading_type: ShadingType) -> &mut Self {
        self.pair(Name(b"ShadingType"), shading_type.to_int());
        self
    }

    /// Write the `/Domain` attribute.
    pub fn domain(&mut self, domain: [f32; 4]) -> &mut Self {
        self.insert(Name(b"Domain")).array().typed().items(domain);
        self
    }

    /// Write the `/Matrix` attribute. Only for function shadings.
    pub fn matrix(&mut self, matrix: [f32; 6]) -> &mut Self {
        self.insert(Name(b"Matrix")).array().typed().items(matrix);
        self
    }

    /// Write the `/Function` attribute. Required.
    pub fn function(&mut self, function: Ref) -> &mut Self {
        self.pair(Name(b"Function"), function);
        self
    }

    /// Write the `/Coords` attribute. Required for axial and radial shadings.
    pub fn coords(&mut self, coords: impl IntoIterator<Item = f32>) -> &mut Self {
        self.insert(Name(b"Coords")).array().typed().items(coords);
        self
    }

    /// Write the `/Extend` attribute.
    pub fn extend(&mut self, extend: [bool; 2]) -> &mut Self {
        self.insert(Name(b"Extend")).array().typed().items(extend);
        self
    }
}

deref!('a, FunctionShading<'a> => Dict<'a>, dict);

/// Writer for a _stream-based shading_ (types 4-7: free-form and lattice
/// Gouraud-shaded triangle meshes, and Coons/tensor-product patch meshes).
pub struct StreamShading<'a> {
    stream: Stream<'a>,
}

impl<'a> StreamShading<'a> {
    pub(crate) fn start(stream: Stream<'a>) -> Self {
        Self { stream }
    }

    common_shading_methods!();

    /// Write the `/ShadingType` attribute. Required.
    pub fn shading_type(&mut self, shading_type: MeshShadingType) -> &mut Self {
        self.pair(Name(b"ShadingType"), shading_type.to_int());
        self
    }

    /// Write the `/BitsPerCoordinate` attribute. Required. Must be one of
    /// 1, 2, 4, 8, 12, 16, 24 or 32.
    pub fn bits_per_coordinate(&mut self, bits: i32) -> &mut Self {
        self.pair(Name(b"BitsPerCoordinate"), bits);
        self
    }

    /// Write the `/BitsPerComponent` attribute. Required.
    pub fn bits_per_component(&mut self, bits: i32) -> &mut Self {
        self.pair(Name(b"BitsPerComponent"), bits);
        self
    }

    /// Write the `/BitsPerFlag` attribute. Required. Must be one of 2, 4 or 8.
    pub fn bits_per_flag(&mut self, bits: i32) -> &mut Self {
        self.pair(Name(b"BitsPerFlag"), bits);
        self
    }

    /// Write the `/VerticesPerRow` attribute. Required for lattice-form
    /// shadings (type 5).
    pub fn vertices_per_row(&mut self, vertices: i32) -> &mut Self {
        self.pair(Name(b"VerticesPerRow"), vertices);
        self
    }

    /// Write the `/Decode` attribute. Required.
    ///
    /// Pairs of `(min, max)` values, one pair for each coordinate and color
    /// component, that the packed binary data is mapped into.
    pub fn decode(&mut self, decode: impl IntoIterator<Item = f32>) -> &mut Self {
        self.insert(Name(b"Decode")).array().typed().items(decode);
        self
    }

    /// Write the `/Function` attribute. If present, the packed color data
    /// carries a single parametric value instead of full color components.
    pub fn function(&mut self, function: Ref) -> &mut Self {
        self.pair(Name(b"Function"), function);
        self
    }
}

deref!('a, StreamShading<'a> => Stream<'a>, stream);

/// Which kind of mesh shading (types 4-7) to use.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MeshShadingType {
    /// Free-form Gouraud-shaded triangle mesh.
    FreeFormGouraud,
    /// Lattice-form Gouraud-shaded triangle mesh.
    LatticeFormGouraud,
    /// Coons patch mesh.
    CoonsPatch,
    /// Tensor-product patch mesh.
    TensorProductPatch,
}

impl MeshShadingType {
    pub(crate) fn to_int(self) -> i32 {
        match self {
            Self::FreeFormGouraud => 4,
            Self::LatticeFormGouraud => 5,
            Self::CoonsPatch => 6,
            Self::TensorProductPatch => 7,
        }
    }
}

/// What kind of function-based shading to use.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShadingType {
    /// The function specifies the color for each point in the domain.
    Function,
    /// The function specifies the color for each point on a line.
    Axial,
    /// The function specifies the color for each circle between two nested circles.
    Radial,
}

impl ShadingType {
    pub(crate) fn to_int(self) -> i32 {
        match self {
            Self::Function => 1,
            Self::Axial => 2,
            Self::Radial => 3,
        }
    }
}

/// Type of pattern.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
enum PatternType {
    /// A tiling pattern.
    Tiling,
    /// A shading pattern.
    Shading,
}

impl PatternType {
    fn to_int(self) -> i32 {
        match self {
            Self::Tiling => 1,
            Self::Shading => 2,
        }
    }
}
