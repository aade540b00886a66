//! Opaque handles returned by [`crate::document::Document`]'s registration
//! methods.
//!
//! Every id is a dense, non-negative index into a component-specific vector
//! owned by the document that produced it. Ids are comparable, hashable, and
//! carry no lifetime, but they are only meaningful when passed back to the
//! same document: using one against a different document is caught by the
//! caller-facing APIs and reported as [`crate::Error::UnknownResource`].

macro_rules! id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) usize);

        impl $name {
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index)
            }

            pub(crate) fn index(self) -> usize {
                self.0
            }
        }
    };
}

id!(
    /// A font registered with [`crate::document::Document::load_font`].
    FontId
);
id!(
    /// An image registered with `add_image`, `add_mask_image` or `embed_jpg`.
    ImageId
);
id!(
    /// An ICC-based color space registered with `add_icc_profile`.
    IccColorSpaceId
);
id!(
    /// A CIE L*a*b* color space registered with `add_lab_colorspace`.
    LabColorSpaceId
);
id!(
    /// A separation color space registered with `create_separation`.
    SeparationId
);
id!(
    /// A tiling or shading pattern registered with `add_tiling_pattern` or
    /// `add_shading`'s corresponding pattern wrapper.
    PatternId
);
id!(
    /// A shading registered with `add_shading`.
    ShadingId
);
id!(
    /// A PDF function registered with `add_function`.
    FunctionId
);
id!(
    /// A graphics state dictionary registered with `add_graphics_state`.
    GraphicsStateId
);
id!(
    /// An outline item registered with `add_outline`.
    OutlineId
);
id!(
    /// A form XObject produced from a [`crate::draw::DrawContext`] of kind
    /// `FormXObject`.
    FormXObjectId
);
id!(
    /// A transparency group produced from a draw context of kind
    /// `TransparencyGroup`.
    TransparencyGroupId
);
id!(
    /// A soft mask registered with `add_soft_mask`.
    SoftMaskId
);
id!(
    /// An optional content group (a togglable layer).
    OptionalContentGroupId
);
id!(
    /// An annotation registered with `add_annotation`.
    AnnotationId
);
id!(
    /// A structure tree item registered with `add_structure_item`.
    StructureItemId
);
id!(
    /// A file embedded with `embed_file`.
    EmbeddedFileId
);
id!(
    /// A checkbox form widget.
    FormWidgetId
);
id!(
    /// A role name mapped in the structure tree's `/RoleMap`.
    RoleId
);
