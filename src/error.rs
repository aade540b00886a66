//! The error taxonomy shared by [`crate::document`], [`crate::draw`],
//! [`crate::fontsub`] and [`crate::writer`].

use std::fmt;
use std::io;

/// Every way that building or writing a document can fail.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A [`crate::ids::FontId`], [`crate::ids::ImageId`] or similar handle
    /// was passed to an operation of a [`crate::document::Document`] it was
    /// not allocated by.
    UnknownResource,
    /// A page, annotation, structure item or other once-only object was
    /// registered or written a second time.
    WritingTwice,
    /// [`crate::document::Document::write_to_file`] was called before any
    /// page had been added.
    NoPages,
    /// The same annotation identity was attached to more than one page, or
    /// attached to a page twice.
    AnnotationReuse,
    /// The same structure item identity appears more than once in the
    /// structure tree.
    StructureReuse,
    /// A drawing operation was attempted from a [`crate::draw::DrawContext`]
    /// of a kind that does not support it (e.g. a transparency group matrix
    /// was set from a page context).
    InvalidDrawContextType,
    /// [`crate::draw::DrawContext`] was dropped with marked content still
    /// open (`BDC`/`BMC` without matching `EMC`).
    UnclosedMarkedContent,
    /// `ET` was requested while the draw state stack's top frame is not
    /// `Text`, or similar operator/state mismatches.
    WrongDrawContext,
    /// A pattern color space was set where the draw context does not accept
    /// one (e.g. for a stroke/fill operand incompatible with patterns).
    PatternNotAccepted,
    /// A name passed for a resource key or subset tag began with a slash,
    /// which would be written twice.
    SlashStart,
    /// A dash array entry was negative.
    NegativeDash,
    /// A dash array was present but had zero elements.
    ZeroLengthArray,
    /// A line width was negative.
    NegativeLineWidth,
    /// A flatness tolerance was outside of `0.0..=100.0`.
    InvalidFlatness,
    /// An optional content group was referenced that was never registered
    /// with the document.
    UnusedOcg,
    /// A transparency group was requested from a draw context that cannot
    /// hold one.
    WrongDCForTransparencyGroup,
    /// A `/Matrix` was requested from a draw context that does not carry
    /// one.
    WrongDCForMatrix,
    /// A font was used in a text-showing operator before
    /// [`crate::draw::DrawContext::set_font`] (or equivalent) selected one.
    FontNotSpecified,
    /// A codepoint could not be mapped to a glyph in the currently selected
    /// font.
    MissingGlyph(char),
    /// A file name was registered for embedding more than once.
    DuplicateName(String),
    /// A font file could not be parsed as TrueType or OpenType/CFF.
    MalformedFontFile,
    /// A font table or feature is recognized but not supported by the
    /// subsetter.
    UnsupportedFontFormat,
    /// A byte offset computed while subsetting a font fell outside of the
    /// source file.
    FontIndexOutOfBounds,
    /// No CMYK ICC profile was registered, but a conversion requiring one was
    /// requested.
    NoCmykProfile,
    /// [`crate::document::Document::add_page_labeling`] was called with a
    /// `start_page` that does not come after every previously registered
    /// labeling range's start.
    NonSequentialPageNumber,
    /// An I/O error occurred while reading a source file or writing the
    /// output file.
    Io(io::Error),
    /// [`crate::document::Document::add_annotation`] was called with a spec
    /// that carries no `/Rect`.
    AnnotationMissingRect,
    /// A function passed to [`crate::document::Document::create_separation`]
    /// was not a Type 4 (PostScript calculator) function.
    NotAPostScriptFunction,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownResource => write!(f, "resource handle is not from this document"),
            Self::WritingTwice => write!(f, "object was already written"),
            Self::NoPages => write!(f, "document has no pages"),
            Self::AnnotationReuse => write!(f, "annotation was attached more than once"),
            Self::StructureReuse => write!(f, "structure item was used more than once"),
            Self::InvalidDrawContextType => {
                write!(f, "operation not valid for this kind of drawing context")
            }
            Self::UnclosedMarkedContent => write!(f, "marked content sequence was not closed"),
            Self::WrongDrawContext => write!(f, "operator not valid in the current draw state"),
            Self::PatternNotAccepted => write!(f, "pattern color not accepted here"),
            Self::SlashStart => write!(f, "name must not start with a slash"),
            Self::NegativeDash => write!(f, "dash array entries must not be negative"),
            Self::ZeroLengthArray => write!(f, "array must not be empty"),
            Self::NegativeLineWidth => write!(f, "line width must not be negative"),
            Self::InvalidFlatness => write!(f, "flatness must be in 0.0..=100.0"),
            Self::UnusedOcg => write!(f, "optional content group was never registered"),
            Self::WrongDCForTransparencyGroup => {
                write!(f, "draw context cannot hold a transparency group")
            }
            Self::WrongDCForMatrix => write!(f, "draw context has no matrix"),
            Self::FontNotSpecified => write!(f, "no font selected before showing text"),
            Self::MissingGlyph(c) => write!(f, "no glyph for character {c:?} in selected font"),
            Self::DuplicateName(name) => write!(f, "embedded file name {name:?} already used"),
            Self::MalformedFontFile => write!(f, "font file is not valid TrueType or CFF"),
            Self::UnsupportedFontFormat => write!(f, "font file uses an unsupported feature"),
            Self::FontIndexOutOfBounds => write!(f, "font table offset out of bounds"),
            Self::NoCmykProfile => write!(f, "no CMYK ICC profile registered"),
            Self::NonSequentialPageNumber => {
                write!(f, "page labeling ranges must be registered in increasing start-page order")
            }
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::AnnotationMissingRect => write!(f, "annotation has no /Rect"),
            Self::NotAPostScriptFunction => {
                write!(f, "separation tint transform must be a Type 4 function")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// A `Result` defaulting to [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
