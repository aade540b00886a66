use std::marker::PhantomData;
use std::num::NonZeroI32;

use super::*;

/// A primitive PDF object that can be written directly as an operand, array
/// item, or dictionary value.
pub trait Primitive {
    /// Write the object into a buffer.
    fn write(self, buf: &mut Buf);
}

impl Primitive for bool {
    fn write(self, buf: &mut Buf) {
        buf.push_bytes(if self { b"true" } else { b"false" });
    }
}

impl Primitive for i32 {
    fn write(self, buf: &mut Buf) {
        buf.push_int(self);
    }
}

impl Primitive for f32 {
    fn write(self, buf: &mut Buf) {
        buf.push_float(self);
    }
}

impl<T: Primitive> Primitive for Option<T> {
    fn write(self, buf: &mut Buf) {
        match self {
            Some(value) => value.write(buf),
            None => Null.write(buf),
        }
    }
}

/// A string object (any byte sequence).
///
/// Written as `(Thing)`, falling back to hexadecimal form (`<2829>`) if the
/// byte sequence contains a backslash, a parenthesis, or a bare carriage
/// return (which would otherwise be silently normalized to `\n`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Str<'a>(pub &'a [u8]);

impl Primitive for Str<'_> {
    fn write(self, buf: &mut Buf) {
        buf.register_string_len(self.0.len());
        if self.0.iter().any(|b| matches!(b, b'\\' | b'(' | b')' | b'\r')) {
            buf.push(b'<');
            for &byte in self.0 {
                buf.push_hex(byte);
            }
            buf.push(b'>');
        } else {
            buf.push(b'(');
            buf.push_bytes(self.0);
            buf.push(b')');
        }
    }
}

/// A unicode text string object.
///
/// Written as a [`Str`] containing a UTF-16BE byte order mark followed by the
/// text re-encoded as UTF-16BE.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TextStr<'a>(pub &'a str);

impl Primitive for TextStr<'_> {
    fn write(self, buf: &mut Buf) {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in self.0.encode_utf16() {
            bytes.extend(unit.to_be_bytes());
        }
        Str(&bytes).write(buf);
    }
}

/// A name object, written as `/Thing`.
///
/// Bytes outside the regular-character range (or `#` itself) are hex-escaped
/// as `#HH`, matching the rule the writer applies to every `/Name` it emits.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Name<'a>(pub &'a [u8]);

impl Primitive for Name<'_> {
    fn write(self, buf: &mut Buf) {
        buf.register_name_len(self.0.len());
        buf.push(b'/');
        for &byte in self.0 {
            if matches!(byte, b'!'..=b'~') && byte != b'#' {
                buf.push(byte);
            } else {
                buf.push(b'#');
                buf.push_hex(byte);
            }
        }
    }
}

/// The null object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Null;

impl Primitive for Null {
    fn write(self, buf: &mut Buf) {
        buf.push_bytes(b"null");
    }
}

/// A reference to an indirect object: `N 0 R`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ref(NonZeroI32);

impl Ref {
    /// Create a new indirect reference.
    ///
    /// # Panics
    /// Panics if `id` is not in `1..=i32::MAX`.
    pub fn new(id: i32) -> Ref {
        let val = if id > 0 { NonZeroI32::new(id) } else { None };
        Self(val.expect("object number out of valid range"))
    }

    /// Return the underlying object number.
    pub fn get(self) -> i32 {
        self.0.get()
    }

    /// Return the current reference and advance this one by one.
    pub fn bump(&mut self) -> Ref {
        let current = *self;
        *self = Ref::new(self.get() + 1);
        current
    }
}

impl Primitive for Ref {
    fn write(self, buf: &mut Buf) {
        buf.push_int(self.0.get());
        buf.push_bytes(b" 0 R");
    }
}

/// A rectangle given by two opposite corners, lower-left first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the first (lower-left) corner.
    pub x1: f32,
    /// The y-coordinate of the first (lower-left) corner.
    pub y1: f32,
    /// The x-coordinate of the second (upper-right) corner.
    pub x2: f32,
    /// The y-coordinate of the second (upper-right) corner.
    pub y2: f32,
}

impl Rect {
    /// Create a new rectangle from four coordinate values.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl Primitive for Rect {
    fn write(self, buf: &mut Buf) {
        buf.push(b'[');
        buf.push_val(self.x1);
        buf.push(b' ');
        buf.push_val(self.y1);
        buf.push(b' ');
        buf.push_val(self.x2);
        buf.push(b' ');
        buf.push_val(self.y2);
        buf.push(b']');
    }
}

/// A date, rendered as a text string `(D:YYYYMMDDHHMMSS+ZZ'ZZ')`.
///
/// A field is only respected if every superior field is also supplied: to
/// set the minute, the hour, day, month and year must already be set.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Date {
    year: u16,
    month: Option<u8>,
    day: Option<u8>,
    hour: Option<u8>,
    minute: Option<u8>,
    second: Option<u8>,
    utc_offset_hour: Option<i8>,
    utc_offset_minute: u8,
}

impl Date {
    /// Create a new, minimal date. The year is clamped to `0..=9999`.
    pub fn new(year: u16) -> Self {
        Self {
            year: year.min(9999),
            month: None,
            day: None,
            hour: None,
            minute: None,
            second: None,
            utc_offset_hour: None,
            utc_offset_minute: 0,
        }
    }

    /// Add the month field, clamped to `1..=12`.
    pub fn month(mut self, month: u8) -> Self {
        self.month = Some(month.clamp(1, 12));
        self
    }

    /// Add the day field, clamped to `1..=31`.
    pub fn day(mut self, day: u8) -> Self {
        self.day = Some(day.clamp(1, 31));
        self
    }

    /// Add the hour field, clamped to `0..=23`.
    pub fn hour(mut self, hour: u8) -> Self {
        self.hour = Some(hour.min(23));
        self
    }

    /// Add the minute field, clamped to `0..=59`.
    pub fn minute(mut self, minute: u8) -> Self {
        self.minute = Some(minute.min(59));
        self
    }

    /// Add the second field, clamped to `0..=59`.
    pub fn second(mut self, second: u8) -> Self {
        self.second = Some(second.min(59));
        self
    }

    /// Add the UTC offset in hours, clamped to `-23..=23`.
    pub fn utc_offset_hour(mut self, hour: i8) -> Self {
        self.utc_offset_hour = Some(hour.clamp(-23, 23));
        self
    }

    /// Add the UTC offset's minute component, clamped to `0..=59`. Carries
    /// the sign of [`Self::utc_offset_hour`].
    pub fn utc_offset_minute(mut self, minute: u8) -> Self {
        self.utc_offset_minute = minute.min(59);
        self
    }
}

impl Primitive for Date {
    fn write(self, buf: &mut Buf) {
        buf.push_bytes(b"(D:");
        buf.push_int_aligned(self.year as usize, 4);

        let chain = self
            .month
            .and_then(|month| {
                buf.push_int_aligned(month as usize, 2);
                self.day
            })
            .and_then(|day| {
                buf.push_int_aligned(day as usize, 2);
                self.hour
            })
            .and_then(|hour| {
                buf.push_int_aligned(hour as usize, 2);
                self.minute
            })
            .and_then(|minute| {
                buf.push_int_aligned(minute as usize, 2);
                self.second
            })
            .and_then(|second| {
                buf.push_int_aligned(second as usize, 2);
                self.utc_offset_hour
            });

        if let Some(utc_offset_hour) = chain {
            if utc_offset_hour == 0 && self.utc_offset_minute == 0 {
                buf.push(b'Z');
            } else {
                buf.push(if utc_offset_hour < 0 { b'-' } else { b'+' });
                buf.push_int_aligned(utc_offset_hour.unsigned_abs() as usize, 2);
                buf.push(b'\'');
                buf.push_int_aligned(self.utc_offset_minute as usize, 2);
            }
        }

        buf.push(b')');
    }
}

/// What must be appended once the object currently being written closes.
///
/// Every [`Obj`] carries one of these. Nested values (array items,
/// dictionary values) always carry [`Finish::None`] -- only the object
/// handed out directly by [`Chunk::indirect`](crate::Chunk::indirect) or
/// [`Chunk::stream`](crate::Chunk::stream) carries a non-trivial finish, so
/// the same leaf writer types (`Page`, `Resources`, ...) work whether they
/// sit at the top level of a chunk or nested inside another dictionary.
#[derive(Clone, Copy, Default)]
pub(crate) enum Finish<'a> {
    #[default]
    None,
    /// Close with `endobj` only.
    Indirect,
    /// Write the stream payload, then close with `endobj`.
    Stream(&'a [u8]),
}

impl Finish<'_> {
    fn run(self, buf: &mut Buf) {
        if let Finish::Stream(data) = self {
            buf.push_bytes(b"stream\n");
            buf.push_bytes(data);
            if !data.ends_with(b"\n") {
                buf.push(b'\n');
            }
            buf.push_bytes(b"endstream");
        }
        if !matches!(self, Finish::None) {
            buf.push_bytes(b"\nendobj\n\n");
        }
    }
}

/// A leaf writer type that can be built directly from an [`Obj`], whether
/// that `Obj` came from a chunk's top-level `indirect`/`stream` entry point
/// or from nesting inside another writer's array or dictionary value.
///
/// Implemented by the [`writer!`](crate::writer) macro for the common case;
/// a handful of writer types with more than one constructor argument (e.g.
/// [`Stream`](crate::Stream)) implement their own `start` instead and don't
/// need this trait.
pub(crate) trait Writer<'a> {
    fn start(obj: Obj<'a>) -> Self;
}

/// Writer for an arbitrary object value.
#[must_use = "not consuming this leaves the writer in an inconsistent state"]
pub struct Obj<'a> {
    buf: &'a mut Buf,
    depth: usize,
    finish: Finish<'a>,
}

impl<'a> Obj<'a> {
    pub(crate) fn direct(buf: &'a mut Buf, depth: usize) -> Self {
        Self { buf, depth, finish: Finish::None }
    }

    pub(crate) fn indirect(buf: &'a mut Buf, id: Ref) -> Self {
        buf.push_int(id.get());
        buf.push_bytes(b" 0 obj\n");
        Self { buf, depth: 0, finish: Finish::Indirect }
    }

    /// Write a primitive object.
    pub fn primitive<T: Primitive>(self, value: T) {
        value.write(self.buf);
        self.finish.run(self.buf);
    }

    /// Write an array.
    pub fn array(self) -> Array<'a> {
        Array::start(self.buf, self.depth, self.finish)
    }

    /// Write a dictionary.
    pub fn dict(self) -> Dict<'a> {
        Dict::start(self.buf, self.depth, self.finish)
    }

    /// Write a stream dictionary, given the already-encoded payload.
    pub(crate) fn stream_dict(self, data: &'a [u8]) -> Dict<'a> {
        let len = data.len() as i32;
        let mut dict = Dict::start(self.buf, self.depth, Finish::Stream(data));
        dict.pair(Name(b"Length"), len);
        dict
    }

    /// Hand this object off to a leaf writer type's own `start`, inferred
    /// from the call site's return type.
    pub(crate) fn start<T: Writer<'a>>(self) -> T {
        T::start(self)
    }
}

/// Writer for an array.
pub struct Array<'a> {
    buf: &'a mut Buf,
    depth: usize,
    len: i32,
    finish: Finish<'a>,
}

impl<'a> Array<'a> {
    pub(crate) fn start(buf: &'a mut Buf, depth: usize, finish: Finish<'a>) -> Self {
        buf.push(b'[');
        Self { buf, depth, len: 0, finish }
    }

    /// Write an item with a primitive value.
    pub fn item<T: Primitive>(&mut self, value: T) -> &mut Self {
        self.obj().primitive(value);
        self
    }

    /// Write an item with an arbitrary object value.
    pub fn obj(&mut self) -> Obj<'_> {
        if self.len != 0 {
            self.buf.push(b' ');
        }
        self.len += 1;
        Obj::direct(self.buf, self.depth)
    }

    /// The number of written items.
    pub fn len(&self) -> i32 {
        self.len
    }

    /// Whether no items have been written yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Convert into the typed version, fixing the item type.
    pub fn typed<T: Primitive>(self) -> TypedArray<'a, T> {
        TypedArray::new(self)
    }
}

impl Drop for Array<'_> {
    fn drop(&mut self) {
        self.buf.limits.register_array(self.len);
        self.buf.push(b']');
        self.finish.run(self.buf);
    }
}

/// Writer for an array with a fixed primitive item type.
pub struct TypedArray<'a, T> {
    array: Array<'a>,
    phantom: PhantomData<T>,
}

impl<'a, T: Primitive> TypedArray<'a, T> {
    /// Wrap an array to make it type-safe.
    pub fn new(array: Array<'a>) -> Self {
        Self { array, phantom: PhantomData }
    }

    /// Write an item.
    pub fn item(&mut self, value: T) -> &mut Self {
        self.array.obj().primitive(value);
        self
    }

    /// Write a sequence of items.
    pub fn items(&mut self, values: impl IntoIterator<Item = T>) -> &mut Self {
        for value in values {
            self.item(value);
        }
        self
    }

    /// The number of written items.
    pub fn len(&self) -> i32 {
        self.array.len()
    }

    /// Whether no items have been written yet.
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }
}

/// Writer for a dictionary. Pretty-printed with two spaces of indent per
/// nesting level, one key-value pair per line.
pub struct Dict<'a> {
    buf: &'a mut Buf,
    depth: usize,
    len: i32,
    finish: Finish<'a>,
}

impl<'a> Dict<'a> {
    pub(crate) fn start(buf: &'a mut Buf, depth: usize, finish: Finish<'a>) -> Self {
        buf.push_bytes(b"<<");
        Self { buf, depth: depth + 1, len: 0, finish }
    }

    /// Write a pair with a primitive value.
    ///
    /// Shorthand for `dict.insert(key).primitive(value)`.
    pub fn pair<T: Primitive>(&mut self, key: Name, value: T) -> &mut Self {
        self.insert(key).primitive(value);
        self
    }

    /// Write a pair with an arbitrary object value.
    pub fn insert(&mut self, key: Name) -> Obj<'_> {
        self.buf.push(b'\n');
        for _ in 0..2 * self.depth {
            self.buf.push(b' ');
        }
        self.len += 1;
        self.buf.push_val(key);
        self.buf.push(b' ');
        Obj::direct(self.buf, self.depth)
    }

    /// The number of written pairs.
    pub fn len(&self) -> i32 {
        self.len
    }

    /// Whether no pairs have been written yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Convert into the typed version, fixing the value type.
    pub fn typed<T: Primitive>(self) -> TypedDict<'a, T> {
        TypedDict::new(self)
    }
}

impl Drop for Dict<'_> {
    fn drop(&mut self) {
        self.buf.limits.register_dict(self.len);
        if self.len != 0 {
            self.buf.push(b'\n');
            for _ in 0..2 * (self.depth - 1) {
                self.buf.push(b' ');
            }
        }
        self.buf.push_bytes(b">>");
        self.finish.run(self.buf);
    }
}

/// Writer for a name tree node (`/Names` array of alternating name/value
/// pairs plus an optional `/Limits`).
///
/// Only a single leaf node is supported -- there is no `/Kids` split into
/// child nodes, since nothing this crate builds ever needs a name tree large
/// enough to require one. A single `/Names` array covers every document
/// this facade writes.
pub struct NameTree<'a, T> {
    dict: Dict<'a>,
    phantom: PhantomData<T>,
}

impl<'a, T: Primitive> Writer<'a> for NameTree<'a, T> {
    fn start(obj: Obj<'a>) -> Self {
        Self { dict: obj.dict(), phantom: PhantomData }
    }
}

impl<'a, T: Primitive> NameTree<'a, T> {
    /// Write the `/Names` array, alternating a [`TextStr`] key with a value
    /// of type `T`, in ascending key order.
    pub fn names(&mut self, entries: impl IntoIterator<Item = (TextStr<'a>, T)>) -> &mut Self {
        let mut array = self.dict.insert(Name(b"Names")).array();
        for (key, value) in entries {
            array.item(key);
            array.obj().primitive(value);
        }
        drop(array);
        self
    }

    /// Write the `/Limits` array: the first and last key present in this
    /// node (or any of its descendants, for a multi-level tree).
    pub fn limits(&mut self, lower: TextStr<'a>, upper: TextStr<'a>) -> &mut Self {
        self.dict.insert(Name(b"Limits")).array().item(lower).item(upper);
        self
    }
}

/// Writer for a number tree node (`/Nums` array of alternating integer/value
/// pairs plus an optional `/Limits`).
///
/// As with [`NameTree`], only a single leaf node is supported.
pub struct NumberTree<'a, T> {
    dict: Dict<'a>,
    phantom: PhantomData<T>,
}

impl<'a, T: Primitive> Writer<'a> for NumberTree<'a, T> {
    fn start(obj: Obj<'a>) -> Self {
        Self { dict: obj.dict(), phantom: PhantomData }
    }
}

impl<'a, T: Primitive> NumberTree<'a, T> {
    /// Write the `/Nums` array, alternating an integer key with a value of
    /// type `T`, in ascending key order.
    pub fn nums(&mut self, entries: impl IntoIterator<Item = (i32, T)>) -> &mut Self {
        let mut array = self.dict.insert(Name(b"Nums")).array();
        for (key, value) in entries {
            array.item(key);
            array.obj().primitive(value);
        }
        drop(array);
        self
    }

    /// Write the `/Limits` array: the first and last key present in this
    /// node.
    pub fn limits(&mut self, lower: i32, upper: i32) -> &mut Self {
        self.dict.insert(Name(b"Limits")).array().item(lower).item(upper);
        self
    }
}

/// Writer for a dictionary with a fixed primitive value type.
pub struct TypedDict<'a, T> {
    dict: Dict<'a>,
    phantom: PhantomData<T>,
}

impl<'a, T: Primitive> TypedDict<'a, T> {
    /// Wrap a dictionary to make it type-safe.
    pub fn new(dict: Dict<'a>) -> Self {
        Self { dict, phantom: PhantomData }
    }

    /// Write a key-value pair.
    pub fn pair(&mut self, key: Name, value: T) -> &mut Self {
        self.dict.pair(key, value);
        self
    }

    /// The number of written pairs.
    pub fn len(&self) -> i32 {
        self.dict.len()
    }
}
