use std::ops::{Deref, DerefMut};

use crate::object::Primitive;

/// Tracks the maximum values of several PDF quantities seen while writing a
/// [`Chunk`](crate::Chunk), so that callers targeting a conformance level
/// with hard limits (e.g. PDF/A-1's 8,191-entry array cap) can check a
/// chunk against it after the fact.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Limits {
    int: i32,
    real: f32,
    name_len: usize,
    string_len: usize,
    array_len: i32,
    dict_entries: i32,
}

impl Limits {
    /// Create a new, empty set of limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// The biggest `i32` written so far (by absolute value).
    pub fn int(&self) -> i32 {
        self.int
    }

    /// The biggest `f32` written so far (by absolute value).
    pub fn real(&self) -> f32 {
        self.real
    }

    /// The longest name written so far, in bytes.
    pub fn name_len(&self) -> usize {
        self.name_len
    }

    /// The longest string written so far, in bytes.
    pub fn string_len(&self) -> usize {
        self.string_len
    }

    /// The largest number of elements in an array written so far.
    pub fn array_len(&self) -> i32 {
        self.array_len
    }

    /// The largest number of entries in a dictionary written so far.
    pub fn dict_entries(&self) -> i32 {
        self.dict_entries
    }

    fn register_int(&mut self, value: i32) {
        self.int = self.int.max(value.abs());
    }

    fn register_real(&mut self, value: f32) {
        self.real = self.real.max(value.abs());
    }

    fn register_name(&mut self, len: usize) {
        self.name_len = self.name_len.max(len);
    }

    fn register_string(&mut self, len: usize) {
        self.string_len = self.string_len.max(len);
    }

    pub(crate) fn register_array(&mut self, len: i32) {
        self.array_len = self.array_len.max(len);
    }

    pub(crate) fn register_dict(&mut self, len: i32) {
        self.dict_entries = self.dict_entries.max(len);
    }

    /// Merge another set of limits into this one, keeping the maximum of
    /// each field. Used when splicing chunks together.
    pub fn merge(&mut self, other: Limits) {
        self.int = self.int.max(other.int);
        self.real = self.real.max(other.real);
        self.name_len = self.name_len.max(other.name_len);
        self.string_len = self.string_len.max(other.string_len);
        self.array_len = self.array_len.max(other.array_len);
        self.dict_entries = self.dict_entries.max(other.dict_entries);
    }
}

/// An append-only byte buffer used by [`Chunk`](crate::Chunk) and
/// [`Content`](crate::Content). Wraps a `Vec<u8>` with PDF-syntax-aware
/// push helpers and limit tracking.
#[derive(Clone, Default)]
pub struct Buf {
    pub(crate) inner: Vec<u8>,
    pub(crate) limits: Limits,
}

impl Buf {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a buffer with room for at least `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { inner: Vec::with_capacity(capacity), limits: Limits::new() }
    }

    /// The running limits for values pushed so far.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Append raw bytes without interpreting them.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.inner.extend_from_slice(bytes);
    }

    /// Alias of [`Self::extend`] used by writers that build up raw PostScript
    /// or CMap text rather than PDF dictionary syntax.
    pub(crate) fn extend_slice(&mut self, bytes: &[u8]) {
        self.extend(bytes);
    }

    /// Append a single byte.
    pub fn push(&mut self, byte: u8) {
        self.inner.push(byte);
    }

    /// Append another buffer's bytes, merging its limits into ours.
    pub fn extend_buf(&mut self, other: &Buf) {
        self.inner.extend_from_slice(&other.inner);
        self.limits.merge(other.limits);
    }

    /// Write a primitive value, updating limits as appropriate.
    pub fn push_val<T: Primitive>(&mut self, value: T) {
        value.write(self);
    }

    pub(crate) fn push_bytes(&mut self, bytes: &[u8]) {
        self.extend(bytes);
    }

    pub(crate) fn push_int(&mut self, value: i32) {
        self.limits.register_int(value);
        self.push_bytes(itoa::Buffer::new().format(value).as_bytes());
    }

    pub(crate) fn push_int_aligned(&mut self, value: usize, align: usize) {
        let mut buffer = itoa::Buffer::new();
        let text = buffer.format(value);
        for _ in 0..align.saturating_sub(text.len()) {
            self.push(b'0');
        }
        self.push_bytes(text.as_bytes());
    }

    pub(crate) fn push_float(&mut self, value: f32) {
        self.limits.register_real(value);
        if value == value.trunc() && value.abs() < 1e9 {
            self.push_int(value as i32);
        } else {
            self.push_bytes(ryu::Buffer::new().format(value).as_bytes());
        }
    }

    pub(crate) fn push_hex(&mut self, value: u8) {
        fn hex(b: u8) -> u8 {
            if b < 10 { b'0' + b } else { b'A' + (b - 10) }
        }
        self.push(hex(value >> 4));
        self.push(hex(value & 0xF));
    }

    pub(crate) fn push_hex_u16(&mut self, value: u16) {
        self.push_hex((value >> 8) as u8);
        self.push_hex(value as u8);
    }

    pub(crate) fn register_name_len(&mut self, len: usize) {
        self.limits.register_name(len);
    }

    pub(crate) fn register_string_len(&mut self, len: usize) {
        self.limits.register_string(len);
    }
}

impl Deref for Buf {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.inner
    }
}

impl DerefMut for Buf {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.inner
    }
}
