// SPDX-License-Identifier: Apache-2.0

use crate::parse_error::ParseError;

/// What kind of token an [`Atom`] spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AtomType {
    /// Not populated yet.
    #[default]
    Undefined,
    /// A bare token such as `12345` or `true`, kept verbatim.
    Primitive,
    /// A quoted string. The span excludes the quotes.
    String,
    /// A nested object, spanning its braces inclusively.
    Object,
}

/// A typed, borrowed range `[start, end)` into a source buffer.
///
/// An atom holds offsets only; the buffer is passed alongside whenever the bytes
/// are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Atom {
    start: usize,
    end: usize,
    kind: AtomType,
}

impl Atom {
    pub fn new(start: usize, end: usize, kind: AtomType) -> Self {
        debug_assert!(start <= end, "atom start {} past end {}", start, end);
        Self { start, end, kind }
    }

    /// Classifies the span `buffer[start..end]` as a quoted string or a bare primitive.
    ///
    /// ```text
    /// "some stuff"      OR   123456789
    /// ^start      ^end       ^start   ^end
    /// ```
    ///
    /// Strings have both quotes stripped from the resulting span. A string without a
    /// closing quote, or a primitive ending in a quote, is an [`ParseError::InvalidAtom`].
    pub fn populate(buffer: &[u8], start: usize, end: usize) -> Result<Self, ParseError> {
        let span = buffer
            .get(start..end)
            .ok_or(ParseError::InvalidAtom { position: start })?;
        match span {
            [b'"', .., b'"'] => Ok(Self::new(start + 1, end - 1, AtomType::String)),
            [] | [b'"', ..] => Err(ParseError::InvalidAtom { position: start }),
            [.., b'"'] => Err(ParseError::InvalidAtom { position: end - 1 }),
            _ => Ok(Self::new(start, end, AtomType::Primitive)),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn kind(&self) -> AtomType {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The bytes this atom spans in `buffer`.
    pub fn bytes<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        buffer.get(self.start..self.end).unwrap_or_default()
    }

    /// The bytes this atom spans in `buffer`, as UTF-8.
    pub fn as_str<'a>(&self, buffer: &'a [u8]) -> Result<&'a str, ParseError> {
        Ok(core::str::from_utf8(self.bytes(buffer))?)
    }
}
