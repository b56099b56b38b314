// SPDX-License-Identifier: Apache-2.0

use crate::ref_array;

/// Kinds of structural damage the scanner can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrKind {
    /// Two separators with no token between them, e.g. `"a":,`.
    DoubleSeparator,
    /// A key was closed by `,` or `}` without a `:` and value.
    KeyWithoutValue,
    /// A `:` was followed directly by `}`.
    MissingValue,
    /// A `,` was followed directly by `}`.
    TrailingComma,
    /// `{}` is not supported.
    EmptyObject,
    /// A closing quote was followed by something other than padding, `:`, `,` or `}`.
    UnexpectedAfterString,
    /// A `{` appeared where a key was expected, or inside an open token.
    UnexpectedObject,
    /// A second `:` appeared while reading a value.
    UnexpectedColon,
    /// A nested object was followed by something other than `,` or `}`.
    UnexpectedAfterObject,
    /// The scan did not start at an opening `{`.
    InvalidRoot,
    /// The buffer ended before the object was closed.
    UnexpectedEnd,
    /// Something other than padding follows the root object.
    ContentEnded,
    /// The split-based populate found a nested object.
    NestedInFlatMode,
    /// A control byte other than padding, e.g. `0x01`.
    ControlCharacter,
}

/// A structural error, with the offending byte and its position in the buffer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct StructuralError {
    pub kind: ErrKind,
    pub character: u8,
    pub position: usize,
}

impl StructuralError {
    pub fn new<T>(kind: ErrKind, character: u8, position: usize) -> Result<T, ParseError> {
        Err(ParseError::Structural(Self {
            kind,
            character,
            position,
        }))
    }
}

impl core::fmt::Debug for StructuralError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:?}({}) at {}",
            self.kind,
            self.character.escape_ascii(),
            self.position
        )
    }
}

/// Errors that can occur while building or querying an [`Organism`](crate::Organism)
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Growing the molecule storage failed.
    AllocationFailure,
    /// A token's quoting is malformed (unterminated or spuriously terminated string).
    InvalidAtom { position: usize },
    /// An object key is not a quoted string.
    StrictJsonViolation { position: usize },
    /// Malformed object structure.
    Structural(StructuralError),
    /// A fixed-capacity organism has no room for another molecule.
    CapacityExceeded { capacity: usize },
    /// Top-level colon and comma counts are inconsistent.
    ShapeError { colons: usize, commas: usize },
    /// Objects are nested deeper than the configured limit.
    MaxDepthReached { depth: usize, position: usize },
    /// Index past the end of the molecule storage.
    OutOfBounds { index: usize, size: usize },
    /// A span was not valid UTF-8.
    InvalidUtf8(core::str::Utf8Error),
}

impl From<ref_array::Error> for ParseError {
    fn from(err: ref_array::Error) -> Self {
        match err {
            ref_array::Error::OutOfBounds { index, size } => ParseError::OutOfBounds { index, size },
            ref_array::Error::AllocationFailure => ParseError::AllocationFailure,
        }
    }
}

impl From<StructuralError> for ParseError {
    fn from(err: StructuralError) -> Self {
        ParseError::Structural(err)
    }
}

impl From<core::str::Utf8Error> for ParseError {
    fn from(err: core::str::Utf8Error) -> Self {
        ParseError::InvalidUtf8(err)
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::AllocationFailure => write!(f, "allocation failure"),
            ParseError::InvalidAtom { position } => {
                write!(f, "malformed quoting in token at {position}")
            }
            ParseError::StrictJsonViolation { position } => {
                write!(f, "object key at {position} is not a quoted string")
            }
            ParseError::Structural(e) => write!(f, "structural error: {e:?}"),
            ParseError::CapacityExceeded { capacity } => {
                write!(f, "no room for another molecule (capacity {capacity})")
            }
            ParseError::ShapeError { colons, commas } => write!(
                f,
                "inconsistent shape: {colons} colons for {commas} commas"
            ),
            ParseError::MaxDepthReached { depth, position } => {
                write!(f, "nesting depth {depth} exceeded at {position}")
            }
            ParseError::OutOfBounds { index, size } => {
                write!(f, "index {index} out of bounds for size {size}")
            }
            ParseError::InvalidUtf8(e) => write!(f, "Invalid UTF-8: {e}"),
        }
    }
}
