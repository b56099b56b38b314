// SPDX-License-Identifier: Apache-2.0

use log::{debug, trace};

use crate::atom::{Atom, AtomType};
use crate::config::ScanConfig;
use crate::molecule::{Molecule, MoleculeId};
use crate::organism::Organism;
use crate::parse_error::{ErrKind, ParseError, StructuralError};
use crate::separators::{is_control, is_padding, ATOM_SPLIT_KEY, MOLECULE_SPLIT_KEY};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Expect {
    Key,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Quote {
    Closed,
    Open,
    /// The previous byte closed a string.
    JustClosed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    /// Between tokens.
    Idle,
    /// Reading a key or value.
    Open,
    /// A string token has closed; only padding or a separator may follow.
    Sealed,
    /// The value was a nested object that has already been scanned.
    Nested,
}

/// Per-object scanning state. Each nested object gets its own.
#[derive(Debug)]
struct ObjectState {
    expect: Expect,
    token: Token,
    quote: Quote,
    /// Molecule whose key or value is being read in this object.
    current: Option<MoleculeId>,
}

impl ObjectState {
    fn new() -> Self {
        Self {
            expect: Expect::Key,
            token: Token::Idle,
            quote: Quote::Closed,
            current: None,
        }
    }
}

/// Single-pass scanner that fills an [`Organism`] with the molecules of one object.
///
/// Nested objects are scanned recursively, bounded by [`ScanConfig::max_depth`].
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scans the whole buffer as a single root object, surrounded only by padding.
    ///
    /// Returns the position of the root's closing `}`.
    pub fn scan_document(&self, organism: &mut Organism<'_>) -> Result<usize, ParseError> {
        let buffer = organism.buffer();
        let start = match buffer.iter().position(|&b| !is_padding(b)) {
            Some(start) => start,
            None => return StructuralError::new(ErrKind::UnexpectedEnd, b' ', buffer.len()),
        };
        let close = self.scan(organism, start, None)?;

        let rest = buffer.get(close + 1..).unwrap_or_default();
        if let Some(offset) = rest.iter().position(|&b| !is_padding(b)) {
            let pos = close + 1 + offset;
            debug!("Content after root object at {}", pos);
            return StructuralError::new(ErrKind::ContentEnded, buffer[pos], pos);
        }
        debug!("--finished-- {} molecules", organism.len());
        Ok(close)
    }

    /// Scans the object whose opening `{` is at `position`.
    ///
    /// Every molecule appended for this object gets `parent` as its parent. Returns the
    /// position of the matching `}` so an enclosing scan can resume after it.
    ///
    /// On error the organism holds a partial result and should be discarded.
    pub fn scan(
        &self,
        organism: &mut Organism<'_>,
        position: usize,
        parent: Option<MoleculeId>,
    ) -> Result<usize, ParseError> {
        let mut depth = 1;
        let mut ancestor = parent;
        while let Some(id) = ancestor {
            depth += 1;
            ancestor = organism.molecule(id)?.parent();
        }
        self.scan_object(organism, position, parent, depth)
    }

    fn scan_object(
        &self,
        organism: &mut Organism<'_>,
        open: usize,
        parent: Option<MoleculeId>,
        depth: usize,
    ) -> Result<usize, ParseError> {
        let buffer = organism.buffer();
        if depth > self.config.max_depth {
            debug!("Max depth {} reached at {}", self.config.max_depth, open);
            return Err(ParseError::MaxDepthReached {
                depth,
                position: open,
            });
        }
        match buffer.get(open) {
            Some(b'{') => {}
            Some(&c) => return StructuralError::new(ErrKind::InvalidRoot, c, open),
            None => return StructuralError::new(ErrKind::UnexpectedEnd, b' ', open),
        }
        debug!("Entering object at {} (depth {})", open, depth);

        let mut state = ObjectState::new();
        let mut pos = open + 1;
        while pos < buffer.len() {
            let byte = buffer[pos];
            trace!("Pos: {}, Byte: {:?}, State: {:?}", pos, byte as char, state);

            if is_control(byte) {
                return StructuralError::new(ErrKind::ControlCharacter, byte, pos);
            }

            if state.quote == Quote::JustClosed {
                state.quote = Quote::Closed;
                if !is_padding(byte) && !matches!(byte, ATOM_SPLIT_KEY | MOLECULE_SPLIT_KEY | b'}')
                {
                    return StructuralError::new(ErrKind::UnexpectedAfterString, byte, pos);
                }
            }

            if state.quote == Quote::Open {
                if byte == b'"' {
                    state.quote = Quote::JustClosed;
                    state.token = Token::Sealed;
                }
                pos += 1;
                continue;
            }

            match byte {
                b'"' => {
                    Self::open_token(organism, &mut state, parent, byte, pos)?;
                    state.quote = Quote::Open;
                }
                ATOM_SPLIT_KEY => Self::close_key(organism, &mut state, pos)?,
                MOLECULE_SPLIT_KEY => {
                    Self::close_value(organism, &mut state, byte, pos)?;
                    state.expect = Expect::Key;
                }
                b'}' => {
                    Self::close_value(organism, &mut state, byte, pos)?;
                    debug!("Leaving object at {} (depth {})", pos, depth);
                    return Ok(pos);
                }
                b'{' => {
                    let current = match (state.expect, state.token, state.current) {
                        (Expect::Value, Token::Idle, Some(current)) => current,
                        _ => return StructuralError::new(ErrKind::UnexpectedObject, byte, pos),
                    };
                    let close = self.scan_object(organism, pos, Some(current), depth + 1)?;
                    organism.molecule_mut(current)?.value =
                        Atom::new(pos, close + 1, AtomType::Object);
                    state.token = Token::Nested;
                    pos = close + 1;
                    continue;
                }
                _ if is_padding(byte) => {}
                _ => Self::open_token(organism, &mut state, parent, byte, pos)?,
            }
            pos += 1;
        }

        debug!("Buffer ended inside object opened at {}", open);
        StructuralError::new(ErrKind::UnexpectedEnd, b' ', buffer.len())
    }

    /// Starts a key or value at `pos`, or continues the one already open.
    fn open_token(
        organism: &mut Organism<'_>,
        state: &mut ObjectState,
        parent: Option<MoleculeId>,
        byte: u8,
        pos: usize,
    ) -> Result<(), ParseError> {
        match state.token {
            Token::Open => return Ok(()),
            Token::Sealed => {
                return StructuralError::new(ErrKind::UnexpectedAfterString, byte, pos)
            }
            Token::Nested => {
                return StructuralError::new(ErrKind::UnexpectedAfterObject, byte, pos)
            }
            Token::Idle => {}
        }

        let start = Atom::new(pos, pos, AtomType::Undefined);
        match (state.expect, state.current) {
            (Expect::Key, _) => {
                let molecule = Molecule::new(start, Atom::default()).with_parent(parent);
                let id = organism.add_molecule(molecule)?;
                debug!("Molecule {} opened at {}", id.index(), pos);
                state.current = Some(id);
            }
            (Expect::Value, Some(current)) => organism.molecule_mut(current)?.value = start,
            (Expect::Value, None) => {
                return StructuralError::new(ErrKind::KeyWithoutValue, byte, pos)
            }
        }
        state.token = Token::Open;
        Ok(())
    }

    fn close_key(
        organism: &mut Organism<'_>,
        state: &mut ObjectState,
        pos: usize,
    ) -> Result<(), ParseError> {
        let current = match (state.expect, state.token, state.current) {
            (_, Token::Idle, _) => {
                return StructuralError::new(ErrKind::DoubleSeparator, ATOM_SPLIT_KEY, pos)
            }
            (Expect::Key, _, Some(current)) => current,
            _ => return StructuralError::new(ErrKind::UnexpectedColon, ATOM_SPLIT_KEY, pos),
        };
        let start = organism.molecule(current)?.key.start();
        let key = backtrack(organism.buffer(), start, pos)?;
        if key.kind() != AtomType::String {
            return Err(ParseError::StrictJsonViolation { position: start });
        }
        organism.molecule_mut(current)?.key = key;
        state.expect = Expect::Value;
        state.token = Token::Idle;
        Ok(())
    }

    /// Closes the value before a `,` or `}`.
    fn close_value(
        organism: &mut Organism<'_>,
        state: &mut ObjectState,
        byte: u8,
        pos: usize,
    ) -> Result<(), ParseError> {
        let current = match (state.expect, state.token, state.current) {
            (Expect::Key, Token::Idle, None) if byte == b'}' => {
                return StructuralError::new(ErrKind::EmptyObject, byte, pos)
            }
            (Expect::Key, Token::Idle, Some(_)) if byte == b'}' => {
                return StructuralError::new(ErrKind::TrailingComma, byte, pos)
            }
            (Expect::Value, Token::Idle, _) if byte == b'}' => {
                return StructuralError::new(ErrKind::MissingValue, byte, pos)
            }
            (_, Token::Idle, _) => {
                return StructuralError::new(ErrKind::DoubleSeparator, byte, pos)
            }
            (Expect::Key, _, _) => {
                return StructuralError::new(ErrKind::KeyWithoutValue, byte, pos)
            }
            (Expect::Value, Token::Nested, _) => {
                state.token = Token::Idle;
                return Ok(());
            }
            (Expect::Value, _, Some(current)) => current,
            (Expect::Value, _, None) => {
                return StructuralError::new(ErrKind::KeyWithoutValue, byte, pos)
            }
        };
        let start = organism.molecule(current)?.value.start();
        let value = backtrack(organism.buffer(), start, pos)?;
        organism.molecule_mut(current)?.value = value;
        state.token = Token::Idle;
        Ok(())
    }
}

/// Walks back from `end_mark` over padding and classifies `buffer[start..]` up to there.
///
/// A token ending in `"` becomes a String atom with the quotes excluded, anything else a
/// Primitive ending one past its last non-padding byte.
fn backtrack(buffer: &[u8], start: usize, end_mark: usize) -> Result<Atom, ParseError> {
    let mut end = end_mark;
    while end > start && is_padding(buffer[end - 1]) {
        end -= 1;
    }
    Atom::populate(buffer, start, end)
}
