// SPDX-License-Identifier: Apache-2.0

use core::fmt;

use log::debug;

use crate::atom::{Atom, AtomType};
use crate::config::ScanConfig;
use crate::molecule::{Molecule, MoleculeId};
use crate::parse_error::{ErrKind, ParseError, StructuralError};
use crate::ref_array::RefArray;
use crate::scanner::Scanner;
use crate::separators::{
    count_molecules, count_separators, find_unquoted, is_control, is_padding, MOLECULE_SPLIT_KEY,
};

/// The ordered molecules found in one buffer.
///
/// The organism borrows its buffer and never copies from it: every atom it holds is an
/// offset range into that buffer.
#[derive(Debug, Clone)]
pub struct Organism<'a> {
    molecules: RefArray<Molecule>,
    buffer: &'a [u8],
    /// Set for fixed-capacity organisms.
    limit: Option<usize>,
}

impl<'a> Organism<'a> {
    /// Creates an empty organism over `input`. Nothing is scanned yet.
    ///
    /// # Example
    /// ```
    /// use jspr::Organism;
    /// let organism = Organism::new(r#"{"name": "value"}"#);
    /// assert!(organism.is_empty());
    /// ```
    pub fn new(input: &'a str) -> Self {
        Self::new_from_slice(input.as_bytes())
    }

    /// Creates an empty organism over a byte slice.
    pub fn new_from_slice(buffer: &'a [u8]) -> Self {
        Self {
            molecules: RefArray::new(),
            buffer,
            limit: None,
        }
    }

    /// Creates an empty organism that refuses to hold more than `capacity` molecules.
    pub fn with_capacity_limit(buffer: &'a [u8], capacity: usize) -> Result<Self, ParseError> {
        Ok(Self {
            molecules: RefArray::with_capacity(capacity)?,
            buffer,
            limit: Some(capacity),
        })
    }

    /// Creates a fixed-capacity organism with room for every pair in `buffer`.
    ///
    /// The shape is checked with [`count_separators`] first. The cap counts nested
    /// pairs too ([`count_molecules`]), so the result can be filled by either
    /// [`Organism::populate`] or a [`Scanner`].
    pub fn presized(buffer: &'a [u8]) -> Result<Self, ParseError> {
        count_separators(buffer)?;
        Self::with_capacity_limit(buffer, count_molecules(buffer))
    }

    /// Scans `input` with the default [`ScanConfig`].
    ///
    /// # Example
    /// ```
    /// use jspr::{AtomType, Organism};
    /// let organism = Organism::parse(r#"{"key": 123, "obj": {"inner": "value"}}"#).unwrap();
    /// assert!(organism.contains_key("obj.inner"));
    /// assert_eq!(organism.find("key").map(|atom| atom.kind()), Some(AtomType::Primitive));
    /// ```
    pub fn parse(input: &'a str) -> Result<Self, ParseError> {
        Self::parse_from_slice(input.as_bytes())
    }

    pub fn parse_from_slice(buffer: &'a [u8]) -> Result<Self, ParseError> {
        Self::parse_with_config(buffer, ScanConfig::default())
    }

    /// Scans `buffer` as one object. On error the partial organism is dropped.
    pub fn parse_with_config(buffer: &'a [u8], config: ScanConfig) -> Result<Self, ParseError> {
        let mut organism = Self::new_from_slice(buffer);
        Scanner::with_config(config).scan_document(&mut organism)?;
        Ok(organism)
    }

    /// Appends a molecule, returning its id.
    pub fn add_molecule(&mut self, molecule: Molecule) -> Result<MoleculeId, ParseError> {
        if let Some(limit) = self.limit {
            if self.molecules.len() >= limit {
                return Err(ParseError::CapacityExceeded { capacity: limit });
            }
        }
        let id = MoleculeId::new(self.molecules.len());
        self.molecules.push(molecule)?;
        Ok(id)
    }

    /// Populates the organism from a flat object by splitting its body on top-level `,`.
    ///
    /// Each segment is classified whole by [`Molecule::populate`]. Nested objects are
    /// rejected; use [`Scanner`] for those.
    ///
    /// Only the outer braces are trimmed. Padding after a `,` or around a `:` ends up
    /// inside an atom, so `{"a":1, "b":2}` fails with [`ParseError::InvalidAtom`] and
    /// pretty-printed input needs the scanner.
    pub fn populate(&mut self) -> Result<(), ParseError> {
        let buffer = self.buffer;
        let open = buffer.iter().position(|&b| !is_padding(b));
        let close = buffer.iter().rposition(|&b| !is_padding(b));
        let (open, close) = match (open, close) {
            (Some(open), Some(close)) => (open, close),
            _ => return StructuralError::new(ErrKind::UnexpectedEnd, b' ', buffer.len()),
        };
        if buffer[open] != b'{' {
            return StructuralError::new(ErrKind::InvalidRoot, buffer[open], open);
        }
        if close == open || buffer[close] != b'}' {
            return StructuralError::new(ErrKind::UnexpectedEnd, buffer[close], close);
        }
        if close == open + 1 {
            return StructuralError::new(ErrKind::EmptyObject, b'}', close);
        }

        let mut start = open + 1;
        while let Some(split) = find_unquoted(buffer, MOLECULE_SPLIT_KEY, start, close) {
            self.populate_segment(start, split)?;
            start = split + 1;
        }
        self.populate_segment(start, close)?;

        debug!("Finished populating organism with {} molecules", self.len());
        Ok(())
    }

    fn populate_segment(&mut self, start: usize, end: usize) -> Result<(), ParseError> {
        if let Some(offset) = self.buffer[start..end].iter().position(|&b| is_control(b)) {
            let pos = start + offset;
            return StructuralError::new(ErrKind::ControlCharacter, self.buffer[pos], pos);
        }
        let molecule = Molecule::populate(self.buffer, start, end)?;
        let value = molecule.value();
        if value.bytes(self.buffer).first() == Some(&b'{') {
            return StructuralError::new(ErrKind::NestedInFlatMode, b'{', value.start());
        }
        self.add_molecule(molecule)?;
        Ok(())
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    /// The capacity limit of a fixed-capacity organism.
    pub fn capacity_limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn molecule(&self, id: MoleculeId) -> Result<&Molecule, ParseError> {
        Ok(self.molecules.get(id.index())?)
    }

    pub(crate) fn molecule_mut(&mut self, id: MoleculeId) -> Result<&mut Molecule, ParseError> {
        Ok(self.molecules.get_mut(id.index())?)
    }

    /// Molecules in scan order, parents before their children.
    pub fn iter(&self) -> impl Iterator<Item = (MoleculeId, &Molecule)> + '_ {
        self.molecules
            .iter()
            .enumerate()
            .map(|(index, molecule)| (MoleculeId::new(index), molecule))
    }

    /// Molecules whose parent is `id`.
    pub fn children(&self, id: MoleculeId) -> impl Iterator<Item = (MoleculeId, &Molecule)> + '_ {
        self.iter()
            .filter(move |(_, molecule)| molecule.parent() == Some(id))
    }

    /// The bytes `atom` spans in this organism's buffer.
    pub fn text(&self, atom: &Atom) -> &'a [u8] {
        atom.bytes(self.buffer)
    }

    pub fn as_str(&self, atom: &Atom) -> Result<&'a str, ParseError> {
        atom.as_str(self.buffer)
    }

    /// Writes the dotted path of `id`, root key first.
    pub fn write_path<W: fmt::Write>(&self, id: MoleculeId, out: &mut W) -> fmt::Result {
        let molecule = self.molecule(id).map_err(|_| fmt::Error)?;
        if let Some(parent) = molecule.parent() {
            self.write_path(parent, out)?;
            out.write_char('.')?;
        }
        let key = self.as_str(molecule.key()).map_err(|_| fmt::Error)?;
        out.write_str(key)
    }
}

impl fmt::Display for Organism<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, molecule) in self.iter() {
            self.write_path(id, f)?;
            f.write_str(" = ")?;
            let value = molecule.value();
            let text = self.as_str(value).unwrap_or("<invalid utf-8>");
            match value.kind() {
                AtomType::String => writeln!(f, "\"{text}\"")?,
                _ => writeln!(f, "{text}")?,
            }
        }
        Ok(())
    }
}
