// SPDX-License-Identifier: Apache-2.0

use crate::atom::{Atom, AtomType};
use crate::parse_error::ParseError;
use crate::separators::{find_unquoted, ATOM_SPLIT_KEY};

/// Index of a [`Molecule`] within the [`Organism`](crate::Organism) that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoleculeId(usize);

impl MoleculeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A key/value pair of atoms.
///
/// `parent` is set when the molecule was scanned inside a nested object and names
/// the molecule whose value is that object. It is a navigation link only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Molecule {
    pub(crate) key: Atom,
    pub(crate) value: Atom,
    pub(crate) parent: Option<MoleculeId>,
}

impl Molecule {
    pub fn new(key: Atom, value: Atom) -> Self {
        Self {
            key,
            value,
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: Option<MoleculeId>) -> Self {
        self.parent = parent;
        self
    }

    /// Classifies a whole `key:value` segment.
    ///
    /// ```text
    /// "key":value        OR "key":"string_value"
    /// ^start     ^end       ^start              ^end
    /// ```
    ///
    /// The split happens at the first `:` outside quotes. The key must be a quoted
    /// string.
    pub fn populate(buffer: &[u8], start: usize, end: usize) -> Result<Self, ParseError> {
        let split = find_unquoted(buffer, ATOM_SPLIT_KEY, start, end)
            .ok_or(ParseError::InvalidAtom { position: start })?;
        let key = Atom::populate(buffer, start, split)?;
        if key.kind() != AtomType::String {
            return Err(ParseError::StrictJsonViolation { position: start });
        }
        let value = Atom::populate(buffer, split + 1, end)?;
        Ok(Self::new(key, value))
    }

    pub fn key(&self) -> &Atom {
        &self.key
    }

    pub fn value(&self) -> &Atom {
        &self.value
    }

    pub fn parent(&self) -> Option<MoleculeId> {
        self.parent
    }

    pub fn is_nested(&self) -> bool {
        self.parent.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn populate_all(input: &[u8]) -> Result<Molecule, ParseError> {
        Molecule::populate(input, 0, input.len())
    }

    #[test]
    fn test_populate_string_value() {
        let input = b"\"key\":\"value\"";
        let molecule = populate_all(input).unwrap();
        assert_eq!(*molecule.key(), Atom::new(1, 4, AtomType::String));
        assert_eq!(*molecule.value(), Atom::new(7, 12, AtomType::String));
        assert!(!molecule.is_nested());
    }

    #[test]
    fn test_populate_primitive_value() {
        let input = b"\"key\":12345";
        let molecule = populate_all(input).unwrap();
        assert_eq!(*molecule.key(), Atom::new(1, 4, AtomType::String));
        assert_eq!(*molecule.value(), Atom::new(6, 11, AtomType::Primitive));
        assert_eq!(molecule.value().bytes(input), b"12345");
    }

    #[test]
    fn test_populate_colon_inside_key() {
        let input = b"\"a:b\":1";
        let molecule = populate_all(input).unwrap();
        assert_eq!(molecule.key().bytes(input), b"a:b");
        assert_eq!(molecule.value().bytes(input), b"1");
    }

    #[test]
    fn test_populate_unquoted_key() {
        assert_eq!(
            populate_all(b"key:12345"),
            Err(ParseError::StrictJsonViolation { position: 0 })
        );
    }

    #[test]
    fn test_populate_invalid_value() {
        assert_eq!(
            populate_all(b"\"key\":\"invalid"),
            Err(ParseError::InvalidAtom { position: 6 })
        );
    }

    #[test]
    fn test_populate_without_separator() {
        assert_eq!(
            populate_all(b"\"key\""),
            Err(ParseError::InvalidAtom { position: 0 })
        );
    }

    #[test]
    fn test_with_parent() {
        let molecule = Molecule::default().with_parent(Some(MoleculeId::new(3)));
        assert_eq!(molecule.parent(), Some(MoleculeId::new(3)));
        assert_eq!(molecule.parent().map(MoleculeId::index), Some(3));
        assert!(molecule.is_nested());
        assert!(!molecule.with_parent(None).is_nested());
    }
}
