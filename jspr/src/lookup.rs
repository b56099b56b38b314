// SPDX-License-Identifier: Apache-2.0

//! Key lookup over a populated [`Organism`].
//!
//! A probe matches a molecule when it equals the molecule's key, or, for nested
//! molecules, the dotted path of keys from the root down to it (`"obj.inner"`).
//! Paths are matched from the end of the probe upward through the parent links, so
//! no path string is ever built.

use crate::atom::Atom;
use crate::molecule::{Molecule, MoleculeId};
use crate::organism::Organism;

impl<'a> Organism<'a> {
    /// Whether any molecule matches `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.find_id(key).is_some()
    }

    /// The value atom of the first molecule matching `key`.
    ///
    /// The atom is an offset range into this organism's buffer; see [`Organism::text`].
    pub fn find(&self, key: &str) -> Option<Atom> {
        let id = self.find_id(key)?;
        self.molecule(id).ok().map(|molecule| *molecule.value())
    }

    /// The value bytes of the first molecule matching `key`, quotes stripped for strings.
    pub fn get(&self, key: &str) -> Option<&'a [u8]> {
        self.find(key).map(|atom| self.text(&atom))
    }

    /// The id of the first molecule matching `key`.
    pub fn find_id(&self, key: &str) -> Option<MoleculeId> {
        let probe = key.as_bytes();
        self.iter()
            .find(|(_, molecule)| self.matches(molecule, probe))
            .map(|(id, _)| id)
    }

    fn matches(&self, molecule: &Molecule, probe: &[u8]) -> bool {
        if self.text(molecule.key()) == probe {
            return true;
        }
        molecule.is_nested() && self.matches_path(molecule, probe)
    }

    fn matches_path(&self, molecule: &Molecule, probe: &[u8]) -> bool {
        let mut rest = probe;
        let mut current = molecule;
        loop {
            let key = self.text(current.key());
            if !rest.ends_with(key) {
                return false;
            }
            rest = &rest[..rest.len() - key.len()];

            let parent = match current.parent() {
                Some(parent) => parent,
                None => return rest.is_empty(),
            };
            rest = match rest.split_last() {
                Some((b'.', head)) => head,
                _ => return false,
            };
            current = match self.molecule(parent) {
                Ok(molecule) => molecule,
                Err(_) => return false,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{AtomType, Organism};
    use test_log::test;

    #[test]
    fn test_contains_key() {
        let organism =
            Organism::parse(r#"{"key1":12345,"key2":"value","key3":"other value"}"#).unwrap();
        assert!(organism.contains_key("key1"));
        assert!(organism.contains_key("key3"));
        assert!(!organism.contains_key("key11"));
        assert!(!organism.contains_key("key"));
        assert!(!organism.contains_key(""));
    }

    #[test]
    fn test_find() {
        let input = r#"{"key1":12345,"key2":"value","key3":"other value"}"#;
        let organism = Organism::parse(input).unwrap();

        let atom = organism.find("key1").unwrap();
        assert_eq!((atom.start(), atom.end()), (8, 13));
        assert_eq!(atom.kind(), AtomType::Primitive);

        assert_eq!(organism.get("key3"), Some(b"other value".as_slice()));
        assert_eq!(organism.find("key11"), None);
    }

    #[test]
    fn test_dotted_path() {
        let organism =
            Organism::parse(r#"{"key":123, "obj":{"key2":"value","deep":{"x":1}}}"#).unwrap();
        assert!(organism.contains_key("obj.key2"));
        assert!(organism.contains_key("obj.deep.x"));
        assert!(organism.contains_key("key2"));
        assert!(organism.contains_key("x"));
        assert_eq!(organism.get("obj.deep.x"), Some(b"1".as_slice()));
        assert_eq!(
            organism.find("obj.deep").map(|atom| atom.kind()),
            Some(AtomType::Object)
        );

        assert!(!organism.contains_key("deep.x"));
        assert!(!organism.contains_key("obj.x"));
        assert!(!organism.contains_key("key.key2"));
        assert!(!organism.contains_key("objkey2"));
        assert!(!organism.contains_key(".obj.key2"));
        assert!(!organism.contains_key("obj..key2"));
    }

    #[test]
    fn test_dotted_literal_key() {
        let organism = Organism::parse(r#"{"a.b":1,"a":{"b":2}}"#).unwrap();
        // First match wins
        assert_eq!(organism.get("a.b"), Some(b"1".as_slice()));
        assert_eq!(organism.get("b"), Some(b"2".as_slice()));
    }
}
