// SPDX-License-Identifier: Apache-2.0

//! A zero-copy scanner for object-only JSON.
//!
//! The scanner walks a byte buffer once and records every key/value pair it finds as a
//! [`Molecule`]: two [`Atom`]s, each an offset range into the original buffer. Nested
//! objects are scanned recursively and their molecules keep a link to the enclosing one,
//! so they can be looked up by dotted path.
//!
//! Only quoted strings, bare primitive tokens and nested objects are recognized. Arrays,
//! escape sequences and number validation are out of scope.
//!
//! ```
//! use jspr::{AtomType, Organism};
//!
//! let organism = Organism::parse(r#"{"key": 123, "obj": {"key2": "value"}}"#).unwrap();
//! assert!(organism.contains_key("obj.key2"));
//!
//! let atom = organism.find("key").unwrap();
//! assert_eq!(atom.kind(), AtomType::Primitive);
//! assert_eq!(organism.text(&atom), b"123");
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod atom;
pub use atom::{Atom, AtomType};

mod config;
pub use config::{ScanConfig, DEFAULT_MAX_DEPTH};

mod lookup;

mod molecule;
pub use molecule::{Molecule, MoleculeId};

mod organism;
pub use organism::Organism;

mod parse_error;
pub use parse_error::{ErrKind, ParseError, StructuralError};

pub mod ref_array;
pub use ref_array::RefArray;

mod scanner;
pub use scanner::Scanner;

mod separators;
pub use separators::{count_molecules, count_separators, ATOM_SPLIT_KEY, MOLECULE_SPLIT_KEY};
