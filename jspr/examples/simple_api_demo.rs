// SPDX-License-Identifier: Apache-2.0

// Example demonstrating the lookup API

use jspr::{AtomType, Organism, ParseError};

fn main() -> Result<(), ParseError> {
    let json = r#"{"name": "value", "number": 42, "nested": {"flag": true, "label": "inner"}}"#;
    let organism = Organism::parse(json)?;
    println!("Input: {}", json);
    println!("{} molecules:", organism.len());
    print!("{}", organism);

    for key in ["name", "number", "nested.label", "missing"] {
        match organism.find(key) {
            Some(atom) if atom.kind() == AtomType::String => {
                println!("{} -> string '{}'", key, organism.as_str(&atom)?)
            }
            Some(atom) => println!("{} -> {:?} {}", key, atom.kind(), organism.as_str(&atom)?),
            None => println!("{} -> not found", key),
        }
    }

    Ok(())
}
