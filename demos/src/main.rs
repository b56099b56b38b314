// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jspr::{AtomType, Organism, ParseError, ScanConfig, DEFAULT_MAX_DEPTH};
use log::{error, info};

/// Scan an object-only JSON file and look up keys in it.
#[derive(Parser, Debug)]
#[command(name = "jspr-demo", version)]
struct Args {
    /// File to scan
    path: PathBuf,

    /// Key or dotted path to look up; prints the whole document when omitted
    #[arg(short, long = "key")]
    keys: Vec<String>,

    /// Maximum object nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Use the flat split-based populate instead of the scanner
    #[arg(long)]
    flat: bool,
}

fn build<'a>(buffer: &'a [u8], args: &Args) -> Result<Organism<'a>, ParseError> {
    if args.flat {
        let mut organism = Organism::presized(buffer)?;
        organism.populate()?;
        Ok(organism)
    } else {
        let config = ScanConfig::default().with_max_depth(args.max_depth);
        Organism::parse_with_config(buffer, config)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let buffer = match fs::read(&args.path) {
        Ok(buffer) => buffer,
        Err(e) => {
            eprintln!("Error: Unable to read file '{}': {}", args.path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let organism = match build(&buffer, &args) {
        Ok(organism) => organism,
        Err(e) => {
            error!("scan of {} failed: {:?}", args.path.display(), e);
            eprintln!("Error: JSON parsing failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("{} molecules in {}", organism.len(), args.path.display());

    if args.keys.is_empty() {
        print!("{}", organism);
        return ExitCode::SUCCESS;
    }

    let mut missing = false;
    for key in &args.keys {
        match organism.find(key) {
            Some(atom) => {
                let text = String::from_utf8_lossy(organism.text(&atom));
                match atom.kind() {
                    AtomType::String => println!("{} = \"{}\"", key, text),
                    _ => println!("{} = {}", key, text),
                }
            }
            None => {
                println!("{} not found", key);
                missing = true;
            }
        }
    }

    if missing {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
