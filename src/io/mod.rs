//! Molecule input and topology section output.
//!
//! Molecules are read from a small TOML format listing residues with their
//! atoms, plus 0-based bonds. Generated terms are written as GROMACS-style
//! topology sections with 1-based atom numbers.

use std::fmt;

pub mod error;

pub mod molecule {
    //! TOML molecule reader.
    mod reader;
    pub use reader::read;
}

pub mod top {
    //! GROMACS-style topology section writer.
    mod writer;
    pub use writer::{FunctionTypes, write};
}

/// Input format named in parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Molecule,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Molecule => write!(f, "molecule TOML"),
        }
    }
}
