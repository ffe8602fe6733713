//! Error types for bonded-term generation.
//!
//! This module defines the error type used throughout the forge module.
//! Errors are categorized by source: malformed input systems, template
//! parsing, unresolved template atom names, and internal consistency checks.

use thiserror::Error;

/// Errors that can occur while generating bonded terms.
///
/// This enum covers all failure modes of the [`generate`](super::generate)
/// function. Any error aborts the whole molecule; there is no partial output.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse the residue template database TOML.
    #[error("failed to parse residue templates: {0}")]
    TemplateParse(#[from] toml::de::Error),

    /// A template entry is structurally invalid (wrong atom count).
    #[error("invalid template for residue {residue}: {detail}")]
    InvalidTemplate {
        /// Residue template name.
        residue: String,
        /// Description of the problem.
        detail: String,
    },

    /// The input system contains no atoms.
    #[error("input system is empty: at least one atom is required")]
    EmptySystem,

    /// Invalid bond definition in the input system.
    #[error("invalid bond between atoms {i} and {j}: {detail}")]
    InvalidBond {
        /// First atom index.
        i: usize,
        /// Second atom index.
        j: usize,
        /// Description of the problem.
        detail: String,
    },

    /// Atoms are not grouped by ascending residue index, or reference a
    /// residue that does not exist.
    #[error("atom {atom} has residue index {residue}: {detail}")]
    InvalidResidue {
        /// Offending atom index.
        atom: usize,
        /// Residue index stored on the atom.
        residue: usize,
        /// Description of the problem.
        detail: String,
    },

    /// The exclusion radius is outside the supported hop range.
    #[error("exclusion radius of {0} bonds is not supported (expected 1 to 3)")]
    InvalidExclusionHops(usize),

    /// A template references an atom name that does not exist.
    ///
    /// Only raised when the caller did not request permissive resolution.
    #[error("atom {atom_name} in residue {residue_name} {residue_number} was not found while adding {context}")]
    UnresolvedAtom {
        /// Template atom name, including any `-`/`+` prefix.
        atom_name: String,
        /// Name of the residue the template belongs to.
        residue_name: String,
        /// Sequence number of that residue.
        residue_number: i32,
        /// Kind of term being added (e.g. "improper", "exclusion").
        context: String,
    },

    /// A polarizable atom has no bonded Drude particle.
    #[error("polarizable atom {atom} ({atom_name}) has no bonded Drude particle")]
    MissingDrude {
        /// Atom index.
        atom: usize,
        /// Atom name.
        atom_name: String,
    },

    /// A template string carries more numeric coefficients than a term can hold.
    #[error("template parameters '{params}' exceed the maximum of {max} coefficients")]
    TooManyParameters {
        /// The offending parameter string.
        params: String,
        /// Maximum supported coefficient count.
        max: usize,
    },

    /// Internal invariant violated; signals a logic bug rather than bad input.
    #[error("internal inconsistency: {0}")]
    Inconsistency(String),
}

impl Error {
    /// Creates an [`InvalidBond`](Error::InvalidBond) error.
    ///
    /// # Arguments
    ///
    /// * `i` — First atom index
    /// * `j` — Second atom index
    /// * `details` — Description of the bond problem
    pub fn invalid_bond(i: usize, j: usize, details: impl Into<String>) -> Self {
        Self::InvalidBond {
            i,
            j,
            detail: details.into(),
        }
    }

    /// Creates an [`InvalidResidue`](Error::InvalidResidue) error.
    pub fn invalid_residue(atom: usize, residue: usize, details: impl Into<String>) -> Self {
        Self::InvalidResidue {
            atom,
            residue,
            detail: details.into(),
        }
    }

    /// Creates an [`UnresolvedAtom`](Error::UnresolvedAtom) error.
    ///
    /// # Arguments
    ///
    /// * `atom_name` — Template atom name as written
    /// * `residue_name` — Residue the template belongs to
    /// * `residue_number` — Sequence number of that residue
    /// * `context` — Kind of term being resolved
    pub fn unresolved_atom(
        atom_name: &str,
        residue_name: &str,
        residue_number: i32,
        context: impl Into<String>,
    ) -> Self {
        Self::UnresolvedAtom {
            atom_name: atom_name.to_string(),
            residue_name: residue_name.to_string(),
            residue_number,
            context: context.into(),
        }
    }
}
