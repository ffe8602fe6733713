//! Bonded-term generation and lane-batched non-bonded kernels for molecular
//! dynamics topologies.
//!
//! The crate has two cores. The bonded-term generator walks a molecule's bond
//! graph to derive angles, proper and improper dihedrals, 1-4 pairs, and
//! non-bonded exclusions, merges them with per-residue templates, and handles
//! the auxiliary particles (Drude oscillators, lone pairs) of polarizable
//! models. The [`kernel`] module evaluates Coulomb and van der Waals
//! interactions over neighbor lists, four inner particles at a time, with
//! cubic-spline interaction tables.
//!
//! # Features
//!
//! - **Term enumeration** — Angles, dihedrals and 1-4 pairs from N-hop bond
//!   paths, each path visited once
//! - **Residue templates** — TOML template database with parameter strings,
//!   extra terms, impropers, and extra exclusions, matched across residue
//!   boundaries with `-`/`+` name prefixes
//! - **Polarizable models** — Thole screening records and exclusion
//!   inheritance for Drude and lone-pair sites
//! - **Pair kernel** — Masked `f32x4` evaluation of Coulomb, reaction-field,
//!   tabulated Coulomb, Lennard-Jones, and tabulated dispersion/repulsion,
//!   serial or on the rayon pool
//!
//! # Quick Start
//!
//! The generator entry point is [`generate`], which takes a [`System`], an
//! optional [`TemplateDatabase`], and a [`GeneratorConfig`]:
//!
//! ```
//! use md_forge::{Atom, Bond, Residue, System, TermOrigin};
//! use md_forge::{generate, ForgeError, GeneratorConfig, TemplateDatabase};
//!
//! // Butane backbone in one residue
//! let mut system = System::new();
//! let res = system.push_residue(Residue::new("BUT", 1));
//! for name in ["C1", "C2", "C3", "C4"] {
//!     system.atoms.push(Atom::new(name, res));
//! }
//! system.bonds.push(Bond::new(0, 1));
//! system.bonds.push(Bond::new(1, 2));
//! system.bonds.push(Bond::new(2, 3));
//!
//! let templates = TemplateDatabase::from_toml(
//!     r#"
//!     [residues.BUT]
//!     angles = [{ atoms = ["C1", "C2", "C3"], params = "ang_CCC" }]
//!     "#,
//! )?;
//! let config = GeneratorConfig::from_defaults(&templates.defaults);
//! let topology = generate(&system, Some(&templates), &config)?;
//!
//! // Two angles, the first carrying the template string
//! assert_eq!(topology.angles.len(), 2);
//! assert_eq!(topology.angles[0].origin, TermOrigin::Template);
//! assert_eq!(topology.angles[0].source.as_deref(), Some("ang_CCC"));
//!
//! // One dihedral, one 1-4 pair
//! assert_eq!(topology.dihedrals.len(), 1);
//! assert_eq!(topology.pairs[0].atoms, [0, 3]);
//!
//! // Three-bond exclusions cover every other atom
//! assert_eq!(topology.exclusions.len(), 12);
//! assert!(topology.exclusions.is_symmetric());
//! # Ok::<(), ForgeError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`generate`] — Bonded-term generation
//! - [`kernel`] — Non-bonded pair kernel, interaction tables, neighbor lists
//! - [`io`] — Molecule input and topology section output
//!
//! # Data Types
//!
//! ## Input Structures
//!
//! - [`System`] — Atoms grouped by residue, plus bonds
//! - [`Atom`] — Named particle with residue, kind, and polarizability
//! - [`ParticleKind`] — Real atom, Drude particle, or lone pair
//! - [`Bond`] — Normalized bond between two atoms
//! - [`Residue`] — Residue name and number
//!
//! ## Output Structures
//!
//! - [`GeneratedTopology`] — All generated terms and exclusions
//! - [`BondedTerm`] — Term over `N` atoms with optional coefficients
//! - [`Exclusions`] — Sorted per-atom exclusion lists
//!
//! ## Configuration
//!
//! - [`GeneratorConfig`] — Exclusion radius, dihedral policies, strictness
//! - [`TemplateDatabase`] — Residue templates and force-field defaults

mod forge;
mod model;

pub mod io;
pub mod kernel;

pub use model::atom::{Atom, ParticleKind, Polarizability};
pub use model::system::{Bond, Residue, System};
pub use model::term::{Angle, BondedTerm, Dihedral, MAX_FORCE_PARAMS, Pair, TermOrigin};
pub use model::topology::{Exclusions, GeneratedTopology};

pub use forge::{
    BondGraph, GeneratorConfig, NeighborShells, ResidueTemplate, TemplateDatabase,
    TemplateDefaults, TemplateEntry, generate,
};

pub use forge::Error as ForgeError;
