//! Core data structures shared by the bonded-term generator and its callers.
//!
//! - [`atom`] – Atoms with names, residue membership, particle kind, and polarizability.
//! - [`system`] – Molecules as atoms, residues, and explicit bonds.
//! - [`term`] – Bonded term records keyed by arity, with template provenance.
//! - [`topology`] – Generator output: term lists and exclusion sets.
//!
//! The input [`System`] is never mutated; the [`crate::forge`] pipeline derives a
//! [`GeneratedTopology`] from it.
//!
//! [`System`]: system::System
//! [`GeneratedTopology`]: topology::GeneratedTopology

pub mod atom;
pub mod system;
pub mod term;
pub mod topology;
