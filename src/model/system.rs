use super::atom::Atom;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2 }
        } else {
            Self { i: idx2, j: idx1 }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub name: String,
    pub number: i32,
}

impl Residue {
    pub fn new(name: impl Into<String>, number: i32) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }
}

/// A molecule as seen by the bonded-term generator.
///
/// Atoms must be grouped by residue in ascending residue order; the
/// generator resolves template atom names by scanning contiguous residue
/// ranges.
#[derive(Debug, Clone, Default)]
pub struct System {
    pub atoms: Vec<Atom>,
    pub residues: Vec<Residue>,
    pub bonds: Vec<Bond>,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// Appends a residue and returns its index.
    pub fn push_residue(&mut self, residue: Residue) -> usize {
        self.residues.push(residue);
        self.residues.len() - 1
    }

    /// Index range of the atoms belonging to `residue`.
    ///
    /// Relies on the ascending residue grouping; callers validate that
    /// through [`BondGraph::from_system`](crate::BondGraph::from_system).
    pub fn residue_atoms(&self, residue: usize) -> Range<usize> {
        let start = self.atoms.partition_point(|a| a.residue < residue);
        let end = self.atoms.partition_point(|a| a.residue <= residue);
        start..end
    }
}
