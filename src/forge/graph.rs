//! Bond graph and shortest-path neighbor shells.
//!
//! The [`BondGraph`] holds sorted adjacency lists built from the explicit
//! bonds of a [`System`]. [`NeighborShells`] derives from it, for every atom
//! and every hop count up to a maximum, the atoms whose shortest bond path
//! has exactly that many edges. Angles are walked at two hops, dihedrals at
//! three, and default exclusions cover every shell up to the exclusion radius.

use super::error::Error;
use crate::model::system::System;

/// Adjacency structure over the atoms of a [`System`].
#[derive(Debug, Clone)]
pub struct BondGraph {
    neighbors: Vec<Vec<usize>>,
}

impl BondGraph {
    /// Builds the graph and validates the system layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySystem`] if the system has no atoms,
    /// [`Error::InvalidBond`] for out-of-bounds or self bonds, and
    /// [`Error::InvalidResidue`] if atoms reference unknown residues or are
    /// not grouped by ascending residue index.
    pub fn from_system(system: &System) -> Result<Self, Error> {
        if system.atoms.is_empty() {
            return Err(Error::EmptySystem);
        }

        let n_atoms = system.atoms.len();
        let n_residues = system.residues.len();
        let mut previous = 0;
        for (index, atom) in system.atoms.iter().enumerate() {
            if atom.residue >= n_residues {
                return Err(Error::invalid_residue(
                    index,
                    atom.residue,
                    format!("residue index out of bounds (n_residues = {})", n_residues),
                ));
            }
            if atom.residue < previous {
                return Err(Error::invalid_residue(
                    index,
                    atom.residue,
                    format!("atoms must be grouped by ascending residue (previous = {})", previous),
                ));
            }
            previous = atom.residue;
        }

        let mut neighbors = vec![Vec::new(); n_atoms];
        for bond in &system.bonds {
            if bond.i >= n_atoms || bond.j >= n_atoms {
                return Err(Error::invalid_bond(
                    bond.i,
                    bond.j,
                    format!("atom index out of bounds (n_atoms = {})", n_atoms),
                ));
            }
            if bond.i == bond.j {
                return Err(Error::invalid_bond(bond.i, bond.j, "atom bonded to itself"));
            }
            neighbors[bond.i].push(bond.j);
            neighbors[bond.j].push(bond.i);
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        Ok(Self { neighbors })
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Directly bonded atoms, ascending.
    #[inline]
    pub fn neighbors(&self, atom: usize) -> &[usize] {
        &self.neighbors[atom]
    }

    #[inline]
    pub fn bonded(&self, a: usize, b: usize) -> bool {
        self.neighbors[a].binary_search(&b).is_ok()
    }

    /// Computes neighbor shells up to `max_hops` bonds.
    pub fn shells(&self, max_hops: usize) -> NeighborShells {
        let n = self.atom_count();
        let mut shells = Vec::with_capacity(n);
        let mut depth = vec![usize::MAX; n];
        let mut visited = Vec::new();

        for start in 0..n {
            let mut per_hop: Vec<Vec<usize>> = vec![vec![start]];
            depth[start] = 0;
            visited.push(start);

            for hop in 1..=max_hops {
                let mut next = Vec::new();
                for &atom in &per_hop[hop - 1] {
                    for &nb in &self.neighbors[atom] {
                        if depth[nb] == usize::MAX {
                            depth[nb] = hop;
                            visited.push(nb);
                            next.push(nb);
                        }
                    }
                }
                next.sort_unstable();
                per_hop.push(next);
            }

            for atom in visited.drain(..) {
                depth[atom] = usize::MAX;
            }
            shells.push(per_hop);
        }

        NeighborShells { max_hops, shells }
    }
}

/// Atoms at exact shortest bond distance, per atom and hop count.
#[derive(Debug, Clone)]
pub struct NeighborShells {
    max_hops: usize,
    shells: Vec<Vec<Vec<usize>>>,
}

impl NeighborShells {
    #[inline]
    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    /// Atoms exactly `hops` bonds away from `atom` (hop 0 is the atom itself).
    pub fn at(&self, atom: usize, hops: usize) -> &[usize] {
        self.shells[atom]
            .get(hops)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Shortest bond distance between two atoms, if within `max_hops`.
    pub fn distance(&self, a: usize, b: usize) -> Option<usize> {
        self.shells[a]
            .iter()
            .position(|shell| shell.binary_search(&b).is_ok())
    }

    /// All atoms between one and `hops` bonds away from `atom`.
    pub fn within(&self, atom: usize, hops: usize) -> impl Iterator<Item = usize> + '_ {
        (1..=hops.min(self.max_hops)).flat_map(move |h| self.at(atom, h).iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::system::{Bond, Residue};

    fn make_chain(n: usize) -> System {
        let mut sys = System::new();
        let res = sys.push_residue(Residue::new("MOL", 1));
        for i in 0..n {
            sys.atoms.push(Atom::new(format!("C{}", i + 1), res));
        }
        for i in 1..n {
            sys.bonds.push(Bond::new(i - 1, i));
        }
        sys
    }

    fn make_ring(n: usize) -> System {
        let mut sys = make_chain(n);
        sys.bonds.push(Bond::new(n - 1, 0));
        sys
    }

    #[test]
    fn chain_shells() {
        let graph = BondGraph::from_system(&make_chain(5)).unwrap();
        let shells = graph.shells(3);

        assert_eq!(shells.at(0, 0), &[0]);
        assert_eq!(shells.at(0, 1), &[1]);
        assert_eq!(shells.at(0, 2), &[2]);
        assert_eq!(shells.at(0, 3), &[3]);
        assert_eq!(shells.at(2, 1), &[1, 3]);
        assert_eq!(shells.at(2, 2), &[0, 4]);
        assert!(shells.at(2, 3).is_empty());
        assert_eq!(shells.distance(0, 4), None);
        assert_eq!(shells.distance(4, 1), Some(3));
    }

    #[test]
    fn ring_uses_shortest_path() {
        let graph = BondGraph::from_system(&make_ring(6)).unwrap();
        let shells = graph.shells(3);

        assert_eq!(shells.at(0, 1), &[1, 5]);
        assert_eq!(shells.at(0, 2), &[2, 4]);
        assert_eq!(shells.at(0, 3), &[3]);
        assert_eq!(shells.distance(0, 3), Some(3));
        assert_eq!(shells.within(0, 2).count(), 4);
    }

    #[test]
    fn duplicate_bonds_are_collapsed() {
        let mut sys = make_chain(2);
        sys.bonds.push(Bond::new(1, 0));
        let graph = BondGraph::from_system(&sys).unwrap();
        assert_eq!(graph.neighbors(0), &[1]);
        assert!(graph.bonded(1, 0));
    }

    #[test]
    fn errors_on_empty_system() {
        let result = BondGraph::from_system(&System::new());
        assert!(matches!(result, Err(Error::EmptySystem)));
    }

    #[test]
    fn errors_on_invalid_bond_index() {
        let mut sys = make_chain(2);
        sys.bonds.push(Bond::new(0, 10));
        let result = BondGraph::from_system(&sys);
        assert!(matches!(result, Err(Error::InvalidBond { i: 0, j: 10, .. })));
    }

    #[test]
    fn errors_on_self_bond() {
        let mut sys = make_chain(2);
        sys.bonds.push(Bond::new(1, 1));
        assert!(matches!(
            BondGraph::from_system(&sys),
            Err(Error::InvalidBond { .. })
        ));
    }

    #[test]
    fn errors_on_unordered_residues() {
        let mut sys = make_chain(2);
        let second = sys.push_residue(Residue::new("MOL", 2));
        sys.atoms[0].residue = second;
        assert!(matches!(
            BondGraph::from_system(&sys),
            Err(Error::InvalidResidue { atom: 1, .. })
        ));
    }
}
