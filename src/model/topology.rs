use super::term::{Angle, BondedTerm, Dihedral, Pair};

/// Per-atom sorted, deduplicated exclusion lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    per_atom: Vec<Vec<usize>>,
}

impl Exclusions {
    pub fn from_lists(mut per_atom: Vec<Vec<usize>>) -> Self {
        for list in &mut per_atom {
            list.sort_unstable();
            list.dedup();
        }
        Self { per_atom }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.per_atom.len()
    }

    pub fn of(&self, atom: usize) -> &[usize] {
        self.per_atom.get(atom).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.of(a).binary_search(&b).is_ok()
    }

    /// Total number of stored `(atom, excluded)` entries.
    pub fn len(&self) -> usize {
        self.per_atom.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_symmetric(&self) -> bool {
        self.per_atom
            .iter()
            .enumerate()
            .all(|(a, list)| list.iter().all(|&b| self.contains(b, a)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.per_atom
            .iter()
            .enumerate()
            .map(|(a, list)| (a, list.as_slice()))
    }
}

/// Everything the bonded-term generator produces for one molecule.
///
/// `extra_exclusions` are the template exclusions that survive subtraction
/// of the hop radius, stored on the lower atom index; `exclusions` is the
/// complete symmetric set handed to non-bonded setup.
#[derive(Debug, Clone, Default)]
pub struct GeneratedTopology {
    pub exclusion_hops: usize,
    pub angles: Vec<Angle>,
    pub dihedrals: Vec<Dihedral>,
    pub impropers: Vec<Dihedral>,
    pub pairs: Vec<Pair>,
    pub thole: Vec<BondedTerm<4>>,
    pub polarization: Vec<BondedTerm<2>>,
    pub aniso_polarization: Vec<BondedTerm<5>>,
    pub virtual_sites: Vec<BondedTerm<4>>,
    pub extra_exclusions: Exclusions,
    pub exclusions: Exclusions,
}
