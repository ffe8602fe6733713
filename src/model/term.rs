/// Maximum number of numeric force-field coefficients a bonded term may carry.
pub const MAX_FORCE_PARAMS: usize = 12;

/// Whether a term was supplied by a residue template or derived from the bond graph.
///
/// The derived ordering places [`TermOrigin::Template`] first, which is the
/// priority used when several dihedrals share a central bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TermOrigin {
    Template,
    Generated,
}

/// A bonded interaction record over `N` atoms.
///
/// `source` holds the template string verbatim (a macro name or a list of
/// numbers); `coefficients` is only populated when that string is purely
/// numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct BondedTerm<const N: usize> {
    pub atoms: [usize; N],
    pub coefficients: Option<Vec<f64>>,
    pub source: Option<String>,
    pub origin: TermOrigin,
}

pub type Pair = BondedTerm<2>;
pub type Angle = BondedTerm<3>;
pub type Dihedral = BondedTerm<4>;

impl<const N: usize> BondedTerm<N> {
    pub fn generated(atoms: [usize; N]) -> Self {
        Self {
            atoms,
            coefficients: None,
            source: None,
            origin: TermOrigin::Generated,
        }
    }

    pub fn templated(atoms: [usize; N]) -> Self {
        Self {
            origin: TermOrigin::Template,
            ..Self::generated(atoms)
        }
    }

    #[inline]
    pub fn is_template(&self) -> bool {
        self.origin == TermOrigin::Template
    }

    #[inline]
    pub fn same_atoms(&self, other: &Self) -> bool {
        self.atoms == other.atoms
    }
}

impl Dihedral {
    /// The central bond `(j, k)` in the orientation stored in the record.
    #[inline]
    pub fn central_bond(&self) -> (usize, usize) {
        (self.atoms[1], self.atoms[2])
    }

    /// Whether both records share a central bond, in either direction.
    pub fn shares_central_bond(&self, other: &Self) -> bool {
        let (j, k) = self.central_bond();
        let (oj, ok) = other.central_bond();
        (j == oj && k == ok) || (j == ok && k == oj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_orders_before_generated() {
        assert!(TermOrigin::Template < TermOrigin::Generated);
    }

    #[test]
    fn central_bond_matches_either_direction() {
        let a = Dihedral::generated([0, 1, 2, 3]);
        let b = Dihedral::generated([5, 2, 1, 4]);
        let c = Dihedral::generated([0, 1, 3, 4]);
        assert!(a.shares_central_bond(&b));
        assert!(!a.shares_central_bond(&c));
    }

    #[test]
    fn templated_terms_start_without_coefficients() {
        let t = Angle::templated([0, 1, 2]);
        assert!(t.is_template());
        assert!(t.coefficients.is_none());
        assert!(t.source.is_none());
    }
}
