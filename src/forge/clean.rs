//! Sorting, deduplication, and pruning of generated terms.

use crate::model::atom::Atom;
use crate::model::term::{Angle, Dihedral, Pair};

/// Sorts angles by center atom then outer atoms and drops repeated tuples.
///
/// Template-sourced records win over generated ones with the same atoms.
pub(crate) fn sort_angles(angles: &mut Vec<Angle>) {
    angles.sort_by_key(|a| (a.atoms[1], a.atoms[0], a.atoms[2], a.origin));
    angles.dedup_by(|b, a| a.same_atoms(b));
}

/// Sorts pairs by atom indices and collapses duplicates, keeping the first.
pub(crate) fn sort_pairs(pairs: &mut Vec<Pair>) {
    pairs.sort_by_key(|p| (p.atoms[0], p.atoms[1]));
    pairs.dedup_by(|b, a| a.same_atoms(b));
}

/// Sorts dihedrals by central bond, template entries first, then outer atoms.
pub(crate) fn sort_dihedrals(dihedrals: &mut [Dihedral]) {
    dihedrals.sort_by_key(|d| (d.atoms[1], d.atoms[2], d.origin, d.atoms[0], d.atoms[3]));
}

/// Orients impropers so the first atom is not above the last, then sorts
/// them by first, last, and inner atoms.
pub(crate) fn sort_impropers(impropers: &mut [Dihedral]) {
    for improper in impropers.iter_mut() {
        if improper.atoms[0] > improper.atoms[3] {
            improper.atoms.reverse();
        }
    }
    impropers.sort_by_key(|d| (d.atoms[0], d.atoms[3], d.atoms[1], d.atoms[2]));
}

/// Drops angles whose outer atoms are auxiliary sites.
pub(crate) fn drop_auxiliary_angles(angles: &mut Vec<Angle>, atoms: &[Atom]) {
    angles.retain(|a| atoms[a.atoms[0]].is_real() && atoms[a.atoms[2]].is_real());
}

pub(crate) struct DihedralPolicy {
    pub keep_all_generated: bool,
    pub remove_if_with_improper: bool,
}

/// Reduces sorted dihedrals to the ones that are kept.
///
/// Dihedrals ending on an auxiliary site are dropped first. Template
/// dihedrals are always kept. Unless every generated dihedral is kept, only
/// the first record on each central bond is a candidate, and a generated
/// candidate is replaced by the sibling on the same bond with the fewest
/// terminal hydrogens. Generated dihedrals sharing a bond with an improper
/// may be removed.
pub(crate) fn clean_dihedrals(
    dihedrals: &[Dihedral],
    impropers: &[Dihedral],
    atoms: &[Atom],
    policy: &DihedralPolicy,
) -> Vec<Dihedral> {
    let dihedrals: Vec<&Dihedral> = dihedrals
        .iter()
        .filter(|d| atoms[d.atoms[0]].is_real() && atoms[d.atoms[3]].is_real())
        .collect();

    let n = dihedrals.len();
    let mut candidates: Vec<usize> = if policy.keep_all_generated {
        (0..n).collect()
    } else {
        (0..n)
            .filter(|&i| {
                i == 0
                    || dihedrals[i].is_template()
                    || !dihedrals[i].shares_central_bond(dihedrals[i - 1])
            })
            .collect()
    };
    candidates.push(n);

    let mut kept = Vec::with_capacity(candidates.len());
    for window in candidates.windows(2) {
        let (index, next) = (window[0], window[1]);
        let dihedral = dihedrals[index];

        if !dihedral.is_template()
            && policy.remove_if_with_improper
            && impropers.iter().any(|imp| dihedral.shares_central_bond(imp))
        {
            continue;
        }

        let mut best = index;
        if !policy.keep_all_generated && !dihedral.is_template() {
            let mut min_hydrogens = 2;
            for sibling in index..next {
                if !dihedral.shares_central_bond(dihedrals[sibling]) {
                    break;
                }
                let count = terminal_hydrogens(dihedrals[sibling], atoms);
                if count < min_hydrogens {
                    min_hydrogens = count;
                    best = sibling;
                }
                if min_hydrogens == 0 {
                    break;
                }
            }
        }
        kept.push(dihedrals[best].clone());
    }
    kept
}

fn terminal_hydrogens(dihedral: &Dihedral, atoms: &[Atom]) -> usize {
    [dihedral.atoms[0], dihedral.atoms[3]]
        .iter()
        .filter(|&&a| atoms[a].is_hydrogen())
        .count()
}
