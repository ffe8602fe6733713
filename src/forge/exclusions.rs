//! Exclusion finalization.
//!
//! Three sources feed the final exclusion set: every atom within the hop
//! radius, template exclusions beyond that radius, and (for polarizable
//! models) auxiliary sites inheriting the exclusions of their host atoms.

use super::context::Context;
use super::error::Error;
use super::graph::NeighborShells;
use super::polarization::AuxiliarySites;
use crate::model::topology::Exclusions;
use std::collections::BTreeSet;

/// Template exclusions between real atoms, stored on the lower index.
///
/// Polarizable runs always resolve permissively.
pub(crate) fn template_exclusions(ctx: &Context<'_>) -> Result<Vec<Vec<usize>>, Error> {
    let allow_missing = ctx.config.allow_missing || ctx.config.polarizable;
    let mut lists = vec![Vec::new(); ctx.atom_count()];

    for residue in 0..ctx.residue_count() {
        let Some(template) = ctx.template(residue) else {
            continue;
        };
        for entry in &template.exclusions {
            let Some([a, b]) =
                ctx.resolver
                    .resolve_entry::<2>(&entry.atoms, residue, "exclusion", allow_missing)?
            else {
                continue;
            };
            if a != b && ctx.is_real(a) && ctx.is_real(b) {
                lists[a.min(b)].push(a.max(b));
            }
        }
    }
    for list in &mut lists {
        list.sort_unstable();
        list.dedup();
    }
    Ok(lists)
}

/// Removes template exclusions already covered by the hop radius.
pub(crate) fn subtract_radius(extra: &mut [Vec<usize>], shells: &NeighborShells, hops: usize) {
    for (atom, list) in extra.iter_mut().enumerate() {
        list.retain(|&other| shells.distance(atom, other).is_none_or(|d| d > hops));
    }
}

/// Symmetric exclusion sets from the hop radius plus template extras.
pub(crate) fn combine(shells: &NeighborShells, hops: usize, extra: &[Vec<usize>]) -> Vec<BTreeSet<usize>> {
    let mut sets: Vec<BTreeSet<usize>> = (0..extra.len())
        .map(|atom| shells.within(atom, hops).collect())
        .collect();
    for (atom, list) in extra.iter().enumerate() {
        for &other in list {
            sets[atom].insert(other);
            sets[other].insert(atom);
        }
    }
    sets
}

/// Propagates exclusions from host atoms to their auxiliary sites until no
/// further exclusion is added.
///
/// If `a` excludes `b`, every member of `a`'s group (the atom and its
/// dependents) excludes every member of `b`'s group. Members of one group
/// also exclude each other. Returns the number of passes, including the
/// final pass that found nothing new.
pub(crate) fn propagate(sets: &mut [BTreeSet<usize>], aux: &AuxiliarySites) -> usize {
    debug_assert_eq!(sets.len(), aux.atom_count());
    let mut passes = 0;
    loop {
        passes += 1;
        let mut added = Vec::new();
        for a in 0..sets.len() {
            let members: Vec<usize> = aux.group(a).collect();
            for &b in sets[a].iter().chain(&members) {
                for x in aux.group(a) {
                    for y in aux.group(b) {
                        if x != y && !sets[x].contains(&y) {
                            added.push((x, y));
                        }
                    }
                }
            }
        }
        if added.is_empty() {
            return passes;
        }
        for (x, y) in added {
            sets[x].insert(y);
            sets[y].insert(x);
        }
    }
}

/// Converts the sets into the output form and re-checks symmetry.
pub(crate) fn finish(sets: Vec<BTreeSet<usize>>) -> Result<Exclusions, Error> {
    let expected: usize = sets.iter().map(BTreeSet::len).sum();
    let exclusions = Exclusions::from_lists(sets.into_iter().map(|s| s.into_iter().collect()).collect());
    if exclusions.len() != expected {
        return Err(Error::Inconsistency(format!(
            "{} exclusions before deduplication, {} after",
            expected,
            exclusions.len()
        )));
    }
    if !exclusions.is_symmetric() {
        return Err(Error::Inconsistency("exclusion set is not symmetric".into()));
    }
    Ok(exclusions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::graph::BondGraph;
    use crate::model::atom::Atom;
    use crate::model::system::{Bond, Residue, System};

    fn make_chain(names: &[&str]) -> System {
        let mut sys = System::new();
        let res = sys.push_residue(Residue::new("MOL", 1));
        for name in names {
            sys.atoms.push(Atom::new(*name, res));
        }
        for i in 1..names.len() {
            sys.bonds.push(Bond::new(i - 1, i));
        }
        sys
    }

    #[test]
    fn radius_subtraction_keeps_distant_extras() {
        let sys = make_chain(&["C1", "C2", "C3", "C4", "C5", "C6"]);
        let graph = BondGraph::from_system(&sys).unwrap();
        let shells = graph.shells(3);

        let mut extra = vec![vec![2, 5], vec![], vec![], vec![], vec![], vec![]];
        subtract_radius(&mut extra, &shells, 3);
        assert_eq!(extra[0], vec![5]);

        let sets = combine(&shells, 3, &extra);
        assert!(sets[5].contains(&0));
        assert!(sets[0].contains(&3));
        assert!(!sets[0].contains(&4));
    }

    #[test]
    fn drude_inherits_host_exclusions() {
        // C1 - C2 - C3 with a Drude on C1 and on C3
        let mut sys = make_chain(&["C1", "C2", "C3", "DC1", "DC3"]);
        sys.bonds = vec![Bond::new(0, 1), Bond::new(1, 2), Bond::new(0, 3), Bond::new(2, 4)];
        let graph = BondGraph::from_system(&sys).unwrap();
        let shells = graph.shells(3);
        let aux = AuxiliarySites::build(&sys, &graph, &[]);

        let extra = vec![Vec::new(); 5];
        let mut sets = combine(&shells, 1, &extra);
        assert!(!sets[3].contains(&1));

        propagate(&mut sets, &aux);
        assert!(sets[3].contains(&1));
        assert!(sets[1].contains(&3));
        assert!(sets[1].contains(&4));
        assert!(!sets[3].contains(&4));
        assert!(!sets[3].contains(&2));

        let exclusions = finish(sets).unwrap();
        assert!(exclusions.is_symmetric());
    }

    #[test]
    fn propagation_is_a_fixed_point() {
        let mut sys = make_chain(&["C1", "C2", "C3", "C4", "DC1", "DC4"]);
        sys.bonds = vec![
            Bond::new(0, 1),
            Bond::new(1, 2),
            Bond::new(2, 3),
            Bond::new(0, 4),
            Bond::new(3, 5),
        ];
        let graph = BondGraph::from_system(&sys).unwrap();
        let shells = graph.shells(3);
        let aux = AuxiliarySites::build(&sys, &graph, &[]);

        let mut sets = combine(&shells, 3, &vec![Vec::new(); 6]);
        propagate(&mut sets, &aux);
        let once = sets.clone();

        let passes = propagate(&mut sets, &aux);
        assert_eq!(passes, 1);
        assert_eq!(sets, once);
        assert!(sets[4].contains(&5));
    }

    #[test]
    fn asymmetric_sets_are_inconsistent() {
        let sets = vec![BTreeSet::from([1]), BTreeSet::new()];
        assert!(matches!(finish(sets), Err(Error::Inconsistency(_))));
    }
}
