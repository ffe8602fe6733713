//! Drude and lone-pair bookkeeping for polarizable models.
//!
//! Auxiliary sites carry no bonded terms of their own; instead they follow
//! a real host atom. A Drude particle's host is the real atom it is bonded
//! to. A lone pair's host comes from its virtual-site record (site first,
//! host second), falling back to a bonded real atom.

use super::context::Context;
use super::error::Error;
use super::graph::BondGraph;
use crate::model::atom::ParticleKind;
use crate::model::system::System;
use crate::model::term::BondedTerm;
use std::iter;

#[derive(Debug, Clone)]
pub(crate) struct AuxiliarySites {
    dependents: Vec<Vec<usize>>,
}

impl AuxiliarySites {
    /// No auxiliary relationships; every atom forms its own group.
    pub fn none(n_atoms: usize) -> Self {
        Self {
            dependents: vec![Vec::new(); n_atoms],
        }
    }

    pub fn build(system: &System, graph: &BondGraph, virtual_sites: &[BondedTerm<4>]) -> Self {
        let mut sites = Self::none(system.atom_count());
        let atoms = &system.atoms;

        let mut vsite_host = vec![None; atoms.len()];
        for record in virtual_sites {
            let [site, host, ..] = record.atoms;
            if atoms[site].kind == ParticleKind::LonePair && atoms[host].is_real() {
                vsite_host[site] = Some(host);
            }
        }

        for (index, atom) in atoms.iter().enumerate() {
            let host = match atom.kind {
                ParticleKind::Atom => continue,
                ParticleKind::Drude => None,
                ParticleKind::LonePair => vsite_host[index],
            };
            let host = host.or_else(|| {
                graph
                    .neighbors(index)
                    .iter()
                    .copied()
                    .find(|&nb| atoms[nb].is_real())
            });
            match host {
                Some(host) => sites.dependents[host].push(index),
                None => log::warn!(
                    "auxiliary site {} ({}) has no host atom; its exclusions are not propagated",
                    index,
                    atom.name
                ),
            }
        }
        sites
    }

    /// The atom followed by its auxiliary dependents.
    pub fn group(&self, atom: usize) -> impl Iterator<Item = usize> + '_ {
        iter::once(atom).chain(self.dependents[atom].iter().copied())
    }

    pub fn dependents(&self, atom: usize) -> &[usize] {
        &self.dependents[atom]
    }

    pub fn atom_count(&self) -> usize {
        self.dependents.len()
    }
}

/// Polarization, anisotropic polarization, and virtual-site records.
#[derive(Debug, Default)]
pub(crate) struct PolarizationRecords {
    pub polarization: Vec<BondedTerm<2>>,
    pub aniso_polarization: Vec<BondedTerm<5>>,
    pub virtual_sites: Vec<BondedTerm<4>>,
}

/// Resolves the polarization-related template sections of every residue.
///
/// Entries that name missing atoms are skipped.
pub(crate) fn template_records(ctx: &Context<'_>) -> Result<PolarizationRecords, Error> {
    let mut records = PolarizationRecords::default();
    for residue in 0..ctx.residue_count() {
        let Some(template) = ctx.template(residue) else {
            continue;
        };
        for entry in &template.polarization {
            if let Some(atoms) = ctx.resolver.resolve_entry(&entry.atoms, residue, "polarization", true)? {
                let mut term = BondedTerm::templated(atoms);
                entry.apply_to(&mut term)?;
                records.polarization.push(term);
            }
        }
        for entry in &template.aniso_polarization {
            if let Some(atoms) =
                ctx.resolver
                    .resolve_entry(&entry.atoms, residue, "anisotropic polarization", true)?
            {
                let mut term = BondedTerm::templated(atoms);
                entry.apply_to(&mut term)?;
                records.aniso_polarization.push(term);
            }
        }
        for entry in &template.virtual_sites {
            if let Some(atoms) = ctx.resolver.resolve_entry(&entry.atoms, residue, "virtual site", true)? {
                let mut term = BondedTerm::templated(atoms);
                entry.apply_to(&mut term)?;
                records.virtual_sites.push(term);
            }
        }
    }
    Ok(records)
}

/// Builds Thole screening records `[i, drude(i), k, drude(k)]`.
///
/// # Errors
///
/// Returns [`Error::MissingDrude`] if a polarizable atom has no bonded Drude.
pub(crate) fn thole_records(
    system: &System,
    graph: &BondGraph,
    mut candidates: Vec<(usize, usize)>,
) -> Result<Vec<BondedTerm<4>>, Error> {
    candidates.sort_unstable();
    candidates.dedup();

    let drude_of = |atom: usize| {
        graph
            .neighbors(atom)
            .iter()
            .rev()
            .copied()
            .find(|&nb| system.atoms[nb].kind == ParticleKind::Drude)
            .ok_or_else(|| Error::MissingDrude {
                atom,
                atom_name: system.atoms[atom].name.clone(),
            })
    };

    let mut records = Vec::with_capacity(candidates.len());
    for (i, k) in candidates {
        let (Some(pi), Some(pk)) = (
            system.atoms[i].active_polarizability(),
            system.atoms[k].active_polarizability(),
        ) else {
            continue;
        };
        let mut term = BondedTerm::generated([i, drude_of(i)?, k, drude_of(k)?]);
        term.source = Some(format!(
            "{:10.6} {:10.6} {:8.4} {:8.4}",
            pi.alpha, pk.alpha, pi.thole, pk.thole
        ));
        term.coefficients = Some(vec![pi.alpha, pk.alpha, pi.thole, pk.thole]);
        records.push(term);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::system::{Bond, Residue};

    /// Polarizable O-C with Drudes on both and a lone pair on O.
    fn make_carbonyl() -> System {
        let mut sys = System::new();
        let res = sys.push_residue(Residue::new("CO", 1));
        sys.atoms.push(Atom::new("C", res).with_polarizability(0.0014, 1.3));
        sys.atoms.push(Atom::new("DC", res));
        sys.atoms.push(Atom::new("O", res).with_polarizability(0.0010, 1.3));
        sys.atoms.push(Atom::new("DO", res));
        sys.atoms.push(Atom::new("LPO", res));
        sys.bonds.push(Bond::new(0, 1));
        sys.bonds.push(Bond::new(0, 2));
        sys.bonds.push(Bond::new(2, 3));
        sys
    }

    #[test]
    fn hosts_from_bonds_and_virtual_sites() {
        let sys = make_carbonyl();
        let graph = BondGraph::from_system(&sys).unwrap();
        let vsite = BondedTerm::templated([4, 2, 0, 3]);
        let aux = AuxiliarySites::build(&sys, &graph, &[vsite]);

        assert_eq!(aux.dependents(0), &[1]);
        assert_eq!(aux.dependents(2), &[3, 4]);
        assert_eq!(aux.group(2).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(aux.group(1).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn lone_pair_without_host_is_left_alone() {
        let sys = make_carbonyl();
        let graph = BondGraph::from_system(&sys).unwrap();
        let aux = AuxiliarySites::build(&sys, &graph, &[]);
        assert_eq!(aux.dependents(2), &[3]);
    }

    #[test]
    fn thole_record_layout() {
        let sys = make_carbonyl();
        let graph = BondGraph::from_system(&sys).unwrap();
        let records = thole_records(&sys, &graph, vec![(0, 2), (0, 2)]).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].atoms, [0, 1, 2, 3]);
        assert_eq!(
            records[0].source.as_deref(),
            Some("  0.001400   0.001000   1.3000   1.3000")
        );
    }

    #[test]
    fn thole_requires_drude() {
        let mut sys = make_carbonyl();
        sys.bonds.retain(|b| *b != Bond::new(2, 3));
        let graph = BondGraph::from_system(&sys).unwrap();
        let result = thole_records(&sys, &graph, vec![(0, 2)]);
        assert!(matches!(result, Err(Error::MissingDrude { atom: 2, .. })));
    }
}
