use super::config::GeneratorConfig;
use super::graph::{BondGraph, NeighborShells};
use super::lookup::AtomResolver;
use super::templates::{ResidueTemplate, TemplateDatabase};
use crate::model::system::System;

/// Read-only inputs shared by all generation stages.
pub(crate) struct Context<'a> {
    pub system: &'a System,
    pub graph: &'a BondGraph,
    pub shells: &'a NeighborShells,
    pub resolver: AtomResolver<'a>,
    pub config: &'a GeneratorConfig,
    templates: Vec<Option<&'a ResidueTemplate>>,
}

impl<'a> Context<'a> {
    pub fn new(
        system: &'a System,
        graph: &'a BondGraph,
        shells: &'a NeighborShells,
        database: Option<&'a TemplateDatabase>,
        config: &'a GeneratorConfig,
    ) -> Self {
        let templates = system
            .residues
            .iter()
            .map(|res| {
                let found = database.and_then(|db| db.residue(&res.name));
                if database.is_some() && found.is_none() {
                    log::debug!("no template for residue {} {}", res.name, res.number);
                }
                found
            })
            .collect();

        Self {
            system,
            graph,
            shells,
            resolver: AtomResolver::new(system),
            config,
            templates,
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.system.atoms.len()
    }

    #[inline]
    pub fn residue_count(&self) -> usize {
        self.templates.len()
    }

    #[inline]
    pub fn template(&self, residue: usize) -> Option<&'a ResidueTemplate> {
        self.templates.get(residue).copied().flatten()
    }

    /// Residues consulted for a term: the lowest and the highest residue it spans.
    pub fn spanned_residues(&self, atoms: &[usize]) -> Vec<usize> {
        let residue = |&a: &usize| self.system.atoms[a].residue;
        let min = atoms.iter().map(residue).min().unwrap_or(0);
        let max = atoms.iter().map(residue).max().unwrap_or(0);
        if min == max { vec![min] } else { vec![min, max] }
    }

    /// Atom names of `atoms` as written in the template of `residue`.
    pub fn relative_names(&self, atoms: &[usize], residue: usize) -> Vec<String> {
        atoms
            .iter()
            .map(|&a| self.resolver.relative_name(a, residue))
            .collect()
    }

    #[inline]
    pub fn is_real(&self, atom: usize) -> bool {
        self.system.atoms[atom].is_real()
    }
}

/// Which template angle and dihedral entries have been matched so far.
pub(crate) struct Consumed {
    pub angles: Vec<Vec<bool>>,
    pub dihedrals: Vec<Vec<bool>>,
}

impl Consumed {
    pub fn new(ctx: &Context<'_>) -> Self {
        let sized = |f: fn(&ResidueTemplate) -> usize| {
            (0..ctx.residue_count())
                .map(|r| vec![false; ctx.template(r).map(f).unwrap_or(0)])
                .collect()
        };
        Self {
            angles: sized(|t| t.angles.len()),
            dihedrals: sized(|t| t.dihedrals.len()),
        }
    }
}
