//! Residue template database.
//!
//! Templates override or supplement what the graph walk derives: each residue
//! lists angles, proper and improper dihedrals, extra exclusions, and the
//! polarization and virtual-site records used by polarizable models, all as
//! tuples of atom names with an optional parameter string. A leading `-` or
//! `+` on an atom name refers to the previous or next residue.
//!
//! The database is read from TOML:
//!
//! ```toml
//! [defaults]
//! exclusion_hops = 3
//!
//! [residues.ALA]
//! angles = [{ atoms = ["N", "CA", "C"], params = "ang_N_CA_C" }]
//! dihedrals = [{ atoms = ["-C", "N", "CA", "C"] }]
//! ```

use super::error::Error;
use crate::model::term::{BondedTerm, MAX_FORCE_PARAMS, TermOrigin};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateDatabase {
    #[serde(default)]
    pub defaults: TemplateDefaults,
    #[serde(default)]
    pub residues: HashMap<String, ResidueTemplate>,
}

/// Force-field wide generation defaults carried with a template database.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDefaults {
    #[serde(default = "default_exclusion_hops")]
    pub exclusion_hops: usize,
    #[serde(default = "default_generate_hh14_pairs")]
    pub generate_hh14_pairs: bool,
    #[serde(default = "default_remove_dihedral_if_with_improper")]
    pub remove_dihedral_if_with_improper: bool,
    #[serde(default)]
    pub keep_all_generated_dihedrals: bool,
}

fn default_exclusion_hops() -> usize {
    3
}
fn default_generate_hh14_pairs() -> bool {
    true
}
fn default_remove_dihedral_if_with_improper() -> bool {
    true
}

impl Default for TemplateDefaults {
    fn default() -> Self {
        Self {
            exclusion_hops: default_exclusion_hops(),
            generate_hh14_pairs: default_generate_hh14_pairs(),
            remove_dihedral_if_with_improper: default_remove_dihedral_if_with_improper(),
            keep_all_generated_dihedrals: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResidueTemplate {
    #[serde(default)]
    pub angles: Vec<TemplateEntry>,
    #[serde(default)]
    pub dihedrals: Vec<TemplateEntry>,
    #[serde(default)]
    pub impropers: Vec<TemplateEntry>,
    #[serde(default)]
    pub exclusions: Vec<TemplateEntry>,
    #[serde(default)]
    pub polarization: Vec<TemplateEntry>,
    #[serde(default)]
    pub aniso_polarization: Vec<TemplateEntry>,
    #[serde(default)]
    pub virtual_sites: Vec<TemplateEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateEntry {
    pub atoms: Vec<String>,
    #[serde(default)]
    pub params: Option<String>,
}

impl TemplateEntry {
    pub fn new<const N: usize>(atoms: [&str; N], params: Option<&str>) -> Self {
        Self {
            atoms: atoms.iter().map(|a| a.to_string()).collect(),
            params: params.map(str::to_string),
        }
    }

    /// Whether `names` matches this entry forward or reversed.
    pub fn matches(&self, names: &[String]) -> bool {
        self.atoms.len() == names.len()
            && (self.atoms.iter().eq(names.iter()) || self.atoms.iter().eq(names.iter().rev()))
    }

    /// Marks `term` as template-sourced and copies this entry's parameters.
    ///
    /// A purely numeric parameter string also fills the coefficient list.
    pub fn apply_to<const N: usize>(&self, term: &mut BondedTerm<N>) -> Result<(), Error> {
        term.origin = TermOrigin::Template;
        if let Some(params) = &self.params {
            term.coefficients = parse_coefficients(params)?;
            term.source = Some(params.clone());
        }
        Ok(())
    }
}

fn parse_coefficients(params: &str) -> Result<Option<Vec<f64>>, Error> {
    let values: Option<Vec<f64>> = params
        .split_whitespace()
        .map(|token| token.parse().ok())
        .collect();
    match values {
        Some(values) if values.len() > MAX_FORCE_PARAMS => Err(Error::TooManyParameters {
            params: params.to_string(),
            max: MAX_FORCE_PARAMS,
        }),
        Some(values) if !values.is_empty() => Ok(Some(values)),
        _ => Ok(None),
    }
}

impl TemplateDatabase {
    /// Parses and validates a template database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateParse`] for malformed TOML and
    /// [`Error::InvalidTemplate`] if an entry has the wrong number of atoms
    /// for its section.
    pub fn from_toml(source: &str) -> Result<Self, Error> {
        let db: TemplateDatabase = toml::from_str(source)?;
        for (name, template) in &db.residues {
            template.validate(name)?;
        }
        Ok(db)
    }

    pub fn residue(&self, name: &str) -> Option<&ResidueTemplate> {
        self.residues.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, template: ResidueTemplate) {
        self.residues.insert(name.into(), template);
    }
}

impl ResidueTemplate {
    fn validate(&self, residue: &str) -> Result<(), Error> {
        let sections: [(&str, &[TemplateEntry], usize); 7] = [
            ("angles", &self.angles, 3),
            ("dihedrals", &self.dihedrals, 4),
            ("impropers", &self.impropers, 4),
            ("exclusions", &self.exclusions, 2),
            ("polarization", &self.polarization, 2),
            ("aniso_polarization", &self.aniso_polarization, 5),
            ("virtual_sites", &self.virtual_sites, 4),
        ];
        for (section, entries, arity) in sections {
            if let Some(entry) = entries.iter().find(|e| e.atoms.len() != arity) {
                return Err(Error::InvalidTemplate {
                    residue: residue.to_string(),
                    detail: format!(
                        "{} entry {:?} has {} atoms, expected {}",
                        section,
                        entry.atoms,
                        entry.atoms.len(),
                        arity
                    ),
                });
            }
        }
        Ok(())
    }
}
