use super::error::Error;
use crate::model::system::System;
use std::ops::Range;

/// Resolves template atom names to atom indices.
///
/// Names are interpreted relative to a residue: a bare name lives in that
/// residue, `-NAME` in the previous one and `+NAME` in the next one.
pub(crate) struct AtomResolver<'a> {
    system: &'a System,
    ranges: Vec<Range<usize>>,
}

impl<'a> AtomResolver<'a> {
    pub fn new(system: &'a System) -> Self {
        let ranges = (0..system.residue_count())
            .map(|r| system.residue_atoms(r))
            .collect();
        Self { system, ranges }
    }

    pub fn residue_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn resolve(&self, name: &str, residue: usize) -> Option<usize> {
        let (target, bare) = if let Some(rest) = name.strip_prefix('-') {
            (residue.checked_sub(1)?, rest)
        } else if let Some(rest) = name.strip_prefix('+') {
            (residue + 1, rest)
        } else {
            (residue, name)
        };
        self.ranges
            .get(target)?
            .clone()
            .find(|&a| self.system.atoms[a].name == bare)
    }

    /// Resolves every name of a template entry.
    ///
    /// Returns `Ok(None)` when a name is missing and `allow_missing` is set;
    /// otherwise a missing name is an [`Error::UnresolvedAtom`].
    pub fn resolve_entry<const N: usize>(
        &self,
        names: &[String],
        residue: usize,
        context: &str,
        allow_missing: bool,
    ) -> Result<Option<[usize; N]>, Error> {
        let mut atoms = [0; N];
        for (slot, name) in atoms.iter_mut().zip(names) {
            match self.resolve(name, residue) {
                Some(index) => *slot = index,
                None if allow_missing => {
                    log::debug!(
                        "skipping {} {:?}: atom {} not found in residue {}",
                        context,
                        names,
                        name,
                        self.describe(residue)
                    );
                    return Ok(None);
                }
                None => {
                    let res = &self.system.residues[residue];
                    return Err(Error::unresolved_atom(name, &res.name, res.number, context));
                }
            }
        }
        Ok(Some(atoms))
    }

    /// Name of `atom` as written in the template of `residue`.
    pub fn relative_name(&self, atom: usize, residue: usize) -> String {
        let a = &self.system.atoms[atom];
        match a.residue.cmp(&residue) {
            std::cmp::Ordering::Less => format!("-{}", a.name),
            std::cmp::Ordering::Greater => format!("+{}", a.name),
            std::cmp::Ordering::Equal => a.name.clone(),
        }
    }

    fn describe(&self, residue: usize) -> String {
        let res = &self.system.residues[residue];
        format!("{} {}", res.name, res.number)
    }
}
