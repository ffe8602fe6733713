use super::context::{Consumed, Context};
use super::error::Error;
use crate::model::term::{Angle, Dihedral};

/// Adds template angles and dihedrals the graph walk never matched.
///
/// Their atom names are resolved directly against the residue the template
/// belongs to; entries naming missing atoms are skipped.
pub(crate) fn add_unconsumed(
    ctx: &Context<'_>,
    consumed: &mut Consumed,
    angles: &mut Vec<Angle>,
    dihedrals: &mut Vec<Dihedral>,
) -> Result<usize, Error> {
    let mut added = 0;
    for residue in 0..ctx.residue_count() {
        let Some(template) = ctx.template(residue) else {
            continue;
        };

        for (index, entry) in template.angles.iter().enumerate() {
            if consumed.angles[residue][index] {
                continue;
            }
            if let Some(atoms) = ctx.resolver.resolve_entry(&entry.atoms, residue, "angle", true)? {
                let mut angle = Angle::templated(atoms);
                entry.apply_to(&mut angle)?;
                angles.push(angle);
                consumed.angles[residue][index] = true;
                added += 1;
            }
        }

        for (index, entry) in template.dihedrals.iter().enumerate() {
            if consumed.dihedrals[residue][index] {
                continue;
            }
            if let Some(atoms) = ctx.resolver.resolve_entry(&entry.atoms, residue, "dihedral", true)? {
                let mut dihedral = Dihedral::templated(atoms);
                entry.apply_to(&mut dihedral)?;
                dihedrals.push(dihedral);
                consumed.dihedrals[residue][index] = true;
                added += 1;
            }
        }
    }
    if added > 0 {
        log::debug!("added {} template terms not reached by the bond graph", added);
    }
    Ok(added)
}

/// Resolves template impropers.
///
/// Missing atoms are an error unless the caller allows them.
pub(crate) fn impropers(ctx: &Context<'_>) -> Result<Vec<Dihedral>, Error> {
    let mut out = Vec::new();
    for residue in 0..ctx.residue_count() {
        let Some(template) = ctx.template(residue) else {
            continue;
        };
        for entry in &template.impropers {
            if let Some(atoms) =
                ctx.resolver
                    .resolve_entry(&entry.atoms, residue, "improper", ctx.config.allow_missing)?
            {
                let mut improper = Dihedral::templated(atoms);
                entry.apply_to(&mut improper)?;
                out.push(improper);
            }
        }
    }
    Ok(out)
}
