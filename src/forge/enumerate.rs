//! Graph walk producing candidate angles, proper dihedrals, and 1-4 pairs.
//!
//! Every two-hop path `i-j-k` is visited once (emitted when `i < k`) and
//! every three-hop path `i-j-k-l` once (emitted when `j < k`). Each candidate
//! is looked up in the templates of the lowest and highest residue it spans,
//! matching atom names forward or reversed.

use super::context::{Consumed, Context};
use super::error::Error;
use super::polarization::AuxiliarySites;
use crate::model::term::{Angle, Dihedral, Pair};

/// Raw, unsorted output of the walk.
#[derive(Debug, Default)]
pub(crate) struct Walk {
    pub angles: Vec<Angle>,
    pub dihedrals: Vec<Dihedral>,
    pub pairs: Vec<Pair>,
    /// 1-2 and 1-3 pairs of polarizable atoms, `(low, high)`, deduplicated later.
    pub thole: Vec<(usize, usize)>,
}

pub(crate) fn walk(
    ctx: &Context<'_>,
    template_exclusions: &[Vec<usize>],
    aux: &AuxiliarySites,
    consumed: &mut Consumed,
) -> Result<Walk, Error> {
    let mut out = Walk::default();
    let polarizable = ctx.config.polarizable;

    for i in 0..ctx.atom_count() {
        for &j in ctx.graph.neighbors(i) {
            if polarizable && i < j {
                push_thole_candidate(ctx, &mut out.thole, i, j);
            }

            for &k in ctx.graph.neighbors(j) {
                if k == i {
                    continue;
                }

                if i < k {
                    out.angles.push(lookup_angle(ctx, [i, j, k], consumed)?);
                    if polarizable {
                        push_thole_candidate(ctx, &mut out.thole, i, k);
                    }
                }

                if j < k {
                    for &l in ctx.graph.neighbors(k) {
                        if l == i || l == j {
                            continue;
                        }
                        lookup_dihedrals(ctx, [i, j, k, l], consumed, &mut out.dihedrals)?;
                        push_pairs(ctx, template_exclusions, aux, i, l, &mut out.pairs);
                    }
                }
            }
        }
    }

    Ok(out)
}

fn lookup_angle(ctx: &Context<'_>, atoms: [usize; 3], consumed: &mut Consumed) -> Result<Angle, Error> {
    let mut angle = Angle::generated(atoms);
    for residue in ctx.spanned_residues(&atoms) {
        let Some(template) = ctx.template(residue) else {
            continue;
        };
        let names = ctx.relative_names(&atoms, residue);
        for (index, entry) in template.angles.iter().enumerate() {
            if entry.matches(&names) {
                entry.apply_to(&mut angle)?;
                consumed.angles[residue][index] = true;
            }
        }
    }
    Ok(angle)
}

fn lookup_dihedrals(
    ctx: &Context<'_>,
    atoms: [usize; 4],
    consumed: &mut Consumed,
    out: &mut Vec<Dihedral>,
) -> Result<(), Error> {
    let mut found = 0;
    for residue in ctx.spanned_residues(&atoms) {
        let Some(template) = ctx.template(residue) else {
            continue;
        };
        let names = ctx.relative_names(&atoms, residue);
        for (index, entry) in template.dihedrals.iter().enumerate() {
            if entry.matches(&names) {
                let mut dihedral = Dihedral::templated(atoms);
                entry.apply_to(&mut dihedral)?;
                out.push(dihedral);
                consumed.dihedrals[residue][index] = true;
                found += 1;
            }
        }
    }
    if found == 0 {
        out.push(Dihedral::generated(atoms));
    }
    Ok(())
}

fn push_pairs(
    ctx: &Context<'_>,
    template_exclusions: &[Vec<usize>],
    aux: &AuxiliarySites,
    i: usize,
    l: usize,
    out: &mut Vec<Pair>,
) {
    if ctx.shells.distance(i, l) != Some(3) {
        return;
    }
    let (a, b) = (i.min(l), i.max(l));
    if template_exclusions[a].binary_search(&b).is_ok() {
        return;
    }
    let atoms = &ctx.system.atoms;
    if !ctx.config.generate_hh14_pairs && atoms[a].is_hydrogen() && atoms[b].is_hydrogen() {
        return;
    }
    if !atoms[a].is_real() || !atoms[b].is_real() {
        return;
    }

    out.push(Pair::generated([a, b]));
    if ctx.config.polarizable {
        for x in aux.group(a) {
            for y in aux.group(b) {
                if (x, y) != (a, b) {
                    out.push(Pair::generated([x.min(y), x.max(y)]));
                }
            }
        }
    }
}

fn push_thole_candidate(ctx: &Context<'_>, out: &mut Vec<(usize, usize)>, a: usize, b: usize) {
    let atoms = &ctx.system.atoms;
    let polarizable = |x: usize| atoms[x].is_real() && atoms[x].active_polarizability().is_some();
    if polarizable(a) && polarizable(b) {
        out.push((a.min(b), a.max(b)));
    }
}
