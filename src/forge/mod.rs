mod clean;
mod config;
mod context;
mod enumerate;
mod error;
mod exclusions;
mod graph;
mod lookup;
mod polarization;
mod residual;
mod templates;

pub use config::GeneratorConfig;
pub use error::Error;
pub use graph::{BondGraph, NeighborShells};
pub use templates::{ResidueTemplate, TemplateDatabase, TemplateDefaults, TemplateEntry};

use crate::model::system::System;
use crate::model::topology::{Exclusions, GeneratedTopology};
use context::{Consumed, Context};
use polarization::{AuxiliarySites, PolarizationRecords};

/// Bond hops needed to enumerate dihedrals and 1-4 pairs.
const DIHEDRAL_HOPS: usize = 3;

/// Generates angles, dihedrals, impropers, 1-4 pairs, and exclusions for a
/// molecule.
///
/// The graph walk derives every candidate term from the bonds; residue
/// templates, when given, supply parameter strings, extra terms, impropers,
/// and extra exclusions. The result is sorted and deduplicated.
///
/// # Errors
///
/// Fails on malformed systems, on unsupported exclusion radii, on template
/// atom names that cannot be resolved (unless
/// [`GeneratorConfig::allow_missing`] is set), and on polarizable atoms
/// without a Drude particle.
pub fn generate(
    system: &System,
    templates: Option<&TemplateDatabase>,
    config: &GeneratorConfig,
) -> Result<GeneratedTopology, Error> {
    config.validate()?;
    let graph = BondGraph::from_system(system)?;
    let shells = graph.shells(DIHEDRAL_HOPS.max(config.exclusion_hops));
    let ctx = Context::new(system, &graph, &shells, templates, config);

    let records = if config.polarizable {
        polarization::template_records(&ctx)?
    } else {
        PolarizationRecords::default()
    };
    let aux = if config.polarizable {
        AuxiliarySites::build(system, &graph, &records.virtual_sites)
    } else {
        AuxiliarySites::none(system.atom_count())
    };

    let mut extra = exclusions::template_exclusions(&ctx)?;

    let mut consumed = Consumed::new(&ctx);
    let mut walk = enumerate::walk(&ctx, &extra, &aux, &mut consumed)?;
    residual::add_unconsumed(&ctx, &mut consumed, &mut walk.angles, &mut walk.dihedrals)?;

    let mut impropers = residual::impropers(&ctx)?;
    clean::sort_impropers(&mut impropers);

    log::info!(
        "before cleaning: {} pairs, {} angles, {} dihedrals, {} impropers",
        walk.pairs.len(),
        walk.angles.len(),
        walk.dihedrals.len(),
        impropers.len()
    );

    let mut angles = walk.angles;
    clean::sort_angles(&mut angles);
    if config.polarizable {
        clean::drop_auxiliary_angles(&mut angles, &system.atoms);
    }

    let mut pairs = walk.pairs;
    clean::sort_pairs(&mut pairs);

    let mut dihedrals = walk.dihedrals;
    clean::sort_dihedrals(&mut dihedrals);
    let policy = clean::DihedralPolicy {
        keep_all_generated: config.keep_all_generated_dihedrals,
        remove_if_with_improper: config.remove_dihedral_if_with_improper,
    };
    let dihedrals = clean::clean_dihedrals(&dihedrals, &impropers, &system.atoms, &policy);

    let thole = if config.polarizable {
        polarization::thole_records(system, &graph, walk.thole)?
    } else {
        Vec::new()
    };

    exclusions::subtract_radius(&mut extra, &shells, config.exclusion_hops);
    let mut sets = exclusions::combine(&shells, config.exclusion_hops, &extra);
    if config.polarizable {
        let passes = exclusions::propagate(&mut sets, &aux);
        log::debug!("auxiliary exclusion propagation converged after {} passes", passes);
    }
    let exclusions = exclusions::finish(sets)?;

    log::info!(
        "generated {} pairs, {} angles, {} dihedrals, {} impropers, {} exclusions",
        pairs.len(),
        angles.len(),
        dihedrals.len(),
        impropers.len(),
        exclusions.len()
    );

    Ok(GeneratedTopology {
        exclusion_hops: config.exclusion_hops,
        angles,
        dihedrals,
        impropers,
        pairs,
        thole,
        polarization: records.polarization,
        aniso_polarization: records.aniso_polarization,
        virtual_sites: records.virtual_sites,
        extra_exclusions: Exclusions::from_lists(extra),
        exclusions,
    })
}
