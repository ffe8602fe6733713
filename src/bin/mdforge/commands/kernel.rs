use std::time::Instant;

use anyhow::{Context, Result, ensure};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use md_forge::kernel::reference;
use md_forge::kernel::{
    ElecKind, EnergyMode, InteractionKinds, InteractionTable, KernelInputs, KernelOutput,
    NeighborList, NeighborLists, PairSearch, PairwiseKernel, ParticleParams, TableFormat, VdwKind,
    shift_vectors,
};

use crate::cli::{ElecChoice, KernelArgs, VdwChoice};
use crate::display::{Context as DisplayContext, Progress, print_kernel_report};
use crate::util::text::group_digits;

const TOTAL_STEPS: u8 = 3;

/// Per-type `(c6, c12)`: an oxygen-like site and a van der Waals-free site.
const LJ_TYPES: [(f32, f32); 2] = [(2.617e-3, 2.634e-6), (0.0, 0.0)];

/// Relative force deviation above which validation warns.
const FORCE_TOLERANCE: f64 = 1e-3;

struct Lattice {
    positions: Vec<[f32; 3]>,
    params: ParticleParams,
    box_length: f32,
}

pub fn run_kernel(args: KernelArgs, ctx: DisplayContext) -> Result<()> {
    ensure!(args.sites > 0, "--sites must be at least 1");
    ensure!(
        args.spacing.is_finite() && args.spacing > 0.0,
        "--spacing must be a positive length"
    );
    ensure!(args.repeat > 0, "--repeat must be at least 1");

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Building lattice and pair lists");
    let lattice = build_lattice(&args)?;
    let lists = PairSearch::new(args.cutoff, Some(lattice.box_length))
        .run(&lattice.positions, &lattice.params, None)
        .context("Pair search failed")?;
    progress.complete_step(
        "Building lattice and pair lists",
        &[
            format!(
                "{} particles in a {:.3} nm box",
                lattice.positions.len(),
                lattice.box_length
            ),
            format!(
                "{} pairs with vdW, {} Coulomb-only",
                group_digits(lists.vdw.pair_count() as u64),
                group_digits(lists.coulomb.pair_count() as u64)
            ),
        ],
    );

    progress.step("Evaluating pair kernel");
    let kinds = interaction_kinds(&args);
    let table = build_table(&args, kinds)?;
    let passes = kernel_passes(kinds, table.as_ref(), &lists)?;
    let shifts = shift_vectors(Some(lattice.box_length));
    let inputs = KernelInputs {
        positions: &lattice.positions,
        shift_vectors: &shifts,
        params: &lattice.params,
    };
    let n_groups = lattice.params.n_groups();
    let mut out = KernelOutput::new(lattice.positions.len(), shifts.len(), n_groups);

    let start = Instant::now();
    for _ in 0..args.repeat {
        out.clear();
        for (kernel, list) in &passes {
            if args.parallel {
                kernel.evaluate_parallel(list, &inputs, &mut out)?;
            } else {
                kernel.evaluate(list, &inputs, &mut out)?;
            }
        }
    }
    let elapsed = start.elapsed().as_secs_f64() / args.repeat as f64;
    log::info!(
        "{} pass(es) of {} outer lists, {:.3} ms per evaluation",
        passes.len(),
        lists.vdw.len() + lists.coulomb.len(),
        elapsed * 1e3
    );
    progress.complete_step(
        "Evaluating pair kernel",
        &[
            format!(
                "{} + {} ({})",
                kinds.elec.label(),
                kinds.vdw.label(),
                if args.parallel { "rayon" } else { "serial" }
            ),
            format!("{} evaluation(s)", args.repeat),
        ],
    );

    progress.step("Validating against reference");
    let deviation = if args.validate {
        Some(validate(&passes, &inputs, n_groups)?)
    } else {
        None
    };
    let validate_step = match deviation {
        Some(dev) => format!("max relative force deviation {:.2e}", dev),
        None => "Skipped (pass --validate)".to_string(),
    };
    progress.complete_step("Validating against reference", &[validate_step]);

    let mut rows = vec![
        ("Particles", lattice.positions.len().to_string()),
        ("Elec energy", format!("{:.4} kJ/mol", out.total_elec())),
        ("vdW energy", format!("{:.4} kJ/mol", out.total_vdw())),
        ("Flops", group_digits(out.flops)),
        ("Time", format!("{:.3} ms", elapsed * 1e3)),
        (
            "Throughput",
            format!("{:.2} GFlop/s", out.flops as f64 / elapsed.max(1e-12) * 1e-9),
        ),
    ];
    if let Some(dev) = deviation {
        rows.push(("Force deviation", format!("{:.2e}", dev)));
    }
    let net = out.net_force();
    rows.push((
        "Net force",
        format!("{:.1e} {:.1e} {:.1e}", net[0], net[1], net[2]),
    ));

    if ctx.interactive {
        print_kernel_report("Kernel Report", &rows);
    } else {
        for (key, val) in &rows {
            println!("{:<16} {}", key, val);
        }
    }

    progress.finish("Kernel run complete");
    Ok(())
}

fn build_lattice(args: &KernelArgs) -> Result<Lattice> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let n = args.sites;
    let jitter = 0.1 * args.spacing;

    let mut positions = Vec::with_capacity(n * n * n);
    let mut charges = Vec::with_capacity(n * n * n);
    let mut types = Vec::with_capacity(n * n * n);
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                let site = [x, y, z]
                    .map(|k| (k as f32 + 0.5) * args.spacing + rng.gen_range(-jitter..jitter));
                positions.push(site);
                let sign = if (x + y + z) % 2 == 0 { 1.0 } else { -1.0 };
                charges.push(sign * rng.gen_range(0.2..0.8));
                types.push(usize::from((x + 2 * y + 3 * z) % 3 == 0));
            }
        }
    }

    let groups = types.clone();
    let params = ParticleParams::geometric(charges, types, &LJ_TYPES)?.with_groups(groups)?;
    Ok(Lattice {
        positions,
        params,
        box_length: n as f32 * args.spacing,
    })
}

fn interaction_kinds(args: &KernelArgs) -> InteractionKinds {
    let elec = match args.elec {
        ElecChoice::None => ElecKind::None,
        ElecChoice::Coulomb => ElecKind::Coulomb,
        ElecChoice::ReactionField => {
            let rc = args.cutoff;
            let eps = args.epsilon_rf;
            let k_rf = (eps - 1.0) / ((2.0 * eps + 1.0) * rc * rc * rc);
            ElecKind::ReactionField {
                k_rf,
                c_rf: 1.0 / rc + k_rf * rc * rc,
            }
        }
        ElecChoice::Table => ElecKind::CubicSplineTable,
    };
    let vdw = match args.vdw {
        VdwChoice::None => VdwKind::None,
        VdwChoice::Lj => VdwKind::LennardJones,
        VdwChoice::Table => VdwKind::CubicSplineTable,
    };
    let mode = if args.forces_only {
        EnergyMode::Force
    } else {
        EnergyMode::PotentialAndForce
    };
    InteractionKinds::new(elec, vdw, mode)
}

fn build_table(args: &KernelArgs, kinds: InteractionKinds) -> Result<Option<InteractionTable>> {
    let format = match (kinds.elec.uses_table(), kinds.vdw.uses_table()) {
        (true, true) => TableFormat::CoulombVdw,
        (true, false) => TableFormat::Coulomb,
        (false, true) => TableFormat::Vdw,
        (false, false) => return Ok(None),
    };
    let table = InteractionTable::tabulate(format, args.table_scale, f64::from(args.cutoff))
        .context("Failed to tabulate interactions")?;
    log::debug!(
        "{:?} table: {} knots at {} per nm",
        format,
        table.n_knots(),
        table.scale()
    );
    Ok(Some(table))
}

/// Kernels paired with the lists they run on. Coulomb-only lists run with
/// van der Waals switched off, and are skipped when there is no
/// electrostatics.
fn kernel_passes<'a>(
    kinds: InteractionKinds,
    table: Option<&'a InteractionTable>,
    lists: &'a NeighborLists,
) -> Result<Vec<(PairwiseKernel<'a>, &'a NeighborList)>> {
    let mut passes = vec![(PairwiseKernel::new(kinds, table)?, &lists.vdw)];
    if !kinds.elec.is_none() && !lists.coulomb.is_empty() {
        passes.push((PairwiseKernel::new(kinds.without_vdw(), table)?, &lists.coulomb));
    }
    Ok(passes)
}

fn validate(
    passes: &[(PairwiseKernel<'_>, &NeighborList)],
    inputs: &KernelInputs<'_>,
    n_groups: usize,
) -> Result<f64> {
    let mut worst = 0.0_f64;
    for (kernel, list) in passes {
        let mut out = KernelOutput::new(inputs.positions.len(), inputs.shift_vectors.len(), n_groups);
        kernel.evaluate(list, inputs, &mut out)?;
        let expected = reference::evaluate(kernel, list, inputs)?;

        let deviation = expected.max_force_deviation(&out);
        if deviation > FORCE_TOLERANCE {
            log::warn!(
                "{} + {} forces deviate from the reference by {:.2e}",
                kernel.kinds().elec.label(),
                kernel.kinds().vdw.label(),
                deviation
            );
        }
        if kernel.kinds().mode.energies() {
            log::info!(
                "energies: elec {:.6} vs {:.6}, vdW {:.6} vs {:.6}",
                out.total_elec(),
                expected.total_elec(),
                out.total_vdw(),
                expected.total_vdw()
            );
        }
        worst = worst.max(deviation);
    }
    Ok(worst)
}
