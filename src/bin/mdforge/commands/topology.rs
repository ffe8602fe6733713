use std::io::Write;

use anyhow::{Context, Result, bail};

use md_forge::io::{molecule, top};
use md_forge::{GeneratorConfig, TemplateDatabase, generate};

use crate::cli::{FunctionOptions, GenerationOptions, TopologyArgs};
use crate::display::{Context as DisplayContext, Progress, print_molecule_info, print_term_counts};
use crate::io::{create_output, open_input, read_text, stdin_is_tty};

const TOTAL_STEPS: u8 = 3;

pub fn run_topology(args: TopologyArgs, ctx: DisplayContext) -> Result<()> {
    if args.io.input.is_none() && stdin_is_tty() {
        bail!(
            "No molecule file specified and stdin is a terminal.\n\nUsage: mdforge topology -i <MOLECULE.toml> or pipe data via stdin."
        );
    }

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading molecule");
    let reader = open_input(args.io.input.as_deref())?;
    let system = molecule::read(reader).context("Failed to read molecule")?;
    let templates = match &args.templates {
        Some(path) => {
            let text = read_text(path)?;
            let db = TemplateDatabase::from_toml(&text)
                .with_context(|| format!("Failed to load templates from {}", path.display()))?;
            Some(db)
        }
        None => None,
    };
    let mut read_substeps = vec![format!(
        "{} atoms, {} bonds",
        system.atom_count(),
        system.bond_count()
    )];
    if let Some(db) = &templates {
        read_substeps.push(format!("{} residue templates", db.residues.len()));
    }
    progress.complete_step("Reading molecule", &read_substeps);

    if ctx.interactive {
        print_molecule_info(&system);
    }

    progress.step("Generating bonded terms");
    let config = build_config(templates.as_ref(), &args.generation);
    log::info!("generator configuration: {:?}", config);
    let topology = generate(&system, templates.as_ref(), &config)
        .context("Bonded-term generation failed")?;
    progress.complete_step("Generating bonded terms", &describe_config(&config));

    if ctx.interactive {
        print_term_counts(&topology);
    }

    progress.step("Writing topology sections");
    let mut output = create_output(args.io.output.as_deref())?;
    top::write(&mut output, &system, &topology, &function_types(&args.functions))
        .context("Failed to write topology")?;
    output.flush().context("Failed to flush topology output")?;
    let target = args
        .io
        .output
        .as_ref()
        .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
    progress.complete_step("Writing topology sections", &[format!("Wrote {}", target)]);

    progress.finish("Topology complete");
    Ok(())
}

fn build_config(templates: Option<&TemplateDatabase>, opts: &GenerationOptions) -> GeneratorConfig {
    let mut config = templates
        .map(|db| GeneratorConfig::from_defaults(&db.defaults))
        .unwrap_or_default();
    if let Some(hops) = opts.exclusion_hops {
        config.exclusion_hops = hops;
    }
    if opts.keep_all_dihedrals {
        config.keep_all_generated_dihedrals = true;
    }
    if opts.keep_dihedrals_with_impropers {
        config.remove_dihedral_if_with_improper = false;
    }
    if opts.no_hh14_pairs {
        config.generate_hh14_pairs = false;
    }
    config.allow_missing = opts.allow_missing;
    config.polarizable = opts.polarizable;
    config
}

fn describe_config(config: &GeneratorConfig) -> Vec<String> {
    let mut steps = vec![format!("Exclusions within {} bonds", config.exclusion_hops)];
    steps.push(if config.keep_all_generated_dihedrals {
        "All generated dihedrals kept".to_string()
    } else {
        "One dihedral per central bond".to_string()
    });
    if config.polarizable {
        steps.push("Drude and lone-pair exclusions propagated".to_string());
    }
    if config.allow_missing {
        steps.push("Unresolved template atoms skipped".to_string());
    }
    steps
}

fn function_types(opts: &FunctionOptions) -> top::FunctionTypes {
    top::FunctionTypes {
        pair: opts.pair,
        angle: opts.angle,
        dihedral: opts.dihedral,
        improper: opts.improper,
        ..Default::default()
    }
}
