use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "mdforge",
    about = "Bonded-term generation and non-bonded kernel runs for MD topologies",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug; RUST_LOG overrides)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate angles, dihedrals, pairs and exclusions for a molecule
    #[command(visible_alias = "t")]
    Topology(TopologyArgs),

    /// Run the pairwise non-bonded kernel on a synthetic periodic lattice
    #[command(visible_alias = "k")]
    Kernel(KernelArgs),
}

impl Command {
    pub fn quiet(&self) -> bool {
        match self {
            Command::Topology(args) => args.io.quiet,
            Command::Kernel(args) => args.quiet,
        }
    }
}

/// I/O options for the topology command.
#[derive(Args)]
pub struct IoOptions {
    /// Molecule TOML file (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Topology sections output (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Term generation options; unset flags fall back to template defaults.
#[derive(Args)]
#[command(next_help_heading = "Term Generation")]
pub struct GenerationOptions {
    /// Bond-hop radius of default exclusions (1 to 3)
    #[arg(long = "nrexcl", value_name = "HOPS")]
    pub exclusion_hops: Option<usize>,

    /// Keep every generated dihedral instead of one per central bond
    #[arg(long)]
    pub keep_all_dihedrals: bool,

    /// Keep generated dihedrals whose central bond carries an improper
    #[arg(long)]
    pub keep_dihedrals_with_impropers: bool,

    /// Skip 1-4 pairs between two hydrogens
    #[arg(long)]
    pub no_hh14_pairs: bool,

    /// Skip template entries naming atoms that do not exist
    #[arg(long)]
    pub allow_missing: bool,

    /// Treat Drude particles and lone pairs as a polarizable model
    #[arg(long)]
    pub polarizable: bool,
}

/// Function types written in the `funct` column.
#[derive(Args)]
#[command(next_help_heading = "Function Types")]
pub struct FunctionOptions {
    /// Function type of 1-4 pairs
    #[arg(long = "pair-funct", value_name = "N", default_value = "1")]
    pub pair: u8,

    /// Function type of angles
    #[arg(long = "angle-funct", value_name = "N", default_value = "5")]
    pub angle: u8,

    /// Function type of proper dihedrals
    #[arg(long = "dihedral-funct", value_name = "N", default_value = "9")]
    pub dihedral: u8,

    /// Function type of improper dihedrals
    #[arg(long = "improper-funct", value_name = "N", default_value = "2")]
    pub improper: u8,
}

#[derive(Args)]
pub struct TopologyArgs {
    #[command(flatten)]
    pub io: IoOptions,

    /// Residue template database (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub templates: Option<PathBuf>,

    #[command(flatten)]
    pub generation: GenerationOptions,

    #[command(flatten)]
    pub functions: FunctionOptions,
}

#[derive(Args)]
pub struct KernelArgs {
    /// Lattice sites per box edge
    #[arg(long, value_name = "N", default_value = "8")]
    pub sites: usize,

    /// Lattice spacing (nm)
    #[arg(long, value_name = "NM", default_value = "0.31")]
    pub spacing: f32,

    /// Pair search cutoff (nm)
    #[arg(long, value_name = "NM", default_value = "1.0")]
    pub cutoff: f32,

    /// Seed for site jitter and charges
    #[arg(long, default_value = "1")]
    pub seed: u64,

    /// Electrostatic interaction
    #[arg(long, value_name = "KIND", default_value = "coulomb")]
    pub elec: ElecChoice,

    /// Van der Waals interaction
    #[arg(long, value_name = "KIND", default_value = "table")]
    pub vdw: VdwChoice,

    /// Reaction-field dielectric constant
    #[arg(long, value_name = "EPS", default_value = "78.0")]
    pub epsilon_rf: f32,

    /// Interaction table points per nm
    #[arg(long, value_name = "N", default_value = "500.0")]
    pub table_scale: f64,

    /// Compute forces only
    #[arg(long)]
    pub forces_only: bool,

    /// Evaluate on the rayon thread pool
    #[arg(long)]
    pub parallel: bool,

    /// Repeat the evaluation this many times
    #[arg(long, value_name = "N", default_value = "1")]
    pub repeat: usize,

    /// Compare forces and energies against the double-precision reference
    #[arg(long)]
    pub validate: bool,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ElecChoice {
    None,
    Coulomb,
    #[value(name = "rf")]
    ReactionField,
    Table,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum VdwChoice {
    None,
    Lj,
    Table,
}

pub fn parse() -> Cli {
    Cli::parse()
}
