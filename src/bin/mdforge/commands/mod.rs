mod kernel;
mod topology;

use kernel::run_kernel;
use topology::run_topology;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Topology(args) => run_topology(args, ctx),
        Command::Kernel(args) => run_kernel(args, ctx),
    }
}
