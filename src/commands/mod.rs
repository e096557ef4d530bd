mod cut;
mod info;
mod preview;
mod utils;
mod wand;

use cutout::CutoutResult;

use crate::cli::{Cli, Commands, GlobalOptions};

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> CutoutResult<()> {
    let Cli { global, command } = cli;
    dispatch(&global, command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(global: &GlobalOptions, command: Commands) -> CutoutResult<()> {
    match command {
        Commands::Cut(cmd) => cut::run(global, cmd),
        Commands::Wand(cmd) => wand::run(cmd),
        Commands::Preview(cmd) => preview::run(global, cmd),
        Commands::Info(cmd) => info::run(global, cmd),
    }
}
