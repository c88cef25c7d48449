//! BLAKE2s hashing CLI

mod cli;

use crate::cli::Cli;
use ab_cli_utils::{init_logger, set_exit_on_panic};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    set_exit_on_panic();
    init_logger();

    Cli::parse().run()?;

    Ok(())
}
