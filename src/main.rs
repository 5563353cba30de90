use clap::Parser;
use log::*;
use std::process;

use local_tests::{LocalTestsError, Result, cli, command};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("local_tests")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    match command::local_tests::execute(&cli_args) {
        Ok(()) => Ok(()),
        // hand the failing suite's exit code straight back to CI
        Err(err @ LocalTestsError::CommandFailed { .. }) => {
            error!("{err}");
            process::exit(err.exit_code());
        }
        Err(err) => Err(err.into()),
    }
}
