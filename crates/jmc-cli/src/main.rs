use std::process::ExitCode;

use clap::Parser;
use jmc_cli::{logging, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let stdout = std::io::stdout();
    match jmc_cli::run(cli, &mut stdout.lock()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
