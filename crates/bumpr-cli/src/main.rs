//! bumpr - npm dependency updates, audit fixes, and the pull request to
//! ship them.

use clap::Parser;

mod commands;
mod logging;
mod output;
mod services;

use commands::Cli;

fn main() {
    let cli = Cli::parse();

    output::set_quiet(cli.quiet);
    logging::init(cli.verbose, cli.quiet);

    if let Err(e) = commands::run::run(&cli) {
        output::error(&format!("{e:#}"));
        std::process::exit(commands::exit_code(&e));
    }
}
