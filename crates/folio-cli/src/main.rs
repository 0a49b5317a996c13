//! Folio CLI - plan and emit multi-page builds.
//!
//! Entry point: argument parsing, logging initialization and command dispatch.

use clap::Parser;
use folio_cli::{cli, commands, error, logger, ui};
use miette::Result;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = cli::Cli::parse();

    // Settings from the config file only pick the default log level, so a
    // broken config is reported by the command itself, not here.
    let settings = args
        .command
        .project()
        .and_then(commands::utils::peek_settings)
        .unwrap_or_default();

    logger::init_logger(args.verbose, args.quiet, args.no_color, &settings);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Plan(plan_args) => commands::plan_execute(plan_args),
        cli::Command::Build(build_args) => commands::build_execute(build_args),
        cli::Command::Check(check_args) => commands::check_execute(check_args),
    };

    // Convert CLI errors to miette diagnostics for error reporting
    result.map_err(error::cli_error_to_miette)
}
