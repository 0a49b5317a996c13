//! Command-line interface definition for Folio.
//!
//! # Command Structure
//!
//! - `folio plan` - Assemble build plans and print them
//! - `folio build` - Assemble build plans and emit page documents
//! - `folio check` - Validate the configuration

mod commands;
pub mod enums;

use clap::Parser;

pub use commands::{BuildArgs, CheckArgs, Command, PlanArgs, ProjectArgs};
pub use enums::{EnvArg, ModeArg};

/// Folio - multi-page build orchestrator
#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version,
    about = "Plan multi-page builds with shared chunks",
    long_about = "Folio turns a set of page definitions into build plans for a bundler.\n\
                  Each page gets its own HTML document; in shared mode pages share one\n\
                  runtime and the chunks of modules they have in common."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows per-page and per-chunk planning decisions.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    ///
    /// Outputs plain text without ANSI color codes. Useful for logging to
    /// files or systems that don't support colored terminal output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_plan_with_overrides() {
        let cli = Cli::try_parse_from([
            "folio", "plan", "--mode", "shared", "--env", "prod", "--json", "--root", "site",
        ])
        .unwrap();

        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        assert_eq!(args.project.mode, Some(ModeArg::Shared));
        assert_eq!(args.project.env, EnvArg::Production);
        assert!(args.json);
        assert_eq!(args.project.root, std::path::PathBuf::from("site"));
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["folio", "-v", "-q", "check"]).is_err());
    }

    #[test]
    fn build_defaults() {
        let cli = Cli::try_parse_from(["folio", "build"]).unwrap();
        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(args.project.env, EnvArg::Development);
        assert!(args.out_dir.is_none());
        assert!(args.project.mode.is_none());
    }
}
