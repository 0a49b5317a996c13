use std::path::PathBuf;

use clap::{Args, Subcommand};

use super::enums::{EnvArg, ModeArg};

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble build plans and print them
    ///
    /// Shows which chunks exist, which modules are shared and which chunks
    /// every page references. Nothing is written to disk.
    Plan(PlanArgs),

    /// Assemble build plans and emit one HTML document per page
    Build(BuildArgs),

    /// Validate the configuration without planning
    Check(CheckArgs),
}

impl Command {
    /// Project arguments of commands that load a configuration.
    pub fn project(&self) -> Option<&ProjectArgs> {
        match self {
            Command::Plan(args) => Some(&args.project),
            Command::Build(args) => Some(&args.project),
            Command::Check(_) => None,
        }
    }
}

/// Arguments shared by `plan` and `build`
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Path to the config file
    ///
    /// Defaults to `folio.toml` in the project root, then the `folio` field of
    /// `package.json`.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root; relative paths in the config resolve against it
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Planning mode (overrides `mode` from the config)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Target environment; selects `[profiles.<env>]`
    #[arg(short, long, value_enum, default_value_t = EnvArg::Development)]
    pub env: EnvArg,

    /// Dependency graph manifest (`{ "modules": { "<id>": ["<dep>", ...] } }`)
    ///
    /// Without a graph every entry module is treated as a leaf, so no modules
    /// are shared between pages.
    #[arg(short, long, value_name = "FILE")]
    pub graph: Option<PathBuf>,
}

/// Arguments for the plan command
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Print the plan set as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the build command
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Output directory (overrides `build.out_dir`)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Also check that entry modules and templates exist on disk
    #[arg(long)]
    pub fs: bool,
}
