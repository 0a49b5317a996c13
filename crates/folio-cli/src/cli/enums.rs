use clap::ValueEnum;
use folio_config::{BuildMode, Environment};

/// Planning mode
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum ModeArg {
    /// One self-contained build per page
    ///
    /// Every page gets its own runtime and manifest. Nothing is shared.
    #[value(name = "isolated")]
    Isolated,

    /// One build for all pages
    ///
    /// Pages share a single runtime and the chunks of modules used by two or
    /// more pages.
    #[value(name = "shared")]
    Shared,
}

impl From<ModeArg> for BuildMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Isolated => BuildMode::Isolated,
            ModeArg::Shared => BuildMode::Shared,
        }
    }
}

/// Target environment
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum)]
pub enum EnvArg {
    /// Source maps on; applies `[profiles.development]`
    #[default]
    #[value(name = "development", alias = "dev")]
    Development,

    /// Minified, hashed file names; applies `[profiles.production]`
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<EnvArg> for Environment {
    fn from(env: EnvArg) -> Self {
        match env {
            EnvArg::Development => Environment::Development,
            EnvArg::Production => Environment::Production,
        }
    }
}
