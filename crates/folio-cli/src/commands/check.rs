//! `folio check`: validate the configuration without planning.

use folio_config::{ConfigValidator, Environment, FsValidator, SchemaValidator};

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Validate the config and every environment profile.
///
/// With `--fs`, entry modules and template files must also exist under the root.
pub fn execute(args: CheckArgs) -> Result<()> {
    let config = utils::load_config(&args.root, args.config.as_deref())?;

    if args.fs {
        FsValidator::new(&args.root).validate(&config)?;
    } else {
        SchemaValidator.validate(&config)?;
    }

    for environment in [Environment::Development, Environment::Production] {
        let resolved = config.materialize(environment)?;
        tracing::debug!(
            %environment,
            mode = %resolved.mode,
            out_dir = %resolved.build.out_dir.display(),
            "profile resolves"
        );
    }

    ui::success(&format!(
        "Configuration is valid ({} page(s))",
        config.pages.len()
    ));
    Ok(())
}
