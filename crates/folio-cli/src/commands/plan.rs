//! `folio plan`: assemble plans without emitting anything.

use crate::cli::PlanArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Print the assembled plans, as JSON with `--json` or as a summary table.
pub fn execute(args: PlanArgs) -> Result<()> {
    let planned = utils::plan(&args.project)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&planned.plans)?);
        return Ok(());
    }

    ui::print_plan_summary(&planned.plans);
    ui::success(&format!(
        "Planned {} page(s) in {} mode for {}",
        planned.config.pages.len(),
        planned.plans.mode,
        planned.plans.environment
    ));
    Ok(())
}
