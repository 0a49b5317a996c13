//! Human-readable plan summaries.

use console::style;
use folio_planner::{BuildPlan, ChunkDescriptor, PageEmissionAdapter, PlanSet};

/// Print a plan set to stderr: chunk table, then the chunks each page loads.
pub fn print_plan_summary(plans: &PlanSet) {
    eprintln!();
    eprintln!(
        "{} {} plan(s), {} mode, {}",
        style("Plan").bold(),
        plans.len(),
        plans.mode,
        plans.environment
    );

    for plan in plans.iter() {
        match plan {
            BuildPlan::Isolated(plan) => {
                eprintln!();
                eprintln!(
                    "  {} {}  manifest: {}",
                    style("page").dim(),
                    style(plan.page.output_path.to_string()).cyan(),
                    plan.manifest.path
                );
                print_chunks(&plan.chunks);
            }
            BuildPlan::Unified(plan) => {
                eprintln!();
                eprintln!(
                    "  {} all pages  manifest: {}",
                    style("chunks").dim(),
                    plan.manifest.path
                );
                print_chunks(&plan.chunks);
            }
        }
    }

    eprintln!();
    eprintln!("{}", style("Documents").bold());
    for request in PageEmissionAdapter::requests(plans) {
        eprintln!(
            "  {:<32} {}",
            style(&request.document_path).cyan(),
            request.chunk_names().join(", ")
        );
    }
}

fn print_chunks(chunks: &[ChunkDescriptor]) {
    for chunk in chunks {
        eprintln!(
            "    {:<20} {:<8} {} module(s)",
            chunk.name,
            style(chunk.kind.to_string()).dim(),
            chunk.modules.len()
        );
    }
}
