//! `folio build`: assemble plans, write chunk manifests and emit page documents.

use std::fs;
use std::path::Path;

use folio_planner::{BuildPlan, PageEmissionAdapter, PlanError, PlanSet};
use serde_json::{Value, json};

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::error::{Result, ResultExt};
use crate::html::HtmlEmitter;
use crate::ui;

pub fn execute(args: BuildArgs) -> Result<()> {
    let project = &args.project;
    let planned = utils::plan(project)?;

    let out_dir = args
        .out_dir
        .as_deref()
        .unwrap_or(&planned.options.out_dir);
    let out_dir = utils::resolve_path(&project.root, out_dir);
    tracing::debug!(out_dir = %out_dir.display(), "resolved output directory");

    fs::create_dir_all(&out_dir).with_path(&out_dir)?;
    let manifests = write_manifests(&planned.plans, &out_dir)?;

    let emitter = HtmlEmitter::new(&project.root, &out_dir).map_err(PlanError::from)?;
    let documents = PageEmissionAdapter::emit(&planned.plans, &emitter)?;

    for document in &documents {
        ui::info(&format!(
            "{} [{}]",
            document.path.display(),
            document.chunks.join(", ")
        ));
    }
    ui::success(&format!(
        "Wrote {} document(s) and {} manifest(s) to {}",
        documents.len(),
        manifests,
        out_dir.display()
    ));
    Ok(())
}

/// Write one chunk manifest per plan. Returns the number written.
fn write_manifests(plans: &PlanSet, out_dir: &Path) -> Result<usize> {
    for plan in plans {
        let (relative, manifest) = match plan {
            BuildPlan::Isolated(plan) => (&plan.manifest.path, isolated_manifest(plan)),
            BuildPlan::Unified(plan) => (&plan.manifest.path, unified_manifest(plan)),
        };

        let path = out_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(&manifest)?).with_path(&path)?;
        tracing::debug!(path = %path.display(), "wrote chunk manifest");
    }
    Ok(plans.len())
}

fn isolated_manifest(plan: &folio_planner::IsolatedPlan) -> Value {
    json!({
        "page": plan.page.output_path,
        "document": plan.page.document_path(),
        "chunks": plan.chunks,
        "entries": plan.entries,
    })
}

fn unified_manifest(plan: &folio_planner::UnifiedPlan) -> Value {
    let documents: serde_json::Map<String, Value> = plan
        .documents
        .iter()
        .map(|document| (document.page.document_path(), json!(document.chunks)))
        .collect();

    json!({
        "chunks": plan.chunks,
        "entries": plan.entries,
        "documents": documents,
    })
}
