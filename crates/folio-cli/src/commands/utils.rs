//! Config, graph and plan loading shared by the commands.

use std::path::{Path, PathBuf};

use folio_config::{
    BuildMode, BuildOptions, ConfigDiscovery, ConfigValidator, EnvConfig, Environment,
    FolioConfig, GlobalSettings, PageDescriptor, SchemaValidator, merge_layers,
};
use folio_graph::{GraphManifest, ModuleGraph, ModuleId};
use folio_planner::{PlanAssembler, PlanSet};

use crate::cli::ProjectArgs;
use crate::error::{CliError, Result};

/// A configuration resolved for one environment, with its plans.
pub struct Planned {
    pub config: FolioConfig,
    pub env: EnvConfig,
    /// Global options with the environment layer applied
    pub options: BuildOptions,
    pub plans: PlanSet,
}

/// Resolve `path` against the project root unless it is absolute.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Load the config file given with `--config`, or discover one under `root`.
pub fn load_config(root: &Path, config: Option<&Path>) -> Result<FolioConfig> {
    let discovery = ConfigDiscovery::new(root);
    let Some(path) = config else {
        return Ok(discovery.load()?);
    };

    let path = resolve_path(root, path);
    if !path.is_file() {
        return Err(CliError::FileNotFound(path));
    }
    Ok(discovery.load_from(&path)?)
}

/// Settings for logger setup. Any loading error is left for the command to report.
pub fn peek_settings(args: &ProjectArgs) -> Option<GlobalSettings> {
    let config = load_config(&args.root, args.config.as_deref()).ok()?;
    config.settings_for(args.env.into()).ok()
}

/// Load the graph manifest, or build a graph holding only the entry modules.
pub fn load_graph(root: &Path, manifest: Option<&Path>, pages: &[PageDescriptor]) -> Result<ModuleGraph> {
    if let Some(path) = manifest {
        let path = resolve_path(root, path);
        if !path.is_file() {
            return Err(CliError::FileNotFound(path));
        }
        return Ok(GraphManifest::from_path(&path)?.into_graph()?);
    }

    tracing::debug!("no graph manifest given; entry modules have no dependencies");
    let graph = ModuleGraph::new();
    for page in pages {
        for module in page.entry_modules() {
            graph.add_module(ModuleId::new(module).map_err(folio_graph::GraphError::from)?);
        }
    }
    Ok(graph)
}

/// Size rayon's global pool. Only the first call in a process has an effect.
fn configure_threads(jobs: Option<usize>) {
    let Some(jobs) = jobs.filter(|jobs| *jobs > 0) else {
        return;
    };
    if let Err(err) = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
    {
        tracing::debug!(%err, "rayon thread pool already initialized");
    }
}

/// Load, validate and plan a project.
pub fn plan(args: &ProjectArgs) -> Result<Planned> {
    let config = load_config(&args.root, args.config.as_deref())?;
    SchemaValidator.validate(&config)?;

    let environment = Environment::from(args.env);
    configure_threads(config.settings_for(environment)?.parallel_jobs);

    let pages = config.page_descriptors()?;
    let env = config.env_config(environment)?;
    let options = merge_layers(&config.build, &[&env.overlay])?;
    let mode = args
        .mode
        .map(BuildMode::from)
        .unwrap_or_else(|| config.mode_for(environment));

    let graph = load_graph(&args.root, args.graph.as_deref(), &pages)?;
    let plans = PlanAssembler::new(&graph).assemble(&pages, &config.build, &env, mode)?;

    Ok(Planned {
        config,
        env,
        options,
        plans,
    })
}
