//! Build plan assembly.
//!
//! Options are merged with page > environment > global precedence (lists are
//! concatenated, see [`folio_config::merge_layers`]). Every check runs before a
//! plan is produced, and any failure aborts the whole assembly.

use std::iter;

use folio_config::{
    BuildMode, BuildOptions, ChunkName, ChunkSelection, ConfigError, EnvConfig, PageDescriptor,
    merge_layers, validate_output_paths, validate_shared_entries,
};
use folio_graph::{DependencyGraph, ModuleId};
use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::chunk::{ChunkDescriptor, ChunkKind};
use crate::classify::{Classification, Classifier, PageReach};
use crate::error::Result;
use crate::plan::{BuildPlan, IsolatedPlan, ManifestScope, PageDocument, PlanSet, UnifiedPlan};
use crate::policy::{ChunkRule, validate_rules};

/// Assembles a [`PlanSet`] from page descriptors.
///
/// The assembler only reads the graph, so one instance can plan any number of
/// builds and the same input always yields an equal plan set.
pub struct PlanAssembler<'g> {
    graph: &'g dyn DependencyGraph,
    rules: Option<Vec<ChunkRule>>,
}

impl<'g> PlanAssembler<'g> {
    pub fn new(graph: &'g dyn DependencyGraph) -> Self {
        Self { graph, rules: None }
    }

    /// Replace the chunk rules derived from the build options
    /// (`vendor_chunk`, then `common_chunk`).
    pub fn with_rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = ChunkRule>,
    {
        self.rules = Some(rules.into_iter().collect());
        self
    }

    pub fn assemble(
        &self,
        pages: &[PageDescriptor],
        global: &BuildOptions,
        env: &EnvConfig,
        mode: BuildMode,
    ) -> Result<PlanSet> {
        if pages.is_empty() {
            return Err(ConfigError::NoPages.into());
        }
        validate_output_paths(pages)?;

        let plans = match mode {
            BuildMode::Isolated => self.assemble_isolated(pages, global, env)?,
            BuildMode::Shared => vec![BuildPlan::Unified(
                self.assemble_unified(pages, global, env)?,
            )],
        };

        let plan_set = PlanSet {
            mode,
            environment: env.environment,
            plans,
        };
        info!(
            %mode,
            environment = %env.environment,
            pages = pages.len(),
            plans = plan_set.len(),
            chunks = plan_set.iter().map(|plan| plan.chunks().len()).sum::<usize>(),
            "assembled build plans"
        );
        Ok(plan_set)
    }

    fn assemble_isolated(
        &self,
        pages: &[PageDescriptor],
        global: &BuildOptions,
        env: &EnvConfig,
    ) -> Result<Vec<BuildPlan>> {
        let parallel = merge_layers(global, &[&env.overlay])?.parallel;
        let plan_page = |page: &PageDescriptor| self.isolated_plan(page, global, env);

        if parallel {
            pages.par_iter().map(plan_page).collect()
        } else {
            pages.iter().map(plan_page).collect()
        }
    }

    fn isolated_plan(
        &self,
        page: &PageDescriptor,
        global: &BuildOptions,
        env: &EnvConfig,
    ) -> Result<BuildPlan> {
        let options = merge_layers(global, &[&env.overlay, &page.options])?;
        check_runtime_name(page, &options.runtime_chunk)?;

        if let ChunkSelection::Only(chunks) = &page.chunks {
            warn!(
                page = %page.page_ref(),
                ?chunks,
                "'chunks' has no effect in isolated mode; every chunk of the page is referenced"
            );
        }

        let reach = PageReach::collect(page, self.graph)?;
        let mut chunks = Vec::with_capacity(reach.entries.len() + 1);
        chunks.push(ChunkDescriptor::runtime(&options.runtime_chunk).scoped_to(&page.output_path));
        chunks.extend(reach.entries.into_iter().map(|(name, modules)| {
            ChunkDescriptor::new(name, ChunkKind::Entry)
                .with_modules(modules)
                .scoped_to(&page.output_path)
        }));

        debug!(
            page = %page.page_ref(),
            output_path = %page.output_path,
            chunks = chunks.len(),
            "planned isolated page"
        );

        Ok(BuildPlan::Isolated(IsolatedPlan {
            page: page.clone(),
            entries: entry_ids(page)?,
            chunks,
            selection: ChunkSelection::All,
            manifest: ManifestScope::for_key(&page.output_path),
            options,
        }))
    }

    fn assemble_unified(
        &self,
        pages: &[PageDescriptor],
        global: &BuildOptions,
        env: &EnvConfig,
    ) -> Result<UnifiedPlan> {
        validate_shared_entries(pages)?;

        let options = merge_layers(global, &[&env.overlay])?;
        let runtime = options.runtime_chunk.as_str();
        for page in pages {
            check_runtime_name(page, runtime)?;
            if !page.options.is_null() {
                warn!(
                    page = %page.page_ref(),
                    "page-level 'options' are ignored in shared mode"
                );
            }
        }

        let rules = match &self.rules {
            Some(rules) => rules.clone(),
            None => ChunkRule::from_options(&options),
        };
        validate_rules(
            &rules,
            iter::once(runtime).chain(pages.iter().flat_map(PageDescriptor::entry_chunk_names)),
        )?;

        let classification = Classifier::new(&rules).classify(pages, self.graph)?;

        let mut chunks = vec![ChunkDescriptor::runtime(runtime)];
        chunks.extend(classification.shared.iter().cloned());
        let mut entries = IndexMap::new();
        for (index, page) in pages.iter().enumerate() {
            for name in page.entry_chunk_names() {
                chunks.push(
                    ChunkDescriptor::new(name, ChunkKind::Entry)
                        .with_modules(classification.entry_chunk_modules(index, name)),
                );
            }
            entries.extend(entry_ids(page)?);
        }

        let documents = pages
            .iter()
            .enumerate()
            .map(|(index, page)| page_document(index, page, &classification, runtime))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            shared = classification.shared.len(),
            modules = classification.usage.len(),
            "classified shared modules"
        );

        Ok(UnifiedPlan {
            entries,
            chunks,
            documents,
            manifest: ManifestScope::root(),
            options,
        })
    }
}

/// Chunk allow-list of one page in a unified plan.
///
/// Without an explicit list: the runtime, the shared chunks the page reaches,
/// then its own entries. An explicit list may only name the runtime, emitted
/// shared chunks and the page's own entries, must include those entries and
/// may not repeat a name.
fn page_document(
    index: usize,
    page: &PageDescriptor,
    classification: &Classification,
    runtime: &str,
) -> Result<PageDocument> {
    let chunks = match &page.chunks {
        ChunkSelection::All => iter::once(runtime.to_string())
            .chain(classification.shared_chunks_for(index))
            .chain(page.entry_chunk_names().map(str::to_string))
            .collect(),
        ChunkSelection::Only(list) => {
            let mut seen = FxHashSet::default();
            if let Some(chunk) = list.iter().find(|name| !seen.insert(name.as_str())) {
                return Err(ConfigError::DuplicateChunk {
                    page: page.page_ref(),
                    chunk: chunk.clone(),
                }
                .into());
            }

            if let Some(chunk) = page
                .entry_chunk_names()
                .find(|entry| !list.iter().any(|name| name == entry))
            {
                return Err(ConfigError::ChunksMissingEntry {
                    page: page.page_ref(),
                    chunk: chunk.to_string(),
                }
                .into());
            }

            let known: FxHashSet<&str> = iter::once(runtime)
                .chain(classification.shared.iter().map(|chunk| chunk.name.as_str()))
                .chain(page.entry_chunk_names())
                .collect();
            if let Some(chunk) = list.iter().find(|name| !known.contains(name.as_str())) {
                return Err(ConfigError::UnknownChunk {
                    page: page.page_ref(),
                    chunk: chunk.clone(),
                }
                .into());
            }

            list.clone()
        }
    };

    debug!(page = %page.page_ref(), ?chunks, "resolved page chunks");
    Ok(PageDocument {
        page: page.clone(),
        chunks,
    })
}

fn check_runtime_name(page: &PageDescriptor, runtime: &str) -> Result<()> {
    if page.entry_chunk_names().any(|name| name == runtime) {
        return Err(ConfigError::invalid_value(
            "entry",
            format!(
                "{}: entry chunk '{runtime}' clashes with the runtime chunk",
                page.page_ref()
            ),
        )
        .into());
    }
    Ok(())
}

fn entry_ids(page: &PageDescriptor) -> Result<IndexMap<ChunkName, Vec<ModuleId>>> {
    page.entry
        .iter()
        .map(|(chunk, source)| -> Result<(ChunkName, Vec<ModuleId>)> {
            let modules = source
                .modules()
                .into_iter()
                .map(ModuleId::new)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok((chunk.clone(), modules))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_config::{Environment, PageDefaults, PageOptions};
    use folio_graph::ModuleGraph;

    fn pages(options: &[PageOptions]) -> Vec<PageDescriptor> {
        options
            .iter()
            .enumerate()
            .map(|(i, o)| PageDescriptor::from_options(i, o, PageDefaults::default()).unwrap())
            .collect()
    }

    fn graph(edges: &[(&str, &str)]) -> ModuleGraph {
        let graph = ModuleGraph::new();
        for (from, to) in edges {
            graph.add_dependency(ModuleId::new(from).unwrap(), ModuleId::new(to).unwrap());
        }
        graph
    }

    #[test]
    fn empty_page_list_is_rejected() {
        let graph = ModuleGraph::new();
        let err = PlanAssembler::new(&graph)
            .assemble(
                &[],
                &BuildOptions::default(),
                &EnvConfig::new(Environment::Development),
                BuildMode::Isolated,
            )
            .unwrap_err();
        assert!(matches!(err, crate::PlanError::Config(ConfigError::NoPages)));
    }

    #[test]
    fn entry_named_like_runtime_is_rejected() {
        let graph = graph(&[("main.js", "util.js")]);
        let pages = pages(&[PageOptions::new("Demo").entry("runtime", "main.js")]);
        let err = PlanAssembler::new(&graph)
            .assemble(
                &pages,
                &BuildOptions::default(),
                &EnvConfig::new(Environment::Development),
                BuildMode::Isolated,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            crate::PlanError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn sequential_and_parallel_isolated_plans_match() {
        let graph = graph(&[("a.js", "shared.js"), ("b.js", "shared.js"), ("c.js", "c2.js")]);
        let pages = pages(&[
            PageOptions::new("A").path("a").entry("a", "a.js"),
            PageOptions::new("B").path("b").entry("b", "b.js"),
            PageOptions::new("C").path("c").entry("c", "c.js"),
        ]);
        let env = EnvConfig::new(Environment::Production);
        let assembler = PlanAssembler::new(&graph);

        let parallel = BuildOptions::default();
        let sequential = BuildOptions {
            parallel: false,
            ..BuildOptions::default()
        };

        let a = assembler
            .assemble(&pages, &parallel, &env, BuildMode::Isolated)
            .unwrap();
        let b = assembler
            .assemble(&pages, &sequential, &env, BuildMode::Isolated)
            .unwrap();

        let chunks = |set: &PlanSet| -> Vec<Vec<ChunkDescriptor>> {
            set.iter().map(|plan| plan.chunks().to_vec()).collect()
        };
        assert_eq!(chunks(&a), chunks(&b));
        assert_eq!(a.manifests(), b.manifests());
    }
}
