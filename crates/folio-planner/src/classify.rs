//! Shared-module classification.
//!
//! Each page's reachable set is the union of the modules reachable from its
//! entries. A module's usage count is the number of distinct pages whose set
//! contains it. Modules are then offered, in sorted order, to the chunk rules;
//! the first matching rule claims the module. Modules no rule claims stay in
//! the entry chunks that reach them; when several entries of one page reach
//! the same module it lives in the first of them, in declaration order.
//!
//! The result is re-checked before it is returned: a shared chunk holding a
//! module used by fewer than two pages is an error, never silently repaired.

use std::collections::{BTreeMap, BTreeSet};

use folio_config::{ChunkName, PageDescriptor};
use folio_graph::{DependencyGraph, ModuleId};
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::chunk::{ChunkDescriptor, ChunkKind};
use crate::error::{PlanError, Result};
use crate::policy::{ChunkRule, MIN_SHARED_PAGES, ModuleContext, validate_rules};

/// Modules reachable from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageReach {
    /// Modules of each entry chunk, in declaration order. A module reached by
    /// several entries belongs to the first of them only.
    pub entries: IndexMap<ChunkName, BTreeSet<ModuleId>>,
    /// Union of all entry sets
    pub modules: BTreeSet<ModuleId>,
}

impl PageReach {
    /// Walk the graph from every entry module of `page`.
    pub fn collect(page: &PageDescriptor, graph: &dyn DependencyGraph) -> Result<Self> {
        let mut reach = PageReach::default();

        for (chunk, source) in &page.entry {
            let mut chunk_modules = BTreeSet::new();
            for module in source.modules() {
                let entry = ModuleId::new(module)?;
                chunk_modules.extend(graph.reachable_modules(&entry)?);
            }
            chunk_modules.retain(|module| !reach.modules.contains(module));
            reach.modules.extend(chunk_modules.iter().cloned());
            reach.entries.insert(chunk.clone(), chunk_modules);
        }

        trace!(
            page = %page.page_ref(),
            modules = reach.modules.len(),
            "collected page reach"
        );
        Ok(reach)
    }
}

/// Outcome of classifying a set of pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub page_count: usize,
    /// Usage count of every reachable module
    pub usage: BTreeMap<ModuleId, usize>,
    /// Non-empty shared chunks, in rule order
    pub shared: Vec<ChunkDescriptor>,
    /// Reachable modules of each page, aligned with the input pages
    pub pages: Vec<PageReach>,
}

impl Classification {
    pub fn usage_count(&self, module: &ModuleId) -> usize {
        self.usage.get(module).copied().unwrap_or(0)
    }

    /// The shared chunk holding `module`, if any.
    pub fn shared_chunk_of(&self, module: &ModuleId) -> Option<&ChunkDescriptor> {
        self.shared.iter().find(|chunk| chunk.modules.contains(module))
    }

    /// Names of the shared chunks page `index` reaches, in rule order.
    pub fn shared_chunks_for(&self, index: usize) -> Vec<ChunkName> {
        let Some(page) = self.pages.get(index) else {
            return Vec::new();
        };
        self.shared
            .iter()
            .filter(|chunk| chunk.modules.iter().any(|m| page.modules.contains(m)))
            .map(|chunk| chunk.name.clone())
            .collect()
    }

    /// Modules of one entry chunk once shared modules are moved out.
    pub fn entry_chunk_modules(&self, index: usize, chunk: &str) -> BTreeSet<ModuleId> {
        let Some(modules) = self.pages.get(index).and_then(|p| p.entries.get(chunk)) else {
            return BTreeSet::new();
        };
        modules
            .iter()
            .filter(|module| self.shared_chunk_of(module).is_none())
            .cloned()
            .collect()
    }

    /// Re-check that every shared module is used by at least two pages.
    pub fn verify(&self) -> Result<()> {
        for chunk in &self.shared {
            for module in &chunk.modules {
                let usage_count = self.usage_count(module);
                if usage_count < MIN_SHARED_PAGES {
                    return Err(PlanError::ClassificationInvariant {
                        chunk: chunk.name.clone(),
                        module: module.clone(),
                        usage_count,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Partitions shared modules into chunks with an ordered rule list.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'r> {
    rules: &'r [ChunkRule],
}

impl<'r> Classifier<'r> {
    pub fn new(rules: &'r [ChunkRule]) -> Self {
        Self { rules }
    }

    /// Compute page reach through `graph`, then classify.
    pub fn classify(
        &self,
        pages: &[PageDescriptor],
        graph: &dyn DependencyGraph,
    ) -> Result<Classification> {
        let reach = pages
            .par_iter()
            .map(|page| PageReach::collect(page, graph))
            .collect::<Result<Vec<_>>>()?;
        self.classify_reach(reach)
    }

    /// Classify pages whose reachable sets are already known.
    pub fn classify_reach(&self, pages: Vec<PageReach>) -> Result<Classification> {
        validate_rules(self.rules, std::iter::empty())?;

        let page_count = pages.len();
        let mut usage: BTreeMap<ModuleId, usize> = BTreeMap::new();
        for page in &pages {
            for module in &page.modules {
                *usage.entry(module.clone()).or_default() += 1;
            }
        }

        let mut members = vec![BTreeSet::new(); self.rules.len()];
        for (module, &usage_count) in &usage {
            let ctx = ModuleContext {
                module,
                usage_count,
                page_count,
            };
            if let Some(index) = self.rules.iter().position(|rule| rule.matches(&ctx)) {
                debug!(
                    module = %module,
                    usage_count,
                    chunk = self.rules[index].name(),
                    "module assigned to shared chunk"
                );
                members[index].insert(module.clone());
            }
        }

        let shared = self
            .rules
            .iter()
            .zip(members)
            .filter(|(_, modules)| !modules.is_empty())
            .map(|(rule, modules)| {
                ChunkDescriptor::new(rule.name(), ChunkKind::Shared).with_modules(modules)
            })
            .collect();

        let classification = Classification {
            page_count,
            usage,
            shared,
            pages,
        };
        classification.verify()?;
        Ok(classification)
    }
}
