//! Chunk rules: which shared modules go into which shared chunk.
//!
//! A [`ChunkRule`] pairs a chunk name with a [`SharePredicate`]. Rules are
//! tried in order and the first match claims the module. Every rule is also
//! gated on `usage_count >= min_pages` (at least 2), so a predicate can never
//! pull a module that only one page uses out of that page's entry chunk.
//!
//! ```
//! use folio_graph::ModuleId;
//! use folio_planner::{ChunkRule, ModuleContext};
//!
//! let vendor = ChunkRule::vendor("vendor", "node_modules");
//! let react = ModuleId::new("node_modules/react/index.js").unwrap();
//!
//! let used_once = ModuleContext { module: &react, usage_count: 1, page_count: 2 };
//! assert!(!vendor.matches(&used_once));
//!
//! let used_twice = ModuleContext { module: &react, usage_count: 2, page_count: 2 };
//! assert!(vendor.matches(&used_twice));
//! ```

use std::fmt;
use std::sync::Arc;

use folio_config::{BuildOptions, ChunkName};
use folio_graph::ModuleId;
use rustc_hash::FxHashSet;

use crate::error::{PlanError, Result};

/// Smallest sharing threshold a rule may use.
pub const MIN_SHARED_PAGES: usize = 2;

/// What a [`SharePredicate`] sees about a module.
#[derive(Debug, Clone, Copy)]
pub struct ModuleContext<'a> {
    pub module: &'a ModuleId,
    /// Number of distinct pages whose reachable set contains the module
    pub usage_count: usize,
    /// Number of pages in the build
    pub page_count: usize,
}

/// Pure decision function for a chunk rule.
pub type SharePredicate = Arc<dyn Fn(&ModuleContext<'_>) -> bool + Send + Sync>;

/// Built-in predicates.
pub mod predicates {
    use std::sync::Arc;

    use super::{ModuleContext, SharePredicate};

    /// Wrap a closure as a [`SharePredicate`].
    pub fn from_fn<F>(predicate: F) -> SharePredicate
    where
        F: Fn(&ModuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        Arc::new(predicate)
    }

    /// Module path has a segment equal to `marker` (e.g. `node_modules`).
    pub fn path_contains(marker: impl Into<String>) -> SharePredicate {
        let marker = marker.into();
        from_fn(move |ctx| ctx.module.has_segment(&marker))
    }

    /// Always true; the usage threshold alone decides.
    pub fn always() -> SharePredicate {
        from_fn(|_| true)
    }

    /// Module is reachable from every page.
    pub fn used_by_all_pages() -> SharePredicate {
        from_fn(|ctx| ctx.usage_count == ctx.page_count)
    }
}

/// A named shared chunk and the predicate selecting its modules.
#[derive(Clone)]
pub struct ChunkRule {
    name: ChunkName,
    predicate: SharePredicate,
    min_pages: usize,
}

impl ChunkRule {
    pub fn new(name: impl Into<ChunkName>, predicate: SharePredicate) -> Self {
        Self {
            name: name.into(),
            predicate,
            min_pages: MIN_SHARED_PAGES,
        }
    }

    /// Third-party modules: path contains the `marker` segment.
    pub fn vendor(name: impl Into<ChunkName>, marker: impl Into<String>) -> Self {
        Self::new(name, predicates::path_contains(marker))
    }

    /// Any module used by at least `min_pages` pages.
    pub fn common(name: impl Into<ChunkName>) -> Self {
        Self::new(name, predicates::always())
    }

    /// Modules every page uses.
    pub fn all_pages(name: impl Into<ChunkName>) -> Self {
        Self::new(name, predicates::used_by_all_pages())
    }

    /// Raise the sharing threshold. Values below 2 are rejected by [`validate_rules`].
    pub fn min_pages(mut self, min_pages: usize) -> Self {
        self.min_pages = min_pages;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> usize {
        self.min_pages
    }

    /// Usage gate and predicate combined.
    pub fn matches(&self, ctx: &ModuleContext<'_>) -> bool {
        ctx.usage_count >= self.min_pages.max(MIN_SHARED_PAGES) && (self.predicate)(ctx)
    }

    /// Rules derived from the build options: the vendor chunk, then the common
    /// chunk when one is configured.
    pub fn from_options(options: &BuildOptions) -> Vec<ChunkRule> {
        let mut rules = vec![
            ChunkRule::vendor(&options.vendor_chunk, &options.vendor_marker)
                .min_pages(options.min_shared_pages),
        ];
        if let Some(common) = &options.common_chunk {
            rules.push(ChunkRule::common(common).min_pages(options.min_shared_pages));
        }
        rules
    }
}

impl fmt::Debug for ChunkRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkRule")
            .field("name", &self.name)
            .field("min_pages", &self.min_pages)
            .finish_non_exhaustive()
    }
}

/// Check rule names and thresholds against the chunk names already in use.
///
/// `reserved` holds the runtime chunk and every entry chunk name.
pub fn validate_rules<'a, I>(rules: &[ChunkRule], reserved: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let reserved: FxHashSet<&str> = reserved.into_iter().collect();
    let mut seen = FxHashSet::default();

    for rule in rules {
        let invalid = |reason: String| PlanError::InvalidRule {
            rule: rule.name.clone(),
            reason,
        };

        if rule.name.trim().is_empty() {
            return Err(invalid("chunk name cannot be empty".to_string()));
        }
        if rule.min_pages < MIN_SHARED_PAGES {
            return Err(invalid(format!(
                "min_pages must be at least {MIN_SHARED_PAGES}, got {}",
                rule.min_pages
            )));
        }
        if reserved.contains(rule.name.as_str()) {
            return Err(invalid(
                "name is already used by the runtime or an entry chunk".to_string(),
            ));
        }
        if !seen.insert(rule.name.as_str()) {
            return Err(invalid("declared more than once".to_string()));
        }
    }

    Ok(())
}
