#![cfg_attr(docsrs, feature(doc_cfg))]

//! # folio-planner
//!
//! Turns validated page descriptors into build plans for an external bundler.
//!
//! The planner decides which bundles exist, which modules are shared between
//! pages and which chunks each page's document references. It compiles nothing
//! and writes nothing: module reachability comes from a
//! [`DependencyGraph`](folio_graph::DependencyGraph) and documents are produced
//! by a [`DocumentEmitter`].
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_config::{BuildMode, BuildOptions, EnvConfig, Environment, FolioConfig};
//! use folio_graph::{ModuleGraph, ModuleId};
//! use folio_planner::{PageEmissionAdapter, PlanAssembler};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FolioConfig::from_value(json!({
//!     "pages": [
//!         { "title": "Demo", "entry": { "app": "main.js" } },
//!         { "title": "Another", "path": "another", "entry": { "another": "another.js" } }
//!     ]
//! }))?;
//! let pages = config.page_descriptors()?;
//!
//! let graph = ModuleGraph::new();
//! graph.add_dependency(ModuleId::new("main.js")?, ModuleId::new("shared.js")?);
//! graph.add_dependency(ModuleId::new("another.js")?, ModuleId::new("shared.js")?);
//!
//! let plans = PlanAssembler::new(&graph).assemble(
//!     &pages,
//!     &BuildOptions::default(),
//!     &EnvConfig::new(Environment::Production),
//!     BuildMode::Shared,
//! )?;
//!
//! let requests = PageEmissionAdapter::requests(&plans);
//! assert_eq!(requests[1].document_path, "another/index.html");
//! assert_eq!(requests[1].chunk_names(), vec!["runtime", "common", "another"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modes
//!
//! - [`BuildMode::Isolated`](folio_config::BuildMode::Isolated): one self-contained
//!   [`IsolatedPlan`] per page, planned in parallel, each with its own runtime and manifest.
//! - [`BuildMode::Shared`](folio_config::BuildMode::Shared): one [`UnifiedPlan`] with a
//!   single runtime, shared chunks chosen by the [`Classifier`] and a chunk allow-list per page.

pub mod assemble;
pub mod chunk;
pub mod classify;
pub mod emit;
pub mod error;
pub mod plan;
pub mod policy;


pub use assemble::PlanAssembler;
pub use chunk::{ChunkDescriptor, ChunkKind, ChunkRef};
pub use classify::{Classification, Classifier, PageReach};
pub use emit::{DocumentEmitter, DocumentRequest, EmittedDocument, PageEmissionAdapter};
pub use error::{EngineError, PlanError, Result};
pub use plan::{BuildPlan, IsolatedPlan, ManifestScope, PageDocument, PlanSet, UnifiedPlan};
pub use policy::{ChunkRule, ModuleContext, SharePredicate, predicates};
