//! Page emission: turning plans into document requests for an external emitter.

use std::path::PathBuf;

use folio_config::{BuildMode, ChunkName, ChunkSelection, PageDescriptor, PageKey, TemplateRef};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::chunk::{ChunkDescriptor, ChunkKind, ChunkRef};
use crate::error::{EngineError, Result};
use crate::plan::{BuildPlan, PlanSet};

/// Everything an emitter needs to produce one page document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRequest {
    pub page: PageKey,
    pub title: String,
    pub output_path: PageKey,
    /// `output_path/<filename>`, relative to the build root
    pub document_path: String,
    pub template: TemplateRef,
    pub lang: Option<String>,
    pub meta: IndexMap<String, String>,
    /// URL prefix for chunk files
    pub public_path: String,
    /// Chunks to reference, in load order
    pub chunks: Vec<ChunkRef>,
}

impl DocumentRequest {
    fn new(page: &PageDescriptor, public_path: &str, chunks: Vec<ChunkRef>) -> Self {
        Self {
            page: page.output_path.clone(),
            title: page.title.clone(),
            output_path: page.output_path.clone(),
            document_path: page.document_path(),
            template: page.template.clone(),
            lang: page.lang.clone(),
            meta: page.meta.clone(),
            public_path: public_path.to_string(),
            chunks,
        }
    }

    pub fn chunk_names(&self) -> Vec<&str> {
        self.chunks.iter().map(|chunk| chunk.name.as_str()).collect()
    }

    /// Chunk file stems, relative to the build root, in load order.
    pub fn chunk_paths(&self) -> Vec<&str> {
        self.chunks.iter().map(|chunk| chunk.path.as_str()).collect()
    }
}

/// Result of emitting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedDocument {
    pub page: PageKey,
    /// Where the document was written
    pub path: PathBuf,
    pub chunks: Vec<ChunkName>,
}

/// External document producer (HTML templating plus file writing).
pub trait DocumentEmitter: Send + Sync {
    fn emit(&self, request: &DocumentRequest) -> std::result::Result<EmittedDocument, EngineError>;
}

/// Feeds plan output to a [`DocumentEmitter`].
pub struct PageEmissionAdapter;

impl PageEmissionAdapter {
    /// One request per page, in page order. Pure.
    pub fn requests(plans: &PlanSet) -> Vec<DocumentRequest> {
        plans
            .iter()
            .flat_map(|plan| -> Vec<DocumentRequest> {
                match plan {
                    BuildPlan::Isolated(plan) => {
                        let chunks = match &plan.selection {
                            ChunkSelection::All => {
                                plan.chunks.iter().map(ChunkDescriptor::to_ref).collect()
                            }
                            ChunkSelection::Only(names) => resolve(&plan.chunks, names),
                        };
                        vec![DocumentRequest::new(
                            &plan.page,
                            &plan.options.public_path,
                            chunks,
                        )]
                    }
                    BuildPlan::Unified(plan) => plan
                        .documents
                        .iter()
                        .map(|document| {
                            DocumentRequest::new(
                                &document.page,
                                &plan.options.public_path,
                                resolve(&plan.chunks, &document.chunks),
                            )
                        })
                        .collect(),
                }
            })
            .collect()
    }

    /// Emit every page document.
    ///
    /// Isolated documents are independent and emitted in parallel; a shared
    /// build is emitted in one sequential pass. The first emitter failure is
    /// returned unchanged and nothing is retried.
    pub fn emit(plans: &PlanSet, emitter: &dyn DocumentEmitter) -> Result<Vec<EmittedDocument>> {
        let requests = Self::requests(plans);
        let emit_one = |request: &DocumentRequest| {
            debug!(page = %request.page, document = %request.document_path, "emitting document");
            emitter.emit(request)
        };

        let emitted = match plans.mode {
            BuildMode::Isolated => requests
                .par_iter()
                .map(emit_one)
                .collect::<std::result::Result<Vec<_>, _>>()?,
            BuildMode::Shared => requests
                .iter()
                .map(emit_one)
                .collect::<std::result::Result<Vec<_>, _>>()?,
        };

        info!(documents = emitted.len(), "emitted page documents");
        Ok(emitted)
    }
}

/// Look up an allow-list in the chunk table. Names not in the table are
/// treated as root-level entry chunks.
fn resolve(table: &[ChunkDescriptor], names: &[ChunkName]) -> Vec<ChunkRef> {
    names
        .iter()
        .map(|name| {
            table
                .iter()
                .find(|chunk| &chunk.name == name)
                .map_or_else(
                    || ChunkDescriptor::new(name.clone(), ChunkKind::Entry).to_ref(),
                    ChunkDescriptor::to_ref,
                )
        })
        .collect()
}
