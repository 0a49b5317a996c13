//! Shared-mode assembly: one plan, one runtime, shared chunks.

use folio_config::{BuildMode, ConfigError, EnvConfig, Environment, FolioConfig, PageDescriptor};
use folio_graph::{ModuleGraph, ModuleId};
use folio_planner::{
    BuildPlan, ChunkKind, ChunkRule, PageEmissionAdapter, PlanAssembler, PlanError, PlanSet,
    UnifiedPlan,
};
use serde_json::{Value, json};

fn id(path: &str) -> ModuleId {
    ModuleId::new(path).unwrap()
}

/// `main.js` and `another.js` both import `shared.js` and react;
/// only `main.js` imports lodash.
fn demo_graph() -> ModuleGraph {
    let graph = ModuleGraph::new();
    graph.add_dependencies(
        id("main.js"),
        [
            id("shared.js"),
            id("node_modules/react/index.js"),
            id("node_modules/lodash/index.js"),
        ],
    );
    graph.add_dependencies(
        id("another.js"),
        [id("shared.js"), id("node_modules/react/index.js")],
    );
    graph
}

fn pages(extra: Value) -> Vec<PageDescriptor> {
    let mut value = json!({
        "pages": [
            { "title": "Demo", "entry": { "app": "main.js" } },
            { "title": "Another", "path": "another", "entry": { "another": "another.js" } }
        ]
    });
    folio_config::merge_values(&mut value, &extra);
    FolioConfig::from_value(value)
        .unwrap()
        .page_descriptors()
        .unwrap()
}

fn assemble(graph: &ModuleGraph, pages: &[PageDescriptor]) -> Result<PlanSet, PlanError> {
    PlanAssembler::new(graph).assemble(
        pages,
        &Default::default(),
        &EnvConfig::new(Environment::Production),
        BuildMode::Shared,
    )
}

fn unified(plans: &PlanSet) -> &UnifiedPlan {
    match &plans.plans[..] {
        [BuildPlan::Unified(plan)] => plan,
        other => panic!("expected one unified plan, got {other:?}"),
    }
}

#[test]
fn shared_mode_has_one_runtime_and_shared_chunks() {
    let graph = demo_graph();
    let pages = pages(Value::Null);
    let plans = assemble(&graph, &pages).unwrap();
    let plan = unified(&plans);

    assert_eq!(plans.runtime_chunk_count(), 1);

    let vendor = plan.chunk("vendor").unwrap();
    assert_eq!(vendor.kind, ChunkKind::Shared);
    assert!(vendor.modules.contains(&id("node_modules/react/index.js")));

    let common = plan.chunk("common").unwrap();
    assert!(common.modules.contains(&id("shared.js")));

    let requests = PageEmissionAdapter::requests(&plans);
    assert_eq!(
        requests[0].chunk_names(),
        vec!["runtime", "vendor", "common", "app"]
    );
    assert_eq!(
        requests[1].chunk_names(),
        vec!["runtime", "vendor", "common", "another"]
    );
    // One build: every document loads the same root-level files.
    assert_eq!(
        requests[1].chunk_paths(),
        vec!["runtime", "vendor", "common", "another"]
    );
    assert_eq!(requests[1].document_path, "another/index.html");
    assert_eq!(plans.manifests().len(), 2);
    assert!(
        plans
            .manifests()
            .values()
            .all(|m| m.path == "manifest.json")
    );
}

/// A node_modules package imported by a single page must stay in that page's
/// entry chunk even though it matches the vendor rule.
#[test]
fn single_page_vendor_module_is_not_shared() {
    let graph = demo_graph();
    let pages = pages(Value::Null);
    let plans = assemble(&graph, &pages).unwrap();
    let plan = unified(&plans);

    let lodash = id("node_modules/lodash/index.js");
    assert!(!plan.chunk("vendor").unwrap().modules.contains(&lodash));
    assert!(plan.chunk("app").unwrap().modules.contains(&lodash));
    assert!(!plan.chunk("another").unwrap().modules.contains(&lodash));
}

#[test]
fn entry_chunk_collision_names_both_pages() {
    let graph = demo_graph();
    let pages = pages(json!({
        "pages": [{ "title": "Other", "path": "other", "entry": { "app": "another.js" } }]
    }));

    let err = assemble(&graph, &pages).unwrap_err();
    match err {
        PlanError::Config(ConfigError::EntryCollision {
            chunk,
            first,
            second,
        }) => {
            assert_eq!(chunk, "app");
            assert_eq!(first.index, 0);
            assert_eq!(second.index, 2);
        }
        other => panic!("expected EntryCollision, got {other:?}"),
    }
}

#[test]
fn explicit_chunk_list_is_used_verbatim() {
    let graph = demo_graph();
    let mut pages = pages(Value::Null);
    pages[1].chunks = folio_config::ChunkSelection::Only(vec!["runtime".into(), "another".into()]);

    let plans = assemble(&graph, &pages).unwrap();
    let requests = PageEmissionAdapter::requests(&plans);
    assert_eq!(requests[1].chunk_names(), vec!["runtime", "another"]);
    assert_eq!(requests[1].chunks[0].kind, ChunkKind::Runtime);
}

#[test]
fn explicit_chunk_list_must_include_own_entry() {
    let graph = demo_graph();
    let mut pages = pages(Value::Null);
    pages[1].chunks = folio_config::ChunkSelection::Only(vec!["runtime".into(), "app".into()]);

    let err = assemble(&graph, &pages).unwrap_err();
    assert!(matches!(
        err,
        PlanError::Config(ConfigError::ChunksMissingEntry { ref chunk, .. }) if chunk == "another"
    ));
}

#[test]
fn explicit_chunk_list_rejects_unknown_chunks() {
    let graph = demo_graph();
    let mut pages = pages(Value::Null);
    pages[1].chunks =
        folio_config::ChunkSelection::Only(vec!["polyfills".into(), "another".into()]);

    let err = assemble(&graph, &pages).unwrap_err();
    assert!(matches!(
        err,
        PlanError::Config(ConfigError::UnknownChunk { ref chunk, .. }) if chunk == "polyfills"
    ));
}

#[test]
fn explicit_chunk_list_rejects_repeated_names() {
    let graph = demo_graph();
    let mut pages = pages(Value::Null);
    pages[1].chunks = folio_config::ChunkSelection::Only(vec![
        "runtime".into(),
        "another".into(),
        "another".into(),
    ]);

    let err = assemble(&graph, &pages).unwrap_err();
    assert_eq!(
        err.to_string(),
        "page 1 (\"Another\"): 'chunks' lists 'another' more than once"
    );
    assert!(matches!(
        err,
        PlanError::Config(ConfigError::DuplicateChunk { ref chunk, .. }) if chunk == "another"
    ));
}

#[test]
fn custom_rules_replace_defaults() {
    let graph = demo_graph();
    let pages = pages(Value::Null);

    let plans = PlanAssembler::new(&graph)
        .with_rules([ChunkRule::all_pages("everywhere")])
        .assemble(
            &pages,
            &Default::default(),
            &EnvConfig::new(Environment::Development),
            BuildMode::Shared,
        )
        .unwrap();
    let plan = unified(&plans);

    assert!(plan.chunk("vendor").is_none());
    let everywhere = plan.chunk("everywhere").unwrap();
    assert!(everywhere.modules.contains(&id("shared.js")));
    assert!(everywhere.modules.contains(&id("node_modules/react/index.js")));
}

#[test]
fn rule_threshold_below_two_is_rejected() {
    let graph = demo_graph();
    let pages = pages(Value::Null);

    let err = PlanAssembler::new(&graph)
        .with_rules([ChunkRule::common("common").min_pages(1)])
        .assemble(
            &pages,
            &Default::default(),
            &EnvConfig::new(Environment::Development),
            BuildMode::Shared,
        )
        .unwrap_err();
    assert!(matches!(err, PlanError::InvalidRule { .. }));
}

#[test]
fn shared_assembly_is_idempotent() {
    let graph = demo_graph();
    let pages = pages(Value::Null);
    assert_eq!(
        assemble(&graph, &pages).unwrap(),
        assemble(&graph, &pages).unwrap()
    );
}
