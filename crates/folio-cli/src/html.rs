//! Reference [`DocumentEmitter`]: renders page documents with minijinja and
//! writes them under the output directory.
//!
//! Templates see these variables:
//!
//! | name      | value                                              |
//! |-----------|----------------------------------------------------|
//! | `title`   | page title                                         |
//! | `lang`    | `lang` attribute (default `en`)                    |
//! | `meta`    | list of `(name, content)` pairs                    |
//! | `styles`  | stylesheet URLs, in chunk order                    |
//! | `scripts` | script URLs, in chunk order                        |
//! | `chunks`  | `{ name, kind }` of every referenced chunk         |
//! | `page`    | output path of the page (empty for the root page)  |
//!
//! A chunk maps to `<public_path><path>.js`, where `path` is the chunk's file
//! stem from the plan (`app` in a shared build, `another/app` for an isolated
//! page at `another`). A stylesheet link is added when the bundler already
//! wrote `<path>.css` into the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use folio_config::TemplateRef;
use folio_planner::{DocumentEmitter, DocumentRequest, EmittedDocument, EngineError};
use minijinja::{AutoEscape, Environment, Value, context};

const BUILTIN_TEMPLATE: &str = "folio/page.html";
const DEFAULT_LANG: &str = "en";

const BUILTIN_SOURCE: &str = r#"<!DOCTYPE html>
<html lang="{{ lang }}">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
{%- for name, content in meta %}
    <meta name="{{ name }}" content="{{ content }}">
{%- endfor %}
    <title>{{ title }}</title>
{%- for href in styles %}
    <link rel="stylesheet" href="{{ href }}">
{%- endfor %}
  </head>
  <body>
    <div id="root"></div>
{%- for src in scripts %}
    <script defer src="{{ src }}"></script>
{%- endfor %}
  </body>
</html>
"#;

pub struct HtmlEmitter {
    root: PathBuf,
    out_dir: PathBuf,
    env: Environment<'static>,
}

impl HtmlEmitter {
    /// `root` resolves template paths; documents are written under `out_dir`.
    pub fn new(root: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Result<Self, EngineError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template(BUILTIN_TEMPLATE, BUILTIN_SOURCE)
            .map_err(EngineError::new)?;

        Ok(Self {
            root: root.as_ref().to_path_buf(),
            out_dir: out_dir.as_ref().to_path_buf(),
            env,
        })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Render a document without writing it.
    pub fn render(&self, request: &DocumentRequest) -> Result<String, EngineError> {
        let public_path = normalize_public_path(&request.public_path);
        // URLs come from the build options and chunk names; `/` must survive unescaped.
        let scripts: Vec<Value> = request
            .chunks
            .iter()
            .map(|chunk| Value::from_safe_string(format!("{public_path}{}.js", chunk.path)))
            .collect();
        let styles: Vec<Value> = request
            .chunks
            .iter()
            .filter(|chunk| self.out_dir.join(format!("{}.css", chunk.path)).is_file())
            .map(|chunk| Value::from_safe_string(format!("{public_path}{}.css", chunk.path)))
            .collect();
        let meta: Vec<(&str, &str)> = request
            .meta
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str()))
            .collect();

        let ctx = context! {
            title => &request.title,
            lang => request.lang.as_deref().unwrap_or(DEFAULT_LANG),
            meta => meta,
            styles => styles,
            scripts => scripts,
            chunks => &request.chunks,
            page => request.page.as_str(),
        };

        let rendered = match &request.template {
            TemplateRef::BuiltIn => self
                .env
                .get_template(BUILTIN_TEMPLATE)
                .and_then(|template| template.render(ctx)),
            TemplateRef::Path(path) => {
                let path = self.root.join(path);
                let source = fs::read_to_string(&path).map_err(|err| {
                    EngineError::msg(format!(
                        "failed to read template {}: {err}",
                        path.display()
                    ))
                })?;
                self.env
                    .render_named_str(&path.to_string_lossy(), &source, ctx)
            }
        };
        rendered.map_err(EngineError::new)
    }
}

impl DocumentEmitter for HtmlEmitter {
    fn emit(&self, request: &DocumentRequest) -> Result<EmittedDocument, EngineError> {
        let html = self.render(request)?;
        let path = self.out_dir.join(&request.document_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, html)?;

        tracing::debug!(path = %path.display(), "wrote document");
        Ok(EmittedDocument {
            page: request.page.clone(),
            path,
            chunks: request.chunks.iter().map(|chunk| chunk.name.clone()).collect(),
        })
    }
}

fn normalize_public_path(public_path: &str) -> String {
    if public_path.is_empty() || public_path.ends_with('/') {
        public_path.to_string()
    } else {
        format!("{public_path}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_config::PageKey;
    use folio_planner::{ChunkKind, ChunkRef};
    use indexmap::IndexMap;
    use tempfile::TempDir;

    fn request(template: TemplateRef) -> DocumentRequest {
        let page: PageKey = serde_json::from_str("\"another\"").unwrap();
        DocumentRequest {
            page: page.clone(),
            title: "Another <page>".into(),
            output_path: page,
            document_path: "another/index.html".into(),
            template,
            lang: None,
            meta: IndexMap::from([("description".to_string(), "Second page".to_string())]),
            public_path: "/static".into(),
            chunks: vec![
                ChunkRef {
                    name: "runtime".into(),
                    kind: ChunkKind::Runtime,
                    path: "another/runtime".into(),
                },
                ChunkRef {
                    name: "another".into(),
                    kind: ChunkKind::Entry,
                    path: "another/another".into(),
                },
            ],
        }
    }

    #[test]
    fn builtin_template_references_chunks_in_order() {
        let dir = TempDir::new().unwrap();
        let emitter = HtmlEmitter::new(dir.path(), dir.path().join("dist")).unwrap();

        let html = emitter.render(&request(TemplateRef::BuiltIn)).unwrap();
        let runtime = html.find(r#"src="/static/another/runtime.js""#).unwrap();
        let entry = html.find(r#"src="/static/another/another.js""#).unwrap();
        assert!(runtime < entry);
        assert!(html.contains(r#"<html lang="en">"#));
        assert!(html.contains(r#"<meta name="description" content="Second page">"#));
        assert!(html.contains("<title>Another &lt;page&gt;</title>"));
    }

    #[test]
    fn existing_css_is_linked() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("dist");
        fs::create_dir_all(out_dir.join("another")).unwrap();
        fs::write(out_dir.join("another/another.css"), "body {}").unwrap();

        let emitter = HtmlEmitter::new(dir.path(), &out_dir).unwrap();
        let html = emitter.render(&request(TemplateRef::BuiltIn)).unwrap();
        assert!(html.contains(r#"<link rel="stylesheet" href="/static/another/another.css">"#));
        assert!(!html.contains("runtime.css"));
    }

    #[test]
    fn custom_template_is_rendered_from_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(
            dir.path().join("templates/page.html"),
            "<h1>{{ title }}</h1>{% for src in scripts %}[{{ src }}]{% endfor %}",
        )
        .unwrap();

        let emitter = HtmlEmitter::new(dir.path(), dir.path().join("dist")).unwrap();
        let html = emitter
            .render(&request(TemplateRef::Path("templates/page.html".into())))
            .unwrap();
        assert_eq!(
            html,
            "<h1>Another &lt;page&gt;</h1>[/static/another/runtime.js][/static/another/another.js]"
        );
    }

    #[test]
    fn isolated_pages_with_the_same_entry_load_their_own_files() {
        use folio_config::{BuildMode, EnvConfig, Environment, FolioConfig};
        use folio_graph::{ModuleGraph, ModuleId};
        use folio_planner::{PageEmissionAdapter, PlanAssembler};

        let config = FolioConfig::from_value(serde_json::json!({
            "pages": [
                { "title": "Demo", "entry": { "app": "main.js" } },
                { "title": "Another", "path": "another", "entry": { "app": "another.js" } }
            ]
        }))
        .unwrap();
        let graph = ModuleGraph::new();
        graph.add_module(ModuleId::new("main.js").unwrap());
        graph.add_module(ModuleId::new("another.js").unwrap());
        let plans = PlanAssembler::new(&graph)
            .assemble(
                &config.page_descriptors().unwrap(),
                &config.build,
                &EnvConfig::new(Environment::Development),
                BuildMode::Isolated,
            )
            .unwrap();

        let dir = TempDir::new().unwrap();
        let emitter = HtmlEmitter::new(dir.path(), dir.path().join("dist")).unwrap();
        let requests = PageEmissionAdapter::requests(&plans);
        let index = emitter.render(&requests[0]).unwrap();
        let another = emitter.render(&requests[1]).unwrap();

        assert!(index.contains(r#"src="/runtime.js""#));
        assert!(index.contains(r#"src="/app.js""#));
        assert!(another.contains(r#"src="/another/runtime.js""#));
        assert!(another.contains(r#"src="/another/app.js""#));
        assert!(!another.contains(r#"src="/app.js""#));
    }

    #[test]
    fn missing_template_is_an_engine_error() {
        let dir = TempDir::new().unwrap();
        let emitter = HtmlEmitter::new(dir.path(), dir.path().join("dist")).unwrap();
        let err = emitter
            .render(&request(TemplateRef::Path("missing.html".into())))
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to read template"));
    }

    #[test]
    fn emit_writes_under_out_dir() {
        let dir = TempDir::new().unwrap();
        let emitter = HtmlEmitter::new(dir.path(), dir.path().join("dist")).unwrap();

        let emitted = emitter.emit(&request(TemplateRef::BuiltIn)).unwrap();
        assert_eq!(emitted.path, dir.path().join("dist/another/index.html"));
        assert!(emitted.path.is_file());
        assert_eq!(emitted.chunks, vec!["runtime", "another"]);
    }
}
