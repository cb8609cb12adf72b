// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed test project and a fluent builder so
// each integration test can set up an isolated vendor tree and entry
// stylesheet without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use assets_cli::config::Config;
use assets_cli::logging::Logger;
use assets_cli::tasks::Context;

/// Entry stylesheet used unless a test overrides it: one vendor import, one
/// rewritable asset reference, one reference that must pass through as-is.
pub const DEFAULT_STYLESHEET: &str = "@import \"base\";\n\n.app-crest {\n  background: url(\"/assets/images/crest.png\");\n}\n\n.app-external {\n  background: url(\"/other/foo.png\");\n}\n";

/// Write the minimal project tree the asset pipeline expects into `root`.
///
/// Creates:
/// - `assets/main.scss`                           — entry stylesheet
/// - `node_modules/govuk-frontend/govuk/`         — vendor root containing
///   `template.njk`, `_base.scss`, `components/button/macro.njk`,
///   `assets/fonts/light.woff2`, `assets/images/crest.png`
pub fn setup_project(root: &Path) {
    std::fs::create_dir_all(root.join("assets")).expect("create assets dir");
    std::fs::write(root.join("assets/main.scss"), DEFAULT_STYLESHEET).expect("write entry");

    let vendor = root.join("node_modules/govuk-frontend/govuk");
    std::fs::create_dir_all(vendor.join("components/button")).expect("create components dir");
    std::fs::create_dir_all(vendor.join("assets/fonts")).expect("create fonts dir");
    std::fs::create_dir_all(vendor.join("assets/images")).expect("create images dir");

    std::fs::write(vendor.join("template.njk"), b"{% block content %}{% endblock %}")
        .expect("write template");
    std::fs::write(vendor.join("_base.scss"), ".govuk-template { margin: 0; }\n")
        .expect("write vendor partial");
    std::fs::write(vendor.join("components/button/macro.njk"), b"{% macro button() %}")
        .expect("write component");
    std::fs::write(vendor.join("assets/fonts/light.woff2"), b"\x00\x01font-bytes")
        .expect("write font");
    std::fs::write(vendor.join("assets/images/crest.png"), b"\x89PNG\r\n\x1a\n")
        .expect("write image");
}

/// An isolated test project backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped (via the underlying
/// [`tempfile::TempDir`]).
pub struct IntegrationTestContext {
    /// Temporary directory containing the test project.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with a minimal but valid project structure.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        setup_project(root.path());
        Self { root }
    }

    /// Path to the project root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path to the vendor library root.
    pub fn vendor_path(&self) -> std::path::PathBuf {
        self.root.path().join("node_modules/govuk-frontend/govuk")
    }

    /// Load configuration for this project.
    pub fn load_config(&self) -> Config {
        Config::load(self.root.path()).expect("load config")
    }

    /// Build a fresh task [`Context`] over this project.
    ///
    /// Each call creates a new logger, so recorded task state never leaks
    /// between pipeline runs within one test.
    pub fn context(&self) -> Context {
        Context::new(self.load_config(), Arc::new(Logger::new(false)), false, false)
    }

    /// Build a fresh [`Context`] and return the logger for assertions.
    pub fn context_with_log(&self) -> (Context, Arc<Logger>) {
        let log = Arc::new(Logger::new(false));
        let ctx = Context::new(self.load_config(), Arc::clone(&log), false, false);
        (ctx, log)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
///
/// Allows individual tests to customise the project before the context is
/// finalised without modifying the shared setup.
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context backed by a minimal project.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Replace the entry stylesheet with `content`.
    pub fn with_stylesheet(self, content: &str) -> Self {
        std::fs::write(self.ctx.root.path().join("assets/main.scss"), content)
            .expect("write stylesheet");
        self
    }

    /// Write `content` (raw bytes) to `path` relative to the vendor root.
    pub fn with_vendor_file(self, path: &str, content: &[u8]) -> Self {
        let full = self.ctx.vendor_path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("create vendor parent");
        }
        std::fs::write(&full, content).expect("write vendor file");
        self
    }

    /// Write an `assets.toml` override file at the project root.
    pub fn with_config_file(self, content: &str) -> Self {
        std::fs::write(self.ctx.root.path().join("assets.toml"), content)
            .expect("write assets.toml");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

/// Run the full default pipeline serially over `ctx`, returning the composed
/// result the build command would report.
pub fn run_full_build(ctx: &Context) -> anyhow::Result<()> {
    let all_tasks = assets_cli::tasks::all_build_tasks();
    let refs: Vec<&dyn assets_cli::tasks::Task> = all_tasks.iter().map(Box::as_ref).collect();
    assets_cli::commands::run_tasks_to_completion(&refs, ctx)
}
