//! The stylesheet build task.

use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult};
use crate::resources::stylesheet;

/// Compile the entry stylesheet, rewrite asset URLs, and write the single
/// concatenated output file to the output root.
///
/// The pipeline is linear: read → compile → rewrite → write. On a
/// compilation error the diagnostic is surfaced and no output file is
/// written; a previously built output is left in place.
#[derive(Debug)]
pub struct BuildStylesheet;

impl Task for BuildStylesheet {
    fn name(&self) -> &str {
        "Build stylesheet"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let entry = ctx.config.entry_stylesheet();
        let output = ctx.config.output_stylesheet();

        let css = stylesheet::compile(&entry, &ctx.config.paths.vendor)?;
        let css = stylesheet::rewrite_urls(&css, &ctx.config.rewrite);

        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would write {} bytes to {}",
                css.len(),
                output.display()
            ));
            return Ok(TaskResult::DryRun);
        }

        std::fs::create_dir_all(&ctx.config.paths.dist)
            .with_context(|| format!("create output root: {}", ctx.config.paths.dist.display()))?;
        std::fs::write(&output, &css)
            .with_context(|| format!("write {}", output.display()))?;

        ctx.log
            .info(&format!("wrote {} bytes to {}", css.len(), output.display()));
        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::{make_context, setup_project_tree, vendor_dir};

    fn seed_stylesheet(root: &std::path::Path, scss: &str) {
        std::fs::write(root.join("assets/main.scss"), scss).unwrap();
    }

    #[test]
    fn writes_compiled_output_with_rewritten_urls() {
        let dir = tempfile::tempdir().unwrap();
        setup_project_tree(dir.path());
        std::fs::write(
            vendor_dir(dir.path()).join("_base.scss"),
            ".govuk-template { margin: 0; }",
        )
        .unwrap();
        seed_stylesheet(
            dir.path(),
            "@import \"base\";\n.crest { background: url(\"/assets/images/crest.png\"); }\n",
        );
        let ctx = make_context(dir.path(), false);

        let result = BuildStylesheet.run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::Ok));

        let css = std::fs::read_to_string(dir.path().join("static/all.css")).unwrap();
        assert!(css.contains(".govuk-template"));
        assert!(css.contains("/static/images/crest.png"));
        assert!(!css.contains("/assets/images/crest.png"));
    }

    #[test]
    fn compile_failure_writes_no_output() {
        let dir = tempfile::tempdir().unwrap();
        setup_project_tree(dir.path());
        seed_stylesheet(dir.path(), ".broken {\n  color: red;\n");
        let ctx = make_context(dir.path(), false);

        let err = BuildStylesheet.run(&ctx).unwrap_err();
        assert!(err.to_string().contains("main.scss"));
        assert!(!dir.path().join("static/all.css").exists());
    }

    #[test]
    fn dry_run_compiles_but_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        setup_project_tree(dir.path());
        seed_stylesheet(dir.path(), ".a { color: red; }\n");
        let ctx = make_context(dir.path(), true);

        let result = BuildStylesheet.run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::DryRun));
        assert!(!dir.path().join("static/all.css").exists());
    }

    #[test]
    fn missing_entry_is_a_compile_error() {
        let dir = tempfile::tempdir().unwrap();
        setup_project_tree(dir.path());
        let ctx = make_context(dir.path(), false);

        assert!(BuildStylesheet.run(&ctx).is_err());
    }
}
