//! Copy tasks for the vendor template, components, fonts and images.
//!
//! Each task streams one fixed glob to one fixed destination, preserving
//! relative paths. The destinations are pairwise disjoint, which is what
//! makes running the tasks concurrently safe without any locking.

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::copy;

/// Execute one glob copy under the task conventions: report match counts,
/// honour dry-run, treat an empty match set as success.
fn run_copy(ctx: &Context, base: &Path, pattern: &str, dest: &Path) -> Result<TaskResult> {
    if ctx.dry_run {
        let files = copy::matched_files(base, pattern)?;
        ctx.log.dry_run(&format!(
            "would copy {} file(s) to {}",
            files.len(),
            dest.display()
        ));
        return Ok(TaskResult::DryRun);
    }

    let copied = copy::copy_glob(base, pattern, dest, ctx.parallel)?;
    ctx.log
        .info(&format!("copied {copied} file(s) to {}", dest.display()));
    Ok(TaskResult::Ok)
}

/// Copy the vendor page template into the template destination.
#[derive(Debug)]
pub struct CopyTemplate;

impl Task for CopyTemplate {
    fn name(&self) -> &str {
        "Copy vendor template"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        run_copy(
            ctx,
            &ctx.config.paths.vendor,
            "template.njk",
            &ctx.config.paths.templates,
        )
    }
}

/// Copy the vendor component templates into the template destination.
#[derive(Debug)]
pub struct CopyComponents;

impl Task for CopyComponents {
    fn name(&self) -> &str {
        "Copy vendor components"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        run_copy(
            ctx,
            &ctx.config.paths.vendor.join("components"),
            "**/*",
            &ctx.config.paths.templates.join("components"),
        )
    }
}

/// Copy the vendor fonts into the output root.
#[derive(Debug)]
pub struct CopyFonts;

impl Task for CopyFonts {
    fn name(&self) -> &str {
        "Copy vendor fonts"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        run_copy(
            ctx,
            &ctx.config.paths.vendor.join("assets/fonts"),
            "**/*",
            &ctx.config.paths.dist.join("fonts"),
        )
    }
}

/// Copy the vendor images into the output root.
#[derive(Debug)]
pub struct CopyImages;

impl Task for CopyImages {
    fn name(&self) -> &str {
        "Copy vendor images"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        run_copy(
            ctx,
            &ctx.config.paths.vendor.join("assets/images"),
            "**/*",
            &images_dest(ctx),
        )
    }
}

/// Secondary vendor image copy, kept available for manual invocation.
///
/// Duplicates [`CopyImages`] and is deliberately not registered in
/// [`all_build_tasks`](super::all_build_tasks); see DESIGN.md.
#[derive(Debug)]
pub struct CopyImagesStandalone;

impl Task for CopyImagesStandalone {
    fn name(&self) -> &str {
        "Copy vendor images (standalone)"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        run_copy(
            ctx,
            &ctx.config.paths.vendor.join("assets/images"),
            "**/*",
            &images_dest(ctx),
        )
    }
}

/// Destination shared by both image copy tasks.
fn images_dest(ctx: &Context) -> PathBuf {
    ctx.config.paths.dist.join("images")
}
