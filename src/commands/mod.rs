//! Top-level subcommand orchestration.

pub mod build;
pub mod watch;

mod scheduler;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::{CONFIG_FILE_NAME, Config};
use crate::logging::Logger;
use crate::tasks::{self, Context, Task, graph};

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates project root resolution and configuration loading so that
/// each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved build configuration.
    pub config: Config,
}

impl CommandSetup {
    /// Resolve the project root and load the build configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be determined or the
    /// configuration fails validation (fatal at startup: no partial build
    /// is attempted).
    pub fn init(global: &GlobalOpts, log: &Arc<Logger>) -> Result<Self> {
        let root = resolve_root(global)?;

        log.stage("Loading configuration");
        let config = Config::load(&root)?;
        log.debug(&format!("source:  {}", config.paths.src.display()));
        log.debug(&format!("output:  {}", config.paths.dist.display()));
        log.debug(&format!("vendor:  {}", config.paths.vendor.display()));
        log.info(&format!(
            "rewriting {} to {}",
            config.rewrite.source_prefix, config.rewrite.static_prefix
        ));

        Ok(Self { config })
    }
}

/// Resolve the project root directory from CLI arguments or auto-detection.
///
/// # Errors
///
/// Returns an error if the root directory cannot be determined.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }

    if let Ok(root) = std::env::var("ASSETS_ROOT") {
        return Ok(PathBuf::from(root));
    }

    // Last resort: current directory, if it looks like a project root.
    let cwd = std::env::current_dir()?;
    if cwd.join("assets").exists() || cwd.join(CONFIG_FILE_NAME).exists() {
        return Ok(cwd);
    }

    anyhow::bail!("cannot determine project root. Use --root or set ASSETS_ROOT env var");
}

/// Run every task to completion, print the summary, and bail if any failed.
///
/// Tasks with mutually satisfied dependencies run concurrently (unless the
/// context disables parallelism); a failing task never cancels its siblings,
/// and the composed failure is reported only after all branches settle.
///
/// # Errors
///
/// Returns an error if the dependency graph contains a cycle or one or more
/// tasks recorded a failure.
pub fn run_tasks_to_completion(tasks: &[&dyn Task], ctx: &Context) -> Result<()> {
    graph::verify_acyclic(tasks)?;

    if ctx.parallel {
        scheduler::run_tasks_parallel(tasks, ctx);
    } else {
        for task in tasks {
            tasks::execute(*task, ctx);
        }
    }

    ctx.log.print_summary();

    let count = ctx.log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}
