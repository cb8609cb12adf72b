//! Build command implementation.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{BuildOpts, GlobalOpts};
use crate::logging::Logger;
use crate::tasks::{self, Context, Task};

/// Run the build command: execute the full pipeline once.
///
/// Exits zero only when every task succeeded; a single failing branch makes
/// the composed build fail, after all branches have settled.
///
/// # Errors
///
/// Returns an error if configuration loading fails, the name filters match
/// no task at all, or any task failed.
pub fn run(global: &GlobalOpts, opts: &BuildOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let ctx = Context::new(setup.config, Arc::clone(log), global.dry_run, global.parallel);

    let all_tasks = tasks::all_build_tasks();
    let tasks_to_run: Vec<&dyn Task> = filter_tasks(&all_tasks, &opts.skip, &opts.only);
    if tasks_to_run.is_empty() {
        anyhow::bail!("task filters matched no tasks");
    }

    super::run_tasks_to_completion(&tasks_to_run, &ctx)
}

/// Apply the `--skip` and `--only` name filters to the task list.
///
/// `--only` wins when both are given; matching is a case-insensitive
/// substring test against the task name.
#[must_use]
pub fn filter_tasks<'a>(
    all_tasks: &'a [Box<dyn Task>],
    skip: &[String],
    only: &[String],
) -> Vec<&'a dyn Task> {
    all_tasks
        .iter()
        .filter(|t| {
            let name = t.name().to_lowercase();
            if !only.is_empty() {
                return only.iter().any(|o| name.contains(&o.to_lowercase()));
            }
            if !skip.is_empty() {
                return !skip.iter().any(|s| name.contains(&s.to_lowercase()));
            }
            true
        })
        .map(AsRef::as_ref)
        .collect()
}
