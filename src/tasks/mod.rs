//! Named, independently failing tasks that make up the build pipeline.
pub mod copy;
pub mod graph;
pub mod stylesheet;

mod context;

pub use context::Context;

use std::any::TypeId;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Outcome of a successfully executed task.
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// The task ran and applied its changes.
    Ok,
    /// The task chose not to do anything, with a reason.
    Skipped(String),
    /// The task previewed its changes without applying them.
    DryRun,
}

/// A named, executable task.
///
/// The `'static` bound is required so that each task struct has a stable
/// [`TypeId`] which the scheduler uses to match dependency declarations
/// (see [`Task::task_id`] and [`Task::dependencies`]).
pub trait Task: Send + Sync + 'static {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// The concrete `TypeId` of this task, used as a dependency identifier.
    ///
    /// The default implementation uses `TypeId::of::<Self>()` which is correct
    /// for all concrete (non-generic) task structs.
    fn task_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Tasks that must complete before this task starts.
    ///
    /// The default build tasks are mutually independent (they write to
    /// disjoint destination subpaths), so every one of them keeps the default
    /// empty slice and the scheduler runs them all concurrently.
    fn dependencies(&self) -> &[TypeId] {
        &[]
    }

    /// Whether this task should run under the given context.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails, such as when a destination cannot
    /// be written or the stylesheet fails to compile. The error stays local
    /// to this task; siblings run to completion regardless.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete set of tasks run by the build command.
///
/// The four vendor copies and the stylesheet build have no ordering
/// dependency on each other; order within this list carries no meaning.
#[must_use]
pub fn all_build_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(copy::CopyTemplate),
        Box::new(copy::CopyComponents),
        Box::new(copy::CopyFonts),
        Box::new(copy::CopyImages),
        Box::new(stylesheet::BuildStylesheet),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// Failures are recorded and logged, never propagated: the caller decides
/// what a recorded failure means (the build command exits non-zero, the
/// watch command keeps watching).
pub fn execute(task: &dyn Task, ctx: &Context) {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}
