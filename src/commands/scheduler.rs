//! Dependency-driven parallel task scheduling.
//!
//! Provides [`TaskGraph`] for tracking task completions and
//! [`run_tasks_parallel`] for executing tasks concurrently using OS threads.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Condvar, Mutex};

use crate::tasks::{self, Context, Task};

/// Shared state for dependency-driven parallel task scheduling.
///
/// Tasks call [`wait_for_deps`](TaskGraph::wait_for_deps) before starting and
/// [`mark_complete`](TaskGraph::mark_complete) when finished.  The [`Condvar`]
/// wakes all waiting tasks whenever a new completion is recorded.
#[derive(Debug, Default)]
struct TaskGraph {
    /// Set of completed task [`TypeId`]s.
    completed: Mutex<HashSet<TypeId>>,
    /// Notified whenever a task completes.
    condvar: Condvar,
}

impl TaskGraph {
    /// Create a new, empty task graph with no completed tasks.
    fn new() -> Self {
        Self::default()
    }

    /// Block until every [`TypeId`] in `deps` has been marked complete.
    fn wait_for_deps(&self, deps: &[TypeId]) {
        if deps.is_empty() {
            return;
        }
        let mut completed = self
            .completed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        while !deps.iter().all(|d| completed.contains(d)) {
            completed = self
                .condvar
                .wait(completed)
                .unwrap_or_else(std::sync::PoisonError::into_inner);
        }
        drop(completed);
    }

    /// Record a task as complete and wake all waiting threads.
    fn mark_complete(&self, id: TypeId) {
        let mut completed = self
            .completed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        completed.insert(id);
        drop(completed);
        self.condvar.notify_all();
    }
}

/// Run tasks in parallel using a dependency graph.
///
/// Each task is spawned into an OS thread (via `std::thread::scope`) and
/// waits for its dependencies to complete before executing. Dependencies
/// referencing a `TypeId` not present in `tasks` are ignored rather than
/// waited on forever. A task failure is recorded in the context's logger and
/// marks the task complete like any other outcome, so dependents and
/// siblings always run to completion; there is no cancellation.
pub(super) fn run_tasks_parallel(tasks: &[&dyn Task], ctx: &Context) {
    let present: HashSet<TypeId> = tasks.iter().map(|t| t.task_id()).collect();
    let resolved_deps: Vec<Vec<TypeId>> = tasks
        .iter()
        .map(|t| {
            t.dependencies()
                .iter()
                .filter(|d| present.contains(d))
                .copied()
                .collect()
        })
        .collect();

    // TypeId → name map for debug messages.
    let id_to_name: HashMap<TypeId, &str> = tasks.iter().map(|t| (t.task_id(), t.name())).collect();

    let graph = TaskGraph::new();

    std::thread::scope(|s| {
        for (task, deps) in tasks.iter().zip(resolved_deps.iter()) {
            let task = *task;
            let graph = &graph;
            let id_to_name = &id_to_name;
            s.spawn(move || {
                if !deps.is_empty() {
                    let dep_names: Vec<&str> = deps
                        .iter()
                        .filter_map(|d| id_to_name.get(d).copied())
                        .collect();
                    ctx.log.debug(&format!(
                        "{} waiting for: {}",
                        task.name(),
                        dep_names.join(", ")
                    ));
                }

                graph.wait_for_deps(deps);
                tasks::execute(task, ctx);
                graph.mark_complete(task.task_id());
            });
        }
    });
}
