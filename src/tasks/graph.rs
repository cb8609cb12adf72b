//! Task dependency graph validation.

use std::any::TypeId;
use std::collections::HashMap;

use super::Task;
use crate::error::TaskError;

/// Verify that the task dependency graph is acyclic (Kahn's algorithm).
///
/// Dependencies that reference a `TypeId` not present in `tasks` are ignored:
/// a dangling reference cannot create a cycle.
///
/// # Errors
///
/// Returns [`TaskError::DependencyCycle`] naming one of the tasks involved in
/// a cycle.
pub fn verify_acyclic(tasks: &[&dyn Task]) -> Result<(), TaskError> {
    let type_to_idx: HashMap<TypeId, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.task_id(), i))
        .collect();

    let mut in_degree: Vec<usize> = tasks
        .iter()
        .map(|t| {
            t.dependencies()
                .iter()
                .filter(|d| type_to_idx.contains_key(d))
                .count()
        })
        .collect();

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
    for (i, t) in tasks.iter().enumerate() {
        for dep in t.dependencies() {
            if let Some(&dep_idx) = type_to_idx.get(dep)
                && let Some(d) = dependents.get_mut(dep_idx)
            {
                d.push(i);
            }
        }
    }

    let mut ready: Vec<usize> = in_degree
        .iter()
        .enumerate()
        .filter_map(|(i, &d)| (d == 0).then_some(i))
        .collect();
    let mut processed = 0usize;

    while let Some(idx) = ready.pop() {
        processed += 1;
        if let Some(deps) = dependents.get(idx) {
            for &dependent in deps {
                if let Some(count) = in_degree.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(dependent);
                    }
                }
            }
        }
    }

    if processed == tasks.len() {
        return Ok(());
    }

    // Any task with a remaining in-degree sits on or behind a cycle.
    let stuck = tasks
        .iter()
        .zip(in_degree.iter())
        .find(|&(_, &d)| d > 0)
        .map_or_else(String::new, |(t, _)| t.name().to_string());
    Err(TaskError::DependencyCycle(stuck))
}
