use std::sync::Arc;

use crate::config::Config;
use crate::logging::Logger;

/// Shared context for task execution.
///
/// Constructed once per command and passed by reference into every task;
/// the configuration inside is never mutated after construction.
#[derive(Debug)]
pub struct Context {
    /// Resolved build configuration.
    pub config: Config,
    /// Logger for output and task recording.
    pub log: Arc<Logger>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Whether per-file work inside a task may use the rayon thread pool.
    pub parallel: bool,
}

impl Context {
    /// Build a context from resolved configuration and global options.
    #[must_use]
    pub fn new(config: Config, log: Arc<Logger>, dry_run: bool, parallel: bool) -> Self {
        Self {
            config,
            log,
            dry_run,
            parallel,
        }
    }
}
