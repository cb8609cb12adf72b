//! Watch command implementation.
//!
//! Runs the pipeline once, then watches the source directory and the project
//! root for changes: a source change re-runs only the stylesheet build, a
//! change to the `assets.toml` build definition reloads the configuration and
//! re-runs the entire pipeline. A failed rebuild logs its diagnostic and the
//! watch session continues; the loop ends only on Ctrl-C.
//!
//! An in-flight rebuild is never cancelled when a new change arrives; the
//! shared output path is last-writer-wins. Event bursts are coalesced over a
//! short debounce window.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::cli::{GlobalOpts, WatchOpts};
use crate::config::{CONFIG_FILE_NAME, Config};
use crate::logging::Logger;
use crate::tasks::{self, Context, Task, stylesheet::BuildStylesheet};

/// Debounce window for coalescing filesystem event bursts.
const DEBOUNCE: Duration = Duration::from_millis(100);
/// Poll interval for checking the shutdown flag and the debounce window.
const POLL: Duration = Duration::from_millis(50);

/// What a batch of filesystem changes requires rebuilding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rebuild {
    /// Re-run only the stylesheet build.
    Stylesheet,
    /// Reload configuration and re-run the entire pipeline.
    Pipeline,
}

impl Rebuild {
    /// Combine two pending rebuild requests; the pipeline subsumes the
    /// stylesheet-only rebuild.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        if self == Self::Pipeline || other == Self::Pipeline {
            Self::Pipeline
        } else {
            Self::Stylesheet
        }
    }
}

/// Map a changed path to the rebuild it requires, if any.
///
/// The build definition itself (`assets.toml`) triggers a full pipeline run;
/// anything under the source directory triggers a stylesheet rebuild; other
/// paths (including the pipeline's own outputs) are ignored.
#[must_use]
pub fn classify(path: &Path, src: &Path, config_file: &Path) -> Option<Rebuild> {
    if path == config_file {
        Some(Rebuild::Pipeline)
    } else if path.starts_with(src) {
        Some(Rebuild::Stylesheet)
    } else {
        None
    }
}

/// Run the watch command.
///
/// # Errors
///
/// Returns an error if configuration loading fails at startup or the
/// filesystem watches cannot be registered. Rebuild failures are reported
/// and do not end the session.
pub fn run(global: &GlobalOpts, _opts: &WatchOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let root = setup.config.paths.root.clone();
    let src = canonical(&setup.config.paths.src);
    let config_file = canonical(&root).join(CONFIG_FILE_NAME);

    let mut ctx = Context::new(setup.config, Arc::clone(log), global.dry_run, global.parallel);

    // Initial build; a failure here is reported but the watch still starts.
    run_pipeline(&ctx);

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))
        .context("install interrupt handler")?;

    let (tx, rx) = mpsc::channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        },
        notify::Config::default(),
    )
    .context("create filesystem watcher")?;

    register_watches(&mut watcher, &src, &canonical(&root))?;

    log.stage("Watching for changes");
    log.info(&format!("source: {}", src.display()));
    log.info("press Ctrl-C to stop");

    let mut pending: Option<Rebuild> = None;
    let mut last_change: Option<Instant> = None;

    while running.load(Ordering::SeqCst) {
        if let Ok(path) = rx.recv_timeout(POLL)
            && let Some(request) = classify(&path, &src, &config_file)
        {
            log.debug(&format!("changed: {}", path.display()));
            pending = Some(pending.map_or(request, |p| p.merge(request)));
            last_change = Some(Instant::now());
        }

        if let (Some(request), Some(at)) = (pending, last_change)
            && at.elapsed() >= DEBOUNCE
        {
            pending = None;
            last_change = None;
            match request {
                Rebuild::Stylesheet => tasks::execute(&BuildStylesheet, &ctx),
                Rebuild::Pipeline => {
                    if let Err(e) = reload_and_run(&mut ctx, &root, global, log) {
                        log.error(&format!("config reload failed: {e}"));
                    }
                }
            }
        }
    }

    log.info("watch stopped");
    Ok(())
}

/// Register the filesystem watches: the source directory recursively and the
/// project root non-recursively. Watching the root rather than `assets.toml`
/// itself means a build definition created after the session starts is still
/// picked up; [`classify`] discards the other root-level events.
fn register_watches(watcher: &mut RecommendedWatcher, src: &Path, root: &Path) -> Result<()> {
    watcher
        .watch(src, RecursiveMode::Recursive)
        .with_context(|| format!("watch source directory: {}", src.display()))?;
    watcher
        .watch(root, RecursiveMode::NonRecursive)
        .with_context(|| format!("watch project root: {}", root.display()))?;
    Ok(())
}

/// Reload the configuration and re-run the whole pipeline over it.
fn reload_and_run(
    ctx: &mut Context,
    root: &Path,
    global: &GlobalOpts,
    log: &Arc<Logger>,
) -> Result<()> {
    let config = Config::load(root)?;
    *ctx = Context::new(config, Arc::clone(log), global.dry_run, global.parallel);
    run_pipeline(ctx);
    Ok(())
}

/// Run the full pipeline, reporting failures without propagating them.
fn run_pipeline(ctx: &Context) {
    let all_tasks = tasks::all_build_tasks();
    let refs: Vec<&dyn Task> = all_tasks.iter().map(Box::as_ref).collect();
    if let Err(e) = super::run_tasks_to_completion(&refs, ctx) {
        ctx.log.error(&format!("build failed: {e:#}"));
    }
}

/// Canonicalize when possible so watched paths compare equal to event paths.
fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
