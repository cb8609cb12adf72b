//! Glob-driven file copy preserving relative paths.
//!
//! Given a base directory, a glob pattern relative to it, and a destination
//! directory, every matched file is copied to the destination at the same
//! path relative to the base. Destination directories are created on demand;
//! conflicting files are overwritten; nothing pre-existing is deleted. A
//! pattern that matches nothing (including a base directory that does not
//! exist) is an empty result, not an error — the lenient policy typical of
//! asset-pipeline tooling.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context as _, Result};

/// List the files under `base` matched by `pattern` (relative to `base`).
///
/// Directories matched by the pattern are ignored; only regular files are
/// returned. A missing base directory yields an empty list.
///
/// # Errors
///
/// Returns an error if the combined path is not valid UTF-8, the pattern is
/// malformed, or a matched entry cannot be read.
pub fn matched_files(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = base.join(pattern);
    let full = full
        .to_str()
        .with_context(|| format!("non-UTF-8 glob path: {}", full.display()))?;
    let mut files = Vec::new();
    for entry in glob::glob(full).with_context(|| format!("invalid glob pattern: {full}"))? {
        let path = entry.with_context(|| format!("reading glob match under {}", base.display()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Copy `files` (absolute paths under `base`) into `dest`, preserving each
/// file's path relative to `base`. Returns the number of files copied.
///
/// With `parallel` set, per-file copies run on the rayon thread pool; the
/// files land at disjoint destination paths, so no ordering is needed.
///
/// # Errors
///
/// Returns an error if a file lies outside `base`, a destination directory
/// cannot be created, or a copy fails.
pub fn copy_files(base: &Path, files: &[PathBuf], dest: &Path, parallel: bool) -> Result<usize> {
    if parallel {
        use rayon::prelude::*;
        // First failure wins; siblings already in flight run to completion.
        let first_error: Mutex<Option<anyhow::Error>> = Mutex::new(None);
        files.par_iter().for_each(|file| {
            if let Err(e) = copy_one(base, file, dest) {
                first_error
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .get_or_insert(e);
            }
        });
        if let Some(e) = first_error
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
        {
            return Err(e);
        }
    } else {
        for file in files {
            copy_one(base, file, dest)?;
        }
    }
    Ok(files.len())
}

/// Copy every file under `base` matched by `pattern` into `dest`.
///
/// Convenience composition of [`matched_files`] and [`copy_files`].
///
/// # Errors
///
/// Returns an error under the same conditions as the two steps it composes.
pub fn copy_glob(base: &Path, pattern: &str, dest: &Path, parallel: bool) -> Result<usize> {
    let files = matched_files(base, pattern)?;
    copy_files(base, &files, dest, parallel)
}

/// Copy one file from under `base` to the corresponding path under `dest`.
fn copy_one(base: &Path, file: &Path, dest: &Path) -> Result<()> {
    let rel = file
        .strip_prefix(base)
        .with_context(|| format!("{} is not under {}", file.display(), base.display()))?;
    let target = dest.join(rel);
    ensure_parent_dir(&target)?;
    std::fs::copy(file, &target)
        .with_context(|| format!("copying {} to {}", file.display(), target.display()))?;
    Ok(())
}

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}
