//! Domain-specific error types for the asset pipeline.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`ConfigError`],
//! [`CompileError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError   — missing path roles, unreadable or invalid assets.toml
//! CompileError  — SCSS syntax errors, unresolvable imports
//! TaskError     — task graph issues (dependency cycles)
//! ```
//!
//! A configuration error is fatal at startup: no partial build is attempted.
//! Compile and copy failures stay local to the task that hit them; sibling
//! tasks run to completion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from configuration loading and path role validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required input directory does not exist at startup.
    #[error("Missing {role} directory: {path}")]
    MissingPathRole {
        /// Logical name of the path role (e.g., `"vendor"`, `"source"`).
        role: &'static str,
        /// Resolved path that was expected to exist.
        path: PathBuf,
    },

    /// The `assets.toml` override file contains a syntax or type error.
    #[error("Invalid config in {file}: {message}")]
    InvalidToml {
        /// Path of the config file that failed to parse.
        file: String,
        /// Parser diagnostic.
        message: String,
    },

    /// An I/O error occurred while reading the config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while compiling the entry stylesheet.
///
/// The compiler's own diagnostic (including file and line context) is carried
/// verbatim in `message` so it can be surfaced to the user unaltered.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The stylesheet failed to compile (syntax error or unresolved import).
    #[error("Failed to compile {entry}: {message}")]
    Stylesheet {
        /// Path of the entry stylesheet.
        entry: String,
        /// Compiler diagnostic with source location.
        message: String,
    },
}

/// Errors that arise from the task graph itself.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The task dependency graph contains a cycle.
    #[error("Task dependency cycle detected involving '{0}'")]
    DependencyCycle(String),
}
