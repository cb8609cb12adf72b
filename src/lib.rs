//! Static asset build pipeline.
//!
//! Builds the static assets of a service that consumes the GOV.UK Frontend
//! vendor package: copies the vendor template, component templates, fonts and
//! images into project directories, compiles the entry SCSS stylesheet into a
//! single `all.css` with `/assets/` URL references rewritten to the deployed
//! `/static/` prefix, and optionally watches for changes to re-run the
//! affected steps.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]** — path roles and the URL rewrite rule, resolved once at startup
//! - **[`resources`]** — filesystem primitives (glob copy, stylesheet compile/rewrite)
//! - **[`tasks`]** — named, independently failing units of work wired to resources
//! - **[`commands`]** — top-level subcommand orchestration (`build`, `watch`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod resources;
pub mod tasks;
