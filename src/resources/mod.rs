//! Filesystem primitives the tasks are wired to.
//!
//! - [`copy`] — glob-driven file copy preserving relative paths
//! - [`stylesheet`] — SCSS compilation and URL prefix rewriting

pub mod copy;
pub mod stylesheet;
