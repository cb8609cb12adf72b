//! Path roles and the URL rewrite rule.
//!
//! All paths are resolved against a single project root once at startup and
//! never mutated afterwards. Built-in defaults mirror the conventional
//! project layout; an optional `assets.toml` at the project root can override
//! any role:
//!
//! ```toml
//! [paths]
//! src = "assets"
//! dist = "static"
//! templates = "templates/vendor/govuk"
//! vendor = "node_modules/govuk-frontend/govuk"
//!
//! [rewrite]
//! source_prefix = "/assets/"
//! static_prefix = "/static/"
//!
//! [stylesheet]
//! entry = "main.scss"
//! output = "all.css"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Name of the optional override file at the project root.
pub const CONFIG_FILE_NAME: &str = "assets.toml";

/// Default source directory (holds the entry stylesheet), relative to root.
const DEFAULT_SRC: &str = "assets";
/// Default output directory, relative to root.
const DEFAULT_DIST: &str = "static";
/// Default template destination, relative to root.
const DEFAULT_TEMPLATES: &str = "templates/vendor/govuk";
/// Default vendor library root, relative to root.
const DEFAULT_VENDOR: &str = "node_modules/govuk-frontend/govuk";
/// Default asset-reference prefix found in source stylesheets.
const DEFAULT_SOURCE_PREFIX: &str = "/assets/";
/// Default deployed static-file prefix.
const DEFAULT_STATIC_PREFIX: &str = "/static/";
/// Default entry stylesheet filename, relative to the source directory.
const DEFAULT_ENTRY: &str = "main.scss";
/// Default compiled stylesheet filename, relative to the output directory.
const DEFAULT_OUTPUT: &str = "all.css";

/// Immutable mapping of logical path roles to filesystem locations.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Project root everything else is resolved against.
    pub root: PathBuf,
    /// Source directory containing the entry stylesheet.
    pub src: PathBuf,
    /// Output root for the compiled stylesheet, fonts and images.
    pub dist: PathBuf,
    /// Destination for the vendor template and component templates.
    pub templates: PathBuf,
    /// Vendor library root (template, components, fonts, images).
    pub vendor: PathBuf,
}

/// Prefix-anchored URL rewrite applied to compiled stylesheet output.
///
/// Any `url(...)` reference whose path begins with `source_prefix` has that
/// prefix replaced by `static_prefix`; everything else passes through
/// unmodified. Never applied to other file types.
#[derive(Debug, Clone)]
pub struct UrlRewrite {
    /// Source-relative prefix to match (e.g., `/assets/`).
    pub source_prefix: String,
    /// Deployed static-file prefix to substitute (e.g., `/static/`).
    pub static_prefix: String,
}

/// Entry and output stylesheet filenames.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Entry stylesheet filename inside the source directory.
    pub entry: String,
    /// Compiled output filename inside the output directory.
    pub output: String,
}

/// Complete build configuration, constructed once per run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Resolved path roles.
    pub paths: Paths,
    /// URL rewrite rule for compiled stylesheet output.
    pub rewrite: UrlRewrite,
    /// Stylesheet entry/output filenames.
    pub stylesheet: Stylesheet,
}

/// Raw `assets.toml` contents; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    paths: RawPaths,
    #[serde(default)]
    rewrite: RawRewrite,
    #[serde(default)]
    stylesheet: RawStylesheet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPaths {
    src: Option<PathBuf>,
    dist: Option<PathBuf>,
    templates: Option<PathBuf>,
    vendor: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRewrite {
    source_prefix: Option<String>,
    static_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStylesheet {
    entry: Option<String>,
    output: Option<String>,
}

impl Config {
    /// Resolve all path roles against `root`, applying `assets.toml`
    /// overrides when the file exists, and validate the input roles.
    ///
    /// # Errors
    ///
    /// Returns an error if `assets.toml` exists but cannot be read or parsed,
    /// or if the source or vendor directory does not exist. Validation is
    /// fatal at startup: no partial build is attempted.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let raw = read_overrides(root)?;

        let resolve = |p: Option<PathBuf>, default: &str| match p {
            Some(p) if p.is_absolute() => p,
            Some(p) => root.join(p),
            None => root.join(default),
        };

        let config = Self {
            paths: Paths {
                root: root.to_path_buf(),
                src: resolve(raw.paths.src, DEFAULT_SRC),
                dist: resolve(raw.paths.dist, DEFAULT_DIST),
                templates: resolve(raw.paths.templates, DEFAULT_TEMPLATES),
                vendor: resolve(raw.paths.vendor, DEFAULT_VENDOR),
            },
            rewrite: UrlRewrite {
                source_prefix: raw
                    .rewrite
                    .source_prefix
                    .unwrap_or_else(|| DEFAULT_SOURCE_PREFIX.to_string()),
                static_prefix: raw
                    .rewrite
                    .static_prefix
                    .unwrap_or_else(|| DEFAULT_STATIC_PREFIX.to_string()),
            },
            stylesheet: Stylesheet {
                entry: raw
                    .stylesheet
                    .entry
                    .unwrap_or_else(|| DEFAULT_ENTRY.to_string()),
                output: raw
                    .stylesheet
                    .output
                    .unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Verify that every input path role exists.
    ///
    /// Output roles (`dist`, `templates`) are created on demand and are not
    /// checked here.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.paths.src.is_dir() {
            return Err(ConfigError::MissingPathRole {
                role: "source",
                path: self.paths.src.clone(),
            });
        }
        if !self.paths.vendor.is_dir() {
            return Err(ConfigError::MissingPathRole {
                role: "vendor",
                path: self.paths.vendor.clone(),
            });
        }
        Ok(())
    }

    /// Path of the optional override file for this project.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.paths.root.join(CONFIG_FILE_NAME)
    }

    /// Absolute path of the entry stylesheet.
    #[must_use]
    pub fn entry_stylesheet(&self) -> PathBuf {
        self.paths.src.join(&self.stylesheet.entry)
    }

    /// Absolute path of the compiled output stylesheet.
    #[must_use]
    pub fn output_stylesheet(&self) -> PathBuf {
        self.paths.dist.join(&self.stylesheet.output)
    }
}

/// Read and parse `assets.toml` if present; defaults otherwise.
fn read_overrides(root: &Path) -> Result<RawConfig, ConfigError> {
    let file = root.join(CONFIG_FILE_NAME);
    if !file.exists() {
        return Ok(RawConfig::default());
    }
    let text = std::fs::read_to_string(&file).map_err(|source| ConfigError::Io {
        path: file.display().to_string(),
        source,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::InvalidToml {
        file: file.display().to_string(),
        message: e.to_string(),
    })
}
