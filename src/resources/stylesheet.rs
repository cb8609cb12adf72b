//! SCSS compilation and asset URL rewriting.
//!
//! Compilation resolves `@import`/`@use` references first against the entry
//! file's own directory, then against the vendor library root, and emits
//! expanded (unminified) CSS — readability of intermediate output is
//! preferred over size; there is no minification stage in this pipeline.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::UrlRewrite;
use crate::error::CompileError;

/// Compile the entry stylesheet to expanded CSS.
///
/// # Errors
///
/// Returns a [`CompileError`] carrying the compiler's diagnostic (with file
/// and line context) for syntax errors and unresolvable imports.
pub fn compile(entry: &Path, vendor: &Path) -> Result<String, CompileError> {
    let mut options = grass::Options::default().style(grass::OutputStyle::Expanded);
    if let Some(dir) = entry.parent() {
        options = options.load_path(dir);
    }
    options = options.load_path(vendor);

    grass::from_path(entry, &options).map_err(|e| CompileError::Stylesheet {
        entry: entry.display().to_string(),
        message: e.to_string(),
    })
}

/// Matches `url(...)` tokens: a double-quoted path, a single-quoted path, or
/// an unquoted path. Quoted alternatives run to the closing quote, so a `)`
/// inside a quoted path stays part of the path.
#[allow(clippy::expect_used)]
fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| {
        Regex::new(r#"url\(\s*(?:"([^"]*)"|'([^']*)'|([^'")\s]+))\s*\)"#)
            .expect("url pattern is valid")
    })
}

/// Rewrite asset references in compiled CSS.
///
/// Each `url(...)` token whose path begins with the configured source prefix
/// has that prefix replaced by the deployed static prefix; the remainder of
/// the reference and all non-matching references are left untouched.
#[must_use]
pub fn rewrite_urls(css: &str, rewrite: &UrlRewrite) -> String {
    url_pattern()
        .replace_all(css, |caps: &regex::Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let (quote, target) = caps
                .get(1)
                .map(|m| ("\"", m.as_str()))
                .or_else(|| caps.get(2).map(|m| ("'", m.as_str())))
                .or_else(|| caps.get(3).map(|m| ("", m.as_str())))
                .unwrap_or(("", ""));
            target.strip_prefix(&rewrite.source_prefix).map_or_else(
                || whole.to_string(),
                |rest| format!("url({quote}{}{rest}{quote})", rewrite.static_prefix),
            )
        })
        .into_owned()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn default_rewrite() -> UrlRewrite {
        UrlRewrite {
            source_prefix: "/assets/".to_string(),
            static_prefix: "/static/".to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // rewrite_urls
    // -----------------------------------------------------------------------

    #[test]
    fn rewrites_matching_prefix() {
        let css = ".crest { background: url(\"/assets/images/crest.png\"); }";
        let out = rewrite_urls(css, &default_rewrite());
        assert_eq!(
            out,
            ".crest { background: url(\"/static/images/crest.png\"); }"
        );
    }

    #[test]
    fn leaves_non_matching_prefix_untouched() {
        let css = ".a { background: url(\"/other/foo.png\"); }";
        assert_eq!(rewrite_urls(css, &default_rewrite()), css);
    }

    #[test]
    fn prefix_match_is_anchored() {
        // "/assets/" appearing mid-path must not match.
        let css = ".a { background: url(\"/cdn/assets/foo.png\"); }";
        assert_eq!(rewrite_urls(css, &default_rewrite()), css);
    }

    #[test]
    fn handles_unquoted_and_single_quoted_urls() {
        let rewrite = default_rewrite();
        assert_eq!(
            rewrite_urls(".a { src: url(/assets/fonts/a.woff2); }", &rewrite),
            ".a { src: url(/static/fonts/a.woff2); }"
        );
        assert_eq!(
            rewrite_urls(".a { src: url('/assets/fonts/a.woff2'); }", &rewrite),
            ".a { src: url('/static/fonts/a.woff2'); }"
        );
    }

    #[test]
    fn rewrites_every_occurrence() {
        let css = "url(\"/assets/a.png\") url(\"/assets/b.png\") url(\"/c.png\")";
        let out = rewrite_urls(css, &default_rewrite());
        assert_eq!(out, "url(\"/static/a.png\") url(\"/static/b.png\") url(\"/c.png\")");
    }

    #[test]
    fn quoted_path_containing_close_paren_stays_intact() {
        // ')' inside a quoted path is part of the path, not the token end.
        let rewrite = default_rewrite();
        assert_eq!(
            rewrite_urls(".a { background: url(\"/assets/smile).png\"); }", &rewrite),
            ".a { background: url(\"/static/smile).png\"); }"
        );
        assert_eq!(
            rewrite_urls(".a { background: url('/assets/smile).png'); }", &rewrite),
            ".a { background: url('/static/smile).png'); }"
        );
    }

    #[test]
    fn non_matching_quoted_path_with_close_paren_passes_through() {
        let css = ".a { background: url(\"/other/smile).png\"); }";
        assert_eq!(rewrite_urls(css, &default_rewrite()), css);
    }

    #[test]
    fn does_not_touch_text_outside_url_tokens() {
        let css = "/* /assets/not-a-url.png */ .a { color: red; }";
        assert_eq!(rewrite_urls(css, &default_rewrite()), css);
    }

    // -----------------------------------------------------------------------
    // compile
    // -----------------------------------------------------------------------

    #[test]
    fn compiles_entry_resolving_vendor_imports() {
        let dir = tempfile::tempdir().unwrap();
        let vendor = dir.path().join("vendor");
        std::fs::create_dir_all(&vendor).unwrap();
        std::fs::write(&vendor.join("_base.scss"), ".govuk-button { color: #fff; }").unwrap();

        let entry = dir.path().join("main.scss");
        std::fs::write(&entry, "@import \"base\";\n.app { margin: 0; }\n").unwrap();

        let css = compile(&entry, &vendor).unwrap();
        assert!(css.contains(".govuk-button"), "vendor partial resolved: {css}");
        assert!(css.contains(".app"));
        assert!(!css.contains("@import"), "no unresolved imports remain");
    }

    #[test]
    fn resolves_imports_from_entry_directory_first() {
        let dir = tempfile::tempdir().unwrap();
        let vendor = dir.path().join("vendor");
        std::fs::create_dir_all(&vendor).unwrap();
        std::fs::write(&vendor.join("_local.scss"), ".from-vendor { top: 0; }").unwrap();
        std::fs::write(dir.path().join("_local.scss"), ".from-entry { top: 0; }").unwrap();

        let entry = dir.path().join("main.scss");
        std::fs::write(&entry, "@import \"local\";\n").unwrap();

        let css = compile(&entry, &vendor).unwrap();
        assert!(css.contains(".from-entry"));
        assert!(!css.contains(".from-vendor"));
    }

    #[test]
    fn syntax_error_surfaces_compiler_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let vendor = dir.path().join("vendor");
        std::fs::create_dir_all(&vendor).unwrap();

        let entry = dir.path().join("main.scss");
        std::fs::write(&entry, ".broken {\n  color: red;\n").unwrap();

        let err = compile(&entry, &vendor).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("main.scss"), "diagnostic names the file: {msg}");
    }

    #[test]
    fn unresolved_import_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let vendor = dir.path().join("vendor");
        std::fs::create_dir_all(&vendor).unwrap();

        let entry = dir.path().join("main.scss");
        std::fs::write(&entry, "@import \"does-not-exist\";\n").unwrap();

        assert!(compile(&entry, &vendor).is_err());
    }
}
