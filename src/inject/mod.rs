//! In-place page rewriting.
//!
//! Three independent injectors, each idempotent:
//! - dropdown: replaces any earlier dropdown, then inserts before `</nav>`
//! - archive list: fills the versions-page marker region (or the legacy
//!   `list-group` div)
//! - deprecation banner: inserted once after the main content tag
//!
//! The `*_html` functions are pure text transforms; the file wrappers read,
//! transform and write back only when the content changed.

mod anchor;

use anchor::{AfterOpeningTag, BeforeClosingTag, ClassTokenInner, FragmentInjector, MarkerRegion};

use crate::render::{BANNER_ID, DROPDOWN_ID};
use regex::Regex;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use thiserror::Error;

/// Closing tag of the navigation container.
pub const NAV_CLOSE: &str = "</nav>";

/// Opening tag of the main document content.
pub const MAIN_OPEN: &str = r#"<main class="content" id="quarto-document-content">"#;

/// Versions-page sentinel comments.
pub const VERSIONS_START: &str = "AUTOMATIC_VERSIONS_START";
pub const VERSIONS_END: &str = "AUTOMATIC_VERSIONS_END";

/// Class token of the legacy versions list container.
pub const LIST_CLASS: &str = "list-group";

/// Style block shipped with the dropdown so the `<li>` renders without a bullet.
const DROPDOWN_STYLE: &str = "<style>\n#version-dropdown {\n  list-style: none;\n}\n</style>";

/// A previously injected dropdown, with its style block and framing newlines.
static RE_DROPDOWN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?is)\n?(?:<style>\s*#{DROPDOWN_ID}\s*\{{[^}}]*\}}\s*</style>\s*)?<li id="{DROPDOWN_ID}" class="nav-item dropdown">.*?</ul>\s*</li>\n?"#
    ))
    .unwrap()
});

static MARKERS: LazyLock<MarkerRegion> =
    LazyLock::new(|| MarkerRegion::new(VERSIONS_START, VERSIONS_END));

/// Failure to update one page.
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("`{0}`: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("`{path}`: could not find {anchor}")]
    AnchorNotFound { path: PathBuf, anchor: String },

    #[error("{0}")]
    Walk(#[from] walkdir::Error),
}

/// Result of a successful injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// File content changed and was written back.
    Updated,
    /// Nothing to change; the file was left untouched.
    Unchanged,
}

// ============================================================================
// Text transforms
// ============================================================================

/// Remove every dropdown injected by an earlier run.
pub fn strip_dropdown(html: &str) -> String {
    RE_DROPDOWN.replace_all(html, "").into_owned()
}

/// Insert `dropdown` before the navigation closing tag, replacing any
/// earlier dropdown. `None` when the page has no navigation container.
pub fn inject_dropdown_html(html: &str, dropdown: &str) -> Option<String> {
    let block = format!("\n{DROPDOWN_STYLE}\n{dropdown}\n");
    let nav = BeforeClosingTag::new(NAV_CLOSE);
    FragmentInjector::new(&[&nav]).inject(&strip_dropdown(html), &block)
}

/// Replace the versions listing. `None` when neither the marker comments
/// nor a `list-group` div exist.
pub fn inject_archive_list_html(html: &str, list: &str) -> Option<String> {
    let fallback = ClassTokenInner::new(LIST_CLASS);
    FragmentInjector::new(&[&*MARKERS, &fallback]).inject(html, list)
}

/// Insert `banner` after the main content tag unless one is already present.
/// `None` when the page has no main content container.
pub fn inject_banner_html(html: &str, banner: &str) -> Option<String> {
    if has_banner(html) {
        return Some(html.to_owned());
    }
    let main = AfterOpeningTag::new(MAIN_OPEN);
    FragmentInjector::new(&[&main]).inject(html, banner)
}

fn has_banner(html: &str) -> bool {
    html.contains(&format!(r#"id="{BANNER_ID}""#))
}

fn archive_list_anchor() -> String {
    let fallback = ClassTokenInner::new(LIST_CLASS);
    FragmentInjector::new(&[&*MARKERS, &fallback]).describe()
}

// ============================================================================
// File wrappers
// ============================================================================

/// Inject the dropdown into the page at `path`.
pub fn inject_dropdown(path: &Path, dropdown: &str) -> Result<Outcome, InjectError> {
    rewrite(path, &format!("`{NAV_CLOSE}`"), |html| {
        inject_dropdown_html(html, dropdown)
    })
}

/// Inject the archive listing into the versions page at `path`.
///
/// An empty listing means there is nothing to show; the page is left as is.
pub fn inject_archive_list(path: &Path, list: &str) -> Result<Outcome, InjectError> {
    if list.is_empty() {
        return Ok(Outcome::Unchanged);
    }
    rewrite(path, &archive_list_anchor(), |html| inject_archive_list_html(html, list))
}

/// Inject the deprecation banner into the archived page at `path`.
pub fn inject_banner(path: &Path, banner: &str) -> Result<Outcome, InjectError> {
    rewrite(path, &format!("`{MAIN_OPEN}`"), |html| {
        inject_banner_html(html, banner)
    })
}

/// Read `path`, transform it, and write it back if the text changed.
fn rewrite(
    path: &Path,
    anchor: &str,
    transform: impl FnOnce(&str) -> Option<String>,
) -> Result<Outcome, InjectError> {
    let html = fs::read_to_string(path).map_err(|err| InjectError::Io(path.to_path_buf(), err))?;

    let Some(updated) = transform(&html) else {
        return Err(InjectError::AnchorNotFound {
            path: path.to_path_buf(),
            anchor: anchor.to_owned(),
        });
    };

    if updated == html {
        return Ok(Outcome::Unchanged);
    }

    fs::write(path, updated).map_err(|err| InjectError::Io(path.to_path_buf(), err))?;
    Ok(Outcome::Updated)
}
