//! Archived version discovery and page classification.
//!
//! An archived version is a directory named `YYYY.MM.DD` under the archive
//! root. Because the name is fixed-width, string order is chronological
//! order and no date parsing is needed except for display.

use chrono::NaiveDate;
use regex::Regex;
use std::{
    fmt, fs, io,
    path::{Component, Path},
    sync::LazyLock,
};

/// Strict `YYYY.MM.DD` directory name.
static RE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}\.[0-9]{2}\.[0-9]{2}$").unwrap());

/// Identifier of one archived snapshot, e.g. `2024.03.10`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(String);

impl Version {
    /// Accept `name` only if it matches the strict `YYYY.MM.DD` shape.
    pub fn parse(name: &str) -> Option<Self> {
        RE_VERSION.is_match(name).then(|| Self(name.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which tree a page belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageVersion {
    Latest,
    Archived(Version),
}

impl PageVersion {
    /// Badge text shown next to the dropdown label.
    pub fn label(&self) -> &str {
        match self {
            Self::Latest => "Latest",
            Self::Archived(version) => version.as_str(),
        }
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// List archived versions under `archive_root`, newest first.
///
/// A missing archive root is a normal state for a site that has never been
/// archived and yields an empty list.
pub fn discover_versions(archive_root: &Path) -> io::Result<Vec<Version>> {
    let entries = match fs::read_dir(archive_root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };

    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry?;
        // symlinked version directories count too
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(version) = entry.file_name().to_str().and_then(Version::parse) {
            versions.push(version);
        }
    }

    versions.sort_unstable_by(|a, b| b.cmp(a));
    versions.dedup();
    Ok(versions)
}

// ============================================================================
// Detection
// ============================================================================

/// Classify a page by its path.
///
/// The page is archived when some component equals `archive_dir` and the
/// component right after it is a valid version id. No filesystem access.
pub fn detect_page_version(path: &Path, archive_dir: &str) -> PageVersion {
    let names: Vec<&str> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect();

    names
        .windows(2)
        .filter(|pair| pair[0] == archive_dir)
        .find_map(|pair| Version::parse(pair[1]))
        .map_or(PageVersion::Latest, PageVersion::Archived)
}

// ============================================================================
// Formatting
// ============================================================================

/// Long-form date for a version id (`2025.01.15` → `January 15, 2025`).
///
/// Anything that does not parse as a real calendar date is returned
/// unchanged so a single odd entry never breaks a listing.
pub fn format_version_date(version: &str) -> String {
    if !RE_VERSION.is_match(version) {
        return version.to_owned();
    }
    NaiveDate::parse_from_str(version, "%Y.%m.%d")
        .map(|date| date.format("%B %d, %Y").to_string())
        .unwrap_or_else(|_| version.to_owned())
}
