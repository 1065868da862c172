//! Site update pass.
//!
//! Runs discover → enumerate → mutate → report over the generated site.
//! Each page is handled independently: a failure is logged and counted,
//! and the batch carries on with the next page.

use crate::{
    config::SiteConfig,
    inject::{InjectError, Outcome, inject_archive_list, inject_banner, inject_dropdown},
    log,
    render::{SiteLinks, render_archive_list, render_banner, render_dropdown},
    version::{Version, detect_page_version, discover_versions},
};
use anyhow::{Context, Result};
use std::{
    fmt, io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Succeeded / attempted counter for one kind of update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub succeeded: usize,
    pub attempted: usize,
}

impl Tally {
    fn record(&mut self, module: &str, path: &Path, result: Result<Outcome, InjectError>) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => return self.fail(&err),
        };
        self.attempted += 1;
        self.succeeded += 1;
        if outcome == Outcome::Updated {
            log!(module; "{}", path.display());
        }
    }

    /// Count and log one failed attempt.
    fn fail(&mut self, err: &InjectError) {
        self.attempted += 1;
        log!("error"; "{err}");
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.succeeded, self.attempted)
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub versions: Vec<Version>,
    pub dropdown: Tally,
    pub versions_pages: Tally,
    pub banners: Tally,
}

impl Report {
    pub fn log(&self) {
        log!("summary"; "{} archived versions", self.versions.len());
        log!("summary"; "version dropdown: {} pages", self.dropdown);
        log!("summary"; "archive list: {} versions pages", self.versions_pages);
        log!("summary"; "deprecation banner: {} archived pages", self.banners);
    }
}

/// Update every page under the configured site root.
pub fn update_site(config: &SiteConfig) -> Result<Report> {
    let links = SiteLinks::with_layout(
        &config.prefix,
        &config.site.archive,
        &config.site.versions_page,
    );

    let archive_dir = config.archive_dir();
    let versions = discover_versions(&archive_dir)
        .with_context(|| format!("Failed to list archive `{}`", archive_dir.display()))?;
    log!("versions"; "found {} archived versions: {}", versions.len(), join(&versions));

    let PageWalk {
        pages,
        errors: walk_errors,
    } = collect_html_files(&config.site.root);
    let PageWalk {
        pages: archived_pages,
        errors: archive_walk_errors,
    } = collect_html_files(&archive_dir);
    if pages.is_empty() {
        log!("versions"; "no pages found under `{}`", config.site.root.display());
    }

    let archive_list = render_archive_list(&versions, &links);
    let banner = render_banner(&links);
    let mut report = Report::default();

    for err in walk_errors {
        report.dropdown.fail(&err);
    }
    for err in archive_walk_errors {
        report.banners.fail(&err);
    }

    for page in &pages {
        let relative = page.strip_prefix(&config.site.root).unwrap_or(page.as_path());
        let current = detect_page_version(relative, &config.site.archive);
        let dropdown = render_dropdown(
            &versions,
            &links,
            config.dropdown.limit,
            Some(current.label()),
        );
        report
            .dropdown
            .record("dropdown", page, inject_dropdown(page, &dropdown));

        if is_versions_page(page, config) {
            report
                .versions_pages
                .record("archive", page, inject_archive_list(page, &archive_list));
        }
    }

    for page in &archived_pages {
        report
            .banners
            .record("banner", page, inject_banner(page, &banner));
    }

    report.versions = versions;
    Ok(report)
}

/// Pages found under a directory, plus the entries that could not be read.
#[derive(Debug, Default)]
pub struct PageWalk {
    pub pages: Vec<PathBuf>,
    pub errors: Vec<InjectError>,
}

/// Collect all `.html` files under `dir` recursively, following symlinks.
///
/// A missing directory yields no files and no errors; any other unreadable
/// entry is returned in `errors` so it can be reported.
pub fn collect_html_files(dir: &Path) -> PageWalk {
    let mut walk = PageWalk::default();

    for entry in WalkDir::new(dir).follow_links(true) {
        match entry {
            Ok(e) if e.file_type().is_file() => {
                if e.path().extension().is_some_and(|ext| ext == "html") {
                    walk.pages.push(e.into_path());
                }
            }
            Ok(_) => {}
            Err(err) if is_missing_root(&err) => {}
            Err(err) => walk.errors.push(err.into()),
        }
    }

    walk
}

fn is_missing_root(err: &walkdir::Error) -> bool {
    err.depth() == 0
        && err
            .io_error()
            .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

fn is_versions_page(path: &Path, config: &SiteConfig) -> bool {
    path.file_name()
        .is_some_and(|name| name == config.site.versions_page.as_str())
}

fn join(versions: &[Version]) -> String {
    versions
        .iter()
        .map(Version::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
