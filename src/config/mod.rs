//! Run configuration.
//!
//! Settings come from an optional `course-versions.toml` in the working
//! directory; every field has a default matching the layout the site
//! generator produces, so most runs need no file at all.
//!
//! ```toml
//! [site]
//! root = "_site"
//! archive = "archive"
//! versions_page = "versions.html"
//!
//! [dropdown]
//! limit = 3
//! ```

mod defaults;
mod error;

pub use error::ConfigError;

use crate::cli::Cli;
use anyhow::{Result, bail};
use educe::Educe;
use serde::Deserialize;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "course-versions.toml";

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub dropdown: DropdownConfig,

    /// Link prefix, always taken from the command line.
    #[serde(skip)]
    pub prefix: String,
}

/// `[site]` section - where the generated pages live.
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Generated-site root directory.
    #[serde(default = "defaults::site::root")]
    #[educe(Default = defaults::site::root())]
    pub root: PathBuf,

    /// Name of the archive subdirectory under `root`.
    #[serde(default = "defaults::site::archive")]
    #[educe(Default = defaults::site::archive())]
    pub archive: String,

    /// Filename of the versions-listing page.
    #[serde(default = "defaults::site::versions_page")]
    #[educe(Default = defaults::site::versions_page())]
    pub versions_page: String,
}

/// `[dropdown]` section.
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DropdownConfig {
    /// Number of archived versions listed before the "More versions..." link.
    #[serde(default = "defaults::dropdown::limit")]
    #[educe(Default = defaults::dropdown::limit())]
    pub limit: usize,
}

impl SiteConfig {
    /// Parse configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load `course-versions.toml` from `dir` if present, defaults otherwise.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            Self::from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply command-line arguments.
    ///
    /// Surrounding slashes are dropped so `course`, `/course` and `/course/`
    /// all produce `/course/...` links.
    pub fn update_with_cli(&mut self, cli: &Cli) {
        self.prefix = cli.prefix.trim_matches('/').to_owned();
    }

    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            bail!(ConfigError::Validation("prefix must not be empty".into()));
        }
        if self.dropdown.limit == 0 {
            bail!(ConfigError::Validation(
                "[dropdown.limit] must be at least 1".into()
            ));
        }
        if !is_single_component(&self.site.archive) {
            bail!(ConfigError::Validation(
                "[site.archive] must be a single directory name".into()
            ));
        }
        if !is_single_component(&self.site.versions_page) {
            bail!(ConfigError::Validation(
                "[site.versions_page] must be a plain file name".into()
            ));
        }
        Ok(())
    }

    /// Directory holding one subdirectory per archived version.
    pub fn archive_dir(&self) -> PathBuf {
        self.site.root.join(&self.site.archive)
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
