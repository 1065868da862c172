//! course-versions - version navigation for a generated course site.
//!
//! Runs after the site generator and rewrites the produced HTML in place:
//! a version dropdown in every navbar, the archive listing on the versions
//! page, and a deprecation banner on every archived page.

mod cli;
mod config;
mod inject;
mod logger;
mod render;
mod update;
mod version;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::SiteConfig;
use std::path::Path;
use update::update_site;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    log!("versions"; "updating `{}` with prefix `/{}`", config.site.root.display(), config.prefix);
    let report = update_site(&config)?;
    report.log();

    Ok(())
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let mut config = SiteConfig::load(Path::new("./"))?;
    config.update_with_cli(cli);
    config.validate()?;
    Ok(config)
}
