//! Command-line interface definitions.

use clap::Parser;

/// Inject version navigation into a generated course site
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path segment placed in front of every generated link, e.g. `course`
    /// produces `/course/index.html`
    pub prefix: String,
}
