//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    use std::path::PathBuf;

    pub fn root() -> PathBuf {
        "_site".into()
    }

    pub fn archive() -> String {
        "archive".into()
    }

    pub fn versions_page() -> String {
        "versions.html".into()
    }
}

// ============================================================================
// [dropdown] Section Defaults
// ============================================================================

pub mod dropdown {
    pub fn limit() -> usize {
        3
    }
}
