//! HTML fragment rendering.
//!
//! Every fragment is a pure function of its inputs, so identical inputs
//! always produce byte-identical output. Interpolated values are escaped;
//! for validated version ids and plain path prefixes escaping is a no-op.

use crate::version::format_version_date;

/// `id` attribute carried by the injected dropdown `<li>`.
pub const DROPDOWN_ID: &str = "version-dropdown";

/// `id` attribute carried by the deprecation banner.
pub const BANNER_ID: &str = "deprecation-warning";

// ============================================================================
// Links
// ============================================================================

/// Root-relative link builder for one site layout.
#[derive(Debug, Clone, Copy)]
pub struct SiteLinks<'a> {
    prefix: &'a str,
    archive: &'a str,
    versions_page: &'a str,
}

impl<'a> SiteLinks<'a> {
    pub const fn with_layout(prefix: &'a str, archive: &'a str, versions_page: &'a str) -> Self {
        Self {
            prefix,
            archive,
            versions_page,
        }
    }

    /// `/{prefix}/index.html`
    pub fn latest(&self) -> String {
        format!("/{}/index.html", escape_html(self.prefix))
    }

    /// `/{prefix}/{archive}/{version}/index.html`
    pub fn version(&self, version: &str) -> String {
        format!(
            "/{}/{}/{}/index.html",
            escape_html(self.prefix),
            escape_html(self.archive),
            escape_html(version)
        )
    }

    /// `/{prefix}/{versions_page}`
    pub fn versions_page(&self) -> String {
        format!(
            "/{}/{}",
            escape_html(self.prefix),
            escape_html(self.versions_page)
        )
    }
}

// ============================================================================
// Dropdown
// ============================================================================

/// Render the navbar version menu.
///
/// Lists "Latest", then the first `limit` entries of `versions` (expected
/// newest first), then a "More versions..." link when entries were left
/// out. `current` adds a badge next to the menu label.
pub fn render_dropdown<V: AsRef<str>>(
    versions: &[V],
    links: &SiteLinks,
    limit: usize,
    current: Option<&str>,
) -> String {
    let mut html = String::with_capacity(1024);

    html.push_str(&format!(
        r#"<li id="{DROPDOWN_ID}" class="nav-item dropdown">"#
    ));
    html.push('\n');
    html.push_str(
        r##"  <a class="nav-link dropdown-toggle" href="#" id="nav-menu-versions" role="link" data-bs-toggle="dropdown" aria-expanded="false">"##,
    );
    html.push('\n');
    html.push_str(r#"    <span class="menu-text">Version:</span>"#);
    if let Some(label) = current {
        html.push_str(&format!(
            r#" <span class="version-badge" aria-hidden="true">{}</span>"#,
            escape_html(label)
        ));
    }
    html.push('\n');
    html.push_str("  </a>\n");
    html.push_str(r#"  <ul class="dropdown-menu" aria-labelledby="nav-menu-versions">"#);
    html.push('\n');

    push_menu_item(&mut html, &links.latest(), "Latest");
    for version in versions.iter().take(limit) {
        let version = version.as_ref();
        push_menu_item(&mut html, &links.version(version), &escape_html(version));
    }
    if versions.len() > limit {
        html.push_str(r#"    <li><hr class="dropdown-divider"></li>"#);
        html.push('\n');
        push_menu_item(&mut html, &links.versions_page(), "More versions...");
    }

    html.push_str("  </ul>\n");
    html.push_str("</li>");
    html
}

fn push_menu_item(html: &mut String, href: &str, text: &str) {
    html.push_str("    <li>\n");
    html.push_str(&format!(r#"      <a class="dropdown-item" href="{href}">"#));
    html.push('\n');
    html.push_str(&format!(r#"        <span class="dropdown-text">{text}</span>"#));
    html.push('\n');
    html.push_str("      </a>\n");
    html.push_str("    </li>\n");
}

// ============================================================================
// Archive listing
// ============================================================================

/// Render the versions-page listing: a "latest" block followed by one block
/// per version, separated by blank lines.
///
/// Returns an empty string when there are no versions; callers treat that
/// as nothing to inject.
pub fn render_archive_list<V: AsRef<str>>(versions: &[V], links: &SiteLinks) -> String {
    if versions.is_empty() {
        return String::new();
    }

    let mut blocks = Vec::with_capacity(versions.len() + 1);

    blocks.push(list_item(
        "Latest Version",
        "Current",
        &links.latest(),
        "View Latest Version",
    ));

    for version in versions {
        let version = version.as_ref();
        let id = escape_html(version);
        blocks.push(list_item(
            &format!("Version {id}"),
            &escape_html(&format_version_date(version)),
            &links.version(version),
            &format!("View Version {id}"),
        ));
    }

    blocks.join("\n\n")
}

fn list_item(title: &str, subtitle: &str, href: &str, link_text: &str) -> String {
    format!(
        r#"<div class="list-group-item list-group-item-action">
<div class="d-flex w-100 justify-content-between">
<h5 class="mb-1 anchored">{title}</h5>
<p><small class="text-muted">{subtitle}</small></p>
</div>
<p><a href="{href}">{link_text}</a></p>
</div>"#
    )
}

// ============================================================================
// Deprecation banner
// ============================================================================

/// Render the warning callout placed at the top of archived pages.
pub fn render_banner(links: &SiteLinks) -> String {
    let latest = links.latest();
    format!(
        r#"
<div id="{BANNER_ID}" class="callout callout-style-default callout-warning callout-titled">
<div class="callout-header d-flex align-content-center">
<div class="callout-icon-container">
<i class="callout-icon"></i>
</div>
<div class="callout-title-container flex-fill">
Warning
</div>
</div>
<div class="callout-body-container callout-body">
<p><font size="+2">This is an archived version of the course - please consider using the <a href="{latest}">latest version</a>.</font></p>
</div>
</div>
"#
    )
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Escape special HTML characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINKS: SiteLinks<'static> = SiteLinks::with_layout("course", "archive", "versions.html");

    const FIVE: [&str; 5] = [
        "2025.05.01",
        "2025.04.01",
        "2025.03.01",
        "2025.02.01",
        "2025.01.01",
    ];

    #[test]
    fn test_dropdown_limits_entries() {
        let html = render_dropdown(&FIVE, &LINKS, 3, None);

        assert_eq!(html.matches(r#"href="/course/archive/"#).count(), 3);
        assert!(html.contains("/course/archive/2025.05.01/index.html"));
        assert!(html.contains("/course/archive/2025.03.01/index.html"));
        assert!(!html.contains("2025.02.01"));
        assert!(html.contains(r#"href="/course/versions.html""#));
        assert!(html.contains("More versions..."));
        assert!(html.contains("dropdown-divider"));
    }

    #[test]
    fn test_dropdown_without_more_link() {
        let html = render_dropdown(&FIVE[..2], &LINKS, 3, None);

        assert_eq!(html.matches(r#"href="/course/archive/"#).count(), 2);
        assert!(!html.contains("More versions..."));
        assert!(!html.contains("versions.html"));
    }

    #[test]
    fn test_dropdown_exactly_limit() {
        let html = render_dropdown(&FIVE[..3], &LINKS, 3, None);
        assert!(!html.contains("More versions..."));
    }

    #[test]
    fn test_dropdown_latest_always_present() {
        let html = render_dropdown::<&str>(&[], &LINKS, 3, None);
        assert!(html.contains(r#"href="/course/index.html""#));
        assert!(html.contains(r#"<span class="dropdown-text">Latest</span>"#));
        assert!(html.starts_with(r#"<li id="version-dropdown" class="nav-item dropdown">"#));
        assert!(html.ends_with("</ul>\n</li>"));
    }

    #[test]
    fn test_dropdown_badge() {
        let plain = render_dropdown(&FIVE, &LINKS, 3, None);
        assert!(!plain.contains("version-badge"));

        let badged = render_dropdown(&FIVE, &LINKS, 3, Some("2025.04.01"));
        assert!(badged.contains(
            r#"<span class="menu-text">Version:</span> <span class="version-badge" aria-hidden="true">2025.04.01</span>"#
        ));
    }

    #[test]
    fn test_dropdown_deterministic() {
        assert_eq!(
            render_dropdown(&FIVE, &LINKS, 3, Some("Latest")),
            render_dropdown(&FIVE, &LINKS, 3, Some("Latest"))
        );
    }

    #[test]
    fn test_dropdown_escapes_badge() {
        let html = render_dropdown::<&str>(&[], &LINKS, 3, Some("<b>"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_archive_list_empty() {
        assert_eq!(render_archive_list::<&str>(&[], &LINKS), "");
    }

    #[test]
    fn test_archive_list_blocks() {
        let html = render_archive_list(&["2024.06.15", "2024.01.01"], &LINKS);

        assert_eq!(html.matches(r#"<div class="list-group-item"#).count(), 3);
        assert!(html.starts_with(r#"<div class="list-group-item list-group-item-action">"#));
        assert!(html.contains("Latest Version"));
        assert!(html.contains("View Latest Version"));
        assert!(html.contains("Version 2024.06.15"));
        assert!(html.contains("June 15, 2024"));
        assert!(html.contains("January 01, 2024"));
        assert!(html.contains(r#"<a href="/course/archive/2024.01.01/index.html">View Version 2024.01.01</a>"#));
        // newest first, after the latest block
        let latest = html.find("Latest Version").unwrap();
        let june = html.find("2024.06.15").unwrap();
        let jan = html.find("2024.01.01").unwrap();
        assert!(latest < june && june < jan);
        assert_eq!(html.matches("</div>\n\n<div").count(), 2);
    }

    #[test]
    fn test_archive_list_malformed_id_falls_back() {
        let html = render_archive_list(&["2025.01.15", "bad.version.id"], &LINKS);

        assert!(html.contains("January 15, 2025"));
        assert!(html.contains(r#"<small class="text-muted">bad.version.id</small>"#));
        assert!(html.contains("Version bad.version.id"));
    }

    #[test]
    fn test_banner() {
        let html = render_banner(&LINKS);
        assert!(html.contains(r#"id="deprecation-warning""#));
        assert!(html.contains(r#"<a href="/course/index.html">latest version</a>"#));
    }

    #[test]
    fn test_custom_layout_links() {
        let links = SiteLinks::with_layout("course", "old", "all-versions.html");
        let html = render_dropdown(&FIVE, &links, 1, None);
        assert!(html.contains(r#"href="/course/old/2025.05.01/index.html""#));
        assert!(html.contains(r#"href="/course/all-versions.html""#));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("course"), "course");
        assert_eq!(escape_html("2024.01.01"), "2024.01.01");
        assert_eq!(escape_html(r#"a"b<c>&'"#), "a&quot;b&lt;c&gt;&amp;&#39;");
    }
}
