//! Anchor strategies for locating the region a fragment replaces.
//!
//! Each strategy answers one question: where in this document does the
//! fragment go? Injectors try an ordered list of strategies and splice the
//! fragment at the first hit.

use regex::Regex;
use std::{ops::Range, sync::LazyLock};

/// Region of a document to overwrite with a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    /// Byte range replaced; empty for a pure insertion.
    pub range: Range<usize>,
    /// Text written in front of the fragment.
    pub lead: &'static str,
}

impl Splice {
    const fn insert_at(pos: usize) -> Self {
        Self {
            range: pos..pos,
            lead: "",
        }
    }

    /// Produce the new document.
    pub fn apply(&self, html: &str, fragment: &str) -> String {
        let mut out = String::with_capacity(html.len() + self.lead.len() + fragment.len());
        out.push_str(&html[..self.range.start]);
        out.push_str(self.lead);
        out.push_str(fragment);
        out.push_str(&html[self.range.end..]);
        out
    }
}

/// A way of finding where a fragment belongs.
pub trait AnchorLocator {
    fn locate(&self, html: &str) -> Option<Splice>;

    /// Human-readable anchor name for failure reports.
    fn describe(&self) -> String;
}

/// Applies the first matching locator from an ordered list.
pub struct FragmentInjector<'a> {
    locators: &'a [&'a dyn AnchorLocator],
}

impl<'a> FragmentInjector<'a> {
    pub const fn new(locators: &'a [&'a dyn AnchorLocator]) -> Self {
        Self { locators }
    }

    /// Splice `fragment` into `html`, or `None` when no locator matched.
    pub fn inject(&self, html: &str, fragment: &str) -> Option<String> {
        self.locators
            .iter()
            .find_map(|locator| locator.locate(html))
            .map(|splice| splice.apply(html, fragment))
    }

    pub fn describe(&self) -> String {
        self.locators
            .iter()
            .map(|locator| locator.describe())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// Content strictly between a `<!-- START -->` / `<!-- END -->` comment pair.
///
/// Markers stay in place; whitespace inside the comments and letter case
/// are tolerated. The fragment is written on a fresh line after the start
/// marker.
pub struct MarkerRegion {
    pattern: Regex,
    start: &'static str,
    end: &'static str,
}

impl MarkerRegion {
    pub fn new(start: &'static str, end: &'static str) -> Self {
        let pattern = format!(
            r"(?is)<!--\s*{}\s*-->(.*?)<!--\s*{}\s*-->",
            regex::escape(start),
            regex::escape(end)
        );
        Self {
            pattern: Regex::new(&pattern).expect("escaped marker names form a valid pattern"),
            start,
            end,
        }
    }
}

impl AnchorLocator for MarkerRegion {
    fn locate(&self, html: &str) -> Option<Splice> {
        let inner = self.pattern.captures(html)?.get(1)?;
        Some(Splice {
            range: inner.range(),
            lead: "\n",
        })
    }

    fn describe(&self) -> String {
        format!("`<!-- {} -->`/`<!-- {} -->` markers", self.start, self.end)
    }
}

/// Opening `<div>` tag with a double-quoted class attribute.
static RE_DIV_WITH_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div\b[^>]*?\bclass\s*=\s*"([^"]*)"[^>]*>"#).unwrap()
});

/// Any opening or closing `div` tag.
static RE_DIV_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<div\b[^>]*>|</div\s*>").unwrap());

/// Inner content of the first `<div>` whose class list contains `token`.
///
/// The closing tag is found by balancing nested divs, so content that was
/// injected on a previous run is replaced whole.
pub struct ClassTokenInner {
    token: &'static str,
}

impl ClassTokenInner {
    pub const fn new(token: &'static str) -> Self {
        Self { token }
    }
}

impl AnchorLocator for ClassTokenInner {
    fn locate(&self, html: &str) -> Option<Splice> {
        let open = RE_DIV_WITH_CLASS.captures_iter(html).find(|caps| {
            caps.get(1)
                .is_some_and(|class| class.as_str().split_whitespace().any(|c| c == self.token))
        })?;
        let inner_start = open.get(0)?.end();

        let mut depth = 1usize;
        for tag in RE_DIV_TAG.find_iter(&html[inner_start..]) {
            if tag.as_str().starts_with("</") {
                depth -= 1;
                if depth == 0 {
                    return Some(Splice {
                        range: inner_start..inner_start + tag.start(),
                        lead: "",
                    });
                }
            } else if !tag.as_str().ends_with("/>") {
                depth += 1;
            }
        }
        None
    }

    fn describe(&self) -> String {
        format!(r#"`<div class="{}">`"#, self.token)
    }
}

/// Insertion point right before the first occurrence of a closing tag.
pub struct BeforeClosingTag {
    tag: &'static str,
}

impl BeforeClosingTag {
    pub const fn new(tag: &'static str) -> Self {
        Self { tag }
    }
}

impl AnchorLocator for BeforeClosingTag {
    fn locate(&self, html: &str) -> Option<Splice> {
        html.find(self.tag).map(Splice::insert_at)
    }

    fn describe(&self) -> String {
        format!("`{}`", self.tag)
    }
}

/// Insertion point right after the first occurrence of an opening tag.
pub struct AfterOpeningTag {
    tag: &'static str,
}

impl AfterOpeningTag {
    pub const fn new(tag: &'static str) -> Self {
        Self { tag }
    }
}

impl AnchorLocator for AfterOpeningTag {
    fn locate(&self, html: &str) -> Option<Splice> {
        html.find(self.tag).map(|pos| Splice::insert_at(pos + self.tag.len()))
    }

    fn describe(&self) -> String {
        format!("`{}`", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_region() {
        let locator = MarkerRegion::new("START", "END");
        let html = "a<!-- START -->old<!--END-->b";

        let splice = locator.locate(html).unwrap();
        assert_eq!(&html[splice.range.clone()], "old");
        assert_eq!(splice.apply(html, "new"), "a<!-- START -->\nnew<!--END-->b");
    }

    #[test]
    fn test_marker_region_case_and_multiline() {
        let locator = MarkerRegion::new("START", "END");
        let html = "<!--  start  -->\n<p>x</p>\n<p>y</p>\n<!-- end -->";
        assert!(locator.locate(html).is_some());
        assert!(locator.locate("<!-- START --> only").is_none());
    }

    #[test]
    fn test_class_token_balances_nested_divs() {
        let locator = ClassTokenInner::new("list-group");
        let html = r#"<div class="list-group"><div class="x"><div>a</div></div><div>b</div></div><p>tail</p>"#;

        let splice = locator.locate(html).unwrap();
        assert_eq!(
            &html[splice.range.clone()],
            r#"<div class="x"><div>a</div></div><div>b</div>"#
        );
        assert_eq!(
            splice.apply(html, "new"),
            r#"<div class="list-group">new</div><p>tail</p>"#
        );
    }

    #[test]
    fn test_class_token_requires_whole_token() {
        let locator = ClassTokenInner::new("list-group");
        let html = r#"<div class="list-group-item">x</div><div id="v" class="mt-2 list-group flush">y</div>"#;

        let splice = locator.locate(html).unwrap();
        assert_eq!(&html[splice.range], "y");
    }

    #[test]
    fn test_class_token_unclosed() {
        let locator = ClassTokenInner::new("list-group");
        assert!(locator.locate(r#"<div class="list-group"><div>x</div>"#).is_none());
    }

    #[test]
    fn test_before_and_after_tags() {
        let html = "<nav>x</nav><nav>y</nav>";
        let splice = BeforeClosingTag::new("</nav>").locate(html).unwrap();
        assert_eq!(splice.apply(html, "!"), "<nav>x!</nav><nav>y</nav>");

        let html = "<main>body</main>";
        let splice = AfterOpeningTag::new("<main>").locate(html).unwrap();
        assert_eq!(splice.apply(html, "!"), "<main>!body</main>");
    }

    #[test]
    fn test_injector_order() {
        let markers = MarkerRegion::new("START", "END");
        let fallback = ClassTokenInner::new("list-group");
        let locators: [&dyn AnchorLocator; 2] = [&markers, &fallback];
        let injector = FragmentInjector::new(&locators);

        let both = r#"<div class="list-group">legacy</div><!-- START -->old<!-- END -->"#;
        assert_eq!(
            injector.inject(both, "new").unwrap(),
            r#"<div class="list-group">legacy</div><!-- START -->
new<!-- END -->"#
        );

        let legacy = r#"<div class="list-group">legacy</div>"#;
        assert_eq!(
            injector.inject(legacy, "new").unwrap(),
            r#"<div class="list-group">new</div>"#
        );

        assert!(injector.inject("<p>nothing</p>", "new").is_none());
        assert!(injector.describe().contains(" or "));
    }
}
