//! Best-effort scrapers for third-party care content.
//!
//! Markup on the scraped sites changes without notice, so every extraction
//! walks a chain of fallback selectors and keeps the first one that yields
//! usable text. Failed detail pages are logged and skipped; only a failed
//! index page aborts a run.

pub mod blog;
pub mod guide;
pub mod morphpedia;

use anyhow::{Result, anyhow};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::core::text::clean_text;

/// Parse a CSS selector.
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow!("invalid selector {css:?}: {err:?}"))
}

/// Parse a list of CSS selectors, preserving order.
pub(crate) fn selectors(css: &[&str]) -> Result<Vec<Selector>> {
    css.iter().map(|s| selector(s)).collect()
}

/// Text of `element` with the subtrees matching any of `skip` left out.
pub(crate) fn text_excluding(element: ElementRef<'_>, skip: &[Selector]) -> String {
    let mut out = String::new();
    collect_text(element, skip, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, skip: &[Selector], out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            if skip.iter().any(|s| s.matches(&child)) {
                continue;
            }
            collect_text(child, skip, out);
        }
    }
}

/// First element in the fallback chain whose cleaned text satisfies `accept`.
///
/// Only the first match of each selector is considered.
pub(crate) fn first_text_match(
    document: &Html,
    chain: &[Selector],
    skip: &[Selector],
    accept: impl Fn(&str) -> bool,
) -> Option<String> {
    chain.iter().find_map(|sel| {
        let element = document.select(sel).next()?;
        let text = clean_text(&text_excluding(element, skip));
        accept(&text).then_some(text)
    })
}

/// Resolve an `href` against the page it appeared on.
pub(crate) fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok()
}

pub(crate) fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|err| anyhow!("invalid url {url:?}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_excluding_drops_skipped_subtrees() {
        let html = Html::parse_fragment(
            "<div><p>Keep <b>this</b></p><script>var x;</script><nav>menu</nav> tail</div>",
        );
        let div = html
            .select(&selector("div").expect("selector"))
            .next()
            .expect("div");
        let skip = selectors(&["script", "nav"]).expect("skip");
        assert_eq!(clean_text(&text_excluding(div, &skip)), "Keep this tail");
    }

    #[test]
    fn first_text_match_walks_the_chain() {
        let html = Html::parse_document(
            "<main><p class='a'>short</p><p class='b'>long enough text here</p></main>",
        );
        let chain = selectors(&[".missing", ".a", ".b"]).expect("chain");
        let found = first_text_match(&html, &chain, &[], |t| t.len() > 10);
        assert_eq!(found.as_deref(), Some("long enough text here"));
        assert_eq!(first_text_match(&html, &chain, &[], |t| t.len() > 100), None);
    }

    #[test]
    fn resolve_url_handles_relative_and_absolute() {
        let base = parse_url("https://www.example.com/blogs/blog").expect("base");
        assert_eq!(
            resolve_url(&base, "/blogs/blog/care").map(String::from).as_deref(),
            Some("https://www.example.com/blogs/blog/care")
        );
        assert_eq!(
            resolve_url(&base, "https://other.org/x").map(String::from).as_deref(),
            Some("https://other.org/x")
        );
        assert!(resolve_url(&base, "  ").is_none());
    }

    #[test]
    fn invalid_selector_is_an_error() {
        assert!(selector("a[[[").is_err());
        assert!(selector("").is_err());
    }

    #[test]
    fn unclosed_attribute_bracket_is_accepted_as_attribute_test() {
        let html = Html::parse_document("<a href='/x'>one</a><a>two</a>");
        let lenient = selector("a[href").expect("lenient selector");
        assert_eq!(html.select(&lenient).count(), 1);
    }
}
