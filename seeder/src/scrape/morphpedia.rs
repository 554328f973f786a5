//! Morph wiki scraper (`morph_data.json`).
//!
//! The index page renders its trait cards client-side, so it is normally
//! fetched through the headless browser. Detail pages are visited one by one
//! with a polite pause in between.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::Local;
use regex::Regex;
use reqwest::Url;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::core::slug::{slugify, title_from_slug};
use crate::core::text::{char_len, clean_text, truncate_with_ellipsis};
use crate::io::fetch::PageFetcher;
use crate::io::json_store::write_json;
use crate::io::pacer::Pacer;
use crate::scrape::{first_text_match, parse_url, resolve_url, selector, selectors};

pub const MORPHPEDIA_URL: &str = "https://www.morphmarket.com/morphpedia/crested-geckos/";
pub const MORPH_DATA_FILE: &str = "morph_data.json";

const SOURCE: &str = "MorphMarket Morphpedia";
const MORPH_PATH: &str = "/morphpedia/crested-geckos/";
const DESCRIPTION_MIN_CHARS: usize = 30;
const DESCRIPTION_MAX_CHARS: usize = 500;
const TYPE_MAX_CHARS: usize = 50;

const CARD_SELECTORS: &[&str] = &[
    "a[href*='/morphpedia/crested-geckos/'][href$='/']",
    ".trait-card a",
    "[class*='TraitCard'] a",
    ".morph-item a",
    "a.trait-link",
];

const DESCRIPTION_SELECTORS: &[&str] = &[
    ".trait-description",
    ".description",
    "[class*='Description']",
    ".content p",
    "article p",
    "main p",
];

const TYPE_SELECTORS: &[&str] = &[
    ".trait-type",
    ".inheritance",
    "[class*='Type']",
    ".badge",
    ".tag",
];

static MORPH_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/morphpedia/crested-geckos/[a-z0-9-]+/?$").unwrap());

/// A morph card found on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MorphDetail {
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedMorph {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "originalUrl", default)]
    pub original_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorphDocument {
    pub source: String,
    pub source_url: String,
    pub scraped_at: String,
    pub total_morphs: usize,
    pub morphs: Vec<ScrapedMorph>,
}

/// Collect unique morph links from the index page, in page order.
pub fn extract_morph_links(html: &str, index_url: &Url) -> Result<Vec<MorphLink>> {
    let document = Html::parse_document(html);

    let mut cards = Vec::new();
    for sel in selectors(CARD_SELECTORS)? {
        cards = document.select(&sel).collect::<Vec<_>>();
        if !cards.is_empty() {
            break;
        }
    }
    if cards.is_empty() {
        let anchors = selector("a[href]")?;
        cards = document
            .select(&anchors)
            .filter(|a| a.value().attr("href").is_some_and(|h| MORPH_HREF_RE.is_match(h)))
            .collect();
    }

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for card in cards {
        let Some(href) = card.value().attr("href") else {
            continue;
        };
        if !href.contains(MORPH_PATH) {
            continue;
        }
        let Some(url) = resolve_url(index_url, href) else {
            continue;
        };
        if url.path() == index_url.path() || !seen.insert(url.to_string()) {
            continue;
        }

        let mut name = clean_text(&card.text().collect::<String>());
        if char_len(&name) < 2 {
            let segment = url
                .path()
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default();
            name = title_from_slug(segment);
        }
        links.push(MorphLink {
            name,
            url: url.to_string(),
        });
    }
    Ok(links)
}

/// Pull the inheritance type and description out of a detail page.
pub fn extract_morph_detail(html: &str) -> Result<MorphDetail> {
    let document = Html::parse_document(html);

    let description = first_text_match(&document, &selectors(DESCRIPTION_SELECTORS)?, &[], |t| {
        char_len(t) > DESCRIPTION_MIN_CHARS
    })
    .map(|text| truncate_with_ellipsis(&text, DESCRIPTION_MAX_CHARS))
    .unwrap_or_default();

    let kind = first_text_match(&document, &selectors(TYPE_SELECTORS)?, &[], |t| {
        !t.is_empty() && char_len(t) < TYPE_MAX_CHARS
    })
    .unwrap_or_default();

    Ok(MorphDetail { kind, description })
}

/// Scrape the index and every morph detail page.
///
/// A detail page that fails to load still produces a record with empty
/// type and description.
#[instrument(skip(fetcher, pacer))]
pub fn scrape_morphs(
    fetcher: &dyn PageFetcher,
    pacer: &Pacer,
    index_url: &str,
) -> Result<Vec<ScrapedMorph>> {
    let base = parse_url(index_url)?;
    let index_html = fetcher
        .fetch(index_url)
        .with_context(|| format!("fetch morph index {index_url}"))?;
    let links = extract_morph_links(&index_html, &base)?;
    info!(count = links.len(), "found morph links");

    let mut morphs = Vec::with_capacity(links.len());
    for (i, link) in links.iter().enumerate() {
        if i > 0 {
            pacer.pause();
        }
        let detail = match fetcher
            .fetch(&link.url)
            .and_then(|html| extract_morph_detail(&html))
        {
            Ok(detail) => detail,
            Err(err) => {
                warn!(url = %link.url, error = %format!("{err:#}"), "morph detail failed");
                MorphDetail::default()
            }
        };
        info!(
            index = i + 1,
            total = links.len(),
            name = %link.name,
            kind = %detail.kind,
            "scraped morph"
        );
        morphs.push(ScrapedMorph {
            id: slugify(&link.name),
            name: link.name.clone(),
            kind: detail.kind,
            description: detail.description,
            original_url: link.url.clone(),
        });
    }
    Ok(morphs)
}

pub fn write_morph_document(path: &Path, source_url: &str, morphs: Vec<ScrapedMorph>) -> Result<()> {
    let document = MorphDocument {
        source: SOURCE.to_string(),
        source_url: source_url.to_string(),
        scraped_at: Local::now().to_rfc3339(),
        total_morphs: morphs.len(),
        morphs,
    };
    write_json(path, &document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StaticFetcher;

    fn index_url() -> Url {
        Url::parse(MORPHPEDIA_URL).expect("index url")
    }

    const INDEX_HTML: &str = r#"
        <html><body>
          <a href="/morphpedia/crested-geckos/">All crested geckos</a>
          <a href="/morphpedia/crested-geckos/lilly-white/">Lilly White
             Incomplete Dominant</a>
          <a href="/morphpedia/crested-geckos/lilly-white/">Lilly White again</a>
          <a href="/morphpedia/crested-geckos/axanthic/"> </a>
          <a href="/morphpedia/leopard-geckos/tremper/">Tremper</a>
        </body></html>
    "#;

    #[test]
    fn links_from_primary_selector_are_deduplicated() {
        let links = extract_morph_links(INDEX_HTML, &index_url()).expect("links");
        assert_eq!(
            links,
            vec![
                MorphLink {
                    name: "Lilly White Incomplete Dominant".to_string(),
                    url: "https://www.morphmarket.com/morphpedia/crested-geckos/lilly-white/"
                        .to_string(),
                },
                MorphLink {
                    name: "Axanthic".to_string(),
                    url: "https://www.morphmarket.com/morphpedia/crested-geckos/axanthic/"
                        .to_string(),
                },
            ]
        );
    }

    #[test]
    fn falls_back_to_href_pattern_without_trailing_slash() {
        let html = r#"
            <div>
              <a href="https://www.morphmarket.com/morphpedia/crested-geckos/Harlequin">Harlequin</a>
              <a href="/morphpedia/crested-geckos/harlequin/extra">Nested</a>
              <a href="/about">About</a>
            </div>
        "#;
        let links = extract_morph_links(html, &index_url()).expect("links");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "Harlequin");
    }

    #[test]
    fn detail_prefers_first_long_description_and_short_type() {
        let long = "x".repeat(600);
        let html = format!(
            r#"<main>
                 <div class="description">Too short.</div>
                 <span class="badge">Recessive</span>
                 <article><p>{long}</p></article>
               </main>"#
        );
        let detail = extract_morph_detail(&html).expect("detail");
        assert_eq!(detail.kind, "Recessive");
        assert_eq!(char_len(&detail.description), DESCRIPTION_MAX_CHARS + 3);
        assert!(detail.description.ends_with("..."));
    }

    #[test]
    fn detail_ignores_overlong_type_text() {
        let html = format!(
            r#"<div class="trait-type">{}</div><div class="tag">Dominant</div>"#,
            "word ".repeat(20)
        );
        let detail = extract_morph_detail(&html).expect("detail");
        assert_eq!(detail.kind, "Dominant");
        assert_eq!(detail.description, "");
    }

    #[test]
    fn failed_detail_page_still_yields_a_record() {
        let fetcher = StaticFetcher::new()
            .with_page(MORPHPEDIA_URL, INDEX_HTML)
            .with_page(
                "https://www.morphmarket.com/morphpedia/crested-geckos/lilly-white/",
                r#"<p class="trait-description">Lilly White is an incomplete dominant trait with white patterning.</p>
                   <span class="inheritance">Incomplete Dominant</span>"#,
            );
        let morphs = scrape_morphs(&fetcher, &Pacer::none(), MORPHPEDIA_URL).expect("scrape");

        assert_eq!(morphs.len(), 2);
        assert_eq!(morphs[0].id, "lilly-white-incomplete-dominant");
        assert_eq!(morphs[0].kind, "Incomplete Dominant");
        assert!(morphs[0].description.starts_with("Lilly White is"));
        assert_eq!(morphs[1].id, "axanthic");
        assert_eq!(morphs[1].kind, "");
        assert_eq!(morphs[1].description, "");
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[test]
    fn index_failure_is_an_error() {
        let fetcher = StaticFetcher::new();
        assert!(scrape_morphs(&fetcher, &Pacer::none(), MORPHPEDIA_URL).is_err());
    }

    #[test]
    fn document_uses_site_field_names() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(MORPH_DATA_FILE);
        let morph = ScrapedMorph {
            id: "axanthic".to_string(),
            name: "Axanthic".to_string(),
            kind: "Recessive".to_string(),
            description: String::new(),
            original_url: "https://example.com/axanthic/".to_string(),
        };
        write_morph_document(&path, MORPHPEDIA_URL, vec![morph]).expect("write");
        let raw = std::fs::read_to_string(&path).expect("read");
        assert!(raw.contains("\"originalUrl\""));
        assert!(raw.contains("\"type\": \"Recessive\""));
        assert!(raw.contains("\"total_morphs\": 1"));
    }
}
