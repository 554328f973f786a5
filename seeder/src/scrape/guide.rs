//! Care guide scraper (`reptifiles_data.json`).
//!
//! The guide is a table of contents linking to one page per chapter. Chapter
//! bodies are flattened to lightweight markdown: headings become `##` lines
//! and list items become `-` bullets.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::core::text::{char_len, clean_text};
use crate::io::fetch::PageFetcher;
use crate::io::json_store::write_json;
use crate::io::pacer::Pacer;
use crate::scrape::{parse_url, resolve_url, selector, selectors, text_excluding};

pub const GUIDE_URL: &str = "https://reptifiles.com/crested-gecko-care/";
pub const GUIDE_DATA_FILE: &str = "reptifiles_data.json";

const SOURCE: &str = "ReptiFiles";
const CONTENT_SELECTOR: &str = ".entry-content";
const BLOCK_SELECTOR: &str = "p, h2, h3, li";
const LINK_EXCLUDES: &[&str] = &["share=", "jpg", "#"];
const LINK_TEXT_MIN_CHARS: usize = 3;

const CONTENT_SKIP: &[&str] = &[
    ".adthrive-ad",
    ".sharedaddy",
    ".jp-relatedposts",
    "script",
    "style",
    ".widget",
    ".advertisement",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideChapter {
    pub chapter: String,
    pub url: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideDocument {
    pub source: String,
    pub source_url: String,
    pub total_chapters: usize,
    pub chapters: Vec<GuideChapter>,
}

/// Chapter links inside the guide body, deduplicated in first-seen order.
pub fn extract_chapter_links(html: &str, guide_url: &Url) -> Result<Vec<ChapterLink>> {
    let document = Html::parse_document(html);
    let anchors = selector(&format!("{CONTENT_SELECTOR} a"))?;
    let marker = format!("{}{}", guide_url.host_str().unwrap_or_default(), guide_url.path());

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for anchor in document.select(&anchors) {
        let Some(url) = anchor
            .value()
            .attr("href")
            .and_then(|href| resolve_url(guide_url, href))
        else {
            continue;
        };
        let url = url.to_string();
        let title = clean_text(&anchor.text().collect::<String>());
        if !url.contains(&marker)
            || url == guide_url.as_str()
            || LINK_EXCLUDES.iter().any(|needle| url.contains(needle))
            || char_len(&title) <= LINK_TEXT_MIN_CHARS
        {
            continue;
        }
        if seen.insert(url.clone()) {
            links.push(ChapterLink { title, url });
        }
    }
    Ok(links)
}

fn inside_skipped(element: ElementRef<'_>, skip: &[Selector]) -> bool {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .any(|el| skip.iter().any(|s| s.matches(&el)))
}

/// Flatten a chapter page to markdown-ish text; `None` when there is no body.
pub fn extract_chapter_content(html: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    let Some(body) = document.select(&selector(CONTENT_SELECTOR)?).next() else {
        return Ok(None);
    };
    let blocks = selector(BLOCK_SELECTOR)?;
    let skip = selectors(CONTENT_SKIP)?;

    let mut parts = Vec::new();
    for element in body.select(&blocks) {
        if inside_skipped(element, &skip) {
            continue;
        }
        let text = clean_text(&text_excluding(element, &skip));
        if char_len(&text) <= 1 {
            continue;
        }
        match element.value().name() {
            "h2" | "h3" => parts.push(format!("\n## {text}\n")),
            "li" => parts.push(format!("- {text}")),
            _ => parts.push(text),
        }
    }
    if parts.is_empty() {
        return Ok(None);
    }
    Ok(Some(parts.join("\n\n")))
}

/// Scrape the guide's table of contents and every chapter it links to.
#[instrument(skip(fetcher, pacer))]
pub fn scrape_guide(fetcher: &dyn PageFetcher, pacer: &Pacer, guide_url: &str) -> Result<Vec<GuideChapter>> {
    let base = parse_url(guide_url)?;
    let index_html = fetcher
        .fetch(guide_url)
        .with_context(|| format!("fetch guide index {guide_url}"))?;
    let links = extract_chapter_links(&index_html, &base)?;
    info!(count = links.len(), "found guide chapters");

    let mut chapters = Vec::with_capacity(links.len());
    for (i, link) in links.into_iter().enumerate() {
        if i > 0 {
            pacer.pause();
        }
        let content = match fetcher
            .fetch(&link.url)
            .and_then(|html| extract_chapter_content(&html))
        {
            Ok(Some(content)) => content,
            Ok(None) => {
                warn!(url = %link.url, "chapter has no content");
                continue;
            }
            Err(err) => {
                warn!(url = %link.url, error = %format!("{err:#}"), "skipping chapter");
                continue;
            }
        };
        info!(index = i + 1, chapter = %link.title, chars = char_len(&content), "scraped chapter");
        chapters.push(GuideChapter {
            chapter: link.title,
            url: link.url,
            content,
        });
    }
    Ok(chapters)
}

pub fn write_guide_document(path: &Path, source_url: &str, chapters: Vec<GuideChapter>) -> Result<()> {
    let document = GuideDocument {
        source: SOURCE.to_string(),
        source_url: source_url.to_string(),
        total_chapters: chapters.len(),
        chapters,
    };
    write_json(path, &document)
}
