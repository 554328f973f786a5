//! Care blog scraper (`pangea_data.json`).

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::Local;
use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::core::text::{char_len, clean_text, truncate_with_ellipsis};
use crate::io::fetch::PageFetcher;
use crate::io::json_store::write_json;
use crate::io::pacer::Pacer;
use crate::scrape::{first_text_match, parse_url, resolve_url, selector, selectors};

pub const BLOG_URL: &str = "https://www.pangeareptile.com/blogs/blog";
pub const BLOG_DATA_FILE: &str = "pangea_data.json";

const SOURCE: &str = "Pangea Reptile Blog";
const ARTICLE_PATH: &str = "/blogs/blog/";
const UNTITLED: &str = "Untitled";
const CONTENT_MIN_CHARS: usize = 50;
const SUMMARY_CHARS: usize = 200;

const LIST_SELECTORS: &[&str] = &[
    "article.article",
    ".blog-post",
    ".article-item",
    ".blog-article",
    "article",
    ".article",
];

const CONTENT_SELECTORS: &[&str] = &[
    ".article__content",
    ".blog-content",
    ".rte",
    ".article-content",
    "article .content",
    ".post-content",
    "article",
];

const CONTENT_SKIP: &[&str] = &["script", "style", "nav", "header", "footer"];

static ARTICLE_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/blogs/blog/[^/]+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogArticle {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub content: String,
    pub scraped_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogDocument {
    pub source: String,
    pub source_url: String,
    pub scraped_at: String,
    pub total_articles: usize,
    pub articles: Vec<BlogArticle>,
}

fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Collect article links from the blog index.
pub fn extract_article_links(html: &str, base: &Url) -> Result<Vec<ArticleLink>> {
    let document = Html::parse_document(html);
    let anchor = selector("a[href]")?;
    let heading = selector("h1, h2, h3, h4")?;

    let mut items = Vec::new();
    for sel in selectors(LIST_SELECTORS)? {
        items = document.select(&sel).collect::<Vec<_>>();
        if !items.is_empty() {
            break;
        }
    }

    let mut links = Vec::new();
    if items.is_empty() {
        let mut seen = HashSet::new();
        for link in document.select(&anchor) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            if !ARTICLE_HREF_RE.is_match(href) || !seen.insert(href.to_string()) {
                continue;
            }
            let Some(url) = resolve_url(base, href) else {
                continue;
            };
            let title = Some(element_text(link))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string());
            links.push(ArticleLink {
                title,
                url: url.to_string(),
            });
        }
        return Ok(links);
    }

    for item in items {
        let Some(link) = item
            .select(&anchor)
            .find(|a| a.value().attr("href").is_some_and(|h| h.contains(ARTICLE_PATH)))
        else {
            continue;
        };
        let Some(url) = link.value().attr("href").and_then(|h| resolve_url(base, h)) else {
            continue;
        };
        let title = item
            .select(&heading)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
            .or_else(|| Some(element_text(link)).filter(|t| !t.is_empty()))
            .unwrap_or_else(|| UNTITLED.to_string());
        links.push(ArticleLink {
            title,
            url: url.to_string(),
        });
    }
    Ok(links)
}

/// Body text of an article page, or empty when no candidate is long enough.
pub fn extract_article_content(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let chain = selectors(CONTENT_SELECTORS)?;
    let skip = selectors(CONTENT_SKIP)?;
    Ok(first_text_match(&document, &chain, &skip, |t| char_len(t) > CONTENT_MIN_CHARS).unwrap_or_default())
}

/// Scrape the blog index and every listed article.
///
/// Articles whose page cannot be fetched are skipped.
#[instrument(skip(fetcher, pacer))]
pub fn scrape_blog(fetcher: &dyn PageFetcher, pacer: &Pacer, blog_url: &str) -> Result<Vec<BlogArticle>> {
    let base = parse_url(blog_url)?;
    let index_html = fetcher
        .fetch(blog_url)
        .with_context(|| format!("fetch blog index {blog_url}"))?;
    let links = extract_article_links(&index_html, &base)?;
    info!(count = links.len(), "found blog articles");

    let mut articles = Vec::with_capacity(links.len());
    for (i, link) in links.into_iter().enumerate() {
        pacer.pause();
        let content = match fetcher
            .fetch(&link.url)
            .and_then(|html| extract_article_content(&html))
        {
            Ok(content) => content,
            Err(err) => {
                warn!(url = %link.url, error = %format!("{err:#}"), "skipping article");
                continue;
            }
        };
        info!(index = i + 1, title = %link.title, chars = char_len(&content), "scraped article");
        articles.push(BlogArticle {
            summary: truncate_with_ellipsis(&content, SUMMARY_CHARS),
            content,
            title: link.title,
            url: link.url,
            scraped_at: Local::now().to_rfc3339(),
        });
    }
    Ok(articles)
}

pub fn write_blog_document(path: &Path, source_url: &str, articles: Vec<BlogArticle>) -> Result<()> {
    let document = BlogDocument {
        source: SOURCE.to_string(),
        source_url: source_url.to_string(),
        scraped_at: Local::now().to_rfc3339(),
        total_articles: articles.len(),
        articles,
    };
    write_json(path, &document)
}
