//! Korean patch over the scraped morph and blog files.

use std::path::Path;

use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::io::json_store::{read_json, write_json};
use crate::scrape::blog::{BlogArticle, BlogDocument};
use crate::scrape::morphpedia::MorphDocument;
use crate::translate::{Dictionaries, TextTranslator};

pub const MORPH_KO_FILE: &str = "morph_data_ko.json";
pub const BLOG_KO_FILE: &str = "pangea_data_ko.json";

const TRANSLATOR_NAME: &str = "Crestia Korean Patch";
const MORPH_SOURCE: &str = "MorphMarket Morphpedia (한국어 번역)";
const BLOG_SOURCE: &str = "Pangea Reptile Blog (한국어 번역)";
const BLOG_ATTRIBUTION_KO: &str = "\n\n---\n> 🔗 출처: Pangea Reptile Blog (크레스티아 번역)";
const BLOG_ATTRIBUTION_EN: &str = "\n\n---\n> 🔗 Source: Pangea Reptile Blog";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedMorph {
    pub id: String,
    pub name: String,
    #[serde(rename = "nameEn", default)]
    pub name_en: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "originalUrl", default)]
    pub original_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedMorphDocument {
    pub source: String,
    pub source_url: String,
    pub translated_at: String,
    pub translator: String,
    pub total_morphs: usize,
    pub morphs: Vec<TranslatedMorph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedArticle {
    pub title: String,
    #[serde(rename = "titleEn")]
    pub title_en: String,
    pub url: String,
    pub summary: String,
    pub content: String,
    pub scraped_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedBlogDocument {
    pub source: String,
    pub source_url: String,
    pub translated_at: String,
    pub translator: String,
    pub total_articles: usize,
    pub articles: Vec<TranslatedArticle>,
}

/// Korean names for every morph; descriptions are translated when present.
pub fn translate_morphs(
    translator: &TextTranslator<'_>,
    dictionaries: &Dictionaries,
    document: MorphDocument,
) -> TranslatedMorphDocument {
    let total = document.morphs.len();
    let morphs: Vec<TranslatedMorph> = document
        .morphs
        .into_iter()
        .enumerate()
        .map(|(i, morph)| {
            let name = dictionaries.korean_morph_name(&morph.name);
            info!(index = i + 1, total, name = %name, "translating morph");
            let description = if morph.description.is_empty() {
                String::new()
            } else {
                translator.translate_or_original(&morph.description)
            };
            TranslatedMorph {
                id: morph.id,
                name,
                name_en: morph.name,
                kind: morph.kind,
                description,
                original_url: morph.original_url,
            }
        })
        .collect();

    TranslatedMorphDocument {
        source: MORPH_SOURCE.to_string(),
        source_url: document.source_url,
        translated_at: Local::now().to_rfc3339(),
        translator: TRANSLATOR_NAME.to_string(),
        total_morphs: morphs.len(),
        morphs,
    }
}

fn translate_fields(
    translator: &TextTranslator<'_>,
    article: &BlogArticle,
) -> Result<(String, String, String)> {
    Ok((
        translator.try_translate(&article.title)?,
        translator.try_translate(&article.summary)?,
        translator.try_translate(&article.content)?,
    ))
}

/// Translate title, summary and content of every article.
///
/// An article whose translation fails keeps its English text with an English
/// attribution line.
pub fn translate_articles(
    translator: &TextTranslator<'_>,
    document: BlogDocument,
) -> TranslatedBlogDocument {
    let total = document.articles.len();
    let articles: Vec<TranslatedArticle> = document
        .articles
        .into_iter()
        .enumerate()
        .map(|(i, article)| {
            info!(index = i + 1, total, title = %article.title, "translating article");
            match translate_fields(translator, &article) {
                Ok((title, summary, content)) => TranslatedArticle {
                    title,
                    title_en: article.title,
                    url: article.url,
                    summary,
                    content: format!("{content}{BLOG_ATTRIBUTION_KO}"),
                    scraped_at: article.scraped_at,
                },
                Err(err) => {
                    warn!(url = %article.url, error = %format!("{err:#}"), "keeping english article");
                    TranslatedArticle {
                        title_en: article.title.clone(),
                        title: article.title,
                        url: article.url,
                        summary: article.summary,
                        content: format!("{}{BLOG_ATTRIBUTION_EN}", article.content),
                        scraped_at: article.scraped_at,
                    }
                }
            }
        })
        .collect();

    TranslatedBlogDocument {
        source: BLOG_SOURCE.to_string(),
        source_url: document.source_url,
        translated_at: Local::now().to_rfc3339(),
        translator: TRANSLATOR_NAME.to_string(),
        total_articles: articles.len(),
        articles,
    }
}

/// Translate `input` into `output`. Returns `None` when the input file is missing.
#[instrument(skip(translator, dictionaries))]
pub fn patch_morph_file(
    translator: &TextTranslator<'_>,
    dictionaries: &Dictionaries,
    input: &Path,
    output: &Path,
) -> Result<Option<usize>> {
    if !input.exists() {
        warn!(path = %input.display(), "morph input missing, skipping");
        return Ok(None);
    }
    let document: MorphDocument = read_json(input)?;
    let translated = translate_morphs(translator, dictionaries, document);
    write_json(output, &translated)?;
    info!(count = translated.total_morphs, path = %output.display(), "wrote korean morphs");
    Ok(Some(translated.total_morphs))
}

/// Translate `input` into `output`. Returns `None` when the input file is missing.
#[instrument(skip(translator))]
pub fn patch_blog_file(
    translator: &TextTranslator<'_>,
    input: &Path,
    output: &Path,
) -> Result<Option<usize>> {
    if !input.exists() {
        warn!(path = %input.display(), "blog input missing, skipping");
        return Ok(None);
    }
    let document: BlogDocument = read_json(input)?;
    let translated = translate_articles(translator, document);
    write_json(output, &translated)?;
    info!(count = translated.total_articles, path = %output.display(), "wrote korean articles");
    Ok(Some(translated.total_articles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::blog::BLOG_DATA_FILE;
    use crate::scrape::morphpedia::{MORPH_DATA_FILE, ScrapedMorph, write_morph_document};
    use crate::test_support::FakeTranslator;

    fn morph(id: &str, name: &str, description: &str) -> ScrapedMorph {
        ScrapedMorph {
            id: id.to_string(),
            name: name.to_string(),
            kind: "Recessive".to_string(),
            description: description.to_string(),
            original_url: format!("https://example.com/{id}/"),
        }
    }

    fn blog_document(articles: Vec<BlogArticle>) -> BlogDocument {
        BlogDocument {
            source: "Pangea Reptile Blog".to_string(),
            source_url: "https://example.com/blog".to_string(),
            scraped_at: "2024-01-01T00:00:00+09:00".to_string(),
            total_articles: articles.len(),
            articles,
        }
    }

    fn article(title: &str) -> BlogArticle {
        BlogArticle {
            title: title.to_string(),
            url: format!("https://example.com/blog/{}", title.to_lowercase()),
            summary: format!("{title} summary"),
            content: format!("{title} content"),
            scraped_at: "2024-01-01T00:00:00+09:00".to_string(),
        }
    }

    #[test]
    fn morphs_get_korean_names_and_translated_descriptions() {
        let dictionaries = Dictionaries::embedded().expect("dictionaries");
        let fake = FakeTranslator::new();
        let translator = TextTranslator::new(&fake, &dictionaries.terms, 4_500);
        let document = MorphDocument {
            source: "MorphMarket Morphpedia".to_string(),
            source_url: "https://example.com/".to_string(),
            scraped_at: String::new(),
            total_morphs: 2,
            morphs: vec![
                morph("lilly-white-incomplete-dominant", "Lilly White Incomplete Dominant", "White pattern."),
                morph("moonglow", "Moonglow", ""),
            ],
        };

        let translated = translate_morphs(&translator, &dictionaries, document);
        assert_eq!(translated.total_morphs, 2);
        assert_eq!(translated.translator, TRANSLATOR_NAME);
        assert_eq!(translated.morphs[0].name, "릴리 화이트 (Lilly White)");
        assert_eq!(translated.morphs[0].name_en, "Lilly White Incomplete Dominant");
        assert_eq!(translated.morphs[0].description, "[ko]White pattern.");
        assert_eq!(translated.morphs[1].name, "Moonglow");
        assert_eq!(translated.morphs[1].description, "");
        assert_eq!(fake.calls(), 1);
    }

    #[test]
    fn articles_keep_english_title_and_attribution() {
        let fake = FakeTranslator::new();
        let glossary = crate::core::glossary::Glossary::default();
        let translator = TextTranslator::new(&fake, &glossary, 4_500);
        let translated = translate_articles(&translator, blog_document(vec![article("Misting")]));

        let first = &translated.articles[0];
        assert_eq!(first.title, "[ko]Misting");
        assert_eq!(first.title_en, "Misting");
        assert_eq!(first.summary, "[ko]Misting summary");
        assert!(first.content.starts_with("[ko]Misting content"));
        assert!(first.content.ends_with("(크레스티아 번역)"));
    }

    #[test]
    fn failed_article_keeps_english_fields() {
        let fake = FakeTranslator::failing_on("Broken content");
        let glossary = crate::core::glossary::Glossary::default();
        let translator = TextTranslator::new(&fake, &glossary, 4_500);
        let translated = translate_articles(
            &translator,
            blog_document(vec![article("Broken"), article("Fine")]),
        );

        assert_eq!(translated.articles[0].title, "Broken");
        assert_eq!(translated.articles[0].summary, "Broken summary");
        assert!(translated.articles[0].content.ends_with("Source: Pangea Reptile Blog"));
        assert_eq!(translated.articles[1].title, "[ko]Fine");
    }

    #[test]
    fn missing_inputs_are_skipped_and_present_ones_written() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dictionaries = Dictionaries::embedded().expect("dictionaries");
        let fake = FakeTranslator::new();
        let translator = TextTranslator::new(&fake, &dictionaries.terms, 4_500);

        let blog = patch_blog_file(
            &translator,
            &temp.path().join(BLOG_DATA_FILE),
            &temp.path().join(BLOG_KO_FILE),
        )
        .expect("blog pass");
        assert_eq!(blog, None);
        assert!(!temp.path().join(BLOG_KO_FILE).exists());

        let input = temp.path().join(MORPH_DATA_FILE);
        write_morph_document(&input, "https://example.com/", vec![morph("axanthic", "Axanthic", "")])
            .expect("write input");
        let output = temp.path().join(MORPH_KO_FILE);
        let count = patch_morph_file(&translator, &dictionaries, &input, &output).expect("morph pass");
        assert_eq!(count, Some(1));

        let written: TranslatedMorphDocument = read_json(&output).expect("read output");
        assert_eq!(written.morphs[0].name, "악산틱 (Axanthic)");
        assert_eq!(written.source, MORPH_SOURCE);
    }
}
