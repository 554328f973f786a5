//! English to Korean translation of scraped content.
//!
//! Machine translation output is post-processed with a reptile-keeping
//! glossary, and morph names are mapped to their established Korean names.

pub mod google;
pub mod patch;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::glossary::Glossary;
use crate::core::morph_id::clean_morph_name;
use crate::core::text::char_len;
use crate::io::response_cache::ResponseCache;

const GLOSSARY_DATA: &str = include_str!("../../data/glossary.toml");
const NEWLINE_MARK: &str = " [NEWLINE] ";
const SENTENCE_END: &str = ". ";

static NEWLINE_MARK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\[NEWLINE\][ \t]*").unwrap());

/// Translate a single piece of text.
pub trait Translator {
    fn translate(&self, text: &str) -> Result<String>;
}

/// Glossary terms and known Korean morph names.
#[derive(Debug, Clone)]
pub struct Dictionaries {
    pub terms: Glossary,
    pub morph_names: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct DictionaryData {
    terms: BTreeMap<String, String>,
    morph_names: BTreeMap<String, String>,
}

impl Dictionaries {
    pub fn embedded() -> Result<Self> {
        let data: DictionaryData =
            toml::from_str(GLOSSARY_DATA).context("parse embedded glossary.toml")?;
        Ok(Self {
            terms: Glossary::new(data.terms),
            morph_names: data.morph_names,
        })
    }

    /// `"한글 (Clean Name)"` when the cleaned name is known, else the cleaned name.
    pub fn korean_morph_name(&self, name_en: &str) -> String {
        let clean = clean_morph_name(name_en);
        match self.morph_names.get(&clean) {
            Some(korean) => format!("{korean} ({clean})"),
            None => clean,
        }
    }
}

/// Split long text on sentence boundaries into chunks of at most
/// `max_chars` characters.
///
/// Newlines are carried through as a placeholder token so that the
/// translator sees one flowing text per chunk. A single sentence longer than
/// `max_chars` becomes its own chunk.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let marked = text.replace('\n', NEWLINE_MARK);
    let sentences: Vec<&str> = marked.split(SENTENCE_END).collect();
    let last = sentences.len().saturating_sub(1);

    let mut chunks = Vec::new();
    let mut current = String::new();
    for (i, sentence) in sentences.iter().enumerate() {
        let piece = if i < last {
            format!("{sentence}{SENTENCE_END}")
        } else {
            (*sentence).to_string()
        };
        if !current.is_empty() && char_len(&current) + char_len(&piece) > max_chars {
            chunks.push(current.trim().to_string());
            current.clear();
        }
        current.push_str(&piece);
    }
    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }
    chunks
}

fn restore_newlines(text: &str) -> String {
    NEWLINE_MARK_RE.replace_all(text, "\n").into_owned()
}

/// Chunking, glossary and fallback policy around a [`Translator`].
pub struct TextTranslator<'a> {
    translator: &'a dyn Translator,
    glossary: &'a Glossary,
    max_chunk_chars: usize,
}

impl<'a> TextTranslator<'a> {
    pub fn new(translator: &'a dyn Translator, glossary: &'a Glossary, max_chunk_chars: usize) -> Self {
        Self {
            translator,
            glossary,
            max_chunk_chars: max_chunk_chars.max(1),
        }
    }

    /// Translate `text`, failing if any chunk fails.
    ///
    /// Empty or whitespace-only text is returned unchanged.
    pub fn try_translate(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        let translated = if char_len(text) <= self.max_chunk_chars {
            self.translator.translate(text)?
        } else {
            let chunks = split_chunks(text, self.max_chunk_chars);
            debug!(chunks = chunks.len(), chars = char_len(text), "translating in chunks");
            let mut out = Vec::with_capacity(chunks.len());
            for chunk in &chunks {
                out.push(self.translator.translate(chunk)?);
            }
            restore_newlines(&out.join(" "))
        };
        Ok(self.glossary.apply(&translated))
    }

    /// Translate `text`, returning it unchanged when translation fails.
    pub fn translate_or_original(&self, text: &str) -> String {
        match self.try_translate(text) {
            Ok(translated) => translated,
            Err(err) => {
                warn!(error = %format!("{err:#}"), chars = char_len(text), "translation failed, keeping original");
                text.to_string()
            }
        }
    }
}

/// Serves repeated requests from the on-disk response cache.
pub struct CachedTranslator<T> {
    inner: T,
    cache: ResponseCache,
    namespace: String,
}

impl<T: Translator> CachedTranslator<T> {
    /// `namespace` should identify the language pair, e.g. `translate-en-ko`.
    pub fn new(inner: T, cache: ResponseCache, namespace: impl Into<String>) -> Self {
        Self {
            inner,
            cache,
            namespace: namespace.into(),
        }
    }
}

impl<T: Translator> Translator for CachedTranslator<T> {
    fn translate(&self, text: &str) -> Result<String> {
        if let Some(hit) = self.cache.get(&self.namespace, text)? {
            return Ok(hit);
        }
        let translated = self.inner.translate(text)?;
        self.cache.put(&self.namespace, text, &translated)?;
        Ok(translated)
    }
}
