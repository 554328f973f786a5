//! Join translated scraped morphs with the hand-written encyclopedia.
//!
//! Scraped ids carry metadata suffixes, so each id is normalized before the
//! lookup. Morphs without an encyclopedia entry get a placeholder article
//! that links back to the wiki page.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::content::encyclopedia::{EncyclopediaDocument, EncyclopediaMorph};
use crate::core::dates::format_timestamp;
use crate::core::morph_id::{extract_inheritance, normalize_id};
use crate::io::json_store::{read_json, write_json};
use crate::translate::patch::{TranslatedMorph, TranslatedMorphDocument};

pub const MERGED_FILE: &str = "morph_data_merged.json";

const SOURCE: &str = "Crestia Morph Encyclopedia";
const VERSION: &str = "1.0";
const UNCLASSIFIED: &str = "미분류";
const UNMATCHED_LOG_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedMorph {
    pub id: String,
    pub name: String,
    #[serde(rename = "nameEn")]
    pub name_en: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub summary: String,
    pub description: String,
    #[serde(rename = "originalUrl")]
    pub original_url: String,
    #[serde(rename = "referenceUrl", skip_serializing_if = "Option::is_none", default)]
    pub reference_url: Option<String>,
    #[serde(rename = "hasEncyclopedia")]
    pub has_encyclopedia: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedDocument {
    pub source: String,
    pub version: String,
    pub generated_at: String,
    pub total_morphs: usize,
    pub encyclopedia_matched: usize,
    pub morphs: Vec<MergedMorph>,
}

/// Outcome of a merge: the document plus the names that found no entry.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub document: MergedDocument,
    pub unmatched: Vec<String>,
}

/// First two whitespace-separated words of an English name.
fn short_english_name(name_en: &str) -> String {
    name_en.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

fn placeholder_description(name: &str, kind: &str, original_url: &str) -> String {
    let kind = if kind.is_empty() { UNCLASSIFIED } else { kind };
    format!(
        "## 🧬 유전적 특징\n\n\
         {name}은(는) **{kind}** 유전 형질입니다.\n\n\
         ---\n\n\
         ## 🦎 외형 가이드\n\n\
         이 모프에 대한 상세 정보는 준비 중입니다.\n\n\
         ---\n\n\
         ## 💡 브리딩 팁 & 콤보\n\n\
         더 많은 정보는 MorphMarket을 참고해주세요.\n\n\
         ---\n\
         <small>참고 자료: [MorphMarket]({original_url})</small>"
    )
}

fn merge_one(morph: TranslatedMorph, entry: Option<&EncyclopediaMorph>) -> MergedMorph {
    let id = normalize_id(&morph.id);
    match entry {
        Some(entry) => MergedMorph {
            id,
            name: morph.name,
            name_en: short_english_name(&morph.name_en),
            kind: entry.kind.clone(),
            summary: entry.summary.clone(),
            description: entry.content.clone(),
            original_url: morph.original_url,
            reference_url: Some(entry.reference_url.clone()),
            has_encyclopedia: true,
        },
        None => {
            let kind = extract_inheritance(&morph.name_en).to_string();
            MergedMorph {
                id,
                summary: format!("{} 모프입니다.", morph.name),
                description: placeholder_description(&morph.name, &kind, &morph.original_url),
                name: morph.name,
                name_en: morph.name_en,
                kind,
                original_url: morph.original_url,
                reference_url: None,
                has_encyclopedia: false,
            }
        }
    }
}

pub fn merge_morphs(
    existing: Vec<TranslatedMorph>,
    encyclopedia: &[EncyclopediaMorph],
    now: DateTime<Local>,
) -> MergeReport {
    let index: HashMap<&str, &EncyclopediaMorph> =
        encyclopedia.iter().map(|m| (m.id.as_str(), m)).collect();

    let mut unmatched = Vec::new();
    let morphs: Vec<MergedMorph> = existing
        .into_iter()
        .map(|morph| {
            let entry = index.get(normalize_id(&morph.id).as_str()).copied();
            if entry.is_none() {
                unmatched.push(morph.name.clone());
            }
            merge_one(morph, entry)
        })
        .collect();

    let matched = morphs.iter().filter(|m| m.has_encyclopedia).count();
    MergeReport {
        document: MergedDocument {
            source: SOURCE.to_string(),
            version: VERSION.to_string(),
            generated_at: format_timestamp(now),
            total_morphs: morphs.len(),
            encyclopedia_matched: matched,
            morphs,
        },
        unmatched,
    }
}

/// Read both inputs, merge and write `output`.
#[instrument]
pub fn merge_files(existing: &Path, encyclopedia: &Path, output: &Path) -> Result<MergeReport> {
    let existing_doc: TranslatedMorphDocument = read_json(existing)?;
    let encyclopedia_doc: EncyclopediaDocument = read_json(encyclopedia)?;
    info!(
        existing = existing_doc.morphs.len(),
        encyclopedia = encyclopedia_doc.morphs.len(),
        "loaded merge inputs"
    );

    let report = merge_morphs(existing_doc.morphs, &encyclopedia_doc.morphs, Local::now());
    write_json(output, &report.document)?;

    for name in report.unmatched.iter().take(UNMATCHED_LOG_LIMIT) {
        info!(name = %name, "no encyclopedia entry");
    }
    if report.unmatched.len() > UNMATCHED_LOG_LIMIT {
        info!(
            more = report.unmatched.len() - UNMATCHED_LOG_LIMIT,
            "further morphs without encyclopedia entry"
        );
    }
    Ok(report)
}
