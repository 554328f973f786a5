//! Starter pack: forum Q&A feed and the morph catalog list.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Local};
use minijinja::context;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::{WrittenFile, parse_embedded, pick, pick_string, render};
use crate::core::dates::{format_day, format_timestamp, random_date_within};
use crate::io::json_store::write_json;

pub const QNA_FILE: &str = "initial_qna.json";
pub const MORPH_LIST_FILE: &str = "morph_list_full.json";

const STARTER_DATA: &str = include_str!("../../data/starter.toml");
const QNA_COUNT: usize = 50;
const DATE_WINDOW_DAYS: u32 = 90;
const COMBO_TAG: &str = "콤보추천";
const COMBO_PROBABILITY: f64 = 0.3;
const FALLBACK_TYPE: &str = "Other";
const FALLBACK_TAG: &str = "기본";

#[derive(Debug, Clone, Deserialize)]
pub struct StarterPools {
    pub nicknames: Vec<String>,
    pub prefixes: Vec<String>,
    pub experts: Vec<String>,
    pub topics: Vec<Topic>,
    pub rarity_tags: BTreeMap<String, Vec<String>>,
    /// Description templates keyed by inheritance type.
    pub descriptions: BTreeMap<String, String>,
    pub morphs: Vec<CatalogMorph>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Topic {
    pub topic: String,
    pub questions: Vec<String>,
    pub content: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogMorph {
    pub name: String,
    pub ko: String,
    pub inheritance: String,
    pub rarity: String,
}

impl StarterPools {
    pub fn embedded() -> Result<Self> {
        parse_embedded("starter.toml", STARTER_DATA)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QnaItem {
    pub id: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub views: u32,
    pub likes: u32,
    pub category: String,
    pub content: String,
    pub answer: QnaAnswer,
}

#[derive(Debug, Clone, Serialize)]
pub struct QnaAnswer {
    pub content: String,
    pub author: String,
    pub date: String,
    pub likes: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MorphListEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "nameEn")]
    pub name_en: String,
    #[serde(rename = "nameKo")]
    pub name_ko: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub tags: Vec<String>,
    pub rarity: String,
}

#[derive(Debug, Serialize)]
struct QnaFeed<'a> {
    generated_at: String,
    total: usize,
    items: &'a [QnaItem],
}

#[derive(Debug, Serialize)]
struct MorphList<'a> {
    generated_at: String,
    total: usize,
    morphs: &'a [MorphListEntry],
}

pub fn generate_qna<R: Rng + ?Sized>(
    pools: &StarterPools,
    rng: &mut R,
    now: DateTime<Local>,
    count: usize,
) -> Result<Vec<QnaItem>> {
    let mut items = Vec::with_capacity(count);
    for index in 1..=count {
        let topic = pick(rng, &pools.topics, "topics")?;
        let question = pick_string(rng, &topic.questions, "questions")?;
        let prefix = pick_string(rng, &pools.prefixes, "prefixes")?;

        items.push(QnaItem {
            id: format!("qna-{index:03}"),
            title: format!("[{prefix}] {question}"),
            author: pick_string(rng, &pools.nicknames, "nicknames")?,
            date: format_day(random_date_within(rng, now, DATE_WINDOW_DAYS)),
            views: rng.gen_range(50..=1500),
            likes: rng.gen_range(0..=30),
            category: "qna".to_string(),
            content: topic.content.clone(),
            answer: QnaAnswer {
                content: topic.answer.clone(),
                author: pick_string(rng, &pools.experts, "experts")?,
                date: format_day(random_date_within(rng, now, DATE_WINDOW_DAYS)),
                likes: rng.gen_range(5..=40),
            },
        });
    }
    Ok(items)
}

pub fn generate_morph_list<R: Rng + ?Sized>(
    pools: &StarterPools,
    rng: &mut R,
) -> Result<Vec<MorphListEntry>> {
    pools
        .morphs
        .iter()
        .map(|morph| {
            let mut tags = pools
                .rarity_tags
                .get(&morph.rarity)
                .cloned()
                .unwrap_or_else(|| vec![FALLBACK_TAG.to_string()]);
            if rng.gen_bool(COMBO_PROBABILITY) {
                tags.push(COMBO_TAG.to_string());
            }
            Ok(MorphListEntry {
                id: morph.name.to_lowercase().replace(' ', "-"),
                name: format!("{} ({})", morph.name, morph.ko),
                name_en: morph.name.clone(),
                name_ko: morph.ko.clone(),
                kind: morph.inheritance.clone(),
                description: describe(pools, morph)?,
                tags,
                rarity: morph.rarity.clone(),
            })
        })
        .collect()
}

fn describe(pools: &StarterPools, morph: &CatalogMorph) -> Result<String> {
    let template = pools
        .descriptions
        .get(&morph.inheritance)
        .or_else(|| pools.descriptions.get(FALLBACK_TYPE))
        .map(String::as_str)
        .unwrap_or("{{ ko }}({{ name }})");
    render(template, context! { ko => &morph.ko, name => &morph.name })
}

/// Write `initial_qna.json` and `morph_list_full.json`.
pub fn write_starter<R: Rng + ?Sized>(
    pools: &StarterPools,
    rng: &mut R,
    now: DateTime<Local>,
    output_dir: &Path,
) -> Result<Vec<WrittenFile>> {
    let generated_at = format_timestamp(now);

    let items = generate_qna(pools, rng, now, QNA_COUNT)?;
    let qna_path = output_dir.join(QNA_FILE);
    write_json(
        &qna_path,
        &QnaFeed {
            generated_at: generated_at.clone(),
            total: items.len(),
            items: &items,
        },
    )?;
    info!(count = items.len(), path = %qna_path.display(), "wrote starter q&a");

    let morphs = generate_morph_list(pools, rng)?;
    let morph_path = output_dir.join(MORPH_LIST_FILE);
    write_json(
        &morph_path,
        &MorphList {
            generated_at,
            total: morphs.len(),
            morphs: &morphs,
        },
    )?;
    info!(count = morphs.len(), path = %morph_path.display(), "wrote morph list");

    Ok(vec![
        WrittenFile {
            path: qna_path,
            count: items.len(),
        },
        WrittenFile {
            path: morph_path,
            count: morphs.len(),
        },
    ])
}
