//! Three-step curation: relevance filter, fact-check, community-style rewrite.
//!
//! Each row goes through the steps in order. A row the model rejects (or that
//! fails to rewrite) is counted as skipped; fact-check failures fall back to
//! the original text instead of dropping the row.

use std::path::Path;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Local};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use seeder::core::dates::format_timestamp;
use seeder::core::json_extract::extract_json_object;
use seeder::core::text::truncate_with_ellipsis;
use seeder::io::json_store::write_json;
use seeder::io::pacer::Pacer;

use crate::llm::ChatModel;
use crate::prompt::PromptEngine;
use crate::rows::SourceRow;
use crate::schema::ReplySchemas;

pub const CURATED_FILE: &str = "community_kin_processed.json";

const ITEM_SOURCE: &str = "naver_kin";

const AUTHORS: [&str; 8] = [
    "왕초보브리더",
    "크레입문자",
    "도마뱀뉴비",
    "파충류초보맘",
    "궁금이가득",
    "게코시작",
    "크레사랑해",
    "초보사육사",
];

const MIN_VIEWS: u32 = 50;
const MAX_VIEWS: u32 = 2_000;
const MIN_LIKES: u32 = 5;

/// Fact-check verdict. `corrected_answer` falls back to the row content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FactCheck {
    pub has_errors: bool,
    #[serde(default)]
    pub error_summary: Option<String>,
    #[serde(default)]
    pub corrected_answer: Option<String>,
}

impl FactCheck {
    fn unchanged(content: &str) -> Self {
        Self {
            has_errors: false,
            error_summary: None,
            corrected_answer: Some(content.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rewrite {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub best_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedPost {
    pub title: String,
    pub content: String,
    pub best_answer: String,
    pub views: u32,
    pub likes: u32,
    pub comment_count: u32,
    pub is_solved: bool,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedItem {
    pub id: String,
    pub source: String,
    pub original_title: String,
    pub processed: ProcessedPost,
    pub fact_checked: bool,
    pub processed_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedDocument {
    pub source: String,
    pub processed_at: String,
    pub total_raw: usize,
    pub total_processed: usize,
    pub total_skipped: usize,
    pub items: Vec<CuratedItem>,
}

/// Engagement numbers shown next to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engagement {
    pub views: u32,
    pub likes: u32,
    pub comment_count: u32,
    pub is_solved: bool,
}

/// Views are random; likes are 3-5% of views (at least 5). Comments and the
/// solved flag reflect whether an answer actually exists.
pub fn engagement<R: Rng + ?Sized>(rng: &mut R, has_answer: bool) -> Engagement {
    let views = rng.gen_range(MIN_VIEWS..=MAX_VIEWS);
    let rate: f64 = rng.gen_range(0.03..0.05);
    let likes = ((f64::from(views) * rate).floor() as u32).max(MIN_LIKES);
    Engagement {
        views,
        likes,
        comment_count: u32::from(has_answer),
        is_solved: has_answer,
    }
}

pub struct Pipeline<'a> {
    model: &'a dyn ChatModel,
    prompts: PromptEngine,
    schemas: ReplySchemas,
}

impl<'a> Pipeline<'a> {
    pub fn new(model: &'a dyn ChatModel) -> Result<Self> {
        Ok(Self {
            model,
            prompts: PromptEngine::new()?,
            schemas: ReplySchemas::embedded()?,
        })
    }

    /// Step 1. Model errors count as "not relevant".
    pub fn is_relevant(&self, row: &SourceRow) -> Result<bool> {
        let prompt = self.prompts.relevance(&row.title, &row.content)?;
        match self.model.complete(&prompt.system, &prompt.user) {
            Ok(reply) => Ok(reply.to_uppercase().contains("RELEVANT")),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "relevance call failed");
                Ok(false)
            }
        }
    }

    /// Step 2. Any failure yields an unchanged verdict.
    pub fn fact_check(&self, row: &SourceRow) -> Result<FactCheck> {
        let prompt = self.prompts.fact_check(&row.title, &row.content)?;
        let verdict = self
            .structured_reply(&prompt.system, &prompt.user, |v| self.schemas.check_fact_check(v))
            .and_then(|value| serde_json::from_value::<FactCheck>(value).map_err(Into::into));
        match verdict {
            Ok(verdict) => Ok(verdict),
            Err(err) => {
                debug!(error = %format!("{err:#}"), "fact-check fallback");
                Ok(FactCheck::unchanged(&row.content))
            }
        }
    }

    /// Step 3. `None` when the model reply is unusable.
    pub fn rewrite(&self, row: &SourceRow, corrected_answer: &str) -> Result<Option<Rewrite>> {
        let prompt = self
            .prompts
            .reformat(&row.title, &row.content, corrected_answer)?;
        let rewrite = self
            .structured_reply(&prompt.system, &prompt.user, |v| self.schemas.check_reformat(v))
            .and_then(|value| serde_json::from_value::<Rewrite>(value).map_err(Into::into));
        match rewrite {
            Ok(rewrite) => Ok(Some(rewrite)),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "rewrite failed");
                Ok(None)
            }
        }
    }

    fn structured_reply<F>(&self, system: &str, user: &str, check: F) -> Result<Value>
    where
        F: Fn(&Value) -> Result<()>,
    {
        let reply = self.model.complete(system, user)?;
        let value = extract_json_object(&reply)
            .ok_or_else(|| anyhow!("reply has no JSON object"))?;
        check(&value)?;
        Ok(value)
    }

    /// Run all three steps on one row. `index` is the 1-based row position.
    #[instrument(skip_all, fields(index = index, title = %truncate_with_ellipsis(&row.title, 30)))]
    pub fn curate_row<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        index: usize,
        row: &SourceRow,
        now: DateTime<Local>,
    ) -> Result<Option<CuratedItem>> {
        if !self.is_relevant(row)? {
            info!("skip: not relevant");
            return Ok(None);
        }

        let verdict = self.fact_check(row)?;
        if verdict.has_errors {
            info!(
                summary = verdict.error_summary.as_deref().unwrap_or_default(),
                "answer corrected"
            );
        }
        let corrected = verdict
            .corrected_answer
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&row.content);

        let Some(rewrite) = self.rewrite(row, corrected)? else {
            return Ok(None);
        };

        let best_answer = rewrite.best_answer.unwrap_or_default();
        let stats = engagement(rng, !best_answer.trim().is_empty());
        let author = AUTHORS.choose(rng).copied().unwrap_or(AUTHORS[0]);
        Ok(Some(CuratedItem {
            id: format!("kin-{index}"),
            source: ITEM_SOURCE.to_string(),
            original_title: row.title.clone(),
            processed: ProcessedPost {
                title: rewrite.title,
                content: rewrite.content,
                best_answer,
                views: stats.views,
                likes: stats.likes,
                comment_count: stats.comment_count,
                is_solved: stats.is_solved,
                author: author.to_string(),
            },
            fact_checked: verdict.has_errors,
            processed_at: format_timestamp(now),
        }))
    }

    /// Curate every row, pausing between model-backed rows.
    pub fn curate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        rows: &[SourceRow],
        pacer: &Pacer,
        source: &str,
        now: DateTime<Local>,
    ) -> Result<CuratedDocument> {
        let mut items = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                pacer.pause();
            }
            if let Some(item) = self.curate_row(rng, i + 1, row, now)? {
                items.push(item);
            }
        }
        let total_skipped = rows.len() - items.len();
        info!(
            raw = rows.len(),
            processed = items.len(),
            skipped = total_skipped,
            "curation finished"
        );
        Ok(CuratedDocument {
            source: source.to_string(),
            processed_at: format_timestamp(now),
            total_raw: rows.len(),
            total_processed: items.len(),
            total_skipped,
            items,
        })
    }
}

pub fn write_curated(path: &Path, document: &CuratedDocument) -> Result<()> {
    write_json(path, document)
}
