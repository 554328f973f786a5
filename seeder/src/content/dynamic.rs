//! Dynamic pack: magazine-style husbandry tips and community Q&A posts.
//!
//! Both feeds walk their category lists round-robin so every category gets an
//! even share regardless of the requested count.

use std::path::Path;

use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use minijinja::context;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::{WrittenFile, parse_embedded, pick, pick_string, render};
use crate::core::dates::{format_timestamp, random_date_within};
use crate::core::text::truncate_with_ellipsis;
use crate::io::json_store::write_json;

pub const TIPS_FILE: &str = "husbandry_data_dynamic.json";
pub const POSTS_FILE: &str = "community_qna_dynamic.json";
pub const DEFAULT_TIP_COUNT: usize = 30;
pub const DEFAULT_POST_COUNT: usize = 50;

const DYNAMIC_DATA: &str = include_str!("../../data/dynamic.toml");
const SOURCE: &str = "Crestia Auto Generator";
const DATE_WINDOW_DAYS: u32 = 90;
const POINTS_PER_ARTICLE: usize = 3;
const SUMMARY_CHARS: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct DynamicPools {
    pub seo_adjectives: Vec<String>,
    pub tip_authors: Vec<String>,
    pub tip_levels: Vec<String>,
    pub expert_names: Vec<String>,
    pub moods: Vec<String>,
    pub answer_closing: String,
    pub tip_categories: Vec<TipCategory>,
    pub personas: Vec<Persona>,
    pub qna_categories: Vec<QnaCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TipCategory {
    pub key: String,
    pub titles: Vec<String>,
    pub intros: Vec<String>,
    pub conclusions: Vec<String>,
    pub points: Vec<TipPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TipPoint {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Persona {
    pub key: String,
    pub prefix: String,
    pub suffix: String,
    pub emoji: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QnaCategory {
    pub key: String,
    pub situations: Vec<String>,
    pub details: Vec<String>,
    pub expert_empathy: Vec<String>,
    pub solutions: Vec<String>,
}

impl DynamicPools {
    pub fn embedded() -> Result<Self> {
        parse_embedded("dynamic.toml", DYNAMIC_DATA)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TipArticle {
    pub id: String,
    pub title: String,
    pub category: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    pub views: u32,
    pub likes: u32,
    pub created_at: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunityPost {
    pub id: String,
    pub category: String,
    pub question_title: String,
    pub question_body: String,
    pub question_author: String,
    pub answer: PostAnswer,
    pub views: u32,
    pub likes: u32,
    pub comments: u32,
    pub created_at: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostAnswer {
    pub body: String,
    pub author: String,
    pub likes: u32,
    pub date: String,
}

#[derive(Debug, Serialize)]
struct TipsFeed<'a> {
    source: &'static str,
    generated_at: String,
    total_articles: usize,
    articles: &'a [TipArticle],
}

#[derive(Debug, Serialize)]
struct PostsFeed<'a> {
    source: &'static str,
    generated_at: String,
    total_posts: usize,
    posts: &'a [CommunityPost],
}

/// `NNNN-NNNN` with both halves in 1000..=9999.
fn random_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{}-{}", rng.gen_range(1000..=9999), rng.gen_range(1000..=9999))
}

fn random_created_at<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Local>) -> String {
    format_timestamp(random_date_within(rng, now, DATE_WINDOW_DAYS))
}

pub fn generate_tips<R: Rng + ?Sized>(
    pools: &DynamicPools,
    rng: &mut R,
    now: DateTime<Local>,
    count: usize,
) -> Result<Vec<TipArticle>> {
    if pools.tip_categories.is_empty() {
        bail!("tip_categories pool is empty");
    }
    let mut articles = Vec::with_capacity(count);
    for index in 0..count {
        let category = &pools.tip_categories[index % pools.tip_categories.len()];

        let adj = pick(rng, &pools.seo_adjectives, "seo_adjectives")?;
        let title_template = pick(rng, &category.titles, "titles")?;
        let title = render(title_template, context! { adj => adj })?;

        let intro = pick(rng, &category.intros, "intros")?;
        let body = category
            .points
            .choose_multiple(rng, POINTS_PER_ARTICLE)
            .map(|point| format!("{}\n\n{}", point.heading, point.body))
            .collect::<Vec<_>>()
            .join("\n\n");
        let conclusion = pick(rng, &category.conclusions, "conclusions")?;
        let content = format!("{intro}\n\n{body}\n\n---\n\n**마무리**\n\n{conclusion}");

        articles.push(TipArticle {
            id: random_id(rng),
            title,
            category: category.key.clone(),
            summary: truncate_with_ellipsis(intro, SUMMARY_CHARS),
            content,
            author: pick_string(rng, &pools.tip_authors, "tip_authors")?,
            views: rng.gen_range(50..=3000),
            likes: rng.gen_range(5..=200),
            created_at: random_created_at(rng, now),
            tags: vec![
                category.key.clone(),
                "크레스티드게코".to_string(),
                pick_string(rng, &pools.tip_levels, "tip_levels")?,
            ],
        });
    }
    Ok(articles)
}

pub fn generate_posts<R: Rng + ?Sized>(
    pools: &DynamicPools,
    rng: &mut R,
    now: DateTime<Local>,
    count: usize,
) -> Result<Vec<CommunityPost>> {
    if pools.qna_categories.is_empty() {
        bail!("qna_categories pool is empty");
    }
    let mut posts = Vec::with_capacity(count);
    for index in 0..count {
        let category = &pools.qna_categories[index % pools.qna_categories.len()];
        let persona = pick(rng, &pools.personas, "personas")?;

        let situation = pick(rng, &category.situations, "situations")?;
        let detail = pick(rng, &category.details, "details")?;
        let empathy = pick(rng, &category.expert_empathy, "expert_empathy")?;
        let solution = pick(rng, &category.solutions, "solutions")?;

        posts.push(CommunityPost {
            id: random_id(rng),
            category: category.key.clone(),
            question_title: format!("{} {situation}", persona.emoji),
            question_body: format!(
                "{}\n\n{situation}\n\n{detail}\n\n{}",
                persona.prefix, persona.suffix
            ),
            question_author: format!("익명{}", rng.gen_range(1..=999)),
            answer: PostAnswer {
                body: format!("{empathy}\n\n{solution}\n\n{}", pools.answer_closing),
                author: pick_string(rng, &pools.expert_names, "expert_names")?,
                likes: rng.gen_range(3..=50),
                date: random_created_at(rng, now),
            },
            views: rng.gen_range(30..=2000),
            likes: rng.gen_range(1..=100),
            comments: rng.gen_range(0..=15),
            created_at: random_created_at(rng, now),
            tags: vec![
                category.key.clone(),
                "질문".to_string(),
                pick_string(rng, &pools.moods, "moods")?,
            ],
        });
    }
    Ok(posts)
}

/// Write `husbandry_data_dynamic.json` and `community_qna_dynamic.json`.
pub fn write_dynamic<R: Rng + ?Sized>(
    pools: &DynamicPools,
    rng: &mut R,
    now: DateTime<Local>,
    output_dir: &Path,
    tip_count: usize,
    post_count: usize,
) -> Result<Vec<WrittenFile>> {
    let articles = generate_tips(pools, rng, now, tip_count)?;
    let tips_path = output_dir.join(TIPS_FILE);
    write_json(
        &tips_path,
        &TipsFeed {
            source: SOURCE,
            generated_at: format_timestamp(now),
            total_articles: articles.len(),
            articles: &articles,
        },
    )?;
    info!(count = articles.len(), path = %tips_path.display(), "wrote husbandry tips");

    let posts = generate_posts(pools, rng, now, post_count)?;
    let posts_path = output_dir.join(POSTS_FILE);
    write_json(
        &posts_path,
        &PostsFeed {
            source: SOURCE,
            generated_at: format_timestamp(now),
            total_posts: posts.len(),
            posts: &posts,
        },
    )?;
    info!(count = posts.len(), path = %posts_path.display(), "wrote community posts");

    Ok(vec![
        WrittenFile {
            path: tips_path,
            count: articles.len(),
        },
        WrittenFile {
            path: posts_path,
            count: posts.len(),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::Value;

    fn pools() -> DynamicPools {
        DynamicPools::embedded().expect("embedded dynamic data")
    }

    #[test]
    fn tips_rotate_categories_and_fill_templates() {
        let pools = pools();
        let mut rng = StdRng::seed_from_u64(21);
        let articles =
            generate_tips(&pools, &mut rng, Local::now(), DEFAULT_TIP_COUNT).expect("tips");

        assert_eq!(articles.len(), 30);
        let keys: Vec<&str> = articles.iter().take(4).map(|a| a.category.as_str()).collect();
        assert_eq!(keys, vec!["diet", "housing", "health", "diet"]);

        for article in &articles {
            assert!(!article.title.contains("{{"));
            assert!(pools.seo_adjectives.iter().any(|adj| article.title.contains(adj.as_str())));
            assert!(article.content.contains("\n\n---\n\n**마무리**\n\n"));
            assert_eq!(article.content.matches("\n## ").count(), POINTS_PER_ARTICLE);
            assert!(article.summary.chars().count() <= SUMMARY_CHARS + 3);
            assert!((50..=3000).contains(&article.views));
            assert!((5..=200).contains(&article.likes));
            assert_eq!(article.tags[0], article.category);
            assert_eq!(article.tags[1], "크레스티드게코");

            let (left, right) = article.id.split_once('-').expect("id has a dash");
            assert_eq!(left.len(), 4);
            assert_eq!(right.len(), 4);
        }
    }

    #[test]
    fn tip_points_are_distinct() {
        let pools = pools();
        let mut rng = StdRng::seed_from_u64(8);
        for article in generate_tips(&pools, &mut rng, Local::now(), 12).expect("tips") {
            let mut headings: Vec<&str> = article
                .content
                .lines()
                .filter(|line| line.starts_with("## "))
                .collect();
            let before = headings.len();
            headings.sort_unstable();
            headings.dedup();
            assert_eq!(headings.len(), before);
        }
    }

    #[test]
    fn small_point_pool_yields_fewer_points() {
        let mut pools = pools();
        pools.tip_categories.truncate(1);
        pools.tip_categories[0].points.truncate(2);
        let mut rng = StdRng::seed_from_u64(2);
        let articles = generate_tips(&pools, &mut rng, Local::now(), 3).expect("tips");
        for article in articles {
            assert_eq!(article.content.matches("\n## ").count(), 2);
        }
    }

    #[test]
    fn posts_assemble_persona_question_and_answer() {
        let pools = pools();
        let mut rng = StdRng::seed_from_u64(34);
        let posts =
            generate_posts(&pools, &mut rng, Local::now(), DEFAULT_POST_COUNT).expect("posts");

        assert_eq!(posts.len(), 50);
        assert_eq!(posts[0].category, pools.qna_categories[0].key);
        assert_eq!(posts[1].category, pools.qna_categories[1].key);

        for post in &posts {
            let persona = pools
                .personas
                .iter()
                .find(|p| post.question_title.starts_with(p.emoji.as_str()))
                .expect("title starts with a persona emoji");
            assert!(post.question_body.starts_with(persona.prefix.as_str()));
            assert!(post.question_body.ends_with(persona.suffix.as_str()));
            assert!(post.question_body.split("\n\n").count() >= 4);
            assert!(post.answer.body.ends_with(pools.answer_closing.as_str()));
            assert!(post.question_author.starts_with("익명"));
            assert!((30..=2000).contains(&post.views));
            assert!(post.comments <= 15);
            assert_eq!(post.tags[1], "질문");
            assert!(pools.moods.contains(&post.tags[2]));
        }
    }

    #[test]
    fn empty_category_pool_is_an_error() {
        let mut pools = pools();
        pools.qna_categories.clear();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_posts(&pools, &mut rng, Local::now(), 1).is_err());
    }

    #[test]
    fn write_dynamic_honours_counts() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut rng = StdRng::seed_from_u64(4);
        let written = write_dynamic(&pools(), &mut rng, Local::now(), temp.path(), 5, 7)
            .expect("write dynamic");
        assert_eq!(written[0].count, 5);
        assert_eq!(written[1].count, 7);

        let raw = std::fs::read_to_string(temp.path().join(POSTS_FILE)).expect("read posts");
        let feed: Value = serde_json::from_str(&raw).expect("parse posts");
        assert_eq!(feed["source"], SOURCE);
        assert_eq!(feed["total_posts"], 7);
    }
}
