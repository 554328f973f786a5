//! Prompt templates for the three curation steps.

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use serde::Serialize;

const KNOWLEDGE_BASE: &str = include_str!("prompts/knowledge_base.md");

const TEMPLATES: [(&str, &str); 6] = [
    ("relevance_system", include_str!("prompts/relevance_system.md")),
    ("relevance", include_str!("prompts/relevance.md")),
    ("fact_check_system", include_str!("prompts/fact_check_system.md")),
    ("fact_check", include_str!("prompts/fact_check.md")),
    ("reformat_system", include_str!("prompts/reformat_system.md")),
    ("reformat", include_str!("prompts/reformat.md")),
];

/// Length hints given to the reformatter, in characters.
const TITLE_LIMIT: usize = 20;
const CONTENT_LIMIT: usize = 100;

/// Common misinformation the fact-checker must always correct.
#[derive(Debug, Clone, Serialize)]
struct RequiredFix {
    claim: &'static str,
    correction: &'static str,
}

const REQUIRED_FIXES: [RequiredFix; 4] = [
    RequiredFix {
        claim: "릴리끼리 붙여보세요",
        correction: "절대 안 됩니다(치사유전)",
    },
    RequiredFix {
        claim: "젤리만 줘도 됩니다",
        correction: "슈퍼푸드+곤충 병행 권장",
    },
    RequiredFix {
        claim: "문스톤 모프",
        correction: "공식 모프 아님, 상술 주의",
    },
    RequiredFix {
        claim: "30도까지 괜찮아요",
        correction: "28도 이상 위험, 30도 치명적",
    },
];

/// A rendered system + user message pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .with_context(|| format!("load prompt template {name}"))?;
        }
        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        let template = self.env.get_template(name)?;
        let rendered = template
            .render(ctx)
            .with_context(|| format!("render prompt {name}"))?;
        Ok(rendered)
    }

    pub fn relevance(&self, title: &str, content: &str) -> Result<Prompt> {
        Ok(Prompt {
            system: self.render("relevance_system", context! {})?,
            user: self.render(
                "relevance",
                context! { title => title.trim(), content => content.trim() },
            )?,
        })
    }

    pub fn fact_check(&self, title: &str, content: &str) -> Result<Prompt> {
        Ok(Prompt {
            system: self.render(
                "fact_check_system",
                context! {
                    knowledge_base => KNOWLEDGE_BASE.trim(),
                    required_fixes => REQUIRED_FIXES,
                },
            )?,
            user: self.render(
                "fact_check",
                context! { title => title.trim(), content => content.trim() },
            )?,
        })
    }

    pub fn reformat(&self, title: &str, content: &str, corrected_answer: &str) -> Result<Prompt> {
        Ok(Prompt {
            system: self.render("reformat_system", context! {})?,
            user: self.render(
                "reformat",
                context! {
                    title => title.trim(),
                    content => content.trim(),
                    corrected_answer => corrected_answer.trim(),
                    title_limit => TITLE_LIMIT,
                    content_limit => CONTENT_LIMIT,
                },
            )?,
        })
    }
}
