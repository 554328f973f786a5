//! JSON Schema checks for structured model replies.

use anyhow::{Context, Result, bail};
use jsonschema::{Draft, Validator};
use serde_json::Value;

const FACT_CHECK_SCHEMA: &str = include_str!("../schemas/fact_check.schema.json");
const REFORMAT_SCHEMA: &str = include_str!("../schemas/reformat.schema.json");

/// Compiled validators for the fact-check and reformat replies.
pub struct ReplySchemas {
    fact_check: Validator,
    reformat: Validator,
}

impl ReplySchemas {
    pub fn embedded() -> Result<Self> {
        Ok(Self {
            fact_check: compile("fact_check", FACT_CHECK_SCHEMA)?,
            reformat: compile("reformat", REFORMAT_SCHEMA)?,
        })
    }

    pub fn check_fact_check(&self, reply: &Value) -> Result<()> {
        check(&self.fact_check, reply).context("fact-check reply")
    }

    pub fn check_reformat(&self, reply: &Value) -> Result<()> {
        check(&self.reformat, reply).context("reformat reply")
    }
}

fn compile(name: &str, raw: &str) -> Result<Validator> {
    let schema: Value =
        serde_json::from_str(raw).with_context(|| format!("parse {name} schema"))?;
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .with_context(|| format!("compile {name} schema"))
}

fn check(validator: &Validator, instance: &Value) -> Result<()> {
    let messages: Vec<String> = validator
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        bail!("schema validation failed:\n- {}", messages.join("\n- "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fact_check_accepts_null_summary_and_rejects_string_flag() {
        let schemas = ReplySchemas::embedded().expect("schemas");
        schemas
            .check_fact_check(&json!({
                "has_errors": false,
                "error_summary": null,
                "corrected_answer": "괜찮아요"
            }))
            .expect("valid");

        let err = schemas
            .check_fact_check(&json!({"has_errors": "true", "corrected_answer": "x"}))
            .unwrap_err();
        assert!(format!("{err:#}").contains("schema validation failed"));
    }

    #[test]
    fn reformat_requires_title_and_content() {
        let schemas = ReplySchemas::embedded().expect("schemas");
        schemas
            .check_reformat(&json!({"title": "[질문] 온도", "content": "덥나요?", "best_answer": "네"}))
            .expect("valid");
        assert!(schemas.check_reformat(&json!({"title": "[질문] 온도"})).is_err());
        assert!(schemas.check_reformat(&json!({"title": "", "content": "c"})).is_err());
    }
}
