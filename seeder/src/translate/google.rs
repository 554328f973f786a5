//! Google Translate's public `gtx` endpoint.

use std::cell::Cell;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::instrument;

use crate::translate::Translator;

pub const GTX_URL: &str = "https://translate.googleapis.com/translate_a/single";

pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
    source: String,
    target: String,
    pause: Duration,
    used: Cell<bool>,
}

impl GoogleTranslator {
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        source: &str,
        target: &str,
        pause: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("build translate client")?;
        Ok(Self {
            client,
            endpoint: GTX_URL.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            pause,
            used: Cell::new(false),
        })
    }

    /// Cache namespace for this language pair.
    pub fn cache_namespace(&self) -> String {
        format!("translate-{}-{}", self.source, self.target)
    }
}

/// Concatenate the translated segments of a `gtx` response.
///
/// The payload is a nested array whose first element lists
/// `[translated, original, ...]` segments.
pub fn parse_gtx_response(payload: &Value) -> Result<String> {
    let Some(segments) = payload.get(0).and_then(Value::as_array) else {
        bail!("unexpected translate response shape");
    };
    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();
    if translated.is_empty() {
        bail!("translate response contained no text");
    }
    Ok(translated)
}

impl Translator for GoogleTranslator {
    #[instrument(skip_all, fields(chars = text.chars().count()))]
    fn translate(&self, text: &str) -> Result<String> {
        if self.used.replace(true) && !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .context("send translate request")?;
        let status = response.status();
        if !status.is_success() {
            bail!("translate request returned HTTP {}", status.as_u16());
        }
        let payload: Value = response.json().context("parse translate response")?;
        parse_gtx_response(&payload)
    }
}
