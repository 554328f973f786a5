//! Chat-completion clients for the curation pipeline.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use seeder::io::config::LlmConfig;
use seeder::io::response_cache::ResponseCache;

/// Environment variables checked for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["XAI_API_KEY", "GROQ_API_KEY"];

const CACHE_NAMESPACE: &str = "llm";

/// A single-turn chat model.
pub trait ChatModel {
    fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Resolve the API key through `lookup` (normally `std::env::var`).
///
/// Empty values count as missing.
pub fn resolve_api_key<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| anyhow!("set {} or {}", API_KEY_VARS[0], API_KEY_VARS[1]))
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint (Groq, xAI).
pub struct OpenAiCompatClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiCompatClient {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build chat http client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request<'a>(&'a self, system: &'a str, prompt: &'a str) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });
        ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

impl ChatModel for OpenAiCompatClient {
    #[instrument(skip_all, fields(model = %self.model))]
    fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(system, prompt))
            .send()
            .with_context(|| format!("POST {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("chat completion returned {status}: {}", body.trim());
        }

        let parsed: ChatResponse = response.json().context("parse chat completion")?;
        parse_reply(parsed)
    }
}

fn parse_reply(response: ChatResponse) -> Result<String> {
    let reply = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| anyhow!("chat completion has no content"))?;
    debug!(chars = reply.chars().count(), "chat reply");
    Ok(reply)
}

/// Replays earlier completions from the response cache.
///
/// With `force` the cache is never read, but fresh replies still overwrite it.
pub struct CachedChatModel<M> {
    inner: M,
    cache: ResponseCache,
    model: String,
    force: bool,
}

impl<M: ChatModel> CachedChatModel<M> {
    /// `model` is part of the cache key so switching models re-runs every call.
    pub fn new(inner: M, cache: ResponseCache, model: impl Into<String>, force: bool) -> Self {
        Self {
            inner,
            cache,
            model: model.into(),
            force,
        }
    }

    fn key(&self, system: &str, prompt: &str) -> String {
        format!("{}\n\n{system}\n\n{prompt}", self.model)
    }
}

impl<M: ChatModel> ChatModel for CachedChatModel<M> {
    fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let key = self.key(system, prompt);
        if !self.force
            && let Some(hit) = self.cache.get(CACHE_NAMESPACE, &key)?
        {
            return Ok(hit);
        }
        let reply = self.inner.complete(system, prompt)?;
        self.cache.put(CACHE_NAMESPACE, &key, &reply)?;
        Ok(reply)
    }
}
