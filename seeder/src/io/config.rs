//! Seeder configuration stored in `seeder.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Desktop Chrome user agent; the scraped sites serve reduced markup to unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Seeder configuration (TOML).
///
/// Every section is optional. Missing fields fall back to the values the
/// site build expects (`src/constants` as the output directory).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeederConfig {
    /// Directory that receives every generated JSON file.
    pub output_dir: PathBuf,

    /// Directory for cached translator and language-model responses.
    pub cache_dir: PathBuf,

    pub http: HttpConfig,
    pub browser: BrowserConfig,
    pub pacing: PacingConfig,
    pub translate: TranslateConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowserConfig {
    /// Chromium-compatible executable used for JavaScript-rendered pages.
    pub binary: String,
    /// Virtual time the page may run scripts (and lazy-load content) before the DOM is dumped.
    pub virtual_time_budget_ms: u64,
    /// Wall-clock limit for a single page render.
    pub timeout_secs: u64,
    /// Rendered DOM beyond this many bytes is discarded.
    pub output_limit_bytes: usize,
}

/// Random pause between consecutive requests to the same site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PacingConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TranslateConfig {
    pub source: String,
    pub target: String,
    /// Longer texts are split on sentence boundaries before translation.
    pub max_chunk_chars: usize,
    /// Pause between translator calls.
    pub pause_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API root (without `/chat/completions`).
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Pause between curated rows.
    pub pause_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            binary: "chromium".to_string(),
            virtual_time_budget_ms: 20_000,
            timeout_secs: 60,
            output_limit_bytes: 20_000_000,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1_500,
            max_delay_ms: 3_000,
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            source: "en".to_string(),
            target: "ko".to_string(),
            max_chunk_chars: 4_500,
            pause_ms: 500,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 2_000,
            timeout_secs: 60,
            pause_ms: 1_000,
        }
    }
}

impl Default for SeederConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("src/constants"),
            cache_dir: PathBuf::from(".seeder/cache"),
            http: HttpConfig::default(),
            browser: BrowserConfig::default(),
            pacing: PacingConfig::default(),
            translate: TranslateConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl SeederConfig {
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("output_dir must be non-empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(anyhow!("http.timeout_secs must be > 0"));
        }
        if self.browser.binary.trim().is_empty() {
            return Err(anyhow!("browser.binary must be non-empty"));
        }
        if self.browser.timeout_secs == 0 {
            return Err(anyhow!("browser.timeout_secs must be > 0"));
        }
        if self.browser.output_limit_bytes == 0 {
            return Err(anyhow!("browser.output_limit_bytes must be > 0"));
        }
        if self.pacing.min_delay_ms > self.pacing.max_delay_ms {
            return Err(anyhow!(
                "pacing.min_delay_ms ({}) must be <= pacing.max_delay_ms ({})",
                self.pacing.min_delay_ms,
                self.pacing.max_delay_ms
            ));
        }
        if self.translate.max_chunk_chars == 0 {
            return Err(anyhow!("translate.max_chunk_chars must be > 0"));
        }
        if self.llm.timeout_secs == 0 {
            return Err(anyhow!("llm.timeout_secs must be > 0"));
        }
        if self.llm.max_tokens == 0 {
            return Err(anyhow!("llm.max_tokens must be > 0"));
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    /// Path of an output file inside `output_dir`.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SeederConfig::default()`.
pub fn load_config(path: &Path) -> Result<SeederConfig> {
    if !path.exists() {
        let cfg = SeederConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SeederConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
