//! JavaScript-rendered pages via a headless Chromium process.
//!
//! The browser is asked to dump the DOM after a virtual time budget, which
//! lets client-side rendering and lazy loading settle before the HTML is read.

use std::process::Command;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::{debug, instrument};

use crate::io::config::BrowserConfig;
use crate::io::fetch::PageFetcher;
use crate::io::process::run_with_timeout;

pub struct BrowserFetcher {
    binary: String,
    user_agent: String,
    virtual_time_budget_ms: u64,
    timeout: Duration,
    output_limit_bytes: usize,
}

impl BrowserFetcher {
    pub fn new(config: &BrowserConfig, user_agent: &str) -> Self {
        Self {
            binary: config.binary.clone(),
            user_agent: user_agent.to_string(),
            virtual_time_budget_ms: config.virtual_time_budget_ms,
            timeout: Duration::from_secs(config.timeout_secs),
            output_limit_bytes: config.output_limit_bytes,
        }
    }

    /// Command-line arguments for rendering `url`.
    pub fn args(&self, url: &str) -> Vec<String> {
        vec![
            "--headless=new".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--window-size=1920,1080".to_string(),
            format!("--user-agent={}", self.user_agent),
            format!("--virtual-time-budget={}", self.virtual_time_budget_ms),
            "--dump-dom".to_string(),
            url.to_string(),
        ]
    }
}

impl PageFetcher for BrowserFetcher {
    #[instrument(skip(self), fields(binary = %self.binary))]
    fn fetch(&self, url: &str) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(self.args(url));

        let output = run_with_timeout(cmd, self.timeout, self.output_limit_bytes)?;
        if output.timed_out {
            bail!("{} timed out after {:?} rendering {url}", self.binary, self.timeout);
        }
        if !output.succeeded() {
            bail!(
                "{} exited with {:?} rendering {url}: {}",
                self.binary,
                output.status.code(),
                output.stderr_tail()
            );
        }
        let html = String::from_utf8_lossy(&output.stdout).into_owned();
        if html.trim().is_empty() {
            bail!("{} produced an empty DOM for {url}", self.binary);
        }
        debug!(bytes = html.len(), "rendered page");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn config_with_binary(binary: &str) -> BrowserConfig {
        BrowserConfig {
            binary: binary.to_string(),
            virtual_time_budget_ms: 10,
            timeout_secs: 5,
            output_limit_bytes: 1 << 20,
        }
    }

    /// Writes an executable script standing in for the browser.
    fn fake_browser(dir: &std::path::Path, body: &str) -> String {
        let path = dir.join("fake-chromium");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod");
        path.display().to_string()
    }

    #[test]
    fn args_end_with_dump_dom_and_url() {
        let fetcher = BrowserFetcher::new(&config_with_binary("chromium"), "UA/1.0");
        let args = fetcher.args("https://example.com/");
        assert!(args.contains(&"--user-agent=UA/1.0".to_string()));
        assert!(args.contains(&"--virtual-time-budget=10".to_string()));
        assert_eq!(args[args.len() - 2], "--dump-dom");
        assert_eq!(args[args.len() - 1], "https://example.com/");
    }

    #[test]
    fn returns_dumped_dom() {
        let temp = tempfile::tempdir().expect("tempdir");
        let binary = fake_browser(temp.path(), "echo \"<html><body>$#</body></html>\"");
        let fetcher = BrowserFetcher::new(&config_with_binary(&binary), "UA");
        let html = fetcher.fetch("https://example.com/").expect("fetch");
        assert!(html.contains("<body>9</body>"));
    }

    #[test]
    fn failing_browser_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let binary = fake_browser(temp.path(), "echo 'cannot open display' >&2; exit 1");
        let fetcher = BrowserFetcher::new(&config_with_binary(&binary), "UA");
        let err = fetcher.fetch("https://example.com/").unwrap_err();
        assert!(err.to_string().contains("cannot open display"));
    }

    #[test]
    fn empty_dom_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let binary = fake_browser(temp.path(), "exit 0");
        let fetcher = BrowserFetcher::new(&config_with_binary(&binary), "UA");
        assert!(fetcher.fetch("https://example.com/").is_err());
    }
}
