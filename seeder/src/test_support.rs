//! Offline fakes for fetchers and translators.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use anyhow::{Result, anyhow, bail};

use crate::io::fetch::PageFetcher;
use crate::translate::Translator;

/// Serves canned HTML by exact URL; unknown URLs fail like a network error.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl PageFetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("no page for {url}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Prefix,
    Identity,
    Fail,
}

/// Deterministic translator: prefixes `[ko]`, echoes, or fails.
#[derive(Debug)]
pub struct FakeTranslator {
    mode: Mode,
    fail_on: Option<String>,
    calls: Cell<usize>,
}

impl FakeTranslator {
    /// Returns `[ko]` followed by the input.
    pub fn new() -> Self {
        Self {
            mode: Mode::Prefix,
            fail_on: None,
            calls: Cell::new(0),
        }
    }

    /// Returns the input unchanged.
    pub fn identity() -> Self {
        Self {
            mode: Mode::Identity,
            ..Self::new()
        }
    }

    /// Fails every call.
    pub fn failing() -> Self {
        Self {
            mode: Mode::Fail,
            ..Self::new()
        }
    }

    /// Prefixes like [`FakeTranslator::new`] but fails on texts containing `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Default for FakeTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for FakeTranslator {
    fn translate(&self, text: &str) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        if self.fail_on.as_deref().is_some_and(|needle| text.contains(needle)) {
            bail!("translator rejected {text:?}");
        }
        match self.mode {
            Mode::Prefix => Ok(format!("[ko]{text}")),
            Mode::Identity => Ok(text.to_string()),
            Mode::Fail => bail!("translator unavailable"),
        }
    }
}
