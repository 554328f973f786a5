//! Domain term replacement applied after machine translation.

use std::collections::BTreeMap;

/// Ordered term table. Longer terms are replaced before shorter ones so that
/// `incomplete dominant` is not pre-empted by `dominant`.
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    entries: Vec<(String, String)>,
}

impl Glossary {
    pub fn new(terms: BTreeMap<String, String>) -> Self {
        let mut entries: Vec<(String, String)> = terms.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every occurrence of every term.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (term, replacement) in &self.entries {
            if out.contains(term.as_str()) {
                out = out.replace(term.as_str(), replacement);
            }
        }
        out
    }
}
