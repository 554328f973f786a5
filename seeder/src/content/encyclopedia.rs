//! Hand-written morph encyclopedia (`morph_data_full.json`).

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::{WrittenFile, parse_embedded};
use crate::core::dates::format_timestamp;
use crate::io::json_store::write_json;

pub const ENCYCLOPEDIA_FILE: &str = "morph_data_full.json";

const ENCYCLOPEDIA_DATA: &str = include_str!("../../data/encyclopedia.toml");
const VERSION: &str = "1.0";
const DESCRIPTION: &str = "크레스티드 게코 모프 백과사전 - 주요 모프 상세 정보";

/// One encyclopedia entry. `content` is markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncyclopediaMorph {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub summary: String,
    pub content: String,
    #[serde(rename = "referenceUrl", default)]
    pub reference_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncyclopediaDocument {
    pub generated_at: String,
    pub version: String,
    pub total_morphs: usize,
    pub description: String,
    pub morphs: Vec<EncyclopediaMorph>,
}

#[derive(Deserialize)]
struct EncyclopediaData {
    morphs: Vec<EncyclopediaMorph>,
}

/// Load the embedded entries, rejecting duplicate ids.
pub fn embedded_morphs() -> Result<Vec<EncyclopediaMorph>> {
    let data: EncyclopediaData = parse_embedded("encyclopedia.toml", ENCYCLOPEDIA_DATA)?;
    let mut seen = HashSet::new();
    for morph in &data.morphs {
        if !seen.insert(morph.id.as_str()) {
            bail!("duplicate encyclopedia id: {}", morph.id);
        }
    }
    Ok(data.morphs)
}

pub fn build_document(morphs: Vec<EncyclopediaMorph>, now: DateTime<Local>) -> EncyclopediaDocument {
    EncyclopediaDocument {
        generated_at: format_timestamp(now),
        version: VERSION.to_string(),
        total_morphs: morphs.len(),
        description: DESCRIPTION.to_string(),
        morphs,
    }
}

pub fn write_encyclopedia(now: DateTime<Local>, output_dir: &Path) -> Result<WrittenFile> {
    let document = build_document(embedded_morphs()?, now);
    let path = output_dir.join(ENCYCLOPEDIA_FILE);
    write_json(&path, &document)?;
    info!(count = document.total_morphs, path = %path.display(), "wrote encyclopedia");
    Ok(WrittenFile {
        path,
        count: document.total_morphs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::json_store::read_json;

    #[test]
    fn embedded_entries_are_complete() {
        let morphs = embedded_morphs().expect("embedded encyclopedia");
        assert!(morphs.len() >= 25);
        for morph in &morphs {
            assert!(!morph.id.is_empty());
            assert_eq!(morph.id, morph.id.to_lowercase());
            assert!(!morph.summary.is_empty());
            assert!(morph.content.contains("## "), "{} has markdown sections", morph.id);
        }
        let lilly = morphs.iter().find(|m| m.id == "lilly-white").expect("lilly white");
        assert_eq!(lilly.kind, "Incomplete Dominant");
    }

    #[test]
    fn written_document_round_trips_with_json_field_names() {
        let temp = tempfile::tempdir().expect("tempdir");
        let written = write_encyclopedia(Local::now(), temp.path()).expect("write");

        let raw = std::fs::read_to_string(&written.path).expect("read raw");
        assert!(raw.contains("\"referenceUrl\""));
        assert!(raw.contains("\"type\": \"Incomplete Dominant\""));

        let document: EncyclopediaDocument = read_json(&written.path).expect("read back");
        assert_eq!(document.version, "1.0");
        assert_eq!(document.total_morphs, document.morphs.len());
        assert_eq!(document.total_morphs, written.count);
    }
}
