//! Raw question rows fed into the curation pipeline.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use seeder::io::json_store::read_json;

/// One exported Q&A search result: the question title and its body with answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    #[serde(default, alias = "제목")]
    pub title: String,
    #[serde(default, alias = "본문")]
    pub content: String,
}

impl SourceRow {
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

/// Rows used when no export file is given.
pub fn sample_rows() -> Vec<SourceRow> {
    vec![
        SourceRow::new(
            "릴리끼리 교배해도 되나요?",
            "릴리 화이트 암수가 있는데 둘이 붙이면 더 하얀 애기가 나온다고 해서요. 해도 될까요?",
        ),
        SourceRow::new(
            "크레 먹이로 젤리만 줘도 되나요",
            "슈퍼푸드 비싸서 그냥 곤충 젤리로 주려는데 괜찮을까요? 답변 부탁드려요",
        ),
        SourceRow::new(
            "카푸치노 모프 알려주세요",
            "카푸치노랑 세이블이 뭐가 다른지 모르겠어요. 교배하면 어떻게 되나요?",
        ),
        SourceRow::new(
            "여름에 온도 30도 넘어도 괜찮나요?",
            "에어컨이 없어서 방이 32도까지 올라가는데 크레가 버틸 수 있을까요?",
        ),
        SourceRow::new(
            "문스톤 크레 분양합니다 (광고)",
            "예쁜 문스톤 크레 분양합니다. 연락주세요 010-xxxx-xxxx",
        ),
    ]
}

/// Read a JSON array of rows, dropping rows with an empty title or content.
pub fn load_rows(path: &Path) -> Result<Vec<SourceRow>> {
    let rows: Vec<SourceRow> = read_json(path)?;
    let total = rows.len();
    let kept: Vec<SourceRow> = rows.into_iter().filter(SourceRow::is_complete).collect();
    if kept.len() < total {
        debug!(dropped = total - kept.len(), "dropped incomplete rows");
    }
    info!(path = %path.display(), rows = kept.len(), "loaded rows");
    Ok(kept)
}
