//! JSON session export.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use interviewsim_core::model::Mode;
use interviewsim_core::session::{QaItem, Session, SessionSummary};

/// Default file name for the JSON export.
pub const DEFAULT_JSON_FILE: &str = "interview_session.json";

/// Header of an exported session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub session_id: Uuid,
    pub role: String,
    pub domain: String,
    pub mode: Mode,
    pub avg_score: f64,
    pub created_at: DateTime<Utc>,
}

impl SessionMeta {
    pub fn from_session(session: &Session, summary: &SessionSummary) -> Self {
        Self {
            session_id: session.id(),
            role: session.role().to_string(),
            domain: session.domain().to_string(),
            mode: session.mode(),
            avg_score: summary.average_score,
            created_at: session.created_at(),
        }
    }
}

/// A parsed JSON export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionExport {
    pub meta: SessionMeta,
    pub qa: Vec<QaItem>,
}

#[derive(Serialize)]
struct ExportRef<'a> {
    meta: &'a SessionMeta,
    qa: &'a [QaItem],
}

/// Serialize a session as pretty-printed `{"meta": ..., "qa": [...]}`.
pub fn to_json(meta: &SessionMeta, items: &[QaItem]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(&ExportRef { meta, qa: items })
        .context("failed to serialize session export")
}

/// Parse bytes produced by [`to_json`].
pub fn from_json(bytes: &[u8]) -> Result<SessionExport> {
    serde_json::from_slice(bytes).context("failed to parse session export JSON")
}

/// Write the JSON export to `path`, creating parent directories.
pub fn write_json_export(meta: &SessionMeta, items: &[QaItem], path: &Path) -> Result<()> {
    let bytes = to_json(meta, items)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write session export to {}", path.display()))?;
    Ok(())
}

/// Load a JSON export from disk.
pub fn read_json_export(path: &Path) -> Result<SessionExport> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read session export from {}", path.display()))?;
    from_json(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use interviewsim_core::model::Evaluation;

    fn meta() -> SessionMeta {
        SessionMeta {
            session_id: Uuid::nil(),
            role: "Software Engineer".into(),
            domain: "Backend".into(),
            mode: Mode::Technical,
            avg_score: 4.5,
            created_at: Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap(),
        }
    }

    fn items() -> Vec<QaItem> {
        let mut answered = Evaluation::fallback("timeout");
        answered.score = 9.0;
        answered.feedback = "Strong answer".into();
        vec![
            QaItem {
                question: "What is an index?".into(),
                answer: "A B-tree over a column.".into(),
                skipped: false,
                eval: answered,
            },
            QaItem {
                question: "Design a rate limiter.".into(),
                answer: String::new(),
                skipped: true,
                eval: Evaluation::skipped(),
            },
        ]
    }

    #[test]
    fn export_round_trip_preserves_values() {
        let bytes = to_json(&meta(), &items()).unwrap();
        let parsed = from_json(&bytes).unwrap();

        assert_eq!(parsed.meta, meta());
        assert_eq!(parsed.qa.len(), 2);
        assert_eq!(parsed.qa[0].question, "What is an index?");
        assert_eq!(parsed.qa[0].answer, "A B-tree over a column.");
        assert_eq!(parsed.qa[0].eval.score, 9.0);
        assert!(parsed.qa[1].skipped);
        assert_eq!(parsed.qa[1].eval.feedback, "Skipped");
    }

    #[test]
    fn json_layout_has_meta_and_qa() {
        let bytes = to_json(&meta(), &items()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["meta"]["role"], "Software Engineer");
        assert_eq!(value["meta"]["mode"], "Technical");
        assert_eq!(value["qa"][1]["eval"]["score"], 0.0);
        assert!(value["qa"][0]["eval"]["strengths"].is_array());
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out").join(DEFAULT_JSON_FILE);
        write_json_export(&meta(), &items(), &path).unwrap();

        let loaded = read_json_export(&path).unwrap();
        assert_eq!(loaded.qa.len(), 2);
    }

    #[test]
    fn malformed_export_is_an_error() {
        assert!(from_json(b"{\"meta\": 1}").is_err());
    }
}
