//! Append-only log of evaluated answers.
//!
//! One record per evaluation, never updated or deleted. The JSON-lines store
//! assigns auto-incrementing ids and UTC timestamps on append.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Evaluation, Mode};

/// A persisted question/answer/evaluation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: u64,
    pub role: String,
    pub domain: String,
    pub mode: Mode,
    pub question: String,
    pub answer: String,
    pub score: f64,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

/// The fields supplied by the caller; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub role: String,
    pub domain: String,
    pub mode: Mode,
    pub question: String,
    pub answer: String,
    pub score: f64,
    pub feedback: String,
}

impl NewRecord {
    pub fn from_evaluation(
        role: &str,
        domain: &str,
        mode: Mode,
        question: &str,
        answer: &str,
        evaluation: &Evaluation,
    ) -> Self {
        Self {
            role: role.to_string(),
            domain: domain.to_string(),
            mode,
            question: question.to_string(),
            answer: answer.to_string(),
            score: evaluation.score,
            feedback: evaluation.feedback.clone(),
        }
    }
}

/// Storage for the evaluation log.
pub trait HistoryStore {
    /// Append a record, returning it with its assigned id and timestamp.
    fn append(&mut self, record: NewRecord) -> Result<HistoryRecord>;

    /// All records in insertion order.
    fn list(&self) -> Result<Vec<HistoryRecord>>;
}

/// A `HistoryStore` backed by a JSON-lines file.
pub struct JsonlHistoryStore {
    path: PathBuf,
    next_id: u64,
}

impl JsonlHistoryStore {
    /// Open (or lazily create) a log at `path`. Ids continue after the last stored record.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let next_id = if path.exists() {
            read_records(&path)?
                .iter()
                .map(|r| r.id)
                .max()
                .map_or(1, |id| id + 1)
        } else {
            1
        };
        Ok(Self { path, next_id })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonlHistoryStore {
    fn append(&mut self, record: NewRecord) -> Result<HistoryRecord> {
        let stored = HistoryRecord {
            id: self.next_id,
            role: record.role,
            domain: record.domain,
            mode: record.mode,
            question: record.question,
            answer: record.answer,
            score: record.score,
            feedback: record.feedback,
            created_at: Utc::now(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let line = serde_json::to_string(&stored).context("failed to serialize history record")?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open history log {}", self.path.display()))?;
        writeln!(file, "{line}")
            .with_context(|| format!("failed to append to {}", self.path.display()))?;

        self.next_id += 1;
        Ok(stored)
    }

    fn list(&self) -> Result<Vec<HistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        read_records(&self.path)
    }
}

fn read_records(path: &Path) -> Result<Vec<HistoryRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history log {}", path.display()))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("{}:{}: invalid history record", path.display(), n + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question: &str, score: f64) -> NewRecord {
        NewRecord {
            role: "Software Engineer".into(),
            domain: "Backend".into(),
            mode: Mode::Technical,
            question: question.into(),
            answer: "an answer".into(),
            score,
            feedback: "Nice attempt.".into(),
        }
    }

    #[test]
    fn append_assigns_increasing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonlHistoryStore::open(dir.path().join("history.jsonl")).unwrap();

        let first = store.append(record("Q1", 4.0)).unwrap();
        let second = store.append(record("Q2", 8.0)).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let all = store.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].question, "Q2");
        assert_eq!(all[1].score, 8.0);
    }

    #[test]
    fn reopen_continues_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/history.jsonl");
        {
            let mut store = JsonlHistoryStore::open(&path).unwrap();
            store.append(record("Q1", 4.0)).unwrap();
        }
        let mut store = JsonlHistoryStore::open(&path).unwrap();
        let next = store.append(record("Q2", 5.0)).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn missing_log_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlHistoryStore::open(dir.path().join("none.jsonl")).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn corrupt_line_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        std::fs::write(&path, "{not json}\n").unwrap();
        let err = JsonlHistoryStore::open(&path).err().unwrap();
        assert!(format!("{err:#}").contains("invalid history record"));
    }

    #[test]
    fn record_from_evaluation_copies_score_and_feedback() {
        let eval = Evaluation::fallback("timeout");
        let rec = NewRecord::from_evaluation("PM", "General", Mode::Behavioral, "Q", "A", &eval);
        assert_eq!(rec.score, 5.0);
        assert!(rec.feedback.contains("timeout"));
    }
}
