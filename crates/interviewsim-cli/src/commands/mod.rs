pub mod evaluate;
pub mod history;
pub mod init;
pub mod list_models;
pub mod practice;
pub mod questions;
pub mod report;
pub mod roles;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use interviewsim_core::bank::QuestionBank;
use interviewsim_core::history::{HistoryStore, JsonlHistoryStore, NewRecord};
use interviewsim_core::model::Mode;
use interviewsim_core::scoring::ScoringStrategy;
use interviewsim_providers::InterviewConfig;

/// Load the config file, or defaults when none exists.
pub fn load_config(path: Option<&Path>) -> Result<InterviewConfig> {
    interviewsim_providers::load_config_from(path)
}

/// The question bank named on the command line, else the configured one,
/// else the built-in bank.
pub fn load_bank(explicit: Option<&Path>, config: &InterviewConfig) -> Result<QuestionBank> {
    match explicit.or(config.question_bank.as_deref()) {
        Some(path) => interviewsim_core::parser::load_bank(path),
        None => Ok(QuestionBank::builtin()),
    }
}

pub fn parse_mode(mode: &str) -> Result<Mode> {
    mode.parse().map_err(|e: String| anyhow!(e))
}

pub fn parse_strategy(strategy: Option<&str>, config: &InterviewConfig) -> Result<ScoringStrategy> {
    match strategy {
        Some(s) => s.parse().map_err(|e: String| anyhow!(e)),
        None => Ok(config.strategy),
    }
}

pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub fn history_path(explicit: Option<PathBuf>, config: &InterviewConfig) -> PathBuf {
    explicit.unwrap_or_else(|| config.history_path.clone())
}

/// Open the history log for appending. Failure only disables recording.
pub fn open_history(path: &Path) -> Option<JsonlHistoryStore> {
    match JsonlHistoryStore::open(path) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(path = %path.display(), "history log unavailable, answers will not be recorded: {e:#}");
            None
        }
    }
}

/// Append to the history log if one is open. Failures are logged and ignored.
pub fn record(store: Option<&mut JsonlHistoryStore>, record: NewRecord) {
    let Some(store) = store else {
        return;
    };
    if let Err(e) = store.append(record) {
        tracing::warn!(path = %store.path().display(), "failed to record answer: {e:#}");
    }
}
