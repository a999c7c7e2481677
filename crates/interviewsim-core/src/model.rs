//! Core data model types for interviewsim.
//!
//! These are the records the whole system passes around: questions from the
//! bank, the answers a candidate gives, and the evaluations produced for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single interview question from the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique across the whole bank.
    pub id: u32,
    /// The question as shown to the candidate.
    pub text: String,
    /// What kind of question this is.
    pub category: Category,
    /// Expected difficulty.
    pub difficulty: Difficulty,
    /// Optional nudge shown on request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Question category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Concept,
    Algorithm,
    SystemDesign,
    Behavioral,
    Ml,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Concept => write!(f, "concept"),
            Category::Algorithm => write!(f, "algorithm"),
            Category::SystemDesign => write!(f, "system-design"),
            Category::Behavioral => write!(f, "behavioral"),
            Category::Ml => write!(f, "ml"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "concept" => Ok(Category::Concept),
            "algorithm" => Ok(Category::Algorithm),
            "system-design" | "system_design" => Ok(Category::SystemDesign),
            "behavioral" | "behavioural" => Ok(Category::Behavioral),
            "ml" => Ok(Category::Ml),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Question difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Interview mode. Passed through to scoring as context; it does not filter
/// question selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Technical,
    Behavioral,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Technical => write!(f, "Technical"),
            Mode::Behavioral => write!(f, "Behavioral"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "technical" | "tech" => Ok(Mode::Technical),
            "behavioral" | "behavioural" => Ok(Mode::Behavioral),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// A candidate's answer to one question. Empty text means the question was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: u32,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(question_id: u32, text: impl Into<String>) -> Self {
        Self {
            question_id,
            text: text.into(),
            submitted_at: Utc::now(),
        }
    }

    /// Returns `true` if this answer records a skip.
    pub fn is_skipped(&self) -> bool {
        self.text.is_empty()
    }
}

/// Structured scoring output for one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Score in `[0, 10]`, one decimal place.
    pub score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    pub feedback: String,
    #[serde(default)]
    pub suggested_improvement: String,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// Feedback text carried by the evaluation of a skipped question.
pub const SKIPPED_FEEDBACK: &str = "Skipped";

/// Prefix of the feedback carried by a fallback evaluation.
pub const FALLBACK_FEEDBACK_PREFIX: &str = "Evaluation unavailable";

impl Evaluation {
    /// The evaluation recorded for a skipped question. No strategy is consulted.
    pub fn skipped() -> Self {
        Self {
            score: 0.0,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            feedback: SKIPPED_FEEDBACK.to_string(),
            suggested_improvement: String::new(),
            resources: Vec::new(),
        }
    }

    /// Degraded-but-valid evaluation returned when remote scoring fails.
    pub fn fallback(reason: &str) -> Self {
        Self {
            score: 5.0,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            feedback: format!("{FALLBACK_FEEDBACK_PREFIX}: {reason}"),
            suggested_improvement: String::new(),
            resources: Vec::new(),
        }
    }

    /// Returns `true` if this evaluation was produced by the remote fallback path.
    pub fn is_fallback(&self) -> bool {
        self.feedback.starts_with(FALLBACK_FEEDBACK_PREFIX)
    }

    pub fn is_skipped(&self) -> bool {
        self.feedback == SKIPPED_FEEDBACK && self.score == 0.0
    }
}

/// Clamp a raw score to `[0, 10]` and round it to one decimal place.
pub fn normalize_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    (raw.clamp(0.0, 10.0) * 10.0).round() / 10.0
}
