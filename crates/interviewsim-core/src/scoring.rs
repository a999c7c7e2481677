//! Answer scoring.
//!
//! Two interchangeable strategies produce an [`Evaluation`]: a local heuristic
//! over answer length and keyword usage, and a remote strategy that asks an
//! LLM for a JSON verdict. Neither ever fails from the caller's point of view;
//! remote failures degrade to [`Evaluation::fallback`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ScoringError;
use crate::model::{normalize_score, Evaluation, Mode};
use crate::traits::{strip_json_fence, GenerateRequest, LlmProvider, DEFAULT_SYSTEM_PROMPT};

/// Signal terms rewarded by the heuristic, matched case-insensitively.
pub const KEYWORDS: [&str; 9] = [
    "complexity",
    "time",
    "space",
    "edge case",
    "scalable",
    "tests",
    "trade-off",
    "STAR",
    "impact",
];

const BASE_SCORE: f64 = 4.0;
const LENGTH_BONUS: f64 = 2.0;
const DETAILED_WORDS: usize = 15;
const THOROUGH_WORDS: usize = 60;
const MAX_KEYWORD_BONUS: usize = 2;

/// Sampling temperature for remote scoring. Determinism over creativity.
pub const SCORING_TEMPERATURE: f64 = 0.0;
const SCORING_MAX_TOKENS: u32 = 800;

/// Which scoring strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategy {
    #[default]
    Heuristic,
    Remote,
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringStrategy::Heuristic => write!(f, "heuristic"),
            ScoringStrategy::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heuristic" | "mock" | "local" => Ok(ScoringStrategy::Heuristic),
            "remote" | "llm" => Ok(ScoringStrategy::Remote),
            other => Err(format!("unknown scoring strategy: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Heuristic strategy
// ---------------------------------------------------------------------------

/// Count how many signal terms occur in the answer.
pub fn keyword_matches(answer: &str) -> usize {
    let lower = answer.to_lowercase();
    KEYWORDS
        .iter()
        .filter(|k| lower.contains(&k.to_lowercase()))
        .count()
}

/// Score an answer locally from its length and keyword usage.
///
/// Deterministic: the same text always yields the same evaluation.
pub fn heuristic_evaluate(answer: &str) -> Evaluation {
    let words = answer.split_whitespace().count();
    let matches = keyword_matches(answer);

    let mut score = BASE_SCORE;
    if words > DETAILED_WORDS {
        score += LENGTH_BONUS;
    }
    if words > THOROUGH_WORDS {
        score += LENGTH_BONUS;
    }
    score += matches.min(MAX_KEYWORD_BONUS) as f64;

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    if words > DETAILED_WORDS {
        strengths.push("Good detail and explanation".to_string());
    } else {
        weaknesses.push("Answer too short; add more specifics".to_string());
    }
    if matches > 0 {
        strengths.push("Used relevant keywords".to_string());
    } else {
        weaknesses.push("Missing technical keywords or trade-offs".to_string());
    }

    let clause = if answer.to_lowercase().contains("complexity") {
        "Good complexity analysis."
    } else {
        "Expand with edge-cases and complexity analysis."
    };

    Evaluation {
        score: normalize_score(score),
        strengths,
        weaknesses,
        feedback: format!("Nice attempt. {clause}"),
        suggested_improvement:
            "Mention time/space complexity and give one edge-case or test example.".to_string(),
        resources: vec![
            "Cracking the Coding Interview (book)".to_string(),
            "System Design Primer (GitHub)".to_string(),
        ],
    }
}

// ---------------------------------------------------------------------------
// Remote strategy
// ---------------------------------------------------------------------------

/// Build the grading prompt sent to the remote model.
pub fn build_prompt(question: &str, answer: &str, mode: Mode) -> String {
    format!(
        "You are grading a {mode} interview answer.\n\n\
         Question:\n{question}\n\n\
         Candidate answer:\n{answer}\n\n\
         Respond with ONLY a JSON object with exactly these keys:\n\
         - \"score\": number from 0 to 10\n\
         - \"strengths\": array of short strings\n\
         - \"weaknesses\": array of short strings\n\
         - \"feedback\": one paragraph of feedback\n\
         - \"suggested_improvement\": how to improve, or a model answer\n\
         - \"resources\": array of study resources\n"
    )
}

/// The verdict object a remote model is asked to return.
#[derive(Debug, Deserialize)]
struct Verdict {
    score: f64,
    feedback: String,
    #[serde(default)]
    suggested_improvement: Option<String>,
    #[serde(default)]
    strengths: Option<Vec<String>>,
    #[serde(default)]
    weaknesses: Option<Vec<String>>,
    #[serde(default)]
    resources: Option<Vec<String>>,
}

impl From<Verdict> for Evaluation {
    fn from(verdict: Verdict) -> Self {
        Evaluation {
            score: normalize_score(verdict.score),
            strengths: verdict.strengths.unwrap_or_default(),
            weaknesses: verdict.weaknesses.unwrap_or_default(),
            feedback: verdict.feedback,
            suggested_improvement: verdict.suggested_improvement.unwrap_or_default(),
            resources: verdict.resources.unwrap_or_default(),
        }
    }
}

/// Parse a remote response into an evaluation, validating every field.
///
/// Only a bare JSON object, or one wrapped in a single Markdown fence, is
/// accepted.
pub fn parse_evaluation(text: &str) -> Result<Evaluation, ScoringError> {
    let body = strip_json_fence(text);
    let value: Value =
        serde_json::from_str(body).map_err(|e| ScoringError::MalformedResponse(e.to_string()))?;

    let map = match value {
        Value::Object(map) => map,
        Value::Array(_) => return Err(ScoringError::NotAnObject("array")),
        Value::String(_) => return Err(ScoringError::NotAnObject("string")),
        Value::Number(_) => return Err(ScoringError::NotAnObject("number")),
        Value::Bool(_) => return Err(ScoringError::NotAnObject("boolean")),
        Value::Null => return Err(ScoringError::NotAnObject("null")),
    };

    match Verdict::deserialize(&Value::Object(map.clone())) {
        Ok(verdict) => Ok(verdict.into()),
        Err(e) => Err(blame_field(&map, e)),
    }
}

/// Attribute a verdict deserialization error to the first field that does
/// not fit its declared type.
fn blame_field(map: &Map<String, Value>, err: serde_json::Error) -> ScoringError {
    let fits = [
        ("score", fits::<f64>(map, "score")),
        ("feedback", fits::<String>(map, "feedback")),
        ("suggested_improvement", fits::<Option<String>>(map, "suggested_improvement")),
        ("strengths", fits::<Option<Vec<String>>>(map, "strengths")),
        ("weaknesses", fits::<Option<Vec<String>>>(map, "weaknesses")),
        ("resources", fits::<Option<Vec<String>>>(map, "resources")),
    ];
    match fits.iter().find(|(_, ok)| !ok) {
        Some(&(field, _)) => ScoringError::InvalidField {
            field,
            reason: err.to_string(),
        },
        None => ScoringError::MalformedResponse(err.to_string()),
    }
}

fn fits<T: DeserializeOwned>(map: &Map<String, Value>, field: &str) -> bool {
    T::deserialize(map.get(field).unwrap_or(&Value::Null)).is_ok()
}

enum Backend {
    Ready(Arc<dyn LlmProvider>),
    Unconfigured(String),
}

/// Scores answers by delegating to an LLM provider.
pub struct RemoteScorer {
    backend: Backend,
    model: String,
}

impl RemoteScorer {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            backend: Backend::Ready(provider),
            model: model.into(),
        }
    }

    /// A remote scorer with no provider behind it. Every evaluation falls back,
    /// with `reason` in the feedback.
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            backend: Backend::Unconfigured(reason.into()),
            model: String::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One round-trip to the provider. No retry.
    pub async fn request_evaluation(
        &self,
        question: &str,
        answer: &str,
        mode: Mode,
    ) -> Result<Evaluation, ScoringError> {
        let provider = match &self.backend {
            Backend::Ready(provider) => provider,
            Backend::Unconfigured(reason) => {
                return Err(ScoringError::Unconfigured(reason.clone()))
            }
        };

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: build_prompt(question, answer, mode),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            max_tokens: SCORING_MAX_TOKENS,
            temperature: SCORING_TEMPERATURE,
            json_mode: true,
        };

        let response = provider
            .generate(&request)
            .await
            .map_err(ScoringError::from_provider)?;

        parse_evaluation(&response.content)
    }

    /// Evaluate an answer, converting any failure into a fallback evaluation.
    pub async fn evaluate(&self, question: &str, answer: &str, mode: Mode) -> Evaluation {
        match self.request_evaluation(question, answer, mode).await {
            Ok(evaluation) => evaluation,
            Err(e) => {
                tracing::warn!(model = %self.model, "remote scoring failed, using fallback: {e}");
                Evaluation::fallback(&e.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Strategy dispatch
// ---------------------------------------------------------------------------

/// The scoring engine used by a session.
pub enum Scorer {
    Heuristic,
    Remote(RemoteScorer),
}

impl Scorer {
    pub fn strategy(&self) -> ScoringStrategy {
        match self {
            Scorer::Heuristic => ScoringStrategy::Heuristic,
            Scorer::Remote(_) => ScoringStrategy::Remote,
        }
    }

    /// Evaluate an answer. Always returns a well-formed evaluation.
    pub async fn evaluate(&self, question: &str, answer: &str, mode: Mode) -> Evaluation {
        match self {
            Scorer::Heuristic => heuristic_evaluate(answer),
            Scorer::Remote(remote) => remote.evaluate(question, answer, mode).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::traits::{GenerateResponse, ModelInfo, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedProvider {
        content: String,
        last_request: Mutex<Option<GenerateRequest>>,
    }

    impl FixedProvider {
        fn new(content: &str) -> Self {
            Self {
                content: content.to_string(),
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            Ok(GenerateResponse {
                content: self.content.clone(),
                model: request.model.clone(),
                token_usage: TokenUsage::default(),
                latency_ms: 1,
            })
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            Err(ProviderError::NetworkError("connection refused".into()).into())
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    fn words(n: usize) -> String {
        vec!["alpha"; n].join(" ")
    }

    #[test]
    fn short_answer_without_keywords_scores_base() {
        for n in [1, 5, 15] {
            let eval = heuristic_evaluate(&words(n));
            assert_eq!(eval.score, 4.0, "{n} words");
            assert!(eval.strengths.is_empty());
            assert_eq!(eval.weaknesses.len(), 2);
        }
    }

    #[test]
    fn length_bonuses_are_cumulative() {
        assert_eq!(heuristic_evaluate(&words(16)).score, 6.0);
        assert_eq!(heuristic_evaluate(&words(60)).score, 6.0);
        assert_eq!(heuristic_evaluate(&words(61)).score, 8.0);
    }

    #[test]
    fn keyword_bonus_is_capped_at_two() {
        let one = heuristic_evaluate("the complexity");
        assert_eq!(one.score, 5.0);
        let many = heuristic_evaluate("complexity time space scalable tests impact");
        assert_eq!(many.score, 6.0);
    }

    #[test]
    fn keywords_match_case_insensitively() {
        assert_eq!(keyword_matches("I used the star method"), 1);
        assert_eq!(keyword_matches("EDGE CASE handling"), 1);
        assert_eq!(keyword_matches("nothing here"), 0);
    }

    #[test]
    fn score_is_monotonic_in_length_bucket() {
        for keyword_text in ["", "complexity", "complexity scalable"] {
            let scores: Vec<f64> = [10, 40, 80]
                .iter()
                .map(|&n| heuristic_evaluate(&format!("{keyword_text} {}", words(n))).score)
                .collect();
            assert!(
                scores.windows(2).all(|w| w[0] <= w[1]),
                "not monotonic for {keyword_text:?}: {scores:?}"
            );
        }
    }

    #[test]
    fn score_stays_in_range() {
        let long = format!("complexity time space tests {}", words(500));
        for text in ["", "x", long.as_str()] {
            let score = heuristic_evaluate(text).score;
            assert!((0.0..=10.0).contains(&score));
        }
        assert_eq!(heuristic_evaluate(&long).score, 10.0);
    }

    #[test]
    fn one_signal_per_category() {
        let eval = heuristic_evaluate(&format!("complexity {}", words(20)));
        assert_eq!(
            eval.strengths,
            vec!["Good detail and explanation", "Used relevant keywords"]
        );
        assert!(eval.weaknesses.is_empty());

        let eval = heuristic_evaluate(&format!("tests {}", words(3)));
        assert_eq!(eval.strengths, vec!["Used relevant keywords"]);
        assert_eq!(eval.weaknesses, vec!["Answer too short; add more specifics"]);
    }

    #[test]
    fn feedback_clause_depends_on_complexity() {
        assert_eq!(
            heuristic_evaluate("O(n) Complexity").feedback,
            "Nice attempt. Good complexity analysis."
        );
        assert_eq!(
            heuristic_evaluate("it depends").feedback,
            "Nice attempt. Expand with edge-cases and complexity analysis."
        );
    }

    #[test]
    fn prompt_embeds_question_answer_and_mode() {
        let prompt = build_prompt("What is a mutex?", "A lock.", Mode::Behavioral);
        assert!(prompt.contains("What is a mutex?"));
        assert!(prompt.contains("A lock."));
        assert!(prompt.contains("Behavioral"));
        assert!(prompt.contains("suggested_improvement"));
    }

    #[test]
    fn parse_full_evaluation() {
        let eval = parse_evaluation(
            r#"{"score": 8, "strengths": ["clear"], "weaknesses": [], "feedback": "Solid.",
                "suggested_improvement": "Add a test.", "resources": ["docs"]}"#,
        )
        .unwrap();
        assert_eq!(eval.score, 8.0);
        assert_eq!(eval.strengths, vec!["clear"]);
        assert_eq!(eval.resources, vec!["docs"]);
    }

    #[test]
    fn parse_fenced_and_out_of_range() {
        let eval = parse_evaluation("```json\n{\"score\": 12.34, \"feedback\": \"wow\"}\n```").unwrap();
        assert_eq!(eval.score, 10.0);
        assert!(eval.strengths.is_empty());
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        assert!(matches!(
            parse_evaluation("not json"),
            Err(ScoringError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_evaluation("[1, 2]"),
            Err(ScoringError::NotAnObject("array"))
        ));
        assert!(matches!(
            parse_evaluation(r#"{"feedback": "x"}"#),
            Err(ScoringError::InvalidField { field: "score", .. })
        ));
        assert!(matches!(
            parse_evaluation(r#"{"score": "7", "feedback": "x"}"#),
            Err(ScoringError::InvalidField { field: "score", .. })
        ));
        assert!(matches!(
            parse_evaluation(r#"{"score": 7, "feedback": "x", "strengths": [1]}"#),
            Err(ScoringError::InvalidField { field: "strengths", .. })
        ));
        assert!(matches!(
            parse_evaluation(r#"{"score": 7}"#),
            Err(ScoringError::InvalidField { field: "feedback", .. })
        ));
    }

    #[test]
    fn parse_accepts_null_optional_fields() {
        let eval = parse_evaluation(
            r#"{"score": 6, "feedback": "ok", "strengths": null, "suggested_improvement": null}"#,
        )
        .unwrap();
        assert!(eval.strengths.is_empty());
        assert!(eval.suggested_improvement.is_empty());
    }

    #[test]
    fn parse_rejects_prose_around_fenced_verdict() {
        let text = "Sure! Here is my grade:\n```json\n{\"score\": 3, \"feedback\": \"x\"}\n```\nHope that helps.";
        assert!(matches!(
            parse_evaluation(text),
            Err(ScoringError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn remote_chatty_response_falls_back() {
        let chatty = "Here you go:\n```json\n{\"score\": 9, \"feedback\": \"great\"}\n```";
        let scorer = RemoteScorer::new(Arc::new(FixedProvider::new(chatty)), "gpt-4");
        let eval = scorer.evaluate("Q?", "A.", Mode::Technical).await;
        assert!(eval.is_fallback());
        assert_eq!(eval.score, 5.0);
    }

    #[tokio::test]
    async fn remote_success_uses_low_temperature_and_json_mode() {
        let provider = Arc::new(FixedProvider::new(r#"{"score": 7.5, "feedback": "Good."}"#));
        let scorer = RemoteScorer::new(provider.clone(), "gpt-4");

        let eval = scorer.evaluate("Q?", "A.", Mode::Technical).await;
        assert_eq!(eval.score, 7.5);
        assert_eq!(eval.feedback, "Good.");

        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.temperature, SCORING_TEMPERATURE);
        assert!(request.json_mode);
        assert_eq!(request.model, "gpt-4");
    }

    #[tokio::test]
    async fn remote_transport_failure_falls_back() {
        let scorer = Scorer::Remote(RemoteScorer::new(Arc::new(FailingProvider), "gpt-4"));
        let eval = scorer.evaluate("Q?", "A.", Mode::Technical).await;

        assert_eq!(eval.score, 5.0);
        assert!(eval.feedback.contains("connection refused"), "{}", eval.feedback);
        assert!(eval.strengths.is_empty());
        assert!(eval.weaknesses.is_empty());
        assert!(eval.resources.is_empty());
        assert!(eval.suggested_improvement.is_empty());
        assert!(eval.is_fallback());
    }

    #[tokio::test]
    async fn remote_malformed_response_falls_back() {
        let scorer = RemoteScorer::new(Arc::new(FixedProvider::new("I think 7/10")), "gpt-4");
        let eval = scorer.evaluate("Q?", "A.", Mode::Technical).await;
        assert!(eval.is_fallback());
        assert!(eval.feedback.contains("malformed response"));
    }

    #[tokio::test]
    async fn unconfigured_remote_falls_back_with_reason() {
        let scorer = RemoteScorer::unconfigured("missing API key for provider 'openai'");
        let eval = scorer.evaluate("Q?", "A.", Mode::Technical).await;
        assert!(eval.is_fallback());
        assert!(eval.feedback.contains("missing API key"));
    }

    #[tokio::test]
    async fn heuristic_dispatch_ignores_question_and_mode() {
        let a = Scorer::Heuristic.evaluate("Q1", "same text", Mode::Technical).await;
        let b = Scorer::Heuristic.evaluate("Q2", "same text", Mode::Behavioral).await;
        assert_eq!(a, b);
    }

    #[test]
    fn strategy_parse() {
        assert_eq!("remote".parse::<ScoringStrategy>().unwrap(), ScoringStrategy::Remote);
        assert_eq!("mock".parse::<ScoringStrategy>().unwrap(), ScoringStrategy::Heuristic);
        assert!("magic".parse::<ScoringStrategy>().is_err());
    }
}
