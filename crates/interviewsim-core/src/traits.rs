//! Core trait definitions for LLM providers.
//!
//! The async `LlmProvider` trait is implemented by the `interviewsim-providers`
//! crate and consumed by the remote scoring strategy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for LLM backends that turn a prompt into text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Generate a completion for a prompt.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request to generate text from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gpt-4").
    pub model: String,
    /// The main prompt.
    pub prompt: String,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Ask the backend to constrain output to a JSON object, where supported.
    #[serde(default)]
    pub json_mode: bool,
}

/// Response from an LLM generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response content.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by a provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

/// Default system prompt for answer evaluation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an experienced technical interviewer. You grade candidate answers fairly and respond ONLY with a single JSON object. Do not include explanations or markdown outside the JSON.";

// ---------------------------------------------------------------------------
// Markdown fence stripping
// ---------------------------------------------------------------------------

/// Strip one Markdown code fence that wraps the entire response.
///
/// The fence must open the trimmed text (```` ``` ```` or ```` ```json ````) and
/// close it. Anything else, including prose around a fenced block, is returned
/// trimmed and unchanged so that strict JSON parsing rejects it.
pub fn strip_json_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some((lang, body)) = rest.split_once('\n') else {
        return trimmed;
    };
    let lang = lang.trim();
    if !(lang.is_empty() || lang.eq_ignore_ascii_case("json")) {
        return trimmed;
    }
    match body.trim_end().strip_suffix("```") {
        Some(inner) if !inner.contains("```") => inner.trim(),
        _ => trimmed,
    }
}
