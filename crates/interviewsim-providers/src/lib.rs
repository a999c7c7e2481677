//! interviewsim-providers — LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for OpenAI-compatible APIs and Ollama,
//! and turns an [`InterviewConfig`] into the scorer a session uses.

pub mod config;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{
    build_scorer, create_provider, load_config, load_config_from, InterviewConfig, ProviderConfig,
};
pub use interviewsim_core::error::ProviderError;
