//! Configuration loading, provider factory, and scorer construction.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use interviewsim_core::scoring::{RemoteScorer, Scorer, ScoringStrategy};
use interviewsim_core::traits::LlmProvider;

use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

/// Name of the config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "interviewsim.toml";

/// Configuration for a single LLM provider.
///
/// The `Debug` impl masks API keys so configs can be logged.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

/// Top-level interviewsim configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used by the remote scoring strategy.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model requested from the remote provider.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// JSON-lines file that evaluated answers are appended to.
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,
    /// Directory for session exports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Optional TOML question bank replacing the built-in one.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
    /// Questions per practice session.
    #[serde(default = "default_count")]
    pub default_count: usize,
    #[serde(default)]
    pub strategy: ScoringStrategy,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gpt-4".to_string()
}
fn default_history_path() -> PathBuf {
    PathBuf::from("interviewsim-history.jsonl")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_count() -> usize {
    3
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            history_path: default_history_path(),
            output_dir: default_output_dir(),
            question_bank: None,
            default_count: default_count(),
            strategy: ScoringStrategy::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_deref().map(resolve_env_vars),
            org_id: org_id.as_deref().map(resolve_env_vars),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Apply `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL` on top of a
/// loaded config. `lookup` abstracts the environment for tests.
fn apply_env_overrides(config: &mut InterviewConfig, lookup: impl Fn(&str) -> Option<String>) {
    let key = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty());
    let base = lookup("OPENAI_BASE_URL").filter(|u| !u.is_empty());

    if key.is_some() || base.is_some() {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI {
            api_key, base_url, ..
        } = entry
        {
            if let Some(key) = key {
                *api_key = key;
            }
            if base.is_some() {
                *base_url = base;
            }
        }
    }

    if let Some(model) = lookup("OPENAI_MODEL").filter(|m| !m.is_empty()) {
        config.default_model = model;
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `interviewsim.toml` in the current directory
/// 2. `~/.config/interviewsim/config.toml`
///
/// Environment variable overrides: `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL`.
pub fn load_config() -> Result<InterviewConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<InterviewConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(LOCAL_CONFIG_FILE);
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<InterviewConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => InterviewConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("interviewsim"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => {
            if api_key.trim().is_empty() {
                anyhow::bail!("provider '{name}' has no API key (set OPENAI_API_KEY)");
            }
            Ok(Box::new(OpenAiProvider::new(
                api_key,
                base_url.clone(),
                org_id.clone(),
            )?))
        }
        ProviderConfig::Ollama { base_url } => Ok(Box::new(OllamaProvider::new(base_url)?)),
    }
}

/// Build the scorer for `strategy`.
///
/// A remote strategy without a usable provider still yields a scorer; it
/// answers every request with the fallback evaluation.
pub fn build_scorer(config: &InterviewConfig, strategy: ScoringStrategy) -> Scorer {
    match strategy {
        ScoringStrategy::Heuristic => Scorer::Heuristic,
        ScoringStrategy::Remote => {
            let name = config.default_provider.as_str();
            let remote = match config.providers.get(name) {
                None => RemoteScorer::unconfigured(format!(
                    "provider '{name}' is not configured (set OPENAI_API_KEY)"
                )),
                Some(provider_config) => match create_provider(name, provider_config) {
                    Ok(provider) => {
                        RemoteScorer::new(Arc::from(provider), config.default_model.clone())
                    }
                    Err(e) => RemoteScorer::unconfigured(format!("{e:#}")),
                },
            };
            Scorer::Remote(remote)
        }
    }
}

/// Starter config written by `interviewsim init`.
pub const CONFIG_TEMPLATE: &str = r#"# interviewsim configuration

# Scoring strategy: "heuristic" (local) or "remote" (LLM)
strategy = "heuristic"
default_provider = "openai"
default_model = "gpt-4"
default_count = 3
history_path = "interviewsim-history.jsonl"
output_dir = "."
# question_bank = "questions.toml"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

# [providers.ollama]
# type = "ollama"
# base_url = "http://localhost:11434"
"#;
