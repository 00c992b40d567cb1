//! LLM configuration loading and provider selection.

use std::path::{Path, PathBuf};

use kgraph_core::{Error, Result};
use serde::Deserialize;
use tracing::debug;

use crate::types::LLMProvider;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Stored LLM configuration (`llm-config.json`), with env-var fallbacks for keys.
#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    /// Sampling temperature; extraction wants deterministic output.
    #[serde(default)]
    pub temperature: f64,
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: "auto".into(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.into(),
            groq_model: DEFAULT_GROQ_MODEL.into(),
            temperature: 0.0,
            config_path: PathBuf::new(),
        }
    }
}

/// The provider, model and credential a request will use.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSelection {
    pub provider: LLMProvider,
    pub model: String,
    pub api_key: String,
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config = Self::load_file(config_path);
        config.apply_env();
        config
    }

    /// Load config from file only. A missing or unreadable file yields defaults.
    pub fn load_file(config_path: &Path) -> Self {
        let mut config: LLMConfig = match std::fs::read_to_string(config_path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                debug!("Ignoring malformed {}: {}", config_path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        config.config_path = config_path.to_path_buf();
        config
    }

    /// Fill unset API keys from `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GROQ_API_KEY`.
    pub fn apply_env(&mut self) {
        if self.openai_api_key.is_none() {
            self.openai_api_key = non_empty_env("OPENAI_API_KEY");
        }
        if self.anthropic_api_key.is_none() {
            self.anthropic_api_key = non_empty_env("ANTHROPIC_API_KEY");
        }
        if self.groq_api_key.is_none() {
            self.groq_api_key = non_empty_env("GROQ_API_KEY");
        }
    }

    /// Resolve which provider and model to use.
    pub fn resolve_provider(&self) -> Option<ProviderSelection> {
        let select = |provider, model: &String, key: &Option<String>| {
            key.as_ref().map(|k| ProviderSelection {
                provider,
                model: model.clone(),
                api_key: k.clone(),
            })
        };

        match self.preferred_provider.as_str() {
            "openai" => select(LLMProvider::OpenAI, &self.openai_model, &self.openai_api_key),
            "anthropic" => select(
                LLMProvider::Anthropic,
                &self.anthropic_model,
                &self.anthropic_api_key,
            ),
            "groq" => select(LLMProvider::Groq, &self.groq_model, &self.groq_api_key),
            // Auto mode: OpenAI > Anthropic > Groq
            "auto" => select(LLMProvider::OpenAI, &self.openai_model, &self.openai_api_key)
                .or_else(|| {
                    select(
                        LLMProvider::Anthropic,
                        &self.anthropic_model,
                        &self.anthropic_api_key,
                    )
                })
                .or_else(|| select(LLMProvider::Groq, &self.groq_model, &self.groq_api_key)),
            _ => None,
        }
    }

    /// Like `resolve_provider`, but a missing credential is a configuration error.
    pub fn require_provider(&self) -> Result<ProviderSelection> {
        self.resolve_provider().ok_or_else(|| {
            if self.preferred_provider == "auto" {
                Error::Config(
                    "no LLM API key configured: set OPENAI_API_KEY, ANTHROPIC_API_KEY or GROQ_API_KEY"
                        .into(),
                )
            } else {
                Error::Config(format!(
                    "preferred provider '{}' is unknown or has no API key",
                    self.preferred_provider
                ))
            }
        })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
