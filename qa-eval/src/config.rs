//! Configuration management for the evaluation tool
//!
//! Loads generation and output settings from a TOML file; command-line flags
//! override whatever the file provides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub openai: OpenAIConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Parameters sent with every answer request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Max output tokens per answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

/// OpenAI-compatible endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-request HTTP timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_answers_file")]
    pub answers_file: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
}

pub const DEFAULT_SYSTEM_PROMPT: &str = "Answer in plain English, ≤35 words. No preamble, no lists, no formatting, no links. Be direct and factual.";

// Default value functions
fn default_provider() -> String { "openai".to_string() }
fn default_model() -> String { "gpt-4.1-mini".to_string() }
fn default_max_tokens() -> u32 { 80 }
fn default_system_prompt() -> String { DEFAULT_SYSTEM_PROMPT.to_string() }
fn default_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_api_key_env() -> String { "OPENAI_API_KEY".to_string() }
fn default_timeout_ms() -> u64 { 120_000 }
fn default_output_dir() -> String { "out".to_string() }
fn default_answers_file() -> String { "openai_answers.json".to_string() }
fn default_report_file() -> String { "report.metrics.json".to_string() }

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            system_prompt: default_system_prompt(),
        }
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            answers_file: default_answers_file(),
            report_file: default_report_file(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load an explicit file, or the first default location that exists
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            let config = Self::from_file(path)?;
            tracing::info!("Loaded configuration from {}", path.display());
            return Ok(config);
        }
        Ok(Self::load_or_default())
    }

    /// Load from default config location or return defaults
    pub fn load_or_default() -> Self {
        let config_paths = ["qa-eval.toml", "config/qa-eval.toml"];

        for path in &config_paths {
            if !Path::new(path).is_file() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path);
                    return config;
                }
                Err(e) => tracing::warn!("Ignoring {}: {}", path, e),
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generation.model, "gpt-4.1-mini");
        assert_eq!(config.generation.max_tokens, 80);
        assert_eq!(config.generation.temperature, 0.0);
        assert_eq!(config.output.output_dir, "out");
        assert_eq!(config.openai.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
[generation]
model = "gpt-4o-mini"
temperature = 0.2

[output]
output_dir = "results"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert!((config.generation.temperature - 0.2).abs() < 1e-6);
        assert_eq!(config.generation.max_tokens, 80);
        assert_eq!(config.output.output_dir, "results");
        assert_eq!(config.output.report_file, "report.metrics.json");
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml("[generation\nmodel = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qa-eval.toml");

        Config::default().save_toml(&path).unwrap();
        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.generation.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/qa-eval.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
