//! Per-model configuration, merged with built-in defaults.
//!
//! Each model can ship a `configs/<model>.toml` overriding generation
//! parameters and fence delimiters. Missing files and missing keys fall
//! back to the defaults below; a malformed file is treated the same as a
//! missing one.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Model this binary defaults to when none is given on the command line.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Per-model configuration values.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Override for the model identifier sent to the transport. Accepts
    /// the legacy `HF_MODEL` spelling from older config files.
    #[serde(alias = "HF_MODEL")]
    pub hf_model: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Opening fence delimiter
    pub start_sep: String,
    /// Closing fence delimiter
    pub end_sep: String,
    /// Drop the first line inside the fence (language-tag lines)
    pub skip_first_line: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            hf_model: None,
            temperature: 0.1,
            max_tokens: 1024,
            start_sep: "```".to_string(),
            end_sep: "```".to_string(),
            skip_first_line: false,
        }
    }
}

impl ModelConfig {
    /// Load the config for a model, returning defaults if no file exists.
    pub fn load(model: &str) -> Self {
        Self::load_from_path(&Self::config_path(model))
    }

    /// Load config from a specific path.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no model config file, using defaults");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "malformed model config, using defaults");
                Self::default()
            }),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable model config, using defaults");
                Self::default()
            }
        }
    }

    /// Path of the config file for a model (`configs/<model>.toml`).
    pub fn config_path(model: &str) -> PathBuf {
        PathBuf::from("configs").join(format!("{model}.toml"))
    }

    /// The model identifier to send to the transport: the config override
    /// when present, the requested model otherwise.
    pub fn resolved_model(&self, requested: &str) -> String {
        self.hf_model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(requested)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.start_sep, "```");
        assert_eq!(config.end_sep, "```");
        assert!(!config.skip_first_line);
        assert!(config.hf_model.is_none());
    }

    #[test]
    fn test_missing_file_returns_defaults() {
        let config = ModelConfig::load_from_path(Path::new("/nonexistent/model.toml"));
        assert_eq!(config, ModelConfig::default());
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let path = std::env::temp_dir().join("genie-config-partial.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "temperature = 0.7\nskip_first_line = true").unwrap();

        let config = ModelConfig::load_from_path(&path);
        assert_eq!(config.temperature, 0.7);
        assert!(config.skip_first_line);
        // Untouched keys keep their defaults.
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.start_sep, "```");
    }

    #[test]
    fn test_legacy_hf_model_key_accepted() {
        let path = std::env::temp_dir().join("genie-config-legacy.toml");
        std::fs::write(&path, "HF_MODEL = \"codellama/CodeLlama-7b-hf\"").unwrap();

        let config = ModelConfig::load_from_path(&path);
        assert_eq!(
            config.hf_model.as_deref(),
            Some("codellama/CodeLlama-7b-hf")
        );
    }

    #[test]
    fn test_malformed_file_returns_defaults() {
        let path = std::env::temp_dir().join("genie-config-broken.toml");
        std::fs::write(&path, "temperature = [not toml").unwrap();

        let config = ModelConfig::load_from_path(&path);
        assert_eq!(config, ModelConfig::default());
    }

    #[test]
    fn test_config_path_per_model() {
        assert_eq!(
            ModelConfig::config_path("gpt-3.5-turbo"),
            PathBuf::from("configs/gpt-3.5-turbo.toml")
        );
    }

    #[test]
    fn test_resolved_model_prefers_override() {
        let config = ModelConfig {
            hf_model: Some(" mistralai/Mistral-7B-Instruct-v0.2 ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_model("gpt-3.5-turbo"),
            "mistralai/Mistral-7B-Instruct-v0.2"
        );
    }

    #[test]
    fn test_resolved_model_falls_back_to_requested() {
        let config = ModelConfig::default();
        assert_eq!(config.resolved_model("gpt-4o-mini"), "gpt-4o-mini");
    }

    #[test]
    fn test_resolved_model_ignores_blank_override() {
        let config = ModelConfig {
            hf_model: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_model("gpt-4o-mini"), "gpt-4o-mini");
    }
}
