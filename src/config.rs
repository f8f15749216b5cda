//! Configuration management for the skill gap analyzer
//!
//! Every tuned constant in the pipeline (section multipliers, inclusion
//! thresholds, semantic cutoffs) lives here as a named, overridable value.

use crate::error::{Result, SkillGapError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub taxonomy: TaxonomyConfig,
    pub extraction: ExtractionConfig,
    pub matching: MatchingConfig,
    pub verifier: VerifierConfig,
    pub models: ModelConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// JSON dataset of job records supplying the canonical skill catalog.
    pub data_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum normalized character ratio (0-100) for a fuzzy taxonomy hit.
    pub fuzzy_threshold: f64,
    /// Candidates shorter than this never go through fuzzy matching.
    pub min_fuzzy_length: usize,
    /// Widest n-gram candidate, in tokens.
    pub max_ngram_size: usize,
    /// Base score for an exact alias/taxonomy hit.
    pub exact_base_score: f64,
    /// Base score for a fuzzy hit.
    pub fuzzy_base_score: f64,
    /// Section trust multipliers.
    pub primary_multiplier: f64,
    pub secondary_multiplier: f64,
    pub tertiary_multiplier: f64,
    /// Token window checked for anchor words around Secondary candidates.
    pub anchor_window: usize,
    /// Inclusion rule: accept when max score + frequency bonus reaches this.
    pub high_confidence_score: f64,
    /// Inclusion rule: or when seen at least this often ...
    pub repeat_min_count: usize,
    /// ... with at least this max section score.
    pub repeat_min_score: f64,
    /// Frequency bonus is min(cap, step * count).
    pub freq_bonus_cap: f64,
    pub freq_bonus_step: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Similarity at or above this is a clear match (fast path).
    pub clear_match_threshold: f32,
    /// Similarity at or below this is a clear miss (fast path).
    pub clear_miss_threshold: f32,
    /// Decision boundary when the arbitration collaborator is unavailable.
    pub fallback_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// OpenAI-compatible chat completions endpoint.
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    /// Environment variable holding the API key; empty key disables the verifier.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub embedding_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let app_dir = home.join(".skill-gap-analyzer");

        Self {
            taxonomy: TaxonomyConfig {
                data_path: app_dir.join("data").join("job_dataset.json"),
            },
            extraction: ExtractionConfig {
                fuzzy_threshold: 90.0,
                min_fuzzy_length: 4,
                max_ngram_size: 4,
                exact_base_score: 1.0,
                fuzzy_base_score: 0.8,
                primary_multiplier: 2.0,
                secondary_multiplier: 1.0,
                tertiary_multiplier: 0.5,
                anchor_window: 5,
                high_confidence_score: 1.6,
                repeat_min_count: 2,
                repeat_min_score: 1.0,
                freq_bonus_cap: 0.4,
                freq_bonus_step: 0.2,
            },
            matching: MatchingConfig {
                clear_match_threshold: 0.7,
                clear_miss_threshold: 0.3,
                fallback_threshold: 0.5,
            },
            verifier: VerifierConfig {
                api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
                model: "llama-3.3-70b-versatile".to_string(),
                temperature: 0.3,
                api_key_env: "GROQ_API_KEY".to_string(),
                timeout_secs: 30,
            },
            models: ModelConfig {
                models_dir: app_dir.join("models"),
                embedding_model: "minishlab/M2V_base_output".to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                SkillGapError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            SkillGapError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-gap-analyzer")
            .join("config.toml")
    }
}
