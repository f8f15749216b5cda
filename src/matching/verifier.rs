//! LLM arbitration for borderline requirement matches
//!
//! Talks to an OpenAI-compatible chat completions endpoint. The verifier is
//! a best-effort collaborator: every failure mode surfaces as a
//! `VerifierError` and the caller falls back to a pure threshold decision.

use crate::config::VerifierConfig;
use crate::error::{Result, SkillGapError};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// Arbitration outcome for one requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub covered: bool,
    /// Verifier-reported confidence, clamped to [0, 1].
    pub confidence: f64,
    pub reasoning: String,
    /// Evidence quote the verifier based its decision on, when it gave one.
    pub evidence: Option<String>,
}

/// Why arbitration produced no verdict.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    /// Endpoint unreachable, non-success status, timeout, or no API key.
    #[error("verifier unavailable: {0}")]
    Unavailable(String),
    /// The endpoint answered but not with a usable verdict.
    #[error("malformed verifier response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait SkillVerifier: Send + Sync {
    /// Decide whether the evidence demonstrates the required skill.
    async fn verify(
        &self,
        requirement: &str,
        evidence: &[String],
    ) -> std::result::Result<Verdict, VerifierError>;
}

/// Verifier that never answers; every borderline case takes the fallback.
pub struct NullVerifier;

#[async_trait]
impl SkillVerifier for NullVerifier {
    async fn verify(
        &self,
        _requirement: &str,
        _evidence: &[String],
    ) -> std::result::Result<Verdict, VerifierError> {
        Err(VerifierError::Unavailable("verifier disabled".to_string()))
    }
}

const SYSTEM_PROMPT: &str = "You are an expert technical recruiter assessing whether a \
candidate's experience demonstrates a required skill. Judge transferable and adjacent \
experience fairly, but do not credit skills with no supporting evidence. Respond with \
strict JSON only, no prose: {\"decision\": \"COVERED\" or \"MISSING\", \"confidence\": \
<number 0 to 1>, \"reasoning\": \"<one or two sentences>\", \"evidence\": \"<the single \
evidence line your decision rests on, or omit the key>\"}";

pub struct HttpVerifier {
    client: reqwest::Client,
    config: VerifierConfig,
    api_key: String,
}

impl HttpVerifier {
    /// Build a verifier from config, reading the API key from the configured
    /// environment variable. A missing key is a configuration error; callers
    /// that want to run without arbitration use `NullVerifier` instead.
    pub fn from_config(config: &VerifierConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            SkillGapError::Configuration(format!(
                "{} is not set; arbitration requires an API key",
                config.api_key_env
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    fn build_prompt(requirement: &str, evidence: &[String]) -> String {
        let mut prompt = format!("Required skill: {}\n\nCandidate evidence:\n", requirement);
        if evidence.is_empty() {
            prompt.push_str("(no relevant evidence found)\n");
        } else {
            for chunk in evidence {
                prompt.push_str("- ");
                prompt.push_str(chunk);
                prompt.push('\n');
            }
        }
        prompt.push_str("\nDoes this evidence demonstrate the required skill?");
        prompt
    }

    fn parse_verdict(content: &str) -> std::result::Result<Verdict, VerifierError> {
        // Models occasionally wrap the JSON in a code fence.
        let trimmed = content
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();

        let raw: RawVerdict = serde_json::from_str(trimmed)
            .map_err(|e| VerifierError::Malformed(format!("{}: {}", e, trimmed)))?;

        let covered = match raw.decision.to_uppercase().as_str() {
            "COVERED" => true,
            "MISSING" => false,
            other => {
                return Err(VerifierError::Malformed(format!(
                    "unknown decision '{}'",
                    other
                )))
            }
        };

        Ok(Verdict {
            covered,
            confidence: raw.confidence.clamp(0.0, 1.0),
            reasoning: raw.reasoning.unwrap_or_default(),
            evidence: raw.evidence.filter(|e| !e.trim().is_empty()),
        })
    }
}

#[async_trait]
impl SkillVerifier for HttpVerifier {
    async fn verify(
        &self,
        requirement: &str,
        evidence: &[String],
    ) -> std::result::Result<Verdict, VerifierError> {
        let body = json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::build_prompt(requirement, evidence) },
            ],
        });

        debug!("Arbitrating '{}' against {} evidence chunks", requirement, evidence.len());

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VerifierError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VerifierError::Unavailable(format!(
                "HTTP {} from verifier endpoint",
                response.status()
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| VerifierError::Malformed(e.to_string()))?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| VerifierError::Malformed("no choices in response".to_string()))?;

        Self::parse_verdict(content)
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct RawVerdict {
    decision: String,
    confidence: f64,
    reasoning: Option<String>,
    evidence: Option<String>,
}
