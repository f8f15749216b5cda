//! Three-tier gap matching cascade
//!
//! Each required skill is resolved by the cheapest tier that can decide it:
//! exact term match, then semantic similarity against the evidence index,
//! then LLM arbitration for the borderline band. When arbitration fails the
//! decision degrades to a pure threshold call, never an error.

use crate::config::MatchingConfig;
use crate::error::Result;
use crate::matching::embeddings::TextEmbedder;
use crate::matching::index::EvidenceIndex;
use crate::matching::verifier::{SkillVerifier, VerifierError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Evidence chunks passed to the arbitration prompt.
const ARBITRATION_EVIDENCE_K: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Covered,
    Missing,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Covered => write!(f, "covered"),
            MatchStatus::Missing => write!(f, "missing"),
        }
    }
}

/// Which tier of the cascade produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Semantic,
    Arbitration,
    ThresholdFallback,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTier::Exact => write!(f, "exact"),
            MatchTier::Semantic => write!(f, "semantic"),
            MatchTier::Arbitration => write!(f, "arbitration"),
            MatchTier::ThresholdFallback => write!(f, "threshold-fallback"),
        }
    }
}

/// Decision for one required skill, in the requirement list's order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub requirement: String,
    pub status: MatchStatus,
    pub tier: MatchTier,
    pub confidence: f64,
    /// Best cosine similarity seen, absent for exact-tier decisions.
    pub score: Option<f32>,
    /// Best supporting evidence chunk, when one exists.
    pub evidence: Option<String>,
    /// Arbitration reasoning, when that tier decided.
    pub reasoning: Option<String>,
}

/// Full gap analysis result with coverage statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapReport {
    pub records: Vec<MatchRecord>,
    pub total_requirements: usize,
    pub covered_count: usize,
    pub missing_count: usize,
    /// Percentage of requirements covered, one decimal place.
    pub match_percentage: f64,
    /// Percentage decided without arbitration or fallback, one decimal place.
    pub fast_path_percentage: f64,
}

impl GapReport {
    fn from_records(records: Vec<MatchRecord>) -> Self {
        let total = records.len();
        let covered = records
            .iter()
            .filter(|r| r.status == MatchStatus::Covered)
            .count();
        let fast_path = records
            .iter()
            .filter(|r| matches!(r.tier, MatchTier::Exact | MatchTier::Semantic))
            .count();

        Self {
            total_requirements: total,
            covered_count: covered,
            missing_count: total - covered,
            match_percentage: percentage(covered, total),
            fast_path_percentage: percentage(fast_path, total),
            records,
        }
    }

    pub fn missing_skills(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.status == MatchStatus::Missing)
            .map(|r| r.requirement.as_str())
            .collect()
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

/// One candidate's evidence: exact skill names plus free-text chunks for
/// semantic search. Built per analysis; nothing here outlives the report.
pub struct EvidenceSet {
    /// Normalized term -> the possessed skill as it was stated.
    exact_terms: HashMap<String, String>,
    chunks: Vec<String>,
}

impl EvidenceSet {
    /// Evidence consisting only of an extracted skill list. The skill names
    /// double as semantic chunks.
    pub fn from_skills(skills: &[String]) -> Self {
        Self {
            exact_terms: exact_term_map(skills),
            chunks: skills.to_vec(),
        }
    }

    /// Evidence with dedicated text chunks (experience bullets, summaries)
    /// for the semantic tier alongside the exact skill names.
    pub fn from_chunks(skills: &[String], chunks: Vec<String>) -> Self {
        let mut merged: Vec<String> = skills.to_vec();
        merged.extend(chunks);
        Self {
            exact_terms: exact_term_map(skills),
            chunks: merged,
        }
    }

    /// The possessed skill matching a requirement exactly, if any.
    pub fn exact_match(&self, requirement: &str) -> Option<&str> {
        self.exact_terms
            .get(&normalize_term(requirement))
            .map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.exact_terms.is_empty() && self.chunks.is_empty()
    }
}

fn exact_term_map(skills: &[String]) -> HashMap<String, String> {
    skills
        .iter()
        .map(|s| (normalize_term(s), s.clone()))
        .collect()
}

fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

pub struct GapMatcher {
    embedder: Box<dyn TextEmbedder>,
    verifier: Box<dyn SkillVerifier>,
    config: MatchingConfig,
}

impl GapMatcher {
    pub fn new(
        embedder: Box<dyn TextEmbedder>,
        verifier: Box<dyn SkillVerifier>,
        config: MatchingConfig,
    ) -> Self {
        Self {
            embedder,
            verifier,
            config,
        }
    }

    /// Run the cascade for every required skill, preserving input order.
    pub async fn match_gap(
        &self,
        required: &[String],
        evidence: &EvidenceSet,
    ) -> Result<GapReport> {
        let index = EvidenceIndex::build(self.embedder.as_ref(), &evidence.chunks)?;
        info!(
            "Gap analysis session {}: {} requirements against {} evidence chunks",
            index.session_id(),
            required.len(),
            index.len()
        );

        let mut records = Vec::with_capacity(required.len());
        for requirement in required {
            records.push(self.match_one(requirement, evidence, &index).await?);
        }

        let report = GapReport::from_records(records);
        info!(
            "Gap analysis complete: {}/{} covered ({}%), {}% on the fast path",
            report.covered_count,
            report.total_requirements,
            report.match_percentage,
            report.fast_path_percentage
        );
        Ok(report)
    }

    async fn match_one(
        &self,
        requirement: &str,
        evidence: &EvidenceSet,
        index: &EvidenceIndex,
    ) -> Result<MatchRecord> {
        // Tier 1: exact term match against the candidate's skill names.
        // Evidence is the possessed skill as stated, not the requirement.
        if let Some(possessed) = evidence.exact_match(requirement) {
            return Ok(MatchRecord {
                requirement: requirement.to_string(),
                status: MatchStatus::Covered,
                tier: MatchTier::Exact,
                confidence: 1.0,
                score: None,
                evidence: Some(possessed.to_string()),
                reasoning: None,
            });
        }

        // Tier 2: semantic similarity against the evidence index.
        let query = self.embedder.encode_single(requirement)?;
        let hits = index.search(&query, ARBITRATION_EVIDENCE_K)?;

        let Some(best) = hits.first().cloned() else {
            // No evidence at all is an unambiguous miss.
            return Ok(MatchRecord {
                requirement: requirement.to_string(),
                status: MatchStatus::Missing,
                tier: MatchTier::Semantic,
                confidence: 1.0,
                score: None,
                evidence: None,
                reasoning: None,
            });
        };

        let score = best.score;
        let cfg = &self.config;

        if score >= cfg.clear_match_threshold {
            let margin = (score - cfg.clear_match_threshold) / (1.0 - cfg.clear_match_threshold);
            return Ok(MatchRecord {
                requirement: requirement.to_string(),
                status: MatchStatus::Covered,
                tier: MatchTier::Semantic,
                confidence: f64::from(margin.clamp(0.0, 1.0)),
                score: Some(score),
                evidence: Some(best.text),
                reasoning: None,
            });
        }

        if score <= cfg.clear_miss_threshold {
            let margin = (cfg.clear_miss_threshold - score) / cfg.clear_miss_threshold;
            return Ok(MatchRecord {
                requirement: requirement.to_string(),
                status: MatchStatus::Missing,
                tier: MatchTier::Semantic,
                confidence: f64::from(margin.clamp(0.0, 1.0)),
                score: Some(score),
                evidence: None,
                reasoning: None,
            });
        }

        // Tier 3: borderline band, hand the call to the arbitration verifier.
        let evidence_texts: Vec<String> = hits.into_iter().map(|h| h.text).collect();
        let arbitration = self.verifier.verify(requirement, &evidence_texts).await;
        match arbitration {
            Ok(verdict) => Ok(MatchRecord {
                requirement: requirement.to_string(),
                status: if verdict.covered {
                    MatchStatus::Covered
                } else {
                    MatchStatus::Missing
                },
                tier: MatchTier::Arbitration,
                confidence: verdict.confidence,
                score: Some(score),
                // The verifier's own quote wins over the top search hit.
                evidence: verdict.evidence.or_else(|| evidence_texts.into_iter().next()),
                reasoning: Some(verdict.reasoning),
            }),
            Err(e) => {
                if let VerifierError::Malformed(ref detail) = e {
                    warn!("Verifier answered unusably for '{}': {}", requirement, detail);
                } else {
                    warn!("Verifier unavailable for '{}': {}", requirement, e);
                }
                Ok(self.threshold_fallback(requirement, score, best_evidence(evidence_texts)))
            }
        }
    }

    /// Pure threshold decision used when arbitration cannot answer.
    /// Confidence scales with distance from the boundary, zero at the
    /// threshold itself.
    fn threshold_fallback(
        &self,
        requirement: &str,
        score: f32,
        evidence: Option<String>,
    ) -> MatchRecord {
        let threshold = self.config.fallback_threshold;
        let covered = score >= threshold;
        let confidence = f64::from((2.0 * (score - threshold).abs()).min(1.0));

        MatchRecord {
            requirement: requirement.to_string(),
            status: if covered {
                MatchStatus::Covered
            } else {
                MatchStatus::Missing
            },
            tier: MatchTier::ThresholdFallback,
            confidence,
            score: Some(score),
            evidence: if covered { evidence } else { None },
            reasoning: None,
        }
    }
}

fn best_evidence(texts: Vec<String>) -> Option<String> {
    texts.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::Result;
    use crate::matching::verifier::Verdict;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Embeds every known text as a fixed unit vector; chunks map to
    /// [1, 0], so a requirement at [s, sqrt(1-s^2)] scores exactly s.
    struct StubEmbedder {
        vectors: HashMap<String, Vec<f32>>,
    }

    impl StubEmbedder {
        fn new(entries: &[(&str, f32)]) -> Self {
            let mut vectors = HashMap::new();
            for (text, s) in entries {
                vectors.insert(text.to_string(), vec![*s, (1.0 - s * s).sqrt()]);
            }
            Self { vectors }
        }
    }

    impl TextEmbedder for StubEmbedder {
        fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| self.vectors.get(t).cloned().unwrap_or_else(|| vec![1.0, 0.0]))
                .collect())
        }
    }

    struct StubVerifier {
        verdict: Option<Verdict>,
    }

    #[async_trait]
    impl SkillVerifier for StubVerifier {
        async fn verify(
            &self,
            _requirement: &str,
            _evidence: &[String],
        ) -> std::result::Result<Verdict, VerifierError> {
            match &self.verdict {
                Some(v) => Ok(v.clone()),
                None => Err(VerifierError::Unavailable("stubbed outage".to_string())),
            }
        }
    }

    fn matcher(embedder: StubEmbedder, verdict: Option<Verdict>) -> GapMatcher {
        GapMatcher::new(
            Box::new(embedder),
            Box::new(StubVerifier { verdict }),
            Config::default().matching,
        )
    }

    #[tokio::test]
    async fn test_exact_tier_short_circuits() {
        let m = matcher(StubEmbedder::new(&[]), None);
        let evidence = EvidenceSet::from_skills(&["Kafka".to_string()]);
        let report = m.match_gap(&["kafka".to_string()], &evidence).await.unwrap();

        let record = &report.records[0];
        assert_eq!(record.status, MatchStatus::Covered);
        assert_eq!(record.tier, MatchTier::Exact);
        assert_eq!(record.confidence, 1.0);
        // Evidence carries the possessed skill's own casing.
        assert_eq!(record.evidence.as_deref(), Some("Kafka"));
        assert_eq!(report.match_percentage, 100.0);
    }

    #[tokio::test]
    async fn test_semantic_clear_match() {
        // Requirement scores 0.75 against the best chunk: covered on the
        // fast path with confidence (0.75 - 0.7) / 0.3.
        let m = matcher(StubEmbedder::new(&[("Kafka", 0.75)]), None);
        let evidence = EvidenceSet::from_skills(&["RabbitMQ".to_string()]);
        let report = m.match_gap(&["Kafka".to_string()], &evidence).await.unwrap();

        let record = &report.records[0];
        assert_eq!(record.status, MatchStatus::Covered);
        assert_eq!(record.tier, MatchTier::Semantic);
        assert!((record.confidence - 0.1667).abs() < 0.01);
        assert_eq!(record.evidence.as_deref(), Some("RabbitMQ"));
    }

    #[tokio::test]
    async fn test_semantic_clear_miss() {
        let m = matcher(StubEmbedder::new(&[("Kubernetes", 0.2)]), None);
        let evidence = EvidenceSet::from_skills(&["Photoshop".to_string()]);
        let report = m
            .match_gap(&["Kubernetes".to_string()], &evidence)
            .await
            .unwrap();

        let record = &report.records[0];
        assert_eq!(record.status, MatchStatus::Missing);
        assert_eq!(record.tier, MatchTier::Semantic);
        assert!(record.evidence.is_none());
    }

    #[tokio::test]
    async fn test_borderline_goes_to_arbitration() {
        let verdict = Verdict {
            covered: true,
            confidence: 0.8,
            reasoning: "Adjacent streaming experience.".to_string(),
            evidence: None,
        };
        let m = matcher(StubEmbedder::new(&[("Kafka", 0.5)]), Some(verdict));
        let evidence = EvidenceSet::from_skills(&["RabbitMQ".to_string()]);
        let report = m.match_gap(&["Kafka".to_string()], &evidence).await.unwrap();

        let record = &report.records[0];
        assert_eq!(record.tier, MatchTier::Arbitration);
        assert_eq!(record.status, MatchStatus::Covered);
        assert_eq!(record.confidence, 0.8);
        assert_eq!(
            record.reasoning.as_deref(),
            Some("Adjacent streaming experience.")
        );
        // No quote from the verifier: fall back to the top search hit.
        assert_eq!(record.evidence.as_deref(), Some("RabbitMQ"));
    }

    #[tokio::test]
    async fn test_arbitration_quote_preferred_over_search_hit() {
        let verdict = Verdict {
            covered: true,
            confidence: 0.9,
            reasoning: "Queue experience transfers.".to_string(),
            evidence: Some("Operated RabbitMQ clusters in production".to_string()),
        };
        let m = matcher(StubEmbedder::new(&[("Kafka", 0.5)]), Some(verdict));
        let evidence = EvidenceSet::from_skills(&["RabbitMQ".to_string()]);
        let report = m.match_gap(&["Kafka".to_string()], &evidence).await.unwrap();

        assert_eq!(
            report.records[0].evidence.as_deref(),
            Some("Operated RabbitMQ clusters in production")
        );
    }

    #[tokio::test]
    async fn test_verifier_outage_falls_back_to_threshold() {
        // Score exactly at the fallback boundary: covered, zero confidence.
        let m = matcher(StubEmbedder::new(&[("Kafka", 0.5)]), None);
        let evidence = EvidenceSet::from_skills(&["RabbitMQ".to_string()]);
        let report = m.match_gap(&["Kafka".to_string()], &evidence).await.unwrap();

        let record = &report.records[0];
        assert_eq!(record.tier, MatchTier::ThresholdFallback);
        assert_eq!(record.status, MatchStatus::Covered);
        assert_eq!(record.confidence, 0.0);
        assert_eq!(report.fast_path_percentage, 0.0);
    }

    #[tokio::test]
    async fn test_fallback_below_threshold_is_missing() {
        let m = matcher(StubEmbedder::new(&[("Kafka", 0.35)]), None);
        let evidence = EvidenceSet::from_skills(&["RabbitMQ".to_string()]);
        let report = m.match_gap(&["Kafka".to_string()], &evidence).await.unwrap();

        let record = &report.records[0];
        assert_eq!(record.tier, MatchTier::ThresholdFallback);
        assert_eq!(record.status, MatchStatus::Missing);
        assert!((record.confidence - 0.3).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_empty_evidence_is_clean_miss() {
        let m = matcher(StubEmbedder::new(&[]), None);
        let evidence = EvidenceSet::from_skills(&[]);
        let report = m.match_gap(&["Kafka".to_string()], &evidence).await.unwrap();

        let record = &report.records[0];
        assert_eq!(record.status, MatchStatus::Missing);
        assert_eq!(record.confidence, 1.0);
        assert!(record.score.is_none());
    }

    #[tokio::test]
    async fn test_report_statistics_and_order() {
        let m = matcher(StubEmbedder::new(&[("Terraform", 0.1)]), None);
        let evidence = EvidenceSet::from_skills(&["Python".to_string(), "Docker".to_string()]);
        let required = vec![
            "Python".to_string(),
            "Terraform".to_string(),
            "Docker".to_string(),
        ];
        let report = m.match_gap(&required, &evidence).await.unwrap();

        assert_eq!(report.total_requirements, 3);
        assert_eq!(report.covered_count, 2);
        assert_eq!(report.match_percentage, 66.7);
        assert_eq!(report.fast_path_percentage, 100.0);
        assert_eq!(report.missing_skills(), vec!["Terraform"]);
        // Records stay in requirement order.
        let order: Vec<&str> = report.records.iter().map(|r| r.requirement.as_str()).collect();
        assert_eq!(order, vec!["Python", "Terraform", "Docker"]);
    }

    #[tokio::test]
    async fn test_empty_requirements_zero_percentages() {
        let m = matcher(StubEmbedder::new(&[]), None);
        let evidence = EvidenceSet::from_skills(&["Python".to_string()]);
        let report = m.match_gap(&[], &evidence).await.unwrap();
        assert_eq!(report.match_percentage, 0.0);
        assert_eq!(report.fast_path_percentage, 0.0);
    }
}
