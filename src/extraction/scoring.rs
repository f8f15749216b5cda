//! Confidence scoring for matched candidates
//!
//! Combines section trust, match quality, a capped frequency bonus and, for
//! medium-trust sections, contextual anchoring into the accept/reject
//! decision for the raw skill set.

use crate::config::ExtractionConfig;
use crate::extraction::candidates::{Candidate, Token};
use crate::extraction::matcher::{MatchQuality, SkillMatcher};
use crate::extraction::segmenter::SectionType;
use std::collections::{HashMap, HashSet};

/// Context words that corroborate a skill mention in a Secondary section.
const ANCHOR_WORDS: &[&str] = &[
    "using", "used", "use", "with", "via", "through",
    "built", "building", "developed", "developing",
    "maintained", "managed", "deployed", "shipping",
    "stack", "technologies", "tools", "framework",
    "proficient", "experienced", "knowledge", "skills",
    "platform", "language", "library", "api",
];

/// Per-skill accumulation across all accepted occurrences.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSkill {
    pub name: String,
    /// Maximum base_score * section_multiplier seen for this skill.
    /// Repeats never inflate this, only the frequency bonus.
    pub max_score: f64,
    pub count: usize,
}

/// Document-wide tally folding per-segment results together.
#[derive(Debug, Default)]
pub struct SkillTally {
    skills: HashMap<String, ScoredSkill>,
}

impl SkillTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, score: f64) {
        let entry = self.skills.entry(name.to_string()).or_insert(ScoredSkill {
            name: name.to_string(),
            max_score: 0.0,
            count: 0,
        });
        entry.max_score = entry.max_score.max(score);
        entry.count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredSkill> {
        self.skills.values()
    }
}

pub struct ScoringEngine {
    config: ExtractionConfig,
    anchor_words: HashSet<&'static str>,
}

impl ScoringEngine {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            anchor_words: ANCHOR_WORDS.iter().copied().collect(),
        }
    }

    /// Score every matched candidate from one tokenized block.
    ///
    /// Secondary-section candidates without a nearby anchor word are
    /// discarded entirely; Primary is trusted outright and Tertiary/Unknown
    /// contribute at reduced weight without an anchor check.
    pub fn score_block(
        &self,
        tokens: &[Token],
        candidates: &[Candidate],
        matcher: &SkillMatcher,
        section: SectionType,
    ) -> Vec<(String, f64)> {
        let multiplier = self.section_multiplier(section);
        let mut results = Vec::new();

        for candidate in candidates {
            let Some((quality, canonical)) = matcher.match_candidate(&candidate.text) else {
                continue;
            };

            if section == SectionType::Secondary
                && !self.is_anchored(tokens, candidate.start, candidate.end)
            {
                continue;
            }

            let base_score = match quality {
                MatchQuality::Exact => self.config.exact_base_score,
                MatchQuality::Fuzzy => self.config.fuzzy_base_score,
            };

            results.push((canonical, base_score * multiplier));
        }

        results
    }

    fn section_multiplier(&self, section: SectionType) -> f64 {
        match section {
            SectionType::Primary => self.config.primary_multiplier,
            SectionType::Secondary => self.config.secondary_multiplier,
            SectionType::Tertiary | SectionType::Unknown => self.config.tertiary_multiplier,
        }
    }

    /// Look for an anchor word within the window around a candidate span,
    /// excluding the span itself. Matches literally or on a crude stem.
    fn is_anchored(&self, tokens: &[Token], start: usize, end: usize) -> bool {
        let window = self.config.anchor_window;
        let context_start = start.saturating_sub(window);
        let context_end = (end + window).min(tokens.len());

        for i in context_start..context_end {
            if i >= start && i < end {
                continue;
            }
            let lower = tokens[i].text.to_lowercase();
            if self.anchor_words.contains(lower.as_str())
                || self.anchor_words.contains(stem(&lower).as_str())
            {
                return true;
            }
        }
        false
    }

    /// Apply the dual inclusion rule to the document tally.
    ///
    /// A skill is accepted when its max section score plus the capped
    /// frequency bonus reaches the high-confidence bar, or when weaker
    /// evidence repeats often enough at sufficient strength.
    pub fn accepted_skills(&self, tally: &SkillTally) -> HashSet<String> {
        let cfg = &self.config;
        tally
            .iter()
            .filter(|s| {
                let freq_bonus = cfg.freq_bonus_cap.min(cfg.freq_bonus_step * s.count as f64);
                let high_confidence = s.max_score + freq_bonus >= cfg.high_confidence_score;
                let repeated_valid =
                    s.count >= cfg.repeat_min_count && s.max_score >= cfg.repeat_min_score;
                high_confidence || repeated_valid
            })
            .map(|s| s.name.clone())
            .collect()
    }
}

/// Strip common verbal suffixes so "deploying" anchors like "deployed".
fn stem(word: &str) -> String {
    for suffix in ["ing", "ed", "es", "s"] {
        if let Some(stripped) = word.strip_suffix(suffix) {
            if stripped.len() >= 3 {
                return stripped.to_string();
            }
        }
    }
    word.to_string()
}
