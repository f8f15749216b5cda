//! End-to-end skill extraction pipeline
//!
//! Segmentation -> candidate generation -> matching -> scoring ->
//! post-processing. Stateless across documents: the taxonomy is the only
//! long-lived resource, shared read-only.

use crate::config::ExtractionConfig;
use crate::extraction::candidates::CandidateGenerator;
use crate::extraction::matcher::SkillMatcher;
use crate::extraction::postprocess::PostProcessor;
use crate::extraction::scoring::{ScoringEngine, SkillTally};
use crate::extraction::segmenter::TextSegmenter;
use crate::extraction::taxonomy::SkillTaxonomy;
use log::{debug, info};

pub struct SkillExtractor {
    taxonomy: SkillTaxonomy,
    segmenter: TextSegmenter,
    generator: CandidateGenerator,
    scoring: ScoringEngine,
    config: ExtractionConfig,
}

impl SkillExtractor {
    pub fn new(taxonomy: SkillTaxonomy, config: ExtractionConfig) -> Self {
        info!(
            "Skill extractor initialized with {} taxonomy skills",
            taxonomy.skill_count()
        );
        Self {
            segmenter: TextSegmenter::new(),
            generator: CandidateGenerator::new(config.max_ngram_size),
            scoring: ScoringEngine::new(config.clone()),
            taxonomy,
            config,
        }
    }

    /// Extract a sorted, deduplicated canonical skill list from raw text.
    ///
    /// Pure function of the input text and the loaded taxonomy; empty or
    /// whitespace-only input yields an empty list, never an error.
    pub fn extract(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let matcher = SkillMatcher::new(
            &self.taxonomy,
            self.config.fuzzy_threshold,
            self.config.min_fuzzy_length,
        );

        let segments = self.segmenter.segment(text);
        let mut tally = SkillTally::new();

        for (section, blocks) in &segments {
            for block in blocks {
                let cleaned = self.generator.preprocess(block);
                let tokens = self.generator.tokenize(&cleaned);
                let candidates = self.generator.generate(&tokens);
                debug!(
                    "{} section block: {} tokens, {} candidates",
                    section,
                    tokens.len(),
                    candidates.len()
                );

                for (skill, score) in
                    self.scoring.score_block(&tokens, &candidates, &matcher, *section)
                {
                    tally.add(&skill, score);
                }
            }
        }

        let accepted = self.scoring.accepted_skills(&tally);
        let final_skills = PostProcessor::new(&self.taxonomy).process(&accepted);

        info!(
            "Extracted {} verified skills from {} chars",
            final_skills.len(),
            text.len()
        );
        final_skills
    }

    /// Fuzzy taxonomy suggestions for a partial skill name.
    pub fn skill_suggestions(&self, partial: &str, limit: usize) -> Vec<String> {
        self.taxonomy.search_similar(partial, limit)
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn extractor() -> SkillExtractor {
        let taxonomy = SkillTaxonomy::from_skills([
            "Python", "FastAPI", "Docker", "AWS", "Cloud", "Git", "GitHub",
        ]);
        SkillExtractor::new(taxonomy, Config::default().extraction)
    }

    #[test]
    fn test_empty_input() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract("   \n\t ").is_empty());
    }

    #[test]
    fn test_determinism() {
        let ex = extractor();
        let text = "Skills:\nPython, Docker, AWS\n\nExperience\nBuilt APIs using FastAPI";
        let first = ex.extract(text);
        let second = ex.extract(text);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_case_invariance() {
        let ex = extractor();
        let upper = ex.extract("Skills:\nPYTHON");
        let lower = ex.extract("Skills:\npython");
        assert_eq!(upper, vec!["Python"]);
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_primary_single_hit_accepted() {
        let ex = extractor();
        let skills = ex.extract("Skills:\nDocker");
        assert_eq!(skills, vec!["Docker"]);
    }

    #[test]
    fn test_unknown_section_alone_insufficient() {
        let ex = extractor();
        // Unknown tier scores 0.5 + 0.2 = 0.7, below every acceptance bar.
        let skills = ex.extract("Docker");
        assert!(skills.is_empty());
    }
}
