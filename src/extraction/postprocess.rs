//! Post-processing of the raw accepted skill set
//!
//! Splits compound entries, suppresses generic terms subsumed by specific
//! ones, and re-normalizes everything to a sorted canonical list. Each step
//! is independent of input iteration order; the output is always sorted.

use crate::extraction::matcher::canonical_overrides;
use crate::extraction::taxonomy::SkillTaxonomy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Generic term -> specific siblings whose presence removes the generic.
fn abstraction_rules() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("cloud", vec!["aws", "azure", "gcp", "google cloud"]),
        ("css", vec!["tailwind css", "bootstrap", "sass", "scss"]),
        ("apis", vec!["rest apis", "grpc", "graphql", "websockets"]),
        ("api", vec!["rest apis", "grpc", "graphql", "websockets"]),
        ("database", vec!["postgresql", "mongodb", "mysql", "redis", "sql server"]),
        ("databases", vec!["postgresql", "mongodb", "mysql", "redis", "sql server"]),
    ]
}

pub struct PostProcessor<'a> {
    taxonomy: &'a SkillTaxonomy,
    overrides: HashMap<&'static str, &'static str>,
    composite_split: Regex,
}

impl<'a> PostProcessor<'a> {
    pub fn new(taxonomy: &'a SkillTaxonomy) -> Self {
        Self {
            taxonomy,
            overrides: canonical_overrides(),
            composite_split: Regex::new(r"[/|,&]").expect("invalid composite split regex"),
        }
    }

    /// Clean up the raw accepted set into the final canonical list.
    pub fn process(&self, raw_skills: &HashSet<String>) -> Vec<String> {
        let expanded = self.split_compounds(raw_skills);
        let deduped = dedup_case_insensitive(expanded);
        let suppressed = self.suppress_abstractions(deduped);
        self.normalize_and_sort(suppressed)
    }

    /// Split comma compounds and unrecognized slash compounds, re-validating
    /// each part. Recognized single-entity compounds like CI/CD survive.
    fn split_compounds(&self, skills: &HashSet<String>) -> Vec<String> {
        let mut expanded = Vec::new();

        for skill in skills {
            if skill.contains(',') {
                for part in skill.split(',') {
                    let part = part.trim();
                    if part.len() >= 2 {
                        if let Some(canonical) = self.to_canonical(part) {
                            expanded.push(canonical);
                        }
                    }
                }
            } else if skill.contains('/') && !self.is_recognized(skill) {
                for part in skill.split('/') {
                    let part = part.trim();
                    if part.len() >= 2 {
                        if let Some(canonical) = self.to_canonical(part) {
                            expanded.push(canonical);
                        }
                    }
                }
            } else {
                expanded.push(skill.clone());
            }
        }

        expanded
    }

    /// Drop a generic term when a more specific sibling is present.
    fn suppress_abstractions(&self, skills: Vec<String>) -> Vec<String> {
        let lower_set: HashSet<String> = skills.iter().map(|s| s.to_lowercase()).collect();

        let mut remove: HashSet<&'static str> = HashSet::new();
        for (generic, specifics) in abstraction_rules() {
            if lower_set.contains(generic) && specifics.iter().any(|s| lower_set.contains(*s)) {
                remove.insert(generic);
            }
        }

        skills
            .into_iter()
            .filter(|s| !remove.contains(s.to_lowercase().as_str()))
            .collect()
    }

    /// Final canonical pass: split remaining composites, map every part
    /// through the alias table and taxonomy, keep only parts that resolve.
    fn normalize_and_sort(&self, skills: Vec<String>) -> Vec<String> {
        let mut normalized = HashSet::new();

        for skill in skills {
            for part in self.split_composite(&skill) {
                let part = part.trim();
                if part.len() < 2 {
                    continue;
                }
                if let Some(canonical) = self.to_canonical(part) {
                    normalized.insert(canonical);
                }
            }
        }

        let mut result: Vec<String> = normalized.into_iter().collect();
        result.sort();
        result
    }

    fn split_composite(&self, skill: &str) -> Vec<String> {
        // Compounds with a canonical single form stay whole.
        if self.is_recognized_compound(skill) {
            return vec![skill.to_string()];
        }
        self.composite_split
            .split(skill)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }

    fn is_recognized(&self, skill: &str) -> bool {
        self.overrides.contains_key(skill.to_lowercase().as_str())
            || self.taxonomy.is_known_skill(skill)
    }

    fn is_recognized_compound(&self, skill: &str) -> bool {
        self.overrides.contains_key(skill.to_lowercase().as_str())
    }

    /// Map a skill to its canonical form via the curated alias table, then
    /// the taxonomy; unknown skills resolve to nothing.
    fn to_canonical(&self, skill: &str) -> Option<String> {
        let lower = skill.trim().to_lowercase();
        if let Some(canonical) = self.overrides.get(lower.as_str()) {
            return Some(canonical.to_string());
        }
        self.taxonomy.normalize(skill).map(|s| s.to_string())
    }
}

fn dedup_case_insensitive(skills: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut deduped = Vec::new();
    for skill in skills {
        if seen.insert(skill.to_lowercase()) {
            deduped.push(skill);
        }
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> SkillTaxonomy {
        SkillTaxonomy::from_skills(["Python", "AWS", "Cloud", "Git", "GitHub"])
    }

    fn process(raw: &[&str]) -> Vec<String> {
        let tax = taxonomy();
        let processor = PostProcessor::new(&tax);
        let set: HashSet<String> = raw.iter().map(|s| s.to_string()).collect();
        processor.process(&set)
    }

    #[test]
    fn test_compound_splitting() {
        let result = process(&["Git, Git/GitHub", "GitHub", "JavaScript/TypeScript"]);
        assert_eq!(result, vec!["Git", "GitHub", "JavaScript", "TypeScript"]);
    }

    #[test]
    fn test_known_compound_preserved() {
        let result = process(&["CI/CD"]);
        assert_eq!(result, vec!["CI/CD"]);
    }

    #[test]
    fn test_case_insensitive_dedup() {
        let result = process(&["python", "PYTHON", "Python"]);
        assert_eq!(result, vec!["Python"]);
    }

    #[test]
    fn test_abstraction_suppression() {
        let result = process(&["Cloud", "AWS"]);
        assert_eq!(result, vec!["AWS"]);

        // Isolated generic with no specific sibling is retained.
        let result = process(&["Cloud"]);
        assert_eq!(result, vec!["Cloud"]);
    }

    #[test]
    fn test_unresolvable_parts_dropped() {
        let result = process(&["Python, Underwater Basketweaving"]);
        assert_eq!(result, vec!["Python"]);
    }

    #[test]
    fn test_output_sorted() {
        let result = process(&["TypeScript", "Python", "AWS"]);
        assert_eq!(result, vec!["AWS", "Python", "TypeScript"]);
    }
}
