//! Candidate-to-canonical skill resolution

use crate::extraction::taxonomy::SkillTaxonomy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How a candidate resolved to a canonical skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchQuality {
    Exact,
    Fuzzy,
}

/// Soft-skill and generic-noise terms rejected before any lookup.
const DENYLIST: &[&str] = &[
    "advanced", "expert", "proficient", "experienced", "strong",
    "knowledge", "understanding", "hands-on", "familiar", "various",
    "excellent", "good", "great", "basic", "intermediate", "senior",
    "junior", "lead", "principal", "manager", "management", "years",
    "time", "working", "work", "projects", "responsible", "duties",
    "role", "team", "member", "collaborated", "programming", "concepts",
    "frameworks", "libraries", "tools", "languages", "platforms",
    "solutions", "applications", "systems", "services", "version",
    "control", "analysis", "design", "development", "implementation",
    "testing", "deployment", "maintenance", "support", "documentation",
    "communication", "coordination", "environment", "methodologies",
    "practices", "principles", "patterns",
    // Generic abstractions; the post-processor drops these when a
    // specific sibling is present, the matcher blocks them outright.
    "css", "cloud", "apis", "api", "database", "databases", "frontend",
    "backend", "devops", "web", "mobile", "software", "engineering",
];

/// Curated variant-to-canonical mapping applied before taxonomy lookup.
///
/// Shared between the matcher and the post-processor; covers concept skills
/// (WebSockets, Event-Driven Systems) the dataset-derived taxonomy may not
/// carry, and protects single-entity compounds like CI/CD from splitting.
pub(crate) fn canonical_overrides() -> HashMap<&'static str, &'static str> {
    [
        // Version control
        ("git", "Git"),
        ("github", "GitHub"),
        ("gitlab", "GitLab"),
        ("bitbucket", "Bitbucket"),
        // JavaScript ecosystem
        ("javascript", "JavaScript"),
        ("js", "JavaScript"),
        ("typescript", "TypeScript"),
        ("ts", "TypeScript"),
        ("node.js", "Node.js"),
        ("nodejs", "Node.js"),
        ("node", "Node.js"),
        ("react", "React"),
        ("reactjs", "React"),
        ("react.js", "React"),
        ("vue", "Vue.js"),
        ("vuejs", "Vue.js"),
        ("vue.js", "Vue.js"),
        ("angular", "Angular"),
        ("angularjs", "Angular"),
        ("express", "Express.js"),
        ("expressjs", "Express.js"),
        ("express.js", "Express.js"),
        // Python ecosystem
        ("python", "Python"),
        ("py", "Python"),
        ("fastapi", "FastAPI"),
        ("django", "Django"),
        ("flask", "Flask"),
        // Databases
        ("postgresql", "PostgreSQL"),
        ("postgres", "PostgreSQL"),
        ("mongodb", "MongoDB"),
        ("mongo", "MongoDB"),
        ("redis", "Redis"),
        ("mysql", "MySQL"),
        // Cloud / DevOps
        ("aws", "AWS"),
        ("amazon web services", "AWS"),
        ("azure", "Azure"),
        ("microsoft azure", "Azure"),
        ("gcp", "GCP"),
        ("google cloud", "GCP"),
        ("docker", "Docker"),
        ("kubernetes", "Kubernetes"),
        ("k8s", "Kubernetes"),
        ("ci/cd", "CI/CD"),
        ("cicd", "CI/CD"),
        // APIs
        ("rest apis", "REST APIs"),
        ("rest api", "REST APIs"),
        ("restful", "REST APIs"),
        ("grpc", "gRPC"),
        ("graphql", "GraphQL"),
        ("websockets", "WebSockets"),
        ("websocket", "WebSockets"),
        // Backend concepts
        ("event-driven", "Event-Driven Systems"),
        ("event driven", "Event-Driven Systems"),
        ("authentication", "Authentication & Authorization"),
        ("authorization", "Authentication & Authorization"),
        ("auth", "Authentication & Authorization"),
        ("unit testing", "Unit Testing"),
        ("unit tests", "Unit Testing"),
        ("scalability", "Scalability"),
        ("data structures", "Data Structures"),
        ("algorithms", "Algorithms"),
        ("dsa", "Data Structures"),
        // Languages
        ("rust", "Rust"),
        ("c++", "C++"),
        ("cpp", "C++"),
        ("java", "Java"),
        ("go", "Go"),
        ("golang", "Go"),
        // CSS frameworks
        ("tailwind", "Tailwind CSS"),
        ("tailwind css", "Tailwind CSS"),
        ("tailwindcss", "Tailwind CSS"),
    ]
    .into_iter()
    .collect()
}

/// Resolves candidate spans to canonical skill names.
pub struct SkillMatcher<'a> {
    taxonomy: &'a SkillTaxonomy,
    denylist: HashSet<&'static str>,
    overrides: HashMap<&'static str, &'static str>,
    /// Minimum normalized character ratio (0-100) for a fuzzy hit.
    fuzzy_threshold: f64,
    /// Candidates shorter than this skip fuzzy matching entirely.
    min_fuzzy_length: usize,
}

impl<'a> SkillMatcher<'a> {
    pub fn new(taxonomy: &'a SkillTaxonomy, fuzzy_threshold: f64, min_fuzzy_length: usize) -> Self {
        Self {
            taxonomy,
            denylist: DENYLIST.iter().copied().collect(),
            overrides: canonical_overrides(),
            fuzzy_threshold,
            min_fuzzy_length,
        }
    }

    /// Resolve a candidate, first hit wins:
    /// denylist reject, curated alias, taxonomy normalization, fuzzy ratio.
    pub fn match_candidate(&self, candidate: &str) -> Option<(MatchQuality, String)> {
        let lower = candidate.to_lowercase();

        if self.denylist.contains(lower.as_str()) {
            return None;
        }

        if let Some(canonical) = self.overrides.get(lower.as_str()) {
            return Some((MatchQuality::Exact, canonical.to_string()));
        }

        if let Some(canonical) = self.taxonomy.normalize(candidate) {
            return Some((MatchQuality::Exact, canonical.to_string()));
        }

        self.fuzzy_match(&lower)
            .map(|canonical| (MatchQuality::Fuzzy, canonical))
    }

    /// Best fuzzy hit against the catalog, pure character ratio.
    ///
    /// A token-weighted scorer would let "Java" reach "JavaScript"; the
    /// normalized edit-distance ratio keeps them apart.
    fn fuzzy_match(&self, candidate_lower: &str) -> Option<String> {
        if candidate_lower.len() < self.min_fuzzy_length {
            return None;
        }

        let mut best: Option<(f64, &str)> = None;
        for skill in self.taxonomy.skills() {
            let ratio = strsim::normalized_levenshtein(candidate_lower, &skill.to_lowercase()) * 100.0;
            if best.map_or(true, |(b, _)| ratio > b) {
                best = Some((ratio, skill));
            }
        }

        match best {
            Some((ratio, skill)) if ratio >= self.fuzzy_threshold => Some(skill.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::taxonomy::SkillTaxonomy;

    fn taxonomy() -> SkillTaxonomy {
        SkillTaxonomy::from_skills(["Python", "JavaScript", "PostgreSQL", "Terraform"])
    }

    #[test]
    fn test_denylist_rejected_first() {
        let tax = taxonomy();
        let matcher = SkillMatcher::new(&tax, 90.0, 4);
        assert_eq!(matcher.match_candidate("proficient"), None);
        // Denied even though the taxonomy knows "database" via nothing and
        // the generic is a plausible fuzzy neighbor.
        assert_eq!(matcher.match_candidate("cloud"), None);
    }

    #[test]
    fn test_curated_alias_hit() {
        let tax = taxonomy();
        let matcher = SkillMatcher::new(&tax, 90.0, 4);
        assert_eq!(
            matcher.match_candidate("k8s"),
            Some((MatchQuality::Exact, "Kubernetes".to_string()))
        );
        assert_eq!(
            matcher.match_candidate("CI/CD"),
            Some((MatchQuality::Exact, "CI/CD".to_string()))
        );
    }

    #[test]
    fn test_taxonomy_normalization_hit() {
        let tax = taxonomy();
        let matcher = SkillMatcher::new(&tax, 90.0, 4);
        assert_eq!(
            matcher.match_candidate("TERRAFORM"),
            Some((MatchQuality::Exact, "Terraform".to_string()))
        );
    }

    #[test]
    fn test_fuzzy_hit_above_threshold() {
        let tax = taxonomy();
        let matcher = SkillMatcher::new(&tax, 90.0, 4);
        assert_eq!(
            matcher.match_candidate("PostgreSQLL"),
            Some((MatchQuality::Fuzzy, "PostgreSQL".to_string()))
        );
    }

    #[test]
    fn test_no_substring_bleed() {
        let tax = taxonomy();
        let matcher = SkillMatcher::new(&tax, 90.0, 4);
        // "Java" vs "JavaScript" ratio is far below 90.
        assert_eq!(matcher.match_candidate("Jafa"), None);
    }

    #[test]
    fn test_short_candidates_skip_fuzzy() {
        let tax = taxonomy();
        let matcher = SkillMatcher::new(&tax, 90.0, 4);
        assert_eq!(matcher.match_candidate("Pyt"), None);
    }
}
