//! Integration tests for the skill gap analyzer

use skill_gap_analyzer::config::Config;
use skill_gap_analyzer::error::Result;
use skill_gap_analyzer::extraction::{SkillExtractor, SkillTaxonomy};
use skill_gap_analyzer::input::DocumentReader;
use skill_gap_analyzer::jobs::JobDatabase;
use skill_gap_analyzer::matching::{
    EvidenceSet, GapMatcher, MatchStatus, MatchTier, NullVerifier, TextEmbedder,
};
use std::collections::HashMap;
use std::path::Path;

fn fixture_taxonomy() -> SkillTaxonomy {
    SkillTaxonomy::load(Path::new("tests/fixtures/job_dataset.json"))
}

fn extractor() -> SkillExtractor {
    SkillExtractor::new(fixture_taxonomy(), Config::default().extraction)
}

#[tokio::test]
async fn test_end_to_end_extraction_from_markdown() {
    let mut reader = DocumentReader::new();
    let text = reader
        .read_text(Path::new("tests/fixtures/sample_resume.md"))
        .await
        .unwrap();
    assert!(!text.contains("##"));
    assert!(!text.contains("- Built"));

    let skills = extractor().extract(&text);

    // Skills-section entries are trusted on a single mention; FastAPI earns
    // inclusion through two anchored Experience mentions. PostgreSQL and
    // Kubernetes appear once in Experience, which is not enough.
    assert_eq!(skills, vec!["AWS", "CI/CD", "Docker", "FastAPI", "Python"]);
}

#[tokio::test]
async fn test_plain_text_and_markdown_agree() {
    let mut reader = DocumentReader::new();
    let md_text = reader
        .read_text(Path::new("tests/fixtures/sample_resume.md"))
        .await
        .unwrap();
    let txt_text = reader
        .read_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    let ex = extractor();
    assert_eq!(ex.extract(&md_text), ex.extract(&txt_text));
    assert_eq!(reader.cache_size(), 2);
}

#[test]
fn test_extraction_case_invariance() {
    let ex = extractor();
    let upper = ex.extract("SKILLS:\nPYTHON, DOCKER");
    let lower = ex.extract("skills:\npython, docker");
    assert_eq!(upper, vec!["Docker", "Python"]);
    assert_eq!(upper, lower);
}

#[test]
fn test_compound_skills_split_and_canonicalized() {
    let ex = extractor();
    let skills = ex.extract("Skills\nGit, Git/GitHub, GitHub, JavaScript/TypeScript");
    assert_eq!(skills, vec!["Git", "GitHub", "JavaScript", "TypeScript"]);
}

#[test]
fn test_no_substring_bleed() {
    let ex = extractor();
    let skills = ex.extract("Skills\nJavaScript");
    assert_eq!(skills, vec!["JavaScript"]);
}

#[test]
fn test_generic_term_suppressed_by_specific() {
    let ex = extractor();
    // "Cloud" is blocked by the matcher's generic denylist while AWS
    // resolves normally.
    let skills = ex.extract("Skills\nCloud, AWS");
    assert_eq!(skills, vec!["AWS"]);
}

#[test]
fn test_job_database_role_queries() {
    let db = JobDatabase::load(Path::new("tests/fixtures/job_dataset.json")).unwrap();
    assert_eq!(db.record_count(), 4);

    let senior = db.skills_for_role("backend", Some("senior"));
    assert!(senior.contains(&"FastAPI".to_string()));
    assert!(!senior.contains(&"Git".to_string()));

    // All three skills-field formats contribute to the taxonomy.
    let taxonomy = fixture_taxonomy();
    assert_eq!(taxonomy.normalize("terraform"), Some("Terraform"));
    assert_eq!(taxonomy.normalize("postgres"), Some("PostgreSQL"));
    assert_eq!(taxonomy.normalize("react js"), Some("React"));
}

/// Chunks embed to [1, 0]; a requirement registered with similarity `s`
/// embeds to [s, sqrt(1 - s^2)], so its best cosine score is exactly `s`.
struct PlantedEmbedder {
    requirements: HashMap<String, f32>,
}

impl TextEmbedder for PlantedEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| match self.requirements.get(t) {
                Some(s) => vec![*s, (1.0 - s * s).sqrt()],
                None => vec![1.0, 0.0],
            })
            .collect())
    }
}

#[tokio::test]
async fn test_gap_cascade_tiers_end_to_end() {
    let mut requirements = HashMap::new();
    requirements.insert("Terraform".to_string(), 0.1_f32);
    requirements.insert("Kafka".to_string(), 0.5_f32);

    let matcher = GapMatcher::new(
        Box::new(PlantedEmbedder { requirements }),
        Box::new(NullVerifier),
        Config::default().matching,
    );

    let evidence = EvidenceSet::from_skills(&["Python".to_string(), "Docker".to_string()]);
    let required = vec![
        "Python".to_string(),
        "Terraform".to_string(),
        "Kafka".to_string(),
    ];
    let report = matcher.match_gap(&required, &evidence).await.unwrap();

    // Tier 1: exact skill-name hit.
    assert_eq!(report.records[0].tier, MatchTier::Exact);
    assert_eq!(report.records[0].status, MatchStatus::Covered);

    // Tier 2: clear semantic miss at 0.1.
    assert_eq!(report.records[1].tier, MatchTier::Semantic);
    assert_eq!(report.records[1].status, MatchStatus::Missing);

    // Tier 3: borderline 0.5 with no verifier degrades to the threshold
    // fallback, covered with zero confidence at the boundary.
    assert_eq!(report.records[2].tier, MatchTier::ThresholdFallback);
    assert_eq!(report.records[2].status, MatchStatus::Covered);
    assert_eq!(report.records[2].confidence, 0.0);

    assert_eq!(report.covered_count, 2);
    assert_eq!(report.match_percentage, 66.7);
    assert_eq!(report.fast_path_percentage, 66.7);
    assert_eq!(report.missing_skills(), vec!["Terraform"]);
}

#[tokio::test]
async fn test_extract_then_match_pipeline() {
    let mut reader = DocumentReader::new();
    let resume_text = reader
        .read_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();
    let resume_skills = extractor().extract(&resume_text);

    let db = JobDatabase::load(Path::new("tests/fixtures/job_dataset.json")).unwrap();
    let required = db.skills_for_role("backend", Some("junior"));
    assert!(!required.is_empty());

    let matcher = GapMatcher::new(
        Box::new(PlantedEmbedder {
            requirements: HashMap::new(),
        }),
        Box::new(NullVerifier),
        Config::default().matching,
    );
    let evidence = EvidenceSet::from_skills(&resume_skills);
    let report = matcher.match_gap(&required, &evidence).await.unwrap();

    assert_eq!(report.total_requirements, required.len());
    // Python and Docker resolve on the exact tier.
    let python = report
        .records
        .iter()
        .find(|r| r.requirement == "Python")
        .unwrap();
    assert_eq!(python.tier, MatchTier::Exact);
    assert_eq!(python.status, MatchStatus::Covered);
}
