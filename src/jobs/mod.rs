//! Job-description dataset loading and querying
//!
//! The dataset is the taxonomy source: a JSON array of job records whose
//! skills field arrives in one of three shapes depending on how the record
//! was produced. Format detection is explicit and each parse strategy is
//! independently testable.

use crate::error::{Result, SkillGapError};
use log::{info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// The three shapes a record's skills field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillsFormat {
    /// Already a JSON array of strings.
    NativeList,
    /// A string holding a JSON array literal, first character '['.
    JsonArrayLiteral,
    /// A plain string with semicolon-delimited entries.
    SemicolonDelimited,
}

/// Inspect a skills field and pick a parse strategy.
pub fn detect_skills_format(field: &Value) -> Option<SkillsFormat> {
    match field {
        Value::Array(_) => Some(SkillsFormat::NativeList),
        Value::String(s) => {
            if s.trim_start().starts_with('[') {
                Some(SkillsFormat::JsonArrayLiteral)
            } else {
                Some(SkillsFormat::SemicolonDelimited)
            }
        }
        _ => None,
    }
}

/// Parse a skills field using the detected strategy.
///
/// A malformed field yields an empty list rather than failing the record;
/// the caller logs and moves on.
pub fn parse_skills_field(field: &Value) -> Vec<String> {
    match detect_skills_format(field) {
        Some(SkillsFormat::NativeList) => field
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        Some(SkillsFormat::JsonArrayLiteral) => {
            let raw = field.as_str().unwrap_or_default();
            match serde_json::from_str::<Vec<String>>(raw) {
                Ok(items) => items
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                Err(e) => {
                    warn!("Skills field looked like a JSON array but failed to parse: {}", e);
                    Vec::new()
                }
            }
        }
        Some(SkillsFormat::SemicolonDelimited) => field
            .as_str()
            .unwrap_or_default()
            .split(';')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => Vec::new(),
    }
}

/// One job record from the dataset.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub title: String,
    pub experience_level: Option<String>,
    pub skills: Vec<String>,
}

/// Loaded job dataset with role and skill queries.
pub struct JobDatabase {
    records: Vec<JobRecord>,
}

impl JobDatabase {
    /// Load the dataset from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SkillGapError::TaxonomyLoad(format!(
                "Job dataset not found at {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let data: Value = serde_json::from_str(&content)?;

        let items = data.as_array().ok_or_else(|| {
            SkillGapError::TaxonomyLoad("Job dataset root is not a JSON array".to_string())
        })?;

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let title = match item.get("Title").and_then(|v| v.as_str()) {
                Some(t) if !t.trim().is_empty() => t.trim().to_string(),
                _ => continue,
            };
            let experience_level = item
                .get("ExperienceLevel")
                .and_then(|v| v.as_str())
                .map(|s| s.trim().to_string());
            let skills = item
                .get("Skills")
                .map(parse_skills_field)
                .unwrap_or_default();

            records.push(JobRecord {
                title,
                experience_level,
                skills,
            });
        }

        info!("Loaded {} job records from {}", records.len(), path.display());
        Ok(Self { records })
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// All unique role titles, sorted.
    pub fn roles(&self) -> Vec<String> {
        let mut roles: Vec<String> = self
            .records
            .iter()
            .map(|r| r.title.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        roles.sort();
        roles
    }

    /// Every skill string across all records, duplicates included.
    pub fn all_skills(&self) -> impl Iterator<Item = &str> {
        self.records.iter().flat_map(|r| r.skills.iter().map(|s| s.as_str()))
    }

    /// Unique skills for a role, optionally filtered by experience level.
    ///
    /// Role matching is case-insensitive substring matching; experience
    /// levels match through a small variation table so "Mid-Level" also
    /// matches records tagged "mid". If no record matches the experience
    /// level, all role matches are used.
    pub fn skills_for_role(&self, role: &str, experience_level: Option<&str>) -> Vec<String> {
        let role_lower = role.trim().to_lowercase();
        let role_matches: Vec<&JobRecord> = self
            .records
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&role_lower))
            .collect();

        if role_matches.is_empty() {
            info!("No job records match role '{}'", role);
            return Vec::new();
        }

        let filtered: Vec<&JobRecord> = match experience_level {
            Some(level) => {
                let terms = experience_terms(level);
                let level_matches: Vec<&JobRecord> = role_matches
                    .iter()
                    .copied()
                    .filter(|r| {
                        r.experience_level
                            .as_deref()
                            .map(|e| {
                                let e = e.to_lowercase();
                                terms.iter().any(|t| e.contains(t))
                            })
                            .unwrap_or(false)
                    })
                    .collect();
                if level_matches.is_empty() {
                    info!(
                        "No '{}' records at level '{}', using all {} role matches",
                        role,
                        level,
                        role_matches.len()
                    );
                    role_matches
                } else {
                    level_matches
                }
            }
            None => role_matches,
        };

        let mut seen = HashSet::new();
        let mut skills = Vec::new();
        for record in filtered {
            for skill in &record.skills {
                if seen.insert(skill.to_lowercase()) {
                    skills.push(skill.clone());
                }
            }
        }
        skills
    }
}

/// Map an experience level to the variations it should match.
fn experience_terms(level: &str) -> Vec<String> {
    let lower = level.trim().to_lowercase();
    let variations: &[(&str, &[&str])] = &[
        ("intern", &["intern", "fresher", "entry", "entry-level", "trainee"]),
        ("entry", &["entry", "fresher", "entry-level"]),
        ("junior", &["junior"]),
        ("mid", &["mid", "mid-level", "mid-senior"]),
        ("senior", &["senior", "senior-level"]),
        ("lead", &["lead"]),
        ("experienced", &["experienced"]),
    ];

    let mut terms = vec![lower.clone()];
    for (key, group) in variations {
        if lower.contains(key) {
            terms.extend(group.iter().map(|s| s.to_string()));
            break;
        }
    }
    terms
}
