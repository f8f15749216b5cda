//! Analysis report data model

use crate::matching::GapReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    /// Resume file path or "stdin".
    pub resume_source: String,
    /// Job description file path or "<role> (<level>)" from the job database.
    pub job_source: String,
    pub version: String,
}

/// Everything one analysis produced, ready for any output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    /// Canonical skills extracted from the resume, sorted.
    pub resume_skills: Vec<String>,
    /// Required skills the gap analysis ran against, in input order.
    pub required_skills: Vec<String>,
    pub gap: GapReport,
}

impl AnalysisReport {
    pub fn new(
        resume_source: String,
        job_source: String,
        resume_skills: Vec<String>,
        required_skills: Vec<String>,
        gap: GapReport,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                processing_time_ms,
                resume_source,
                job_source,
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            resume_skills,
            required_skills,
            gap,
        }
    }
}
