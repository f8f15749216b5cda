//! Resume text segmentation into trust-tiered sections

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trust tier assigned to a block of resume text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    /// Explicit skills / tech-stack sections, trusted outright.
    Primary,
    /// Experience and projects, requires contextual anchoring.
    Secondary,
    /// Summary, education, certifications: corroborating evidence only.
    Tertiary,
    /// Text seen before any recognized header.
    Unknown,
}

impl SectionType {
    pub const ALL: [SectionType; 4] = [
        SectionType::Primary,
        SectionType::Secondary,
        SectionType::Tertiary,
        SectionType::Unknown,
    ];
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionType::Primary => write!(f, "Primary"),
            SectionType::Secondary => write!(f, "Secondary"),
            SectionType::Tertiary => write!(f, "Tertiary"),
            SectionType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Headers that open a Primary section (high trust).
const PRIMARY_HEADERS: &[&str] = &[
    r"skills?",
    r"technical skills?",
    r"technologies",
    r"tech stack",
    r"core competencies",
    r"expertise",
    r"programming languages",
    r"tools & technologies",
    r"technology stack",
];

/// Headers that open a Secondary section (medium trust).
const SECONDARY_HEADERS: &[&str] = &[
    r"experience",
    r"work experience",
    r"employment",
    r"professional experience",
    r"work history",
    r"projects?",
    r"personal projects?",
    r"key projects",
];

/// Headers that open a Tertiary section (low trust).
const TERTIARY_HEADERS: &[&str] = &[
    r"summary",
    r"profile",
    r"about me",
    r"education",
    r"achievements?",
    r"certifications?",
    r"awards?",
    r"interests?",
    r"languages?",
    r"references?",
    r"volunteer",
    r"publications?",
];

/// Line-level patterns that promote a single line to Primary trust even
/// inside a lower-trust section, e.g. "Tech Stack: Python, React" in a
/// project description.
const PRIMARY_LINE_PATTERNS: &[&str] = &[
    r"^(?:technologies|tech stack|built with|tools|stack)\s*[:\-]",
    r"environment\s*[:\-]",
];

/// A header line is never longer than this many words.
const MAX_HEADER_WORDS: usize = 5;

/// Splits resume text into trust-classified content blocks.
pub struct TextSegmenter {
    // Evaluated in declaration order: Primary before Secondary before
    // Tertiary, so tie-breaks are deterministic.
    header_patterns: Vec<(Regex, SectionType)>,
    promotion_patterns: Vec<Regex>,
}

impl Default for TextSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSegmenter {
    pub fn new() -> Self {
        let mut header_patterns = Vec::new();
        let tiers = [
            (PRIMARY_HEADERS, SectionType::Primary),
            (SECONDARY_HEADERS, SectionType::Secondary),
            (TERTIARY_HEADERS, SectionType::Tertiary),
        ];
        for (patterns, tier) in tiers {
            for pattern in patterns {
                let full = format!("^(?:{})$", pattern);
                header_patterns.push((
                    Regex::new(&full).expect("invalid header pattern"),
                    tier,
                ));
            }
        }

        let promotion_patterns = PRIMARY_LINE_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("invalid promotion pattern"))
            .collect();

        Self {
            header_patterns,
            promotion_patterns,
        }
    }

    /// Segment text into classified content blocks.
    ///
    /// All four buckets are always present; text before the first recognized
    /// header lands in `Unknown`.
    pub fn segment(&self, text: &str) -> HashMap<SectionType, Vec<String>> {
        let mut segments: HashMap<SectionType, Vec<String>> =
            SectionType::ALL.iter().map(|t| (*t, Vec::new())).collect();

        if text.trim().is_empty() {
            return segments;
        }

        let mut current_type = SectionType::Unknown;
        let mut buffer: Vec<&str> = Vec::new();

        for line in text.lines() {
            let stripped = line.trim();
            if stripped.is_empty() {
                continue;
            }

            if let Some(new_type) = self.detect_header(stripped) {
                if !buffer.is_empty() {
                    segments
                        .get_mut(&current_type)
                        .expect("all buckets preallocated")
                        .push(buffer.join("\n"));
                    buffer.clear();
                }
                current_type = new_type;
                // A bare header carries no evidence; a colon form like
                // "Skills:" is kept so the block keeps its list framing.
                if stripped.contains(':') {
                    buffer.push(stripped);
                }
            } else if self.is_primary_line(stripped) {
                segments
                    .get_mut(&SectionType::Primary)
                    .expect("all buckets preallocated")
                    .push(stripped.to_string());
            } else {
                buffer.push(stripped);
            }
        }

        if !buffer.is_empty() {
            segments
                .get_mut(&current_type)
                .expect("all buckets preallocated")
                .push(buffer.join("\n"));
        }

        segments
    }

    /// Detect whether a line is a section header and which tier it opens.
    fn detect_header(&self, line: &str) -> Option<SectionType> {
        if line.split_whitespace().count() > MAX_HEADER_WORDS {
            return None;
        }

        let normalized = line.to_lowercase();
        let normalized = normalized.trim_end_matches(':').trim();

        for (pattern, tier) in &self.header_patterns {
            if pattern.is_match(normalized) {
                return Some(*tier);
            }
        }
        None
    }

    /// Check whether a single line should be promoted to Primary trust.
    fn is_primary_line(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.promotion_patterns.iter().any(|p| p.is_match(&lower))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_returns_empty_buckets() {
        let segmenter = TextSegmenter::new();
        let segments = segmenter.segment("   \n  \n");
        for tier in SectionType::ALL {
            assert!(segments[&tier].is_empty());
        }
    }

    #[test]
    fn test_header_classification() {
        let segmenter = TextSegmenter::new();
        assert_eq!(segmenter.detect_header("Skills"), Some(SectionType::Primary));
        assert_eq!(segmenter.detect_header("TECHNICAL SKILLS:"), Some(SectionType::Primary));
        assert_eq!(segmenter.detect_header("Work Experience"), Some(SectionType::Secondary));
        assert_eq!(segmenter.detect_header("Education"), Some(SectionType::Tertiary));
        assert_eq!(segmenter.detect_header("My long sentence that is not a header"), None);
        // Substrings must not match: header detection is whole-line.
        assert_eq!(segmenter.detect_header("Skilled negotiator"), None);
    }

    #[test]
    fn test_segmentation_buckets_content() {
        let segmenter = TextSegmenter::new();
        let text = "John Doe\n\nSkills:\nPython, Rust\n\nExperience\nBuilt services using Go\n\nEducation\nBS Computer Science";
        let segments = segmenter.segment(text);

        assert_eq!(segments[&SectionType::Unknown], vec!["John Doe".to_string()]);
        assert!(segments[&SectionType::Primary]
            .iter()
            .any(|b| b.contains("Python, Rust")));
        assert!(segments[&SectionType::Secondary]
            .iter()
            .any(|b| b.contains("Built services using Go")));
        assert!(segments[&SectionType::Tertiary]
            .iter()
            .any(|b| b.contains("BS Computer Science")));
    }

    #[test]
    fn test_header_with_colon_kept_in_buffer() {
        let segmenter = TextSegmenter::new();
        let segments = segmenter.segment("Skills:\nPython");
        assert_eq!(segments[&SectionType::Primary], vec!["Skills:\nPython".to_string()]);

        // A bare header line is dropped from the block.
        let segments = segmenter.segment("Skills\nPython");
        assert_eq!(segments[&SectionType::Primary], vec!["Python".to_string()]);
    }

    #[test]
    fn test_header_with_inline_content_is_not_a_header() {
        let segmenter = TextSegmenter::new();
        // Header matching is whole-line; an interior colon defeats it, so
        // the line buffers under the current section instead.
        assert_eq!(segmenter.detect_header("Technical Skills: Python"), None);
        let segments = segmenter.segment("Technical Skills: Python");
        assert!(segments[&SectionType::Primary].is_empty());
        assert_eq!(
            segments[&SectionType::Unknown],
            vec!["Technical Skills: Python".to_string()]
        );
    }

    #[test]
    fn test_line_level_promotion() {
        let segmenter = TextSegmenter::new();
        let text = "Projects\nPayment service rewrite\nTech Stack: Python, Kafka\nReduced latency by 40%";
        let segments = segmenter.segment(text);

        assert!(segments[&SectionType::Primary]
            .iter()
            .any(|b| b.contains("Kafka")));
        assert!(segments[&SectionType::Secondary]
            .iter()
            .any(|b| b.contains("Payment service rewrite")));
    }

    #[test]
    fn test_no_header_means_unknown() {
        let segmenter = TextSegmenter::new();
        let segments = segmenter.segment("just a paragraph of text\nwith two lines");
        assert_eq!(segments[&SectionType::Unknown].len(), 1);
        assert!(segments[&SectionType::Primary].is_empty());
    }
}
