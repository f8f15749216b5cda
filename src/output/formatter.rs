//! Output formatters: console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::{Result, SkillGapError};
use crate::matching::MatchStatus;
use crate::output::report::AnalysisReport;
use colored::{Color, Colorize};

pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter;

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".blue().bold(), title.blue().bold())
        } else {
            format!("\n█ {}\n", title)
        }
    }

    fn coverage_badge(&self, percentage: f64) -> String {
        let (badge, color) = match percentage as u32 {
            90..=100 => ("STRONG FIT", Color::Green),
            70..=89 => ("GOOD FIT", Color::BrightGreen),
            50..=69 => ("PARTIAL FIT", Color::Yellow),
            30..=49 => ("WEAK FIT", Color::BrightRed),
            _ => ("POOR FIT", Color::Red),
        };
        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn status_marker(&self, status: MatchStatus) -> String {
        match status {
            MatchStatus::Covered => self.colorize("✓", Color::Green),
            MatchStatus::Missing => self.colorize("✗", Color::Red),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("SKILL GAP ANALYSIS"));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!(
            "Resume: {} | Target: {}\n",
            report.metadata.resume_source, report.metadata.job_source
        ));

        output.push_str(&self.format_header("Coverage"));
        output.push_str(&format!(
            "Requirements covered: {}/{} ({}%) {}\n",
            report.gap.covered_count,
            report.gap.total_requirements,
            report.gap.match_percentage,
            self.coverage_badge(report.gap.match_percentage)
        ));
        output.push_str(&format!(
            "Decided without arbitration: {}%\n",
            report.gap.fast_path_percentage
        ));

        output.push_str(&self.format_header("Requirements"));
        for record in &report.gap.records {
            output.push_str(&format!(
                "{} {} ({}, confidence {:.2})\n",
                self.status_marker(record.status),
                record.requirement,
                record.tier,
                record.confidence
            ));
            if self.detailed {
                if let Some(evidence) = &record.evidence {
                    output.push_str(&format!("    evidence: {}\n", evidence));
                }
                if let Some(reasoning) = &record.reasoning {
                    output.push_str(&format!("    reasoning: {}\n", reasoning));
                }
                if let Some(score) = record.score {
                    output.push_str(&format!("    similarity: {:.3}\n", score));
                }
            }
        }

        let missing = report.gap.missing_skills();
        if !missing.is_empty() {
            output.push_str(&self.format_header("Missing Skills"));
            for skill in missing {
                output.push_str(&format!("  {} {}\n", self.colorize("-", Color::Red), skill));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("Extracted Resume Skills"));
            output.push_str(&report.resume_skills.join(", "));
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut md = String::new();

        md.push_str("# Skill Gap Analysis\n\n");
        md.push_str(&format!(
            "Generated {} · {} vs {}\n\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M UTC"),
            report.metadata.resume_source,
            report.metadata.job_source
        ));

        md.push_str("## Coverage\n\n");
        md.push_str(&format!(
            "**{}/{} requirements covered ({}%)**, {}% decided on the fast path.\n\n",
            report.gap.covered_count,
            report.gap.total_requirements,
            report.gap.match_percentage,
            report.gap.fast_path_percentage
        ));

        md.push_str("## Requirements\n\n");
        md.push_str("| Requirement | Status | Tier | Confidence | Evidence |\n");
        md.push_str("|---|---|---|---|---|\n");
        for record in &report.gap.records {
            md.push_str(&format!(
                "| {} | {} | {} | {:.2} | {} |\n",
                record.requirement,
                record.status,
                record.tier,
                record.confidence,
                record.evidence.as_deref().unwrap_or("—")
            ));
        }
        md.push('\n');

        let missing = report.gap.missing_skills();
        if !missing.is_empty() {
            md.push_str("## Missing Skills\n\n");
            for skill in missing {
                md.push_str(&format!("- {}\n", skill));
            }
            md.push('\n');
        }

        md.push_str("## Extracted Resume Skills\n\n");
        for skill in &report.resume_skills {
            md.push_str(&format!("- {}\n", skill));
        }

        Ok(md)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

/// Routes a report to the formatter matching the requested output format.
pub struct ReportGenerator {
    console: ConsoleFormatter,
    json: JsonFormatter,
    markdown: MarkdownFormatter,
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            console: ConsoleFormatter::new(use_colors, detailed),
            json: JsonFormatter::new(true),
            markdown: MarkdownFormatter,
        }
    }

    pub fn format(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console.format_report(report),
            OutputFormat::Json => self.json.format_report(report),
            OutputFormat::Markdown => self.markdown.format_report(report),
        }
    }

    pub async fn save_report(
        &self,
        report: &AnalysisReport,
        format: &OutputFormat,
        path: &std::path::Path,
    ) -> Result<()> {
        let content = self.format(report, format)?;
        tokio::fs::write(path, content).await.map_err(|e| {
            SkillGapError::OutputFormatting(format!(
                "Failed to write report to '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{GapReport, MatchRecord, MatchTier};

    fn sample_report() -> AnalysisReport {
        let records = vec![
            MatchRecord {
                requirement: "Python".to_string(),
                status: MatchStatus::Covered,
                tier: MatchTier::Exact,
                confidence: 1.0,
                score: None,
                evidence: Some("Python".to_string()),
                reasoning: None,
            },
            MatchRecord {
                requirement: "Kafka".to_string(),
                status: MatchStatus::Missing,
                tier: MatchTier::Semantic,
                confidence: 0.9,
                score: Some(0.12),
                evidence: None,
                reasoning: None,
            },
        ];
        let gap = GapReport {
            total_requirements: 2,
            covered_count: 1,
            missing_count: 1,
            match_percentage: 50.0,
            fast_path_percentage: 100.0,
            records,
        };
        AnalysisReport::new(
            "resume.pdf".to_string(),
            "Backend Engineer (senior)".to_string(),
            vec!["Docker".to_string(), "Python".to_string()],
            vec!["Python".to_string(), "Kafka".to_string()],
            gap,
            42,
        )
    }

    #[test]
    fn test_console_output_without_colors() {
        let formatter = ConsoleFormatter::new(false, true);
        let output = formatter.format_report(&sample_report()).unwrap();
        assert!(output.contains("1/2"));
        assert!(output.contains("✗ Kafka"));
        assert!(output.contains("Missing Skills"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_json_output_roundtrips() {
        let formatter = JsonFormatter::new(false);
        let json = formatter.format_report(&sample_report()).unwrap();
        let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.gap.covered_count, 1);
        assert_eq!(parsed.required_skills, vec!["Python", "Kafka"]);
    }

    #[test]
    fn test_markdown_table_rows() {
        let md = MarkdownFormatter.format_report(&sample_report()).unwrap();
        assert!(md.contains("| Python | covered | exact | 1.00 | Python |"));
        assert!(md.contains("- Kafka"));
    }
}
