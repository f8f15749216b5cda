//! CLI interface for the skill gap analyzer

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skillgap")]
#[command(about = "Skill extraction and gap analysis between resumes and job requirements")]
#[command(
    long_about = "Extract verified skills from resumes and job descriptions, then match \
                  job requirements against candidate evidence through an exact / semantic / \
                  LLM-arbitrated cascade"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze the gap between a resume and job requirements
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long, conflicts_with = "role")]
        job: Option<PathBuf>,

        /// Target role from the job database instead of a file
        #[arg(long)]
        role: Option<String>,

        /// Experience level filter for --role (e.g. junior, senior)
        #[arg(long, requires = "role")]
        level: Option<String>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long, default_value = "console")]
        output: String,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Skip LLM arbitration (threshold fallback for borderline matches)
        #[arg(long)]
        no_verify: bool,
    },

    /// Extract verified skills from a single document
    Extract {
        /// Path to document file (PDF, TXT, MD)
        file: PathBuf,

        /// Output format: console, json
        #[arg(short, long, default_value = "console")]
        output: String,
    },

    /// Inspect the skill taxonomy and job database
    Taxonomy {
        #[command(subcommand)]
        action: TaxonomyAction,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum TaxonomyAction {
    /// Show taxonomy statistics
    Stats,

    /// Fuzzy-search the skill catalog
    Search {
        /// Partial skill name
        query: String,

        /// Maximum results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// List roles in the job database
    Roles,

    /// Show the aggregated skill profile for a role
    Skills {
        /// Role title (substring match)
        role: String,

        /// Experience level filter
        #[arg(long)]
        level: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
