//! Skill gap analyzer: skill extraction and requirement matching CLI

use clap::Parser;
use log::{error, info, warn};
use skill_gap_analyzer::cli::{self, Cli, Commands, ConfigAction, TaxonomyAction};
use skill_gap_analyzer::config::Config;
use skill_gap_analyzer::error::{Result, SkillGapError};
use skill_gap_analyzer::extraction::{SkillExtractor, SkillTaxonomy};
use skill_gap_analyzer::input::DocumentReader;
use skill_gap_analyzer::jobs::JobDatabase;
use skill_gap_analyzer::matching::{
    EvidenceSet, GapMatcher, HttpVerifier, Model2VecEmbedder, NullVerifier, SkillVerifier,
};
use skill_gap_analyzer::output::{AnalysisReport, ReportGenerator};
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            role,
            level,
            detailed,
            output,
            save,
            no_verify,
        } => {
            let started = Instant::now();

            cli::validate_file_extension(&resume, &["pdf", "txt", "md"])
                .map_err(|e| SkillGapError::InvalidInput(format!("Resume file: {}", e)))?;
            let output_format =
                cli::parse_output_format(&output).map_err(SkillGapError::InvalidInput)?;

            println!("🔍 Skill gap analysis");
            println!("📄 Resume: {}", resume.display());

            let mut reader = DocumentReader::new();
            let resume_text = reader.read_text(&resume).await?;

            let taxonomy = SkillTaxonomy::load(&config.taxonomy.data_path);
            let extractor = SkillExtractor::new(taxonomy, config.extraction.clone());

            let resume_skills = extractor.extract(&resume_text);
            info!("Resume yielded {} verified skills", resume_skills.len());

            // Required skills come from a job description file or from the
            // job database by role.
            let (required_skills, job_source) = match (&job, &role) {
                (Some(job_path), _) => {
                    cli::validate_file_extension(job_path, &["pdf", "txt", "md"]).map_err(|e| {
                        SkillGapError::InvalidInput(format!("Job description file: {}", e))
                    })?;
                    println!("💼 Job description: {}", job_path.display());
                    let job_text = reader.read_text(job_path).await?;
                    (
                        extractor.extract(&job_text),
                        job_path.to_string_lossy().to_string(),
                    )
                }
                (None, Some(role_name)) => {
                    let db = JobDatabase::load(&config.taxonomy.data_path)?;
                    let skills = db.skills_for_role(role_name, level.as_deref());
                    if skills.is_empty() {
                        return Err(SkillGapError::InvalidInput(format!(
                            "No skills found for role '{}' in the job database",
                            role_name
                        )));
                    }
                    let source = match &level {
                        Some(l) => format!("{} ({})", role_name, l),
                        None => role_name.clone(),
                    };
                    println!("💼 Target role: {}", source);
                    (skills, source)
                }
                (None, None) => {
                    return Err(SkillGapError::InvalidInput(
                        "Provide either --job <file> or --role <title>".to_string(),
                    ));
                }
            };

            println!(
                "🧩 {} resume skills vs {} requirements",
                resume_skills.len(),
                required_skills.len()
            );

            let embedder = Model2VecEmbedder::from_config(&config)?;
            let verifier: Box<dyn SkillVerifier> = if no_verify {
                println!("⚠️  LLM arbitration disabled");
                Box::new(NullVerifier)
            } else {
                match HttpVerifier::from_config(&config.verifier) {
                    Ok(v) => Box::new(v),
                    Err(e) => {
                        warn!("Arbitration unavailable ({}), using threshold fallback", e);
                        Box::new(NullVerifier)
                    }
                }
            };

            // Resume lines serve as semantic evidence alongside the skills.
            let chunks: Vec<String> = resume_text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            let evidence = EvidenceSet::from_chunks(&resume_skills, chunks);

            let matcher = GapMatcher::new(Box::new(embedder), verifier, config.matching.clone());
            let gap = matcher.match_gap(&required_skills, &evidence).await?;

            let report = AnalysisReport::new(
                resume.to_string_lossy().to_string(),
                job_source,
                resume_skills,
                required_skills,
                gap,
                started.elapsed().as_millis() as u64,
            );

            let use_colors = config.output.color_output && save.is_none();
            let generator = ReportGenerator::new(use_colors, detailed || config.output.detailed);

            match save {
                Some(path) => {
                    generator.save_report(&report, &output_format, &path).await?;
                    println!("✅ Report saved to {}", path.display());
                }
                None => {
                    println!("{}", generator.format(&report, &output_format)?);
                }
            }
        }

        Commands::Extract { file, output } => {
            cli::validate_file_extension(&file, &["pdf", "txt", "md"])
                .map_err(|e| SkillGapError::InvalidInput(format!("Input file: {}", e)))?;
            let output_format =
                cli::parse_output_format(&output).map_err(SkillGapError::InvalidInput)?;

            let mut reader = DocumentReader::new();
            let text = reader.read_text(&file).await?;

            let taxonomy = SkillTaxonomy::load(&config.taxonomy.data_path);
            let extractor = SkillExtractor::new(taxonomy, config.extraction.clone());
            let skills = extractor.extract(&text);

            match output_format {
                skill_gap_analyzer::config::OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&skills)?);
                }
                _ => {
                    println!("🧩 {} verified skills in {}:\n", skills.len(), file.display());
                    for skill in &skills {
                        println!("  • {}", skill);
                    }
                }
            }
        }

        Commands::Taxonomy { action } => match action {
            TaxonomyAction::Stats => {
                let db = JobDatabase::load(&config.taxonomy.data_path)?;
                let taxonomy = SkillTaxonomy::load(&config.taxonomy.data_path);
                println!("📚 Taxonomy statistics\n");
                println!("Dataset: {}", config.taxonomy.data_path.display());
                println!("Job records: {}", db.record_count());
                println!("Distinct roles: {}", db.roles().len());
                println!("Canonical skills: {}", taxonomy.skill_count());
            }

            TaxonomyAction::Search { query, limit } => {
                let taxonomy = SkillTaxonomy::load(&config.taxonomy.data_path);
                let results = taxonomy.search_similar(&query, limit);
                if results.is_empty() {
                    println!("No skills similar to '{}'", query);
                } else {
                    println!("Skills similar to '{}':", query);
                    for skill in results {
                        println!("  • {}", skill);
                    }
                }
            }

            TaxonomyAction::Roles => {
                let db = JobDatabase::load(&config.taxonomy.data_path)?;
                println!("💼 {} roles in the job database:\n", db.roles().len());
                for role in db.roles() {
                    println!("  • {}", role);
                }
            }

            TaxonomyAction::Skills { role, level } => {
                let db = JobDatabase::load(&config.taxonomy.data_path)?;
                let skills = db.skills_for_role(&role, level.as_deref());
                if skills.is_empty() {
                    println!("No skills found for role '{}'", role);
                } else {
                    println!("🧩 Skill profile for '{}':\n", role);
                    for skill in skills {
                        println!("  • {}", skill);
                    }
                }
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current configuration\n");
                println!("Taxonomy dataset: {}", config.taxonomy.data_path.display());
                println!("Embedding model: {}", config.models.embedding_model);
                println!("Verifier model: {}", config.verifier.model);
                println!("\nMatching thresholds:");
                println!("  Clear match: {}", config.matching.clear_match_threshold);
                println!("  Clear miss: {}", config.matching.clear_miss_threshold);
                println!("  Fallback: {}", config.matching.fallback_threshold);
                println!("\nExtraction:");
                println!("  Fuzzy threshold: {}", config.extraction.fuzzy_threshold);
                println!(
                    "  Section multipliers: {} / {} / {}",
                    config.extraction.primary_multiplier,
                    config.extraction.secondary_multiplier,
                    config.extraction.tertiary_multiplier
                );
                println!(
                    "  Inclusion: score >= {} or {}x at >= {}",
                    config.extraction.high_confidence_score,
                    config.extraction.repeat_min_count,
                    config.extraction.repeat_min_score
                );
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save()?;
                println!("✅ Configuration reset");
            }
        },
    }

    Ok(())
}
