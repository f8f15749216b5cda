//! Skill extraction pipeline
//!
//! Raw text flows through segmentation, candidate generation, matching,
//! scoring and post-processing to produce a sorted canonical skill list.

pub mod candidates;
pub mod extractor;
pub mod matcher;
pub mod postprocess;
pub mod scoring;
pub mod segmenter;
pub mod taxonomy;

pub use extractor::SkillExtractor;
pub use taxonomy::SkillTaxonomy;
