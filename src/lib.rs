//! Skill gap analyzer library

pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod input;
pub mod jobs;
pub mod matching;
pub mod output;

pub use config::Config;
pub use error::{Result, SkillGapError};
