//! Text embeddings via Model2Vec static models
//!
//! The embedder sits behind a trait so the gap matcher can be exercised
//! without model weights on disk.

use crate::config::Config;
use crate::error::{Result, SkillGapError};
use log::info;
use model2vec_rs::model::StaticModel;
use std::time::Instant;

/// Dense text encoder used for semantic evidence search.
pub trait TextEmbedder: Send + Sync {
    /// Encode a batch of texts, one vector per input, input order preserved.
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn encode_single(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.encode(std::slice::from_ref(&text.to_string()))?;
        vectors
            .pop()
            .ok_or_else(|| SkillGapError::Embedding("empty encoder output".to_string()))
    }
}

pub struct Model2VecEmbedder {
    model: StaticModel,
}

impl Model2VecEmbedder {
    /// Load the configured static embedding model. Resolves a local path
    /// under the models directory first, then falls back to the model id.
    pub fn from_config(config: &Config) -> Result<Self> {
        let model_name = &config.models.embedding_model;
        let local_path = config.models.models_dir.join(model_name);

        let start = Instant::now();
        let source = if local_path.exists() {
            local_path.to_string_lossy().to_string()
        } else {
            model_name.clone()
        };

        let model = StaticModel::from_pretrained(&source, None, None, None)
            .map_err(|e| SkillGapError::Embedding(format!("Failed to load model: {}", e)))?;

        info!(
            "Embedding model '{}' loaded in {:.2?}",
            model_name,
            start.elapsed()
        );
        Ok(Self { model })
    }
}

impl TextEmbedder for Model2VecEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.encode(texts))
    }

    fn encode_single(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.model.encode_single(text))
    }
}

/// Cosine similarity between two embeddings.
///
/// A zero-norm vector yields 0.0 rather than NaN, so degenerate inputs
/// (empty strings, unknown tokens) read as a clear miss downstream.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(SkillGapError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}
