//! Per-analysis in-memory evidence index
//!
//! Each analysis builds its own index under a fresh session id, so
//! concurrent analyses never read each other's evidence.

use crate::error::Result;
use crate::matching::embeddings::{cosine_similarity, TextEmbedder};
use log::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EvidenceHit {
    pub score: f32,
    pub text: String,
}

struct EvidenceEntry {
    text: String,
    embedding: Vec<f32>,
}

/// Brute-force cosine index over one analysis's evidence chunks.
pub struct EvidenceIndex {
    session_id: Uuid,
    entries: Vec<EvidenceEntry>,
}

impl EvidenceIndex {
    /// Embed and index the evidence chunks for one analysis session.
    pub fn build(embedder: &dyn TextEmbedder, chunks: &[String]) -> Result<Self> {
        let session_id = Uuid::new_v4();
        let embeddings = if chunks.is_empty() {
            Vec::new()
        } else {
            embedder.encode(chunks)?
        };

        let entries = chunks
            .iter()
            .zip(embeddings)
            .map(|(text, embedding)| EvidenceEntry {
                text: text.clone(),
                embedding,
            })
            .collect::<Vec<_>>();

        debug!(
            "Evidence index {} built with {} chunks",
            session_id,
            entries.len()
        );
        Ok(Self {
            session_id,
            entries,
        })
    }

    /// Top-k entries by cosine similarity, best first.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<EvidenceHit>> {
        let mut hits = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let score = cosine_similarity(query, &entry.embedding)?;
            hits.push(EvidenceHit {
                score,
                text: entry.text.clone(),
            });
        }

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(top_k);
        Ok(hits)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
