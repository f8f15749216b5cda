//! Gap matching: evidence indexing, semantic search and the decision cascade

pub mod embeddings;
pub mod gap;
pub mod index;
pub mod verifier;

pub use embeddings::{cosine_similarity, Model2VecEmbedder, TextEmbedder};
pub use gap::{EvidenceSet, GapMatcher, GapReport, MatchRecord, MatchStatus, MatchTier};
pub use verifier::{HttpVerifier, NullVerifier, SkillVerifier};
