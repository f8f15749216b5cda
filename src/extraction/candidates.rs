//! Tokenization and candidate span generation
//!
//! Candidates carry token-index provenance so the scoring stage can inspect
//! the surrounding context window. Nothing is rejected here; filtering is
//! the matcher's job.

use regex::Regex;
use std::collections::HashSet;

/// A token from a preprocessed text block.
#[derive(Debug, Clone)]
pub struct Token {
    pub text: String,
    pub is_stop: bool,
    pub is_punct: bool,
}

/// A not-yet-validated candidate span with token-index provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Minimum length for single-token and slash-part candidates.
const MIN_TOKEN_LEN: usize = 2;
/// Minimum length for n-gram candidates.
const MIN_NGRAM_LEN: usize = 3;

pub struct CandidateGenerator {
    stop_words: HashSet<&'static str>,
    noise_chars: Regex,
    whitespace: Regex,
    max_ngram_size: usize,
}

impl CandidateGenerator {
    pub fn new(max_ngram_size: usize) -> Self {
        Self {
            stop_words: stop_words(),
            // Keep . # + - / so tokens like Node.js, C#, C++ and CI/CD survive.
            noise_chars: Regex::new(r"[^\w\s.#+\-/]").expect("invalid noise regex"),
            whitespace: Regex::new(r"\s+").expect("invalid whitespace regex"),
            max_ngram_size,
        }
    }

    /// Strip noise characters and collapse whitespace before tokenization.
    pub fn preprocess(&self, text: &str) -> String {
        let cleaned = self.noise_chars.replace_all(text, " ");
        self.whitespace.replace_all(&cleaned, " ").trim().to_string()
    }

    /// Whitespace tokenization with surrounding punctuation trimmed.
    ///
    /// Interior punctuation is preserved ("Node.js", "C++", "CI/CD"); a token
    /// consisting only of punctuation (a lone "/" or "-") is kept in the
    /// stream and flagged, because slash-compound reconstruction needs it.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        text.split_whitespace()
            .map(|raw| {
                let trimmed = raw
                    .trim_end_matches(|c| c == '.' || c == '-')
                    .trim_start_matches('-');
                let text = if trimmed.is_empty() { raw } else { trimmed };
                let is_punct = text.chars().all(|c| !c.is_alphanumeric());
                let is_stop = self.stop_words.contains(text.to_lowercase().as_str());
                Token {
                    text: text.to_string(),
                    is_stop,
                    is_punct,
                }
            })
            .collect()
    }

    /// Produce all candidate spans from one tokenized block.
    pub fn generate(&self, tokens: &[Token]) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        // 1. Single tokens, plus slash-split parts of slashed tokens.
        for (i, token) in tokens.iter().enumerate() {
            if token.is_stop || token.is_punct {
                continue;
            }

            if token.text.len() >= MIN_TOKEN_LEN {
                candidates.push(Candidate {
                    text: token.text.clone(),
                    start: i,
                    end: i + 1,
                });
            }

            if token.text.contains('/') {
                for part in token.text.split('/') {
                    let part = part.trim();
                    if part.len() >= MIN_TOKEN_LEN {
                        candidates.push(Candidate {
                            text: part.to_string(),
                            start: i,
                            end: i + 1,
                        });
                    }
                }
            }
        }

        // 2. Reconstruct spaced slash-compounds: TOKEN / TOKEN -> "TOKEN/TOKEN".
        let mut i = 0;
        while i + 2 < tokens.len() {
            if tokens[i + 1].text == "/" {
                let compound = format!("{}/{}", tokens[i].text, tokens[i + 2].text);
                candidates.push(Candidate {
                    text: compound,
                    start: i,
                    end: i + 3,
                });
                i += 3;
            } else {
                i += 1;
            }
        }

        // 3. Contiguous n-grams over the full token stream.
        for n in 2..=self.max_ngram_size {
            if tokens.len() < n {
                break;
            }
            for i in 0..=tokens.len() - n {
                let ngram = tokens[i..i + n]
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                if ngram.len() >= MIN_NGRAM_LEN {
                    candidates.push(Candidate {
                        text: ngram,
                        start: i,
                        end: i + n,
                    });
                }
            }
        }

        candidates
    }
}

fn stop_words() -> HashSet<&'static str> {
    [
        "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "did",
        "do", "for", "from", "had", "has", "have", "he", "her", "his", "i",
        "if", "in", "into", "is", "it", "its", "me", "my", "no", "not", "of",
        "on", "or", "our", "she", "so", "that", "the", "their", "them",
        "then", "they", "this", "to", "was", "we", "were", "when", "which",
        "who", "will", "would", "you", "your",
    ]
    .into_iter()
    .collect()
}
