//! Document reader routing files to the right extractor

use crate::error::{Result, SkillGapError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::info;
use std::collections::HashMap;
use std::path::Path;

/// Reads documents into plain text, caching by path so the same file feeding
/// both sides of an analysis is extracted once.
pub struct DocumentReader {
    cache: HashMap<String, String>,
}

impl Default for DocumentReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentReader {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub async fn read_text(&mut self, path: &Path) -> Result<String> {
        let key = path.to_string_lossy().to_string();

        if let Some(cached) = self.cache.get(&key) {
            info!("Using cached text for: {}", path.display());
            return Ok(cached.clone());
        }

        if !path.exists() {
            return Err(SkillGapError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(SkillGapError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        self.cache.insert(key, text.clone());
        Ok(text)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_and_caches_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.md");
        std::fs::write(&path, "## Skills\n- Python\n").unwrap();

        let mut reader = DocumentReader::new();
        let text = reader.read_text(&path).await.unwrap();
        assert!(text.contains("Python"));
        assert_eq!(reader.cache_size(), 1);

        // Second read serves the cached text, even if the file is gone.
        std::fs::remove_file(&path).unwrap();
        let again = reader.read_text(&path).await.unwrap();
        assert_eq!(again, text);
        assert_eq!(reader.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_invalid_input() {
        let mut reader = DocumentReader::new();
        let err = reader.read_text(Path::new("/no/such/file.txt")).await;
        assert!(matches!(err, Err(SkillGapError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        std::fs::write(&path, "binary").unwrap();

        let mut reader = DocumentReader::new();
        let err = reader.read_text(&path).await;
        assert!(matches!(err, Err(SkillGapError::UnsupportedFormat(_))));
    }
}
