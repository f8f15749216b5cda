//! Document input: file type detection and text extraction

pub mod file_detector;
pub mod reader;
pub mod text_extractor;

pub use file_detector::FileType;
pub use reader::DocumentReader;
