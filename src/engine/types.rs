use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "csv"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif"];
pub const DOCUMENT_EXTENSIONS: &[&str] = &["docx", "doc"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatKind {
    Text,
    Image,
    Document,
}

impl FormatKind {
    /// Case-insensitive; `ext` is given without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            Some(FormatKind::Text)
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(FormatKind::Image)
        } else if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            Some(FormatKind::Document)
        } else {
            None
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kind: FormatKind,
}
