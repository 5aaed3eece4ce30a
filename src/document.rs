use anyhow::{Result, anyhow};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// @module: Documents, extracted text and summary values

/// Magic header every PDF starts with
pub const PDF_MAGIC: &[u8] = b"%PDF-";

/// An uploaded file, consumed by the upload controller
#[derive(Debug, Clone)]
pub struct Document {
    // @field: Original file name
    pub filename: String,

    // @field: Raw file content
    pub content: Bytes,
}

impl Document {
    /// Create a document from a name and its raw bytes
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Read a document from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = crate::file_utils::FileManager::read_bytes(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(Self::new(filename, content))
    }

    /// Size of the content in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the content is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether the file looks like a PDF, by extension or header
    pub fn looks_like_pdf(&self) -> bool {
        let by_extension = Path::new(&self.filename)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        by_extension || self.content.starts_with(PDF_MAGIC)
    }
}

/// Output of the PDF parsing library
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfContent {
    /// Plain text of all pages
    pub text: String,
    /// Number of pages in the document
    pub page_count: usize,
    /// String entries of the document information dictionary
    pub metadata: BTreeMap<String, String>,
}

/// Text extracted from a document; never blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    /// Wrap text, returning `None` when it is empty or whitespace only
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Number of characters
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for ExtractedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Summary length preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthTier {
    Short,
    #[default]
    Medium,
    Long,
}

impl LengthTier {
    /// All tiers, shortest first
    pub const ALL: [LengthTier; 3] = [Self::Short, Self::Medium, Self::Long];

    /// Upper bound for the generated summary
    pub fn max_length(&self) -> u32 {
        match self {
            Self::Short => 150,
            Self::Medium => 250,
            Self::Long => 400,
        }
    }

    /// Lower bound, `floor(0.6 * max_length)`
    pub fn min_length(&self) -> u32 {
        self.max_length() * 3 / 5
    }

    /// `(max_length, min_length)` pair sent to the model
    pub fn bounds(&self) -> (u32, u32) {
        (self.max_length(), self.min_length())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for LengthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthTier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            _ => Err(anyhow!("Invalid summary length: {}", s)),
        }
    }
}

/// A generated summary and the tier it was produced with
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResult {
    pub text: String,
    pub tier: LengthTier,
}

impl SummaryResult {
    pub fn new(text: impl Into<String>, tier: LengthTier) -> Self {
        Self {
            text: text.into(),
            tier,
        }
    }
}
