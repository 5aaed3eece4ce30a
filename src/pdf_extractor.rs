/*!
 * PDF text extraction.
 *
 * `TextExtractor` is the seam to the parsing library. `LopdfExtractor` is the
 * production implementation; it reports encrypted documents through the
 * stable `ExtractionError::Protected` kind by looking at the trailer's
 * encryption dictionary instead of matching error messages in the caller.
 */

use log::debug;
use lopdf::{Document as PdfDocument, Object};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::document::PdfContent;
use crate::errors::ExtractionError;

/// Control characters other than newline and tab
static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x08\x0B-\x1F\x7F]").expect("control character pattern is valid")
});

/// Trailing spaces and tabs before a line break
static TRAILING_BLANKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+\n").expect("trailing blank pattern is valid"));

/// Converts PDF bytes into plain text
pub trait TextExtractor: Send + Sync {
    /// Extract the text, page count and metadata of a document
    fn extract(&self, bytes: &[u8]) -> Result<PdfContent, ExtractionError>;

    /// Whether the document needs a password to be read
    ///
    /// The default attempts an extraction and classifies the failure kind.
    fn is_protected(&self, bytes: &[u8]) -> bool {
        matches!(self.extract(bytes), Err(ExtractionError::Protected))
    }
}

/// Extractor backed by `lopdf`
#[derive(Debug, Default, Clone)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn load(bytes: &[u8]) -> Result<PdfDocument, ExtractionError> {
        let doc = PdfDocument::load_mem(bytes).map_err(|e| classify_load_error(&e.to_string()))?;
        if doc.is_encrypted() {
            return Err(ExtractionError::Protected);
        }
        Ok(doc)
    }

    fn read_metadata(doc: &PdfDocument) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();

        let info = doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|object| doc.dereference(object).ok())
            .and_then(|(_, object)| object.as_dict().ok());

        if let Some(info) = info {
            for (key, value) in info.iter() {
                if let Object::String(raw, _) = value {
                    metadata.insert(String::from_utf8_lossy(key).to_string(), decode_pdf_string(raw));
                }
            }
        }

        metadata
    }
}

impl TextExtractor for LopdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<PdfContent, ExtractionError> {
        let doc = Self::load(bytes)?;

        let pages = doc.get_pages();
        let page_count = pages.len();
        let mut page_texts = Vec::with_capacity(page_count);

        for page_number in pages.keys() {
            // A page that cannot be decoded contributes no text
            let text = doc.extract_text(&[*page_number]).unwrap_or_default();
            let text = sanitize_extracted_text(&text);
            if !text.is_empty() {
                page_texts.push(text);
            }
        }

        debug!("Extracted text from {} of {} pages", page_texts.len(), page_count);

        Ok(PdfContent {
            text: page_texts.join("\n\n"),
            page_count,
            metadata: Self::read_metadata(&doc),
        })
    }

    fn is_protected(&self, bytes: &[u8]) -> bool {
        matches!(Self::load(bytes), Err(ExtractionError::Protected))
    }
}

/// Map a parsing library failure onto a stable error kind
fn classify_load_error(message: &str) -> ExtractionError {
    let lowered = message.to_lowercase();
    if lowered.contains("password") || lowered.contains("encrypt") || lowered.contains("decrypt") {
        ExtractionError::Protected
    } else {
        ExtractionError::Malformed(message.to_string())
    }
}

/// Normalize line endings, drop control characters and trailing blanks
pub fn sanitize_extracted_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let cleaned = CONTROL_CHARS.replace_all(&normalized, "");
    let cleaned = TRAILING_BLANKS.replace_all(&cleaned, "\n");
    cleaned.trim().to_string()
}

/// Decode a PDF text string (UTF-16BE with BOM, otherwise byte text)
fn decode_pdf_string(raw: &[u8]) -> String {
    if raw.starts_with(&[0xFE, 0xFF]) {
        let units: Vec<u16> = raw[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(raw).to_string()
    }
}
