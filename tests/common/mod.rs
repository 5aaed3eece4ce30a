/*!
 * Common test utilities for the pdfsum test suite
 */

use anyhow::Result;
use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as PdfDocument, Object, Stream};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use pdfsum::clipboard::Clipboard;
use pdfsum::errors::{ClipboardError, SpeechError};
use pdfsum::speech::{SpeechEndCallback, SpeechEngine};


/// Route log output through env_logger; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Writes `content` to `filename` inside `dir`
pub fn create_test_file(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    std::fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a PDF with one page per entry; an empty entry gives a page without text
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    build_pdf_with_title(pages, None)
}

/// Builds a PDF, optionally with a `Title` in the information dictionary
pub fn build_pdf_with_title(pages: &[&str], title: Option<&str>) -> Vec<u8> {
    serialize(build_document(pages, title))
}

/// Builds a PDF whose trailer declares a Standard security handler.
///
/// The owner and user keys match no password, so readers need one to open it.
pub fn build_encrypted_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = build_document(pages, None);

    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "P" => -44,
        "O" => Object::string_literal(vec![0x5A_u8; 32]),
        "U" => Object::string_literal(vec![0xA5_u8; 32]),
    });
    doc.trailer.set("Encrypt", encrypt_id);
    let file_id = Object::string_literal(b"pdfsum-encrypted".to_vec());
    doc.trailer.set("ID", vec![file_id.clone(), file_id]);

    serialize(doc)
}

fn build_document(pages: &[&str], title: Option<&str>) -> PdfDocument {
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content stream encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    doc
}

fn serialize(mut doc: PdfDocument) -> Vec<u8> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("PDF serializes");
    buffer
}

/// Clipboard recording every write
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.writes.lock().push(text.to_string());
        Ok(())
    }
}

/// Clipboard that always fails
#[derive(Debug, Default)]
pub struct FailingClipboard;

#[async_trait]
impl Clipboard for FailingClipboard {
    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Command("clipboard is locked".to_string()))
    }
}

/// Speech engine that never plays anything; tests decide when playback ends
#[derive(Default)]
pub struct RecordingSpeechEngine {
    spoken: Mutex<Vec<String>>,
    pending: Mutex<Vec<SpeechEndCallback>>,
    cancels: Mutex<usize>,
    fail: bool,
}

impl RecordingSpeechEngine {
    /// An engine whose `speak` always fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }

    pub fn cancel_count(&self) -> usize {
        *self.cancels.lock()
    }

    /// Report natural completion of every utterance started so far
    pub fn finish_all(&self) {
        let callbacks: Vec<SpeechEndCallback> = self.pending.lock().drain(..).collect();
        for on_end in callbacks {
            on_end();
        }
    }
}

impl SpeechEngine for RecordingSpeechEngine {
    fn speak(&self, text: &str, on_end: SpeechEndCallback) -> Result<(), SpeechError> {
        if self.fail {
            return Err(SpeechError::Spawn("no synthesizer".to_string()));
        }
        self.spoken.lock().push(text.to_string());
        self.pending.lock().push(on_end);
        Ok(())
    }

    fn cancel(&self) {
        *self.cancels.lock() += 1;
    }
}
