/*!
 * Summary presenter.
 *
 * Owns the summary currently shown to the user. The text can be edited in
 * place; copy, download and speech always operate on the edited copy.
 */

use anyhow::Result;
use log::{debug, info};
use parking_lot::Mutex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

use crate::clipboard::Clipboard;
use crate::document::SummaryResult;
use crate::errors::{ClipboardError, PresenterError, SpeechError};
use crate::file_utils::FileManager;
use crate::speech::SpeechEngine;

/// Heading of the HTML export
pub const HTML_HEADING: &str = "<h1>PDF Summary</h1>";

/// Receives the text when an edit is saved
pub type SaveCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Notified when playback ends on its own
pub type SpeechEndObserver = Arc<dyn Fn() + Send + Sync>;

/// Download formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Plain text, `summary.txt`
    Txt,
    /// HTML document saved as `summary.pdf`; the content is not a PDF
    Pdf,
    /// The same HTML document under its real extension
    Html,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Txt => "summary.txt",
            Self::Pdf => "summary.pdf",
            Self::Html => "summary.html",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Txt => "text/plain",
            Self::Pdf | Self::Html => "text/html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Txt => "txt",
            Self::Pdf => "pdf",
            Self::Html => "html",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "pdf" => Ok(Self::Pdf),
            "html" => Ok(Self::Html),
            _ => Err(anyhow::anyhow!("Invalid export format: {}", s)),
        }
    }
}

/// A file produced by `download`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl ExportArtifact {
    /// Content as text; exports are always UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).to_string()
    }

    /// Write the artifact into `dir` under its file name
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = FileManager::generate_output_path(dir, &self.file_name);
        FileManager::write_bytes(&path, &self.content)?;
        Ok(path)
    }
}

/// Speaking flag plus the id of the utterance it belongs to
struct SpeechState {
    utterance: u64,
    speaking: watch::Sender<bool>,
    on_end: Option<SpeechEndObserver>,
}

/// Holds, edits and exports the current summary
pub struct SummaryPresenter {
    current_text: String,
    editing: bool,
    on_save: Option<SaveCallback>,
    clipboard: Option<Arc<dyn Clipboard>>,
    speech_engine: Option<Arc<dyn SpeechEngine>>,
    speech: Arc<Mutex<SpeechState>>,
}

impl Default for SummaryPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryPresenter {
    /// Create an empty presenter without clipboard or speech
    pub fn new() -> Self {
        let (speaking, _) = watch::channel(false);
        Self {
            current_text: String::new(),
            editing: false,
            on_save: None,
            clipboard: None,
            speech_engine: None,
            speech: Arc::new(Mutex::new(SpeechState {
                utterance: 0,
                speaking,
                on_end: None,
            })),
        }
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn with_speech_engine(mut self, engine: Arc<dyn SpeechEngine>) -> Self {
        self.speech_engine = Some(engine);
        self
    }

    pub fn on_save<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_save = Some(Box::new(callback));
        self
    }

    pub fn on_speech_end<F>(self, observer: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.speech.lock().on_end = Some(Arc::new(observer));
        self
    }

    /// Show a new summary, discarding any unsaved edit
    pub fn show(&mut self, result: &SummaryResult) {
        self.current_text = result.text.clone();
    }

    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn toggle_edit(&mut self) -> bool {
        self.editing = !self.editing;
        self.editing
    }

    /// Replace the text; only allowed while editing
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), PresenterError> {
        if !self.editing {
            return Err(PresenterError::NotEditing);
        }
        self.current_text = text.into();
        Ok(())
    }

    /// Leave edit mode and hand the text to the save callback
    pub fn save(&mut self) {
        self.editing = false;
        if let Some(on_save) = &self.on_save {
            on_save(&self.current_text);
        }
    }

    /// Copy the text to the clipboard
    ///
    /// The error is for the caller to log; copying never blocks the user.
    pub async fn copy(&self) -> Result<(), ClipboardError> {
        let clipboard = self.clipboard.as_ref().ok_or(ClipboardError::Unavailable)?;
        clipboard.write_text(&self.current_text).await?;
        debug!("Summary copied to clipboard");
        Ok(())
    }

    /// Render the text in `format`
    pub fn download(&self, format: ExportFormat) -> ExportArtifact {
        let content = match format {
            ExportFormat::Txt => self.current_text.clone().into_bytes(),
            ExportFormat::Pdf => render_html(&self.current_text).into_bytes(),
            ExportFormat::Html => render_html(&escape_html(&self.current_text)).into_bytes(),
        };

        ExportArtifact {
            file_name: format.file_name().to_string(),
            mime_type: format.mime_type().to_string(),
            content,
        }
    }

    pub fn is_speaking(&self) -> bool {
        *self.speech.lock().speaking.borrow()
    }

    /// Receiver following the speaking flag
    pub fn speaking_updates(&self) -> watch::Receiver<bool> {
        self.speech.lock().speaking.subscribe()
    }

    /// Start speaking the text, or stop if already speaking
    ///
    /// Returns the new speaking state. Without a speech engine nothing happens.
    pub fn toggle_speech(&self) -> Result<bool, SpeechError> {
        let Some(engine) = &self.speech_engine else {
            return Ok(false);
        };

        let mut state = self.speech.lock();
        if *state.speaking.borrow() {
            state.utterance += 1;
            state.speaking.send_replace(false);
            drop(state);
            engine.cancel();
            info!("Speech cancelled");
            return Ok(false);
        }

        state.utterance += 1;
        let utterance = state.utterance;
        let shared = Arc::clone(&self.speech);
        let on_end = Box::new(move || {
            let observer = {
                let state = shared.lock();
                if state.utterance != utterance || !*state.speaking.borrow() {
                    return;
                }
                state.speaking.send_replace(false);
                state.on_end.clone()
            };
            if let Some(observer) = observer {
                observer();
            }
        });

        state.speaking.send_replace(true);
        // Released before starting, the engine may report the end right away
        drop(state);

        if let Err(e) = engine.speak(&self.current_text, on_end) {
            let state = self.speech.lock();
            if state.utterance == utterance {
                state.speaking.send_replace(false);
            }
            return Err(e);
        }
        Ok(true)
    }
}

impl Drop for SummaryPresenter {
    fn drop(&mut self) {
        if self.is_speaking() {
            if let Some(engine) = &self.speech_engine {
                engine.cancel();
            }
        }
    }
}

/// HTML document used by the `pdf` and `html` downloads.
///
/// `text` goes into the body as-is, apart from newlines becoming `<br>`.
pub fn render_html(text: &str) -> String {
    let body = text.replace('\n', "<br>");
    format!(
        r#"
        <html>
          <head>
            <style>
              body {{ font-family: Arial, sans-serif; margin: 40px; }}
              h1 {{ color: #333; }}
              p {{ line-height: 1.6; }}
            </style>
          </head>
          <body>
            {heading}
            <p>{body}</p>
          </body>
        </html>
      "#,
        heading = HTML_HEADING,
        body = body
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
