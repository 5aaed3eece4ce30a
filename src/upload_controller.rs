/*!
 * Upload controller.
 *
 * Drives a single submitted file through
 * `Idle -> Checking -> (Rejected | Extracting) -> (Failed | Extracted)` and
 * returns to `Idle` afterwards. Each submission ends in exactly one error or
 * one extracted text; nothing partial is handed to the caller.
 */

use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::UploadConfig;
use crate::document::{Document, ExtractedText};
use crate::errors::{ExtractionError, UploadError};
use crate::pdf_extractor::TextExtractor;

/// Phase of the in-flight submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Checking,
    Rejected,
    Extracting,
    Failed,
    Extracted,
}

impl UploadState {
    /// Whether the state ends a submission
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Failed | Self::Extracted)
    }
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Checking => "checking",
            Self::Rejected => "rejected",
            Self::Extracting => "extracting",
            Self::Failed => "failed",
            Self::Extracted => "extracted",
        };
        f.write_str(name)
    }
}

/// Validates submitted files and extracts their text
pub struct UploadController {
    extractor: Arc<dyn TextExtractor>,
    max_file_size: usize,
    extraction_timeout: Option<Duration>,
    state: UploadState,
    last_terminal: Option<UploadState>,
}

impl UploadController {
    /// Create a controller with default limits
    pub fn new(extractor: Arc<dyn TextExtractor>) -> Self {
        Self::with_config(extractor, &UploadConfig::default())
    }

    /// Create a controller with the given limits
    pub fn with_config(extractor: Arc<dyn TextExtractor>, config: &UploadConfig) -> Self {
        Self {
            extractor,
            max_file_size: config.max_file_size,
            extraction_timeout: (config.extraction_timeout_secs > 0)
                .then(|| Duration::from_secs(config.extraction_timeout_secs)),
            state: UploadState::Idle,
            last_terminal: None,
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    /// Terminal state reached by the latest submission
    pub fn last_terminal_state(&self) -> Option<UploadState> {
        self.last_terminal
    }

    /// Process the first file of `files`; the rest of the batch is ignored
    pub async fn submit(&mut self, files: Vec<Document>) -> Result<ExtractedText, UploadError> {
        if self.state != UploadState::Idle {
            // Only reachable when a previous submit future was dropped mid-flight
            warn!("Previous submission abandoned while {}, starting over", self.state);
            self.transition(UploadState::Idle);
        }

        let batch_size = files.len();
        let Some(document) = files.into_iter().next() else {
            return Err(UploadError::NoFile);
        };
        if batch_size > 1 {
            warn!("Only one file is processed at a time, ignoring {} more", batch_size - 1);
        }

        self.transition(UploadState::Checking);
        let outcome = self.process(document).await;

        let terminal = match &outcome {
            Ok(_) => UploadState::Extracted,
            Err(UploadError::Protected) => UploadState::Rejected,
            Err(_) => UploadState::Failed,
        };
        self.transition(terminal);
        self.last_terminal = Some(terminal);
        self.transition(UploadState::Idle);

        outcome
    }

    async fn process(&mut self, document: Document) -> Result<ExtractedText, UploadError> {
        self.check(&document)?;

        let extractor = Arc::clone(&self.extractor);
        let content = document.content.clone();
        let protected = self
            .run_blocking(move || Ok(extractor.is_protected(&content)))
            .await?;
        if protected {
            info!("Rejected protected document {}", document.filename);
            return Err(UploadError::Protected);
        }

        self.transition(UploadState::Extracting);
        let extractor = Arc::clone(&self.extractor);
        let content = document.content;
        let extracted = self.run_blocking(move || extractor.extract(&content)).await?;

        info!(
            "Extracted {} chars from {} ({} pages)",
            extracted.text.len(),
            document.filename,
            extracted.page_count
        );

        ExtractedText::new(extracted.text).ok_or(UploadError::EmptyContent)
    }

    fn check(&self, document: &Document) -> Result<(), UploadError> {
        if !document.looks_like_pdf() {
            return Err(UploadError::UnsupportedFile(document.filename.clone()));
        }
        if document.len() > self.max_file_size {
            return Err(UploadError::FileTooLarge {
                size: document.len(),
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    async fn run_blocking<T, F>(&self, job: F) -> Result<T, UploadError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, ExtractionError> + Send + 'static,
    {
        let task = tokio::task::spawn_blocking(job);
        let joined = match self.extraction_timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| ExtractionError::TimedOut(limit.as_secs()))?,
            None => task.await,
        };
        let result = joined.map_err(|e| ExtractionError::Task(e.to_string()))?;
        Ok(result?)
    }

    fn transition(&mut self, next: UploadState) {
        debug!("Upload state: {} -> {}", self.state, next);
        self.state = next;
    }
}
