use anyhow::Result;
use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, Credentials};
use crate::document::{Document, LengthTier, SummaryResult};
use crate::errors::{AppError, PipelineError, UploadError};
use crate::pdf_extractor::{LopdfExtractor, TextExtractor};
use crate::providers::huggingface::HuggingFace;
use crate::providers::{Provider, SummarizationRequest, SummarizationResponse};
use crate::summarization::SummarizationClient;
use crate::upload_controller::UploadController;

// @module: Application controller for one summarization session

/// Main application controller: one document at a time, one error message
pub struct Controller<P> {
    // @field: File checks and extraction
    uploader: UploadController,

    // @field: Hosted model access
    summarizer: SummarizationClient<P>,

    // @field: Message shown after the latest failure
    ui_error: Option<String>,
}

impl Controller<HuggingFace> {
    /// Create a controller talking to the configured inference endpoint
    ///
    /// The credential is read by the caller so a missing one fails first.
    pub fn with_credentials(config: &Config, credentials: &Credentials) -> Result<Self, AppError> {
        config.validate()?;
        let provider = HuggingFace::new(credentials.api_key(), config.summarizer.endpoint.clone());
        Ok(Self::with_parts(
            config,
            Arc::new(LopdfExtractor::new()),
            provider,
        ))
    }
}

impl<P> Controller<P>
where
    P: Provider<Request = SummarizationRequest, Response = SummarizationResponse>,
{
    // @method: Create a controller from its parts
    pub fn new(uploader: UploadController, summarizer: SummarizationClient<P>) -> Self {
        Self {
            uploader,
            summarizer,
            ui_error: None,
        }
    }

    /// Create a controller with the configured limits around `extractor` and `provider`
    pub fn with_parts(config: &Config, extractor: Arc<dyn TextExtractor>, provider: P) -> Self {
        Self::new(
            UploadController::with_config(extractor, &config.upload),
            SummarizationClient::from_config(provider, &config.summarizer),
        )
    }

    /// Message of the latest failure, cleared when a new attempt starts
    pub fn ui_error(&self) -> Option<&str> {
        self.ui_error.as_deref()
    }

    pub fn uploader(&self) -> &UploadController {
        &self.uploader
    }

    pub fn summarizer(&self) -> &SummarizationClient<P> {
        &self.summarizer
    }

    /// Extract and summarize the first of `documents`, keeping the failure kind
    pub async fn process(&mut self, documents: Vec<Document>, tier: LengthTier) -> Result<SummaryResult, PipelineError> {
        let text = self.uploader.submit(documents).await?;
        let summary = self.summarizer.summarize(&text, tier).await?;
        Ok(summary)
    }

    /// Run one attempt, recording its failure message in the session
    ///
    /// An empty batch is not an attempt and leaves the session untouched.
    pub async fn submit(&mut self, documents: Vec<Document>, tier: LengthTier) -> Option<SummaryResult> {
        if documents.is_empty() {
            return None;
        }

        self.ui_error = None;
        match self.process(documents, tier).await {
            Ok(summary) => Some(summary),
            Err(PipelineError::Upload(UploadError::NoFile)) => None,
            Err(e) => {
                let message = e.user_message();
                error!("{}", message);
                self.ui_error = Some(message);
                None
            }
        }
    }

    /// Read `path` and run one attempt on it
    pub async fn run(&mut self, path: &Path, tier: LengthTier) -> Result<SummaryResult, AppError> {
        let start_time = std::time::Instant::now();
        self.ui_error = None;

        let document = Document::from_path(path).map_err(|e| AppError::File(e.to_string()))?;
        info!("Summarizing {} ({} bytes, {} length)", document.filename, document.len(), tier);

        match self.process(vec![document], tier).await {
            Ok(summary) => {
                info!("Summary ready in {}", Self::format_duration(start_time.elapsed()));
                Ok(summary)
            }
            Err(e) => {
                let message = e.user_message();
                warn!("Summarization failed: {}", e);
                self.ui_error = Some(message);
                Err(e.into())
            }
        }
    }

    // @returns: Duration as a short human readable string
    pub fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;
        let millis = duration.subsec_millis();

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, millis)
        }
    }
}
