/*!
 * Error types for the pdfsum application.
 *
 * Each stage of the pipeline has its own error enum so that the session can
 * keep the failure kind up to the presentation boundary and pick the
 * user-facing message there.
 */

use thiserror::Error;

/// Message shown when a protected document is submitted
pub const PROTECTED_MESSAGE: &str = "Password protected PDFs are not supported";

/// Message shown when extraction succeeds but yields only whitespace
pub const EMPTY_CONTENT_MESSAGE: &str = "No text could be extracted from the PDF";

/// Message shown when the parsing library rejects the document
pub const EXTRACTION_FAILED_MESSAGE: &str = "Failed to extract text from PDF";

/// Fallback message for failures that carry no description
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process PDF";

/// Errors produced while turning PDF bytes into text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The byte stream is not a readable PDF
    #[error("Malformed PDF: {0}")]
    Malformed(String),

    /// The document is encrypted and needs a password
    #[error("PDF is password protected")]
    Protected,

    /// Extraction did not finish in time
    #[error("PDF extraction timed out after {0}s")]
    TimedOut(u64),

    /// The blocking extraction task could not be joined
    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur during summarization
#[derive(Error, Debug)]
pub enum SummarizationError {
    /// Error from the provider API, passed through untouched
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// The provider did not answer within the configured bound
    #[error("Summarization request timed out after {0}s")]
    Timeout(u64),
}

/// Errors in the process configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The API credential environment variable is unset or empty
    #[error("Missing API credential: set the {0} environment variable")]
    MissingCredential(String),

    /// A configuration value failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised by the upload controller for a submitted file
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadError {
    /// The submitted batch contained no file
    #[error("No file selected")]
    NoFile,

    /// The file is not a PDF
    #[error("Unsupported file: {0} is not a PDF")]
    UnsupportedFile(String),

    /// The file exceeds the configured size limit
    #[error("File is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge {
        /// Size of the submitted file
        size: usize,
        /// Configured limit
        limit: usize,
    },

    /// The document needs a password
    #[error("{}", PROTECTED_MESSAGE)]
    Protected,

    /// Extraction produced only whitespace
    #[error("{}", EMPTY_CONTENT_MESSAGE)]
    EmptyContent,

    /// The parsing library failed
    #[error("{0}")]
    Extraction(#[from] ExtractionError),
}

impl UploadError {
    /// Human readable message for the error state of the session
    pub fn user_message(&self) -> String {
        match self {
            Self::Protected => PROTECTED_MESSAGE.to_string(),
            Self::EmptyContent => EMPTY_CONTENT_MESSAGE.to_string(),
            Self::Extraction(ExtractionError::Protected) => PROTECTED_MESSAGE.to_string(),
            Self::Extraction(ExtractionError::Malformed(_)) => EXTRACTION_FAILED_MESSAGE.to_string(),
            other => {
                let message = other.to_string();
                if message.trim().is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    message
                }
            }
        }
    }
}

/// Failure of a full extraction + summarization run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The upload step failed
    #[error("{0}")]
    Upload(#[from] UploadError),

    /// The summarization step failed
    #[error("{0}")]
    Summarization(#[from] SummarizationError),
}

impl PipelineError {
    /// Message to show to the user; the error kind itself stays available
    pub fn user_message(&self) -> String {
        match self {
            Self::Upload(e) => e.user_message(),
            Self::Summarization(e) => {
                let message = e.to_string();
                if message.trim().is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    message
                }
            }
        }
    }
}

/// Clipboard write failures
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// No clipboard backend is configured
    #[error("No clipboard available")]
    Unavailable,

    /// The platform clipboard refused the write
    #[error("Clipboard write failed: {0}")]
    Command(String),
}

/// Speech playback failures
#[derive(Error, Debug)]
pub enum SpeechError {
    /// The speech program could not be started
    #[error("Failed to start speech synthesis: {0}")]
    Spawn(String),
}

/// Presenter misuse
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PresenterError {
    /// Text can only be changed in edit mode
    #[error("Summary is not in edit mode")]
    NotEditing,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Error from the extraction + summarization pipeline
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
