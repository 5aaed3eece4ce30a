/*!
 * # pdfsum - PDF summaries from a hosted model
 *
 * A Rust library for summarizing PDF documents with a hosted inference API.
 *
 * ## Features
 *
 * - Extract text from PDF files, rejecting password protected documents
 * - Summarize the text with a hosted model (Hugging Face Inference API)
 * - Three summary lengths: short, medium and long
 * - Edit the summary before exporting it
 * - Export as plain text or HTML, copy to the clipboard
 * - Read the summary aloud through the platform's speech synthesizer
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Documents, extracted text, length tiers and summaries
 * - `pdf_extractor`: PDF text extraction
 * - `providers`: Client implementations for hosted models:
 *   - `providers::huggingface`: Hugging Face Inference API client
 *   - `providers::mock`: Scripted provider for tests
 * - `summarization`: Length-controlled summarization client
 * - `upload_controller`: File checks and extraction state machine
 * - `presenter`: Editing, export, copy and playback of the summary
 * - `clipboard` / `speech`: Platform integrations
 * - `app_controller`: Session controller tying the pipeline together
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod document;
pub mod file_utils;
pub mod pdf_extractor;
pub mod providers;
pub mod summarization;
pub mod upload_controller;
pub mod presenter;
pub mod clipboard;
pub mod speech;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, Credentials};
pub use app_controller::Controller;
pub use document::{Document, ExtractedText, LengthTier, PdfContent, SummaryResult};
pub use pdf_extractor::{LopdfExtractor, TextExtractor};
pub use presenter::{ExportArtifact, ExportFormat, SummaryPresenter};
pub use summarization::SummarizationClient;
pub use upload_controller::{UploadController, UploadState};
pub use errors::{
    AppError, ConfigurationError, ExtractionError, PipelineError, ProviderError, SummarizationError, UploadError,
};
