/*!
 * Provider implementations for hosted summarization models.
 *
 * This module contains the client implementations the summarization client
 * can delegate to:
 * - Hugging Face: hosted Inference API
 * - Mock: scripted responses for tests and offline runs
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all summarization providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the summarization client.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Generation bounds sent with a summarization request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizationParameters {
    /// Maximum length of the summary
    pub max_length: u32,
    /// Minimum length of the summary
    pub min_length: u32,
}

/// Inference options understood by hosted endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceOptions {
    /// Block until a cold model has been loaded instead of failing with 503
    pub wait_for_model: bool,
}

/// Summarization request for a hosted model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarizationRequest {
    /// Model identifier; part of the URL, not the body
    #[serde(skip)]
    pub model: String,

    /// Text to summarize
    pub inputs: String,

    /// Length bounds
    pub parameters: SummarizationParameters,

    /// Optional inference options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<InferenceOptions>,
}

impl SummarizationRequest {
    /// Create a new summarization request
    pub fn new(model: impl Into<String>, inputs: impl Into<String>, max_length: u32, min_length: u32) -> Self {
        Self {
            model: model.into(),
            inputs: inputs.into(),
            parameters: SummarizationParameters { max_length, min_length },
            options: None,
        }
    }

    /// Ask the endpoint to wait for a cold model
    pub fn wait_for_model(mut self, wait: bool) -> Self {
        self.options = Some(InferenceOptions { wait_for_model: wait });
        self
    }
}

/// Summarization response from a hosted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizationResponse {
    /// The generated summary
    pub summary_text: String,
}

pub mod huggingface;
pub mod mock;
