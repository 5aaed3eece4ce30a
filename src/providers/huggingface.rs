use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{Provider, SummarizationRequest, SummarizationResponse};

/// Default endpoint of the hosted Inference API
pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

/// Default summarization model
pub const DEFAULT_MODEL: &str = "facebook/bart-large-cnn";

/// Hugging Face client for the hosted Inference API
pub struct HuggingFace {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Base URL the model identifier is appended to
    endpoint: String,
}

/// Error body returned by the Inference API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// The API answers with a list of outputs; some deployments return one object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseBody {
    Many(Vec<SummarizationResponse>),
    One(SummarizationResponse),
}

impl HuggingFace {
    /// Create a new Hugging Face client
    ///
    /// An empty endpoint falls back to the public Inference API.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: if endpoint.is_empty() {
                DEFAULT_ENDPOINT.to_string()
            } else {
                endpoint
            },
        }
    }

    /// Create a client around a preconfigured HTTP client
    pub fn with_client(client: Client, api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            ..Self::new(api_key, endpoint)
        }
    }

    /// URL of the model's inference route
    pub fn model_url(&self, model: &str) -> Result<Url, ProviderError> {
        let base = format!("{}/", self.endpoint.trim_end_matches('/'));
        Url::parse(&base)
            .and_then(|url| url.join(model.trim_start_matches('/')))
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint URL '{}': {}", self.endpoint, e)))
    }

    fn map_status_error(status: StatusCode, body: &str) -> ProviderError {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
            _ => ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            },
        }
    }

    fn parse_body(body: &str) -> Result<SummarizationResponse, ProviderError> {
        let parsed = serde_json::from_str::<ResponseBody>(body)
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", e, body.chars().take(200).collect::<String>())))?;

        match parsed {
            ResponseBody::One(response) => Ok(response),
            ResponseBody::Many(responses) => responses
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::ParseError("Response contained no summary".to_string())),
        }
    }
}

impl fmt::Debug for HuggingFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFace")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Provider for HuggingFace {
    type Request = SummarizationRequest;
    type Response = SummarizationResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = self.model_url(&request.model)?;
        debug!("Sending summarization request to {} ({} chars)", url, request.inputs.len());

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!("Hugging Face API error ({}): {}", status, body);
            return Err(Self::map_status_error(status, &body));
        }

        Self::parse_body(&body)
    }

    fn extract_text(response: &Self::Response) -> String {
        response.summary_text.clone()
    }
}
