/*!
 * Summarization client.
 *
 * A thin request/response mapper: resolves the length tier to generation
 * bounds, forwards one request to the provider and returns the generated
 * text. Provider errors are passed through untouched and nothing is retried.
 */

use log::{debug, info};
use std::time::{Duration, Instant};

use crate::app_config::SummarizerConfig;
use crate::document::{ExtractedText, LengthTier, SummaryResult};
use crate::errors::SummarizationError;
use crate::providers::{Provider, SummarizationRequest, SummarizationResponse};

/// Client that turns extracted text into a summary through a provider
#[derive(Debug)]
pub struct SummarizationClient<P> {
    provider: P,
    model: String,
    timeout: Option<Duration>,
    wait_for_model: bool,
}

impl<P> SummarizationClient<P>
where
    P: Provider<Request = SummarizationRequest, Response = SummarizationResponse>,
{
    /// Create a client for `model` without a timeout
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            timeout: None,
            wait_for_model: false,
        }
    }

    /// Create a client from the summarizer configuration
    pub fn from_config(provider: P, config: &SummarizerConfig) -> Self {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        Self {
            provider,
            model: config.model.clone(),
            timeout,
            wait_for_model: config.wait_for_model,
        }
    }

    /// Bound the provider call; `None` waits indefinitely
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Build the request sent for `text` at `tier`
    pub fn build_request(&self, text: &ExtractedText, tier: LengthTier) -> SummarizationRequest {
        let (max_length, min_length) = tier.bounds();
        let request = SummarizationRequest::new(&self.model, text.as_str(), max_length, min_length);
        if self.wait_for_model {
            request.wait_for_model(true)
        } else {
            request
        }
    }

    /// Summarize `text` with the bounds of `tier`
    pub async fn summarize(&self, text: &ExtractedText, tier: LengthTier) -> Result<SummaryResult, SummarizationError> {
        let request = self.build_request(text, tier);
        debug!(
            "Summarizing {} chars with {} (tier {}, max {}, min {})",
            text.char_count(),
            self.model,
            tier,
            request.parameters.max_length,
            request.parameters.min_length
        );

        let started = Instant::now();
        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.provider.complete(request))
                .await
                .map_err(|_| SummarizationError::Timeout(limit.as_secs()))??,
            None => self.provider.complete(request).await?,
        };

        let summary = P::extract_text(&response);
        info!("Summary generated in {:.1}s", started.elapsed().as_secs_f64());

        Ok(SummaryResult::new(summary, tier))
    }
}
