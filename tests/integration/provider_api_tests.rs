/*!
 * Integration tests for the Hugging Face client against a local server
 */

use anyhow::Result;

use pdfsum::document::{ExtractedText, LengthTier};
use pdfsum::errors::{ProviderError, SummarizationError};
use pdfsum::providers::huggingface::HuggingFace;
use pdfsum::providers::{Provider, SummarizationRequest};
use pdfsum::summarization::SummarizationClient;

use crate::common::fake_api;

/// Client that talks to the local server directly, ignoring proxy settings
fn local_client(api_key: &str, endpoint: impl Into<String>) -> HuggingFace {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    HuggingFace::with_client(http, api_key, endpoint)
}

#[tokio::test]
async fn test_complete_withListResponse_shouldSendBearerAndBounds() -> Result<()> {
    let (endpoint, server) = fake_api::serve_once(200, r#"[{"summary_text":"Hello."}]"#).await;
    let client = local_client("hf_test_key", endpoint);

    let response = client
        .complete(SummarizationRequest::new("facebook/bart-large-cnn", "Hello world", 150, 90))
        .await?;
    assert_eq!(response.summary_text, "Hello.");

    let request = server.await?;
    assert_eq!(request.request_line, "POST /models/facebook/bart-large-cnn HTTP/1.1");
    assert_eq!(request.header("authorization"), Some("Bearer hf_test_key"));

    let body = request.json();
    assert_eq!(body["inputs"], "Hello world");
    assert_eq!(body["parameters"]["max_length"], 150);
    assert_eq!(body["parameters"]["min_length"], 90);
    assert!(body.get("options").is_none());

    Ok(())
}

#[tokio::test]
async fn test_complete_withSingleObjectResponse_shouldParse() -> Result<()> {
    let (endpoint, _server) = fake_api::serve_once(200, r#"{"summary_text":"One object."}"#).await;
    let client = local_client("key", endpoint);

    let response = client.complete(SummarizationRequest::new("m", "text", 250, 150)).await?;

    assert_eq!(HuggingFace::extract_text(&response), "One object.");
    Ok(())
}

#[tokio::test]
async fn test_complete_withUnauthorized_shouldReturnAuthenticationError() {
    let (endpoint, _server) = fake_api::serve_once(401, r#"{"error":"Invalid credentials in Authorization header"}"#).await;
    let client = local_client("bad", endpoint);

    let error = client
        .complete(SummarizationRequest::new("m", "text", 150, 90))
        .await
        .unwrap_err();

    match error {
        ProviderError::AuthenticationError(message) => assert!(message.contains("Invalid credentials")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_complete_withRateLimit_shouldReturnRateLimitError() {
    let (endpoint, _server) = fake_api::serve_once(429, r#"{"error":"Rate limit reached"}"#).await;
    let client = local_client("key", endpoint);

    let error = client
        .complete(SummarizationRequest::new("m", "text", 150, 90))
        .await
        .unwrap_err();

    assert!(matches!(error, ProviderError::RateLimitExceeded(_)));
}

#[tokio::test]
async fn test_complete_withLoadingModel_shouldReturnApiErrorWithStatus() {
    let (endpoint, _server) =
        fake_api::serve_once(503, r#"{"error":"Model facebook/bart-large-cnn is currently loading","estimated_time":20.0}"#).await;
    let client = local_client("key", endpoint);

    let error = client
        .complete(SummarizationRequest::new("facebook/bart-large-cnn", "text", 150, 90))
        .await
        .unwrap_err();

    match error {
        ProviderError::ApiError { status_code, message } => {
            assert_eq!(status_code, 503);
            assert!(message.contains("currently loading"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_complete_withEmptyList_shouldReturnParseError() {
    let (endpoint, _server) = fake_api::serve_once(200, "[]").await;
    let client = local_client("key", endpoint);

    let error = client
        .complete(SummarizationRequest::new("m", "text", 150, 90))
        .await
        .unwrap_err();

    assert!(matches!(error, ProviderError::ParseError(_)));
}

#[tokio::test]
async fn test_complete_withNothingListening_shouldReturnConnectionError() {
    // Bind and release a port so nothing answers on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let client = local_client("key", format!("http://{}/models", address));
    let error = client
        .complete(SummarizationRequest::new("m", "text", 150, 90))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ProviderError::ConnectionError(_) | ProviderError::RequestFailed(_)
    ));
}

#[tokio::test]
async fn test_summarizationClient_overHttp_shouldSendWaitOptionAndReturnSummary() -> Result<()> {
    let (endpoint, server) = fake_api::serve_once(200, r#"[{"summary_text":"A long summary."}]"#).await;
    let config = pdfsum::app_config::SummarizerConfig {
        endpoint: endpoint.clone(),
        wait_for_model: true,
        ..Default::default()
    };
    let client = SummarizationClient::from_config(local_client("key", endpoint), &config);

    let text = ExtractedText::new("Body of the document").unwrap();
    let result = client.summarize(&text, LengthTier::Long).await?;
    assert_eq!(result.text, "A long summary.");
    assert_eq!(result.tier, LengthTier::Long);

    let body = server.await?.json();
    assert_eq!(body["parameters"]["max_length"], 400);
    assert_eq!(body["parameters"]["min_length"], 240);
    assert_eq!(body["options"]["wait_for_model"], true);
    Ok(())
}

#[tokio::test]
async fn test_summarizationClient_overHttp_shouldPassProviderErrorThrough() {
    let (endpoint, _server) = fake_api::serve_once(500, "internal failure").await;
    let client = SummarizationClient::new(local_client("key", endpoint), "m");

    let text = ExtractedText::new("Body").unwrap();
    let error = client.summarize(&text, LengthTier::Short).await.unwrap_err();

    assert!(matches!(
        error,
        SummarizationError::Provider(ProviderError::ApiError { status_code: 500, .. })
    ));
}
