//! CompletionProvider implementation for GeminiClient.

use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::Value;
use tracing::debug;

use crate::streaming::response_events;
use crate::{ChatError, ChunkStream, Completion, CompletionProvider, CompletionRequest};

use super::client::{error_for_status, parse_response, parse_stream_chunk, GeminiClient};

impl GeminiClient {
    /// POST `body` and return the response if its status is 2xx.
    async fn post(&self, url: &str, body: &Value) -> Result<reqwest::Response, ChatError> {
        let response = self
            .authorize(self.http.post(url))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), &text));
        }
        Ok(response)
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    fn name(&self) -> &str {
        self.provider_name()
    }

    async fn generate(&self, request: &CompletionRequest<'_>) -> Result<Completion, ChatError> {
        let body = self.build_request_body(request);
        let url = self.api_url(request.model, false);

        debug!(
            provider = self.provider_name(),
            model = request.model,
            turns = request.turns.len(),
            "Gemini API request"
        );

        let response = self.post(&url, &body).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        let json: Value =
            serde_json::from_slice(&bytes).map_err(|e| ChatError::Parse(e.to_string()))?;

        parse_response(&json)
    }

    async fn generate_stream(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<ChunkStream, ChatError> {
        let body = self.build_request_body(request);
        let url = self.api_url(request.model, true);

        debug!(
            provider = self.provider_name(),
            model = request.model,
            turns = request.turns.len(),
            "Gemini API streaming request"
        );

        let response = self.post(&url, &body).await?;

        let chunks = response_events(response).map(|event| {
            let event = event?;
            let json: Value = serde_json::from_str(&event.data)
                .map_err(|e| ChatError::Parse(format!("invalid stream event: {e}")))?;
            parse_stream_chunk(&json)
        });

        Ok(chunks.boxed())
    }
}
