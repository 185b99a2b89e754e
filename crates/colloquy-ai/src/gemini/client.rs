//! Gemini client struct, request building, and response parsing.

use colloquy_common::GenerationConfig;
use serde_json::{json, Map, Value};

use crate::{ChatError, Completion, CompletionRequest, FinishReason, StreamChunk, TokenUsage};

use super::config::{GeminiConfig, GeminiEndpoint};

/// Candidate finish reasons that mean the response was withheld.
const SAFETY_FINISH_REASONS: &[&str] = &["SAFETY", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ChatError> {
        // No total timeout: a long stream is bounded by the session's
        // timeout, not the HTTP client's.
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ChatError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub(crate) fn provider_name(&self) -> &'static str {
        match self.config.endpoint {
            GeminiEndpoint::GoogleAi { .. } => "gemini",
            GeminiEndpoint::VertexAi { .. } => "vertex-ai",
        }
    }

    pub(crate) fn api_url(&self, model: &str, stream: bool) -> String {
        let method = if stream {
            "streamGenerateContent?alt=sse"
        } else {
            "generateContent"
        };
        let base = self.config.base_url();
        match &self.config.endpoint {
            GeminiEndpoint::GoogleAi { .. } => format!("{base}/models/{model}:{method}"),
            GeminiEndpoint::VertexAi {
                project, region, ..
            } => format!(
                "{base}/projects/{project}/locations/{region}/publishers/google/models/{model}:{method}"
            ),
        }
    }

    /// Attach the endpoint's credentials to a request.
    pub(crate) fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.endpoint {
            GeminiEndpoint::GoogleAi { api_key } => builder.header("x-goog-api-key", api_key),
            GeminiEndpoint::VertexAi { access_token, .. } => builder.bearer_auth(access_token),
        }
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(&self, request: &CompletionRequest<'_>) -> Value {
        let contents: Vec<Value> = request
            .turns
            .iter()
            .map(|turn| {
                let parts: Vec<Value> = turn.parts().iter().map(|p| json!({ "text": p })).collect();
                json!({ "role": turn.role().as_str(), "parts": parts })
            })
            .collect();

        let mut body = json!({ "contents": contents });

        let generation = generation_config_json(request.generation);
        if !generation.is_empty() {
            body["generationConfig"] = Value::Object(generation);
        }

        if !request.safety.is_empty() {
            let settings: Vec<Value> = request
                .safety
                .settings()
                .map(|s| {
                    json!({
                        "category": s.category.wire_name(),
                        "threshold": s.threshold.wire_name(),
                    })
                })
                .collect();
            body["safetySettings"] = Value::Array(settings);
        }

        body
    }
}

/// `generationConfig` object with the API's camelCase keys. Unset fields
/// are left out so the model defaults apply.
pub(crate) fn generation_config_json(config: &GenerationConfig) -> Map<String, Value> {
    let mut map = Map::new();
    if let Some(t) = config.temperature {
        map.insert("temperature".into(), json!(t));
    }
    if let Some(p) = config.top_p {
        map.insert("topP".into(), json!(p));
    }
    if let Some(k) = config.top_k {
        map.insert("topK".into(), json!(k));
    }
    if let Some(max) = config.max_output_tokens {
        map.insert("maxOutputTokens".into(), json!(max));
    }
    if let Some(mime) = &config.response_mime_type {
        map.insert("responseMimeType".into(), json!(mime));
    }
    if !config.stop_sequences.is_empty() {
        map.insert("stopSequences".into(), json!(config.stop_sequences));
    }
    map
}

/// Parse a `generateContent` response.
pub(crate) fn parse_response(json: &Value) -> Result<Completion, ChatError> {
    if let Some(err) = embedded_error(json) {
        return Err(err);
    }
    if let Some(reason) = block_reason(json) {
        return Err(ChatError::Blocked(reason));
    }

    let first = json["candidates"]
        .as_array()
        .and_then(|c| c.first())
        .ok_or_else(|| ChatError::Parse("no candidates in response".to_string()))?;

    Ok(Completion {
        text: candidate_text(first),
        finish_reason: first["finishReason"].as_str().map(FinishReason::from_wire),
        usage: usage(json).unwrap_or_default(),
    })
}

/// Parse one event of a `streamGenerateContent` response. Events that
/// carry only usage metadata yield an empty chunk.
pub(crate) fn parse_stream_chunk(json: &Value) -> Result<StreamChunk, ChatError> {
    if let Some(err) = embedded_error(json) {
        return Err(err);
    }
    if let Some(reason) = block_reason(json) {
        return Err(ChatError::Blocked(reason));
    }

    let first = json["candidates"].as_array().and_then(|c| c.first());
    Ok(StreamChunk {
        text: first.map(candidate_text).unwrap_or_default(),
        finish_reason: first
            .and_then(|c| c["finishReason"].as_str())
            .map(FinishReason::from_wire),
        usage: usage(json),
    })
}

/// Map a non-2xx response to the error taxonomy.
pub(crate) fn error_for_status(status: u16, body: &str) -> ChatError {
    let message = error_message(body);
    match status {
        401 | 403 => ChatError::Auth(message),
        429 => ChatError::RateLimited(message),
        // Google AI answers a bad key with 400 rather than 401.
        400 if body.contains("API_KEY_INVALID") => ChatError::Auth(message),
        _ => ChatError::Api { status, message },
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Errors delivered inside a 200 body, as mid-stream failures are.
fn embedded_error(json: &Value) -> Option<ChatError> {
    let error = json.get("error")?;
    let message = error["message"].as_str().unwrap_or("unknown error").to_string();
    let status = error["code"]
        .as_u64()
        .and_then(|c| u16::try_from(c).ok())
        .unwrap_or(500);
    Some(match status {
        401 | 403 => ChatError::Auth(message),
        429 => ChatError::RateLimited(message),
        _ => ChatError::Api { status, message },
    })
}

fn block_reason(json: &Value) -> Option<String> {
    if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
        return Some(reason.to_string());
    }
    json["candidates"]
        .as_array()?
        .iter()
        .filter_map(|c| c["finishReason"].as_str())
        .find(|r| SAFETY_FINISH_REASONS.contains(r))
        .map(str::to_string)
}

fn candidate_text(candidate: &Value) -> String {
    candidate["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default()
}

fn usage(json: &Value) -> Option<TokenUsage> {
    let meta = json.get("usageMetadata")?;
    Some(TokenUsage {
        input_tokens: meta["promptTokenCount"].as_u64().unwrap_or(0),
        output_tokens: meta["candidatesTokenCount"].as_u64().unwrap_or(0),
    })
}
