use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::application::AnswerClient;
use crate::domain::{DomainError, NO_ANSWER_FALLBACK};

/// Default target: Gemini Pro through the public v1 endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1/models/gemini-pro:generateContent";
const API_KEY_HEADER: &str = "x-goog-api-key";
const API_KEY_PARAM: &str = "key";
const ANSWER_POINTER: &str = "/candidates/0/content/parts/0/text";

/// Where the API key travels on each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPlacement {
    /// `?key=<API_KEY>` appended to the endpoint URL.
    #[default]
    Query,
    /// `x-goog-api-key: <API_KEY>` request header.
    Header,
}

impl KeyPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyPlacement::Query => "query",
            KeyPlacement::Header => "header",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "query" | "param" => Some(KeyPlacement::Query),
            "header" => Some(KeyPlacement::Header),
            _ => None,
        }
    }
}

/// Connection settings for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub endpoint: String,
    pub key_placement: KeyPlacement,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("key_placement", &self.key_placement)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            key_placement: KeyPlacement::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_key_placement(mut self, key_placement: KeyPlacement) -> Self {
        self.key_placement = key_placement;
        self
    }
}

/// `generateContent` request payload.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn single(text: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
        }
    }
}

/// HTTP client for the Gemini `generateContent` endpoint.
///
/// Sends each question as a standalone single-part request and returns the
/// text of the first part of the first candidate. No timeout beyond the
/// reqwest default, no retries.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Pull the answer text out of a successful response body.
    ///
    /// Malformed JSON is an error; well-formed JSON without a usable answer
    /// yields [`NO_ANSWER_FALLBACK`].
    fn extract_answer(body: &[u8]) -> Result<String, DomainError> {
        let json: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| DomainError::parse(format!("GeminiClient: invalid response body: {e}")))?;

        match json.pointer(ANSWER_POINTER).and_then(|v| v.as_str()) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => {
                debug!("GeminiClient: response carried no answer text");
                Ok(NO_ANSWER_FALLBACK.to_string())
            }
        }
    }
}

#[async_trait]
impl AnswerClient for GeminiClient {
    async fn ask(&self, text: &str) -> Result<String, DomainError> {
        let request = GenerateRequest::single(text);

        let mut builder = self.client.post(&self.config.endpoint).json(&request);
        builder = match self.config.key_placement {
            KeyPlacement::Query => builder.query(&[(API_KEY_PARAM, self.config.api_key.as_str())]),
            KeyPlacement::Header => builder.header(API_KEY_HEADER, &self.config.api_key),
        };

        debug!("GeminiClient: POST {}", self.config.endpoint);

        let response = builder
            .send()
            .await
            .map_err(|e| DomainError::network(format!("GeminiClient: request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GeminiClient: API returned {status}: {body}");
            return Err(DomainError::transport(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::network(format!("GeminiClient: failed to read response: {}", e.without_url())))?;

        Self::extract_answer(&body)
    }
}
