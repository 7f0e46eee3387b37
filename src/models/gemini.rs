use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("GEMINI_API_KEY is not set; recommendations are unavailable")]
    MissingApiKey,
    #[error("Gemini request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Gemini response contained no text")]
    EmptyResponse,
}

/// Anything that turns a prompt into generated text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Text of the first candidate, parts joined in order.
    fn into_text(self) -> Option<String> {
        let parts = self
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()?
            .content?
            .parts?;

        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// Client for the Gemini `generateContent` endpoint.
///
/// A missing API key is accepted at construction and reported on first use.
/// The key travels in the `x-goog-api-key` header, never in the URL.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    endpoint: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("configured", &self.is_configured())
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::info!(model = %self.model, "requesting recommendations");
        let resp = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let data: GeminiResponse = resp.json().await.map_err(reqwest::Error::without_url)?;
        data.into_text().ok_or(GenerationError::EmptyResponse)
    }
}
