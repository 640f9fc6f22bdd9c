//! Client for the Gemini `generateContent` endpoint.

use crate::domain::GenerationError;
use crate::infra::app_config::AppConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sampling parameters sent with a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

/// One instruction plus its sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub prompt: String,
    pub params: SamplingParams,
}

/// Anything that can turn an instruction into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &TextRequest) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// First text part of the first candidate, trimmed; `None` when blank.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GenerationError> {
        Self::new(
            config.api_key().map(str::to_string),
            config.model.clone(),
            config.endpoint.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &TextRequest) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::Configuration)?;

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.params.temperature,
                top_p: request.params.top_p,
                max_output_tokens: request.params.max_output_tokens,
            },
        };

        log::debug!("POST {} ({} prompt chars)", self.url(), request.prompt.len());
        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(GenerationError::Transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                snippet.trim()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Transport(format!("decode response: {e}")))?;

        parsed.first_text().ok_or(GenerationError::EmptyResponse)
    }
}
