//! Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::error::GatewayError;

use super::gateway::{GenerationOptions, ModelGateway};
use super::response::clean_response;

/// Model used when neither the config file nor the environment names one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Public Gemini API endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gateway backed by the Gemini REST API.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingCredential`] when no API key is set.
    pub fn new(settings: &Settings) -> Result<Self, GatewayError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(GatewayError::MissingCredential)?
            .to_string();

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(GatewayError::ClientBuild)?;

        Ok(Self {
            client,
            api_key,
            model: settings.model.clone(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
            },
        };

        debug!(
            "Sending {} prompt chars to {} (temperature {})",
            prompt.len(),
            self.model,
            options.temperature
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(GatewayError::Request)?;

        let status = response.status();
        let response_text = response.text().await.map_err(GatewayError::Request)?;

        if !status.is_success() {
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: error_message(&response_text),
            });
        }

        parse_response(&response_text)
    }
}

/// Extract the generated text from a successful response body.
fn parse_response(body: &str) -> Result<String, GatewayError> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    let cleaned = clean_response(&text);
    if cleaned.is_empty() {
        return Err(GatewayError::EmptyResponse);
    }

    Ok(cleaned)
}

/// Service-provided error message, or the raw body when it is not JSON.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no error details".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}
