//! Gemini `generateContent` client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{LlmError, TextGenerator};
use crate::config::LlmConfig;
use crate::utils::HttpClient;

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

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
}

/// Largest page the model listing endpoint accepts
const MODEL_PAGE_SIZE: u32 = 1000;

/// Gemini REST client. Built once at startup and shared by all requests.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: HttpClient,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client. A missing key is accepted; calls then fail with
    /// [`LlmError::MissingApiKey`].
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: HttpClient::with_timeout(timeout)?,
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Self::new(
            config.api_key.clone(),
            &config.model,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.api_key.as_deref().ok_or(LlmError::MissingApiKey)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(LlmError::Api {
            status: status.as_u16(),
            body,
        })
    }

    fn extract_text(response: GenerateResponse) -> Result<String, LlmError> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::EmptyResponse(format!("prompt blocked ({})", reason)));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::EmptyResponse("no candidates returned".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(LlmError::EmptyResponse(format!(
                "candidate has no text (finish reason: {})",
                reason
            )));
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key()?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Calling generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(format!("Gemini request failed: {}", e)))?;

        let parsed: GenerateResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Gemini response: {}", e)))?;

        Self::extract_text(parsed)
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let api_key = self.api_key()?;
        let url = format!("{}/models", self.base_url);
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header("x-goog-api-key", api_key)
                .query(&[("pageSize", MODEL_PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| LlmError::Network(format!("Gemini model list failed: {}", e)))?;

            let list: ModelList = Self::check_status(response)
                .await?
                .json()
                .await
                .map_err(|e| LlmError::Parse(format!("Gemini model list: {}", e)))?;

            names.extend(list.models.into_iter().map(|m| m.name));
            match list.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(names)
    }
}
