//! Chat model adapter — Gemini-backed reply generation
//!
//! Provides a `ChatBackend` trait with the production `GeminiChatClient`
//! implementation. The client translates stored history into Gemini turns
//! (stored `assistant` becomes model role `model`, stored `system` entries
//! are dropped), injects the assistant persona as the leading user turn,
//! and forces JSON output mode so every reply parses as a response
//! envelope.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;

use crate::models::{Message, Role};

/// Persona and mandatory envelope shapes, sent once per model call as the
/// first turn of the history.
pub const SYSTEM_PROMPT: &str = r#"You are CookBot, a friendly and knowledgeable cooking assistant. Your role is to help users with all things cooking-related.

Guidelines:
1. Always respond in a warm, encouraging, and helpful tone.
2. When a user asks for a recipe, you MUST format your entire response as a single, valid JSON object with this exact structure:
    {
      "type": "recipe",
      "title": "Recipe Name",
      "description": "Brief description",
      "ingredients": ["ingredient 1", "ingredient 2", ...],
      "instructions": ["step 1", "step 2", ...],
      "prep_time": "X minutes",
      "cook_time": "X minutes",
      "servings": "X servings"
    }
3. For general cooking questions that are NOT recipe requests, respond with a plain text message wrapped in a JSON object with this exact structure:
    {
      "type": "text",
      "content": "Your plain text response here."
    }
4. If a user's request is unclear, ask clarifying questions using the "text" JSON format.
5. Suggest alternatives for ingredients when appropriate using the "text" JSON format.
6. Include helpful cooking tips and techniques using the "text" JSON format.
7. Always encourage users to cook and try new things.

Remember: You're here to make cooking accessible and fun for everyone!"#;

// ============================================================================
// ChatBackend trait
// ============================================================================

/// Abstraction over reply generation.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Generate one assistant reply given the stored history and the new
    /// user message. Returns the raw model text.
    async fn generate(&self, history: &[Message], user_message: &str)
        -> Result<String, GenAiError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

/// Reply generation errors
#[derive(Error, Debug)]
pub enum GenAiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Model returned no candidates")]
    EmptyResponse,

    #[error("Missing API key")]
    MissingApiKey,

    #[error("All {attempts} retry attempts failed")]
    RetryExhausted { attempts: usize },
}

// ============================================================================
// Config types
// ============================================================================

/// Gemini chat client configuration. Generation parameters are fixed
/// service configuration, not per-request inputs.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub max_retries: usize,
    pub retry_delay_ms: u64,
}

impl GenAiConfig {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        let api_key = api_key
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .unwrap_or_default();

        Self {
            api_key,
            model,
            temperature: 0.7,
            top_p: 1.0,
            top_k: 1,
            max_output_tokens: 2048,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

// ============================================================================
// Gemini API structs (private)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    code: u16,
    message: String,
}

// ============================================================================
// GeminiChatClient
// ============================================================================

/// Gemini chat client — calls the `generateContent` API.
#[derive(Debug, Clone)]
pub struct GeminiChatClient {
    client: Client,
    config: GenAiConfig,
    base_url: String,
}

impl GeminiChatClient {
    pub fn new(config: GenAiConfig) -> Result<Self, GenAiError> {
        if config.api_key.is_empty() {
            return Err(GenAiError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            config,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        })
    }

    /// Create a client with a custom base URL (for testing / integration)
    pub fn with_base_url(config: GenAiConfig, base_url: String) -> Result<Self, GenAiError> {
        if config.api_key.is_empty() {
            return Err(GenAiError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Translate the stored transcript into Gemini turns: the persona
    /// leads as a synthetic user turn, stored `system` entries are
    /// dropped, and the new user message closes the sequence.
    fn build_contents(history: &[Message], user_message: &str) -> Vec<GeminiContent> {
        let mut contents = Vec::with_capacity(history.len() + 2);

        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: SYSTEM_PROMPT.to_string(),
            }],
        });

        for message in history {
            let role = match message.role {
                Role::System => continue,
                Role::Assistant => "model",
                Role::User => "user",
            };
            contents.push(GeminiContent {
                role: role.to_string(),
                parts: vec![GeminiPart {
                    text: message.content.clone(),
                }],
            });
        }

        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: user_message.to_string(),
            }],
        });

        contents
    }

    async fn generate_once(
        &self,
        history: &[Message],
        user_message: &str,
    ) -> Result<String, GenAiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.config.model, self.config.api_key
        );

        let request = GeminiRequest {
            contents: Self::build_contents(history, user_message),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
                max_output_tokens: self.config.max_output_tokens,
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let error_detail = serde_json::from_str::<GeminiErrorResponse>(&error_body)
                .ok()
                .and_then(|e| e.error);

            let (code, message) = error_detail
                .map(|e| (e.code, e.message))
                .unwrap_or((status.as_u16(), error_body));

            tracing::error!(code = code, message = %message, "Gemini API error");

            return Err(GenAiError::Api { code, message });
        }

        let gemini_response: GeminiResponse = response.json().await?;

        let candidate = gemini_response
            .candidates
            .into_iter()
            .next()
            .ok_or(GenAiError::EmptyResponse)?;

        if candidate.content.parts.is_empty() {
            return Err(GenAiError::EmptyResponse);
        }

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();

        Ok(text)
    }
}

#[async_trait]
impl ChatBackend for GeminiChatClient {
    async fn generate(
        &self,
        history: &[Message],
        user_message: &str,
    ) -> Result<String, GenAiError> {
        let retry_strategy = ExponentialBackoff::from_millis(self.config.retry_delay_ms)
            .max_delay(Duration::from_secs(10))
            .map(jitter)
            .take(self.config.max_retries);

        let result =
            Retry::spawn(retry_strategy, || self.generate_once(history, user_message)).await;

        match result {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::error!(
                    attempts = self.config.max_retries,
                    error = %e,
                    "All chat generation retry attempts failed"
                );
                Err(GenAiError::RetryExhausted {
                    attempts: self.config.max_retries,
                })
            }
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// ============================================================================
// TESTS
// ============================================================================
