/// Content provider client — the single point of entry for all external
/// generation calls in VoiceForge.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// All generation traffic MUST go through this module. Retrying is NOT done
/// here — the pipeline's retry policy owns backoff and classification.
///
/// Model: gpt-3.5-turbo (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all generation calls in VoiceForge.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("provider returned empty content")]
    EmptyContent,
}

impl ProviderError {
    /// HTTP-like status carried by the failure, when one exists. The retry
    /// policy's classifier keys off this.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Http(e) => e.status().map(|s| s.as_u16()),
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::EmptyContent => None,
        }
    }
}

/// Generated text plus optional token-usage metadata.
#[derive(Debug, Clone)]
pub struct GeneratedText {
    pub content: String,
    pub total_tokens: Option<u32>,
}

/// The seam between the pipeline and the external provider. Carried in
/// `AppState` as `Arc<dyn ContentProvider>` so tests inject mocks.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<GeneratedText, ProviderError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The production provider: OpenAI chat completions over HTTPS.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl ContentProvider for OpenAiProvider {
    /// Makes a single call to the completions API. Failures carry the HTTP
    /// status so the retry policy can classify them.
    async fn generate(&self, system: &str, prompt: &str) -> Result<GeneratedText, ProviderError> {
        let request_body = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the structured error message
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(ProviderError::EmptyContent)?;

        let total_tokens = chat.usage.map(|u| u.total_tokens);
        debug!(tokens = ?total_tokens, "provider call succeeded");

        Ok(GeneratedText {
            content,
            total_tokens,
        })
    }
}
