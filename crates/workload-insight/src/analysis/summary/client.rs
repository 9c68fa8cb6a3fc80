use super::generator::{GenerationFailure, GenerationOutcome, TextGenerator};
use crate::config::SummaryConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, thiserror::Error)]
#[error("unable to build text generation client: {0}")]
pub struct GeneratorSetupError(#[from] reqwest::Error);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client used for member summaries.
pub struct HttpTextGenerator {
    client: reqwest::Client,
    settings: SummaryConfig,
}

impl HttpTextGenerator {
    pub fn new(settings: SummaryConfig) -> Result<Self, GeneratorSetupError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self { client, settings })
    }

    async fn request(&self, api_key: &str, prompt: &str) -> Result<String, GenerationFailure> {
        let body = ChatRequest {
            model: &self.settings.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.transport_failure(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationFailure::Status {
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        let raw = response
            .bytes()
            .await
            .map_err(|err| self.transport_failure(err))?;
        let parsed: ChatResponse = serde_json::from_slice(&raw)
            .map_err(|err| GenerationFailure::MalformedBody(err.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(GenerationFailure::EmptyContent)
    }

    fn transport_failure(&self, err: reqwest::Error) -> GenerationFailure {
        if err.is_timeout() {
            GenerationFailure::TimedOut(self.settings.request_timeout)
        } else {
            GenerationFailure::Transport(err.to_string())
        }
    }
}

impl fmt::Debug for HttpTextGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTextGenerator")
            .field("endpoint", &self.settings.endpoint)
            .field("model", &self.settings.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, prompt: &str) -> GenerationOutcome {
        let Some(api_key) = self.settings.api_key.as_deref().map(str::trim) else {
            return GenerationOutcome::Failed(GenerationFailure::NotConfigured);
        };
        if api_key.is_empty() {
            return GenerationOutcome::Failed(GenerationFailure::NotConfigured);
        }

        match self.request(api_key, prompt).await {
            Ok(text) => GenerationOutcome::Generated(text),
            Err(failure) => GenerationOutcome::Failed(failure),
        }
    }
}

fn truncate(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
