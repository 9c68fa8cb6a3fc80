use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

/// Why a single text-generation call produced no usable text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationFailure {
    #[error("text generation is not configured (missing API key)")]
    NotConfigured,
    #[error("text generation request failed: {0}")]
    Transport(String),
    #[error("text generation service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("text generation response could not be decoded: {0}")]
    MalformedBody(String),
    #[error("text generation response carried no content")]
    EmptyContent,
    #[error("text generation timed out after {0:?}")]
    TimedOut(Duration),
}

/// Result of one generation call. Failures are values so callers can recover
/// per request instead of aborting a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated(String),
    Failed(GenerationFailure),
}

impl GenerationOutcome {
    pub fn into_text(self) -> Result<String, GenerationFailure> {
        match self {
            GenerationOutcome::Generated(text) => Ok(text),
            GenerationOutcome::Failed(failure) => Err(failure),
        }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    async fn generate(&self, prompt: &str) -> GenerationOutcome;
}
