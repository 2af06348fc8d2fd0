//! Driven port for the generative-text provider.

use async_trait::async_trait;

use crate::domain::{Error, GeneratedText, GenerationRequest};

use super::define_port_error;

/// Reason code attached to provider failures.
pub const GENERATION_FAILED: &str = "generation_failed";

define_port_error! {
    /// Errors raised by text generation adapters.
    pub enum TextGenerationError {
        /// No provider is configured.
        Unavailable => "text generation is not configured",
        /// The provider answered with an error status.
        Provider { status: u16, message: String } =>
            "provider returned {status}: {message}",
        /// The provider response could not be decoded.
        Decode { message: String } => "malformed provider response: {message}",
        /// The provider could not be reached.
        Transport { message: String } => "provider unreachable: {message}",
    }
}

impl From<TextGenerationError> for Error {
    fn from(value: TextGenerationError) -> Self {
        match value {
            TextGenerationError::Unavailable => {
                Self::service_unavailable("text generation is not configured")
            }
            TextGenerationError::Provider { status, message } => Self::bad_gateway(message)
                .with_reason(GENERATION_FAILED)
                .with_upstream_status(status),
            TextGenerationError::Decode { message } => {
                Self::internal(format!("malformed provider response: {message}"))
            }
            TextGenerationError::Transport { message } => {
                Self::bad_gateway(format!("provider unreachable: {message}"))
                    .with_reason(GENERATION_FAILED)
            }
        }
    }
}

/// Produces text for a validated prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `request`. The full response is buffered.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedText, TextGenerationError>;
}

/// Generator used when no provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredTextGenerator;

#[async_trait]
impl TextGenerator for UnconfiguredTextGenerator {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GeneratedText, TextGenerationError> {
        Err(TextGenerationError::unavailable())
    }
}
