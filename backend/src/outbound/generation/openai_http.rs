//! Reqwest-backed adapter for OpenAI-compatible chat-completions providers.
//!
//! One buffered `POST {base}/chat/completions` per request; no streaming and
//! no retries.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{TextGenerationError, TextGenerator};
use crate::domain::{GeneratedText, GenerationRequest};

/// Provider name reported in envelope metadata.
pub const OPENAI_PROVIDER: &str = "openai";

/// Connection settings for the provider.
pub struct OpenAiSettings {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: Url,
    /// Bearer token; omitted from requests when absent.
    pub api_key: Option<Zeroizing<String>>,
    /// Model name sent with each request.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Text generator calling an OpenAI-compatible endpoint.
pub struct OpenAiTextGenerator {
    client: Client,
    endpoint: Url,
    api_key: Option<Zeroizing<String>>,
    model: String,
}

impl OpenAiTextGenerator {
    /// Build an adapter using a reqwest client with an explicit timeout.
    ///
    /// # Errors
    /// Returns [`TextGenerationError::Transport`] when the client cannot be
    /// constructed or the endpoint URL is invalid.
    pub fn new(settings: OpenAiSettings) -> Result<Self, TextGenerationError> {
        let OpenAiSettings {
            base_url,
            api_key,
            model,
            timeout,
        } = settings;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TextGenerationError::transport(err.to_string()))?;
        let base = base_url.as_str().trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/chat/completions"))
            .map_err(|err| TextGenerationError::transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedText, TextGenerationError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.kind().system_instruction(),
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt(),
                },
            ],
        };
        debug!(kind = %request.kind(), model = %self.model, "requesting completion");

        let mut builder = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.as_str());
        }
        let response = builder
            .send()
            .await
            .map_err(|err| TextGenerationError::transport(err.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| TextGenerationError::transport(err.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        parse_completion(bytes.as_ref())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TextGenerationError {
    let message = serde_json::from_slice::<ProviderErrorBody>(body).map_or_else(
        |_| format!("status {}", status.as_u16()),
        |parsed| parsed.error.message,
    );
    TextGenerationError::provider(status.as_u16(), message)
}

fn parse_completion(body: &[u8]) -> Result<GeneratedText, TextGenerationError> {
    let decoded: ChatCompletionResponse = serde_json::from_slice(body)
        .map_err(|err| TextGenerationError::decode(format!("invalid completion JSON: {err}")))?;
    let content = decoded
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| TextGenerationError::decode("completion has no message content"))?;
    Ok(GeneratedText {
        content,
        provider: OPENAI_PROVIDER.to_owned(),
        model: decoded.model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContentKind;
    use httpmock::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    fn generator(server: &MockServer, api_key: Option<&str>) -> OpenAiTextGenerator {
        OpenAiTextGenerator::new(OpenAiSettings {
            base_url: Url::parse(&server.base_url()).expect("base url"),
            api_key: api_key.map(|key| Zeroizing::new(key.to_owned())),
            model: "gpt-4o-mini".to_owned(),
            timeout: Duration::from_secs(2),
        })
        .expect("generator builds")
    }

    #[tokio::test]
    async fn sends_instruction_and_prompt() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer sk-test")
                    .json_body(json!({
                        "model": "gpt-4o-mini",
                        "messages": [
                            { "role": "system", "content": ContentKind::Idea.system_instruction() },
                            { "role": "user", "content": "coffee launch" }
                        ]
                    }));
                then.status(200).json_body(json!({
                    "id": "chatcmpl-1",
                    "model": "gpt-4o-mini",
                    "choices": [{
                        "index": 0,
                        "message": { "role": "assistant", "content": "Idea: latte art week" },
                        "finish_reason": "stop"
                    }]
                }));
            })
            .await;
        let request = GenerationRequest::new("coffee launch", ContentKind::Idea).expect("valid");
        let text = generator(&server, Some("sk-test"))
            .generate(&request)
            .await
            .expect("completion");
        mock.assert_async().await;
        assert_eq!(text.content, "Idea: latte art week");
        assert_eq!(text.provider, OPENAI_PROVIDER);
        assert_eq!(text.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[tokio::test]
    async fn provider_status_is_relayed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(429)
                    .json_body(json!({ "error": { "message": "Rate limit reached" } }));
            })
            .await;
        let request = GenerationRequest::new("hi", ContentKind::General).expect("valid");
        let err = generator(&server, None)
            .generate(&request)
            .await
            .expect_err("rate limited");
        assert_eq!(err, TextGenerationError::provider(429_u16, "Rate limit reached"));
    }

    #[rstest]
    #[case(br#"{"choices":[]}"#.as_slice())]
    #[case(br#"{"choices":[{"message":{"role":"assistant"}}]}"#.as_slice())]
    #[case(b"not json".as_slice())]
    fn malformed_completions_are_decode_errors(#[case] body: &[u8]) {
        let err = parse_completion(body).expect_err("malformed");
        assert!(matches!(err, TextGenerationError::Decode { .. }));
    }
}
