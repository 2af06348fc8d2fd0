//! AI generation passthrough.
//!
//! ```text
//! POST /api/v1/generate {"prompt":"Launch week teasers","type":"calendar"}
//! ```
//!
//! The prompt and the system instruction for `type` go to the configured
//! provider; the buffered text is returned as `data: {content, type}` with
//! `meta.provider` set.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{ContentKind, EnvelopeMeta, GenerationRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::respond::with_meta;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::generation_validation_error;

/// Body for `POST /api/v1/generate`.
#[derive(Debug, Deserialize, Serialize)]
pub struct GenerateRequest {
    /// User prompt; must not be blank.
    #[serde(default)]
    pub prompt: String,
    /// Content kind, `general` unless given.
    #[serde(rename = "type", default)]
    pub kind: ContentKind,
}

/// Payload of a successful generation.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Generated text.
    pub content: String,
    /// Content kind that was requested.
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

/// Generate text through the configured provider.
#[post("/generate")]
pub async fn generate(
    state: web::Data<HttpState>,
    payload: web::Json<GenerateRequest>,
) -> ApiResult<HttpResponse> {
    let GenerateRequest { prompt, kind } = payload.into_inner();
    let request =
        GenerationRequest::new(&prompt, kind).map_err(|err| generation_validation_error(&err))?;
    let generated = state.generator.generate(&request).await.map_err(|err| {
        warn!(error = %err, kind = err.kind(), "text generation failed");
        err
    })?;
    info!(kind = %kind, provider = %generated.provider, "generation completed");

    let mut meta = EnvelopeMeta::current().with_provider(generated.provider);
    if let Some(model) = generated.model {
        meta.extra.insert("model".to_owned(), Value::String(model));
    }
    Ok(with_meta(
        StatusCode::OK,
        GenerateResponse {
            content: generated.content,
            kind,
        },
        meta,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClientFlags;
    use crate::domain::GeneratedText;
    use crate::domain::ports::{MockTextGenerator, TextGenerationError};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{local_ports, read_json};
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;

    async fn call(generator: MockTextGenerator, body: Value) -> (StatusCode, Value) {
        let ports = HttpStatePorts {
            generator: Arc::new(generator),
            ..local_ports()
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::new(ports, ClientFlags::default())))
                .service(web::scope("/api/v1").service(generate)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/v1/generate")
            .set_json(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        let status = res.status();
        (status, read_json(res).await)
    }

    #[actix_web::test]
    async fn relays_generated_text_with_provider() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|req| req.kind() == ContentKind::Calendar && req.prompt() == "Launch week")
            .times(1)
            .return_once(|_| {
                Ok(GeneratedText {
                    content: "Mon: teaser".to_owned(),
                    provider: "openai".to_owned(),
                    model: Some("gpt-4o-mini".to_owned()),
                })
            });
        let (status, body) =
            call(generator, json!({ "prompt": "Launch week", "type": "calendar" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!({ "content": "Mon: teaser", "type": "calendar" }));
        assert_eq!(body["meta"]["provider"], "openai");
        assert_eq!(body["meta"]["model"], "gpt-4o-mini");
    }

    #[rstest]
    #[case(json!({ "prompt": "   " }))]
    #[case(json!({ "type": "idea" }))]
    #[actix_web::test]
    async fn blank_prompt_is_rejected_before_the_provider(#[case] body: Value) {
        let (status, body) = call(MockTextGenerator::new(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"]["field"], "prompt");
    }

    #[rstest]
    #[case(TextGenerationError::provider(429_u16, "rate limited"), StatusCode::TOO_MANY_REQUESTS)]
    #[case(TextGenerationError::decode("no choices"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(TextGenerationError::unavailable(), StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn provider_failures_map_to_statuses(
        #[case] err: TextGenerationError,
        #[case] expected: StatusCode,
    ) {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .return_once(move |_| Err(err));
        let (status, body) = call(generator, json!({ "prompt": "hi" })).await;
        assert_eq!(status, expected);
        assert_eq!(body["data"], Value::Null);
    }
}
