//! Forwarded capabilities over the full app, against an httpmock upstream.

mod support;

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use httpmock::prelude::*;
use rstest::rstest;
use serde_json::json;
use url::Url;

use ireal_backend::domain::CapabilityFlags;
use ireal_backend::domain::ports::FIXTURE_USER_ID;
use ireal_backend::server::{AppDependencies, GatewayConfig, build_app};

use support::{app_deps, backend_config, login, send};

fn forwarded_deps(base_url: &str, capabilities: CapabilityFlags) -> AppDependencies {
    app_deps(backend_config(
        capabilities,
        Some(GatewayConfig {
            base_url: Url::parse(base_url).expect("base url"),
            timeout: Duration::from_secs(2),
        }),
        None,
    ))
}

fn publish_only() -> CapabilityFlags {
    CapabilityFlags {
        publish: true,
        ..CapabilityFlags::default()
    }
}

fn calendar_only() -> CapabilityFlags {
    CapabilityFlags {
        calendar: true,
        ..CapabilityFlags::default()
    }
}

#[rstest]
#[actix_web::test]
async fn disabled_calendar_export_echoes_without_calling_upstream() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|_when, then| {
            then.status(200);
        })
        .await;
    let app = test::init_service(build_app(forwarded_deps(&server.base_url(), publish_only()))).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/calendar/export")
            .set_json(json!({ "calendarId": "cal-1", "runId": "run-9" }))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({ "status": "disabled", "calendarId": "cal-1", "runId": "run-9", "format": "csv" })
    );
    upstream.assert_hits_async(0).await;
}

#[rstest]
#[actix_web::test]
async fn forwarded_export_carries_identity_and_correlation() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/calendar/export")
                .header("x-request-id", "req-launch-1")
                .header("x-user-id", FIXTURE_USER_ID.to_string())
                .json_body(json!({ "calendarId": "cal-1", "runId": null, "format": "ics" }));
            then.status(200).json_body(json!({
                "data": { "url": "https://files.example/cal-1.ics" },
                "meta": { "provider": "content-service" }
            }));
        })
        .await;
    let app = test::init_service(build_app(forwarded_deps(&server.base_url(), calendar_only()))).await;
    let cookie = login(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/calendar/export")
            .insert_header(("x-request-id", "req-launch-1"))
            .cookie(cookie)
            .set_json(json!({ "calendarId": "cal-1", "format": "ics" }))
            .to_request(),
    )
    .await;

    upstream.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "url": "https://files.example/cal-1.ics" }));
    assert_eq!(body["meta"]["provider"], "content-service");
    assert_eq!(body["meta"]["requestId"], "req-launch-1");
}

#[rstest]
#[actix_web::test]
async fn upstream_error_status_and_code_are_relayed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/publish");
            then.status(422).json_body(json!({
                "error": { "code": "channel_unknown", "message": "unknown channel" }
            }));
        })
        .await;
    let app = test::init_service(build_app(forwarded_deps(&server.base_url(), publish_only()))).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/publish")
            .set_json(json!({ "channel": "fax" }))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "channel_unknown");
    assert_eq!(body["error"]["message"], "unknown channel");
}

#[rstest]
#[actix_web::test]
async fn unreachable_upstream_is_a_bad_gateway() {
    // Port 9 (discard) is closed on test hosts.
    let app = test::init_service(build_app(forwarded_deps("http://127.0.0.1:9", publish_only()))).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/publish")
            .set_json(json!({ "channel": "blog" }))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "publish_failed");
}

#[rstest]
#[actix_web::test]
async fn forwarded_ideas_relay_upstream_status() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/ideas")
                .header("x-user-id", "visitor:v-42")
                .json_body(json!({ "title": "Launch", "content": "" }));
            then.status(201).json_body(json!({ "data": { "id": "remote-1", "title": "Launch" } }));
        })
        .await;
    let flags = CapabilityFlags {
        ideas: true,
        ..CapabilityFlags::default()
    };
    let app = test::init_service(build_app(forwarded_deps(&server.base_url(), flags))).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/ideas")
            .cookie(actix_web::cookie::Cookie::new("ireal_visitor", "v-42"))
            .set_json(json!({ "title": " Launch " }))
            .to_request(),
    )
    .await;

    upstream.assert_async().await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], "remote-1");
}

#[rstest]
#[case(204, None)]
#[case(200, Some(json!({ "data": null, "error": null })))]
#[actix_web::test]
async fn empty_upstream_success_still_yields_data(
    #[case] upstream_status: u16,
    #[case] upstream_body: Option<serde_json::Value>,
) {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/publish");
            let then = then.status(upstream_status);
            if let Some(body) = upstream_body {
                then.json_body(body);
            }
        })
        .await;
    let app = test::init_service(build_app(forwarded_deps(&server.base_url(), publish_only()))).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/publish")
            .set_json(json!({ "channel": "blog" }))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({}));
    assert_eq!(body["error"], serde_json::Value::Null);
    assert!(body["meta"]["requestId"].is_string());
}
