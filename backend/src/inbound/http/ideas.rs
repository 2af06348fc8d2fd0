//! Ideas API handlers.
//!
//! ```text
//! POST   /api/v1/ideas {"title":"Launch","content":"Teaser thread"}
//! GET    /api/v1/ideas?search=launch
//! GET    /api/v1/ideas/{id}
//! PATCH  /api/v1/ideas/{id} {"content":"..."}
//! DELETE /api/v1/ideas/{id}
//! PUT    /api/v1/ideas/{id}/plans {"planIds":["..."]}
//! ```
//!
//! Handlers validate input and delegate to [`IdeasPort`]; whether the port
//! talks to the local store or the external service is invisible here.
//!
//! [`IdeasPort`]: crate::domain::ports::IdeasPort

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Actor, IdeaDraft, IdeaPatch, SearchTerm};
use crate::inbound::http::ApiResult;
use crate::inbound::http::respond::relay;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, idea_validation_error, missing_field_error, parse_uuid, parse_uuid_list,
};

const ID: FieldName = FieldName::new("id");
const TITLE: FieldName = FieldName::new("title");
const PLAN_IDS: FieldName = FieldName::new("planIds");

/// Body for `POST /api/v1/ideas`.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateIdeaRequest {
    /// Required, non-blank.
    pub title: Option<String>,
    /// Optional free text; empty when omitted.
    pub content: Option<String>,
}

/// Body for `PATCH /api/v1/ideas/{id}`.
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateIdeaRequest {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement content.
    pub content: Option<String>,
}

/// Query for `GET /api/v1/ideas`.
#[derive(Debug, Deserialize)]
pub struct ListIdeasQuery {
    /// Case-insensitive substring matched against title or content.
    pub search: Option<String>,
}

/// Body for `PUT /api/v1/ideas/{id}/plans`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachPlansRequest {
    /// Complete set of plan ids; an empty list clears the links.
    pub plan_ids: Option<Vec<String>>,
}

/// Create an idea owned by the caller.
#[post("/ideas")]
pub async fn create_idea(
    state: web::Data<HttpState>,
    actor: Actor,
    payload: web::Json<CreateIdeaRequest>,
) -> ApiResult<HttpResponse> {
    let CreateIdeaRequest { title, content } = payload.into_inner();
    let title = title.ok_or_else(|| missing_field_error(TITLE))?;
    let draft = IdeaDraft::new(&title, content.unwrap_or_default())
        .map_err(|err| idea_validation_error(&err))?;
    relay(state.ideas.create(&actor, draft).await?)
}

/// List the caller's ideas, newest first.
#[get("/ideas")]
pub async fn list_ideas(
    state: web::Data<HttpState>,
    actor: Actor,
    query: web::Query<ListIdeasQuery>,
) -> ApiResult<HttpResponse> {
    let search = SearchTerm::parse(query.search.as_deref());
    relay(state.ideas.list(&actor, search).await?)
}

/// Fetch one idea.
#[get("/ideas/{id}")]
pub async fn get_idea(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, ID)?;
    relay(state.ideas.fetch(&actor, id).await?)
}

/// Partially update an idea.
#[patch("/ideas/{id}")]
pub async fn update_idea(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<String>,
    payload: web::Json<UpdateIdeaRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, ID)?;
    let UpdateIdeaRequest { title, content } = payload.into_inner();
    let patch =
        IdeaPatch::new(title.as_deref(), content).map_err(|err| idea_validation_error(&err))?;
    relay(state.ideas.update(&actor, id, patch).await?)
}

/// Delete an idea and its plan links.
#[delete("/ideas/{id}")]
pub async fn delete_idea(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, ID)?;
    relay(state.ideas.delete(&actor, id).await?)
}

/// Replace the plans linked to an idea.
#[put("/ideas/{id}/plans")]
pub async fn attach_plans(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<String>,
    payload: web::Json<AttachPlansRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, ID)?;
    let raw = payload
        .into_inner()
        .plan_ids
        .ok_or_else(|| missing_field_error(PLAN_IDS))?;
    let plan_ids = parse_uuid_list(&raw, PLAN_IDS)?;
    relay(state.ideas.attach_plans(&actor, id, plan_ids).await?)
}

#[cfg(test)]
mod tests {
    //! Handler-level validation; persistence behaviour lives in the service
    //! and integration tests.

    use super::*;
    use crate::domain::ports::MockIdeasPort;
    use crate::domain::{ServiceOutcome, UserId};
    use crate::inbound::http::test_utils::{local_ports, read_json, test_session_middleware};
    use crate::inbound::http::{extractors, state::HttpStatePorts};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use uuid::Uuid;

    fn state_with(ideas: MockIdeasPort) -> web::Data<HttpState> {
        let ports = HttpStatePorts {
            ideas: Arc::new(ideas),
            ..local_ports()
        };
        web::Data::new(HttpState::new(ports, crate::domain::ClientFlags::default()))
    }

    async fn call(ideas: MockIdeasPort, req: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(state_with(ideas))
                .wrap(test_session_middleware())
                .service(
                    web::scope("/api/v1")
                        .configure(extractors::configure)
                        .service(create_idea)
                        .service(list_ideas)
                        .service(get_idea)
                        .service(update_idea)
                        .service(delete_idea)
                        .service(attach_plans),
                ),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        (status, read_json(res).await)
    }

    #[rstest]
    #[case(json!({ "content": "x" }), "title", "missing_field")]
    #[case(json!({ "title": "   " }), "title", "blank")]
    #[case(json!({ "title": "a".repeat(201) }), "title", "too_long")]
    #[case(json!({ "title": "ok", "content": "a".repeat(20_001) }), "content", "too_long")]
    #[actix_web::test]
    async fn create_rejects_invalid_input(
        #[case] body: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let req = test::TestRequest::post().uri("/api/v1/ideas").set_json(body);
        let (status, body) = call(MockIdeasPort::new(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"], json!({ "field": field, "code": code }));
        assert_eq!(body["data"], Value::Null);
    }

    #[actix_web::test]
    async fn empty_patch_is_rejected() {
        let uri = format!("/api/v1/ideas/{}", Uuid::new_v4());
        let req = test::TestRequest::patch().uri(&uri).set_json(json!({}));
        let (status, body) = call(MockIdeasPort::new(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"]["code"], "empty_patch");
    }

    #[rstest]
    #[case(test::TestRequest::get().uri("/api/v1/ideas/not-a-uuid"))]
    #[case(test::TestRequest::delete().uri("/api/v1/ideas/42"))]
    #[actix_web::test]
    async fn malformed_ids_are_rejected(#[case] req: test::TestRequest) {
        let (status, body) = call(MockIdeasPort::new(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"], json!({ "field": "id", "code": "invalid_uuid" }));
    }

    #[actix_web::test]
    async fn malformed_plan_id_reports_index() {
        let uri = format!("/api/v1/ideas/{}/plans", Uuid::new_v4());
        let req = test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "planIds": [Uuid::new_v4(), "nope"] }));
        let (status, body) = call(MockIdeasPort::new(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"]["index"], 1);
    }

    #[actix_web::test]
    async fn list_passes_trimmed_search_term() {
        let mut ideas = MockIdeasPort::new();
        ideas
            .expect_list()
            .withf(|_, search| search.as_ref().map(SearchTerm::as_str) == Some("launch"))
            .times(1)
            .return_once(|_, _| Ok(ServiceOutcome::local(json!([]))));
        let req = test::TestRequest::get().uri("/api/v1/ideas?search=%20launch%20");
        let (status, body) = call(ideas, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[actix_web::test]
    async fn create_relays_port_status() {
        let mut ideas = MockIdeasPort::new();
        ideas
            .expect_create()
            .withf(|_, draft| draft.title() == "Launch" && draft.content().is_empty())
            .times(1)
            .return_once(|_, _| {
                Ok(ServiceOutcome::with_status(
                    201,
                    json!({ "id": Uuid::nil(), "user_id": UserId::random() }),
                ))
            });
        let req = test::TestRequest::post()
            .uri("/api/v1/ideas")
            .set_json(json!({ "title": " Launch " }));
        let (status, _) = call(ideas, req).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn local_store_requires_login() {
        let req = test::TestRequest::get().uri("/api/v1/ideas");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::new(
                    local_ports(),
                    crate::domain::ClientFlags::default(),
                )))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(list_ideas)),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(res).await;
        assert_eq!(body["error"]["message"], "login required");
    }
}
