//! Plan handlers: idea links and plan chat.
//!
//! ```text
//! PUT  /api/v1/plans/{id}/ideas {"ideaIds":["..."]}
//! GET  /api/v1/plans/{id}/ideas
//! POST /api/v1/plans/{id}/chat {"message":"make it shorter"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::Actor;
use crate::domain::ports::PlanChatRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::respond::relay;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_uuid, parse_uuid_list,
};

const ID: FieldName = FieldName::new("id");
const IDEA_IDS: FieldName = FieldName::new("ideaIds");

/// Body for `PUT /api/v1/plans/{id}/ideas`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachIdeasRequest {
    /// Complete set of the caller's idea ids for this plan.
    pub idea_ids: Option<Vec<String>>,
}

/// Replace the caller's ideas linked to a plan.
#[put("/plans/{id}/ideas")]
pub async fn attach_ideas(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<String>,
    payload: web::Json<AttachIdeasRequest>,
) -> ApiResult<HttpResponse> {
    let plan_id = parse_uuid(&path, ID)?;
    let raw = payload
        .into_inner()
        .idea_ids
        .ok_or_else(|| missing_field_error(IDEA_IDS))?;
    let idea_ids = parse_uuid_list(&raw, IDEA_IDS)?;
    relay(state.ideas.attach_ideas(&actor, plan_id, idea_ids).await?)
}

/// List the caller's ideas linked to a plan.
#[get("/plans/{id}/ideas")]
pub async fn list_plan_ideas(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let plan_id = parse_uuid(&path, ID)?;
    relay(state.ideas.list_for_plan(&actor, plan_id).await?)
}

/// Send one chat turn for a plan.
#[post("/plans/{id}/chat")]
pub async fn plan_chat(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<String>,
    payload: web::Json<PlanChatRequest>,
) -> ApiResult<HttpResponse> {
    let plan_id = parse_uuid(&path, ID)?;
    relay(
        state
            .plan_chat
            .chat(&actor, plan_id, payload.into_inner())
            .await?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{local_state, read_json, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use uuid::Uuid;

    async fn call(req: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(local_state())
                .wrap(test_session_middleware())
                .service(
                    web::scope("/api/v1")
                        .service(attach_ideas)
                        .service(list_plan_ideas)
                        .service(plan_chat),
                ),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        (status, read_json(res).await)
    }

    #[actix_web::test]
    async fn disabled_chat_answers_without_reply() {
        let plan_id = Uuid::new_v4();
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/plans/{plan_id}/chat"))
            .set_json(json!({ "message": "tighten the intro" }));
        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            json!({ "status": "disabled", "planId": plan_id, "reply": null })
        );
    }

    #[actix_web::test]
    async fn missing_idea_ids_is_rejected() {
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/plans/{}/ideas", Uuid::new_v4()))
            .set_json(json!({}));
        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["details"],
            json!({ "field": "ideaIds", "code": "missing_field" })
        );
    }

    #[actix_web::test]
    async fn anonymous_plan_listing_is_unauthorised() {
        let req = test::TestRequest::get().uri(&format!("/api/v1/plans/{}/ideas", Uuid::new_v4()));
        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "unauthorized");
    }
}
