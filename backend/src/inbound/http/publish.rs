//! Publishing handler.
//!
//! ```text
//! POST /api/v1/publish {"channel":"blog","postId":"p1"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde_json::{Map, Value};

use crate::domain::Actor;
use crate::inbound::http::ApiResult;
use crate::inbound::http::respond::relay;
use crate::inbound::http::state::HttpState;

/// Publish an opaque payload.
#[post("/publish")]
pub async fn publish(
    state: web::Data<HttpState>,
    actor: Actor,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    relay(state.publish.publish(&actor, payload.into_inner()).await?)
}
