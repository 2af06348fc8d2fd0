//! Forwarded strategy for the ideas capability.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use uuid::Uuid;

use super::{ServiceCall, ServiceGateway};
use crate::domain::ports::IdeasPort;
use crate::domain::{Actor, Error, IdeaDraft, IdeaPatch, SearchTerm, ServiceOutcome};

const IDEAS_CREATE_FAILED: &str = "ideas_create_failed";
const IDEAS_FETCH_FAILED: &str = "ideas_fetch_failed";
const IDEAS_LIST_FAILED: &str = "ideas_list_failed";
const IDEAS_UPDATE_FAILED: &str = "ideas_update_failed";
const IDEAS_DELETE_FAILED: &str = "ideas_delete_failed";
const IDEA_PLANS_ATTACH_FAILED: &str = "idea_plans_attach_failed";
const PLAN_IDEAS_ATTACH_FAILED: &str = "plan_ideas_attach_failed";
const PLAN_IDEAS_LIST_FAILED: &str = "plan_ideas_list_failed";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanIdsBody<'a> {
    plan_ids: &'a [Uuid],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdeaIdsBody<'a> {
    idea_ids: &'a [Uuid],
}

/// Ideas served by the external service under `/v1/ideas` and
/// `/v1/plans/{id}/ideas`.
#[derive(Debug, Clone)]
pub struct ForwardedIdeas {
    gateway: Arc<ServiceGateway>,
}

impl ForwardedIdeas {
    /// Forward idea calls through `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<ServiceGateway>) -> Self {
        Self { gateway }
    }

    async fn forward(&self, actor: &Actor, call: ServiceCall) -> Result<ServiceOutcome, Error> {
        self.gateway.forward(call, actor.identity()).await
    }
}

#[async_trait]
impl IdeasPort for ForwardedIdeas {
    async fn create(&self, actor: &Actor, draft: IdeaDraft) -> Result<ServiceOutcome, Error> {
        let call = ServiceCall::new(Method::POST, "/v1/ideas", IDEAS_CREATE_FAILED)
            .with_body(&draft)?;
        self.forward(actor, call).await
    }

    async fn fetch(&self, actor: &Actor, id: Uuid) -> Result<ServiceOutcome, Error> {
        let call = ServiceCall::new(Method::GET, format!("/v1/ideas/{id}"), IDEAS_FETCH_FAILED);
        self.forward(actor, call).await
    }

    async fn list(
        &self,
        actor: &Actor,
        search: Option<SearchTerm>,
    ) -> Result<ServiceOutcome, Error> {
        let mut call = ServiceCall::new(Method::GET, "/v1/ideas", IDEAS_LIST_FAILED);
        if let Some(term) = search {
            call = call.with_query("search", term.as_str());
        }
        self.forward(actor, call).await
    }

    async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: IdeaPatch,
    ) -> Result<ServiceOutcome, Error> {
        let call = ServiceCall::new(Method::PATCH, format!("/v1/ideas/{id}"), IDEAS_UPDATE_FAILED)
            .with_body(&patch)?;
        self.forward(actor, call).await
    }

    async fn delete(&self, actor: &Actor, id: Uuid) -> Result<ServiceOutcome, Error> {
        let call = ServiceCall::new(
            Method::DELETE,
            format!("/v1/ideas/{id}"),
            IDEAS_DELETE_FAILED,
        );
        self.forward(actor, call).await
    }

    async fn attach_plans(
        &self,
        actor: &Actor,
        idea_id: Uuid,
        plan_ids: Vec<Uuid>,
    ) -> Result<ServiceOutcome, Error> {
        let call = ServiceCall::new(
            Method::PUT,
            format!("/v1/ideas/{idea_id}/plans"),
            IDEA_PLANS_ATTACH_FAILED,
        )
        .with_body(&PlanIdsBody {
            plan_ids: &plan_ids,
        })?;
        self.forward(actor, call).await
    }

    async fn attach_ideas(
        &self,
        actor: &Actor,
        plan_id: Uuid,
        idea_ids: Vec<Uuid>,
    ) -> Result<ServiceOutcome, Error> {
        let call = ServiceCall::new(
            Method::PUT,
            format!("/v1/plans/{plan_id}/ideas"),
            PLAN_IDEAS_ATTACH_FAILED,
        )
        .with_body(&IdeaIdsBody {
            idea_ids: &idea_ids,
        })?;
        self.forward(actor, call).await
    }

    async fn list_for_plan(&self, actor: &Actor, plan_id: Uuid) -> Result<ServiceOutcome, Error> {
        let call = ServiceCall::new(
            Method::GET,
            format!("/v1/plans/{plan_id}/ideas"),
            PLAN_IDEAS_LIST_FAILED,
        );
        self.forward(actor, call).await
    }
}
