//! Driving port for conversational plan refinement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::domain::{Actor, Error, ServiceOutcome};

/// Chat turn sent against a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanChatRequest {
    /// User message.
    #[serde(default)]
    pub message: Option<String>,
    /// Remaining fields, forwarded untouched.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Plan chat capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanChatPort: Send + Sync {
    /// Send one chat turn for `plan_id`.
    async fn chat(
        &self,
        actor: &Actor,
        plan_id: Uuid,
        request: PlanChatRequest,
    ) -> Result<ServiceOutcome, Error>;
}

/// Local strategy: chat is unavailable and no reply is produced.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPlanChat;

#[async_trait]
impl PlanChatPort for DisabledPlanChat {
    async fn chat(
        &self,
        _actor: &Actor,
        plan_id: Uuid,
        _request: PlanChatRequest,
    ) -> Result<ServiceOutcome, Error> {
        Ok(ServiceOutcome::local(json!({
            "status": "disabled",
            "planId": plan_id,
            "reply": null,
        })))
    }
}
