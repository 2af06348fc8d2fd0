//! Forwarded strategies for calendar, plan chat and publishing.
//!
//! Each adapter maps one port method onto one `/v1/...` call and names the
//! reason code reported when that call fails.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{ServiceCall, ServiceGateway};
use crate::domain::ports::{
    CalendarExportRequest, CalendarPort, CalendarSaveRequest, PlanChatPort, PlanChatRequest,
    PublishPort,
};
use crate::domain::{Actor, Error, ServiceOutcome};

/// Reason code for failed calendar saves.
pub const CALENDAR_SAVE_FAILED: &str = "calendar_save_failed";
/// Reason code for failed calendar exports.
pub const CALENDAR_EXPORT_FAILED: &str = "calendar_export_failed";
/// Reason code for failed plan chat turns.
pub const PLAN_CHAT_FAILED: &str = "plan_chat_failed";
/// Reason code for failed publishing.
pub const PUBLISH_FAILED: &str = "publish_failed";

/// Calendar operations served by the external service.
#[derive(Debug, Clone)]
pub struct ForwardedCalendar {
    gateway: Arc<ServiceGateway>,
}

impl ForwardedCalendar {
    /// Forward calendar calls through `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<ServiceGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl CalendarPort for ForwardedCalendar {
    async fn save(
        &self,
        actor: &Actor,
        request: CalendarSaveRequest,
    ) -> Result<ServiceOutcome, Error> {
        let call = ServiceCall::new(Method::POST, "/v1/calendar/save", CALENDAR_SAVE_FAILED)
            .with_body(&request)?;
        self.gateway.forward(call, actor.identity()).await
    }

    async fn export(
        &self,
        actor: &Actor,
        request: CalendarExportRequest,
    ) -> Result<ServiceOutcome, Error> {
        let call = ServiceCall::new(Method::POST, "/v1/calendar/export", CALENDAR_EXPORT_FAILED)
            .with_body(&request)?;
        self.gateway.forward(call, actor.identity()).await
    }
}

/// Plan chat served by the external service.
#[derive(Debug, Clone)]
pub struct ForwardedPlanChat {
    gateway: Arc<ServiceGateway>,
}

impl ForwardedPlanChat {
    /// Forward chat turns through `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<ServiceGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl PlanChatPort for ForwardedPlanChat {
    async fn chat(
        &self,
        actor: &Actor,
        plan_id: Uuid,
        request: PlanChatRequest,
    ) -> Result<ServiceOutcome, Error> {
        let call = ServiceCall::new(
            Method::POST,
            format!("/v1/plans/{plan_id}/chat"),
            PLAN_CHAT_FAILED,
        )
        .with_body(&request)?;
        self.gateway.forward(call, actor.identity()).await
    }
}

/// Publishing served by the external service.
#[derive(Debug, Clone)]
pub struct ForwardedPublish {
    gateway: Arc<ServiceGateway>,
}

impl ForwardedPublish {
    /// Forward publish requests through `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<ServiceGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl PublishPort for ForwardedPublish {
    async fn publish(
        &self,
        actor: &Actor,
        payload: Map<String, Value>,
    ) -> Result<ServiceOutcome, Error> {
        let call =
            ServiceCall::new(Method::POST, "/v1/publish", PUBLISH_FAILED).with_body(&payload)?;
        self.gateway.forward(call, actor.identity()).await
    }
}
