//! Driving port for idea operations.
//!
//! Handlers validate input into domain types before calling the port, so
//! the local and forwarded strategies receive identical, already-valid
//! requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Actor, Error, IdeaDraft, IdeaPatch, SearchTerm, ServiceOutcome};

/// Body returned after replacing an idea's plan links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaPlanLinks {
    /// Idea whose links were replaced.
    pub idea_id: Uuid,
    /// Plans now linked to the idea.
    pub plan_ids: Vec<Uuid>,
}

/// Body returned after replacing a plan's idea links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanIdeaLinks {
    /// Plan whose links were replaced.
    pub plan_id: Uuid,
    /// Ideas now linked to the plan.
    pub idea_ids: Vec<Uuid>,
}

/// Body returned after deleting an idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaDeleted {
    /// Deleted idea.
    pub id: Uuid,
    /// Always `true`.
    pub deleted: bool,
}

/// Idea CRUD and idea/plan link management.
///
/// Every operation returns a [`ServiceOutcome`] so forwarded replies keep
/// their upstream status and metadata.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdeasPort: Send + Sync {
    /// Create an idea owned by the caller.
    async fn create(&self, actor: &Actor, draft: IdeaDraft) -> Result<ServiceOutcome, Error>;

    /// Fetch one of the caller's ideas.
    async fn fetch(&self, actor: &Actor, id: Uuid) -> Result<ServiceOutcome, Error>;

    /// List the caller's ideas, newest first.
    async fn list(
        &self,
        actor: &Actor,
        search: Option<SearchTerm>,
    ) -> Result<ServiceOutcome, Error>;

    /// Partially update one of the caller's ideas.
    async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: IdeaPatch,
    ) -> Result<ServiceOutcome, Error>;

    /// Delete one of the caller's ideas.
    async fn delete(&self, actor: &Actor, id: Uuid) -> Result<ServiceOutcome, Error>;

    /// Replace the set of plans linked to an idea.
    async fn attach_plans(
        &self,
        actor: &Actor,
        idea_id: Uuid,
        plan_ids: Vec<Uuid>,
    ) -> Result<ServiceOutcome, Error>;

    /// Replace the set of the caller's ideas linked to a plan.
    async fn attach_ideas(
        &self,
        actor: &Actor,
        plan_id: Uuid,
        idea_ids: Vec<Uuid>,
    ) -> Result<ServiceOutcome, Error>;

    /// List the caller's ideas linked to a plan.
    async fn list_for_plan(&self, actor: &Actor, plan_id: Uuid) -> Result<ServiceOutcome, Error>;
}
