//! Local strategy for the ideas capability.
//!
//! Implements [`IdeasPort`] directly against an [`IdeaRepository`]. Every
//! operation requires an authenticated session and is scoped to the
//! session user's rows.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::ports::{
    IdeaDeleted, IdeaPlanLinks, IdeaRepository, IdeaRepositoryError, IdeasPort, PlanIdeaLinks,
};
use crate::domain::{
    Actor, Error, IdeaDraft, IdeaPatch, SearchTerm, ServiceOutcome, dedup_ids,
};

const IDEA_NOT_FOUND: &str = "idea not found";

/// Ideas service backed by the local relational store.
#[derive(Clone)]
pub struct LocalIdeasService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> LocalIdeasService<R> {
    /// Create a service over `repo`, stamping timestamps from `clock`.
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use ireal_backend::domain::LocalIdeasService;
    /// # use ireal_backend::outbound::memory::InMemoryIdeaRepository;
    /// # use mockable::DefaultClock;
    /// let service = LocalIdeasService::new(
    ///     Arc::new(InMemoryIdeaRepository::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

fn map_repository_error(err: IdeaRepositoryError) -> Error {
    let kind = err.kind();
    match err {
        IdeaRepositoryError::Connection { message } => {
            warn!(error = %message, kind, "idea repository unavailable");
            Error::service_unavailable("idea store unavailable")
        }
        IdeaRepositoryError::Query { message } => {
            error!(error = %message, kind, "idea repository query failed");
            Error::internal(format!("idea repository error: {message}"))
        }
        IdeaRepositoryError::NotOwned { idea_id } => {
            Error::forbidden("idea does not belong to the caller")
                .with_details(serde_json::json!({ "ideaId": idea_id }))
        }
    }
}

fn to_outcome<T: Serialize>(status: u16, body: &T) -> Result<ServiceOutcome, Error> {
    let data = serde_json::to_value(body)
        .map_err(|err| Error::internal(format!("failed to serialize response: {err}")))?;
    Ok(ServiceOutcome::with_status(status, data))
}

#[async_trait]
impl<R> IdeasPort for LocalIdeasService<R>
where
    R: IdeaRepository,
{
    async fn create(&self, actor: &Actor, draft: IdeaDraft) -> Result<ServiceOutcome, Error> {
        let owner = actor.require_user()?;
        let idea = draft.into_idea(owner.clone(), self.clock.utc());
        self.repo
            .insert(&idea)
            .await
            .map_err(map_repository_error)?;
        to_outcome(201, &idea)
    }

    async fn fetch(&self, actor: &Actor, id: Uuid) -> Result<ServiceOutcome, Error> {
        let owner = actor.require_user()?;
        let idea = self
            .repo
            .find_for_owner(owner, id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(IDEA_NOT_FOUND))?;
        to_outcome(200, &idea)
    }

    async fn list(
        &self,
        actor: &Actor,
        search: Option<SearchTerm>,
    ) -> Result<ServiceOutcome, Error> {
        let owner = actor.require_user()?;
        let ideas = self
            .repo
            .list_for_owner(owner, search)
            .await
            .map_err(map_repository_error)?;
        to_outcome(200, &ideas)
    }

    async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: IdeaPatch,
    ) -> Result<ServiceOutcome, Error> {
        let owner = actor.require_user()?;
        let current = self
            .repo
            .find_for_owner(owner, id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(IDEA_NOT_FOUND))?;
        let updated = current.patched(patch, self.clock.utc());
        let matched = self
            .repo
            .update(&updated)
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(Error::not_found(IDEA_NOT_FOUND));
        }
        to_outcome(200, &updated)
    }

    async fn delete(&self, actor: &Actor, id: Uuid) -> Result<ServiceOutcome, Error> {
        let owner = actor.require_user()?;
        let deleted = self
            .repo
            .delete_for_owner(owner, id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(Error::not_found(IDEA_NOT_FOUND));
        }
        to_outcome(200, &IdeaDeleted { id, deleted: true })
    }

    async fn attach_plans(
        &self,
        actor: &Actor,
        idea_id: Uuid,
        plan_ids: Vec<Uuid>,
    ) -> Result<ServiceOutcome, Error> {
        let owner = actor.require_user()?;
        let plan_ids = dedup_ids(plan_ids);
        let replaced = self
            .repo
            .replace_idea_plans(owner, idea_id, &plan_ids)
            .await
            .map_err(map_repository_error)?;
        if !replaced {
            return Err(Error::not_found(IDEA_NOT_FOUND));
        }
        to_outcome(200, &IdeaPlanLinks { idea_id, plan_ids })
    }

    async fn attach_ideas(
        &self,
        actor: &Actor,
        plan_id: Uuid,
        idea_ids: Vec<Uuid>,
    ) -> Result<ServiceOutcome, Error> {
        let owner = actor.require_user()?;
        let idea_ids = dedup_ids(idea_ids);
        self.repo
            .replace_plan_ideas(owner, plan_id, &idea_ids)
            .await
            .map_err(map_repository_error)?;
        to_outcome(200, &PlanIdeaLinks { plan_id, idea_ids })
    }

    async fn list_for_plan(&self, actor: &Actor, plan_id: Uuid) -> Result<ServiceOutcome, Error> {
        let owner = actor.require_user()?;
        let ideas = self
            .repo
            .list_for_plan(owner, plan_id)
            .await
            .map_err(map_repository_error)?;
        to_outcome(200, &ideas)
    }
}
