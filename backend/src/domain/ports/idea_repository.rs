//! Driven port for idea and idea/plan link persistence.
//!
//! Every query is scoped to an owner: rows belonging to another user are
//! indistinguishable from missing rows.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Idea, SearchTerm, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by idea repository adapters.
    pub enum IdeaRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "idea repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "idea repository query failed: {message}",
        /// A referenced idea does not belong to the caller.
        NotOwned { idea_id: Uuid } =>
            "idea {idea_id} is not owned by the caller",
    }
}

/// Persistence contract for ideas.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdeaRepository: Send + Sync {
    /// Insert a new idea.
    async fn insert(&self, idea: &Idea) -> Result<(), IdeaRepositoryError>;

    /// Fetch one idea owned by `owner`.
    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Idea>, IdeaRepositoryError>;

    /// List ideas owned by `owner`, newest first, optionally filtered by a
    /// case-insensitive substring of title or content.
    async fn list_for_owner(
        &self,
        owner: &UserId,
        search: Option<SearchTerm>,
    ) -> Result<Vec<Idea>, IdeaRepositoryError>;

    /// Persist the mutable fields of `idea`. Returns `false` when no row
    /// with that id and owner exists.
    async fn update(&self, idea: &Idea) -> Result<bool, IdeaRepositoryError>;

    /// Delete an idea and its links. Returns `false` when nothing matched.
    async fn delete_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<bool, IdeaRepositoryError>;

    /// Atomically replace the plan links of one idea.
    ///
    /// Returns `false`, changing nothing, when the idea is missing or not
    /// owned by `owner`.
    async fn replace_idea_plans(
        &self,
        owner: &UserId,
        idea_id: Uuid,
        plan_ids: &[Uuid],
    ) -> Result<bool, IdeaRepositoryError>;

    /// Atomically replace the links between `plan_id` and the caller's ideas.
    ///
    /// Links to other users' ideas are left untouched. Fails with
    /// [`IdeaRepositoryError::NotOwned`], changing nothing, when any id is
    /// not an idea owned by `owner`.
    async fn replace_plan_ideas(
        &self,
        owner: &UserId,
        plan_id: Uuid,
        idea_ids: &[Uuid],
    ) -> Result<(), IdeaRepositoryError>;

    /// Ideas owned by `owner` that are linked to `plan_id`, newest first.
    async fn list_for_plan(
        &self,
        owner: &UserId,
        plan_id: Uuid,
    ) -> Result<Vec<Idea>, IdeaRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_owned_names_the_idea() {
        let idea_id = Uuid::nil();
        let err = IdeaRepositoryError::not_owned(idea_id);
        assert_eq!(
            err.to_string(),
            "idea 00000000-0000-0000-0000-000000000000 is not owned by the caller"
        );
    }

    #[tokio::test]
    async fn mock_repository_can_stand_in_for_adapters() {
        let mut repo = MockIdeaRepository::new();
        repo.expect_find_for_owner()
            .times(1)
            .return_once(|_, _| Ok(None));
        let found = repo
            .find_for_owner(&UserId::random(), Uuid::new_v4())
            .await
            .expect("lookup succeeds");
        assert!(found.is_none());
    }
}
