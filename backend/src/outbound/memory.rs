//! Process-local `IdeaRepository` used when no database URL is configured.
//!
//! State lives behind one async `RwLock`; each mutation holds the write
//! guard for its whole check-then-write sequence, so link replacement is
//! atomic with respect to every other repository call.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{IdeaRepository, IdeaRepositoryError};
use crate::domain::{Idea, SearchTerm, UserId};

#[derive(Debug, Default)]
struct Store {
    ideas: HashMap<Uuid, Idea>,
    links: BTreeSet<(Uuid, Uuid)>,
}

impl Store {
    fn owned(&self, owner: &UserId, id: Uuid) -> Option<&Idea> {
        self.ideas.get(&id).filter(|idea| &idea.user_id == owner)
    }
}

/// In-memory idea store. Data is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryIdeaRepository {
    store: RwLock<Store>,
}

impl InMemoryIdeaRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut ideas: Vec<Idea>) -> Vec<Idea> {
    ideas.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    ideas
}

#[async_trait]
impl IdeaRepository for InMemoryIdeaRepository {
    async fn insert(&self, idea: &Idea) -> Result<(), IdeaRepositoryError> {
        let mut store = self.store.write().await;
        if store.ideas.contains_key(&idea.id) {
            return Err(IdeaRepositoryError::query(format!(
                "duplicate idea id {}",
                idea.id
            )));
        }
        store.ideas.insert(idea.id, idea.clone());
        Ok(())
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Idea>, IdeaRepositoryError> {
        let store = self.store.read().await;
        Ok(store.owned(owner, id).cloned())
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        search: Option<SearchTerm>,
    ) -> Result<Vec<Idea>, IdeaRepositoryError> {
        let store = self.store.read().await;
        let ideas = store
            .ideas
            .values()
            .filter(|idea| &idea.user_id == owner)
            .filter(|idea| search.as_ref().is_none_or(|term| idea.matches(term)))
            .cloned()
            .collect();
        Ok(newest_first(ideas))
    }

    async fn update(&self, idea: &Idea) -> Result<bool, IdeaRepositoryError> {
        let mut store = self.store.write().await;
        match store.ideas.get_mut(&idea.id) {
            Some(existing) if existing.user_id == idea.user_id => {
                existing.title.clone_from(&idea.title);
                existing.content.clone_from(&idea.content);
                existing.updated_at = idea.updated_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_for_owner(&self, owner: &UserId, id: Uuid) -> Result<bool, IdeaRepositoryError> {
        let mut store = self.store.write().await;
        if store.owned(owner, id).is_none() {
            return Ok(false);
        }
        store.ideas.remove(&id);
        store.links.retain(|(idea_id, _)| *idea_id != id);
        Ok(true)
    }

    async fn replace_idea_plans(
        &self,
        owner: &UserId,
        idea_id: Uuid,
        plan_ids: &[Uuid],
    ) -> Result<bool, IdeaRepositoryError> {
        let mut store = self.store.write().await;
        if store.owned(owner, idea_id).is_none() {
            return Ok(false);
        }
        store.links.retain(|(linked, _)| *linked != idea_id);
        store
            .links
            .extend(plan_ids.iter().map(|plan_id| (idea_id, *plan_id)));
        Ok(true)
    }

    async fn replace_plan_ideas(
        &self,
        owner: &UserId,
        plan_id: Uuid,
        idea_ids: &[Uuid],
    ) -> Result<(), IdeaRepositoryError> {
        let mut store = self.store.write().await;
        if let Some(unowned) = idea_ids
            .iter()
            .copied()
            .find(|id| store.owned(owner, *id).is_none())
        {
            return Err(IdeaRepositoryError::not_owned(unowned));
        }
        let Store { ideas, links } = &mut *store;
        links.retain(|(idea_id, linked_plan)| {
            *linked_plan != plan_id
                || ideas
                    .get(idea_id)
                    .is_some_and(|idea| &idea.user_id != owner)
        });
        links.extend(idea_ids.iter().map(|idea_id| (*idea_id, plan_id)));
        Ok(())
    }

    async fn list_for_plan(
        &self,
        owner: &UserId,
        plan_id: Uuid,
    ) -> Result<Vec<Idea>, IdeaRepositoryError> {
        let store = self.store.read().await;
        let ideas = store
            .links
            .iter()
            .filter(|(_, linked_plan)| *linked_plan == plan_id)
            .filter_map(|(idea_id, _)| store.owned(owner, *idea_id))
            .cloned()
            .collect();
        Ok(newest_first(ideas))
    }
}
