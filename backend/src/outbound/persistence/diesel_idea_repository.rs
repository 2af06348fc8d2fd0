//! PostgreSQL-backed `IdeaRepository` implementation using Diesel ORM.
//!
//! Link replacement runs in one transaction: the owning idea rows are locked
//! with `FOR UPDATE`, the old links deleted and the new ones inserted, so
//! concurrent attaches serialise and a failed insert leaves the old set.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{IdeaRepository, IdeaRepositoryError};
use crate::domain::{Idea, SearchTerm, UserId};

use super::models::{IdeaRow, IdeaUpdate, NewIdeaPlanRow, NewIdeaRow};
use super::pool::{DbPool, PoolError};
use super::schema::{idea_plans, ideas};

/// Diesel-backed implementation of the `IdeaRepository` port.
#[derive(Clone)]
pub struct DieselIdeaRepository {
    pool: DbPool,
}

impl DieselIdeaRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a link-replacement transaction.
#[derive(Debug)]
enum LinkTxError {
    Diesel(diesel::result::Error),
    NotOwned(Uuid),
}

impl From<diesel::result::Error> for LinkTxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn map_pool_error(error: PoolError) -> IdeaRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            IdeaRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> IdeaRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    debug!(%error, "diesel operation failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            IdeaRepositoryError::connection(info.message().to_owned())
        }
        other => IdeaRepositoryError::query(other.to_string()),
    }
}

fn map_link_error(error: LinkTxError) -> IdeaRepositoryError {
    match error {
        LinkTxError::Diesel(err) => map_diesel_error(err),
        LinkTxError::NotOwned(idea_id) => IdeaRepositoryError::not_owned(idea_id),
    }
}

fn row_to_idea(row: IdeaRow) -> Idea {
    Idea {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        title: row.title,
        content: row.content,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn link_rows(idea_id: Uuid, plan_ids: &[Uuid]) -> Vec<NewIdeaPlanRow> {
    plan_ids
        .iter()
        .map(|plan_id| NewIdeaPlanRow {
            idea_id,
            plan_id: *plan_id,
        })
        .collect()
}

/// First id in `requested` that is not in `owned`.
fn first_unowned(requested: &[Uuid], owned: &[Uuid]) -> Option<Uuid> {
    requested.iter().copied().find(|id| !owned.contains(id))
}

#[async_trait]
impl IdeaRepository for DieselIdeaRepository {
    async fn insert(&self, idea: &Idea) -> Result<(), IdeaRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        diesel::insert_into(ideas::table)
            .values(NewIdeaRow {
                id: idea.id,
                user_id: *idea.user_id.as_uuid(),
                title: &idea.title,
                content: &idea.content,
                created_at: idea.created_at,
                updated_at: idea.updated_at,
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Idea>, IdeaRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let row: Option<IdeaRow> = ideas::table
            .filter(ideas::id.eq(id).and(ideas::user_id.eq(owner.as_uuid())))
            .select(IdeaRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_idea))
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        search: Option<SearchTerm>,
    ) -> Result<Vec<Idea>, IdeaRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let mut query = ideas::table
            .filter(ideas::user_id.eq(owner.as_uuid()))
            .select(IdeaRow::as_select())
            .into_boxed();
        if let Some(term) = search {
            let pattern = term.like_pattern();
            query = query.filter(
                ideas::title
                    .ilike(pattern.clone())
                    .or(ideas::content.ilike(pattern)),
            );
        }
        let rows: Vec<IdeaRow> = query
            .order_by((ideas::created_at.desc(), ideas::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_idea).collect())
    }

    async fn update(&self, idea: &Idea) -> Result<bool, IdeaRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            ideas::table.filter(
                ideas::id
                    .eq(idea.id)
                    .and(ideas::user_id.eq(idea.user_id.as_uuid())),
            ),
        )
        .set(IdeaUpdate {
            title: &idea.title,
            content: &idea.content,
            updated_at: idea.updated_at,
        })
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_for_owner(&self, owner: &UserId, id: Uuid) -> Result<bool, IdeaRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let owned = ideas::table
                    .filter(ideas::id.eq(id).and(ideas::user_id.eq(owner)))
                    .select(ideas::id)
                    .for_update()
                    .first::<Uuid>(conn)
                    .await
                    .optional()?;
                if owned.is_none() {
                    return Ok(false);
                }
                diesel::delete(idea_plans::table.filter(idea_plans::idea_id.eq(id)))
                    .execute(conn)
                    .await?;
                let deleted = diesel::delete(ideas::table.filter(ideas::id.eq(id)))
                    .execute(conn)
                    .await?;
                Ok(deleted > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn replace_idea_plans(
        &self,
        owner: &UserId,
        idea_id: Uuid,
        plan_ids: &[Uuid],
    ) -> Result<bool, IdeaRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        let rows = link_rows(idea_id, plan_ids);
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let owned = ideas::table
                    .filter(ideas::id.eq(idea_id).and(ideas::user_id.eq(owner)))
                    .select(ideas::id)
                    .for_update()
                    .first::<Uuid>(conn)
                    .await
                    .optional()?;
                if owned.is_none() {
                    return Ok(false);
                }
                diesel::delete(idea_plans::table.filter(idea_plans::idea_id.eq(idea_id)))
                    .execute(conn)
                    .await?;
                if !rows.is_empty() {
                    diesel::insert_into(idea_plans::table)
                        .values(&rows)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                }
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn replace_plan_ideas(
        &self,
        owner: &UserId,
        plan_id: Uuid,
        idea_ids: &[Uuid],
    ) -> Result<(), IdeaRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        conn.transaction::<_, LinkTxError, _>(|conn| {
            async move {
                // Lock every idea the caller owns so concurrent replaces for
                // this owner run one after another.
                let owned: Vec<Uuid> = ideas::table
                    .filter(ideas::user_id.eq(owner))
                    .select(ideas::id)
                    .for_update()
                    .load(conn)
                    .await?;
                if let Some(idea_id) = first_unowned(idea_ids, &owned) {
                    return Err(LinkTxError::NotOwned(idea_id));
                }
                diesel::delete(
                    idea_plans::table
                        .filter(idea_plans::plan_id.eq(plan_id))
                        .filter(idea_plans::idea_id.eq_any(&owned)),
                )
                .execute(conn)
                .await?;
                let rows: Vec<NewIdeaPlanRow> = idea_ids
                    .iter()
                    .map(|idea_id| NewIdeaPlanRow {
                        idea_id: *idea_id,
                        plan_id,
                    })
                    .collect();
                if !rows.is_empty() {
                    diesel::insert_into(idea_plans::table)
                        .values(&rows)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_link_error)
    }

    async fn list_for_plan(
        &self,
        owner: &UserId,
        plan_id: Uuid,
    ) -> Result<Vec<Idea>, IdeaRepositoryError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        let rows: Vec<IdeaRow> = ideas::table
            .inner_join(idea_plans::table)
            .filter(idea_plans::plan_id.eq(plan_id))
            .filter(ideas::user_id.eq(owner.as_uuid()))
            .select(IdeaRow::as_select())
            .order_by((ideas::created_at.desc(), ideas::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_idea).collect())
    }
}
