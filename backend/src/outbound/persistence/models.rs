//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{idea_plans, ideas};

/// Row struct for reading from the ideas table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ideas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IdeaRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating idea records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ideas)]
pub(crate) struct NewIdeaRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for the mutable idea columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = ideas)]
pub(crate) struct IdeaUpdate<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Insertable idea/plan link.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = idea_plans)]
pub(crate) struct NewIdeaPlanRow {
    pub idea_id: Uuid,
    pub plan_id: Uuid,
}
