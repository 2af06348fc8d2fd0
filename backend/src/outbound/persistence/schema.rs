//! Diesel table definitions for the PostgreSQL schema.
//!
//! The schema is owned by the wider application; these definitions must
//! match its migrations. `diesel print-schema` against a live database
//! regenerates them.

diesel::table! {
    /// User-owned content ideas.
    ideas (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Non-blank title, at most 200 characters.
        title -> Text,
        /// Free text body.
        content -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Many-to-many links between ideas and externally defined plans.
    idea_plans (idea_id, plan_id) {
        /// Linked idea.
        idea_id -> Uuid,
        /// Linked plan.
        plan_id -> Uuid,
    }
}

diesel::joinable!(idea_plans -> ideas (idea_id));

diesel::allow_tables_to_appear_in_same_query!(ideas, idea_plans);
