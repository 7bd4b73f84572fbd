//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lowercased.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        /// Argon2id PHC string; never leaves the persistence layer.
        password_hash -> Text,
        /// One of `client`, `technician`, `admin`.
        role -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    tickets (id) {
        id -> Uuid,
        title -> Text,
        description -> Text,
        /// One of `low`, `medium`, `high`.
        priority -> Varchar,
        /// One of `open`, `in_progress`, `closed`, `reopened`.
        status -> Varchar,
        created_by -> Uuid,
        assigned_to -> Nullable<Uuid>,
        due_date -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments cascade away with their ticket.
    comments (id) {
        id -> Uuid,
        ticket_id -> Uuid,
        author -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit log. `ticket_id` is deliberately not a foreign key
    /// so entries outlive the ticket they describe.
    activity_logs (id) {
        id -> Uuid,
        ticket_id -> Nullable<Uuid>,
        action -> Varchar,
        performed_by -> Uuid,
        metadata -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(comments -> tickets (ticket_id));

diesel::allow_tables_to_appear_in_same_query!(users, tickets, comments, activity_logs);
