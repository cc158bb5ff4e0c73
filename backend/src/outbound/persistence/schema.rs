//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Directory users allowed to sign in.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        /// Unique, matched case-insensitively via `lower(email)`.
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One opaque token per user.
    auth_tokens (key) {
        /// 40 lowercase hex characters.
        key -> Varchar,
        /// Unique; cascades on user deletion.
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Support tickets.
    tickets (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        /// One of `new`, `open`, `pending`, `resolved`, `closed`.
        status -> Varchar,
        /// One of `low`, `medium`, `high`, `urgent`.
        priority -> Varchar,
        created_by_name -> Varchar,
        created_by_email -> Varchar,
        /// Set to NULL when the assignee is deleted.
        assigned_to -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        /// Insertion sequence; breaks `created_at` ties.
        seq -> Int8,
    }
}

diesel::table! {
    /// Append-only audit trail; rows cascade with their ticket.
    activities (id) {
        id -> Uuid,
        ticket_id -> Uuid,
        activity_type -> Varchar,
        message -> Text,
        created_by -> Varchar,
        created_at -> Timestamptz,
        /// Insertion sequence; breaks `created_at` ties.
        seq -> Int8,
    }
}

diesel::joinable!(activities -> tickets (ticket_id));
diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(tickets -> users (assigned_to));

diesel::allow_tables_to_appear_in_same_query!(activities, auth_tokens, tickets, users);
