//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Snippets shared through the site.
    ///
    /// A row is live while `expires` is in the future; nothing deletes
    /// expired rows, reads filter them out instead.
    snippets (id) {
        /// Primary key assigned by the `SERIAL` sequence.
        id -> Int4,
        /// Title, at most 100 characters.
        title -> Varchar,
        /// Snippet body.
        content -> Text,
        /// Insertion time (UTC).
        created -> Timestamptz,
        /// Time after which the snippet is no longer shown (UTC).
        expires -> Timestamptz,
    }
}
