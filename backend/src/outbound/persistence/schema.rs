//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after a migration changes a table.

diesel::table! {
    /// Ticket Records, one per guest, keyed by the guest's identity id.
    tickets (id) {
        /// Owning guest's identity id.
        id -> Text,
        name -> Text,
        /// Lower-cased email; staff display names are looked up by it.
        email -> Text,
        /// Digits only.
        phone -> Text,
        /// Catalogue product code.
        product_type -> Text,
        message -> Text,
        /// `unhandled`, `in_progress` or `resolved`.
        status -> Text,
        /// Staff display name, or `unassigned`.
        assignee -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only staff comments on a ticket.
    ticket_comments (id) {
        id -> Int8,
        ticket_id -> Text,
        author_name -> Text,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Chat Threads, one per guest.
    chat_threads (guest_id) {
        guest_id -> Text,
        /// Denormalised guest name, set once when the thread is created.
        guest_display_name -> Nullable<Text>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only chat messages; `id` preserves append order.
    chat_messages (id) {
        id -> Int8,
        guest_id -> Text,
        sender_email -> Text,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(ticket_comments -> tickets (ticket_id));
diesel::joinable!(chat_messages -> chat_threads (guest_id));

diesel::allow_tables_to_appear_in_same_query!(tickets, ticket_comments, chat_threads, chat_messages);
