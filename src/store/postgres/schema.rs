//! Diesel schema shared by every `PostgreSQL` adapter.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique login name.
        #[max_length = 150]
        username -> Varchar,
        /// Unique email address.
        #[max_length = 254]
        email -> Varchar,
        /// PHC-encoded password hash.
        password_hash -> Text,
        /// Given name.
        #[max_length = 150]
        first_name -> Varchar,
        /// Family name.
        #[max_length = 150]
        last_name -> Varchar,
        /// Registration timestamp.
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// Digests of revoked bearer tokens.
    revoked_tokens (token_digest) {
        /// Lowercase hex SHA-256 digest.
        #[max_length = 64]
        token_digest -> Varchar,
        /// When the revoked token would have expired.
        expires_at -> Timestamptz,
    }
}

diesel::table! {
    /// Study groups.
    study_groups (id) {
        /// Group identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 200]
        name -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Course subject.
        #[max_length = 100]
        subject -> Varchar,
        /// Academic term.
        #[max_length = 50]
        semester -> Varchar,
        /// Unique eight-character invite code.
        #[max_length = 8]
        invite_code -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Latest activity timestamp.
        last_activity -> Timestamptz,
    }
}

diesel::table! {
    /// Group membership rows.
    group_memberships (user_id, group_id) {
        /// Member user.
        user_id -> Uuid,
        /// Group joined.
        group_id -> Uuid,
        /// `ADMIN` or `MEMBER`.
        #[max_length = 10]
        role -> Varchar,
        /// Join timestamp.
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// Group tasks.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning group.
        group_id -> Uuid,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Optional assignee.
        assigned_to -> Nullable<Uuid>,
        /// `TODO`, `IN_PROGRESS` or `DONE`.
        #[max_length = 20]
        status -> Varchar,
        /// Optional deadline.
        due_date -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Group messages.
    messages (id) {
        /// Message identifier.
        id -> Uuid,
        /// Owning group.
        group_id -> Uuid,
        /// Sending user.
        sender_id -> Uuid,
        /// Message body.
        content -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Shared read flag.
        is_read -> Bool,
    }
}

diesel::joinable!(group_memberships -> study_groups (group_id));
diesel::joinable!(group_memberships -> users (user_id));
diesel::joinable!(tasks -> study_groups (group_id));
diesel::joinable!(messages -> study_groups (group_id));
diesel::joinable!(messages -> users (sender_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    revoked_tokens,
    study_groups,
    group_memberships,
    tasks,
    messages,
);
