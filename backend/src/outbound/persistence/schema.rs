//! Diesel table definitions for the marketplace schema.
//!
//! These definitions must match `migrations/` exactly. When a migration
//! changes a table, update the matching block here (or regenerate it with
//! `diesel print-schema` against a migrated database).

diesel::table! {
    /// Registered accounts. Soft-deleted rows keep their history.
    users (id) {
        id -> Uuid,
        /// Unique (case-insensitive) among active accounts.
        email -> Varchar,
        username -> Varchar,
        /// PHC-formatted Argon2 hash.
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Seeded role names: listener, artist, admin.
    roles (id) {
        id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    user_roles (user_id, role_id) {
        user_id -> Uuid,
        role_id -> Uuid,
    }
}

diesel::table! {
    /// Artist profiles, one per user.
    artists (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        verified -> Bool,
        wallet_balance -> Int8,
        monthly_listeners -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    genres (id) {
        id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    albums (id) {
        id -> Uuid,
        title -> Varchar,
        artist_id -> Uuid,
        genre_id -> Nullable<Uuid>,
        description -> Nullable<Text>,
        /// Minor currency units.
        price -> Int8,
        cover_image_url -> Nullable<Text>,
        is_flagged -> Bool,
        release_date -> Nullable<Date>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    songs (id) {
        id -> Uuid,
        title -> Varchar,
        artist_id -> Uuid,
        album_id -> Nullable<Uuid>,
        genre_id -> Nullable<Uuid>,
        duration_seconds -> Int4,
        /// Minor currency units.
        price -> Int8,
        audio_url -> Nullable<Text>,
        preview_url -> Nullable<Text>,
        plays_count -> Int8,
        is_flagged -> Bool,
        release_date -> Nullable<Date>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Artist credits on songs and albums.
    contributors (item_kind, item_id, artist_id, contribution_type) {
        item_kind -> Varchar,
        item_id -> Uuid,
        artist_id -> Uuid,
        contribution_type -> Varchar,
        royalty_percentage -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Purchase ledger; `(user_id, item_kind, item_id)` is unique.
    purchases (id) {
        id -> Uuid,
        user_id -> Uuid,
        item_kind -> Varchar,
        item_id -> Uuid,
        price -> Int8,
        currency -> Varchar,
        payment_status -> Varchar,
        transaction_reference -> Nullable<Varchar>,
        purchased_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only play events.
    streams (id) {
        id -> Uuid,
        song_id -> Uuid,
        user_id -> Nullable<Uuid>,
        is_preview -> Bool,
        device_type -> Nullable<Varchar>,
        country_code -> Nullable<Varchar>,
        streamed_at -> Timestamptz,
    }
}

diesel::table! {
    artist_tips (id) {
        id -> Uuid,
        sender_id -> Uuid,
        artist_id -> Uuid,
        amount -> Int8,
        currency -> Varchar,
        message -> Nullable<Varchar>,
        payment_status -> Varchar,
        transaction_reference -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per artist and calendar month.
    monthly_royalties (id) {
        id -> Uuid,
        artist_id -> Uuid,
        year -> Int4,
        month -> Int4,
        amount -> Int8,
        currency -> Varchar,
        paid_status -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    content_flags (id) {
        id -> Uuid,
        reporter_id -> Uuid,
        target_kind -> Varchar,
        target_id -> Uuid,
        reason -> Varchar,
        description -> Nullable<Text>,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    playlists (id) {
        id -> Uuid,
        owner_id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        is_public -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Ordered playlist membership; positions start at zero.
    playlist_songs (playlist_id, song_id) {
        playlist_id -> Uuid,
        song_id -> Uuid,
        position -> Int4,
        added_at -> Timestamptz,
    }
}

diesel::joinable!(user_roles -> roles (role_id));
diesel::joinable!(playlist_songs -> songs (song_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    roles,
    user_roles,
    artists,
    genres,
    albums,
    songs,
    contributors,
    purchases,
    streams,
    artist_tips,
    monthly_royalties,
    content_flags,
    playlists,
    playlist_songs,
);
