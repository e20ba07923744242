//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every API route is registered by [`configure_api`] and mounted under
//! `/api/v1`. Health checks are registered separately at the root.

use actix_web::web;

pub mod accounts;
pub mod auth;
pub mod catalogue;
pub mod dto;
pub mod entitlements;
pub mod error;
pub mod flags;
pub mod health;
pub mod login;
pub mod playlists;
pub mod royalties;
pub mod schemas;
pub mod state;
pub mod streams;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use crate::domain::Error;

/// Register API handlers and extractor configuration on `cfg`.
///
/// Malformed JSON bodies and query strings answer with the standard error
/// envelope instead of actix's plain-text default.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| Error::invalid_request(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| Error::invalid_request(err.to_string()).into()),
    )
    .service(login::login)
    .service(accounts::register)
    .service(accounts::create_admin)
    .service(accounts::create_artist)
    .service(entitlements::purchase_song)
    .service(entitlements::purchase_album)
    .service(entitlements::purchase_history)
    .service(entitlements::owned_songs)
    .service(entitlements::owned_albums)
    .service(entitlements::song_ownership)
    .service(royalties::send_tip)
    .service(royalties::artist_tips)
    .service(royalties::sent_tips)
    .service(royalties::accrue_royalty)
    .service(royalties::pending_total)
    .service(royalties::mark_paid)
    .service(royalties::artist_royalties)
    .service(flags::submit_flag)
    .service(flags::list_flags)
    .service(flags::review_flag)
    .service(catalogue::create_song)
    .service(catalogue::create_album)
    .service(catalogue::delete_song)
    .service(catalogue::delete_album)
    .service(catalogue::get_song)
    .service(catalogue::update_song)
    .service(catalogue::get_album)
    .service(catalogue::update_album)
    .service(catalogue::add_song_contributor)
    .service(catalogue::list_song_contributors)
    .service(catalogue::add_album_contributor)
    .service(catalogue::list_album_contributors)
    .service(playlists::create_playlist)
    .service(playlists::get_playlist)
    .service(playlists::update_playlist)
    .service(playlists::delete_playlist)
    .service(playlists::playlist_songs)
    .service(playlists::add_song)
    .service(playlists::remove_song)
    .service(playlists::reorder_songs)
    .service(streams::record_stream)
    .service(streams::stream_count);
}
