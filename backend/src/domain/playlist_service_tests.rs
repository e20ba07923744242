//! Tests for playlist ownership, visibility, and reordering.

use std::sync::Arc;

use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{MockCatalogueRepository, MockPlaylistRepository};
use crate::domain::{ErrorCode, Role, SongPosition};
use crate::test_support::{FixedClock, sample_song};

#[fixture]
fn owner() -> UserId {
    UserId::random()
}

fn service(
    catalogue: MockCatalogueRepository,
    playlists: MockPlaylistRepository,
) -> PlaylistService<MockCatalogueRepository, MockPlaylistRepository> {
    PlaylistService::new(
        Arc::new(catalogue),
        Arc::new(playlists),
        Arc::new(FixedClock::default()),
    )
}

fn playlist_of(owner: &UserId, is_public: bool) -> Playlist {
    PlaylistDraft::new("Lagos nights", None, is_public)
        .expect("valid draft")
        .into_playlist(owner.clone(), FixedClock::default().utc())
}

fn caller(user_id: &UserId) -> Caller {
    Caller::new(user_id.clone(), vec![Role::Listener])
}

fn batch(song_id: Uuid, position: i32) -> ReorderBatch {
    ReorderBatch::new(vec![SongPosition { song_id, position }]).expect("valid batch")
}

#[rstest]
#[tokio::test]
async fn playlists_are_created_for_the_caller_only(owner: UserId) {
    let mut playlists = MockPlaylistRepository::new();
    playlists.expect_create().times(0);
    let draft = PlaylistDraft::new("Mine", None, true).expect("valid draft");

    let err = service(MockCatalogueRepository::new(), playlists)
        .create(&caller(&UserId::random()), &owner, draft)
        .await
        .expect_err("other owner");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn private_playlist_hidden_from_anonymous_viewers(owner: UserId) {
    let playlist = playlist_of(&owner, false);
    let id = playlist.id;
    let mut playlists = MockPlaylistRepository::new();
    playlists
        .expect_find()
        .return_once(move |_| Ok(Some(playlist)));

    let err = service(MockCatalogueRepository::new(), playlists)
        .playlist(None, &id)
        .await
        .expect_err("private");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn owner_sees_private_playlist_songs(owner: UserId) {
    let playlist = playlist_of(&owner, false);
    let id = playlist.id;
    let song = sample_song(Uuid::new_v4(), 100);
    let mut playlists = MockPlaylistRepository::new();
    playlists
        .expect_find()
        .return_once(move |_| Ok(Some(playlist)));
    playlists
        .expect_songs()
        .return_once(move |_| Ok(vec![song]));

    let songs = service(MockCatalogueRepository::new(), playlists)
        .songs(Some(&caller(&owner)), &id)
        .await
        .expect("owner access");

    assert_eq!(songs.len(), 1);
}

#[rstest]
#[tokio::test]
async fn adding_a_song_twice_is_conflict(owner: UserId) {
    let playlist = playlist_of(&owner, true);
    let id = playlist.id;
    let song = sample_song(Uuid::new_v4(), 100);
    let song_id = song.id;
    let mut catalogue = MockCatalogueRepository::new();
    catalogue
        .expect_find_song()
        .return_once(move |_| Ok(Some(song)));
    let mut playlists = MockPlaylistRepository::new();
    playlists
        .expect_find()
        .return_once(move |_| Ok(Some(playlist)));
    playlists
        .expect_append_song()
        .return_once(move |_, _, _| Err(PlaylistRepositoryError::duplicate_entry(song_id)));

    let err = service(catalogue, playlists)
        .add_song(&caller(&owner), &id, &song_id)
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn exhausted_positions_are_conflict(owner: UserId) {
    let playlist = playlist_of(&owner, true);
    let id = playlist.id;
    let song = sample_song(Uuid::new_v4(), 100);
    let song_id = song.id;
    let mut catalogue = MockCatalogueRepository::new();
    catalogue
        .expect_find_song()
        .return_once(move |_| Ok(Some(song)));
    let mut playlists = MockPlaylistRepository::new();
    playlists
        .expect_find()
        .return_once(move |_| Ok(Some(playlist)));
    playlists
        .expect_append_song()
        .return_once(|_, _, _| Err(PlaylistRepositoryError::positions_exhausted()));

    let err = service(catalogue, playlists)
        .add_song(&caller(&owner), &id, &song_id)
        .await
        .expect_err("no position left");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn non_owner_cannot_reorder(owner: UserId) {
    let playlist = playlist_of(&owner, true);
    let id = playlist.id;
    let mut playlists = MockPlaylistRepository::new();
    playlists
        .expect_find()
        .return_once(move |_| Ok(Some(playlist)));
    playlists.expect_reorder().times(0);

    let err = service(MockCatalogueRepository::new(), playlists)
        .reorder_songs(&caller(&UserId::random()), &id, batch(Uuid::new_v4(), 0))
        .await
        .expect_err("not owner");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn reorder_with_unknown_song_is_not_found(owner: UserId) {
    let playlist = playlist_of(&owner, true);
    let id = playlist.id;
    let missing = Uuid::new_v4();
    let mut playlists = MockPlaylistRepository::new();
    playlists
        .expect_find()
        .return_once(move |_| Ok(Some(playlist)));
    playlists
        .expect_reorder()
        .return_once(move |_, _| Err(PlaylistRepositoryError::missing_entry(missing)));
    playlists.expect_entries().times(0);

    let err = service(MockCatalogueRepository::new(), playlists)
        .reorder_songs(&caller(&owner), &id, batch(missing, 1))
        .await
        .expect_err("missing entry");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn successful_reorder_returns_new_order(owner: UserId) {
    let playlist = playlist_of(&owner, true);
    let id = playlist.id;
    let song_id = Uuid::new_v4();
    let mut playlists = MockPlaylistRepository::new();
    playlists
        .expect_find()
        .return_once(move |_| Ok(Some(playlist)));
    playlists
        .expect_reorder()
        .times(1)
        .return_once(|_, _| Ok(()));
    playlists.expect_entries().return_once(move |_| {
        Ok(vec![PlaylistEntry {
            song_id,
            position: 3,
            added_at: FixedClock::default().utc(),
        }])
    });

    let entries = service(MockCatalogueRepository::new(), playlists)
        .reorder_songs(&caller(&owner), &id, batch(song_id, 3))
        .await
        .expect("reordered");

    assert_eq!(entries[0].position, 3);
}

#[rstest]
#[tokio::test]
async fn removing_absent_song_is_not_found(owner: UserId) {
    let playlist = playlist_of(&owner, true);
    let id = playlist.id;
    let mut playlists = MockPlaylistRepository::new();
    playlists
        .expect_find()
        .return_once(move |_| Ok(Some(playlist)));
    playlists
        .expect_remove_song()
        .return_once(|_, _| Ok(false));

    let err = service(MockCatalogueRepository::new(), playlists)
        .remove_song(&caller(&owner), &id, &Uuid::new_v4())
        .await
        .expect_err("absent");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn owner_renames_and_hides_a_playlist(owner: UserId) {
    let playlist = playlist_of(&owner, true);
    let id = playlist.id;
    let mut playlists = MockPlaylistRepository::new();
    playlists
        .expect_find()
        .return_once(move |_| Ok(Some(playlist)));
    playlists
        .expect_update()
        .withf(|saved| saved.title == "Sunday" && !saved.is_public)
        .times(1)
        .return_once(|_| Ok(()));

    let updated = service(MockCatalogueRepository::new(), playlists)
        .update(
            &caller(&owner),
            &id,
            PlaylistUpdate {
                title: Some("Sunday".to_owned()),
                is_public: Some(false),
                ..PlaylistUpdate::default()
            },
        )
        .await
        .expect("owner may edit");

    assert_eq!(updated.title, "Sunday");
}

#[rstest]
#[tokio::test]
async fn strangers_cannot_delete_public_playlists(owner: UserId) {
    let playlist = playlist_of(&owner, true);
    let id = playlist.id;
    let mut playlists = MockPlaylistRepository::new();
    playlists
        .expect_find()
        .return_once(move |_| Ok(Some(playlist)));
    playlists.expect_delete().times(0);

    let err = service(MockCatalogueRepository::new(), playlists)
        .delete(&caller(&UserId::random()), &id)
        .await
        .expect_err("stranger rejected");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn deleting_a_missing_playlist_is_not_found(owner: UserId) {
    let mut playlists = MockPlaylistRepository::new();
    playlists.expect_find().return_once(|_| Ok(None));
    playlists.expect_delete().times(0);

    let err = service(MockCatalogueRepository::new(), playlists)
        .delete(&caller(&owner), &Uuid::new_v4())
        .await
        .expect_err("missing playlist");

    assert_eq!(err.code(), ErrorCode::NotFound);
}
