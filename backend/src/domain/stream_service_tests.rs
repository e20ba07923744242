//! Tests for stream gating and counting.

use std::sync::Arc;

use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{MockCatalogueRepository, MockPurchaseRepository, MockStreamRepository};
use crate::domain::{ErrorCode, Role, UserId};
use crate::test_support::{FixedClock, sample_artist, sample_song};

struct Mocks {
    catalogue: MockCatalogueRepository,
    purchases: MockPurchaseRepository,
    streams: MockStreamRepository,
}

impl Mocks {
    fn build(self) -> StreamService<MockCatalogueRepository, MockPurchaseRepository, MockStreamRepository> {
        StreamService::new(StreamServiceDeps {
            catalogue: Arc::new(self.catalogue),
            purchases: Arc::new(self.purchases),
            streams: Arc::new(self.streams),
            clock: Arc::new(FixedClock::default()),
        })
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        catalogue: MockCatalogueRepository::new(),
        purchases: MockPurchaseRepository::new(),
        streams: MockStreamRepository::new(),
    }
}

fn request(song_id: Uuid, is_preview: bool) -> StreamRequest {
    StreamRequest {
        song_id,
        is_preview,
        device_type: None,
        country_code: Some("ng".to_owned()),
    }
}

fn listener() -> Caller {
    Caller::new(UserId::random(), vec![Role::Listener])
}

#[rstest]
#[tokio::test]
async fn anonymous_preview_is_recorded(mut mocks: Mocks) {
    let song = sample_song(Uuid::new_v4(), 100);
    let song_id = song.id;
    mocks
        .catalogue
        .expect_find_song()
        .return_once(move |_| Ok(Some(song)));
    mocks
        .streams
        .expect_record()
        .withf(|event| event.user_id.is_none() && event.country_code.as_deref() == Some("NG"))
        .times(1)
        .return_once(|_| Ok(()));

    let event = mocks
        .build()
        .record(None, request(song_id, true))
        .await
        .expect("preview allowed");

    assert!(event.is_preview);
}

#[rstest]
#[tokio::test]
async fn anonymous_full_stream_is_unauthorized(mut mocks: Mocks) {
    let song = sample_song(Uuid::new_v4(), 100);
    let song_id = song.id;
    mocks
        .catalogue
        .expect_find_song()
        .return_once(move |_| Ok(Some(song)));
    mocks.streams.expect_record().times(0);

    let err = mocks
        .build()
        .record(None, request(song_id, false))
        .await
        .expect_err("anonymous full stream");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn full_stream_without_purchase_is_forbidden(mut mocks: Mocks) {
    let song = sample_song(Uuid::new_v4(), 100);
    let song_id = song.id;
    mocks
        .catalogue
        .expect_find_song()
        .return_once(move |_| Ok(Some(song)));
    mocks
        .catalogue
        .expect_find_artist_by_user()
        .return_once(|_| Ok(None));
    mocks.purchases.expect_is_owned().returning(|_, _| Ok(false));
    mocks.streams.expect_record().times(0);

    let err = mocks
        .build()
        .record(Some(&listener()), request(song_id, false))
        .await
        .expect_err("not entitled");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn album_purchase_unlocks_its_songs(mut mocks: Mocks) {
    let mut song = sample_song(Uuid::new_v4(), 100);
    let album_id = Uuid::new_v4();
    song.album_id = Some(album_id);
    let song_id = song.id;
    mocks
        .catalogue
        .expect_find_song()
        .return_once(move |_| Ok(Some(song)));
    mocks
        .purchases
        .expect_is_owned()
        .returning(move |_, item| Ok(item.id == album_id));
    mocks.streams.expect_record().times(1).return_once(|_| Ok(()));

    let event = mocks
        .build()
        .record(Some(&listener()), request(song_id, false))
        .await
        .expect("album owner streams");

    assert!(!event.is_preview);
}

#[rstest]
#[tokio::test]
async fn artists_stream_their_own_songs(mut mocks: Mocks) {
    let caller = Caller::new(UserId::random(), vec![Role::Artist]);
    let artist = sample_artist(caller.user_id().clone());
    let song = sample_song(artist.id, 100);
    let song_id = song.id;
    mocks
        .catalogue
        .expect_find_song()
        .return_once(move |_| Ok(Some(song)));
    mocks
        .catalogue
        .expect_find_artist_by_user()
        .return_once(move |_| Ok(Some(artist)));
    mocks.purchases.expect_is_owned().returning(|_, _| Ok(false));
    mocks.streams.expect_record().times(1).return_once(|_| Ok(()));

    mocks
        .build()
        .record(Some(&caller), request(song_id, false))
        .await
        .expect("artist streams own song");
}

#[rstest]
#[tokio::test]
async fn recent_count_uses_thirty_day_window(mut mocks: Mocks) {
    let song = sample_song(Uuid::new_v4(), 100);
    let song_id = song.id;
    let expected_since =
        FixedClock::default().utc() - Duration::days(STREAM_COUNT_WINDOW_DAYS);
    mocks
        .catalogue
        .expect_find_song()
        .return_once(move |_| Ok(Some(song)));
    mocks
        .streams
        .expect_count_since()
        .withf(move |_, since| *since == expected_since)
        .return_once(|_, _| Ok(42));

    let count = mocks
        .build()
        .recent_count(&song_id)
        .await
        .expect("count");

    assert_eq!(count, 42);
}
