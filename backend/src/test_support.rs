//! Test utilities for the marketplace crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Only
//! compiled for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex};

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::TokenService;
use crate::domain::{Album, Artist, Role, Song, UserAccount, UserId};
use crate::inbound::http::state::{HttpState, MarketplaceAdapters, SecurityPorts};
use crate::outbound::memory::InMemoryMarketplace;
use crate::outbound::security::{
    Argon2PasswordHasher, Argon2PasswordVerifier, JwtTokenService, TokenSettings,
};

/// Instant every [`FixedClock::default`] reports.
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(fixture_timestamp())
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Clock that tests can move forward.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Hash `password` with Argon2 defaults and a fixed salt.
pub fn hash_password(password: &str) -> String {
    let salt = SaltString::encode_b64(b"marketplace-test-salt").expect("valid salt");
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("hash password")
        .to_string()
}

/// Listener account with a placeholder hash; use [`hash_password`] when a
/// test needs to log in.
pub fn sample_account(username: &str) -> UserAccount {
    UserAccount {
        id: UserId::random(),
        email: format!("{username}@example.test"),
        username: username.to_owned(),
        password_hash: "unhashed".to_owned(),
        roles: vec![Role::Listener],
    }
}

pub fn sample_artist(user_id: UserId) -> Artist {
    Artist {
        id: Uuid::new_v4(),
        user_id,
        name: "Tems".to_owned(),
        verified: true,
        wallet_balance: 0,
        monthly_listeners: 0,
    }
}

pub fn sample_song(artist_id: Uuid, price: i64) -> Song {
    Song {
        id: Uuid::new_v4(),
        title: "Free Mind".to_owned(),
        artist_id,
        album_id: None,
        genre_id: None,
        duration_seconds: 210,
        price,
        audio_url: Some("https://cdn.example.test/free-mind.mp3".to_owned()),
        preview_url: Some("https://cdn.example.test/free-mind-preview.mp3".to_owned()),
        plays_count: 0,
        is_flagged: false,
        release_date: None,
    }
}

pub fn sample_album(artist_id: Uuid, price: i64) -> Album {
    Album {
        id: Uuid::new_v4(),
        title: "For Broken Ears".to_owned(),
        artist_id,
        genre_id: None,
        description: None,
        price,
        cover_image_url: None,
        is_flagged: false,
        release_date: None,
    }
}

/// HTTP state wired over one in-memory store with real JWT signing.
///
/// Accounts created through the helpers carry the password
/// [`TEST_PASSWORD`].
pub struct TestMarketplace {
    pub store: Arc<InMemoryMarketplace>,
    pub tokens: Arc<JwtTokenService>,
    pub state: HttpState,
}

/// Password of every account created by [`TestMarketplace`].
pub const TEST_PASSWORD: &str = "correct horse battery staple";

impl Default for TestMarketplace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestMarketplace {
    pub fn new() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::default());
        let store = Arc::new(InMemoryMarketplace::new());
        let tokens = Arc::new(JwtTokenService::new(
            TokenSettings::new(
                b"test-secret-with-at-least-thirty-two-bytes".to_vec(),
                TimeDelta::hours(24),
            ),
            Arc::clone(&clock),
        ));
        let state = HttpState::from_adapters(
            MarketplaceAdapters::shared(Arc::clone(&store)),
            SecurityPorts {
                tokens: Arc::clone(&tokens) as Arc<dyn TokenService>,
                passwords: Arc::new(Argon2PasswordVerifier),
                hasher: Arc::new(Argon2PasswordHasher),
            },
            clock,
        );
        Self {
            store,
            tokens,
            state,
        }
    }

    fn account(&self, username: &str, roles: Vec<Role>) -> UserAccount {
        let account = UserAccount {
            password_hash: hash_password(TEST_PASSWORD),
            roles,
            ..sample_account(username)
        };
        self.store.insert_user(account.clone());
        account
    }

    pub fn listener(&self, username: &str) -> UserAccount {
        self.account(username, vec![Role::Listener])
    }

    pub fn admin(&self, username: &str) -> UserAccount {
        self.account(username, vec![Role::Admin])
    }

    /// Artist account plus its linked artist profile.
    pub fn artist(&self, username: &str) -> (UserAccount, Artist) {
        let account = self.account(username, vec![Role::Listener, Role::Artist]);
        let artist = sample_artist(account.id.clone());
        self.store.insert_artist(artist.clone());
        (account, artist)
    }

    pub fn song(&self, artist: &Artist, price: i64) -> Song {
        let song = sample_song(artist.id, price);
        self.store.insert_song(song.clone());
        song
    }

    pub fn album(&self, artist: &Artist, price: i64) -> Album {
        let album = sample_album(artist.id, price);
        self.store.insert_album(album.clone());
        album
    }

    /// Signed token for `account`.
    pub fn token_for(&self, account: &UserAccount) -> String {
        self.tokens.issue(account).expect("issue test token").token
    }
}

/// `Authorization` header value for `token`.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
