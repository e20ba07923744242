//! Driving port for account sign-up and artist onboarding.

use async_trait::async_trait;

use crate::domain::{Artist, ArtistDraft, Caller, Error, Registration, UserAccount};

#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a listener account. A taken email or username is `conflict`.
    async fn register(&self, registration: Registration) -> Result<UserAccount, Error>;

    /// Create an administrator account; the caller must be an admin.
    async fn create_admin(
        &self,
        caller: &Caller,
        registration: Registration,
    ) -> Result<UserAccount, Error>;

    /// Attach an artist profile to the caller and grant them the artist role.
    ///
    /// A second profile for the same user is `conflict`.
    async fn create_artist(&self, caller: &Caller, draft: ArtistDraft) -> Result<Artist, Error>;
}
