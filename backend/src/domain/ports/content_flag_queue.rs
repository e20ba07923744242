//! Driving port for the moderation queue.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Caller, ContentFlag, Error, FlagStatus, FlagSubmission};

#[async_trait]
pub trait ContentFlagQueue: Send + Sync {
    /// Open a pending flag against a song or album.
    ///
    /// The target kind is validated before the target is looked up, so an
    /// unknown kind is `invalid_target_kind` even when the id is unknown too.
    async fn submit(&self, caller: &Caller, submission: FlagSubmission)
    -> Result<ContentFlag, Error>;

    /// Move a flag to `status` (admin only). Any of the three states may be
    /// set, including back to `pending`.
    async fn review(&self, caller: &Caller, flag_id: &Uuid, status: &str)
    -> Result<ContentFlag, Error>;

    /// Flags in `status`, oldest first (admin only).
    async fn list(&self, caller: &Caller, status: FlagStatus) -> Result<Vec<ContentFlag>, Error>;
}
