//! Driving port for play events.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Caller, Error, StreamEvent, StreamRequest};

#[async_trait]
pub trait StreamCommand: Send + Sync {
    /// Record a play.
    ///
    /// Anonymous callers may only stream previews. A full stream needs a
    /// completed purchase of the song or of its album, or ownership of the
    /// song's artist profile.
    async fn record(
        &self,
        caller: Option<&Caller>,
        request: StreamRequest,
    ) -> Result<StreamEvent, Error>;

    /// Plays of a song within the reporting window.
    async fn recent_count(&self, song_id: &Uuid) -> Result<i64, Error>;
}
