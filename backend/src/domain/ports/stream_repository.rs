//! Port for play events.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::StreamEvent;

use super::define_port_error;

define_port_error! {
    /// Errors raised by stream repository adapters.
    pub enum StreamRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "stream repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "stream repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StreamRepository: Send + Sync {
    /// Append the event and increment the song's play counter atomically.
    async fn record(&self, event: &StreamEvent) -> Result<(), StreamRepositoryError>;

    /// Events for `song_id` at or after `since`.
    async fn count_since(
        &self,
        song_id: &Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, StreamRepositoryError>;
}
