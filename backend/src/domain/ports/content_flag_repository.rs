//! Port for content flag storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{ContentFlag, FlagStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by content flag repository adapters.
    pub enum ContentFlagRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "content flag repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "content flag repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentFlagRepository: Send + Sync {
    async fn insert(&self, flag: &ContentFlag) -> Result<(), ContentFlagRepositoryError>;

    /// Set the status of a flag; `None` when the flag does not exist.
    async fn update_status(
        &self,
        id: &Uuid,
        status: FlagStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ContentFlag>, ContentFlagRepositoryError>;

    /// Flags in `status`, oldest first.
    async fn list_by_status(
        &self,
        status: FlagStatus,
    ) -> Result<Vec<ContentFlag>, ContentFlagRepositoryError>;
}
