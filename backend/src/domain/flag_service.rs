//! Moderation queue service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::authorization::resolve_item;
use crate::domain::ports::{
    CatalogueRepository, ContentFlagQueue, ContentFlagRepository, ContentFlagRepositoryError,
};
use crate::domain::{
    Caller, ContentFlag, Error, FlagStatus, FlagSubmission, ItemRef, Role, parse_flag_target_kind,
    require_role, require_self,
};

fn map_flag_error(error: ContentFlagRepositoryError) -> Error {
    match error {
        ContentFlagRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("flag queue unavailable: {message}"))
        }
        ContentFlagRepositoryError::Query { message } => {
            Error::internal(format!("flag queue error: {message}"))
        }
    }
}

/// Content flag intake for the moderation queue.
pub struct FlagService<C, F> {
    catalogue: Arc<C>,
    flags: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<C, F> FlagService<C, F> {
    pub fn new(catalogue: Arc<C>, flags: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalogue,
            flags,
            clock,
        }
    }
}

#[async_trait]
impl<C, F> ContentFlagQueue for FlagService<C, F>
where
    C: CatalogueRepository,
    F: ContentFlagRepository,
{
    async fn submit(
        &self,
        caller: &Caller,
        submission: FlagSubmission,
    ) -> Result<ContentFlag, Error> {
        require_self(caller, &submission.reporter_id)?;
        let kind = parse_flag_target_kind(&submission.target_kind)?;
        let target = ItemRef {
            kind,
            id: submission.target_id,
        };
        resolve_item(self.catalogue.as_ref(), &target).await?;

        let flag = ContentFlag::open(
            submission.reporter_id,
            target,
            &submission.reason,
            submission.description,
            self.clock.utc(),
        )?;
        self.flags.insert(&flag).await.map_err(map_flag_error)?;
        info!(flag_id = %flag.id, target = %flag.target, "content flagged");
        Ok(flag)
    }

    async fn review(
        &self,
        caller: &Caller,
        flag_id: &Uuid,
        status: &str,
    ) -> Result<ContentFlag, Error> {
        require_role(caller, Role::Admin)?;
        let status: FlagStatus = status.parse()?;
        let flag = self
            .flags
            .update_status(flag_id, status, self.clock.utc())
            .await
            .map_err(map_flag_error)?
            .ok_or_else(|| Error::not_found(format!("flag {flag_id} not found")))?;
        info!(%flag_id, %status, reviewer = %caller.user_id(), "flag reviewed");
        Ok(flag)
    }

    async fn list(&self, caller: &Caller, status: FlagStatus) -> Result<Vec<ContentFlag>, Error> {
        require_role(caller, Role::Admin)?;
        self.flags
            .list_by_status(status)
            .await
            .map_err(map_flag_error)
    }
}

#[cfg(test)]
#[path = "flag_service_tests.rs"]
mod tests;
