//! Tip and royalty ledger service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::authorization::map_catalogue_error;
use crate::domain::login_service::map_store_error;
use crate::domain::ports::{
    CatalogueRepository, CredentialStore, MAX_TIP_LIMIT, RoyaltyLedger,
    RoyaltyRepository, RoyaltyRepositoryError, TipRepository,
};
use crate::domain::{
    Caller, Error, MonthlyRoyalty, OwnershipGuard, Role, RoyaltyPeriod, Tip, TipRequest, UserId,
    require_role, require_self, validate_accrual_amount,
};

fn map_royalty_error(error: RoyaltyRepositoryError) -> Error {
    match error {
        RoyaltyRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("royalty ledger unavailable: {message}"))
        }
        RoyaltyRepositoryError::Query { message } => {
            Error::internal(format!("royalty ledger error: {message}"))
        }
        RoyaltyRepositoryError::PeriodPaid { period } => Error::already_paid(format!(
            "royalty for {period} has already been paid and accepts no accruals"
        )),
        RoyaltyRepositoryError::AmountOverflow => {
            Error::invalid_amount("royalty total would exceed the representable range")
        }
    }
}

fn check_limit(limit: u32) -> Result<u32, Error> {
    if (1..=MAX_TIP_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(Error::invalid_request(format!(
            "limit must be between 1 and {MAX_TIP_LIMIT}"
        )))
    }
}

/// Repositories the royalty service reads and writes.
pub struct RoyaltyServiceDeps<C, U, T, R> {
    pub catalogue: Arc<C>,
    pub users: Arc<U>,
    pub tips: Arc<T>,
    pub royalties: Arc<R>,
    pub clock: Arc<dyn Clock>,
}

/// Tip recording and monthly royalty settlement.
pub struct RoyaltyService<C, U, T, R> {
    catalogue: Arc<C>,
    guard: OwnershipGuard<C>,
    users: Arc<U>,
    tips: Arc<T>,
    royalties: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<C, U, T, R> RoyaltyService<C, U, T, R>
where
    C: CatalogueRepository,
{
    pub fn new(deps: RoyaltyServiceDeps<C, U, T, R>) -> Self {
        Self {
            guard: OwnershipGuard::new(Arc::clone(&deps.catalogue)),
            catalogue: deps.catalogue,
            users: deps.users,
            tips: deps.tips,
            royalties: deps.royalties,
            clock: deps.clock,
        }
    }
}

#[async_trait]
impl<C, U, T, R> RoyaltyLedger for RoyaltyService<C, U, T, R>
where
    C: CatalogueRepository,
    U: CredentialStore,
    T: TipRepository,
    R: RoyaltyRepository,
{
    async fn send_tip(&self, caller: &Caller, request: TipRequest) -> Result<Tip, Error> {
        require_self(caller, &request.sender_id)?;
        request.validate()?;

        if self
            .users
            .find_by_id(&request.sender_id)
            .await
            .map_err(map_store_error)?
            .is_none()
        {
            return Err(Error::not_found(format!(
                "user {} not found",
                request.sender_id
            )));
        }
        if self
            .catalogue
            .find_artist(&request.artist_id)
            .await
            .map_err(map_catalogue_error)?
            .is_none()
        {
            return Err(Error::not_found(format!(
                "artist {} not found",
                request.artist_id
            )));
        }

        let tip = Tip::completed(request, self.clock.utc());
        self.tips.insert(&tip).await.map_err(map_royalty_error)?;
        info!(
            tip_id = %tip.id,
            sender_id = %tip.sender_id,
            artist_id = %tip.artist_id,
            amount = tip.amount,
            "tip recorded"
        );
        Ok(tip)
    }

    async fn artist_tips(
        &self,
        caller: &Caller,
        artist_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<Tip>, Error> {
        let limit = check_limit(limit)?;
        self.guard.require_artist_access(caller, artist_id).await?;
        self.tips
            .list_for_artist(artist_id, limit)
            .await
            .map_err(map_royalty_error)
    }

    async fn sent_tips(
        &self,
        caller: &Caller,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Tip>, Error> {
        require_self(caller, user_id)?;
        let limit = check_limit(limit)?;
        self.tips
            .list_for_sender(user_id, limit)
            .await
            .map_err(map_royalty_error)
    }

    async fn accrue_royalty(
        &self,
        caller: &Caller,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
        amount: i64,
    ) -> Result<MonthlyRoyalty, Error> {
        require_role(caller, Role::Admin)?;
        validate_accrual_amount(amount)?;
        if self
            .catalogue
            .find_artist(artist_id)
            .await
            .map_err(map_catalogue_error)?
            .is_none()
        {
            return Err(Error::not_found(format!("artist {artist_id} not found")));
        }

        let row = self
            .royalties
            .accrue(artist_id, period, amount)
            .await
            .map_err(map_royalty_error)?;
        info!(%artist_id, %period, amount, total = row.amount, "royalty accrued");
        Ok(row)
    }

    async fn mark_paid(
        &self,
        caller: &Caller,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
    ) -> Result<MonthlyRoyalty, Error> {
        require_role(caller, Role::Admin)?;
        if let Some(row) = self
            .royalties
            .mark_paid(artist_id, period)
            .await
            .map_err(map_royalty_error)?
        {
            info!(%artist_id, %period, amount = row.amount, "royalty marked paid");
            return Ok(row);
        }

        let existing = self
            .royalties
            .find(artist_id, period)
            .await
            .map_err(map_royalty_error)?;
        match existing {
            Some(_) => Err(Error::already_paid(format!(
                "royalty for {period} has already been paid"
            ))
            .with_details(json!({
                "artistId": artist_id,
                "year": period.year(),
                "month": period.month(),
            }))),
            None => Err(Error::not_found(format!(
                "no royalty recorded for artist {artist_id} in {period}"
            ))),
        }
    }

    async fn pending_total(&self, caller: &Caller) -> Result<i64, Error> {
        require_role(caller, Role::Admin)?;
        self.royalties
            .pending_total()
            .await
            .map_err(map_royalty_error)
    }

    async fn artist_royalties(
        &self,
        caller: &Caller,
        artist_id: &Uuid,
    ) -> Result<Vec<MonthlyRoyalty>, Error> {
        self.guard.require_artist_access(caller, artist_id).await?;
        self.royalties
            .list_for_artist(artist_id)
            .await
            .map_err(map_royalty_error)
    }
}

#[cfg(test)]
#[path = "royalty_service_tests.rs"]
mod tests;
