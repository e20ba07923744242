//! Authorization guard: caller identity and ownership rules.
//!
//! Missing or invalid credentials are `unauthorized` and are rejected by the
//! inbound adapter before any of these checks run. Everything here assumes a
//! verified [`Caller`] and fails with `forbidden` when the caller may not act.
//!
//! Rules:
//! - purchases, tips, playlists, and flags are created only for the caller's
//!   own user id, checked before any lookup;
//! - songs and albums are published under, and mutated only by, the user
//!   linked to the owning artist profile;
//! - playlists are mutated only by their owning user;
//! - moderation and royalty settlement require the admin role.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{
    Artist, CatalogueItem, Error, ItemKind, ItemRef, Playlist, Role, TokenClaims, UserId,
};

/// Verified identity of the user making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    user_id: UserId,
    roles: Vec<Role>,
}

impl Caller {
    pub fn new(user_id: UserId, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

impl From<TokenClaims> for Caller {
    fn from(claims: TokenClaims) -> Self {
        Self::new(claims.user_id, claims.roles)
    }
}

/// Fail unless `acting_user` is the caller.
pub fn require_self(caller: &Caller, acting_user: &UserId) -> Result<(), Error> {
    if caller.user_id() == acting_user {
        Ok(())
    } else {
        Err(Error::forbidden("cannot act on behalf of another user"))
    }
}

/// Fail unless the caller holds `role`.
pub fn require_role(caller: &Caller, role: Role) -> Result<(), Error> {
    if caller.has_role(role) {
        Ok(())
    } else {
        Err(Error::forbidden(format!("{role} role required")))
    }
}

/// Fail unless the caller owns `playlist`.
pub fn require_playlist_owner(caller: &Caller, playlist: &Playlist) -> Result<(), Error> {
    if caller.user_id() == &playlist.owner_id {
        Ok(())
    } else {
        Err(Error::forbidden("playlist belongs to another user"))
    }
}

pub(crate) fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalogue unavailable: {message}"))
        }
        CatalogueRepositoryError::Query { message } => {
            Error::internal(format!("catalogue error: {message}"))
        }
        CatalogueRepositoryError::DuplicateContributor { artist_id } => Error::conflict(format!(
            "artist {artist_id} is already credited with this contribution type"
        )),
        CatalogueRepositoryError::DuplicateArtist { user_id } => {
            Error::conflict(format!("user {user_id} already has an artist profile"))
        }
    }
}

/// Resolve `item`, failing with `not_found` when it is absent.
pub(crate) async fn resolve_item<C>(catalogue: &C, item: &ItemRef) -> Result<CatalogueItem, Error>
where
    C: CatalogueRepository + ?Sized,
{
    let resolved = match item.kind {
        ItemKind::Song => catalogue
            .find_song(&item.id)
            .await
            .map_err(map_catalogue_error)?
            .map(CatalogueItem::Song),
        ItemKind::Album => catalogue
            .find_album(&item.id)
            .await
            .map_err(map_catalogue_error)?
            .map(CatalogueItem::Album),
    };
    resolved.ok_or_else(|| Error::not_found(format!("{} {} not found", item.kind, item.id)))
}

/// Ownership checks that need the catalogue to resolve artist links.
pub struct OwnershipGuard<C> {
    catalogue: Arc<C>,
}

impl<C> Clone for OwnershipGuard<C> {
    fn clone(&self) -> Self {
        Self {
            catalogue: Arc::clone(&self.catalogue),
        }
    }
}

impl<C> OwnershipGuard<C>
where
    C: CatalogueRepository,
{
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }

    /// Resolve `item` and require the caller's artist profile to own it.
    ///
    /// A missing item is `not_found`; a caller without an artist profile, or
    /// with a different one, is `forbidden`.
    pub async fn require_item_owner(
        &self,
        caller: &Caller,
        item: &ItemRef,
    ) -> Result<CatalogueItem, Error> {
        let resolved = resolve_item(self.catalogue.as_ref(), item).await?;
        let artist = self.caller_artist(caller).await?;
        match artist {
            Some(artist) if artist.id == resolved.artist_id() => Ok(resolved),
            _ => Err(Error::forbidden(format!(
                "{} {} belongs to another artist",
                item.kind, item.id
            ))),
        }
    }

    /// The caller's own artist profile; `forbidden` when they have none.
    pub async fn require_artist_profile(&self, caller: &Caller) -> Result<Artist, Error> {
        self.caller_artist(caller)
            .await?
            .ok_or_else(|| Error::forbidden("an artist profile is required"))
    }

    /// Resolve an artist and require the caller to be its user or an admin.
    pub async fn require_artist_access(
        &self,
        caller: &Caller,
        artist_id: &Uuid,
    ) -> Result<Artist, Error> {
        let artist = self
            .catalogue
            .find_artist(artist_id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("artist {artist_id} not found")))?;
        if caller.is_admin() || &artist.user_id == caller.user_id() {
            Ok(artist)
        } else {
            Err(Error::forbidden("artist profile belongs to another user"))
        }
    }

    async fn caller_artist(&self, caller: &Caller) -> Result<Option<Artist>, Error> {
        self.catalogue
            .find_artist_by_user(caller.user_id())
            .await
            .map_err(map_catalogue_error)
    }
}
