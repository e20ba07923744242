//! Catalogue and credential storage.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    CatalogueRepository, CatalogueRepositoryError, CredentialStore, CredentialStoreError,
};
use crate::domain::{Album, Artist, Contributor, ItemRef, Role, Song, UserAccount, UserId};

use super::InMemoryMarketplace;

#[async_trait]
impl CatalogueRepository for InMemoryMarketplace {
    async fn find_song(&self, id: &Uuid) -> Result<Option<Song>, CatalogueRepositoryError> {
        Ok(self.lock().songs.get(id).cloned())
    }

    async fn find_album(&self, id: &Uuid) -> Result<Option<Album>, CatalogueRepositoryError> {
        Ok(self.lock().albums.get(id).cloned())
    }

    async fn find_artist(&self, id: &Uuid) -> Result<Option<Artist>, CatalogueRepositoryError> {
        Ok(self.lock().artists.get(id).cloned())
    }

    async fn find_artist_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Artist>, CatalogueRepositoryError> {
        Ok(self
            .lock()
            .artists
            .values()
            .find(|artist| &artist.user_id == user_id)
            .cloned())
    }

    async fn create_artist(&self, artist: &Artist) -> Result<(), CatalogueRepositoryError> {
        let mut state = self.lock();
        if state
            .artists
            .values()
            .any(|existing| existing.user_id == artist.user_id)
        {
            return Err(CatalogueRepositoryError::duplicate_artist(
                artist.user_id.to_string(),
            ));
        }
        state.artists.insert(artist.id, artist.clone());
        Ok(())
    }

    async fn create_song(&self, song: &Song) -> Result<(), CatalogueRepositoryError> {
        self.lock().songs.insert(song.id, song.clone());
        Ok(())
    }

    async fn create_album(&self, album: &Album) -> Result<(), CatalogueRepositoryError> {
        self.lock().albums.insert(album.id, album.clone());
        Ok(())
    }

    async fn delete_song(&self, id: &Uuid) -> Result<bool, CatalogueRepositoryError> {
        Ok(self.lock().songs.remove(id).is_some())
    }

    async fn delete_album(&self, id: &Uuid) -> Result<bool, CatalogueRepositoryError> {
        Ok(self.lock().albums.remove(id).is_some())
    }

    async fn update_song(&self, song: &Song) -> Result<(), CatalogueRepositoryError> {
        let mut state = self.lock();
        let stored = state
            .songs
            .get_mut(&song.id)
            .ok_or_else(|| CatalogueRepositoryError::query(format!("song {} vanished", song.id)))?;
        stored.title.clone_from(&song.title);
        stored.price = song.price;
        stored.genre_id = song.genre_id;
        stored.preview_url.clone_from(&song.preview_url);
        Ok(())
    }

    async fn update_album(&self, album: &Album) -> Result<(), CatalogueRepositoryError> {
        let mut state = self.lock();
        let stored = state.albums.get_mut(&album.id).ok_or_else(|| {
            CatalogueRepositoryError::query(format!("album {} vanished", album.id))
        })?;
        stored.title.clone_from(&album.title);
        stored.price = album.price;
        stored.genre_id = album.genre_id;
        stored.description.clone_from(&album.description);
        Ok(())
    }

    async fn add_contributor(
        &self,
        contributor: &Contributor,
    ) -> Result<(), CatalogueRepositoryError> {
        let mut state = self.lock();
        let duplicate = state.contributors.iter().any(|existing| {
            existing.item == contributor.item
                && existing.artist_id == contributor.artist_id
                && existing.contribution_type == contributor.contribution_type
        });
        if duplicate {
            return Err(CatalogueRepositoryError::duplicate_contributor(
                contributor.artist_id,
            ));
        }
        state.contributors.push(contributor.clone());
        Ok(())
    }

    async fn list_contributors(
        &self,
        item: &ItemRef,
    ) -> Result<Vec<Contributor>, CatalogueRepositoryError> {
        Ok(self
            .lock()
            .contributors
            .iter()
            .filter(|contributor| &contributor.item == item)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CredentialStore for InMemoryMarketplace {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, CredentialStoreError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, CredentialStoreError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, CredentialStoreError> {
        Ok(self.lock().users.get(id).cloned())
    }

    async fn create_account(&self, account: &UserAccount) -> Result<(), CredentialStoreError> {
        let mut state = self.lock();
        for existing in state.users.values() {
            if existing.email.eq_ignore_ascii_case(&account.email) {
                return Err(CredentialStoreError::duplicate_email(account.email.as_str()));
            }
            if existing.username == account.username {
                return Err(CredentialStoreError::duplicate_username(
                    account.username.as_str(),
                ));
            }
        }
        state.users.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn grant_role(&self, id: &UserId, role: Role) -> Result<(), CredentialStoreError> {
        let mut state = self.lock();
        let account = state
            .users
            .get_mut(id)
            .ok_or_else(|| CredentialStoreError::query(format!("user {id} not found")))?;
        if !account.has_role(role) {
            account.roles.push(role);
        }
        Ok(())
    }
}
