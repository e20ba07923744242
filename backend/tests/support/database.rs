//! A migrated database plus seeding helpers for the Diesel suites.

use marketplace::domain::ports::{CatalogueRepository, CredentialStore};
use marketplace::domain::{Album, Artist, Song, UserAccount};
use marketplace::outbound::persistence::{
    DbPool, DieselCatalogueRepository, DieselCredentialStore, PoolConfig,
};
use marketplace::test_support::{sample_account, sample_album, sample_artist, sample_song};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use tokio::runtime::Runtime;

use super::atexit_cleanup::shared_cluster_handle;
use super::cluster_skip::handle_cluster_setup_failure;
use super::embedded_postgres::provision_template_database;

/// One cloned database with its pool and a runtime to drive async calls
/// from synchronous tests.
pub struct TestDatabase {
    pub runtime: Runtime,
    pub pool: DbPool,
    pub url: String,
    _database: TemporaryDatabase,
}

impl TestDatabase {
    fn provision() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
        let database = provision_template_database(cluster)?;
        let url = database.url().to_string();
        let config = PoolConfig::new(url.as_str())
            .with_max_size(4)
            .with_min_idle(Some(1));
        let pool = runtime
            .block_on(DbPool::new(config))
            .map_err(|err| err.to_string())?;
        Ok(Self {
            runtime,
            pool,
            url,
            _database: database,
        })
    }

    /// A fresh database, or `None` when the cluster is unavailable and
    /// `SKIP_TEST_CLUSTER` allows skipping.
    pub fn start() -> Option<Self> {
        match Self::provision() {
            Ok(database) => Some(database),
            Err(reason) => handle_cluster_setup_failure(reason),
        }
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn listener(&self, username: &str) -> UserAccount {
        let account = sample_account(username);
        let store = DieselCredentialStore::new(self.pool.clone());
        self.block_on(store.create_account(&account))
            .expect("seed listener");
        account
    }

    pub fn artist(&self, username: &str) -> (UserAccount, Artist) {
        let account = self.listener(username);
        let artist = sample_artist(account.id.clone());
        let catalogue = DieselCatalogueRepository::new(self.pool.clone());
        self.block_on(catalogue.create_artist(&artist))
            .expect("seed artist");
        (account, artist)
    }

    pub fn song(&self, artist: &Artist, price: i64) -> Song {
        let song = sample_song(artist.id, price);
        let catalogue = DieselCatalogueRepository::new(self.pool.clone());
        self.block_on(catalogue.create_song(&song)).expect("seed song");
        song
    }

    pub fn album(&self, artist: &Artist, price: i64) -> Album {
        let album = sample_album(artist.id, price);
        let catalogue = DieselCatalogueRepository::new(self.pool.clone());
        self.block_on(catalogue.create_album(&album))
            .expect("seed album");
        album
    }
}
