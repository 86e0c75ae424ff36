//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    credentials::CredentialStore,
    repositories::MarketStore,
    services::{AccountService, CatalogService, DirectoryService},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketStore>,
    pub accounts: AccountService,
    pub catalog: CatalogService,
    pub directory: DirectoryService,
}

impl AppState {
    /// Wire every service over one store
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self::with_credentials(store.clone(), CredentialStore::new(store))
    }

    /// Wire the services around a preconfigured credential store
    pub fn with_credentials(store: Arc<dyn MarketStore>, credentials: CredentialStore) -> Self {
        let directory = DirectoryService::new(store.clone());

        Self {
            accounts: AccountService::new(credentials, directory.clone()),
            catalog: CatalogService::new(store.clone()),
            directory,
            store,
        }
    }
}
