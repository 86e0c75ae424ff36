//! Read-only views over every vendor and item

use std::sync::Arc;

use tracing::info;

use crate::{
    error::MarketResult,
    models::{DirectoryItem, VendorProfile},
    repositories::MarketStore,
};

/// Directory queries over all vendors
#[derive(Clone)]
pub struct DirectoryService {
    store: Arc<dyn MarketStore>,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self { store }
    }

    /// Every vendor's public profile, in registration order
    pub async fn list_vendors(&self) -> MarketResult<Vec<VendorProfile>> {
        let vendors = self.store.list_vendors().await?;
        info!("Listing {} vendors", vendors.len());

        Ok(vendors.iter().map(VendorProfile::from).collect())
    }

    /// Every vendor's items flattened, each tagged with its vendor
    pub async fn list_all_items(&self) -> MarketResult<Vec<DirectoryItem>> {
        let items = self.store.list_all_items().await?;
        info!("Listing {} produce items", items.len());

        Ok(items)
    }
}
