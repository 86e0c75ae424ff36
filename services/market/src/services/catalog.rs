//! Vendor catalog management, addressed by vendor phone

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{MarketError, MarketResult},
    models::{AddItemRequest, ProduceItem, UpdateItemRequest, Vendor},
    repositories::MarketStore,
    validation,
};

const VENDOR_NOT_FOUND: &str = "Vendor not found";
const ITEM_NOT_FOUND: &str = "Vegetable not found";

/// Add, list, update and remove items in a vendor's catalog
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn MarketStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self { store }
    }

    async fn vendor(&self, phone: &str) -> MarketResult<Vendor> {
        let phone = validation::validate_phone(phone).map_err(MarketError::Validation)?;

        self.store
            .find_vendor_by_phone(phone)
            .await?
            .ok_or_else(|| {
                warn!("Catalog request for unknown vendor: {}", phone);
                MarketError::NotFound(VENDOR_NOT_FOUND.to_string())
            })
    }

    /// Append an item and return the vendor's full item list
    pub async fn add_item(&self, req: &AddItemRequest) -> MarketResult<Vec<ProduceItem>> {
        let missing =
            || MarketError::Validation("phone and vegetable {name, rate, area} are required".into());
        let phone = req.phone.as_deref().ok_or_else(missing)?;
        let input = req.vegetable.as_ref().ok_or_else(missing)?;
        let item = validation::validate_new_item(input).map_err(MarketError::Validation)?;

        let vendor = self.vendor(phone).await?;
        let added = self.store.append_item(vendor.id, item).await?;
        info!("Vendor {} added item {}", vendor.phone, added.id);

        Ok(self.store.list_items(vendor.id).await?)
    }

    /// A vendor's items in insertion order
    pub async fn list_items(&self, phone: &str) -> MarketResult<Vec<ProduceItem>> {
        let vendor = self.vendor(phone).await?;
        Ok(self.store.list_items(vendor.id).await?)
    }

    /// Overwrite only the provided fields of one item
    pub async fn update_item(
        &self,
        phone: &str,
        item_id: &str,
        req: &UpdateItemRequest,
    ) -> MarketResult<ProduceItem> {
        let vendor = self.vendor(phone).await?;
        let item_id = parse_item_id(item_id)?;

        // An unknown item wins over a bad patch.
        let items = self.store.list_items(vendor.id).await?;
        if !items.iter().any(|item| item.id == item_id) {
            return Err(MarketError::NotFound(ITEM_NOT_FOUND.to_string()));
        }
        let patch = validation::validate_item_patch(req).map_err(MarketError::Validation)?;

        let item = self
            .store
            .update_item(vendor.id, item_id, &patch)
            .await?
            .ok_or_else(|| MarketError::NotFound(ITEM_NOT_FOUND.to_string()))?;
        info!("Vendor {} updated item {}", vendor.phone, item.id);

        Ok(item)
    }

    /// Remove one item permanently
    pub async fn remove_item(&self, phone: &str, item_id: &str) -> MarketResult<()> {
        let vendor = self.vendor(phone).await?;
        let item_id = parse_item_id(item_id)?;

        if !self.store.remove_item(vendor.id, item_id).await? {
            return Err(MarketError::NotFound(ITEM_NOT_FOUND.to_string()));
        }
        info!("Vendor {} removed item {}", vendor.phone, item_id);

        Ok(())
    }
}

/// A malformed id cannot name an existing item
fn parse_item_id(item_id: &str) -> MarketResult<Uuid> {
    Uuid::parse_str(item_id.trim()).map_err(|_| MarketError::NotFound(ITEM_NOT_FOUND.to_string()))
}
