//! In-memory store, used for local runs and tests

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{MarketStore, StoreError};
use crate::models::{
    Catalog, DirectoryItem, ItemPatch, NewProduceItem, NewUser, NewVendor, ProduceItem, User,
    Vendor, VendorSummary,
};

#[derive(Debug)]
struct VendorRecord {
    vendor: Vendor,
    catalog: Catalog,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<User>,
    vendors: Vec<VendorRecord>,
}

impl MemoryState {
    fn vendor_mut(&mut self, vendor_id: Uuid) -> Option<&mut VendorRecord> {
        self.vendors.iter_mut().find(|r| r.vendor.id == vendor_id)
    }
}

/// Market store holding everything behind a single lock.
///
/// Each mutation runs under the write lock, so item edits are atomic.
#[derive(Debug, Default)]
pub struct InMemoryMarketStore {
    state: RwLock<MemoryState>,
}

impl InMemoryMarketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketStore for InMemoryMarketStore {
    async fn insert_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        if state.users.iter().any(|u| u.phone == new_user.phone) {
            return Err(StoreError::DuplicatePhone);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            phone: new_user.phone,
            password_hash: new_user.password_hash,
        };
        state.users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.phone == phone).cloned())
    }

    async fn insert_vendor(&self, new_vendor: NewVendor) -> Result<Vendor, StoreError> {
        let mut state = self.state.write().await;

        if state.vendors.iter().any(|r| r.vendor.phone == new_vendor.phone) {
            return Err(StoreError::DuplicatePhone);
        }
        if state
            .vendors
            .iter()
            .any(|r| r.vendor.scanner_code == new_vendor.scanner_code)
        {
            return Err(StoreError::DuplicateScannerCode);
        }

        let vendor = Vendor {
            id: Uuid::new_v4(),
            name: new_vendor.name,
            phone: new_vendor.phone,
            password_hash: new_vendor.password_hash,
            locality: new_vendor.locality,
            service: new_vendor.service,
            scanner_code: new_vendor.scanner_code,
        };
        state.vendors.push(VendorRecord {
            vendor: vendor.clone(),
            catalog: Catalog::new(),
        });

        Ok(vendor)
    }

    async fn find_vendor_by_phone(&self, phone: &str) -> Result<Option<Vendor>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .vendors
            .iter()
            .find(|r| r.vendor.phone == phone)
            .map(|r| r.vendor.clone()))
    }

    async fn list_vendors(&self) -> Result<Vec<Vendor>, StoreError> {
        let state = self.state.read().await;
        Ok(state.vendors.iter().map(|r| r.vendor.clone()).collect())
    }

    async fn append_item(
        &self,
        vendor_id: Uuid,
        item: NewProduceItem,
    ) -> Result<ProduceItem, StoreError> {
        let mut state = self.state.write().await;
        let record = state
            .vendor_mut(vendor_id)
            .ok_or(StoreError::UnknownVendor(vendor_id))?;

        Ok(record.catalog.append(item))
    }

    async fn list_items(&self, vendor_id: Uuid) -> Result<Vec<ProduceItem>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .vendors
            .iter()
            .find(|r| r.vendor.id == vendor_id)
            .map(|r| r.catalog.items().to_vec())
            .unwrap_or_default())
    }

    async fn update_item(
        &self,
        vendor_id: Uuid,
        item_id: Uuid,
        patch: &ItemPatch,
    ) -> Result<Option<ProduceItem>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state
            .vendor_mut(vendor_id)
            .and_then(|r| r.catalog.update(item_id, patch)))
    }

    async fn remove_item(&self, vendor_id: Uuid, item_id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        Ok(state
            .vendor_mut(vendor_id)
            .is_some_and(|r| r.catalog.remove(item_id)))
    }

    async fn list_all_items(&self) -> Result<Vec<DirectoryItem>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .vendors
            .iter()
            .flat_map(|r| {
                let summary = VendorSummary::from(&r.vendor);
                r.catalog
                    .items()
                    .iter()
                    .map(move |item| DirectoryItem::new(item, summary.clone()))
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_vendor(phone: &str, scanner_code: &str) -> NewVendor {
        NewVendor {
            name: "Ravi".to_string(),
            phone: phone.to_string(),
            password_hash: "hash".to_string(),
            locality: "Baner".to_string(),
            service: "General".to_string(),
            scanner_code: scanner_code.to_string(),
        }
    }

    fn item(name: &str) -> NewProduceItem {
        NewProduceItem {
            name: name.to_string(),
            rate: 10.0,
            area: "North".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_user_phone_is_rejected() {
        let store = InMemoryMarketStore::new();
        let user = NewUser {
            name: "Asha".to_string(),
            phone: "555".to_string(),
            password_hash: "hash".to_string(),
        };

        store.insert_user(user.clone()).await.unwrap();
        let err = store.insert_user(user).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicatePhone));
    }

    #[tokio::test]
    async fn test_phone_may_repeat_across_account_kinds() {
        let store = InMemoryMarketStore::new();
        store
            .insert_user(NewUser {
                name: "Asha".to_string(),
                phone: "555".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        assert!(store.insert_vendor(new_vendor("555", "SCAN-A")).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_scanner_code_is_rejected() {
        let store = InMemoryMarketStore::new();
        store.insert_vendor(new_vendor("1", "SCAN-A")).await.unwrap();

        let err = store
            .insert_vendor(new_vendor("2", "SCAN-A"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateScannerCode));
    }

    #[tokio::test]
    async fn test_items_flatten_in_vendor_then_insertion_order() {
        let store = InMemoryMarketStore::new();
        let first = store.insert_vendor(new_vendor("1", "SCAN-A")).await.unwrap();
        let second = store.insert_vendor(new_vendor("2", "SCAN-B")).await.unwrap();

        store.append_item(second.id, item("Okra")).await.unwrap();
        store.append_item(first.id, item("Tomato")).await.unwrap();
        store.append_item(first.id, item("Onion")).await.unwrap();

        let flattened = store.list_all_items().await.unwrap();
        let names: Vec<_> = flattened
            .iter()
            .map(|i| (i.vendor.phone.as_str(), i.name.as_str()))
            .collect();
        assert_eq!(names, [("1", "Tomato"), ("1", "Onion"), ("2", "Okra")]);
    }

    #[tokio::test]
    async fn test_item_mutations_are_scoped_to_their_vendor() {
        let store = InMemoryMarketStore::new();
        let owner = store.insert_vendor(new_vendor("1", "SCAN-A")).await.unwrap();
        let other = store.insert_vendor(new_vendor("2", "SCAN-B")).await.unwrap();
        let tomato = store.append_item(owner.id, item("Tomato")).await.unwrap();

        let patch = ItemPatch {
            rate: Some(1.0),
            ..ItemPatch::default()
        };
        assert!(store
            .update_item(other.id, tomato.id, &patch)
            .await
            .unwrap()
            .is_none());
        assert!(!store.remove_item(other.id, tomato.id).await.unwrap());
        assert_eq!(store.list_items(owner.id).await.unwrap(), [tomato]);
    }
}
