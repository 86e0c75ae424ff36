//! Storage port for accounts and catalogs, with its adapters

use async_trait::async_trait;
use common::error::DatabaseError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    DirectoryItem, ItemPatch, NewProduceItem, NewUser, NewVendor, ProduceItem, User, Vendor,
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMarketStore;
pub use postgres::PgMarketStore;

/// Errors raised by storage adapters
#[derive(Error, Debug)]
pub enum StoreError {
    /// An account of the same kind already uses this phone
    #[error("phone number already registered")]
    DuplicatePhone,

    /// Another vendor already holds this scanner code
    #[error("scanner code already assigned")]
    DuplicateScannerCode,

    /// No vendor with the given id
    #[error("vendor {0} does not exist")]
    UnknownVendor(Uuid),

    /// Backend failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Persistence for users, vendors and vendor catalogs.
///
/// Item mutations are addressed by vendor id and item id and are atomic per
/// item, so concurrent edits to the same catalog never drop each other.
#[async_trait]
pub trait MarketStore: Send + Sync {
    /// Insert a user; fails with `DuplicatePhone` when the phone is taken
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError>;

    /// Insert a vendor; fails with `DuplicatePhone` or `DuplicateScannerCode`
    async fn insert_vendor(&self, vendor: NewVendor) -> Result<Vendor, StoreError>;

    async fn find_vendor_by_phone(&self, phone: &str) -> Result<Option<Vendor>, StoreError>;

    /// All vendors in registration order
    async fn list_vendors(&self) -> Result<Vec<Vendor>, StoreError>;

    /// Append an item to the end of a vendor's catalog
    async fn append_item(
        &self,
        vendor_id: Uuid,
        item: NewProduceItem,
    ) -> Result<ProduceItem, StoreError>;

    /// A vendor's items in insertion order
    async fn list_items(&self, vendor_id: Uuid) -> Result<Vec<ProduceItem>, StoreError>;

    /// Apply a partial update; `None` when the vendor has no such item
    async fn update_item(
        &self,
        vendor_id: Uuid,
        item_id: Uuid,
        patch: &ItemPatch,
    ) -> Result<Option<ProduceItem>, StoreError>;

    /// Remove an item; false when the vendor has no such item
    async fn remove_item(&self, vendor_id: Uuid, item_id: Uuid) -> Result<bool, StoreError>;

    /// Every vendor's items, vendor order then insertion order
    async fn list_all_items(&self) -> Result<Vec<DirectoryItem>, StoreError>;

    /// Check the backend is reachable
    async fn health_check(&self) -> Result<bool, StoreError>;
}
