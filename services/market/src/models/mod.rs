//! Marketplace models

pub mod produce;
pub mod user;
pub mod vendor;

// Re-export for convenience
pub use produce::{
    AddItemRequest, Catalog, DirectoryItem, ItemInput, ItemPatch, NewProduceItem, ProduceItem,
    UpdateItemRequest,
};
pub use user::{LoginCredentials, NewUser, RegisterUserRequest, User, UserProfile};
pub use vendor::{NewVendor, RegisterVendorRequest, Vendor, VendorProfile, VendorSummary};
