//! Account, catalog and directory operations

pub mod accounts;
pub mod catalog;
pub mod directory;

pub use accounts::{AccountService, UserLogin};
pub use catalog::CatalogService;
pub use directory::DirectoryService;
