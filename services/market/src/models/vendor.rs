//! Vendor model and related functionality

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Service label used when a vendor does not name one
pub const DEFAULT_SERVICE: &str = "General";

/// Vendor entity
#[derive(Debug, Clone)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub password_hash: String,
    pub locality: String,
    pub service: String,
    pub scanner_code: String,
}

impl Vendor {
    /// Service label, falling back to the default for blank values
    pub fn service_or_default(&self) -> &str {
        if self.service.trim().is_empty() {
            DEFAULT_SERVICE
        } else {
            &self.service
        }
    }
}

/// New vendor creation payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewVendor {
    pub name: String,
    pub phone: String,
    pub password_hash: String,
    pub locality: String,
    pub service: String,
    pub scanner_code: String,
}

/// Vendor registration request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterVendorRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub locality: Option<String>,
    pub service: Option<String>,
}

/// Public projection of a vendor, as shown after login and in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfile {
    pub name: String,
    pub phone: String,
    pub locality: String,
    pub service: String,
    pub scanner_code: String,
}

impl From<&Vendor> for VendorProfile {
    fn from(vendor: &Vendor) -> Self {
        Self {
            name: vendor.name.clone(),
            phone: vendor.phone.clone(),
            locality: vendor.locality.clone(),
            service: vendor.service_or_default().to_string(),
            scanner_code: vendor.scanner_code.clone(),
        }
    }
}

/// Vendor details attached to each flattened directory item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSummary {
    pub name: String,
    pub phone: String,
    pub locality: String,
    pub scanner_code: String,
}

impl From<&Vendor> for VendorSummary {
    fn from(vendor: &Vendor) -> Self {
        Self {
            name: vendor.name.clone(),
            phone: vendor.phone.clone(),
            locality: vendor.locality.clone(),
            scanner_code: vendor.scanner_code.clone(),
        }
    }
}
