//! Input validation utilities

use serde_json::Value;

use crate::models::{
    ItemInput, ItemPatch, LoginCredentials, NewProduceItem, RegisterUserRequest,
    RegisterVendorRequest, vendor::DEFAULT_SERVICE,
};

const RATE_MESSAGE: &str = "rate must be a non-negative number";

/// Registration fields for a user, trimmed and known to be present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistration {
    pub name: String,
    pub phone: String,
    pub password: String,
}

/// Registration fields for a vendor, trimmed and known to be present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorRegistration {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub locality: String,
    pub service: String,
}

/// Return the trimmed value if present and not blank
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Passwords are checked for presence but never trimmed; whitespace counts
fn present_password(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Validate a user registration request
pub fn validate_user_registration(req: &RegisterUserRequest) -> Result<UserRegistration, String> {
    match (
        present(req.name.as_deref()),
        present(req.phone.as_deref()),
        present_password(req.password.as_deref()),
    ) {
        (Some(name), Some(phone), Some(password)) => Ok(UserRegistration {
            name: name.to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
        }),
        _ => Err("All fields (name, phone, password) are required".to_string()),
    }
}

/// Validate a vendor registration request, defaulting a blank service
pub fn validate_vendor_registration(
    req: &RegisterVendorRequest,
) -> Result<VendorRegistration, String> {
    match (
        present(req.name.as_deref()),
        present(req.phone.as_deref()),
        present_password(req.password.as_deref()),
        present(req.locality.as_deref()),
    ) {
        (Some(name), Some(phone), Some(password), Some(locality)) => Ok(VendorRegistration {
            name: name.to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
            locality: locality.to_string(),
            service: normalize_service(req.service.as_deref()),
        }),
        _ => Err("All fields (name, phone, password, locality) are required".to_string()),
    }
}

/// Service label or the default when absent or blank
pub fn normalize_service(service: Option<&str>) -> String {
    present(service).unwrap_or(DEFAULT_SERVICE).to_string()
}

/// Validate login credentials, returning the trimmed phone and the password
pub fn validate_login(credentials: &LoginCredentials) -> Result<(String, String), String> {
    match (
        present(credentials.phone.as_deref()),
        present_password(credentials.password.as_deref()),
    ) {
        (Some(phone), Some(password)) => Ok((phone.to_string(), password.to_string())),
        _ => Err("All fields (phone, password) are required".to_string()),
    }
}

/// Validate a vendor phone used to address a catalog
pub fn validate_phone(phone: &str) -> Result<&str, String> {
    present(Some(phone)).ok_or_else(|| "phone is required".to_string())
}

/// Parse a rate given as a JSON number or a numeric string.
///
/// The rate must be finite and non-negative.
pub fn parse_rate(value: &Value) -> Result<f64, String> {
    let rate = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match rate {
        Some(rate) if rate.is_finite() && rate >= 0.0 => Ok(rate),
        _ => Err(RATE_MESSAGE.to_string()),
    }
}

/// Validate fields for a new item: name and area trimmed and non-empty, rate present
pub fn validate_new_item(input: &ItemInput) -> Result<NewProduceItem, String> {
    let name = present(input.name.as_deref());
    let area = present(input.area.as_deref());
    let rate = input.rate.as_ref().filter(|v| !v.is_null());

    match (name, rate, area) {
        (Some(name), Some(rate), Some(area)) => Ok(NewProduceItem {
            name: name.to_string(),
            rate: parse_rate(rate)?,
            area: area.to_string(),
        }),
        _ => Err("phone and vegetable {name, rate, area} are required".to_string()),
    }
}

/// Validate a partial update; null or absent fields are left out of the patch
pub fn validate_item_patch(input: &ItemInput) -> Result<ItemPatch, String> {
    let name = match input.name.as_deref() {
        None => None,
        Some(name) => Some(
            present(Some(name))
                .ok_or_else(|| "name must not be empty".to_string())?
                .to_string(),
        ),
    };

    let area = match input.area.as_deref() {
        None => None,
        Some(area) => Some(
            present(Some(area))
                .ok_or_else(|| "area must not be empty".to_string())?
                .to_string(),
        ),
    };

    let rate = match input.rate.as_ref() {
        None | Some(Value::Null) => None,
        Some(rate) => Some(parse_rate(rate)?),
    };

    Ok(ItemPatch { name, rate, area })
}
