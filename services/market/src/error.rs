//! Error types for the market service

use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::repositories::StoreError;

/// Which kind of account an operation addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    User,
    Vendor,
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountKind::User => f.write_str("User"),
            AccountKind::Vendor => f.write_str("Vendor"),
        }
    }
}

/// Error type for every marketplace operation
#[derive(Error, Debug)]
pub enum MarketError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Phone already registered for this account kind
    #[error("Phone number already registered")]
    DuplicatePhone,

    /// No account with the given phone, reported on login
    #[error("{0} not found")]
    AccountNotFound(AccountKind),

    /// Referenced vendor or item does not exist
    #[error("{0}")]
    NotFound(String),

    /// Password does not match the stored hash
    #[error("Invalid password")]
    InvalidCredentials,

    /// Generated scanner code already taken by another vendor
    #[error("Scanner code collision. Please retry registration.")]
    ScannerCodeCollision,

    /// Storage or other unexpected failure
    #[error("{0}")]
    Internal(String),
}

impl MarketError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarketError::Validation(_)
            | MarketError::DuplicatePhone
            | MarketError::AccountNotFound(_)
            | MarketError::InvalidCredentials => StatusCode::BAD_REQUEST,
            MarketError::NotFound(_) => StatusCode::NOT_FOUND,
            MarketError::ScannerCodeCollision | MarketError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for MarketError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicatePhone => MarketError::DuplicatePhone,
            StoreError::DuplicateScannerCode => MarketError::ScannerCodeCollision,
            StoreError::UnknownVendor(_) => MarketError::NotFound("Vendor not found".to_string()),
            StoreError::Database(e) => MarketError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for MarketError {
    fn from(rejection: JsonRejection) -> Self {
        MarketError::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for MarketError {
    fn from(rejection: FormRejection) -> Self {
        MarketError::Validation(rejection.body_text())
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for market results
pub type MarketResult<T> = Result<T, MarketError>;
