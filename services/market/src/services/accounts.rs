//! Registration and login for users and vendors

use serde::Serialize;
use tracing::{info, warn};

use super::DirectoryService;
use crate::{
    credentials::CredentialStore,
    error::{AccountKind, MarketError, MarketResult},
    models::{
        LoginCredentials, RegisterUserRequest, RegisterVendorRequest, UserProfile, VendorProfile,
    },
    validation,
};

/// Successful user login: the user plus the vendor directory to browse
#[derive(Debug, Clone, Serialize)]
pub struct UserLogin {
    pub user: UserProfile,
    pub vendors: Vec<VendorProfile>,
}

/// Account registration and login flows
#[derive(Clone)]
pub struct AccountService {
    credentials: CredentialStore,
    directory: DirectoryService,
}

impl AccountService {
    pub fn new(credentials: CredentialStore, directory: DirectoryService) -> Self {
        Self {
            credentials,
            directory,
        }
    }

    /// Register a user
    pub async fn register_user(&self, req: &RegisterUserRequest) -> MarketResult<UserProfile> {
        let registration =
            validation::validate_user_registration(req).map_err(MarketError::Validation)?;

        let user = self.credentials.create_user(registration).await?;
        info!("User registered: {}", user.phone);

        Ok(UserProfile::from(&user))
    }

    /// Register a vendor; the profile carries the generated scanner code
    pub async fn register_vendor(&self, req: &RegisterVendorRequest) -> MarketResult<VendorProfile> {
        let registration =
            validation::validate_vendor_registration(req).map_err(MarketError::Validation)?;

        let vendor = self.credentials.create_vendor(registration).await?;
        info!(
            "Vendor registered: {} with scanner code {}",
            vendor.phone, vendor.scanner_code
        );

        Ok(VendorProfile::from(&vendor))
    }

    /// Log a user in and hand back the vendor directory
    pub async fn login_user(&self, credentials: &LoginCredentials) -> MarketResult<UserLogin> {
        let (phone, password) =
            validation::validate_login(credentials).map_err(MarketError::Validation)?;
        info!("Login attempt for user: {}", phone);

        let user = self
            .credentials
            .find_user_by_phone(&phone)
            .await?
            .ok_or(MarketError::AccountNotFound(AccountKind::User))?;

        if !self.credentials.verify_password(&user.password_hash, &password)? {
            warn!("Invalid password for user: {}", phone);
            return Err(MarketError::InvalidCredentials);
        }

        let vendors = self.directory.list_vendors().await?;

        Ok(UserLogin {
            user: UserProfile::from(&user),
            vendors,
        })
    }

    /// Log a vendor in
    pub async fn login_vendor(&self, credentials: &LoginCredentials) -> MarketResult<VendorProfile> {
        let (phone, password) =
            validation::validate_login(credentials).map_err(MarketError::Validation)?;
        info!("Login attempt for vendor: {}", phone);

        let vendor = self
            .credentials
            .find_vendor_by_phone(&phone)
            .await?
            .ok_or(MarketError::AccountNotFound(AccountKind::Vendor))?;

        if !self
            .credentials
            .verify_password(&vendor.password_hash, &password)?
        {
            warn!("Invalid password for vendor: {}", phone);
            return Err(MarketError::InvalidCredentials);
        }

        Ok(VendorProfile::from(&vendor))
    }
}
