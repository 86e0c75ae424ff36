//! Credential store: account persistence with password hashing

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::Rng;
use tracing::{info, warn};

use crate::{
    error::{MarketError, MarketResult},
    models::{NewUser, NewVendor, User, Vendor},
    repositories::MarketStore,
    validation::{UserRegistration, VendorRegistration},
};

pub const SCANNER_CODE_PREFIX: &str = "SCAN-";
pub const SCANNER_CODE_LENGTH: usize = 9;
const SCANNER_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

type ScannerCodeGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Generate a scanner code: `SCAN-` followed by 9 characters from `[A-Z0-9]`
pub fn generate_scanner_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SCANNER_CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..SCANNER_CODE_ALPHABET.len());
            char::from(SCANNER_CODE_ALPHABET[idx])
        })
        .collect();

    format!("{SCANNER_CODE_PREFIX}{suffix}")
}

/// Hash a password into an argon2 PHC string
pub fn hash_password(password: &str) -> MarketResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| MarketError::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(hash)
}

/// Check a plaintext password against a stored hash
pub fn verify_password(password_hash: &str, password: &str) -> MarketResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| MarketError::Internal(format!("Failed to parse password hash: {}", e)))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Persists users and vendors, storing only password hashes
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn MarketStore>,
    scanner_codes: ScannerCodeGenerator,
}

impl CredentialStore {
    /// Create a credential store generating random scanner codes
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self {
            store,
            scanner_codes: Arc::new(generate_scanner_code),
        }
    }

    /// Replace the scanner code source
    #[cfg(test)]
    pub fn with_scanner_codes(
        mut self,
        generator: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.scanner_codes = Arc::new(generator);
        self
    }

    /// Create a user; fails with `DuplicatePhone` if the phone is taken
    pub async fn create_user(&self, registration: UserRegistration) -> MarketResult<User> {
        info!("Creating new user: {}", registration.phone);

        if self.find_user_by_phone(&registration.phone).await?.is_some() {
            warn!("User phone already registered: {}", registration.phone);
            return Err(MarketError::DuplicatePhone);
        }

        let password_hash = hash_password(&registration.password)?;
        let user = self
            .store
            .insert_user(NewUser {
                name: registration.name,
                phone: registration.phone,
                password_hash,
            })
            .await?;

        Ok(user)
    }

    /// Create a vendor with a fresh scanner code.
    ///
    /// A scanner code collision fails the call; it is not retried.
    pub async fn create_vendor(&self, registration: VendorRegistration) -> MarketResult<Vendor> {
        info!("Creating new vendor: {}", registration.phone);

        if self.find_vendor_by_phone(&registration.phone).await?.is_some() {
            warn!("Vendor phone already registered: {}", registration.phone);
            return Err(MarketError::DuplicatePhone);
        }

        let password_hash = hash_password(&registration.password)?;
        let vendor = self
            .store
            .insert_vendor(NewVendor {
                name: registration.name,
                phone: registration.phone,
                password_hash,
                locality: registration.locality,
                service: registration.service,
                scanner_code: (self.scanner_codes)(),
            })
            .await
            .inspect_err(|e| warn!("Vendor insert rejected: {}", e))?;

        Ok(vendor)
    }

    pub async fn find_user_by_phone(&self, phone: &str) -> MarketResult<Option<User>> {
        Ok(self.store.find_user_by_phone(phone).await?)
    }

    pub async fn find_vendor_by_phone(&self, phone: &str) -> MarketResult<Option<Vendor>> {
        Ok(self.store.find_vendor_by_phone(phone).await?)
    }

    /// Verify a plaintext password against an account's stored hash
    pub fn verify_password(&self, password_hash: &str, password: &str) -> MarketResult<bool> {
        verify_password(password_hash, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryMarketStore;

    fn credentials() -> CredentialStore {
        CredentialStore::new(Arc::new(InMemoryMarketStore::new()))
    }

    fn vendor_registration(phone: &str) -> VendorRegistration {
        VendorRegistration {
            name: "Ravi".to_string(),
            phone: phone.to_string(),
            password: "secret".to_string(),
            locality: "Baner".to_string(),
            service: "General".to_string(),
        }
    }

    #[test]
    fn test_scanner_code_format() {
        let code = generate_scanner_code();
        let suffix = code.strip_prefix(SCANNER_CODE_PREFIX).unwrap();
        assert_eq!(suffix.len(), SCANNER_CODE_LENGTH);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret").unwrap();
        assert_ne!(hash, "secret");
        assert!(verify_password(&hash, "secret").unwrap());
        assert!(!verify_password(&hash, "Secret").unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            verify_password("not-a-hash", "secret"),
            Err(MarketError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_create_user_stores_hash_only() {
        let credentials = credentials();
        let user = credentials
            .create_user(UserRegistration {
                name: "Asha".to_string(),
                phone: "555".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_ne!(user.password_hash, "secret");
        assert!(credentials.verify_password(&user.password_hash, "secret").unwrap());

        let found = credentials.find_user_by_phone("555").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_create_vendor_assigns_scanner_code() {
        let credentials = credentials();
        let vendor = credentials
            .create_vendor(vendor_registration("555"))
            .await
            .unwrap();

        assert!(vendor.scanner_code.starts_with(SCANNER_CODE_PREFIX));
    }

    #[tokio::test]
    async fn test_scanner_code_collision_is_not_retried() {
        let credentials = credentials().with_scanner_codes(|| "SCAN-AAAAAAAAA".to_string());

        credentials
            .create_vendor(vendor_registration("1"))
            .await
            .unwrap();
        let err = credentials
            .create_vendor(vendor_registration("2"))
            .await
            .unwrap_err();

        assert!(matches!(err, MarketError::ScannerCodeCollision));
        assert!(credentials.find_vendor_by_phone("2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_vendor_phone() {
        let credentials = credentials();
        credentials
            .create_vendor(vendor_registration("555"))
            .await
            .unwrap();

        let err = credentials
            .create_vendor(vendor_registration("555"))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::DuplicatePhone));
    }
}
