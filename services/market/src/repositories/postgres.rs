//! PostgreSQL store

use async_trait::async_trait;
use common::error::DatabaseError;
use sqlx::{PgPool, Row, migrate::Migrator, postgres::PgRow};
use tracing::{error, info};
use uuid::Uuid;

use super::{MarketStore, StoreError};
use crate::models::{
    DirectoryItem, ItemPatch, NewProduceItem, NewUser, NewVendor, ProduceItem, User, Vendor,
    VendorSummary,
};

/// Schema migrations bundled with the service
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const USERS_PHONE_KEY: &str = "users_phone_key";
const VENDORS_PHONE_KEY: &str = "vendors_phone_key";
const VENDORS_SCANNER_CODE_KEY: &str = "vendors_scanner_code_key";

const VENDOR_COLUMNS: &str = "id, name, phone, password_hash, locality, service, scanner_code";

/// Market store backed by PostgreSQL
#[derive(Clone)]
pub struct PgMarketStore {
    pool: PgPool,
}

impl PgMarketStore {
    /// Create a new store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        info!("Running database migrations");
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(DatabaseError::Migration)?;
        Ok(())
    }
}

fn query_error(err: sqlx::Error) -> StoreError {
    match DatabaseError::unique_violation(&err).as_deref() {
        Some(USERS_PHONE_KEY | VENDORS_PHONE_KEY) => StoreError::DuplicatePhone,
        Some(VENDORS_SCANNER_CODE_KEY) => StoreError::DuplicateScannerCode,
        _ => {
            error!("Database query failed: {}", err);
            StoreError::Database(DatabaseError::Query(err))
        }
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        phone: row.get("phone"),
        password_hash: row.get("password_hash"),
    }
}

fn vendor_from_row(row: &PgRow) -> Vendor {
    Vendor {
        id: row.get("id"),
        name: row.get("name"),
        phone: row.get("phone"),
        password_hash: row.get("password_hash"),
        locality: row.get("locality"),
        service: row.get("service"),
        scanner_code: row.get("scanner_code"),
    }
}

fn item_from_row(row: &PgRow) -> ProduceItem {
    ProduceItem {
        id: row.get("id"),
        name: row.get("name"),
        rate: row.get("rate"),
        area: row.get("area"),
    }
}

#[async_trait]
impl MarketStore for PgMarketStore {
    async fn insert_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, name, phone, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, phone, password_hash
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.name)
        .bind(&new_user.phone)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(user_from_row(&row))
    }

    async fn find_user_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, password_hash
            FROM users
            WHERE phone = $1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn insert_vendor(&self, new_vendor: NewVendor) -> Result<Vendor, StoreError> {
        let sql = format!(
            "INSERT INTO vendors (id, name, phone, password_hash, locality, service, scanner_code) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {VENDOR_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_vendor.name)
            .bind(&new_vendor.phone)
            .bind(&new_vendor.password_hash)
            .bind(&new_vendor.locality)
            .bind(&new_vendor.service)
            .bind(&new_vendor.scanner_code)
            .fetch_one(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(vendor_from_row(&row))
    }

    async fn find_vendor_by_phone(&self, phone: &str) -> Result<Option<Vendor>, StoreError> {
        let sql = format!("SELECT {VENDOR_COLUMNS} FROM vendors WHERE phone = $1");

        let row = sqlx::query(&sql)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(row.as_ref().map(vendor_from_row))
    }

    async fn list_vendors(&self) -> Result<Vec<Vendor>, StoreError> {
        let sql = format!("SELECT {VENDOR_COLUMNS} FROM vendors ORDER BY position");

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(rows.iter().map(vendor_from_row).collect())
    }

    async fn append_item(
        &self,
        vendor_id: Uuid,
        item: NewProduceItem,
    ) -> Result<ProduceItem, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO produce_items (id, vendor_id, name, rate, area)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, rate, area
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vendor_id)
        .bind(&item.name)
        .bind(item.rate)
        .bind(&item.area)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let missing_vendor =
                matches!(&e, sqlx::Error::Database(db) if db.is_foreign_key_violation());
            if missing_vendor {
                StoreError::UnknownVendor(vendor_id)
            } else {
                query_error(e)
            }
        })?;

        Ok(item_from_row(&row))
    }

    async fn list_items(&self, vendor_id: Uuid) -> Result<Vec<ProduceItem>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, rate, area
            FROM produce_items
            WHERE vendor_id = $1
            ORDER BY position
            "#,
        )
        .bind(vendor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    async fn update_item(
        &self,
        vendor_id: Uuid,
        item_id: Uuid,
        patch: &ItemPatch,
    ) -> Result<Option<ProduceItem>, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE produce_items
            SET name = COALESCE($3, name),
                rate = COALESCE($4, rate),
                area = COALESCE($5, area)
            WHERE vendor_id = $1 AND id = $2
            RETURNING id, name, rate, area
            "#,
        )
        .bind(vendor_id)
        .bind(item_id)
        .bind(patch.name.as_deref())
        .bind(patch.rate)
        .bind(patch.area.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(row.as_ref().map(item_from_row))
    }

    async fn remove_item(&self, vendor_id: Uuid, item_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM produce_items
            WHERE vendor_id = $1 AND id = $2
            "#,
        )
        .bind(vendor_id)
        .bind(item_id)
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all_items(&self) -> Result<Vec<DirectoryItem>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, p.rate, p.area,
                   v.name AS vendor_name, v.phone AS vendor_phone,
                   v.locality AS vendor_locality, v.scanner_code AS vendor_scanner_code
            FROM produce_items p
            JOIN vendors v ON v.id = p.vendor_id
            ORDER BY v.position, p.position
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(rows
            .iter()
            .map(|row| {
                let vendor = VendorSummary {
                    name: row.get("vendor_name"),
                    phone: row.get("vendor_phone"),
                    locality: row.get("vendor_locality"),
                    scanner_code: row.get("vendor_scanner_code"),
                };
                DirectoryItem::new(&item_from_row(row), vendor)
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(common::database::health_check(&self.pool).await?)
    }
}
