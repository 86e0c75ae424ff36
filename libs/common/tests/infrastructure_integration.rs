//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database is properly configured
//! and accessible. They need a running server, so they are ignored by default:
//! `cargo test -p common -- --ignored`.

use common::database::{DatabaseConfig, health_check, init_pool};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_database_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_unique_violation_is_recognised() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    // Temp tables are connection-scoped.
    let mut conn = pool.acquire().await?;

    sqlx::query("CREATE TEMP TABLE phones (phone TEXT CONSTRAINT phones_phone_key UNIQUE)")
        .execute(&mut *conn)
        .await?;
    sqlx::query("INSERT INTO phones (phone) VALUES ('555')")
        .execute(&mut *conn)
        .await?;

    let err = sqlx::query("INSERT INTO phones (phone) VALUES ('555')")
        .execute(&mut *conn)
        .await
        .expect_err("duplicate insert should fail");

    assert_eq!(
        common::error::DatabaseError::unique_violation(&err).as_deref(),
        Some("phones_phone_key")
    );

    Ok(())
}
