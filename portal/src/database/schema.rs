//! Database schema and migrations
//!
//! This module handles database initialization and schema migrations.
//! The portal needs a single key-value table; migrations are numbered SQL
//! files applied in order inside a transaction each.

use crate::error::Result;
use sqlx::sqlite::SqlitePool;

/// Numbered schema migrations, applied in ascending order
const MIGRATIONS: &[(i32, &str)] = &[(1, include_str!("migrations/001_initial_schema.sql"))];

/// Bring the database schema up to the latest migration
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current: i32 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM migrations")
        .fetch_one(pool)
        .await?;

    let pending: Vec<_> = MIGRATIONS.iter().filter(|(v, _)| *v > current).collect();
    if pending.is_empty() {
        tracing::debug!("Schema up to date at version {}", current);
        return Ok(());
    }

    for (version, sql) in pending {
        let mut tx = pool.begin().await?;

        for statement in sql.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        sqlx::query("INSERT INTO migrations (version) VALUES (?)")
            .bind(*version)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!("Applied schema migration {}", version);
    }

    Ok(())
}
