//! PostgreSQL item store implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

use crate::domain::{Item, ItemError, ItemId, ItemRepository, ItemUpdate, NewItem};

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// PostgreSQL-backed item store with connection pooling.
///
/// Soft-delete semantics live in the SQL: every read and write is scoped
/// with `deleted_at IS NULL`, and writes are single conditional statements
/// so the liveness check and the mutation are atomic with respect to
/// concurrent deletes.
pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    /// Create a new store with custom pool configuration.
    pub async fn new(database_url: &str, config: PostgresConfig) -> Result<Self, ItemError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(database_url)
            .await?;
        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create a new store with default pool configuration.
    pub async fn with_defaults(database_url: &str) -> Result<Self, ItemError> {
        Self::new(database_url, PostgresConfig::default()).await
    }

    /// Run database migrations using sqlx migrate.
    pub async fn run_migrations(&self) -> Result<(), ItemError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ItemError::Internal(e.to_string()))?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying connection pool (for testing).
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Parse a database row into an Item.
    fn row_to_item(row: &sqlx::postgres::PgRow) -> Item {
        Item {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            price: row.get("price"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            deleted_at: row.get("deleted_at"),
        }
    }

    /// Classify a miss: a tombstone-scoped existence probe distinguishes
    /// a deleted row from one that never existed.
    async fn classify_missing(&self, id: ItemId) -> ItemError {
        let probe = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM items WHERE id = $1 AND deleted_at IS NOT NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;

        match probe {
            Ok(true) => ItemError::AlreadyDeleted(id),
            Ok(false) => ItemError::NotFound(id),
            Err(e) => ItemError::from(e),
        }
    }
}

#[async_trait]
impl ItemRepository for PostgresItemStore {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), ItemError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[instrument(skip(self, item), fields(item_name = %item.name))]
    async fn create(&self, item: NewItem) -> Result<Item, ItemError> {
        let id: ItemId = sqlx::query_scalar(
            r#"
            INSERT INTO items (name, description, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.created_at)
        .bind(item.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(Item {
            id,
            name: item.name,
            description: item.description,
            price: item.price,
            created_at: item.created_at,
            updated_at: item.updated_at,
            deleted_at: None,
        })
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Item>, ItemError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, created_at, updated_at, deleted_at
            FROM items
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::row_to_item).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ItemId) -> Result<Item, ItemError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price, created_at, updated_at, deleted_at
            FROM items
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Self::row_to_item(&row)),
            None => Err(self.classify_missing(id).await),
        }
    }

    #[instrument(skip(self, update), fields(item_id = update.id))]
    async fn update(&self, update: ItemUpdate) -> Result<Item, ItemError> {
        // Liveness check and mutation in one statement: a concurrently
        // tombstoned row matches zero rows and falls through to the probe.
        let row = sqlx::query(
            r#"
            UPDATE items
            SET name = $1, description = $2, price = $3, updated_at = $4
            WHERE id = $5 AND deleted_at IS NULL
            RETURNING id, name, description, price, created_at, updated_at, deleted_at
            "#,
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.price)
        .bind(update.updated_at)
        .bind(update.id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Self::row_to_item(&row)),
            None => Err(self.classify_missing(update.id).await),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ItemId) -> Result<(), ItemError> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET deleted_at = $1
            WHERE id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.classify_missing(id).await);
        }

        Ok(())
    }
}
