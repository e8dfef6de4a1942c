use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::query_builder::QueryBuilder;
use crate::database::store::{Collection, Document, DocumentStore, InsertOneResult, ID_FIELD};
use crate::filter::FilterData;

/// Errors from the document stores
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Stored document is not a JSON object: {0}")]
    Serialization(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Postgres-backed document store. Each collection is a table of JSONB
/// documents keyed by a UUID assigned on insert.
pub struct DatabaseManager {
    pool: PgPool,
    query_logging: bool,
}

impl DatabaseManager {
    /// Open the pool and make sure the collection tables exist
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        let manager = Self::from_pool(pool, config.enable_query_logging);
        manager.ensure_tables().await?;
        info!("Connected document store (max_connections={})", config.max_connections);
        Ok(manager)
    }

    pub fn from_pool(pool: PgPool, query_logging: bool) -> Self {
        Self { pool, query_logging }
    }

    /// Create collection tables when missing. There is no migration history;
    /// the layout is fixed.
    pub async fn ensure_tables(&self) -> Result<(), DatabaseError> {
        for collection in Collection::ALL {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (\
                 \"id\" UUID PRIMARY KEY, \
                 \"doc\" JSONB NOT NULL, \
                 \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT now())",
                collection.table_name()
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn builder(&self, collection: Collection) -> Result<QueryBuilder, DatabaseError> {
        Ok(QueryBuilder::new(collection.table_name())?.query_logging(self.query_logging))
    }
}

#[async_trait]
impl DocumentStore for DatabaseManager {
    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        self.builder(collection)?.select_by_id(&self.pool, id).await
    }

    async fn insert_one(&self, collection: Collection, mut doc: Document) -> Result<InsertOneResult, DatabaseError> {
        doc.remove(ID_FIELD);
        let id = Uuid::new_v4();
        self.builder(collection)?.insert(&self.pool, id, doc).await?;
        Ok(InsertOneResult::new(id))
    }

    async fn find_many(&self, collection: Collection, filter: &FilterData) -> Result<Vec<Document>, DatabaseError> {
        self.builder(collection)?
            .filter(filter.clone())
            .select_all(&self.pool)
            .await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
