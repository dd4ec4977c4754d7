use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use super::registry::{DbProvider, DbProviderId, pool_options};
use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

pub struct SqliteDbProvider;

impl SqliteDbProvider {
    fn is_in_memory(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }
}

#[async_trait]
impl DbProvider for SqliteDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Sqlite
    }

    fn supports_url(&self, url: &str) -> bool {
        url.trim().to_ascii_lowercase().starts_with("sqlite:")
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut options = pool_options(cfg);
        // every pooled connection to an in-memory database sees its own empty database
        if Self::is_in_memory(&cfg.url) {
            options.max_connections(1).min_connections(1);
        }
        Ok(Database::connect(options).await?)
    }

    async fn post_connect(&self, db: &DatabaseConnection, _cfg: &DatabaseConfig) -> Result<()> {
        // list deletion cascades to items and permissions
        db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
            .await?;
        Ok(())
    }
}
