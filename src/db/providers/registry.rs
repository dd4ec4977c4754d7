use std::{collections::HashMap, sync::Arc, time::Duration};

use anyhow::{Result, bail};
use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbProviderId {
    Postgres,
    Sqlite,
}

impl DbProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            DbProviderId::Postgres => "postgres",
            DbProviderId::Sqlite => "sqlite",
        }
    }
}

#[async_trait]
pub trait DbProvider: Send + Sync {
    fn id(&self) -> DbProviderId;
    fn supports_url(&self, url: &str) -> bool;
    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection>;
    async fn post_connect(&self, _db: &DatabaseConnection, _cfg: &DatabaseConfig) -> Result<()> {
        Ok(())
    }
}

/// Pool options shared by every provider.
pub(super) fn pool_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_idle)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    options
}

pub struct DbProviders {
    providers: HashMap<DbProviderId, Arc<dyn DbProvider>>,
}

impl DbProviders {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn DbProvider>) -> Result<Self> {
        self.add(provider)?;
        Ok(self)
    }

    pub fn add(&mut self, provider: Arc<dyn DbProvider>) -> Result<()> {
        let id = provider.id();
        if self.providers.contains_key(&id) {
            bail!("database provider already registered: {}", id.as_str());
        }
        self.providers.insert(id, provider);
        Ok(())
    }

    pub fn provider_for_url(&self, url: &str) -> Result<Arc<dyn DbProvider>> {
        self.providers
            .values()
            .find(|provider| provider.supports_url(url))
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unsupported database url '{}'; expected scheme postgres://, postgresql://, or sqlite:",
                    redact_url(url)
                )
            })
    }

    /// Resolves the provider for `cfg.url`, connects and runs its post-connect hook.
    pub async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        let provider = self.provider_for_url(&cfg.url)?;
        info!(
            provider = provider.id().as_str(),
            url = %redact_url(&cfg.url),
            "connecting to database"
        );
        let db = provider.connect(cfg).await?;
        provider.post_connect(&db, cfg).await?;
        Ok(db)
    }
}

impl Default for DbProviders {
    fn default() -> Self {
        Self::new()
    }
}

fn redact_url(url: &str) -> String {
    let trimmed = url.trim();
    if let Some((scheme, _)) = trimmed.split_once("://") {
        format!("{scheme}://<redacted>")
    } else if let Some((scheme, _)) = trimmed.split_once(':') {
        format!("{scheme}:<redacted>")
    } else {
        "<invalid-url>".to_string()
    }
}
