use sea_orm::DatabaseConnection;
use tracing::info;

use super::providers;
use crate::config::DatabaseConfig;

/// Connects through the provider matching the URL scheme and brings the schema
/// in line with the entities.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = providers::default_registry()?.connect(cfg).await?;
    sync_schema(&db).await?;
    Ok(db)
}

pub async fn sync_schema(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("syncing database schema from entities");
    db.get_schema_registry("shopping_lists::db::entities::*")
        .sync(db)
        .await?;
    Ok(())
}
