use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, services::permission_service::PermissionPolicy};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub policy: Arc<PermissionPolicy>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection, policy: PermissionPolicy) -> Arc<Self> {
        Arc::new(Self {
            config,
            db,
            policy: Arc::new(policy),
        })
    }
}
