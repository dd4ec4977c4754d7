use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    db::dao::DaoContext,
    services::{
        list_item_service::ListItemService, list_service::ListService,
        permission_service::PermissionPolicy, user_service::UserService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    policy: Arc<PermissionPolicy>,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection, policy: Arc<PermissionPolicy>) -> Self {
        Self {
            daos: DaoContext::new(db),
            policy,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db, state.policy.clone())
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn list(&self) -> ListService {
        ListService::new(self.daos.clone(), self.policy.clone())
    }

    pub fn list_item(&self) -> ListItemService {
        ListItemService::new(self.daos.clone(), self.list())
    }
}
