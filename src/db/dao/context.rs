use sea_orm::DatabaseConnection;

use super::{DaoBase, ListDao, ListItemDao, PermissionDao, UserDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn list(&self) -> ListDao {
        DaoBase::new(&self.db)
    }

    pub fn list_item(&self) -> ListItemDao {
        DaoBase::new(&self.db)
    }

    pub fn permission(&self) -> PermissionDao {
        DaoBase::new(&self.db)
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }
}
