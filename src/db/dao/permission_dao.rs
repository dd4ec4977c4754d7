use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::list_permission::{self, ListRight};
use crate::db::entities::prelude::ListPermission;

#[derive(Clone)]
pub struct PermissionDao {
    db: DatabaseConnection,
}

impl DaoBase for PermissionDao {
    type Entity = ListPermission;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl PermissionDao {
    pub async fn grant_in<C>(
        &self,
        conn: &C,
        list_id: i32,
        user_id: i32,
        right: ListRight,
    ) -> DaoResult<list_permission::Model>
    where
        C: ConnectionTrait + Sync,
    {
        let model = list_permission::ActiveModel {
            list_id: Set(list_id),
            user_id: Set(user_id),
            user_right: Set(right.as_str().to_string()),
            ..Default::default()
        };
        self.create_in(conn, model).await
    }

    pub async fn find_for_list(&self, list_id: i32) -> DaoResult<Vec<list_permission::Model>> {
        Ok(ListPermission::find()
            .filter(list_permission::Column::ListId.eq(list_id))
            .order_by_asc(list_permission::Column::Id)
            .all(&self.db)
            .await?)
    }
}
