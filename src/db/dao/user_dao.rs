use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn create_user(&self, username: &str, email: &str) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        Ok(User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    pub async fn find_by_username(&self, username: &str) -> DaoResult<Option<user::Model>> {
        Ok(User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    pub async fn find_optional(&self, id: i32) -> DaoResult<Option<user::Model>> {
        Ok(User::find_by_id(id).one(&self.db).await?)
    }
}
