use tracing::info;

use crate::db::dao::UserDao;
use crate::db::entities::user;
use crate::error::AppError;

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub async fn create_user(&self, username: &str, email: &str) -> Result<user::Model, AppError> {
        if self.user_dao.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("Email already in use"));
        }
        if self.user_dao.find_by_username(username).await?.is_some() {
            return Err(AppError::conflict("Username already in use"));
        }

        let user = self.user_dao.create_user(username, email).await?;
        info!(user_id = user.id, "user created");
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, AppError> {
        Ok(self.user_dao.find_optional(id).await?)
    }
}
