use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    db::entities::user,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
    validation::{FieldErrors, Validate},
};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
}

impl Validate for CreateUserRequest {
    fn validate(&self, errors: &mut FieldErrors) {
        if self.username.trim().is_empty() {
            errors.add("username", "isNotEmpty", "username should not be empty");
        }
        errors.max_length("username", Some(&self.username), 254);

        let email = self.email.trim();
        let looks_like_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !looks_like_email {
            errors.add("email", "isEmail", "email must be an email");
        }
        errors.max_length("email", Some(email), 254);
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: DateTimeWithTimeZone,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", post(create_user))
        .with_state(state)
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<UserResponse> {
    body.validated()?;
    let service = ServiceContext::from_state(state.as_ref()).user();
    let user = service
        .create_user(body.username.trim(), body.email.trim())
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "created", user.into())
}
