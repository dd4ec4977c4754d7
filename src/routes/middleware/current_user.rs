use std::sync::Arc;

use axum::extract::FromRequestParts;

use crate::{error::AppError, services::ServiceContext, state::AppState};

/// Header carrying the id of the calling user.
pub const USER_ID_HEADER: &str = "user-id";

/// The caller, resolved from [`USER_ID_HEADER`] to an existing user.
///
/// Rejects with 401 before the handler runs, so no list or item is looked up
/// for an anonymous caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>().copied() {
            return Ok(user);
        }

        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i32>().ok())
            .ok_or_else(|| AppError::unauthorized("Missing/invalid user-id header"))?;

        let user = ServiceContext::from_state(state.as_ref())
            .user()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Unknown user"))?;

        let current = CurrentUser { id: user.id };
        parts.extensions.insert(current);
        Ok(current)
    }
}
