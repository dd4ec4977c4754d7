use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{list_items, lists, public, users};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(public::router())
        .merge(users::router(state.clone()))
        .merge(lists::router(state.clone()))
        .merge(list_items::router(state))
}
