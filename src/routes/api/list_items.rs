use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    db::dao::{NewListItem, Page},
    db::entities::list_item::{self, ItemState},
    response::{ApiResult, JsonApiResponse},
    routes::CurrentUser,
    services::{
        ServiceContext,
        list_item_service::{ItemUpdate, ListItemService},
    },
    state::AppState,
    validation::{FieldErrors, Validate},
};

const NAME_MAX: usize = 254;
const UNIT_MAX: usize = 31;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

impl Validate for CreateItemRequest {
    fn validate(&self, errors: &mut FieldErrors) {
        errors.max_length("name", self.name.as_deref(), NAME_MAX);
        errors.min("amount", self.amount, 0.0);
        errors.max_length("unit", self.unit.as_deref(), UNIT_MAX);
    }
}

impl From<CreateItemRequest> for NewListItem {
    fn from(body: CreateItemRequest) -> Self {
        Self {
            name: body.name,
            amount: body.amount,
            unit: body.unit,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub state: Option<String>,
}

impl Validate for UpdateItemRequest {
    fn validate(&self, errors: &mut FieldErrors) {
        errors.max_length("name", self.name.as_deref(), NAME_MAX);
        errors.min("amount", self.amount, 0.0);
        errors.max_length("unit", self.unit.as_deref(), UNIT_MAX);
        errors.min("price", self.price, 0.0);
        let unknown_state = self
            .state
            .as_deref()
            .is_some_and(|state| ItemState::try_from(state).is_err());
        if unknown_state {
            errors.add(
                "state",
                "isEnum",
                "state must be one of the following values: none, selected, missing",
            );
        }
    }
}

impl UpdateItemRequest {
    /// Call after [`Validate::validated`]; an unknown state is dropped here.
    fn into_update(self) -> ItemUpdate {
        ItemUpdate {
            name: self.name,
            amount: self.amount,
            unit: self.unit,
            price: self.price,
            state: self
                .state
                .as_deref()
                .and_then(|state| ItemState::try_from(state).ok()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: i32,
    pub list_id: i32,
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub state: ItemState,
    pub price: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<list_item::Model> for ItemResponse {
    fn from(item: list_item::Model) -> Self {
        let state = item.item_state();
        Self {
            id: item.id,
            list_id: item.list_id,
            name: item.name,
            amount: item.amount,
            unit: item.unit,
            state,
            price: item.price,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/lists/{list_id}/items", get(list_items).post(create_item))
        .route(
            "/lists/{list_id}/items/{item_id}",
            put(update_item).delete(remove_item),
        )
        .with_state(state)
}

fn item_service(state: &AppState) -> ListItemService {
    ServiceContext::from_state(state).list_item()
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(list_id): Path<i32>,
) -> ApiResult<Page<ItemResponse>> {
    let items = item_service(state.as_ref())
        .list_items(list_id, user.id)
        .await?;
    JsonApiResponse::ok(items.map(Into::into))
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(list_id): Path<i32>,
    Json(body): Json<CreateItemRequest>,
) -> ApiResult<ItemResponse> {
    body.validated()?;
    let item = item_service(state.as_ref())
        .create_item(list_id, body.into(), user.id)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "created", item.into())
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path((list_id, item_id)): Path<(i32, i32)>,
    Json(body): Json<UpdateItemRequest>,
) -> ApiResult<ItemResponse> {
    body.validated()?;
    let item = item_service(state.as_ref())
        .update_item(list_id, item_id, body.into_update(), user.id)
        .await?;
    JsonApiResponse::with_status(StatusCode::ACCEPTED, "updated", item.into())
}

async fn remove_item(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path((list_id, item_id)): Path<(i32, i32)>,
) -> ApiResult<()> {
    item_service(state.as_ref())
        .remove_item(list_id, item_id, user.id)
        .await?;
    JsonApiResponse::ok(())
}

#[cfg(test)]
mod tests {
    use super::UpdateItemRequest;
    use crate::db::entities::list_item::ItemState;
    use crate::validation::Validate;

    fn request(value: serde_json::Value) -> UpdateItemRequest {
        serde_json::from_value(value).expect("payload should deserialize")
    }

    #[test]
    fn unknown_state_is_a_field_error() {
        let err = request(serde_json::json!({ "state": "bought" }))
            .validated()
            .expect_err("state is invalid");
        assert!(
            err.field_errors()
                .and_then(|errors| errors.get("state"))
                .is_some_and(|constraints| constraints.contains_key("isEnum"))
        );
    }

    #[test]
    fn known_state_is_parsed() {
        let body = request(serde_json::json!({ "state": "missing", "price": 1.5 }));
        body.validated().expect("payload is valid");
        let update = body.into_update();
        assert_eq!(update.state, Some(ItemState::Missing));
        assert_eq!(update.price, Some(1.5));
        assert_eq!(update.amount, None);
    }
}
