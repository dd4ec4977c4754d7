use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    db::dao::{ListChanges, NewList, Page},
    response::{ApiResult, JsonApiResponse},
    routes::CurrentUser,
    routes::api::list_items::{CreateItemRequest, ItemResponse},
    services::{
        ServiceContext,
        list_service::{CreateList, ListQuery, ListService, Pagination},
        list_view::ListWithItems,
    },
    state::AppState,
    validation::{FieldErrors, Validate},
};

const NAME_MAX: usize = 254;
const DESCRIPTION_MAX: usize = 1023;
const CATEGORY_MAX: usize = 254;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub items: Vec<CreateItemRequest>,
}

impl Validate for CreateListRequest {
    fn validate(&self, errors: &mut FieldErrors) {
        errors.max_length("name", self.name.as_deref(), NAME_MAX);
        errors.max_length("description", self.description.as_deref(), DESCRIPTION_MAX);
        errors.max_length("category", self.category.as_deref(), CATEGORY_MAX);
        for (idx, item) in self.items.iter().enumerate() {
            let mut item_errors = FieldErrors::new();
            item.validate(&mut item_errors);
            errors.merge_prefixed(&format!("items.{idx}."), item_errors);
        }
    }
}

impl From<CreateListRequest> for CreateList {
    fn from(body: CreateListRequest) -> Self {
        Self {
            list: NewList {
                name: body.name,
                description: body.description,
                category: body.category,
                is_template: body.is_template,
            },
            items: body.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    #[serde(default)]
    pub finished: bool,
}

impl Validate for UpdateListRequest {
    fn validate(&self, errors: &mut FieldErrors) {
        errors.max_length("name", self.name.as_deref(), NAME_MAX);
        errors.max_length("description", self.description.as_deref(), DESCRIPTION_MAX);
        errors.max_length("category", self.category.as_deref(), CATEGORY_MAX);
        errors.min("price", self.price, 0.0);
    }
}

impl From<UpdateListRequest> for ListChanges {
    fn from(body: UpdateListRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            category: body.category,
            price: body.price,
            finished: body.finished,
        }
    }
}

/// Query string of `GET /lists`. Flags default to `false`, not "any".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListsQueryParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub category: Option<String>,
    pub is_template: Option<bool>,
    pub is_finished: Option<bool>,
    pub is_deleted: Option<bool>,
    pub start_date_range: Option<NaiveDate>,
    pub end_date_range: Option<NaiveDate>,
    pub string_year_month: Option<String>,
}

impl ListsQueryParams {
    fn into_parts(self, default_limit: u64) -> Result<(ListQuery, Pagination), crate::error::AppError> {
        let default_limit = i64::try_from(default_limit).unwrap_or(i64::MAX);
        let pagination = Pagination::new(
            self.limit.unwrap_or(default_limit),
            self.offset.unwrap_or(0),
        )?;
        let query = ListQuery {
            category: self.category,
            is_template: Some(self.is_template.unwrap_or(false)),
            is_finished: Some(self.is_finished.unwrap_or(false)),
            is_deleted: Some(self.is_deleted.unwrap_or(false)),
            start_date_range: self.start_date_range,
            end_date_range: self.end_date_range,
            string_year_month: self.string_year_month,
        };
        Ok((query, pagination))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_template: bool,
    pub price: Option<f64>,
    pub finished_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub items: Vec<ItemResponse>,
}

impl From<ListWithItems> for ListResponse {
    fn from(view: ListWithItems) -> Self {
        let list = view.list;
        Self {
            id: list.id,
            name: list.name,
            description: list.description,
            category: list.category,
            is_template: list.is_template,
            price: list.price,
            finished_at: list.finished_at,
            created_at: list.created_at,
            updated_at: list.updated_at,
            deleted_at: list.deleted_at,
            items: view.items.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/lists", get(get_lists).post(create_list))
        .route(
            "/lists/{list_id}",
            get(get_list).put(update_list).delete(remove_list),
        )
        .with_state(state)
}

fn list_service(state: &AppState) -> ListService {
    ServiceContext::from_state(state).list()
}

async fn get_lists(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(params): Query<ListsQueryParams>,
) -> ApiResult<Page<ListResponse>> {
    let (query, pagination) = params.into_parts(state.config.lists.default_page_size)?;
    let page = list_service(state.as_ref())
        .get_visible_lists(user.id, query, pagination)
        .await?;
    JsonApiResponse::ok(page.map(Into::into))
}

async fn get_list(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<ListResponse> {
    let list = list_service(state.as_ref())
        .get_visible_list(id, user.id)
        .await?;
    JsonApiResponse::ok(list.into())
}

async fn create_list(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(body): Json<CreateListRequest>,
) -> ApiResult<ListResponse> {
    body.validated()?;
    let list = list_service(state.as_ref())
        .create_list(body.into(), user.id)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "created", list.into())
}

async fn update_list(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateListRequest>,
) -> ApiResult<ListResponse> {
    body.validated()?;
    let list = list_service(state.as_ref())
        .update_list(id, body.into(), user.id)
        .await?;
    JsonApiResponse::with_status(StatusCode::ACCEPTED, "updated", list.into())
}

async fn remove_list(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    list_service(state.as_ref()).remove_list(id, user.id).await?;
    JsonApiResponse::ok(())
}

#[cfg(test)]
mod tests {
    use super::{CreateListRequest, ListsQueryParams};
    use crate::validation::Validate;

    #[test]
    fn query_flags_default_to_false() {
        let (query, pagination) = ListsQueryParams::default()
            .into_parts(25)
            .expect("defaults are valid");

        assert_eq!(query.is_template, Some(false));
        assert_eq!(query.is_finished, Some(false));
        assert_eq!(query.is_deleted, Some(false));
        assert_eq!(pagination.limit, 25);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn negative_limit_is_rejected() {
        let params = ListsQueryParams {
            limit: Some(-1),
            ..Default::default()
        };
        assert!(params.into_parts(25).is_err());
    }

    #[test]
    fn nested_item_errors_are_prefixed() {
        let body: CreateListRequest = serde_json::from_value(serde_json::json!({
            "name": "x".repeat(255),
            "items": [{ "name": "Milk" }, { "amount": -2 }]
        }))
        .expect("payload should deserialize");

        let err = body.validated().expect_err("payload is invalid");
        let errors = err.field_errors().expect("validation error expected");
        assert!(errors.get("name").is_some());
        assert!(errors.get("items.1.amount").is_some());
        assert!(errors.get("items.0.name").is_none());
    }
}
