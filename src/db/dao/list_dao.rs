use chrono::Utc;
use sea_orm::sea_query::Query;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Select, Set,
};

use super::base::{ColumnFilter, CompareOp, FilterOp, Page, PageRequest, with_deleted};
use super::base_traits::SoftDeleteActiveModel;
use super::{DaoBase, DaoResult};
use crate::db::entities::list_permission::ListRight;
use crate::db::entities::prelude::{List, ListPermission};
use crate::db::entities::{list, list_permission};

#[derive(Clone)]
pub struct ListDao {
    db: DatabaseConnection,
}

impl DaoBase for ListDao {
    type Entity = List;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Half-open `[from, until)` window on `finished_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedWindow {
    pub from: chrono::DateTime<chrono::FixedOffset>,
    pub until: chrono::DateTime<chrono::FixedOffset>,
}

/// Column-level list filters. Every `Some` narrows the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub category: Option<String>,
    pub is_template: Option<bool>,
    pub is_finished: Option<bool>,
    pub is_deleted: Option<bool>,
    pub finished_windows: Vec<FinishedWindow>,
}

impl ListFilter {
    /// Deleted lists are only reachable by asking for them explicitly.
    pub fn include_deleted(&self) -> bool {
        self.is_deleted == Some(true)
    }

    pub fn column_filters(&self) -> Vec<ColumnFilter<list::Column>> {
        let mut filters = Vec::new();

        if let Some(category) = self.category.as_ref().filter(|c| !c.is_empty()) {
            filters.push(ColumnFilter::new(
                list::Column::Category,
                FilterOp::Eq(category.clone().into()),
            ));
        }

        if let Some(is_template) = self.is_template {
            filters.push(ColumnFilter::new(
                list::Column::IsTemplate,
                FilterOp::Eq(is_template.into()),
            ));
        }

        match self.is_finished {
            Some(true) => filters.push(ColumnFilter::new(
                list::Column::FinishedAt,
                FilterOp::IsNotNull,
            )),
            Some(false) => filters.push(ColumnFilter::new(
                list::Column::FinishedAt,
                FilterOp::IsNull,
            )),
            None => {}
        }

        if self.include_deleted() {
            filters.push(ColumnFilter::new(
                list::Column::DeletedAt,
                FilterOp::IsNotNull,
            ));
        }

        for window in &self.finished_windows {
            filters.push(ColumnFilter::new(
                list::Column::FinishedAt,
                FilterOp::Compare {
                    op: CompareOp::Gte,
                    value: window.from.into(),
                },
            ));
            filters.push(ColumnFilter::new(
                list::Column::FinishedAt,
                FilterOp::Compare {
                    op: CompareOp::Lt,
                    value: window.until.into(),
                },
            ));
        }

        filters
    }
}

pub struct NewList {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_template: bool,
}

pub struct ListChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub finished: bool,
}

/// Restricts `select` to lists on which `user_id` holds one of `rights`.
///
/// A subquery on the permission table keeps one row per list, so counts and
/// offsets stay correct no matter how many permissions a list carries.
pub fn scope_visible(select: Select<List>, user_id: i32, rights: &[ListRight]) -> Select<List> {
    let visible_ids = Query::select()
        .column(list_permission::Column::ListId)
        .from(ListPermission)
        .and_where(list_permission::Column::UserId.eq(user_id))
        .and_where(list_permission::Column::UserRight.is_in(rights.iter().map(ListRight::as_str)))
        .to_owned();

    select.filter(list::Column::Id.in_subquery(visible_ids))
}

impl ListDao {
    pub async fn create_list_in<C>(&self, conn: &C, new_list: NewList) -> DaoResult<list::Model>
    where
        C: ConnectionTrait + Sync,
    {
        let model = list::ActiveModel {
            name: Set(new_list.name),
            description: Set(new_list.description),
            category: Set(new_list.category),
            is_template: Set(new_list.is_template),
            price: Set(None),
            finished_at: Set(None),
            deleted_at: Set(None),
            ..Default::default()
        };
        self.create_in(conn, model).await
    }

    /// Active list `id`, if `user_id` may see it.
    pub async fn find_visible(
        &self,
        id: i32,
        user_id: i32,
        rights: &[ListRight],
    ) -> DaoResult<Option<list::Model>> {
        let select = scope_visible(with_deleted(List::find(), false), user_id, rights);
        Ok(select
            .filter(list::Column::Id.eq(id))
            .one(&self.db)
            .await?)
    }

    pub async fn find_visible_page(
        &self,
        user_id: i32,
        rights: &[ListRight],
        filter: &ListFilter,
        page: PageRequest,
    ) -> DaoResult<Page<list::Model>> {
        let include_deleted = filter.include_deleted();
        let rights = rights.to_vec();
        self.find_page(page, &filter.column_filters(), move |select| {
            scope_visible(with_deleted(select, include_deleted), user_id, &rights)
        })
        .await
    }

    pub async fn update_list(
        &self,
        model: list::Model,
        changes: ListChanges,
    ) -> DaoResult<list::Model> {
        let finished_at = changes.finished.then(|| Utc::now().fixed_offset());
        self.update_model(model, move |active| {
            active.name = Set(changes.name);
            active.description = Set(changes.description);
            active.category = Set(changes.category);
            active.price = Set(changes.price);
            active.finished_at = Set(finished_at);
        })
        .await
    }

    pub async fn soft_delete(&self, id: i32) -> DaoResult<list::Model> {
        let now = Utc::now().fixed_offset();
        self.update(id, move |active| active.set_deleted_at(Some(now)))
            .await
    }
}
