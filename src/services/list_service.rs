use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use sea_orm::{DatabaseTransaction, TransactionTrait};
use tracing::info;

use crate::db::dao::{
    DaoContext, DaoLayerError, FinishedWindow, ListChanges, ListFilter, NewList, NewListItem,
    Page, PageRequest,
};
use crate::db::entities::list;
use crate::db::entities::list_permission::ListRight;
use crate::error::AppError;
use crate::services::list_view::{ListWithItems, assemble_page};
use crate::services::permission_service::{Capability, PermissionPolicy, PermissionService};
use crate::validation::FieldErrors;

/// Validated, non-negative offset/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Result<Self, AppError> {
        let mut errors = FieldErrors::new();
        if limit < 0 {
            errors.add("limit", "min", "limit must not be less than 0");
        }
        if offset < 0 {
            errors.add("offset", "min", "offset must not be less than 0");
        }
        errors.into_result()?;

        Ok(Self {
            limit: limit.unsigned_abs(),
            offset: offset.unsigned_abs(),
        })
    }
}

impl From<Pagination> for PageRequest {
    fn from(pagination: Pagination) -> Self {
        PageRequest {
            offset: pagination.offset,
            limit: pagination.limit,
        }
    }
}

/// Filters accepted by [`ListService::get_visible_lists`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub category: Option<String>,
    pub is_template: Option<bool>,
    pub is_finished: Option<bool>,
    pub is_deleted: Option<bool>,
    pub start_date_range: Option<NaiveDate>,
    pub end_date_range: Option<NaiveDate>,
    pub string_year_month: Option<String>,
}

impl ListQuery {
    /// Turns the calendar filters into UTC `finished_at` windows.
    ///
    /// A date range only applies when both ends are present; its end day is
    /// inclusive.
    pub fn into_filter(self) -> Result<ListFilter, AppError> {
        let mut errors = FieldErrors::new();
        let mut finished_windows = Vec::new();

        if let (Some(start), Some(end)) = (self.start_date_range, self.end_date_range) {
            match end.succ_opt() {
                Some(after_end) => finished_windows.push(FinishedWindow {
                    from: utc_midnight(start),
                    until: utc_midnight(after_end),
                }),
                None => errors.add(
                    "endDateRange",
                    "isDate",
                    "endDateRange must be a valid date",
                ),
            }
        }

        if let Some(year_month) = self.string_year_month.as_deref() {
            match month_window(year_month) {
                Some(window) => finished_windows.push(window),
                None => errors.add(
                    "stringYearMonth",
                    "matches",
                    "stringYearMonth must match the YYYY-MM format",
                ),
            }
        }

        errors.into_result()?;

        Ok(ListFilter {
            category: self.category,
            is_template: self.is_template,
            is_finished: self.is_finished,
            is_deleted: self.is_deleted,
            finished_windows,
        })
    }
}

fn utc_midnight(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

/// `[first day of month, first day of next month)` for a strict `YYYY-MM`.
fn month_window(value: &str) -> Option<FinishedWindow> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(idx, byte)| idx == 4 || byte.is_ascii_digit());
    if !well_formed {
        return None;
    }

    let year: i32 = value[..4].parse().ok()?;
    let month: u32 = value[5..].parse().ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some(FinishedWindow {
        from: utc_midnight(first),
        until: utc_midnight(next),
    })
}

pub struct CreateList {
    pub list: NewList,
    pub items: Vec<NewListItem>,
}

fn list_not_found(id: i32) -> AppError {
    AppError::not_found(format!("No List found with id {id}"))
}

fn save_failed(message: &'static str) -> impl FnOnce(DaoLayerError) -> AppError {
    move |err| AppError::internal_with_source(message, err)
}

#[derive(Clone)]
pub struct ListService {
    daos: DaoContext,
    policy: Arc<PermissionPolicy>,
}

impl ListService {
    pub fn new(daos: DaoContext, policy: Arc<PermissionPolicy>) -> Self {
        Self { daos, policy }
    }

    fn read_rights(&self) -> &[ListRight] {
        self.policy.allowed_rights_for(Capability::Read)
    }

    /// Active list `id` as seen by `user_id`, without items.
    pub async fn require_visible(&self, id: i32, user_id: i32) -> Result<list::Model, AppError> {
        self.daos
            .list()
            .find_visible(id, user_id, self.read_rights())
            .await?
            .ok_or_else(|| list_not_found(id))
    }

    pub async fn get_visible_list(&self, id: i32, user_id: i32) -> Result<ListWithItems, AppError> {
        let list = self.require_visible(id, user_id).await?;
        let items = self.daos.list_item().find_active_by_lists(&[list.id]).await?;
        Ok(ListWithItems::new(list, items))
    }

    pub async fn get_visible_lists(
        &self,
        user_id: i32,
        query: ListQuery,
        pagination: Pagination,
    ) -> Result<Page<ListWithItems>, AppError> {
        let filter = query.into_filter()?;
        let page = self
            .daos
            .list()
            .find_visible_page(user_id, self.read_rights(), &filter, pagination.into())
            .await?;

        let list_ids: Vec<i32> = page.objects.iter().map(|list| list.id).collect();
        let items = self.daos.list_item().find_active_by_lists(&list_ids).await?;
        Ok(assemble_page(page, items))
    }

    /// Writes the list, its items and the owner permission in one transaction,
    /// then reads the list back the way its owner sees it.
    pub async fn create_list(
        &self,
        input: CreateList,
        owner_id: i32,
    ) -> Result<ListWithItems, AppError> {
        let txn = self
            .daos
            .db()
            .begin()
            .await
            .map_err(|err| AppError::internal_with_source("Failed to save list", err))?;

        let result = self.write_new_list(&txn, input, owner_id).await;
        let list_id = finalize_transaction(txn, result).await?;

        info!(list_id, owner_id, "list created");
        self.get_visible_list(list_id, owner_id).await
    }

    async fn write_new_list(
        &self,
        txn: &DatabaseTransaction,
        input: CreateList,
        owner_id: i32,
    ) -> Result<i32, AppError> {
        let list = self
            .daos
            .list()
            .create_list_in(txn, input.list)
            .await
            .map_err(save_failed("Failed to save list"))?;

        if !input.items.is_empty() {
            self.daos
                .list_item()
                .create_items_in(txn, list.id, input.items)
                .await
                .map_err(save_failed("Failed to save list items"))?;
        }

        PermissionService::new(self.daos.permission())
            .grant_ownership(txn, list.id, owner_id)
            .await
            .map_err(save_failed("Failed to save list ownership"))?;

        Ok(list.id)
    }

    /// Replaces the editable fields and returns the saved row with the items
    /// it had before the update.
    pub async fn update_list(
        &self,
        id: i32,
        changes: ListChanges,
        user_id: i32,
    ) -> Result<ListWithItems, AppError> {
        let current = self.get_visible_list(id, user_id).await?;
        let updated = self
            .daos
            .list()
            .update_list(current.list, changes)
            .await?;
        Ok(ListWithItems::new(updated, current.items))
    }

    pub async fn remove_list(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        let list = self.require_visible(id, user_id).await?;
        self.daos.list().soft_delete(list.id).await?;
        info!(list_id = list.id, user_id, "list soft-deleted");
        Ok(())
    }
}

async fn finalize_transaction<T>(
    txn: DatabaseTransaction,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            txn.commit()
                .await
                .map_err(|err| AppError::internal_with_source("Failed to save list", err))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}
