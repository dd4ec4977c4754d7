use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityName, EntityTrait, FromQueryResult, IntoActiveModel, PaginatorTrait, PrimaryKeyTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};
use serde::Serialize;

use super::base_traits::{HasIdColumn, SoftDeletableEntity, TimestampedActiveModel};
use super::error::{DaoLayerError, DaoResult};

/// One page of results plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub objects: Vec<T>,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            objects: self.objects.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}

/// Offset/limit window. Constructed only from already validated, non-negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone)]
pub enum FilterOp {
    Eq(sea_orm::sea_query::Value),
    Compare {
        op: CompareOp,
        value: sea_orm::sea_query::Value,
    },
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, Copy)]
pub enum CompareOp {
    Lt,
    Gte,
}

#[derive(Debug, Clone)]
pub struct ColumnFilter<C> {
    pub column: C,
    pub op: FilterOp,
}

impl<C> ColumnFilter<C> {
    pub fn new(column: C, op: FilterOp) -> Self {
        Self { column, op }
    }
}

pub fn apply_filters<E>(select: Select<E>, filters: &[ColumnFilter<E::Column>]) -> Select<E>
where
    E: EntityTrait,
{
    filters
        .iter()
        .fold(select, |select, filter| match &filter.op {
            FilterOp::Eq(value) => select.filter(filter.column.eq(value.clone())),
            FilterOp::Compare { op, value } => {
                let value = value.clone();
                let expr = match op {
                    CompareOp::Lt => filter.column.lt(value),
                    CompareOp::Gte => filter.column.gte(value),
                };
                select.filter(expr)
            }
            FilterOp::IsNull => select.filter(filter.column.is_null()),
            FilterOp::IsNotNull => select.filter(filter.column.is_not_null()),
        })
}

/// Default soft-delete scope: only rows with `deleted_at IS NULL` unless
/// `include_deleted` lifts it.
pub fn with_deleted<E>(select: Select<E>, include_deleted: bool) -> Select<E>
where
    E: SoftDeletableEntity,
{
    if include_deleted {
        select
    } else {
        select.filter(E::deleted_at_column().is_null())
    }
}

#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + TimestampedActiveModel
        + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<i32> + Send + Sync,
    Self::Entity: HasIdColumn,
{
    type Entity: EntityTrait + Send + Sync;

    fn from_db(db: DatabaseConnection) -> Self;

    fn new(db: &DatabaseConnection) -> Self {
        Self::from_db(db.clone())
    }

    fn db(&self) -> &DatabaseConnection;

    fn entity_name() -> &'static str {
        Self::Entity::default().table_name()
    }

    /// Inserts on `conn`, which may be a transaction.
    async fn create_in<C>(
        &self,
        conn: &C,
        data: impl IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model>
    where
        C: ConnectionTrait + Sync,
    {
        let now = Utc::now().fixed_offset();
        let mut active = data.into_active_model();
        active.set_created_at(now);
        active.set_updated_at(now);
        active.insert(conn).await.map_err(DaoLayerError::Db)
    }

    async fn create(
        &self,
        data: impl IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        self.create_in(self.db(), data).await
    }

    async fn find_by_id(&self, id: i32) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        let model = Self::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        model.ok_or(DaoLayerError::NotFound {
            entity: Self::entity_name(),
            id,
        })
    }

    /// Counts the filtered set, then fetches one window of it ordered by id.
    async fn find_page(
        &self,
        page: PageRequest,
        filters: &[ColumnFilter<<Self::Entity as EntityTrait>::Column>],
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<Page<<Self::Entity as EntityTrait>::Model>> {
        let filtered = apply_filters(apply(Self::Entity::find()), filters);

        let total_count = filtered
            .clone()
            .count(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        let objects = filtered
            .order_by_asc(Self::Entity::id_column())
            .offset(page.offset)
            .limit(page.limit)
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)?;

        Ok(Page {
            objects,
            total_count,
        })
    }

    async fn update<F>(&self, id: i32, apply: F) -> DaoResult<<Self::Entity as EntityTrait>::Model>
    where
        F: for<'a> FnOnce(&'a mut <Self::Entity as EntityTrait>::ActiveModel) + Send,
    {
        let model = Self::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(DaoLayerError::Db)?
            .ok_or(DaoLayerError::NotFound {
                entity: Self::entity_name(),
                id,
            })?;

        self.update_model(model, apply).await
    }

    /// Applies `apply` to an already loaded row and saves it.
    async fn update_model<F>(
        &self,
        model: <Self::Entity as EntityTrait>::Model,
        apply: F,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model>
    where
        F: for<'a> FnOnce(&'a mut <Self::Entity as EntityTrait>::ActiveModel) + Send,
    {
        let mut active = model.into_active_model();
        apply(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());

        active.update(self.db()).await.map_err(DaoLayerError::Db)
    }
}
