pub mod base;
pub mod base_traits;
pub mod context;
pub mod error;
pub mod list_dao;
pub mod list_item_dao;
pub mod permission_dao;
pub mod user_dao;

pub use base::{ColumnFilter, CompareOp, DaoBase, FilterOp, Page, PageRequest};
pub use base_traits::{
    HasIdColumn, SoftDeletableEntity, SoftDeleteActiveModel, TimestampedActiveModel,
};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use list_dao::{FinishedWindow, ListChanges, ListDao, ListFilter, NewList};
pub use list_item_dao::{ItemChanges, ListItemDao, NewListItem};
pub use permission_dao::PermissionDao;
pub use user_dao::UserDao;
