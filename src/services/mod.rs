pub mod context;
pub mod list_item_service;
pub mod list_service;
pub mod list_view;
pub mod permission_service;
pub mod user_service;

pub use context::ServiceContext;
