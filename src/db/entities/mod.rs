#[allow(unused_imports)]
pub mod prelude {
    pub use super::list::Entity as List;
    pub use super::list_item::Entity as ListItem;
    pub use super::list_permission::Entity as ListPermission;
    pub use super::user::Entity as User;
}

pub mod list;
pub mod list_item;
pub mod list_permission;
pub mod user;
