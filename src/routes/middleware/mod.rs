mod current_user;

pub use crate::middleware::{catch_panic_layer, json_error_middleware};
pub use current_user::{CurrentUser, USER_ID_HEADER};
