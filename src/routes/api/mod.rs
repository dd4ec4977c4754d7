pub mod list_items;
pub mod lists;
pub mod public;
mod router;
pub mod users;

pub use router::router;
