//! The shared shopping list.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod shopping_page;
mod toggle_endpoint;

pub use core::{create_shopping_item_table, get_all_items};
pub use create_endpoint::create_item_endpoint;
pub use delete_endpoint::delete_item_endpoint;
pub use shopping_page::get_shopping_page;
pub use toggle_endpoint::toggle_item_endpoint;
