//! Household members and their laziness factors.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod members_page;

pub use core::{LazinessFactor, Member, create_member_table, get_all_members};
pub use create_endpoint::create_member_endpoint;
pub use delete_endpoint::delete_member_endpoint;
pub use edit_endpoint::update_member_endpoint;
pub use members_page::get_members_page;
