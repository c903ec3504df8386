//! Shared expenses, member balances, and settlement previews.

mod audit;
mod balance;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod expenses_page;
mod form;
mod settle_endpoint;
mod split;

pub use audit::{create_cash_audit_table, latest_cash_audit};
pub use balance::{compute_balances, settlement_transfers};
pub use core::{create_expense_tables, get_expenses_since};
pub use create_endpoint::create_expense_endpoint;
pub use create_page::get_create_expense_page;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::update_expense_endpoint;
pub use edit_page::get_edit_expense_page;
pub use expenses_page::get_expenses_page;
pub use settle_endpoint::create_cash_audit_endpoint;
