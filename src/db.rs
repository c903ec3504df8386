//! Database initialization for the application's domain tables.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error,
    expense::{create_cash_audit_table, create_expense_tables},
    member::create_member_table,
    shopping::create_shopping_item_table,
    task::{create_task_completion_table, create_task_tables},
};

/// Create the tables for the domain models if they do not already exist.
///
/// # Errors
/// Returns an error if any of the table creation statements fail.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_member_table(&transaction)?;
    create_expense_tables(&transaction)?;
    create_cash_audit_table(&transaction)?;
    create_task_tables(&transaction)?;
    create_task_completion_table(&transaction)?;
    create_shopping_item_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_all_tables() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), initialize(&connection));

        // Running again must be a no-op, not an error.
        assert_eq!(Ok(()), initialize(&connection));
    }
}
