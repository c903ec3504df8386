//! The shared-expense domain model and its SQL plumbing.

use rusqlite::Connection;
use time::Date;

use crate::{Error, database_id::DatabaseId, expense::balance::reimbursement_preview};

/// A shared expense entry.
///
/// The amount is split evenly across the payer set (credit side) and the
/// beneficiary set (debit side). Both sets are stored in ascending id order.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The id for the expense row.
    pub id: DatabaseId,
    /// What the money was spent on.
    pub description: String,
    /// The amount in cents. Always positive.
    pub amount_cents: i64,
    /// A free-form category, e.g. "Groceries".
    pub category: String,
    /// When the expense happened.
    pub date: Date,
    /// The member who recorded the entry.
    pub created_by: DatabaseId,
    /// The members who fronted the money.
    pub payers: Vec<DatabaseId>,
    /// The members the expense was for.
    pub beneficiaries: Vec<DatabaseId>,
}

/// The fields needed to create or update an expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// What the money was spent on.
    pub description: String,
    /// The amount in cents.
    pub amount_cents: i64,
    /// A free-form category.
    pub category: String,
    /// When the expense happened.
    pub date: Date,
    /// The member who recorded the entry.
    pub created_by: DatabaseId,
    /// The members who fronted the money.
    pub payers: Vec<DatabaseId>,
    /// The members the expense was for.
    pub beneficiaries: Vec<DatabaseId>,
}

pub fn create_expense_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount INTEGER NOT NULL,
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            created_by INTEGER NOT NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense_payer (
            expense_id INTEGER NOT NULL,
            member_id INTEGER NOT NULL,
            PRIMARY KEY (expense_id, member_id)
        )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense_beneficiary (
            expense_id INTEGER NOT NULL,
            member_id INTEGER NOT NULL,
            PRIMARY KEY (expense_id, member_id)
        )",
        (),
    )?;

    Ok(())
}

/// Record a new expense with its participant sets.
///
/// # Errors
/// Returns [Error::InvalidSplitInput] if the amount is not positive or
/// either participant set is empty.
pub fn create_expense(new_expense: &NewExpense, connection: &Connection) -> Result<Expense, Error> {
    validate(new_expense)?;

    connection.execute(
        "INSERT INTO expense (description, amount, category, date, created_by)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            new_expense.description,
            new_expense.amount_cents,
            new_expense.category,
            new_expense.date,
            new_expense.created_by
        ],
    )?;

    let id = connection.last_insert_rowid();
    insert_participants(id, new_expense, connection)?;

    get_expense(id, connection)
}

/// Replace an expense's fields and participant sets.
///
/// # Errors
/// Returns [Error::UpdateMissingExpense] if no expense has the given id.
pub fn update_expense(
    id: DatabaseId,
    new_expense: &NewExpense,
    connection: &Connection,
) -> Result<(), Error> {
    validate(new_expense)?;

    let rows_affected = connection.execute(
        "UPDATE expense SET description = ?1, amount = ?2, category = ?3, date = ?4, created_by = ?5
        WHERE id = ?6",
        rusqlite::params![
            new_expense.description,
            new_expense.amount_cents,
            new_expense.category,
            new_expense.date,
            new_expense.created_by,
            id
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    connection.execute("DELETE FROM expense_payer WHERE expense_id = ?1", [id])?;
    connection.execute("DELETE FROM expense_beneficiary WHERE expense_id = ?1", [id])?;
    insert_participants(id, new_expense, connection)?;

    Ok(())
}

/// Delete an expense and its participant rows.
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if no expense has the given id.
pub fn delete_expense(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    connection.execute("DELETE FROM expense_payer WHERE expense_id = ?1", [id])?;
    connection.execute("DELETE FROM expense_beneficiary WHERE expense_id = ?1", [id])?;

    Ok(())
}

/// Get a single expense with its participant sets.
pub fn get_expense(id: DatabaseId, connection: &Connection) -> Result<Expense, Error> {
    let mut expense = connection.query_one(
        "SELECT id, description, amount, category, date, created_by FROM expense WHERE id = ?1",
        [id],
        map_row_to_expense,
    )?;

    expense.payers = get_participants("expense_payer", id, connection)?;
    expense.beneficiaries = get_participants("expense_beneficiary", id, connection)?;

    Ok(expense)
}

/// Get all expenses dated strictly after `since`, newest first.
///
/// Pass `None` to get every expense. Used with the latest cash audit date to
/// restrict balances to the current settlement period.
pub fn get_expenses_since(
    since: Option<Date>,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let expenses: Vec<Expense> = match since {
        Some(date) => connection
            .prepare(
                "SELECT id, description, amount, category, date, created_by FROM expense
                WHERE date > ?1 ORDER BY date DESC, id DESC",
            )?
            .query_map([date], map_row_to_expense)?
            .collect::<Result<_, _>>()?,
        None => connection
            .prepare(
                "SELECT id, description, amount, category, date, created_by FROM expense
                ORDER BY date DESC, id DESC",
            )?
            .query_map((), map_row_to_expense)?
            .collect::<Result<_, _>>()?,
    };

    expenses
        .into_iter()
        .map(|mut expense| {
            expense.payers = get_participants("expense_payer", expense.id, connection)?;
            expense.beneficiaries =
                get_participants("expense_beneficiary", expense.id, connection)?;
            Ok(expense)
        })
        .collect()
}

// An entry is valid exactly when its split is computable.
fn validate(new_expense: &NewExpense) -> Result<(), Error> {
    reimbursement_preview(
        new_expense.amount_cents,
        &new_expense.payers,
        &new_expense.beneficiaries,
    )?;

    Ok(())
}

fn insert_participants(
    id: DatabaseId,
    new_expense: &NewExpense,
    connection: &Connection,
) -> Result<(), Error> {
    for member_id in &new_expense.payers {
        connection.execute(
            "INSERT OR IGNORE INTO expense_payer (expense_id, member_id) VALUES (?1, ?2)",
            rusqlite::params![id, member_id],
        )?;
    }

    for member_id in &new_expense.beneficiaries {
        connection.execute(
            "INSERT OR IGNORE INTO expense_beneficiary (expense_id, member_id) VALUES (?1, ?2)",
            rusqlite::params![id, member_id],
        )?;
    }

    Ok(())
}

fn get_participants(
    table: &str,
    expense_id: DatabaseId,
    connection: &Connection,
) -> Result<Vec<DatabaseId>, Error> {
    // `table` is one of two compile-time constants, never user input.
    connection
        .prepare(&format!(
            "SELECT member_id FROM {table} WHERE expense_id = ?1 ORDER BY member_id ASC"
        ))?
        .query_map([expense_id], |row| row.get(0))?
        .map(|member_id| member_id.map_err(Error::from))
        .collect()
}

fn map_row_to_expense(row: &rusqlite::Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        description: row.get(1)?,
        amount_cents: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        created_by: row.get(5)?,
        payers: Vec::new(),
        beneficiaries: Vec::new(),
    })
}
