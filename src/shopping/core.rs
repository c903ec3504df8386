//! The shared shopping list model and its SQL plumbing.

use rusqlite::Connection;
use time::Date;

use crate::{Error, database_id::DatabaseId};

/// One item on the shared shopping list.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingItem {
    /// The id for the item row.
    pub id: DatabaseId,
    /// What to buy.
    pub name: String,
    /// An optional note, e.g. brand or quantity.
    pub note: String,
    /// Whether the item has been bought.
    pub checked: bool,
    /// The member who added the item.
    pub created_by: DatabaseId,
    /// When the item was added.
    pub created_on: Date,
}

pub fn create_shopping_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS shopping_item (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            note TEXT NOT NULL,
            checked INTEGER NOT NULL DEFAULT 0,
            created_by INTEGER NOT NULL,
            created_on TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Add an item to the shopping list.
///
/// # Errors
/// Returns [Error::EmptyItemName] if the name is blank.
pub fn create_item(
    name: &str,
    note: &str,
    created_by: DatabaseId,
    created_on: Date,
    connection: &Connection,
) -> Result<ShoppingItem, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyItemName);
    }

    connection.execute(
        "INSERT INTO shopping_item (name, note, checked, created_by, created_on)
        VALUES (?1, ?2, 0, ?3, ?4)",
        rusqlite::params![name, note.trim(), created_by, created_on],
    )?;

    get_item(connection.last_insert_rowid(), connection)
}

/// Get a single shopping list item.
pub fn get_item(id: DatabaseId, connection: &Connection) -> Result<ShoppingItem, Error> {
    connection
        .query_one(
            "SELECT id, name, note, checked, created_by, created_on
            FROM shopping_item WHERE id = ?1",
            [id],
            map_row_to_item,
        )
        .map_err(Error::from)
}

/// Get the whole list: unchecked items first, newest first within each group.
pub fn get_all_items(connection: &Connection) -> Result<Vec<ShoppingItem>, Error> {
    connection
        .prepare(
            "SELECT id, name, note, checked, created_by, created_on
            FROM shopping_item ORDER BY checked ASC, id DESC",
        )?
        .query_map((), map_row_to_item)?
        .map(|item| item.map_err(Error::from))
        .collect()
}

/// Flip an item between bought and outstanding. Returns the new state.
///
/// # Errors
/// Returns [Error::NotFound] if no item has the given id.
pub fn toggle_item(id: DatabaseId, connection: &Connection) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "UPDATE shopping_item SET checked = NOT checked WHERE id = ?1",
        [id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(get_item(id, connection)?.checked)
}

/// Remove an item from the list.
///
/// # Errors
/// Returns [Error::DeleteMissingItem] if no item has the given id.
pub fn delete_item(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM shopping_item WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingItem);
    }

    Ok(())
}

fn map_row_to_item(row: &rusqlite::Row) -> Result<ShoppingItem, rusqlite::Error> {
    Ok(ShoppingItem {
        id: row.get(0)?,
        name: row.get(1)?,
        note: row.get(2)?,
        checked: row.get(3)?,
        created_by: row.get(4)?,
        created_on: row.get(5)?,
    })
}
