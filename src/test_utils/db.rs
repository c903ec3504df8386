use rusqlite::Connection;

use crate::{database_id::DatabaseId, db::initialize};

/// An in-memory database with all domain tables created.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a member with the given name and a neutral laziness factor,
/// returning their row id.
pub(crate) fn insert_test_member(connection: &Connection, name: &str) -> DatabaseId {
    connection
        .execute(
            "INSERT INTO member (name, laziness_factor) VALUES (?1, 1.0)",
            [name],
        )
        .expect("Could not insert member");

    connection.last_insert_rowid()
}
