//! Cash audits: checkpoints marking "balances settled as of this date".
//!
//! Balances only count expenses dated after the latest audit, so recording an
//! audit resets every member's balance for the new settlement period.

use rusqlite::Connection;
use time::Date;

use crate::Error;

pub fn create_cash_audit_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS cash_audit (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// The date of the most recent cash audit, if any audit has been recorded.
pub fn latest_cash_audit(connection: &Connection) -> Result<Option<Date>, Error> {
    connection
        .query_one("SELECT MAX(date) FROM cash_audit", (), |row| row.get(0))
        .map_err(Error::from)
}

/// Record a cash audit on `date`, starting a new settlement period.
pub fn create_cash_audit(date: Date, connection: &Connection) -> Result<(), Error> {
    connection.execute("INSERT INTO cash_audit (date) VALUES (?1)", [date])?;

    Ok(())
}
