//! The ID type used for rows in the application database.

/// The integer primary key SQLite assigns to each row.
pub type DatabaseId = i64;
