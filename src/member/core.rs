//! The household member domain model and its SQL plumbing.

use rusqlite::Connection;

use crate::{Error, database_id::DatabaseId};

/// A per-member multiplier in [0, 2] that scales displayed and ranked effort
/// totals without altering stored point totals.
///
/// 1.0 is neutral. A factor of 0 excludes the member from fairness
/// comparisons entirely, a deliberate "don't count this person" escape hatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LazinessFactor(f64);

impl LazinessFactor {
    /// Create a laziness factor, rejecting values outside [0, 2] and NaN.
    pub fn new(value: f64) -> Result<Self, Error> {
        if value.is_nan() || !(0.0..=2.0).contains(&value) {
            return Err(Error::InvalidLazinessFactor(value));
        }

        Ok(Self(value))
    }

    /// Create a laziness factor without validating the range.
    #[cfg(test)]
    pub fn new_unchecked(value: f64) -> Self {
        Self(value)
    }

    /// The inner multiplier.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for LazinessFactor {
    fn default() -> Self {
        Self(1.0)
    }
}

/// A person living in the household.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// The id for the member row.
    pub id: DatabaseId,
    /// The member's display name, unique within the household.
    pub name: String,
    /// Scales the member's effort totals when ranking who is next.
    pub laziness: LazinessFactor,
}

pub fn create_member_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS member (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            laziness_factor REAL NOT NULL DEFAULT 1.0
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_member(row: &rusqlite::Row) -> Result<Member, rusqlite::Error> {
    Ok(Member {
        id: row.get(0)?,
        name: row.get(1)?,
        // The range is enforced on write, so reads take the stored value as is.
        laziness: LazinessFactor(row.get(2)?),
    })
}

/// Add a member to the household.
///
/// # Errors
/// Returns [Error::EmptyMemberName] if `name` is blank,
/// [Error::DuplicateMemberName] if the name is taken, or an SQL error.
pub fn create_member(
    name: &str,
    laziness: LazinessFactor,
    connection: &Connection,
) -> Result<Member, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyMemberName);
    }

    connection.execute(
        "INSERT INTO member (name, laziness_factor) VALUES (?1, ?2)",
        rusqlite::params![name, laziness.value()],
    )?;

    Ok(Member {
        id: connection.last_insert_rowid(),
        name: name.to_owned(),
        laziness,
    })
}

/// Get a single member by id.
pub fn get_member(id: DatabaseId, connection: &Connection) -> Result<Member, Error> {
    connection
        .query_one(
            "SELECT id, name, laziness_factor FROM member WHERE id = ?1",
            rusqlite::params![id],
            map_row_to_member,
        )
        .map_err(Error::from)
}

/// Get every member of the household, ordered by id.
pub fn get_all_members(connection: &Connection) -> Result<Vec<Member>, Error> {
    connection
        .prepare("SELECT id, name, laziness_factor FROM member ORDER BY id ASC")?
        .query_map((), map_row_to_member)?
        .map(|member| member.map_err(Error::from))
        .collect()
}

/// Update a member's name and laziness factor.
///
/// # Errors
/// Returns [Error::UpdateMissingMember] if no member has the given id.
pub fn update_member(
    id: DatabaseId,
    name: &str,
    laziness: LazinessFactor,
    connection: &Connection,
) -> Result<(), Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyMemberName);
    }

    let rows_affected = connection.execute(
        "UPDATE member SET name = ?1, laziness_factor = ?2 WHERE id = ?3",
        rusqlite::params![name, laziness.value(), id],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingMember);
    }

    Ok(())
}

/// Delete a member and drop them from every task rotation.
///
/// Expense participations and completion records are kept so historical
/// balances and charts stay intact.
///
/// # Errors
/// Returns [Error::DeleteMissingMember] if no member has the given id.
pub fn delete_member(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM member WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingMember);
    }

    connection.execute("DELETE FROM task_rotation WHERE member_id = ?1", [id])?;

    Ok(())
}


#[cfg(test)]
mod member_tests {
    use crate::{Error, test_utils::get_test_connection};

    use super::{
        LazinessFactor, create_member, delete_member, get_all_members, get_member, update_member,
    };

    #[test]
    fn creates_and_gets_member() {
        let connection = get_test_connection();

        let member = create_member("Ana", LazinessFactor::default(), &connection).unwrap();

        assert_eq!(get_member(member.id, &connection), Ok(member));
    }

    #[test]
    fn create_rejects_empty_name() {
        let connection = get_test_connection();

        let result = create_member("  ", LazinessFactor::default(), &connection);

        assert_eq!(result, Err(Error::EmptyMemberName));
    }

    #[test]
    fn create_rejects_duplicate_name() {
        let connection = get_test_connection();
        create_member("Ana", LazinessFactor::default(), &connection).unwrap();

        let result = create_member("Ana", LazinessFactor::default(), &connection);

        assert_eq!(result, Err(Error::DuplicateMemberName));
    }

    #[test]
    fn lists_members_in_id_order() {
        let connection = get_test_connection();
        let ana = create_member("Ana", LazinessFactor::default(), &connection).unwrap();
        let ben = create_member("Ben", LazinessFactor::default(), &connection).unwrap();

        let members = get_all_members(&connection).unwrap();

        assert_eq!(members, vec![ana, ben]);
    }

    #[test]
    fn updates_member() {
        let connection = get_test_connection();
        let member = create_member("Ana", LazinessFactor::default(), &connection).unwrap();

        update_member(
            member.id,
            "Anastasia",
            LazinessFactor::new(0.5).unwrap(),
            &connection,
        )
        .unwrap();

        let got = get_member(member.id, &connection).unwrap();
        assert_eq!(got.name, "Anastasia");
        assert_eq!(got.laziness.value(), 0.5);
    }

    #[test]
    fn update_missing_member_fails() {
        let connection = get_test_connection();

        let result = update_member(999, "Ana", LazinessFactor::default(), &connection);

        assert_eq!(result, Err(Error::UpdateMissingMember));
    }

    #[test]
    fn deletes_member() {
        let connection = get_test_connection();
        let member = create_member("Ana", LazinessFactor::default(), &connection).unwrap();

        delete_member(member.id, &connection).unwrap();

        assert_eq!(get_member(member.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_member_fails() {
        let connection = get_test_connection();

        assert_eq!(
            delete_member(999, &connection),
            Err(Error::DeleteMissingMember)
        );
    }
}
