//! The immutable completion ledger that feeds effort totals and history.
//!
//! Every terminal action on a due task (complete, skip, takeover) writes one
//! row here. Rows snapshot the task title so history survives task edits and
//! deletions, and are never mutated afterwards.

use std::collections::BTreeMap;

use rusqlite::{
    Connection,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use time::Date;

use crate::{Error, database_id::DatabaseId};

/// Which terminal action produced a completion record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEvent {
    /// The assignee did the chore and earned its effort points.
    Complete,
    /// The assignee passed; nobody earned points.
    Skip,
    /// Another member took over the due instance; no points awarded.
    Takeover,
}

impl CompletionEvent {
    /// The database representation of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionEvent::Complete => "complete",
            CompletionEvent::Skip => "skip",
            CompletionEvent::Takeover => "takeover",
        }
    }
}

impl ToSql for CompletionEvent {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for CompletionEvent {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "complete" => Ok(CompletionEvent::Complete),
            "skip" => Ok(CompletionEvent::Skip),
            "takeover" => Ok(CompletionEvent::Takeover),
            other => Err(FromSqlError::Other(
                format!("invalid completion event {other:?}").into(),
            )),
        }
    }
}

/// One immutable entry in the completion ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCompletion {
    /// The id for the completion row.
    pub id: DatabaseId,
    /// The task title at the time of the event.
    pub task_title: String,
    /// The member the event applies to.
    pub member_id: DatabaseId,
    /// The effort points earned. Zero for skip and takeover.
    pub points: i64,
    /// How many days after the due date the event happened. Negative when
    /// the chore was done early.
    pub delay_days: i64,
    /// Which terminal action produced this record.
    pub event: CompletionEvent,
    /// When the event happened.
    pub completed_on: Date,
}

/// The fields needed to record a completion.
#[derive(Debug, Clone)]
pub struct NewTaskCompletion {
    /// The task title at the time of the event.
    pub task_title: String,
    /// The member the event applies to.
    pub member_id: DatabaseId,
    /// The effort points earned.
    pub points: i64,
    /// How many days after the due date the event happened.
    pub delay_days: i64,
    /// Which terminal action produced this record.
    pub event: CompletionEvent,
    /// When the event happened.
    pub completed_on: Date,
}

pub fn create_task_completion_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS task_completion (
            id INTEGER PRIMARY KEY,
            task_title TEXT NOT NULL,
            member_id INTEGER NOT NULL,
            points INTEGER NOT NULL,
            delay_days INTEGER NOT NULL,
            event TEXT NOT NULL,
            completed_on TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Append a record to the completion ledger.
pub fn record_completion(
    completion: &NewTaskCompletion,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO task_completion
            (task_title, member_id, points, delay_days, event, completed_on)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            completion.task_title,
            completion.member_id,
            completion.points,
            completion.delay_days,
            completion.event,
            completion.completed_on,
        ],
    )?;

    Ok(())
}

/// Get the full completion history, newest first.
pub fn get_completions(connection: &Connection) -> Result<Vec<TaskCompletion>, Error> {
    connection
        .prepare(
            "SELECT id, task_title, member_id, points, delay_days, event, completed_on
            FROM task_completion ORDER BY completed_on DESC, id DESC",
        )?
        .query_map((), map_row_to_completion)?
        .map(|completion| completion.map_err(Error::from))
        .collect()
}

/// Each member's accumulated effort points over the whole ledger.
pub fn get_points_by_member(connection: &Connection) -> Result<BTreeMap<DatabaseId, i64>, Error> {
    let totals = connection
        .prepare("SELECT member_id, SUM(points) FROM task_completion GROUP BY member_id")?
        .query_map((), |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<(DatabaseId, i64)>, _>>()?;

    Ok(totals.into_iter().collect())
}

fn map_row_to_completion(row: &rusqlite::Row) -> Result<TaskCompletion, rusqlite::Error> {
    Ok(TaskCompletion {
        id: row.get(0)?,
        task_title: row.get(1)?,
        member_id: row.get(2)?,
        points: row.get(3)?,
        delay_days: row.get(4)?,
        event: row.get(5)?,
        completed_on: row.get(6)?,
    })
}
