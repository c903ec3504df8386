//! The recurring task domain model and its SQL plumbing.

use rusqlite::{
    Connection,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::Deserialize;
use time::Date;

use crate::{Error, database_id::DatabaseId};

/// How the fairness scorer ranks rotation members when picking the next
/// assignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FairnessMode {
    /// Rank on accumulated effort points.
    #[default]
    Actual,
    /// Rank on accumulated points plus the expected accrual from each
    /// member's other active tasks over the task's own frequency.
    Projection,
}

impl FairnessMode {
    /// The database representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            FairnessMode::Actual => "actual",
            FairnessMode::Projection => "projection",
        }
    }
}

impl ToSql for FairnessMode {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for FairnessMode {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "actual" => Ok(FairnessMode::Actual),
            "projection" => Ok(FairnessMode::Projection),
            other => Err(FromSqlError::Other(
                format!("invalid fairness mode {other:?}").into(),
            )),
        }
    }
}

/// A recurring household chore with an ordered member rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// The id for the task row.
    pub id: DatabaseId,
    /// What needs doing, e.g. "Take out the bins".
    pub title: String,
    /// How often the task recurs, in days. At least 1.
    pub frequency_days: i64,
    /// The effort points awarded for completing the task.
    pub effort: i64,
    /// The member currently on the hook.
    pub assignee_id: DatabaseId,
    /// When the current instance is due.
    pub due_date: Date,
    /// Inactive tasks are paused: not due, not counted in projections.
    pub active: bool,
    /// When set, the next assignee is the rotation member with the lowest
    /// scaled score instead of simply the next member in rotation order.
    pub prioritize_low_points: bool,
    /// How scores are computed when `prioritize_low_points` is set.
    pub fairness_mode: FairnessMode,
    /// The ordered rotation of eligible members.
    pub rotation: Vec<DatabaseId>,
}

/// The fields needed to create or update a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    /// What needs doing.
    pub title: String,
    /// How often the task recurs, in days.
    pub frequency_days: i64,
    /// The effort points awarded for completing the task.
    pub effort: i64,
    /// When the current instance is due.
    pub due_date: Date,
    /// Whether the task is active.
    pub active: bool,
    /// Whether to pick the next assignee by lowest scaled score.
    pub prioritize_low_points: bool,
    /// How scores are computed when `prioritize_low_points` is set.
    pub fairness_mode: FairnessMode,
    /// The ordered rotation of eligible members.
    pub rotation: Vec<DatabaseId>,
}

pub fn create_task_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS task (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            frequency_days INTEGER NOT NULL,
            effort INTEGER NOT NULL,
            assignee_id INTEGER NOT NULL,
            due_date TEXT NOT NULL,
            active INTEGER NOT NULL,
            prioritize_low_points INTEGER NOT NULL,
            fairness_mode TEXT NOT NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS task_rotation (
            task_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            member_id INTEGER NOT NULL,
            PRIMARY KEY (task_id, position)
        )",
        (),
    )?;

    Ok(())
}

/// Create a task. The first rotation member becomes the initial assignee.
///
/// # Errors
/// Returns [Error::EmptyTaskTitle], [Error::InvalidFrequency], or
/// [Error::EmptyRotation] when validation fails.
pub fn create_task(new_task: &NewTask, connection: &Connection) -> Result<Task, Error> {
    let title = validate(new_task)?;
    let assignee_id = new_task.rotation[0];

    connection.execute(
        "INSERT INTO task
            (title, frequency_days, effort, assignee_id, due_date, active,
            prioritize_low_points, fairness_mode)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            title,
            new_task.frequency_days,
            new_task.effort,
            assignee_id,
            new_task.due_date,
            new_task.active,
            new_task.prioritize_low_points,
            new_task.fairness_mode,
        ],
    )?;

    let id = connection.last_insert_rowid();
    replace_rotation(id, &new_task.rotation, connection)?;

    get_task(id, connection)
}

/// Replace a task's fields and rotation.
///
/// If the current assignee is no longer in the rotation, the first rotation
/// member takes over the current instance.
///
/// # Errors
/// Returns [Error::UpdateMissingTask] if no task has the given id.
pub fn update_task(
    id: DatabaseId,
    new_task: &NewTask,
    connection: &Connection,
) -> Result<(), Error> {
    let title = validate(new_task)?;
    let current = get_task(id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingTask,
        other => other,
    })?;

    let assignee_id = if new_task.rotation.contains(&current.assignee_id) {
        current.assignee_id
    } else {
        new_task.rotation[0]
    };

    connection.execute(
        "UPDATE task SET title = ?1, frequency_days = ?2, effort = ?3, assignee_id = ?4,
            due_date = ?5, active = ?6, prioritize_low_points = ?7, fairness_mode = ?8
        WHERE id = ?9",
        rusqlite::params![
            title,
            new_task.frequency_days,
            new_task.effort,
            assignee_id,
            new_task.due_date,
            new_task.active,
            new_task.prioritize_low_points,
            new_task.fairness_mode,
            id,
        ],
    )?;

    replace_rotation(id, &new_task.rotation, connection)?;

    Ok(())
}

/// Move a task to its next instance: `assignee` takes over and the due date
/// becomes `due_date`.
pub fn advance_task(
    id: DatabaseId,
    assignee_id: DatabaseId,
    due_date: Date,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE task SET assignee_id = ?1, due_date = ?2 WHERE id = ?3",
        rusqlite::params![assignee_id, due_date, id],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTask);
    }

    Ok(())
}

/// Delete a task and its rotation rows.
///
/// # Errors
/// Returns [Error::DeleteMissingTask] if no task has the given id.
pub fn delete_task(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM task WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTask);
    }

    connection.execute("DELETE FROM task_rotation WHERE task_id = ?1", [id])?;

    Ok(())
}

/// Get a single task with its rotation.
pub fn get_task(id: DatabaseId, connection: &Connection) -> Result<Task, Error> {
    let mut task = connection.query_one(
        "SELECT id, title, frequency_days, effort, assignee_id, due_date, active,
            prioritize_low_points, fairness_mode
        FROM task WHERE id = ?1",
        [id],
        map_row_to_task,
    )?;

    task.rotation = get_rotation(id, connection)?;

    Ok(task)
}

/// Get all tasks ordered by due date, with their rotations.
pub fn get_all_tasks(connection: &Connection) -> Result<Vec<Task>, Error> {
    let tasks: Vec<Task> = connection
        .prepare(
            "SELECT id, title, frequency_days, effort, assignee_id, due_date, active,
                prioritize_low_points, fairness_mode
            FROM task ORDER BY due_date ASC, id ASC",
        )?
        .query_map((), map_row_to_task)?
        .collect::<Result<_, _>>()?;

    tasks
        .into_iter()
        .map(|mut task| {
            task.rotation = get_rotation(task.id, connection)?;
            Ok(task)
        })
        .collect()
}

/// Get all active tasks ordered by due date, with their rotations.
pub fn get_active_tasks(connection: &Connection) -> Result<Vec<Task>, Error> {
    let tasks = get_all_tasks(connection)?;

    Ok(tasks.into_iter().filter(|task| task.active).collect())
}

fn validate(new_task: &NewTask) -> Result<&str, Error> {
    let title = new_task.title.trim();

    if title.is_empty() {
        return Err(Error::EmptyTaskTitle);
    }

    if new_task.frequency_days < 1 {
        return Err(Error::InvalidFrequency(new_task.frequency_days));
    }

    if new_task.rotation.is_empty() {
        return Err(Error::EmptyRotation);
    }

    Ok(title)
}

fn replace_rotation(
    id: DatabaseId,
    rotation: &[DatabaseId],
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute("DELETE FROM task_rotation WHERE task_id = ?1", [id])?;

    for (position, member_id) in rotation.iter().enumerate() {
        connection.execute(
            "INSERT INTO task_rotation (task_id, position, member_id) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, position as i64, member_id],
        )?;
    }

    Ok(())
}

fn get_rotation(task_id: DatabaseId, connection: &Connection) -> Result<Vec<DatabaseId>, Error> {
    connection
        .prepare("SELECT member_id FROM task_rotation WHERE task_id = ?1 ORDER BY position ASC")?
        .query_map([task_id], |row| row.get(0))?
        .map(|member_id| member_id.map_err(Error::from))
        .collect()
}

fn map_row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        frequency_days: row.get(2)?,
        effort: row.get(3)?,
        assignee_id: row.get(4)?,
        due_date: row.get(5)?,
        active: row.get(6)?,
        prioritize_low_points: row.get(7)?,
        fairness_mode: row.get(8)?,
        rotation: Vec::new(),
    })
}

#[cfg(test)]
mod task_tests {
    use time::macros::date;

    use crate::{Error, test_utils::get_test_connection};

    use super::{
        FairnessMode, NewTask, advance_task, create_task, delete_task, get_active_tasks,
        get_all_tasks, get_task, update_task,
    };

    fn new_task(rotation: Vec<i64>) -> NewTask {
        NewTask {
            title: "Take out the bins".to_owned(),
            frequency_days: 7,
            effort: 5,
            due_date: date!(2026 - 08 - 10),
            active: true,
            prioritize_low_points: false,
            fairness_mode: FairnessMode::Actual,
            rotation,
        }
    }

    #[test]
    fn creates_task_with_first_rotation_member_assigned() {
        let connection = get_test_connection();

        let task = create_task(&new_task(vec![2, 1, 3]), &connection).unwrap();

        assert_eq!(task.assignee_id, 2);
        assert_eq!(task.rotation, vec![2, 1, 3]);
        assert_eq!(get_task(task.id, &connection), Ok(task));
    }

    #[test]
    fn create_rejects_blank_title() {
        let connection = get_test_connection();
        let mut invalid = new_task(vec![1]);
        invalid.title = "   ".to_owned();

        assert_eq!(
            create_task(&invalid, &connection),
            Err(Error::EmptyTaskTitle)
        );
    }

    #[test]
    fn create_rejects_zero_frequency() {
        let connection = get_test_connection();
        let mut invalid = new_task(vec![1]);
        invalid.frequency_days = 0;

        assert_eq!(
            create_task(&invalid, &connection),
            Err(Error::InvalidFrequency(0))
        );
    }

    #[test]
    fn create_rejects_empty_rotation() {
        let connection = get_test_connection();

        assert_eq!(
            create_task(&new_task(vec![]), &connection),
            Err(Error::EmptyRotation)
        );
    }

    #[test]
    fn update_keeps_assignee_still_in_rotation() {
        let connection = get_test_connection();
        let task = create_task(&new_task(vec![1, 2, 3]), &connection).unwrap();

        let mut updated = new_task(vec![3, 1]);
        updated.title = "Take out all the bins".to_owned();
        update_task(task.id, &updated, &connection).unwrap();

        let got = get_task(task.id, &connection).unwrap();
        assert_eq!(got.assignee_id, 1);
        assert_eq!(got.rotation, vec![3, 1]);
        assert_eq!(got.title, "Take out all the bins");
    }

    #[test]
    fn update_reassigns_when_assignee_leaves_rotation() {
        let connection = get_test_connection();
        let task = create_task(&new_task(vec![1, 2]), &connection).unwrap();

        update_task(task.id, &new_task(vec![2, 3]), &connection).unwrap();

        assert_eq!(get_task(task.id, &connection).unwrap().assignee_id, 2);
    }

    #[test]
    fn update_missing_task_fails() {
        let connection = get_test_connection();

        assert_eq!(
            update_task(999, &new_task(vec![1]), &connection),
            Err(Error::UpdateMissingTask)
        );
    }

    #[test]
    fn advances_assignee_and_due_date() {
        let connection = get_test_connection();
        let task = create_task(&new_task(vec![1, 2]), &connection).unwrap();

        advance_task(task.id, 2, date!(2026 - 08 - 17), &connection).unwrap();

        let got = get_task(task.id, &connection).unwrap();
        assert_eq!(got.assignee_id, 2);
        assert_eq!(got.due_date, date!(2026 - 08 - 17));
    }

    #[test]
    fn deletes_task_and_rotation() {
        let connection = get_test_connection();
        let task = create_task(&new_task(vec![1, 2]), &connection).unwrap();

        delete_task(task.id, &connection).unwrap();

        assert_eq!(get_task(task.id, &connection), Err(Error::NotFound));
        assert_eq!(
            delete_task(task.id, &connection),
            Err(Error::DeleteMissingTask)
        );
    }

    #[test]
    fn active_tasks_excludes_paused() {
        let connection = get_test_connection();
        create_task(&new_task(vec![1]), &connection).unwrap();
        let mut paused = new_task(vec![1]);
        paused.active = false;
        create_task(&paused, &connection).unwrap();

        assert_eq!(get_all_tasks(&connection).unwrap().len(), 2);
        assert_eq!(get_active_tasks(&connection).unwrap().len(), 1);
    }
}
