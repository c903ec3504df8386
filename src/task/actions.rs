//! The three terminal actions on a due task: complete, skip, and takeover.
//!
//! Complete and skip advance the task to its next instance at
//! `old_due + frequency_days`, preserving the cadence no matter how late the
//! chore actually got done. Takeover only reassigns the current instance.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, Duration};

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    endpoints,
    member::get_all_members,
    task::{
        completion::{CompletionEvent, NewTaskCompletion, get_points_by_member, record_completion},
        core::{Task, advance_task, get_active_tasks, get_task},
        fairness::next_assignee,
    },
    timezone::today_in,
};

/// The state needed for the task action endpoints.
#[derive(Debug, Clone)]
pub struct TaskActionState {
    /// The canonical timezone name used to date completion records.
    pub local_timezone: String,
    /// The database connection for tasks and the completion ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TaskActionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for reassigning a due task.
#[derive(Debug, Deserialize)]
pub struct TakeoverFormData {
    /// The member taking over the current due instance.
    pub member_id: DatabaseId,
}

/// Mark the current due instance done: the assignee earns the task's effort
/// points and the task advances to its next instance.
pub async fn complete_task_endpoint(
    State(state): State<TaskActionState>,
    Path(task_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let today = today_in(&state.local_timezone);

    match finish_instance(task_id, CompletionEvent::Complete, today, &connection) {
        Ok(()) => redirect_to_tasks(),
        Err(error) => {
            tracing::error!("Could not complete task {task_id}: {error}");

            error.into_alert_response()
        }
    }
}

/// Pass on the current due instance without awarding points. The task still
/// advances to its next instance.
pub async fn skip_task_endpoint(
    State(state): State<TaskActionState>,
    Path(task_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let today = today_in(&state.local_timezone);

    match finish_instance(task_id, CompletionEvent::Skip, today, &connection) {
        Ok(()) => redirect_to_tasks(),
        Err(error) => {
            tracing::error!("Could not skip task {task_id}: {error}");

            error.into_alert_response()
        }
    }
}

/// Hand the current due instance to another member. The due date stays put;
/// the new assignee may then complete (and earn the points for) the chore.
pub async fn takeover_task_endpoint(
    State(state): State<TaskActionState>,
    Path(task_id): Path<DatabaseId>,
    Form(form): Form<TakeoverFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let today = today_in(&state.local_timezone);

    match take_over_instance(task_id, form.member_id, today, &connection) {
        Ok(()) => redirect_to_tasks(),
        Err(error) => {
            tracing::error!("Could not reassign task {task_id}: {error}");

            error.into_alert_response()
        }
    }
}

fn finish_instance(
    task_id: DatabaseId,
    event: CompletionEvent,
    today: Date,
    connection: &Connection,
) -> Result<(), Error> {
    let task = get_task(task_id, connection)?;

    let points = match event {
        CompletionEvent::Complete => task.effort,
        _ => 0,
    };

    record_completion(
        &NewTaskCompletion {
            task_title: task.title.clone(),
            member_id: task.assignee_id,
            points,
            delay_days: (today - task.due_date).whole_days(),
            event,
            completed_on: today,
        },
        connection,
    )?;

    let next = pick_next_assignee(&task, connection)?;
    // The next instance is scheduled from the old due date, not from today.
    let next_due = task.due_date + Duration::days(task.frequency_days);

    advance_task(task.id, next, next_due, connection)
}

fn take_over_instance(
    task_id: DatabaseId,
    member_id: DatabaseId,
    today: Date,
    connection: &Connection,
) -> Result<(), Error> {
    let task = get_task(task_id, connection)?;

    record_completion(
        &NewTaskCompletion {
            task_title: task.title.clone(),
            member_id,
            points: 0,
            delay_days: (today - task.due_date).whole_days(),
            event: CompletionEvent::Takeover,
            completed_on: today,
        },
        connection,
    )?;

    advance_task(task.id, member_id, task.due_date, connection)
}

fn pick_next_assignee(task: &Task, connection: &Connection) -> Result<DatabaseId, Error> {
    let members = get_all_members(connection)?;
    let points = get_points_by_member(connection)?;
    let other_tasks = get_active_tasks(connection)?;

    next_assignee(task, &members, &points, &other_tasks)
}

fn redirect_to_tasks() -> Response {
    (
        HxRedirect(endpoints::TASKS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
