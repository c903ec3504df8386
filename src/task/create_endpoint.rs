//! The endpoint for creating a recurring task.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, database_id::DatabaseId, endpoints,
    task::core::{FairnessMode, NewTask, create_task},
};

/// The state needed for creating a task.
#[derive(Debug, Clone)]
pub struct CreateTaskEndpointState {
    /// The database connection for managing tasks.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTaskEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing a task.
///
/// The rotation comes from a checkbox group, hence the `serde(default)`.
/// `active` defaults to true because the create form has no status control.
#[derive(Debug, Deserialize)]
pub struct TaskFormData {
    /// What needs doing.
    pub title: String,
    /// How often the task recurs, in days.
    pub frequency_days: i64,
    /// The effort points awarded for completing the task.
    pub effort: i64,
    /// When the current instance is due.
    pub due_date: Date,
    /// The ordered rotation of eligible members.
    #[serde(default)]
    pub rotation: Vec<DatabaseId>,
    /// Whether to pick the next assignee by lowest scaled score.
    #[serde(default)]
    pub prioritize_low_points: bool,
    /// How scores are computed when `prioritize_low_points` is set.
    #[serde(default)]
    pub fairness_mode: FairnessMode,
    /// Whether the task is active.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl TaskFormData {
    pub(crate) fn into_new_task(self) -> NewTask {
        NewTask {
            title: self.title,
            frequency_days: self.frequency_days,
            effort: self.effort,
            due_date: self.due_date,
            active: self.active,
            prioritize_low_points: self.prioritize_low_points,
            fairness_mode: self.fairness_mode,
            rotation: self.rotation,
        }
    }
}

/// Handle task creation form submission.
pub async fn create_task_endpoint(
    State(state): State<CreateTaskEndpointState>,
    Form(form): Form<TaskFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_task(&form.into_new_task(), &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TASKS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(
            error @ (Error::EmptyTaskTitle | Error::InvalidFrequency(_) | Error::EmptyRotation),
        ) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a task: {error}");

            error.into_alert_response()
        }
    }
}
