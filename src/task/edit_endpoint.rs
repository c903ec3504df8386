//! The endpoint for updating a task.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::DatabaseId, endpoints,
    task::{core::update_task, create_endpoint::TaskFormData},
};

/// The state needed for updating a task.
#[derive(Debug, Clone)]
pub struct UpdateTaskEndpointState {
    /// The database connection for managing tasks.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTaskEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle task edit form submission.
pub async fn update_task_endpoint(
    State(state): State<UpdateTaskEndpointState>,
    Path(task_id): Path<DatabaseId>,
    Form(form): Form<TaskFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_task(task_id, &form.into_new_task(), &connection) {
        Ok(()) => (
            HxRedirect(endpoints::TASKS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(
            error @ (Error::EmptyTaskTitle
            | Error::InvalidFrequency(_)
            | Error::EmptyRotation
            | Error::UpdateMissingTask),
        ) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating a task: {error}");

            error.into_alert_response()
        }
    }
}
