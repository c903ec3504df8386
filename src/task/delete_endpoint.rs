//! The endpoint for deleting a task.
//!
//! Deleting a task keeps its completion ledger rows: history charts and point
//! totals still count chores done for since-removed tasks.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, database_id::DatabaseId, task::core::delete_task};

/// The state needed for deleting a task.
#[derive(Debug, Clone)]
pub struct DeleteTaskEndpointState {
    /// The database connection for managing tasks.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTaskEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a task, responds with an alert.
pub async fn delete_task_endpoint(
    State(state): State<DeleteTaskEndpointState>,
    Path(task_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_task(task_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Alert::success("Task deleted", "").into_response(StatusCode::OK),
        Err(error @ Error::DeleteMissingTask) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete task {task_id}: {error}");

            error.into_alert_response()
        }
    }
}
