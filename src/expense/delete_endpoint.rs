//! The endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, database_id::DatabaseId, expense::core::delete_expense,
};

/// The state needed for deleting an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseEndpointState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an expense, responds with an alert.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseEndpointState>,
    Path(expense_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(expense_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Alert::success("Expense deleted", "").into_response(StatusCode::OK),
        Err(error @ Error::DeleteMissingExpense) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");

            error.into_alert_response()
        }
    }
}
