//! The endpoint for removing a shopping list item.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, database_id::DatabaseId, shopping::core::delete_item};

/// The state needed for deleting a shopping list item.
#[derive(Debug, Clone)]
pub struct DeleteItemEndpointState {
    /// The database connection for managing the list.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteItemEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a shopping list item, responds with an alert.
pub async fn delete_item_endpoint(
    State(state): State<DeleteItemEndpointState>,
    Path(item_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_item(item_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the list item.
        Ok(()) => Alert::success("Item deleted", "").into_response(StatusCode::OK),
        Err(error @ Error::DeleteMissingItem) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete shopping item {item_id}: {error}");

            error.into_alert_response()
        }
    }
}
