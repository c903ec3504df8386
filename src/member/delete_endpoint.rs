//! The endpoint for removing a member from the household.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, database_id::DatabaseId, member::core::delete_member,
};

/// The state needed for deleting a member.
#[derive(Debug, Clone)]
pub struct DeleteMemberEndpointState {
    /// The database connection for managing members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteMemberEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a member, responds with an alert.
pub async fn delete_member_endpoint(
    State(state): State<DeleteMemberEndpointState>,
    Path(member_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_member(member_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Alert::success("Member deleted", "").into_response(StatusCode::OK),
        Err(error @ Error::DeleteMissingMember) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete member {member_id}: {error}");

            error.into_alert_response()
        }
    }
}
