//! The endpoint for ticking a shopping list item off (or back on).

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::DatabaseId, endpoints, shopping::core::toggle_item,
};

/// The state needed for toggling a shopping list item.
#[derive(Debug, Clone)]
pub struct ToggleItemEndpointState {
    /// The database connection for managing the list.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ToggleItemEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Flip an item between bought and outstanding, then refresh the list so the
/// item moves to the right group.
pub async fn toggle_item_endpoint(
    State(state): State<ToggleItemEndpointState>,
    Path(item_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match toggle_item(item_id, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::SHOPPING_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::NotFound) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not toggle shopping item {item_id}: {error}");

            error.into_alert_response()
        }
    }
}
