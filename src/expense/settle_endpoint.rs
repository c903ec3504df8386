//! The endpoint for recording a cash audit ("settle up").
//!
//! An audit marks all balances as settled on a given date. Only expenses
//! dated after the latest audit count towards the next settlement period.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{AppState, Error, endpoints, expense::audit::create_cash_audit, timezone::today_in};

/// The state needed for recording a cash audit.
#[derive(Debug, Clone)]
pub struct CreateCashAuditEndpointState {
    /// The canonical timezone name used to stamp the audit date.
    pub local_timezone: String,
    /// The database connection for recording audits.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCashAuditEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Record a cash audit dated today, then redirect back to the expenses page.
pub async fn create_cash_audit_endpoint(
    State(state): State<CreateCashAuditEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let today = today_in(&state.local_timezone);

    match create_cash_audit(today, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not record cash audit: {error}");

            error.into_alert_response()
        }
    }
}
