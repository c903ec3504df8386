//! The endpoint for updating a member's name and laziness factor.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::DatabaseId, endpoints,
    member::core::{LazinessFactor, update_member},
    member::create_endpoint::MemberFormData,
};

/// The state needed for updating a member.
#[derive(Debug, Clone)]
pub struct UpdateMemberEndpointState {
    /// The database connection for managing members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateMemberEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle member edit form submission.
pub async fn update_member_endpoint(
    State(state): State<UpdateMemberEndpointState>,
    Path(member_id): Path<DatabaseId>,
    Form(form): Form<MemberFormData>,
) -> Response {
    let laziness = match LazinessFactor::new(form.laziness_factor) {
        Ok(laziness) => laziness,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_member(member_id, &form.name, laziness, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::MEMBERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update member {member_id}: {error}");

            error.into_alert_response()
        }
    }
}
