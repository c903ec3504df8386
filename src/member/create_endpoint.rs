//! The endpoint for adding a household member.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    member::core::{LazinessFactor, create_member},
};

/// The state needed for creating a member.
#[derive(Debug, Clone)]
pub struct CreateMemberEndpointState {
    /// The database connection for managing members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateMemberEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a member.
#[derive(Debug, Deserialize)]
pub struct MemberFormData {
    /// The member's display name.
    pub name: String,
    /// The member's laziness factor in [0, 2].
    pub laziness_factor: f64,
}

/// Handle member creation form submission.
pub async fn create_member_endpoint(
    State(state): State<CreateMemberEndpointState>,
    Form(new_member): Form<MemberFormData>,
) -> Response {
    let laziness = match LazinessFactor::new(new_member.laziness_factor) {
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

    match create_member(&new_member.name, laziness, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::MEMBERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::EmptyMemberName | Error::DuplicateMemberName)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a member: {error}");

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_member_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};

    use crate::{
        endpoints,
        member::core::get_all_members,
        test_utils::{assert_hx_redirect, get_test_connection},
    };

    use super::{CreateMemberEndpointState, MemberFormData, create_member_endpoint};

    fn get_state() -> CreateMemberEndpointState {
        CreateMemberEndpointState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        }
    }

    #[tokio::test]
    async fn creates_member_and_redirects() {
        let state = get_state();
        let form = MemberFormData {
            name: "Ana".to_owned(),
            laziness_factor: 1.0,
        };

        let response = create_member_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::MEMBERS_VIEW);

        let members = get_all_members(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Ana");
    }

    #[tokio::test]
    async fn rejects_invalid_laziness_factor() {
        let state = get_state();
        let form = MemberFormData {
            name: "Ana".to_owned(),
            laziness_factor: 3.0,
        };

        let response = create_member_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(
            get_all_members(&state.db_connection.lock().unwrap())
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn rejects_empty_name() {
        let state = get_state();
        let form = MemberFormData {
            name: "".to_owned(),
            laziness_factor: 1.0,
        };

        let response = create_member_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
