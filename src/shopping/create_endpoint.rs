//! The endpoint for adding a shopping list item.

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
    AppState, Error, database_id::DatabaseId, endpoints, shopping::core::create_item,
    timezone::today_in,
};

/// The state needed for adding a shopping list item.
#[derive(Debug, Clone)]
pub struct CreateItemEndpointState {
    /// The canonical timezone name used to date new items.
    pub local_timezone: String,
    /// The database connection for managing the list.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateItemEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for adding a shopping list item.
#[derive(Debug, Deserialize)]
pub struct ItemFormData {
    /// What to buy.
    pub name: String,
    /// An optional note.
    #[serde(default)]
    pub note: String,
    /// The member adding the item.
    pub created_by: DatabaseId,
}

/// Handle shopping item form submission.
pub async fn create_item_endpoint(
    State(state): State<CreateItemEndpointState>,
    Form(form): Form<ItemFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let today = today_in(&state.local_timezone);

    match create_item(&form.name, &form.note, form.created_by, today, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::SHOPPING_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::EmptyItemName) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while adding a shopping item: {error}");

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_item_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};

    use crate::{
        endpoints,
        shopping::core::get_all_items,
        test_utils::{assert_hx_redirect, get_test_connection, insert_test_member},
    };

    use super::{CreateItemEndpointState, ItemFormData, create_item_endpoint};

    #[tokio::test]
    async fn creates_item_and_redirects() {
        let connection = get_test_connection();
        let ana = insert_test_member(&connection, "Ana");
        let state = CreateItemEndpointState {
            local_timezone: "Europe/Berlin".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let form = ItemFormData {
            name: "Milk".to_owned(),
            note: "oat".to_owned(),
            created_by: ana,
        };

        let response = create_item_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SHOPPING_VIEW);

        let items = get_all_items(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Milk");
    }

    #[tokio::test]
    async fn rejects_blank_name() {
        let state = CreateItemEndpointState {
            local_timezone: "Europe/Berlin".to_owned(),
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let form = ItemFormData {
            name: "  ".to_owned(),
            note: String::new(),
            created_by: 1,
        };

        let response = create_item_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(
            get_all_items(&state.db_connection.lock().unwrap())
                .unwrap()
                .is_empty()
        );
    }
}
