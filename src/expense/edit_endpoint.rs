//! The endpoint for updating an expense.

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
    expense::{core::update_expense, create_endpoint::ExpenseFormData},
};

/// The state needed for updating an expense.
#[derive(Debug, Clone)]
pub struct UpdateExpenseEndpointState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle expense edit form submission.
pub async fn update_expense_endpoint(
    State(state): State<UpdateExpenseEndpointState>,
    Path(expense_id): Path<DatabaseId>,
    Form(form): Form<ExpenseFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_expense(expense_id, &form.into_new_expense(), &connection) {
        Ok(()) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::InvalidSplitInput | Error::UpdateMissingExpense)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating an expense: {error}");

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod update_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::Form;
    use time::macros::date;

    use crate::{
        endpoints,
        expense::{
            core::{NewExpense, create_expense, get_expense},
            create_endpoint::ExpenseFormData,
        },
        test_utils::{assert_hx_redirect, get_test_connection, insert_test_member},
    };

    use super::{UpdateExpenseEndpointState, update_expense_endpoint};

    #[tokio::test]
    async fn updates_expense_and_redirects() {
        let connection = get_test_connection();
        let ana = insert_test_member(&connection, "Ana");
        let ben = insert_test_member(&connection, "Ben");
        let expense = create_expense(
            &NewExpense {
                description: "Groceries run".to_owned(),
                amount_cents: 3000,
                category: "Groceries".to_owned(),
                date: date!(2026 - 08 - 01),
                created_by: ana,
                payers: vec![ana],
                beneficiaries: vec![ana, ben],
            },
            &connection,
        )
        .unwrap();
        let state = UpdateExpenseEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let form = ExpenseFormData {
            description: "Groceries and cleaning supplies".to_owned(),
            amount: 45.50,
            category: "Groceries".to_owned(),
            date: date!(2026 - 08 - 02),
            created_by: ben,
            payers: vec![ben],
            beneficiaries: vec![ana, ben],
        };

        let response = update_expense_endpoint(State(state.clone()), Path(expense.id), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::EXPENSES_VIEW);

        let updated = get_expense(expense.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated.amount_cents, 4550);
        assert_eq!(updated.payers, vec![ben]);
    }

    #[tokio::test]
    async fn missing_expense_returns_not_found() {
        let state = UpdateExpenseEndpointState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let form = ExpenseFormData {
            description: "Groceries run".to_owned(),
            amount: 30.0,
            category: "Groceries".to_owned(),
            date: date!(2026 - 08 - 01),
            created_by: 1,
            payers: vec![1],
            beneficiaries: vec![1],
        };

        let response = update_expense_endpoint(State(state), Path(999), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
