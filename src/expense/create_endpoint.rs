//! The endpoint for recording a shared expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, database_id::DatabaseId, endpoints,
    expense::core::{NewExpense, create_expense},
};

/// The state needed for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseEndpointState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing an expense.
///
/// The amount arrives in euros and is converted to cents. The participant
/// sets come from checkbox groups, hence the `serde(default)`.
#[derive(Debug, Deserialize)]
pub struct ExpenseFormData {
    /// What the money was spent on.
    pub description: String,
    /// The amount in euros, e.g. "12.50".
    pub amount: f64,
    /// A free-form category.
    pub category: String,
    /// When the expense happened.
    pub date: Date,
    /// The member who recorded the entry.
    pub created_by: DatabaseId,
    /// The members who fronted the money.
    #[serde(default)]
    pub payers: Vec<DatabaseId>,
    /// The members the expense was for.
    #[serde(default)]
    pub beneficiaries: Vec<DatabaseId>,
}

impl ExpenseFormData {
    pub(crate) fn into_new_expense(self) -> NewExpense {
        NewExpense {
            description: self.description,
            amount_cents: (self.amount * 100.0).round() as i64,
            category: self.category,
            date: self.date,
            created_by: self.created_by,
            payers: self.payers,
            beneficiaries: self.beneficiaries,
        }
    }
}

/// Handle expense creation form submission.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseEndpointState>,
    Form(form): Form<ExpenseFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_expense(&form.into_new_expense(), &connection) {
        Ok(_) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::InvalidSplitInput) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an expense: {error}");

            error.into_alert_response()
        }
    }
}
