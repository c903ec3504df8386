//! The page for editing an existing expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    endpoints,
    expense::{
        core::get_expense,
        form::{ExpenseFormMode, expense_form_view},
    },
    html::{FORM_CONTAINER_STYLE, base},
    member::get_all_members,
    navigation::NavBar,
};

/// The state needed for the edit expense page.
#[derive(Debug, Clone)]
pub struct EditExpensePageState {
    /// The database connection for reading the expense and members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the edit expense page, prefilled with the expense's current values.
pub async fn get_edit_expense_page(
    State(state): State<EditExpensePageState>,
    Path(expense_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let expense = match get_expense(expense_id, &connection) {
        Ok(expense) => expense,
        Err(error) => return error.into_response(),
    };

    let members = match get_all_members(&connection) {
        Ok(members) => members,
        Err(error) => return error.into_response(),
    };

    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_EXPENSE, expense_id);
    let form = expense_form_view(
        &update_endpoint,
        &members,
        &ExpenseFormMode::Edit { expense: &expense },
    );

    let content = html! {
        (NavBar::new(endpoints::EXPENSES_VIEW).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Edit Expense" }
            (form)
        }
    };

    base("Edit Expense", &[], &content).into_response()
}
