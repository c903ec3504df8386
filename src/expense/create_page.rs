//! The page with the form for recording a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    expense::form::{ExpenseFormMode, expense_form_view},
    html::{FORM_CONTAINER_STYLE, base},
    member::get_all_members,
    navigation::NavBar,
    timezone::today_in,
};

/// The state needed for the new expense page.
#[derive(Debug, Clone)]
pub struct CreateExpensePageState {
    /// The canonical timezone name used to pick the default date.
    pub local_timezone: String,
    /// The database connection for reading members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the new expense page.
pub async fn get_create_expense_page(State(state): State<CreateExpensePageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let members = match get_all_members(&connection) {
        Ok(members) => members,
        Err(error) => return error.into_response(),
    };

    let today = today_in(&state.local_timezone);
    let form = expense_form_view(
        endpoints::POST_EXPENSE,
        &members,
        &ExpenseFormMode::Create { today },
    );

    let content = html! {
        (NavBar::new(endpoints::EXPENSES_VIEW).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "New Expense" }
            (form)
        }
    };

    base("New Expense", &[], &content).into_response()
}

#[cfg(test)]
mod create_expense_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            get_test_connection, insert_test_member, must_get_form, parse_html_document,
        },
    };

    use super::{CreateExpensePageState, get_create_expense_page};

    #[tokio::test]
    async fn renders_expense_form() {
        let connection = get_test_connection();
        insert_test_member(&connection, "Ana");
        insert_test_member(&connection, "Ben");
        let state = CreateExpensePageState {
            local_timezone: "Europe/Berlin".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_create_expense_page(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "hx-post", endpoints::POST_EXPENSE);
        assert_form_input(&form, "description", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "category", "text");
        assert_form_input(&form, "date", "date");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn renders_checkbox_per_member_for_both_sets() {
        let connection = get_test_connection();
        insert_test_member(&connection, "Ana");
        insert_test_member(&connection, "Ben");
        insert_test_member(&connection, "Cleo");
        let state = CreateExpensePageState {
            local_timezone: "Europe/Berlin".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_create_expense_page(State(state)).await.into_response();
        let html = parse_html_document(response).await;

        let payer_boxes: Vec<_> = html
            .select(&Selector::parse("input[name=payers]").unwrap())
            .collect();
        let beneficiary_boxes: Vec<_> = html
            .select(&Selector::parse("input[name=beneficiaries]").unwrap())
            .collect();

        assert_eq!(payer_boxes.len(), 3);
        assert_eq!(beneficiary_boxes.len(), 3);
        // Beneficiaries default to the whole household, payers to nobody.
        assert!(
            beneficiary_boxes
                .iter()
                .all(|element| element.value().attr("checked").is_some())
        );
        assert!(
            payer_boxes
                .iter()
                .all(|element| element.value().attr("checked").is_none())
        );
    }
}
