//! The page with the form for creating a new task.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    member::get_all_members,
    navigation::NavBar,
    task::form::{TaskFormMode, task_form_view},
    timezone::today_in,
};

/// The state needed for the new task page.
#[derive(Debug, Clone)]
pub struct CreateTaskPageState {
    /// The canonical timezone name used to pick the default due date.
    pub local_timezone: String,
    /// The database connection for reading members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTaskPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the new task page.
pub async fn get_create_task_page(State(state): State<CreateTaskPageState>) -> Response {
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
    let form = task_form_view(
        endpoints::POST_TASK,
        &members,
        &TaskFormMode::Create { today },
    );

    let content = html! {
        (NavBar::new(endpoints::TASKS_VIEW).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "New Task" }
            (form)
        }
    };

    base("New Task", &[], &content).into_response()
}
