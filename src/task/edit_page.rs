//! The page for editing an existing task.

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
    html::{FORM_CONTAINER_STYLE, base},
    member::get_all_members,
    navigation::NavBar,
    task::{
        core::get_task,
        form::{TaskFormMode, task_form_view},
    },
};

/// The state needed for the edit task page.
#[derive(Debug, Clone)]
pub struct EditTaskPageState {
    /// The database connection for reading the task and members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTaskPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the edit task page, prefilled with the task's current values.
pub async fn get_edit_task_page(
    State(state): State<EditTaskPageState>,
    Path(task_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let task = match get_task(task_id, &connection) {
        Ok(task) => task,
        Err(error) => return error.into_response(),
    };

    let members = match get_all_members(&connection) {
        Ok(members) => members,
        Err(error) => return error.into_response(),
    };

    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_TASK, task_id);
    let form = task_form_view(&update_endpoint, &members, &TaskFormMode::Edit { task: &task });

    let content = html! {
        (NavBar::new(endpoints::TASKS_VIEW).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Edit Task" }
            (form)
        }
    };

    base("Edit Task", &[], &content).into_response()
}
