//! The completion history page.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base},
    member::get_all_members,
    navigation::NavBar,
    task::completion::{CompletionEvent, TaskCompletion, get_completions},
};

/// The state needed for the task history page.
#[derive(Debug, Clone)]
pub struct TaskHistoryPageState {
    /// The database connection for reading the completion ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TaskHistoryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the task history page.
pub async fn get_task_history_page(State(state): State<TaskHistoryPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let completions = match get_completions(&connection) {
        Ok(completions) => completions,
        Err(error) => return error.into_response(),
    };

    let members = match get_all_members(&connection) {
        Ok(members) => members,
        Err(error) => return error.into_response(),
    };

    let member_names: HashMap<DatabaseId, String> = members
        .into_iter()
        .map(|member| (member.id, member.name))
        .collect();

    history_view(&completions, &member_names).into_response()
}

fn history_view(
    completions: &[TaskCompletion],
    member_names: &HashMap<DatabaseId, String>,
) -> Markup {
    let content = html! {
        (NavBar::new(endpoints::TASKS_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Task History" }

            div class="relative overflow-x-auto shadow-md sm:rounded-lg w-full max-w-4xl"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Task" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Member" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Event" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Points" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Delay" }
                        }
                    }

                    tbody
                    {
                        @for completion in completions {
                            (history_row(completion, member_names))
                        }
                    }
                }
            }

            @if completions.is_empty() {
                p class="mt-4 text-gray-500 dark:text-gray-400"
                {
                    "Nothing here yet. Completed chores show up on this page."
                }
            }
        }
    };

    base("Task History", &[], &content)
}

fn history_row(
    completion: &TaskCompletion,
    member_names: &HashMap<DatabaseId, String>,
) -> Markup {
    let member_name = member_names
        .get(&completion.member_id)
        .map(String::as_str)
        .unwrap_or("Former member");

    let event_label = match completion.event {
        CompletionEvent::Complete => "Completed",
        CompletionEvent::Skip => "Skipped",
        CompletionEvent::Takeover => "Taken over",
    };

    let delay_label = match completion.delay_days {
        0 => "on time".to_owned(),
        days if days > 0 => format!("{days} days late"),
        days => format!("{} days early", -days),
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (completion.completed_on) }
            td class=(TABLE_CELL_STYLE) { (completion.task_title) }
            td class=(TABLE_CELL_STYLE) { (member_name) }
            td class=(TABLE_CELL_STYLE) { (event_label) }
            td class=(TABLE_CELL_STYLE) { (completion.points) }
            td class=(TABLE_CELL_STYLE) { (delay_label) }
        }
    }
}
