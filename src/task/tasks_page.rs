//! The tasks page: every chore, who is on the hook, and the action buttons.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE, FORM_TEXT_INPUT_STYLE, MEMBER_BADGE_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    member::{Member, get_all_members},
    navigation::NavBar,
    task::core::{Task, get_all_tasks},
    timezone::today_in,
};

/// The state needed for the tasks page.
#[derive(Debug, Clone)]
pub struct TasksPageState {
    /// The canonical timezone name used to flag overdue tasks.
    pub local_timezone: String,
    /// The database connection for reading tasks and members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TasksPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the tasks page.
pub async fn get_tasks_page(State(state): State<TasksPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let tasks = match get_all_tasks(&connection) {
        Ok(tasks) => tasks,
        Err(error) => return error.into_response(),
    };

    let members = match get_all_members(&connection) {
        Ok(members) => members,
        Err(error) => return error.into_response(),
    };

    let today = today_in(&state.local_timezone);

    tasks_view(&tasks, &members, today).into_response()
}

fn tasks_view(tasks: &[Task], members: &[Member], today: Date) -> Markup {
    let member_names: HashMap<DatabaseId, &str> = members
        .iter()
        .map(|member| (member.id, member.name.as_str()))
        .collect();

    let content = html! {
        (NavBar::new(endpoints::TASKS_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Tasks" }

            div class="w-full max-w-5xl flex justify-between items-center mb-2"
            {
                a href=(endpoints::NEW_TASK_VIEW) class=(BUTTON_SECONDARY_STYLE) { "New Task" }
                a href=(endpoints::TASK_HISTORY_VIEW) class="underline text-blue-600 dark:text-blue-400"
                {
                    "History"
                }
            }

            div class="relative overflow-x-auto shadow-md sm:rounded-lg w-full max-w-5xl"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Task" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Due" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Assignee" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Rotation" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for task in tasks {
                            (task_row(task, members, &member_names, today))
                        }
                    }
                }
            }

            @if tasks.is_empty() {
                p class="mt-4 text-gray-500 dark:text-gray-400"
                {
                    "No tasks yet. Add the first chore above."
                }
            }
        }
    };

    base("Tasks", &[], &content)
}

fn task_row(
    task: &Task,
    members: &[Member],
    member_names: &HashMap<DatabaseId, &str>,
    today: Date,
) -> Markup {
    let overdue = task.active && task.due_date < today;
    let complete_endpoint = endpoints::format_endpoint(endpoints::COMPLETE_TASK, task.id);
    let skip_endpoint = endpoints::format_endpoint(endpoints::SKIP_TASK, task.id);
    let takeover_endpoint = endpoints::format_endpoint(endpoints::TAKEOVER_TASK, task.id);
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_TASK_VIEW, task.id);
    let delete_endpoint = endpoints::format_endpoint(endpoints::DELETE_TASK, task.id);
    let name_of = |member_id: DatabaseId| {
        member_names
            .get(&member_id)
            .copied()
            .unwrap_or("Former member")
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                p class="font-medium text-gray-900 dark:text-white" { (task.title) }
                p class="text-xs"
                {
                    "every " (task.frequency_days) " days, " (task.effort) " pts"
                    @if !task.active { ", paused" }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                @if overdue {
                    span class="font-semibold text-red-600 dark:text-red-400" { (task.due_date) }
                } @else {
                    (task.due_date)
                }
            }

            td class=(TABLE_CELL_STYLE) { (name_of(task.assignee_id)) }

            td class=(TABLE_CELL_STYLE)
            {
                @for member_id in &task.rotation {
                    span class=(MEMBER_BADGE_STYLE) { (name_of(*member_id)) }
                    " "
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex flex-wrap items-center gap-2"
                {
                    button
                        hx-post=(complete_endpoint)
                        hx-target-error="#alert-container"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Complete"
                    }

                    button
                        hx-post=(skip_endpoint)
                        hx-confirm="Skip this chore without awarding points?"
                        hx-target-error="#alert-container"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Skip"
                    }

                    form
                        hx-post=(takeover_endpoint)
                        hx-target-error="#alert-container"
                        class="flex items-center gap-1"
                    {
                        select name="member_id" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for member in members {
                                option value=(member.id) { (member.name) }
                            }
                        }

                        button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Take over" }
                    }

                    a href=(edit_endpoint) class="underline text-blue-600 dark:text-blue-400"
                    {
                        "Edit"
                    }

                    button
                        hx-delete=(delete_endpoint)
                        hx-confirm=(format!("Delete \"{}\"?", task.title))
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}
