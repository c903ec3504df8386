//! The summary cards at the top of the dashboard.

use std::collections::HashMap;

use maud::{Markup, html};
use time::Date;

use crate::{database_id::DatabaseId, endpoints, task::Task};

const CARD_STYLE: &str = "rounded-lg bg-white dark:bg-gray-800 shadow p-4 flex-1 min-w-[16rem]";

/// The chores that are due today or overdue, with who is on the hook.
pub(super) fn due_tasks_card(
    tasks: &[Task],
    member_names: &HashMap<DatabaseId, String>,
    today: Date,
) -> Markup {
    let due: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.active && task.due_date <= today)
        .collect();

    html! {
        div class=(CARD_STYLE)
        {
            h2 class="text-lg font-semibold mb-2"
            {
                a href=(endpoints::TASKS_VIEW) class="hover:underline" { "Chores due" }
            }

            @if due.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "Nothing due. Enjoy the quiet." }
            } @else {
                ul class="space-y-1"
                {
                    @for task in &due {
                        li
                        {
                            span class="font-medium" { (task.title) }
                            " — "
                            (member_names
                                .get(&task.assignee_id)
                                .map(String::as_str)
                                .unwrap_or("Former member"))

                            @if task.due_date < today {
                                " "
                                span class="text-red-600 dark:text-red-400 text-sm"
                                {
                                    "(overdue since " (task.due_date) ")"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// How many shopping list items are still outstanding.
pub(super) fn shopping_card(open_items: usize) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h2 class="text-lg font-semibold mb-2"
            {
                a href=(endpoints::SHOPPING_VIEW) class="hover:underline" { "Shopping list" }
            }

            @match open_items {
                0 => { p class="text-gray-500 dark:text-gray-400" { "Nothing to buy." } }
                1 => { p { "1 item to buy." } }
                count => { p { (count) " items to buy." } }
            }
        }
    }
}
