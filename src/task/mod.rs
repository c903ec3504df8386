//! Recurring chores: rotations, fairness scoring, and the completion ledger.

mod actions;
mod completion;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod fairness;
mod form;
mod history_page;
mod tasks_page;

pub use actions::{complete_task_endpoint, skip_task_endpoint, takeover_task_endpoint};
pub use completion::{
    CompletionEvent, TaskCompletion, create_task_completion_table, get_completions,
    get_points_by_member,
};
pub use core::{FairnessMode, NewTask, Task, create_task, create_task_tables, get_active_tasks};
pub use create_endpoint::create_task_endpoint;
pub use create_page::get_create_task_page;
pub use delete_endpoint::delete_task_endpoint;
pub use edit_endpoint::update_task_endpoint;
pub use edit_page::get_edit_task_page;
pub use fairness::scaled_score;
pub use history_page::get_task_history_page;
pub use tasks_page::get_tasks_page;
