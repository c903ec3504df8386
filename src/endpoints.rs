//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/tasks/{task_id}/edit', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page summarising due chores and balances.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing the household's recurring tasks.
pub const TASKS_VIEW: &str = "/tasks";
/// The page for creating a new task.
pub const NEW_TASK_VIEW: &str = "/tasks/new";
/// The page for editing an existing task.
pub const EDIT_TASK_VIEW: &str = "/tasks/{task_id}/edit";
/// The page showing the task completion history and effort charts.
pub const TASK_HISTORY_VIEW: &str = "/tasks/history";
/// The page listing shared expenses and member balances.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page for creating a new expense.
pub const NEW_EXPENSE_VIEW: &str = "/expenses/new";
/// The page for editing an existing expense.
pub const EDIT_EXPENSE_VIEW: &str = "/expenses/{expense_id}/edit";
/// The shared shopping list page.
pub const SHOPPING_VIEW: &str = "/shopping";
/// The page listing household members and their laziness factors.
pub const MEMBERS_VIEW: &str = "/members";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create an expense.
pub const POST_EXPENSE: &str = "/api/expenses";
/// The route to update an expense.
pub const PUT_EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to delete an expense.
pub const DELETE_EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to record a cash audit, settling all balances.
pub const POST_AUDIT: &str = "/api/audits";
/// The route to create a task.
pub const POST_TASK: &str = "/api/tasks";
/// The route to update a task.
pub const PUT_TASK: &str = "/api/tasks/{task_id}";
/// The route to delete a task.
pub const DELETE_TASK: &str = "/api/tasks/{task_id}";
/// The route to complete the current due instance of a task.
pub const COMPLETE_TASK: &str = "/api/tasks/{task_id}/complete";
/// The route to skip the current due instance of a task.
pub const SKIP_TASK: &str = "/api/tasks/{task_id}/skip";
/// The route to hand the current due instance of a task to another member.
pub const TAKEOVER_TASK: &str = "/api/tasks/{task_id}/takeover";
/// The route to create a shopping list item.
pub const POST_SHOPPING_ITEM: &str = "/api/shopping";
/// The route to tick or untick a shopping list item.
pub const TOGGLE_SHOPPING_ITEM: &str = "/api/shopping/{item_id}/toggle";
/// The route to delete a shopping list item.
pub const DELETE_SHOPPING_ITEM: &str = "/api/shopping/{item_id}";
/// The route to create a member.
pub const POST_MEMBER: &str = "/api/members";
/// The route to update a member.
pub const PUT_MEMBER: &str = "/api/members/{member_id}";
/// The route to delete a member.
pub const DELETE_MEMBER: &str = "/api/members/{member_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/tasks/{task_id}/edit', '{task_id}' is
/// the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TASKS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_TASK_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_TASK_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TASK_HISTORY_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_EXPENSE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_EXPENSE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SHOPPING_VIEW);
        assert_endpoint_is_valid_uri(endpoints::MEMBERS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::POST_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::PUT_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::DELETE_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::POST_AUDIT);
        assert_endpoint_is_valid_uri(endpoints::POST_TASK);
        assert_endpoint_is_valid_uri(endpoints::PUT_TASK);
        assert_endpoint_is_valid_uri(endpoints::DELETE_TASK);
        assert_endpoint_is_valid_uri(endpoints::COMPLETE_TASK);
        assert_endpoint_is_valid_uri(endpoints::SKIP_TASK);
        assert_endpoint_is_valid_uri(endpoints::TAKEOVER_TASK);
        assert_endpoint_is_valid_uri(endpoints::POST_SHOPPING_ITEM);
        assert_endpoint_is_valid_uri(endpoints::TOGGLE_SHOPPING_ITEM);
        assert_endpoint_is_valid_uri(endpoints::DELETE_SHOPPING_ITEM);
        assert_endpoint_is_valid_uri(endpoints::POST_MEMBER);
        assert_endpoint_is_valid_uri(endpoints::PUT_MEMBER);
        assert_endpoint_is_valid_uri(endpoints::DELETE_MEMBER);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/tasks/{task_id}/edit", 1);

        assert_eq!(formatted_path, "/tasks/1/edit");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/tasks/history", 1);

        assert_eq!(formatted_path, "/tasks/history");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_at_end() {
        let formatted_path = format_endpoint("/api/members/{member_id}", 42);

        assert_eq!(formatted_path, "/api/members/42");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
