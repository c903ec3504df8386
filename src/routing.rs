//! Application router configuration mapping endpoint URIs to their handlers.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    expense::{
        create_cash_audit_endpoint, create_expense_endpoint, delete_expense_endpoint,
        get_create_expense_page, get_edit_expense_page, get_expenses_page, update_expense_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    member::{
        create_member_endpoint, delete_member_endpoint, get_members_page, update_member_endpoint,
    },
    not_found::get_404_not_found,
    shopping::{
        create_item_endpoint, delete_item_endpoint, get_shopping_page, toggle_item_endpoint,
    },
    task::{
        complete_task_endpoint, create_task_endpoint, delete_task_endpoint, get_create_task_page,
        get_edit_task_page, get_task_history_page, get_tasks_page, skip_task_endpoint,
        takeover_task_endpoint, update_task_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TASKS_VIEW, get(get_tasks_page))
        .route(endpoints::NEW_TASK_VIEW, get(get_create_task_page))
        .route(endpoints::EDIT_TASK_VIEW, get(get_edit_task_page))
        .route(endpoints::TASK_HISTORY_VIEW, get(get_task_history_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::NEW_EXPENSE_VIEW, get(get_create_expense_page))
        .route(endpoints::EDIT_EXPENSE_VIEW, get(get_edit_expense_page))
        .route(endpoints::SHOPPING_VIEW, get(get_shopping_page))
        .route(endpoints::MEMBERS_VIEW, get(get_members_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(endpoints::POST_EXPENSE, post(create_expense_endpoint))
        .route(
            endpoints::PUT_EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(endpoints::POST_AUDIT, post(create_cash_audit_endpoint))
        .route(endpoints::POST_TASK, post(create_task_endpoint))
        .route(
            endpoints::PUT_TASK,
            put(update_task_endpoint).delete(delete_task_endpoint),
        )
        .route(endpoints::COMPLETE_TASK, post(complete_task_endpoint))
        .route(endpoints::SKIP_TASK, post(skip_task_endpoint))
        .route(endpoints::TAKEOVER_TASK, post(takeover_task_endpoint))
        .route(endpoints::POST_SHOPPING_ITEM, post(create_item_endpoint))
        .route(endpoints::TOGGLE_SHOPPING_ITEM, post(toggle_item_endpoint))
        .route(endpoints::DELETE_SHOPPING_ITEM, delete(delete_item_endpoint))
        .route(endpoints::POST_MEMBER, post(create_member_endpoint))
        .route(
            endpoints::PUT_MEMBER,
            put(update_member_endpoint).delete(delete_member_endpoint),
        );

    view_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
