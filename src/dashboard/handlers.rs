//! The dashboard page: summary cards and household charts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dashboard::{
        cards::{due_tasks_card, shopping_card},
        charts::{DashboardChart, charts_script, charts_view, member_balances_chart, monthly_points_chart},
    },
    database_id::DatabaseId,
    endpoints,
    expense::{compute_balances, get_expenses_since, latest_cash_audit},
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    member::get_all_members,
    navigation::NavBar,
    shopping::get_all_items,
    task::{get_active_tasks, get_completions},
    timezone::today_in,
};

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardPageState {
    /// The canonical timezone name used to flag due chores.
    pub local_timezone: String,
    /// The database connection for reading every household table.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the dashboard page.
pub async fn get_dashboard_page(State(state): State<DashboardPageState>) -> Response {
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

    let tasks = match get_active_tasks(&connection) {
        Ok(tasks) => tasks,
        Err(error) => return error.into_response(),
    };

    let completions = match get_completions(&connection) {
        Ok(completions) => completions,
        Err(error) => return error.into_response(),
    };

    let open_items = match get_all_items(&connection) {
        Ok(items) => items.iter().filter(|item| !item.checked).count(),
        Err(error) => return error.into_response(),
    };

    let audit_date = match latest_cash_audit(&connection) {
        Ok(audit_date) => audit_date,
        Err(error) => return error.into_response(),
    };

    let period_expenses = match get_expenses_since(audit_date, &connection) {
        Ok(expenses) => expenses,
        Err(error) => return error.into_response(),
    };

    let member_ids: Vec<DatabaseId> = members.iter().map(|member| member.id).collect();
    let balances = match compute_balances(&period_expenses, &member_ids) {
        Ok(balances) => balances,
        Err(error) => return error.into_response(),
    };

    let member_names: HashMap<DatabaseId, String> = members
        .iter()
        .map(|member| (member.id, member.name.clone()))
        .collect();

    let today = today_in(&state.local_timezone);

    let charts = [
        DashboardChart {
            id: "monthly-points-chart",
            options: monthly_points_chart(&completions, &members).to_string(),
        },
        DashboardChart {
            id: "member-balances-chart",
            options: member_balances_chart(&balances, &members).to_string(),
        },
    ];

    let content = html! {
        (NavBar::new(endpoints::DASHBOARD_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Dashboard" }

            div class="w-full max-w-5xl flex flex-wrap gap-4 mb-6"
            {
                (due_tasks_card(&tasks, &member_names, today))
                (shopping_card(open_items))
            }

            div class="w-full max-w-5xl"
            {
                (charts_view(&charts))
            }
        }
    };

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content).into_response()
}
