//! The expenses page: balances, a settlement preview, and the expense table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    endpoints,
    expense::{
        audit::latest_cash_audit,
        balance::{Transfer, compute_balances, settlement_transfers},
        core::{Expense, get_expenses_since},
    },
    html::{
        BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_cents,
    },
    member::get_all_members,
    navigation::NavBar,
    pagination::{PaginationConfig, PaginationIndicator, create_pagination_indicators},
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    /// The database connection for reading expenses, members, and audits.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config for how expenses should be paginated.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for paging through the expense table.
#[derive(Debug, Deserialize)]
pub struct ExpensesQueryParams {
    /// The page to display, starting from 1.
    pub page: Option<u64>,
    /// The number of expenses per page.
    pub page_size: Option<u64>,
}

/// Render the expenses page.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(query): Query<ExpensesQueryParams>,
) -> Response {
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

    let all_expenses = match get_expenses_since(None, &connection) {
        Ok(expenses) => expenses,
        Err(error) => return error.into_response(),
    };

    let audit_date = match latest_cash_audit(&connection) {
        Ok(audit_date) => audit_date,
        Err(error) => return error.into_response(),
    };

    // Balances only cover the current settlement period.
    let period_expenses = match audit_date {
        Some(date) => all_expenses
            .iter()
            .filter(|expense| expense.date > date)
            .cloned()
            .collect(),
        None => all_expenses.clone(),
    };

    let member_ids: Vec<DatabaseId> = members.iter().map(|member| member.id).collect();
    let balances = match compute_balances(&period_expenses, &member_ids) {
        Ok(balances) => balances,
        Err(error) => return error.into_response(),
    };
    let transfers = settlement_transfers(&balances);

    let member_names: HashMap<DatabaseId, String> = members
        .into_iter()
        .map(|member| (member.id, member.name))
        .collect();

    let page_size = query
        .page_size
        .unwrap_or(state.pagination_config.default_page_size)
        .max(1);
    let page_count = (all_expenses.len() as u64).div_ceil(page_size).max(1);
    let curr_page = query
        .page
        .unwrap_or(state.pagination_config.default_page)
        .clamp(1, page_count);

    let page_start = ((curr_page - 1) * page_size) as usize;
    let page_expenses = all_expenses
        .iter()
        .skip(page_start)
        .take(page_size as usize);

    let indicators =
        create_pagination_indicators(curr_page, page_count, state.pagination_config.max_pages);

    let balances: Vec<(DatabaseId, i64)> = balances.into_iter().collect();

    let content = html! {
        (NavBar::new(endpoints::EXPENSES_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Expenses" }

            (balances_view(&balances, &member_names))
            (settlement_view(&transfers, &member_names))

            div class="w-full max-w-4xl flex justify-between items-center mt-6 mb-2"
            {
                a href=(endpoints::NEW_EXPENSE_VIEW) class=(BUTTON_SECONDARY_STYLE)
                {
                    "New Expense"
                }

                button
                    hx-post=(endpoints::POST_AUDIT)
                    hx-confirm="Mark all balances as settled up today?"
                    hx-target-error="#alert-container"
                    class=(BUTTON_SECONDARY_STYLE)
                {
                    "Settle up"
                }
            }

            (expense_table(page_expenses, &member_names))

            @if page_count > 1 {
                (pagination_view(&indicators, page_size))
            }
        }
    };

    base("Expenses", &[], &content).into_response()
}

fn balances_view(balances: &[(DatabaseId, i64)], member_names: &HashMap<DatabaseId, String>) -> Markup {
    html! {
        div class="w-full max-w-4xl"
        {
            h2 class="text-lg font-semibold mb-2" { "Balances" }

            ul id="balances" class="flex flex-wrap gap-4"
            {
                @for (member_id, amount) in balances {
                    li class="flex flex-col items-center px-4 py-2 rounded-lg bg-white dark:bg-gray-800 shadow"
                    {
                        span class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            (member_name(*member_id, member_names))
                        }

                        @if *amount >= 0 {
                            span class="font-semibold text-green-600 dark:text-green-400"
                            {
                                (format_cents(*amount))
                            }
                        } @else {
                            span class="font-semibold text-red-600 dark:text-red-400"
                            {
                                (format_cents(*amount))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn settlement_view(transfers: &[Transfer], member_names: &HashMap<DatabaseId, String>) -> Markup {
    html! {
        div class="w-full max-w-4xl mt-4"
        {
            h2 class="text-lg font-semibold mb-2" { "Settle up with" }

            @if transfers.is_empty() {
                p id="settlement" class="text-gray-500 dark:text-gray-400" { "All settled up." }
            } @else {
                ul id="settlement" class="list-disc list-inside"
                {
                    @for transfer in transfers {
                        li
                        {
                            (member_name(transfer.from, member_names))
                            " pays "
                            (member_name(transfer.to, member_names))
                            " "
                            strong { (format_cents(transfer.amount_cents)) }
                        }
                    }
                }
            }
        }
    }
}

fn expense_table<'a>(
    expenses: impl Iterator<Item = &'a Expense>,
    member_names: &HashMap<DatabaseId, String>,
) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md sm:rounded-lg w-full max-w-4xl"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Paid by" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "For" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        (expense_row(expense, member_names))
                    }
                }
            }
        }
    }
}

fn expense_row(expense: &Expense, member_names: &HashMap<DatabaseId, String>) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id);
    let delete_endpoint = endpoints::format_endpoint(endpoints::DELETE_EXPENSE, expense.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (expense.date) }
            td class=(TABLE_CELL_STYLE) { (expense.description) }
            td class=(TABLE_CELL_STYLE) { (expense.category) }
            td class=(TABLE_CELL_STYLE) { (format_cents(expense.amount_cents)) }
            td class=(TABLE_CELL_STYLE) { (name_list(&expense.payers, member_names)) }
            td class=(TABLE_CELL_STYLE) { (name_list(&expense.beneficiaries, member_names)) }

            td class=(TABLE_CELL_STYLE)
            {
                a href=(edit_endpoint) class="underline text-blue-600 dark:text-blue-400 mr-2"
                {
                    "Edit"
                }

                button
                    hx-delete=(delete_endpoint)
                    hx-confirm=(format!("Delete \"{}\"?", expense.description))
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

fn pagination_view(indicators: &[PaginationIndicator], page_size: u64) -> Markup {
    // Links carry the page size so navigating does not reset it.
    let page_link = |page: u64, label: String, is_current: bool| {
        let style = if is_current {
            "px-3 py-1 rounded bg-blue-600 text-white"
        } else {
            "px-3 py-1 rounded hover:bg-gray-200 dark:hover:bg-gray-700"
        };

        html! {
            a href=(format!(
                "{}?page={page}&page_size={page_size}",
                endpoints::EXPENSES_VIEW
            )) class=(style)
            {
                (label)
            }
        }
    };

    html! {
        nav class="flex gap-1 mt-4" aria-label="Expense pages"
        {
            @for indicator in indicators {
                @match indicator {
                    PaginationIndicator::BackButton(page) => { (page_link(*page, "Back".to_owned(), false)) }
                    PaginationIndicator::NextButton(page) => { (page_link(*page, "Next".to_owned(), false)) }
                    PaginationIndicator::Page(page) => { (page_link(*page, page.to_string(), false)) }
                    PaginationIndicator::CurrPage(page) => { (page_link(*page, page.to_string(), true)) }
                    PaginationIndicator::Ellipsis => { span class="px-2" { "…" } }
                }
            }
        }
    }
}

fn member_name(member_id: DatabaseId, member_names: &HashMap<DatabaseId, String>) -> String {
    member_names
        .get(&member_id)
        .cloned()
        // Participants can outlive their membership.
        .unwrap_or_else(|| format!("Former member #{member_id}"))
}

fn name_list(member_ids: &[DatabaseId], member_names: &HashMap<DatabaseId, String>) -> String {
    member_ids
        .iter()
        .map(|&member_id| member_name(member_id, member_names))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod expenses_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        expense::{
            audit::create_cash_audit,
            core::{NewExpense, create_expense},
        },
        pagination::PaginationConfig,
        test_utils::{
            assert_valid_html, get_test_connection, insert_test_member, parse_html_document,
        },
    };

    use super::{ExpensesPageState, ExpensesQueryParams, get_expenses_page};

    fn query(page: Option<u64>) -> Query<ExpensesQueryParams> {
        Query(ExpensesQueryParams {
            page,
            page_size: None,
        })
    }

    fn new_expense(
        amount_cents: i64,
        date: time::Date,
        payers: Vec<i64>,
        beneficiaries: Vec<i64>,
    ) -> NewExpense {
        NewExpense {
            description: "Groceries run".to_owned(),
            amount_cents,
            category: "Groceries".to_owned(),
            date,
            created_by: payers[0],
            payers,
            beneficiaries,
        }
    }

    #[tokio::test]
    async fn renders_balances_and_settlement_preview() {
        let connection = get_test_connection();
        let ana = insert_test_member(&connection, "Ana");
        let ben = insert_test_member(&connection, "Ben");
        let cleo = insert_test_member(&connection, "Cleo");
        create_expense(
            &new_expense(3000, date!(2026 - 08 - 01), vec![ana], vec![ana, ben, cleo]),
            &connection,
        )
        .unwrap();
        let state = ExpensesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig::default(),
        };

        let response = get_expenses_page(State(state), query(None))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let balances = html
            .select(&Selector::parse("#balances").unwrap())
            .next()
            .expect("the page should have a balances list");
        let balance_text = balances.text().collect::<String>();
        assert!(balance_text.contains("€20.00"));
        assert!(balance_text.contains("-€10.00"));

        let settlement = html
            .select(&Selector::parse("#settlement").unwrap())
            .next()
            .expect("the page should have a settlement preview");
        let settlement_text = settlement.text().collect::<String>();
        assert!(settlement_text.contains("Ben pays Ana"));
        assert!(settlement_text.contains("Cleo pays Ana"));
    }

    #[tokio::test]
    async fn audit_resets_balances_but_keeps_history() {
        let connection = get_test_connection();
        let ana = insert_test_member(&connection, "Ana");
        let ben = insert_test_member(&connection, "Ben");
        create_expense(
            &new_expense(3000, date!(2026 - 07 - 01), vec![ana], vec![ana, ben]),
            &connection,
        )
        .unwrap();
        create_cash_audit(date!(2026 - 07 - 15), &connection).unwrap();
        let state = ExpensesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig::default(),
        };

        let response = get_expenses_page(State(state), query(None))
            .await
            .into_response();
        let html = parse_html_document(response).await;

        let settlement_text = html
            .select(&Selector::parse("#settlement").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert!(settlement_text.contains("All settled up."));

        // The settled expense stays visible in the table.
        let rows: Vec<_> = html.select(&Selector::parse("tbody tr").unwrap()).collect();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn paginates_expense_table() {
        let connection = get_test_connection();
        let ana = insert_test_member(&connection, "Ana");
        for day in 1..=7 {
            create_expense(
                &new_expense(
                    1000,
                    date!(2026 - 08 - 01).replace_day(day).unwrap(),
                    vec![ana],
                    vec![ana],
                ),
                &connection,
            )
            .unwrap();
        }
        let state = ExpensesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig {
                default_page: 1,
                default_page_size: 5,
                max_pages: 5,
            },
        };

        let first_page = get_expenses_page(State(state.clone()), query(None))
            .await
            .into_response();
        let first_html = parse_html_document(first_page).await;
        let first_rows: Vec<_> = first_html
            .select(&Selector::parse("tbody tr").unwrap())
            .collect();
        assert_eq!(first_rows.len(), 5);

        let second_page = get_expenses_page(State(state), query(Some(2)))
            .await
            .into_response();
        let second_html = parse_html_document(second_page).await;
        let second_rows: Vec<_> = second_html
            .select(&Selector::parse("tbody tr").unwrap())
            .collect();
        assert_eq!(second_rows.len(), 2);
    }

    #[tokio::test]
    async fn page_links_keep_the_requested_page_size() {
        let connection = get_test_connection();
        let ana = insert_test_member(&connection, "Ana");
        for day in 1..=5 {
            create_expense(
                &new_expense(
                    1000,
                    date!(2026 - 08 - 01).replace_day(day).unwrap(),
                    vec![ana],
                    vec![ana],
                ),
                &connection,
            )
            .unwrap();
        }
        let state = ExpensesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig::default(),
        };

        let response = get_expenses_page(
            State(state),
            Query(ExpensesQueryParams {
                page: Some(1),
                page_size: Some(2),
            }),
        )
        .await
        .into_response();
        let html = parse_html_document(response).await;

        let links: Vec<String> = html
            .select(&Selector::parse("nav[aria-label='Expense pages'] a").unwrap())
            .filter_map(|link| link.value().attr("href").map(str::to_owned))
            .collect();
        assert!(!links.is_empty());
        assert!(links.iter().all(|href| href.contains("page_size=2")));
        assert!(links.iter().any(|href| href.contains("page=2")));
    }
}
