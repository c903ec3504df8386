//! The page listing household members, their laziness factors, and effort totals.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    member::core::{Member, get_all_members},
    navigation::NavBar,
    task::{get_points_by_member, scaled_score},
};

/// The state needed for the members page.
#[derive(Debug, Clone)]
pub struct MembersPageState {
    /// The database connection for reading members and completion totals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for MembersPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the members page.
pub async fn get_members_page(State(state): State<MembersPageState>) -> Response {
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

    let points = match get_points_by_member(&connection) {
        Ok(points) => points,
        Err(error) => return error.into_response(),
    };

    let rows: Vec<MemberRow> = members
        .into_iter()
        .map(|member| {
            let raw_points = points.get(&member.id).copied().unwrap_or(0);
            let scaled = scaled_score(raw_points as f64, member.laziness);

            MemberRow {
                member,
                raw_points,
                scaled,
            }
        })
        .collect();

    members_view(&rows).into_response()
}

struct MemberRow {
    member: Member,
    raw_points: i64,
    scaled: Option<f64>,
}

fn members_view(rows: &[MemberRow]) -> Markup {
    let nav_bar = NavBar::new(endpoints::MEMBERS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Members" }

            (new_member_form())

            div class="relative overflow-x-auto shadow-md sm:rounded-lg w-full max-w-3xl mt-6"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Laziness" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Points" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Scaled score" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for row in rows {
                            (member_row_view(row))
                        }
                    }
                }
            }

            @if rows.is_empty() {
                p class="mt-4 text-gray-500 dark:text-gray-400"
                {
                    "No members yet. Add your housemates above."
                }
            }
        }
    };

    base("Members", &[], &content)
}

fn new_member_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_MEMBER)
            hx-target-error="#alert-container"
            class="w-full max-w-3xl flex items-end gap-4"
        {
            div class="flex-1"
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }
                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Name"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="laziness_factor" class=(FORM_LABEL_STYLE) { "Laziness (0-2)" }
                input
                    id="laziness_factor"
                    type="number"
                    name="laziness_factor"
                    value="1.0"
                    min="0"
                    max="2"
                    step="0.1"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Add member" }
        }
    }
}

fn member_row_view(row: &MemberRow) -> Markup {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_MEMBER, row.member.id);
    let delete_endpoint = endpoints::format_endpoint(endpoints::DELETE_MEMBER, row.member.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                input
                    form=(format!("edit-member-{}", row.member.id))
                    type="text"
                    name="name"
                    value=(row.member.name)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            td class=(TABLE_CELL_STYLE)
            {
                input
                    form=(format!("edit-member-{}", row.member.id))
                    type="number"
                    name="laziness_factor"
                    value=(row.member.laziness.value())
                    min="0"
                    max="2"
                    step="0.1"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            td class=(TABLE_CELL_STYLE) { (row.raw_points) }

            td class=(TABLE_CELL_STYLE)
            {
                @match row.scaled {
                    Some(scaled) => { (format!("{scaled:.1}")) }
                    // Laziness 0 excludes the member from fairness ranking.
                    None => { span class="italic" { "not ranked" } }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                form
                    id=(format!("edit-member-{}", row.member.id))
                    hx-put=(update_endpoint)
                    hx-target-error="#alert-container"
                    class="inline"
                {
                    button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Save" }
                }

                button
                    hx-delete=(delete_endpoint)
                    hx-confirm=(format!("Remove {} from the household?", row.member.name))
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

#[cfg(test)]
mod members_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::test_utils::{
        assert_valid_html, get_test_connection, insert_test_member, parse_html_document,
    };

    use super::{MembersPageState, get_members_page};

    #[tokio::test]
    async fn renders_member_rows() {
        let connection = get_test_connection();
        insert_test_member(&connection, "Ana");
        insert_test_member(&connection, "Ben");
        let state = MembersPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_members_page(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let rows: Vec<_> = html.select(&Selector::parse("tbody tr").unwrap()).collect();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn renders_empty_state() {
        let state = MembersPageState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = get_members_page(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        let text = html.html();
        assert!(text.contains("No members yet"));
    }
}
