//! The shared shopping list page.

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
    html::{
        BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE, FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
    },
    member::{Member, get_all_members},
    navigation::NavBar,
    shopping::core::{ShoppingItem, get_all_items},
};

/// The state needed for the shopping list page.
#[derive(Debug, Clone)]
pub struct ShoppingPageState {
    /// The database connection for reading the list and members.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ShoppingPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the shopping list page.
pub async fn get_shopping_page(State(state): State<ShoppingPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let items = match get_all_items(&connection) {
        Ok(items) => items,
        Err(error) => return error.into_response(),
    };

    let members = match get_all_members(&connection) {
        Ok(members) => members,
        Err(error) => return error.into_response(),
    };

    shopping_view(&items, &members).into_response()
}

fn shopping_view(items: &[ShoppingItem], members: &[Member]) -> Markup {
    let member_names: HashMap<DatabaseId, &str> = members
        .iter()
        .map(|member| (member.id, member.name.as_str()))
        .collect();

    let content = html! {
        (NavBar::new(endpoints::SHOPPING_VIEW).into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Shopping List" }

            (new_item_form(members))

            ul id="shopping-list" class="w-full max-w-2xl mt-6 space-y-2"
            {
                @for item in items {
                    (item_view(item, &member_names))
                }
            }

            @if items.is_empty() {
                p class="mt-4 text-gray-500 dark:text-gray-400"
                {
                    "The list is empty. Add the first item above."
                }
            }
        }
    };

    base("Shopping List", &[], &content)
}

fn new_item_form(members: &[Member]) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_SHOPPING_ITEM)
            hx-target-error="#alert-container"
            class="w-full max-w-2xl flex items-end gap-4"
        {
            div class="flex-1"
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Item" }
                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Milk"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex-1"
            {
                label for="note" class=(FORM_LABEL_STYLE) { "Note" }
                input
                    id="note"
                    type="text"
                    name="note"
                    placeholder="brand, amount, …"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="created_by" class=(FORM_LABEL_STYLE) { "Added by" }
                select id="created_by" name="created_by" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for member in members {
                        option value=(member.id) { (member.name) }
                    }
                }
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Add" }
        }
    }
}

fn item_view(item: &ShoppingItem, member_names: &HashMap<DatabaseId, &str>) -> Markup {
    let toggle_endpoint = endpoints::format_endpoint(endpoints::TOGGLE_SHOPPING_ITEM, item.id);
    let delete_endpoint = endpoints::format_endpoint(endpoints::DELETE_SHOPPING_ITEM, item.id);
    let added_by = member_names
        .get(&item.created_by)
        .copied()
        .unwrap_or("Former member");

    html! {
        li class="flex items-center gap-3 p-3 rounded-lg bg-white dark:bg-gray-800 shadow"
        {
            input
                type="checkbox"
                checked[item.checked]
                hx-post=(toggle_endpoint)
                hx-target-error="#alert-container"
                class=(FORM_CHECKBOX_STYLE);

            div class="flex-1"
            {
                @if item.checked {
                    p class="line-through text-gray-400" { (item.name) }
                } @else {
                    p class="font-medium text-gray-900 dark:text-white" { (item.name) }
                }

                @if !item.note.is_empty() {
                    p class="text-xs text-gray-500 dark:text-gray-400" { (item.note) }
                }
            }

            span class="text-xs text-gray-400" { (added_by) }

            button
                hx-delete=(delete_endpoint)
                hx-target="closest li"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                class=(BUTTON_DELETE_STYLE)
            {
                "Delete"
            }
        }
    }
}

#[cfg(test)]
mod shopping_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        shopping::core::{create_item, toggle_item},
        test_utils::{
            assert_valid_html, get_test_connection, insert_test_member, parse_html_document,
        },
    };

    use super::{ShoppingPageState, get_shopping_page};

    #[tokio::test]
    async fn renders_items_with_checked_state() {
        let connection = get_test_connection();
        let ana = insert_test_member(&connection, "Ana");
        create_item("Milk", "oat", ana, date!(2026 - 08 - 10), &connection).unwrap();
        let bought = create_item("Bread", "", ana, date!(2026 - 08 - 10), &connection).unwrap();
        toggle_item(bought.id, &connection).unwrap();
        let state = ShoppingPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_shopping_page(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let items: Vec<_> = html
            .select(&Selector::parse("#shopping-list li").unwrap())
            .collect();
        assert_eq!(items.len(), 2);

        let checked: Vec<_> = html
            .select(&Selector::parse("li input[checked]").unwrap())
            .collect();
        assert_eq!(checked.len(), 1);
    }

    #[tokio::test]
    async fn renders_empty_state() {
        let state = ShoppingPageState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = get_shopping_page(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert!(html.html().contains("The list is empty"));
    }
}
