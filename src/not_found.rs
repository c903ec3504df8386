//! The 404 Not Found page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// The fallback route handler for requests that match no route.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Get a 404 Not Found response with the full error page as its body.
pub fn get_404_not_found_response() -> Response {
    let page = error_view(
        "Not Found",
        "404",
        "Sorry, this page does not exist.",
        "Check the address for typos, or head back to the dashboard.",
    );

    (StatusCode::NOT_FOUND, page).into_response()
}
