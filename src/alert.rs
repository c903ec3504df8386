//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as HTML fragments that htmx swaps out-of-band into the
//! `#alert-container` element on every page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A success or error message shown to the user without a page reload.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something worked. Shown with green styling.
    Success {
        /// A short headline, e.g. "Expense deleted".
        message: String,
        /// Optional extra context shown below the headline.
        details: String,
    },
    /// Something failed. Shown with red styling.
    Error {
        /// A short headline, e.g. "Could not delete expense".
        message: String,
        /// Optional extra context shown below the headline.
        details: String,
    },
}

impl Alert {
    /// Create a new success alert.
    pub fn success(message: &str, details: &str) -> Self {
        Self::Success {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as an out-of-band swap targeting `#alert-container`.
    pub fn into_markup(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Success { message, details } => (
                "block w-full p-4 mb-4 text-sm rounded-lg shadow-lg \
                text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "block w-full p-4 mb-4 text-sm rounded-lg shadow-lg \
                text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400",
                message,
                details,
            ),
        };

        html! {
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                div class=(container_style) role="alert"
                {
                    span class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }
            }
        }
    }

    /// Render the alert as a response with the given status code.
    pub fn into_response(self, status_code: StatusCode) -> Response {
        (status_code, self.into_markup()).into_response()
    }
}

#[cfg(test)]
mod alert_tests {
    use super::Alert;

    #[test]
    fn success_alert_contains_message_and_details() {
        let markup = Alert::success("Expense created", "The balances were updated.").into_markup();
        let html = markup.into_string();

        assert!(html.contains("Expense created"));
        assert!(html.contains("The balances were updated."));
        assert!(html.contains("alert-container"));
    }

    #[test]
    fn error_alert_omits_empty_details() {
        let markup = Alert::error("Could not delete expense", "").into_markup();
        let html = markup.into_string();

        assert!(html.contains("Could not delete expense"));
        assert!(!html.contains("<p"));
    }
}
