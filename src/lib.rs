//! Domora is a web app for running a shared household: recurring chores with
//! rotation and fairness scoring, shared expenses with settlement previews,
//! and a communal shopping list.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod html;
mod internal_server_error;
mod logging;
mod member;
mod navigation;
mod not_found;
mod pagination;
mod routing;
mod shopping;
mod task;
#[cfg(test)]
mod test_utils;
mod timezone;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use pagination::PaginationConfig;
pub use routing::build_router;

use crate::{
    alert::Alert,
    internal_server_error::{InternalServerErrorPage, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty payer or beneficiary set was passed to the split/balance math.
    ///
    /// An expense amount cannot be divided across zero members, so callers
    /// must validate participant sets before asking for a split.
    #[error("cannot split an amount across an empty member set")]
    InvalidSplitInput,

    /// The fairness scorer was asked to rank an empty rotation.
    #[error("the task rotation has no members")]
    EmptyRotation,

    /// A laziness factor outside the range [0, 2] was provided.
    ///
    /// Laziness scales a member's displayed effort totals; 1.0 is neutral and
    /// 0 excludes the member from fairness comparisons entirely.
    #[error("{0} is not a valid laziness factor, must be between 0 and 2")]
    InvalidLazinessFactor(f64),

    /// An empty string was used as a member name.
    #[error("Member name cannot be empty")]
    EmptyMemberName,

    /// The member name already exists in the database.
    #[error("a member with that name already exists")]
    DuplicateMemberName,

    /// An empty string was used as a task title.
    #[error("Task title cannot be empty")]
    EmptyTaskTitle,

    /// A task frequency of less than one day was provided.
    #[error("{0} is not a valid task frequency, must be at least one day")]
    InvalidFrequency(i64),

    /// An empty string was used as a shopping list item name.
    #[error("Item name cannot be empty")]
    EmptyItemName,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Tried to update a task that does not exist
    #[error("tried to update a task that is not in the database")]
    UpdateMissingTask,

    /// Tried to delete a task that does not exist
    #[error("tried to delete a task that is not in the database")]
    DeleteMissingTask,

    /// Tried to update a member that does not exist
    #[error("tried to update a member that is not in the database")]
    UpdateMissingMember,

    /// Tried to delete a member that does not exist
    #[error("tried to delete a member that is not in the database")]
    DeleteMissingMember,

    /// Tried to delete a shopping list item that does not exist
    #[error("tried to delete a shopping item that is not in the database")]
    DeleteMissingItem,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("member.name") =>
            {
                Error::DuplicateMemberName
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(InternalServerErrorPage::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidSplitInput => Alert::error(
                "Invalid expense split",
                "Pick at least one payer and one beneficiary for the expense.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::EmptyRotation => Alert::error(
                "Empty rotation",
                "The task needs at least one member in its rotation.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::InvalidLazinessFactor(factor) => Alert::error(
                "Invalid laziness factor",
                &format!("{factor} is not a valid laziness factor. Use a value between 0 and 2."),
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::EmptyMemberName => Alert::error(
                "Invalid member name",
                "The member name cannot be empty.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::EmptyTaskTitle => Alert::error(
                "Invalid task title",
                "The task title cannot be empty.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::EmptyItemName => Alert::error(
                "Invalid item name",
                "The shopping item name cannot be empty.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::DuplicateMemberName => Alert::error(
                "Duplicate member name",
                "A member with that name already exists. \
                Choose a different name, or edit or delete the existing member.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::InvalidFrequency(days) => Alert::error(
                "Invalid frequency",
                &format!("{days} days is not a valid task frequency. Use at least one day."),
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::UpdateMissingExpense => {
                Alert::error("Could not update expense", "The expense could not be found.")
                    .into_response(StatusCode::NOT_FOUND)
            }
            Error::DeleteMissingExpense => Alert::error(
                "Could not delete expense",
                "The expense could not be found. \
                Try refreshing the page to see if the expense has already been deleted.",
            )
            .into_response(StatusCode::NOT_FOUND),
            Error::UpdateMissingTask => {
                Alert::error("Could not update task", "The task could not be found.")
                    .into_response(StatusCode::NOT_FOUND)
            }
            Error::DeleteMissingTask => Alert::error(
                "Could not delete task",
                "The task could not be found. \
                Try refreshing the page to see if the task has already been deleted.",
            )
            .into_response(StatusCode::NOT_FOUND),
            Error::UpdateMissingMember => {
                Alert::error("Could not update member", "The member could not be found.")
                    .into_response(StatusCode::NOT_FOUND)
            }
            Error::DeleteMissingMember => Alert::error(
                "Could not delete member",
                "The member could not be found. \
                Try refreshing the page to see if the member has already been deleted.",
            )
            .into_response(StatusCode::NOT_FOUND),
            Error::NotFound => Alert::error(
                "Not found",
                "The requested item could not be found. Try refreshing the page.",
            )
            .into_response(StatusCode::NOT_FOUND),
            Error::DeleteMissingItem => Alert::error(
                "Could not delete item",
                "The item could not be found. \
                Try refreshing the page to see if the item has already been deleted.",
            )
            .into_response(StatusCode::NOT_FOUND),
            _ => Alert::error(
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            )
            .into_response(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
