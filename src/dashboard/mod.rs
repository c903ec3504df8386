//! The dashboard: summary cards and household charts.

mod aggregation;
mod cards;
mod charts;
mod handlers;

pub use handlers::get_dashboard_page;
