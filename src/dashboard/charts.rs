//! Chart generation for the dashboard.
//!
//! Two ECharts visualizations: monthly effort points per member (stacked
//! bars) and the current net balance per member. Each chart is generated as
//! JSON configuration and rendered into an HTML container with a small
//! initialization script.

use std::collections::BTreeMap;

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title, VisualMap, VisualMapPiece},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction,
        Tooltip, Trigger,
    },
    series::bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::{format_month_labels, monthly_points_by_member, sorted_months},
    database_id::DatabaseId,
    html::HeadElement,
    member::Member,
    task::TaskCompletion,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts, with dark
/// mode support and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Monthly effort points per member, stacked by member.
pub(super) fn monthly_points_chart(completions: &[TaskCompletion], members: &[Member]) -> Chart {
    let months = sorted_months(completions);
    let labels = format_month_labels(&months);
    let series_data = monthly_points_by_member(completions, &months);

    let mut chart = Chart::new()
        .title(
            Title::new()
                .text("Effort points")
                .subtext("Per member and month"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .legend(Legend::new().left(180).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value));

    for (member_id, data) in series_data {
        chart = chart.series(
            bar::Bar::new()
                .name(member_name(member_id, members))
                .stack("Points")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(data),
        );
    }

    chart
}

/// The current net balance per member, red for debtors and green for
/// creditors.
pub(super) fn member_balances_chart(
    balances: &BTreeMap<DatabaseId, i64>,
    members: &[Member],
) -> Chart {
    let labels: Vec<String> = balances
        .keys()
        .map(|&member_id| member_name(member_id, members))
        .collect();
    let values: Vec<f64> = balances
        .values()
        .map(|&cents| cents as f64 / 100.0)
        .collect();

    Chart::new()
        .title(Title::new().text("Net balance").subtext("Current settlement period"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .visual_map(VisualMap::new().show(false).pieces(vec![
            VisualMapPiece::new().lte(-0.01).color("red"),
            VisualMapPiece::new().gte(0).color("green"),
        ]))
        .series(bar::Bar::new().name("Balance").data(values))
}

fn member_name(member_id: DatabaseId, members: &[Member]) -> String {
    members
        .iter()
        .find(|member| member.id == member_id)
        .map(|member| member.name.clone())
        .unwrap_or_else(|| format!("Former member #{member_id}"))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('de-DE', {
              style: 'currency',
              currency: 'EUR'
            });
            return (number || number === 0) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
