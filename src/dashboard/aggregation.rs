//! Month bucketing of the completion ledger for the dashboard charts.

use std::collections::BTreeMap;

use time::Month;

use crate::{database_id::DatabaseId, task::TaskCompletion};

/// A calendar month as `(year, month)`.
pub(super) type YearMonth = (i32, u8);

/// All months that appear in `completions`, ascending.
pub(super) fn sorted_months(completions: &[TaskCompletion]) -> Vec<YearMonth> {
    let mut months: Vec<YearMonth> = completions
        .iter()
        .map(|completion| {
            (
                completion.completed_on.year(),
                completion.completed_on.month() as u8,
            )
        })
        .collect();

    months.sort_unstable();
    months.dedup();

    months
}

/// Format months as chart axis labels, e.g. "August 2026".
pub(super) fn format_month_labels(months: &[YearMonth]) -> Vec<String> {
    months
        .iter()
        .map(|&(year, month)| match Month::try_from(month) {
            Ok(month) => format!("{month} {year}"),
            Err(_) => format!("{month}/{year}"),
        })
        .collect()
}

/// Each member's effort points per month, aligned with `months`.
///
/// Members with no points at all are omitted; months without activity for a
/// member hold a zero so every series has the same length.
pub(super) fn monthly_points_by_member(
    completions: &[TaskCompletion],
    months: &[YearMonth],
) -> BTreeMap<DatabaseId, Vec<i64>> {
    let mut series: BTreeMap<DatabaseId, Vec<i64>> = BTreeMap::new();

    for completion in completions {
        if completion.points == 0 {
            continue;
        }

        let month = (
            completion.completed_on.year(),
            completion.completed_on.month() as u8,
        );
        let Some(index) = months.iter().position(|&m| m == month) else {
            continue;
        };

        series
            .entry(completion.member_id)
            .or_insert_with(|| vec![0; months.len()])[index] += completion.points;
    }

    series
}

#[cfg(test)]
mod aggregation_tests {
    use time::macros::date;

    use crate::task::{CompletionEvent, TaskCompletion};

    use super::{format_month_labels, monthly_points_by_member, sorted_months};

    fn completion(member_id: i64, points: i64, completed_on: time::Date) -> TaskCompletion {
        TaskCompletion {
            id: 0,
            task_title: "Clean the kitchen".to_owned(),
            member_id,
            points,
            delay_days: 0,
            event: CompletionEvent::Complete,
            completed_on,
        }
    }

    #[test]
    fn months_are_sorted_and_unique() {
        let completions = [
            completion(1, 5, date!(2026 - 08 - 10)),
            completion(2, 5, date!(2026 - 06 - 01)),
            completion(1, 3, date!(2026 - 08 - 20)),
        ];

        let months = sorted_months(&completions);

        assert_eq!(months, vec![(2026, 6), (2026, 8)]);
    }

    #[test]
    fn labels_use_month_names() {
        let labels = format_month_labels(&[(2026, 6), (2026, 8)]);

        assert_eq!(labels, vec!["June 2026", "August 2026"]);
    }

    #[test]
    fn points_align_with_months() {
        let completions = [
            completion(1, 5, date!(2026 - 06 - 10)),
            completion(1, 3, date!(2026 - 08 - 20)),
            completion(2, 4, date!(2026 - 08 - 05)),
        ];
        let months = sorted_months(&completions);

        let series = monthly_points_by_member(&completions, &months);

        assert_eq!(series[&1], vec![5, 3]);
        assert_eq!(series[&2], vec![0, 4]);
    }

    #[test]
    fn zero_point_events_are_ignored() {
        let completions = [completion(1, 0, date!(2026 - 08 - 10))];
        let months = sorted_months(&completions);

        assert!(monthly_points_by_member(&completions, &months).is_empty());
    }
}
