//! The fairness scorer: laziness-scaled effort ranking and next-assignee
//! selection.
//!
//! All functions here are pure computations over in-memory data. They never
//! touch the database, so the endpoints that call them stay thin.

use std::collections::BTreeMap;

use crate::{
    Error,
    database_id::DatabaseId,
    member::{LazinessFactor, Member},
    task::core::{FairnessMode, Task},
};

/// A member's effort total scaled by their laziness factor.
///
/// Returns `None` when the laziness factor is zero: such members opted out of
/// fairness ranking entirely.
pub fn scaled_score(raw_points: f64, laziness: LazinessFactor) -> Option<f64> {
    if laziness.value() == 0.0 {
        return None;
    }

    Some(raw_points / laziness.value())
}

/// The expected effort points `member_id` accrues from `tasks` over the next
/// `horizon_days`.
///
/// Each task contributes its effort split evenly across its rotation, once
/// per expected occurrence within the horizon. This treats every rotation
/// turn as equally likely rather than simulating turn order.
pub fn projected_accrual(member_id: DatabaseId, horizon_days: i64, tasks: &[Task]) -> f64 {
    tasks
        .iter()
        .filter(|task| task.active && task.rotation.contains(&member_id))
        .map(|task| {
            let occurrences = (horizon_days / task.frequency_days) as f64;

            occurrences * task.effort as f64 / task.rotation.len() as f64
        })
        .sum()
}

/// Pick the member who takes over `task`'s next instance.
///
/// With `prioritize_low_points` off this is a plain modular advance through
/// the rotation. With it on, the rotation member with the lowest scaled score
/// wins; ties go to the earlier rotation position. In
/// [FairnessMode::Projection] each candidate's score also counts their
/// expected accrual from `other_tasks` over this task's own frequency.
///
/// Members with laziness zero (or no member row) are excluded from ranking.
/// If that excludes everyone, selection falls back to the rotation advance.
///
/// # Errors
/// Returns [Error::EmptyRotation] if the task has no rotation members.
pub fn next_assignee(
    task: &Task,
    members: &[Member],
    points_by_member: &BTreeMap<DatabaseId, i64>,
    other_tasks: &[Task],
) -> Result<DatabaseId, Error> {
    if task.rotation.is_empty() {
        return Err(Error::EmptyRotation);
    }

    if !task.prioritize_low_points {
        return Ok(rotation_advance(task));
    }

    let laziness_of = |member_id: DatabaseId| {
        members
            .iter()
            .find(|member| member.id == member_id)
            .map(|member| member.laziness)
    };

    let others: Vec<Task> = other_tasks
        .iter()
        .filter(|other| other.id != task.id)
        .cloned()
        .collect();

    let mut best: Option<(f64, DatabaseId)> = None;

    for &candidate in &task.rotation {
        let Some(laziness) = laziness_of(candidate) else {
            continue;
        };

        let mut raw = points_by_member.get(&candidate).copied().unwrap_or(0) as f64;

        if task.fairness_mode == FairnessMode::Projection {
            raw += projected_accrual(candidate, task.frequency_days, &others);
        }

        let Some(score) = scaled_score(raw, laziness) else {
            continue;
        };

        // Strict less-than keeps the earliest rotation position on ties.
        match best {
            Some((best_score, _)) if score >= best_score => {}
            _ => best = Some((score, candidate)),
        }
    }

    match best {
        Some((_, member_id)) => Ok(member_id),
        // Everyone opted out of ranking, so take turns instead.
        None => Ok(rotation_advance(task)),
    }
}

fn rotation_advance(task: &Task) -> DatabaseId {
    match task
        .rotation
        .iter()
        .position(|&member_id| member_id == task.assignee_id)
    {
        Some(position) => task.rotation[(position + 1) % task.rotation.len()],
        // The assignee left the rotation, start over from the front.
        None => task.rotation[0],
    }
}

#[cfg(test)]
mod scaled_score_tests {
    use crate::member::LazinessFactor;

    use super::scaled_score;

    #[test]
    fn neutral_laziness_returns_raw_points() {
        assert_eq!(scaled_score(10.0, LazinessFactor::new_unchecked(1.0)), Some(10.0));
    }

    #[test]
    fn zero_laziness_excludes_member() {
        assert_eq!(scaled_score(10.0, LazinessFactor::new_unchecked(0.0)), None);
    }

    #[test]
    fn raising_laziness_never_raises_score() {
        let raw = 10.0;
        let factors = [0.5, 1.0, 1.5, 2.0];

        for pair in factors.windows(2) {
            let lower = scaled_score(raw, LazinessFactor::new_unchecked(pair[0])).unwrap();
            let higher = scaled_score(raw, LazinessFactor::new_unchecked(pair[1])).unwrap();

            assert!(higher <= lower);
        }
    }
}

#[cfg(test)]
mod next_assignee_tests {
    use std::collections::BTreeMap;

    use time::macros::date;

    use crate::{
        Error,
        member::{LazinessFactor, Member},
        task::core::{FairnessMode, Task},
    };

    use super::next_assignee;

    fn task(rotation: Vec<i64>, assignee_id: i64) -> Task {
        Task {
            id: 1,
            title: "Clean the kitchen".to_owned(),
            frequency_days: 7,
            effort: 5,
            assignee_id,
            due_date: date!(2026 - 08 - 10),
            active: true,
            prioritize_low_points: true,
            fairness_mode: FairnessMode::Actual,
            rotation,
        }
    }

    fn member(id: i64, laziness: f64) -> Member {
        Member {
            id,
            name: format!("Member {id}"),
            laziness: LazinessFactor::new_unchecked(laziness),
        }
    }

    #[test]
    fn picks_member_with_lowest_points() {
        // Three members, all neutral laziness, points {A: 10, B: 4, C: 7}.
        let members = [member(1, 1.0), member(2, 1.0), member(3, 1.0)];
        let points = BTreeMap::from([(1, 10), (2, 4), (3, 7)]);

        let got = next_assignee(&task(vec![1, 2, 3], 1), &members, &points, &[]).unwrap();

        assert_eq!(got, 2);
    }

    #[test]
    fn laziness_shifts_the_ranking() {
        // B has fewer raw points, but at laziness 0.5 their scaled score
        // (4 / 0.5 = 8) is above C's (7 / 1.0).
        let members = [member(1, 1.0), member(2, 0.5), member(3, 1.0)];
        let points = BTreeMap::from([(1, 10), (2, 4), (3, 7)]);

        let got = next_assignee(&task(vec![1, 2, 3], 1), &members, &points, &[]).unwrap();

        assert_eq!(got, 3);
    }

    #[test]
    fn ties_break_by_rotation_order() {
        let members = [member(1, 1.0), member(2, 1.0), member(3, 1.0)];
        let points = BTreeMap::from([(1, 5), (2, 5), (3, 5)]);

        let got = next_assignee(&task(vec![3, 1, 2], 1), &members, &points, &[]).unwrap();

        assert_eq!(got, 3);
    }

    #[test]
    fn is_deterministic() {
        let members = [member(1, 1.0), member(2, 1.0)];
        let points = BTreeMap::from([(1, 3), (2, 3)]);
        let the_task = task(vec![1, 2], 1);

        let first = next_assignee(&the_task, &members, &points, &[]).unwrap();
        let second = next_assignee(&the_task, &members, &points, &[]).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn zero_laziness_member_is_never_picked() {
        let members = [member(1, 1.0), member(2, 0.0), member(3, 1.0)];
        let points = BTreeMap::from([(1, 10), (2, 0), (3, 7)]);

        let got = next_assignee(&task(vec![1, 2, 3], 1), &members, &points, &[]).unwrap();

        assert_eq!(got, 3);
    }

    #[test]
    fn all_excluded_falls_back_to_rotation_advance() {
        let members = [member(1, 0.0), member(2, 0.0)];
        let points = BTreeMap::new();

        let got = next_assignee(&task(vec![1, 2], 1), &members, &points, &[]).unwrap();

        assert_eq!(got, 2);
    }

    #[test]
    fn rotation_advance_wraps_around() {
        let members = [member(1, 1.0), member(2, 1.0), member(3, 1.0)];
        let mut plain = task(vec![1, 2, 3], 3);
        plain.prioritize_low_points = false;

        let got = next_assignee(&plain, &members, &BTreeMap::new(), &[]).unwrap();

        assert_eq!(got, 1);
    }

    #[test]
    fn rotation_advance_restarts_when_assignee_left() {
        let members = [member(2, 1.0), member(3, 1.0)];
        let mut plain = task(vec![2, 3], 1);
        plain.prioritize_low_points = false;

        let got = next_assignee(&plain, &members, &BTreeMap::new(), &[]).unwrap();

        assert_eq!(got, 2);
    }

    #[test]
    fn empty_rotation_is_an_error() {
        let got = next_assignee(&task(vec![], 1), &[], &BTreeMap::new(), &[]);

        assert_eq!(got, Err(Error::EmptyRotation));
    }

    #[test]
    fn projection_counts_other_task_load() {
        // A and B are tied on raw points, but A is also in a busy side task:
        // floor(7 / 3) * 6 / 2 = 6 extra projected points, so B wins.
        let members = [member(1, 1.0), member(2, 1.0)];
        let points = BTreeMap::from([(1, 5), (2, 5)]);

        let mut side_task = task(vec![1, 9], 1);
        side_task.id = 2;
        side_task.frequency_days = 3;
        side_task.effort = 6;

        let mut projected = task(vec![1, 2], 1);
        projected.fairness_mode = FairnessMode::Projection;

        let got = next_assignee(&projected, &members, &points, &[side_task.clone()]).unwrap();
        assert_eq!(got, 2);

        // In actual mode the side task is invisible and the tie goes to A.
        let actual = task(vec![1, 2], 1);
        let got = next_assignee(&actual, &members, &points, &[side_task]).unwrap();
        assert_eq!(got, 1);
    }

    #[test]
    fn projection_ignores_paused_tasks() {
        let members = [member(1, 1.0), member(2, 1.0)];
        let points = BTreeMap::from([(1, 5), (2, 5)]);

        let mut paused = task(vec![1, 9], 1);
        paused.id = 2;
        paused.active = false;
        paused.effort = 100;

        let mut projected = task(vec![1, 2], 1);
        projected.fairness_mode = FairnessMode::Projection;

        let got = next_assignee(&projected, &members, &points, &[paused]).unwrap();

        // The paused task contributes nothing, so the tie goes to A.
        assert_eq!(got, 1);
    }
}
