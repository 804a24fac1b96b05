//! Point accounting for a student's total.
//!
//! A student's `total_points` is a cached, derived value: the sum of every
//! activity's points plus the points of every *approved* AICTE grade. Writes
//! adjust the cache by a delta, and full record loads recompute it from
//! scratch and repair it if it drifted.

use async_graphql::Result;

use crate::models::activity::Activity;
use crate::models::grade::{AicteGrade, GradeStatus};

/// Rejects point values the ledger can't account for.
pub fn ensure_valid_points(points: i64) -> Result<i64> {
    if points < 0 {
        Err("Points cannot be negative".into())
    } else {
        Ok(points)
    }
}

/// How much a grade worth `points` contributes to the total while in `status`.
fn contribution(points: i64, status: GradeStatus) -> i64 {
    match status {
        GradeStatus::Approved => points,
        GradeStatus::Pending | GradeStatus::Rejected => 0,
    }
}

/// The change to a student's total when a grade moves from `old` to `new`.
///
/// Only transitions into or out of `Approved` move points; repeating the
/// current status is always a no-op.
pub fn status_change_delta(points: i64, old: GradeStatus, new: GradeStatus) -> i64 {
    if old == new {
        return 0;
    }

    contribution(points, new) - contribution(points, old)
}

/// Activities have no review step, so they count in full immediately.
pub fn activity_added_delta(points: i64) -> i64 {
    points
}

/// The authoritative total: all activity points plus approved grade points.
pub fn recompute_total(activities: &[Activity], grades: &[AicteGrade]) -> i64 {
    let activity_points: i64 = activities.iter().map(|activity| activity.points).sum();
    let grade_points: i64 = grades
        .iter()
        .map(|grade| contribution(grade.points, grade.status))
        .sum();

    activity_points + grade_points
}

/// The outcome of checking a cached total against the recomputed one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub total: i64,
    pub stale: bool,
}

pub fn reconcile(cached: i64, activities: &[Activity], grades: &[AicteGrade]) -> Reconciliation {
    let total = recompute_total(activities, grades);

    Reconciliation {
        total,
        stale: total != cached,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mock::{mock_activity, mock_grade};
    use GradeStatus::*;

    #[test]
    fn approving_adds_the_grade_points() {
        assert_eq!(status_change_delta(10, Pending, Approved), 10);
        assert_eq!(status_change_delta(10, Rejected, Approved), 10);
    }

    #[test]
    fn leaving_approved_removes_the_grade_points() {
        assert_eq!(status_change_delta(10, Approved, Rejected), -10);
        assert_eq!(status_change_delta(10, Approved, Pending), -10);
    }

    #[test]
    fn transitions_away_from_approved_move_nothing() {
        assert_eq!(status_change_delta(10, Pending, Rejected), 0);
        assert_eq!(status_change_delta(10, Rejected, Pending), 0);
    }

    #[test]
    fn repeating_a_status_never_double_counts() {
        for status in [Pending, Approved, Rejected] {
            assert_eq!(status_change_delta(10, status, status), 0);
        }

        let total: i64 = [(Pending, Approved), (Approved, Approved)]
            .into_iter()
            .map(|(old, new)| status_change_delta(10, old, new))
            .sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn activities_count_immediately() {
        assert_eq!(activity_added_delta(7), 7);
    }

    #[test]
    fn recompute_ignores_unapproved_grades() {
        let activities = vec![mock_activity(1, 10), mock_activity(2, 5)];
        let grades = vec![
            mock_grade(1, 12, Approved),
            mock_grade(2, 8, Approved),
            mock_grade(3, 5, Pending),
            mock_grade(4, 40, Rejected),
        ];

        assert_eq!(recompute_total(&activities, &grades), 35);
    }

    #[test]
    fn reconcile_flags_stale_caches() {
        let activities = vec![mock_activity(1, 15)];
        let grades = vec![mock_grade(1, 20, Approved), mock_grade(2, 5, Pending)];

        assert_eq!(
            reconcile(999, &activities, &grades),
            Reconciliation {
                total: 35,
                stale: true
            }
        );
        assert_eq!(
            reconcile(35, &activities, &grades),
            Reconciliation {
                total: 35,
                stale: false
            }
        );
    }

    #[test]
    fn negative_points_are_rejected() {
        assert!(ensure_valid_points(-1).is_err());
        assert_eq!(ensure_valid_points(0).unwrap(), 0);
    }
}
