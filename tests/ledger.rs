use aicte_portal::models::activity::Activity;
use aicte_portal::models::grade::{AicteGrade, GradeStatus};
use aicte_portal::models::points::{reconcile, recompute_total, status_change_delta};
use time::macros::datetime;

fn grade(points: i64, status: GradeStatus) -> AicteGrade {
    AicteGrade {
        id: 1,
        student_id: 1,
        activity_name: String::from("NPTEL course"),
        points,
        proof_document: String::from("/uploads/1-certificate.pdf"),
        date_added: datetime!(2026-09-01 10:00 UTC).into(),
        status,
    }
}

fn activity(points: i64) -> Activity {
    Activity {
        id: 1,
        student_id: 1,
        activity_name: String::from("Tree plantation drive"),
        description: String::from("Planted saplings around campus"),
        points,
        date_time: datetime!(2026-09-02 10:00 UTC).into(),
    }
}

#[test]
fn grade_transitions_move_points_in_and_out_of_approved() {
    use GradeStatus::*;

    assert_eq!(status_change_delta(10, Pending, Approved), 10);
    assert_eq!(status_change_delta(10, Approved, Rejected), -10);
    assert_eq!(status_change_delta(10, Pending, Rejected), 0);
    assert_eq!(status_change_delta(10, Approved, Approved), 0);
}

#[test]
fn replaying_a_review_history_matches_the_recomputed_total() {
    use GradeStatus::*;

    let history = [Pending, Approved, Approved, Rejected, Approved, Pending, Approved];
    let cached: i64 = history
        .windows(2)
        .map(|pair| status_change_delta(12, pair[0], pair[1]))
        .sum();

    assert_eq!(cached, recompute_total(&[], &[grade(12, Approved)]));
}

#[test]
fn full_record_recompute_ignores_the_stale_cache() {
    let activities = vec![activity(10), activity(5)];
    let grades = vec![
        grade(15, GradeStatus::Approved),
        grade(5, GradeStatus::Approved),
        grade(5, GradeStatus::Pending),
    ];

    let reconciliation = reconcile(-3, &activities, &grades);
    assert_eq!(reconciliation.total, 35);
    assert!(reconciliation.stale);
}
