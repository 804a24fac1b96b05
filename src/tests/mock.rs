use time::macros::datetime;

use crate::models::activity::Activity;
use crate::models::event::{Event, EventCategory};
use crate::models::grade::{AicteGrade, GradeStatus};
use crate::models::student::Student;

pub fn mock_student() -> Student {
    Student {
        id: 1,
        name: String::from("Asha Rao"),
        usn: String::from("1MS21CS045"),
        email: String::from("asha.rao@example.edu"),
        profile_picture: String::new(),
        phone: String::from("9876543210"),
        department: String::from("CSE"),
        year: String::from("3"),
        semester: String::from("5"),
        total_points: 0,
        pass_hash: String::from("not a real hash"),
    }
}

pub fn mock_event() -> Event {
    Event {
        id: 1,
        mentor_id: 7,
        title: String::from("Mock Hackathon"),
        description: String::from("Build something in a day"),
        event_date: datetime!(2026-11-02 09:30 UTC).into(),
        location: String::from("Seminar Hall 2"),
        category: EventCategory::Competition,
        is_active: true,
        is_open_to_all: true,
        start_usn: String::new(),
        end_usn: String::new(),
        target_semesters: vec![],
        target_departments: vec![],
        created_at: datetime!(2026-10-01 12:00 UTC).into(),
    }
}

pub fn mock_grade(id: i64, points: i64, status: GradeStatus) -> AicteGrade {
    AicteGrade {
        id,
        student_id: 1,
        activity_name: format!("Mock certification {}", id),
        points,
        proof_document: format!("/uploads/1700000000000-proof-{}.pdf", id),
        date_added: datetime!(2026-09-15 10:00 UTC).into(),
        status,
    }
}

pub fn mock_activity(id: i64, points: i64) -> Activity {
    Activity {
        id,
        student_id: 1,
        activity_name: format!("Mock activity {}", id),
        description: String::from("Volunteered at the blood donation camp"),
        points,
        date_time: datetime!(2026-09-20 16:00 UTC).into(),
    }
}
