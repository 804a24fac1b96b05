//! Deciding which students a targeted event is shown to.
//!
//! Targeting is permissive: each filter only applies when both
//! the event and the student have data for it, so missing profile data never
//! hides an event from a student.

use std::sync::OnceLock;

use regex::Regex;

/// The parts of a student's profile that events can target
#[derive(Clone, Copy, Debug)]
pub struct StudentProfile<'s> {
    pub usn: &'s str,
    pub semester: &'s str,
    pub department: &'s str,
}

/// An event's audience filters
#[derive(Clone, Copy, Debug)]
pub struct EventTargeting<'e> {
    /// When set, every other filter is ignored
    pub is_open_to_all: bool,
    pub start_usn: &'e str,
    pub end_usn: &'e str,
    pub semesters: &'e [String],
    pub departments: &'e [String],
}

impl EventTargeting<'_> {
    pub fn is_eligible(&self, student: &StudentProfile<'_>) -> bool {
        if self.is_open_to_all {
            return true;
        }

        usn_in_range(student.usn, self.start_usn, self.end_usn)
            && target_matches(self.semesters, student.semester)
            && target_matches(self.departments, student.department)
    }
}

/// A set filter passes when it is empty, when the student has no value for it,
/// or when the student's value is one of the targets.
fn target_matches(targets: &[String], value: &str) -> bool {
    targets.is_empty() || value.is_empty() || targets.iter().any(|target| target == value)
}

fn first_digit_run() -> &'static Regex {
    static FIRST_DIGIT_RUN: OnceLock<Regex> = OnceLock::new();
    FIRST_DIGIT_RUN.get_or_init(|| Regex::new("[0-9]+").expect("digit run pattern is valid"))
}

/// The first run of ASCII digits anywhere in `usn`, or 0 if it has none.
///
/// For a USN like `1MS21CS045` this is the leading `1`, not the roll number.
/// Runs too long for a `u64` saturate.
pub fn usn_number(usn: &str) -> u64 {
    first_digit_run()
        .find(usn)
        .map(|digits| digits.as_str().parse().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Whether `usn` falls within `start_usn..=end_usn`, comparing only the first digit run
/// of each. A range missing either bound places no constraint.
pub fn usn_in_range(usn: &str, start_usn: &str, end_usn: &str) -> bool {
    if start_usn.is_empty() || end_usn.is_empty() {
        return true;
    }

    let number = usn_number(usn);
    usn_number(start_usn) <= number && number <= usn_number(end_usn)
}
