//! Conflict detection over schedule entries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{ClassroomId, CourseId, LecturerId, ScheduleEntry, TimeSlot, Weekday};

/// Which shared resource two entries are fighting over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Lecturer,
    Classroom,
}

/// A double-booking between two schedule entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableConflict {
    pub kind: ConflictKind,
    pub day: Weekday,
    pub time: TimeSlot,
    /// Course of the entry that occupied the slot first (listing order).
    pub first_course: CourseId,
    /// Course of the entry that collided with it.
    pub second_course: CourseId,
}

/// Scan a set of entries for lecturer and classroom double-bookings.
///
/// Each colliding pair is reported once, keyed on the earlier entry in
/// listing order. An empty result means the set satisfies the timetable
/// invariant.
pub fn find_conflicts(entries: &[ScheduleEntry]) -> Vec<TimetableConflict> {
    let mut conflicts = Vec::new();
    let mut lecturer_slots: HashMap<(LecturerId, Weekday, &TimeSlot), &ScheduleEntry> =
        HashMap::new();
    let mut classroom_slots: HashMap<(ClassroomId, Weekday, &TimeSlot), &ScheduleEntry> =
        HashMap::new();

    for entry in entries {
        if let Some(first) = lecturer_slots.get(&(entry.lecturer, entry.day, &entry.time)) {
            conflicts.push(TimetableConflict {
                kind: ConflictKind::Lecturer,
                day: entry.day,
                time: entry.time.clone(),
                first_course: first.course,
                second_course: entry.course,
            });
        } else {
            lecturer_slots.insert((entry.lecturer, entry.day, &entry.time), entry);
        }

        if let Some(first) = classroom_slots.get(&(entry.classroom, entry.day, &entry.time)) {
            conflicts.push(TimetableConflict {
                kind: ConflictKind::Classroom,
                day: entry.day,
                time: entry.time.clone(),
                first_course: first.course,
                second_course: entry.course,
            });
        } else {
            classroom_slots.insert((entry.classroom, entry.day, &entry.time), entry);
        }
    }

    conflicts
}

/// True when no lecturer and no classroom is double-booked.
pub fn is_conflict_free(entries: &[ScheduleEntry]) -> bool {
    find_conflicts(entries).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(course: i64, lecturer: i64, classroom: i64, day: Weekday, time: &str) -> ScheduleEntry {
        ScheduleEntry::new(
            CourseId::new(course),
            LecturerId::new(lecturer),
            ClassroomId::new(classroom),
            day,
            TimeSlot::new(time),
        )
    }

    #[test]
    fn clean_set_has_no_conflicts() {
        let entries = vec![
            entry(1, 1, 1, Weekday::Monday, "08:00 - 10:00"),
            entry(2, 1, 1, Weekday::Monday, "10:00 - 12:00"),
            entry(3, 2, 2, Weekday::Monday, "08:00 - 10:00"),
        ];
        assert!(is_conflict_free(&entries));
    }

    #[test]
    fn lecturer_double_booking_is_reported() {
        let entries = vec![
            entry(1, 1, 1, Weekday::Monday, "08:00 - 10:00"),
            entry(2, 1, 2, Weekday::Monday, "08:00 - 10:00"),
        ];
        let conflicts = find_conflicts(&entries);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Lecturer);
        assert_eq!(conflicts[0].first_course, CourseId::new(1));
        assert_eq!(conflicts[0].second_course, CourseId::new(2));
    }

    #[test]
    fn classroom_double_booking_is_reported() {
        let entries = vec![
            entry(1, 1, 1, Weekday::Friday, "14:00 - 16:00"),
            entry(2, 2, 1, Weekday::Friday, "14:00 - 16:00"),
        ];
        let conflicts = find_conflicts(&entries);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Classroom);
    }

    #[test]
    fn shared_lecturer_and_room_yields_both_kinds() {
        let entries = vec![
            entry(1, 1, 1, Weekday::Tuesday, "08:00 - 10:00"),
            entry(2, 1, 1, Weekday::Tuesday, "08:00 - 10:00"),
        ];
        let conflicts = find_conflicts(&entries);
        assert_eq!(conflicts.len(), 2);
    }
}
