//! Timetable records: the day/time-band grid and schedule entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::catalog::{ClassroomId, CourseId, LecturerId};
use crate::define_id_type;

define_id_type!(i64, EntryId);

/// Teaching weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All teaching weekdays, Monday first.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown weekday: {}", s))
    }
}

/// One two-hour teaching band, identified by its display label
/// (`"08:00 - 10:00"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSlot(String);

impl TimeSlot {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TimeSlot {
    fn from(label: &str) -> Self {
        TimeSlot::new(label)
    }
}

/// The weekly slot grid the generator places courses into.
///
/// The five weekday names and the four bands are the institutional defaults;
/// both axes are plain data so tests can shrink or reshape the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotGrid {
    pub days: Vec<Weekday>,
    pub times: Vec<TimeSlot>,
}

impl SlotGrid {
    pub fn new(days: Vec<Weekday>, times: Vec<TimeSlot>) -> Self {
        Self { days, times }
    }

    /// Number of (day, time) slots in the grid.
    pub fn capacity(&self) -> usize {
        self.days.len() * self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty() || self.times.is_empty()
    }
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self {
            days: Weekday::ALL.to_vec(),
            times: vec![
                TimeSlot::new("08:00 - 10:00"),
                TimeSlot::new("10:00 - 12:00"),
                TimeSlot::new("12:00 - 14:00"),
                TimeSlot::new("14:00 - 16:00"),
            ],
        }
    }
}

/// One (course, lecturer, classroom, day, time) assignment.
///
/// The lecturer is denormalized from the course so conflict queries never
/// need a join. Invariant: for a given (day, time) at most one entry per
/// lecturer and at most one per classroom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Assigned by the repository on insert.
    pub id: Option<EntryId>,
    pub course: CourseId,
    pub lecturer: LecturerId,
    pub classroom: ClassroomId,
    pub day: Weekday,
    pub time: TimeSlot,
    /// Set by the repository on insert.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ScheduleEntry {
    pub fn new(
        course: CourseId,
        lecturer: LecturerId,
        classroom: ClassroomId,
        day: Weekday,
        time: TimeSlot,
    ) -> Self {
        Self {
            id: None,
            course,
            lecturer,
            classroom,
            day,
            time,
            created_at: None,
        }
    }

    /// True when the two entries double-book a lecturer or a classroom.
    pub fn collides_with(&self, other: &ScheduleEntry) -> bool {
        self.day == other.day
            && self.time == other.time
            && (self.lecturer == other.lecturer || self.classroom == other.classroom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_five_by_four() {
        let grid = SlotGrid::default();
        assert_eq!(grid.days.len(), 5);
        assert_eq!(grid.times.len(), 4);
        assert_eq!(grid.capacity(), 20);
    }

    #[test]
    fn weekday_parses_case_insensitively() {
        assert_eq!("monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("FRIDAY".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert!("Sunday".parse::<Weekday>().is_err());
    }

    #[test]
    fn collision_requires_shared_slot() {
        let a = ScheduleEntry::new(
            CourseId::new(1),
            LecturerId::new(7),
            ClassroomId::new(2),
            Weekday::Monday,
            TimeSlot::new("08:00 - 10:00"),
        );

        // Same lecturer, same slot, different classroom: collision.
        let mut b = a.clone();
        b.course = CourseId::new(2);
        b.classroom = ClassroomId::new(3);
        assert!(a.collides_with(&b));

        // Same classroom, same slot, different lecturer: collision.
        let mut c = a.clone();
        c.course = CourseId::new(3);
        c.lecturer = LecturerId::new(8);
        assert!(a.collides_with(&c));

        // Same lecturer and classroom but a different band: fine.
        let mut d = a.clone();
        d.time = TimeSlot::new("10:00 - 12:00");
        assert!(!a.collides_with(&d));
    }
}
