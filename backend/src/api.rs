//! Data Transfer Objects shared by the service layer and the HTTP API.
//!
//! These are resolved, display-oriented shapes: ids are joined out to names
//! so a frontend can render them without further lookups.

use serde::{Deserialize, Serialize};

use crate::models::{Department, EntryId, Grade, Level, TimeSlot, Weekday};

/// One resolved timetable row for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableEntryView {
    pub entry_id: EntryId,
    pub course_code: String,
    pub course_title: String,
    pub unit: u8,
    pub lecturer_name: String,
    pub classroom_name: String,
    pub day: Weekday,
    pub time: TimeSlot,
}

/// A department's full timetable plus the grid axes it is laid out on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentTimetable {
    pub department: Department,
    pub days: Vec<Weekday>,
    pub times: Vec<TimeSlot>,
    pub entries: Vec<TimetableEntryView>,
}

impl DepartmentTimetable {
    /// Entries scheduled at one (day, time) cell, in listing order.
    pub fn cell(&self, day: Weekday, time: &TimeSlot) -> Vec<&TimetableEntryView> {
        self.entries
            .iter()
            .filter(|e| e.day == day && &e.time == time)
            .collect()
    }
}

/// One student's result in one course, resolved for reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    pub student_name: String,
    pub student_level: Option<Level>,
    pub course_code: String,
    pub course_title: String,
    pub score: f64,
    pub grade: Grade,
}

/// Pass/fail analysis of a department's results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsAnalysis {
    pub department: Department,
    pub pass_mark: f64,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub passed_rows: Vec<ResultRow>,
    pub failed_rows: Vec<ResultRow>,
}

/// Unit-weighted GPA for one student within one department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpaReport {
    pub student_name: String,
    pub department: Department,
    /// 0.0 when the student has no graded units in the department.
    pub gpa: f64,
    pub total_units: u32,
}
