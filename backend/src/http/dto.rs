//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};

// View DTOs already live in the crate-level api module.
pub use crate::api::{DepartmentTimetable, GpaReport, ResultsAnalysis, TimetableEntryView};
pub use crate::scheduler::GenerationReport;

use crate::models::{ClassroomId, CourseId, EntryId, Level, TimeSlot, UserId, Weekday};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Request body for timetable generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTimetableRequest {
    /// Department name; trimmed and lower-cased before lookup.
    pub department: String,
    /// Optional seed for a reproducible run.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Response for timetable generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTimetableResponse {
    pub department: String,
    pub entries_created: usize,
    pub message: String,
}

impl From<GenerationReport> for GenerateTimetableResponse {
    fn from(report: GenerationReport) -> Self {
        Self {
            message: format!(
                "Timetable generated successfully: {} entries for '{}'",
                report.entries_created, report.department
            ),
            department: report.department.to_string(),
            entries_created: report.entries_created,
        }
    }
}

/// Request body for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub levels: Vec<Level>,
}

/// Request body for creating a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub unit: u8,
    pub department: String,
    pub lecturer: UserId,
    #[serde(default)]
    pub levels: Vec<Level>,
}

/// Request body for creating a classroom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClassroomRequest {
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub location: Option<String>,
}

/// Request body for manually adding or moving a schedule entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRequest {
    pub course: CourseId,
    pub classroom: ClassroomId,
    pub day: Weekday,
    pub time: TimeSlot,
}

/// Response after deleting an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEntryResponse {
    pub entry_id: EntryId,
    pub deleted: bool,
}

/// Request body for recording a student result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResultRequest {
    pub student: UserId,
    pub course: CourseId,
    pub score: f64,
}

/// Query parameters for course listing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CourseQuery {
    #[serde(default)]
    pub department: Option<String>,
}

/// Query parameters for GPA lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpaQuery {
    pub department: String,
}
