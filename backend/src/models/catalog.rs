//! Catalog records: departments, users, courses and classrooms.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::define_id_type;

define_id_type!(i64, UserId);
define_id_type!(i64, CourseId);
define_id_type!(i64, ClassroomId);

/// A lecturer is a [`User`] with [`Role::Lecturer`]; schedule entries and
/// courses reference lecturers through their user id.
pub type LecturerId = UserId;

/// Normalized department identifier.
///
/// Department names arrive from forms and imports with inconsistent casing
/// and stray whitespace; every comparison in the system goes through this
/// type, which trims and lower-cases on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Department(String);

impl Department {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Department {
    fn from(raw: &str) -> Self {
        Department::new(raw)
    }
}

// Deserialize through `new` so a department read from JSON or TOML is
// normalized exactly like one built in code.
impl<'de> Deserialize<'de> for Department {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Department::new(raw))
    }
}

/// Academic level a course or student belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "ND1")]
    Nd1,
    #[serde(rename = "ND2")]
    Nd2,
    #[serde(rename = "HND1")]
    Hnd1,
    #[serde(rename = "HND2")]
    Hnd2,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Nd1 => "ND1",
            Level::Nd2 => "ND2",
            Level::Hnd1 => "HND1",
            Level::Hnd2 => "HND2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ND1" => Some(Level::Nd1),
            "ND2" => Some(Level::Nd2),
            "HND1" => Some(Level::Hnd1),
            "HND2" => Some(Level::Hnd2),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Lecturer,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Lecturer => "lecturer",
            Role::Student => "student",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "lecturer" => Some(Role::Lecturer),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// A user account. Credentials are handled by the authentication service in
/// front of this backend and are not stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Assigned by the repository on insert.
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Required for lecturers and students.
    #[serde(default)]
    pub department: Option<Department>,
    /// Lecturer-only.
    #[serde(default)]
    pub specialization: Option<String>,
    /// Student-only.
    #[serde(default)]
    pub level: Option<Level>,
    /// Levels a lecturer teaches.
    #[serde(default)]
    pub levels: Vec<Level>,
}

impl User {
    /// Minimal lecturer record, used heavily by tests and seeds.
    pub fn lecturer(name: impl Into<String>, email: impl Into<String>, department: Department) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            role: Role::Lecturer,
            department: Some(department),
            specialization: None,
            level: None,
            levels: Vec::new(),
        }
    }

    /// Minimal student record.
    pub fn student(
        name: impl Into<String>,
        email: impl Into<String>,
        department: Department,
        level: Level,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            role: Role::Student,
            department: Some(department),
            specialization: None,
            level: Some(level),
            levels: Vec::new(),
        }
    }
}

/// A course offered by a department, taught by exactly one lecturer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Assigned by the repository on insert.
    pub id: Option<CourseId>,
    /// Unique course code, upper-cased on construction (`CSC101`).
    pub code: String,
    pub title: String,
    /// Credit units, 1..=6.
    pub unit: u8,
    pub department: Department,
    /// The assigned lecturer. The repository rejects the insert when the
    /// referenced user is missing or is not a lecturer.
    pub lecturer: LecturerId,
    /// Levels the course applies to.
    pub levels: Vec<Level>,
}

impl Course {
    pub fn new(
        code: impl AsRef<str>,
        title: impl Into<String>,
        unit: u8,
        department: Department,
        lecturer: LecturerId,
        levels: Vec<Level>,
    ) -> Self {
        Self {
            id: None,
            code: code.as_ref().trim().to_uppercase(),
            title: title.into(),
            unit,
            department,
            lecturer,
            levels,
        }
    }
}

/// A physical classroom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    /// Assigned by the repository on insert.
    pub id: Option<ClassroomId>,
    pub name: String,
    /// Seating capacity. Not consulted by the generator; see the scheduler
    /// module docs.
    pub capacity: u32,
    #[serde(default)]
    pub location: Option<String>,
}

impl Classroom {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            capacity,
            location: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_normalizes_case_and_whitespace() {
        let dept = Department::new("  Computer Science ");
        assert_eq!(dept.as_str(), "computer science");
        assert_eq!(dept, Department::new("COMPUTER SCIENCE"));
    }

    #[test]
    fn department_deserializes_normalized() {
        let dept: Department = serde_json::from_str("\" Mass Communication \"").unwrap();
        assert_eq!(dept.as_str(), "mass communication");
    }

    #[test]
    fn course_code_is_uppercased() {
        let dept = Department::new("computer science");
        let course = Course::new(" csc101 ", "Intro", 3, dept, UserId::new(1), vec![Level::Nd1]);
        assert_eq!(course.code, "CSC101");
    }

    #[test]
    fn level_round_trips_serde_names() {
        for level in [Level::Nd1, Level::Nd2, Level::Hnd1, Level::Hnd2] {
            assert_eq!(Level::parse(level.as_str()), Some(level));
        }
        assert_eq!(serde_json::to_string(&Level::Hnd1).unwrap(), "\"HND1\"");
    }
}
