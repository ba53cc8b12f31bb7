//! Row types mapping the Diesel schema onto the domain records.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{classrooms, courses, results, schedule_entries, users};
use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::{
    Classroom, ClassroomId, Course, CourseId, Department, EntryId, Grade, Level, ResultId,
    ResultRecord, Role, ScheduleEntry, TimeSlot, User, UserId, Weekday,
};

fn parse_levels(raw: Vec<String>) -> RepositoryResult<Vec<Level>> {
    raw.iter()
        .map(|s| {
            Level::parse(s)
                .ok_or_else(|| RepositoryError::InternalError(format!("Corrupt level value: {}", s)))
        })
        .collect()
}

fn levels_to_strings(levels: &[Level]) -> Vec<String> {
    levels.iter().map(|l| l.as_str().to_string()).collect()
}

#[derive(Debug, Queryable)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: Option<String>,
    pub specialization: Option<String>,
    pub level: Option<String>,
    pub levels: Vec<String>,
}

impl UserRow {
    pub fn into_domain(self) -> RepositoryResult<User> {
        let role = Role::parse(&self.role)
            .ok_or_else(|| RepositoryError::InternalError(format!("Corrupt role value: {}", self.role)))?;
        let level = match self.level {
            Some(raw) => Some(Level::parse(&raw).ok_or_else(|| {
                RepositoryError::InternalError(format!("Corrupt level value: {}", raw))
            })?),
            None => None,
        };
        Ok(User {
            id: Some(UserId::new(self.id)),
            name: self.name,
            email: self.email,
            role,
            department: self.department.map(Department::new),
            specialization: self.specialization,
            level,
            levels: parse_levels(self.levels)?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: Option<String>,
    pub specialization: Option<String>,
    pub level: Option<String>,
    pub levels: Vec<String>,
}

impl NewUserRow {
    pub fn from_domain(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            department: user.department.as_ref().map(|d| d.as_str().to_string()),
            specialization: user.specialization.clone(),
            level: user.level.map(|l| l.as_str().to_string()),
            levels: levels_to_strings(&user.levels),
        }
    }
}

#[derive(Debug, Queryable)]
pub struct ClassroomRow {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub location: Option<String>,
}

impl ClassroomRow {
    pub fn into_domain(self) -> Classroom {
        Classroom {
            id: Some(ClassroomId::new(self.id)),
            name: self.name,
            capacity: self.capacity.max(0) as u32,
            location: self.location,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = classrooms)]
pub struct NewClassroomRow {
    pub name: String,
    pub capacity: i32,
    pub location: Option<String>,
}

impl NewClassroomRow {
    pub fn from_domain(classroom: &Classroom) -> Self {
        Self {
            name: classroom.name.clone(),
            capacity: classroom.capacity as i32,
            location: classroom.location.clone(),
        }
    }
}

#[derive(Debug, Queryable)]
pub struct CourseRow {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub unit: i16,
    pub department: String,
    pub lecturer_id: i64,
    pub levels: Vec<String>,
}

impl CourseRow {
    pub fn into_domain(self) -> RepositoryResult<Course> {
        Ok(Course {
            id: Some(CourseId::new(self.id)),
            code: self.code,
            title: self.title,
            unit: self.unit.max(0) as u8,
            department: Department::new(self.department),
            lecturer: UserId::new(self.lecturer_id),
            levels: parse_levels(self.levels)?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = courses)]
pub struct NewCourseRow {
    pub code: String,
    pub title: String,
    pub unit: i16,
    pub department: String,
    pub lecturer_id: i64,
    pub levels: Vec<String>,
}

impl NewCourseRow {
    pub fn from_domain(course: &Course) -> Self {
        Self {
            code: course.code.clone(),
            title: course.title.clone(),
            unit: course.unit as i16,
            department: course.department.as_str().to_string(),
            lecturer_id: course.lecturer.value(),
            levels: levels_to_strings(&course.levels),
        }
    }
}

#[derive(Debug, Queryable)]
pub struct ScheduleEntryRow {
    pub id: i64,
    pub course_id: i64,
    pub lecturer_id: i64,
    pub classroom_id: i64,
    pub day: String,
    pub time_band: String,
    pub created_at: DateTime<Utc>,
}

impl ScheduleEntryRow {
    pub fn into_domain(self) -> RepositoryResult<ScheduleEntry> {
        let day: Weekday = self
            .day
            .parse()
            .map_err(RepositoryError::InternalError)?;
        Ok(ScheduleEntry {
            id: Some(EntryId::new(self.id)),
            course: CourseId::new(self.course_id),
            lecturer: UserId::new(self.lecturer_id),
            classroom: ClassroomId::new(self.classroom_id),
            day,
            time: TimeSlot::new(self.time_band),
            created_at: Some(self.created_at),
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = schedule_entries)]
pub struct NewScheduleEntryRow {
    pub course_id: i64,
    pub lecturer_id: i64,
    pub classroom_id: i64,
    pub day: String,
    pub time_band: String,
}

impl NewScheduleEntryRow {
    pub fn from_domain(entry: &ScheduleEntry) -> Self {
        Self {
            course_id: entry.course.value(),
            lecturer_id: entry.lecturer.value(),
            classroom_id: entry.classroom.value(),
            day: entry.day.as_str().to_string(),
            time_band: entry.time.as_str().to_string(),
        }
    }
}

#[derive(Debug, Queryable)]
pub struct ResultRow {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub score: f64,
    pub grade: String,
}

impl ResultRow {
    pub fn into_domain(self) -> RepositoryResult<ResultRecord> {
        let grade = Grade::parse(&self.grade).ok_or_else(|| {
            RepositoryError::InternalError(format!("Corrupt grade value: {}", self.grade))
        })?;
        Ok(ResultRecord {
            id: Some(ResultId::new(self.id)),
            student: UserId::new(self.student_id),
            course: CourseId::new(self.course_id),
            score: self.score,
            grade,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = results)]
pub struct NewResultRow {
    pub student_id: i64,
    pub course_id: i64,
    pub score: f64,
    pub grade: String,
}

impl NewResultRow {
    pub fn from_domain(result: &ResultRecord) -> Self {
        Self {
            student_id: result.student.value(),
            course_id: result.course.value(),
            score: result.score,
            grade: result.grade.as_str().to_string(),
        }
    }
}
