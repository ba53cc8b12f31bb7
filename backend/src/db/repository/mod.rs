//! Repository traits abstracting the persistence layer.
//!
//! The traits define every store operation the application needs, so
//! different backends (in-memory for tests and local development, Postgres
//! for production) can be swapped via dependency injection.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` to work with async Rust and allow
//! sharing across threads.
//!
//! # Error Handling
//! All methods return [`RepositoryResult<T>`] which wraps either the expected
//! return type or a [`RepositoryError`] describing what went wrong.

pub mod error;

pub use error::{RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::models::{
    Classroom, ClassroomId, Course, CourseId, Department, EntryId, LecturerId, ResultRecord,
    ScheduleEntry, TimeSlot, User, UserId, Weekday,
};

/// Catalog operations: users, courses and classrooms.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Store a user and return it with its assigned id.
    async fn insert_user(&self, user: &User) -> RepositoryResult<User>;

    /// Fetch a user by id, `NotFound` when absent.
    async fn get_user(&self, id: UserId) -> RepositoryResult<User>;

    /// All users holding the lecturer role.
    async fn list_lecturers(&self) -> RepositoryResult<Vec<User>>;

    /// Store a course and return it with its assigned id.
    ///
    /// Enforces the referential invariant at the assignment boundary: the
    /// referenced lecturer must exist and hold the lecturer role, otherwise
    /// the insert fails with `ValidationError` and nothing is written.
    async fn insert_course(&self, course: &Course) -> RepositoryResult<Course>;

    /// Fetch a course by id, `NotFound` when absent.
    async fn get_course(&self, id: CourseId) -> RepositoryResult<Course>;

    /// All courses owned by a department, in insertion order.
    async fn courses_for_department(&self, department: &Department) -> RepositoryResult<Vec<Course>>;

    /// Delete a course. Returns `true` when a record was removed.
    async fn delete_course(&self, id: CourseId) -> RepositoryResult<bool>;

    /// Store a classroom and return it with its assigned id.
    async fn insert_classroom(&self, classroom: &Classroom) -> RepositoryResult<Classroom>;

    /// Fetch a classroom by id, `NotFound` when absent.
    async fn get_classroom(&self, id: ClassroomId) -> RepositoryResult<Classroom>;

    /// The full classroom pool, in insertion order.
    async fn list_classrooms(&self) -> RepositoryResult<Vec<Classroom>>;
}

/// Timetable operations over schedule entries.
#[async_trait]
pub trait TimetableRepository: Send + Sync {
    /// Every schedule entry in the store.
    async fn list_entries(&self) -> RepositoryResult<Vec<ScheduleEntry>>;

    /// Entries whose course is in the given set.
    async fn entries_for_courses(&self, courses: &[CourseId]) -> RepositoryResult<Vec<ScheduleEntry>>;

    /// Store a single entry (manual-edit path) and return it with its id.
    /// Performs no conflict checking; callers validate first.
    async fn insert_entry(&self, entry: &ScheduleEntry) -> RepositoryResult<ScheduleEntry>;

    /// Overwrite an existing entry in place, `NotFound` when absent.
    async fn update_entry(&self, entry: &ScheduleEntry) -> RepositoryResult<ScheduleEntry>;

    /// Delete an entry. Returns `true` when a record was removed.
    async fn delete_entry(&self, id: EntryId) -> RepositoryResult<bool>;

    /// First entry double-booking the given lecturer or classroom at
    /// (day, time), skipping `exclude` so an update does not conflict with
    /// itself.
    async fn find_conflict(
        &self,
        lecturer: LecturerId,
        classroom: ClassroomId,
        day: Weekday,
        time: &TimeSlot,
        exclude: Option<EntryId>,
    ) -> RepositoryResult<Option<ScheduleEntry>>;

    /// Atomically replace a department's schedule: delete every entry whose
    /// course is in `courses`, then insert `entries` as one batch. Either
    /// both steps apply or neither does. Returns the number inserted.
    async fn replace_department_entries(
        &self,
        courses: &[CourseId],
        entries: &[ScheduleEntry],
    ) -> RepositoryResult<usize>;
}

/// Student result operations.
#[async_trait]
pub trait ResultsRepository: Send + Sync {
    /// Store a result and return it with its assigned id.
    async fn insert_result(&self, result: &ResultRecord) -> RepositoryResult<ResultRecord>;

    /// All results recorded for one student.
    async fn results_for_student(&self, student: UserId) -> RepositoryResult<Vec<ResultRecord>>;

    /// All results whose course belongs to the department.
    async fn results_for_department(&self, department: &Department)
        -> RepositoryResult<Vec<ResultRecord>>;
}

/// The complete persistence surface the application is wired against.
#[async_trait]
pub trait FullRepository: CatalogRepository + TimetableRepository + ResultsRepository {
    /// Check if the store is reachable and healthy.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
