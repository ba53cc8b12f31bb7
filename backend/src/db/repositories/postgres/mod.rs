//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry when a pooled connection cannot be checked out
//! - Automatic migration execution on startup
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for checkout failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    CatalogRepository, FullRepository, RepositoryError, RepositoryResult, ResultsRepository,
    TimetableRepository,
};
use crate::models::{
    Classroom, ClassroomId, Course, CourseId, Department, EntryId, LecturerId, ResultRecord,
    ScheduleEntry, TimeSlot, User, UserId, Weekday,
};

mod models;
mod schema;

use models::*;
use schema::{classrooms, courses, results, schedule_entries, users};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for checkout failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables (see module docs).
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        fn var_or<T: std::str::FromStr>(key: &str, default: T) -> T {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        Ok(Self {
            database_url,
            max_pool_size: var_or("PG_POOL_MAX", 10),
            min_pool_size: var_or("PG_POOL_MIN", 1),
            connection_timeout_sec: var_or("PG_CONN_TIMEOUT_SEC", 30),
            idle_timeout_sec: var_or("PG_IDLE_TIMEOUT_SEC", 600),
            max_retries: var_or("PG_MAX_RETRIES", 3),
            retry_delay_ms: var_or("PG_RETRY_DELAY_MS", 100),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

        {
            let mut conn = pool
                .get()
                .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;
            conn.run_pending_migrations(MIGRATIONS)
                .map_err(|e| RepositoryError::InternalError(format!("Migration failed: {}", e)))?;
        }

        Ok(Self { pool, config })
    }

    /// Run a blocking Diesel operation on the pool, retrying checkout
    /// failures with exponential backoff.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut retry_delay = Duration::from_millis(retry_delay_ms);
            let mut attempt = 0;
            let mut conn = loop {
                match pool.get() {
                    Ok(conn) => break conn,
                    Err(_) if attempt < max_retries => {
                        attempt += 1;
                        std::thread::sleep(retry_delay);
                        retry_delay *= 2;
                    }
                    Err(e) => return Err(RepositoryError::from(e)),
                }
            };
            f(&mut conn)
        })
        .await
        .map_err(|e| RepositoryError::InternalError(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl CatalogRepository for PostgresRepository {
    async fn insert_user(&self, user: &User) -> RepositoryResult<User> {
        let new_row = NewUserRow::from_domain(user);
        self.with_conn(move |conn| {
            let taken: i64 = users::table
                .filter(users::email.eq(&new_row.email))
                .count()
                .get_result(conn)?;
            if taken > 0 {
                return Err(RepositoryError::ValidationError(format!(
                    "Email already registered: {}",
                    new_row.email
                )));
            }

            let row: UserRow = diesel::insert_into(users::table)
                .values(&new_row)
                .get_result(conn)?;
            row.into_domain()
        })
        .await
    }

    async fn get_user(&self, id: UserId) -> RepositoryResult<User> {
        self.with_conn(move |conn| {
            let row: Option<UserRow> = users::table
                .find(id.value())
                .first(conn)
                .optional()?;
            row.ok_or_else(|| RepositoryError::NotFound(format!("User {} not found", id)))?
                .into_domain()
        })
        .await
    }

    async fn list_lecturers(&self) -> RepositoryResult<Vec<User>> {
        self.with_conn(|conn| {
            let rows: Vec<UserRow> = users::table
                .filter(users::role.eq("lecturer"))
                .order(users::id.asc())
                .load(conn)?;
            rows.into_iter().map(UserRow::into_domain).collect()
        })
        .await
    }

    async fn insert_course(&self, course: &Course) -> RepositoryResult<Course> {
        let new_row = NewCourseRow::from_domain(course);
        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                let role: Option<String> = users::table
                    .find(new_row.lecturer_id)
                    .select(users::role)
                    .first(conn)
                    .optional()?;
                match role.as_deref() {
                    Some("lecturer") => {}
                    Some(_) => {
                        return Err(RepositoryError::ValidationError(
                            "Assigned user must be a lecturer".to_string(),
                        ))
                    }
                    None => {
                        return Err(RepositoryError::ValidationError(format!(
                            "Lecturer {} does not exist",
                            new_row.lecturer_id
                        )))
                    }
                }

                let taken: i64 = courses::table
                    .filter(courses::code.eq(&new_row.code))
                    .count()
                    .get_result(conn)?;
                if taken > 0 {
                    return Err(RepositoryError::ValidationError(format!(
                        "Course code already exists: {}",
                        new_row.code
                    )));
                }

                let row: CourseRow = diesel::insert_into(courses::table)
                    .values(&new_row)
                    .get_result(conn)?;
                row.into_domain()
            })
        })
        .await
    }

    async fn get_course(&self, id: CourseId) -> RepositoryResult<Course> {
        self.with_conn(move |conn| {
            let row: Option<CourseRow> = courses::table
                .find(id.value())
                .first(conn)
                .optional()?;
            row.ok_or_else(|| RepositoryError::NotFound(format!("Course {} not found", id)))?
                .into_domain()
        })
        .await
    }

    async fn courses_for_department(&self, department: &Department) -> RepositoryResult<Vec<Course>> {
        let dept = department.as_str().to_string();
        self.with_conn(move |conn| {
            let rows: Vec<CourseRow> = courses::table
                .filter(courses::department.eq(dept))
                .order(courses::id.asc())
                .load(conn)?;
            rows.into_iter().map(CourseRow::into_domain).collect()
        })
        .await
    }

    async fn delete_course(&self, id: CourseId) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(courses::table.find(id.value())).execute(conn)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn insert_classroom(&self, classroom: &Classroom) -> RepositoryResult<Classroom> {
        let new_row = NewClassroomRow::from_domain(classroom);
        self.with_conn(move |conn| {
            let row: ClassroomRow = diesel::insert_into(classrooms::table)
                .values(&new_row)
                .get_result(conn)?;
            Ok(row.into_domain())
        })
        .await
    }

    async fn get_classroom(&self, id: ClassroomId) -> RepositoryResult<Classroom> {
        self.with_conn(move |conn| {
            let row: Option<ClassroomRow> = classrooms::table
                .find(id.value())
                .first(conn)
                .optional()?;
            Ok(row
                .ok_or_else(|| RepositoryError::NotFound(format!("Classroom {} not found", id)))?
                .into_domain())
        })
        .await
    }

    async fn list_classrooms(&self) -> RepositoryResult<Vec<Classroom>> {
        self.with_conn(|conn| {
            let rows: Vec<ClassroomRow> = classrooms::table.order(classrooms::id.asc()).load(conn)?;
            Ok(rows.into_iter().map(ClassroomRow::into_domain).collect())
        })
        .await
    }
}

#[async_trait]
impl TimetableRepository for PostgresRepository {
    async fn list_entries(&self) -> RepositoryResult<Vec<ScheduleEntry>> {
        self.with_conn(|conn| {
            let rows: Vec<ScheduleEntryRow> = schedule_entries::table
                .order(schedule_entries::id.asc())
                .load(conn)?;
            rows.into_iter().map(ScheduleEntryRow::into_domain).collect()
        })
        .await
    }

    async fn entries_for_courses(&self, courses_filter: &[CourseId]) -> RepositoryResult<Vec<ScheduleEntry>> {
        let ids: Vec<i64> = courses_filter.iter().map(|c| c.value()).collect();
        self.with_conn(move |conn| {
            let rows: Vec<ScheduleEntryRow> = schedule_entries::table
                .filter(schedule_entries::course_id.eq_any(ids))
                .order(schedule_entries::id.asc())
                .load(conn)?;
            rows.into_iter().map(ScheduleEntryRow::into_domain).collect()
        })
        .await
    }

    async fn insert_entry(&self, entry: &ScheduleEntry) -> RepositoryResult<ScheduleEntry> {
        let new_row = NewScheduleEntryRow::from_domain(entry);
        self.with_conn(move |conn| {
            let row: ScheduleEntryRow = diesel::insert_into(schedule_entries::table)
                .values(&new_row)
                .get_result(conn)?;
            row.into_domain()
        })
        .await
    }

    async fn update_entry(&self, entry: &ScheduleEntry) -> RepositoryResult<ScheduleEntry> {
        let id = entry
            .id
            .ok_or_else(|| RepositoryError::ValidationError("Entry has no id".to_string()))?;
        let new_row = NewScheduleEntryRow::from_domain(entry);
        self.with_conn(move |conn| {
            let row: Option<ScheduleEntryRow> =
                diesel::update(schedule_entries::table.find(id.value()))
                    .set((
                        schedule_entries::course_id.eq(new_row.course_id),
                        schedule_entries::lecturer_id.eq(new_row.lecturer_id),
                        schedule_entries::classroom_id.eq(new_row.classroom_id),
                        schedule_entries::day.eq(new_row.day),
                        schedule_entries::time_band.eq(new_row.time_band),
                    ))
                    .get_result(conn)
                    .optional()?;
            row.ok_or_else(|| RepositoryError::NotFound(format!("Entry {} not found", id)))?
                .into_domain()
        })
        .await
    }

    async fn delete_entry(&self, id: EntryId) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(schedule_entries::table.find(id.value())).execute(conn)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn find_conflict(
        &self,
        lecturer: LecturerId,
        classroom: ClassroomId,
        day: Weekday,
        time: &TimeSlot,
        exclude: Option<EntryId>,
    ) -> RepositoryResult<Option<ScheduleEntry>> {
        let day_s = day.as_str().to_string();
        let time_s = time.as_str().to_string();
        self.with_conn(move |conn| {
            let mut query = schedule_entries::table
                .filter(schedule_entries::day.eq(day_s))
                .filter(schedule_entries::time_band.eq(time_s))
                .filter(
                    schedule_entries::lecturer_id
                        .eq(lecturer.value())
                        .or(schedule_entries::classroom_id.eq(classroom.value())),
                )
                .into_boxed();
            if let Some(id) = exclude {
                query = query.filter(schedule_entries::id.ne(id.value()));
            }

            let row: Option<ScheduleEntryRow> = query
                .order(schedule_entries::id.asc())
                .first(conn)
                .optional()?;
            row.map(ScheduleEntryRow::into_domain).transpose()
        })
        .await
    }

    async fn replace_department_entries(
        &self,
        courses_filter: &[CourseId],
        entries: &[ScheduleEntry],
    ) -> RepositoryResult<usize> {
        let ids: Vec<i64> = courses_filter.iter().map(|c| c.value()).collect();
        let new_rows: Vec<NewScheduleEntryRow> =
            entries.iter().map(NewScheduleEntryRow::from_domain).collect();

        self.with_conn(move |conn| {
            conn.transaction::<_, RepositoryError, _>(|conn| {
                diesel::delete(
                    schedule_entries::table.filter(schedule_entries::course_id.eq_any(&ids)),
                )
                .execute(conn)?;

                let inserted = diesel::insert_into(schedule_entries::table)
                    .values(&new_rows)
                    .execute(conn)?;
                Ok(inserted)
            })
        })
        .await
    }
}

#[async_trait]
impl ResultsRepository for PostgresRepository {
    async fn insert_result(&self, result: &ResultRecord) -> RepositoryResult<ResultRecord> {
        let new_row = NewResultRow::from_domain(result);
        self.with_conn(move |conn| {
            let row: ResultRow = diesel::insert_into(results::table)
                .values(&new_row)
                .get_result(conn)?;
            row.into_domain()
        })
        .await
    }

    async fn results_for_student(&self, student: UserId) -> RepositoryResult<Vec<ResultRecord>> {
        self.with_conn(move |conn| {
            let rows: Vec<ResultRow> = results::table
                .filter(results::student_id.eq(student.value()))
                .order(results::id.asc())
                .load(conn)?;
            rows.into_iter().map(ResultRow::into_domain).collect()
        })
        .await
    }

    async fn results_for_department(
        &self,
        department: &Department,
    ) -> RepositoryResult<Vec<ResultRecord>> {
        let dept = department.as_str().to_string();
        self.with_conn(move |conn| {
            let rows: Vec<ResultRow> = results::table
                .inner_join(courses::table)
                .filter(courses::department.eq(dept))
                .select((
                    results::id,
                    results::student_id,
                    results::course_id,
                    results::score,
                    results::grade,
                ))
                .order(results::id.asc())
                .load(conn)?;
            rows.into_iter().map(ResultRow::into_domain).collect()
        })
        .await
    }
}

#[async_trait]
impl FullRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }
}
