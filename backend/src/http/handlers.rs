//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! scheduler and service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CourseQuery, CreateClassroomRequest, CreateCourseRequest, CreateResultRequest,
    CreateUserRequest, DeleteEntryResponse, EntryRequest, GenerateTimetableRequest,
    GenerateTimetableResponse, GpaQuery, HealthResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{DepartmentTimetable, GpaReport, ResultsAnalysis};
use crate::models::{
    Classroom, Course, Department, EntryId, ResultRecord, Role, ScheduleEntry, User, UserId,
};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_department(raw: &str) -> Result<Department, AppError> {
    let department = Department::new(raw);
    if department.is_empty() {
        return Err(AppError::BadRequest("Department is required".to_string()));
    }
    Ok(department)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Timetable
// =============================================================================

/// POST /v1/timetable/generate
///
/// Regenerate a department's timetable, replacing its previous schedule.
pub async fn generate_timetable(
    State(state): State<AppState>,
    Json(request): Json<GenerateTimetableRequest>,
) -> HandlerResult<GenerateTimetableResponse> {
    let department = parse_department(&request.department)?;

    let report = match request.seed {
        Some(seed) => {
            state
                .generator
                .generate_seeded(state.repository.as_ref(), &department, seed)
                .await?
        }
        None => {
            state
                .generator
                .generate(state.repository.as_ref(), &department)
                .await?
        }
    };

    Ok(Json(report.into()))
}

/// GET /v1/timetable/{department}
///
/// A department's resolved timetable plus the grid axes.
pub async fn get_timetable(
    State(state): State<AppState>,
    Path(department): Path<String>,
) -> HandlerResult<DepartmentTimetable> {
    let department = parse_department(&department)?;
    let timetable = services::department_timetable(
        state.repository.as_ref(),
        &department,
        &state.generator.config().grid,
    )
    .await?;
    Ok(Json(timetable))
}

// =============================================================================
// Manual schedule entries
// =============================================================================

/// POST /v1/entries
///
/// Manually add one schedule entry; rejected when the slot is taken.
pub async fn create_entry(
    State(state): State<AppState>,
    Json(request): Json<EntryRequest>,
) -> Result<(StatusCode, Json<ScheduleEntry>), AppError> {
    let entry = services::add_entry(
        state.repository.as_ref(),
        request.course,
        request.classroom,
        request.day,
        request.time,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /v1/entries/{entry_id}
///
/// Move or reassign one schedule entry.
pub async fn update_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
    Json(request): Json<EntryRequest>,
) -> HandlerResult<ScheduleEntry> {
    let entry = services::move_entry(
        state.repository.as_ref(),
        EntryId::new(entry_id),
        request.course,
        request.classroom,
        request.day,
        request.time,
    )
    .await?;
    Ok(Json(entry))
}

/// DELETE /v1/entries/{entry_id}
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
) -> HandlerResult<DeleteEntryResponse> {
    let entry_id = EntryId::new(entry_id);
    let deleted = services::remove_entry(state.repository.as_ref(), entry_id).await?;
    Ok(Json(DeleteEntryResponse { entry_id, deleted }))
}

// =============================================================================
// Catalog
// =============================================================================

/// GET /v1/courses?department=...
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> HandlerResult<Vec<Course>> {
    let department = query
        .department
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("department query parameter is required".to_string()))?;
    let department = parse_department(department)?;
    let courses = state
        .repository
        .courses_for_department(&department)
        .await?;
    Ok(Json(courses))
}

/// POST /v1/courses
pub async fn create_course(
    State(state): State<AppState>,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    if request.unit == 0 || request.unit > 6 {
        return Err(AppError::BadRequest(
            "Course unit must be between 1 and 6".to_string(),
        ));
    }
    let department = parse_department(&request.department)?;
    let course = Course::new(
        &request.code,
        request.title,
        request.unit,
        department,
        request.lecturer,
        request.levels,
    );
    let stored = state.repository.insert_course(&course).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /v1/classrooms
pub async fn list_classrooms(State(state): State<AppState>) -> HandlerResult<Vec<Classroom>> {
    Ok(Json(state.repository.list_classrooms().await?))
}

/// POST /v1/classrooms
pub async fn create_classroom(
    State(state): State<AppState>,
    Json(request): Json<CreateClassroomRequest>,
) -> Result<(StatusCode, Json<Classroom>), AppError> {
    let classroom = Classroom {
        id: None,
        name: request.name,
        capacity: request.capacity,
        location: request.location,
    };
    let stored = state.repository.insert_classroom(&classroom).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /v1/lecturers
pub async fn list_lecturers(State(state): State<AppState>) -> HandlerResult<Vec<User>> {
    Ok(Json(state.repository.list_lecturers().await?))
}

/// POST /v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let role = Role::parse(&request.role)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown role: {}", request.role)))?;

    let department = match request.department.as_deref() {
        Some(raw) => Some(parse_department(raw)?),
        None => None,
    };
    if role != Role::Admin && department.is_none() {
        return Err(AppError::BadRequest(
            "Department is required for lecturers and students".to_string(),
        ));
    }

    let user = User {
        id: None,
        name: request.name,
        email: request.email,
        role,
        department,
        specialization: request.specialization,
        level: request.level,
        levels: request.levels,
    };
    let stored = state.repository.insert_user(&user).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

// =============================================================================
// Results
// =============================================================================

/// POST /v1/results
///
/// Record one student result; the grade is banded from the score.
pub async fn create_result(
    State(state): State<AppState>,
    Json(request): Json<CreateResultRequest>,
) -> Result<(StatusCode, Json<ResultRecord>), AppError> {
    if !(0.0..=100.0).contains(&request.score) {
        return Err(AppError::BadRequest(
            "Score must be between 0 and 100".to_string(),
        ));
    }
    let record = ResultRecord::from_score(request.student, request.course, request.score);
    let stored = state.repository.insert_result(&record).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /v1/results/analysis/{department}
pub async fn results_analysis(
    State(state): State<AppState>,
    Path(department): Path<String>,
) -> HandlerResult<ResultsAnalysis> {
    let department = parse_department(&department)?;
    let analysis = services::results_analysis(state.repository.as_ref(), &department).await?;
    Ok(Json(analysis))
}

/// GET /v1/results/gpa/{student_id}?department=...
pub async fn student_gpa(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(query): Query<GpaQuery>,
) -> HandlerResult<GpaReport> {
    let department = parse_department(&query.department)?;
    let report = services::calculate_gpa(
        state.repository.as_ref(),
        UserId::new(student_id),
        &department,
    )
    .await?;
    Ok(Json(report))
}
