//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Timetable
        .route("/timetable/generate", post(handlers::generate_timetable))
        .route("/timetable/{department}", get(handlers::get_timetable))
        // Manual schedule entries
        .route("/entries", post(handlers::create_entry))
        .route("/entries/{entry_id}", put(handlers::update_entry))
        .route("/entries/{entry_id}", axum::routing::delete(handlers::delete_entry))
        // Catalog
        .route("/courses", get(handlers::list_courses))
        .route("/courses", post(handlers::create_course))
        .route("/classrooms", get(handlers::list_classrooms))
        .route("/classrooms", post(handlers::create_classroom))
        .route("/lecturers", get(handlers::list_lecturers))
        .route("/users", post(handlers::create_user))
        // Results
        .route("/results", post(handlers::create_result))
        .route("/results/analysis/{department}", get(handlers::results_analysis))
        .route("/results/gpa/{student_id}", get(handlers::student_gpa));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
