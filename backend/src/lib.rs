//! # Acadsched Backend
//!
//! Academic administration backend centered on automatic timetable
//! generation for departments.
//!
//! This crate manages the catalog of an academic department system (courses,
//! classrooms, lecturers, student results) and generates conflict-free class
//! timetables: each course in a department is assigned a classroom, a weekday
//! and a two-hour time band such that no lecturer and no classroom is
//! double-booked. The backend exposes a REST API via Axum for admin tooling.
//!
//! ## Features
//!
//! - **Catalog**: courses, classrooms and users with referential checks at
//!   the assignment boundary
//! - **Timetable Generation**: bounded random placement with a deterministic
//!   exhaustive fallback, seedable for reproducible runs
//! - **Manual Edits**: single schedule entries can be added, moved or removed
//!   with conflict validation
//! - **Results**: grade banding, GPA and department pass/fail analysis
//! - **HTTP API**: RESTful endpoints for admin frontends
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`models`]: domain records and the day/time-band grid
//! - [`db`]: repository pattern and persistence backends
//! - [`scheduler`]: the timetable generator and conflict detection
//! - [`services`]: repository-agnostic business logic (views, grading)
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

pub mod scheduler;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
