//! Repository-agnostic business logic.
//!
//! Functions here take `&dyn FullRepository` so they behave identically over
//! the local and Postgres backends.

pub mod grading;
pub mod timetable;

pub use grading::{calculate_gpa, results_analysis};
pub use timetable::{add_entry, department_timetable, move_entry, remove_entry};
