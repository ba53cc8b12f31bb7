//! Timetable generation.
//!
//! The generator assigns every course in a department a classroom, a weekday
//! and a time band such that no lecturer and no classroom is double-booked,
//! replacing the department's previous schedule wholesale.
//!
//! Placement is a bounded random search: each course gets a uniformly random
//! classroom, then up to [`GeneratorConfig::max_random_attempts`] random
//! (day, time) draws; if none is free, one deterministic sweep over every
//! classroom x day x time combination runs before the course is declared
//! unplaceable. Both phases are bounded, so generation always terminates.
//!
//! Classroom choice is uniform over the whole pool and deliberately ignores
//! seating capacity; changing that is a product decision, not a scheduler
//! default.
//!
//! Runs for the same department are serialized through [`DepartmentLocks`];
//! different departments generate concurrently.

pub mod conflicts;
pub mod generator;
pub mod locks;

pub use conflicts::{find_conflicts, ConflictKind, TimetableConflict};
pub use generator::{GenerationError, GenerationReport, GeneratorConfig, TimetableGenerator};
pub use locks::DepartmentLocks;
