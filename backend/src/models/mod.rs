//! Domain records for the academic catalog and timetable.

pub mod catalog;
pub mod macros;
pub mod results;
pub mod timetable;

pub use catalog::*;
pub use results::*;
pub use timetable::*;
