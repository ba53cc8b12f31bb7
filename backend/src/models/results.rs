//! Result records and grade banding.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::{CourseId, UserId};
use crate::define_id_type;

define_id_type!(i64, ResultId);

/// Score below which a result counts as a failure in department analysis.
pub const PASS_MARK: f64 = 40.0;

/// Letter grade on the institutional banding scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    /// Band a raw score: A >= 70, B >= 60, C >= 50, D >= 45, E >= 40, else F.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Grade::A
        } else if score >= 60.0 {
            Grade::B
        } else if score >= 50.0 {
            Grade::C
        } else if score >= 45.0 {
            Grade::D
        } else if score >= 40.0 {
            Grade::E
        } else {
            Grade::F
        }
    }

    /// Grade points on the 5-point scale used for GPA.
    pub fn points(&self) -> u8 {
        match self {
            Grade::A => 5,
            Grade::B => 4,
            Grade::C => 3,
            Grade::D => 2,
            Grade::E => 1,
            Grade::F => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Grade::A),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            "D" => Some(Grade::D),
            "E" => Some(Grade::E),
            "F" => Some(Grade::F),
            _ => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student's recorded score in one course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Assigned by the repository on insert.
    pub id: Option<ResultId>,
    pub student: UserId,
    pub course: CourseId,
    pub score: f64,
    pub grade: Grade,
}

impl ResultRecord {
    /// Build a record with the grade derived from the score.
    pub fn from_score(student: UserId, course: CourseId, score: f64) -> Self {
        Self {
            id: None,
            student,
            course,
            score,
            grade: Grade::from_score(score),
        }
    }
}
