//! The department timetable generator.

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::db::repository::{FullRepository, RepositoryError};
use crate::models::{
    Classroom, ClassroomId, Course, CourseId, Department, LecturerId, ScheduleEntry, SlotGrid,
    TimeSlot, Weekday,
};

use super::locks::DepartmentLocks;

/// Generation failures. `NoCourses` and `Infeasible` are reported before any
/// write happens, so the department's previous schedule survives them.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("No courses found for department '{department}'")]
    NoCourses { department: Department },

    #[error("Could not place course '{course}' within the available slots")]
    Infeasible { course: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Outcome of a successful generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub department: Department,
    pub entries_created: usize,
}

/// Tuning knobs for the placement search.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// The day/time grid courses are placed into.
    pub grid: SlotGrid,
    /// Random (day, time) draws per course before falling back to the
    /// deterministic sweep.
    pub max_random_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            grid: SlotGrid::default(),
            max_random_attempts: 64,
        }
    }
}

/// Occupied (lecturer, slot) and (classroom, slot) pairs, seeded from the
/// entries that survive the run and updated as new entries are staged.
struct SlotIndex {
    lecturers: HashSet<(LecturerId, Weekday, TimeSlot)>,
    classrooms: HashSet<(ClassroomId, Weekday, TimeSlot)>,
}

impl SlotIndex {
    fn seeded(retained: &[ScheduleEntry]) -> Self {
        let mut index = Self {
            lecturers: HashSet::new(),
            classrooms: HashSet::new(),
        };
        for entry in retained {
            index.occupy(entry.lecturer, entry.classroom, entry.day, entry.time.clone());
        }
        index
    }

    fn is_free(
        &self,
        lecturer: LecturerId,
        classroom: ClassroomId,
        day: Weekday,
        time: &TimeSlot,
    ) -> bool {
        !self.lecturers.contains(&(lecturer, day, time.clone()))
            && !self.classrooms.contains(&(classroom, day, time.clone()))
    }

    fn occupy(&mut self, lecturer: LecturerId, classroom: ClassroomId, day: Weekday, time: TimeSlot) {
        self.lecturers.insert((lecturer, day, time.clone()));
        self.classrooms.insert((classroom, day, time));
    }
}

/// Place every course onto the grid without touching the store.
///
/// `retained` seeds the occupancy index with the entries that will still
/// exist after the department's own schedule is replaced; staged entries
/// join the index as they are placed so a batch can never double-book
/// itself.
pub fn place_courses<R: Rng>(
    courses: &[Course],
    classrooms: &[Classroom],
    retained: &[ScheduleEntry],
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Vec<ScheduleEntry>, GenerationError> {
    let grid = &config.grid;
    let mut index = SlotIndex::seeded(retained);
    let mut staged = Vec::with_capacity(courses.len());

    for course in courses {
        let course_id = course_id(course)?;

        if classrooms.is_empty() || grid.is_empty() {
            return Err(GenerationError::Infeasible {
                course: course.code.clone(),
            });
        }

        // Uniform over the whole pool, capacity ignored.
        let classroom = &classrooms[rng.random_range(0..classrooms.len())];
        let classroom_id = classroom_id_of(classroom, course)?;

        let mut placed = None;
        for _ in 0..config.max_random_attempts {
            let day = grid.days[rng.random_range(0..grid.days.len())];
            let time = &grid.times[rng.random_range(0..grid.times.len())];
            if index.is_free(course.lecturer, classroom_id, day, time) {
                placed = Some((classroom_id, day, time.clone()));
                break;
            }
        }

        // Random sampling came up dry: sweep every combination once before
        // giving up, so a feasible schedule is never missed by bad luck.
        if placed.is_none() {
            'sweep: for room in classrooms {
                let room_id = classroom_id_of(room, course)?;
                for day in &grid.days {
                    for time in &grid.times {
                        if index.is_free(course.lecturer, room_id, *day, time) {
                            placed = Some((room_id, *day, time.clone()));
                            break 'sweep;
                        }
                    }
                }
            }
        }

        let Some((room_id, day, time)) = placed else {
            warn!(
                "No free slot for course {} (lecturer {})",
                course.code, course.lecturer
            );
            return Err(GenerationError::Infeasible {
                course: course.code.clone(),
            });
        };

        index.occupy(course.lecturer, room_id, day, time.clone());
        staged.push(ScheduleEntry::new(
            course_id,
            course.lecturer,
            room_id,
            day,
            time,
        ));
    }

    Ok(staged)
}

fn course_id(course: &Course) -> Result<CourseId, GenerationError> {
    course.id.ok_or_else(|| {
        RepositoryError::InternalError(format!("Course {} loaded without an id", course.code)).into()
    })
}

fn classroom_id_of(classroom: &Classroom, course: &Course) -> Result<ClassroomId, GenerationError> {
    classroom.id.ok_or_else(|| {
        RepositoryError::InternalError(format!(
            "Classroom {} loaded without an id while placing {}",
            classroom.name, course.code
        ))
        .into()
    })
}

/// Department timetable generator.
///
/// Owns the placement configuration and the per-department lock registry;
/// one instance is shared across the application.
pub struct TimetableGenerator {
    config: GeneratorConfig,
    locks: DepartmentLocks,
}

impl TimetableGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            locks: DepartmentLocks::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate with a fresh OS-seeded RNG (production path).
    pub async fn generate(
        &self,
        repo: &dyn FullRepository,
        department: &Department,
    ) -> Result<GenerationReport, GenerationError> {
        let mut rng = SmallRng::from_os_rng();
        self.generate_with_rng(repo, department, &mut rng).await
    }

    /// Generate with a caller-provided seed for reproducible runs.
    pub async fn generate_seeded(
        &self,
        repo: &dyn FullRepository,
        department: &Department,
        seed: u64,
    ) -> Result<GenerationReport, GenerationError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.generate_with_rng(repo, department, &mut rng).await
    }

    /// Generate a department's timetable, replacing its previous schedule.
    ///
    /// Runs under the department's lock. All placement happens in memory
    /// against a snapshot of the store; the single
    /// `replace_department_entries` call at the end is the only write, so a
    /// failure at any earlier point leaves the previous schedule intact.
    pub async fn generate_with_rng<R: Rng + Send>(
        &self,
        repo: &dyn FullRepository,
        department: &Department,
        rng: &mut R,
    ) -> Result<GenerationReport, GenerationError> {
        let _guard = self.locks.acquire(department).await;

        let courses = repo.courses_for_department(department).await?;
        if courses.is_empty() {
            return Err(GenerationError::NoCourses {
                department: department.clone(),
            });
        }

        let classrooms = repo.list_classrooms().await?;

        let course_ids: Vec<CourseId> = courses.iter().filter_map(|c| c.id).collect();
        let doomed: HashSet<CourseId> = course_ids.iter().copied().collect();

        // Entries from other departments stay and constrain placement.
        let retained: Vec<ScheduleEntry> = repo
            .list_entries()
            .await?
            .into_iter()
            .filter(|e| !doomed.contains(&e.course))
            .collect();

        let staged = place_courses(&courses, &classrooms, &retained, &self.config, rng)?;

        let entries_created = repo
            .replace_department_entries(&course_ids, &staged)
            .await?;

        info!(
            "Generated timetable for '{}': {} entries",
            department, entries_created
        );

        Ok(GenerationReport {
            department: department.clone(),
            entries_created,
        })
    }
}

impl Default for TimetableGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod generator_tests;
