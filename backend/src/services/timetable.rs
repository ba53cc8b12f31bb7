//! Department timetable views and the manual single-entry edit path.
//!
//! Bulk regeneration lives in [`crate::scheduler`]; the functions here cover
//! reading a department's timetable and the narrow add/move/delete path an
//! administrator uses to touch one entry at a time.

use std::collections::HashMap;

use crate::api::{DepartmentTimetable, TimetableEntryView};
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::models::{
    ClassroomId, CourseId, Department, EntryId, ScheduleEntry, SlotGrid, TimeSlot, UserId, Weekday,
};

/// Resolve a department's timetable for display.
///
/// Fails with `NotFound` when the department has no courses, mirroring the
/// generation precondition.
pub async fn department_timetable(
    repo: &dyn FullRepository,
    department: &Department,
    grid: &SlotGrid,
) -> RepositoryResult<DepartmentTimetable> {
    let courses = repo.courses_for_department(department).await?;
    if courses.is_empty() {
        return Err(RepositoryError::NotFound(format!(
            "No courses found for department '{}'",
            department
        )));
    }

    let course_ids: Vec<CourseId> = courses.iter().filter_map(|c| c.id).collect();
    let by_id: HashMap<CourseId, &crate::models::Course> =
        courses.iter().filter_map(|c| c.id.map(|id| (id, c))).collect();

    let entries = repo.entries_for_courses(&course_ids).await?;

    // Resolve referenced names once each.
    let mut lecturer_names: HashMap<UserId, String> = HashMap::new();
    let mut classroom_names: HashMap<ClassroomId, String> = HashMap::new();

    let mut views = Vec::with_capacity(entries.len());
    for entry in &entries {
        let Some(course) = by_id.get(&entry.course) else {
            continue;
        };
        let entry_id = entry.id.ok_or_else(|| {
            RepositoryError::InternalError("Schedule entry loaded without an id".to_string())
        })?;

        if !lecturer_names.contains_key(&entry.lecturer) {
            let lecturer = repo.get_user(entry.lecturer).await?;
            lecturer_names.insert(entry.lecturer, lecturer.name);
        }
        if !classroom_names.contains_key(&entry.classroom) {
            let classroom = repo.get_classroom(entry.classroom).await?;
            classroom_names.insert(entry.classroom, classroom.name);
        }

        views.push(TimetableEntryView {
            entry_id,
            course_code: course.code.clone(),
            course_title: course.title.clone(),
            unit: course.unit,
            lecturer_name: lecturer_names[&entry.lecturer].clone(),
            classroom_name: classroom_names[&entry.classroom].clone(),
            day: entry.day,
            time: entry.time.clone(),
        });
    }

    Ok(DepartmentTimetable {
        department: department.clone(),
        days: grid.days.clone(),
        times: grid.times.clone(),
        entries: views,
    })
}

/// Manually add one schedule entry.
///
/// The lecturer is taken from the course, keeping the denormalized lecturer
/// column consistent. Rejects with `ValidationError` when the slot would
/// double-book the lecturer or the classroom.
pub async fn add_entry(
    repo: &dyn FullRepository,
    course_id: CourseId,
    classroom_id: ClassroomId,
    day: Weekday,
    time: TimeSlot,
) -> RepositoryResult<ScheduleEntry> {
    let course = repo.get_course(course_id).await?;
    // Surfaces NotFound for a dangling classroom before any write.
    let classroom = repo.get_classroom(classroom_id).await?;
    let classroom_id = classroom.id.unwrap_or(classroom_id);

    if let Some(existing) = repo
        .find_conflict(course.lecturer, classroom_id, day, &time, None)
        .await?
    {
        return Err(conflict_error(&existing));
    }

    repo.insert_entry(&ScheduleEntry::new(
        course_id,
        course.lecturer,
        classroom_id,
        day,
        time,
    ))
    .await
}

/// Move or reassign one existing entry, excluding itself from the conflict
/// check.
pub async fn move_entry(
    repo: &dyn FullRepository,
    entry_id: EntryId,
    course_id: CourseId,
    classroom_id: ClassroomId,
    day: Weekday,
    time: TimeSlot,
) -> RepositoryResult<ScheduleEntry> {
    let course = repo.get_course(course_id).await?;

    if let Some(existing) = repo
        .find_conflict(course.lecturer, classroom_id, day, &time, Some(entry_id))
        .await?
    {
        return Err(conflict_error(&existing));
    }

    let mut entry = ScheduleEntry::new(course_id, course.lecturer, classroom_id, day, time);
    entry.id = Some(entry_id);
    repo.update_entry(&entry).await
}

/// Delete one entry. Returns `true` when a record was removed.
pub async fn remove_entry(repo: &dyn FullRepository, entry_id: EntryId) -> RepositoryResult<bool> {
    repo.delete_entry(entry_id).await
}

fn conflict_error(existing: &ScheduleEntry) -> RepositoryError {
    RepositoryError::ValidationError(format!(
        "Schedule conflict detected: course {} already occupies {} {}",
        existing.course, existing.day, existing.time
    ))
}
