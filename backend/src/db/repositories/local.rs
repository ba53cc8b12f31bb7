//! In-memory local repository implementation.
//!
//! Stores all data in HashMaps behind a single `RwLock`, giving fast,
//! deterministic and isolated execution for unit tests and local
//! development. Mutations that must be atomic (the delete+insert of a
//! timetable replacement) run under one write guard, so readers never see a
//! half-replaced schedule.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::db::repository::{
    CatalogRepository, FullRepository, RepositoryError, RepositoryResult, ResultsRepository,
    TimetableRepository,
};
use crate::models::{
    Classroom, ClassroomId, Course, CourseId, Department, EntryId, LecturerId, ResultId,
    ResultRecord, Role, ScheduleEntry, TimeSlot, User, UserId, Weekday,
};

/// In-memory local repository.
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    users: HashMap<UserId, User>,
    courses: HashMap<CourseId, Course>,
    classrooms: HashMap<ClassroomId, Classroom>,
    entries: HashMap<EntryId, ScheduleEntry>,
    results: HashMap<ResultId, ResultRecord>,

    // Insertion-order indexes; HashMap iteration order is arbitrary and the
    // generator's course order must match load order.
    course_order: Vec<CourseId>,
    classroom_order: Vec<ClassroomId>,
    entry_order: Vec<EntryId>,

    next_user_id: i64,
    next_course_id: i64,
    next_classroom_id: i64,
    next_entry_id: i64,
    next_result_id: i64,

    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            users: HashMap::new(),
            courses: HashMap::new(),
            classrooms: HashMap::new(),
            entries: HashMap::new(),
            results: HashMap::new(),
            course_order: Vec::new(),
            classroom_order: Vec::new(),
            entry_order: Vec::new(),
            next_user_id: 1,
            next_course_id: 1,
            next_classroom_id: 1,
            next_entry_id: 1,
            next_result_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn insert_entry_locked(&mut self, entry: &ScheduleEntry) -> ScheduleEntry {
        let id = EntryId::new(self.next_entry_id);
        self.next_entry_id += 1;

        let mut stored = entry.clone();
        stored.id = Some(id);
        stored.created_at = Some(Utc::now());
        self.entries.insert(id, stored.clone());
        self.entry_order.push(id);
        stored
    }

    fn remove_entry_locked(&mut self, id: EntryId) -> bool {
        let existed = self.entries.remove(&id).is_some();
        if existed {
            self.entry_order.retain(|e| *e != id);
        }
        existed
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().unwrap().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        let healthy = data.is_healthy;
        *data = LocalData {
            is_healthy: healthy,
            ..Default::default()
        };
    }

    /// Number of schedule entries stored.
    pub fn entry_count(&self) -> usize {
        self.data.read().unwrap().entries.len()
    }

    /// Number of courses stored.
    pub fn course_count(&self) -> usize {
        self.data.read().unwrap().courses.len()
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().unwrap().is_healthy {
            return Err(RepositoryError::ConnectionError(
                "Database is not healthy".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for LocalRepository {
    async fn insert_user(&self, user: &User) -> RepositoryResult<User> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        if data.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::ValidationError(format!(
                "Email already registered: {}",
                user.email
            )));
        }

        let id = UserId::new(data.next_user_id);
        data.next_user_id += 1;

        let mut stored = user.clone();
        stored.id = Some(id);
        data.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_user(&self, id: UserId) -> RepositoryResult<User> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        data.users
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("User {} not found", id)))
    }

    async fn list_lecturers(&self) -> RepositoryResult<Vec<User>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut lecturers: Vec<User> = data
            .users
            .values()
            .filter(|u| u.role == Role::Lecturer)
            .cloned()
            .collect();
        lecturers.sort_by_key(|u| u.id);
        Ok(lecturers)
    }

    async fn insert_course(&self, course: &Course) -> RepositoryResult<Course> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        // Referential invariant: the assigned user must be a lecturer.
        match data.users.get(&course.lecturer) {
            Some(user) if user.role == Role::Lecturer => {}
            Some(_) => {
                return Err(RepositoryError::ValidationError(
                    "Assigned user must be a lecturer".to_string(),
                ))
            }
            None => {
                return Err(RepositoryError::ValidationError(format!(
                    "Lecturer {} does not exist",
                    course.lecturer
                )))
            }
        }

        if data.courses.values().any(|c| c.code == course.code) {
            return Err(RepositoryError::ValidationError(format!(
                "Course code already exists: {}",
                course.code
            )));
        }

        let id = CourseId::new(data.next_course_id);
        data.next_course_id += 1;

        let mut stored = course.clone();
        stored.id = Some(id);
        data.courses.insert(id, stored.clone());
        data.course_order.push(id);
        Ok(stored)
    }

    async fn get_course(&self, id: CourseId) -> RepositoryResult<Course> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        data.courses
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Course {} not found", id)))
    }

    async fn courses_for_department(&self, department: &Department) -> RepositoryResult<Vec<Course>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .course_order
            .iter()
            .filter_map(|id| data.courses.get(id))
            .filter(|c| &c.department == department)
            .cloned()
            .collect())
    }

    async fn delete_course(&self, id: CourseId) -> RepositoryResult<bool> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        let existed = data.courses.remove(&id).is_some();
        if existed {
            data.course_order.retain(|c| *c != id);
        }
        Ok(existed)
    }

    async fn insert_classroom(&self, classroom: &Classroom) -> RepositoryResult<Classroom> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        let id = ClassroomId::new(data.next_classroom_id);
        data.next_classroom_id += 1;

        let mut stored = classroom.clone();
        stored.id = Some(id);
        data.classrooms.insert(id, stored.clone());
        data.classroom_order.push(id);
        Ok(stored)
    }

    async fn get_classroom(&self, id: ClassroomId) -> RepositoryResult<Classroom> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        data.classrooms
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Classroom {} not found", id)))
    }

    async fn list_classrooms(&self) -> RepositoryResult<Vec<Classroom>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .classroom_order
            .iter()
            .filter_map(|id| data.classrooms.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TimetableRepository for LocalRepository {
    async fn list_entries(&self) -> RepositoryResult<Vec<ScheduleEntry>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .entry_order
            .iter()
            .filter_map(|id| data.entries.get(id))
            .cloned()
            .collect())
    }

    async fn entries_for_courses(&self, courses: &[CourseId]) -> RepositoryResult<Vec<ScheduleEntry>> {
        self.check_health()?;
        let wanted: HashSet<CourseId> = courses.iter().copied().collect();
        let data = self.data.read().unwrap();
        Ok(data
            .entry_order
            .iter()
            .filter_map(|id| data.entries.get(id))
            .filter(|e| wanted.contains(&e.course))
            .cloned()
            .collect())
    }

    async fn insert_entry(&self, entry: &ScheduleEntry) -> RepositoryResult<ScheduleEntry> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        Ok(data.insert_entry_locked(entry))
    }

    async fn update_entry(&self, entry: &ScheduleEntry) -> RepositoryResult<ScheduleEntry> {
        self.check_health()?;
        let id = entry
            .id
            .ok_or_else(|| RepositoryError::ValidationError("Entry has no id".to_string()))?;

        let mut data = self.data.write().unwrap();
        match data.entries.get_mut(&id) {
            Some(stored) => {
                let created_at = stored.created_at;
                *stored = entry.clone();
                stored.created_at = created_at;
                Ok(stored.clone())
            }
            None => Err(RepositoryError::NotFound(format!("Entry {} not found", id))),
        }
    }

    async fn delete_entry(&self, id: EntryId) -> RepositoryResult<bool> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        Ok(data.remove_entry_locked(id))
    }

    async fn find_conflict(
        &self,
        lecturer: LecturerId,
        classroom: ClassroomId,
        day: Weekday,
        time: &TimeSlot,
        exclude: Option<EntryId>,
    ) -> RepositoryResult<Option<ScheduleEntry>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .entry_order
            .iter()
            .filter_map(|id| data.entries.get(id))
            .filter(|e| exclude.is_none() || e.id != exclude)
            .find(|e| {
                e.day == day
                    && &e.time == time
                    && (e.lecturer == lecturer || e.classroom == classroom)
            })
            .cloned())
    }

    async fn replace_department_entries(
        &self,
        courses: &[CourseId],
        entries: &[ScheduleEntry],
    ) -> RepositoryResult<usize> {
        self.check_health()?;
        let doomed: HashSet<CourseId> = courses.iter().copied().collect();

        // One write guard across delete+insert: readers see the old schedule
        // or the new one, never the gap in between.
        let mut data = self.data.write().unwrap();

        let old_ids: Vec<EntryId> = data
            .entries
            .values()
            .filter(|e| doomed.contains(&e.course))
            .filter_map(|e| e.id)
            .collect();
        for id in old_ids {
            data.remove_entry_locked(id);
        }

        for entry in entries {
            data.insert_entry_locked(entry);
        }
        Ok(entries.len())
    }
}

#[async_trait]
impl ResultsRepository for LocalRepository {
    async fn insert_result(&self, result: &ResultRecord) -> RepositoryResult<ResultRecord> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        if !data.users.contains_key(&result.student) {
            return Err(RepositoryError::ValidationError(format!(
                "Student {} does not exist",
                result.student
            )));
        }
        if !data.courses.contains_key(&result.course) {
            return Err(RepositoryError::ValidationError(format!(
                "Course {} does not exist",
                result.course
            )));
        }

        let id = ResultId::new(data.next_result_id);
        data.next_result_id += 1;

        let mut stored = result.clone();
        stored.id = Some(id);
        data.results.insert(id, stored.clone());
        Ok(stored)
    }

    async fn results_for_student(&self, student: UserId) -> RepositoryResult<Vec<ResultRecord>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut results: Vec<ResultRecord> = data
            .results
            .values()
            .filter(|r| r.student == student)
            .cloned()
            .collect();
        results.sort_by_key(|r| r.id);
        Ok(results)
    }

    async fn results_for_department(
        &self,
        department: &Department,
    ) -> RepositoryResult<Vec<ResultRecord>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let dept_courses: HashSet<CourseId> = data
            .courses
            .values()
            .filter(|c| &c.department == department)
            .filter_map(|c| c.id)
            .collect();
        let mut results: Vec<ResultRecord> = data
            .results
            .values()
            .filter(|r| dept_courses.contains(&r.course))
            .cloned()
            .collect();
        results.sort_by_key(|r| r.id);
        Ok(results)
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().unwrap().is_healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Level;

    fn dept() -> Department {
        Department::new("computer science")
    }

    #[tokio::test]
    async fn course_insert_requires_lecturer_role() {
        let repo = LocalRepository::new();
        let student = repo
            .insert_user(&User::student("Ada", "ada@school.edu", dept(), Level::Nd1))
            .await
            .unwrap();

        let course = Course::new("CSC101", "Intro", 3, dept(), student.id.unwrap(), vec![Level::Nd1]);
        let err = repo.insert_course(&course).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
    }

    #[tokio::test]
    async fn replace_swaps_only_the_given_courses() {
        let repo = LocalRepository::new();
        let lecturer = repo
            .insert_user(&User::lecturer("Bello", "bello@school.edu", dept()))
            .await
            .unwrap();
        let room = repo.insert_classroom(&Classroom::new("LT1", 80)).await.unwrap();

        let mine = repo
            .insert_course(&Course::new(
                "CSC101",
                "Intro",
                3,
                dept(),
                lecturer.id.unwrap(),
                vec![Level::Nd1],
            ))
            .await
            .unwrap();
        let other = repo
            .insert_course(&Course::new(
                "MTH101",
                "Algebra",
                2,
                Department::new("mathematics"),
                lecturer.id.unwrap(),
                vec![Level::Nd1],
            ))
            .await
            .unwrap();

        let slot = TimeSlot::new("08:00 - 10:00");
        for course in [&mine, &other] {
            repo.insert_entry(&ScheduleEntry::new(
                course.id.unwrap(),
                lecturer.id.unwrap(),
                room.id.unwrap(),
                Weekday::Monday,
                slot.clone(),
            ))
            .await
            .unwrap();
        }

        let replacement = ScheduleEntry::new(
            mine.id.unwrap(),
            lecturer.id.unwrap(),
            room.id.unwrap(),
            Weekday::Tuesday,
            slot.clone(),
        );
        let inserted = repo
            .replace_department_entries(&[mine.id.unwrap()], &[replacement])
            .await
            .unwrap();
        assert_eq!(inserted, 1);

        let all = repo.list_entries().await.unwrap();
        assert_eq!(all.len(), 2);
        let mine_after: Vec<_> = all.iter().filter(|e| e.course == mine.id.unwrap()).collect();
        assert_eq!(mine_after.len(), 1);
        assert_eq!(mine_after[0].day, Weekday::Tuesday);
        // The other department's entry was untouched.
        assert!(all
            .iter()
            .any(|e| e.course == other.id.unwrap() && e.day == Weekday::Monday));
    }

    #[tokio::test]
    async fn unhealthy_repository_reports_connection_errors() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        let err = repo.list_classrooms().await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError(_)));
        assert!(err.is_retryable());
    }
}
