#![allow(dead_code)]

use acadsched::db::repositories::LocalRepository;
use acadsched::db::repository::CatalogRepository;
use acadsched::models::{
    Classroom, ClassroomId, Course, CourseId, Department, Level, User, UserId,
};

/// Ids produced by [`seed_department`].
pub struct SeededDepartment {
    pub department: Department,
    pub lecturer_ids: Vec<UserId>,
    pub course_ids: Vec<CourseId>,
}

/// Seed `course_count` courses for a department, assigned round-robin to
/// `lecturer_count` lecturers.
pub async fn seed_department(
    repo: &LocalRepository,
    name: &str,
    course_count: usize,
    lecturer_count: usize,
) -> SeededDepartment {
    let department = Department::new(name);
    let prefix: String = department
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    let mut lecturer_ids = Vec::with_capacity(lecturer_count);
    for i in 0..lecturer_count {
        let lecturer = repo
            .insert_user(&User::lecturer(
                format!("Lecturer {} {}", prefix, i + 1),
                format!("lecturer.{}.{}@school.edu", prefix, i + 1),
                department.clone(),
            ))
            .await
            .expect("seed lecturer");
        lecturer_ids.push(lecturer.id.expect("lecturer id"));
    }

    let mut course_ids = Vec::with_capacity(course_count);
    for i in 0..course_count {
        let lecturer = lecturer_ids[i % lecturer_ids.len()];
        let course = repo
            .insert_course(&Course::new(
                format!("{}{}", prefix.to_uppercase(), 101 + i),
                format!("Course {} {}", prefix, i + 1),
                2 + (i % 3) as u8,
                department.clone(),
                lecturer,
                vec![Level::Nd1],
            ))
            .await
            .expect("seed course");
        course_ids.push(course.id.expect("course id"));
    }

    SeededDepartment {
        department,
        lecturer_ids,
        course_ids,
    }
}

/// Seed `count` classrooms and return their ids.
pub async fn seed_classrooms(repo: &LocalRepository, count: usize) -> Vec<ClassroomId> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let room = repo
            .insert_classroom(&Classroom::new(format!("LT{}", i + 1), 60 + (i as u32 * 10)))
            .await
            .expect("seed classroom");
        ids.push(room.id.expect("classroom id"));
    }
    ids
}
