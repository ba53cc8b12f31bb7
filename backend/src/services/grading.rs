//! Grading, GPA and department result analysis.

use std::collections::HashMap;

use crate::api::{GpaReport, ResultRow, ResultsAnalysis};
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{Course, CourseId, Department, User, UserId, PASS_MARK};

/// Unit-weighted GPA for one student within one department.
///
/// Results for courses outside the department are ignored; a student with no
/// graded units in the department gets 0.0. The value is rounded to two
/// decimals like the transcripts it feeds.
pub async fn calculate_gpa(
    repo: &dyn FullRepository,
    student: UserId,
    department: &Department,
) -> RepositoryResult<GpaReport> {
    let user = repo.get_user(student).await?;
    let results = repo.results_for_student(student).await?;

    let mut total_points: u32 = 0;
    let mut total_units: u32 = 0;
    let mut courses: HashMap<CourseId, Course> = HashMap::new();

    for result in &results {
        if !courses.contains_key(&result.course) {
            let course = repo.get_course(result.course).await?;
            courses.insert(result.course, course);
        }
        let course = &courses[&result.course];

        if &course.department != department {
            continue;
        }
        total_points += u32::from(course.unit) * u32::from(result.grade.points());
        total_units += u32::from(course.unit);
    }

    let gpa = if total_units == 0 {
        0.0
    } else {
        let raw = f64::from(total_points) / f64::from(total_units);
        (raw * 100.0).round() / 100.0
    };

    Ok(GpaReport {
        student_name: user.name,
        department: department.clone(),
        gpa,
        total_units,
    })
}

/// Pass/fail analysis of a department's results at [`PASS_MARK`].
///
/// Only results belonging to students registered in the department are
/// counted, matching how lecturers pull the report per department.
pub async fn results_analysis(
    repo: &dyn FullRepository,
    department: &Department,
) -> RepositoryResult<ResultsAnalysis> {
    let results = repo.results_for_department(department).await?;

    let mut students: HashMap<UserId, User> = HashMap::new();
    let mut courses: HashMap<CourseId, Course> = HashMap::new();
    let mut passed_rows = Vec::new();
    let mut failed_rows = Vec::new();

    for result in &results {
        if !students.contains_key(&result.student) {
            let user = repo.get_user(result.student).await?;
            students.insert(result.student, user);
        }
        let student = &students[&result.student];

        if student.department.as_ref() != Some(department) {
            continue;
        }
        let student_name = student.name.clone();
        let student_level = student.level;

        if !courses.contains_key(&result.course) {
            let course = repo.get_course(result.course).await?;
            courses.insert(result.course, course);
        }
        let course = &courses[&result.course];

        let row = ResultRow {
            student_name,
            student_level,
            course_code: course.code.clone(),
            course_title: course.title.clone(),
            score: result.score,
            grade: result.grade,
        };

        if result.score >= PASS_MARK {
            passed_rows.push(row);
        } else {
            failed_rows.push(row);
        }
    }

    Ok(ResultsAnalysis {
        department: department.clone(),
        pass_mark: PASS_MARK,
        total: passed_rows.len() + failed_rows.len(),
        passed: passed_rows.len(),
        failed: failed_rows.len(),
        passed_rows,
        failed_rows,
    })
}
