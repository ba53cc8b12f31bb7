//! Service-layer tests: timetable views, the manual entry path and grading.

mod support;

use acadsched::db::repositories::LocalRepository;
use acadsched::db::repository::{
    CatalogRepository, RepositoryError, ResultsRepository, TimetableRepository,
};
use acadsched::models::{
    Department, Level, ResultRecord, SlotGrid, TimeSlot, User, Weekday,
};
use acadsched::scheduler::TimetableGenerator;
use acadsched::services;

use support::{seed_classrooms, seed_department};

#[tokio::test]
async fn timetable_view_resolves_names() {
    let repo = LocalRepository::new();
    let seeded = seed_department(&repo, "computer science", 3, 2).await;
    seed_classrooms(&repo, 4).await;

    TimetableGenerator::default()
        .generate_seeded(&repo, &seeded.department, 21)
        .await
        .unwrap();

    let grid = SlotGrid::default();
    let view = services::department_timetable(&repo, &seeded.department, &grid)
        .await
        .unwrap();

    assert_eq!(view.entries.len(), 3);
    assert_eq!(view.days.len(), 5);
    assert_eq!(view.times.len(), 4);
    for entry in &view.entries {
        assert!(entry.course_code.starts_with("COMPUTERSCIENCE"));
        assert!(entry.lecturer_name.starts_with("Lecturer"));
        assert!(entry.classroom_name.starts_with("LT"));
    }

    // Every entry is addressable through its grid cell.
    let total: usize = grid
        .days
        .iter()
        .flat_map(|day| grid.times.iter().map(move |time| (day, time)))
        .map(|(day, time)| view.cell(*day, time).len())
        .sum();
    assert_eq!(total, 3);
}

#[tokio::test]
async fn timetable_view_requires_courses() {
    let repo = LocalRepository::new();
    let err = services::department_timetable(
        &repo,
        &Department::new("ghost department"),
        &SlotGrid::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}

#[tokio::test]
async fn manual_add_rejects_taken_slots() {
    let repo = LocalRepository::new();
    let seeded = seed_department(&repo, "computer science", 2, 1).await;
    let rooms = seed_classrooms(&repo, 2).await;

    let slot = TimeSlot::new("08:00 - 10:00");
    services::add_entry(&repo, seeded.course_ids[0], rooms[0], Weekday::Monday, slot.clone())
        .await
        .unwrap();

    // Same lecturer (course 2 shares the single lecturer), same slot.
    let err = services::add_entry(
        &repo,
        seeded.course_ids[1],
        rooms[1],
        Weekday::Monday,
        slot.clone(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError(_)));

    // A different band is fine.
    services::add_entry(
        &repo,
        seeded.course_ids[1],
        rooms[1],
        Weekday::Monday,
        TimeSlot::new("10:00 - 12:00"),
    )
    .await
    .unwrap();
    assert_eq!(repo.list_entries().await.unwrap().len(), 2);
}

#[tokio::test]
async fn manual_move_excludes_itself_from_conflict_checks() {
    let repo = LocalRepository::new();
    let seeded = seed_department(&repo, "computer science", 1, 1).await;
    let rooms = seed_classrooms(&repo, 2).await;

    let slot = TimeSlot::new("08:00 - 10:00");
    let entry = services::add_entry(&repo, seeded.course_ids[0], rooms[0], Weekday::Monday, slot.clone())
        .await
        .unwrap();

    // Moving the entry to its own slot in another room must not collide
    // with itself.
    let moved = services::move_entry(
        &repo,
        entry.id.unwrap(),
        seeded.course_ids[0],
        rooms[1],
        Weekday::Monday,
        slot,
    )
    .await
    .unwrap();
    assert_eq!(moved.classroom, rooms[1]);
    assert_eq!(repo.list_entries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn manual_delete_reports_whether_anything_was_removed() {
    let repo = LocalRepository::new();
    let seeded = seed_department(&repo, "computer science", 1, 1).await;
    let rooms = seed_classrooms(&repo, 1).await;

    let entry = services::add_entry(
        &repo,
        seeded.course_ids[0],
        rooms[0],
        Weekday::Friday,
        TimeSlot::new("14:00 - 16:00"),
    )
    .await
    .unwrap();

    assert!(services::remove_entry(&repo, entry.id.unwrap()).await.unwrap());
    assert!(!services::remove_entry(&repo, entry.id.unwrap()).await.unwrap());
}

#[tokio::test]
async fn gpa_is_unit_weighted_and_department_scoped() {
    let repo = LocalRepository::new();
    let cs = seed_department(&repo, "computer science", 2, 1).await;
    let mc = seed_department(&repo, "mass communication", 1, 1).await;

    let student = repo
        .insert_user(&User::student("Ada", "ada@school.edu", cs.department.clone(), Level::Nd1))
        .await
        .unwrap();
    let student_id = student.id.unwrap();

    // Seeded units are 2 then 3 (2 + (i % 3)).
    // Course 1: unit 2, score 75 -> A (5 points).
    // Course 2: unit 3, score 52 -> C (3 points).
    repo.insert_result(&ResultRecord::from_score(student_id, cs.course_ids[0], 75.0))
        .await
        .unwrap();
    repo.insert_result(&ResultRecord::from_score(student_id, cs.course_ids[1], 52.0))
        .await
        .unwrap();
    // Out-of-department result must not move the GPA.
    repo.insert_result(&ResultRecord::from_score(student_id, mc.course_ids[0], 100.0))
        .await
        .unwrap();

    let report = services::calculate_gpa(&repo, student_id, &cs.department)
        .await
        .unwrap();
    // (2*5 + 3*3) / (2 + 3) = 19 / 5 = 3.8
    assert_eq!(report.gpa, 3.8);
    assert_eq!(report.total_units, 5);

    // No results in this department at all: GPA 0.0.
    let empty = services::calculate_gpa(&repo, student_id, &Department::new("physics"))
        .await
        .unwrap();
    assert_eq!(empty.gpa, 0.0);
    assert_eq!(empty.total_units, 0);
}

#[tokio::test]
async fn analysis_splits_passes_and_failures_at_the_pass_mark() {
    let repo = LocalRepository::new();
    let cs = seed_department(&repo, "computer science", 1, 1).await;

    let names = ["Ada", "Bisi", "Chidi"];
    let scores = [40.0, 39.9, 71.0];
    for (name, score) in names.iter().zip(scores.iter()) {
        let student = repo
            .insert_user(&User::student(
                *name,
                format!("{}@school.edu", name.to_lowercase()),
                cs.department.clone(),
                Level::Nd1,
            ))
            .await
            .unwrap();
        repo.insert_result(&ResultRecord::from_score(
            student.id.unwrap(),
            cs.course_ids[0],
            *score,
        ))
        .await
        .unwrap();
    }

    let analysis = services::results_analysis(&repo, &cs.department).await.unwrap();
    assert_eq!(analysis.total, 3);
    assert_eq!(analysis.passed, 2, "a score equal to the pass mark passes");
    assert_eq!(analysis.failed, 1);
    assert_eq!(analysis.failed_rows[0].student_name, "Bisi");
    assert_eq!(analysis.pass_mark, 40.0);
}
