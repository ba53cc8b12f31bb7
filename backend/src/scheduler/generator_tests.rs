use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::*;
use crate::models::Level;
use crate::scheduler::conflicts::{find_conflicts, is_conflict_free};

fn dept() -> Department {
    Department::new("computer science")
}

fn course(id: i64, code: &str, lecturer: i64) -> Course {
    let mut c = Course::new(code, code, 3, dept(), LecturerId::new(lecturer), vec![Level::Nd1]);
    c.id = Some(CourseId::new(id));
    c
}

fn classroom(id: i64, name: &str) -> Classroom {
    let mut room = Classroom::new(name, 60);
    room.id = Some(ClassroomId::new(id));
    room
}

fn grid(days: &[Weekday], times: &[&str]) -> SlotGrid {
    SlotGrid::new(days.to_vec(), times.iter().map(|t| TimeSlot::new(*t)).collect())
}

fn config_with(grid: SlotGrid) -> GeneratorConfig {
    GeneratorConfig {
        grid,
        max_random_attempts: 64,
    }
}

#[test]
fn places_every_course_without_conflicts() {
    let courses: Vec<Course> = (1..=5)
        .map(|i| course(i, &format!("CSC10{}", i), 1 + (i % 3)))
        .collect();
    let rooms: Vec<Classroom> = (1..=8).map(|i| classroom(i, &format!("LT{}", i))).collect();

    let mut rng = SmallRng::seed_from_u64(42);
    let staged = place_courses(&courses, &rooms, &[], &GeneratorConfig::default(), &mut rng).unwrap();

    assert_eq!(staged.len(), 5);
    assert!(is_conflict_free(&staged));
}

#[test]
fn batch_never_double_books_itself() {
    // One lecturer teaching everything: every placement must land on a
    // distinct (day, time).
    let courses: Vec<Course> = (1..=10).map(|i| course(i, &format!("CSC{}", i), 1)).collect();
    let rooms = vec![classroom(1, "LT1"), classroom(2, "LT2")];

    let mut rng = SmallRng::seed_from_u64(7);
    let staged = place_courses(&courses, &rooms, &[], &GeneratorConfig::default(), &mut rng).unwrap();

    assert_eq!(staged.len(), 10);
    assert!(find_conflicts(&staged).is_empty());
}

#[test]
fn exhaustive_sweep_rescues_tight_grids() {
    // Two courses, one lecturer, a 1x2 grid: random draws may keep hitting
    // the taken slot, the sweep must still find the free one.
    let courses = vec![course(1, "CSC101", 1), course(2, "CSC102", 1)];
    let rooms = vec![classroom(1, "LT1")];
    let tight = config_with(grid(&[Weekday::Monday], &["08:00 - 10:00", "10:00 - 12:00"]));

    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let staged = place_courses(&courses, &rooms, &[], &tight, &mut rng).unwrap();
        assert_eq!(staged.len(), 2);
        assert!(is_conflict_free(&staged));
    }
}

#[test]
fn overfull_lecturer_is_infeasible() {
    let courses = vec![course(1, "CSC101", 1), course(2, "CSC102", 1)];
    let rooms = vec![classroom(1, "LT1"), classroom(2, "LT2")];
    let tiny = config_with(grid(&[Weekday::Monday], &["08:00 - 10:00"]));

    let mut rng = SmallRng::seed_from_u64(3);
    let err = place_courses(&courses, &rooms, &[], &tiny, &mut rng).unwrap_err();
    match err {
        GenerationError::Infeasible { course } => assert_eq!(course, "CSC102"),
        other => panic!("Expected Infeasible, got {:?}", other),
    }
}

#[test]
fn no_classrooms_is_infeasible() {
    let courses = vec![course(1, "CSC101", 1)];
    let mut rng = SmallRng::seed_from_u64(1);
    let err = place_courses(&courses, &[], &[], &GeneratorConfig::default(), &mut rng).unwrap_err();
    assert!(matches!(err, GenerationError::Infeasible { .. }));
}

#[test]
fn retained_entries_constrain_placement() {
    // Another department already holds the lecturer on Monday 08:00.
    let retained = vec![ScheduleEntry::new(
        CourseId::new(99),
        LecturerId::new(1),
        ClassroomId::new(5),
        Weekday::Monday,
        TimeSlot::new("08:00 - 10:00"),
    )];
    let courses = vec![course(1, "CSC101", 1)];
    let rooms = vec![classroom(1, "LT1")];
    let tight = config_with(grid(&[Weekday::Monday], &["08:00 - 10:00", "10:00 - 12:00"]));

    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let staged = place_courses(&courses, &rooms, &retained, &tight, &mut rng).unwrap();
        assert_eq!(staged[0].time, TimeSlot::new("10:00 - 12:00"));
    }
}

#[test]
fn same_seed_reproduces_the_schedule() {
    let courses: Vec<Course> = (1..=6)
        .map(|i| course(i, &format!("CSC{}", i), 1 + (i % 2)))
        .collect();
    let rooms: Vec<Classroom> = (1..=4).map(|i| classroom(i, &format!("LT{}", i))).collect();

    let mut first_rng = SmallRng::seed_from_u64(1234);
    let mut second_rng = SmallRng::seed_from_u64(1234);
    let first =
        place_courses(&courses, &rooms, &[], &GeneratorConfig::default(), &mut first_rng).unwrap();
    let second =
        place_courses(&courses, &rooms, &[], &GeneratorConfig::default(), &mut second_rng).unwrap();

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.course, b.course);
        assert_eq!(a.classroom, b.classroom);
        assert_eq!(a.day, b.day);
        assert_eq!(a.time, b.time);
    }
}
