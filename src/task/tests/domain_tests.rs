//! Unit tests for task domain values and status transitions.

use crate::group::domain::GroupId;
use crate::task::domain::{Task, TaskDetails, TaskDomainError, TaskStatus, TaskTitle};
use crate::test_support::FixedClock;
use chrono::Duration;
use mockable::Clock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> FixedClock {
    FixedClock::default()
}

fn titled(title: &str) -> TaskDetails {
    TaskDetails {
        title: TaskTitle::new(title).expect("valid title"),
        description: String::new(),
        status: TaskStatus::Todo,
        due_date: None,
        assigned_to: None,
    }
}

fn with_status(title: &str, status: TaskStatus) -> TaskDetails {
    TaskDetails {
        status,
        ..titled(title)
    }
}

#[rstest]
#[case("TODO", TaskStatus::Todo)]
#[case("in_progress", TaskStatus::InProgress)]
#[case(" Done ", TaskStatus::Done)]
fn status_parses_case_insensitively(#[case] raw: &str, #[case] expected: TaskStatus) {
    assert_eq!(TaskStatus::try_from(raw), Ok(expected));
}

#[rstest]
fn status_rejects_unknown_values() {
    assert!(TaskStatus::try_from("BLOCKED").is_err());
}

#[rstest]
fn only_done_is_closed() {
    assert!(TaskStatus::Todo.is_open());
    assert!(TaskStatus::InProgress.is_open());
    assert!(!TaskStatus::Done.is_open());
    assert_eq!(TaskStatus::default(), TaskStatus::Todo);
}

#[rstest]
#[case("", TaskDomainError::EmptyTitle)]
#[case("   ", TaskDomainError::EmptyTitle)]
fn title_must_not_be_blank(#[case] raw: &str, #[case] expected: TaskDomainError) {
    assert_eq!(TaskTitle::new(raw), Err(expected));
}

#[rstest]
fn title_is_trimmed_and_bounded() {
    let title = TaskTitle::new("  Read chapter 3 ").expect("valid title");
    assert_eq!(title.as_str(), "Read chapter 3");
    assert_eq!(
        TaskTitle::new("t".repeat(201)),
        Err(TaskDomainError::TitleTooLong)
    );
    assert!(TaskTitle::new("t".repeat(200)).is_ok());
}

#[rstest]
fn new_open_task_has_no_completion_time(clock: FixedClock) {
    let task = Task::new(GroupId::new(), titled("Outline"), &clock);

    assert_eq!(task.status(), TaskStatus::Todo);
    assert_eq!(task.created_at(), clock.utc());
    assert_eq!(task.completed_at(), None);
}

#[rstest]
fn task_created_done_is_stamped_complete(clock: FixedClock) {
    let task = Task::new(
        GroupId::new(),
        with_status("Outline", TaskStatus::Done),
        &clock,
    );

    assert_eq!(task.completed_at(), Some(clock.utc()));
}

#[rstest]
fn moving_to_done_stamps_completion_once(clock: FixedClock) {
    let mut task = Task::new(GroupId::new(), titled("Outline"), &clock);
    clock.advance(Duration::hours(1));
    task.revise(with_status("Outline", TaskStatus::Done), &clock);
    let first_completion = clock.utc();
    assert_eq!(task.completed_at(), Some(first_completion));

    clock.advance(Duration::hours(1));
    task.revise(with_status("Outline v2", TaskStatus::Done), &clock);

    assert_eq!(task.title().as_str(), "Outline v2");
    assert_eq!(task.completed_at(), Some(first_completion));
}

#[rstest]
#[case(TaskStatus::Todo)]
#[case(TaskStatus::InProgress)]
fn reopening_clears_completion(clock: FixedClock, #[case] reopened: TaskStatus) {
    let mut task = Task::new(
        GroupId::new(),
        with_status("Outline", TaskStatus::Done),
        &clock,
    );

    task.revise(with_status("Outline", reopened), &clock);

    assert_eq!(task.status(), reopened);
    assert_eq!(task.completed_at(), None);
}

#[rstest]
fn mark_complete_always_restamps(clock: FixedClock) {
    let mut task = Task::new(
        GroupId::new(),
        with_status("Outline", TaskStatus::Done),
        &clock,
    );
    clock.advance(Duration::minutes(30));

    task.mark_complete(&clock);

    assert_eq!(task.status(), TaskStatus::Done);
    assert_eq!(task.completed_at(), Some(clock.utc()));
}

#[rstest]
fn details_round_trip_through_revise(clock: FixedClock) {
    let details = TaskDetails {
        description: "Chapters 1-3".to_owned(),
        status: TaskStatus::InProgress,
        due_date: Some(clock.utc() + Duration::days(2)),
        ..titled("Summary")
    };
    let mut task = Task::new(GroupId::new(), details.clone(), &clock);

    task.revise(task.details(), &clock);

    assert_eq!(task.details(), details);
}
