//! Then steps for study group scenarios.

use super::world::{StudyGroupWorld, run_async};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::then;

#[then(r#""{student}" is an admin of the group"#)]
fn is_admin(world: &StudyGroupWorld, student: String) -> Result<(), eyre::Report> {
    if admin_flag(world, &student)? {
        Ok(())
    } else {
        Err(eyre!("expected {student} to be an admin"))
    }
}

#[then(r#""{student}" is not an admin of the group"#)]
fn is_not_admin(world: &StudyGroupWorld, student: String) -> Result<(), eyre::Report> {
    if admin_flag(world, &student)? {
        Err(eyre!("expected {student} not to be an admin"))
    } else {
        Ok(())
    }
}

fn admin_flag(world: &StudyGroupWorld, student: &str) -> Result<bool, eyre::Report> {
    let user_id = world.student(student)?.id();
    let group_id = world.group()?.id();
    run_async(world.services.groups.access().is_admin(user_id, group_id))
        .wrap_err("check admin role")
}

#[then(r#""{student}" is a member of the group"#)]
fn is_member(world: &StudyGroupWorld, student: String) -> Result<(), eyre::Report> {
    let user_id = world.student(&student)?.id();
    let group_id = world.group()?.id();
    let member = run_async(world.services.groups.access().is_member(user_id, group_id))
        .wrap_err("check membership")?;
    if member {
        Ok(())
    } else {
        Err(eyre!("expected {student} to be a member"))
    }
}

#[then("the group member count is {count}")]
fn member_count(world: &StudyGroupWorld, count: usize) -> Result<(), eyre::Report> {
    let group_id = world.group()?.id();
    let detail = run_async(world.services.groups.detail(world.creator()?, group_id))
        .wrap_err("load group detail")?;
    if detail.members.len() == count {
        Ok(())
    } else {
        Err(eyre!(
            "expected {count} members, found {}",
            detail.members.len()
        ))
    }
}

#[then("the group message count is {count}")]
fn message_count(world: &StudyGroupWorld, count: usize) -> Result<(), eyre::Report> {
    let group_id = world.group()?.id();
    let messages = run_async(
        world
            .services
            .messages
            .list(world.creator()?, Some(group_id)),
    )
    .wrap_err("list messages")?;
    if messages.len() == count {
        Ok(())
    } else {
        Err(eyre!("expected {count} messages, found {}", messages.len()))
    }
}

#[then(r#"the request is rejected with "{message}""#)]
fn rejected_with(world: &StudyGroupWorld, message: String) -> Result<(), eyre::Report> {
    match world.rejection.as_deref() {
        Some(actual) if actual == message => Ok(()),
        Some(actual) => Err(eyre!("expected rejection {message:?}, got {actual:?}")),
        None => Err(eyre!("expected rejection {message:?}, but the request succeeded")),
    }
}

#[then(r#"the task status is "{status}""#)]
fn task_status(world: &StudyGroupWorld, status: String) -> Result<(), eyre::Report> {
    let actual = world.task()?.status();
    if actual.as_str() == status {
        Ok(())
    } else {
        Err(eyre!("expected status {status}, found {}", actual.as_str()))
    }
}

#[then(r#"the "{counter}" counter for "{student}" is {value}"#)]
fn dashboard_counter(
    world: &StudyGroupWorld,
    counter: String,
    student: String,
    value: u64,
) -> Result<(), eyre::Report> {
    let user_id = world.student(&student)?.id();
    let stats = run_async(world.services.dashboard.stats_for(user_id))
        .wrap_err("load dashboard")?;
    let actual = match counter.as_str() {
        "active_groups" => stats.active_groups,
        "upcoming_deadlines" => stats.upcoming_deadlines,
        "new_messages" => stats.new_messages,
        "tasks_completed" => stats.tasks_completed,
        other => return Err(eyre!("unknown dashboard counter {other}")),
    };
    if actual == value {
        Ok(())
    } else {
        Err(eyre!("expected {counter} = {value} for {student}, found {actual}"))
    }
}
