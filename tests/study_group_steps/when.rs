//! When steps for study group scenarios.

use super::world::{StudyGroupWorld, run_async};
use classcollab::group::services::{GroupChanges, GroupFields};
use eyre::eyre;
use rstest_bdd_macros::when;

#[when(r#""{student}" creates the group "{name}""#)]
fn create_group(
    world: &mut StudyGroupWorld,
    student: String,
    name: String,
) -> Result<(), eyre::Report> {
    let creator = world.student(&student)?.id();
    let fields = GroupFields {
        name,
        description: "Weekly problem sets".to_owned(),
        subject: "Algorithms".to_owned(),
        semester: "Spring 2026".to_owned(),
    };
    match run_async(world.services.groups.create(creator, fields)) {
        Ok(group) => {
            world.group = Some(group);
            world.creator = Some(creator);
        }
        Err(err) => world.reject(err),
    }
    Ok(())
}

#[when(r#""{student}" joins using the group invite code in lower case"#)]
fn join_with_group_code(world: &mut StudyGroupWorld, student: String) -> Result<(), eyre::Report> {
    let code = world.group()?.invite_code().as_str().to_lowercase();
    join(world, &student, &code)
}

#[when(r#""{student}" joins using the invite code "{code}""#)]
fn join_with_code(
    world: &mut StudyGroupWorld,
    student: String,
    code: String,
) -> Result<(), eyre::Report> {
    join(world, &student, &code)
}

fn join(world: &mut StudyGroupWorld, student: &str, code: &str) -> Result<(), eyre::Report> {
    let member = world.student(student)?.id();
    if let Err(err) = run_async(world.services.groups.join(member, code)) {
        world.reject(err);
    }
    Ok(())
}

#[when(r#""{student}" posts "{content}" to the group"#)]
fn post_message(
    world: &mut StudyGroupWorld,
    student: String,
    content: String,
) -> Result<(), eyre::Report> {
    let sender = world.student(&student)?.id();
    let group_id = world.group()?.id();
    match run_async(world.services.messages.create(sender, group_id, content)) {
        Ok(sent) => world.latest_message = Some(sent.message.id()),
        Err(err) => world.reject(err),
    }
    Ok(())
}

#[when(r#""{student}" renames the group to "{name}""#)]
fn rename_group(
    world: &mut StudyGroupWorld,
    student: String,
    name: String,
) -> Result<(), eyre::Report> {
    let editor = world.student(&student)?.id();
    let group_id = world.group()?.id();
    let changes = GroupChanges {
        name: Some(name),
        ..GroupChanges::default()
    };
    if let Err(err) = run_async(world.services.groups.update(editor, group_id, changes)) {
        world.reject(err);
    }
    Ok(())
}

#[when(r#""{student}" marks the task complete"#)]
fn mark_task_complete(world: &mut StudyGroupWorld, student: String) -> Result<(), eyre::Report> {
    let member = world.student(&student)?.id();
    let task_id = world.task()?.id();
    match run_async(world.services.tasks.mark_complete(member, task_id)) {
        Ok(task) => world.task = Some(task),
        Err(err) => world.reject(err),
    }
    Ok(())
}

#[when(r#""{student}" marks the latest message as read"#)]
fn mark_latest_read(world: &mut StudyGroupWorld, student: String) -> Result<(), eyre::Report> {
    let reader = world.student(&student)?.id();
    let message_id = world
        .latest_message
        .ok_or_else(|| eyre!("no message posted in this scenario"))?;
    if let Err(err) = run_async(world.services.messages.mark_read(reader, message_id)) {
        world.reject(err);
    }
    Ok(())
}
