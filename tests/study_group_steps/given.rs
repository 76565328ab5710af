//! Given steps for study group scenarios.

use super::world::{StudyGroupWorld, run_async};
use chrono::{Duration, Utc};
use classcollab::group::services::GroupFields;
use classcollab::identity::services::RegisterRequest;
use classcollab::task::services::CreateTaskRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a registered student "{name}""#)]
fn registered_student(world: &mut StudyGroupWorld, name: String) -> Result<(), eyre::Report> {
    let request = RegisterRequest::new(name.as_str(), format!("{name}@uni.edu"), "pw", "pw");
    let user = run_async(world.services.accounts.register(request))
        .wrap_err_with(|| format!("register {name}"))?;
    world.students.insert(name, user);
    Ok(())
}

#[given(r#""{student}" has created the group "{name}""#)]
fn created_group(
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
    let group = run_async(world.services.groups.create(creator, fields))
        .wrap_err("create group")?;
    world.group = Some(group);
    world.creator = Some(creator);
    Ok(())
}

#[given(r#""{student}" has joined the group"#)]
fn joined_group(world: &mut StudyGroupWorld, student: String) -> Result<(), eyre::Report> {
    let member = world.student(&student)?.id();
    let code = world.group()?.invite_code().clone();
    run_async(world.services.groups.join(member, code.as_str()))
        .wrap_err_with(|| format!("{student} joins"))?;
    Ok(())
}

#[given(r#""{student}" has added the task "{title}" due in {days} days"#)]
fn added_task(
    world: &mut StudyGroupWorld,
    student: String,
    title: String,
    days: i64,
) -> Result<(), eyre::Report> {
    let creator = world.student(&student)?.id();
    let request = CreateTaskRequest::new(world.group()?.id(), title)
        .with_due_date(Utc::now() + Duration::days(days));
    let task = run_async(world.services.tasks.create(creator, request)).wrap_err("create task")?;
    world.task = Some(task);
    Ok(())
}
