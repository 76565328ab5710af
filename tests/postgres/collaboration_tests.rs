//! Collaboration flows persisted in `PostgreSQL`.

#![expect(
    clippy::panic_in_result_fn,
    reason = "Tests assert on outcomes while propagating setup failures with ?"
)]

use super::helpers::{postgres_services, unique_name};
use crate::test_helpers::{sign_up, study_group};
use chrono::{Duration, Utc};
use classcollab::group::domain::MembershipRole;
use classcollab::group::services::GroupChanges;
use classcollab::message::services::MessageServiceError;
use classcollab::task::domain::TaskStatus;
use classcollab::task::services::{CreateTaskRequest, TaskChanges, TaskServiceError};
use eyre::{WrapErr, eyre};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn group_members_share_tasks_and_messages() -> eyre::Result<()> {
    let Some(services) = postgres_services().await.map_err(|err| eyre!(err))? else {
        return Ok(());
    };
    let alice = sign_up(&services, &unique_name("alice")).await?;
    let bob = sign_up(&services, &unique_name("bob")).await?;
    let alice_id = alice.user.id();
    let bob_id = bob.user.id();

    let group = services
        .groups
        .create(alice_id, study_group("Databases"))
        .await
        .wrap_err("create group")?;
    services
        .groups
        .join(bob_id, &group.invite_code().as_str().to_lowercase())
        .await
        .wrap_err("join group")?;

    let detail = services.groups.detail(bob_id, group.id()).await?;
    let roles: Vec<_> = detail
        .members
        .iter()
        .map(|member| (member.id, member.role))
        .collect();
    assert_eq!(
        roles,
        vec![
            (alice_id, MembershipRole::Admin),
            (bob_id, MembershipRole::Member)
        ]
    );

    let task = services
        .tasks
        .create(
            alice_id,
            CreateTaskRequest::new(group.id(), "Normalize the schema")
                .with_description("Up to BCNF")
                .with_assignee(bob_id)
                .with_due_date(Utc::now() + Duration::days(2)),
        )
        .await
        .wrap_err("create task")?;
    let stored = services.tasks.get(bob_id, task.id()).await?;
    assert_eq!(stored.description(), "Up to BCNF");
    assert_eq!(stored.assigned_to(), Some(bob_id));

    let before = services.dashboard.stats_for(alice_id).await?;
    assert_eq!(before.upcoming_deadlines, 1);

    let done = services.tasks.mark_complete(bob_id, task.id()).await?;
    assert_eq!(done.status(), TaskStatus::Done);
    assert!(done.completed_at().is_some());

    let reopened = services
        .tasks
        .update(
            alice_id,
            task.id(),
            TaskChanges {
                status: Some(TaskStatus::InProgress),
                assigned_to: Some(None),
                ..TaskChanges::default()
            },
        )
        .await?;
    assert_eq!(reopened.completed_at(), None);
    assert_eq!(reopened.assigned_to(), None);

    let posted = services
        .messages
        .create(bob_id, group.id(), "Pushed my draft")
        .await?;
    assert_eq!(services.dashboard.stats_for(alice_id).await?.new_messages, 1);
    services.messages.mark_read(alice_id, posted.message.id()).await?;
    let listed = services.messages.list(bob_id, Some(group.id())).await?;
    assert_eq!(listed.len(), 1);
    assert!(listed.iter().all(|sent| sent.message.is_read()));
    assert_eq!(
        listed.first().map(|sent| sent.sender_name.clone()),
        Some(bob.user.username().clone())
    );

    let summaries = services.groups.list_for_user(alice_id).await?;
    let summary = summaries
        .iter()
        .find(|summary| summary.group.id() == group.id())
        .ok_or_else(|| eyre!("group missing from listing"))?;
    assert_eq!(summary.members_count, 2);
    assert_eq!(summary.tasks_count, 1);
    assert_eq!(summary.tasks_completed_count, 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_group_removes_its_content() -> eyre::Result<()> {
    let Some(services) = postgres_services().await.map_err(|err| eyre!(err))? else {
        return Ok(());
    };
    let alice = sign_up(&services, &unique_name("alice")).await?;
    let alice_id = alice.user.id();
    let group = services
        .groups
        .create(alice_id, study_group("Compilers"))
        .await?;
    services
        .groups
        .update(
            alice_id,
            group.id(),
            GroupChanges {
                semester: Some("Fall 2026".to_owned()),
                ..GroupChanges::default()
            },
        )
        .await?;
    let task = services
        .tasks
        .create(alice_id, CreateTaskRequest::new(group.id(), "Lexer"))
        .await?;
    let posted = services
        .messages
        .create(alice_id, group.id(), "Starting tonight")
        .await?;

    services.groups.delete(alice_id, group.id()).await?;

    assert!(matches!(
        services.tasks.get(alice_id, task.id()).await,
        Err(TaskServiceError::NotFound(_))
    ));
    assert!(matches!(
        services.messages.get(alice_id, posted.message.id()).await,
        Err(MessageServiceError::NotFound(_))
    ));
    assert!(services.groups.list_for_user(alice_id).await?.is_empty());
    Ok(())
}
