//! Non-members are refused everywhere and nothing changes on refusal.

#![expect(
    clippy::panic_in_result_fn,
    reason = "Tests assert on outcomes while propagating setup failures with ?"
)]

use crate::test_helpers::{MemoryServices, in_memory_services, sign_up, study_group};
use classcollab::dashboard::DashboardStats;
use classcollab::group::{
    domain::Group,
    services::{AccessError, GroupChanges, GroupServiceError},
};
use classcollab::identity::domain::UserId;
use classcollab::message::services::{MessageChanges, MessageServiceError};
use classcollab::task::{
    domain::TaskStatus,
    services::{CreateTaskRequest, TaskChanges, TaskServiceError},
};
use rstest::rstest;

struct Setup {
    services: MemoryServices,
    group: Group,
    member: UserId,
    outsider: UserId,
}

async fn setup() -> eyre::Result<Setup> {
    let services = in_memory_services();
    let member = sign_up(&services, "alice").await?.user.id();
    let outsider = sign_up(&services, "mallory").await?.user.id();
    let group = services
        .groups
        .create(member, study_group("Private Club"))
        .await?;
    Ok(Setup {
        services,
        group,
        member,
        outsider,
    })
}

const fn forbidden_task(err: &TaskServiceError) -> bool {
    matches!(err, TaskServiceError::Access(AccessError::NotMember { .. }))
}

const fn forbidden_message(err: &MessageServiceError) -> bool {
    matches!(
        err,
        MessageServiceError::Access(AccessError::NotMember { .. })
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsider_task_mutations_are_refused_without_side_effects() -> eyre::Result<()> {
    let Setup {
        services,
        group,
        member,
        outsider,
    } = setup().await?;
    let task = services
        .tasks
        .create(member, CreateTaskRequest::new(group.id(), "Secret plan"))
        .await?;
    let before = services.groups.detail(member, group.id()).await?;

    let create = services
        .tasks
        .create(outsider, CreateTaskRequest::new(group.id(), "Injected"))
        .await;
    let update = services
        .tasks
        .update(
            outsider,
            task.id(),
            TaskChanges {
                status: Some(TaskStatus::Done),
                ..TaskChanges::default()
            },
        )
        .await;
    let complete = services.tasks.mark_complete(outsider, task.id()).await;
    let delete = services.tasks.delete(outsider, task.id()).await;

    assert!(create.as_ref().is_err_and(forbidden_task));
    assert!(update.as_ref().is_err_and(forbidden_task));
    assert!(complete.as_ref().is_err_and(forbidden_task));
    assert!(delete.as_ref().is_err_and(forbidden_task));

    let after = services.groups.detail(member, group.id()).await?;
    assert_eq!(after, before);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsider_message_mutations_are_refused_without_side_effects() -> eyre::Result<()> {
    let Setup {
        services,
        group,
        member,
        outsider,
    } = setup().await?;
    let sent = services
        .messages
        .create(member, group.id(), "members only")
        .await?;
    let id = sent.message.id();

    let create = services.messages.create(outsider, group.id(), "hi").await;
    let update = services
        .messages
        .update(outsider, id, MessageChanges { is_read: Some(true) })
        .await;
    let read = services.messages.mark_read(outsider, id).await;
    let delete = services.messages.delete(outsider, id).await;

    assert!(create.as_ref().is_err_and(forbidden_message));
    assert!(update.as_ref().is_err_and(forbidden_message));
    assert!(read.as_ref().is_err_and(forbidden_message));
    assert!(delete.as_ref().is_err_and(forbidden_message));

    let stored = services.messages.get(member, id).await?;
    assert_eq!(stored, sent);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsider_group_operations_are_refused() -> eyre::Result<()> {
    let Setup {
        services,
        group,
        member,
        outsider,
    } = setup().await?;

    let detail = services.groups.detail(outsider, group.id()).await;
    let update = services
        .groups
        .update(outsider, group.id(), GroupChanges::default())
        .await;
    let delete = services.groups.delete(outsider, group.id()).await;

    for result in [detail.map(|_| ()), update.map(|_| ()), delete] {
        assert!(matches!(
            result,
            Err(GroupServiceError::Access(AccessError::NotMember { .. }))
        ));
    }
    assert!(services.groups.list_for_user(outsider).await?.is_empty());
    assert!(services.tasks.list(outsider, Some(group.id())).await?.is_empty());
    assert!(
        services
            .messages
            .list(outsider, Some(group.id()))
            .await?
            .is_empty()
    );
    assert_eq!(
        services.dashboard.stats_for(outsider).await?,
        DashboardStats::default()
    );
    assert!(services.groups.detail(member, group.id()).await.is_ok());
    Ok(())
}
