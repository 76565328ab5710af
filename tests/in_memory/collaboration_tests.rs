//! Two students collaborating inside one study group.

#![expect(
    clippy::panic_in_result_fn,
    reason = "Tests assert on outcomes while propagating setup failures with ?"
)]

use crate::test_helpers::{in_memory_services, sign_up, study_group};
use classcollab::dashboard::DashboardStats;
use classcollab::group::domain::MembershipRole;
use classcollab::task::{domain::TaskStatus, services::CreateTaskRequest};
use eyre::WrapErr;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn members_share_tasks_and_read_state() -> eyre::Result<()> {
    let services = in_memory_services();
    let alice = sign_up(&services, "alice").await?;
    let bob = sign_up(&services, "bob").await?;
    let alice_id = alice.user.id();
    let bob_id = bob.user.id();

    let group = services
        .groups
        .create(alice_id, study_group("Algo Club"))
        .await
        .wrap_err("alice creates the group")?;
    let code = group.invite_code().clone();
    assert!(services.groups.access().is_admin(alice_id, group.id()).await?);

    services
        .groups
        .join(bob_id, code.as_str())
        .await
        .wrap_err("bob joins with the code")?;
    assert!(services.groups.access().is_member(bob_id, group.id()).await?);
    assert!(!services.groups.access().is_admin(bob_id, group.id()).await?);

    let task = services
        .tasks
        .create(alice_id, CreateTaskRequest::new(group.id(), "Problem set 1"))
        .await
        .wrap_err("alice creates a task")?;
    let completed = services
        .tasks
        .mark_complete(bob_id, task.id())
        .await
        .wrap_err("bob completes the task")?;
    assert_eq!(completed.status(), TaskStatus::Done);
    assert!(completed.completed_at().is_some());

    let message = services
        .messages
        .create(bob_id, group.id(), "Done with set 1!")
        .await
        .wrap_err("bob posts")?;
    let unread_for_alice = services.dashboard.stats_for(alice_id).await?;
    assert_eq!(
        unread_for_alice,
        DashboardStats {
            active_groups: 1,
            upcoming_deadlines: 0,
            new_messages: 1,
            tasks_completed: 1,
        }
    );

    services
        .messages
        .mark_read(alice_id, message.message.id())
        .await
        .wrap_err("alice marks the message read")?;
    let seen_by_bob = services
        .messages
        .list(bob_id, Some(group.id()))
        .await
        .wrap_err("bob lists the group's messages")?;
    assert_eq!(seen_by_bob.len(), 1);
    let first = seen_by_bob.first().ok_or_else(|| eyre::eyre!("no message"))?;
    assert!(first.message.is_read());
    assert_eq!(first.sender_name.as_str(), "bob");
    assert_eq!(services.dashboard.stats_for(alice_id).await?.new_messages, 0);

    let detail = services.groups.detail(bob_id, group.id()).await?;
    let roles: Vec<_> = detail
        .members
        .iter()
        .map(|member| (member.username.as_str().to_owned(), member.role))
        .collect();
    assert_eq!(
        roles,
        vec![
            ("alice".to_owned(), MembershipRole::Admin),
            ("bob".to_owned(), MembershipRole::Member),
        ]
    );
    assert_eq!(detail.tasks.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invite_codes_stay_unique_across_many_groups() -> eyre::Result<()> {
    let services = in_memory_services();
    let alice = sign_up(&services, "alice").await?;

    let mut codes = std::collections::HashSet::new();
    for index in 0..25 {
        let group = services
            .groups
            .create(alice.user.id(), study_group(&format!("Group {index}")))
            .await?;
        let code = group.invite_code().as_str().to_owned();
        assert_eq!(code.len(), 8);
        assert!(
            code.bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        );
        assert!(codes.insert(code), "invite code reused");
    }

    let listed = services.groups.list_for_user(alice.user.id()).await?;
    assert_eq!(listed.len(), 25);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn group_summaries_count_members_and_tasks() -> eyre::Result<()> {
    let services = in_memory_services();
    let alice = sign_up(&services, "alice").await?;
    let bob = sign_up(&services, "bob").await?;
    let group = services
        .groups
        .create(alice.user.id(), study_group("Algo Club"))
        .await?;
    services
        .groups
        .join(bob.user.id(), group.invite_code().as_str())
        .await?;
    for (title, status) in [
        ("Read", TaskStatus::Done),
        ("Write", TaskStatus::InProgress),
        ("Review", TaskStatus::Todo),
    ] {
        services
            .tasks
            .create(
                bob.user.id(),
                CreateTaskRequest::new(group.id(), title).with_status(status),
            )
            .await?;
    }

    let summaries = services.groups.list_for_user(bob.user.id()).await?;
    let summary = summaries.first().ok_or_else(|| eyre::eyre!("no group"))?;
    assert_eq!(summary.members_count, 2);
    assert_eq!(summary.tasks_count, 3);
    assert_eq!(summary.tasks_completed_count, 1);
    assert!(summary.recent_activity.ends_with("minutes ago"));
    Ok(())
}
