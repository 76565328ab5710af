//! Account lifecycle effects on the rest of the system.

#![expect(
    clippy::panic_in_result_fn,
    reason = "Tests assert on outcomes while propagating setup failures with ?"
)]

use crate::test_helpers::{in_memory_services, sign_up, study_group};
use classcollab::identity::services::AccountServiceError;
use classcollab::task::services::CreateTaskRequest;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_an_account_cleans_up_its_traces() -> eyre::Result<()> {
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
    let task = services
        .tasks
        .create(
            alice.user.id(),
            CreateTaskRequest::new(group.id(), "Slides").with_assignee(bob.user.id()),
        )
        .await?;
    services
        .messages
        .create(bob.user.id(), group.id(), "on it")
        .await?;

    services.accounts.delete_account(bob.user.id()).await?;

    let detail = services.groups.detail(alice.user.id(), group.id()).await?;
    assert_eq!(detail.members.len(), 1);
    let kept = services.tasks.get(alice.user.id(), task.id()).await?;
    assert_eq!(kept.assigned_to(), None);
    assert!(
        services
            .messages
            .list(alice.user.id(), None)
            .await?
            .is_empty()
    );
    assert!(matches!(
        services
            .accounts
            .authenticate(&bob.tokens.access.token)
            .await,
        Err(AccountServiceError::InvalidToken)
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_email_can_register_again_after_deletion() -> eyre::Result<()> {
    let services = in_memory_services();
    let first = sign_up(&services, "alice").await?;
    services.accounts.delete_account(first.user.id()).await?;

    let second = sign_up(&services, "alice").await?;

    assert_ne!(second.user.id(), first.user.id());
    Ok(())
}
