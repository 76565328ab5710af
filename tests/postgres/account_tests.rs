//! Account constraints and token revocation in `PostgreSQL`.

#![expect(
    clippy::panic_in_result_fn,
    reason = "Tests assert on outcomes while propagating setup failures with ?"
)]

use super::helpers::{postgres_services, unique_name};
use crate::test_helpers::{sign_up, study_group};
use classcollab::identity::services::{AccountServiceError, RegisterRequest};
use classcollab::task::services::CreateTaskRequest;
use eyre::eyre;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn usernames_and_emails_stay_unique() -> eyre::Result<()> {
    let Some(services) = postgres_services().await.map_err(|err| eyre!(err))? else {
        return Ok(());
    };
    let name = unique_name("carol");
    sign_up(&services, &name).await?;

    let same_username = services
        .accounts
        .register(RegisterRequest::new(
            name.as_str(),
            format!("other-{name}@uni.edu"),
            "pw",
            "pw",
        ))
        .await;
    assert!(matches!(same_username, Err(AccountServiceError::UsernameTaken)));

    let same_email = services
        .accounts
        .register(RegisterRequest::new(
            unique_name("dave"),
            format!("{name}@uni.edu"),
            "pw",
            "pw",
        ))
        .await;
    assert!(matches!(same_email, Err(AccountServiceError::EmailTaken)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn logout_revocations_are_persisted() -> eyre::Result<()> {
    let Some(services) = postgres_services().await.map_err(|err| eyre!(err))? else {
        return Ok(());
    };
    let session = sign_up(&services, &unique_name("erin")).await?;
    let access = session.tokens.access.token.as_str();
    let refresh = session.tokens.refresh.token.as_str();

    services.accounts.authenticate(access).await?;
    services.accounts.logout(access, Some(refresh)).await?;

    assert!(matches!(
        services.accounts.authenticate(access).await,
        Err(AccountServiceError::InvalidToken)
    ));
    assert!(matches!(
        services.accounts.refresh(refresh).await,
        Err(AccountServiceError::InvalidToken)
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_an_account_cascades() -> eyre::Result<()> {
    let Some(services) = postgres_services().await.map_err(|err| eyre!(err))? else {
        return Ok(());
    };
    let owner = sign_up(&services, &unique_name("frank")).await?;
    let helper = sign_up(&services, &unique_name("grace")).await?;
    let owner_id = owner.user.id();
    let helper_id = helper.user.id();
    let group = services
        .groups
        .create(owner_id, study_group("Networks"))
        .await?;
    services
        .groups
        .join(helper_id, group.invite_code().as_str())
        .await?;
    let task = services
        .tasks
        .create(
            owner_id,
            CreateTaskRequest::new(group.id(), "Packet traces").with_assignee(helper_id),
        )
        .await?;
    services
        .messages
        .create(helper_id, group.id(), "Captured them")
        .await?;

    services.accounts.delete_account(helper_id).await?;

    assert!(!services.groups.access().is_member(helper_id, group.id()).await?);
    assert_eq!(services.tasks.get(owner_id, task.id()).await?.assigned_to(), None);
    assert!(services.messages.list(owner_id, Some(group.id())).await?.is_empty());
    assert!(matches!(
        services.accounts.authenticate(&helper.tokens.access.token).await,
        Err(AccountServiceError::InvalidToken)
    ));
    Ok(())
}
