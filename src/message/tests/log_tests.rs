//! Unit tests for the group message log.

use std::sync::Arc;

use crate::group::{domain::Group, services::AccessError};
use crate::identity::domain::User;
use crate::message::{
    domain::{MessageContent, MessageDomainError, MessageId},
    services::{MessageChanges, MessageServiceError},
};
use crate::test_support::{FixedClock, TestServices, register_user, services, study_group};
use chrono::Duration;
use mockable::Clock;
use rstest::{fixture, rstest};

struct Room {
    clock: Arc<FixedClock>,
    services: TestServices,
    group: Group,
    alice: User,
    bob: User,
    carol: User,
}

/// Alice administers a group Bob belongs to; Carol is an outsider.
#[fixture]
async fn room() -> Room {
    let clock = Arc::new(FixedClock::default());
    let services = services(&clock);
    let alice = register_user(&services, "alice").await;
    let bob = register_user(&services, "bob").await;
    let carol = register_user(&services, "carol").await;
    let group = services
        .groups
        .create(alice.id(), study_group("Algo Club"))
        .await
        .expect("creation should succeed");
    services
        .groups
        .join(bob.id(), group.invite_code().as_str())
        .await
        .expect("join should succeed");
    Room {
        clock,
        services,
        group,
        alice,
        bob,
        carol,
    }
}

#[rstest]
#[case("")]
#[case(" \n\t ")]
fn content_must_not_be_blank(#[case] raw: &str) {
    assert_eq!(MessageContent::new(raw), Err(MessageDomainError::EmptyContent));
}

#[rstest]
fn content_keeps_surrounding_whitespace() {
    let content = MessageContent::new("  see you at 5  ").expect("valid content");
    assert_eq!(content.as_str(), "  see you at 5  ");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn posting_records_sender_and_activity(#[future] room: Room) {
    let room = room.await;
    room.clock.advance(Duration::minutes(20));

    let sent = room
        .services
        .messages
        .create(room.bob.id(), room.group.id(), "Anyone free tonight?")
        .await
        .expect("member may post");

    assert_eq!(sent.sender_name, *room.bob.username());
    assert_eq!(sent.message.sender_id(), room.bob.id());
    assert_eq!(sent.message.content().as_str(), "Anyone free tonight?");
    assert_eq!(sent.message.created_at(), room.clock.utc());
    assert!(!sent.message.is_read());
    let detail = room
        .services
        .groups
        .detail(room.alice.id(), room.group.id())
        .await
        .expect("group should be readable");
    assert_eq!(detail.group.last_activity(), room.clock.utc());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn posting_requires_membership_and_content(#[future] room: Room) {
    let room = room.await;

    let outsider = room
        .services
        .messages
        .create(room.carol.id(), room.group.id(), "hi")
        .await
        .expect_err("outsider cannot post");
    assert!(matches!(
        outsider,
        MessageServiceError::Access(AccessError::NotMember { .. })
    ));

    let blank = room
        .services
        .messages
        .create(room.alice.id(), room.group.id(), "   ")
        .await
        .expect_err("blank content is rejected");
    assert!(matches!(
        blank,
        MessageServiceError::Domain(MessageDomainError::EmptyContent)
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_is_oldest_first_and_filterable(#[future] room: Room) {
    let room = room.await;
    let other = room
        .services
        .groups
        .create(room.alice.id(), study_group("Second Club"))
        .await
        .expect("creation should succeed");
    let mut in_first = Vec::new();
    for (sender, body) in [(room.alice.id(), "one"), (room.bob.id(), "two")] {
        let sent = room
            .services
            .messages
            .create(sender, room.group.id(), body)
            .await
            .expect("member may post");
        in_first.push(sent.message.id());
        room.clock.advance(Duration::seconds(1));
    }
    let elsewhere = room
        .services
        .messages
        .create(room.alice.id(), other.id(), "three")
        .await
        .expect("member may post");

    let all: Vec<MessageId> = room
        .services
        .messages
        .list(room.alice.id(), None)
        .await
        .expect("listing should succeed")
        .iter()
        .map(|sent| sent.message.id())
        .collect();
    let mut expected = in_first.clone();
    expected.push(elsewhere.message.id());
    assert_eq!(all, expected);

    let filtered: Vec<MessageId> = room
        .services
        .messages
        .list(room.alice.id(), Some(room.group.id()))
        .await
        .expect("listing should succeed")
        .iter()
        .map(|sent| sent.message.id())
        .collect();
    assert_eq!(filtered, in_first);

    let foreign = room
        .services
        .messages
        .list(room.bob.id(), Some(other.id()))
        .await
        .expect("foreign filter is not an error");
    assert!(foreign.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn read_flag_is_shared_by_all_members(#[future] room: Room) {
    let room = room.await;
    let sent = room
        .services
        .messages
        .create(room.alice.id(), room.group.id(), "Slides uploaded")
        .await
        .expect("member may post");
    let activity_before = room
        .services
        .groups
        .detail(room.alice.id(), room.group.id())
        .await
        .expect("group should be readable")
        .group
        .last_activity();
    room.clock.advance(Duration::hours(1));

    let marked = room
        .services
        .messages
        .mark_read(room.bob.id(), sent.message.id())
        .await
        .expect("member may mark read");
    assert!(marked.message.is_read());

    let seen_by_sender = room
        .services
        .messages
        .get(room.alice.id(), sent.message.id())
        .await
        .expect("sender may read");
    assert!(seen_by_sender.message.is_read());
    let activity_after = room
        .services
        .groups
        .detail(room.alice.id(), room.group.id())
        .await
        .expect("group should be readable")
        .group
        .last_activity();
    assert_eq!(activity_after, activity_before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_only_changes_the_read_flag(#[future] room: Room) {
    let room = room.await;
    let sent = room
        .services
        .messages
        .create(room.alice.id(), room.group.id(), "Slides uploaded")
        .await
        .expect("member may post");
    room.services
        .messages
        .mark_read(room.alice.id(), sent.message.id())
        .await
        .expect("member may mark read");

    let untouched = room
        .services
        .messages
        .update(room.bob.id(), sent.message.id(), MessageChanges::default())
        .await
        .expect("empty update is allowed");
    assert!(untouched.message.is_read());

    let unread = room
        .services
        .messages
        .update(
            room.bob.id(),
            sent.message.id(),
            MessageChanges {
                is_read: Some(false),
            },
        )
        .await
        .expect("member may update");
    assert!(!unread.message.is_read());
    assert_eq!(unread.message.content(), sent.message.content());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_cannot_read_or_delete(#[future] room: Room) {
    let room = room.await;
    let sent = room
        .services
        .messages
        .create(room.alice.id(), room.group.id(), "members only")
        .await
        .expect("member may post");

    let read = room
        .services
        .messages
        .get(room.carol.id(), sent.message.id())
        .await
        .expect_err("outsider cannot read");
    let delete = room
        .services
        .messages
        .delete(room.carol.id(), sent.message.id())
        .await
        .expect_err("outsider cannot delete");
    for err in [read, delete] {
        assert!(matches!(
            err,
            MessageServiceError::Access(AccessError::NotMember { .. })
        ));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_the_message(#[future] room: Room) {
    let room = room.await;
    let sent = room
        .services
        .messages
        .create(room.alice.id(), room.group.id(), "typo")
        .await
        .expect("member may post");

    room.services
        .messages
        .delete(room.bob.id(), sent.message.id())
        .await
        .expect("member may delete");

    let err = room
        .services
        .messages
        .get(room.alice.id(), sent.message.id())
        .await
        .expect_err("message is gone");
    assert!(matches!(err, MessageServiceError::NotFound(id) if id == sent.message.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_the_sender_removes_their_messages(#[future] room: Room) {
    let room = room.await;
    room.services
        .messages
        .create(room.bob.id(), room.group.id(), "bye")
        .await
        .expect("member may post");

    room.services
        .accounts
        .delete_account(room.bob.id())
        .await
        .expect("deletion should succeed");

    let remaining = room
        .services
        .messages
        .list(room.alice.id(), Some(room.group.id()))
        .await
        .expect("listing should succeed");
    assert!(remaining.is_empty());
}
