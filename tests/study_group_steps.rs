//! Behaviour tests for study group membership and collaboration.

#[path = "study_group_steps/mod.rs"]
mod study_group_steps_defs;

use rstest_bdd_macros::scenario;
use study_group_steps_defs::world::{StudyGroupWorld, world};

#[scenario(
    path = "tests/features/study_groups.feature",
    name = "Creating a group makes the creator its admin"
)]
#[tokio::test(flavor = "multi_thread")]
async fn creating_a_group(world: StudyGroupWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/study_groups.feature",
    name = "Joining with an invite code"
)]
#[tokio::test(flavor = "multi_thread")]
async fn joining_with_an_invite_code(world: StudyGroupWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/study_groups.feature",
    name = "Joining with an unknown invite code"
)]
#[tokio::test(flavor = "multi_thread")]
async fn joining_with_an_unknown_code(world: StudyGroupWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/study_groups.feature",
    name = "Joining a group twice"
)]
#[tokio::test(flavor = "multi_thread")]
async fn joining_twice(world: StudyGroupWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/study_groups.feature",
    name = "Outsiders cannot post messages"
)]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_cannot_post(world: StudyGroupWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/study_groups.feature",
    name = "Members cannot edit the group"
)]
#[tokio::test(flavor = "multi_thread")]
async fn members_cannot_edit(world: StudyGroupWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/study_groups.feature",
    name = "Completing a task counts on the dashboard"
)]
#[tokio::test(flavor = "multi_thread")]
async fn completing_a_task(world: StudyGroupWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/study_groups.feature",
    name = "Unread messages count until someone reads them"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unread_messages(world: StudyGroupWorld) {
    let _ = world;
}
