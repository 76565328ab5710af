//! `PostgreSQL` repository implementation for groups and memberships.

use super::models::{GroupChangeset, GroupRow, MembershipRow, NewGroupRow};
use crate::group::{
    domain::{
        Group, GroupId, GroupMember, GroupProfile, InviteCode, Membership, MembershipRole,
        PersistedGroupData,
    },
    ports::{GroupRepository, GroupRepositoryError, GroupRepositoryResult},
};
use crate::identity::domain::{UserId, Username};
use crate::store::postgres::{
    PersistenceFailure, PgPool, count_to_u64, is_foreign_key_violation, run_blocking,
    schema::{group_memberships, study_groups, users},
    unique_violation,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

const INVITE_CODE_CONSTRAINT: &str = "study_groups_invite_code_key";
const MEMBERSHIP_CONSTRAINT: &str = "group_memberships_pkey";

/// `PostgreSQL`-backed group repository.
#[derive(Debug, Clone)]
pub struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for GroupRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn create_with_founder(
        &self,
        group: &Group,
        founder: &Membership,
    ) -> GroupRepositoryResult<()> {
        let group_id = group.id();
        let invite_code = group.invite_code().clone();
        let group_row = to_new_group_row(group);
        let founder_row = to_membership_row(founder);
        run_blocking(&self.pool, move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::insert_into(study_groups::table)
                        .values(&group_row)
                        .execute(tx)?;
                    diesel::insert_into(group_memberships::table)
                        .values(&founder_row)
                        .execute(tx)?;
                    Ok(())
                })
                .map_err(|err| match unique_violation(&err) {
                    Some(INVITE_CODE_CONSTRAINT) => {
                        GroupRepositoryError::DuplicateInviteCode(invite_code.clone())
                    }
                    Some(_) => GroupRepositoryError::DuplicateGroup(group_id),
                    None => GroupRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn update(&self, group: &Group) -> GroupRepositoryResult<()> {
        let group_id = group.id();
        let changes = GroupChangeset {
            name: group.profile().name().to_owned(),
            description: group.profile().description().to_owned(),
            subject: group.profile().subject().to_owned(),
            semester: group.profile().semester().to_owned(),
            last_activity: group.last_activity(),
        };
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(study_groups::table.find(group_id.into_inner()))
                .set(&changes)
                .execute(connection)
                .map_err(GroupRepositoryError::persistence)?;
            if updated == 0 {
                return Err(GroupRepositoryError::NotFound(group_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: GroupId) -> GroupRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted = diesel::delete(study_groups::table.find(id.into_inner()))
                .execute(connection)
                .map_err(GroupRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(GroupRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn record_activity(&self, id: GroupId, at: DateTime<Utc>) -> GroupRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let raw_id = id.into_inner();
            let advanced = diesel::update(
                study_groups::table
                    .find(raw_id)
                    .filter(study_groups::last_activity.lt(at)),
            )
            .set(study_groups::last_activity.eq(at))
            .execute(connection)
            .map_err(GroupRepositoryError::persistence)?;
            if advanced > 0 {
                return Ok(());
            }

            let exists = study_groups::table
                .find(raw_id)
                .select(study_groups::id)
                .first::<uuid::Uuid>(connection)
                .optional()
                .map_err(GroupRepositoryError::persistence)?;
            exists
                .map(|_| ())
                .ok_or(GroupRepositoryError::NotFound(id))
        })
        .await
    }

    async fn find_by_id(&self, id: GroupId) -> GroupRepositoryResult<Option<Group>> {
        run_blocking(&self.pool, move |connection| {
            let row = study_groups::table
                .find(id.into_inner())
                .select(GroupRow::as_select())
                .first::<GroupRow>(connection)
                .optional()
                .map_err(GroupRepositoryError::persistence)?;
            row.map(row_to_group).transpose()
        })
        .await
    }

    async fn find_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> GroupRepositoryResult<Option<Group>> {
        let lookup = code.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = study_groups::table
                .filter(study_groups::invite_code.eq(lookup))
                .select(GroupRow::as_select())
                .first::<GroupRow>(connection)
                .optional()
                .map_err(GroupRepositoryError::persistence)?;
            row.map(row_to_group).transpose()
        })
        .await
    }

    async fn list_for_user(&self, user_id: UserId) -> GroupRepositoryResult<Vec<Group>> {
        run_blocking(&self.pool, move |connection| {
            let rows = study_groups::table
                .inner_join(group_memberships::table)
                .filter(group_memberships::user_id.eq(user_id.into_inner()))
                .order((study_groups::last_activity.desc(), study_groups::id.asc()))
                .select(GroupRow::as_select())
                .load::<GroupRow>(connection)
                .map_err(GroupRepositoryError::persistence)?;
            rows.into_iter().map(row_to_group).collect()
        })
        .await
    }

    async fn add_membership(&self, membership: &Membership) -> GroupRepositoryResult<()> {
        let user_id = membership.user_id();
        let group_id = membership.group_id();
        let row = to_membership_row(membership);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(group_memberships::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| {
                    if unique_violation(&err) == Some(MEMBERSHIP_CONSTRAINT) {
                        GroupRepositoryError::DuplicateMembership { user_id, group_id }
                    } else if is_foreign_key_violation(&err) {
                        GroupRepositoryError::NotFound(group_id)
                    } else {
                        GroupRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn find_membership(
        &self,
        user_id: UserId,
        group_id: GroupId,
    ) -> GroupRepositoryResult<Option<Membership>> {
        run_blocking(&self.pool, move |connection| {
            let row = group_memberships::table
                .find((user_id.into_inner(), group_id.into_inner()))
                .select(MembershipRow::as_select())
                .first::<MembershipRow>(connection)
                .optional()
                .map_err(GroupRepositoryError::persistence)?;
            row.map(row_to_membership).transpose()
        })
        .await
    }

    async fn list_members(&self, group_id: GroupId) -> GroupRepositoryResult<Vec<GroupMember>> {
        run_blocking(&self.pool, move |connection| {
            let rows = group_memberships::table
                .inner_join(users::table)
                .filter(group_memberships::group_id.eq(group_id.into_inner()))
                .order((group_memberships::joined_at.asc(), group_memberships::user_id.asc()))
                .select((group_memberships::user_id, users::username, group_memberships::role))
                .load::<(uuid::Uuid, String, String)>(connection)
                .map_err(GroupRepositoryError::persistence)?;
            rows.into_iter()
                .map(|(user_id, username, role)| {
                    Ok(GroupMember {
                        id: UserId::from_uuid(user_id),
                        username: Username::new(username)
                            .map_err(GroupRepositoryError::persistence)?,
                        role: MembershipRole::try_from(role.as_str())
                            .map_err(GroupRepositoryError::persistence)?,
                    })
                })
                .collect()
        })
        .await
    }

    async fn count_members(&self, group_id: GroupId) -> GroupRepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            let count = group_memberships::table
                .filter(group_memberships::group_id.eq(group_id.into_inner()))
                .select(count_star())
                .first::<i64>(connection)
                .map_err(GroupRepositoryError::persistence)?;
            count_to_u64(count)
        })
        .await
    }

    async fn group_ids_for_user(&self, user_id: UserId) -> GroupRepositoryResult<Vec<GroupId>> {
        run_blocking(&self.pool, move |connection| {
            let ids = group_memberships::table
                .filter(group_memberships::user_id.eq(user_id.into_inner()))
                .select(group_memberships::group_id)
                .load::<uuid::Uuid>(connection)
                .map_err(GroupRepositoryError::persistence)?;
            Ok(ids.into_iter().map(GroupId::from_uuid).collect())
        })
        .await
    }
}

fn to_new_group_row(group: &Group) -> NewGroupRow {
    let profile = group.profile();
    NewGroupRow {
        id: group.id().into_inner(),
        name: profile.name().to_owned(),
        description: profile.description().to_owned(),
        subject: profile.subject().to_owned(),
        semester: profile.semester().to_owned(),
        invite_code: group.invite_code().as_str().to_owned(),
        created_at: group.created_at(),
        last_activity: group.last_activity(),
    }
}

fn to_membership_row(membership: &Membership) -> MembershipRow {
    MembershipRow {
        user_id: membership.user_id().into_inner(),
        group_id: membership.group_id().into_inner(),
        role: membership.role().as_str().to_owned(),
        joined_at: membership.joined_at(),
    }
}

fn row_to_group(row: GroupRow) -> GroupRepositoryResult<Group> {
    let profile = GroupProfile::new(row.name, row.description, row.subject, row.semester)
        .map_err(GroupRepositoryError::persistence)?;
    let invite_code =
        InviteCode::new(row.invite_code).map_err(GroupRepositoryError::persistence)?;
    Ok(Group::from_persisted(PersistedGroupData {
        id: GroupId::from_uuid(row.id),
        profile,
        invite_code,
        created_at: row.created_at,
        last_activity: row.last_activity,
    }))
}

fn row_to_membership(row: MembershipRow) -> GroupRepositoryResult<Membership> {
    let role = MembershipRole::try_from(row.role.as_str())
        .map_err(GroupRepositoryError::persistence)?;
    Ok(Membership::from_persisted(
        UserId::from_uuid(row.user_id),
        GroupId::from_uuid(row.group_id),
        role,
        row.joined_at,
    ))
}
