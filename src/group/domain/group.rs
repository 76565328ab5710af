//! Group aggregate root and its editable profile.

use super::{GroupDomainError, GroupId, InviteCode};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const MAX_NAME_LENGTH: usize = 200;
const MAX_SUBJECT_LENGTH: usize = 100;
const MAX_SEMESTER_LENGTH: usize = 50;

/// Editable descriptive fields of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupProfile {
    name: String,
    description: String,
    subject: String,
    semester: String,
}

impl GroupProfile {
    /// Creates a validated profile. All fields are trimmed and required.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::EmptyField`] for a blank field or
    /// [`GroupDomainError::FieldTooLong`] when `name`, `subject`, or
    /// `semester` exceed their storage limits.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        subject: impl Into<String>,
        semester: impl Into<String>,
    ) -> Result<Self, GroupDomainError> {
        Ok(Self {
            name: required("name", name.into(), Some(MAX_NAME_LENGTH))?,
            description: required("description", description.into(), None)?,
            subject: required("subject", subject.into(), Some(MAX_SUBJECT_LENGTH))?,
            semester: required("semester", semester.into(), Some(MAX_SEMESTER_LENGTH))?,
        })
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the course subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the academic term.
    #[must_use]
    pub fn semester(&self) -> &str {
        &self.semester
    }
}

fn required(
    field: &'static str,
    value: String,
    max: Option<usize>,
) -> Result<String, GroupDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GroupDomainError::EmptyField(field));
    }
    if let Some(limit) = max.filter(|limit| trimmed.chars().count() > *limit) {
        return Err(GroupDomainError::FieldTooLong { field, max: limit });
    }
    Ok(trimmed.to_owned())
}

/// Study group aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    profile: GroupProfile,
    invite_code: InviteCode,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedGroupData {
    /// Persisted group identifier.
    pub id: GroupId,
    /// Persisted profile fields.
    pub profile: GroupProfile,
    /// Persisted invite code.
    pub invite_code: InviteCode,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest activity timestamp.
    pub last_activity: DateTime<Utc>,
}

impl Group {
    /// Creates a new group with the given invite code.
    #[must_use]
    pub fn new(profile: GroupProfile, invite_code: InviteCode, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: GroupId::new(),
            profile,
            invite_code,
            created_at: timestamp,
            last_activity: timestamp,
        }
    }

    /// Reconstructs a group from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedGroupData) -> Self {
        Self {
            id: data.id,
            profile: data.profile,
            invite_code: data.invite_code,
            created_at: data.created_at,
            last_activity: data.last_activity,
        }
    }

    /// Returns the group identifier.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the descriptive profile.
    #[must_use]
    pub const fn profile(&self) -> &GroupProfile {
        &self.profile
    }

    /// Returns the invite code.
    #[must_use]
    pub const fn invite_code(&self) -> &InviteCode {
        &self.invite_code
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest activity timestamp.
    #[must_use]
    pub const fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Replaces the profile and records the edit as activity.
    pub fn update_profile(&mut self, profile: GroupProfile, clock: &impl Clock) {
        self.profile = profile;
        self.record_activity(clock.utc());
    }

    /// Advances `last_activity` to `at`. Earlier timestamps are ignored so
    /// the value never moves backwards.
    pub fn record_activity(&mut self, at: DateTime<Utc>) {
        if at > self.last_activity {
            self.last_activity = at;
        }
    }
}
