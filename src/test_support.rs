//! Shared fixtures for unit tests.

use crate::app::{Credentials, InMemoryBackend, ServiceRegistry};
use crate::group::domain::InviteCode;
use crate::group::ports::InviteCodeGenerator;
use crate::group::services::GroupFields;
use crate::identity::domain::User;
use crate::identity::services::RegisterRequest;
use crate::identity::adapters::{argon2::Argon2PasswordHasher, jwt::JwtTokenIssuer};
use crate::store::memory::InMemoryStore;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Clock that only moves when told to.
#[derive(Debug)]
pub(crate) struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub(crate) const fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += by;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// Invite code source that replays a fixed list, then repeats the last
/// entry.
pub(crate) struct ScriptedInviteCodes {
    codes: Mutex<VecDeque<InviteCode>>,
    last: InviteCode,
}

impl ScriptedInviteCodes {
    pub(crate) fn new(codes: &[&str]) -> Self {
        let parsed: VecDeque<InviteCode> = codes
            .iter()
            .map(|code| InviteCode::new(*code).expect("valid invite code"))
            .collect();
        let last = parsed.back().cloned().expect("at least one code");
        Self {
            codes: Mutex::new(parsed),
            last,
        }
    }
}

impl InviteCodeGenerator for ScriptedInviteCodes {
    fn generate(&self) -> InviteCode {
        self.codes
            .lock()
            .expect("codes lock")
            .pop_front()
            .unwrap_or_else(|| self.last.clone())
    }
}

/// Argon2 parameters cheap enough for tests.
pub(crate) fn fast_credentials() -> Credentials {
    Credentials {
        hasher: Arc::new(Argon2PasswordHasher::with_params(8, 1, 1).expect("valid params")),
        issuer: Arc::new(JwtTokenIssuer::new(
            b"unit-test-secret",
            Duration::minutes(5),
            Duration::hours(24),
        )),
    }
}

/// Services wired over the in-memory backend and a [`FixedClock`].
pub(crate) type TestServices = ServiceRegistry<InMemoryBackend, FixedClock>;

/// Every service over a fresh in-memory store and the given clock.
pub(crate) fn services(clock: &Arc<FixedClock>) -> TestServices {
    let backend = InMemoryBackend::new(&InMemoryStore::new());
    ServiceRegistry::new(&backend, fast_credentials(), Arc::clone(clock))
}

/// Every service over a fresh in-memory store with scripted invite codes.
pub(crate) fn services_with_codes(
    clock: &Arc<FixedClock>,
    codes: &[&str],
) -> TestServices {
    let backend = InMemoryBackend::new(&InMemoryStore::new());
    ServiceRegistry::with_invite_codes(
        &backend,
        fast_credentials(),
        Arc::new(ScriptedInviteCodes::new(codes)),
        Arc::clone(clock),
    )
}

/// Registers `username` with an address at `uni.edu` and password `pw`.
pub(crate) async fn register_user(services: &TestServices, username: &str) -> User {
    services
        .accounts
        .register(RegisterRequest::new(
            username,
            format!("{username}@uni.edu"),
            "pw",
            "pw",
        ))
        .await
        .expect("registration should succeed")
}

/// Valid group fields named `name`.
pub(crate) fn study_group(name: &str) -> GroupFields {
    GroupFields {
        name: name.to_owned(),
        description: "Weekly problem sets".to_owned(),
        subject: "Algorithms".to_owned(),
        semester: "Spring 2026".to_owned(),
    }
}
