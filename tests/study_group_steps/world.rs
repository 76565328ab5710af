//! World state for study group BDD scenarios.

use chrono::Duration;
use classcollab::app::{Credentials, InMemoryBackend, ServiceRegistry};
use classcollab::group::domain::Group;
use classcollab::http::ApiError;
use classcollab::identity::adapters::{argon2::Argon2PasswordHasher, jwt::JwtTokenIssuer};
use classcollab::identity::domain::{User, UserId};
use classcollab::message::domain::MessageId;
use classcollab::task::domain::Task;
use eyre::eyre;
use mockable::DefaultClock;
use rstest::fixture;
use std::collections::HashMap;
use std::sync::Arc;

pub type Services = ServiceRegistry<InMemoryBackend, DefaultClock>;

/// World state for study group scenarios.
pub struct StudyGroupWorld {
    pub services: Services,
    pub students: HashMap<String, User>,
    pub group: Option<Group>,
    pub creator: Option<UserId>,
    pub task: Option<Task>,
    pub latest_message: Option<MessageId>,
    pub rejection: Option<String>,
}

impl Default for StudyGroupWorld {
    fn default() -> Self {
        let hasher = Argon2PasswordHasher::with_params(8, 1, 1)
            .unwrap_or_else(|_| Argon2PasswordHasher::default());
        let credentials = Credentials {
            hasher: Arc::new(hasher),
            issuer: Arc::new(JwtTokenIssuer::new(
                b"scenario-secret",
                Duration::minutes(5),
                Duration::hours(24),
            )),
        };
        Self {
            services: ServiceRegistry::new(
                &InMemoryBackend::default(),
                credentials,
                Arc::new(DefaultClock),
            ),
            students: HashMap::new(),
            group: None,
            creator: None,
            task: None,
            latest_message: None,
            rejection: None,
        }
    }
}

impl StudyGroupWorld {
    pub fn student(&self, name: &str) -> Result<&User, eyre::Report> {
        self.students
            .get(name)
            .ok_or_else(|| eyre!("no registered student named {name}"))
    }

    pub fn group(&self) -> Result<&Group, eyre::Report> {
        self.group
            .as_ref()
            .ok_or_else(|| eyre!("no group created in this scenario"))
    }

    /// Returns the student who created the scenario's group.
    pub fn creator(&self) -> Result<UserId, eyre::Report> {
        self.creator
            .ok_or_else(|| eyre!("no group created in this scenario"))
    }

    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre!("no task created in this scenario"))
    }

    /// Records the client-facing message of a refused request.
    pub fn reject(&mut self, err: impl Into<ApiError>) {
        self.rejection = Some(err.into().public_message().to_owned());
    }
}

#[fixture]
pub fn world() -> StudyGroupWorld {
    StudyGroupWorld::default()
}

pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
