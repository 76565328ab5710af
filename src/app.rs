//! Service wiring shared by the server binary and the HTTP tests.
//!
//! A [`Backend`] names one concrete adapter per repository port; the
//! [`ServiceRegistry`] builds every application service over it.

use crate::dashboard::DashboardService;
use crate::group::{
    adapters::{
        memory::InMemoryGroupRepository, postgres::PostgresGroupRepository,
        random::RandomInviteCodeGenerator,
    },
    ports::{GroupRepository, InviteCodeGenerator},
    services::GroupRegistryService,
};
use crate::identity::{
    adapters::{
        memory::{InMemoryTokenRevocations, InMemoryUserRepository},
        postgres::{PostgresTokenRevocations, PostgresUserRepository},
    },
    ports::{PasswordHasher, TokenIssuer, TokenRevocationRepository, UserRepository},
    services::AccountService,
};
use crate::message::{
    adapters::{memory::InMemoryMessageRepository, postgres::PostgresMessageRepository},
    ports::MessageRepository,
    services::MessageLogService,
};
use crate::store::{memory::InMemoryStore, postgres::PgPool};
use crate::task::{
    adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
    ports::TaskRepository,
    services::TaskBoardService,
};
use mockable::Clock;
use std::sync::Arc;

/// A complete set of repository adapters.
pub trait Backend: Send + Sync + 'static {
    /// User account adapter.
    type Users: UserRepository + 'static;
    /// Revoked token adapter.
    type Revocations: TokenRevocationRepository + 'static;
    /// Group and membership adapter.
    type Groups: GroupRepository + 'static;
    /// Task adapter.
    type Tasks: TaskRepository + 'static;
    /// Message adapter.
    type Messages: MessageRepository + 'static;

    /// Returns the user account adapter.
    fn users(&self) -> Arc<Self::Users>;
    /// Returns the revoked token adapter.
    fn revocations(&self) -> Arc<Self::Revocations>;
    /// Returns the group adapter.
    fn groups(&self) -> Arc<Self::Groups>;
    /// Returns the task adapter.
    fn tasks(&self) -> Arc<Self::Tasks>;
    /// Returns the message adapter.
    fn messages(&self) -> Arc<Self::Messages>;
}

/// Adapters sharing one [`InMemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    users: Arc<InMemoryUserRepository>,
    revocations: Arc<InMemoryTokenRevocations>,
    groups: Arc<InMemoryGroupRepository>,
    tasks: Arc<InMemoryTaskRepository>,
    messages: Arc<InMemoryMessageRepository>,
}

impl InMemoryBackend {
    /// Builds every in-memory adapter over `store`.
    #[must_use]
    pub fn new(store: &InMemoryStore) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new(store.clone())),
            revocations: Arc::new(InMemoryTokenRevocations::new(store.clone())),
            groups: Arc::new(InMemoryGroupRepository::new(store.clone())),
            tasks: Arc::new(InMemoryTaskRepository::new(store.clone())),
            messages: Arc::new(InMemoryMessageRepository::new(store.clone())),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(&InMemoryStore::new())
    }
}

impl Backend for InMemoryBackend {
    type Users = InMemoryUserRepository;
    type Revocations = InMemoryTokenRevocations;
    type Groups = InMemoryGroupRepository;
    type Tasks = InMemoryTaskRepository;
    type Messages = InMemoryMessageRepository;

    fn users(&self) -> Arc<Self::Users> {
        Arc::clone(&self.users)
    }

    fn revocations(&self) -> Arc<Self::Revocations> {
        Arc::clone(&self.revocations)
    }

    fn groups(&self) -> Arc<Self::Groups> {
        Arc::clone(&self.groups)
    }

    fn tasks(&self) -> Arc<Self::Tasks> {
        Arc::clone(&self.tasks)
    }

    fn messages(&self) -> Arc<Self::Messages> {
        Arc::clone(&self.messages)
    }
}

/// Adapters sharing one `PostgreSQL` connection pool.
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    users: Arc<PostgresUserRepository>,
    revocations: Arc<PostgresTokenRevocations>,
    groups: Arc<PostgresGroupRepository>,
    tasks: Arc<PostgresTaskRepository>,
    messages: Arc<PostgresMessageRepository>,
}

impl PostgresBackend {
    /// Builds every `PostgreSQL` adapter over `pool`.
    #[must_use]
    pub fn new(pool: &PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            revocations: Arc::new(PostgresTokenRevocations::new(pool.clone())),
            groups: Arc::new(PostgresGroupRepository::new(pool.clone())),
            tasks: Arc::new(PostgresTaskRepository::new(pool.clone())),
            messages: Arc::new(PostgresMessageRepository::new(pool.clone())),
        }
    }
}

impl Backend for PostgresBackend {
    type Users = PostgresUserRepository;
    type Revocations = PostgresTokenRevocations;
    type Groups = PostgresGroupRepository;
    type Tasks = PostgresTaskRepository;
    type Messages = PostgresMessageRepository;

    fn users(&self) -> Arc<Self::Users> {
        Arc::clone(&self.users)
    }

    fn revocations(&self) -> Arc<Self::Revocations> {
        Arc::clone(&self.revocations)
    }

    fn groups(&self) -> Arc<Self::Groups> {
        Arc::clone(&self.groups)
    }

    fn tasks(&self) -> Arc<Self::Tasks> {
        Arc::clone(&self.tasks)
    }

    fn messages(&self) -> Arc<Self::Messages> {
        Arc::clone(&self.messages)
    }
}

/// Credential adapters injected into the account service.
#[derive(Clone)]
pub struct Credentials {
    /// Password hasher.
    pub hasher: Arc<dyn PasswordHasher>,
    /// Token signer and verifier.
    pub issuer: Arc<dyn TokenIssuer>,
}

/// Every application service, built over one backend and one clock.
pub struct ServiceRegistry<B, C>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    /// Registration, login, and tokens.
    pub accounts: AccountService<B::Users, B::Revocations, C>,
    /// Group creation, membership, and administration.
    pub groups: GroupRegistryService<B::Groups, B::Tasks, C>,
    /// Group task board.
    pub tasks: TaskBoardService<B::Tasks, B::Groups, C>,
    /// Group message log.
    pub messages: MessageLogService<B::Messages, B::Groups, C>,
    /// Dashboard counters.
    pub dashboard: DashboardService<B::Groups, B::Tasks, B::Messages, C>,
}

impl<B, C> ServiceRegistry<B, C>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    /// Builds the services with random invite codes.
    #[must_use]
    pub fn new(backend: &B, credentials: Credentials, clock: Arc<C>) -> Self {
        Self::with_invite_codes(
            backend,
            credentials,
            Arc::new(RandomInviteCodeGenerator),
            clock,
        )
    }

    /// Builds the services with an explicit invite code source.
    #[must_use]
    pub fn with_invite_codes(
        backend: &B,
        credentials: Credentials,
        codes: Arc<dyn InviteCodeGenerator>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            accounts: AccountService::new(
                backend.users(),
                backend.revocations(),
                credentials.hasher,
                credentials.issuer,
                Arc::clone(&clock),
            ),
            groups: GroupRegistryService::new(
                backend.groups(),
                backend.tasks(),
                codes,
                Arc::clone(&clock),
            ),
            tasks: TaskBoardService::new(backend.tasks(), backend.groups(), Arc::clone(&clock)),
            messages: MessageLogService::new(
                backend.messages(),
                backend.groups(),
                Arc::clone(&clock),
            ),
            dashboard: DashboardService::new(
                backend.groups(),
                backend.tasks(),
                backend.messages(),
                clock,
            ),
        }
    }
}
