//! Application services for account and session management.

mod account;

pub use account::{
    AccountService, AccountServiceError, AccountServiceResult, LoginRequest, RegisterRequest,
    Session,
};
