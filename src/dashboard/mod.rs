//! Read-only dashboard counters for a user.
//!
//! Counters are computed fresh on every call from the group, task, and
//! message repositories; nothing is cached.

mod service;
mod stats;

pub use service::{DashboardError, DashboardService, UPCOMING_WINDOW_DAYS};
pub use stats::DashboardStats;
