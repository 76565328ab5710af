//! Dashboard counter payload.

use serde::Serialize;

/// Summary counters shown on a user's dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Groups the user belongs to.
    pub active_groups: u64,
    /// Open tasks due within the upcoming window.
    pub upcoming_deadlines: u64,
    /// Unread messages sent by other members.
    pub new_messages: u64,
    /// Done tasks across the user's groups.
    pub tasks_completed: u64,
}
