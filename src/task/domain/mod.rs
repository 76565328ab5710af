//! Domain model for group tasks.

mod error;
mod ids;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{TaskId, TaskTitle};
pub use task::{PersistedTaskData, Task, TaskCounts, TaskDetails, TaskStatus};
