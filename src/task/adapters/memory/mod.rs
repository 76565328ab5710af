//! In-memory adapter for the task board.

mod task;

pub use task::InMemoryTaskRepository;
