//! In-memory task repository backed by the shared store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::group::domain::GroupId;
use crate::store::memory::InMemoryStore;
use crate::task::{
    domain::{Task, TaskCounts, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    store: InMemoryStore,
}

impl InMemoryTaskRepository {
    /// Creates a repository over the given store.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(TaskRepositoryError::persistence)?;
        if tables.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        tables.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(TaskRepositoryError::persistence)?;
        let slot = tables
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(TaskRepositoryError::persistence)?;
        tables
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let tables = self
            .store
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        Ok(tables.tasks.get(&id).cloned())
    }

    async fn list_for_groups(&self, group_ids: &[GroupId]) -> TaskRepositoryResult<Vec<Task>> {
        let tables = self
            .store
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|task| group_ids.contains(&task.group_id()))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id().into_inner()));
        Ok(tasks)
    }

    async fn counts_for_group(&self, group_id: GroupId) -> TaskRepositoryResult<TaskCounts> {
        let tables = self
            .store
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        let counts = tables
            .tasks
            .values()
            .filter(|task| task.group_id() == group_id)
            .fold(TaskCounts::default(), |mut counts, task| {
                counts.total += 1;
                if task.status() == TaskStatus::Done {
                    counts.done += 1;
                }
                counts
            });
        Ok(counts)
    }

    async fn count_due_between(
        &self,
        group_ids: &[GroupId],
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> TaskRepositoryResult<u64> {
        let tables = self
            .store
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        let count = tables
            .tasks
            .values()
            .filter(|task| group_ids.contains(&task.group_id()) && task.status().is_open())
            .filter(|task| {
                task.due_date()
                    .is_some_and(|due| due >= from && due <= until)
            })
            .count();
        u64::try_from(count).map_err(TaskRepositoryError::persistence)
    }

    async fn count_done(&self, group_ids: &[GroupId]) -> TaskRepositoryResult<u64> {
        let tables = self
            .store
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        let count = tables
            .tasks
            .values()
            .filter(|task| {
                group_ids.contains(&task.group_id()) && task.status() == TaskStatus::Done
            })
            .count();
        u64::try_from(count).map_err(TaskRepositoryError::persistence)
    }
}
