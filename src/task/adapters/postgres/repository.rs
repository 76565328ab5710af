//! `PostgreSQL` repository implementation for task storage.

use super::models::{NewTaskRow, TaskChangeset, TaskRow};
use crate::group::domain::GroupId;
use crate::identity::domain::UserId;
use crate::store::postgres::{
    PersistenceFailure, PgPool, count_to_u64, run_blocking, schema::tasks, unique_violation,
};
use crate::task::{
    domain::{PersistedTaskData, Task, TaskCounts, TaskDetails, TaskId, TaskStatus, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use uuid::Uuid;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for TaskRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_new_row(task);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| {
                    if unique_violation(&err).is_some() {
                        TaskRepositoryError::DuplicateTask(task_id)
                    } else {
                        TaskRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changes = to_changeset(task);
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                .set(&changes)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        run_blocking(&self.pool, move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_for_groups(&self, group_ids: &[GroupId]) -> TaskRepositoryResult<Vec<Task>> {
        let ids = raw_ids(group_ids);
        run_blocking(&self.pool, move |connection| {
            let rows = tasks::table
                .filter(tasks::group_id.eq_any(ids))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn counts_for_group(&self, group_id: GroupId) -> TaskRepositoryResult<TaskCounts> {
        run_blocking(&self.pool, move |connection| {
            let raw_id = group_id.into_inner();
            let total = tasks::table
                .filter(tasks::group_id.eq(raw_id))
                .select(count_star())
                .first::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let done = tasks::table
                .filter(tasks::group_id.eq(raw_id))
                .filter(tasks::status.eq(TaskStatus::Done.as_str()))
                .select(count_star())
                .first::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(TaskCounts {
                total: count_to_u64::<TaskRepositoryError>(total)?,
                done: count_to_u64::<TaskRepositoryError>(done)?,
            })
        })
        .await
    }

    async fn count_due_between(
        &self,
        group_ids: &[GroupId],
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> TaskRepositoryResult<u64> {
        let ids = raw_ids(group_ids);
        run_blocking(&self.pool, move |connection| {
            let count = tasks::table
                .filter(tasks::group_id.eq_any(ids))
                .filter(tasks::status.ne(TaskStatus::Done.as_str()))
                .filter(tasks::due_date.ge(from))
                .filter(tasks::due_date.le(until))
                .select(count_star())
                .first::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            count_to_u64(count)
        })
        .await
    }

    async fn count_done(&self, group_ids: &[GroupId]) -> TaskRepositoryResult<u64> {
        let ids = raw_ids(group_ids);
        run_blocking(&self.pool, move |connection| {
            let count = tasks::table
                .filter(tasks::group_id.eq_any(ids))
                .filter(tasks::status.eq(TaskStatus::Done.as_str()))
                .select(count_star())
                .first::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            count_to_u64(count)
        })
        .await
    }
}

fn raw_ids(group_ids: &[GroupId]) -> Vec<Uuid> {
    group_ids.iter().map(|id| id.into_inner()).collect()
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        group_id: task.group_id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        status: task.status().as_str().to_owned(),
        due_date: task.due_date(),
        created_at: task.created_at(),
        completed_at: task.completed_at(),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        status: task.status().as_str().to_owned(),
        due_date: task.due_date(),
        completed_at: task.completed_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let title = TaskTitle::new(row.title).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let details = TaskDetails {
        title,
        description: row.description,
        status,
        due_date: row.due_date,
        assigned_to: row.assigned_to.map(UserId::from_uuid),
    };
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        group_id: GroupId::from_uuid(row.group_id),
        details,
        created_at: row.created_at,
        completed_at: row.completed_at,
    }))
}
