/// Task model and database operations
///
/// Tasks belong to exactly one user. Deleting a user cascades to their tasks.
/// Every ownership-sensitive mutation filters on `id AND user_id` in a single
/// statement: zero rows affected means "not found", whether the task belongs
/// to someone else or never existed at all.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     due_date DATE NOT NULL,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Listings default to `ORDER BY due_date DESC, title ASC`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A user-owned task with a due date and completion flag
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Title (required, at most 255 characters)
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Calendar date the task is due
    pub due_date: NaiveDate,

    /// Completion flag, flipped by the toggle operation
    pub is_completed: bool,

    /// When the task was created (server-set)
    pub created_at: DateTime<Utc>,

    /// When the task was last mutated (server-set, refreshed on every mutation)
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning user
    pub user_id: Uuid,

    /// Title (required)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Due date, already validated against "today" by the caller
    pub due_date: NaiveDate,
}

const TASK_COLUMNS: &str =
    "id, user_id, title, description, due_date, is_completed, created_at, updated_at";

impl Task {
    /// Creates a new task owned by `data.user_id`
    ///
    /// Repeated calls with the same input create distinct tasks; there is no
    /// dedup key.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (user_id, title, description, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by id, restricted to its owner
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2",
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a user's tasks due within one calendar month
    ///
    /// The range is `[first_of_month, first_of_next_month)`, served by the
    /// `(user_id, due_date)` index.
    pub async fn list_for_month(
        pool: &PgPool,
        user_id: Uuid,
        month_start: NaiveDate,
        next_month_start: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE user_id = $1 AND due_date >= $2 AND due_date < $3
            ORDER BY due_date DESC, title ASC
            "#,
        ))
        .bind(user_id)
        .bind(month_start)
        .bind(next_month_start)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists a user's tasks due on a single date
    pub async fn list_for_date(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE user_id = $1 AND due_date = $2
            ORDER BY due_date DESC, title ASC
            "#,
        ))
        .bind(user_id)
        .bind(date)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks across all users
    ///
    /// Only reachable through the elevated-access listing; ordinary sessions
    /// go through [`Task::list_for_user`] instead.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY due_date DESC, title ASC",
        ))
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists all tasks owned by one user
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE user_id = $1
            ORDER BY due_date DESC, title ASC
            "#,
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Deletes a task, restricted to its owner
    ///
    /// Returns `true` if a row was deleted. `false` covers both "no such
    /// task" and "someone else's task"; callers must not distinguish them.
    pub async fn delete_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flips a task's completion flag, restricted to its owner
    ///
    /// Returns the updated task, or `None` under the same ownership opacity
    /// as [`Task::delete_owned`]. `updated_at` is refreshed in the same
    /// statement.
    pub async fn toggle_owned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET is_completed = NOT is_completed, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_struct() {
        let create_task = CreateTask {
            user_id: Uuid::new_v4(),
            title: "Buy groceries".to_string(),
            description: None,
            due_date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
        };

        assert_eq!(create_task.title, "Buy groceries");
        assert!(create_task.description.is_none());
    }

    #[test]
    fn test_task_columns_list_is_complete() {
        // The shared column list must stay in sync with the struct fields.
        for col in [
            "id",
            "user_id",
            "title",
            "description",
            "due_date",
            "is_completed",
            "created_at",
            "updated_at",
        ] {
            assert!(TASK_COLUMNS.contains(col), "missing column: {col}");
        }
    }

    // Integration tests for database operations are in taskcal-api/tests/
}
