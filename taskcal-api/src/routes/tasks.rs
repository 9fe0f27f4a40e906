/// Task CRUD endpoints
///
/// # Endpoints
///
/// - `POST /v1/tasks` - Add a task
/// - `GET /v1/tasks?date=YYYY-MM-DD` - The session user's tasks for a date
/// - `GET /v1/tasks` - Full listing (ownership-filtered unless elevated)
/// - `DELETE /v1/tasks/:id` - Delete a task
/// - `PATCH /v1/tasks/:id/toggle` - Flip a task's completion flag
///
/// Delete and toggle filter on `id AND user_id` in a single statement, so a
/// task belonging to someone else produces the same "Task not found" as a
/// task that never existed.

use crate::{
    app::{AppState, Session},
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use taskcal_shared::{
    calendar::TaskSummary,
    models::task::{CreateTask, Task},
    validation,
};
use uuid::Uuid;
use validator::Validate;

/// Add-task request
#[derive(Debug, Deserialize, Validate)]
pub struct AddTaskRequest {
    /// Title (required, at most 255 characters)
    #[validate(length(min = 1, max = 255, message = "Title is required and must be at most 255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Due date as an ISO calendar date, e.g. "2024-02-15"
    #[validate(length(min = 1, message = "Due date is required"))]
    pub due_date: String,
}

/// Listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// ISO date to list tasks for; omitted means the full listing
    pub date: Option<String>,
}

/// Task listing response
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    /// Task summaries in store order (due date desc, then title)
    pub tasks: Vec<TaskSummary>,

    /// Echo of the requested date, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    /// Status message
    pub message: String,
}

/// Toggle result
#[derive(Debug, Serialize)]
pub struct ToggleTaskResponse {
    /// The task's new completion state
    pub is_completed: bool,

    /// Status message
    pub message: String,
}

/// Parses an ISO calendar date from a request string
fn parse_iso_date(s: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("Invalid date format.".to_string()))
}

/// Maps `validator` derive failures into field-level details
fn validation_details(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}

/// Add a new task
///
/// The due date must parse as an ISO date and must not precede today.
/// Repeating a successful call creates a second, distinct task.
///
/// # Endpoint
///
/// ```text
/// POST /v1/tasks
/// Authorization: Bearer <session token>
/// Content-Type: application/json
///
/// {
///   "title": "Buy groceries",
///   "description": "milk, eggs",
///   "due_date": "2024-02-15"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: missing/overlong title or missing due date
/// - `400 Bad Request`: unparsable or past due date
pub async fn add_task(
    State(state): State<AppState>,
    Extension(sess): Extension<Session>,
    Json(req): Json<AddTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(validation_details)?;

    let due_date = parse_iso_date(&req.due_date)?;

    let today = Utc::now().date_naive();
    validation::validate_due_date(due_date, today)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: sess.user_id,
            title: req.title,
            description: req.description.filter(|d| !d.is_empty()),
            due_date,
        },
    )
    .await?;

    tracing::debug!(task_id = %task.id, user_id = %sess.user_id, "Task created");

    Ok(Json(task))
}

/// List tasks
///
/// With `?date=`, returns the session user's tasks due that date. Without
/// it, returns the full listing: the session user's own tasks, or every
/// user's tasks when the session carries the elevated capability.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(sess): Extension<Session>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let tasks = match &query.date {
        Some(date_str) => {
            let date = parse_iso_date(date_str)?;
            Task::list_for_date(&state.db, sess.user_id, date).await?
        }
        None if sess.elevated => Task::list_all(&state.db).await?,
        None => Task::list_for_user(&state.db, sess.user_id).await?,
    };

    Ok(Json(TaskListResponse {
        tasks: tasks.iter().map(TaskSummary::from).collect(),
        date: query.date,
    }))
}

/// Delete a task
///
/// Permanent; there is no soft delete.
///
/// # Errors
///
/// - `404 Not Found`: no task with that id among the session user's tasks
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(sess): Extension<Session>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    let deleted = Task::delete_owned(&state.db, task_id, sess.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found.".to_string()));
    }

    tracing::debug!(task_id = %task_id, user_id = %sess.user_id, "Task deleted");

    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully!".to_string(),
    }))
}

/// Toggle a task's completion flag
///
/// # Errors
///
/// - `404 Not Found`: no task with that id among the session user's tasks
pub async fn toggle_task(
    State(state): State<AppState>,
    Extension(sess): Extension<Session>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<ToggleTaskResponse>> {
    let task = Task::toggle_owned(&state.db, task_id, sess.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found.".to_string()))?;

    Ok(Json(ToggleTaskResponse {
        is_completed: task.is_completed,
        message: "Task updated successfully!".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_parse_iso_date_rejects_garbage() {
        for input in ["2024/02/29", "02-29-2024", "not-a-date", "", "2023-02-29"] {
            assert!(parse_iso_date(input).is_err(), "'{}' should fail", input);
        }
    }

    #[test]
    fn test_add_task_request_requires_title() {
        let req = AddTaskRequest {
            title: String::new(),
            description: None,
            due_date: "2024-02-15".to_string(),
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_add_task_request_title_length_cap() {
        let req = AddTaskRequest {
            title: "x".repeat(256),
            description: None,
            due_date: "2024-02-15".to_string(),
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_add_task_request_valid() {
        let req = AddTaskRequest {
            title: "Buy groceries".to_string(),
            description: Some("milk, eggs".to_string()),
            due_date: "2024-02-15".to_string(),
        };

        assert!(req.validate().is_ok());
    }
}
