/// Task endpoints
///
/// # Endpoints
///
/// - `POST /tasks` - Create a task
/// - `GET /tasks` - List the caller's tasks (filtered, paginated)
/// - `GET /tasks/stats/user/:id` - Per-user status counts
/// - `GET /tasks/:id` - Fetch one of the caller's tasks
/// - `PATCH /tasks/:id` - Update a task
/// - `DELETE /tasks/:id` - Remove a task
///
/// All routes require a bearer token. Reads are scoped to the caller's own
/// assignments regardless of role; writes go through the access policy,
/// which admins bypass.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::ApiResponse,
    validation::validate_request,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{access, context::AuthContext},
    models::{
        task::{CreateTask, Task, TaskFilter, TaskStats, TaskStatus, UpdateTask},
        user::User,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (defaults to `todo`)
    pub status: Option<TaskStatus>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Optional assignee; must reference an existing user
    pub assigned_to_id: Option<Uuid>,
}

/// Update task request
///
/// All fields optional; omitted fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,

    /// New assignee; must reference an existing user
    pub assigned_to_id: Option<Uuid>,
}

/// List query parameters
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksQuery {
    /// Equality filter on status
    pub status: Option<TaskStatus>,

    /// Calendar-date filter on the due date (YYYY-MM-DD)
    pub due_date: Option<NaiveDate>,

    /// Case-insensitive substring match against title or description
    pub search: Option<String>,

    /// 1-based page number (default 1)
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,

    /// Page size (default 10, max 100)
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

/// List response payload
#[derive(Debug, Serialize)]
pub struct TaskListData {
    /// The requested page of tasks
    pub tasks: Vec<Task>,

    /// Total count matching the filters, across all pages
    pub total: i64,
}

/// Resolves an assignee id against the users table
///
/// Assignment to a nonexistent user is rejected up front rather than left to
/// the foreign key, so the client gets a 404 instead of a 500.
async fn resolve_assignee(state: &AppState, id: Uuid) -> ApiResult<Uuid> {
    User::find_by_id(&state.db, id)
        .await?
        .map(|user| user.id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// Create a new task
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Content-Type: application/json
///
/// {
///   "title": "Write quarterly report",
///   "description": "Due before the all-hands",
///   "status": "todo",
///   "dueDate": "2024-07-01T00:00:00Z",
///   "assignedToId": "uuid"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: Assignee does not exist
pub async fn create_task(
    _auth: AuthContext,
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Task>>)> {
    validate_request(&req)?;

    let assigned_to = match req.assigned_to_id {
        Some(id) => Some(resolve_assignee(&state, id).await?),
        None => None,
    };

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or_default(),
            due_date: req.due_date,
            assigned_to,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, "task created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Task created successfully", task)),
    ))
}

/// List the caller's tasks
///
/// Always scoped to tasks assigned to the caller, admins included. Supports
/// status, due-date, and search filters plus offset pagination.
///
/// # Endpoint
///
/// ```text
/// GET /tasks?status=todo&dueDate=2024-07-01&search=report&page=1&limit=10
/// ```
pub async fn list_tasks(
    auth: AuthContext,
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<ApiResponse<TaskListData>>> {
    validate_request(&query)?;

    let filter = TaskFilter {
        status: query.status,
        due_date: query.due_date,
        search: query.search,
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(10),
    };

    let (tasks, total) = Task::list_assigned(&state.db, auth.user_id, &filter).await?;

    Ok(Json(ApiResponse::new(
        "Tasks retrieved successfully",
        TaskListData { tasks, total },
    )))
}

/// Fetch one of the caller's tasks
///
/// The lookup is scoped to the caller's own assignments for every role, so
/// another user's task id comes back as a 404 rather than a 403.
///
/// # Errors
///
/// - `404 Not Found`: No such task among the caller's assignments
pub async fn get_task(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let task = Task::find_assigned(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task with ID \"{}\" not found", id)))?;

    Ok(Json(ApiResponse::new("Task retrieved successfully", task)))
}

/// Update a task
///
/// The caller must be the assignee or an admin. Unassigned tasks can only be
/// modified by admins.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Caller is neither the assignee nor an admin
/// - `404 Not Found`: Task or new assignee does not exist
pub async fn update_task(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    validate_request(&req)?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task with ID {} not found", id)))?;

    access::ensure_task_write(&auth, &task)?;

    let assigned_to = match req.assigned_to_id {
        Some(assignee) => Some(resolve_assignee(&state, assignee).await?),
        None => None,
    };

    let task = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            due_date: req.due_date,
            assigned_to,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Task with ID {} not found", id)))?;

    tracing::info!(task_id = %task.id, "task updated");

    Ok(Json(ApiResponse::new("Task updated successfully", task)))
}

/// Remove a task
///
/// Same access policy as updates: assignee or admin only.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is neither the assignee nor an admin
/// - `404 Not Found`: Task does not exist
pub async fn delete_task(
    auth: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task with ID {} not found", id)))?;

    access::ensure_task_write(&auth, &task)?;

    Task::delete(&state.db, id).await?;

    tracing::info!(task_id = %id, "task deleted");

    Ok(Json(ApiResponse::new(
        "Task deleted successfully",
        serde_json::Value::Null,
    )))
}

/// Per-user task statistics
///
/// Counts a user's tasks grouped by status. Any authenticated caller may
/// query any user's counts; a user id with no tasks yields all zeros.
///
/// # Endpoint
///
/// ```text
/// GET /tasks/stats/user/:id
/// ```
pub async fn user_task_stats(
    _auth: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<TaskStats>>> {
    let stats = Task::stats_for_user(&state.db, id).await?;

    Ok(Json(ApiResponse::new(
        "Task statistics retrieved successfully",
        stats,
    )))
}
