/// Task model and database operations
///
/// This module provides the Task model plus the scoped, filtered queries the
/// access filter translates list requests into. A task references at most
/// one assignee; the reference is validated at write time and backed by
/// `ON DELETE SET NULL` rather than a hard constraint on the API layer.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in-progress', 'done');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     due_date TIMESTAMPTZ,
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{Task, CreateTask, TaskFilter, TaskStatus};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, caller: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Write report".to_string(),
///     description: None,
///     status: TaskStatus::Todo,
///     due_date: None,
///     assigned_to: Some(caller),
/// }).await?;
///
/// let filter = TaskFilter { status: Some(TaskStatus::Todo), ..Default::default() };
/// let (tasks, total) = Task::list_assigned(&pool, caller, &filter).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task status
///
/// Three values, no enforced transition graph: any caller with write access
/// may set any of the three directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started (default on creation)
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl TaskStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Assignee (None for unassigned tasks)
    pub assigned_to: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (defaults to `todo` at the API boundary)
    pub status: TaskStatus,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Assignee, already resolved against the users table
    pub assigned_to: Option<Uuid>,
}

/// Input for updating a task
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,

    /// New assignee, already resolved against the users table
    pub assigned_to: Option<Uuid>,
}

/// Filter for listing a caller's tasks
///
/// Listing is always scoped to tasks assigned to the caller; these filters
/// narrow that scope further. Pagination is offset-based.
#[derive(Debug, Clone)]
pub struct TaskFilter {
    /// Equality filter on status
    pub status: Option<TaskStatus>,

    /// Calendar-date equality filter on the due date
    pub due_date: Option<NaiveDate>,

    /// Case-insensitive substring match against title or description
    pub search: Option<String>,

    /// 1-based page number
    pub page: u32,

    /// Page size, 1..=100
    pub limit: u32,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            status: None,
            due_date: None,
            search: None,
            page: 1,
            limit: 10,
        }
    }
}

impl TaskFilter {
    /// Offset implied by page and limit: `(page - 1) * limit`
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

/// Per-user task counts grouped by status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// All tasks assigned to the user
    pub total: i64,

    /// Tasks in `todo`
    pub todo: i64,

    /// Tasks in `in-progress`
    pub in_progress: i64,

    /// Tasks in `done`
    pub done: i64,
}

/// Builds the WHERE clause for a scoped list query.
///
/// `$1` is always the caller id; filter binds follow in declaration order
/// (status, due date, search). Returns the clause and the number of binds it
/// expects, so callers can append LIMIT/OFFSET placeholders.
fn list_where_clause(filter: &TaskFilter) -> (String, u32) {
    let mut clause = String::from("WHERE assigned_to = $1");
    let mut binds = 1;

    if filter.status.is_some() {
        binds += 1;
        clause.push_str(&format!(" AND status = ${}", binds));
    }
    if filter.due_date.is_some() {
        binds += 1;
        clause.push_str(&format!(" AND due_date::date = ${}", binds));
    }
    if filter.search.is_some() {
        binds += 1;
        clause.push_str(&format!(
            " AND (title ILIKE ${b} OR description ILIKE ${b})",
            b = binds
        ));
    }

    (clause, binds)
}

/// Escapes LIKE wildcards so a search for "100%" matches literally
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl Task {
    /// Creates a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, due_date, assigned_to)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, due_date, assigned_to,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.due_date)
        .bind(data.assigned_to)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, due_date, assigned_to,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, scoped to the given assignee
    ///
    /// This is the read-one path: the scope applies to every caller, admins
    /// included. A cross-user id simply comes back as None.
    pub async fn find_assigned(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, due_date, assigned_to,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND assigned_to = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks assigned to a user, filtered and paginated
    ///
    /// Returns the page of tasks plus the total count of rows matching all
    /// non-pagination filters, so the total stays stable across pages.
    pub async fn list_assigned(
        pool: &PgPool,
        user_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let (clause, binds) = list_where_clause(filter);
        let search_pattern = filter
            .search
            .as_ref()
            .map(|s| format!("%{}%", escape_like(s)));

        let count_sql = format!("SELECT COUNT(*) FROM tasks {}", clause);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql).bind(user_id);
        if let Some(status) = filter.status {
            count_query = count_query.bind(status);
        }
        if let Some(due_date) = filter.due_date {
            count_query = count_query.bind(due_date);
        }
        if let Some(ref pattern) = search_pattern {
            count_query = count_query.bind(pattern.clone());
        }
        let (total,) = count_query.fetch_one(pool).await?;

        let list_sql = format!(
            r#"
            SELECT id, title, description, status, due_date, assigned_to,
                   created_at, updated_at
            FROM tasks
            {clause}
            ORDER BY created_at DESC
            LIMIT ${limit_bind} OFFSET ${offset_bind}
            "#,
            clause = clause,
            limit_bind = binds + 1,
            offset_bind = binds + 2,
        );

        let mut list_query = sqlx::query_as::<_, Task>(&list_sql).bind(user_id);
        if let Some(status) = filter.status {
            list_query = list_query.bind(status);
        }
        if let Some(due_date) = filter.due_date {
            list_query = list_query.bind(due_date);
        }
        if let Some(pattern) = search_pattern {
            list_query = list_query.bind(pattern);
        }
        let tasks = list_query
            .bind(i64::from(filter.limit))
            .bind(filter.offset())
            .fetch_all(pool)
            .await?;

        Ok((tasks, total))
    }

    /// Updates a task
    ///
    /// Only non-None fields in `data` will be updated. Authorization happens
    /// before this call; this method applies the mutation unconditionally.
    ///
    /// # Returns
    ///
    /// The updated task if found, None if the task doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.assigned_to.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assigned_to = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, status, due_date, assigned_to, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(assigned_to) = data.assigned_to {
            q = q.bind(assigned_to);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// # Returns
    ///
    /// True if the task was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts a user's tasks grouped by status
    pub async fn stats_for_user(pool: &PgPool, user_id: Uuid) -> Result<TaskStats, sqlx::Error> {
        let stats = sqlx::query_as::<_, TaskStats>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'todo') AS todo,
                   COUNT(*) FILTER (WHERE status = 'in-progress') AS in_progress,
                   COUNT(*) FILTER (WHERE status = 'done') AS done
            FROM tasks
            WHERE assigned_to = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in-progress");
        assert_eq!(TaskStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_status_serde_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let status: TaskStatus = serde_json::from_str("\"todo\"").unwrap();
        assert_eq!(status, TaskStatus::Todo);
    }

    #[test]
    fn test_filter_defaults() {
        let filter = TaskFilter::default();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_filter_offset_arithmetic() {
        let filter = TaskFilter {
            page: 3,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(filter.offset(), 20);

        // page 0 is clamped rather than underflowing
        let filter = TaskFilter {
            page: 0,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_where_clause_scope_only() {
        let (clause, binds) = list_where_clause(&TaskFilter::default());
        assert_eq!(clause, "WHERE assigned_to = $1");
        assert_eq!(binds, 1);
    }

    #[test]
    fn test_where_clause_status_filter() {
        let filter = TaskFilter {
            status: Some(TaskStatus::Todo),
            ..Default::default()
        };
        let (clause, binds) = list_where_clause(&filter);
        assert_eq!(clause, "WHERE assigned_to = $1 AND status = $2");
        assert_eq!(binds, 2);
    }

    #[test]
    fn test_where_clause_search_matches_title_or_description() {
        let filter = TaskFilter {
            search: Some("foo".to_string()),
            ..Default::default()
        };
        let (clause, binds) = list_where_clause(&filter);
        assert_eq!(
            clause,
            "WHERE assigned_to = $1 AND (title ILIKE $2 OR description ILIKE $2)"
        );
        assert_eq!(binds, 2);
    }

    #[test]
    fn test_where_clause_all_filters_compose() {
        let filter = TaskFilter {
            status: Some(TaskStatus::Done),
            due_date: Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            search: Some("report".to_string()),
            ..Default::default()
        };
        let (clause, binds) = list_where_clause(&filter);
        assert_eq!(
            clause,
            "WHERE assigned_to = $1 AND status = $2 AND due_date::date = $3 \
             AND (title ILIKE $4 OR description ILIKE $4)"
        );
        assert_eq!(binds, 4);
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = TaskStats {
            total: 6,
            todo: 2,
            in_progress: 1,
            done: 3,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["total"], 6);
        assert_eq!(json["todo"], 2);
        assert_eq!(json["inProgress"], 1);
        assert_eq!(json["done"], 3);
    }

    #[test]
    fn test_task_serialize_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "Write report".to_string(),
            description: None,
            status: TaskStatus::Todo,
            due_date: None,
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("assignedTo").is_some());
        assert!(json.get("dueDate").is_some());
        assert!(json.get("assigned_to").is_none());
    }
}
