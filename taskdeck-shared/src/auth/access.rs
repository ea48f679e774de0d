/// Task access policy
///
/// Gates single-task writes by the caller's identity and role:
///
/// - Admins pass unconditionally.
/// - Everyone else must be the task's assignee. An unassigned task counts
///   as a mismatch for non-admins.
///
/// Read-one deliberately does NOT go through this policy: it uses an
/// owner-scoped query (`Task::find_assigned`) that applies to admins too.
/// The two restriction styles differ on purpose and both are load-bearing.

use crate::auth::context::AuthContext;
use crate::models::task::Task;

/// Error type for access-policy checks
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Caller may not modify this task
    #[error("You do not have permission to modify this task")]
    NotTaskOwner,
}

/// Checks whether the caller may update or delete the given task
///
/// # Errors
///
/// Returns `AccessError::NotTaskOwner` when a non-admin caller is not the
/// task's assignee (including when the task is unassigned).
pub fn ensure_task_write(auth: &AuthContext, task: &Task) -> Result<(), AccessError> {
    if auth.is_admin() {
        return Ok(());
    }

    match task.assigned_to {
        Some(assignee) if assignee == auth.user_id => Ok(()),
        _ => Err(AccessError::NotTaskOwner),
    }
}
