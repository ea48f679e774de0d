/// Database models
///
/// - `user`: User accounts with role-based access
/// - `task`: Tasks with assignment, filtering, and per-user statistics

pub mod task;
pub mod user;
