/// API route handlers
///
/// - `health`: Liveness and database connectivity check
/// - `auth`: Login and token issuance
/// - `users`: Registration and user directory management
/// - `tasks`: Task CRUD, listing, and per-user statistics

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
