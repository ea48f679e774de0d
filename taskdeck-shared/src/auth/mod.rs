/// Authentication and authorization
///
/// - `jwt`: Token creation and validation
/// - `password`: Argon2id password hashing
/// - `context`: Per-request session context extractor
/// - `access`: Task access policy (admin bypass vs owner check)

pub mod access;
pub mod context;
pub mod jwt;
pub mod password;
