/// Database utilities
///
/// - `pool`: PostgreSQL connection pool
/// - `migrations`: Embedded migration runner

pub mod migrations;
pub mod pool;
