/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: Embedded schema migrations
///
/// Models and their SQL live in [`crate::models`].

pub mod migrations;
pub mod pool;
