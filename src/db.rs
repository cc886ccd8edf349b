use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Build the connection pool for the ledger database. Checkout is bounded so
/// a saturated pool fails the request instead of queueing callers forever.
pub fn create_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .connection_timeout(Duration::from_secs(5))
        .build(manager)
        .expect("Failed to create database connection pool")
}
