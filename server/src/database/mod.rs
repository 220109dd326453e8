pub mod create;
pub mod jokes;
pub mod sessions;
pub mod store;
pub mod users;
pub mod utils;

pub use create::create_tables;
pub use store::SqliteStore;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

/// Open a SQLite pool. The database file is created when missing and foreign
/// keys are enforced on every connection.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);

    // An in-memory database lives exactly as long as its connection, so the
    // pool must never recycle it.
    if url.contains(":memory:") {
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;
    info!("Connected to database: {}", url);
    Ok(pool)
}
