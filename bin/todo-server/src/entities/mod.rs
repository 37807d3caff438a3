//! Persistence layer.
//!
//! [`TodoStore`] defines the document-collection interface the HTTP handlers
//! depend on. The default implementation is [`SqliteStore`]; to swap to
//! another database, implement [`TodoStore`] for the new type and change the
//! concrete type in [`crate::state::AppState`].
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required.

pub mod dao;
pub mod todo;

pub use dao::TodoRecord;
pub use todo::TodoStore;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Pool settings for [`SqliteStore::connect`].
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g. `"sqlite://todo.db"`
    /// or `"sqlite::memory:"` for tests.
    pub async fn connect(url: &str, settings: &StoreSettings) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Every connection to `:memory:` gets its own empty database, so an
        // in-memory store must stay on a single connection that never expires.
        let in_memory = url.contains(":memory:");
        let max_connections = if in_memory { 1 } else { settings.max_connections.max(1) };

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(settings.acquire_timeout);
        if in_memory {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let settings = StoreSettings {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        };
        Self::connect("sqlite::memory:", &settings)
            .await
            .expect("in-memory store")
    }

    /// Close the pool; later calls fail as store errors.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
